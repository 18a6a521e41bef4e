use std::io::{self, BufRead, Write};

use course_core::model::{Language, LessonId};
use services::AppServices;

use crate::render;

#[derive(Debug, Clone, PartialEq, Eq)]
enum ShellCommand {
    Next,
    Previous,
    Goto(LessonId),
    Show,
    Done,
    List,
    Progress,
    Reset,
    Language(Option<String>),
    Help,
    Quit,
    Empty,
    Unknown(String),
}

impl ShellCommand {
    fn parse(line: &str) -> Self {
        let mut parts = line.split_whitespace();
        let Some(head) = parts.next() else {
            return Self::Empty;
        };
        let arg = parts.next();
        match head {
            "next" | "n" => Self::Next,
            "prev" | "p" => Self::Previous,
            "goto" | "g" => match arg.and_then(|raw| raw.parse::<LessonId>().ok()) {
                Some(id) => Self::Goto(id),
                None => Self::Unknown("goto needs a lesson id".to_owned()),
            },
            "show" | "s" => Self::Show,
            "done" | "d" => Self::Done,
            "list" | "ls" => Self::List,
            "progress" => Self::Progress,
            "reset" => Self::Reset,
            "lang" => Self::Language(arg.map(str::to_owned)),
            "help" | "?" => Self::Help,
            "quit" | "q" | "exit" => Self::Quit,
            other => Self::Unknown(format!("unknown command: {other}")),
        }
    }
}

const HELP: &str = "\
commands:
  next, n          go to the next lesson
  prev, p          go to the previous lesson
  goto <id>, g     jump to a lesson by id
  show, s          show the current lesson
  done, d          toggle completion of the current lesson
  list, ls         show the course outline
  progress         show overall progress
  reset            forget all completed lessons (asks first)
  lang [en|tr]     show or change the interface language
  help, ?          this help
  quit, q          leave
";

/// Line-oriented front end over `AppServices`.
pub struct Shell<'a> {
    app: &'a mut AppServices,
}

impl<'a> Shell<'a> {
    pub fn new(app: &'a mut AppServices) -> Self {
        Self { app }
    }

    /// Read commands from `input` until `quit` or end of input.
    ///
    /// # Errors
    ///
    /// Returns `io::Error` if reading input or writing output fails.
    pub async fn run<R: BufRead, W: Write>(&mut self, mut input: R, out: &mut W) -> io::Result<()> {
        write!(
            out,
            "{}",
            render::current(self.app.cursor(), self.app.progress())
        )?;
        loop {
            write!(out, "> ")?;
            out.flush()?;
            let mut line = String::new();
            if input.read_line(&mut line)? == 0 {
                writeln!(out)?;
                return Ok(());
            }
            let command = ShellCommand::parse(&line);
            tracing::debug!(?command, "shell command");
            match command {
                ShellCommand::Quit => return Ok(()),
                ShellCommand::Reset => {
                    write!(
                        out,
                        "Reset all progress? This cannot be undone. [y/N] "
                    )?;
                    out.flush()?;
                    let mut answer = String::new();
                    input.read_line(&mut answer)?;
                    if matches!(answer.trim(), "y" | "Y" | "yes") {
                        self.app.progress_mut().reset().await;
                        writeln!(out, "progress reset")?;
                    } else {
                        writeln!(out, "kept progress")?;
                    }
                }
                other => self.execute(other, out).await?,
            }
        }
    }

    async fn execute<W: Write>(&mut self, command: ShellCommand, out: &mut W) -> io::Result<()> {
        match command {
            ShellCommand::Next => {
                if self.app.cursor_mut().step_next() {
                    self.show_current(out)?;
                } else {
                    writeln!(out, "already at the last lesson")?;
                }
            }
            ShellCommand::Previous => {
                if self.app.cursor_mut().step_previous() {
                    self.show_current(out)?;
                } else {
                    writeln!(out, "already at the first lesson")?;
                }
            }
            ShellCommand::Goto(id) => {
                self.app.cursor_mut().select(id);
                self.show_current(out)?;
            }
            ShellCommand::Show => self.show_current(out)?,
            ShellCommand::Done => match self.app.toggle_current().await {
                Some(true) => writeln!(out, "marked complete")?,
                Some(false) => writeln!(out, "marked incomplete")?,
                None => writeln!(out, "no lesson selected")?,
            },
            ShellCommand::List => write!(
                out,
                "{}",
                render::outline(
                    self.app.curriculum(),
                    self.app.progress(),
                    Some(self.app.cursor().current_id()),
                )
            )?,
            ShellCommand::Progress => writeln!(
                out,
                "{}",
                render::progress_line(&self.app.progress().get_progress())
            )?,
            ShellCommand::Language(None) => {
                let language = self.app.language().load().await;
                writeln!(out, "{} ({language})", language.display_name())?;
            }
            ShellCommand::Language(Some(raw)) => match raw.parse::<Language>() {
                Ok(language) => {
                    self.app.language().save(language).await;
                    writeln!(out, "language set to {}", language.display_name())?;
                }
                Err(err) => writeln!(out, "{err}")?,
            },
            ShellCommand::Help => write!(out, "{HELP}")?,
            ShellCommand::Unknown(message) => writeln!(out, "{message} (try `help`)")?,
            ShellCommand::Empty | ShellCommand::Quit | ShellCommand::Reset => {}
        }
        Ok(())
    }

    fn show_current<W: Write>(&self, out: &mut W) -> io::Result<()> {
        write!(
            out,
            "{}",
            render::current(self.app.cursor(), self.app.progress())
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use course_core::Curriculum;
    use storage::repository::Storage;

    async fn app() -> AppServices {
        let curriculum = Arc::new(Curriculum::builtin().unwrap());
        AppServices::new(curriculum, &Storage::in_memory()).await
    }

    async fn run_script(app: &mut AppServices, script: &str) -> String {
        let mut out = Vec::new();
        Shell::new(app)
            .run(script.as_bytes(), &mut out)
            .await
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn parses_aliases_and_arguments() {
        assert_eq!(ShellCommand::parse("n\n"), ShellCommand::Next);
        assert_eq!(
            ShellCommand::parse("goto selectors_get"),
            ShellCommand::Goto(LessonId::new("selectors_get"))
        );
        assert!(matches!(ShellCommand::parse("goto"), ShellCommand::Unknown(_)));
        assert_eq!(
            ShellCommand::parse("lang tr"),
            ShellCommand::Language(Some("tr".to_owned()))
        );
        assert_eq!(ShellCommand::parse("   "), ShellCommand::Empty);
    }

    #[tokio::test]
    async fn steps_and_marks_lessons() {
        let mut app = app().await;
        let output = run_script(&mut app, "prev\nnext\ndone\nquit\n").await;

        assert!(output.contains("already at the first lesson"));
        assert!(output.contains("lesson 2 of 16"));
        assert!(output.contains("marked complete"));
        assert_eq!(app.cursor().current_id().as_str(), "intro_installation");
        assert!(app.progress().is_complete(&LessonId::new("intro_installation")));
    }

    #[tokio::test]
    async fn goto_unknown_lesson_reports_not_found() {
        let mut app = app().await;
        let output = run_script(&mut app, "goto nowhere\ndone\n").await;
        assert!(output.contains("lesson `nowhere` not found"));
        assert!(output.contains("no lesson selected"));
    }

    #[tokio::test]
    async fn reset_requires_confirmation() {
        let mut app = app().await;
        run_script(&mut app, "done\nreset\nn\n").await;
        assert_eq!(app.progress().get_progress().completed, 1);

        let output = run_script(&mut app, "reset\ny\n").await;
        assert!(output.contains("progress reset"));
        assert_eq!(app.progress().get_progress().completed, 0);
    }

    #[tokio::test]
    async fn changes_language() {
        let mut app = app().await;
        let output = run_script(&mut app, "lang de\nlang tr\nlang\n").await;
        assert!(output.contains("unsupported language tag: de"));
        assert!(output.contains("language set to Türkçe"));
        assert!(output.contains("Türkçe (tr)"));
    }
}
