use std::fmt;
use std::sync::Arc;

use course_core::Curriculum;
use course_core::model::{Language, LessonId};
use services::AppServices;
use tracing_subscriber::EnvFilter;

mod render;
mod shell;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    MissingLessonId { command: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
    InvalidLanguage { raw: String },
    ResetNotConfirmed,
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::MissingLessonId { command } => write!(f, "{command} requires a lesson id"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidLanguage { raw } => write!(f, "unsupported language: {raw}"),
            ArgsError::ResetNotConfirmed => write!(f, "reset is irreversible; pass --yes to confirm"),
        }
    }
}

impl std::error::Error for ArgsError {}

const DEFAULT_DB_URL: &str = "sqlite://course.sqlite3";

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [shell]            [--db <sqlite_url>]");
    eprintln!("  cargo run -p app -- lessons            [--db <sqlite_url>]");
    eprintln!("  cargo run -p app -- show <lesson-id>   [--db <sqlite_url>]");
    eprintln!("  cargo run -p app -- toggle <lesson-id> [--db <sqlite_url>]");
    eprintln!("  cargo run -p app -- progress           [--db <sqlite_url>]");
    eprintln!("  cargo run -p app -- reset --yes        [--db <sqlite_url>]");
    eprintln!("  cargo run -p app -- language [en|tr]   [--db <sqlite_url>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db {DEFAULT_DB_URL}");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  COURSE_DB_URL, RUST_LOG (default: warn)");
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Shell,
    Lessons,
    Show(LessonId),
    Toggle(LessonId),
    Progress,
    Reset,
    Language(Option<Language>),
}

#[derive(Debug)]
struct Args {
    db_url: String,
    command: Command,
}

impl Args {
    fn parse(argv: Vec<String>) -> Result<Self, ArgsError> {
        let mut db_url = std::env::var("COURSE_DB_URL")
            .unwrap_or_else(|_| DEFAULT_DB_URL.to_owned());
        let mut positional = Vec::new();
        let mut confirmed = false;

        let mut args = argv.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(&mut args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = value;
                }
                "--yes" | "-y" => confirmed = true,
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ if arg.starts_with("--") => return Err(ArgsError::UnknownArg(arg)),
                _ => positional.push(arg),
            }
        }

        let mut positional = positional.into_iter();
        let command = match positional.next().as_deref() {
            None | Some("shell") => Command::Shell,
            Some("lessons") => Command::Lessons,
            Some("show") => Command::Show(lesson_arg(positional.next(), "show")?),
            Some("toggle") => Command::Toggle(lesson_arg(positional.next(), "toggle")?),
            Some("progress") => Command::Progress,
            Some("reset") => {
                if !confirmed {
                    return Err(ArgsError::ResetNotConfirmed);
                }
                Command::Reset
            }
            Some("language") => match positional.next() {
                None => Command::Language(None),
                Some(raw) => Command::Language(Some(
                    raw.parse()
                        .map_err(|_| ArgsError::InvalidLanguage { raw: raw.clone() })?,
                )),
            },
            Some(other) => return Err(ArgsError::UnknownArg(other.to_owned())),
        };
        if let Some(extra) = positional.next() {
            return Err(ArgsError::UnknownArg(extra));
        }

        Ok(Self {
            db_url: normalize_sqlite_url(db_url),
            command,
        })
    }
}

fn lesson_arg(raw: Option<String>, command: &'static str) -> Result<LessonId, ArgsError> {
    raw.and_then(|value| value.parse().ok())
        .ok_or(ArgsError::MissingLessonId { command })
}

fn is_memory_url(url: &str) -> bool {
    url == "sqlite::memory:" || url.contains("mode=memory")
}

/// Rewrites file URLs to `sqlite://<absolute path>`; relative paths resolve
/// against the working directory.
fn normalize_sqlite_url(raw: String) -> String {
    if is_memory_url(&raw) {
        return raw;
    }

    let trimmed = raw.trim();
    let path_str = trimmed
        .strip_prefix("sqlite://")
        .or_else(|| trimmed.strip_prefix("sqlite:"))
        .unwrap_or(trimmed);
    let path = std::path::Path::new(path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| std::path::PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if is_memory_url(db_url) {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let argv: Vec<String> = std::env::args().skip(1).collect();
    let args = Args::parse(argv).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;
    tracing::debug!(db = %args.db_url, command = ?args.command, "starting");

    // Keep database setup in the binary glue so core/services stay pure.
    prepare_sqlite_file(&args.db_url)?;
    let curriculum = Arc::new(Curriculum::builtin()?);
    let mut app = AppServices::new_sqlite(&args.db_url, curriculum).await?;

    match args.command {
        Command::Shell => {
            let stdin = std::io::stdin();
            let mut stdout = std::io::stdout();
            shell::Shell::new(&mut app)
                .run(stdin.lock(), &mut stdout)
                .await?;
        }
        Command::Lessons => {
            print!(
                "{}",
                render::outline(app.curriculum(), app.progress(), None)
            );
        }
        Command::Show(id) => match app.curriculum().find_lesson(&id) {
            Some(lesson) => print!(
                "{}",
                render::lesson(
                    lesson,
                    app.curriculum().level_of(&id),
                    app.progress().is_complete(&id),
                )
            ),
            None => return Err(format!("unknown lesson: {id}").into()),
        },
        Command::Toggle(id) => {
            if app.curriculum().find_lesson(&id).is_none() {
                return Err(format!("unknown lesson: {id}").into());
            }
            let complete = app.progress_mut().toggle_complete(&id).await;
            let state = if complete { "complete" } else { "incomplete" };
            println!("{id}: {state}");
            println!("{}", render::progress_line(&app.progress().get_progress()));
        }
        Command::Progress => {
            println!("{}", render::progress_line(&app.progress().get_progress()));
        }
        Command::Reset => {
            app.progress_mut().reset().await;
            println!("{}", render::progress_line(&app.progress().get_progress()));
        }
        Command::Language(None) => {
            let language = app.language().load().await;
            println!("{} ({language})", language.display_name());
        }
        Command::Language(Some(language)) => {
            app.language().save(language).await;
            println!("language set to {}", language.display_name());
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    init_tracing();
    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
