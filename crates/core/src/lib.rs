#![forbid(unsafe_code)]

pub mod curriculum;
pub mod model;
pub mod navigation;

pub use curriculum::{Curriculum, CurriculumError};
pub use navigation::NavigationCursor;
