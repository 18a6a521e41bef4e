#![forbid(unsafe_code)]

pub mod app_services;
pub mod error;
pub mod language_service;
pub mod progress_store;

pub use app_services::AppServices;
pub use error::AppServicesError;
pub use language_service::LanguageService;
pub use progress_store::ProgressStore;
