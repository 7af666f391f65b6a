#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

pub mod board;
pub mod browser;
pub mod log;
pub mod service;
pub mod session;
pub mod settings;

pub use board::AssignmentBoard;
pub use browser::{AvailableUsers, Browser, Debounce, ExerciseBrowser, Exercises, UserBrowser};
pub use service::Service;
pub use session::ProgramSession;
pub use settings::{JsonFile, Settings, SettingsRepository, SettingsService};
