mod config;
pub use config::{AppConfig, RemoteConfig};

mod error;
pub use error::AppError;

pub mod library;
pub mod player;

mod tui;
pub use tui::start;
