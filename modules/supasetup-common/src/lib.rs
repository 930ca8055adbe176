pub mod config;
pub mod db;
pub mod error;

pub use config::SetupConfig;
pub use db::ConnectTarget;
pub use error::{Result, SetupError};
