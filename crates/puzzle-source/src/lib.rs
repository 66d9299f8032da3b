pub mod client;
pub mod config;
pub mod error;
pub mod wire;

pub use client::PuzzleSource;
pub use config::SourceConfig;
pub use error::SourceError;
