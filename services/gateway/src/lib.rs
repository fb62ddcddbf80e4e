pub mod adapters;
pub mod config;
pub mod error;
pub mod telemetry;
pub mod workspace;

pub use config::Config;
pub use error::ClientError;
pub use workspace::Workspace;
