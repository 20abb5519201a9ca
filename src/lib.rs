pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;

pub use config::IntakeConfig;
pub use error::IntakeError;
pub use models::{IntakeSnapshot, SelectedFile, VisualizerState};
pub use services::decoder::{FileDecoder, FsDecoder, StubDecoder};
pub use services::widget::{CompletionCallback, IntakeEvent, UploadWidget};
