use thiserror::Error;

#[derive(Error, Debug)]
pub enum IntakeError {
    #[error("Read failed: {0}")]
    Read(#[from] std::io::Error),

    #[error("Unreadable file: {0}")]
    Unreadable(String),

    #[error("Unsupported file type: {0}")]
    UnsupportedType(String),

    #[error("Selection rejected: sign-in required")]
    SelectionRejected,
}
