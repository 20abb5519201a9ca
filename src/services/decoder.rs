use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use std::time::Duration;

use crate::error::IntakeError;
use crate::models::SelectedFile;

/// Decodes a selected file into a transferable encoded string (a data URL).
#[async_trait::async_trait]
pub trait FileDecoder: Send + Sync {
    async fn decode(&self, file: &SelectedFile) -> Result<String, IntakeError>;
}

/// Production decoder: reads the file from disk and encodes the bytes as a
/// base64 data URL.
pub struct FsDecoder;

#[async_trait::async_trait]
impl FileDecoder for FsDecoder {
    async fn decode(&self, file: &SelectedFile) -> Result<String, IntakeError> {
        let bytes = tokio::fs::read(&file.path).await?;

        // Prefer the sniffed content type over the extension guess.
        let mime = infer::get(&bytes)
            .map(|kind| kind.mime_type())
            .unwrap_or(file.mime.as_str());

        Ok(format!("data:{};base64,{}", mime, BASE64.encode(&bytes)))
    }
}

/// Decoder with a fixed duration and a canned outcome. Lets tests control
/// exactly when the read side of the join completes.
pub struct StubDecoder {
    delay: Duration,
    fail: bool,
}

impl StubDecoder {
    pub fn ok(delay: Duration) -> Self {
        Self { delay, fail: false }
    }

    pub fn failing(delay: Duration) -> Self {
        Self { delay, fail: true }
    }
}

#[async_trait::async_trait]
impl FileDecoder for StubDecoder {
    async fn decode(&self, file: &SelectedFile) -> Result<String, IntakeError> {
        tokio::time::sleep(self.delay).await;

        if self.fail {
            return Err(IntakeError::Unreadable(file.name.clone()));
        }

        // Payload echoes the file name so callers can tell lifecycles apart.
        Ok(format!(
            "data:text/plain;base64,{}",
            BASE64.encode(file.name.as_bytes())
        ))
    }
}
