use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, watch};
use tracing::{debug, info, warn};

use crate::config::IntakeConfig;
use crate::error::IntakeError;
use crate::models::{IntakeSnapshot, LifecycleState, SelectedFile};
use crate::services::decoder::FileDecoder;
use crate::services::progress::ProgressSimulator;
use crate::utils::validation;

/// Completion callback. Receives the encoded payload, at most once per
/// lifecycle, after the settling delay.
pub type CompletionCallback = Arc<dyn Fn(String) + Send + Sync>;

/// Raw input events from the drop zone and the file picker.
#[derive(Debug, Clone)]
pub enum IntakeEvent {
    DragEnter,
    DragOver,
    DragLeave,
    Drop(Vec<PathBuf>),
    FilePicked(Vec<PathBuf>),
}

/// Everything the two completion sources need to attempt the join-fire.
#[derive(Clone)]
struct JoinContext {
    state: Arc<Mutex<LifecycleState>>,
    generation: u64,
    settle: Duration,
    on_complete: CompletionCallback,
}

impl JoinContext {
    /// Check-both-then-fire-once. Called from the tick that reaches 100 and
    /// from the successful read, whichever happens second performs the
    /// callback; the other sees an unmet condition and returns.
    async fn try_fire(&self) {
        let payload = {
            let mut lifecycle = self.state.lock().await;
            if lifecycle.generation != self.generation || lifecycle.completed {
                return;
            }
            if lifecycle.progress < 100 {
                return;
            }
            let Some(payload) = lifecycle.payload.clone() else {
                return;
            };
            lifecycle.completed = true;
            payload
        };

        debug!(generation = self.generation, "join-fire, settling");

        let ctx = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(ctx.settle).await;
            // A selection made during the settle window supersedes this one.
            if ctx.state.lock().await.generation != ctx.generation {
                debug!(generation = ctx.generation, "stale completion dropped");
                return;
            }
            (ctx.on_complete)(payload);
        });
    }
}

/// The file-intake widget.
///
/// Couples the [`ProgressSimulator`] with an asynchronous file read and
/// invokes the completion callback exactly once, only after both have
/// finished. Selection is gated on the externally supplied sign-in flag.
pub struct UploadWidget {
    config: IntakeConfig,
    auth: watch::Receiver<bool>,
    decoder: Arc<dyn FileDecoder>,
    on_complete: CompletionCallback,
    state: Arc<Mutex<LifecycleState>>,
    progress_tx: watch::Sender<u8>,
    simulator: ProgressSimulator,
    is_dragging: bool,
}

impl UploadWidget {
    pub fn new(
        config: IntakeConfig,
        auth: watch::Receiver<bool>,
        decoder: Arc<dyn FileDecoder>,
        on_complete: CompletionCallback,
    ) -> Self {
        let (progress_tx, _) = watch::channel(0);

        Self {
            config,
            auth,
            decoder,
            on_complete,
            state: Arc::new(Mutex::new(LifecycleState::default())),
            progress_tx,
            simulator: ProgressSimulator::new(),
            is_dragging: false,
        }
    }

    fn signed_in(&self) -> bool {
        *self.auth.borrow()
    }

    /// Feed one input event through the gateway. Unauthorized selection
    /// attempts are ignored entirely: no state change, no callback.
    pub async fn handle_event(&mut self, event: IntakeEvent) {
        match event {
            IntakeEvent::DragEnter | IntakeEvent::DragOver => {
                if self.signed_in() {
                    self.is_dragging = true;
                }
            }
            IntakeEvent::DragLeave => {
                self.is_dragging = false;
            }
            IntakeEvent::Drop(paths) => {
                if self.signed_in() {
                    self.is_dragging = false;
                }
                // Only the first file of a multi-file drop is used.
                if let Some(path) = paths.first() {
                    if let Err(e) = self.select(path).await {
                        debug!(error = %e, "drop ignored");
                    }
                }
            }
            IntakeEvent::FilePicked(paths) => {
                if let Some(path) = paths.first() {
                    if let Err(e) = self.select(path).await {
                        debug!(error = %e, "selection ignored");
                    }
                }
            }
        }
    }

    /// Accept `path` as the new selection and start a fresh lifecycle:
    /// simulated progress and the real read run concurrently from here.
    pub async fn select(&mut self, path: &Path) -> Result<(), IntakeError> {
        if !self.signed_in() {
            return Err(IntakeError::SelectionRejected);
        }
        if !validation::accepted_extension(path) {
            return Err(IntakeError::UnsupportedType(path.display().to_string()));
        }

        let file = SelectedFile::from_path(path);
        info!(name = %file.name, size = file.size, mime = %file.mime, "file selected");

        let generation = self.state.lock().await.begin(file.clone());
        let _ = self.progress_tx.send(0);

        let ctx = JoinContext {
            state: self.state.clone(),
            generation,
            settle: self.config.settle_delay(),
            on_complete: self.on_complete.clone(),
        };

        let tick_ctx = ctx.clone();
        self.simulator.start(
            &self.config,
            generation,
            self.state.clone(),
            self.progress_tx.clone(),
            async move { tick_ctx.try_fire().await },
        );

        self.spawn_read(file, ctx);
        Ok(())
    }

    fn spawn_read(&self, file: SelectedFile, ctx: JoinContext) {
        let decoder = self.decoder.clone();
        let cancel_ticks = self.simulator.cancel_handle();
        let progress_tx = self.progress_tx.clone();

        tokio::spawn(async move {
            match decoder.decode(&file).await {
                Ok(payload) => {
                    {
                        let mut lifecycle = ctx.state.lock().await;
                        if lifecycle.generation != ctx.generation {
                            debug!(name = %file.name, "stale read result dropped");
                            return;
                        }
                        lifecycle.payload = Some(payload);
                    }
                    ctx.try_fire().await;
                }
                Err(e) => {
                    warn!(name = %file.name, error = %e, "read failed, resetting widget");
                    let mut lifecycle = ctx.state.lock().await;
                    if lifecycle.generation != ctx.generation {
                        return;
                    }
                    lifecycle.reset();
                    if let Some(cancel) = cancel_ticks {
                        let _ = cancel.send(true);
                    }
                    let _ = progress_tx.send(0);
                }
            }
        });
    }

    /// Cancel the recurring progress tick. Idempotent; part of teardown.
    pub fn stop(&mut self) {
        self.simulator.stop();
    }

    /// Watch channel carrying progress updates for rendering.
    pub fn progress_watch(&self) -> watch::Receiver<u8> {
        self.progress_tx.subscribe()
    }

    pub fn is_dragging(&self) -> bool {
        self.is_dragging
    }

    /// Render-facing view of the current state.
    pub async fn snapshot(&self) -> IntakeSnapshot {
        let lifecycle = self.state.lock().await;
        IntakeSnapshot {
            file: lifecycle.file.clone(),
            progress: lifecycle.progress,
            is_dragging: self.is_dragging,
            completed: lifecycle.completed,
        }
    }
}
