use std::future::Future;
use std::sync::Arc;
use tokio::sync::{Mutex, watch};

use crate::config::IntakeConfig;
use crate::models::LifecycleState;

/// Synthetic progress source.
///
/// Advances the lifecycle's progress counter on a fixed cadence until it
/// reaches 100, independent of how long the real read takes. The tick runs
/// as a spawned task cancelled through a watch channel; dropping the
/// simulator cancels it as well, so a torn-down widget cannot leave a
/// dangling timer behind.
pub struct ProgressSimulator {
    cancel: Option<watch::Sender<bool>>,
}

impl ProgressSimulator {
    pub fn new() -> Self {
        Self { cancel: None }
    }

    /// Cancel any running tick, then begin a new one for `generation`.
    ///
    /// Each tick adds `step_size` (clamped to 100) and publishes the new
    /// value on `progress_tx`. The tick that reaches 100 stops the task and
    /// awaits `on_full` once: the simulator's half of the join.
    pub fn start<F>(
        &mut self,
        config: &IntakeConfig,
        generation: u64,
        state: Arc<Mutex<LifecycleState>>,
        progress_tx: watch::Sender<u8>,
        on_full: F,
    ) where
        F: Future<Output = ()> + Send + 'static,
    {
        self.stop();

        let (cancel_tx, mut cancel_rx) = watch::channel(false);
        self.cancel = Some(cancel_tx);

        let step = config.step_size.max(1); // a zero step would never finish
        let period = config.tick_interval();

        tokio::spawn(async move {
            let mut on_full = Some(on_full);
            let mut ticker = tokio::time::interval(period);
            ticker.tick().await; // the first tick completes immediately

            loop {
                tokio::select! {
                    _ = cancel_rx.changed() => break,
                    _ = ticker.tick() => {
                        let full = {
                            let mut lifecycle = state.lock().await;
                            if lifecycle.generation != generation {
                                break;
                            }
                            lifecycle.progress =
                                lifecycle.progress.saturating_add(step).min(100);
                            let _ = progress_tx.send(lifecycle.progress);
                            lifecycle.progress == 100
                        };

                        if full {
                            if let Some(join_check) = on_full.take() {
                                join_check.await;
                            }
                            break;
                        }
                    }
                }
            }
        });
    }

    /// Cancel the recurring tick. Safe to call repeatedly and with no tick
    /// active.
    pub fn stop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            let _ = cancel.send(true);
        }
    }

    /// Handle the read task uses to stop the tick from its failure path.
    pub(crate) fn cancel_handle(&self) -> Option<watch::Sender<bool>> {
        self.cancel.clone()
    }
}

impl Default for ProgressSimulator {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ProgressSimulator {
    fn drop(&mut self) {
        self.stop();
    }
}
