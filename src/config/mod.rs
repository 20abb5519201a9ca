use std::env;
use std::time::Duration;

/// Timing configuration for the intake widget
#[derive(Debug, Clone)]
pub struct IntakeConfig {
    /// Cadence of simulated progress updates in milliseconds (default: 100)
    pub tick_interval_ms: u64,

    /// Percentage added per tick (default: 10)
    pub step_size: u8,

    /// Delay between join-fire and callback invocation in milliseconds (default: 1500)
    pub settle_delay_ms: u64,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 100,
            step_size: 10,
            settle_delay_ms: 1500,
        }
    }
}

impl IntakeConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let default = Self::default();

        Self {
            tick_interval_ms: env::var("INTAKE_TICK_INTERVAL_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.tick_interval_ms),

            step_size: env::var("INTAKE_STEP_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.step_size),

            settle_delay_ms: env::var("INTAKE_SETTLE_DELAY_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.settle_delay_ms),
        }
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}
