//! Visualizer configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{ControlError, ControlResult};

/// Tunables of the playback and fetch pipeline.
///
/// Typically loaded from a JSON file by the application and passed to
/// [`Visualizer::new`][crate::Visualizer::new].  Missing fields take their
/// defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualizerConfig {
    /// Minimum delay between two states requests.  Default: 800.
    pub states_debounce_ms: u64,

    /// Minimum delay between two polylines requests.  Default: 800.
    pub polylines_debounce_ms: u64,

    /// Real time between playback ticks at speed 1.  Default: 1000.
    pub base_tick_interval_ms: u64,

    /// Simulation seconds of loaded data wanted ahead of and behind the
    /// visualization time before more states are requested.  Default: 30.
    pub fetch_margin_secs: f64,
}

impl Default for VisualizerConfig {
    fn default() -> Self {
        Self {
            states_debounce_ms:    800,
            polylines_debounce_ms: 800,
            base_tick_interval_ms: 1000,
            fetch_margin_secs:     30.0,
        }
    }
}

impl VisualizerConfig {
    pub fn validate(&self) -> ControlResult<()> {
        if self.base_tick_interval_ms == 0 {
            return Err(ControlError::Config("base_tick_interval_ms must be positive".into()));
        }
        if !self.fetch_margin_secs.is_finite() || self.fetch_margin_secs < 0.0 {
            return Err(ControlError::Config(format!(
                "fetch_margin_secs must be finite and non-negative, got {}",
                self.fetch_margin_secs
            )));
        }
        Ok(())
    }

    #[inline]
    pub fn states_debounce(&self) -> Duration {
        Duration::from_millis(self.states_debounce_ms)
    }

    #[inline]
    pub fn polylines_debounce(&self) -> Duration {
        Duration::from_millis(self.polylines_debounce_ms)
    }

    #[inline]
    pub fn base_tick_interval(&self) -> Duration {
        Duration::from_millis(self.base_tick_interval_ms)
    }
}
