//! Attendee presence polling configuration.

use serde::{Deserialize, Serialize};

/// Default roster refresh interval.
const fn default_interval_ms() -> u64 {
    10_000
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PresenceConfig {
    /// Milliseconds between roster refreshes.
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,

    /// Serve a fabricated roster instead of calling the backend.
    /// Intended for demos and UI work without a live meeting.
    #[serde(default)]
    pub demo_mode: bool,
}

impl Default for PresenceConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            demo_mode: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = PresenceConfig::default();
        assert_eq!(config.interval_ms, 10_000);
        assert!(!config.demo_mode);
    }
}
