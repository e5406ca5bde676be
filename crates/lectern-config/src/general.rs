//! General application configuration.

use serde::{Deserialize, Serialize};

/// Default result limit.
const fn default_limit() -> u32 {
    20
}

fn default_display_name() -> String {
    String::from("Host")
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Default result limit for list/search commands.
    #[serde(default = "default_limit")]
    pub default_limit: u32,

    /// Name used as the sender of chat messages posted from this client.
    #[serde(default = "default_display_name")]
    pub display_name: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
            display_name: default_display_name(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = GeneralConfig::default();
        assert_eq!(config.default_limit, 20);
        assert_eq!(config.display_name, "Host");
    }
}
