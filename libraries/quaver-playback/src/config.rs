//! Playback configuration

use quaver_core::OutputDevice;
use serde::{Deserialize, Serialize};

/// Player construction options
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerConfig {
    /// Output device the sink is initialized with
    pub device: OutputDevice,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_uses_default_device() {
        let config = PlayerConfig::default();
        assert_eq!(config.device, OutputDevice::Default);
        assert_eq!(config.device.as_str(), "default");
    }
}
