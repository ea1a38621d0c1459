//! Session configuration and fail-fast validation.

use anyhow::{anyhow, Result};

use blox_types::{
    DEFAULT_FALL_INTERVAL_MS, DEFAULT_FIELD_HEIGHT, DEFAULT_FIELD_WIDTH, DEFAULT_QUEUE_CAPACITY,
    MIN_FIELD_HEIGHT, MIN_FIELD_WIDTH,
};

/// Tunables for one game session. Validated when the session is constructed,
/// before any game starts.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    /// Field width in cells; even, at least 10.
    pub field_width: i32,
    /// Field height in cells; even, at least 20.
    pub field_height: i32,
    /// Number of pieces kept pending for preview; zero disables the queue.
    pub queue_capacity: usize,
    /// Interval between automatic downward steps, milliseconds.
    pub fall_interval_ms: u32,
    /// Seed for the piece draw sequence.
    pub seed: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            field_width: DEFAULT_FIELD_WIDTH,
            field_height: DEFAULT_FIELD_HEIGHT,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            fall_interval_ms: DEFAULT_FALL_INTERVAL_MS,
            seed: 1,
        }
    }
}

impl SessionConfig {
    pub(crate) fn validate(&self) -> Result<()> {
        if self.field_width < MIN_FIELD_WIDTH || self.field_width % 2 != 0 {
            return Err(anyhow!(
                "field width must be even and at least {}, got {}",
                MIN_FIELD_WIDTH,
                self.field_width
            ));
        }
        if self.field_height < MIN_FIELD_HEIGHT || self.field_height % 2 != 0 {
            return Err(anyhow!(
                "field height must be even and at least {}, got {}",
                MIN_FIELD_HEIGHT,
                self.field_height
            ));
        }
        if self.fall_interval_ms == 0 {
            return Err(anyhow!("fall interval must be positive"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(SessionConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_odd_and_undersized_fields() {
        let mut config = SessionConfig::default();
        config.field_width = 12;
        config.field_height = 30;
        assert!(config.validate().is_ok());

        config.field_width = 13;
        assert!(config.validate().is_err());

        config.field_width = 8;
        assert!(config.validate().is_err());

        config.field_width = 10;
        config.field_height = 18;
        assert!(config.validate().is_err());

        config.field_height = 21;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_fall_interval() {
        let config = SessionConfig {
            fall_interval_ms: 0,
            ..SessionConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
