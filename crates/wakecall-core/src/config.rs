use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_BIND: &str = "0.0.0.0";
/// A persisted alarm closer than this to "now" at restore time is discarded.
pub const DEFAULT_STALE_AFTER_SECS: u64 = 3 * 60 * 60;

/// Top-level config (wakecall.toml + WAKECALL_* env overrides).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WakecallConfig {
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub alarm: AlarmConfig,
    pub twilio: TwilioConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            bind: DEFAULT_BIND.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Scheduler policy knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlarmConfig {
    /// Minimum margin (in seconds) between "now" and a persisted alarm for it
    /// to be re-armed at startup. Anything closer is treated as unrecoverable
    /// after an outage of unknown length and discarded rather than fired late.
    #[serde(default = "default_stale_after")]
    pub stale_after_secs: u64,
}

impl Default for AlarmConfig {
    fn default() -> Self {
        Self {
            stale_after_secs: DEFAULT_STALE_AFTER_SECS,
        }
    }
}

/// Twilio credentials and call routing for the wake-up call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TwilioConfig {
    /// Account SID.
    pub sid: String,
    /// Auth token.
    pub token: String,
    /// Caller ID — the Twilio phone number the call originates from.
    pub from: String,
    /// The phone number to wake up.
    pub to: String,
    /// Optional TwiML payload override. Falls back to the built-in
    /// wake-up announcement when not set.
    pub twiml: Option<String>,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}
fn default_stale_after() -> u64 {
    DEFAULT_STALE_AFTER_SECS
}
fn default_db_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.wakecall/wakecall.db", home)
}

impl WakecallConfig {
    /// Load config from a TOML file with WAKECALL_* env var overrides.
    ///
    /// Checks the explicit path argument first, then ~/.wakecall/wakecall.toml.
    /// The result is validated — missing Twilio credentials are a typed error
    /// here, not a panic somewhere at call time.
    pub fn load(config_path: Option<&str>) -> crate::error::Result<Self> {
        let path = config_path
            .map(String::from)
            .unwrap_or_else(default_config_path);

        let config: WakecallConfig = Figment::new()
            .merge(Toml::file(&path))
            .merge(Env::prefixed("WAKECALL_").split("_"))
            .extract()
            .map_err(|e| crate::error::WakecallError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Reject configs that cannot place the wake-up call.
    pub fn validate(&self) -> crate::error::Result<()> {
        for (field, value) in [
            ("twilio.sid", &self.twilio.sid),
            ("twilio.token", &self.twilio.token),
            ("twilio.from", &self.twilio.from),
            ("twilio.to", &self.twilio.to),
        ] {
            if value.trim().is_empty() {
                return Err(crate::error::WakecallError::Config(format!(
                    "{field} must not be empty"
                )));
            }
        }
        if self.alarm.stale_after_secs == 0 {
            return Err(crate::error::WakecallError::Config(
                "alarm.stale_after_secs must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

fn default_config_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.wakecall/wakecall.toml", home)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> WakecallConfig {
        WakecallConfig {
            gateway: GatewayConfig::default(),
            database: DatabaseConfig::default(),
            alarm: AlarmConfig::default(),
            twilio: TwilioConfig {
                sid: "AC123".into(),
                token: "secret".into(),
                from: "+15550100".into(),
                to: "+15550199".into(),
                twiml: None,
            },
        }
    }

    #[test]
    fn valid_config_passes() {
        assert!(base_config().validate().is_ok());
    }

    #[test]
    fn empty_twilio_field_is_rejected() {
        let mut config = base_config();
        config.twilio.to = "  ".into();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("twilio.to"));
    }

    #[test]
    fn zero_stale_threshold_is_rejected() {
        let mut config = base_config();
        config.alarm.stale_after_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn default_port_and_staleness() {
        let config = base_config();
        assert_eq!(config.gateway.port, 3000);
        assert_eq!(config.alarm.stale_after_secs, 3 * 60 * 60);
    }
}
