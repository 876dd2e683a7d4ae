use super::{ClientError, ConsoleClient};
use log::info;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const REGISTER_CONFIG_ENDPOINT: &str = "/v1/admin/system/register-config";

/// Unit of the trial period granted on registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TrialTimeUnit {
    #[serde(rename = "none", alias = "NoLimit")]
    None,
    #[serde(rename = "year", alias = "Year")]
    Year,
    #[serde(rename = "month", alias = "Month")]
    Month,
    #[default]
    #[serde(rename = "day", alias = "Day")]
    Day,
    #[serde(rename = "hour", alias = "Hour")]
    Hour,
    #[serde(rename = "minute", alias = "Minute")]
    Minute,
}

impl TrialTimeUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrialTimeUnit::None => "none",
            TrialTimeUnit::Year => "year",
            TrialTimeUnit::Month => "month",
            TrialTimeUnit::Day => "day",
            TrialTimeUnit::Hour => "hour",
            TrialTimeUnit::Minute => "minute",
        }
    }
}

impl fmt::Display for TrialTimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TrialTimeUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" | "nolimit" => Ok(TrialTimeUnit::None),
            "year" => Ok(TrialTimeUnit::Year),
            "month" => Ok(TrialTimeUnit::Month),
            "day" => Ok(TrialTimeUnit::Day),
            "hour" => Ok(TrialTimeUnit::Hour),
            "minute" => Ok(TrialTimeUnit::Minute),
            other => Err(format!("unknown trial time unit `{}`", other)),
        }
    }
}

/// Registration settings as stored by the backend.
///
/// Every field is optional on the wire; absent fields take the same defaults
/// the settings form starts from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegisterConfig {
    pub stop_register: bool,
    pub enable_trial: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trial_subscribe: Option<i64>,
    pub trial_time: i64,
    pub trial_time_unit: TrialTimeUnit,
    pub enable_ip_register_limit: bool,
    pub ip_register_limit: i64,
    /// Minutes
    pub ip_register_limit_duration: i64,
    pub device_limit: i64,
}

impl Default for RegisterConfig {
    fn default() -> Self {
        Self {
            stop_register: false,
            enable_trial: false,
            trial_subscribe: None,
            trial_time: 0,
            trial_time_unit: TrialTimeUnit::Day,
            enable_ip_register_limit: false,
            ip_register_limit: 1,
            ip_register_limit_duration: 1,
            device_limit: 5,
        }
    }
}

impl ConsoleClient {
    /// Current registration settings; a missing payload yields the defaults
    pub async fn register_config(&self) -> Result<RegisterConfig, ClientError> {
        let envelope = self.get::<RegisterConfig>(REGISTER_CONFIG_ENDPOINT).await?;
        Ok(envelope.data.unwrap_or_default())
    }

    pub async fn update_register_config(&self, config: &RegisterConfig) -> Result<(), ClientError> {
        self.send_json::<_, serde_json::Value>(Method::PUT, REGISTER_CONFIG_ENDPOINT, config)
            .await?;
        info!(
            "Updated register config (stop_register: {}, trial: {})",
            config.stop_register, config.enable_trial
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{empty_envelope, envelope, TestFixture};
    use reqwest::StatusCode;
    use serde_json::json;

    #[test]
    fn test_partial_config_takes_defaults() {
        let config: RegisterConfig =
            serde_json::from_value(json!({"enable_trial": true, "trial_subscribe": 3})).unwrap();
        assert!(config.enable_trial);
        assert_eq!(config.trial_subscribe, Some(3));
        assert_eq!(config.device_limit, 5);
        assert_eq!(config.trial_time_unit, TrialTimeUnit::Day);
    }

    #[test]
    fn test_trial_time_unit_parse() {
        assert_eq!("Hour".parse::<TrialTimeUnit>(), Ok(TrialTimeUnit::Hour));
        assert_eq!("NoLimit".parse::<TrialTimeUnit>(), Ok(TrialTimeUnit::None));
        assert!("week".parse::<TrialTimeUnit>().is_err());
        let unit: TrialTimeUnit = serde_json::from_value(json!("Minute")).unwrap();
        assert_eq!(unit, TrialTimeUnit::Minute);
    }

    #[tokio::test]
    async fn test_get_register_config() {
        let fixture = TestFixture::new().await;
        fixture
            .add_api_mock(
                Method::GET,
                REGISTER_CONFIG_ENDPOINT,
                envelope(json!({
                    "stop_register": true,
                    "enable_ip_register_limit": true,
                    "ip_register_limit": 3,
                    "ip_register_limit_duration": 60,
                    "device_limit": 2,
                    "trial_time_unit": "hour",
                })),
                StatusCode::OK,
                1,
            )
            .await;

        let config = fixture
            .client
            .register_config()
            .await
            .expect("Failed to load register config");
        assert!(config.stop_register);
        assert_eq!(config.ip_register_limit, 3);
        assert_eq!(config.ip_register_limit_duration, 60);
        assert_eq!(config.trial_time_unit, TrialTimeUnit::Hour);
    }

    #[tokio::test]
    async fn test_update_register_config() {
        let fixture = TestFixture::new().await;
        fixture
            .add_api_mock(
                Method::PUT,
                REGISTER_CONFIG_ENDPOINT,
                empty_envelope(),
                StatusCode::OK,
                1,
            )
            .await;

        fixture
            .client
            .update_register_config(&RegisterConfig::default())
            .await
            .expect("Failed to save register config");

        let body = &fixture.received_bodies(REGISTER_CONFIG_ENDPOINT).await[0];
        assert_eq!(body["trial_time_unit"], json!("day"));
        assert_eq!(body["device_limit"], json!(5));
        assert!(body.get("trial_subscribe").is_none());
    }
}
