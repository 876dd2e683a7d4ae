use super::{field_error, finish, FormError};
use crate::catalog::PlanCatalog;
use crate::client::system::{RegisterConfig, TrialTimeUnit};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
/// Form data for the registration settings sheet.
pub struct RegisterForm {
    pub stop_register: bool,
    pub enable_trial: bool,
    pub trial_subscribe: Option<i64>,
    #[validate(range(min = 0, message = "Trial time cannot be negative"))]
    pub trial_time: i64,
    pub trial_time_unit: TrialTimeUnit,
    pub enable_ip_register_limit: bool,
    pub ip_register_limit: i64,
    /// Minutes
    pub ip_register_limit_duration: i64,
    #[validate(range(min = 1, message = "Device limit must be at least 1"))]
    pub device_limit: i64,
}

impl Default for RegisterForm {
    fn default() -> Self {
        RegisterConfig::default().into()
    }
}

impl From<RegisterConfig> for RegisterForm {
    fn from(config: RegisterConfig) -> Self {
        Self {
            stop_register: config.stop_register,
            enable_trial: config.enable_trial,
            trial_subscribe: config.trial_subscribe,
            trial_time: config.trial_time,
            trial_time_unit: config.trial_time_unit,
            enable_ip_register_limit: config.enable_ip_register_limit,
            ip_register_limit: config.ip_register_limit,
            ip_register_limit_duration: config.ip_register_limit_duration,
            device_limit: config.device_limit,
        }
    }
}

impl RegisterForm {
    /// Field rules plus the checks that depend on the enabled toggles
    pub fn validate_with(&self, catalog: &PlanCatalog) -> Result<(), FormError> {
        let mut errors = match self.validate() {
            Ok(()) => ValidationErrors::new(),
            Err(errors) => errors,
        };

        if self.enable_ip_register_limit {
            if self.ip_register_limit < 1 {
                errors.add(
                    "ip_register_limit",
                    field_error("range", "IP registration limit must be at least 1"),
                );
            }
            if self.ip_register_limit_duration < 1 {
                errors.add(
                    "ip_register_limit_duration",
                    field_error("range", "Limit duration must be at least 1 minute"),
                );
            }
        }

        if self.enable_trial {
            match self.trial_subscribe {
                None => errors.add(
                    "trial_subscribe",
                    field_error("required", "Trial subscribe plan is required"),
                ),
                Some(id) if !catalog.contains(id) => errors.add(
                    "trial_subscribe",
                    field_error("unknown_plan", format!("Subscribe plan {} does not exist", id)),
                ),
                Some(_) => {}
            }
        }

        finish(errors)
    }

    pub fn into_config(self, catalog: &PlanCatalog) -> Result<RegisterConfig, FormError> {
        self.validate_with(catalog)?;
        Ok(RegisterConfig {
            stop_register: self.stop_register,
            enable_trial: self.enable_trial,
            trial_subscribe: self.trial_subscribe,
            trial_time: self.trial_time,
            trial_time_unit: self.trial_time_unit,
            enable_ip_register_limit: self.enable_ip_register_limit,
            ip_register_limit: self.ip_register_limit,
            ip_register_limit_duration: self.ip_register_limit_duration,
            device_limit: self.device_limit,
        })
    }
}
