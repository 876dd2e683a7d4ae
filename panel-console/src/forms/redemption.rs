use super::{field_error, finish, FormError};
use crate::catalog::PlanCatalog;
use crate::client::redemption::{
    CreateRedemptionCodeRequest, RedemptionCode, UnitTime, UpdateRedemptionCodeRequest,
};
use serde::Deserialize;
use validator::{Validate, ValidationErrors};

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Validate)]
/// Form data for creating or editing a redemption code.
pub struct RedemptionCodeForm {
    /// Set when editing an existing code.
    pub id: Option<i64>,
    /// Custom code; generated by the backend when empty. Read-only when editing.
    pub code: Option<String>,
    /// Number of codes to generate at once.
    #[validate(range(min = 1, message = "Batch count must be at least 1"))]
    pub batch_count: Option<i64>,
    #[validate(range(min = 1, message = "Total count is required"))]
    pub total_count: i64,
    #[validate(range(min = 1, message = "Subscribe plan is required"))]
    pub subscribe_plan: i64,
    #[validate(required(message = "Unit time is required"))]
    pub unit_time: Option<UnitTime>,
    #[validate(range(min = 1, message = "Quantity is required"))]
    pub quantity: i64,
}

impl RedemptionCodeForm {
    /// Prefill the form from an existing row
    pub fn from_code(code: &RedemptionCode) -> Self {
        Self {
            id: Some(code.id),
            code: Some(code.code.clone()),
            batch_count: None,
            total_count: code.total_count,
            subscribe_plan: code.subscribe_plan,
            unit_time: Some(code.unit_time.clone()),
            quantity: code.quantity,
        }
    }

    pub fn is_edit(&self) -> bool {
        self.id.is_some()
    }

    /// Run the field rules plus the checks that need the plan catalog
    pub fn validate_with(&self, catalog: &PlanCatalog) -> Result<(), FormError> {
        let mut errors = match self.validate() {
            Ok(()) => ValidationErrors::new(),
            Err(errors) => errors,
        };

        if self.subscribe_plan >= 1 && !catalog.contains(self.subscribe_plan) {
            errors.add(
                "subscribe_plan",
                field_error(
                    "unknown_plan",
                    format!("Subscribe plan {} does not exist", self.subscribe_plan),
                ),
            );
        }
        if let Some(unit @ UnitTime::Other(_)) = &self.unit_time {
            errors.add(
                "unit_time",
                field_error("unknown_unit", format!("Unknown unit time `{}`", unit)),
            );
        }

        finish(errors)
    }

    pub fn into_create_request(
        self,
        catalog: &PlanCatalog,
    ) -> Result<CreateRedemptionCodeRequest, FormError> {
        self.validate_with(catalog)?;
        let unit_time = self.unit_time.ok_or_else(missing_unit_time)?;
        Ok(CreateRedemptionCodeRequest {
            code: self
                .code
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty()),
            batch_count: self.batch_count,
            total_count: self.total_count,
            subscribe_plan: self.subscribe_plan,
            unit_time,
            quantity: self.quantity,
        })
    }

    pub fn into_update_request(
        self,
        catalog: &PlanCatalog,
    ) -> Result<UpdateRedemptionCodeRequest, FormError> {
        let id = self.id.ok_or(FormError::MissingId)?;
        self.validate_with(catalog)?;
        let unit_time = self.unit_time.ok_or_else(missing_unit_time)?;
        Ok(UpdateRedemptionCodeRequest {
            id,
            total_count: self.total_count,
            subscribe_plan: self.subscribe_plan,
            unit_time,
            quantity: self.quantity,
            status: None,
        })
    }
}

fn missing_unit_time() -> FormError {
    let mut errors = ValidationErrors::new();
    errors.add("unit_time", field_error("required", "Unit time is required"));
    FormError::Validation(errors)
}
