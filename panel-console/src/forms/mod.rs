//! Form models with client-side validation.
//!
//! A form is checked before anything is sent; a failing form never reaches
//! the backend.

use std::borrow::Cow;
use thiserror::Error;
use validator::{ValidationError, ValidationErrors};

pub mod redeem;
pub mod redemption;
pub mod register;

pub use redeem::RedeemForm;
pub use redemption::RedemptionCodeForm;
pub use register::RegisterForm;

#[derive(Debug, Error)]
/// Errors that can occur when processing form data.
pub enum FormError {
    #[error("validation errors: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("missing record id")]
    MissingId,

    #[error("please enter a code")]
    EmptyCode,

    #[error("no rows selected")]
    NothingSelected,
}

impl FormError {
    /// `(field, message)` pairs sorted by field, for inline display
    pub fn field_errors(&self) -> Vec<(String, String)> {
        let FormError::Validation(errors) = self else {
            return Vec::new();
        };
        let mut fields: Vec<(String, String)> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |err| {
                    let message = err
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| err.code.to_string());
                    (field.to_string(), message)
                })
            })
            .collect();
        fields.sort();
        fields
    }
}

/// Field error with a readable message
pub(crate) fn field_error(code: &'static str, message: impl Into<String>) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Owned(message.into()))
}

/// Turn collected errors into a result
pub(crate) fn finish(errors: ValidationErrors) -> Result<(), FormError> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(FormError::Validation(errors))
    }
}
