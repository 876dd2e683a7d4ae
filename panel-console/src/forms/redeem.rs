use super::FormError;
use serde::Deserialize;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
/// Form data for redeeming a code on the user dashboard.
pub struct RedeemForm {
    pub code: String,
}

impl RedeemForm {
    pub fn new(code: impl Into<String>) -> Self {
        Self { code: code.into() }
    }

    /// Submit is only possible with a non-blank code
    pub fn can_submit(&self) -> bool {
        !self.code.trim().is_empty()
    }

    /// The trimmed code
    pub fn into_code(self) -> Result<String, FormError> {
        let code = self.code.trim();
        if code.is_empty() {
            return Err(FormError::EmptyCode);
        }
        Ok(code.to_string())
    }

    pub fn clear(&mut self) {
        self.code.clear();
    }
}
