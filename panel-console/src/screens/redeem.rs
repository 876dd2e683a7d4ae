use super::{Notice, ScreenError};
use crate::client::ConsoleClient;
use crate::forms::RedeemForm;
use log::info;

const DEFAULT_SUCCESS: &str = "Redeem successful";

/// Dashboard widget redeeming a code for the signed-in user
pub struct RedeemWidget {
    client: ConsoleClient,
}

impl RedeemWidget {
    pub fn new(client: ConsoleClient) -> Self {
        Self { client }
    }

    /// Submit the form; the input is cleared only when the backend accepts the code
    pub async fn redeem(&self, form: &mut RedeemForm) -> Result<Notice, ScreenError> {
        let code = form.clone().into_code()?;
        let message = self.client.redeem_code(&code).await?;
        form.clear();
        let notice = Notice::success(message.unwrap_or_else(|| DEFAULT_SUCCESS.to_string()));
        info!("Redeem accepted: {}", notice);
        Ok(notice)
    }
}
