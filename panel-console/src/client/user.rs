use super::{ClientError, ConsoleClient};
use log::info;
use reqwest::Method;
use serde::Serialize;

const REDEEM_CODE_ENDPOINT: &str = "/v1/user/redeem-code";

#[derive(Debug, Clone, Serialize)]
struct RedeemCodeRequest<'a> {
    code: &'a str,
}

impl ConsoleClient {
    /// Redeem a code for the current user.
    ///
    /// Returns the backend's message when it sends a non-empty one.
    pub async fn redeem_code(&self, code: &str) -> Result<Option<String>, ClientError> {
        let envelope = self
            .send_json::<_, serde_json::Value>(
                Method::POST,
                REDEEM_CODE_ENDPOINT,
                &RedeemCodeRequest { code },
            )
            .await?;
        info!("Redeemed code {}", code);
        Ok(envelope.into_message())
    }
}
