use super::{Notice, ScreenError};
use crate::catalog::PlanDirectory;
use crate::client::ConsoleClient;
use crate::forms::RegisterForm;
use log::warn;

/// Registration settings sheet
pub struct RegisterSettings {
    client: ConsoleClient,
    plans: PlanDirectory,
}

impl RegisterSettings {
    pub fn new(client: ConsoleClient, plans: PlanDirectory) -> Self {
        Self { client, plans }
    }

    /// Current settings as a form
    pub async fn load(&self) -> Result<RegisterForm, ScreenError> {
        Ok(self.client.register_config().await?.into())
    }

    /// Validate and save; returns the notice and the form reloaded from the backend
    pub async fn save(&self, form: RegisterForm) -> Result<(Notice, RegisterForm), ScreenError> {
        let catalog = self.plans.catalog().await?;
        let config = form.into_config(&catalog)?;
        self.client.update_register_config(&config).await?;

        let reloaded = match self.client.register_config().await {
            Ok(saved) => saved.into(),
            Err(err) => {
                warn!("Failed to reload register config after save: {}", err);
                config.into()
            }
        };
        Ok((Notice::success("Save Successful"), reloaded))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::FormError;
    use crate::test_utils::{empty_envelope, envelope, TestFixture};
    use reqwest::{Method, StatusCode};
    use serde_json::json;

    const REGISTER_CONFIG: &str = "/v1/admin/system/register-config";

    fn settings(fixture: &TestFixture) -> RegisterSettings {
        let plans = PlanDirectory::new(fixture.client.clone(), &fixture.config.catalog);
        RegisterSettings::new(fixture.client.clone(), plans)
    }

    async fn mock_plans(fixture: &TestFixture) {
        fixture
            .add_api_mock(
                Method::GET,
                "/v1/admin/subscribe/list",
                envelope(json!({"list": [{"id": 3, "name": "Trial"}], "total": 1})),
                StatusCode::OK,
                1,
            )
            .await;
    }

    #[tokio::test]
    async fn test_save_then_reload() {
        let fixture = TestFixture::new().await;
        mock_plans(&fixture).await;
        fixture
            .add_api_mock(Method::PUT, REGISTER_CONFIG, empty_envelope(), StatusCode::OK, 1)
            .await;
        fixture
            .add_api_mock(
                Method::GET,
                REGISTER_CONFIG,
                envelope(json!({"enable_trial": true, "trial_subscribe": 3, "trial_time": 2})),
                StatusCode::OK,
                1,
            )
            .await;

        let form = RegisterForm {
            enable_trial: true,
            trial_subscribe: Some(3),
            trial_time: 2,
            ..Default::default()
        };
        let (notice, reloaded) = settings(&fixture)
            .save(form.clone())
            .await
            .expect("Failed to save settings");
        assert!(notice.is_success());
        assert_eq!(reloaded, form);
    }

    #[tokio::test]
    async fn test_invalid_settings_are_not_sent() {
        let fixture = TestFixture::new().await;
        mock_plans(&fixture).await;
        fixture
            .add_api_mock(Method::PUT, REGISTER_CONFIG, empty_envelope(), StatusCode::OK, 0)
            .await;

        let err = settings(&fixture)
            .save(RegisterForm {
                enable_trial: true,
                ..Default::default()
            })
            .await
            .expect_err("trial without plan should fail");
        assert!(matches!(err, ScreenError::Form(FormError::Validation(_))));
    }

    #[tokio::test]
    async fn test_load_missing_config_uses_defaults() {
        let fixture = TestFixture::new().await;
        fixture
            .add_api_mock(Method::GET, REGISTER_CONFIG, empty_envelope(), StatusCode::OK, 1)
            .await;

        let form = settings(&fixture).load().await.expect("Failed to load");
        assert_eq!(form, RegisterForm::default());
    }
}
