use crate::client::ConsoleClient;
use crate::config::ConsoleConfig;
use log::LevelFilter;
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde_json::{json, Value};
use wiremock::matchers;
use wiremock::Mock;
use wiremock::MockServer;
use wiremock::ResponseTemplate;

/// Test fixture wiring a [`ConsoleClient`] to a mock backend.
///
/// # Examples
///
/// ```rust
/// #[tokio::test]
/// async fn test_endpoint() {
///     let fixture = TestFixture::new().await;
///
///     fixture
///         .add_api_mock(
///             Method::GET,
///             "/v1/admin/system/register-config",
///             envelope(json!({ "stop_register": true })),
///             StatusCode::OK,
///             1,
///         )
///         .await;
///
///     let config = fixture.client.register_config().await.unwrap();
///     assert!(config.stop_register);
/// }
/// ```
pub struct TestFixture {
    /// Client pointed at the mock backend
    pub client: ConsoleClient,
    /// Configuration used to build the client
    pub config: ConsoleConfig,
    /// Mock backend
    pub api_mock: MockServer,
}

impl TestFixture {
    /// Creates a new fixture with its own mock backend
    pub async fn new() -> Self {
        Self::setup_logger(LevelFilter::Debug);

        let api_mock = MockServer::start().await;
        let config = ConsoleConfig::for_test_with_mock(&api_mock);
        let client = ConsoleClient::new(&config.api).expect("Failed to build test client");

        Self {
            client,
            config,
            api_mock,
        }
    }

    /// Initializes the test logger; repeated calls are ignored
    pub fn setup_logger(level: LevelFilter) {
        let _ = env_logger::builder()
            .filter_level(level)
            .is_test(true)
            .try_init();
    }

    /// Adds a mock route with the given method, path and response.
    ///
    /// `expected_calls` is verified when the mock server is dropped.
    pub async fn add_api_mock(
        &self,
        method: Method,
        path: impl Into<String>,
        response_body: impl Serialize,
        status_code: StatusCode,
        expected_calls: u64,
    ) {
        Mock::given(matchers::method(method.as_str()))
            .and(matchers::path(path.into()))
            .respond_with(ResponseTemplate::new(status_code.as_u16()).set_body_json(response_body))
            .expect(expected_calls)
            .mount(&self.api_mock)
            .await;
    }

    /// Query pairs of every request received on `path`, in arrival order
    pub async fn received_queries(&self, path: &str) -> Vec<Vec<(String, String)>> {
        self.api_mock
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|request| request.url.path() == path)
            .map(|request| {
                request
                    .url
                    .query_pairs()
                    .map(|(k, v)| (k.into_owned(), v.into_owned()))
                    .collect()
            })
            .collect()
    }

    /// JSON bodies of every request received on `path`, in arrival order
    pub async fn received_bodies(&self, path: &str) -> Vec<Value> {
        self.api_mock
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|request| request.url.path() == path)
            .map(|request| serde_json::from_slice(&request.body).unwrap_or(Value::Null))
            .collect()
    }
}

/// Wrap `data` in the backend's success envelope
pub fn envelope(data: Value) -> Value {
    json!({
        "code": 200,
        "msg": "success",
        "data": data,
    })
}

/// Success envelope without data
pub fn empty_envelope() -> Value {
    json!({
        "code": 200,
        "msg": "success",
    })
}
