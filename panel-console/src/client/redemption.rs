use super::{ClientError, ConsoleClient, ListPayload};
use crate::list::{PageRequest, PageResult, Resource, ResourceFetcher};
use async_trait::async_trait;
use log::info;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const CODE_ENDPOINT: &str = "/v1/admin/redemption/code";
const CODE_LIST_ENDPOINT: &str = "/v1/admin/redemption/code/list";
const CODE_BATCH_ENDPOINT: &str = "/v1/admin/redemption/code/batch";
const CODE_STATUS_ENDPOINT: &str = "/v1/admin/redemption/code/status";
const RECORD_LIST_ENDPOINT: &str = "/v1/admin/redemption/record/list";

/// Subscription period a redemption code grants, per unit of `quantity`.
///
/// Unknown values coming from the backend are kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum UnitTime {
    Day,
    Month,
    Quarter,
    HalfYear,
    Year,
    Other(String),
}

impl UnitTime {
    /// Every unit an operator can pick
    pub const ALL: [UnitTime; 5] = [
        UnitTime::Day,
        UnitTime::Month,
        UnitTime::Quarter,
        UnitTime::HalfYear,
        UnitTime::Year,
    ];

    /// Wire value
    pub fn as_str(&self) -> &str {
        match self {
            UnitTime::Day => "day",
            UnitTime::Month => "month",
            UnitTime::Quarter => "quarter",
            UnitTime::HalfYear => "half_year",
            UnitTime::Year => "year",
            UnitTime::Other(value) => value,
        }
    }

    /// Human readable label; unknown units fall back to the raw value
    pub fn label(&self) -> &str {
        match self {
            UnitTime::Day => "Day",
            UnitTime::Month => "Month",
            UnitTime::Quarter => "Quarter",
            UnitTime::HalfYear => "Half Year",
            UnitTime::Year => "Year",
            UnitTime::Other(value) => value,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, UnitTime::Other(_))
    }
}

impl From<String> for UnitTime {
    fn from(value: String) -> Self {
        match value.as_str() {
            "day" => UnitTime::Day,
            "month" => UnitTime::Month,
            "quarter" => UnitTime::Quarter,
            "half_year" => UnitTime::HalfYear,
            "year" => UnitTime::Year,
            _ => UnitTime::Other(value),
        }
    }
}

impl From<UnitTime> for String {
    fn from(value: UnitTime) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for UnitTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UnitTime {
    type Err = String;

    /// Strict parse used for operator input: only the known units are accepted
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match UnitTime::from(s.trim().to_lowercase()) {
            UnitTime::Other(value) => Err(format!(
                "unknown unit time `{}`, expected one of day, month, quarter, half_year, year",
                value
            )),
            unit => Ok(unit),
        }
    }
}

/// Whether a redemption code can currently be redeemed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum CodeStatus {
    #[default]
    Disabled,
    Enabled,
}

impl CodeStatus {
    pub fn is_enabled(&self) -> bool {
        matches!(self, CodeStatus::Enabled)
    }

    pub fn toggled(self) -> Self {
        match self {
            CodeStatus::Disabled => CodeStatus::Enabled,
            CodeStatus::Enabled => CodeStatus::Disabled,
        }
    }
}

impl TryFrom<u8> for CodeStatus {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(CodeStatus::Disabled),
            1 => Ok(CodeStatus::Enabled),
            other => Err(format!("invalid redemption code status {}", other)),
        }
    }
}

impl From<CodeStatus> for u8 {
    fn from(value: CodeStatus) -> Self {
        match value {
            CodeStatus::Disabled => 0,
            CodeStatus::Enabled => 1,
        }
    }
}

impl From<bool> for CodeStatus {
    fn from(enabled: bool) -> Self {
        if enabled {
            CodeStatus::Enabled
        } else {
            CodeStatus::Disabled
        }
    }
}

impl fmt::Display for CodeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodeStatus::Enabled => f.write_str("enabled"),
            CodeStatus::Disabled => f.write_str("disabled"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedemptionCode {
    pub id: i64,
    pub code: String,
    pub total_count: i64,
    #[serde(default)]
    pub used_count: i64,
    pub subscribe_plan: i64,
    pub unit_time: UnitTime,
    pub quantity: i64,
    #[serde(default)]
    pub status: CodeStatus,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
}

impl RedemptionCode {
    /// Redemptions left; never negative
    pub fn remaining(&self) -> i64 {
        (self.total_count - self.used_count).max(0)
    }
}

impl Resource for RedemptionCode {
    fn id(&self) -> i64 {
        self.id
    }
}

/// One use of a redemption code by a user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedemptionRecord {
    pub id: i64,
    pub redemption_code_id: i64,
    pub user_id: i64,
    pub subscribe_id: i64,
    pub unit_time: UnitTime,
    pub quantity: i64,
    /// Epoch milliseconds; 0 when the backend has not recorded it
    #[serde(default)]
    pub redeemed_at: i64,
    #[serde(default)]
    pub created_at: i64,
}

impl Resource for RedemptionRecord {
    fn id(&self) -> i64 {
        self.id
    }
}

/// Filters of the redemption code list
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CodeFilter {
    pub subscribe_plan: Option<i64>,
    pub unit_time: Option<UnitTime>,
    pub code: Option<String>,
}

/// Filters of the redemption record list
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RecordFilter {
    pub code_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateRedemptionCodeRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch_count: Option<i64>,
    pub total_count: i64,
    pub subscribe_plan: i64,
    pub unit_time: UnitTime,
    pub quantity: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpdateRedemptionCodeRequest {
    pub id: i64,
    pub total_count: i64,
    pub subscribe_plan: i64,
    pub unit_time: UnitTime,
    pub quantity: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<CodeStatus>,
}

#[derive(Debug, Clone, Serialize)]
struct DeleteRedemptionCodeRequest {
    id: i64,
}

#[derive(Debug, Clone, Serialize)]
struct BatchDeleteRedemptionCodeRequest<'a> {
    ids: &'a [i64],
}

#[derive(Debug, Clone, Serialize)]
struct ToggleRedemptionCodeStatusRequest {
    id: i64,
    status: CodeStatus,
}

impl ConsoleClient {
    pub async fn list_redemption_codes(
        &self,
        page: PageRequest,
        filters: &CodeFilter,
    ) -> Result<PageResult<RedemptionCode>, ClientError> {
        let payload: Option<ListPayload<RedemptionCode>> =
            self.get_page(CODE_LIST_ENDPOINT, page, filters).await?;
        Ok(payload.into())
    }

    pub async fn create_redemption_code(
        &self,
        request: &CreateRedemptionCodeRequest,
    ) -> Result<(), ClientError> {
        self.send_json::<_, serde_json::Value>(Method::POST, CODE_ENDPOINT, request)
            .await?;
        info!(
            "Created redemption code for plan {} ({} x {})",
            request.subscribe_plan, request.quantity, request.unit_time
        );
        Ok(())
    }

    pub async fn update_redemption_code(
        &self,
        request: &UpdateRedemptionCodeRequest,
    ) -> Result<(), ClientError> {
        self.send_json::<_, serde_json::Value>(Method::PUT, CODE_ENDPOINT, request)
            .await?;
        info!("Updated redemption code {}", request.id);
        Ok(())
    }

    pub async fn delete_redemption_code(&self, id: i64) -> Result<(), ClientError> {
        self.send_json::<_, serde_json::Value>(
            Method::DELETE,
            CODE_ENDPOINT,
            &DeleteRedemptionCodeRequest { id },
        )
        .await?;
        info!("Deleted redemption code {}", id);
        Ok(())
    }

    pub async fn batch_delete_redemption_codes(&self, ids: &[i64]) -> Result<(), ClientError> {
        self.send_json::<_, serde_json::Value>(
            Method::DELETE,
            CODE_BATCH_ENDPOINT,
            &BatchDeleteRedemptionCodeRequest { ids },
        )
        .await?;
        info!("Deleted {} redemption codes", ids.len());
        Ok(())
    }

    pub async fn toggle_redemption_code_status(
        &self,
        id: i64,
        status: CodeStatus,
    ) -> Result<(), ClientError> {
        self.send_json::<_, serde_json::Value>(
            Method::PUT,
            CODE_STATUS_ENDPOINT,
            &ToggleRedemptionCodeStatusRequest { id, status },
        )
        .await?;
        info!("Redemption code {} is now {}", id, status);
        Ok(())
    }

    pub async fn list_redemption_records(
        &self,
        page: PageRequest,
        filters: &RecordFilter,
    ) -> Result<PageResult<RedemptionRecord>, ClientError> {
        let payload: Option<ListPayload<RedemptionRecord>> =
            self.get_page(RECORD_LIST_ENDPOINT, page, filters).await?;
        Ok(payload.into())
    }
}

#[async_trait]
impl ResourceFetcher<RedemptionCode, CodeFilter> for ConsoleClient {
    async fn fetch(
        &self,
        page: PageRequest,
        filters: CodeFilter,
    ) -> Result<PageResult<RedemptionCode>, ClientError> {
        self.list_redemption_codes(page, &filters).await
    }
}

#[async_trait]
impl ResourceFetcher<RedemptionRecord, RecordFilter> for ConsoleClient {
    async fn fetch(
        &self,
        page: PageRequest,
        filters: RecordFilter,
    ) -> Result<PageResult<RedemptionRecord>, ClientError> {
        self.list_redemption_records(page, &filters).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{empty_envelope, envelope, TestFixture};
    use reqwest::StatusCode;
    use serde_json::json;

    fn code_json(id: i64, used_count: Option<i64>) -> serde_json::Value {
        let mut value = json!({
            "id": id,
            "code": format!("CODE-{id}"),
            "total_count": 10,
            "subscribe_plan": 1,
            "unit_time": "month",
            "quantity": 1,
            "status": 1,
            "created_at": 1_700_000_000_000_i64,
            "updated_at": 1_700_000_000_000_i64,
        });
        if let Some(used) = used_count {
            value["used_count"] = json!(used);
        }
        value
    }

    #[test]
    fn test_unit_time_wire_values() {
        let unit: UnitTime = serde_json::from_value(json!("half_year")).unwrap();
        assert_eq!(unit, UnitTime::HalfYear);
        assert_eq!(unit.label(), "Half Year");
        assert_eq!(serde_json::to_value(&unit).unwrap(), json!("half_year"));

        let unknown: UnitTime = serde_json::from_value(json!("week")).unwrap();
        assert_eq!(unknown, UnitTime::Other("week".to_string()));
        assert_eq!(unknown.label(), "week");
        assert!(!unknown.is_known());
    }

    #[test]
    fn test_unit_time_parse_is_strict() {
        assert_eq!("Month".parse::<UnitTime>(), Ok(UnitTime::Month));
        assert!("fortnight".parse::<UnitTime>().is_err());
    }

    #[test]
    fn test_code_status_wire_values() {
        assert_eq!(serde_json::to_value(CodeStatus::Enabled).unwrap(), json!(1));
        let status: CodeStatus = serde_json::from_value(json!(0)).unwrap();
        assert_eq!(status, CodeStatus::Disabled);
        assert!(serde_json::from_value::<CodeStatus>(json!(7)).is_err());
        assert_eq!(CodeStatus::Disabled.toggled(), CodeStatus::Enabled);
    }

    #[test]
    fn test_used_count_defaults_to_zero() {
        let code: RedemptionCode = serde_json::from_value(code_json(1, None)).unwrap();
        assert_eq!(code.used_count, 0);
        assert_eq!(code.remaining(), 10);

        let overused = RedemptionCode {
            used_count: 12,
            ..code
        };
        assert_eq!(overused.remaining(), 0);
    }

    #[tokio::test]
    async fn test_list_redemption_codes() {
        let fixture = TestFixture::new().await;
        fixture
            .add_api_mock(
                Method::GET,
                CODE_LIST_ENDPOINT,
                envelope(json!({
                    "list": [code_json(1, Some(3)), code_json(2, None)],
                    "total": 12,
                })),
                StatusCode::OK,
                1,
            )
            .await;

        let filters = CodeFilter {
            unit_time: Some(UnitTime::Month),
            ..Default::default()
        };
        let result = fixture
            .client
            .list_redemption_codes(PageRequest::new(2, 2).unwrap(), &filters)
            .await
            .expect("Failed to list codes");

        assert_eq!(result.total, 12);
        assert_eq!(result.list.len(), 2);
        assert_eq!(result.list[0].remaining(), 7);

        let queries = fixture.received_queries(CODE_LIST_ENDPOINT).await;
        assert_eq!(
            queries[0],
            vec![
                ("page".to_string(), "2".to_string()),
                ("size".to_string(), "2".to_string()),
                ("unit_time".to_string(), "month".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_list_without_data_is_empty() {
        let fixture = TestFixture::new().await;
        fixture
            .add_api_mock(
                Method::GET,
                RECORD_LIST_ENDPOINT,
                empty_envelope(),
                StatusCode::OK,
                1,
            )
            .await;

        let result = fixture
            .client
            .list_redemption_records(
                PageRequest::first(10).unwrap(),
                &RecordFilter { code_id: Some(4) },
            )
            .await
            .expect("Failed to list records");
        assert!(result.list.is_empty());
        assert_eq!(result.total, 0);

        let queries = fixture.received_queries(RECORD_LIST_ENDPOINT).await;
        assert!(queries[0].contains(&("code_id".to_string(), "4".to_string())));
    }

    #[tokio::test]
    async fn test_mutation_bodies() {
        let fixture = TestFixture::new().await;
        fixture
            .add_api_mock(Method::POST, CODE_ENDPOINT, empty_envelope(), StatusCode::OK, 1)
            .await;
        fixture
            .add_api_mock(Method::DELETE, CODE_ENDPOINT, empty_envelope(), StatusCode::OK, 1)
            .await;
        fixture
            .add_api_mock(
                Method::DELETE,
                CODE_BATCH_ENDPOINT,
                empty_envelope(),
                StatusCode::OK,
                1,
            )
            .await;
        fixture
            .add_api_mock(
                Method::PUT,
                CODE_STATUS_ENDPOINT,
                empty_envelope(),
                StatusCode::OK,
                1,
            )
            .await;

        fixture
            .client
            .create_redemption_code(&CreateRedemptionCodeRequest {
                code: None,
                batch_count: None,
                total_count: 10,
                subscribe_plan: 1,
                unit_time: UnitTime::Month,
                quantity: 1,
            })
            .await
            .expect("Failed to create code");
        fixture
            .client
            .delete_redemption_code(5)
            .await
            .expect("Failed to delete code");
        fixture
            .client
            .batch_delete_redemption_codes(&[6, 7])
            .await
            .expect("Failed to batch delete codes");
        fixture
            .client
            .toggle_redemption_code_status(8, CodeStatus::Disabled)
            .await
            .expect("Failed to toggle code");

        let created = fixture.received_bodies(CODE_ENDPOINT).await;
        assert_eq!(
            created[0],
            json!({
                "total_count": 10,
                "subscribe_plan": 1,
                "unit_time": "month",
                "quantity": 1,
            })
        );
        assert_eq!(created[1], json!({"id": 5}));
        assert_eq!(
            fixture.received_bodies(CODE_BATCH_ENDPOINT).await[0],
            json!({"ids": [6, 7]})
        );
        assert_eq!(
            fixture.received_bodies(CODE_STATUS_ENDPOINT).await[0],
            json!({"id": 8, "status": 0})
        );
    }
}
