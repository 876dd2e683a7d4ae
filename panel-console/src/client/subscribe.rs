use super::{ClientError, ConsoleClient, ListPayload};
use crate::list::{PageRequest, PageResult, Resource, ResourceFetcher};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

const SUBSCRIBE_LIST_ENDPOINT: &str = "/v1/admin/subscribe/list";

/// Subscription plan as listed by the backend; only what lookups need
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscribePlan {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sell: Option<bool>,
}

impl Resource for SubscribePlan {
    fn id(&self) -> i64 {
        self.id
    }
}

impl ConsoleClient {
    pub async fn list_subscribe_plans(
        &self,
        page: PageRequest,
    ) -> Result<PageResult<SubscribePlan>, ClientError> {
        let payload: Option<ListPayload<SubscribePlan>> =
            self.get_page(SUBSCRIBE_LIST_ENDPOINT, page, &()).await?;
        Ok(payload.into())
    }
}

#[async_trait]
impl ResourceFetcher<SubscribePlan, ()> for ConsoleClient {
    async fn fetch(
        &self,
        page: PageRequest,
        _filters: (),
    ) -> Result<PageResult<SubscribePlan>, ClientError> {
        self.list_subscribe_plans(page).await
    }
}
