//! Shared subscribe-plan lookup.
//!
//! Forms and screens only ever read plans, so one loaded [`PlanCatalog`] is
//! shared by everyone through [`PlanDirectory`] until its TTL runs out.

use crate::client::subscribe::SubscribePlan;
use crate::client::{ClientError, ConsoleClient};
use crate::config::CatalogConfig;
use crate::list::PageRequest;
use log::{debug, info};
use moka::future::Cache as MokaCache;
use std::sync::Arc;
use std::time::Duration;

const CATALOG_KEY: &str = "subscribe_plans";

/// Placeholder shown for plans missing from the catalog
pub const UNKNOWN_PLAN: &str = "--";

/// Read-only plan table. Cloning shares the underlying data.
#[derive(Debug, Clone, Default)]
pub struct PlanCatalog {
    plans: Arc<Vec<SubscribePlan>>,
}

impl PlanCatalog {
    pub fn new(plans: Vec<SubscribePlan>) -> Self {
        Self {
            plans: Arc::new(plans),
        }
    }

    pub fn get(&self, id: i64) -> Option<&SubscribePlan> {
        self.plans.iter().find(|plan| plan.id == id)
    }

    /// Plan name, or [`UNKNOWN_PLAN`] when the id is not in the catalog
    pub fn name(&self, id: i64) -> &str {
        self.get(id)
            .map(|plan| plan.name.as_str())
            .filter(|name| !name.is_empty())
            .unwrap_or(UNKNOWN_PLAN)
    }

    pub fn contains(&self, id: i64) -> bool {
        self.get(id).is_some()
    }

    /// `(id, name)` pairs in backend order, for pickers
    pub fn options(&self) -> Vec<(i64, String)> {
        self.plans
            .iter()
            .map(|plan| (plan.id, plan.name.clone()))
            .collect()
    }

    pub fn plans(&self) -> &[SubscribePlan] {
        &self.plans
    }

    pub fn len(&self) -> usize {
        self.plans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plans.is_empty()
    }
}

/// Loads the plan catalog through the client and keeps it for `ttl` seconds
#[derive(Clone)]
pub struct PlanDirectory {
    client: ConsoleClient,
    cache: MokaCache<String, PlanCatalog>,
    page_size: u32,
}

impl PlanDirectory {
    pub fn new(client: ConsoleClient, config: &CatalogConfig) -> Self {
        let cache = MokaCache::builder()
            .time_to_live(Duration::from_secs(config.ttl))
            .max_capacity(1)
            .build();

        Self {
            client,
            cache,
            page_size: config.page_size.max(1),
        }
    }

    /// Cached catalog, loading it on a miss
    pub async fn catalog(&self) -> Result<PlanCatalog, ClientError> {
        if let Some(catalog) = self.cache.get(CATALOG_KEY).await {
            debug!("Cache hit for key: {}", CATALOG_KEY);
            return Ok(catalog);
        }
        debug!("Cache miss for key: {}", CATALOG_KEY);

        let catalog = self.load().await?;
        self.cache
            .insert(CATALOG_KEY.to_string(), catalog.clone())
            .await;
        Ok(catalog)
    }

    /// Drop the cached catalog so the next lookup reloads it
    pub async fn invalidate(&self) {
        self.cache.invalidate(CATALOG_KEY).await;
    }

    async fn load(&self) -> Result<PlanCatalog, ClientError> {
        let mut plans = Vec::new();
        let mut page = PageRequest::clamped(1, self.page_size);
        loop {
            let result = self.client.list_subscribe_plans(page).await?;
            let received = result.list.len();
            plans.extend(result.list);
            if received < page.size() as usize || plans.len() as u64 >= result.total {
                break;
            }
            page = page.at(page.page() + 1);
        }
        info!("Loaded {} subscribe plans", plans.len());
        Ok(PlanCatalog::new(plans))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{envelope, TestFixture};
    use reqwest::{Method, StatusCode};
    use serde_json::json;
    use wiremock::matchers;
    use wiremock::{Mock, ResponseTemplate};

    const SUBSCRIBE_LIST: &str = "/v1/admin/subscribe/list";

    fn plan(id: i64, name: &str) -> SubscribePlan {
        SubscribePlan {
            id,
            name: name.to_string(),
            show: None,
            sell: None,
        }
    }

    #[test]
    fn test_catalog_lookup() {
        let catalog = PlanCatalog::new(vec![plan(1, "Basic"), plan(2, "")]);
        assert_eq!(catalog.name(1), "Basic");
        assert_eq!(catalog.name(2), UNKNOWN_PLAN);
        assert_eq!(catalog.name(9), UNKNOWN_PLAN);
        assert!(catalog.contains(2));
        assert!(!catalog.contains(9));
        assert_eq!(
            catalog.options(),
            vec![(1, "Basic".to_string()), (2, String::new())]
        );
    }

    #[tokio::test]
    async fn test_catalog_is_cached() {
        let fixture = TestFixture::new().await;
        fixture
            .add_api_mock(
                Method::GET,
                SUBSCRIBE_LIST,
                envelope(json!({"list": [{"id": 1, "name": "Basic"}], "total": 1})),
                StatusCode::OK,
                1,
            )
            .await;

        let directory = PlanDirectory::new(fixture.client.clone(), &fixture.config.catalog);
        let first = directory.catalog().await.expect("Failed to load catalog");
        let second = directory.catalog().await.expect("Failed to load catalog");
        assert_eq!(first.len(), 1);
        assert_eq!(second.name(1), "Basic");
    }

    #[tokio::test]
    async fn test_invalidate_reloads() {
        let fixture = TestFixture::new().await;
        fixture
            .add_api_mock(
                Method::GET,
                SUBSCRIBE_LIST,
                envelope(json!({"list": [{"id": 1, "name": "Basic"}], "total": 1})),
                StatusCode::OK,
                2,
            )
            .await;

        let directory = PlanDirectory::new(fixture.client.clone(), &fixture.config.catalog);
        directory.catalog().await.expect("Failed to load catalog");
        directory.invalidate().await;
        directory.catalog().await.expect("Failed to reload catalog");
    }

    #[tokio::test]
    async fn test_catalog_walks_all_pages() {
        let fixture = TestFixture::new().await;
        Mock::given(matchers::method("GET"))
            .and(matchers::path(SUBSCRIBE_LIST))
            .and(matchers::query_param("page", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
                "list": [{"id": 1, "name": "Basic"}, {"id": 2, "name": "Pro"}],
                "total": 3,
            }))))
            .expect(1)
            .mount(&fixture.api_mock)
            .await;
        Mock::given(matchers::method("GET"))
            .and(matchers::path(SUBSCRIBE_LIST))
            .and(matchers::query_param("page", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
                "list": [{"id": 3, "name": "Family"}],
                "total": 3,
            }))))
            .expect(1)
            .mount(&fixture.api_mock)
            .await;

        let mut config = fixture.config.catalog.clone();
        config.page_size = 2;
        let directory = PlanDirectory::new(fixture.client.clone(), &config);
        let catalog = directory.catalog().await.expect("Failed to load catalog");
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.name(3), "Family");
    }
}
