use super::{ClientError, ConsoleClient};
use crate::list::{PageRequest, PageResult, Resource, ResourceFetcher};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

const ANNOUNCEMENT_ENDPOINT: &str = "/v1/user/announcement";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Announcement {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    /// Markdown body
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub show: bool,
    #[serde(default)]
    pub pinned: bool,
    #[serde(default)]
    pub popup: bool,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
}

impl Resource for Announcement {
    fn id(&self) -> i64 {
        self.id
    }
}

/// Filters of the announcement list; `None` leaves the flag unconstrained
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AnnouncementFilter {
    pub pinned: Option<bool>,
    pub popup: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct AnnouncementPayload {
    #[serde(default)]
    announcements: Vec<Announcement>,
    #[serde(default)]
    total: u64,
}

impl ConsoleClient {
    pub async fn list_announcements(
        &self,
        page: PageRequest,
        filters: &AnnouncementFilter,
    ) -> Result<PageResult<Announcement>, ClientError> {
        let payload: Option<AnnouncementPayload> =
            self.get_page(ANNOUNCEMENT_ENDPOINT, page, filters).await?;
        Ok(payload
            .map(|p| PageResult::new(p.announcements, p.total))
            .unwrap_or_default())
    }
}

#[async_trait]
impl ResourceFetcher<Announcement, AnnouncementFilter> for ConsoleClient {
    async fn fetch(
        &self,
        page: PageRequest,
        filters: AnnouncementFilter,
    ) -> Result<PageResult<Announcement>, ClientError> {
        self.list_announcements(page, &filters).await
    }
}
