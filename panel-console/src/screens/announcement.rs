use crate::client::announcement::{Announcement, AnnouncementFilter};
use crate::client::{ClientError, ConsoleClient};
use crate::list::{FetchOutcome, PageRequest, ResourceList};
use log::debug;
use std::fmt;
use std::str::FromStr;

/// Page used by the dashboard widgets
const LATEST_PAGE_SIZE: u32 = 10;

pub type AnnouncementList = ResourceList<Announcement, AnnouncementFilter, ConsoleClient>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnnouncementTab {
    All,
    Pinned,
    Popup,
}

impl AnnouncementTab {
    pub const ALL: [AnnouncementTab; 3] = [
        AnnouncementTab::All,
        AnnouncementTab::Pinned,
        AnnouncementTab::Popup,
    ];

    /// Fixed filter of the tab
    pub fn filter(&self) -> AnnouncementFilter {
        match self {
            AnnouncementTab::All => AnnouncementFilter::default(),
            AnnouncementTab::Pinned => AnnouncementFilter {
                pinned: Some(true),
                popup: None,
            },
            AnnouncementTab::Popup => AnnouncementFilter {
                pinned: None,
                popup: Some(true),
            },
        }
    }
}

impl fmt::Display for AnnouncementTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnnouncementTab::All => f.write_str("all"),
            AnnouncementTab::Pinned => f.write_str("pinned"),
            AnnouncementTab::Popup => f.write_str("popup"),
        }
    }
}

impl FromStr for AnnouncementTab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(AnnouncementTab::All),
            "pinned" => Ok(AnnouncementTab::Pinned),
            "popup" => Ok(AnnouncementTab::Popup),
            other => Err(format!("unknown announcement tab `{}`", other)),
        }
    }
}

/// Dashboard widget flavour for [`AnnouncementBoard::latest`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnouncementKind {
    Pinned,
    Popup,
}

/// User-facing announcement list with one independent list per tab
pub struct AnnouncementBoard {
    client: ConsoleClient,
    all: AnnouncementList,
    pinned: AnnouncementList,
    popup: AnnouncementList,
}

impl AnnouncementBoard {
    pub fn new(client: ConsoleClient, page_size: u32) -> Self {
        let initial = PageRequest::clamped(1, page_size);
        let list = |tab: AnnouncementTab| ResourceList::new(client.clone(), initial, tab.filter());
        Self {
            all: list(AnnouncementTab::All),
            pinned: list(AnnouncementTab::Pinned),
            popup: list(AnnouncementTab::Popup),
            client,
        }
    }

    pub fn tab(&self, tab: AnnouncementTab) -> &AnnouncementList {
        match tab {
            AnnouncementTab::All => &self.all,
            AnnouncementTab::Pinned => &self.pinned,
            AnnouncementTab::Popup => &self.popup,
        }
    }

    /// Fetch the current page of a tab
    pub async fn load(&self, tab: AnnouncementTab) -> Result<FetchOutcome, ClientError> {
        debug!("Loading announcements tab {}", tab);
        self.tab(tab).refresh().await
    }

    /// Newest pinned or popup announcement, if any
    pub async fn latest(&self, kind: AnnouncementKind) -> Result<Option<Announcement>, ClientError> {
        let filters = AnnouncementFilter {
            pinned: Some(kind == AnnouncementKind::Pinned),
            popup: Some(kind == AnnouncementKind::Popup),
        };
        let page = self
            .client
            .list_announcements(PageRequest::clamped(1, LATEST_PAGE_SIZE), &filters)
            .await?;
        Ok(page.list.into_iter().next())
    }
}
