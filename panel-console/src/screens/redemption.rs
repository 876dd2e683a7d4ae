use super::{Notice, ScreenError};
use crate::catalog::{PlanCatalog, PlanDirectory};
use crate::client::redemption::{
    CodeFilter, CodeStatus, RecordFilter, RedemptionCode, RedemptionRecord,
};
use crate::client::{ClientError, ConsoleClient};
use crate::forms::{FormError, RedemptionCodeForm};
use crate::list::{FetchOutcome, ListSnapshot, PageRequest, ResourceList};
use log::{info, warn};
use std::sync::atomic::{AtomicBool, Ordering};

/// Page size of the redemption record dialog
pub const RECORDS_PAGE_SIZE: u32 = 10;

pub type CodeList = ResourceList<RedemptionCode, CodeFilter, ConsoleClient>;
pub type RecordList = ResourceList<RedemptionRecord, RecordFilter, ConsoleClient>;

/// Display row of the redemption code table
#[derive(Debug, Clone, PartialEq)]
pub struct CodeRow {
    pub id: i64,
    pub code: String,
    pub plan: String,
    pub unit_time: String,
    pub quantity: i64,
    pub total: i64,
    pub remaining: i64,
    pub used: i64,
    pub status: CodeStatus,
    pub selected: bool,
}

impl CodeRow {
    fn new(code: &RedemptionCode, catalog: &PlanCatalog, selected: bool) -> Self {
        Self {
            id: code.id,
            code: code.code.clone(),
            plan: catalog.name(code.subscribe_plan).to_string(),
            unit_time: code.unit_time.label().to_string(),
            quantity: code.quantity,
            total: code.total_count,
            remaining: code.remaining(),
            used: code.used_count,
            status: code.status,
            selected,
        }
    }
}

/// Admin screen listing redemption codes
pub struct RedemptionScreen {
    client: ConsoleClient,
    plans: PlanDirectory,
    list: CodeList,
    records: RedemptionRecordsDialog,
}

impl RedemptionScreen {
    pub fn new(client: ConsoleClient, plans: PlanDirectory, page_size: u32) -> Self {
        let list = ResourceList::new(
            client.clone(),
            PageRequest::clamped(1, page_size),
            CodeFilter::default(),
        );
        let records = RedemptionRecordsDialog::new(client.clone());
        Self {
            client,
            plans,
            list,
            records,
        }
    }

    pub fn list(&self) -> &CodeList {
        &self.list
    }

    pub fn records(&self) -> &RedemptionRecordsDialog {
        &self.records
    }

    /// Fetch the current page
    pub async fn load(&self) -> Result<FetchOutcome, ScreenError> {
        Ok(self.list.refresh().await?)
    }

    pub async fn create(&self, form: RedemptionCodeForm) -> Result<Notice, ScreenError> {
        let catalog = self.plans.catalog().await?;
        let request = form.into_create_request(&catalog)?;
        self.client.create_redemption_code(&request).await?;
        self.refresh_after("create").await;
        Ok(Notice::success("Create Success"))
    }

    pub async fn update(&self, form: RedemptionCodeForm) -> Result<Notice, ScreenError> {
        let catalog = self.plans.catalog().await?;
        let request = form.into_update_request(&catalog)?;
        self.client.update_redemption_code(&request).await?;
        self.refresh_after("update").await;
        Ok(Notice::success("Update Success"))
    }

    pub async fn delete(&self, id: i64) -> Result<Notice, ScreenError> {
        self.client.delete_redemption_code(id).await?;
        self.refresh_after("delete").await;
        Ok(Notice::success("Delete Success"))
    }

    /// Delete every selected row, then go back to the first page
    pub async fn batch_delete(&self) -> Result<Notice, ScreenError> {
        let ids = self.list.selected_ids().await;
        if ids.is_empty() {
            return Err(FormError::NothingSelected.into());
        }
        self.client.batch_delete_redemption_codes(&ids).await?;
        self.list.clear_selection().await;
        if let Err(err) = self.list.reset().await {
            warn!("Failed to reload redemption codes after batch delete: {}", err);
        }
        info!("Batch deleted {} redemption codes", ids.len());
        Ok(Notice::success("Delete Success"))
    }

    pub async fn toggle_status(&self, id: i64, enabled: bool) -> Result<Notice, ScreenError> {
        self.client
            .toggle_redemption_code_status(id, CodeStatus::from(enabled))
            .await?;
        self.refresh_after("status change").await;
        Ok(Notice::success("Update Success"))
    }

    /// Rows of the displayed page. Plan names fall back to `--` when the
    /// catalog cannot be loaded.
    pub async fn rows(&self) -> Vec<CodeRow> {
        let catalog = match self.plans.catalog().await {
            Ok(catalog) => catalog,
            Err(err) => {
                warn!("Subscribe plans unavailable: {}", err);
                PlanCatalog::default()
            }
        };
        let snapshot = self.list.snapshot().await;
        snapshot
            .items
            .iter()
            .map(|code| CodeRow::new(code, &catalog, snapshot.selected.contains(&code.id)))
            .collect()
    }

    async fn refresh_after(&self, action: &str) {
        if let Err(err) = self.list.refresh().await {
            warn!("Failed to reload redemption codes after {}: {}", action, err);
        }
    }
}

/// Redemption history of a single code, fetched only while open
pub struct RedemptionRecordsDialog {
    list: RecordList,
    open: AtomicBool,
}

impl RedemptionRecordsDialog {
    pub fn new(client: ConsoleClient) -> Self {
        Self {
            list: ResourceList::new(
                client,
                PageRequest::clamped(1, RECORDS_PAGE_SIZE),
                RecordFilter::default(),
            ),
            open: AtomicBool::new(false),
        }
    }

    /// Open the dialog for a code and load its first page.
    /// Ids below 1 name no code; the dialog stays closed and nothing is fetched.
    pub async fn open(&self, code_id: i64) -> Result<Option<FetchOutcome>, ClientError> {
        if code_id <= 0 {
            warn!("Not opening redemption records for code id {}", code_id);
            return Ok(None);
        }
        self.open.store(true, Ordering::SeqCst);
        self.list
            .set_filters(RecordFilter {
                code_id: Some(code_id),
            })
            .await
            .map(Some)
    }

    pub fn close(&self) {
        self.open.store(false, Ordering::SeqCst);
    }

    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }

    /// Next page; `None` when closed or already on the last page
    pub async fn next_page(&self) -> Result<Option<FetchOutcome>, ClientError> {
        if !self.is_open() {
            return Ok(None);
        }
        self.list.next_page().await
    }

    /// Previous page; `None` when closed or already on the first page
    pub async fn previous_page(&self) -> Result<Option<FetchOutcome>, ClientError> {
        if !self.is_open() {
            return Ok(None);
        }
        self.list.previous_page().await
    }

    /// Jump to a page; `None` when closed
    pub async fn go_to(&self, page: u32) -> Result<Option<FetchOutcome>, ClientError> {
        if !self.is_open() {
            return Ok(None);
        }
        self.list.set_page(page).await.map(Some)
    }

    pub async fn snapshot(&self) -> ListSnapshot<RedemptionRecord, RecordFilter> {
        self.list.snapshot().await
    }
}
