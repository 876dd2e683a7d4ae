//! Headless console for the subscription panel backend.
//!
//! [`client::ConsoleClient`] talks to the REST API, [`list::ResourceList`]
//! drives paginated and filtered lists, [`forms`] validate input before it is
//! sent and [`screens`] compose the three into the admin and user views.

pub mod catalog;
pub mod client;
pub mod config;
pub mod forms;
pub mod list;
pub mod screens;
#[cfg(test)]
mod test_utils;

pub use catalog::{PlanCatalog, PlanDirectory};
pub use client::{ClientError, ConsoleClient};
pub use config::ConsoleConfig;
pub use list::{
    fetch_fn, FetchOutcome, ListSnapshot, PageRequest, PageResult, Resource, ResourceFetcher,
    ResourceList,
};
