//! Screen controllers.
//!
//! A screen ties lists, forms and the client together: validate, send the
//! mutation, report a [`Notice`], then refresh or reset the affected list.

use crate::client::ClientError;
use crate::forms::FormError;
use chrono::DateTime;
use std::fmt;
use thiserror::Error;

pub mod announcement;
pub mod redeem;
pub mod redemption;
pub mod register;

pub use announcement::{AnnouncementBoard, AnnouncementKind, AnnouncementTab};
pub use redeem::RedeemWidget;
pub use redemption::{CodeRow, RedemptionRecordsDialog, RedemptionScreen};
pub use register::RegisterSettings;

/// Placeholder for values that are not set
pub const EMPTY_CELL: &str = "--";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Info,
    Error,
}

/// Short outcome message shown to the operator after an action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.level == NoticeLevel::Success
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Errors returned by screen operations
#[derive(Debug, Error)]
pub enum ScreenError {
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error(transparent)]
    Form(#[from] FormError),
}

impl ScreenError {
    /// Error notice for this failure
    pub fn notice(&self) -> Notice {
        match self {
            ScreenError::Client(err) => Notice::error(err.message()),
            ScreenError::Form(err) => Notice::error(err.to_string()),
        }
    }
}

/// Render epoch milliseconds as `YYYY-MM-DD HH:MM:SS` (UTC); 0 renders as a placeholder
pub fn format_timestamp(millis: i64) -> String {
    if millis <= 0 {
        return EMPTY_CELL.to_string();
    }
    DateTime::from_timestamp_millis(millis)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| EMPTY_CELL.to_string())
}
