//! Pagination and list-filter types
//!
//! Every list operation takes a filter struct plus a [`Page`]. Pages are
//! 1-indexed; the store-level offset is `(page - 1) * limit`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::{Result, SemesterError};

/// 1-indexed pagination window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    page: u32,
    limit: u32,
}

impl Page {
    /// Build a page, rejecting `page < 1` or `limit < 1`
    pub fn new(page: u32, limit: u32) -> Result<Self> {
        if page < 1 {
            return Err(SemesterError::InvalidInput("page must be >= 1".into()));
        }
        if limit < 1 {
            return Err(SemesterError::InvalidInput("limit must be > 0".into()));
        }
        Ok(Self { page, limit })
    }

    /// Zero-indexed row offset
    pub fn offset(self) -> u32 {
        (self.page - 1) * self.limit
    }

    /// Maximum rows in the window
    pub fn limit(self) -> u32 {
        self.limit
    }
}

impl Default for Page {
    fn default() -> Self {
        Self { page: 1, limit: 50 }
    }
}

/// Inclusive date period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Equality filters shared by student and teacher listings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersonFilter {
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Filters for class listings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClassFilter {
    /// Case-insensitive substring match on the class name.
    pub name: Option<String>,
    /// Classes whose start falls on this calendar date.
    pub start_date: Option<NaiveDate>,
    /// Case-insensitive substring match on the description.
    pub description: Option<String>,
}

/// Filters for invoice listings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InvoiceFilter {
    pub payment_status: Option<bool>,
    pub invoice_date: Option<NaiveDate>,
}

/// Filters for work-hour-log listings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkHourFilter {
    pub teacher_id: Option<i64>,
    pub period: Option<DateRange>,
}

/// Filters for paycheck listings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaycheckFilter {
    pub teacher_id: Option<i64>,
    pub paid: Option<bool>,
    /// Paychecks whose period falls entirely inside this range.
    pub period: Option<DateRange>,
}
