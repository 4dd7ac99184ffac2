//! View binding: maps `JobApplication` records to display rows and renders pages.
//!
//! Records never reach a template directly. Each render builds a fresh
//! `ApplicationTable`, so the table body always holds exactly the rows of the
//! latest read.

use askama::Template;

use crate::models::application::JobApplication;

/// Display projection of one record, one string per table column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationRow {
    pub id: String,
    pub company_name: String,
    pub role_applied_for: String,
    pub date_applied: String,
    pub status: String,
    pub last_update: String,
}

impl From<&JobApplication> for ApplicationRow {
    fn from(record: &JobApplication) -> Self {
        Self {
            id: record.id.map(|id| id.to_string()).unwrap_or_default(),
            company_name: record.company_name.clone(),
            role_applied_for: record.role_applied_for.clone(),
            date_applied: record.date_applied.clone(),
            status: record.status.clone(),
            last_update: last_update_label(record.days_since_update),
        }
    }
}

#[cfg(test)]
impl ApplicationRow {
    /// Cells joined with `" | "`, in column order.
    pub fn to_line(&self) -> String {
        [
            self.id.as_str(),
            self.company_name.as_str(),
            self.role_applied_for.as_str(),
            self.date_applied.as_str(),
            self.status.as_str(),
            self.last_update.as_str(),
        ]
        .join(" | ")
    }
}

/// `"3 day(s) ago"`
pub fn last_update_label(days_since_update: i32) -> String {
    format!("{days_since_update} day(s) ago")
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplicationTable {
    pub rows: Vec<ApplicationRow>,
}

impl ApplicationTable {
    /// One row per record, in the order given. No sorting or filtering.
    pub fn from_records(records: &[JobApplication]) -> Self {
        Self {
            rows: records.iter().map(ApplicationRow::from).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// The tracker page: submission form, import form, optional banners, and the table.
/// The form controls always render empty.
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexPage {
    pub table: ApplicationTable,
    pub error: Option<String>,
    pub notice: Option<String>,
}

impl IndexPage {
    pub fn new(table: ApplicationTable) -> Self {
        Self {
            table,
            error: None,
            notice: None,
        }
    }

    pub fn with_error(mut self, message: impl Into<String>) -> Self {
        self.error = Some(message.into());
        self
    }

    pub fn with_notice(mut self, message: impl Into<String>) -> Self {
        self.notice = Some(message.into());
        self
    }
}

/// Prefilled form for editing a single record.
#[derive(Template)]
#[template(path = "edit.html")]
pub struct EditPage {
    pub id: i64,
    pub company_name: String,
    pub role_applied: String,
    pub application_date: String,
    pub last_updated: String,
    pub status: String,
}

impl EditPage {
    pub fn for_record(id: i64, record: &JobApplication) -> Self {
        Self {
            id,
            company_name: record.company_name.clone(),
            role_applied: record.role_applied_for.clone(),
            application_date: record.date_applied.clone(),
            last_updated: record.days_since_update.to_string(),
            status: record.status.clone(),
        }
    }
}
