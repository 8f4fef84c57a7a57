//! Listing state for the users table: pagination, sorting, selection.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use leydeudo_core::UserId;

use crate::dto::UserRecord;

pub const DEFAULT_ROWS_PER_PAGE: usize = 5;
pub const DEFAULT_ORDER_BY: &str = "name";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Order {
    #[default]
    Asc,
    Desc,
}

/// UI-independent table bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableState {
    page: usize,
    rows_per_page: usize,
    order: Order,
    order_by: String,
    selected: Vec<String>,
}

impl Default for TableState {
    fn default() -> Self {
        Self::new(DEFAULT_ORDER_BY, DEFAULT_ROWS_PER_PAGE)
    }
}

impl TableState {
    pub fn new(order_by: impl Into<String>, rows_per_page: usize) -> Self {
        Self {
            page: 0,
            rows_per_page: rows_per_page.max(1),
            order: Order::Asc,
            order_by: order_by.into(),
            selected: Vec::new(),
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn rows_per_page(&self) -> usize {
        self.rows_per_page
    }

    pub fn order(&self) -> Order {
        self.order
    }

    pub fn order_by(&self) -> &str {
        &self.order_by
    }

    pub fn selected(&self) -> &[String] {
        &self.selected
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.iter().any(|s| s == id)
    }

    /// Sort by `column`; clicking the current ascending column flips it to
    /// descending, anything else sorts ascending.
    pub fn sort(&mut self, column: &str) {
        let is_asc = self.order_by == column && self.order == Order::Asc;
        self.order = if is_asc { Order::Desc } else { Order::Asc };
        self.order_by = column.to_string();
    }

    /// Toggle one row, keeping selection order.
    pub fn select_row(&mut self, id: &str) {
        if let Some(pos) = self.selected.iter().position(|s| s == id) {
            self.selected.remove(pos);
        } else {
            self.selected.push(id.to_string());
        }
    }

    pub fn select_all<I, S>(&mut self, checked: bool, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selected = if checked {
            ids.into_iter().map(Into::into).collect()
        } else {
            Vec::new()
        };
    }

    pub fn reset_page(&mut self) {
        self.page = 0;
    }

    pub fn change_page(&mut self, page: usize) {
        self.page = page;
    }

    pub fn change_rows_per_page(&mut self, rows_per_page: usize) {
        self.rows_per_page = rows_per_page.max(1);
        self.reset_page();
    }

    fn window(&self, total: usize) -> (usize, usize) {
        let start = self.page.saturating_mul(self.rows_per_page).min(total);
        let end = start.saturating_add(self.rows_per_page).min(total);
        (start, end)
    }

    /// Rows of the current page.
    pub fn page_slice<'a, T>(&self, rows: &'a [T]) -> &'a [T] {
        let (start, end) = self.window(rows.len());
        &rows[start..end]
    }

    /// Filler rows keeping the table height constant on pages after the
    /// first.
    pub fn empty_rows(&self, total: usize) -> usize {
        if self.page == 0 {
            return 0;
        }
        let (start, end) = self.window(total);
        self.rows_per_page - (end - start)
    }

    /// Checkbox state of the header: (checked, indeterminate).
    pub fn header_checkbox(&self, total: usize) -> (bool, bool) {
        let n = self.selected.len();
        (total > 0 && n == total, n > 0 && n < total)
    }
}

/// One line of the users listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserRow {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: String,
    pub status: String,
    pub avatar_url: Option<String>,
}

impl From<&UserRecord> for UserRow {
    fn from(record: &UserRecord) -> Self {
        Self {
            id: record.id,
            name: record.full_name(),
            email: record.email.clone(),
            role: record
                .primary_role()
                .map(|role| role.name.clone())
                .unwrap_or_default(),
            status: record.estado.clone().unwrap_or_default(),
            avatar_url: record.avatar_url.clone(),
        }
    }
}

impl UserRow {
    fn column(&self, name: &str) -> Option<&str> {
        match name {
            "name" => Some(&self.name),
            "email" => Some(&self.email),
            "role" => Some(&self.role),
            "status" => Some(&self.status),
            _ => None,
        }
    }
}

/// Rows for the listing: the signed-in user is excluded, `filter_name`
/// matches names case-insensitively, and rows are sorted by the table's
/// column. Unknown columns keep the backend order.
pub fn user_rows(
    records: &[UserRecord],
    current_user: Option<UserId>,
    filter_name: &str,
    table: &TableState,
) -> Vec<UserRow> {
    let needle = filter_name.trim().to_lowercase();

    let mut rows: Vec<UserRow> = records
        .iter()
        .filter(|record| Some(record.id) != current_user)
        .map(UserRow::from)
        .filter(|row| needle.is_empty() || row.name.to_lowercase().contains(&needle))
        .collect();

    rows.sort_by(|a, b| {
        let ordering = match (a.column(table.order_by()), b.column(table.order_by())) {
            (Some(a), Some(b)) => a.to_lowercase().cmp(&b.to_lowercase()),
            _ => Ordering::Equal,
        };
        match table.order() {
            Order::Asc => ordering,
            Order::Desc => ordering.reverse(),
        }
    });

    rows
}
