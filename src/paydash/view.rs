//! # Derived Table View
//!
//! Stateless functions that turn the full customer list plus [`UiState`] into
//! what the table shows. Nothing here is stored; the view is recomputed after
//! every action from the latest cached list.
//!
//! Filtering and pagination are always done in memory over the complete
//! collection:
//!
//! - a record matches when the lowercased query is a substring of its name,
//!   secondary id, description or status (an empty query matches everything);
//! - the page is `filtered[(page - 1) * rows .. page * rows]`, clipped to the
//!   list, and empty past the last page.

use crate::model::{Customer, CustomerId};
use crate::state::UiState;
use chrono::{DateTime, Utc};

pub fn matches_query(customer: &Customer, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let query = query.to_lowercase();
    customer.name.to_lowercase().contains(&query)
        || customer.customer_id.to_lowercase().contains(&query)
        || customer.description.to_lowercase().contains(&query)
        || customer.status.as_str().to_lowercase().contains(&query)
}

pub fn filter_customers<'a>(customers: &'a [Customer], query: &str) -> Vec<&'a Customer> {
    customers
        .iter()
        .filter(|c| matches_query(c, query))
        .collect()
}

pub fn page_bounds(len: usize, page: usize, rows_per_page: usize) -> (usize, usize) {
    let start = page.saturating_sub(1).saturating_mul(rows_per_page).min(len);
    let end = start.saturating_add(rows_per_page).min(len);
    (start, end)
}

pub fn paginate<T>(items: &[T], page: usize, rows_per_page: usize) -> &[T] {
    let (start, end) = page_bounds(items.len(), page, rows_per_page);
    &items[start..end]
}

pub fn total_pages(total_items: usize, rows_per_page: usize) -> usize {
    total_items.div_ceil(rows_per_page.max(1)).max(1)
}

/// Every id on the page is selected. An empty page never counts as selected.
pub fn all_on_page_selected(page_ids: &[CustomerId], state: &UiState) -> bool {
    !page_ids.is_empty() && page_ids.iter().all(|id| state.is_selected(id))
}

pub fn some_on_page_selected(page_ids: &[CustomerId], state: &UiState) -> bool {
    page_ids.iter().any(|id| state.is_selected(id))
}

/// What the header's main button does for the current selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderAction {
    Add,
    Update(CustomerId),
    Delete(usize),
}

impl HeaderAction {
    pub fn for_state(state: &UiState) -> Self {
        let mut selected = state.selected.iter();
        match (state.selected.len(), selected.next()) {
            (1, Some(id)) => HeaderAction::Update(id.clone()),
            (0, _) => HeaderAction::Add,
            (n, _) => HeaderAction::Delete(n),
        }
    }

    pub fn label(&self) -> String {
        match self {
            HeaderAction::Add => "Add customer".to_string(),
            HeaderAction::Update(_) => "Update Customer".to_string(),
            HeaderAction::Delete(n) => format!("Delete ({})", n),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    /// 1-based position in the filtered list.
    pub number: usize,
    pub selected: bool,
    pub customer: Customer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageInfo {
    pub current_page: usize,
    pub total_pages: usize,
    pub rows_per_page: usize,
    pub total_items: usize,
    /// 1-based number of the first row shown, 0 when the page is empty.
    pub first_item: usize,
    pub last_item: usize,
}

impl PageInfo {
    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableView {
    pub rows: Vec<TableRow>,
    pub total_customers: usize,
    pub page: PageInfo,
    pub selected_count: usize,
    pub all_on_page_selected: bool,
    pub some_on_page_selected: bool,
    pub header_action: HeaderAction,
    pub search_query: String,
    /// When the list behind the view was last loaded from the store.
    pub refreshed_at: Option<DateTime<Utc>>,
}

impl TableView {
    pub fn build(customers: &[Customer], state: &UiState) -> Self {
        let filtered = filter_customers(customers, &state.search_query);
        let (start, end) = page_bounds(filtered.len(), state.current_page, state.rows_per_page);

        let rows: Vec<TableRow> = paginate(&filtered, state.current_page, state.rows_per_page)
            .iter()
            .enumerate()
            .map(|(i, customer)| TableRow {
                number: start + i + 1,
                selected: state.is_selected(&customer.id),
                customer: (*customer).clone(),
            })
            .collect();
        let page_ids = ids_of(&rows);

        let page = PageInfo {
            current_page: state.current_page,
            total_pages: total_pages(filtered.len(), state.rows_per_page),
            rows_per_page: state.rows_per_page,
            total_items: filtered.len(),
            first_item: if rows.is_empty() { 0 } else { start + 1 },
            last_item: end,
        };

        Self {
            all_on_page_selected: all_on_page_selected(&page_ids, state),
            some_on_page_selected: some_on_page_selected(&page_ids, state),
            rows,
            total_customers: customers.len(),
            page,
            selected_count: state.selected.len(),
            header_action: HeaderAction::for_state(state),
            search_query: state.search_query.clone(),
            refreshed_at: None,
        }
    }

    pub fn with_refreshed_at(mut self, at: Option<DateTime<Utc>>) -> Self {
        self.refreshed_at = at;
        self
    }

    pub fn page_ids(&self) -> Vec<CustomerId> {
        ids_of(&self.rows)
    }
}

fn ids_of(rows: &[TableRow]) -> Vec<CustomerId> {
    rows.iter().map(|r| r.customer.id.clone()).collect()
}
