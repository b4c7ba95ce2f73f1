//! # UI State
//!
//! Everything the dashboard remembers between user actions in one session:
//! the selected set, the search query, pagination and the form modal.
//!
//! State changes only through [`reduce`], a pure function from the current
//! state and a [`UiAction`] to the next state. The `UiState` methods are
//! shorthands that dispatch a single action. The session owns its `UiState`
//! value and hands it to whatever renders it; there is no global instance.
//!
//! The selected set stores identifiers only. It does not care what the search
//! query or current page show: a selected row hidden by a search stays
//! selected until it is explicitly deselected, cleared, or deleted.

use crate::model::CustomerId;
use std::collections::{BTreeSet, HashSet};

pub const DEFAULT_ROWS_PER_PAGE: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Modal {
    #[default]
    Closed,
    Adding,
    Editing(CustomerId),
}

impl Modal {
    pub fn is_open(&self) -> bool {
        !matches!(self, Modal::Closed)
    }

    pub fn editing_id(&self) -> Option<&CustomerId> {
        match self {
            Modal::Editing(id) => Some(id),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiAction {
    ToggleSelection(CustomerId),
    SelectAllOnPage(Vec<CustomerId>),
    Deselect(Vec<CustomerId>),
    /// Keeps only selected ids that still exist.
    RetainSelection(HashSet<CustomerId>),
    ClearSelection,
    SetSearchQuery(String),
    OpenAddModal,
    OpenEditModal(CustomerId),
    CloseModal,
    SetRowsPerPage(usize),
    SetCurrentPage(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiState {
    pub selected: BTreeSet<CustomerId>,
    pub search_query: String,
    pub current_page: usize,
    pub rows_per_page: usize,
    pub modal: Modal,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            selected: BTreeSet::new(),
            search_query: String::new(),
            current_page: 1,
            rows_per_page: DEFAULT_ROWS_PER_PAGE,
            modal: Modal::Closed,
        }
    }
}

pub fn reduce(mut state: UiState, action: UiAction) -> UiState {
    match action {
        UiAction::ToggleSelection(id) => {
            if !state.selected.remove(&id) {
                state.selected.insert(id);
            }
        }
        UiAction::SelectAllOnPage(ids) => {
            let all_selected = ids.iter().all(|id| state.selected.contains(id));
            if all_selected {
                for id in &ids {
                    state.selected.remove(id);
                }
            } else {
                state.selected.extend(ids);
            }
        }
        UiAction::Deselect(ids) => {
            for id in &ids {
                state.selected.remove(id);
            }
        }
        UiAction::RetainSelection(existing) => {
            state.selected.retain(|id| existing.contains(id));
        }
        UiAction::ClearSelection => state.selected.clear(),
        UiAction::SetSearchQuery(query) => {
            state.search_query = query;
            state.current_page = 1;
        }
        UiAction::OpenAddModal => state.modal = Modal::Adding,
        UiAction::OpenEditModal(id) => state.modal = Modal::Editing(id),
        UiAction::CloseModal => state.modal = Modal::Closed,
        UiAction::SetRowsPerPage(rows) => {
            state.rows_per_page = rows.max(1);
            state.current_page = 1;
        }
        UiAction::SetCurrentPage(page) => state.current_page = page.max(1),
    }
    state
}

impl UiState {
    pub fn new(rows_per_page: usize) -> Self {
        Self {
            rows_per_page: rows_per_page.max(1),
            ..Self::default()
        }
    }

    pub fn dispatch(&mut self, action: UiAction) {
        *self = reduce(std::mem::take(self), action);
    }

    pub fn is_selected(&self, id: &CustomerId) -> bool {
        self.selected.contains(id)
    }

    pub fn toggle_selection(&mut self, id: CustomerId) {
        self.dispatch(UiAction::ToggleSelection(id));
    }

    pub fn select_all_on_page(&mut self, ids: Vec<CustomerId>) {
        self.dispatch(UiAction::SelectAllOnPage(ids));
    }

    pub fn deselect(&mut self, ids: Vec<CustomerId>) {
        self.dispatch(UiAction::Deselect(ids));
    }

    pub fn retain_selection(&mut self, existing: HashSet<CustomerId>) {
        self.dispatch(UiAction::RetainSelection(existing));
    }

    pub fn clear_selection(&mut self) {
        self.dispatch(UiAction::ClearSelection);
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.dispatch(UiAction::SetSearchQuery(query.into()));
    }

    pub fn open_add_modal(&mut self) {
        self.dispatch(UiAction::OpenAddModal);
    }

    pub fn open_edit_modal(&mut self, id: CustomerId) {
        self.dispatch(UiAction::OpenEditModal(id));
    }

    pub fn close_modal(&mut self) {
        self.dispatch(UiAction::CloseModal);
    }

    pub fn set_rows_per_page(&mut self, rows: usize) {
        self.dispatch(UiAction::SetRowsPerPage(rows));
    }

    pub fn set_current_page(&mut self, page: usize) {
        self.dispatch(UiAction::SetCurrentPage(page));
    }
}
