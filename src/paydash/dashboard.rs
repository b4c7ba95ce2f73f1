//! # Dashboard Session
//!
//! [`Dashboard`] is what a front end drives. It owns one [`UiState`] and one
//! [`CustomerQueries`] service and ties them together:
//!
//! - table reads go through the query cache and are turned into a
//!   [`TableView`] for the current state;
//! - the form modal is opened, filled and submitted here, so validation and
//!   the create/update split live in one place;
//! - deletes update the selected set once the data layer confirms them.
//!
//! The session holds no terminal knowledge. The CLI, or any other client,
//! renders the [`TableView`] and [`CustomerForm`] values it gets back and
//! prints the toasts it drains.

use crate::customers::{CustomerList, CustomerQueries};
use crate::error::{DashError, Result};
use crate::form::CustomerForm;
use crate::index::{parse_selectors, resolve_selectors};
use crate::model::{Customer, CustomerId};
use crate::state::{Modal, UiAction, UiState};
use crate::store::RecordStore;
use crate::toast::Toast;
use crate::view::{filter_customers, total_pages, HeaderAction, TableView};
use std::collections::HashSet;
use tracing::{debug, info};

pub struct Dashboard<S: RecordStore> {
    state: UiState,
    queries: CustomerQueries<S>,
}

impl<S> Dashboard<S>
where
    S: RecordStore + Send + 'static,
{
    pub fn new(queries: CustomerQueries<S>, rows_per_page: usize) -> Self {
        Self {
            state: UiState::new(rows_per_page),
            queries,
        }
    }

    pub fn state(&self) -> &UiState {
        &self.state
    }

    pub fn queries(&self) -> &CustomerQueries<S> {
        &self.queries
    }

    pub fn dispatch(&mut self, action: UiAction) {
        debug!(?action, "dispatch");
        self.state.dispatch(action);
    }

    pub async fn customers(&self) -> Result<CustomerList> {
        self.queries.customers().await
    }

    /// Reads the (possibly cached) list and derives what the table shows.
    ///
    /// Selected ids that no longer exist are dropped on the way.
    pub async fn table(&mut self) -> Result<TableView> {
        let customers = self.customers().await?;
        let existing: HashSet<CustomerId> = customers.iter().map(|c| c.id.clone()).collect();
        if self.state.selected.iter().any(|id| !existing.contains(id)) {
            self.dispatch(UiAction::RetainSelection(existing));
        }
        Ok(TableView::build(&customers, &self.state)
            .with_refreshed_at(self.queries.status().updated_at))
    }

    /// Resolves row numbers, ranges and raw ids against the filtered list.
    pub async fn resolve_rows<I: AsRef<str>>(&self, inputs: &[I]) -> Result<Vec<CustomerId>> {
        let selectors = parse_selectors(inputs)?;
        let customers = self.customers().await?;
        resolve_selectors(&customers, &self.state.search_query, &selectors)
    }

    pub async fn toggle_rows<I: AsRef<str>>(&mut self, inputs: &[I]) -> Result<usize> {
        let ids = self.resolve_rows(inputs).await?;
        let count = ids.len();
        for id in ids {
            self.dispatch(UiAction::ToggleSelection(id));
        }
        Ok(count)
    }

    pub async fn toggle_page(&mut self) -> Result<()> {
        let view = self.table().await?;
        self.dispatch(UiAction::SelectAllOnPage(view.page_ids()));
        Ok(())
    }

    pub async fn next_page(&mut self) -> Result<bool> {
        let customers = self.customers().await?;
        let filtered = filter_customers(&customers, &self.state.search_query).len();
        let last = total_pages(filtered, self.state.rows_per_page);
        if self.state.current_page >= last {
            return Ok(false);
        }
        self.dispatch(UiAction::SetCurrentPage(self.state.current_page + 1));
        Ok(true)
    }

    pub fn previous_page(&mut self) -> bool {
        if self.state.current_page <= 1 {
            return false;
        }
        self.dispatch(UiAction::SetCurrentPage(self.state.current_page - 1));
        true
    }

    /// Values the open modal starts from: defaults when adding, the target
    /// record when editing. `None` when no modal is open.
    ///
    /// An edit target that is no longer in the data falls back to defaults.
    pub async fn form_for_modal(&self) -> Result<Option<CustomerForm>> {
        match &self.state.modal {
            Modal::Closed => Ok(None),
            Modal::Adding => Ok(Some(CustomerForm::default())),
            Modal::Editing(id) => {
                let mut customers = self.queries.cached_customers();
                if customers.is_empty() {
                    customers = self.customers().await?;
                }
                let form = customers
                    .iter()
                    .find(|c| &c.id == id)
                    .map(CustomerForm::from_customer)
                    .unwrap_or_default();
                Ok(Some(form))
            }
        }
    }

    /// Validates `form` and sends it to the data layer for the open modal.
    ///
    /// The modal closes only when the data layer confirms. Invalid input never
    /// leaves this function.
    pub async fn submit_form(&mut self, form: &CustomerForm) -> Result<Customer> {
        let modal = self.state.modal.clone();
        if !modal.is_open() {
            return Err(DashError::Api("No customer form is open".to_string()));
        }

        let draft = form.validate().map_err(DashError::Validation)?;
        let saved = match &modal {
            Modal::Editing(id) => self.queries.update_customer(id, draft.into()).await?,
            _ => self.queries.add_customer(draft).await?,
        };

        info!(id = %saved.id, "form submitted");
        self.dispatch(UiAction::CloseModal);
        Ok(saved)
    }

    /// Deletes every selected customer, then clears the selection.
    ///
    /// Returns 0 without touching the data layer when nothing is selected.
    pub async fn delete_selected(&mut self) -> Result<usize> {
        if self.state.selected.is_empty() {
            return Ok(0);
        }
        let ids: Vec<CustomerId> = self.state.selected.iter().cloned().collect();
        let removed = self.queries.delete_customers(&ids).await?;
        self.dispatch(UiAction::ClearSelection);
        Ok(removed)
    }

    /// Deletes the given rows. Only their ids leave the selection.
    pub async fn delete_rows(&mut self, ids: Vec<CustomerId>) -> Result<usize> {
        let removed = self.queries.delete_customers(&ids).await?;
        self.dispatch(UiAction::Deselect(ids));
        Ok(removed)
    }

    /// Runs the header's main button for the current selection and returns
    /// which one it was.
    pub async fn activate_primary(&mut self) -> Result<HeaderAction> {
        let action = HeaderAction::for_state(&self.state);
        match &action {
            HeaderAction::Add => self.dispatch(UiAction::OpenAddModal),
            HeaderAction::Update(id) => self.dispatch(UiAction::OpenEditModal(id.clone())),
            HeaderAction::Delete(_) => {
                self.delete_selected().await?;
            }
        }
        Ok(action)
    }

    pub fn drain_toasts(&self) -> Vec<Toast> {
        self.queries.toasts().drain()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::CustomerApi;
    use crate::form::Field;
    use crate::model::CustomerStatus;
    use crate::store::memory::fixtures::{CountingStore, FailingStore, StoreFixture};
    use crate::store::memory::InMemoryStore;
    use crate::toast::ToastLevel;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    fn dashboard(seed: usize) -> Dashboard<InMemoryStore> {
        let api = CustomerApi::new(StoreFixture::new().with_seed(seed).store)
            .with_latency(Duration::ZERO);
        Dashboard::new(CustomerQueries::new(api), 10)
    }

    fn counted(seed: usize) -> (Dashboard<CountingStore<InMemoryStore>>, Arc<AtomicUsize>) {
        let store = CountingStore::new(StoreFixture::new().with_seed(seed).store);
        let reads = Arc::clone(&store.reads);
        let api = CustomerApi::new(store).with_latency(Duration::ZERO);
        (Dashboard::new(CustomerQueries::new(api), 10), reads)
    }

    fn filled_form() -> CustomerForm {
        CustomerForm {
            name: "Kaiya Vetrovs".into(),
            description: "Retainer".into(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn deleting_the_selection_clears_it() {
        let mut dash = dashboard(5);
        dash.toggle_rows(&["1", "3"]).await.unwrap();
        assert_eq!(dash.state().selected.len(), 2);

        let removed = dash.delete_selected().await.unwrap();
        assert_eq!(removed, 2);
        assert!(dash.state().selected.is_empty());

        let view = dash.table().await.unwrap();
        assert_eq!(view.total_customers, 3);
        assert!(!view
            .rows
            .iter()
            .any(|r| r.customer.id == CustomerId::from("customer-1")));
        assert_eq!(dash.drain_toasts()[0].message, "2 customers deleted");
    }

    #[tokio::test]
    async fn delete_selected_with_nothing_selected_skips_the_data_layer() {
        let (mut dash, reads) = counted(3);
        assert_eq!(dash.delete_selected().await.unwrap(), 0);
        assert_eq!(reads.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn deleting_a_row_only_drops_that_id() {
        let mut dash = dashboard(5);
        dash.toggle_rows(&["1-3"]).await.unwrap();

        dash.delete_rows(vec![CustomerId::from("customer-2")])
            .await
            .unwrap();

        let selected: Vec<_> = dash.state().selected.iter().map(|id| id.to_string()).collect();
        assert_eq!(selected, vec!["customer-1", "customer-3"]);
    }

    #[tokio::test]
    async fn failed_delete_keeps_the_selection() {
        let api = CustomerApi::new(FailingStore).with_latency(Duration::ZERO);
        let mut dash = Dashboard::new(CustomerQueries::new(api), 10);
        dash.dispatch(UiAction::ToggleSelection(CustomerId::from("customer-1")));
        dash.dispatch(UiAction::ToggleSelection(CustomerId::from("customer-2")));

        assert!(dash.delete_selected().await.is_err());
        assert_eq!(dash.state().selected.len(), 2);
        let toasts = dash.drain_toasts();
        assert_eq!(toasts[0].level, ToastLevel::Error);
    }

    #[tokio::test]
    async fn invalid_form_never_reaches_the_data_layer() {
        let (mut dash, reads) = counted(3);
        dash.dispatch(UiAction::OpenAddModal);

        let err = dash.submit_form(&CustomerForm::default()).await.unwrap_err();

        match err {
            DashError::Validation(errors) => {
                assert!(errors.for_field(Field::Name).is_some());
            }
            other => panic!("expected validation error, got {other:?}"),
        }
        assert_eq!(reads.load(Ordering::SeqCst), 0);
        assert_eq!(dash.state().modal, Modal::Adding);
    }

    #[tokio::test]
    async fn adding_closes_the_modal_and_refreshes_the_table() {
        let mut dash = dashboard(3);
        dash.table().await.unwrap();
        dash.dispatch(UiAction::OpenAddModal);

        let created = dash.submit_form(&filled_form()).await.unwrap();

        assert_eq!(dash.state().modal, Modal::Closed);
        let view = dash.table().await.unwrap();
        assert_eq!(view.total_customers, 4);
        assert_eq!(view.rows.last().map(|r| &r.customer.id), Some(&created.id));
    }

    #[tokio::test]
    async fn editing_prefills_and_updates_the_target() {
        let mut dash = dashboard(3);
        let id = CustomerId::from("customer-2");
        dash.dispatch(UiAction::OpenEditModal(id.clone()));

        let form = dash.form_for_modal().await.unwrap().unwrap();
        assert_eq!(form.name, "Ahmad Rosser");

        let form = CustomerForm {
            status: CustomerStatus::Due,
            ..form
        };
        let saved = dash.submit_form(&form).await.unwrap();
        assert_eq!(saved.id, id);
        assert_eq!(saved.status, CustomerStatus::Due);
        assert_eq!(dash.drain_toasts()[0].message, "Customer updated successfully");
    }

    #[tokio::test]
    async fn missing_edit_target_falls_back_to_defaults() {
        let mut dash = dashboard(3);
        dash.dispatch(UiAction::OpenEditModal(CustomerId::from("ghost")));
        let form = dash.form_for_modal().await.unwrap().unwrap();
        assert_eq!(form, CustomerForm::default());
    }

    #[tokio::test]
    async fn failed_update_keeps_the_modal_open() {
        let mut dash = dashboard(3);
        let ghost = CustomerId::from("ghost");
        dash.dispatch(UiAction::OpenEditModal(ghost.clone()));

        let err = dash.submit_form(&filled_form()).await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(dash.state().modal, Modal::Editing(ghost));
        assert_eq!(dash.drain_toasts()[0].message, "Failed to update customer");
    }

    #[tokio::test]
    async fn submitting_without_a_modal_is_an_error() {
        let mut dash = dashboard(1);
        assert!(dash.submit_form(&filled_form()).await.is_err());
    }

    #[tokio::test]
    async fn primary_action_follows_the_selection() {
        let mut dash = dashboard(5);
        assert_eq!(dash.activate_primary().await.unwrap(), HeaderAction::Add);
        assert_eq!(dash.state().modal, Modal::Adding);
        dash.dispatch(UiAction::CloseModal);

        dash.toggle_rows(&["2"]).await.unwrap();
        let id = CustomerId::from("customer-2");
        assert_eq!(
            dash.activate_primary().await.unwrap(),
            HeaderAction::Update(id.clone())
        );
        assert_eq!(dash.state().modal, Modal::Editing(id));
        dash.dispatch(UiAction::CloseModal);

        dash.toggle_rows(&["4"]).await.unwrap();
        assert_eq!(dash.activate_primary().await.unwrap(), HeaderAction::Delete(2));
        assert!(dash.state().selected.is_empty());
        assert_eq!(dash.customers().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn paging_stops_at_both_ends() {
        let mut dash = dashboard(25);
        assert!(!dash.previous_page());
        assert!(dash.next_page().await.unwrap());
        assert!(dash.next_page().await.unwrap());
        assert!(!dash.next_page().await.unwrap());
        assert_eq!(dash.state().current_page, 3);
        assert_eq!(dash.table().await.unwrap().rows.len(), 5);
    }

    #[tokio::test]
    async fn toggle_page_selects_only_the_visible_rows() {
        let mut dash = dashboard(25);
        dash.toggle_page().await.unwrap();
        assert_eq!(dash.state().selected.len(), 10);

        let view = dash.table().await.unwrap();
        assert!(view.all_on_page_selected);

        dash.toggle_page().await.unwrap();
        assert!(dash.state().selected.is_empty());
    }

    #[tokio::test]
    async fn table_drops_selected_ids_deleted_elsewhere() {
        let mut dash = dashboard(3);
        dash.toggle_rows(&["customer-1", "customer-2"]).await.unwrap();

        // Another client of the same store removes one of them.
        dash.queries()
            .delete_customers(&[CustomerId::from("customer-1")])
            .await
            .unwrap();

        let view = dash.table().await.unwrap();
        assert_eq!(view.selected_count, 1);
        assert!(view.refreshed_at.is_some());
        assert!(dash.state().is_selected(&CustomerId::from("customer-2")));
    }
}
