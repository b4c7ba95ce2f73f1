//! # Customer Queries and Mutations
//!
//! Binds the data access layer to the query cache. Reads go through
//! [`QueryClient::fetch`] under [`CUSTOMERS_KEY`]; every mutation, once it has
//! succeeded, invalidates that key so the next read goes back to the store.
//!
//! ```text
//!   add/update/delete ──▶ CustomerApi ──ok──▶ invalidate("customers") ──▶ toast
//!                                     └─err─▶ toast, error returned, cache untouched
//! ```
//!
//! Nothing is applied to the cached list ahead of confirmation, so a failed
//! mutation needs no rollback.

use crate::api::CustomerApi;
use crate::error::Result;
use crate::model::{Customer, CustomerDraft, CustomerId, CustomerPatch};
use crate::query::{QueryClient, QueryStatus, CUSTOMERS_KEY};
use crate::store::RecordStore;
use crate::toast::{Toast, Toaster};
use std::sync::Arc;
use tracing::warn;

pub type CustomerList = Arc<Vec<Customer>>;

pub struct CustomerQueries<S: RecordStore> {
    api: CustomerApi<S>,
    client: QueryClient<CustomerList>,
    toasts: Toaster,
}

impl<S: RecordStore> Clone for CustomerQueries<S> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            client: self.client.clone(),
            toasts: self.toasts.clone(),
        }
    }
}

impl<S> CustomerQueries<S>
where
    S: RecordStore + Send + 'static,
{
    pub fn new(api: CustomerApi<S>) -> Self {
        Self {
            api,
            client: QueryClient::new(),
            toasts: Toaster::new(),
        }
    }

    pub fn toasts(&self) -> &Toaster {
        &self.toasts
    }

    pub async fn customers(&self) -> Result<CustomerList> {
        let api = self.api.clone();
        self.client
            .fetch(CUSTOMERS_KEY, move || async move {
                api.fetch_all().await.map(Arc::new)
            })
            .await
    }

    /// Last list the cache saw, even if stale. Empty before the first load.
    pub fn cached_customers(&self) -> CustomerList {
        self.client.peek(CUSTOMERS_KEY).unwrap_or_default()
    }

    pub fn status(&self) -> QueryStatus {
        self.client.status(CUSTOMERS_KEY)
    }

    pub async fn add_customer(&self, draft: CustomerDraft) -> Result<Customer> {
        match self.api.create(draft).await {
            Ok(customer) => {
                self.client.invalidate(CUSTOMERS_KEY);
                self.toasts.push(Toast::success("Customer added successfully"));
                Ok(customer)
            }
            Err(e) => {
                warn!(error = %e, "add customer failed");
                self.toasts.push(Toast::error("Failed to add customer"));
                Err(e)
            }
        }
    }

    pub async fn update_customer(&self, id: &CustomerId, patch: CustomerPatch) -> Result<Customer> {
        match self.api.update(id, patch).await {
            Ok(customer) => {
                self.client.invalidate(CUSTOMERS_KEY);
                self.toasts
                    .push(Toast::success("Customer updated successfully"));
                Ok(customer)
            }
            Err(e) => {
                warn!(%id, error = %e, "update customer failed");
                self.toasts.push(Toast::error("Failed to update customer"));
                Err(e)
            }
        }
    }

    pub async fn delete_customers(&self, ids: &[CustomerId]) -> Result<usize> {
        match self.api.delete_many(ids).await {
            Ok(removed) => {
                self.client.invalidate(CUSTOMERS_KEY);
                let noun = if removed == 1 { "customer" } else { "customers" };
                self.toasts
                    .push(Toast::success(format!("{} {} deleted", removed, noun)));
                Ok(removed)
            }
            Err(e) => {
                warn!(count = ids.len(), error = %e, "delete customers failed");
                self.toasts.push(Toast::error("Failed to delete customers"));
                Err(e)
            }
        }
    }
}
