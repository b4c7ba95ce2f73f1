//! # Data Access Layer
//!
//! [`CustomerApi`] is the mock backend of the dashboard. It stands where a
//! real HTTP API would be and behaves like one from the caller's side: every
//! operation is asynchronous and takes a simulated round trip before it
//! touches the [`RecordStore`].
//!
//! ## Read-Modify-Write
//!
//! Storage has no row-level operations, so each call:
//!
//! 1. waits out the configured latency,
//! 2. reads the full collection (seeding it on first use),
//! 3. changes it in memory,
//! 4. writes the full collection back.
//!
//! Steps 2–4 run under the store lock and never suspend, so one call is atomic.
//! Two calls in flight at once are not isolated from each other beyond that:
//! whichever finishes its delay last writes last, against whatever the first
//! left behind. There is no versioning.
//!
//! ## Generic Over RecordStore
//!
//! `CustomerApi<S: RecordStore>` is generic over the storage backend:
//! - Production: `CustomerApi<FileStore>`
//! - Testing: `CustomerApi<InMemoryStore>`

use crate::error::{DashError, Result};
use crate::model::{Customer, CustomerDraft, CustomerId, CustomerPatch};
use crate::seed::{customer_number, generate_customers, DEFAULT_SEED_COUNT};
use crate::store::RecordStore;
use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tracing::{debug, info};

pub const DEFAULT_LATENCY: Duration = Duration::from_millis(300);

pub struct CustomerApi<S: RecordStore> {
    store: Arc<Mutex<S>>,
    latency: Duration,
    seed_count: usize,
}

impl<S: RecordStore> Clone for CustomerApi<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            latency: self.latency,
            seed_count: self.seed_count,
        }
    }
}

impl<S: RecordStore> CustomerApi<S> {
    pub fn new(store: S) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
            latency: DEFAULT_LATENCY,
            seed_count: DEFAULT_SEED_COUNT,
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn with_seed_count(mut self, count: usize) -> Self {
        self.seed_count = count;
        self
    }

    pub fn latency(&self) -> Duration {
        self.latency
    }

    pub async fn fetch_all(&self) -> Result<Vec<Customer>> {
        self.delay().await;
        let mut store = self.lock();
        let customers = self.load_or_seed(&mut *store)?;
        debug!(count = customers.len(), "fetched customers");
        Ok(customers)
    }

    pub async fn create(&self, draft: CustomerDraft) -> Result<Customer> {
        self.delay().await;
        let mut store = self.lock();
        let mut customers = self.load_or_seed(&mut *store)?;

        let customer = Customer::from_draft(
            CustomerId::generate(),
            customer_number(customers.len()),
            draft,
        );
        customers.push(customer.clone());
        store.write_all(&customers)?;

        info!(id = %customer.id, name = %customer.name, "customer created");
        Ok(customer)
    }

    pub async fn update(&self, id: &CustomerId, patch: CustomerPatch) -> Result<Customer> {
        self.delay().await;
        let mut store = self.lock();
        let mut customers = self.load_or_seed(&mut *store)?;

        let customer = customers
            .iter_mut()
            .find(|c| &c.id == id)
            .ok_or_else(|| DashError::NotFound(id.clone()))?;
        customer.apply(patch);
        let updated = customer.clone();
        store.write_all(&customers)?;

        info!(id = %updated.id, "customer updated");
        Ok(updated)
    }

    /// Removes every listed customer; unknown ids are ignored. Returns how many were removed.
    pub async fn delete_many(&self, ids: &[CustomerId]) -> Result<usize> {
        self.delay().await;
        let mut store = self.lock();
        let mut customers = self.load_or_seed(&mut *store)?;

        let doomed: HashSet<&CustomerId> = ids.iter().collect();
        let before = customers.len();
        customers.retain(|c| !doomed.contains(&c.id));
        let removed = before - customers.len();
        store.write_all(&customers)?;

        info!(requested = ids.len(), removed, "customers deleted");
        Ok(removed)
    }

    async fn delay(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    fn lock(&self) -> MutexGuard<'_, S> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn load_or_seed(&self, store: &mut S) -> Result<Vec<Customer>> {
        match store.read_all()? {
            Some(customers) => Ok(customers),
            None => {
                let seeded = generate_customers(self.seed_count);
                store.write_all(&seeded)?;
                info!(count = seeded.len(), "seeded empty customer store");
                Ok(seeded)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CustomerStatus;
    use crate::store::memory::fixtures::{CountingStore, FailingStore, StoreFixture};
    use crate::store::memory::InMemoryStore;
    use std::sync::atomic::Ordering;
    use tokio::time::Instant;

    fn api(store: InMemoryStore) -> CustomerApi<InMemoryStore> {
        CustomerApi::new(store).with_latency(Duration::ZERO)
    }

    fn draft(name: &str) -> CustomerDraft {
        CustomerDraft {
            name: name.to_string(),
            description: "Consulting".to_string(),
            status: CustomerStatus::Due,
            rate: 120.0,
            balance: -40.5,
            deposit: 250.0,
        }
    }

    #[tokio::test]
    async fn first_fetch_seeds_the_store() {
        let api = api(InMemoryStore::new());
        let customers = api.fetch_all().await.unwrap();
        assert_eq!(customers.len(), DEFAULT_SEED_COUNT);

        // Seed is persisted, so a second read sees the same records.
        assert_eq!(api.fetch_all().await.unwrap(), customers);
    }

    #[tokio::test]
    async fn empty_persisted_collection_is_not_reseeded() {
        let api = api(StoreFixture::new().store);
        assert!(api.fetch_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn create_then_fetch_round_trips() {
        let api = api(StoreFixture::new().with_seed(5).store);
        let created = api.create(draft("Maria Garcia")).await.unwrap();

        assert_eq!(created.customer_id, customer_number(5));
        assert_eq!(created.draft(), draft("Maria Garcia"));

        let customers = api.fetch_all().await.unwrap();
        assert_eq!(customers.len(), 6);
        assert_eq!(customers.last(), Some(&created));
    }

    #[tokio::test]
    async fn created_ids_are_unique() {
        let api = api(StoreFixture::new().store);
        let a = api.create(draft("Ann Culhane")).await.unwrap();
        let b = api.create(draft("Ann Culhane")).await.unwrap();
        assert_ne!(a.id, b.id);
    }

    #[tokio::test]
    async fn update_merges_fields() {
        let api = api(StoreFixture::new().with_seed(3).store);
        let id = CustomerId::from("customer-2");
        let updated = api
            .update(
                &id,
                CustomerPatch {
                    status: Some(CustomerStatus::Paid),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.status, CustomerStatus::Paid);
        assert_eq!(updated.name, "Ahmad Rosser");
        let stored = api.fetch_all().await.unwrap();
        assert_eq!(stored[1], updated);
    }

    #[tokio::test]
    async fn update_of_missing_id_fails_and_changes_nothing() {
        let api = api(StoreFixture::new().with_seed(3).store);
        let before = api.fetch_all().await.unwrap();

        let err = api
            .update(&CustomerId::from("nonexistent-id"), draft("X").into())
            .await
            .unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(api.fetch_all().await.unwrap(), before);
    }

    #[tokio::test]
    async fn delete_many_with_no_ids_is_a_no_op() {
        let api = api(StoreFixture::new().with_seed(4).store);
        let before = api.fetch_all().await.unwrap();
        assert_eq!(api.delete_many(&[]).await.unwrap(), 0);
        assert_eq!(api.fetch_all().await.unwrap(), before);
    }

    #[tokio::test]
    async fn delete_many_ignores_unknown_ids() {
        let api = api(StoreFixture::new().with_seed(4).store);
        let removed = api
            .delete_many(&[CustomerId::from("customer-1"), CustomerId::from("ghost")])
            .await
            .unwrap();
        assert_eq!(removed, 1);

        let ids: Vec<_> = api
            .fetch_all()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.id.to_string())
            .collect();
        assert_eq!(ids, vec!["customer-2", "customer-3", "customer-4"]);
    }

    #[tokio::test]
    async fn storage_failures_propagate() {
        let api = CustomerApi::new(FailingStore).with_latency(Duration::ZERO);
        assert!(matches!(api.fetch_all().await, Err(DashError::Store(_))));
        assert!(api.delete_many(&[]).await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn every_call_waits_out_the_latency() {
        let api = CustomerApi::new(StoreFixture::new().with_seed(1).store)
            .with_latency(Duration::from_millis(300));
        let started = Instant::now();
        api.fetch_all().await.unwrap();
        assert!(started.elapsed() >= api.latency());
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_deletes_each_apply_to_the_latest_snapshot() {
        let api = CustomerApi::new(StoreFixture::new().with_seed(4).store)
            .with_latency(Duration::from_millis(50));

        let first = [CustomerId::from("customer-1")];
        let second = [CustomerId::from("customer-2")];
        let (a, b) = tokio::join!(api.delete_many(&first), api.delete_many(&second));
        assert_eq!(a.unwrap() + b.unwrap(), 2);
        assert_eq!(api.fetch_all().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn each_operation_reads_the_whole_collection() {
        let counting = CountingStore::new(StoreFixture::new().with_seed(2).store);
        let reads = Arc::clone(&counting.reads);
        let api = CustomerApi::new(counting).with_latency(Duration::ZERO);

        api.fetch_all().await.unwrap();
        api.delete_many(&[]).await.unwrap();
        assert_eq!(reads.load(Ordering::SeqCst), 2);
    }
}
