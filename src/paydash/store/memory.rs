use super::RecordStore;
use crate::error::Result;
use crate::model::Customer;

/// In-memory storage for testing and development.
/// Does NOT persist data.
#[derive(Default)]
pub struct InMemoryStore {
    customers: Option<Vec<Customer>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_customers(customers: Vec<Customer>) -> Self {
        Self {
            customers: Some(customers),
        }
    }
}

impl RecordStore for InMemoryStore {
    fn read_all(&self) -> Result<Option<Vec<Customer>>> {
        Ok(self.customers.clone())
    }

    fn write_all(&mut self, customers: &[Customer]) -> Result<()> {
        self.customers = Some(customers.to_vec());
        Ok(())
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use crate::error::DashError;
    use crate::model::{CustomerId, CustomerStatus};
    use crate::seed::generate_customers;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    pub struct StoreFixture {
        pub store: InMemoryStore,
    }

    impl Default for StoreFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl StoreFixture {
        pub fn new() -> Self {
            Self {
                store: InMemoryStore::with_customers(Vec::new()),
            }
        }

        pub fn with_seed(mut self, count: usize) -> Self {
            self.store.customers = Some(generate_customers(count));
            self
        }

        pub fn with_customer(mut self, id: &str, name: &str, status: CustomerStatus) -> Self {
            let customers = self.store.customers.get_or_insert_with(Vec::new);
            customers.push(Customer {
                id: CustomerId::from(id),
                customer_id: crate::seed::customer_number(customers.len()),
                name: name.to_string(),
                description: format!("Account for {}", name),
                status,
                rate: 70.0,
                balance: 0.0,
                deposit: 500.0,
            });
            self
        }
    }

    /// Wraps a store and counts how often the collection is read.
    pub struct CountingStore<S> {
        pub inner: S,
        pub reads: Arc<AtomicUsize>,
    }

    impl<S: RecordStore> CountingStore<S> {
        pub fn new(inner: S) -> Self {
            Self {
                inner,
                reads: Arc::new(AtomicUsize::new(0)),
            }
        }
    }

    impl<S: RecordStore> RecordStore for CountingStore<S> {
        fn read_all(&self) -> Result<Option<Vec<Customer>>> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            self.inner.read_all()
        }

        fn write_all(&mut self, customers: &[Customer]) -> Result<()> {
            self.inner.write_all(customers)
        }
    }

    /// A store whose every access fails, for exercising failure toasts.
    #[derive(Default)]
    pub struct FailingStore;

    impl RecordStore for FailingStore {
        fn read_all(&self) -> Result<Option<Vec<Customer>>> {
            Err(DashError::Store("storage unavailable".to_string()))
        }

        fn write_all(&mut self, _customers: &[Customer]) -> Result<()> {
            Err(DashError::Store("storage unavailable".to_string()))
        }
    }
}
