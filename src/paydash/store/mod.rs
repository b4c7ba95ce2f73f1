//! # Storage Layer
//!
//! This module defines the persistence collaborator for the dashboard. The
//! [`RecordStore`] trait is deliberately tiny: the whole customer collection
//! is one serialized value under one fixed key, read and written as a unit.
//!
//! ## Implementations
//!
//! - [`fs::FileStore`]: Production file-based storage
//!   - The collection lives in `<root>/<key>.json` as a JSON array
//!   - No schema version, no migration: parsing the file is the read contract
//!
//! - [`memory::InMemoryStore`]: In-memory storage for testing
//!   - No persistence
//!   - Fast, isolated test execution
//!
//! ## Storage Format
//!
//! For `FileStore`:
//! ```text
//! <data dir>/
//! ├── customer_payment_dashboard_data.json   # All customers (JSON array)
//! └── config.json                            # Dashboard configuration
//! ```
//!
//! There is no row-level access. Every mutation in [`crate::api`] reads the full
//! collection, changes it, and writes the full collection back.

use crate::error::Result;
use crate::model::Customer;

pub mod fs;
pub mod memory;

/// Key the customer collection is stored under.
pub const STORAGE_KEY: &str = "customer_payment_dashboard_data";

/// Read-all / write-all access to the persisted customer collection.
pub trait RecordStore {
    /// Returns the stored collection, or `None` when nothing was ever written.
    fn read_all(&self) -> Result<Option<Vec<Customer>>>;

    /// Replaces the stored collection.
    fn write_all(&mut self, customers: &[Customer]) -> Result<()>;
}
