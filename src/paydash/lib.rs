//! # Paydash Architecture
//!
//! Paydash is a **UI-agnostic customer-payments dashboard library**. The
//! terminal client in `cli/` is one way to drive it; nothing below the
//! session layer knows a terminal exists.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments and REPL lines, renders tables/toasts   │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Session Layer (dashboard.rs, state.rs, view.rs, form.rs)   │
//! │  - UiState + reducer, derived TableView, form submit        │
//! │  - Row selectors (3, 3-5, customer-12) → ids                │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Query Layer (customers.rs, query.rs, toast.rs)             │
//! │  - Cached "customers" read, shared in-flight fetches        │
//! │  - Mutations invalidate the cache and raise toasts          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Data Access + Storage (api.rs, store/)                     │
//! │  - Async mock backend with simulated latency                │
//! │  - RecordStore trait: FileStore, InMemoryStore (testing)    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Key Principle: State Is Passed, Never Global
//!
//! The UI state is a plain value owned by a [`dashboard::Dashboard`]. Every
//! change goes through [`state::reduce`], and everything the table shows is
//! recomputed from that state and the latest cached list by
//! [`view::TableView::build`].
//!
//! ## Testing Strategy
//!
//! 1. **Pure logic** (`state`, `view`, `form`, `index`): plain unit tests.
//! 2. **Async layers** (`api`, `query`, `customers`, `dashboard`): `#[tokio::test]`
//!    against `InMemoryStore` fixtures, with the clock paused where latency matters.
//! 3. **CLI** (`tests/`): the binary run end to end against a temporary data dir.
//!
//! ## Module Overview
//!
//! - [`dashboard`]: The session facade, entry point for front ends
//! - [`state`]: UI state and its reducer
//! - [`view`]: Filtering, pagination and the table view model
//! - [`form`]: Add/update form values and validation
//! - [`index`]: Row selectors (row numbers, ranges, raw ids)
//! - [`customers`]: Cached customer reads and mutations with toasts
//! - [`query`]: Generic keyed query cache
//! - [`toast`]: Transient notifications
//! - [`api`]: Async data access with simulated latency
//! - [`store`]: Storage abstraction and implementations
//! - [`seed`]: Demo data for an empty store
//! - [`model`]: Core data types (`Customer`, `CustomerId`, `CustomerStatus`)
//! - [`config`]: Configuration management
//! - [`error`]: Error types
//! - `cli`: Argument parsing, the interactive session and rendering for the binary (not part of the lib API)

pub mod api;
pub mod config;
pub mod customers;
pub mod dashboard;
pub mod error;
pub mod form;
pub mod index;
pub mod model;
pub mod query;
pub mod seed;
pub mod state;
pub mod store;
pub mod toast;
pub mod view;
