//! In-process stores.
//!
//! Backed by `tokio::sync::RwLock` so concurrent readers always observe a
//! whole snapshot. Used by the CLI and by tests; production deployments plug
//! their own shared stores into the same ports.

mod file_claims_store;
mod progress_store;

pub use file_claims_store::InMemoryFileClaimsStore;
pub use progress_store::InMemoryProgressStore;
