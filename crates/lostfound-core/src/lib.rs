//! Core models and storage for the lostfound item tracker.
//!
//! This crate owns the item record model, the timestamp normalizer, the
//! JSON record snapshot, the credential file and the lifecycle operations
//! the interactive front end calls into.

pub mod credentials;
pub mod error;
pub mod export;
pub mod models;
pub mod operations;
pub mod store;
pub mod timestamp;

pub use credentials::{is_valid_username, CredentialStore, Registration};
pub use error::{Result, StoreError};
pub use models::{ItemKind, ItemRecord, ItemStatus, ItemView, NewItem, Role, Session};
pub use operations::{ClaimOutcome, Summary};
pub use store::RecordStore;
