//! Notification feed storage.
//!
//! [`feed::NotificationStore`] keeps the newest-first feed with read state
//! and a retention cap. A [`mirror::FeedMirror`] gives it a durable copy
//! that is read once on open and rewritten after every mutation.
//! [`policy::BatchPolicy`] trims each evaluation pass before it is stored.

pub mod error;
pub mod feed;
pub mod mirror;
pub mod policy;


pub use error::{Result, StoreError};
pub use feed::{NotificationStore, DEFAULT_RETENTION};
pub use mirror::{FeedMirror, JsonFileMirror, MemoryMirror, STORAGE_KEY};
pub use policy::BatchPolicy;
