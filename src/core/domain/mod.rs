//! Domain types.

mod index;
mod secret_id;
mod snapshot;

pub use index::IndexItem;
pub use secret_id::SecretId;
pub use snapshot::Snapshot;
