//! Per-thread, block-partitioned storage of computational objects.
//!
//! The [`ObjectStore`] holds one independent replica of every object per
//! worker thread. Each thread's [`ThreadSlot`] keeps the full object list
//! plus buckets keyed by block and boundary, so the assembly loop finds the
//! active objects of an element's block with a single lookup.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod slot;
pub mod store;

pub use error::StoreError;
pub use slot::{ObjectView, ThreadSlot};
pub use store::ObjectStore;
