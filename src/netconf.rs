//! Network definition reconciliation subsystem.
//!
//! The external runtime tool resolves container networking from definition
//! files in a well-known directory. This module owns one such file per
//! logical network: it diffs the desired configuration against what is
//! persisted and rewrites the file only on a real change, so the tool never
//! observes a needlessly touched definition.
//!
//! Re-exports:
//! - [`NetworkFile`]: load/update/save/clear with a dirty flag.
//! - [`with_network`]: scoped load-mutate-persist cycle.
//! - [`NetworkDefinition`], [`Ipam`]: the on-disk record.

pub mod definition;
pub mod reconciler;

pub use definition::{Ipam, NetworkDefinition};
pub use reconciler::{with_network, NetworkFile};
