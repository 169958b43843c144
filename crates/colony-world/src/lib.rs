//! World state access for the Colony creep controller.
//!
//! Role logic never talks to the game directly. It goes through the
//! [`WorldState`] trait, which has two backends with identical semantics:
//! the live host and a frozen snapshot replayed offline.
//!
//! # Modules
//!
//! - [`state`] -- The [`WorldState`] contract and query filters.
//! - [`live`] -- [`Host`] (the raw host API seam) and [`LiveWorld`].
//! - [`replay`] -- [`ReplayWorld`]: snapshot-backed outcome synthesis.
//! - [`graph`] -- [`ObjectGraph`] reconstructed once from a snapshot.
//! - [`journal`] -- [`ActionJournal`], a recording wrapper.
//! - [`geometry`] -- Chebyshev range and nearest-object selection.
//! - [`capacity`] -- Store capacity fallback for incomplete captures.
//! - [`error`] -- Error types for the memory and snapshot boundary.

pub mod capacity;
pub mod error;
pub mod geometry;
pub mod graph;
pub mod journal;
pub mod live;
pub mod replay;
pub mod state;

// Re-export primary types at crate root.
pub use error::WorldError;
pub use graph::ObjectGraph;
pub use journal::{ActionJournal, JournalEntry};
pub use live::{Host, LiveWorld};
pub use replay::ReplayWorld;
pub use state::{Filter, WorldState, any};
