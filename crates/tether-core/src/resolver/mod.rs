//! # Tether Core Candidate Bookkeeping
//!
//! Per-requirement candidate lists used by a host while it chooses which
//! collaborators to bind. Several requirements may share one
//! [`CandidateSelector`]; [`CandidateMap::deep_clone`] can preserve that
//! sharing in the copy.
pub mod candidates;

pub use candidates::{CandidateMap, CandidateSelector, SharedSelector};
