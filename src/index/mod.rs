//! Secondary indices over the ingested dataset
//!
//! Four indices give the query engine sub-linear lookups:
//!
//! - **agent / status / queue**: [`FieldIndex`], normalized value →
//!   ordered row-id set
//! - **date**: [`DateIndex`], calendar day → ordered row-id set
//!
//! All four are rebuilt from scratch by [`IndexSet::build`] on every
//! ingestion; there is no incremental maintenance.

mod builder;
mod date_index;
mod field_index;

pub use builder::{IndexSet, IndexStats};
pub use date_index::DateIndex;
pub use field_index::FieldIndex;
