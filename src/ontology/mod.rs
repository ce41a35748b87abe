//! Pharmacogenomic reference ontology: the supported gene set and the
//! marker-to-allele reference table.

pub mod genes;
pub mod markers;

pub use genes::{Pharmacogene, ALL_GENES};
pub use markers::MarkerTable;
