//! ktax Core Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Reconstructs an explicit hierarchical taxonomy from a flat,
//! depth-implicit classification-database inspection report, then derives a
//! fully qualified lineage string for every taxon with a recognized rank.
//!
//! The report lists taxa in depth-first pre-order but carries no depth
//! marker; depth is implied purely by the arithmetic relationship between a
//! taxon's clade count and the counts of its descendants. The builder in
//! [`tree`] recovers the hierarchy from that relationship alone.
//!
//! # Pipeline
//!
//! raw lines → [`parser::ReportRow`] → [`tree::TaxonomyTree`] (lineages
//! assembled as each taxon attaches) → [`index::build_lineage_index`] →
//! flat `taxid -> lineage` mapping.
//!
//! # Example
//!
//! ```
//! let report = "100.00\t10\t0\td\t2\tBacteria\n\
//!               60.00\t10\t10\tp\t3\tFirmicutes\n";
//! let mapping = ktax_core::translate_report(report)?;
//! assert_eq!(mapping["3"], "d__Bacteria|p__Firmicutes");
//! # Ok::<(), ktax_common::KtaxError>(())
//! ```

use std::collections::HashMap;

use ktax_common::Result;

pub mod index;
pub mod models;
pub mod parser;
pub mod tree;

// Re-export commonly used types
pub use index::build_lineage_index;
pub use models::{Taxon, TaxonId, TreeStats, RECOGNIZED_RANKS};
pub use parser::ReportRow;
pub use tree::TaxonomyTree;

/// Translate a full inspection report into a `taxid -> lineage` mapping.
///
/// Convenience entry point covering the whole pipeline. The content is the
/// report text; all I/O is the caller's concern.
pub fn translate_report(content: &str) -> Result<HashMap<String, String>> {
    let tree = TaxonomyTree::from_report(content)?;
    Ok(build_lineage_index(&tree))
}
