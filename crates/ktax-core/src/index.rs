//! Lineage index flattening
//!
//! Final pipeline stage: walk the finished tree and collect every lineaged
//! taxon into a flat `taxid -> lineage` mapping, the lookup table handed to
//! downstream per-read annotation.

use std::collections::HashMap;

use tracing::warn;

use crate::models::TaxonId;
use crate::tree::TaxonomyTree;

/// Flatten a finished tree into a `taxid -> lineage` mapping.
///
/// Taxa with an empty lineage (unrecognized rank) are skipped entirely:
/// they appear neither as keys nor inside any lineage string. If two taxa
/// carry the same taxid the one later in report order wins, and the
/// collision is logged.
pub fn build_lineage_index(tree: &TaxonomyTree) -> HashMap<String, String> {
    let mut index = HashMap::with_capacity(tree.len());
    let mut stack: Vec<TaxonId> = vec![0];

    while let Some(id) = stack.pop() {
        let Some(taxon) = tree.get(id) else { continue };

        if !taxon.lineage.is_empty() {
            if let Some(previous) = index.insert(taxon.taxid.clone(), taxon.lineage.clone()) {
                warn!(
                    taxid = %taxon.taxid,
                    "duplicate taxid in report; replacing lineage '{}'",
                    previous
                );
            }
        }

        // Reversed so taxa are visited in report (pre-order) order
        for &child in taxon.subtaxa.iter().rev() {
            stack.push(child);
        }
    }

    index
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_index_contents() {
        let report = "100.00\t10\t0\tR\t1\troot\n\
                      100.00\t10\t0\tD\t2\t  Bacteria\n\
                      60.00\t6\t1\tP\t3\t    Firmicutes\n\
                      40.00\t4\t4\tO\t4\t      Lactobacillales\n";
        let tree = TaxonomyTree::from_report(report).unwrap();
        let index = build_lineage_index(&tree);

        assert_eq!(index.len(), 3);
        assert_eq!(index["2"], "d__Bacteria");
        assert_eq!(index["3"], "d__Bacteria|p__Firmicutes");
        assert_eq!(index["4"], "d__Bacteria|p__Firmicutes|o__Lactobacillales");
        assert!(!index.contains_key("1")); // rank "r" never gets a lineage
    }

    #[test]
    fn test_every_lineaged_taxon_is_indexed() {
        let report = "100.00\t10\t0\tR\t1\troot\n\
                      100.00\t10\t2\tD\t2\t  Bacteria\n\
                      60.00\t8\t8\tP\t3\t    Firmicutes\n";
        let tree = TaxonomyTree::from_report(report).unwrap();
        let index = build_lineage_index(&tree);

        for taxon in tree.iter() {
            assert_eq!(
                index.contains_key(&taxon.taxid),
                !taxon.lineage.is_empty(),
                "taxid {} indexed state disagrees with its lineage",
                taxon.taxid
            );
        }
    }

    #[test]
    fn test_duplicate_taxid_last_write_wins() {
        let report = "100.00\t10\t0\tR\t1\troot\n\
                      50.00\t5\t5\tD\t9\t  Alpha\n\
                      50.00\t5\t5\tD\t9\t  Beta\n";
        let tree = TaxonomyTree::from_report(report).unwrap();
        let index = build_lineage_index(&tree);

        assert_eq!(index.len(), 1);
        assert_eq!(index["9"], "d__Beta");
    }
}
