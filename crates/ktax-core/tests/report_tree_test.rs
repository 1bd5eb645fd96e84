//! End-to-end tests for the report → tree → lineage-index pipeline

use ktax_common::KtaxError;
use ktax_core::{build_lineage_index, translate_report, TaxonomyTree};

#[test]
fn test_translate_small_report() {
    let report = "100.00\t10\t0\tR\t1\troot\n\
                  100.00\t10\t0\tD\t2\t  Bacteria\n\
                  60.00\t6\t1\tP\t3\t    Firmicutes\n\
                  40.00\t4\t4\tO\t4\t      Lactobacillales\n";

    let mapping = translate_report(report).unwrap();

    assert_eq!(mapping.len(), 3);
    assert_eq!(mapping["2"], "d__Bacteria");
    assert_eq!(mapping["3"], "d__Bacteria|p__Firmicutes");
    assert_eq!(mapping["4"], "d__Bacteria|p__Firmicutes|o__Lactobacillales");
    assert!(!mapping.contains_key("1"));
}

#[test]
fn test_translate_full_ladder() {
    let report = "100.00\t20\t0\tD\t1\tBacteria\n\
                  100.00\t20\t0\tP\t2\t  Firmicutes\n\
                  100.00\t20\t0\tC\t3\t    Bacilli\n\
                  100.00\t20\t0\tO\t4\t      Lactobacillales\n\
                  100.00\t20\t0\tF\t5\t        Lactobacillaceae\n\
                  100.00\t20\t2\tG\t6\t          Lactobacillus\n\
                  90.00\t18\t18\tS\t7\t            Lactobacillus gasseri\n";

    let mapping = translate_report(report).unwrap();

    assert_eq!(mapping.len(), 7);
    assert_eq!(
        mapping["7"],
        "d__Bacteria|p__Firmicutes|c__Bacilli|o__Lactobacillales|f__Lactobacillaceae|g__Lactobacillus|s__Lactobacillus_gasseri"
    );
}

#[test]
fn test_translate_sibling_domains() {
    let report = "100.00\t30\t0\tR\t1\troot\n\
                  50.00\t15\t15\tD\t2\t  Bacteria\n\
                  50.00\t15\t0\tD\t3\t  Archaea\n\
                  50.00\t15\t15\tP\t4\t    Euryarchaeota\n";

    let mapping = translate_report(report).unwrap();

    assert_eq!(mapping["2"], "d__Bacteria");
    assert_eq!(mapping["3"], "d__Archaea");
    assert_eq!(mapping["4"], "d__Archaea|p__Euryarchaeota");
}

#[test]
fn test_unranked_levels_are_bridged() {
    // Sub-rank codes like "s1" are not part of the recognized ladder; a
    // strain below a species chains through it to the species lineage.
    let report = "100.00\t10\t0\tD\t1\tBacteria\n\
                  100.00\t10\t0\tG\t2\t  Lactobacillus\n\
                  100.00\t10\t2\tS\t3\t    Lactobacillus gasseri\n\
                  80.00\t8\t0\tS1\t4\t      Lactobacillus gasseri ATCC\n\
                  80.00\t8\t8\tS\t5\t        Lactobacillus gasseri K7\n";

    let mapping = translate_report(report).unwrap();

    assert!(!mapping.contains_key("4"));
    assert_eq!(
        mapping["5"],
        "d__Bacteria|g__Lactobacillus|s__Lactobacillus_gasseri|s__Lactobacillus_gasseri_K7"
    );
}

#[test]
fn test_malformed_report_returns_no_partial_mapping() {
    let report = "100.00\t10\t0\tR\t1\troot\n\
                  100.00\t10\t0\tD\t2\n";

    let err = translate_report(report).unwrap_err();

    match err {
        KtaxError::MalformedRow { line, .. } => assert_eq!(line, 2),
        other => panic!("expected MalformedRow, got {:?}", other),
    }
}

#[test]
fn test_inconsistent_report_is_fatal() {
    let report = "100.00\t5\t5\tR\t1\troot\n\
                  100.00\t5\t5\tD\t2\t  Bacteria\n";

    let err = translate_report(report).unwrap_err();
    assert!(matches!(err, KtaxError::TreeInconsistency { line: 2, .. }));
}

#[test]
fn test_mapping_matches_tree_contents() {
    let report = "100.00\t12\t1\tR\t1\troot\n\
                  90.00\t11\t0\tD\t2\t  Bacteria\n\
                  50.00\t6\t6\tP\t3\t    Firmicutes\n\
                  40.00\t5\t5\tP\t4\t    Proteobacteria\n";

    let tree = TaxonomyTree::from_report(report).unwrap();
    let mapping = build_lineage_index(&tree);

    let lineaged = tree.iter().filter(|t| !t.lineage.is_empty()).count();
    assert_eq!(mapping.len(), lineaged);

    for taxon in tree.iter().filter(|t| !t.lineage.is_empty()) {
        assert_eq!(mapping[&taxon.taxid], taxon.lineage);
    }
}

#[test]
fn test_identical_input_identical_mapping() {
    let report = "100.00\t10\t0\tR\t1\troot\n\
                  100.00\t10\t4\tD\t2\t  Bacteria\n\
                  60.00\t6\t6\tP\t3\t    Firmicutes\n";

    let first = translate_report(report).unwrap();
    let second = translate_report(report).unwrap();

    assert_eq!(first, second);
}
