//! Taxonomy tree reconstruction
//!
//! The inspection report lists taxa in depth-first pre-order but carries no
//! explicit depth marker. Depth is implied by one arithmetic invariant: a
//! parent's clade count equals its own taxa count plus the clade counts of
//! its children. The builder keeps an explicit stack of still-open ancestor
//! candidates and reconciles each new row against it — a taxon whose
//! accumulated descendant counts have reached its clade count is finished
//! and can never parent another row.

use ktax_common::{KtaxError, Result};
use tracing::debug;

use crate::models::{Taxon, TaxonId, TreeStats};
use crate::parser::{self, ReportRow};

/// The reconstructed taxonomy. Owns every taxon in an arena; the first
/// entry is always the root.
#[derive(Debug, Clone)]
pub struct TaxonomyTree {
    nodes: Vec<Taxon>,
}

impl TaxonomyTree {
    /// Reconstruct the taxonomy implied by a full inspection report.
    pub fn from_report(content: &str) -> Result<Self> {
        let rows = parser::parse_report(content)?;
        Self::from_rows(rows)
    }

    /// Reconstruct the taxonomy from decoded rows paired with their 1-based
    /// line numbers, in report order.
    pub fn from_rows(rows: Vec<(usize, ReportRow)>) -> Result<Self> {
        let mut rows = rows.into_iter();
        let (_, root_row) = rows
            .next()
            .ok_or_else(|| KtaxError::malformed_row(1, "report contains no rows".to_string()))?;

        let mut tree = Self {
            nodes: vec![Taxon::new(root_row)],
        };
        let root_lineage = tree.assemble_lineage(0);
        tree.nodes[0].lineage = root_lineage;

        // Open (incomplete) ancestor candidates, nearest last. The root may
        // stay open forever: root-level slack models an unclassified bucket
        // whose counts never reconcile, and that alone is not an error.
        let mut open: Vec<TaxonId> = vec![0];

        for (line_num, row) in rows {
            while open.last().is_some_and(|&id| tree.nodes[id].is_complete()) {
                open.pop();
            }

            let parent = *open.last().ok_or_else(|| {
                KtaxError::inconsistency(
                    line_num,
                    format!("no open ancestor left to attach taxid {} to", row.taxid),
                )
            })?;

            let id = tree.nodes.len();
            tree.nodes.push(Taxon::new(row));
            tree.attach(id, parent, line_num)?;

            if !tree.nodes[id].is_complete() {
                open.push(id);
            }
        }

        debug!(taxa = tree.len(), "reconstructed taxonomy tree");
        Ok(tree)
    }

    /// Attach a freshly created taxon to its parent: record the child link,
    /// propagate its taxa count into every ancestor's accumulator, and
    /// assemble its lineage now that the parent is known.
    fn attach(&mut self, id: TaxonId, parent: TaxonId, line_num: usize) -> Result<()> {
        self.nodes[parent].subtaxa.push(id);
        self.nodes[id].supertaxon = Some(parent);

        let taxa_count = self.nodes[id].taxa_count;
        if taxa_count != 0 {
            let mut cursor = Some(parent);
            while let Some(ancestor) = cursor {
                let node = &mut self.nodes[ancestor];
                node.subtaxa_sum += taxa_count;
                if node.subtaxa_sum > node.clade_count {
                    return Err(KtaxError::inconsistency(
                        line_num,
                        format!(
                            "taxid {} accumulated {} entries against a clade count of {}",
                            node.taxid, node.subtaxa_sum, node.clade_count
                        ),
                    ));
                }
                cursor = node.supertaxon;
            }
        }

        let lineage = self.assemble_lineage(id);
        self.nodes[id].lineage = lineage;
        Ok(())
    }

    /// Compute a taxon's fully qualified lineage. Parent links must already
    /// be in place.
    ///
    /// Domains start a lineage; other recognized ranks extend the nearest
    /// lineaged ancestor. Unrecognized ranks contribute nothing and stay
    /// lineage-less, but their descendants still chain through them to the
    /// nearest lineaged ancestor. A recognized rank with no lineaged
    /// ancestor starts its own chain.
    fn assemble_lineage(&self, id: TaxonId) -> String {
        let node = &self.nodes[id];

        if node.rank == "d" {
            return format!("d__{}", node.name);
        }
        if !node.has_recognized_rank() {
            return String::new();
        }

        match self.superlineage(id) {
            Some(upper) => format!("{}|{}__{}", upper, node.rank, node.name),
            None => format!("{}__{}", node.rank, node.name),
        }
    }

    /// Walk upward to the nearest ancestor that already carries a lineage.
    /// Iterative; unranked nesting can be arbitrarily deep.
    fn superlineage(&self, id: TaxonId) -> Option<&str> {
        let mut cursor = self.nodes[id].supertaxon;
        while let Some(ancestor) = cursor {
            let node = &self.nodes[ancestor];
            if !node.lineage.is_empty() {
                return Some(&node.lineage);
            }
            cursor = node.supertaxon;
        }
        None
    }

    /// The root taxon
    pub fn root(&self) -> &Taxon {
        &self.nodes[0]
    }

    /// Look up a taxon by its arena id
    pub fn get(&self, id: TaxonId) -> Option<&Taxon> {
        self.nodes.get(id)
    }

    /// Iterate over every taxon in creation (report) order
    pub fn iter(&self) -> std::slice::Iter<'_, Taxon> {
        self.nodes.iter()
    }

    /// Number of taxa in the tree
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree holds no taxa. Trees built by [`Self::from_report`]
    /// always hold at least the root.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Summarize the finished tree
    pub fn stats(&self) -> TreeStats {
        let ranked_taxa = self.nodes.iter().filter(|t| t.has_recognized_rank()).count();
        TreeStats {
            total_taxa: self.nodes.len(),
            ranked_taxa,
            unranked_taxa: self.nodes.len() - ranked_taxa,
            root_clade_count: self.root().clade_count,
        }
    }

    /// Render the hierarchy as indented text, one taxon per line in report
    /// (pre-order) order, two spaces per depth level. Iterative; depth is
    /// bounded only by the input.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let mut stack: Vec<(TaxonId, usize)> = vec![(0, 0)];

        while let Some((id, depth)) = stack.pop() {
            let Some(node) = self.get(id) else { continue };

            out.push_str(&format!(
                "{:indent$}{} [{}] {} ({}/{})\n",
                "",
                node.rank,
                node.taxid,
                node.name,
                node.taxa_count,
                node.clade_count,
                indent = depth * 2
            ));

            // Reversed so the leftmost child is visited first
            for &child in node.subtaxa.iter().rev() {
                stack.push((child, depth + 1));
            }
        }

        out
    }
}
