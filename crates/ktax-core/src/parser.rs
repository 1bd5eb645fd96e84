//! Inspection report row decoding
//!
//! Parses the flat report emitted by the upstream classification-database
//! inspection tool.
//!
//! # File Format
//! One taxon per line, six tab-separated fields:
//! ```text
//! percentage \t clade_count \t taxa_count \t rank \t taxid \t name
//! 100.00     \t 10          \t 0          \t D    \t 2     \t   Bacteria
//! ```
//! The percentage is redundant with the counts and is ignored. The name
//! field carries the upstream tool's indentation, which encodes nothing the
//! counts do not already encode.

use ktax_common::{KtaxError, Result};

/// Number of tab-separated fields in a report row
pub const REPORT_FIELDS: usize = 6;

/// The decoded fields of one report row needed to construct a taxon
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    /// Database entries assigned to this taxon or any descendant
    pub clade_count: u64,
    /// Database entries assigned to this taxon exactly
    pub taxa_count: u64,
    /// Rank code, lower-cased
    pub rank: String,
    /// Identifier token
    pub taxid: String,
    /// Display name, trimmed and internal whitespace collapsed to
    /// underscores
    pub name: String,
}

impl ReportRow {
    /// Decode one report line. `line_num` is the 1-based line index used in
    /// error reports.
    pub fn parse(line: &str, line_num: usize) -> Result<Self> {
        let fields: Vec<&str> = line.split('\t').collect();

        if fields.len() < REPORT_FIELDS {
            return Err(KtaxError::malformed_row(
                line_num,
                format!(
                    "expected {} tab-separated fields, got {}",
                    REPORT_FIELDS,
                    fields.len()
                ),
            ));
        }

        // fields[0] is the percentage column; nothing downstream needs it
        let clade_count = parse_count(fields[1], "clade count", line_num)?;
        let taxa_count = parse_count(fields[2], "taxa count", line_num)?;
        let rank = fields[3].trim().to_lowercase();
        let taxid = fields[4].trim().to_string();
        let name = normalize_name(fields[5]);

        Ok(Self {
            clade_count,
            taxa_count,
            rank,
            taxid,
            name,
        })
    }
}

/// Parse a count field as a non-negative integer
fn parse_count(field: &str, label: &str, line_num: usize) -> Result<u64> {
    let trimmed = field.trim();
    trimmed.parse().map_err(|_| {
        KtaxError::malformed_row(
            line_num,
            format!("{} '{}' is not a non-negative integer", label, trimmed),
        )
    })
}

/// Strip the indentation and collapse internal whitespace runs to
/// underscores, so names are usable as tokens inside lineage strings.
pub fn normalize_name(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join("_")
}

/// Decode every row of a report, in order, paired with its 1-based line
/// number. Blank lines are skipped but still advance the line counter.
pub fn parse_report(content: &str) -> Result<Vec<(usize, ReportRow)>> {
    let mut rows = Vec::new();

    for (idx, line) in content.lines().enumerate() {
        let line_num = idx + 1;

        if line.trim().is_empty() {
            continue;
        }

        rows.push((line_num, ReportRow::parse(line, line_num)?));
    }

    Ok(rows)
}
