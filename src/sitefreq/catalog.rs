//! Variant site catalog: a tab-separated table mapping genome positions to the
//! allele each lineage carries there.
//!
//! The header names a `Nucleotide position` column (1-based), an `aa_SNP` label
//! column, one allele column per lineage and one `<lineage>_present` flag column
//! per lineage. Column order is free.

use super::site::{SiteSelection, VariantRecord};
use crate::utils::{Error, Result};
use std::{collections::HashMap, io::BufRead};

pub const POSITION_COLUMN: &str = "Nucleotide position";
pub const LABEL_COLUMN: &str = "aa_SNP";
const PRESENT_SUFFIX: &str = "_present";
const PRESENT_FLAG: &str = "1";

/// Field indices of every column needed for one lineage pair
#[derive(Debug, PartialEq)]
struct ColumnIndex {
    pos: usize,
    label: usize,
    allele_a: usize,
    allele_b: usize,
    present_a: usize,
    present_b: usize,
}

impl ColumnIndex {
    fn from_header(header: &str, lineage_a: &str, lineage_b: &str) -> Result<Self> {
        let mut lookup: HashMap<&str, usize> = HashMap::new();
        for (index, name) in header.split('\t').enumerate() {
            lookup.entry(name.trim()).or_insert(index);
        }
        let find = |name: &str| {
            lookup
                .get(name)
                .copied()
                .ok_or_else(|| Error::MissingColumn(name.to_string()))
        };

        Ok(ColumnIndex {
            pos: find(POSITION_COLUMN)?,
            label: find(LABEL_COLUMN)?,
            allele_a: find(lineage_a)?,
            allele_b: find(lineage_b)?,
            present_a: find(&format!("{lineage_a}{PRESENT_SUFFIX}"))?,
            present_b: find(&format!("{lineage_b}{PRESENT_SUFFIX}"))?,
        })
    }

    fn min_fields(&self) -> usize {
        [
            self.pos,
            self.label,
            self.allele_a,
            self.allele_b,
            self.present_a,
            self.present_b,
        ]
        .into_iter()
        .max()
        .unwrap_or(0)
            + 1
    }
}

/// A parsed catalog row before lineage filtering
struct CatalogRow {
    record: VariantRecord,
    present_a: bool,
    present_b: bool,
}

fn parse_row(line: &str, line_number: usize, columns: &ColumnIndex) -> Result<CatalogRow> {
    let fields: Vec<&str> = line.split('\t').map(str::trim).collect();
    let min_fields = columns.min_fields();
    if fields.len() < min_fields {
        return Err(Error::MalformedRow {
            line: line_number,
            reason: format!("expected at least {} fields, found {}", min_fields, fields.len()),
        });
    }

    let raw_pos = fields[columns.pos];
    let display_pos: u32 = raw_pos.parse().map_err(|_| Error::MalformedRow {
        line: line_number,
        reason: format!("invalid position '{}': must be a positive integer", raw_pos),
    })?;
    if display_pos == 0 {
        return Err(Error::MalformedRow {
            line: line_number,
            reason: "positions are 1-based, found 0".to_string(),
        });
    }

    Ok(CatalogRow {
        record: VariantRecord::new(
            fields[columns.label],
            display_pos - 1,
            fields[columns.allele_a],
            fields[columns.allele_b],
        ),
        present_a: fields[columns.present_a] == PRESENT_FLAG,
        present_b: fields[columns.present_b] == PRESENT_FLAG,
    })
}

/// Selects catalog sites relevant to a pair of lineages.
///
/// A row is kept when either lineage is flagged present; with `diff_only` the two
/// lineages must also carry different alleles. The first row seen at a position wins.
pub fn load_sites<R: BufRead>(
    mut reader: R,
    lineage_a: &str,
    lineage_b: &str,
    diff_only: bool,
) -> Result<SiteSelection> {
    let mut line = String::new();
    let read_line = |reader: &mut R, line: &mut String, line_number: usize| {
        line.clear();
        reader.read_line(line).map_err(|e| {
            Error::UnreadableResource(format!("Error reading catalog line {}: {}", line_number, e))
        })
    };

    if read_line(&mut reader, &mut line, 1)? == 0 {
        return Err(Error::MalformedRow {
            line: 1,
            reason: "catalog is empty, expected a header row".to_string(),
        });
    }
    let columns = ColumnIndex::from_header(line.trim_end_matches(['\n', '\r']), lineage_a, lineage_b)?;

    let mut selection = SiteSelection::new();
    let mut line_number = 1;
    while read_line(&mut reader, &mut line, line_number + 1)? != 0 {
        line_number += 1;
        let content = line.trim_end_matches(['\n', '\r']);
        if content.trim().is_empty() {
            continue;
        }

        let row = parse_row(content, line_number, &columns)?;
        if !(row.present_a || row.present_b) {
            continue;
        }
        if diff_only && row.record.allele_a == row.record.allele_b {
            continue;
        }
        let pos = row.record.display_pos();
        if !selection.push(row.record) {
            log::debug!("Skipping duplicate catalog site at position {} (line {})", pos, line_number);
        }
    }

    log::debug!(
        "Selected {} catalog sites for {} vs {} from {} rows",
        selection.len(),
        lineage_a,
        lineage_b,
        line_number - 1
    );
    Ok(selection)
}

/// Fails if any selected site lies beyond the end of a reference of `genome_len` bases.
pub fn ensure_within_reference(sites: &SiteSelection, genome_len: u32) -> Result<()> {
    match sites.iter().find(|site| site.pos >= genome_len) {
        Some(site) => Err(Error::PositionOutOfBounds {
            pos: site.display_pos(),
            len: genome_len,
        }),
        None => Ok(()),
    }
}
