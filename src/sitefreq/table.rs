use super::summary::FrequencyTable;
use crate::utils::{Error, Result};
use itertools::Itertools;
use std::io::Write;

const COLUMNS: [&str; 14] = [
    "position", "label", "allele_a", "allele_b", "depth", "frac_a", "frac_b", "frac_both",
    "frac_other", "A", "T", "C", "G", "del",
];
const MISSING: &str = "NA";

fn format_shares(shares: Option<impl IntoIterator<Item = f64>>, width: usize) -> String {
    match shares {
        Some(values) => values.into_iter().map(|v| format!("{:.4}", v)).join("\t"),
        None => std::iter::repeat(MISSING).take(width).join("\t"),
    }
}

/// Writes one tab-separated row per site. Uncovered sites report `NA` shares.
pub fn write_table<W: Write>(table: &FrequencyTable, mut out: W) -> Result<()> {
    let to_error = |e: std::io::Error| Error::Output(format!("Failed to write table: {}", e));

    writeln!(out, "{}", COLUMNS.join("\t")).map_err(to_error)?;
    for row in &table.rows {
        writeln!(
            out,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}",
            row.display_pos(),
            row.site.label,
            row.site.allele_a,
            row.site.allele_b,
            row.depth,
            format_shares(row.fractions.map(|f| f.as_array()), 4),
            format_shares(row.composition.map(|c| c.as_array()), 5),
        )
        .map_err(to_error)?;
    }
    out.flush().map_err(to_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sitefreq::{
        pileup::{Allele, BaseCounts},
        site::VariantRecord,
        summary::summarize,
    };

    #[test]
    fn writes_header_and_rows() {
        let mut counts = BaseCounts::new();
        counts.add(Allele::A, 60);
        counts.add(Allele::G, 20);
        let table = FrequencyTable {
            rows: vec![
                summarize(&VariantRecord::new("S:E484K", 499, "A", "G"), &counts),
                summarize(&VariantRecord::new("S:N501Y", 22, "A", "T"), &BaseCounts::new()),
            ],
        };

        let mut buffer = Vec::new();
        write_table(&table, &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("position\tlabel\tallele_a"));
        assert_eq!(
            lines[1],
            "500\tS:E484K\tA\tG\t80\t0.7500\t0.2500\t0.0000\t0.0000\t0.7500\t0.0000\t0.0000\t0.2500\t0.0000"
        );
        assert_eq!(lines[2], "23\tS:N501Y\tA\tT\t0\tNA\tNA\tNA\tNA\tNA\tNA\tNA\tNA\tNA");
    }
}
