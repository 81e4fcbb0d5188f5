//! Genome-wide discovery of positions carrying a minor allele.

use super::{
    pileup::{BaseCounts, PileupSource},
    reference::ReferenceSequence,
    site::{SiteSelection, VariantRecord},
};
use crate::utils::Result;
use std::collections::HashMap;

/// Label given to sites found by the scan rather than taken from the catalog
pub const MINOR_SITE_LABEL: &str = "ref";

/// Whether at least two alleles each reach `min_fraction` of a depth of at least `min_depth`
pub fn has_minor_allele(counts: &BaseCounts, min_fraction: f64, min_depth: u32) -> bool {
    let depth = counts.depth();
    if depth == 0 || depth < min_depth {
        return false;
    }
    let qualifying = counts
        .iter()
        .filter(|&(_, count)| count > 0 && count as f64 / depth as f64 >= min_fraction)
        .count();
    qualifying >= 2
}

/// Walks every covered column once and returns, in genome order, the catalog sites
/// that are covered plus synthetic sites where a minor allele passes the thresholds.
///
/// Catalog entries are passed through untouched. Synthetic sites carry the reference
/// base as both lineage alleles.
pub fn scan_minor_sites<S: PileupSource + ?Sized>(
    catalog_sites: &SiteSelection,
    source: &mut S,
    reference: &ReferenceSequence,
    min_fraction: f64,
    min_depth: u32,
) -> Result<SiteSelection> {
    let by_pos: HashMap<u32, &VariantRecord> =
        catalog_sites.iter().map(|site| (site.pos, site)).collect();

    let mut selection = SiteSelection::new();
    let mut num_columns = 0_usize;
    let mut num_minor = 0_usize;
    source.for_each_column(&mut |pos, observations| {
        num_columns += 1;
        if let Some(site) = by_pos.get(&pos) {
            selection.push((*site).clone());
            return Ok(());
        }

        let counts = BaseCounts::from_observations(observations);
        if !has_minor_allele(&counts, min_fraction, min_depth) {
            return Ok(());
        }

        let Some(ref_base) = reference.base_at(pos) else {
            log::warn!(
                "Covered position {} lies beyond the reference, skipping",
                pos + 1
            );
            return Ok(());
        };
        let ref_allele = (ref_base as char).to_string();
        selection.push(VariantRecord::new(
            MINOR_SITE_LABEL,
            pos,
            ref_allele.clone(),
            ref_allele,
        ));
        num_minor += 1;
        Ok(())
    })?;

    log::info!(
        "Scanned {} covered positions: {} catalog sites, {} minor-allele sites",
        num_columns,
        selection.len() - num_minor,
        num_minor
    );
    Ok(selection)
}
