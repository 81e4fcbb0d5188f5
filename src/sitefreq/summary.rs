//! Turns raw allele counts into the normalised shares that are plotted.

use super::{
    pileup::{count_bases, Allele, BaseCounts, PileupSource},
    site::{SiteSelection, VariantRecord},
};
use crate::utils::Result;

/// Share of reads supporting each lineage's allele at a site
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LineageFractions {
    pub lineage_a: f64,
    pub lineage_b: f64,
    /// Allele carried by both lineages
    pub both: f64,
    pub other: f64,
}

impl LineageFractions {
    pub fn as_array(&self) -> [f64; 4] {
        [self.lineage_a, self.lineage_b, self.both, self.other]
    }
}

/// Share of reads per base, independent of lineage
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BaseComposition {
    pub a: f64,
    pub t: f64,
    pub c: f64,
    pub g: f64,
    pub del: f64,
}

impl BaseComposition {
    pub fn as_array(&self) -> [f64; 5] {
        [self.a, self.t, self.c, self.g, self.del]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SiteSummary {
    pub site: VariantRecord,
    pub depth: u32,
    /// `None` when no read covers the site
    pub fractions: Option<LineageFractions>,
    /// `None` when no read covers the site
    pub composition: Option<BaseComposition>,
}

impl SiteSummary {
    pub fn display_pos(&self) -> u32 {
        self.site.display_pos()
    }

    /// Uncovered sites report every share as zero
    pub fn fractions_or_zero(&self) -> [f64; 4] {
        self.fractions.unwrap_or_default().as_array()
    }

    pub fn composition_or_zero(&self) -> [f64; 5] {
        self.composition.unwrap_or_default().as_array()
    }
}

/// Buckets the counts at `site` by the lineage alleles and normalises by depth.
///
/// An allele equal to both lineage alleles lands in `both`; anything matching
/// neither (including deletions unless cataloged) lands in `other`.
pub fn summarize(site: &VariantRecord, counts: &BaseCounts) -> SiteSummary {
    let depth = counts.depth();
    if depth == 0 {
        return SiteSummary {
            site: site.clone(),
            depth,
            fractions: None,
            composition: None,
        };
    }

    let (mut in_a, mut in_b, mut in_both, mut in_other) = (0_u32, 0_u32, 0_u32, 0_u32);
    for (allele, count) in counts.iter() {
        match (allele.matches(&site.allele_a), allele.matches(&site.allele_b)) {
            (true, true) => in_both += count,
            (true, false) => in_a += count,
            (false, true) => in_b += count,
            (false, false) => in_other += count,
        }
    }

    let total = depth as f64;
    let share = |count: u32| count as f64 / total;
    SiteSummary {
        site: site.clone(),
        depth,
        fractions: Some(LineageFractions {
            lineage_a: share(in_a),
            lineage_b: share(in_b),
            both: share(in_both),
            other: share(in_other),
        }),
        composition: Some(BaseComposition {
            a: share(counts.get(Allele::A)),
            t: share(counts.get(Allele::T)),
            c: share(counts.get(Allele::C)),
            g: share(counts.get(Allele::G)),
            del: share(counts.get(Allele::Del)),
        }),
    }
}

/// Per-site summaries in site order; this order is the left-to-right order of the figure.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrequencyTable {
    pub rows: Vec<SiteSummary>,
}

impl FrequencyTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn positions(&self) -> Vec<u32> {
        self.rows.iter().map(SiteSummary::display_pos).collect()
    }

    pub fn depths(&self) -> Vec<u32> {
        self.rows.iter().map(|row| row.depth).collect()
    }

    pub fn labels(&self) -> Vec<&str> {
        self.rows.iter().map(|row| row.site.label.as_str()).collect()
    }
}

/// Counts and summarises every selected site, one pileup query per site.
pub fn summarize_sites<S: PileupSource + ?Sized>(
    sites: &SiteSelection,
    source: &mut S,
) -> Result<FrequencyTable> {
    let mut rows = Vec::with_capacity(sites.len());
    for site in sites {
        let counts = count_bases(site.pos, source)?;
        let summary = summarize(site, &counts);
        if summary.depth == 0 {
            log::warn!(
                "No reads cover {} at position {}; reporting zero frequencies",
                site.label,
                site.display_pos()
            );
        }
        log::debug!(
            "{} ({}): depth {}, fractions {:?}",
            site.label,
            site.display_pos(),
            summary.depth,
            summary.fractions_or_zero()
        );
        rows.push(summary);
    }
    Ok(FrequencyTable { rows })
}
