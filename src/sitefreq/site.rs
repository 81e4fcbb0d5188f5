use std::collections::HashSet;

/// One informative genome position with the allele expected in each lineage.
#[derive(Debug, Clone, PartialEq)]
pub struct VariantRecord {
    /// Amino-acid or SNP name, e.g. `S:E484K`
    pub label: String,
    /// 0-based reference coordinate
    pub pos: u32,
    /// Upper-cased allele carried by the first lineage
    pub allele_a: String,
    /// Upper-cased allele carried by the second lineage
    pub allele_b: String,
}

impl VariantRecord {
    pub fn new(
        label: impl Into<String>,
        pos: u32,
        allele_a: impl Into<String>,
        allele_b: impl Into<String>,
    ) -> Self {
        Self {
            label: label.into(),
            pos,
            allele_a: allele_a.into().to_ascii_uppercase(),
            allele_b: allele_b.into().to_ascii_uppercase(),
        }
    }

    /// 1-based coordinate used in figures and tables
    pub fn display_pos(&self) -> u32 {
        self.pos + 1
    }
}

/// Ordered sites, at most one per position. Order is the order of insertion.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SiteSelection {
    sites: Vec<VariantRecord>,
    seen: HashSet<u32>,
}

impl SiteSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the site unless its position is already taken; returns whether it was added.
    pub fn push(&mut self, site: VariantRecord) -> bool {
        if !self.seen.insert(site.pos) {
            return false;
        }
        self.sites.push(site);
        true
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, VariantRecord> {
        self.sites.iter()
    }
}

impl<'a> IntoIterator for &'a SiteSelection {
    type Item = &'a VariantRecord;
    type IntoIter = std::slice::Iter<'a, VariantRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.sites.iter()
    }
}

impl FromIterator<VariantRecord> for SiteSelection {
    fn from_iter<I: IntoIterator<Item = VariantRecord>>(iter: I) -> Self {
        let mut selection = SiteSelection::new();
        for site in iter {
            selection.push(site);
        }
        selection
    }
}

/// How the sites to report are chosen
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SiteMode {
    /// Catalog sites relevant to the two lineages
    Catalog,
    /// Genome-wide scan: covered catalog sites plus positions with a qualifying minor allele
    MinorScan { min_fraction: f64, min_depth: u32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_keeps_first_site_per_position() {
        let mut selection = SiteSelection::new();
        assert!(selection.push(VariantRecord::new("S:E484K", 499, "a", "G")));
        assert!(!selection.push(VariantRecord::new("dup", 499, "T", "T")));
        assert!(selection.push(VariantRecord::new("S:N501Y", 10, "A", "T")));
        let labels: Vec<_> = selection.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, ["S:E484K", "S:N501Y"]);
        assert_eq!(selection.iter().next().unwrap().allele_a, "A");
    }

    #[test]
    fn display_position_is_one_based() {
        assert_eq!(VariantRecord::new("x", 0, "A", "C").display_pos(), 1);
    }
}
