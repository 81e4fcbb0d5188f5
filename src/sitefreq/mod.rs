pub mod catalog;
pub mod pileup;
pub mod reference;
pub mod scan;
pub mod site;
pub mod summary;
pub mod table;

pub use catalog::{ensure_within_reference, load_sites};
pub use pileup::{
    count_bases, Allele, BamPileupSource, BaseCounts, PileupSource, ReadObservation,
    DEFAULT_MIN_BASE_QUALITY,
};
pub use reference::ReferenceSequence;
pub use scan::{scan_minor_sites, MINOR_SITE_LABEL};
pub use site::{SiteMode, SiteSelection, VariantRecord};
pub use table::write_table;
pub use summary::{
    summarize, summarize_sites, BaseComposition, FrequencyTable, LineageFractions, SiteSummary,
};
