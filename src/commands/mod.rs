pub mod plot;
pub mod table;

use crate::{
    cli::SiteArgs,
    sitefreq::{
        ensure_within_reference, load_sites, scan_minor_sites, summarize_sites, BamPileupSource,
        FrequencyTable, ReferenceSequence, SiteMode,
    },
    utils::{open_bam_reader, open_catalog_reader, Result},
};
use std::time;

/// Selects the sites for a pair of lineages and summarises the reads covering them.
pub fn compute_frequencies(args: &SiteArgs) -> Result<(FrequencyTable, ReferenceSequence)> {
    let reference = ReferenceSequence::load(&args.genome_src)?;
    log::debug!("Reference {} has {} bases", reference.name, reference.len());

    let catalog_reader = open_catalog_reader(&args.catalog_src)?;
    let catalog_sites = load_sites(
        catalog_reader,
        &args.lineage_a,
        &args.lineage_b,
        !args.all_variants,
    )?;
    ensure_within_reference(&catalog_sites, reference.len())?;
    log::info!(
        "{} catalog sites for {} vs {}",
        catalog_sites.len(),
        args.lineage_a,
        args.lineage_b
    );

    let contig = args.contig.as_deref().unwrap_or(&reference.name);
    let bam_reader = open_bam_reader(&args.reads_src, args.decompression_threads)?;
    let mut source = BamPileupSource::new(bam_reader, contig, args.max_depth)?
        .min_base_quality(args.min_base_quality);

    let sites = match args.site_mode() {
        SiteMode::Catalog => catalog_sites,
        SiteMode::MinorScan {
            min_fraction,
            min_depth,
        } => {
            let scan_timer = time::Instant::now();
            let sites = scan_minor_sites(
                &catalog_sites,
                &mut source,
                &reference,
                min_fraction,
                min_depth,
            )?;
            log::info!(
                "Genome scan kept {} sites in {:.2?}",
                sites.len(),
                scan_timer.elapsed()
            );
            sites
        }
    };

    let table = summarize_sites(&sites, &mut source)?;
    Ok((table, reference))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sitefreq::DEFAULT_MIN_BASE_QUALITY;
    use crate::utils::{
        test_util::{write_indexed_fasta, TestBamBuilder, TestCatalogBuilder, TestRead},
        Error, InputSource,
    };
    use std::path::Path;

    const CONTIG: &str = "MN908947.3";

    fn site_args(dir: &Path, mode: SiteMode, all_variants: bool) -> SiteArgs {
        let mut seq = vec![b'A'; 40];
        seq[20] = b'C';
        let genome = write_indexed_fasta(dir, CONTIG, &seq);
        let catalog = TestCatalogBuilder::new(&["BA.2", "BA.5"])
            .row("ORF1a:X1Y", 11, &[("A", "1"), ("G", "1")])
            .row("S:Q2R", 21, &[("C", "1"), ("C", "1")])
            .write(dir);
        let reads = TestBamBuilder::new(CONTIG, 40)
            .reads(TestRead::matching(5, b"AAAAAAAAAAAAAAAAAAAA"), 3)
            .read(TestRead::matching(5, b"AAAAAGAAAATAAAAAAAAA"))
            .write(dir);

        let (min_fraction, min_depth, all_minor) = match mode {
            SiteMode::Catalog => (0.2, 20, false),
            SiteMode::MinorScan {
                min_fraction,
                min_depth,
            } => (min_fraction, min_depth, true),
        };
        SiteArgs {
            reads_src: InputSource::Local(reads),
            genome_src: InputSource::Local(genome),
            catalog_src: InputSource::Local(catalog),
            lineage_a: "BA.2".to_string(),
            lineage_b: "BA.5".to_string(),
            all_variants,
            all_minor,
            minor_fraction: min_fraction,
            minor_depth: min_depth,
            contig: None,
            max_depth: 8000,
            min_base_quality: DEFAULT_MIN_BASE_QUALITY,
            decompression_threads: 1,
        }
    }

    #[test]
    fn catalog_mode_reports_differing_sites() {
        let dir = tempfile::tempdir().unwrap();
        let args = site_args(dir.path(), SiteMode::Catalog, false);
        let (table, reference) = compute_frequencies(&args).unwrap();

        assert_eq!(reference.name, CONTIG);
        assert_eq!(table.positions(), vec![11]);
        let row = &table.rows[0];
        assert_eq!(row.depth, 4);
        assert_eq!(row.fractions_or_zero(), [0.75, 0.25, 0.0, 0.0]);
    }

    #[test]
    fn all_flag_keeps_shared_sites() {
        let dir = tempfile::tempdir().unwrap();
        let args = site_args(dir.path(), SiteMode::Catalog, true);
        let (table, _) = compute_frequencies(&args).unwrap();

        assert_eq!(table.positions(), vec![11, 21]);
        assert_eq!(table.rows[1].depth, 4);
        assert_eq!(table.rows[1].fractions_or_zero(), [0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn minor_scan_adds_reference_sites() {
        let dir = tempfile::tempdir().unwrap();
        let mode = SiteMode::MinorScan {
            min_fraction: 0.2,
            min_depth: 4,
        };
        let args = site_args(dir.path(), mode, false);
        let (table, _) = compute_frequencies(&args).unwrap();

        assert_eq!(table.positions(), vec![11, 16]);
        assert_eq!(table.labels(), vec!["ORF1a:X1Y", "ref"]);
        assert_eq!(table.rows[1].fractions_or_zero(), [0.0, 0.0, 0.75, 0.25]);
    }

    #[test]
    fn unknown_contig_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let mut args = site_args(dir.path(), SiteMode::Catalog, false);
        args.contig = Some("chrUn".to_string());
        assert!(matches!(
            compute_frequencies(&args),
            Err(Error::UnreadableResource(_))
        ));
    }

    #[test]
    fn missing_lineage_column_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let mut args = site_args(dir.path(), SiteMode::Catalog, false);
        args.lineage_b = "XBB.1.5".to_string();
        assert!(matches!(
            compute_frequencies(&args),
            Err(Error::MissingColumn(_))
        ));
    }
}
