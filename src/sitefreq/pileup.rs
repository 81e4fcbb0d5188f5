//! Per-column base counting over aligned reads.

use crate::utils::{Error, Result};
use rust_htslib::bam::{
    self,
    pileup::{Alignment, Pileup},
    Read,
};
use std::collections::HashSet;

/// State of one read at one reference column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadObservation {
    Base(u8),
    Deletion,
    /// Spliced/skipped reference; contributes nothing to depth
    RefSkip,
}

/// Allele classes tracked at a column. `N` is kept apart; any other ambiguity code
/// (R, Y, ...) shares `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Allele {
    A,
    T,
    C,
    G,
    Del,
    N,
    Other,
}

impl Allele {
    pub const ALL: [Allele; 7] = [
        Allele::A,
        Allele::T,
        Allele::C,
        Allele::G,
        Allele::Del,
        Allele::N,
        Allele::Other,
    ];

    pub fn from_base(base: u8) -> Self {
        match base.to_ascii_uppercase() {
            b'A' => Allele::A,
            b'T' => Allele::T,
            b'C' => Allele::C,
            b'G' => Allele::G,
            b'-' => Allele::Del,
            b'N' => Allele::N,
            _ => Allele::Other,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Allele::A => "A",
            Allele::T => "T",
            Allele::C => "C",
            Allele::G => "G",
            Allele::Del => "-",
            Allele::N => "N",
            Allele::Other => "?",
        }
    }

    /// Whether this allele is the catalog allele `expected` (already upper-cased).
    /// Ambiguous calls (`N` and the pooled `Other`) never match.
    pub fn matches(self, expected: &str) -> bool {
        !matches!(self, Allele::N | Allele::Other) && self.symbol() == expected
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Read counts per allele at a single reference column
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BaseCounts {
    counts: [u32; Allele::ALL.len()],
}

impl BaseCounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_observations<'a, I>(observations: I) -> Self
    where
        I: IntoIterator<Item = &'a ReadObservation>,
    {
        let mut counts = Self::new();
        for obs in observations {
            counts.observe(*obs);
        }
        counts
    }

    pub fn observe(&mut self, obs: ReadObservation) {
        match obs {
            ReadObservation::Base(base) => self.add(Allele::from_base(base), 1),
            ReadObservation::Deletion => self.add(Allele::Del, 1),
            ReadObservation::RefSkip => {}
        }
    }

    pub fn add(&mut self, allele: Allele, count: u32) {
        self.counts[allele.index()] += count;
    }

    pub fn get(&self, allele: Allele) -> u32 {
        self.counts[allele.index()]
    }

    /// Reads contributing a base or a deletion
    pub fn depth(&self) -> u32 {
        self.counts.iter().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Allele, u32)> + '_ {
        Allele::ALL.iter().map(move |&allele| (allele, self.get(allele)))
    }
}

/// Provider of read pileups over a single reference sequence.
///
/// Positions are 0-based reference coordinates.
pub trait PileupSource {
    /// Observations of every read overlapping `pos`; empty when nothing covers it.
    fn column(&mut self, pos: u32) -> Result<Vec<ReadObservation>>;

    /// Visits every covered column once, in ascending position order.
    fn for_each_column(
        &mut self,
        visit: &mut dyn FnMut(u32, &[ReadObservation]) -> Result<()>,
    ) -> Result<()>;
}

/// Counts the alleles observed at `pos`. Reference skips are ignored.
pub fn count_bases<S: PileupSource + ?Sized>(pos: u32, source: &mut S) -> Result<BaseCounts> {
    let observations = source.column(pos)?;
    Ok(BaseCounts::from_observations(&observations))
}

/// Quality floor applied to aligned bases unless overridden
pub const DEFAULT_MIN_BASE_QUALITY: u8 = 13;

/// Pileups from an indexed BAM/CRAM restricted to one contig.
///
/// Bases below the quality floor are dropped and overlapping mates of a fragment
/// are counted once.
pub struct BamPileupSource {
    reader: bam::IndexedReader,
    contig: String,
    max_depth: u32,
    min_base_quality: u8,
}

impl BamPileupSource {
    pub fn new(reader: bam::IndexedReader, contig: &str, max_depth: u32) -> Result<Self> {
        if reader.header().tid(contig.as_bytes()).is_none() {
            return Err(Error::UnreadableResource(format!(
                "Contig '{}' is not present in the alignment header",
                contig
            )));
        }
        Ok(Self {
            reader,
            contig: contig.to_string(),
            max_depth,
            min_base_quality: DEFAULT_MIN_BASE_QUALITY,
        })
    }

    pub fn min_base_quality(mut self, min_base_quality: u8) -> Self {
        self.min_base_quality = min_base_quality;
        self
    }
}

/// State of one read at the column; `None` for a base under the quality floor
fn observe(alignment: &Alignment, min_base_quality: u8) -> Option<ReadObservation> {
    // htslib also flags reference skips as deletions
    if alignment.is_refskip() {
        return Some(ReadObservation::RefSkip);
    }
    if alignment.is_del() {
        return Some(ReadObservation::Deletion);
    }
    match alignment.qpos() {
        Some(qpos) => {
            let record = alignment.record();
            if record.qual()[qpos] < min_base_quality {
                return None;
            }
            let base = record.seq()[qpos];
            Some(ReadObservation::Base(base.to_ascii_uppercase()))
        }
        None => Some(ReadObservation::RefSkip),
    }
}

fn collect_column(
    pileup: &Pileup,
    min_base_quality: u8,
    observations: &mut Vec<ReadObservation>,
) {
    observations.clear();
    let mut fragments: HashSet<Vec<u8>> = HashSet::new();
    for alignment in pileup.alignments() {
        let Some(obs) = observe(&alignment, min_base_quality) else {
            continue;
        };
        if obs != ReadObservation::RefSkip
            && !fragments.insert(alignment.record().qname().to_vec())
        {
            continue;
        }
        observations.push(obs);
    }
}

fn pileup_error(contig: &str, e: rust_htslib::errors::Error) -> Error {
    Error::UnreadableResource(format!("Failed to read pileup on {}: {}", contig, e))
}

impl PileupSource for BamPileupSource {
    fn column(&mut self, pos: u32) -> Result<Vec<ReadObservation>> {
        let start = pos as i64;
        self.reader
            .fetch((self.contig.as_str(), start, start + 1))
            .map_err(|e| pileup_error(&self.contig, e))?;

        let mut pileups = self.reader.pileup();
        pileups.set_max_depth(self.max_depth);

        let mut observations = Vec::new();
        for pileup in pileups {
            let pileup = pileup.map_err(|e| pileup_error(&self.contig, e))?;
            if pileup.pos() == pos {
                collect_column(&pileup, self.min_base_quality, &mut observations);
                break;
            }
        }
        Ok(observations)
    }

    fn for_each_column(
        &mut self,
        visit: &mut dyn FnMut(u32, &[ReadObservation]) -> Result<()>,
    ) -> Result<()> {
        self.reader
            .fetch(self.contig.as_str())
            .map_err(|e| pileup_error(&self.contig, e))?;

        let mut pileups = self.reader.pileup();
        pileups.set_max_depth(self.max_depth);

        let mut observations = Vec::new();
        for pileup in pileups {
            let pileup = pileup.map_err(|e| pileup_error(&self.contig, e))?;
            collect_column(&pileup, self.min_base_quality, &mut observations);
            visit(pileup.pos(), &observations)?;
        }
        Ok(())
    }
}
