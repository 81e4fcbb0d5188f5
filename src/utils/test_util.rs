use crate::sitefreq::{PileupSource, ReadObservation};
use crate::utils::Result;
use rust_htslib::bam::{
    self,
    header::HeaderRecord,
    record::{Cigar, CigarString},
};
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

/// Pileup columns held in memory, keyed by 0-based position
#[derive(Default)]
pub struct MemoryPileup {
    columns: BTreeMap<u32, Vec<ReadObservation>>,
}

impl MemoryPileup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_column(mut self, pos: u32, observations: &[(ReadObservation, usize)]) -> Self {
        let column = self.columns.entry(pos).or_default();
        for &(obs, count) in observations {
            column.extend(std::iter::repeat(obs).take(count));
        }
        self
    }
}

impl PileupSource for MemoryPileup {
    fn column(&mut self, pos: u32) -> Result<Vec<ReadObservation>> {
        Ok(self.columns.get(&pos).cloned().unwrap_or_default())
    }

    fn for_each_column(
        &mut self,
        visit: &mut dyn FnMut(u32, &[ReadObservation]) -> Result<()>,
    ) -> Result<()> {
        for (pos, observations) in &self.columns {
            visit(*pos, observations)?;
        }
        Ok(())
    }
}

/// Builds catalog text with the standard column layout for a set of lineages
pub struct TestCatalogBuilder {
    lineages: Vec<String>,
    rows: Vec<String>,
}

impl TestCatalogBuilder {
    pub fn new(lineages: &[&str]) -> Self {
        Self {
            lineages: lineages.iter().map(|s| s.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    /// `per_lineage` holds `(allele, present_flag)` in lineage order
    pub fn row(mut self, label: &str, pos: u32, per_lineage: &[(&str, &str)]) -> Self {
        let alleles = per_lineage.iter().map(|(allele, _)| *allele);
        let flags = per_lineage.iter().map(|(_, flag)| *flag);
        let fields: Vec<String> = [pos.to_string(), label.to_string()]
            .into_iter()
            .chain(alleles.map(str::to_string))
            .chain(flags.map(str::to_string))
            .collect();
        self.rows.push(fields.join("\t"));
        self
    }

    pub fn build(&self) -> String {
        let mut header = vec!["Nucleotide position".to_string(), "aa_SNP".to_string()];
        header.extend(self.lineages.iter().cloned());
        header.extend(self.lineages.iter().map(|l| format!("{l}_present")));

        let mut text = header.join("\t");
        text.push('\n');
        for row in &self.rows {
            text.push_str(row);
            text.push('\n');
        }
        text
    }

    pub fn write(&self, dir: &Path) -> PathBuf {
        let path = dir.join("variants.tsv");
        fs::write(&path, self.build()).unwrap();
        path
    }
}

/// Writes a single-line FASTA together with its .fai index
pub fn write_indexed_fasta(dir: &Path, name: &str, seq: &[u8]) -> PathBuf {
    let path = dir.join("reference.fasta");
    let mut content = format!(">{}\n", name).into_bytes();
    content.extend_from_slice(seq);
    content.push(b'\n');
    fs::write(&path, content).unwrap();

    let offset = name.len() + 2;
    let fai = format!(
        "{}\t{}\t{}\t{}\t{}\n",
        name,
        seq.len(),
        offset,
        seq.len(),
        seq.len() + 1
    );
    fs::write(dir.join("reference.fasta.fai"), fai).unwrap();
    path
}

#[derive(Clone)]
pub struct TestRead {
    pos: i64,
    cigar: Vec<Cigar>,
    seq: Vec<u8>,
    name: Option<String>,
    quality: u8,
}

impl TestRead {
    pub fn matching(pos: i64, seq: &[u8]) -> Self {
        Self {
            pos,
            cigar: vec![Cigar::Match(seq.len() as u32)],
            seq: seq.to_vec(),
            name: None,
            quality: 30,
        }
    }

    /// Shares `name` with every other read of the same fragment
    pub fn named(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    /// Phred quality given to every base
    pub fn quality(mut self, quality: u8) -> Self {
        self.quality = quality;
        self
    }

    /// `left`, one deleted reference base, then `right`
    pub fn with_deletion(pos: i64, left: &[u8], right: &[u8]) -> Self {
        Self::split(pos, left, Cigar::Del(1), right)
    }

    /// `left`, one skipped reference base, then `right`
    pub fn with_refskip(pos: i64, left: &[u8], right: &[u8]) -> Self {
        Self::split(pos, left, Cigar::RefSkip(1), right)
    }

    fn split(pos: i64, left: &[u8], gap: Cigar, right: &[u8]) -> Self {
        Self {
            pos,
            cigar: vec![
                Cigar::Match(left.len() as u32),
                gap,
                Cigar::Match(right.len() as u32),
            ],
            seq: [left, right].concat(),
            name: None,
            quality: 30,
        }
    }
}

/// Writes a coordinate-sorted, indexed BAM over a single contig
pub struct TestBamBuilder {
    contig: String,
    length: u64,
    reads: Vec<TestRead>,
}

impl TestBamBuilder {
    pub fn new(contig: &str, length: u64) -> Self {
        Self {
            contig: contig.to_string(),
            length,
            reads: Vec::new(),
        }
    }

    pub fn read(mut self, read: TestRead) -> Self {
        self.reads.push(read);
        self
    }

    pub fn reads(mut self, read: TestRead, count: usize) -> Self {
        self.reads.extend(std::iter::repeat(read).take(count));
        self
    }

    pub fn write(mut self, dir: &Path) -> PathBuf {
        let path = dir.join("reads.bam");
        let mut header = bam::Header::new();
        let mut sq = HeaderRecord::new(b"SQ");
        sq.push_tag(b"SN", &self.contig);
        sq.push_tag(b"LN", &self.length);
        header.push_record(&sq);

        self.reads.sort_by_key(|read| read.pos);
        {
            let mut writer = bam::Writer::from_path(&path, &header, bam::Format::Bam).unwrap();
            for (index, read) in self.reads.iter().enumerate() {
                let qname = read.name.clone().unwrap_or_else(|| format!("read{}", index));
                let qual = vec![read.quality; read.seq.len()];
                let mut record = bam::Record::new();
                record.set(
                    qname.as_bytes(),
                    Some(&CigarString(read.cigar.clone())),
                    &read.seq,
                    &qual,
                );
                record.set_flags(0);
                record.set_tid(0);
                record.set_pos(read.pos);
                record.set_mapq(60);
                record.set_mtid(-1);
                record.set_mpos(-1);
                writer.write(&record).unwrap();
            }
        }
        bam::index::build(&path, None, bam::index::Type::Bai, 1).unwrap();
        path
    }
}
