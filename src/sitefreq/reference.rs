use crate::utils::{open_genome_reader, Error, InputSource, Result};
use rust_htslib::faidx;

/// The reference genome the reads were aligned against
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceSequence {
    pub name: String,
    seq: Vec<u8>,
}

impl ReferenceSequence {
    pub fn new(name: impl Into<String>, seq: &[u8]) -> Self {
        Self {
            name: name.into(),
            seq: seq.to_ascii_uppercase(),
        }
    }

    pub fn load(genome_src: &InputSource) -> Result<Self> {
        let reader = open_genome_reader(genome_src)?;
        Self::from_faidx(&reader)
            .map_err(|e| Error::UnreadableResource(genome_src.format_error("Invalid genome", e)))
    }

    /// Reads the first sequence of an indexed FASTA
    pub fn from_faidx(reader: &faidx::Reader) -> Result<Self> {
        let num_seqs = reader.n_seqs();
        if num_seqs == 0 {
            return Err(Error::UnreadableResource(
                "FASTA contains no sequences".to_string(),
            ));
        }
        if num_seqs > 1 {
            log::warn!("FASTA contains {} sequences, only the first is used", num_seqs);
        }

        let name = reader
            .seq_name(0)
            .map_err(|e| Error::UnreadableResource(e.to_string()))?;
        let len = reader.fetch_seq_len(&name);
        let len = u32::try_from(len).map_err(|_| {
            Error::UnreadableResource(format!("Invalid length for sequence '{}'", name))
        })?;
        if len == 0 {
            return Err(Error::UnreadableResource(format!(
                "Sequence '{}' is empty",
                name
            )));
        }

        let seq = reader
            .fetch_seq(&name, 0, len as usize - 1)
            .map_err(|e| {
                Error::UnreadableResource(format!("Error fetching sequence '{}': {}", name, e))
            })?;
        Ok(Self::new(name, &seq))
    }

    pub fn len(&self) -> u32 {
        self.seq.len() as u32
    }

    pub fn is_empty(&self) -> bool {
        self.seq.is_empty()
    }

    /// Upper-case base at a 0-based position
    pub fn base_at(&self, pos: u32) -> Option<u8> {
        self.seq.get(pos as usize).copied()
    }
}
