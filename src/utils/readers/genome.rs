use crate::utils::{Error, InputSource, Result};
use rust_htslib::faidx;
use std::path::{Path, PathBuf};

/// Opens a FASTA through htslib, which builds a missing `.fai` index beside a local file
pub fn open_genome_reader(genome_src: &InputSource) -> Result<faidx::Reader> {
    if let InputSource::Local(p) = genome_src {
        let fai = faidx_path(p);
        if !fai.exists() {
            log::info!("Reference index {} not found, building it", fai.display());
        }
    }

    let reader = match genome_src {
        InputSource::Local(p) => faidx::Reader::from_path(p),
        InputSource::Remote(u) => faidx::Reader::from_url(u),
    }
    .map_err(|e| {
        Error::UnreadableResource(genome_src.format_error("Failed to open genome file from", e))
    })?;
    Ok(reader)
}

/// Index path htslib uses for `fasta`: the full file name with `.fai` appended
pub fn faidx_path(fasta: &Path) -> PathBuf {
    let mut name = fasta.as_os_str().to_owned();
    name.push(".fai");
    PathBuf::from(name)
}
