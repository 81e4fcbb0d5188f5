use crate::utils::{Error, InputSource, Result};
use rust_htslib::bgzf;
use std::io::BufReader;

/// Handles both plain-text and bgzip/gzip compressed tables
pub type CatalogReader = BufReader<bgzf::Reader>;
const BUFFER_CAPACITY: usize = 128 * 1024;

pub fn open_catalog_reader(src: &InputSource) -> Result<CatalogReader> {
    let inner = match src {
        InputSource::Local(p) => bgzf::Reader::from_path(p),
        InputSource::Remote(u) => bgzf::Reader::from_url(u),
    }
    .map_err(|e| Error::UnreadableResource(src.format_error("Failed to open catalog from", e)))?;
    Ok(BufReader::with_capacity(BUFFER_CAPACITY, inner))
}
