mod error;
pub mod input_source;
mod readers;
#[cfg(test)]
pub mod test_util;

pub use error::{handle_error_and_exit, Error, Result};
pub use input_source::InputSource;
pub use readers::{open_bam_reader, open_catalog_reader, open_genome_reader};
