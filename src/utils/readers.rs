mod bam;
mod catalog;
mod genome;

pub use bam::open_bam_reader;
pub use catalog::open_catalog_reader;
pub use genome::open_genome_reader;
