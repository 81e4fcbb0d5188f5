/// A gene drawn on the genome map, half-open 1-based span as annotated
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gene {
    pub name: &'static str,
    pub start: u32,
    pub end: u32,
}

const fn gene(name: &'static str, start: u32, end: u32) -> Gene {
    Gene { name, start, end }
}

/// SARS-CoV-2 (MN908947.3) open reading frames
pub const SARS_COV_2_GENES: [Gene; 11] = [
    gene("ORF1a", 266, 13468),
    gene("ORF1b", 13468, 21555),
    gene("spike", 21563, 25384),
    gene("ORF3a", 25393, 26220),
    gene("E", 26245, 26472),
    gene("M", 26523, 27191),
    gene("ORF6", 27202, 27387),
    gene("ORF7a", 27394, 27759),
    gene("ORF8", 27894, 28259),
    gene("N", 28274, 29533),
    gene("ORF10", 29558, 29674),
];

impl Gene {
    pub fn len(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Genes that fit on a reference of `genome_len` bases
pub fn genes_within(genome_len: u32) -> impl Iterator<Item = &'static Gene> {
    SARS_COV_2_GENES
        .iter()
        .filter(move |gene| gene.end <= genome_len)
}
