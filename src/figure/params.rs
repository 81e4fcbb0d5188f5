use std::fmt;

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Color {
    LineageA,
    LineageB,
    Both,
    Other,
    Gene,
    Depth,
    BaseA,
    BaseT,
    BaseC,
    BaseG,
    BaseDel,
    White,
    Black,
}

impl fmt::Display for Color {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Color::LineageA => write!(formatter, "#7fa34a"),
            Color::LineageB => write!(formatter, "#9573c6"),
            Color::Both => write!(formatter, "#99566b"),
            Color::Other => write!(formatter, "#999999"),
            Color::Gene => write!(formatter, "#03a629"),
            Color::Depth => write!(formatter, "#3474eb"),
            Color::BaseA => write!(formatter, "#99566b"),
            Color::BaseT => write!(formatter, "#7fa34a"),
            Color::BaseC => write!(formatter, "#9573c6"),
            Color::BaseG => write!(formatter, "#cc6d41"),
            Color::BaseDel => write!(formatter, "#999999"),
            Color::White => write!(formatter, "#ffffff"),
            Color::Black => write!(formatter, "#000000"),
        }
    }
}

/// Stack order of the lineage bar: A, B, both, other
pub const LINEAGE_COLORS: [Color; 4] = [Color::LineageA, Color::LineageB, Color::Both, Color::Other];

/// Stack order of the base composition bar, with legend symbols
pub const BASE_COLORS: [(Color, &str); 5] = [
    (Color::BaseA, "A"),
    (Color::BaseT, "T"),
    (Color::BaseC, "C"),
    (Color::BaseG, "G"),
    (Color::BaseDel, "-"),
];

pub struct PlotParams {
    pub page_width: f64,
    pub page_height: f64,
    pub font_size: f64,
    pub show_bases: bool,
}

pub fn pick_params(num_sites: usize, show_bases: bool) -> PlotParams {
    let page_width = 210.0_f64.max(num_sites as f64 * 10.0);
    let page_height = if show_bases { 600.0 } else { 320.0 };
    let font_size = match num_sites {
        n if n > 15 => 4.0,
        n if n > 10 => 5.0,
        _ => 6.0,
    };
    PlotParams {
        page_width,
        page_height,
        font_size,
        show_bases,
    }
}
