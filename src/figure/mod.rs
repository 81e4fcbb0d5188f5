pub mod genes;
pub mod layout;
pub mod params;

pub use layout::plot_sites;
pub use params::{pick_params, PlotParams};
