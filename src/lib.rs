pub mod cli;
pub mod commands;
pub mod figure;
pub mod sitefreq;
pub mod utils;
