use crate::{
    sitefreq::{SiteMode, DEFAULT_MIN_BASE_QUALITY},
    utils::{Error, InputSource, Result},
};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use log::{Level, LevelFilter};
use owo_colors::{
    colors::{Blue, Green, Magenta, Red, Yellow},
    OwoColorize, Stream, Style,
};
use std::{
    io::Write,
    path::{Path, PathBuf},
};

pub const FULL_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "covmix",
          version = FULL_VERSION,
          about = "Lineage allele frequencies at informative sites of a viral alignment",
          long_about = None,
          disable_help_subcommand = true,
          help_template = "{name} {version}\n{about-section}\n{usage-heading}\n    {usage}\n\n{all-args}{after-help}",
          )]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
    /// Enable or disable color output in logging
    #[arg(long, value_enum, default_value_t = Color::Auto, global = true, help_heading = "Advanced")]
    color: Color,

    /// Specify multiple times to increase verbosity level (e.g., -vv for more verbosity)
    #[arg(
        short = 'v',
        long = "verbose",
        action = ArgAction::Count,
        global = true
    )]
    pub verbosity: u8,
}

#[derive(Subcommand)]
pub enum Command {
    #[clap(about = "Plot lineage allele frequencies as an SVG figure")]
    Plot(PlotArgs),
    #[clap(about = "Write lineage allele frequencies as a TSV table")]
    Table(TableArgs),
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Plot(_) => "plot",
            Command::Table(_) => "table",
        }
    }
}

/// Inputs and site selection shared by every subcommand
#[derive(Args, Debug, Clone)]
pub struct SiteArgs {
    /// Sorted and indexed BAM file
    #[arg(short = 'b', long = "bam", value_name = "BAM", required = true)]
    pub reads_src: InputSource,

    /// Reference genome FASTA the reads were aligned to (no bundled copy; a missing .fai is built)
    #[arg(short = 'g', long = "genome", value_name = "FASTA", required = true)]
    pub genome_src: InputSource,

    /// Tab-separated variant catalog with per-lineage alleles and _present flags (no bundled copy)
    #[arg(short = 'c', long = "catalog", value_name = "CATALOG", required = true)]
    pub catalog_src: InputSource,

    /// First lineage (catalog column name, e.g. BA.2)
    #[arg(short = '1', long = "variant-1", value_name = "LINEAGE", required = true)]
    pub lineage_a: String,

    /// Second lineage (catalog column name, e.g. BA.5)
    #[arg(short = '2', long = "variant-2", value_name = "LINEAGE", required = true)]
    pub lineage_b: String,

    /// Report all cataloged sites of either lineage, not only sites where the two differ
    #[arg(short = 'a', long = "all")]
    pub all_variants: bool,

    /// Scan the whole genome for sites where a minor allele reaches the threshold
    #[arg(short = 'm', long = "all-minor")]
    pub all_minor: bool,

    /// Fraction of reads an allele needs to count toward a minor-allele site (with --all-minor)
    #[arg(
        short = 'f',
        long = "minor-fraction",
        value_name = "FRACTION",
        default_value = "0.2",
        value_parser = ensure_unit_float
    )]
    pub minor_fraction: f64,

    /// Minimum depth of a minor-allele site (with --all-minor)
    #[arg(
        short = 'd',
        long = "minor-depth",
        value_name = "DEPTH",
        default_value = "20"
    )]
    pub minor_depth: u32,

    /// Reference sequence to query [default: first sequence of the FASTA]
    #[arg(long = "contig", value_name = "CONTIG", help_heading = "Advanced")]
    pub contig: Option<String>,

    /// Maximum number of reads counted per position
    #[arg(
        long = "max-depth",
        value_name = "MAX_DEPTH",
        default_value = "8000",
        value_parser = depth_in_range,
        help_heading = "Advanced"
    )]
    pub max_depth: u32,

    /// Bases below this Phred quality are not counted
    #[arg(
        long = "min-base-quality",
        value_name = "QUAL",
        default_value_t = DEFAULT_MIN_BASE_QUALITY,
        help_heading = "Advanced"
    )]
    pub min_base_quality: u8,

    /// Number of threads for decompressing the BAM file
    #[arg(
        long = "decompression-threads",
        value_name = "THREADS",
        default_value = "1",
        value_parser = threads_in_range,
        help_heading = "Advanced",
        hide = true
    )]
    pub decompression_threads: usize,
}

impl SiteArgs {
    pub fn site_mode(&self) -> SiteMode {
        if self.all_minor {
            SiteMode::MinorScan {
                min_fraction: self.minor_fraction,
                min_depth: self.minor_depth,
            }
        } else {
            SiteMode::Catalog
        }
    }

    pub fn preflight(&self) -> Result<()> {
        for lineage in [&self.lineage_a, &self.lineage_b] {
            if lineage.trim().is_empty() {
                return Err(Error::InvalidInput(
                    "Lineage names cannot be empty".to_string(),
                ));
            }
        }
        if self.lineage_a == self.lineage_b {
            log::warn!(
                "Both lineages are '{}'; every site will fall into the shared bucket",
                self.lineage_a
            );
        }
        if !self.all_minor && self.minor_depth != 20 {
            log::debug!("--minor-depth has no effect without --all-minor");
        }
        Ok(())
    }
}

#[derive(Parser, Debug)]
#[command(arg_required_else_help(true))]
pub struct PlotArgs {
    #[command(flatten)]
    pub sites: SiteArgs,

    /// Output SVG path
    #[arg(
        short = 'o',
        long = "output",
        value_name = "SVG",
        value_parser = check_image_path,
        required = true
    )]
    pub output_path: PathBuf,

    /// Add the base composition panel (A/T/C/G/deletion per site)
    #[arg(short = 'p', long = "panel3", help_heading = "Plotting")]
    pub show_bases: bool,

    /// Font family to use for text elements
    #[arg(long = "font-family", value_name = "FONT", help_heading = "Plotting")]
    pub font_family: Option<String>,
}

impl PlotArgs {
    pub fn preflight(&self) -> Result<()> {
        self.sites.preflight()
    }
}

#[derive(Parser, Debug)]
#[command(arg_required_else_help(true))]
pub struct TableArgs {
    #[command(flatten)]
    pub sites: SiteArgs,

    /// Write output to a file [standard output]
    #[arg(
        short = 'o',
        long = "output",
        value_name = "FILE",
        value_parser = check_prefix_path
    )]
    pub output_path: Option<PathBuf>,
}

impl TableArgs {
    pub fn preflight(&self) -> Result<()> {
        self.sites.preflight()
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Color {
    Always,
    Auto,
    Never,
}

impl Color {
    fn apply(self) {
        match self {
            Color::Always => owo_colors::set_override(true),
            Color::Auto => {}
            Color::Never => owo_colors::set_override(false),
        }
    }
}

pub fn init_verbose(args: &Cli) {
    args.color.apply();

    let filter_level: LevelFilter = match args.verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    env_logger::Builder::from_default_env()
        .format(format_log)
        .filter_level(filter_level)
        .init();
}

#[inline(always)]
fn level_style(level: Level) -> (&'static str, Style) {
    match level {
        Level::Error => ("ERROR", Style::new().fg::<Red>().bold()),
        Level::Warn => ("WARN", Style::new().fg::<Yellow>()),
        Level::Info => ("INFO", Style::new().fg::<Green>()),
        Level::Debug => ("DEBUG", Style::new().fg::<Blue>()),
        Level::Trace => ("TRACE", Style::new().fg::<Magenta>()),
    }
}

fn format_log(buf: &mut env_logger::fmt::Formatter, record: &log::Record) -> std::io::Result<()> {
    let (label, style) = level_style(record.level());
    let ts = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
    let painted_label = label.if_supports_color(Stream::Stderr, |t| style.style(t));
    writeln!(buf, "{ts} [{}] - {}", painted_label, record.args())
}

fn check_prefix_path(s: &str) -> std::result::Result<PathBuf, String> {
    let path = Path::new(s);
    if let Some(parent_dir) = path.parent() {
        if !parent_dir.as_os_str().is_empty() && !parent_dir.exists() {
            return Err(format!("Path does not exist: {}", parent_dir.display()));
        }
    }
    Ok(PathBuf::from(s))
}

fn check_image_path(s: &str) -> std::result::Result<PathBuf, String> {
    let prefix_check = check_prefix_path(s)?;
    match Path::new(s).extension().and_then(|ext| ext.to_str()) {
        Some("svg") => Ok(prefix_check),
        _ => Err("Image must have an extension of .svg".to_string()),
    }
}

fn threads_in_range(s: &str) -> std::result::Result<usize, String> {
    let thread: usize = s
        .parse()
        .map_err(|_| format!("`{}` is not a valid thread number", s))?;
    if thread >= 1 {
        Ok(thread)
    } else {
        Err("Number of threads must be at least 1".into())
    }
}

fn depth_in_range(s: &str) -> std::result::Result<u32, String> {
    let depth: u32 = s
        .parse()
        .map_err(|_| format!("`{}` is not a valid depth", s))?;
    if depth >= 1 && depth <= i32::MAX as u32 {
        Ok(depth)
    } else {
        Err(format!("Depth must be between 1 and {}", i32::MAX))
    }
}

fn ensure_unit_float(s: &str) -> std::result::Result<f64, String> {
    let value = s
        .parse::<f64>()
        .map_err(|e| format!("Could not parse float: {}", e))?;
    if !(0.0..=1.0).contains(&value) {
        Err(format!(
            "The value must be between 0.0 and 1.0, got: {}",
            value
        ))
    } else {
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn unit_float_bounds() {
        assert_eq!(ensure_unit_float("0.2"), Ok(0.2));
        assert!(ensure_unit_float("1.5").is_err());
        assert!(ensure_unit_float("abc").is_err());
    }

    #[test]
    fn image_path_needs_svg_extension() {
        assert!(check_image_path("figure.svg").is_ok());
        assert!(check_image_path("figure.png").is_err());
        assert!(check_image_path("/no/such/dir/figure.svg").is_err());
    }

    #[test]
    fn depth_limits() {
        assert_eq!(depth_in_range("8000"), Ok(8000));
        assert!(depth_in_range("0").is_err());
    }

    #[test]
    fn reference_and_catalog_must_be_supplied() {
        let cli = Cli::command();
        let table = cli.find_subcommand("table").unwrap();
        for id in ["genome_src", "catalog_src"] {
            let arg = table.get_arguments().find(|a| a.get_id() == id).unwrap();
            assert!(arg.is_required_set());
            let help = arg.get_help().unwrap().to_string();
            assert!(help.contains("no bundled copy"), "{id}: {help}");
        }
    }

    #[test]
    fn minor_flag_selects_scan_mode() {
        let dir = tempfile::tempdir().unwrap();
        let existing = dir.path().to_str().unwrap();
        let cli = Cli::try_parse_from([
            "covmix", "table", "-b", existing, "-g", existing, "-c", existing, "-1", "BA.2",
            "-2", "BA.5", "-m", "-f", "0.1", "-d", "50",
        ])
        .unwrap();
        let Command::Table(args) = cli.command else {
            panic!("expected table subcommand");
        };
        assert_eq!(
            args.sites.site_mode(),
            SiteMode::MinorScan {
                min_fraction: 0.1,
                min_depth: 50
            }
        );
        assert!(args.output_path.is_none());
        assert_eq!(args.sites.min_base_quality, DEFAULT_MIN_BASE_QUALITY);
    }
}
