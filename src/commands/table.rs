use crate::cli::TableArgs;
use crate::commands::compute_frequencies;
use crate::sitefreq::write_table;
use crate::utils::{Error, Result};
use std::{
    fs::File,
    io::{self, BufWriter},
};

pub fn table(args: TableArgs) -> Result<()> {
    let (table, _) = compute_frequencies(&args.sites)?;
    match &args.output_path {
        Some(path) => {
            let file = File::create(path).map_err(|e| {
                Error::Output(format!("Failed to create {}: {}", path.display(), e))
            })?;
            write_table(&table, BufWriter::new(file))?;
            log::info!("Wrote {} sites to {}", table.len(), path.display());
        }
        None => write_table(&table, io::stdout().lock())?,
    }
    Ok(())
}
