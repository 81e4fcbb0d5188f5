use crate::cli::PlotArgs;
use crate::commands::compute_frequencies;
use crate::figure::{pick_params, plot_sites};
use crate::utils::{Error, Result};
use stackplot::generate_image;

pub fn plot(args: PlotArgs) -> Result<()> {
    let (table, reference) = compute_frequencies(&args.sites)?;
    let params = pick_params(table.len(), args.show_bases);
    let mut figure = plot_sites(
        &table,
        &reference,
        (&args.sites.lineage_a, &args.sites.lineage_b),
        &params,
    );

    if let Some(font_family) = args.font_family {
        figure.set_font_family(&font_family);
    }

    generate_image(&figure, &args.output_path).map_err(Error::Output)?;
    log::info!(
        "Plotted {} sites to {}",
        table.len(),
        args.output_path.display()
    );
    Ok(())
}
