use clap::Parser;
use covmix::{
    cli::{init_verbose, Cli, Command, FULL_VERSION},
    commands::{plot, table},
    utils::{handle_error_and_exit, Result},
};
use std::{env, time};

fn disable_htslib_logging() {
    if env::var_os("COVMIX_ENABLE_HTSLIB_LOGGING").is_some() {
        log::debug!("COVMIX_ENABLE_HTSLIB_LOGGING is set, keeping htslib logging enabled");
        return;
    }
    unsafe {
        use rust_htslib::htslib::{htsLogLevel_HTS_LOG_OFF, hts_set_log_level};
        hts_set_log_level(htsLogLevel_HTS_LOG_OFF);
    }
}

fn runner() -> Result<()> {
    let cli = Cli::parse();
    init_verbose(&cli);
    disable_htslib_logging();
    log::info!(
        "Running {}-{} [{}]",
        env!("CARGO_PKG_NAME"),
        FULL_VERSION,
        cli.command.name()
    );

    let start_timer = time::Instant::now();
    match cli.command {
        Command::Plot(args) => {
            log::trace!("Plot arguments: {:#?}", args);
            args.preflight()?;
            plot::plot(args)?
        }
        Command::Table(args) => {
            log::trace!("Table arguments: {:#?}", args);
            args.preflight()?;
            table::table(args)?
        }
    }

    log::info!("Total execution time: {:.2?}", start_timer.elapsed());
    log::info!("{} end", env!("CARGO_PKG_NAME"));
    Ok(())
}

fn main() {
    if let Err(e) = runner() {
        handle_error_and_exit(e);
    }
}
