use anyhow::Result;
use clap::Parser;
use tracing::{error, info, warn};

use text_to_stereogram::config::Options;
use text_to_stereogram::{logging, pipeline, preview};

fn main() {
    logging::init();
    if let Err(err) = try_main() {
        error!(error = ?err, "text-to-stereogram exited with error");
        std::process::exit(1);
    }
}

fn try_main() -> Result<()> {
    let options = parse_options();
    let settings = options.validate()?;

    let canvas = pipeline::run(&settings)?;

    if let Some(path) = &settings.output_path {
        match pipeline::save_png(&canvas, path) {
            Ok(()) => info!(path = %path.display(), "wrote stereogram"),
            // A failed write is not fatal; the preview still runs.
            Err(err) => warn!(error = ?err, path = %path.display(), "unable to save PNG"),
        }
    }

    preview::show(&canvas)?;
    Ok(())
}

/// Parse the command line, keeping the documented exit codes: help and
/// version exit 0, any rejected input exits 1.
fn parse_options() -> Options {
    match Options::try_parse() {
        Ok(options) => options,
        Err(err) => {
            let code = if err.use_stderr() { 1 } else { 0 };
            let _ = err.print();
            std::process::exit(code);
        }
    }
}
