// SPDX-License-Identifier: MIT OR Apache-2.0
//! babylon.js material exporter
//!
//! Loads an authoring document, resolves the principled node of every
//! material into a flat record, and writes the records as JSON. Material
//! output links are severed during the run and restored afterwards.

mod cli;
mod run;

fn main() {
    let cli = cli::parse();

    let settings = run::load_settings(&cli);
    let filter = settings
        .as_ref()
        .map_or("info", |s| s.log_filter.as_str())
        .to_string();
    run::initialise_tracing(&filter);

    tracing::info!("Starting babylon.js exporter v{}", env!("CARGO_PKG_VERSION"));

    let result = settings.and_then(|settings| run::run(&cli, &settings));
    match result {
        Ok(summary) => tracing::debug!("Export finished: {:?}", summary),
        Err(e) => {
            tracing::error!("Export failed: {e}");
            std::process::exit(1);
        }
    }
}
