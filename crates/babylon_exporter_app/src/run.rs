// SPDX-License-Identifier: MIT OR Apache-2.0
//! Export run driven from the command line.

use crate::cli::Cli;
use babylon_exporter_graph::{Document, DocumentError};
use babylon_exporter_materials::{
    export_materials, ExportSettings, ExportSummary, ExportedMaterial, SettingsError,
};
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Driver errors
#[derive(Debug, Error)]
pub enum AppError {
    /// Document could not be loaded
    #[error("Failed to load document {path:?}: {source}")]
    Document {
        /// Document path
        path: PathBuf,
        /// Cause
        source: DocumentError,
    },

    /// Settings could not be loaded
    #[error("Failed to load settings {path:?}: {source}")]
    Settings {
        /// Settings path
        path: PathBuf,
        /// Cause
        source: SettingsError,
    },

    /// Records could not be encoded
    #[error("Failed to encode materials: {0}")]
    Encode(#[from] serde_json::Error),

    /// Output could not be written
    #[error("Failed to write {path:?}: {source}")]
    Write {
        /// Output path
        path: PathBuf,
        /// Cause
        source: std::io::Error,
    },
}

/// Written file layout
#[derive(Serialize)]
struct ExportFile<'a> {
    materials: &'a [ExportedMaterial],
}

/// Install the log subscriber; `RUST_LOG` wins over the settings filter
pub fn initialise_tracing(default_filter: &str) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}

/// Settings path used for a run
pub fn settings_path(cli: &Cli) -> PathBuf {
    cli.settings.clone().unwrap_or_else(|| {
        let dir = cli.document.parent().unwrap_or_else(|| Path::new("."));
        ExportSettings::settings_file_path(dir)
    })
}

/// Load the settings file and apply command line overrides
pub fn load_settings(cli: &Cli) -> Result<ExportSettings, AppError> {
    let path = settings_path(cli);
    let mut settings = if cli.settings.is_some() {
        ExportSettings::load(&path)
    } else {
        ExportSettings::load_or_default(&path)
    }
    .map_err(|source| AppError::Settings { path, source })?;

    if cli.overload_channels {
        settings.overload_channels = true;
    }
    if cli.keep_output_links {
        settings.sever_output_connections = false;
    }
    if let Some(extension) = &cli.extension {
        settings.extension = extension.clone();
    }
    Ok(settings)
}

/// Output path used for a run
pub fn output_path(cli: &Cli, settings: &ExportSettings) -> PathBuf {
    cli.output
        .clone()
        .unwrap_or_else(|| settings.extension.apply(&cli.document))
}

/// Export every material of the document and write the records
pub fn run(cli: &Cli, settings: &ExportSettings) -> Result<ExportSummary, AppError> {
    let mut document = Document::load(&cli.document).map_err(|source| AppError::Document {
        path: cli.document.clone(),
        source,
    })?;

    let export = export_materials(&mut document, settings);
    let json = serde_json::to_string_pretty(&ExportFile {
        materials: &export.materials,
    })?;

    let path = output_path(cli, settings);
    std::fs::write(&path, json).map_err(|source| AppError::Write {
        path: path.clone(),
        source,
    })?;

    tracing::info!("Exported {} material(s) to {:?}", export.materials.len(), path);
    for material in export.materials.iter().filter(|m| m.record.must_bake.any()) {
        tracing::info!("Material '{}' needs a bake pass", material.name);
    }
    Ok(export.summary)
}
