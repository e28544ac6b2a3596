// SPDX-License-Identifier: MIT OR Apache-2.0
//! Command line arguments.

use babylon_exporter_materials::OutputExtension;
use clap::Parser;
use std::path::PathBuf;

/// Export the materials of a document to babylon.js records
#[derive(Parser, Debug)]
#[command(name = "babylon_exporter", author, version, about)]
pub struct Cli {
    /// Document to export (RON)
    #[arg(value_name = "DOCUMENT")]
    pub document: PathBuf,

    /// Settings file; defaults to `export.ron` next to the document.
    #[arg(long, value_name = "FILE")]
    pub settings: Option<PathBuf>,

    /// Output path; defaults to the document path with the output extension.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Output extension: `json`, `babylon`, or any custom suffix.
    #[arg(long, value_name = "EXT", value_parser = parse_extension)]
    pub extension: Option<OutputExtension>,

    /// Keep constants next to textures so they can tint them.
    #[arg(long)]
    pub overload_channels: bool,

    /// Leave material output links in place while exporting.
    #[arg(long)]
    pub keep_output_links: bool,
}

/// Parse the process arguments
pub fn parse() -> Cli {
    Cli::parse()
}

/// Parse an `--extension` value
pub fn parse_extension(value: &str) -> Result<OutputExtension, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("extension must not be empty".to_string());
    }

    Ok(match trimmed.to_ascii_lowercase().as_str() {
        "json" | ".json" => OutputExtension::Json,
        "babylon" | "babylon.js" | ".babylon.js" => OutputExtension::Babylon,
        _ => OutputExtension::Custom(trimmed.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_extension() {
        assert_eq!(parse_extension("json"), Ok(OutputExtension::Json));
        assert_eq!(parse_extension(".babylon.js"), Ok(OutputExtension::Babylon));
        assert_eq!(
            parse_extension("bjs"),
            Ok(OutputExtension::Custom("bjs".to_string()))
        );
        assert!(parse_extension("  ").is_err());
    }

    #[test]
    fn test_cli_flags() {
        let cli = Cli::try_parse_from([
            "babylon_exporter",
            "scene.ron",
            "--overload-channels",
            "--extension",
            "babylon",
        ])
        .unwrap();
        assert_eq!(cli.document, PathBuf::from("scene.ron"));
        assert!(cli.overload_channels);
        assert!(!cli.keep_output_links);
        assert_eq!(cli.extension, Some(OutputExtension::Babylon));
        assert!(cli.output.is_none());
    }
}
