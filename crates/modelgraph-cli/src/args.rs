//! Command-line argument definitions for the modelgraph CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments select the model files to analyze, the output
//! paths, an optional starting declaration, configuration file selection, and
//! logging verbosity.

use clap::Parser;

/// Command-line arguments for the modelgraph dependency tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Paths to the JSON model files
    #[arg(required = true, help = "Paths to the input model files")]
    pub inputs: Vec<String>,

    /// Path to the output flowchart file
    #[arg(short, long, default_value = "graph.mmd")]
    pub output: String,

    /// Restrict the graph to the declarations connected to this identifier
    #[arg(short, long)]
    pub start: Option<String>,

    /// Also write the connected part of the model as JSON to this path
    #[arg(long, requires = "start")]
    pub subset: Option<String>,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["modelgraph", "a.json", "b.json"]).unwrap();

        assert_eq!(args.inputs, ["a.json", "b.json"]);
        assert_eq!(args.output, "graph.mmd");
        assert_eq!(args.log_level, "info");
        assert!(args.start.is_none());
    }

    #[test]
    fn test_subset_requires_start() {
        let result = Args::try_parse_from(["modelgraph", "a.json", "--subset", "out.json"]);
        assert!(result.is_err());

        let args = Args::try_parse_from([
            "modelgraph",
            "a.json",
            "--start",
            "org.a@1.0.0.Base",
            "--subset",
            "out.json",
        ])
        .unwrap();
        assert_eq!(args.subset.as_deref(), Some("out.json"));
    }

    #[test]
    fn test_inputs_required() {
        assert!(Args::try_parse_from(["modelgraph"]).is_err());
    }
}
