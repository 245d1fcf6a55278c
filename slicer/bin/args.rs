use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use common::config::{JoinStrategy, SliceConfig};

#[derive(Debug, Parser)]
/// Slices meshes into stacks of layers and writes them out as SVG.
pub struct Args {
    #[arg(short, long)]
    /// Thickness of each slice, in mesh units.
    pub size: Option<f64>,
    #[arg(short, long)]
    /// Number of slices to cut each mesh into. Overrides --size.
    pub number: Option<usize>,
    #[arg(short, long)]
    /// Directory to write the output to. Defaults to the directory of each
    /// input file.
    pub directory: Option<PathBuf>,
    #[arg(short, long)]
    /// Only print warnings and errors.
    pub quiet: bool,

    #[arg(long)]
    /// Number of threads used for slicing, zero uses every core.
    pub workers: Option<usize>,
    #[arg(long)]
    /// How to join segments sharing a start point (last-writer or
    /// branching).
    pub join: Option<JoinStrategy>,
    #[arg(long)]
    /// Nest the holes of each layer inside their outer boundaries.
    pub nest: bool,
    #[arg(long)]
    /// TOML file with slice settings. Flags take precedence over it.
    pub config: Option<PathBuf>,
    #[arg(long)]
    /// Also render every layer to a PNG image, in a directory next to the
    /// SVG.
    pub png: bool,

    #[arg(required = true)]
    /// Mesh files to slice (.stl or .obj).
    pub files: Vec<PathBuf>,
}

impl Args {
    /// Combines the config file, if any, with the command line flags.
    pub fn slice_config(&self) -> Result<SliceConfig> {
        if self.size.is_none() && self.number.is_none() && self.config.is_none() {
            bail!("must specify slice thickness or count, try --help");
        }

        if self.number == Some(0) {
            bail!("slice count must be at least one");
        }

        let mut config = match &self.config {
            Some(path) => SliceConfig::load(path)
                .with_context(|| format!("Failed to load config `{}`", path.display()))?,
            None => SliceConfig::default(),
        };

        if let Some(size) = self.size {
            config.step = size;
        }
        if let Some(workers) = self.workers {
            config.workers = workers;
        }
        if let Some(join) = self.join {
            config.join = join;
        }
        config.nest_polygons |= self.nest;

        Ok(config)
    }

    /// Layer thickness for a mesh spanning `height` units.
    pub fn step(&self, config: &SliceConfig, height: f64) -> f64 {
        match self.number {
            Some(number) => height / number as f64,
            None => config.step,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(["slicer"].iter().chain(args)).unwrap()
    }

    #[test]
    fn needs_size_or_number() {
        assert!(parse(&["bunny.stl"]).slice_config().is_err());
        assert!(parse(&["-n", "0", "bunny.stl"]).slice_config().is_err());
        assert!(Args::try_parse_from(["slicer", "-s", "0.1"]).is_err());
    }

    #[test]
    fn flags_override_defaults() {
        let args = parse(&["-s", "0.5", "--workers", "3", "--join", "branching", "a.stl"]);
        let config = args.slice_config().unwrap();
        assert_eq!(config.step, 0.5);
        assert_eq!(config.workers, 3);
        assert_eq!(config.join, JoinStrategy::Branching);
        assert!(!config.nest_polygons);
        assert_eq!(args.step(&config, 10.0), 0.5);
    }

    #[test]
    fn number_divides_height() {
        let args = parse(&["-q", "-n", "4", "a.stl", "b.obj"]);
        let config = args.slice_config().unwrap();
        assert_eq!(args.step(&config, 10.0), 2.5);
        assert_eq!(args.files.len(), 2);
        assert!(args.quiet);
    }
}
