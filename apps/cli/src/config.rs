//! Command-line flags and the optional YAML run configuration.

use anyhow::{Context, Result};
use oil_core::SimConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Parsed flags. Unknown flags and unparsable values are ignored.
#[derive(Debug, Default, PartialEq)]
pub struct CliArgs {
    pub oil: Option<String>,
    pub choice: Option<String>,
    pub seed: Option<u64>,
    pub start: Option<i32>,
    pub end: Option<i32>,
    pub config: Option<PathBuf>,
    pub out_dir: Option<PathBuf>,
    pub summary_json: Option<PathBuf>,
    pub no_chart: bool,
    pub version: bool,
}

pub fn parse_args<I>(args: I) -> CliArgs
where
    I: IntoIterator<Item = String>,
{
    let mut parsed = CliArgs::default();
    let mut it = args.into_iter();
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--oil" => parsed.oil = it.next(),
            "--choice" => parsed.choice = it.next(),
            "--seed" => parsed.seed = it.next().and_then(|s| s.parse().ok()),
            "--start" => parsed.start = it.next().and_then(|s| s.parse().ok()),
            "--end" => parsed.end = it.next().and_then(|s| s.parse().ok()),
            "--config" => parsed.config = it.next().map(PathBuf::from),
            "--out-dir" => parsed.out_dir = it.next().map(PathBuf::from),
            "--summary-json" => parsed.summary_json = it.next().map(PathBuf::from),
            "--no-chart" => parsed.no_chart = true,
            "--version" | "-V" => parsed.version = true,
            _ => {}
        }
    }
    parsed
}

/// Settings of one run, as read from YAML. Missing keys take defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub start_year: i32,
    pub end_year: i32,
    pub seed: Option<u64>,
    pub output_dir: PathBuf,
    pub chart: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        let sim = SimConfig::default();
        Self {
            start_year: sim.start_year,
            end_year: sim.end_year,
            seed: sim.seed,
            output_dir: PathBuf::from("."),
            chart: true,
        }
    }
}

impl RunConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_yaml::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Command-line flags win over file values.
    pub fn with_overrides(mut self, args: &CliArgs) -> Self {
        if let Some(start) = args.start {
            self.start_year = start;
        }
        if let Some(end) = args.end {
            self.end_year = end;
        }
        if args.seed.is_some() {
            self.seed = args.seed;
        }
        if let Some(dir) = &args.out_dir {
            self.output_dir = dir.clone();
        }
        if args.no_chart {
            self.chart = false;
        }
        self
    }

    pub fn sim_config(&self) -> SimConfig {
        SimConfig {
            start_year: self.start_year,
            end_year: self.end_year,
            seed: self.seed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> CliArgs {
        parse_args(list.iter().map(|s| s.to_string()))
    }

    #[test]
    fn flags_are_parsed() {
        let a = args(&[
            "--oil",
            "Menthe Poivrée",
            "--seed",
            "42",
            "--start",
            "2005",
            "--end",
            "2010",
            "--no-chart",
            "--summary-json",
            "out/summary.json",
        ]);
        assert_eq!(a.oil.as_deref(), Some("Menthe Poivrée"));
        assert_eq!(a.seed, Some(42));
        assert_eq!((a.start, a.end), (Some(2005), Some(2010)));
        assert!(a.no_chart);
        assert_eq!(a.summary_json, Some(PathBuf::from("out/summary.json")));
        assert!(!a.version);
    }

    #[test]
    fn unknown_flags_and_bad_values_are_ignored() {
        let a = args(&["--frobnicate", "--seed", "not-a-number", "--version", "--choice"]);
        assert_eq!(a.seed, None);
        assert!(a.version);
        assert_eq!(a.choice, None);
        assert_eq!(args(&[]), CliArgs::default());
    }

    #[test]
    fn yaml_fills_missing_keys_with_defaults() {
        let cfg: RunConfig = serde_yaml::from_str("end_year: 2030\nseed: 9\n").unwrap();
        assert_eq!(cfg.start_year, 2000);
        assert_eq!(cfg.end_year, 2030);
        assert_eq!(cfg.seed, Some(9));
        assert!(cfg.chart);
        assert_eq!(cfg.output_dir, PathBuf::from("."));
    }

    #[test]
    fn flags_override_file() {
        let file: RunConfig =
            serde_yaml::from_str("start_year: 1990\nseed: 1\noutput_dir: data\nchart: true\n")
                .unwrap();
        let merged = file.with_overrides(&args(&["--seed", "5", "--no-chart"]));
        assert_eq!(merged.start_year, 1990);
        assert_eq!(merged.seed, Some(5));
        assert_eq!(merged.output_dir, PathBuf::from("data"));
        assert!(!merged.chart);
        assert_eq!(
            merged.sim_config(),
            SimConfig {
                start_year: 1990,
                end_year: 2025,
                seed: Some(5)
            }
        );
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = RunConfig::load(&dir.path().join("absent.yaml")).unwrap_err();
        assert!(err.to_string().contains("reading config"));

        let path = dir.path().join("run.yaml");
        fs::write(&path, "start_year: 2010\nend_year: 2012\n").unwrap();
        let cfg = RunConfig::load(&path).unwrap();
        assert_eq!(cfg.sim_config().year_count(), 3);
    }
}
