#![deny(warnings)]

//! Interactive CLI: pick an oil, simulate its metrics, export CSV and PNG,
//! print the insight summary.

mod config;

use anyhow::{Context, Result};
use config::{parse_args, CliArgs, RunConfig};
use oil_core::{menu_entry, validate_config, Metric, Oil, SeriesTable, DEFAULT_OIL, MENU};
use std::fs;
use std::io::{self, BufRead, Write};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const PREVIEW_ROWS: usize = 5;
const PREVIEW_METRICS: [Metric; 4] = [
    Metric::Production,
    Metric::Price,
    Metric::TherapeuticEfficacy,
    Metric::Studies,
];

fn print_menu<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "=== SIMULATEUR PHARMACOPÉE - HUILES ESSENTIELLES ===")?;
    writeln!(out, "Huiles essentielles disponibles:")?;
    for (i, name) in MENU.iter().enumerate() {
        writeln!(out, "{:>2}. {name}", i + 1)?;
    }
    write!(out, "\nChoisissez une huile (1-{}): ", MENU.len())?;
    out.flush()
}

/// Oil name from `--oil`, `--choice`, or an interactive menu answer.
fn select_oil<R: BufRead, W: Write>(args: &CliArgs, mut input: R, out: &mut W) -> Result<String> {
    if let Some(name) = &args.oil {
        return Ok(name.clone());
    }
    let answer = match &args.choice {
        Some(choice) => choice.clone(),
        None => {
            print_menu(out)?;
            // Undecodable bytes fall through to the invalid-choice path.
            let mut raw = Vec::new();
            input.read_until(b'\n', &mut raw).context("reading menu choice")?;
            String::from_utf8_lossy(&raw).into_owned()
        }
    };
    match menu_entry(&answer) {
        Some(name) => Ok(name.to_string()),
        None => {
            writeln!(out, "Choix invalide, sélection par défaut: {DEFAULT_OIL}")?;
            Ok(DEFAULT_OIL.to_string())
        }
    }
}

/// First rows of the headline columns.
fn write_preview<W: Write>(table: &SeriesTable, out: &mut W) -> io::Result<()> {
    write!(out, "{:>6}", oil_core::YEAR_COLUMN)?;
    for m in PREVIEW_METRICS {
        write!(out, " {:>26}", m.column_name())?;
    }
    writeln!(out)?;
    for row in table.rows().iter().take(PREVIEW_ROWS) {
        write!(out, "{:>6}", row.year)?;
        for m in PREVIEW_METRICS {
            write!(out, " {:>26.2}", row.get(m))?;
        }
        writeln!(out)?;
    }
    Ok(())
}

fn run<R: BufRead, W: Write>(args: &CliArgs, input: R, out: &mut W) -> Result<()> {
    let run_cfg = match &args.config {
        Some(path) => RunConfig::load(path)?,
        None => RunConfig::default(),
    }
    .with_overrides(args);
    let sim_cfg = run_cfg.sim_config();
    validate_config(&sim_cfg)?;

    let oil = Oil::resolve(&select_oil(args, input, out)?);
    writeln!(out, "\nAnalyse de l'huile essentielle de {}...", oil.name)?;
    if oil.uses_default_profile {
        warn!(oil = %oil.name, "no dedicated profile");
        writeln!(
            out,
            "Pas de profil spécifique pour {}, profil générique utilisé.",
            oil.name
        )?;
    }

    let table = oil_sim::simulate(&oil, &sim_cfg)?;

    fs::create_dir_all(&run_cfg.output_dir)
        .with_context(|| format!("creating {}", run_cfg.output_dir.display()))?;
    let file_name =
        persistence::csv_file_name(&oil.name, sim_cfg.start_year, sim_cfg.end_year);
    let csv_path = persistence::write_csv(&table, &run_cfg.output_dir, &file_name)
        .with_context(|| format!("exporting {file_name}"))?;
    writeln!(out, "Données sauvegardées dans {}", csv_path.display())?;
    writeln!(out, "\nAperçu des données:")?;
    write_preview(&table, out)?;

    if run_cfg.chart {
        let png = run_cfg.output_dir.join(charts::chart_file_name(&oil.name));
        charts::render_dashboard(&oil.name, &table, &png)
            .with_context(|| format!("rendering {}", png.display()))?;
        writeln!(out, "Graphique sauvegardé: {}", png.display())?;
    }

    let report = insights::summarize(&oil, &table)?;
    writeln!(out, "\n{report}")?;
    if let Some(path) = &args.summary_json {
        persistence::write_json(&report, path)
            .with_context(|| format!("writing {}", path.display()))?;
        writeln!(out, "Synthèse JSON: {}", path.display())?;
    }
    writeln!(out, "Analyse terminée pour l'huile de {}.", oil.name)?;
    Ok(())
}

fn main() -> Result<()> {
    // Logging setup
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let args = parse_args(std::env::args().skip(1));
    if args.version {
        println!(
            "pharmacopoeia {} ({} {})",
            env!("CARGO_PKG_VERSION"),
            env!("GIT_SHA"),
            env!("BUILD_DATE")
        );
        return Ok(());
    }
    info!(oil = ?args.oil, choice = ?args.choice, seed = ?args.seed, "starting CLI");

    let stdin = io::stdin();
    let stdout = io::stdout();
    run(&args, stdin.lock(), &mut stdout.lock())
}
