//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and parses CLI arguments
//! - runs the Monte-Carlo analysis
//! - prints reports/plots
//! - writes optional exports

use clap::Parser;
use tracing::info;

use crate::cli::{AnalyzeArgs, Command, PlotArgs};
use crate::domain::AnalysisConfig;
use crate::error::AppError;

pub mod pipeline;

/// SVG chart size in pixels.
const CHART_SIZE: (u32, u32) = (800, 600);

/// Entry point for the `cond` binary.
pub fn run() -> Result<(), AppError> {
    // Environment defaults (`COND_*`) may live in a `.env` next to the data.
    dotenvy::dotenv().ok();

    // We want `cond` and `cond -n 5000` to behave like `cond analyze ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of the
    // argv list before parsing.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Analyze(args) => {
            crate::logging::init_cli_logger(cli.verbose);
            handle_analyze(args)
        }
        Command::Plot(args) => {
            crate::logging::init_cli_logger(cli.verbose);
            handle_plot(args)
        }
        Command::Show(args) => {
            crate::logging::init_tui_logger();
            handle_show(args)
        }
    }
}

fn handle_analyze(args: AnalyzeArgs) -> Result<(), AppError> {
    let config = config_from_args(&args);
    let run = pipeline::run_analysis(&config)?;
    let report = &run.report;

    let source = match &config.data_path {
        Some(path) => path.display().to_string(),
        None => "built-in lab data".to_string(),
    };
    println!("{}", crate::report::format_run_summary(report, &source));
    println!("{}", crate::report::format_results(report));

    if config.plot {
        let plot = crate::plot::render_ascii_plot(report, config.plot_width, config.plot_height);
        println!("{plot}");
    }

    // Optional exports.
    if let Some(path) = &config.chart_path {
        crate::plot::write_svg_chart(path, report, CHART_SIZE)?;
        info!(path = %path.display(), "wrote chart");
    }
    if let Some(path) = &config.export_json {
        crate::io::write_report_json(path, report)?;
        info!(path = %path.display(), "wrote report JSON");
    }
    if let Some(path) = &config.export_csv {
        crate::io::write_substances_csv(path, report)?;
        info!(path = %path.display(), "wrote substance CSV");
    }

    Ok(())
}

fn handle_show(args: AnalyzeArgs) -> Result<(), AppError> {
    crate::tui::run(config_from_args(&args))
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    let report = crate::io::read_report_json(&args.report)?;

    println!("{}", crate::report::format_results(&report));
    println!("{}", crate::plot::render_ascii_plot(&report, args.width, args.height));
    Ok(())
}

pub fn config_from_args(args: &AnalyzeArgs) -> AnalysisConfig {
    AnalysisConfig {
        data_path: args.data.clone(),
        temperature: args.temperature,
        sample_count: args.samples,
        sigma_rel: args.sigma_rel,
        confidence: args.confidence,
        distribution: args.distribution,
        seed: args.seed,
        plot: !args.no_plot,
        plot_width: args.width,
        plot_height: args.height,
        chart_path: args.chart.clone(),
        export_json: args.export_json.clone(),
        export_csv: args.export_csv.clone(),
    }
}

/// Rewrite argv so `cond` defaults to `cond analyze`.
///
/// Rules:
/// - `cond`                      -> `cond analyze`
/// - `cond -n 5000 ...`          -> `cond analyze -n 5000 ...`
/// - `cond --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("analyze".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "analyze" | "plot" | "show");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "analyze flags".
    if arg1.starts_with('-') {
        argv.insert(1, "analyze".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}
