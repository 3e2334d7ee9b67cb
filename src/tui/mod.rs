//! Ratatui-based terminal UI.
//!
//! The TUI renders the result chart next to the derived quantities and lets the
//! user re-run the Monte-Carlo analysis with another seed, confidence level,
//! distribution family or sample count.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph},
};
use tracing::warn;

use crate::app::pipeline::{AnalysisRun, run_analysis_with_experiment};
use crate::domain::{AnalysisConfig, Experiment};
use crate::error::AppError;
use crate::plot::ChartSeries;

mod plotters_chart;

use plotters_chart::ResultChart;

/// Confidence levels cycled with `c`.
pub const CONFIDENCE_LEVELS: [f64; 4] = [0.683, 0.90, 0.95, 0.99];
pub const MIN_SAMPLES: usize = 10;
pub const MAX_SAMPLES: usize = 100_000;

/// Start the TUI.
///
/// Measurements are loaded and analysed once before the terminal is taken over,
/// so input errors are reported like in `cond analyze`.
pub fn run(config: AnalysisConfig) -> Result<(), AppError> {
    let experiment = match &config.data_path {
        Some(path) => crate::data::load_experiment_csv(path, config.temperature)?,
        None => Experiment::default_lab().with_temperature(config.temperature),
    };
    let mut app = App::new(config, experiment)?;

    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::input(format!("Failed to initialize terminal: {e}")))?;

    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::input(format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::input(format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

struct App {
    config: AnalysisConfig,
    run: AnalysisRun,
    series: ChartSeries,
    status: String,
}

impl App {
    fn new(config: AnalysisConfig, experiment: Experiment) -> Result<Self, AppError> {
        let run = run_analysis_with_experiment(&config, experiment)?;
        let series = ChartSeries::from_report(&run.report);
        Ok(Self {
            config,
            run,
            series,
            status: "Ready.".to_string(),
        })
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::input(format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::input(format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::input(format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Returns `true` when the UI should exit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        let mut next = self.config.clone();
        let label = match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Char('r') => {
                next.seed = next.seed.wrapping_add(1);
                format!("seed: {}", next.seed)
            }
            KeyCode::Char('c') => {
                next.confidence = next_confidence(next.confidence);
                format!("pconf: {:.3}", next.confidence)
            }
            KeyCode::Char('d') => {
                next.distribution = next.distribution.next();
                format!("distribution: {}", next.distribution.display_name())
            }
            KeyCode::Char('+') => {
                next.sample_count = scale_samples(next.sample_count, true);
                format!("samples: {}", next.sample_count)
            }
            KeyCode::Char('-') => {
                next.sample_count = scale_samples(next.sample_count, false);
                format!("samples: {}", next.sample_count)
            }
            _ => return false,
        };

        self.apply(next, label);
        false
    }

    /// Re-run with `next`; on failure the previous run stays on screen.
    fn apply(&mut self, next: AnalysisConfig, label: String) {
        match run_analysis_with_experiment(&next, self.run.experiment.clone()) {
            Ok(run) => {
                self.series = ChartSeries::from_report(&run.report);
                self.run = run;
                self.config = next;
                self.status = label;
            }
            Err(err) => {
                warn!(error = %err, "re-run rejected");
                self.status = format!("{label} rejected: {}", err.message());
            }
        }
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let report = &self.run.report;
        let lines = vec![
            Line::from(vec![
                Span::styled("cond", Style::default().fg(Color::Cyan)),
                Span::raw(" - conductivity analysis (Monte-Carlo)"),
            ]),
            Line::from(Span::styled(
                format!(
                    "T = {:.1} K | n={} | sigma_rel={:.2} | dist={} | seed={} | pconf={:.3}",
                    report.temperature,
                    report.sample_count,
                    report.sigma_rel,
                    report.distribution.display_name(),
                    report.seed,
                    report.confidence,
                ),
                Style::default().fg(Color::Gray),
            )),
        ];

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0), Constraint::Length(48)])
            .split(area);

        self.draw_chart(frame, chunks[0]);
        self.draw_results(frame, chunks[1]);
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("dG0 vs 1/er - 1").borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        frame.render_widget(ResultChart { series: &self.series }, inner);
    }

    fn draw_results(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let report = &self.run.report;
        let bold = Style::default().add_modifier(Modifier::BOLD);
        let mut lines: Vec<Line> = crate::report::format_results(report)
            .lines()
            .map(|l| Line::from(Span::styled(l.to_string(), bold)))
            .collect();

        lines.push(Line::raw(""));
        lines.push(Line::raw(format!(
            "slope     = {:.4e} +/- {:.2e} J/mol",
            report.fit.slope, report.fit.slope_interval.err
        )));
        lines.push(Line::raw(format!(
            "intercept = {:.4e} +/- {:.2e} J/mol",
            report.fit.intercept, report.fit.intercept_interval.err
        )));
        lines.push(Line::raw(""));
        for s in &report.substances {
            lines.push(Line::from(Span::styled(
                format!(
                    "{:<10} c={:>9.4} M  dG0={:>7.2} kJ/mol",
                    s.name,
                    s.concentration,
                    s.dg0 / 1000.0
                ),
                Style::default().fg(Color::Gray),
            )));
        }

        let p = Paragraph::new(Text::from(lines)).block(Block::default().title("Results").borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "r reseed  c pconf  d distribution  +/- samples  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

/// Next entry of `CONFIDENCE_LEVELS` above `current`, wrapping to the first.
fn next_confidence(current: f64) -> f64 {
    CONFIDENCE_LEVELS
        .iter()
        .copied()
        .find(|&level| level > current + 1e-9)
        .unwrap_or(CONFIDENCE_LEVELS[0])
}

/// Double (`up`) or halve the sample count within `[MIN_SAMPLES, MAX_SAMPLES]`.
fn scale_samples(current: usize, up: bool) -> usize {
    let next = if up {
        current.saturating_mul(2)
    } else {
        current / 2
    };
    next.clamp(MIN_SAMPLES, MAX_SAMPLES)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Distribution;

    fn app() -> App {
        let config = AnalysisConfig {
            sample_count: 100,
            ..AnalysisConfig::default()
        };
        App::new(config, Experiment::default_lab()).unwrap()
    }

    #[test]
    fn confidence_cycles_through_levels() {
        assert_eq!(next_confidence(0.683), 0.90);
        assert_eq!(next_confidence(0.90), 0.95);
        assert_eq!(next_confidence(0.95), 0.99);
        assert_eq!(next_confidence(0.99), 0.683);
        // Off-list values jump to the next level up.
        assert_eq!(next_confidence(0.8), 0.90);
    }

    #[test]
    fn sample_count_is_clamped() {
        assert_eq!(scale_samples(1000, true), 2000);
        assert_eq!(scale_samples(1000, false), 500);
        assert_eq!(scale_samples(15, false), MIN_SAMPLES);
        assert_eq!(scale_samples(80_000, true), MAX_SAMPLES);
    }

    #[test]
    fn keys_rerun_the_analysis() {
        let mut app = app();
        assert!(!app.handle_key(KeyCode::Char('r')));
        assert_eq!(app.run.report.seed, 43);

        app.handle_key(KeyCode::Char('d'));
        assert_eq!(app.config.distribution, Distribution::Unif);
        assert_eq!(app.run.report.distribution, Distribution::Unif);

        app.handle_key(KeyCode::Char('+'));
        assert_eq!(app.run.report.sample_count, 200);

        assert!(app.handle_key(KeyCode::Char('q')));
        assert!(app.handle_key(KeyCode::Esc));
    }

    #[test]
    fn reruns_reuse_the_loaded_measurements() {
        let experiment = Experiment::default_lab().with_temperature(310.0);
        let config = AnalysisConfig {
            sample_count: 50,
            ..AnalysisConfig::default()
        };
        let mut app = App::new(config, experiment).unwrap();
        app.handle_key(KeyCode::Char('c'));
        assert_eq!(app.run.report.confidence, 0.99);
        assert_eq!(app.run.experiment.temperature, 310.0);
        assert_eq!(app.run.report.temperature, 310.0);
    }

    #[test]
    fn rejected_rerun_keeps_previous_results() {
        let mut app = app();
        app.config.sigma_rel = 1.0;
        // Lognorm -> Unif: wide uniform draws go non-positive and are rejected.
        app.handle_key(KeyCode::Char('d'));
        assert_eq!(app.run.report.distribution, Distribution::Lognorm);
        assert!(app.status.contains("rejected"));
    }
}
