//! Logging setup.
//!
//! Logs go to stderr so stdout stays reserved for the report and plot.
//! `RUST_LOG` overrides the built-in filters.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used for the plain CLI commands.
fn cli_filter(verbose: bool) -> EnvFilter {
    let default = if verbose {
        "conductivity_mc=debug,info"
    } else {
        "conductivity_mc=info"
    };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

pub fn init_cli_logger(verbose: bool) {
    install(cli_filter(verbose));
}

/// The TUI owns the terminal; only warnings are let through unless `RUST_LOG` says otherwise.
pub fn init_tui_logger() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("conductivity_mc=warn"));
    install(filter);
}

fn install(filter: EnvFilter) {
    // `try_init` so repeated initialisation (tests, embedding) is a no-op.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .try_init();
}
