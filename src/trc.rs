//! Tracing configuration and initialization.

use std::io::IsTerminal;

use tracing_indicatif::IndicatifLayer;
use tracing_subscriber::{
    EnvFilter,
    fmt::format::FmtSpan,
    layer::SubscriberExt,
    util::{SubscriberInitExt, TryInitError},
};

/// Environment variable holding the log filter, e.g. `gitscope=debug`.
const LOG_ENV: &str = "GITSCOPE_LOG";

/// Honors the conventional `FORCE_COLOR` / `NO_COLOR` pair, falling back
/// to whether the stream is a terminal.
fn use_ansi_color(stream: &impl IsTerminal) -> bool {
    let forced = std::env::var_os("FORCE_COLOR").is_some_and(|v| !v.is_empty());
    let suppressed = std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty());
    forced || (stream.is_terminal() && !suppressed)
}

enum TrcMode {
    Pretty,
    Plain,
}

pub struct Trc {
    mode: TrcMode,
    env_filter: EnvFilter,
}

impl Default for Trc {
    fn default() -> Self {
        let maybe_env_filter =
            EnvFilter::try_from_env(LOG_ENV).or_else(|_| EnvFilter::try_from_default_env());

        match maybe_env_filter {
            Ok(env_filter) => Self {
                // An explicit filter means the user is debugging and wants
                // plain, greppable lines rather than spinners.
                mode: TrcMode::Plain,
                env_filter,
            },
            Err(_) => Self {
                mode: TrcMode::Pretty,
                env_filter: EnvFilter::new("warn"),
            },
        }
    }
}

impl Trc {
    pub fn init(self) -> Result<(), TryInitError> {
        match &self.mode {
            TrcMode::Plain => self.init_plain_mode(),
            TrcMode::Pretty => self.init_pretty_mode(),
        }
    }

    fn init_plain_mode(self) -> Result<(), TryInitError> {
        // Plain mode is the verbose rust logging mode, on stderr so command
        // output on stdout stays clean.
        tracing_subscriber::fmt()
            .with_env_filter(self.env_filter)
            .with_span_events(FmtSpan::CLOSE)
            .with_writer(std::io::stderr)
            .with_ansi(use_ansi_color(&std::io::stderr()))
            .init();

        Ok(())
    }

    fn init_pretty_mode(self) -> Result<(), TryInitError> {
        // Pretty mode keeps the terminal tidy while requests are in flight.
        let indicatif_layer = IndicatifLayer::new();
        tracing_subscriber::registry()
            .with(self.env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(indicatif_layer.get_stderr_writer())
                    .with_target(false)
                    .without_time()
                    .compact(),
            )
            .with(indicatif_layer)
            .try_init()?;

        Ok(())
    }
}
