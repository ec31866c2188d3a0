use std::sync::OnceLock;

use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Directive used when neither the caller nor `RUST_LOG` picks one.
pub const DEFAULT_FILTER: &str = "text_evals=info";

static INSTALLED: OnceLock<()> = OnceLock::new();

#[derive(Debug, Error)]
pub enum TelemetryInitError {
    #[error("invalid tracing filter directive `{directive}`")]
    InvalidFilter {
        directive: String,
        #[source]
        source: tracing_subscriber::filter::ParseError,
    },
    #[error("another tracing subscriber is already installed")]
    AlreadyInstalled(#[from] tracing::subscriber::SetGlobalDefaultError),
}

/// Installs a compact stderr subscriber for `text_evals.*` spans and events.
///
/// Reads `RUST_LOG` when it is set and valid, otherwise uses [`DEFAULT_FILTER`].
/// Calling it again after a successful install does nothing.
pub fn init_tracing() -> Result<(), TelemetryInitError> {
    init_tracing_with_filter(None)
}

/// Like [`init_tracing`], but an explicit `directive` (e.g.
/// `"text_evals::evaluate=debug"`) takes precedence over `RUST_LOG`. An explicit
/// directive that does not parse is an error rather than a silent fallback.
pub fn init_tracing_with_filter(directive: Option<&str>) -> Result<(), TelemetryInitError> {
    if INSTALLED.get().is_some() {
        return Ok(());
    }

    let subscriber = tracing_subscriber::fmt()
        .compact()
        .with_writer(std::io::stderr)
        .with_env_filter(build_filter(directive)?)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let _ = INSTALLED.set(());
    Ok(())
}

fn build_filter(directive: Option<&str>) -> Result<EnvFilter, TelemetryInitError> {
    if let Some(directive) = directive {
        return parse(directive);
    }
    EnvFilter::try_from_default_env().or_else(|_| parse(DEFAULT_FILTER))
}

fn parse(directive: &str) -> Result<EnvFilter, TelemetryInitError> {
    EnvFilter::try_new(directive).map_err(|source| TelemetryInitError::InvalidFilter {
        directive: directive.to_string(),
        source,
    })
}
