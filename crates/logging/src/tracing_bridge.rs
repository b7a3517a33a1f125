//! crates/logging/src/tracing_bridge.rs
//! Installs a `tracing-subscriber` registry driven by a [`VerbosityConfig`].
//!
//! Events are filtered by an [`EnvFilter`] built from the configuration's
//! directives, or from [`LOG_ENV_VAR`] when that variable holds a valid filter,
//! and written to standard error by a `fmt` layer. Standard output is left to
//! the tools' own ACL listings.
//!
//! # Usage
//!
//! ```rust,ignore
//! use logging::{VerbosityConfig, init_tracing};
//!
//! let config = VerbosityConfig::from_verbose_level(2);
//! let _ = init_tracing(&config);
//!
//! tracing::debug!(target: "nfs4acl::cli", path = "/mnt/nfs/a", "loaded ACL");
//! ```

use super::config::VerbosityConfig;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};

/// Environment variable whose value replaces the flag-derived filter.
pub const LOG_ENV_VAR: &str = "NFS4ACL_LOG";

/// Builds the filter for `config`, preferring `override_directives` when they parse.
///
/// An unparsable override is ignored rather than rejected so that a stray
/// environment variable never stops the tools from running.
#[must_use]
pub fn build_filter(config: &VerbosityConfig, override_directives: Option<&str>) -> EnvFilter {
    override_directives
        .filter(|directives| !directives.trim().is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(config.directives()))
}

/// Installs the global subscriber for `config`.
///
/// Returns an error if a global subscriber is already set, which happens when
/// the tools are driven repeatedly inside one process.
pub fn init_tracing(config: &VerbosityConfig) -> Result<(), TryInitError> {
    let env = std::env::var(LOG_ENV_VAR).ok();
    let filter = build_filter(config, env.as_deref());

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .without_time(),
        )
        .try_init()
}
