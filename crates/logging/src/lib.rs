#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `logging` turns the `-v`/`--debug` options of the NFSv4 ACL tools into a
//! [`VerbosityConfig`] and, with the `tracing` feature, installs the global
//! `tracing` subscriber that renders the workspace's diagnostics.
//!
//! # Design
//!
//! Diagnostics are grouped in [`DiagnosticFlag`] categories, each tied to one
//! tracing target (`nfs4acl::wire`, `nfs4acl::acl`, `nfs4acl::xattr`,
//! `nfs4acl::cli`). A [`VerbosityConfig`] holds one level per category and
//! renders itself as `EnvFilter` directives, so filtering is done entirely by
//! `tracing-subscriber`.
//!
//! # Invariants
//!
//! - Warnings and errors are always emitted, whatever the verbosity.
//! - Diagnostics go to standard error only.
//!
//! # Examples
//!
//! ```
//! use logging::{DiagnosticFlag, VerbosityConfig};
//!
//! let mut config = VerbosityConfig::from_verbose_level(1);
//! assert_eq!(config.levels.get(DiagnosticFlag::Wire), 0);
//!
//! config.apply_flag("wire2").unwrap();
//! assert!(config.directives().contains("nfs4acl::wire=debug"));
//! ```

mod config;
mod levels;
#[cfg(feature = "tracing")]
mod tracing_bridge;

pub use config::VerbosityConfig;
pub use levels::{DiagnosticFlag, DiagnosticLevels, UnknownFlag};
#[cfg(feature = "tracing")]
pub use tracing_bridge::{LOG_ENV_VAR, build_filter, init_tracing};
