#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `cli` implements the `nfs4_getfacl` and `nfs4_setfacl` front ends on top of
//! the [`nfs4acl`] codec. Each tool is exposed as a function taking the
//! argument list and handles for standard output and error, so the binaries
//! stay thin and the whole surface can be driven from tests.
//!
//! # Design
//!
//! - [`run_getfacl`] prints the ACL of every operand in the
//!   `TYPE:FLAGS:WHO:MASK` notation, optionally descending into directories.
//! - [`run_setfacl`] applies, removes, or sets mask bits on the entries picked
//!   by `--who`/`--who-type` and writes the result back (or prints it with
//!   `--dry-run`).
//! - Both share one option layer (`-R`, `-v`, `--debug`, help and version)
//!   and one path expansion routine built on `jwalk`.
//! - With the `parallel` feature, ACLs of the expanded paths are loaded and
//!   rewritten on the rayon thread pool; output order is unaffected.
//!
//! # Invariants
//!
//! - Neither entry point panics; failures become exit codes.
//! - A failing path never stops the remaining paths from being processed.
//! - ACL listings go to standard output, diagnostics to standard error.
//!
//! # Errors
//!
//! Usage errors exit with `2`. Per-path failures are reported as
//! `PROGRAM: message` on standard error and make the run exit with `1`.
//!
//! # Examples
//!
//! ```
//! let mut stdout = Vec::new();
//! let mut stderr = Vec::new();
//! let status = cli::run_getfacl(["nfs4_getfacl", "--version"], &mut stdout, &mut stderr);
//!
//! assert_eq!(status, 0);
//! assert!(String::from_utf8(stdout).unwrap().starts_with("nfs4_getfacl "));
//! assert!(stderr.is_empty());
//! ```

mod backend;
mod getfacl;
mod options;
mod paths;
mod setfacl;

pub use getfacl::{GETFACL_PROGRAM_NAME, run_getfacl};
pub use setfacl::{SETFACL_PROGRAM_NAME, run_setfacl};

/// Exit status when every path was processed.
pub const EXIT_SUCCESS: i32 = 0;

/// Exit status when at least one path failed.
pub const EXIT_PARTIAL_FAILURE: i32 = 1;

/// Exit status for malformed command lines.
pub const EXIT_USAGE: i32 = 2;

/// Maximum exit code representable by a Unix process.
const MAX_EXIT_CODE: i32 = u8::MAX as i32;

/// Converts a numeric exit code into an [`std::process::ExitCode`].
#[must_use]
pub fn exit_code_from(status: i32) -> std::process::ExitCode {
    let clamped = status.clamp(0, MAX_EXIT_CODE);
    std::process::ExitCode::from(clamped as u8)
}
