//! `nfs4_getfacl`: print the NFSv4 ACL of each path.

use std::ffi::OsString;
use std::io::{self, Write};
use std::path::PathBuf;

use clap::{Arg, ArgAction, Command};
use nfs4acl::{Nfs4Acl, render_acl};

use crate::backend::{describe, load, map_ordered};
use crate::options::{
    CommonOptions, base_command, clap_error, handle_informational, init_diagnostics, usage_error,
};
use crate::paths::{Target, expand};
use crate::{EXIT_PARTIAL_FAILURE, EXIT_SUCCESS};

/// Program name used in diagnostics and version output.
pub const GETFACL_PROGRAM_NAME: &str = "nfs4_getfacl";

fn command() -> Command {
    base_command(
        GETFACL_PROGRAM_NAME,
        "Print the NFSv4 ACL stored in the system.nfs4_acl attribute of each PATH.",
    )
    .arg(
        Arg::new("omit-header")
            .long("omit-header")
            .short('H')
            .help("Do not print the '# file:' header before each ACL.")
            .action(ArgAction::SetTrue),
    )
    .arg(
        Arg::new("long")
            .long("long")
            .short('l')
            .help("Spell entry types out (ALLOW, DENY, AUDIT, ALARM).")
            .action(ArgAction::SetTrue),
    )
}

/// Runs `nfs4_getfacl` with the supplied arguments and output handles.
///
/// Returns `0` when every ACL was printed, `1` when any path failed, and `2`
/// for usage errors.
pub fn run_getfacl<I, S, Out, Err>(arguments: I, stdout: &mut Out, stderr: &mut Err) -> i32
where
    I: IntoIterator<Item = S>,
    S: Into<OsString> + Clone,
    Out: Write,
    Err: Write,
{
    let mut command = command();
    let matches = match command.try_get_matches_from_mut(arguments) {
        Ok(matches) => matches,
        Err(error) => return clap_error(GETFACL_PROGRAM_NAME, &error, stderr),
    };
    let options = match CommonOptions::from_matches(&matches) {
        Ok(options) => options,
        Err(message) => return usage_error(GETFACL_PROGRAM_NAME, &message, stderr),
    };
    if let Some(status) = handle_informational(&mut command, &options, stdout) {
        return status;
    }
    if options.paths.is_empty() {
        return usage_error(GETFACL_PROGRAM_NAME, "missing PATH operand", stderr);
    }

    init_diagnostics(&options.verbosity);

    let show_header = !matches.get_flag("omit-header");
    let long = matches.get_flag("long");

    let targets = expand(&options.paths, options.recursive);
    let results = map_ordered(&targets, read_target);

    match print_results(&results, show_header, long, stdout, stderr) {
        Ok(true) => EXIT_SUCCESS,
        Ok(false) | Err(_) => EXIT_PARTIAL_FAILURE,
    }
}

fn read_target(target: &Target) -> Result<(PathBuf, Nfs4Acl), String> {
    let path = target.as_ref().map_err(Clone::clone)?;
    match load(path) {
        Ok(acl) => {
            tracing::info!(
                target: "nfs4acl::cli",
                path = %path.display(),
                entries = acl.len(),
                directory = acl.is_directory(),
                "read ACL"
            );
            Ok((path.clone(), acl))
        }
        Err(error) => Err(describe(path, &error)),
    }
}

/// Writes every ACL to `stdout` and every failure to `stderr`.
///
/// Returns whether all paths succeeded.
fn print_results<Out: Write, Err: Write>(
    results: &[Result<(PathBuf, Nfs4Acl), String>],
    show_header: bool,
    long: bool,
    stdout: &mut Out,
    stderr: &mut Err,
) -> io::Result<bool> {
    let mut all_ok = true;
    let mut printed = 0usize;

    for result in results {
        match result {
            Ok((path, acl)) => {
                if show_header {
                    if printed > 0 {
                        writeln!(stdout)?;
                    }
                    writeln!(stdout, "# file: {}", path.display())?;
                }
                stdout.write_all(render_acl(acl, long).as_bytes())?;
                printed += 1;
            }
            Err(message) => {
                all_ok = false;
                let _ = writeln!(stderr, "{GETFACL_PROGRAM_NAME}: {message}");
            }
        }
    }

    stdout.flush()?;
    Ok(all_ok)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EXIT_USAGE;
    use nfs4acl::decode;

    fn run(args: &[&str]) -> (i32, String, String) {
        let mut stdout = Vec::new();
        let mut stderr = Vec::new();
        let status = run_getfacl(args.iter().copied(), &mut stdout, &mut stderr);
        (
            status,
            String::from_utf8(stdout).unwrap(),
            String::from_utf8(stderr).unwrap(),
        )
    }

    fn sample(is_directory: bool) -> Nfs4Acl {
        let payload = test_support::AclBytes::new()
            .entry(0, 0, 0x2, "OWNER@")
            .entry(1, 0, 0x1, "EVERYONE@")
            .build();
        decode(&payload, is_directory).expect("valid payload")
    }

    #[test]
    fn help_lists_options() {
        let (status, stdout, stderr) = run(&["nfs4_getfacl", "--help"]);
        assert_eq!(status, EXIT_SUCCESS);
        assert!(stdout.contains("--omit-header"));
        assert!(stdout.contains("--recursive"));
        assert!(stderr.is_empty());
    }

    #[test]
    fn missing_operand_is_usage_error() {
        let (status, stdout, stderr) = run(&["nfs4_getfacl"]);
        assert_eq!(status, EXIT_USAGE);
        assert!(stdout.is_empty());
        assert!(stderr.starts_with("nfs4_getfacl: missing PATH operand"));
    }

    #[test]
    fn unknown_option_is_usage_error() {
        let (status, _, stderr) = run(&["nfs4_getfacl", "--bogus", "x"]);
        assert_eq!(status, EXIT_USAGE);
        assert!(stderr.starts_with("nfs4_getfacl: "));
        assert!(stderr.contains("--bogus"));
    }

    #[test]
    fn missing_path_fails_but_continues() {
        let dir = tempfile::tempdir().expect("tempdir");
        let first = dir.path().join("first");
        let second = dir.path().join("second");
        let (status, stdout, stderr) = run(&[
            "nfs4_getfacl",
            first.to_str().unwrap(),
            second.to_str().unwrap(),
        ]);

        assert_eq!(status, EXIT_PARTIAL_FAILURE);
        assert!(stdout.is_empty());
        assert_eq!(stderr.lines().count(), 2);
        assert!(stderr.lines().all(|line| line.starts_with("nfs4_getfacl: failed to stat")));
    }

    #[test]
    fn results_print_with_headers_and_separators() {
        let results = vec![
            Ok((PathBuf::from("/mnt/a"), sample(false))),
            Err("failed to stat '/mnt/b': gone".to_owned()),
            Ok((PathBuf::from("/mnt/c"), sample(true))),
        ];
        let mut stdout = Vec::new();
        let mut stderr = Vec::new();
        let ok = print_results(&results, true, false, &mut stdout, &mut stderr).unwrap();

        assert!(!ok);
        assert_eq!(
            String::from_utf8(stdout).unwrap(),
            "# file: /mnt/a\nA::OWNER@:w\nD::EVERYONE@:r\n\n# file: /mnt/c\nA::OWNER@:w\nD::EVERYONE@:r\n"
        );
        assert_eq!(
            String::from_utf8(stderr).unwrap(),
            "nfs4_getfacl: failed to stat '/mnt/b': gone\n"
        );
    }

    #[test]
    fn omit_header_and_long_form() {
        let results = vec![Ok((PathBuf::from("/mnt/a"), sample(false)))];
        let mut stdout = Vec::new();
        let mut stderr = Vec::new();
        let ok = print_results(&results, false, true, &mut stdout, &mut stderr).unwrap();

        assert!(ok);
        assert_eq!(
            String::from_utf8(stdout).unwrap(),
            "ALLOW::OWNER@:w\nDENY::EVERYONE@:r\n"
        );
        assert!(stderr.is_empty());
    }
}
