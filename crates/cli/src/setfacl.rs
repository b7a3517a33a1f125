//! `nfs4_setfacl`: edit access masks in place.

use std::ffi::OsString;
use std::io::{self, Write};
use std::path::PathBuf;

use clap::builder::PossibleValuesParser;
use clap::{Arg, ArgAction, ArgGroup, ArgMatches, Command};
use nfs4acl::{
    AccessMask, AceSelector, AclError, MaskOp, Nfs4Acl, WhoType, parse_access_mask, render_acl,
};

use crate::backend::{describe, load, map_ordered, store};
use crate::options::{
    CommonOptions, base_command, clap_error, handle_informational, init_diagnostics, usage_error,
};
use crate::paths::{Target, expand};
use crate::{EXIT_PARTIAL_FAILURE, EXIT_SUCCESS};

/// Program name used in diagnostics and version output.
pub const SETFACL_PROGRAM_NAME: &str = "nfs4_setfacl";

fn command() -> Command {
    base_command(
        SETFACL_PROGRAM_NAME,
        "Apply, remove, or set access mask bits in the NFSv4 ACL of each PATH.\n\
         Without -a, -x, or -s, WRITE_DATA is removed from every entry.",
    )
    .arg(
        Arg::new("apply")
            .long("apply")
            .short('a')
            .value_name("MASK")
            .help("Grant the MASK bits (letters such as 'rw' or a 0x literal).")
            .action(ArgAction::Set),
    )
    .arg(
        Arg::new("remove")
            .long("remove")
            .short('x')
            .value_name("MASK")
            .help("Clear the MASK bits.")
            .action(ArgAction::Set),
    )
    .arg(
        Arg::new("set")
            .long("set")
            .short('s')
            .value_name("MASK")
            .help("Replace the whole mask with MASK.")
            .action(ArgAction::Set),
    )
    .group(
        ArgGroup::new("operation")
            .args(["apply", "remove", "set"])
            .multiple(false),
    )
    .arg(
        Arg::new("who")
            .long("who")
            .value_name("WHO")
            .help("Only edit entries whose principal is exactly WHO.")
            .conflicts_with("who-type")
            .action(ArgAction::Set),
    )
    .arg(
        Arg::new("who-type")
            .long("who-type")
            .value_name("TYPE")
            .help("Only edit entries of this principal class.")
            .value_parser(PossibleValuesParser::new(["owner", "group", "everyone", "named"]))
            .action(ArgAction::Set),
    )
    .arg(
        Arg::new("dry-run")
            .long("dry-run")
            .short('n')
            .help("Print the resulting ACL instead of writing it.")
            .action(ArgAction::SetTrue),
    )
}

/// Target selection as given on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Selection {
    All,
    WhoType(WhoType),
    Who(String),
}

impl Selection {
    fn from_matches(matches: &ArgMatches) -> Self {
        if let Some(who) = matches.get_one::<String>("who") {
            return Self::Who(who.clone());
        }
        match matches.get_one::<String>("who-type").map(String::as_str) {
            Some("owner") => Self::WhoType(WhoType::Owner),
            Some("group") => Self::WhoType(WhoType::Group),
            Some("everyone") => Self::WhoType(WhoType::Everyone),
            Some(_) => Self::WhoType(WhoType::Named),
            None => Self::All,
        }
    }

    fn selector(&self) -> AceSelector<'_> {
        match self {
            Self::All => AceSelector::All,
            Self::WhoType(who_type) => AceSelector::WhoType(*who_type),
            Self::Who(who) => AceSelector::Who(who),
        }
    }
}

/// The edit requested by the operation flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Edit {
    op: MaskOp,
    mask: AccessMask,
}

impl Edit {
    fn from_matches(matches: &ArgMatches) -> Result<Self, String> {
        let requested = [
            ("apply", MaskOp::Apply),
            ("remove", MaskOp::Remove),
            ("set", MaskOp::Set),
        ]
        .into_iter()
        .find_map(|(id, op)| matches.get_one::<String>(id).map(|text| (op, text)));

        let Some((op, text)) = requested else {
            return Ok(Self {
                op: MaskOp::Remove,
                mask: AccessMask::from_raw(AccessMask::WRITE_DATA),
            });
        };

        parse_access_mask(text)
            .map(|mask| Self { op, mask })
            .map_err(|error| format!("invalid mask '{text}': {error}"))
    }
}

/// Result of editing one path.
#[derive(Debug)]
struct Edited {
    path: PathBuf,
    acl: Nfs4Acl,
    touched: usize,
}

/// Runs `nfs4_setfacl` with the supplied arguments and output handles.
///
/// Returns `0` when every path was updated, `1` when any path failed, and `2`
/// for usage errors, including selectors the ACL model rejects.
pub fn run_setfacl<I, S, Out, Err>(arguments: I, stdout: &mut Out, stderr: &mut Err) -> i32
where
    I: IntoIterator<Item = S>,
    S: Into<OsString> + Clone,
    Out: Write,
    Err: Write,
{
    let mut command = command();
    let matches = match command.try_get_matches_from_mut(arguments) {
        Ok(matches) => matches,
        Err(error) => return clap_error(SETFACL_PROGRAM_NAME, &error, stderr),
    };
    let options = match CommonOptions::from_matches(&matches) {
        Ok(options) => options,
        Err(message) => return usage_error(SETFACL_PROGRAM_NAME, &message, stderr),
    };
    if let Some(status) = handle_informational(&mut command, &options, stdout) {
        return status;
    }

    let edit = match Edit::from_matches(&matches) {
        Ok(edit) => edit,
        Err(message) => return usage_error(SETFACL_PROGRAM_NAME, &message, stderr),
    };
    let selection = Selection::from_matches(&matches);
    if let Err(error) = selection.selector().validate() {
        return usage_error(SETFACL_PROGRAM_NAME, &error.to_string(), stderr);
    }
    if options.paths.is_empty() {
        return usage_error(SETFACL_PROGRAM_NAME, "missing PATH operand", stderr);
    }

    init_diagnostics(&options.verbosity);

    let dry_run = matches.get_flag("dry-run");
    let targets = expand(&options.paths, options.recursive);
    let results = map_ordered(&targets, |target| {
        edit_target(target, &selection, edit, dry_run)
    });

    match report(&results, dry_run, stdout, stderr) {
        Ok(true) => EXIT_SUCCESS,
        Ok(false) | Err(_) => EXIT_PARTIAL_FAILURE,
    }
}

fn edit_target(
    target: &Target,
    selection: &Selection,
    edit: Edit,
    dry_run: bool,
) -> Result<Edited, String> {
    let path = target.as_ref().map_err(Clone::clone)?;
    let mut acl = load(path).map_err(|error| describe(path, &error))?;
    let touched = acl
        .modify_mask(selection.selector(), edit.op, edit.mask.as_raw())
        .map_err(|error| describe(path, &AclError::from(error)))?;

    if !dry_run {
        store(path, &acl).map_err(|error| describe(path, &error))?;
    }

    tracing::info!(
        target: "nfs4acl::cli",
        path = %path.display(),
        touched = touched,
        dry_run = dry_run,
        "edited ACL"
    );
    Ok(Edited {
        path: path.clone(),
        acl,
        touched,
    })
}

/// Prints dry-run listings and failures; returns whether all paths succeeded.
fn report<Out: Write, Err: Write>(
    results: &[Result<Edited, String>],
    dry_run: bool,
    stdout: &mut Out,
    stderr: &mut Err,
) -> io::Result<bool> {
    let mut all_ok = true;
    let mut printed = 0usize;

    for result in results {
        match result {
            Ok(edited) => {
                if edited.touched == 0 {
                    tracing::warn!(
                        target: "nfs4acl::cli",
                        path = %edited.path.display(),
                        "no entries matched"
                    );
                }
                if dry_run {
                    if printed > 0 {
                        writeln!(stdout)?;
                    }
                    writeln!(stdout, "# file: {}", edited.path.display())?;
                    stdout.write_all(render_acl(&edited.acl, false).as_bytes())?;
                    printed += 1;
                }
            }
            Err(message) => {
                all_ok = false;
                let _ = writeln!(stderr, "{SETFACL_PROGRAM_NAME}: {message}");
            }
        }
    }

    stdout.flush()?;
    Ok(all_ok)
}
