//! Options shared by both tools.

use std::ffi::OsString;
use std::io::Write;
use std::path::PathBuf;

use clap::builder::OsStringValueParser;
use clap::{Arg, ArgAction, ArgMatches, ColorChoice, Command};
use logging::VerbosityConfig;

use crate::{EXIT_SUCCESS, EXIT_USAGE};

/// Builds the skeleton command carrying the options both tools accept.
pub(crate) fn base_command(name: &'static str, about: &'static str) -> Command {
    Command::new(name)
        .about(about)
        .version(env!("CARGO_PKG_VERSION"))
        .color(ColorChoice::Never)
        .disable_help_flag(true)
        .disable_version_flag(true)
        .arg(
            Arg::new("help")
                .long("help")
                .short('h')
                .help("Show this help message and exit.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("version")
                .long("version")
                .short('V')
                .help("Output version information and exit.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("recursive")
                .long("recursive")
                .short('R')
                .help("Descend into directories.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Increase diagnostic output (repeatable).")
                .action(ArgAction::Count),
        )
        .arg(
            Arg::new("debug")
                .long("debug")
                .value_name("FLAGS")
                .help("Raise individual diagnostic categories (wire, acl, xattr, cli, all), e.g. wire2.")
                .value_delimiter(',')
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("paths")
                .value_name("PATH")
                .num_args(0..)
                .value_parser(OsStringValueParser::new())
                .action(ArgAction::Append),
        )
}

/// Options common to both tools after parsing.
#[derive(Debug)]
pub(crate) struct CommonOptions {
    pub(crate) show_help: bool,
    pub(crate) show_version: bool,
    pub(crate) recursive: bool,
    pub(crate) verbosity: VerbosityConfig,
    pub(crate) paths: Vec<PathBuf>,
}

impl CommonOptions {
    /// Extracts the shared options, rejecting unknown `--debug` categories.
    pub(crate) fn from_matches(matches: &ArgMatches) -> Result<Self, String> {
        let mut verbosity = VerbosityConfig::from_verbose_level(matches.get_count("verbose"));
        if let Some(flags) = matches.get_many::<String>("debug") {
            for flag in flags {
                verbosity.apply_flag(flag).map_err(|error| error.to_string())?;
            }
        }

        let paths = matches
            .get_many::<OsString>("paths")
            .map(|values| values.map(PathBuf::from).collect())
            .unwrap_or_default();

        Ok(Self {
            show_help: matches.get_flag("help"),
            show_version: matches.get_flag("version"),
            recursive: matches.get_flag("recursive"),
            verbosity,
            paths,
        })
    }
}

/// Installs the tracing subscriber when diagnostics were requested.
///
/// A subscriber that is already installed is kept.
pub(crate) fn init_diagnostics(verbosity: &VerbosityConfig) {
    if verbosity.is_quiet() && std::env::var_os(logging::LOG_ENV_VAR).is_none() {
        return;
    }
    let _ = logging::init_tracing(verbosity);
}

/// Handles `--help` and `--version`, returning the exit status when one was given.
pub(crate) fn handle_informational<Out: Write>(
    command: &mut Command,
    options: &CommonOptions,
    stdout: &mut Out,
) -> Option<i32> {
    let text = if options.show_help {
        command.render_help().to_string()
    } else if options.show_version {
        command.render_version()
    } else {
        return None;
    };

    Some(match stdout.write_all(text.as_bytes()) {
        Ok(()) => EXIT_SUCCESS,
        Err(_) => crate::EXIT_PARTIAL_FAILURE,
    })
}

/// Reports a usage error and returns the usage exit status.
pub(crate) fn usage_error<Err: Write>(program: &str, message: &str, stderr: &mut Err) -> i32 {
    let _ = writeln!(stderr, "{program}: {message}");
    let _ = writeln!(stderr, "Try '{program} --help' for more information.");
    EXIT_USAGE
}

/// Reports a `clap` parse failure.
pub(crate) fn clap_error<Err: Write>(program: &str, error: &clap::Error, stderr: &mut Err) -> i32 {
    let rendered = error.to_string();
    let message = rendered
        .lines()
        .next()
        .unwrap_or_default()
        .trim_start_matches("error: ");
    usage_error(program, message, stderr)
}
