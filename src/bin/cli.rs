use clap::{Arg, ArgAction, Command, builder::OsStringValueParser};
use std::ffi::OsString;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use symwalk::{EntryMetadata, EntryType, WalkBuilder, WalkControl, WalkError};
use tracing_subscriber::EnvFilter;

pub(crate) const PROGRAM_NAME: &str = "symwalk";

/// Exit status when some entries could not be inspected.
const PARTIAL_EXIT: u8 = 1;
/// Exit status for usage errors and output failures.
const USAGE_EXIT: u8 = 2;

pub(crate) struct ParsedArgs {
    pub(crate) root: PathBuf,
    pub(crate) follow_symlinks: bool,
    pub(crate) classify: bool,
    pub(crate) verbosity: u8,
}

fn clap_command() -> Command {
    Command::new(PROGRAM_NAME)
        .about("Walk a directory tree, optionally following symlinks.")
        .version(env!("CARGO_PKG_VERSION"))
        .arg(
            Arg::new("follow-symlinks")
                .long("follow-symlinks")
                .short('L')
                .help("Resolve symlinks and descend into their targets.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("classify")
                .long("classify")
                .short('F')
                .help("Append '/' to directories and '@' to symlinks.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Increase diagnostic output on stderr; repeat for more.")
                .action(ArgAction::Count),
        )
        .arg(
            Arg::new("root")
                .required(true)
                .value_name("ROOT")
                .help("Directory or file to walk.")
                .value_parser(OsStringValueParser::new()),
        )
}

pub(crate) fn parse_args<I, S>(arguments: I) -> Result<ParsedArgs, clap::Error>
where
    I: IntoIterator<Item = S>,
    S: Into<OsString> + Clone,
{
    let mut matches = clap_command().try_get_matches_from(arguments)?;
    let root = matches
        .remove_one::<OsString>("root")
        .map(PathBuf::from)
        .unwrap_or_default();

    Ok(ParsedArgs {
        root,
        follow_symlinks: matches.get_flag("follow-symlinks"),
        classify: matches.get_flag("classify"),
        verbosity: matches.get_count("verbose"),
    })
}

/// Parses `args`, walks the requested root, and reports to the given streams.
#[must_use]
pub fn run_with<I, Out, Err>(args: I, stdout: &mut Out, stderr: &mut Err) -> ExitCode
where
    I: IntoIterator,
    I::Item: Into<OsString> + Clone,
    Out: Write,
    Err: Write,
{
    let parsed = match parse_args(args) {
        Ok(parsed) => parsed,
        Err(error) => {
            let rendered = error.render().to_string();
            let written = if error.use_stderr() {
                stderr.write_all(rendered.as_bytes()).map(|()| USAGE_EXIT)
            } else {
                stdout.write_all(rendered.as_bytes()).map(|()| 0)
            };
            return written.map_or(ExitCode::from(USAGE_EXIT), ExitCode::from);
        }
    };

    init_tracing(parsed.verbosity);

    match list_tree(&parsed, stdout, stderr) {
        Ok(0) => ExitCode::SUCCESS,
        Ok(_) => ExitCode::from(PARTIAL_EXIT),
        Err(error) => {
            // Already failing with USAGE_EXIT; a broken stderr changes nothing.
            writeln!(stderr, "{PROGRAM_NAME}: {error}").ok();
            ExitCode::from(USAGE_EXIT)
        }
    }
}

/// Installs the stderr subscriber once; `RUST_LOG` overrides `-v`.
fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

/// Prints every visited entry and returns the number of entry errors.
fn list_tree<Out: Write, Err: Write>(
    parsed: &ParsedArgs,
    stdout: &mut Out,
    stderr: &mut Err,
) -> io::Result<usize> {
    let mut errors = 0;
    WalkBuilder::new(&parsed.root)
        .follow_symlinks(parsed.follow_symlinks)
        .walk::<_, io::Error>(|path, metadata, error| {
            let written = match error {
                Some(error) => {
                    errors += 1;
                    writeln!(stderr, "{PROGRAM_NAME}: {}", describe(path, &error))
                }
                None => write_entry(stdout, path, metadata, parsed.classify),
            };
            WalkControl::from(written)
        })?;
    Ok(errors)
}

fn write_entry<Out: Write, M: EntryMetadata>(
    stdout: &mut Out,
    path: &Path,
    metadata: Option<&M>,
    classify: bool,
) -> io::Result<()> {
    let suffix = match metadata.map(EntryMetadata::entry_type) {
        Some(EntryType::Directory) if classify => "/",
        Some(EntryType::Symlink) if classify => "@",
        _ => "",
    };
    writeln!(stdout, "{}{suffix}", path.display())
}

fn describe(path: &Path, error: &WalkError) -> String {
    if error.is_cycle() {
        format!(
            "{}: symlink cycle back to {}",
            path.display(),
            error.path().display()
        )
    } else {
        error.to_string()
    }
}
