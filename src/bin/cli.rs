use std::ffi::OsString;
use std::fmt;
use std::io::{BufRead, Write};
use std::process::ExitCode;
use std::str::FromStr;

use clap::{Arg, ArgAction, Command};
use logging::{FileRoute, Level, LoggerConfig, OutputFlags, ParseLevelError};

const PROGRAM_NAME: &str = "levellog";

/// Where each message is sent.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Target {
    Level(Level),
    /// Logged at fatal, then raised as a panic.
    Panic,
}

impl FromStr for Target {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("panic") {
            Ok(Self::Panic)
        } else {
            s.parse().map(Self::Level)
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Level(level) => level.fmt(f),
            Self::Panic => f.write_str("PANIC"),
        }
    }
}

#[derive(Debug)]
struct ParsedArgs {
    config: LoggerConfig,
    target: Target,
    message: Option<String>,
}

fn clap_command() -> Command {
    Command::new(PROGRAM_NAME)
        .about("Write messages through the leveled logger.")
        .arg(
            Arg::new("level")
                .long("level")
                .value_name("NAME")
                .help("Minimum level written; unknown names select info.")
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("log-file")
                .long("log-file")
                .value_name("LEVELS=PATH")
                .help("Route the listed levels to PATH, e.g. warn,error=errors.log.")
                .action(ArgAction::Append)
                .value_parser(|value: &str| value.parse::<FileRoute>()),
        )
        .arg(
            Arg::new("flags")
                .long("flags")
                .value_name("LIST")
                .help("Header fields: date,time,microseconds,longfile,shortfile,utc.")
                .action(ArgAction::Set)
                .value_parser(|value: &str| value.parse::<OutputFlags>()),
        )
        .arg(
            Arg::new("no-exit-on-fatal")
                .long("no-exit-on-fatal")
                .help("Keep running after a fatal message.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("target")
                .value_name("LEVEL")
                .help("debug, info, warn, error, fatal or panic.")
                .required(true)
                .value_parser(|value: &str| value.parse::<Target>()),
        )
        .arg(
            Arg::new("message")
                .value_name("MESSAGE")
                .help("Message words; read lines from standard input when absent.")
                .action(ArgAction::Append)
                .num_args(0..)
                .trailing_var_arg(true)
                .allow_hyphen_values(true),
        )
}

fn parse_args<I, S>(arguments: I) -> Result<ParsedArgs, clap::Error>
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
{
    let mut matches = clap_command().try_get_matches_from(arguments.into_iter().map(Into::into))?;

    let mut config = LoggerConfig::default();
    if let Some(name) = matches.remove_one::<String>("level") {
        config.level = Level::from_name_or_info(&name);
    }
    if let Some(flags) = matches.remove_one::<OutputFlags>("flags") {
        config.flags = flags;
    }
    config.fatal_causes_exit = !matches.get_flag("no-exit-on-fatal");
    config.files = matches
        .remove_many::<FileRoute>("log-file")
        .map(Iterator::collect)
        .unwrap_or_default();

    let target = matches
        .remove_one::<Target>("target")
        .unwrap_or(Target::Level(Level::Info));
    let message = matches
        .remove_many::<String>("message")
        .map(|words| words.collect::<Vec<_>>().join(" "));

    Ok(ParsedArgs {
        config,
        target,
        message,
    })
}

fn emit(target: Target, message: &str) {
    match target {
        Target::Level(Level::Fatal) => logging::fatal(format_args!("{message}")),
        Target::Level(level) => logging::global().log(level, format_args!("{message}")),
        Target::Panic => logging::panic(format_args!("{message}")).raise(),
    }
}

/// Parses `args`, configures the process-wide logger and emits the messages.
///
/// Messages come from the trailing arguments, joined by spaces, or from
/// `stdin` one line at a time. Usage errors are written to `stdout` or
/// `stderr` as clap directs and return status 2; configuration and input
/// failures return status 1.
pub fn run_with<I, In, Out, Err>(args: I, stdin: In, stdout: &mut Out, stderr: &mut Err) -> ExitCode
where
    I: IntoIterator,
    I::Item: Into<OsString>,
    In: BufRead,
    Out: Write,
    Err: Write,
{
    let parsed = match parse_args(args) {
        Ok(parsed) => parsed,
        Err(error) => {
            let rendered = error.render().to_string();
            let _ = if error.use_stderr() {
                stderr.write_all(rendered.as_bytes())
            } else {
                stdout.write_all(rendered.as_bytes())
            };
            return ExitCode::from(u8::try_from(error.exit_code()).unwrap_or(2));
        }
    };

    if let Err(error) = parsed.config.apply(logging::global()) {
        let _ = writeln!(stderr, "{PROGRAM_NAME}: {error}");
        return ExitCode::FAILURE;
    }

    let status = match parsed.message {
        Some(message) => {
            emit(parsed.target, &message);
            ExitCode::SUCCESS
        }
        None => emit_lines(parsed.target, stdin, stderr),
    };
    logging::close();
    status
}

fn emit_lines<In, Err>(target: Target, stdin: In, stderr: &mut Err) -> ExitCode
where
    In: BufRead,
    Err: Write,
{
    for line in stdin.lines() {
        match line {
            Ok(line) => emit(target, &line),
            Err(error) => {
                let _ = writeln!(stderr, "{PROGRAM_NAME}: reading standard input: {error}");
                return ExitCode::FAILURE;
            }
        }
    }
    ExitCode::SUCCESS
}
