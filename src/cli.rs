//! Command-line surface: `ica <analyzer> -c <contacts...> [options]`.
//!
//! The same binary also runs one analyzer directly when it is invoked
//! under that analyzer's name (e.g. through a symlink named
//! `message_totals`), in which case the analyzer's arguments are accepted
//! at the top level.
//!
//! CHANGELOG:
//! - 10/18/2026 - Analyzer subcommands built from the registry; common
//!   conversation options shared via clap derive

use clap::{ArgMatches, Args, Command, FromArgMatches};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::analyzers::{self, Analyzer};
use crate::config::SourcePaths;
use crate::error::{IcaError, Result};
use crate::output::{self, RenderOptions};
use crate::pipeline::{get_conversation_data, ConversationRequest};

pub const BINARY_NAME: &str = "ica";

/// Options every analyzer accepts.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct CommonArgs {
    /// Names, phone numbers, or email addresses of everyone else in the conversation
    #[arg(short = 'c', long = "contacts", visible_alias = "contact", num_args = 1.., required = true)]
    pub contacts: Vec<String>,

    /// IANA time zone for timestamps and dates (default: local time)
    #[arg(short = 't', long)]
    pub timezone: Option<String>,

    /// Only include messages at or after this date (YYYY-MM-DD or ISO 8601)
    #[arg(long)]
    pub from_date: Option<String>,

    /// Only include messages before this date (YYYY-MM-DD or ISO 8601)
    #[arg(long)]
    pub to_date: Option<String>,

    /// Only include messages from these people: me, them, all, or a participant
    #[arg(long, num_args = 1..)]
    pub from_person: Vec<String>,

    /// Output format: csv, markdown, excel, json (default: inferred from --output, else a text table)
    #[arg(short = 'f', long)]
    pub format: Option<String>,

    /// Write results to this file instead of stdout
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,
}

impl CommonArgs {
    pub fn to_request(&self) -> ConversationRequest {
        ConversationRequest {
            contacts: self.contacts.clone(),
            timezone: self.timezone.clone(),
            from_date: self.from_date.clone(),
            to_date: self.to_date.clone(),
            from_person: self.from_person.clone(),
        }
    }
}

/// How the binary was started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    /// `ica <analyzer> ...`
    TopLevel,
    /// Invoked under an analyzer's own name.
    Direct(String),
}

impl Invocation {
    /// Pick the invocation from `argv[0]`.
    pub fn detect(program: &Path) -> Self {
        let stem = program.file_stem().and_then(|s| s.to_str()).unwrap_or(BINARY_NAME);
        if analyzers::find(stem).is_some() {
            Self::Direct(stem.to_string())
        } else {
            Self::TopLevel
        }
    }
}

/// A parsed command line.
#[derive(Debug)]
pub struct ParsedCommand {
    pub analyzer: String,
    pub common: CommonArgs,
    /// Matches holding the analyzer's own arguments.
    pub matches: ArgMatches,
}

fn analyzer_command(analyzer: &dyn Analyzer, name: &'static str) -> Command {
    let command = Command::new(name).about(analyzer.about());
    CommonArgs::augment_args(analyzer.args(command))
}

/// The clap parser for `invocation`.
pub fn build_command(invocation: &Invocation) -> Result<Command> {
    match invocation {
        Invocation::TopLevel => {
            let subcommands = analyzers::builtin()
                .into_iter()
                .map(|(name, analyzer)| analyzer_command(analyzer.as_ref(), name));
            Ok(Command::new(BINARY_NAME)
                .version(env!("CARGO_PKG_VERSION"))
                .about("Analyze a single iMessage conversation")
                .propagate_version(true)
                .subcommand_required(true)
                .arg_required_else_help(true)
                .subcommands(subcommands))
        }
        Invocation::Direct(name) => {
            let analyzer = analyzers::find(name)
                .ok_or_else(|| IcaError::Analyzer(format!("Unknown analyzer \"{}\"", name)))?;
            Ok(analyzer_command(analyzer.as_ref(), analyzer.name()).version(env!("CARGO_PKG_VERSION")))
        }
    }
}

/// Parse `argv`. Help, version, and usage errors come back as `clap::Error`.
pub fn parse<I, T>(invocation: &Invocation, argv: I) -> Result<std::result::Result<ParsedCommand, clap::Error>>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let command = build_command(invocation)?;
    let matches = match command.try_get_matches_from(argv) {
        Ok(matches) => matches,
        Err(e) => return Ok(Err(e)),
    };

    let (analyzer, matches) = match invocation {
        Invocation::Direct(name) => (name.clone(), matches),
        Invocation::TopLevel => match matches.subcommand() {
            Some((name, sub)) => (name.to_string(), sub.clone()),
            None => {
                return Err(IcaError::Analyzer("No analyzer given".to_string()));
            }
        },
    };

    Ok(CommonArgs::from_arg_matches(&matches).map(|common| ParsedCommand {
        analyzer,
        common,
        matches,
    }))
}

/// Extract the conversation, run the analyzer, and render its result.
pub fn run(paths: &SourcePaths, command: &ParsedCommand) -> Result<()> {
    let analyzer = analyzers::find(&command.analyzer)
        .ok_or_else(|| IcaError::Analyzer(format!("Unknown analyzer \"{}\"", command.analyzer)))?;

    // Reject a bad format before doing any work
    output::OutputFormat::resolve(command.common.format.as_deref(), command.common.output.as_deref())?;

    let dataset = get_conversation_data(paths, &command.common.to_request())?;
    let result = analyzer.analyze(&dataset, &command.matches)?;
    debug!(analyzer = analyzer.name(), rows = result.len(), "analysis complete");

    output::render(
        &result,
        command.common.format.as_deref(),
        command.common.output.as_deref(),
        &RenderOptions::default(),
    )
}
