//! CLI argument parsing for the walkthrough tools.
//!
//! The CLI stays thin: each command maps onto one library operation so the
//! editor backend and the command line share identical behavior.
use crate::overlay::Restriction;
use crate::schema::{ClassToken, Phase, SchoolId};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Root CLI entrypoint.
#[derive(Parser, Debug)]
#[command(
    name = "wtr",
    version,
    about = "Resolve, validate, and author CDL walkthrough scripts",
    after_help = "Examples:\n  wtr classes\n  wtr default --class class-b\n  wtr validate --file custom.json\n  wtr resolve --class class-a --school school1 --restriction no-air --phase pre-trip\n  wtr save --class class-a --school school1 --file custom.json --author op@example.com\n  wtr reset --class class-a --school school1",
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct RootArgs {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by every command.
#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// Resolver config JSON (see `wtr init`)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Custom script store directory (overrides config)
    #[arg(long, global = true, value_name = "DIR")]
    pub store: Option<PathBuf>,

    /// School overlay registry JSON (overrides config)
    #[arg(long, global = true, value_name = "FILE")]
    pub overlays: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    Init(InitArgs),
    /// List registered class tokens
    Classes,
    Default(DefaultArgs),
    Validate(ValidateArgs),
    Resolve(ResolveArgs),
    Save(SaveArgs),
    Reset(ResetArgs),
}

/// Init command inputs.
#[derive(Parser, Debug)]
#[command(about = "Write a resolver config stub")]
pub struct InitArgs {
    /// Where to write the config; prints the stub to stdout when omitted
    #[arg(long, value_name = "FILE")]
    pub path: Option<PathBuf>,

    /// Overwrite an existing config
    #[arg(long, requires = "path")]
    pub force: bool,
}

#[derive(Parser, Debug)]
#[command(about = "Print the default script for a class")]
pub struct DefaultArgs {
    /// Class token (class-a, class-a-without-air-electric, class-b, passenger-bus)
    #[arg(long = "class", value_name = "TOKEN")]
    pub class_token: ClassToken,
}

#[derive(Parser, Debug)]
#[command(about = "Validate candidate walkthrough JSON")]
pub struct ValidateArgs {
    /// Candidate script JSON
    #[arg(long, value_name = "FILE")]
    pub file: PathBuf,

    /// Emit machine-readable JSON output
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
#[command(about = "Resolve the walkthrough for a school and class")]
pub struct ResolveArgs {
    #[arg(long = "class", value_name = "TOKEN")]
    pub class_token: ClassToken,

    #[arg(long, value_name = "ID")]
    pub school: SchoolId,

    /// Ignore any persisted custom script
    #[arg(long)]
    pub no_custom: bool,

    /// Fall back to defaults when the custom script is invalid
    #[arg(long)]
    pub soft_fail: bool,

    /// License restriction overlay (repeatable)
    #[arg(long = "restriction", value_name = "R")]
    pub restrictions: Vec<Restriction>,

    /// Test phase overlay
    #[arg(long, value_name = "P")]
    pub phase: Option<Phase>,
}

#[derive(Parser, Debug)]
#[command(about = "Validate and save a custom script")]
pub struct SaveArgs {
    #[arg(long = "class", value_name = "TOKEN")]
    pub class_token: ClassToken,

    #[arg(long, value_name = "ID")]
    pub school: SchoolId,

    /// Candidate script JSON
    #[arg(long, value_name = "FILE")]
    pub file: PathBuf,

    /// Operator identity recorded as updatedBy
    #[arg(long, value_name = "ID")]
    pub author: String,

    /// Source tag recorded with the save
    #[arg(long, value_name = "TAG", default_value = crate::store::EDITOR_SOURCE)]
    pub source: String,
}

#[derive(Parser, Debug)]
#[command(about = "Delete a custom script so the class resolves from defaults")]
pub struct ResetArgs {
    #[arg(long = "class", value_name = "TOKEN")]
    pub class_token: ClassToken,

    #[arg(long, value_name = "ID")]
    pub school: SchoolId,
}
