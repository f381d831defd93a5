//! CLI argument definitions using clap derive

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use std::path::PathBuf;

/// stack-lookup - resolve CloudFormation outputs and SSM parameters
///
/// Values are cached in a local JSON file so repeated builds skip the
/// network round trip.
#[derive(Parser, Debug)]
#[command(name = "stack-lookup")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "STACK_LOOKUP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Skip local .stack-lookup.toml discovery
    #[arg(long, global = true)]
    pub no_local: bool,

    /// Lookup cache file (overrides cache.path)
    #[arg(long, global = true, env = "STACK_LOOKUP_CACHE")]
    pub cache_file: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve a CloudFormation stack output
    Output(OutputArgs),

    /// Resolve an SSM parameter
    Parameter(ParameterArgs),

    /// Fetch a value from AWS without the cache, printing it as a JSON string
    Fetch(FetchArgs),

    /// Inspect the lookup cache
    Cache(CacheArgs),

    /// Show or edit configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the output command
#[derive(Parser, Debug)]
pub struct OutputArgs {
    /// AWS account ID the stack lives in
    #[arg(short, long, env = "CDK_DEFAULT_ACCOUNT")]
    pub account: String,

    /// AWS region the stack lives in
    #[arg(short, long, env = "CDK_DEFAULT_REGION")]
    pub region: String,

    /// Stack name
    #[arg(short, long)]
    pub stack: String,

    /// Output name
    pub name: String,

    /// Print the value JSON-encoded
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the parameter command
#[derive(Parser, Debug)]
pub struct ParameterArgs {
    /// AWS account ID the parameter lives in
    #[arg(short, long, env = "CDK_DEFAULT_ACCOUNT")]
    pub account: String,

    /// AWS region the parameter lives in
    #[arg(short, long, env = "CDK_DEFAULT_REGION")]
    pub region: String,

    /// Parameter name
    pub name: String,

    /// Print the value JSON-encoded
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the fetch command
#[derive(Parser, Debug)]
pub struct FetchArgs {
    #[command(subcommand)]
    pub kind: FetchKind,
}

/// Fetch subcommands, positional arguments only
#[derive(Subcommand, Debug)]
pub enum FetchKind {
    /// Fetch a stack output
    Output {
        account_id: String,
        region: String,
        stack_name: String,
        output_name: String,
    },

    /// Fetch a parameter
    Parameter {
        account_id: String,
        region: String,
        parameter_name: String,
    },
}

/// Arguments for the cache command
#[derive(Parser, Debug)]
pub struct CacheArgs {
    /// Subcommand for cache
    #[command(subcommand)]
    pub action: CacheAction,
}

/// Cache subcommands
#[derive(Subcommand, Debug)]
pub enum CacheAction {
    /// List cached values
    List {
        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Show the cache file path
    Path,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Subcommand for config
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Initialize default configuration
    Init {
        /// Overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., aws.profile)
        key: String,
        /// Value to set
        value: String,
        /// Write to project-local .stack-lookup.toml instead of global config
        #[arg(long)]
        local: bool,
    },
}

/// Arguments for the completions command
#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Target shell
    pub shell: Shell,
}

/// Output format for listings
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    Table,
    /// JSON output
    Json,
    /// Simple text (key=value per line)
    Plain,
}
