use clap::{Args, Parser, Subcommand, ValueEnum};
use std::io::IsTerminal;
use std::path::PathBuf;

/// Output format for commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// JSON format
    Json,
    /// YAML format
    Yaml,
}

impl OutputFormat {
    /// Resolve the effective output format.
    /// If user specified a format, use it.
    /// Otherwise: TTY → Text, non-TTY (pipe) → Json
    pub fn resolve(user_choice: Option<OutputFormat>) -> OutputFormat {
        match user_choice {
            Some(fmt) => fmt,
            None => {
                if std::io::stdout().is_terminal() {
                    OutputFormat::Text
                } else {
                    OutputFormat::Json
                }
            }
        }
    }
}

#[derive(Parser)]
#[command(
    name = "orgcfg",
    about = "Reconcile Sentry organization integration configurations",
    version = env!("GIT_DESCRIBE"),
    after_help = "Logs are written to: ~/.local/share/orgcfg/logs/orgcfg.log"
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to orgcfg.yaml config file")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, help = "Suppress non-error output")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Which integration to act on
#[derive(Args, Debug, Clone)]
pub struct IdentityArgs {
    /// Organization slug (defaults to defaults.organization)
    #[arg(long)]
    pub org: Option<String>,

    /// Integration provider key, e.g. slack or github
    #[arg(long)]
    pub provider_key: String,

    /// Integration name (exact, case-sensitive)
    #[arg(long)]
    pub name: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the remote configuration of one integration
    Read {
        #[command(flatten)]
        identity: IdentityArgs,

        /// Output format (default: text for TTY, json for pipes)
        #[arg(long, short = 'o', value_enum)]
        format: Option<OutputFormat>,
    },

    /// Write a configuration document to one integration
    Apply {
        #[command(flatten)]
        identity: IdentityArgs,

        /// Configuration document as a JSON string
        #[arg(long, conflicts_with = "file", required_unless_present = "file")]
        data: Option<String>,

        /// Read the JSON configuration document from a file
        #[arg(long)]
        file: Option<PathBuf>,

        /// Merge into the existing document instead of replacing it
        #[arg(long)]
        fragment: bool,

        /// Integration id, skips the name lookup when replacing
        #[arg(long)]
        id: Option<String>,

        /// Output format (default: text for TTY, json for pipes)
        #[arg(long, short = 'o', value_enum)]
        format: Option<OutputFormat>,
    },

    /// Clear the configuration of one integration
    Delete {
        /// Composite id (organization/provider_key/internal_id)
        #[arg(long)]
        id: Option<String>,

        /// Organization slug, with --provider-key and --name instead of --id
        #[arg(long, conflicts_with = "id")]
        org: Option<String>,

        #[arg(long, conflicts_with = "id", required_unless_present = "id")]
        provider_key: Option<String>,

        #[arg(long, conflicts_with = "id", required_unless_present = "id")]
        name: Option<String>,
    },

    /// Apply a YAML state file and write the refreshed state back
    Sync {
        /// State file (organization, provider_key, name, config, optional id)
        state: PathBuf,

        /// Clear the remote configuration and drop the id from the file
        #[arg(long)]
        delete: bool,
    },

    /// Encode or decode composite ids
    Id {
        #[command(subcommand)]
        action: IdAction,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand)]
pub enum IdAction {
    /// Join organization, provider key and internal id
    Encode {
        organization: String,
        provider_key: String,
        internal_id: String,
    },

    /// Split a composite id into its parts
    Decode {
        id: String,

        /// Output format (default: text for TTY, json for pipes)
        #[arg(long, short = 'o', value_enum)]
        format: Option<OutputFormat>,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show {
        /// Output format (default: text for TTY, json for pipes)
        #[arg(long, short = 'o', value_enum)]
        format: Option<OutputFormat>,
    },
}
