use crate::domain::model::{EntryOutput, SortOrder, StorageKind, ValueFormat};
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_positive_number, validate_url, Validate,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "ark")]
#[command(about = "Manage and navigate resources organized in ARK roots")]
pub struct Cli {
    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List resources indexed under a root
    List {
        root_dir: Option<PathBuf>,

        #[arg(long, help = "Shape of every output line")]
        entry: Option<EntryOutput>,

        #[arg(long, help = "Print only resource ids")]
        entry_id: bool,

        #[arg(long, help = "Print only resource paths")]
        entry_path: bool,

        #[arg(long, help = "Add a last-modified column")]
        modified: bool,

        #[arg(long, help = "Add a tags column")]
        tags: bool,

        #[arg(long, help = "Add a scores column")]
        scores: bool,

        #[arg(long, help = "Sort by the modified column")]
        sort: Option<SortOrder>,

        #[arg(long, help = "Keep only entries carrying this tag")]
        filter: Option<String>,
    },

    /// Back up the .ark folder of every registered root
    Backup {
        roots_cfg: Option<PathBuf>,
    },

    /// Report resource id collisions under a root
    Collisions {
        root_dir: Option<PathBuf>,
    },

    /// Watch a root and report index changes
    Monitor {
        root_dir: Option<PathBuf>,

        /// Poll interval in milliseconds
        interval: Option<u64>,
    },

    /// Manage link resources
    #[command(subcommand)]
    Link(LinkCommand),

    /// Read and write a single resource's storage value
    #[command(subcommand)]
    File(FileCommand),

    /// Inspect storages
    #[command(subcommand)]
    Storage(StorageCommand),
}

#[derive(Debug, Subcommand)]
pub enum LinkCommand {
    /// Create a .link resource for a URL
    Create {
        #[arg(short, long)]
        root_dir: Option<PathBuf>,

        url: Option<String>,

        title: Option<String>,

        desc: Option<String>,
    },

    /// Load and print a stored link
    Load {
        #[arg(short, long)]
        root_dir: Option<PathBuf>,

        file_path: Option<PathBuf>,

        id: Option<String>,
    },
}

#[derive(Debug, Subcommand)]
pub enum FileCommand {
    /// Append content onto a resource's stored value
    Append {
        root_dir: PathBuf,

        storage: String,

        id: String,

        content: String,

        #[arg(short, long)]
        format: Option<ValueFormat>,

        #[arg(short = 't', long = "type")]
        kind: Option<StorageKind>,
    },

    /// Replace a resource's stored value
    Insert {
        root_dir: PathBuf,

        storage: String,

        id: String,

        content: String,

        #[arg(short, long)]
        format: Option<ValueFormat>,

        #[arg(short = 't', long = "type")]
        kind: Option<StorageKind>,
    },

    /// Print a resource's stored value
    Read {
        root_dir: PathBuf,

        storage: String,

        id: String,

        #[arg(short = 't', long = "type")]
        kind: Option<StorageKind>,
    },
}

#[derive(Debug, Subcommand)]
pub enum StorageCommand {
    /// List the resource ids recorded in a storage
    List {
        #[arg(short, long)]
        root_dir: Option<PathBuf>,

        storage: Option<String>,

        #[arg(short = 't', long = "type")]
        kind: Option<StorageKind>,

        #[arg(short, long, help = "Show every stored version")]
        versions: bool,
    },
}

impl Validate for Cli {
    fn validate(&self) -> Result<()> {
        match &self.command {
            Command::Monitor {
                interval: Some(interval),
                ..
            } => validate_positive_number("interval", *interval, 1),
            Command::Backup {
                roots_cfg: Some(cfg),
            } => validate_path("roots_cfg", &cfg.to_string_lossy()),
            Command::Link(LinkCommand::Create { url, title, .. }) => {
                if let Some(url) = url {
                    validate_url("url", url)?;
                }
                if let Some(title) = title {
                    validate_non_empty_string("title", title)?;
                }
                Ok(())
            }
            Command::File(FileCommand::Append { content, .. })
            | Command::File(FileCommand::Insert { content, .. }) => {
                validate_non_empty_string("content", content)
            }
            _ => Ok(()),
        }
    }
}
