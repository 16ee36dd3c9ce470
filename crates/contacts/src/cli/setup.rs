use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "contacts",
    bin_name = "contacts",
    version,
    disable_help_subcommand = true
)]
#[command(about = "Offline personal address book", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Directory holding the contacts file (overrides config and CONTACTS_DATA_DIR)
    #[arg(long, global = true, value_name = "DIR", help_heading = "Options")]
    pub data_dir: Option<PathBuf>,

    /// Config file to read instead of the default location
    #[arg(long, global = true, value_name = "FILE", help_heading = "Options")]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List contacts grouped by initial
    #[command(alias = "ls", display_order = 1)]
    List {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a single contact
    #[command(alias = "v", display_order = 2)]
    Show {
        /// Contact id (a unique prefix is enough)
        id: String,
    },

    /// Add a contact
    #[command(alias = "n", display_order = 3)]
    Add {
        #[command(flatten)]
        fields: NewContactArgs,
    },

    /// Change fields of a contact
    #[command(alias = "e", display_order = 4)]
    Update {
        /// Contact id (a unique prefix is enough)
        id: String,

        #[command(flatten)]
        fields: UpdateContactArgs,
    },

    /// Remove a contact
    #[command(alias = "rm", display_order = 5)]
    Remove {
        /// Contact id (a unique prefix is enough)
        id: String,
    },

    /// Print the path of the contacts file
    #[command(display_order = 10)]
    Path,

    /// Print the effective configuration
    #[command(display_order = 11)]
    Config,

    /// Delete the contacts file (the next run starts from the defaults)
    #[command(display_order = 12)]
    Reset,
}

#[derive(Args, Debug)]
pub struct NewContactArgs {
    #[arg(long)]
    pub first_name: String,

    #[arg(long)]
    pub last_name: String,

    #[arg(long)]
    pub email: String,

    /// Mobile number, e.g. 09123456789
    #[arg(long)]
    pub phone: String,

    /// Absolute URL of a profile picture
    #[arg(long)]
    pub avatar_url: Option<String>,
}

#[derive(Args, Debug)]
pub struct UpdateContactArgs {
    #[arg(long)]
    pub first_name: Option<String>,

    #[arg(long)]
    pub last_name: Option<String>,

    #[arg(long)]
    pub email: Option<String>,

    #[arg(long)]
    pub phone: Option<String>,

    /// Absolute URL of a profile picture ("" clears it)
    #[arg(long)]
    pub avatar_url: Option<String>,
}
