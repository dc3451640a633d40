use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use rota_core::{Role, ServiceDay};

#[derive(Parser)]
#[command(name = "rota")]
#[command(about = "Volunteer duty rota for weekly services", version)]
pub struct Cli {
    /// Path to rota.toml (default: ~/.rota/rota.toml)
    #[arg(short, long, env = "ROTA_CONFIG", global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show which service tags a date can be recorded under
    Day {
        /// YYYY-MM-DD (default: today)
        date: Option<NaiveDate>,
    },
    /// Record a service
    Add(RecordArgs),
    /// Change fields of an existing record
    Edit {
        id: String,
        #[command(flatten)]
        fields: RecordArgs,
    },
    /// Delete a record
    Delete {
        id: String,
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
    /// List records, optionally filtered by a search term
    List {
        search: Option<String>,
    },
    /// List months that have records
    Months,
    /// Who has gone longest without a role
    Rotation {
        #[arg(long)]
        day: Option<ServiceDay>,
        #[arg(long)]
        role: Option<Role>,
        #[arg(long)]
        json: bool,
    },
    /// Workers by number of duties held
    Ranking {
        #[arg(long)]
        json: bool,
    },
    /// Every service where a worker held a role
    Details { worker: String, role: Role },
    /// Print shareable text and its compose link
    Share {
        /// A single record
        id: Option<String>,
        /// A whole month, as YYYY-MM
        #[arg(long, conflicts_with = "id")]
        month: Option<String>,
        /// The full history
        #[arg(long, conflicts_with_all = ["id", "month"])]
        all: bool,
        /// Services on or after this date (YYYY-MM-DD)
        #[arg(long, conflicts_with_all = ["id", "month", "all"])]
        from: Option<NaiveDate>,
        /// Services on or before this date (YYYY-MM-DD)
        #[arg(long, conflicts_with_all = ["id", "month", "all"])]
        to: Option<NaiveDate>,
        /// Open the compose link in the browser
        #[arg(long)]
        open: bool,
    },
    /// Write a JSON backup of every record
    Export {
        #[arg(long, default_value = ".")]
        dir: PathBuf,
        /// Hand the backup file to the platform's share sheet
        #[arg(long)]
        share: bool,
    },
    /// Replace all records with a JSON backup
    Import { file: PathBuf },
    /// Delete every record
    Reset {
        #[arg(long)]
        yes: bool,
    },
}

/// Form fields shared by `add` and `edit`. Omitted fields are left unset
/// (add) or unchanged (edit).
#[derive(Args, Default)]
pub struct RecordArgs {
    /// Service date, YYYY-MM-DD (add defaults to today)
    #[arg(long)]
    pub date: Option<NaiveDate>,
    /// Service tag (EBD, DOM, SEG, TER, QUA, QUI, SEX, SAB); needed on Sundays
    #[arg(long)]
    pub day: Option<ServiceDay>,
    #[arg(long)]
    pub gatekeeper: Option<String>,
    #[arg(long)]
    pub worship: Option<String>,
    #[arg(long)]
    pub sermon: Option<String>,
    /// Scripture text
    #[arg(long)]
    pub text: Option<String>,
}

impl RecordArgs {
    pub fn role(&self, role: Role) -> Option<&str> {
        match role {
            Role::Gatekeeper => self.gatekeeper.as_deref(),
            Role::Worship => self.worship.as_deref(),
            Role::Sermon => self.sermon.as_deref(),
        }
    }
}
