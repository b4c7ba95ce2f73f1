use clap::{Args, Parser, Subcommand};
use paydash::model::{CustomerPatch, CustomerStatus};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "paydash", bin_name = "paydash", version)]
#[command(
    about = "Terminal dashboard for customer payments",
    long_about = "Terminal dashboard for customer payments.\n\n\
                  Run without a command to start an interactive session that reads one \
                  command per line from stdin."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Directory holding the customer data and config.json
    #[arg(
        long,
        global = true,
        env = "PAYDASH_HOME",
        value_name = "DIR",
        help_heading = "Options"
    )]
    pub data_dir: Option<PathBuf>,

    /// Verbose output (debug logs on stderr)
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,
}

/// One line of the interactive session, parsed with the same commands.
#[derive(Parser, Debug)]
#[command(name = "paydash", no_binary_name = true, disable_version_flag = true)]
pub struct ReplLine {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Show the customer table
    #[command(alias = "ls", display_order = 1)]
    List {
        /// Search term
        #[arg(short, long)]
        search: Option<String>,

        /// Page to show
        #[arg(short, long)]
        page: Option<usize>,

        /// Rows per page
        #[arg(short, long)]
        rows: Option<usize>,
    },

    /// Filter by name, customer id, description or status (no text clears it)
    #[command(display_order = 2)]
    Search {
        #[arg(num_args = 0.., allow_hyphen_values = true)]
        text: Vec<String>,
    },

    /// Go to a page
    #[command(display_order = 3)]
    Page { page: usize },

    /// Next page
    #[command(alias = "n", display_order = 4)]
    Next,

    /// Previous page
    #[command(alias = "p", display_order = 5)]
    Prev,

    /// Set rows per page
    #[command(display_order = 6)]
    Rows { rows: usize },

    /// Toggle selection of rows (e.g. 1 3-5 customer-12)
    #[command(alias = "s", display_order = 10)]
    Select {
        #[arg(required = true, num_args = 1..)]
        rows: Vec<String>,
    },

    /// Select every row on the page, or deselect them if all are selected
    #[command(display_order = 11)]
    SelectPage,

    /// Clear the selection
    #[command(display_order = 12)]
    Clear,

    /// Open the add form
    #[command(display_order = 20)]
    New,

    /// Open the update form for a row
    #[command(alias = "e", display_order = 21)]
    Edit { row: String },

    /// Run the header button: add, update the selected row, or delete the selection
    #[command(alias = "a", display_order = 22)]
    Action,

    /// Fill in and submit the open form
    #[command(display_order = 23)]
    Save {
        #[command(flatten)]
        fields: FormArgs,
    },

    /// Close the open form without saving
    #[command(display_order = 24)]
    Cancel,

    /// Add a customer
    #[command(display_order = 30)]
    Add {
        #[command(flatten)]
        fields: FormArgs,
    },

    /// Update a customer (unset fields keep their current value)
    #[command(display_order = 31)]
    Update {
        row: String,

        #[command(flatten)]
        fields: FormArgs,
    },

    /// Delete rows, or the selection when no rows are given
    #[command(alias = "rm", display_order = 32)]
    Delete { rows: Vec<String> },

    /// Get or set configuration
    #[command(display_order = 40)]
    Config {
        /// Configuration key (rows-per-page, latency-ms, seed-count)
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,
    },

    /// Leave the interactive session
    #[command(alias = "exit", display_order = 41)]
    Quit,
}

#[derive(Args, Debug, Clone, Default, PartialEq)]
pub struct FormArgs {
    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    /// Open, Paid, Inactive or Due
    #[arg(long, value_parser = parse_status)]
    pub status: Option<CustomerStatus>,

    /// Rate (CAD)
    #[arg(long, allow_negative_numbers = true)]
    pub rate: Option<f64>,

    /// Balance (CAD)
    #[arg(long, allow_negative_numbers = true)]
    pub balance: Option<f64>,

    /// Deposit (CAD)
    #[arg(long, allow_negative_numbers = true)]
    pub deposit: Option<f64>,
}

impl FormArgs {
    pub fn patch(&self) -> CustomerPatch {
        CustomerPatch {
            name: self.name.clone(),
            description: self.description.clone(),
            status: self.status,
            rate: self.rate,
            balance: self.balance,
            deposit: self.deposit,
        }
    }
}

fn parse_status(s: &str) -> Result<CustomerStatus, String> {
    s.parse()
}
