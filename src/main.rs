//! stockup: CLI for the inventory client core
//!
//! Drives the same form and dashboard state the app uses, from files on disk.
//! Nothing is sent to the backend; requests are printed instead.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use stockup::auth::{LoginForm, SessionStore};
use stockup::config::Settings;

mod commands;

#[derive(Parser)]
#[command(name = "stockup")]
#[command(about = "Inventory entry, sales cart and dashboard helper", long_about = None)]
#[command(version)]
struct Cli {
    /// Log debug details to stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one keystroke through a comma-formatted number input
    Format {
        /// Input text after the keystroke, e.g. 9999
        input: String,

        /// Caret offset inside the input (defaults to the end)
        #[arg(long, short)]
        caret: Option<usize>,

        /// Value the field held before the keystroke
        #[arg(long, short)]
        previous: Option<String>,
    },

    /// Fill the bulk entry form from a file of `name | cost | selling | qty` lines
    BulkAdd {
        /// Input file
        file: PathBuf,

        /// Blank rows the form starts with (default from config)
        #[arg(long)]
        rows: Option<usize>,

        /// Write the save payload here instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// List products from a saved catalog
    Products {
        /// JSON file with the product list
        catalog: PathBuf,

        /// Search name, description and tags
        #[arg(long, short)]
        search: Option<String>,

        /// Only products with this many units or fewer
        #[arg(long)]
        low_stock: Option<i64>,

        /// Show product IDs
        #[arg(long)]
        with_id: bool,
    },

    /// Build a sale from product picks (`ID` adds one, `ID=QTY` sets)
    Cart {
        /// JSON file with the product list
        catalog: PathBuf,

        /// Product picks
        picks: Vec<String>,

        /// Print the sale records to send instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show the request behind a dashboard tab and render a saved response
    Dashboard {
        /// Tab: summary, sales, top, stock
        #[arg(long, short, default_value = "summary")]
        tab: String,

        /// Zero-based page of the sales tab
        #[arg(long, default_value_t = 0)]
        page: u32,

        /// Range start (YYYY-MM-DDTHH:MM)
        #[arg(long)]
        from: Option<String>,

        /// Range end (YYYY-MM-DDTHH:MM)
        #[arg(long)]
        to: Option<String>,

        /// Number of top products
        #[arg(long)]
        limit: Option<u32>,

        /// Low-stock threshold
        #[arg(long)]
        threshold: Option<i64>,

        /// Saved backend response to render
        #[arg(long, short)]
        file: Option<PathBuf>,
    },

    /// Manage the stored login session
    Session {
        #[command(subcommand)]
        action: SessionAction,
    },
}

#[derive(Subcommand)]
enum SessionAction {
    /// Show whether a session is stored
    Show,

    /// Validate login details and print the login request
    Login {
        #[arg(long)]
        email: String,

        #[arg(long)]
        password: String,
    },

    /// Store tokens from a saved login or sign-up response
    Save {
        /// JSON response with accessToken and refreshToken
        response: PathBuf,
    },

    /// Print the Authorization header value
    Header,

    /// Show how a failed response would be handled
    Check {
        /// HTTP status of the failed response
        status: u16,

        /// The request was already retried once
        #[arg(long)]
        retried: bool,
    },

    /// Record a token refresh (omit the token when the refresh failed)
    Refreshed {
        access_token: Option<String>,
    },

    /// Forget the stored tokens
    Clear,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    stockup::logging::init(cli.verbose);

    let output = match cli.command {
        Commands::Format {
            input,
            caret,
            previous,
        } => commands::format::execute(&input, caret, previous.as_deref())?,

        Commands::BulkAdd { file, rows, output } => {
            let rows = commands::bulk_add::initial_rows(rows, Settings::load)?;
            commands::bulk_add::execute(&file, rows, output.as_deref())?
        }

        Commands::Products {
            catalog,
            search,
            low_stock,
            with_id,
        } => {
            let options = commands::products::ProductsOptions {
                search,
                low_stock,
                with_id,
            };
            commands::products::execute(&catalog, &options)?
        }

        Commands::Cart {
            catalog,
            picks,
            json,
        } => commands::cart::execute(&catalog, &picks, json)?,

        Commands::Dashboard {
            tab,
            page,
            from,
            to,
            limit,
            threshold,
            file,
        } => {
            let options = commands::dashboard::DashboardOptions {
                tab,
                page,
                from,
                to,
                limit,
                threshold,
                file,
            };
            commands::dashboard::execute(&options, &Settings::load()?)?
        }

        Commands::Session { action } => {
            let store = SessionStore::default_location()?;
            match action {
                SessionAction::Show => commands::session::show(&store)?,
                SessionAction::Login { email, password } => {
                    let form = LoginForm { email, password };
                    commands::session::login(&form, &Settings::load()?.endpoints()?)?
                }
                SessionAction::Save { response } => commands::session::save(&store, &response)?,
                SessionAction::Header => commands::session::header(&store)?,
                SessionAction::Check { status, retried } => {
                    commands::session::check(&store, status, retried)?
                }
                SessionAction::Refreshed { access_token } => {
                    commands::session::refreshed(&store, access_token)?
                }
                SessionAction::Clear => commands::session::clear(&store)?,
            }
        }
    };

    println!("{}", output);
    Ok(())
}
