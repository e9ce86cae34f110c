//! Command-line front end for a pantry database.
//!
//! # Responsibility
//! - Bind session operations (list/add/edit/remove/alerts) to subcommands.
//! - Keep presentation here; all item rules live in `pantry_core`.

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use log::error;
use pantry_core::db::open_db;
use pantry_core::{
    format_date, format_quantity, init_logging, Category, Item, ItemFilter, ItemId, Location,
    OwnerId, PantryConfig, PantrySession, SqliteItemStore, Unit,
};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "pantry")]
#[command(about = "Track pantry items, expiration dates and low stock")]
#[command(version)]
struct Cli {
    /// SQLite database file (created when missing)
    #[arg(long, default_value = "pantry.sqlite3")]
    db: PathBuf,

    /// Authenticated user handle; omit for an unscoped pantry
    #[arg(long)]
    owner: Option<String>,

    /// JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Absolute directory for rolling log files
    #[arg(long)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List items, optionally filtered and searched
    List {
        #[arg(long)]
        category: Option<Category>,
        /// Only items expiring on or before this date (YYYY-MM-DD)
        #[arg(long)]
        expires_by: Option<NaiveDate>,
        #[arg(long)]
        min_qty: Option<f64>,
        /// Case-insensitive match on name or category
        #[arg(long)]
        search: Option<String>,
        /// Print items as a JSON array
        #[arg(long)]
        json: bool,
    },

    /// Add a new item
    Add {
        name: String,
        #[command(flatten)]
        fields: FieldArgs,
    },

    /// Edit an existing item; omitted fields keep their values
    Edit {
        id: ItemId,
        #[arg(long)]
        name: Option<String>,
        #[command(flatten)]
        fields: FieldArgs,
    },

    /// Delete an item
    Remove { id: ItemId },

    /// Show expiring and low-stock notifications
    Alerts {
        /// Print notifications as a JSON array
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args)]
struct FieldArgs {
    #[arg(long)]
    category: Option<Category>,
    #[arg(long)]
    quantity: Option<f64>,
    #[arg(long)]
    unit: Option<Unit>,
    /// Expiration date (YYYY-MM-DD)
    #[arg(long)]
    expires: Option<NaiveDate>,
    #[arg(long)]
    location: Option<Location>,
    #[arg(long)]
    notes: Option<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            error!("event=cli_exit module=cli status=error");
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), String> {
    let mut config = match &cli.config {
        Some(path) => PantryConfig::load(path).map_err(|err| err.to_string())?,
        None => PantryConfig::default(),
    };
    if cli.log_dir.is_some() {
        config.logging.log_dir = cli.log_dir.clone();
    }
    init_logging(&config.logging).map_err(|err| err.to_string())?;

    let conn = open_db(&cli.db).map_err(|err| err.to_string())?;
    let owner = cli.owner.and_then(OwnerId::new);
    let mut session = PantrySession::new(SqliteItemStore::new(&conn), owner, config);
    session.start().map_err(|err| err.to_string())?;

    match cli.command {
        Command::List {
            category,
            expires_by,
            min_qty,
            search,
            json,
        } => {
            session.set_filter(ItemFilter {
                category,
                expires_on_or_before: expires_by,
                min_quantity: min_qty,
            });
            session.set_search_text(search.unwrap_or_default());
            let items = session.visible_items();
            if json {
                print_json(&items)?;
            } else if items.is_empty() {
                println!("No items in inventory.");
            } else {
                for item in items {
                    print_item(item);
                }
            }
        }
        Command::Add { name, fields } => {
            session.begin_create();
            session.draft_mut().name = name;
            fields.apply(&mut session);
            let confirmation = session.submit().map_err(|err| err.to_string())?;
            println!("{} ({})", confirmation.message(), confirmation.item_id);
        }
        Command::Edit { id, name, fields } => {
            session.begin_edit(id).map_err(|err| err.to_string())?;
            if let Some(name) = name {
                session.draft_mut().name = name;
            }
            fields.apply(&mut session);
            let confirmation = session.submit().map_err(|err| err.to_string())?;
            println!("{}", confirmation.message());
        }
        Command::Remove { id } => {
            let confirmation = session.remove_item(id).map_err(|err| err.to_string())?;
            println!("{}", confirmation.message());
        }
        Command::Alerts { json } => {
            let notifications = session.notifications();
            if json {
                print_json(notifications)?;
            } else {
                println!("Notifications ({})", notifications.len());
                for notification in notifications {
                    println!("- {}", notification.message());
                }
            }
        }
    }

    if let Some(err) = session.last_error() {
        eprintln!("warning: {err}");
    }
    Ok(())
}

impl FieldArgs {
    fn apply(self, session: &mut PantrySession<SqliteItemStore<'_>>) {
        let draft = session.draft_mut();
        if let Some(category) = self.category {
            draft.category = Some(category);
        }
        if let Some(quantity) = self.quantity {
            draft.quantity = Some(quantity);
        }
        if let Some(unit) = self.unit {
            draft.unit = Some(unit);
        }
        if let Some(expires) = self.expires {
            draft.expiration_date = Some(expires);
        }
        if let Some(location) = self.location {
            draft.location = Some(location);
        }
        if let Some(notes) = self.notes {
            draft.notes = notes;
        }
    }
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<(), String> {
    let text = serde_json::to_string_pretty(value).map_err(|err| err.to_string())?;
    println!("{text}");
    Ok(())
}

fn print_item(item: &Item) {
    let expires = item
        .expiration_date
        .map(format_date)
        .unwrap_or_else(|| "N/A".to_string());
    println!("{}  [{}]", item.display_name(), item.id);
    println!("  Category: {}", item.category);
    println!(
        "  Quantity: {} {}",
        format_quantity(item.quantity),
        item.unit
    );
    println!("  Expiration Date: {expires}");
    println!("  Location: {}", item.location);
    println!("  Notes: {}", item.notes);
    println!(
        "  Last Updated: {}",
        item.last_updated.format("%Y-%m-%d %H:%M:%S UTC")
    );
}
