use spacevision_core::common::{IdentityKey, RemoteRecord};
use spacevision_core::config::AppConfig;
use spacevision_core::dates;
use spacevision_core::logging;
use spacevision_core::module::favorites::{FavoritesContext, FavoritesStore, FileKeyValueStore};
use spacevision_core::module::nasa::{FetchClient, NasaApi, ReqwestTransport, RoverQuery};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "spacevision", version, about = "Browse space imagery and keep favorites")]
struct Cli {
    /// Path to the TOML config file
    #[arg(long, global = true, env = "SPACEVISION_CONFIG", default_value = "config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Astronomy picture of the day
    Apod {
        /// YYYY-MM-DD, defaults to today
        #[arg(long)]
        date: Option<String>,
    },
    /// Random pictures of the day
    Random {
        #[arg(long, default_value_t = 5)]
        count: u32,
    },
    /// Mars rover photos
    Mars {
        #[arg(long, default_value = "curiosity")]
        rover: String,
        #[arg(long, default_value_t = 1000)]
        sol: u32,
        /// Camera abbreviation, or "all"
        #[arg(long, default_value = "fhaz")]
        camera: String,
    },
    /// Near-earth objects approaching in the next days
    Neo {
        #[arg(long, default_value_t = 7)]
        days: u32,
    },
    /// Search the image library
    Search {
        query: String,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Manage saved favorites
    Favorites {
        #[command(subcommand)]
        action: FavoritesAction,
    },
}

#[derive(Subcommand, Debug)]
enum FavoritesAction {
    List,
    /// Save the picture of the day for a date
    AddApod {
        #[arg(long)]
        date: Option<String>,
    },
    /// Remove a favorite by date or id
    Remove {
        #[arg(long, conflicts_with = "id", required_unless_present = "id")]
        date: Option<String>,
        #[arg(long)]
        id: Option<String>,
    },
    Clear,
    /// Write a JSON backup of all favorites
    Export { path: PathBuf },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("Failed to load config {:?}", cli.config))?;

    let _logging_guard =
        logging::init_logging(&config.log_dir, "spacevision", &config.log_level)?;
    tracing::debug!("Using config {:?}", cli.config);

    let transport = ReqwestTransport::new(&config.user_agent, config.request_timeout())?;
    let client = FetchClient::new(Arc::new(transport), config.retry_policy());
    let api = NasaApi::new(client, config.endpoints());

    match cli.command {
        Command::Apod { date } => match api.daily_image_record(date.as_deref()).await? {
            Some(record) => print_record(&record),
            None => println!("No picture for that date"),
        },
        Command::Random { count } => {
            print_records(&api.random_image_records(count).await?);
        }
        Command::Mars { rover, sol, camera } => {
            let query = RoverQuery::new(rover, sol, Some(camera));
            print_records(&api.rover_photo_records(&query).await?);
        }
        Command::Neo { days } => {
            let neos = api.upcoming_neos(days).await?;
            println!("{} near-earth objects", neos.len());
            for neo in &neos {
                print_neo(neo);
            }
        }
        Command::Search { query, page } => {
            print_records(&api.search_records(&query, page).await?);
        }
        Command::Favorites { action } => {
            let storage = Arc::new(FileKeyValueStore::new(config.storage_dir()));
            let context = FavoritesContext::new(FavoritesStore::new(storage));
            context.spawn_load().await?;
            run_favorites(action, &context, &api).await?;
        }
    }

    Ok(())
}

async fn run_favorites(
    action: FavoritesAction,
    context: &FavoritesContext,
    api: &NasaApi,
) -> Result<()> {
    match action {
        FavoritesAction::List => {
            let favorites = context.favorites();
            if favorites.is_empty() {
                println!("No favorites saved");
            }
            for record in favorites.iter() {
                print_record(record);
            }
        }
        FavoritesAction::AddApod { date } => {
            let Some(record) = api.daily_image_record(date.as_deref()).await? else {
                println!("No picture for that date");
                return Ok(());
            };
            if context.is_favorite(&record) {
                println!("Already saved: {}", record.title());
            } else {
                context.add_favorite(record.clone()).await;
                println!("Saved: {}", record.title());
            }
        }
        FavoritesAction::Remove { date, id } => {
            let key = match (date, id) {
                (Some(date), _) => IdentityKey::Date(date),
                (None, Some(id)) => IdentityKey::Id(id),
                (None, None) => anyhow::bail!("Either --date or --id is required"),
            };
            let found = context
                .favorites()
                .iter()
                .find(|record| record.has_key(&key))
                .cloned();
            match found {
                Some(record) => {
                    context.remove_favorite(&record).await;
                    println!("Removed: {}", record.title());
                }
                None => println!("No favorite matches {:?}", key),
            }
        }
        FavoritesAction::Clear => {
            context.clear_favorites().await;
            println!("All favorites cleared");
        }
        FavoritesAction::Export { path } => {
            let path = context.store().export_to(&path).await?;
            println!(
                "Exported {} favorites to {}",
                context.favorites().len(),
                path.display()
            );
        }
    }
    Ok(())
}

fn print_records(records: &[RemoteRecord]) {
    println!("{} results", records.len());
    for record in records {
        print_record(record);
    }
}

fn print_record(record: &RemoteRecord) {
    let view = record.view();
    let date = dates::display_format(&view.date).unwrap_or(view.date);
    println!("{}  {}", date, view.title);
    if !view.image_url.is_empty() {
        println!("    {}", view.image_url);
    }
}

fn print_neo(neo: &Value) {
    let name = neo.get("name").and_then(Value::as_str).unwrap_or("unknown");
    let date = neo
        .pointer("/close_approach_data/0/close_approach_date")
        .and_then(Value::as_str)
        .unwrap_or_default();
    let hazardous = neo
        .get("is_potentially_hazardous_asteroid")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    let date = dates::display_format(date).unwrap_or_else(|_| date.to_string());
    println!(
        "{}  {}{}",
        date,
        name,
        if hazardous { "  [potentially hazardous]" } else { "" }
    );
}
