use std::env;
use std::process::ExitCode;
use std::sync::Arc;

use log::error;
use recipe_scrape::{MemoryStore, RecipeScraper, ScraperConfig};

const USAGE: &str = "Usage: recipe-scrape <url> [--user <name>] [--extract-only]";

struct Args {
    url: String,
    user: String,
    extract_only: bool,
}

fn parse_args() -> Result<Args, String> {
    let mut url = None;
    let mut user = "local".to_string();
    let mut extract_only = false;

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--user" => {
                user = args
                    .next()
                    .ok_or_else(|| "--user requires a name".to_string())?;
            }
            "--extract-only" => extract_only = true,
            "-h" | "--help" => return Err(USAGE.to_string()),
            _ if url.is_none() && !arg.starts_with("--") => url = Some(arg),
            _ => return Err(format!("Unexpected argument: {arg}\n{USAGE}")),
        }
    }

    let url = url.ok_or_else(|| USAGE.to_string())?;
    Ok(Args {
        url,
        user,
        extract_only,
    })
}

async fn run(args: Args) -> Result<String, Box<dyn std::error::Error>> {
    let config = ScraperConfig::load()?;
    let store = Arc::new(MemoryStore::new());
    let user = store.add_user(args.user).await;

    let scraper = RecipeScraper::builder().config(config).build(store)?;

    let json = if args.extract_only {
        serde_json::to_string_pretty(&scraper.scrape(&args.url).await?)?
    } else {
        serde_json::to_string_pretty(&scraper.extract(&args.url, &user).await?)?
    };
    Ok(json)
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(message) => {
            eprintln!("{message}");
            return ExitCode::from(2);
        }
    };

    match run(args).await {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e}");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
