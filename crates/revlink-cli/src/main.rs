use clap::{Parser, Subcommand};
use revlink_places::{
    extract_coordinates, extract_name_or_query, extract_place_identifier, PlaceResolver,
};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "revlink-cli")]
#[command(about = "Resolve Google Maps links to place identifiers")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Follow redirects and query the place-data provider as needed.
    Resolve {
        /// Maps URL, short link, or bare host/path.
        url: String,
    },
    /// Run only the offline URL-pattern extractors; no network access.
    Extract {
        url: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = revlink_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    // stdout carries JSON output only.
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Resolve { url } => {
            let url = url.trim();
            if url.is_empty() {
                anyhow::bail!("URL is required");
            }
            let resolver = PlaceResolver::from_config(&config)?;
            let Some(place) = resolver.resolve(url).await else {
                anyhow::bail!("could not resolve place; check the URL or GOOGLE_API_KEY");
            };
            let output = serde_json::json!({
                "name": place.name,
                "place_id": place.place_id,
                "review_url": place.review_url(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Commands::Extract { url } => {
            println!("{}", serde_json::to_string_pretty(&extraction_report(&url))?);
        }
    }

    Ok(())
}

fn extraction_report(url: &str) -> serde_json::Value {
    serde_json::json!({
        "url": url,
        "place_id": extract_place_identifier(url),
        "name_or_query": extract_name_or_query(url),
        "coordinates": extract_coordinates(url).map(|c| serde_json::json!({
            "latitude": c.latitude,
            "longitude": c.longitude,
        })),
    })
}
