//! Handmade bazaar catalog daemon.
//!
//! Serves per-session listing catalogs over HTTP. New listings can have their
//! description and photo generated through an OpenAI-compatible API; failures
//! there fall back to user input and a placeholder image.
//!
//! Startup fails if generation is enabled and no API key can be found
//! (`OPENAI_API_KEY` or the secrets file). Pass `--no-generation` to run
//! without one.

mod config;
mod openai;
mod routes;
mod sessions;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use bazaar_common::config::{
    CatalogConfig, DEFAULT_PLACEHOLDER_IMAGE, DEFAULT_PRICE_FLOOR, MIN_PRICE_FLOOR,
};
use bazaar_common::currency::Currency;
use bazaar_common::generation::{DescriptionGenerator, DisabledGenerators, ImageGenerator};
use bazaar_common::popularity::{PopularityScorer, RandomPopularity};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::Mutex;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::{GenerationConfig, DEFAULT_API_BASE};
use crate::openai::OpenAiClient;
use crate::routes::AppState;
use crate::sessions::SessionRegistry;

#[derive(Parser)]
#[command(name = "bazaar-node", about = "Handmade bazaar catalog daemon")]
struct Cli {
    /// HTTP port to listen on.
    #[arg(long, default_value_t = 3040)]
    port: u16,

    /// Lowest accepted listing price (at least 1).
    #[arg(
        long,
        default_value_t = DEFAULT_PRICE_FLOOR,
        value_parser = clap::value_parser!(u64).range(MIN_PRICE_FLOOR..)
    )]
    price_floor: u64,

    /// Image reference used when none is supplied or generated.
    #[arg(long, default_value = DEFAULT_PLACEHOLDER_IMAGE)]
    placeholder_image: String,

    /// JSON secrets file holding `OPENAI_API_KEY`
    /// (default: <config dir>/bazaar/secrets.json).
    #[arg(long)]
    secrets: Option<PathBuf>,

    /// Base URL of the OpenAI-compatible API.
    #[arg(long, env = "BAZAAR_API_BASE", default_value = DEFAULT_API_BASE)]
    api_base: String,

    /// Run without description/image generation.
    #[arg(long)]
    no_generation: bool,

    /// Show prices as bare numbers instead of rupees.
    #[arg(long)]
    plain_prices: bool,
}

impl Cli {
    fn catalog_config(&self) -> CatalogConfig {
        CatalogConfig::default()
            .with_price_floor(self.price_floor)
            .with_placeholder_image(self.placeholder_image.clone())
    }

    fn currency(&self) -> Currency {
        if self.plain_prices {
            Currency::Plain
        } else {
            Currency::Rupees
        }
    }
}

async fn serve<G>(cli: &Cli, generators: G, generation_enabled: bool) -> anyhow::Result<()>
where
    G: DescriptionGenerator + ImageGenerator + 'static,
{
    let catalog_config = cli.catalog_config();
    info!(
        price_floor = catalog_config.effective_price_floor(),
        generation_enabled, "catalog configured"
    );

    let scorer: Box<dyn PopularityScorer + Send> =
        Box::new(RandomPopularity::with_rng(StdRng::from_entropy()));
    let state = Arc::new(AppState {
        registry: SessionRegistry::new(catalog_config),
        generators,
        scorer: Mutex::new(scorer),
        generation_enabled,
        currency: cli.currency(),
    });

    let addr = format!("0.0.0.0:{}", cli.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("bazaar node listening on {}", addr);

    axum::serve(listener, routes::router(state))
        .await
        .context("server failed")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    if cli.no_generation {
        warn!("generation disabled; listings use user input and the placeholder image");
        return serve(&cli, DisabledGenerators, false).await;
    }

    let api_key = config::resolve_api_key(
        std::env::var(config::API_KEY_ENV).ok(),
        cli.secrets.as_deref(),
    )
    .context("generation credentials")?;
    let generation = GenerationConfig::new(api_key, &cli.api_base)?;
    info!(
        api_base = %generation.api_base,
        text_model = %generation.text_model,
        image_model = %generation.image_model,
        "generation enabled"
    );

    serve(&cli, OpenAiClient::new(generation), true).await
}
