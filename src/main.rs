use clap::Parser;
use price_finder::utils::{logger, validation::Validate};
use price_finder::{
    BasalamSource, CliConfig, DigikalaSource, EngineConfig, ObservationSource, PriceFinder,
    SearchRequest, SourcesConfig, Strategy, TorobSource,
};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    logger::init_cli_logger(cli.verbose);

    tracing::info!("Starting price-finder CLI");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let config = match &cli.sources_config {
        Some(path) => match SourcesConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                tracing::error!("❌ Failed to load sources config: {}", e);
                eprintln!("❌ {}", e);
                std::process::exit(1);
            }
        },
        None => SourcesConfig::default(),
    };

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    let request = SearchRequest {
        product_name: cli.product_name.clone(),
        calculated_price: cli.calculated_price,
        strategy: Strategy::parse(&cli.strategy),
    };
    if let Err(e) = request.validate() {
        tracing::error!("❌ Invalid request: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    let mut sources: Vec<Arc<dyn ObservationSource>> = Vec::new();
    if config.digikala.enabled {
        sources.push(Arc::new(DigikalaSource::new(config.digikala.clone())));
    }
    if config.torob.enabled {
        sources.push(Arc::new(TorobSource::new(config.torob.clone())));
    }
    if config.basalam.enabled {
        sources.push(Arc::new(BasalamSource::new(config.basalam.clone())));
    }

    let mut engine_config = EngineConfig::from(&config.engine);
    if cli.no_synthetic {
        engine_config.synthetic_fallback = false;
    }

    let finder = PriceFinder::new(sources, engine_config);

    match finder.search(&request).await {
        Ok(outcome) => {
            let json = serde_json::to_string_pretty(&outcome)?;
            match &cli.output {
                Some(path) => {
                    std::fs::write(path, &json)?;
                    tracing::info!("📁 Report saved to: {}", path);
                }
                None => println!("{}", json),
            }
            if !outcome.is_success() {
                std::process::exit(2);
            }
        }
        Err(e) => {
            tracing::error!("❌ Search failed: {}", e);
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    }

    Ok(())
}
