use clap::Parser;
use listing_scraper::{ScrapeOutcome, ScrapePipeline, ScrapeRequest, ScraperConfig};
use std::process::ExitCode;

mod args;
use args::Args;

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    env_logger::init();

    // Parse command-line arguments
    let args = Args::parse();

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            ::log::error!("Invalid configuration: {}", e);
            println!("Invalid configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let input = match args.resolve_input(config.default_product_count) {
        Ok(input) => input,
        Err(e) => {
            println!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let request =
        match ScrapeRequest::for_search(&config.base_url, &input.search_key, input.count) {
            Ok(request) => request,
            Err(e) => {
                println!("{}", e);
                return ExitCode::FAILURE;
            }
        };

    println!(
        "Note: scraping requires a WebDriver server (e.g., ChromeDriver) at {}",
        config.webdriver_url
    );
    println!(
        "Scraping {} {} from {}...",
        request.max_products(),
        if request.max_products() > 1 { "products" } else { "product" },
        request.search_url()
    );

    let pipeline = match ScrapePipeline::from_config(&config) {
        Ok(pipeline) => pipeline,
        Err(e) => {
            ::log::error!("Failed to set up scraper: {}", e);
            println!("Scraping failed.");
            return ExitCode::FAILURE;
        }
    };

    let outcome = pipeline.run(&request).await;
    match &outcome {
        ScrapeOutcome::Success { path, records } => {
            println!("{} products saved to {}", records, path.display());
            println!("Scraping successful!");
        }
        ScrapeOutcome::NoProducts => println!("Products not found"),
        ScrapeOutcome::Failure => println!("Scraping failed."),
    }

    ExitCode::from(outcome.exit_code())
}

/// Config file (if given), then environment, then command-line overrides
fn load_config(args: &Args) -> listing_scraper::ScrapeResult<ScraperConfig> {
    let mut config = match &args.config {
        Some(path) => ScraperConfig::from_file(path)?,
        None => ScraperConfig::default(),
    };
    config.apply_env();

    if let Some(base_url) = &args.base_url {
        config.base_url = base_url.trim_end_matches('/').to_string();
    }
    if let Some(webdriver_url) = &args.webdriver_url {
        config.webdriver_url = webdriver_url.clone();
    }

    config.validate()?;
    Ok(config)
}
