use crate::artifact::TempArtifact;
use crate::config::ScraperConfig;
use crate::crawlers::{BrowserFetcher, PageFetcher};
use crate::error::{ScrapeError, ScrapeResult};
use crate::exporters::{Exporter, XlsxExporter};
use crate::parsers::{ExtractStatus, ProductExtractor};
use crate::request::ScrapeRequest;
use std::path::PathBuf;

/// Result of a scrape that did not fail
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScrapeReport {
    /// Records were written to `path`
    Exported { path: PathBuf, records: usize },
    /// The page had no products to export
    NoProducts,
}

/// What the user is told about a scrape
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScrapeOutcome {
    Success { path: PathBuf, records: usize },
    NoProducts,
    Failure,
}

impl ScrapeOutcome {
    /// Process exit code for this outcome
    pub fn exit_code(&self) -> u8 {
        match self {
            ScrapeOutcome::Success { .. } => 0,
            ScrapeOutcome::Failure => 1,
            ScrapeOutcome::NoProducts => 2,
        }
    }
}

/// Fetch, extract and export for one listing page
pub struct ScrapePipeline<F, E> {
    fetcher: F,
    extractor: ProductExtractor,
    exporter: E,
    temp_dir: PathBuf,
}

impl ScrapePipeline<BrowserFetcher, XlsxExporter> {
    /// Build the browser-backed pipeline described by `config`
    pub fn from_config(config: &ScraperConfig) -> ScrapeResult<Self> {
        config.validate()?;
        Ok(Self::new(
            BrowserFetcher::from_config(config),
            ProductExtractor::new(&config.selectors)?,
            XlsxExporter::new(config.output_dir.clone()),
            config.temp_dir.clone(),
        ))
    }
}

impl<F, E> ScrapePipeline<F, E>
where
    F: PageFetcher,
    E: Exporter,
{
    pub fn new(
        fetcher: F,
        extractor: ProductExtractor,
        exporter: E,
        temp_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            fetcher,
            extractor,
            exporter,
            temp_dir: temp_dir.into(),
        }
    }

    /// Run one scrape, keeping the kind of any failure
    pub async fn scrape(&self, request: &ScrapeRequest) -> ScrapeResult<ScrapeReport> {
        let artifact = TempArtifact::acquire(&self.temp_dir)?;

        let html = self.fetcher.fetch(request.search_url()).await?;
        artifact.write(&html)?;
        ::log::debug!(
            "Stored {} bytes of markup in {}",
            html.len(),
            artifact.path().display()
        );

        let markup = artifact.read()?;
        let extraction =
            self.extractor
                .extract(&markup, request.base_url(), request.max_products());

        // The artifact is gone before anything else happens, whatever the extraction found
        artifact.remove();

        let extraction = extraction.into_result()?;
        if extraction.status == ExtractStatus::EmptyContainer || extraction.records.is_empty() {
            ::log::info!("No products found at {}", request.search_url());
            return Ok(ScrapeReport::NoProducts);
        }

        let path = self.exporter.export(&extraction.records)?;
        Ok(ScrapeReport::Exported {
            path,
            records: extraction.records.len(),
        })
    }

    /// Run one scrape and collapse the result into an outcome for the user
    pub async fn run(&self, request: &ScrapeRequest) -> ScrapeOutcome {
        ::log::info!(
            "Scraping up to {} products from {}",
            request.max_products(),
            request.search_url()
        );

        match self.scrape(request).await {
            Ok(ScrapeReport::Exported { path, records }) => {
                ::log::info!("Exported {} products to {}", records, path.display());
                ScrapeOutcome::Success { path, records }
            }
            Ok(ScrapeReport::NoProducts) => ScrapeOutcome::NoProducts,
            Err(e) => {
                log_failure(&e);
                ScrapeOutcome::Failure
            }
        }
    }
}

fn log_failure(error: &ScrapeError) {
    let stage = match error {
        ScrapeError::Fetch(_) => "fetch",
        ScrapeError::Extract(_) => "extract",
        ScrapeError::Export(_) => "export",
        ScrapeError::Config(_) => "config",
        ScrapeError::Artifact(_) => "temporary file",
    };
    ::log::error!("Scrape failed during {}: {}", stage, error);
}
