pub mod html;


use crate::config::SelectorConfig;
use crate::error::{ExtractError, MalformedTile};
use crate::results::ProductRecord;
use html::ProductSelectors;
use scraper::{ElementRef, Html};
use std::ops::ControlFlow;

/// How an extraction ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractStatus {
    /// Tiles were read; records may still be empty if every tile was skipped
    Ok,
    /// The results container is missing or has no tiles
    EmptyContainer,
    /// A malformed tile was hit before any record was collected
    ParseFailure,
}

/// Records read from one page together with how the scan ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub records: Vec<ProductRecord>,
    pub status: ExtractStatus,
    /// The malformed tile that stopped the scan, if any
    pub stopped_at: Option<MalformedTile>,
}

impl Extraction {
    fn empty_container() -> Self {
        Self {
            records: Vec::new(),
            status: ExtractStatus::EmptyContainer,
            stopped_at: None,
        }
    }

    /// Turn a failed scan into an error, keeping partial successes
    pub fn into_result(self) -> Result<Self, ExtractError> {
        match (self.status, self.stopped_at) {
            (ExtractStatus::ParseFailure, Some(tile)) => Err(ExtractError::Malformed(tile)),
            (status, stopped_at) => Ok(Self {
                records: self.records,
                status,
                stopped_at,
            }),
        }
    }
}

/// Reads product records out of a rendered listing page
#[derive(Debug, Clone)]
pub struct ProductExtractor {
    selectors: ProductSelectors,
}

impl ProductExtractor {
    pub fn new(config: &SelectorConfig) -> Result<Self, ExtractError> {
        Ok(Self {
            selectors: ProductSelectors::compile(config)?,
        })
    }

    /// Extract at most `max_count` records from the first tiles of the results container.
    ///
    /// Relative links are joined onto `base_url`. The scan stops at the first
    /// malformed tile: records collected before it are kept, and with none
    /// collected the extraction is a [`ExtractStatus::ParseFailure`].
    pub fn extract(&self, html: &str, base_url: &str, max_count: usize) -> Extraction {
        let doc = Html::parse_document(html);

        let Some(container) = doc.select(&self.selectors.container).next() else {
            ::log::info!("Results container not found");
            return Extraction::empty_container();
        };

        let tiles: Vec<ElementRef> = container
            .children()
            .filter_map(ElementRef::wrap)
            .take(max_count)
            .collect();

        if tiles.is_empty() {
            ::log::info!("Results container has no product tiles");
            return Extraction::empty_container();
        }

        ::log::debug!("Reading {} product tiles", tiles.len());

        let scan = tiles
            .iter()
            .enumerate()
            .try_fold(Vec::new(), |mut records, (index, tile)| {
                match html::read_tile(tile, index, &self.selectors, base_url) {
                    Ok(Some(record)) => {
                        records.push(record);
                        ControlFlow::Continue(records)
                    }
                    Ok(None) => ControlFlow::Continue(records),
                    Err(malformed) => ControlFlow::Break((records, malformed)),
                }
            });

        match scan {
            ControlFlow::Continue(records) => Extraction {
                records,
                status: ExtractStatus::Ok,
                stopped_at: None,
            },
            ControlFlow::Break((records, malformed)) if records.is_empty() => {
                ::log::error!("Extraction failed: {}", malformed);
                Extraction {
                    records,
                    status: ExtractStatus::ParseFailure,
                    stopped_at: Some(malformed),
                }
            }
            ControlFlow::Break((records, malformed)) => {
                ::log::warn!(
                    "Stopped after {} products: {}",
                    records.len(),
                    malformed
                );
                Extraction {
                    records,
                    status: ExtractStatus::Ok,
                    stopped_at: Some(malformed),
                }
            }
        }
    }
}
