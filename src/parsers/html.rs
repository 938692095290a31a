//! Field extraction for a single product tile.

use crate::config::SelectorConfig;
use crate::error::{ExtractError, MalformedTile};
use crate::results::ProductRecord;
use crate::utils;
use scraper::{ElementRef, Selector};

/// Compiled selectors for a listing page layout
#[derive(Debug, Clone)]
pub struct ProductSelectors {
    pub container: Selector,
    pub name: Selector,
    pub price: Selector,
    pub rating: Selector,
    pub rating_value: Selector,
    pub picture: Selector,
    pub image: Selector,
    pub link: Selector,
}

impl ProductSelectors {
    pub fn compile(config: &SelectorConfig) -> Result<Self, ExtractError> {
        Ok(Self {
            container: compile("container", &config.container)?,
            name: compile("name", &config.name)?,
            price: compile("price", &config.price)?,
            rating: compile("rating", &config.rating)?,
            rating_value: compile("rating_value", &config.rating_value)?,
            picture: compile("picture", &config.picture)?,
            image: compile("image", &config.image)?,
            link: compile("link", &config.link)?,
        })
    }
}

fn compile(field: &'static str, css: &str) -> Result<Selector, ExtractError> {
    Selector::parse(css).map_err(|e| ExtractError::Selector {
        field,
        message: e.to_string(),
    })
}

/// Text of the first element matching `selector`, or an empty string
pub fn text_of(element: &ElementRef, selector: &Selector) -> String {
    element
        .select(selector)
        .next()
        .map(|found| element_text(&found))
        .unwrap_or_default()
}

/// Attribute of the first element matching `selector`, or an empty string
pub fn attr_of(element: &ElementRef, selector: &Selector, attr: &str) -> String {
    element
        .select(selector)
        .next()
        .and_then(|found| found.value().attr(attr))
        .map(|value| value.to_string())
        .unwrap_or_default()
}

fn element_text(element: &ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Whether a tile with these resolved fields belongs in the output
pub fn keep_tile(name: &str, price: &str, href: &str) -> bool {
    if name.is_empty() && price.is_empty() && href.is_empty() {
        return false;
    }
    !href.is_empty()
}

/// Reads one tile into a record.
///
/// Missing fields come back empty and a tile without a link yields
/// `Ok(None)`. A rating container without its value element is treated as
/// a malformed tile.
pub fn read_tile(
    tile: &ElementRef,
    index: usize,
    selectors: &ProductSelectors,
    base_url: &str,
) -> Result<Option<ProductRecord>, MalformedTile> {
    let name = text_of(tile, &selectors.name);

    let image = tile
        .select(&selectors.picture)
        .next()
        .map(|picture| attr_of(&picture, &selectors.image, "src"))
        .unwrap_or_default();

    let price = text_of(tile, &selectors.price);

    let rating = match tile.select(&selectors.rating).next() {
        Some(container) => container
            .select(&selectors.rating_value)
            .next()
            .map(|value| element_text(&value))
            .ok_or(MalformedTile::MissingRatingValue { index })?,
        None => String::new(),
    };

    let href = attr_of(tile, &selectors.link, "href");

    if !keep_tile(&name, &price, &href) {
        ::log::trace!("Skipping tile {} without a product link", index);
        return Ok(None);
    }

    Ok(Some(ProductRecord::new(
        name,
        image,
        price,
        rating,
        utils::join_link(base_url, &href),
    )))
}
