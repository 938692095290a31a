/// Column headers of the exported table, in field order
pub const COLUMNS: [&str; 5] = ["Name", "Image", "Price", "Rating", "Link"];

/// One product tile read from a listing page
///
/// Every field except `link` may be empty. `price` and `rating` are kept
/// exactly as rendered on the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductRecord {
    pub name: String,
    pub image: String,
    pub price: String,
    pub rating: String,
    /// Absolute product URL
    pub link: String,
}

impl ProductRecord {
    /// Create a new product record
    pub fn new(name: String, image: String, price: String, rating: String, link: String) -> Self {
        Self {
            name,
            image,
            price,
            rating,
            link,
        }
    }

    /// Field values in [`COLUMNS`] order
    pub fn fields(&self) -> [&str; 5] {
        [
            &self.name,
            &self.image,
            &self.price,
            &self.rating,
            &self.link,
        ]
    }
}
