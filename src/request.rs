use crate::error::InputError;
use crate::utils;

/// One scrape to perform: which page to load and how many products to keep
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeRequest {
    search_url: String,
    base_url: String,
    max_products: usize,
}

impl ScrapeRequest {
    /// Create a request for an already-built search URL
    pub fn new(
        search_url: impl Into<String>,
        base_url: impl Into<String>,
        max_products: usize,
    ) -> Result<Self, InputError> {
        if max_products < 1 {
            return Err(InputError::CountTooSmall);
        }
        Ok(Self {
            search_url: search_url.into(),
            base_url: base_url.into(),
            max_products,
        })
    }

    /// Create a request for a search key on the given site
    pub fn for_search(
        base_url: &str,
        search_key: &str,
        max_products: usize,
    ) -> Result<Self, InputError> {
        let key = validate_search_key(search_key)?;
        Self::new(utils::search_url(base_url, key), base_url, max_products)
    }

    pub fn search_url(&self) -> &str {
        &self.search_url
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn max_products(&self) -> usize {
        self.max_products
    }
}

/// Accept a search key unless it is empty or made of digits only
pub fn validate_search_key(input: &str) -> Result<&str, InputError> {
    if input.is_empty() {
        return Err(InputError::EmptySearchKey);
    }
    if input.chars().all(|c| c.is_ascii_digit()) {
        return Err(InputError::NumericSearchKey);
    }
    Ok(input)
}

/// Parse the optional product count; empty input selects `default`
pub fn parse_product_count(input: &str, default: usize) -> Result<usize, InputError> {
    if input.is_empty() {
        return Ok(default);
    }
    if !input.chars().all(|c| c.is_ascii_digit()) {
        return Err(InputError::NonNumericCount(input.to_string()));
    }
    // All digits but too large for usize
    let count = input
        .parse::<usize>()
        .map_err(|_| InputError::NonNumericCount(input.to_string()))?;
    if count < 1 {
        return Err(InputError::CountTooSmall);
    }
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_key_validation() {
        assert_eq!(validate_search_key("shirts"), Ok("shirts"));
        assert_eq!(validate_search_key("iphone 15"), Ok("iphone 15"));
        assert_eq!(validate_search_key(""), Err(InputError::EmptySearchKey));
        assert_eq!(validate_search_key("12345"), Err(InputError::NumericSearchKey));
    }

    #[test]
    fn test_product_count_parsing() {
        assert_eq!(parse_product_count("", 10), Ok(10));
        assert_eq!(parse_product_count("3", 10), Ok(3));
        assert_eq!(parse_product_count("0", 10), Err(InputError::CountTooSmall));
        assert_eq!(
            parse_product_count("-2", 10),
            Err(InputError::NonNumericCount("-2".to_string()))
        );
        assert_eq!(
            parse_product_count("ten", 10),
            Err(InputError::NonNumericCount("ten".to_string()))
        );
    }

    #[test]
    fn test_request_for_search() {
        let request = ScrapeRequest::for_search("https://www.myntra.com", "kurta", 5).unwrap();
        assert_eq!(request.search_url(), "https://www.myntra.com/kurta");
        assert_eq!(request.base_url(), "https://www.myntra.com");
        assert_eq!(request.max_products(), 5);
    }

    #[test]
    fn test_request_rejects_zero_products() {
        assert_eq!(
            ScrapeRequest::new("https://a.example/x", "https://a.example", 0),
            Err(InputError::CountTooSmall)
        );
        assert_eq!(
            ScrapeRequest::for_search("https://a.example", "42", 3),
            Err(InputError::NumericSearchKey)
        );
    }
}
