use chrono::{DateTime, TimeZone};

/// Join a tile's raw href onto the site root.
///
/// The href is appended after a single `/` as-is: absolute hrefs and hrefs
/// with a leading slash are not normalized.
pub fn join_link(base_url: &str, href: &str) -> String {
    format!("{}/{}", base_url, href)
}

/// Build the search page URL for a key. The key is not escaped.
pub fn search_url(base_url: &str, search_key: &str) -> String {
    format!("{}/{}", base_url, search_key)
}

/// Spreadsheet file name stamped with the given time at second precision
pub fn timestamped_file_name<Tz>(now: &DateTime<Tz>, extension: &str) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    format!(
        "scraped_products_{}.{}",
        now.format("%Y%m%d_%H%M%S"),
        extension
    )
}
