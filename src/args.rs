use clap::Parser;
use listing_scraper::error::InputError;
use listing_scraper::request::{parse_product_count, validate_search_key};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "listing-scraper")]
#[command(about = "Scrapes products from a listing page into a spreadsheet")]
#[command(version)]
pub struct Args {
    /// Search key appended to the site URL (prompted for when omitted)
    #[arg(short, long)]
    pub search: Option<String>,

    /// Number of products to scrape
    #[arg(short = 'n', long)]
    pub count: Option<usize>,

    /// Path to JSON configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Site root used for the search URL and product links
    #[arg(long)]
    pub base_url: Option<String>,

    /// WebDriver server URL
    #[arg(long)]
    pub webdriver_url: Option<String>,
}

/// Search key and product count, validated
pub struct ScrapeInput {
    pub search_key: String,
    pub count: usize,
}

impl Args {
    /// Take the search key and count from flags, prompting for whatever is missing
    pub fn resolve_input(
        &self,
        default_count: usize,
    ) -> Result<ScrapeInput, Box<dyn std::error::Error>> {
        let stdin = io::stdin();
        let mut input = stdin.lock();

        let search_key = match &self.search {
            Some(key) => validate_search_key(key)?.to_string(),
            None => {
                let key = prompt(&mut input, "Enter a search key:")?;
                validate_search_key(&key)?.to_string()
            }
        };

        let count = match (self.count, self.search.is_some()) {
            (Some(0), _) => return Err(InputError::CountTooSmall.into()),
            (Some(count), _) => count,
            (None, true) => default_count,
            (None, false) => {
                let answer = prompt(
                    &mut input,
                    "How many products do you want to scrape? (Optional):",
                )?;
                let count = parse_product_count(&answer, default_count)?;
                if answer.is_empty() {
                    println!("No input provided. Scraping default {} products.", count);
                } else {
                    println!("You have chosen to scrape {} products.", count);
                }
                count
            }
        };

        Ok(ScrapeInput { search_key, count })
    }
}

/// Print a question and read one line, without its line ending
fn prompt(input: &mut impl BufRead, message: &str) -> io::Result<String> {
    println!("{}", message);
    io::stdout().flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
