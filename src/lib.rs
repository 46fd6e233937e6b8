use scraper::Html;

pub mod browser;
pub mod classifier;
pub mod config;
pub mod dou;
pub mod extractor;
pub mod pagination;
pub mod persistent;
pub mod pipeline;
pub mod stats;

mod data;
mod error;
mod utils;

pub use browser::{BrowserSession, ChromeSession};
pub use config::{BrowserOptions, Config};
pub use data::{
    ExperienceLevel, ExperienceVocabulary, ListingPage, ListingSummary, QueryTarget,
    VacancyDetail, VacancyRecord,
};
pub use error::CrawlerError;
pub use pipeline::{HarvestReport, Pipeline, TargetReport};

/// Site-specific knowledge of where listings, links and vacancy fields live.
pub trait VacancyBoard {
    /// Selector of the control that reveals the next batch of listings.
    fn load_more_selector(&self) -> &str;

    /// Listing summaries of a fully expanded page. Broken entries are counted, not fatal.
    fn parse_listings(&self, doc: &Html, page_url: &str) -> ListingPage;

    fn parse_detail(&self, doc: &Html, url: &str) -> Result<VacancyDetail, CrawlerError>;
}
