#[derive(Debug, thiserror::Error)]
pub enum CrawlerError {
    #[error("Element not found: {selector}")]
    ElementNotFound { selector: String },

    #[error("Malformed listing: {reason}")]
    MalformedListing { reason: String },

    #[error("Detail page {url} is missing {missing}")]
    DetailPageIncomplete { url: String, missing: &'static str },

    #[error("Navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    #[error("Browser session failure: {0}")]
    SessionFailure(String),

    #[error("Unknown experience key: {0}")]
    UnknownExperienceKey(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Unexpected CSV header: {0:?}")]
    UnexpectedHeader(Vec<String>),

    #[error("CSV error")]
    Csv(#[from] csv::Error),

    #[error("IO error")]
    Io(#[from] std::io::Error),

    #[error("Invalid experience pattern")]
    Regex(#[from] regex::Error),

    #[error("JSON error")]
    Json(#[from] serde_json::Error),
}

impl CrawlerError {
    /// Only a dead browser ends the run, everything else is scoped to one item.
    pub fn is_fatal(&self) -> bool {
        matches!(self, CrawlerError::SessionFailure(_))
    }
}
