use crate::{
    data::{ExperienceVocabulary, QueryTarget},
    CrawlerError,
};
use serde::{Deserialize, Serialize};
use std::{collections::HashSet, fs, path::Path, path::PathBuf, time::Duration};

/// Pause after each load-more click that a real page needs to render the next batch.
pub const MIN_SETTLE_INTERVAL_MS: u64 = 500;

pub const BASE_URL: &str = "https://jobs.dou.ua/vacancies/";
const CATEGORY: &str = "Python";

const TECHNOLOGIES: &[&str] = &[
    "Python",
    "Django",
    "DRF",
    "Flask",
    "FastAPI",
    "aiohttp",
    "asyncio",
    "Celery",
    "SQLAlchemy",
    "Pandas",
    "NumPy",
    "PyTorch",
    "TensorFlow",
    "Scrapy",
    "Selenium",
    "REST",
    "GraphQL",
    "SQL",
    "PostgreSQL",
    "MySQL",
    "MongoDB",
    "Redis",
    "RabbitMQ",
    "Kafka",
    "Elasticsearch",
    "Docker",
    "Kubernetes",
    "AWS",
    "GCP",
    "Azure",
    "Linux",
    "Git",
    "CI/CD",
    "JavaScript",
    "TypeScript",
    "React",
    "Go",
];

const EXPERIENCE_LEVELS: &[(&str, &str)] = &[
    ("0-1", "Junior"),
    ("1-3", "Middle"),
    ("3-5", "Senior"),
    ("5plus", "Lead"),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserOptions {
    pub headless: bool,
    pub window_size: (u32, u32),
    pub element_timeout_ms: u64,
    pub settle_interval_ms: u64,
    pub navigation_attempts: u32,
    pub max_load_more_clicks: usize,
}

impl BrowserOptions {
    pub fn element_timeout(&self) -> Duration {
        Duration::from_millis(self.element_timeout_ms)
    }

    pub fn settle_interval(&self) -> Duration {
        Duration::from_millis(self.settle_interval_ms)
    }

    /// Limits that only matter when a real browser renders the pages.
    pub fn check_live(&self) -> Result<(), CrawlerError> {
        if self.settle_interval_ms < MIN_SETTLE_INTERVAL_MS {
            return Err(CrawlerError::InvalidConfig(format!(
                "settle_interval_ms must be at least {}, got {}",
                MIN_SETTLE_INTERVAL_MS, self.settle_interval_ms
            )));
        }
        Ok(())
    }
}

impl Default for BrowserOptions {
    fn default() -> Self {
        BrowserOptions {
            headless: true,
            window_size: (1280, 1024),
            element_timeout_ms: 5000,
            settle_interval_ms: 500,
            navigation_attempts: 3,
            max_load_more_clicks: 500,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub query_targets: Vec<QueryTarget>,
    pub technologies: Vec<String>,
    pub experience_levels: ExperienceVocabulary,
    pub browser: BrowserOptions,
    pub output: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            query_targets: EXPERIENCE_LEVELS
                .iter()
                .map(|(key, _)| QueryTarget {
                    experience_key: key.to_string(),
                    url: format!("{}?category={}&exp={}", BASE_URL, CATEGORY, key),
                })
                .collect(),
            technologies: TECHNOLOGIES.iter().map(ToString::to_string).collect(),
            experience_levels: EXPERIENCE_LEVELS.iter().copied().collect(),
            browser: BrowserOptions::default(),
            output: PathBuf::from("data_analysis").join("vacancies.csv"),
        }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Config, CrawlerError> {
        let raw = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Falls back to the built-in defaults when no file is given.
    pub fn load(path: Option<&Path>) -> Result<Config, CrawlerError> {
        match path {
            Some(path) => Config::from_file(path),
            None => {
                let config = Config::default();
                config.validate()?;
                Ok(config)
            }
        }
    }

    pub fn validate(&self) -> Result<(), CrawlerError> {
        if self.query_targets.is_empty() {
            return Err(CrawlerError::InvalidConfig("no query targets".to_string()));
        }
        if self.technologies.iter().all(|t| t.trim().is_empty()) {
            return Err(CrawlerError::InvalidConfig(
                "technology vocabulary is empty".to_string(),
            ));
        }
        if self.experience_levels.is_empty() {
            return Err(CrawlerError::InvalidConfig(
                "experience vocabulary is empty".to_string(),
            ));
        }

        let mut keys = HashSet::new();
        for level in &self.experience_levels.0 {
            if !keys.insert(level.key.as_str()) {
                return Err(CrawlerError::InvalidConfig(format!(
                    "duplicate experience key {}",
                    level.key
                )));
            }
        }

        for target in &self.query_targets {
            if self
                .experience_levels
                .label_for(&target.experience_key)
                .is_none()
            {
                return Err(CrawlerError::UnknownExperienceKey(
                    target.experience_key.clone(),
                ));
            }
            reqwest::Url::parse(&target.url).map_err(|e| {
                CrawlerError::InvalidConfig(format!("bad url {}: {}", target.url, e))
            })?;
        }

        if self.browser.navigation_attempts == 0 {
            return Err(CrawlerError::InvalidConfig(
                "navigation_attempts must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}
