use crate::{
    browser::BrowserSession,
    classifier::{self, ExperienceMatcher},
    config::Config,
    data::{ListingSummary, QueryTarget, VacancyRecord},
    CrawlerError, VacancyBoard,
};
use scraper::Html;
use tracing::{debug, warn};

/// Navigates, retrying per-item failures up to `attempts` times in total.
pub fn navigate_with_retry<S: BrowserSession + ?Sized>(
    session: &mut S,
    url: &str,
    attempts: u32,
) -> Result<(), CrawlerError> {
    let mut attempt = 1;
    loop {
        match session.navigate(url) {
            Ok(()) => return Ok(()),
            Err(e) if e.is_fatal() || attempt >= attempts => return Err(e),
            Err(e) => {
                warn!("Attempt {}/{} for {} failed: {}", attempt, attempts, url, e);
                attempt += 1;
            }
        }
    }
}

pub struct VacancyExtractor<'a, B> {
    board: &'a B,
    config: &'a Config,
    experience: &'a ExperienceMatcher,
}

impl<'a, B: VacancyBoard> VacancyExtractor<'a, B> {
    pub fn new(board: &'a B, config: &'a Config, experience: &'a ExperienceMatcher) -> Self {
        VacancyExtractor {
            board,
            config,
            experience,
        }
    }

    /// Visits the detail page of `summary` and classifies it under `target`.
    pub fn extract<S: BrowserSession + ?Sized>(
        &self,
        session: &mut S,
        summary: &ListingSummary,
        target: &QueryTarget,
    ) -> Result<VacancyRecord, CrawlerError> {
        let url = summary.detail_link.as_str();
        navigate_with_retry(session, url, self.config.browser.navigation_attempts)?;
        let html = session.current_markup()?;

        let detail = {
            let doc = Html::parse_document(&html);
            self.board.parse_detail(&doc, url)?
        };

        let technologies =
            classifier::classify_technologies(&detail.description, &self.config.technologies);
        let experience = self
            .experience
            .classify(&detail.title, &target.experience_key)
            .ok_or_else(|| CrawlerError::UnknownExperienceKey(target.experience_key.clone()))?;

        debug!(
            "{} at {}: {} technologies, {}",
            detail.title,
            detail.company,
            technologies.len(),
            experience
        );

        Ok(VacancyRecord {
            title: detail.title,
            company: detail.company,
            technologies,
            experience,
        })
    }
}
