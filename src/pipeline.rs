use crate::{
    browser::BrowserSession,
    classifier::ExperienceMatcher,
    config::Config,
    data::{QueryTarget, VacancyRecord},
    extractor::{navigate_with_retry, VacancyExtractor},
    pagination, persistent, CrawlerError, VacancyBoard,
};
use scraper::Html;
use std::path::Path;
use tracing::{error, info, warn};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TargetReport {
    pub experience_key: String,
    pub listings: usize,
    pub malformed: usize,
    pub extracted: usize,
    pub failed: usize,
}

#[derive(Debug, Default)]
pub struct HarvestReport {
    pub records: Vec<VacancyRecord>,
    pub targets: Vec<TargetReport>,
}

pub struct Pipeline<'a, B> {
    config: &'a Config,
    board: B,
    experience: ExperienceMatcher,
}

impl<'a, B: VacancyBoard> Pipeline<'a, B> {
    pub fn new(config: &'a Config, board: B) -> Result<Self, CrawlerError> {
        config.validate()?;
        let experience = ExperienceMatcher::new(&config.experience_levels)?;
        Ok(Pipeline {
            config,
            board,
            experience,
        })
    }

    /// Harvests every target, writes `output` once, then closes `session`.
    ///
    /// The session is closed on every path. Nothing is written when the harvest dies.
    pub fn run<S: BrowserSession>(
        &self,
        mut session: S,
        output: &Path,
    ) -> Result<HarvestReport, CrawlerError> {
        let result = self.harvest(&mut session).and_then(|report| {
            persistent::write_vacancies(output, &report.records)?;
            info!(
                "Saved {} vacancies to {}",
                report.records.len(),
                output.display()
            );
            Ok(report)
        });

        if let Err(e) = &result {
            error!("Run aborted: {}", e);
        }
        let closed = session.close();
        let report = result?;
        closed?;
        Ok(report)
    }

    pub fn harvest<S: BrowserSession + ?Sized>(
        &self,
        session: &mut S,
    ) -> Result<HarvestReport, CrawlerError> {
        let mut report = HarvestReport::default();
        for target in &self.config.query_targets {
            info!("Scraping {} experience level...", target.experience_key);
            let target_report = self.harvest_target(session, target, &mut report.records)?;
            info!(
                "Found {} vacancies for {} ({} listings, {} malformed, {} failed)",
                target_report.extracted,
                target.experience_key,
                target_report.listings,
                target_report.malformed,
                target_report.failed
            );
            report.targets.push(target_report);
        }
        Ok(report)
    }

    fn harvest_target<S: BrowserSession + ?Sized>(
        &self,
        session: &mut S,
        target: &QueryTarget,
        records: &mut Vec<VacancyRecord>,
    ) -> Result<TargetReport, CrawlerError> {
        let mut report = TargetReport {
            experience_key: target.experience_key.clone(),
            ..Default::default()
        };

        match navigate_with_retry(session, &target.url, self.config.browser.navigation_attempts) {
            Ok(()) => {}
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                warn!("Skip {}: {}", target.url, e);
                return Ok(report);
            }
        }

        pagination::load_all(session, self.board.load_more_selector(), &self.config.browser)?;

        let html = match session.current_markup() {
            Ok(html) => html,
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                warn!("Skip {}: {}", target.url, e);
                return Ok(report);
            }
        };
        let page = {
            let doc = Html::parse_document(&html);
            self.board.parse_listings(&doc, &target.url)
        };
        report.listings = page.summaries.len() + page.skipped;
        report.malformed = page.skipped;

        let extractor = VacancyExtractor::new(&self.board, self.config, &self.experience);
        for summary in &page.summaries {
            match extractor.extract(session, summary, target) {
                Ok(record) => {
                    info!("[{}] Insert {}", records.len() + 1, summary.detail_link);
                    records.push(record);
                    report.extracted += 1;
                }
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    warn!("Skip {}: {}", summary.detail_link, e);
                    report.failed += 1;
                }
            }
        }

        Ok(report)
    }
}
