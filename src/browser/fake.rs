use super::BrowserSession;
use crate::CrawlerError;
use scraper::{Html, Selector};
use std::{
    collections::{HashMap, HashSet},
    time::Duration,
};

/// Serves canned markup. Each click on a matching element reveals the next snapshot of
/// the current page.
#[derive(Debug, Default)]
pub(crate) struct FakeSession {
    pages: HashMap<String, Vec<String>>,
    flaky: HashMap<String, usize>,
    crash_on: Option<String>,
    unreadable: HashSet<String>,
    jammed: HashSet<String>,
    current: Option<(String, usize)>,
    pub(crate) visits: Vec<String>,
    pub(crate) clicks: usize,
    pub(crate) closed: usize,
}

impl FakeSession {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn page(self, url: &str, markup: impl Into<String>) -> Self {
        self.snapshots(url, vec![markup.into()])
    }

    pub(crate) fn snapshots(mut self, url: &str, markups: Vec<String>) -> Self {
        self.pages.insert(url.to_string(), markups);
        self
    }

    /// The first `failures` navigations to `url` fail.
    pub(crate) fn flaky(mut self, url: &str, failures: usize) -> Self {
        self.flaky.insert(url.to_string(), failures);
        self
    }

    /// Navigating to `url` kills the browser.
    pub(crate) fn crash_on(mut self, url: &str) -> Self {
        self.crash_on = Some(url.to_string());
        self
    }

    /// `url` loads, but reading its markup fails while the browser keeps answering.
    pub(crate) fn unreadable(mut self, url: &str) -> Self {
        self.unreadable.insert(url.to_string());
        self
    }

    /// Clicks on `selector` fail even though the element shows up.
    pub(crate) fn jammed(mut self, selector: &str) -> Self {
        self.jammed.insert(selector.to_string());
        self
    }

    fn markup(&self) -> Result<&str, CrawlerError> {
        let (url, index) = self
            .current
            .as_ref()
            .ok_or_else(|| CrawlerError::SessionFailure("no page loaded".to_string()))?;
        Ok(self.pages[url][*index].as_str())
    }

    fn matches(&self, selector: &str) -> Result<bool, CrawlerError> {
        let parsed = Selector::parse(selector).map_err(|_| CrawlerError::ElementNotFound {
            selector: selector.to_string(),
        })?;
        let doc = Html::parse_document(self.markup()?);
        let found = doc.select(&parsed).next().is_some();
        Ok(found)
    }
}

impl BrowserSession for FakeSession {
    fn navigate(&mut self, url: &str) -> Result<(), CrawlerError> {
        if self.closed > 0 || self.crash_on.as_deref() == Some(url) {
            return Err(CrawlerError::SessionFailure("browser is gone".to_string()));
        }
        self.visits.push(url.to_string());
        if let Some(failures) = self.flaky.get_mut(url) {
            if *failures > 0 {
                *failures -= 1;
                return Err(CrawlerError::Navigation {
                    url: url.to_string(),
                    reason: "timed out".to_string(),
                });
            }
        }
        if !self.pages.contains_key(url) {
            return Err(CrawlerError::Navigation {
                url: url.to_string(),
                reason: "net::ERR_NAME_NOT_RESOLVED".to_string(),
            });
        }
        self.current = Some((url.to_string(), 0));
        Ok(())
    }

    fn current_markup(&mut self) -> Result<String, CrawlerError> {
        if let Some((url, _)) = &self.current {
            if self.unreadable.contains(url) {
                return Err(CrawlerError::Navigation {
                    url: url.clone(),
                    reason: "get_content timed out".to_string(),
                });
            }
        }
        self.markup().map(ToString::to_string)
    }

    fn wait_for_selector(
        &mut self,
        selector: &str,
        _timeout: Duration,
    ) -> Result<(), CrawlerError> {
        if self.matches(selector)? {
            Ok(())
        } else {
            Err(CrawlerError::ElementNotFound {
                selector: selector.to_string(),
            })
        }
    }

    fn click(&mut self, selector: &str) -> Result<(), CrawlerError> {
        if self.jammed.contains(selector) || !self.matches(selector)? {
            return Err(CrawlerError::ElementNotFound {
                selector: selector.to_string(),
            });
        }
        self.clicks += 1;
        if let Some((url, index)) = self.current.as_mut() {
            let last = self.pages[url.as_str()].len() - 1;
            *index = (*index + 1).min(last);
        }
        Ok(())
    }

    fn close(&mut self) -> Result<(), CrawlerError> {
        self.closed += 1;
        Ok(())
    }
}
