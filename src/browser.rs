use crate::{config::BrowserOptions, CrawlerError};
use headless_chrome::{Browser, Element, LaunchOptions, Tab};
use std::{
    fmt::Display,
    sync::Arc,
    time::{Duration, Instant},
};
use tracing::{debug, warn};

#[cfg(test)]
pub(crate) mod fake;

const POLL_INTERVAL: Duration = Duration::from_millis(100);
const IDLE_TIMEOUT: Duration = Duration::from_secs(600);
const IS_VISIBLE: &str = r#"function() {
    const rect = this.getBoundingClientRect();
    const style = window.getComputedStyle(this);
    return rect.width > 0 && rect.height > 0
        && style.visibility !== "hidden" && style.display !== "none";
}"#;

/// A single controllable browser tab. Every call blocks until the browser answers.
pub trait BrowserSession {
    /// Loads `url` and returns once the load event fired.
    fn navigate(&mut self, url: &str) -> Result<(), CrawlerError>;

    /// Fully rendered HTML at the time of the call.
    fn current_markup(&mut self) -> Result<String, CrawlerError>;

    /// Waits until `selector` matches a visible element, `ElementNotFound` after `timeout`.
    fn wait_for_selector(&mut self, selector: &str, timeout: Duration)
        -> Result<(), CrawlerError>;

    /// Clicks the first visible match of `selector`.
    fn click(&mut self, selector: &str) -> Result<(), CrawlerError>;

    /// Releases the browser. Called once, at the end of a run.
    fn close(&mut self) -> Result<(), CrawlerError>;
}

impl<T: BrowserSession + ?Sized> BrowserSession for &mut T {
    fn navigate(&mut self, url: &str) -> Result<(), CrawlerError> {
        (**self).navigate(url)
    }

    fn current_markup(&mut self) -> Result<String, CrawlerError> {
        (**self).current_markup()
    }

    fn wait_for_selector(
        &mut self,
        selector: &str,
        timeout: Duration,
    ) -> Result<(), CrawlerError> {
        (**self).wait_for_selector(selector, timeout)
    }

    fn click(&mut self, selector: &str) -> Result<(), CrawlerError> {
        (**self).click(selector)
    }

    fn close(&mut self) -> Result<(), CrawlerError> {
        (**self).close()
    }
}

pub struct ChromeSession {
    inner: Option<(Browser, Arc<Tab>)>,
}

impl ChromeSession {
    pub fn launch(options: &BrowserOptions) -> Result<ChromeSession, CrawlerError> {
        options.check_live()?;
        let browser = Browser::new(LaunchOptions {
            headless: options.headless,
            window_size: Some(options.window_size),
            idle_browser_timeout: IDLE_TIMEOUT,
            ..Default::default()
        })
        .map_err(|e| CrawlerError::SessionFailure(e.to_string()))?;

        let tab = browser
            .new_tab()
            .map_err(|e| CrawlerError::SessionFailure(e.to_string()))?;
        tab.set_default_timeout(options.element_timeout().max(Duration::from_secs(30)));

        debug!("Browser launched (headless: {})", options.headless);
        Ok(ChromeSession {
            inner: Some((browser, tab)),
        })
    }

    fn tab(&self) -> Result<&Arc<Tab>, CrawlerError> {
        self.inner
            .as_ref()
            .map(|(_, tab)| tab)
            .ok_or_else(|| CrawlerError::SessionFailure("session already closed".to_string()))
    }

    /// Keeps `error` scoped to the current item unless the browser stopped answering.
    fn classify(&self, cause: impl Display, error: CrawlerError) -> CrawlerError {
        match &self.inner {
            Some((browser, _)) if browser.get_version().is_ok() => error,
            _ => CrawlerError::SessionFailure(cause.to_string()),
        }
    }

    fn first_visible<'a>(&self, tab: &'a Tab, selector: &str) -> Option<Element<'a>> {
        tab.find_elements(selector)
            .ok()?
            .into_iter()
            .find(|element| is_visible(element))
    }
}

fn is_visible(element: &Element<'_>) -> bool {
    element
        .call_js_fn(IS_VISIBLE, vec![], false)
        .ok()
        .and_then(|object| object.value)
        .and_then(|value| value.as_bool())
        .unwrap_or(false)
}

impl BrowserSession for ChromeSession {
    fn navigate(&mut self, url: &str) -> Result<(), CrawlerError> {
        let tab = self.tab()?;
        debug!("Visit {}", url);
        tab.navigate_to(url)
            .and_then(|tab| tab.wait_until_navigated())
            .map(|_| ())
            .map_err(|e| {
                self.classify(
                    &e,
                    CrawlerError::Navigation {
                        url: url.to_string(),
                        reason: e.to_string(),
                    },
                )
            })
    }

    fn current_markup(&mut self) -> Result<String, CrawlerError> {
        let tab = self.tab()?;
        tab.get_content().map_err(|e| {
            self.classify(
                &e,
                CrawlerError::Navigation {
                    url: tab.get_url(),
                    reason: e.to_string(),
                },
            )
        })
    }

    fn wait_for_selector(
        &mut self,
        selector: &str,
        timeout: Duration,
    ) -> Result<(), CrawlerError> {
        let tab = self.tab()?;
        let deadline = Instant::now() + timeout;
        loop {
            if self.first_visible(tab, selector).is_some() {
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(self.classify(
                    format!("timed out waiting for {}", selector),
                    CrawlerError::ElementNotFound {
                        selector: selector.to_string(),
                    },
                ));
            }
            std::thread::sleep(POLL_INTERVAL);
        }
    }

    fn click(&mut self, selector: &str) -> Result<(), CrawlerError> {
        let tab = self.tab()?;
        let not_found = || CrawlerError::ElementNotFound {
            selector: selector.to_string(),
        };
        let element = self
            .first_visible(tab, selector)
            .ok_or_else(|| self.classify(format!("no visible {}", selector), not_found()))?;
        element
            .click()
            .map(|_| ())
            .map_err(|e| self.classify(e, not_found()))
    }

    fn close(&mut self) -> Result<(), CrawlerError> {
        let Some((browser, tab)) = self.inner.take() else {
            return Ok(());
        };
        let closed = tab
            .close(true)
            .map(|_| ())
            .map_err(|e| CrawlerError::SessionFailure(e.to_string()));
        drop(tab);
        drop(browser);
        debug!("Browser closed");
        closed
    }
}

impl Drop for ChromeSession {
    fn drop(&mut self) {
        if self.inner.is_some() {
            if let Err(e) = self.close() {
                warn!("Failed to close browser cleanly: {}", e);
            }
        }
    }
}
