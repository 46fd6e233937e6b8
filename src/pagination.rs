use crate::{browser::BrowserSession, config::BrowserOptions, CrawlerError};
use tracing::{debug, warn};

/// Clicks the load-more control until it stops showing up.
///
/// A missing control is the normal way out, so wait failures end the loop instead of
/// surfacing. Only a dead browser is returned as an error.
pub fn load_all<S: BrowserSession + ?Sized>(
    session: &mut S,
    selector: &str,
    options: &BrowserOptions,
) -> Result<(), CrawlerError> {
    let mut clicks = 0;
    loop {
        if clicks >= options.max_load_more_clicks {
            warn!("Stop loading more after {} clicks", clicks);
            return Ok(());
        }

        match session.wait_for_selector(selector, options.element_timeout()) {
            Ok(()) => {}
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                debug!("No more listings to load after {} clicks ({})", clicks, e);
                return Ok(());
            }
        }

        match session.click(selector) {
            Ok(()) => clicks += 1,
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                warn!("Load more click failed after {} clicks: {}", clicks, e);
                return Ok(());
            }
        }

        std::thread::sleep(options.settle_interval());
    }
}
