use crate::{
    data::{ListingPage, ListingSummary, VacancyDetail},
    utils, CrawlerError, VacancyBoard,
};
use itertools::Itertools;
use lazy_static::lazy_static;
use scraper::{ElementRef, Html, Selector};
use tracing::warn;

const LOAD_MORE: &str = "div.more-btn a";

const E: &str = "Invalid selector";
lazy_static! {
    static ref LISTING: Selector = Selector::parse("li.l-vacancy").expect(E);
    static ref DETAIL_LINK: Selector = Selector::parse("a.vt").expect(E);
    static ref TITLE: Selector = Selector::parse(".l-vacancy > h1").expect(E);
    static ref COMPANY: Selector = Selector::parse(".l-n a").expect(E);
    static ref DESCRIPTION_NODES: Selector = Selector::parse(".l-vacancy *").expect(E);
}

#[derive(Debug, Default)]
pub struct DouBoard;

impl DouBoard {
    fn parse_listing(
        &self,
        listing: ElementRef<'_>,
        page_url: &str,
    ) -> Result<ListingSummary, CrawlerError> {
        let href = listing
            .select(&DETAIL_LINK)
            .next()
            .ok_or_else(|| CrawlerError::MalformedListing {
                reason: "no a.vt anchor".to_string(),
            })?
            .value()
            .attr("href")
            .ok_or_else(|| CrawlerError::MalformedListing {
                reason: "anchor without href".to_string(),
            })?;

        let detail_link =
            utils::resolve_link(page_url, href).ok_or_else(|| CrawlerError::MalformedListing {
                reason: format!("unusable href {:?}", href),
            })?;
        Ok(ListingSummary { detail_link })
    }
}

fn text_of(el: ElementRef<'_>) -> String {
    utils::normalize_whitespace(&el.text().collect::<String>())
}

impl VacancyBoard for DouBoard {
    fn load_more_selector(&self) -> &str {
        LOAD_MORE
    }

    fn parse_listings(&self, doc: &Html, page_url: &str) -> ListingPage {
        let mut page = ListingPage::default();
        for (i, listing) in doc.select(&LISTING).enumerate() {
            match self.parse_listing(listing, page_url) {
                Ok(summary) => page.summaries.push(summary),
                Err(e) => {
                    warn!("Skip listing #{} on {}: {}", i + 1, page_url, e);
                    page.skipped += 1;
                }
            }
        }
        page
    }

    fn parse_detail(&self, doc: &Html, url: &str) -> Result<VacancyDetail, CrawlerError> {
        let title = doc
            .select(&TITLE)
            .next()
            .map(text_of)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| CrawlerError::DetailPageIncomplete {
                url: url.to_string(),
                missing: "title",
            })?;

        let company = doc
            .select(&COMPANY)
            .next()
            .map(text_of)
            .filter(|c| !c.is_empty())
            .ok_or_else(|| CrawlerError::DetailPageIncomplete {
                url: url.to_string(),
                missing: "company",
            })?;

        let description = doc
            .select(&DESCRIPTION_NODES)
            .map(|el| el.text().collect::<String>().trim().to_string())
            .join(" ");

        Ok(VacancyDetail {
            title,
            company,
            description: utils::normalize_whitespace(&description),
        })
    }
}
