use lazy_regex::regex;
use reqwest::Url;

/// Collapses every whitespace run into a single space and trims the ends.
pub(crate) fn normalize_whitespace(text: &str) -> String {
    regex!(r"\s+").replace_all(text, " ").trim().to_string()
}

pub(crate) fn resolve_link(base: &str, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') {
        return None;
    }
    match Url::parse(href) {
        Ok(url) => Some(url.to_string()),
        Err(_) => Url::parse(base)
            .and_then(|base| base.join(href))
            .ok()
            .map(|url| url.to_string()),
    }
}

/// Upper-cases the first character and lower-cases the rest.
pub(crate) fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(
            normalize_whitespace("  Python \n\n and\t Docker  "),
            "Python and Docker"
        );
        assert_eq!(normalize_whitespace(" \n "), "");
    }

    #[test]
    fn test_resolve_link() {
        let base = "https://jobs.dou.ua/vacancies/?category=Python&exp=0-1";
        assert_eq!(
            resolve_link(base, "/companies/acme/vacancies/123/").as_deref(),
            Some("https://jobs.dou.ua/companies/acme/vacancies/123/")
        );
        assert_eq!(
            resolve_link(base, "https://jobs.dou.ua/companies/x/vacancies/1/").as_deref(),
            Some("https://jobs.dou.ua/companies/x/vacancies/1/")
        );
        assert_eq!(resolve_link(base, "  "), None);
        assert_eq!(resolve_link(base, "#top"), None);
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("senior"), "Senior");
        assert_eq!(capitalize("SENIOR"), "Senior");
        assert_eq!(capitalize("5+ years"), "5+ years");
        assert_eq!(capitalize(""), "");
    }
}
