use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const TECHNOLOGY_SEPARATOR: &str = ", ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VacancyRecord {
    pub title: String,
    pub company: String,
    pub technologies: Vec<String>,
    pub experience: String,
}

impl VacancyRecord {
    /// Column order of the persisted table.
    pub const FIELDS: [&'static str; 4] = ["title", "company", "technologies", "experience"];

    pub fn to_row(&self) -> [String; 4] {
        [
            self.title.clone(),
            self.company.clone(),
            self.technologies.iter().join(TECHNOLOGY_SEPARATOR),
            self.experience.clone(),
        ]
    }

    pub fn from_row<I: AsRef<str>>(row: &[I]) -> Option<VacancyRecord> {
        let [title, company, technologies, experience] = row else {
            return None;
        };
        let technologies = technologies.as_ref();
        Some(VacancyRecord {
            title: title.as_ref().to_string(),
            company: company.as_ref().to_string(),
            technologies: if technologies.is_empty() {
                vec![]
            } else {
                technologies
                    .split(TECHNOLOGY_SEPARATOR)
                    .map(|t| t.trim().to_string())
                    .collect()
            },
            experience: experience.as_ref().to_string(),
        })
    }
}

impl fmt::Display for VacancyRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Title        : {}", self.title)?;
        writeln!(f, "Company      : {}", self.company)?;
        writeln!(f, "Technologies : {}", self.technologies.join(TECHNOLOGY_SEPARATOR))?;
        writeln!(f, "Experience   : {}", self.experience)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryTarget {
    pub experience_key: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingSummary {
    pub detail_link: String,
}

/// Listings found on one fully expanded page, plus how many containers were unusable.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ListingPage {
    pub summaries: Vec<ListingSummary>,
    pub skipped: usize,
}

/// Raw fields of a detail page, before classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VacancyDetail {
    pub title: String,
    pub company: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperienceLevel {
    pub key: String,
    pub label: String,
}

/// Query key to canonical label. Kept as a list because the order decides title matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExperienceVocabulary(pub Vec<ExperienceLevel>);

impl ExperienceVocabulary {
    pub fn label_for(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|level| level.key == key)
            .map(|level| level.label.as_str())
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|level| level.label.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, L: Into<String>> FromIterator<(K, L)> for ExperienceVocabulary {
    fn from_iter<T: IntoIterator<Item = (K, L)>>(iter: T) -> Self {
        ExperienceVocabulary(
            iter.into_iter()
                .map(|(key, label)| ExperienceLevel {
                    key: key.into(),
                    label: label.into(),
                })
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_row_uses_field_order() {
        let record = VacancyRecord {
            title: "Python Developer".to_string(),
            company: "Acme".to_string(),
            technologies: vec!["Python".to_string(), "Docker".to_string()],
            experience: "Middle".to_string(),
        };
        assert_eq!(
            record.to_row(),
            [
                "Python Developer".to_string(),
                "Acme".to_string(),
                "Python, Docker".to_string(),
                "Middle".to_string()
            ]
        );
        assert_eq!(VacancyRecord::from_row(&record.to_row()), Some(record));
    }

    #[test]
    fn test_empty_technologies_cell() {
        let record = VacancyRecord::from_row(&["QA", "Acme", "", "Junior"]).unwrap();
        assert!(record.technologies.is_empty());
        assert_eq!(VacancyRecord::from_row(&["too", "short"]), None);
    }

    #[test]
    fn test_experience_vocabulary_lookup() {
        let vocabulary: ExperienceVocabulary =
            [("0-1", "Junior"), ("5plus", "Lead")].into_iter().collect();
        assert_eq!(vocabulary.label_for("5plus"), Some("Lead"));
        assert_eq!(vocabulary.label_for("1-3"), None);
        assert_eq!(vocabulary.labels().collect::<Vec<_>>(), vec!["Junior", "Lead"]);
    }
}
