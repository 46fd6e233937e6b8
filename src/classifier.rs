use crate::{data::ExperienceVocabulary, utils};
use regex::{Regex, RegexBuilder};

/// Vocabulary entries found in `description`, in vocabulary order.
pub fn classify_technologies<S: AsRef<str>>(
    description: &str,
    vocabulary: &[S],
) -> Vec<String> {
    let description = description.to_lowercase();
    let mut technologies: Vec<String> = vec![];
    for tech in vocabulary {
        let tech = tech.as_ref();
        if tech.is_empty() || technologies.iter().any(|t| t == tech) {
            continue;
        }
        if description.contains(&tech.to_lowercase()) {
            technologies.push(tech.to_string());
        }
    }
    technologies
}

/// Whole-word, case-insensitive title patterns for every experience label, compiled once
/// per run.
pub struct ExperienceMatcher {
    patterns: Vec<(Regex, String)>,
    vocabulary: ExperienceVocabulary,
}

impl ExperienceMatcher {
    pub fn new(vocabulary: &ExperienceVocabulary) -> Result<Self, regex::Error> {
        let patterns = vocabulary
            .labels()
            .filter(|label| !label.is_empty())
            .map(|label| {
                RegexBuilder::new(&format!(r"\b{}\b", regex::escape(label)))
                    .case_insensitive(true)
                    .build()
                    .map(|re| (re, utils::capitalize(label)))
            })
            .collect::<Result<_, _>>()?;

        Ok(ExperienceMatcher {
            patterns,
            vocabulary: vocabulary.clone(),
        })
    }

    /// The first vocabulary label standing as a whole word in `title` wins, otherwise the
    /// label mapped from the page the listing came from.
    pub fn classify(&self, title: &str, experience_key: &str) -> Option<String> {
        self.patterns
            .iter()
            .find(|(re, _)| re.is_match(title))
            .map(|(_, label)| label.clone())
            .or_else(|| {
                self.vocabulary
                    .label_for(experience_key)
                    .map(ToString::to_string)
            })
    }
}
