use crate::data::{ExperienceVocabulary, VacancyRecord};
use itertools::Itertools;
use std::{collections::HashMap, fmt};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TechnologyCount {
    pub technology: String,
    pub count: usize,
}

/// Technology frequencies of one group of vacancies, most frequent first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    pub title: String,
    pub vacancies: usize,
    pub counts: Vec<TechnologyCount>,
}

pub fn count_technologies<'a, I>(title: impl Into<String>, records: I) -> FrequencyTable
where
    I: IntoIterator<Item = &'a VacancyRecord>,
{
    let mut vacancies = 0;
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for record in records {
        vacancies += 1;
        for tech in &record.technologies {
            *counts.entry(tech.as_str()).or_default() += 1;
        }
    }

    let counts = counts
        .into_iter()
        .sorted_by(|(a, a_count), (b, b_count)| b_count.cmp(a_count).then_with(|| a.cmp(b)))
        .map(|(technology, count)| TechnologyCount {
            technology: technology.to_string(),
            count,
        })
        .collect();

    FrequencyTable {
        title: title.into(),
        vacancies,
        counts,
    }
}

/// The overall table followed by one table per experience label, in vocabulary order.
pub fn summarize(
    records: &[VacancyRecord],
    vocabulary: &ExperienceVocabulary,
) -> Vec<FrequencyTable> {
    let mut tables = vec![count_technologies("Overall", records)];
    for label in vocabulary.labels().unique() {
        tables.push(count_technologies(
            label,
            records.iter().filter(|r| r.experience == label),
        ));
    }
    tables
}

impl fmt::Display for FrequencyTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} ({} vacancies)", self.title, self.vacancies)?;
        let width = self
            .counts
            .iter()
            .map(|c| c.technology.chars().count())
            .max()
            .unwrap_or(0);
        for c in &self.counts {
            writeln!(f, "  {:<width$}  {:>4}", c.technology, c.count, width = width)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(technologies: &[&str], experience: &str) -> VacancyRecord {
        VacancyRecord {
            title: "Python Developer".to_string(),
            company: "Acme".to_string(),
            technologies: technologies.iter().map(ToString::to_string).collect(),
            experience: experience.to_string(),
        }
    }

    fn count(technology: &str, count: usize) -> TechnologyCount {
        TechnologyCount {
            technology: technology.to_string(),
            count,
        }
    }

    #[test]
    fn test_summarize_groups_by_experience() {
        let records = vec![
            record(&["Python", "Django"], "Junior"),
            record(&["Python", "Docker"], "Senior"),
            record(&["Python", "Docker", "AWS"], "Senior"),
            record(&[], "Junior"),
            record(&["Go"], "Architect"),
        ];
        let vocabulary: ExperienceVocabulary =
            [("0-1", "Junior"), ("3-5", "Senior"), ("5plus", "Lead")]
                .into_iter()
                .collect();

        let tables = summarize(&records, &vocabulary);
        assert_eq!(tables.len(), 4);

        assert_eq!(tables[0].vacancies, 5);
        assert_eq!(
            tables[0].counts,
            vec![
                count("Python", 3),
                count("Docker", 2),
                count("AWS", 1),
                count("Django", 1),
                count("Go", 1),
            ]
        );

        assert_eq!(tables[1].title, "Junior");
        assert_eq!(tables[1].vacancies, 2);
        assert_eq!(tables[1].counts, vec![count("Django", 1), count("Python", 1)]);

        assert_eq!(tables[2].title, "Senior");
        assert_eq!(
            tables[2].counts,
            vec![count("Docker", 2), count("Python", 2), count("AWS", 1)]
        );

        assert_eq!(tables[3].title, "Lead");
        assert_eq!(tables[3].vacancies, 0);
        assert!(tables[3].counts.is_empty());
    }

    #[test]
    fn test_display() {
        let table = count_technologies(
            "Senior",
            &[record(&["Python", "PostgreSQL"], "Senior"), record(&["Python"], "Senior")],
        );
        assert_eq!(
            table.to_string(),
            "Senior (2 vacancies)\n  Python         2\n  PostgreSQL     1\n"
        );
    }
}
