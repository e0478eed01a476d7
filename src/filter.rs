use crate::group::sort_newest_first;
use crate::record::MeetingRecord;
use chrono::NaiveDate;
use std::collections::BTreeSet;

/// Selector value that disables the project or student filter.
pub const ALL: &str = "ALL";

/// All active predicates must hold for a record to be kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub project: String,
    pub student: String,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub query: String,
}

impl Default for Filter {
    fn default() -> Self {
        Filter {
            project: ALL.to_string(),
            student: ALL.to_string(),
            from: None,
            to: None,
            query: String::new(),
        }
    }
}

impl Filter {
    pub fn matches(&self, record: &MeetingRecord) -> bool {
        if self.project != ALL && record.project != self.project {
            return false;
        }
        if self.student != ALL && record.student != self.student {
            return false;
        }
        // undated records are never excluded by the date range
        if let Some(day) = record.date.map(|d| d.date()) {
            if self.from.is_some_and(|from| day < from) {
                return false;
            }
            if self.to.is_some_and(|to| day > to) {
                return false;
            }
        }
        let query = self.query.trim();
        query.is_empty() || record.haystack().to_lowercase().contains(&query.to_lowercase())
    }

    /// Matching records, newest first.
    pub fn apply<'a, I>(&self, records: I) -> Vec<&'a MeetingRecord>
    where
        I: IntoIterator<Item = &'a MeetingRecord>,
    {
        let mut kept: Vec<&MeetingRecord> = records
            .into_iter()
            .filter(|record| self.matches(record))
            .collect();
        sort_newest_first(&mut kept);
        kept
    }
}

/// Distinct non-empty values, sorted, with [`ALL`] first.
pub fn options<'a, I>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let distinct: BTreeSet<&str> = values.into_iter().filter(|v| !v.is_empty()).collect();
    std::iter::once(ALL.to_string())
        .chain(distinct.into_iter().map(String::from))
        .collect()
}

pub fn project_options(records: &[MeetingRecord]) -> Vec<String> {
    options(records.iter().map(|r| r.project.as_str()))
}

pub fn student_options(records: &[MeetingRecord]) -> Vec<String> {
    options(records.iter().map(|r| r.student.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ColumnConfig;
    use crate::normalize::Normalizer;
    use crate::parser::RawRow;

    fn meeting(project: &str, student: &str, date: &str, topic: &str) -> MeetingRecord {
        let columns = ColumnConfig::default();
        let row: RawRow = vec![
            (columns.project.as_str(), project),
            (columns.student.as_str(), student),
            (columns.date.as_str(), date),
            (columns.topic.as_str(), topic),
            (columns.subtopics.as_str(), "Literature review; Data cleaning"),
        ]
        .into_iter()
        .collect();
        Normalizer::new(columns).normalize(&row)
    }

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn sample() -> Vec<MeetingRecord> {
        vec![
            meeting("P1", "X", "2024-01-01", "one"),
            meeting("P2", "Y", "2024-02-01", "two"),
        ]
    }

    fn topics(records: &[&MeetingRecord]) -> Vec<String> {
        records.iter().map(|r| r.topic.clone()).collect()
    }

    #[test]
    fn default_filter_keeps_everything_sorted() {
        let records = sample();
        assert_eq!(topics(&Filter::default().apply(&records)), vec!["two", "one"]);
    }

    #[test]
    fn student_and_project_are_conjunctive() {
        let records = sample();
        let filter = Filter {
            student: "X".to_string(),
            ..Filter::default()
        };
        assert_eq!(topics(&filter.apply(&records)), vec!["one"]);

        let filter = Filter {
            project: "P2".to_string(),
            student: "X".to_string(),
            ..Filter::default()
        };
        assert!(filter.apply(&records).is_empty());
    }

    #[test]
    fn date_bounds_are_inclusive() {
        let records = sample();
        let filter = Filter {
            from: Some(day("2024-01-01")),
            to: Some(day("2024-01-01")),
            ..Filter::default()
        };
        assert_eq!(topics(&filter.apply(&records)), vec!["one"]);

        let filter = Filter {
            from: Some(day("2024-01-02")),
            ..Filter::default()
        };
        assert_eq!(topics(&filter.apply(&records)), vec!["two"]);
    }

    #[test]
    fn undated_records_survive_any_range() {
        let mut records = sample();
        records.push(meeting("P1", "X", "", "undated"));
        records.push(meeting("P1", "X", "whenever", "unparsed"));
        let filter = Filter {
            from: Some(day("2030-01-01")),
            to: Some(day("2020-01-01")),
            ..Filter::default()
        };
        assert_eq!(topics(&filter.apply(&records)), vec!["undated", "unparsed"]);
    }

    #[test]
    fn query_is_case_insensitive_over_text_fields() {
        let records = sample();
        let by_subtopic = Filter {
            query: "DATA clean".to_string(),
            ..Filter::default()
        };
        assert_eq!(by_subtopic.apply(&records).len(), 2);

        let by_project = Filter {
            query: "p2".to_string(),
            ..Filter::default()
        };
        assert_eq!(topics(&by_project.apply(&records)), vec!["two"]);

        let by_inputs = Filter {
            query: "no inputs".to_string(),
            ..Filter::default()
        };
        assert_eq!(by_inputs.apply(&records).len(), 2);

        let nothing = Filter {
            query: "zebra".to_string(),
            ..Filter::default()
        };
        assert!(nothing.apply(&records).is_empty());
    }

    #[test]
    fn options_are_distinct_sorted_with_wildcard() {
        let mut records = sample();
        records.push(meeting("P1", "", "2024-03-01", "three"));
        records.push(meeting("", "A", "2024-03-01", "four"));

        assert_eq!(
            project_options(&records),
            vec!["ALL", "P1", "P2", "Unspecified Project"]
        );
        assert_eq!(student_options(&records), vec!["ALL", "A", "X", "Y"]);
        assert_eq!(options(Vec::<&str>::new()), vec!["ALL"]);
    }
}
