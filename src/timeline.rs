use csv::WriterBuilder;
use log::{info, warn};
use std::collections::BTreeMap;
use std::io;

pub mod config;
pub mod error;
pub mod fetch;
pub mod filter;
pub mod group;
pub mod normalize;
pub mod parser;
pub mod record;

pub use config::{AppConfig, ColumnConfig};
pub use error::{Error, Result};
pub use filter::{Filter, ALL};
pub use normalize::Normalizer;
pub use parser::RawRow;
pub use record::{MeetingRecord, NO_INPUTS, NO_TOPIC, UNSPECIFIED_PROJECT};

/// The currently loaded meetings. Each load replaces the whole set.
pub struct Timeline {
    normalizer: Normalizer,
    records: Vec<MeetingRecord>,
}

impl Timeline {
    pub fn new(columns: ColumnConfig) -> Self {
        Timeline {
            normalizer: Normalizer::new(columns),
            records: Vec::new(),
        }
    }

    pub fn consume(&mut self, rows: impl Iterator<Item = RawRow>) {
        self.records = rows.map(|row| self.normalizer.normalize(&row)).collect();
    }

    /// Parses the whole payload before touching the current set, so a
    /// malformed payload leaves the previous meetings in place.
    pub fn load_csv<R: io::Read>(&mut self, source: R) -> Result<usize> {
        let rows = parser::parse_rows(source)?;
        if rows.is_empty() {
            warn!("csv payload contained no meetings");
        }
        self.consume(rows.into_iter());
        let undated = self.records.iter().filter(|r| r.date.is_none()).count();
        info!(
            "loaded {} meetings ({} without a usable date)",
            self.records.len(),
            undated
        );
        Ok(self.records.len())
    }

    pub fn records(&self) -> &[MeetingRecord] {
        &self.records
    }

    pub fn grouped(&self) -> BTreeMap<&str, Vec<&MeetingRecord>> {
        group::group_by_project(&self.records)
    }

    pub fn filtered(&self, filter: &Filter) -> Vec<&MeetingRecord> {
        filter.apply(&self.records)
    }

    pub fn project_options(&self) -> Vec<String> {
        filter::project_options(&self.records)
    }

    pub fn student_options(&self) -> Vec<String> {
        filter::student_options(&self.records)
    }

    /// Filtered meetings as CSV, newest first.
    pub fn write_results<T: io::Write>(&self, filter: &Filter, target: T) -> Result<()> {
        let mut writer = WriterBuilder::new().from_writer(target);
        for record in self.filtered(filter) {
            writer.serialize(record)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Filtered meetings as plain text, one section per project.
    pub fn write_timeline<T: io::Write>(&self, filter: &Filter, mut target: T) -> Result<()> {
        let groups = group::group_by_project(self.filtered(filter));
        for (project, meetings) in groups {
            writeln!(target, "== {} ({})", project, meetings.len())?;
            for meeting in meetings {
                let date = if meeting.date_label.is_empty() {
                    "(no date)"
                } else {
                    meeting.date_label.as_str()
                };
                writeln!(target, "{}  {}  {}", date, meeting.student, meeting.topic)?;
                for subtopic in &meeting.subtopics {
                    writeln!(target, "    - {}", subtopic)?;
                }
                writeln!(target, "    inputs: {}", meeting.my_inputs)?;
                for item in &meeting.action_items {
                    writeln!(target, "    [ ] {}", item)?;
                }
                if !meeting.link.is_empty() {
                    writeln!(target, "    link: {}", meeting.link)?;
                }
            }
            writeln!(target)?;
        }
        target.flush()?;
        Ok(())
    }
}

impl Default for Timeline {
    fn default() -> Self {
        Timeline::new(ColumnConfig::default())
    }
}

#[cfg(test)]
const HEADER: &str = "Date of Meeting,Student Name (be consistent),Discussed Project Title  (be consistent),Meeting Topic,Subtopics / Agenda Items,Supervisor Inputs & Suggestions";

#[test]
fn sanity() {
    let mut timeline = Timeline::default();
    let csv = format!("{HEADER}\n2025-01-10,Alice,ProjA,Kickoff,Scope; Timeline,Looks good\n");

    assert_eq!(timeline.load_csv(csv.as_bytes()).unwrap(), 1);

    let record = &timeline.records()[0];
    assert_eq!(record.student, "Alice");
    assert_eq!(record.project, "ProjA");
    assert_eq!(record.subtopics, vec!["Scope", "Timeline"]);
    assert_eq!(record.raw.get("Meeting Topic"), Some("Kickoff"));
}

#[test]
fn reload_replaces_records() {
    let mut timeline = Timeline::default();
    let first = format!("{HEADER}\n2025-01-10,Alice,ProjA,Kickoff,,\n2025-01-11,Bob,ProjB,Intro,,\n");
    let second = format!("{HEADER}\n2025-03-01,Carol,ProjC,Plan,,\n");

    timeline.load_csv(first.as_bytes()).unwrap();
    timeline.load_csv(second.as_bytes()).unwrap();

    assert_eq!(timeline.records().len(), 1);
    assert_eq!(timeline.records()[0].student, "Carol");
}

#[test]
fn failed_parse_keeps_previous_records() {
    let mut timeline = Timeline::default();
    let good = format!("{HEADER}\n2025-01-10,Alice,ProjA,Kickoff,,\n");
    timeline.load_csv(good.as_bytes()).unwrap();

    let bad: &[u8] = b"Meeting Topic\n\xff\xfe\n";
    assert!(matches!(timeline.load_csv(bad), Err(Error::Csv(_))));
    assert_eq!(timeline.records().len(), 1);
    assert_eq!(timeline.records()[0].topic, "Kickoff");
}

#[test]
fn options_follow_loaded_records() {
    let mut timeline = Timeline::default();
    let csv = format!("{HEADER}\n2025-01-10,Bob,ProjB,a,,\n2025-01-11,Alice,,b,,\n2025-01-12,,ProjA,c,,\n");
    timeline.load_csv(csv.as_bytes()).unwrap();

    assert_eq!(
        timeline.project_options(),
        vec!["ALL", "ProjA", "ProjB", UNSPECIFIED_PROJECT]
    );
    assert_eq!(timeline.student_options(), vec!["ALL", "Alice", "Bob"]);
}

#[test]
fn timeline_text_lists_groups() {
    let mut timeline = Timeline::default();
    let csv = format!("{HEADER}\n2025-01-10,Alice,ProjA,Kickoff,Scope,Looks good\n,Bob,,Chat,,\n");
    timeline.load_csv(csv.as_bytes()).unwrap();

    let mut output = Vec::new();
    timeline.write_timeline(&Filter::default(), &mut output).unwrap();
    let text = String::from_utf8(output).unwrap();

    assert_eq!(
        text,
        "== ProjA (1)\n\
         2025-01-10  Alice  Kickoff\n    - Scope\n    inputs: Looks good\n\n\
         == Unspecified Project (1)\n\
         (no date)  Bob  Chat\n    inputs: (No inputs)\n\n"
    );
}
