use crate::parser::RawRow;
use chrono::NaiveDateTime;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use std::cmp::Ordering;

pub const UNSPECIFIED_PROJECT: &str = "Unspecified Project";
pub const NO_TOPIC: &str = "(No topic)";
pub const NO_INPUTS: &str = "(No inputs)";

/// One meeting, derived from one raw row.
#[derive(Debug, Clone, PartialEq)]
pub struct MeetingRecord {
    pub meeting_id: String,
    pub date: Option<NaiveDateTime>,
    pub date_label: String,
    pub student: String,
    pub project: String,
    pub topic: String,
    pub subtopics: Vec<String>,
    pub my_inputs: String,
    pub link: String,
    pub action_items: Vec<String>,
    pub raw: RawRow,
}

impl MeetingRecord {
    /// Text the free-text filter searches.
    pub fn haystack(&self) -> String {
        let subtopics = self.subtopics.join(" ");
        [
            self.student.as_str(),
            self.project.as_str(),
            self.topic.as_str(),
            subtopics.as_str(),
            self.my_inputs.as_str(),
        ]
        .join(" ")
    }

    /// Newest first; undated records after every dated one.
    pub fn cmp_newest_first(&self, other: &Self) -> Ordering {
        other.date.cmp(&self.date)
    }
}

impl Serialize for MeetingRecord {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("MeetingRecord", 9)?;
        state.serialize_field("date", &self.date_label)?;
        state.serialize_field("student", &self.student)?;
        state.serialize_field("project", &self.project)?;
        state.serialize_field("topic", &self.topic)?;
        state.serialize_field("subtopics", &self.subtopics.join("; "))?;
        state.serialize_field("inputs", &self.my_inputs)?;
        state.serialize_field("action_items", &self.action_items.join("; "))?;
        state.serialize_field("link", &self.link)?;
        state.serialize_field("meeting_id", &self.meeting_id)?;
        state.end()
    }
}
