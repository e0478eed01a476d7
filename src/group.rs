use crate::record::MeetingRecord;
use std::collections::BTreeMap;

/// Orders records newest first. Undated records go last and equal dates keep
/// their input order.
pub fn sort_newest_first(records: &mut [&MeetingRecord]) {
    records.sort_by(|a, b| a.cmp_newest_first(b));
}

/// Records per project, each list newest first. Projects iterate in
/// lexicographic order.
pub fn group_by_project<'a, I>(records: I) -> BTreeMap<&'a str, Vec<&'a MeetingRecord>>
where
    I: IntoIterator<Item = &'a MeetingRecord>,
{
    let mut groups: BTreeMap<&str, Vec<&MeetingRecord>> = BTreeMap::new();
    for record in records {
        groups.entry(record.project.as_str()).or_default().push(record);
    }
    groups.values_mut().for_each(|group| sort_newest_first(group));
    groups
}
