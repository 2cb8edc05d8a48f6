use crate::config::ClusterConfig;
use crate::dates::DateParser;
use crate::models::{MergedRecord, PriorityField, Record};
use std::collections::BTreeSet;

/// Build the canonical record for one cluster.
///
/// `members` are indices into `records`, in input order.
pub fn merge_cluster(
    records: &[Record],
    members: &[usize],
    config: &ClusterConfig,
    dates: &dyn DateParser,
) -> MergedRecord {
    let group: Vec<&Record> = members.iter().map(|&idx| &records[idx]).collect();

    MergedRecord {
        title: longest_title(&group),
        owner_tags: owner_tags(&group, &config.sentinels.owner_tag),
        dev_priority: highest_priority(&group, PriorityField::Developer, config),
        stakeholder_priority: highest_priority(&group, PriorityField::Stakeholder, config),
        created_at: earliest_date(&group, dates),
        member_ids: group
            .iter()
            .map(|r| r.id.clone().unwrap_or_default())
            .collect(),
        member_count: group.len(),
    }
}

/// Longest non-empty title; the first one wins a tie.
fn longest_title(group: &[&Record]) -> String {
    let mut best = "";
    for title in group.iter().map(|r| r.title().trim()) {
        if title.chars().count() > best.chars().count() {
            best = title;
        }
    }
    best.to_string()
}

fn owner_tags(group: &[&Record], sentinel: &str) -> String {
    let tags: BTreeSet<&str> = group
        .iter()
        .filter_map(|r| r.owner_tag.as_deref())
        .map(str::trim)
        .filter(|tag| !tag.is_empty() && *tag != sentinel)
        .collect();
    tags.into_iter().collect::<Vec<_>>().join(", ")
}

/// Highest-ranked recognized priority; the first one wins a tie.
fn highest_priority(group: &[&Record], field: PriorityField, config: &ClusterConfig) -> Option<String> {
    let sentinel = config.priority_sentinel(field);
    let mut best: Option<(&str, usize)> = None;

    for value in group.iter().filter_map(|r| field.value(r)).map(str::trim) {
        if value.is_empty() || value == sentinel {
            continue;
        }
        let rank = config.priority_rank(value);
        if rank == 0 {
            continue;
        }
        if best.map_or(true, |(_, best_rank)| rank > best_rank) {
            best = Some((value, rank));
        }
    }

    best.map(|(value, _)| value.to_string())
}

/// Original text of the earliest parseable `created_at`, or `""`.
fn earliest_date(group: &[&Record], dates: &dyn DateParser) -> String {
    let mut earliest: Option<(chrono::NaiveDate, &str)> = None;

    for raw in group.iter().filter_map(|r| r.created_at.as_deref()).map(str::trim) {
        let Some(parsed) = dates.parse(raw) else {
            continue;
        };
        if earliest.map_or(true, |(current, _)| parsed < current) {
            earliest = Some((parsed, raw));
        }
    }

    earliest.map(|(_, raw)| raw.to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dates::LocaleDateParser;

    fn record(id: &str, title: &str) -> Record {
        Record {
            id: Some(id.into()),
            title: Some(title.into()),
            ..Default::default()
        }
    }

    fn merge_all(records: &[Record]) -> MergedRecord {
        let members: Vec<usize> = (0..records.len()).collect();
        merge_cluster(records, &members, &ClusterConfig::default(), &LocaleDateParser)
    }

    #[test]
    fn picks_longest_title_first_on_tie() {
        let records = vec![
            record("1", "Export"),
            record("2", "Export to CSV"),
            record("3", "Export to PDF"),
            record("4", ""),
        ];
        assert_eq!(merge_all(&records).title, "Export to CSV");
    }

    #[test]
    fn title_length_counts_characters() {
        // 9 Cyrillic chars (18 bytes) vs 12 ASCII chars.
        let records = vec![record("1", "Экспорт в"), record("2", "Export to it")];
        assert_eq!(merge_all(&records).title, "Export to it");
    }

    #[test]
    fn owner_tags_sorted_unique_without_sentinel() {
        let mut records = vec![record("1", "a"), record("2", "b"), record("3", "c"), record("4", "d")];
        records[0].owner_tag = Some("Zeta Homes".into());
        records[1].owner_tag = Some(" Alpha Build ".into());
        records[2].owner_tag = Some("Zeta Homes".into());
        records[3].owner_tag = Some(ClusterConfig::default().sentinels.owner_tag);
        assert_eq!(merge_all(&records).owner_tags, "Alpha Build, Zeta Homes");
    }

    #[test]
    fn owner_tags_empty_when_none_present() {
        let records = vec![record("1", "a")];
        assert_eq!(merge_all(&records).owner_tags, "");
    }

    #[test]
    fn highest_priority_wins() {
        let mut records = vec![record("1", "a"), record("2", "b"), record("3", "c")];
        records[1].dev_priority = Some("B".into());
        records[2].dev_priority = Some("A".into());
        let merged = merge_all(&records);
        assert_eq!(merged.dev_priority.as_deref(), Some("A"));
        assert_eq!(merged.stakeholder_priority, None);
    }

    #[test]
    fn priority_ignores_sentinel_and_unknown_values() {
        let sentinels = ClusterConfig::default().sentinels;
        let mut records = vec![record("1", "a"), record("2", "b"), record("3", "c")];
        records[0].stakeholder_priority = Some(sentinels.stakeholder_priority.clone());
        records[1].stakeholder_priority = Some("urgent".into());
        records[2].stakeholder_priority = Some("C".into());
        records[0].dev_priority = Some(sentinels.dev_priority);
        let merged = merge_all(&records);
        assert_eq!(merged.stakeholder_priority.as_deref(), Some("C"));
        assert_eq!(merged.dev_priority, None);
    }

    #[test]
    fn earliest_parsed_date_keeps_original_text() {
        let mut records = vec![record("1", "a"), record("2", "b"), record("3", "c")];
        records[0].created_at = Some("3 дек. 2025 15:24".into());
        records[1].created_at = Some("n/a".into());
        records[2].created_at = Some("14 нояб. 2025 09:00".into());
        assert_eq!(merge_all(&records).created_at, "14 нояб. 2025 09:00");
    }

    #[test]
    fn unparsed_dates_yield_empty_string() {
        let mut records = vec![record("1", "a"), record("2", "b")];
        records[0].created_at = Some("n/a".into());
        assert_eq!(merge_all(&records).created_at, "");
    }

    #[test]
    fn member_ids_in_input_order_with_duplicates() {
        let records = vec![record("T-9", "a"), record("T-1", "b"), record("T-9", "c"), Record::default()];
        let merged = merge_cluster(&records, &[0, 1, 2, 3], &ClusterConfig::default(), &LocaleDateParser);
        assert_eq!(merged.member_ids, vec!["T-9", "T-1", "T-9", ""]);
        assert_eq!(merged.member_count, 4);
    }

    #[test]
    fn merges_only_listed_members() {
        let records = vec![record("1", "Short"), record("2", "A much longer title"), record("3", "Mid title")];
        let merged = merge_cluster(&records, &[0, 2], &ClusterConfig::default(), &LocaleDateParser);
        assert_eq!(merged.title, "Mid title");
        assert_eq!(merged.member_ids, vec!["1", "3"]);
    }
}
