use std::collections::HashSet;

use crate::models::{ClientRecord, Status};

/// Squad value meaning "no squad filter".
pub const ALL_GROUPS: &str = "todos";

/// Criteria applied by the `clients` and `dashboard` commands. All set criteria must
/// match.
#[derive(Debug, Clone, Default)]
pub struct ClientFilter {
    pub group: Option<String>,
    pub search: Option<String>,
    pub status: Option<Status>,
}

impl ClientFilter {
    pub fn new(group: Option<String>, search: Option<String>, status: Option<Status>) -> Self {
        Self {
            group: group.filter(|g| g != ALL_GROUPS),
            search: search.filter(|s| !s.trim().is_empty()),
            status,
        }
    }

    pub fn is_active(&self) -> bool {
        self.group.is_some() || self.search.is_some() || self.status.is_some()
    }

    pub fn matches(&self, record: &ClientRecord) -> bool {
        if let Some(group) = &self.group {
            if &record.group != group {
                return false;
            }
        }
        if let Some(term) = &self.search {
            if !record.name.to_lowercase().contains(&term.to_lowercase()) {
                return false;
            }
        }
        if let Some(status) = self.status {
            if record.status != status {
                return false;
            }
        }
        true
    }

    pub fn apply(&self, records: &[ClientRecord]) -> Vec<ClientRecord> {
        records.iter().filter(|r| self.matches(r)).cloned().collect()
    }

    /// Label for report headers, e.g. `todos` when no squad is selected.
    pub fn group_label(&self) -> &str {
        self.group.as_deref().unwrap_or(ALL_GROUPS)
    }
}

/// Squads in the order they first appear.
pub fn unique_groups(records: &[ClientRecord]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut groups = Vec::new();
    for record in records {
        if seen.insert(record.group.as_str()) {
            groups.push(record.group.clone());
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, group: &str, status: Status) -> ClientRecord {
        ClientRecord {
            id: 1,
            name: name.to_string(),
            group: group.to_string(),
            fee: 1000.0,
            lifetime_months: 6.0,
            status,
        }
    }

    fn sample() -> Vec<ClientRecord> {
        vec![
            record("Padaria Central", "Spartans", Status::Safe),
            record("Oficina do Zé", "Templários", Status::Danger),
            record("Central Pet", "Templários", Status::Care),
            record("Mercado Bom Preço", "Spartans", Status::Danger),
        ]
    }

    #[test]
    fn test_todos_means_all_groups() {
        let filter = ClientFilter::new(Some(ALL_GROUPS.to_string()), None, None);
        assert!(!filter.is_active());
        assert_eq!(filter.apply(&sample()).len(), 4);
        assert_eq!(filter.group_label(), "todos");
    }

    #[test]
    fn test_group_filter() {
        let filter = ClientFilter::new(Some("Templários".to_string()), None, None);
        let filtered = filter.apply(&sample());
        assert_eq!(filtered.len(), 2);
        assert!(filtered.iter().all(|r| r.group == "Templários"));
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let filter = ClientFilter::new(None, Some("CENTRAL".to_string()), None);
        let names: Vec<String> = filter.apply(&sample()).into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["Padaria Central", "Central Pet"]);
    }

    #[test]
    fn test_blank_search_is_ignored() {
        let filter = ClientFilter::new(None, Some("  ".to_string()), None);
        assert!(!filter.is_active());
    }

    #[test]
    fn test_filters_combine() {
        let filter = ClientFilter::new(
            Some("Spartans".to_string()),
            None,
            Some(Status::Danger),
        );
        let filtered = filter.apply(&sample());
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].name, "Mercado Bom Preço");
    }

    #[test]
    fn test_unique_groups_first_appearance() {
        assert_eq!(unique_groups(&sample()), vec!["Spartans", "Templários"]);
        assert!(unique_groups(&[]).is_empty());
    }
}
