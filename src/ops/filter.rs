use std::fmt;

use crate::model::{RecordStore, WorkStepRecord};

/// Which rows the work-step editor shows
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FilterSelection {
    #[default]
    All,
    Group(String),
}

impl FilterSelection {
    pub fn matches(&self, record: &WorkStepRecord) -> bool {
        match self {
            FilterSelection::All => true,
            FilterSelection::Group(g) => !record.is_blank() && &record.group == g,
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, FilterSelection::All)
    }

    /// Parse a CLI filter argument; absent means all rows
    pub fn from_arg(arg: Option<&str>) -> FilterSelection {
        match arg {
            Some(g) if !g.trim().is_empty() => FilterSelection::Group(g.to_string()),
            _ => FilterSelection::All,
        }
    }
}

impl fmt::Display for FilterSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterSelection::All => write!(f, "all"),
            FilterSelection::Group(g) => write!(f, "{}", g),
        }
    }
}

/// Rows of `store` matching `selection`, in store order
pub fn filter(store: &RecordStore, selection: &FilterSelection) -> Vec<WorkStepRecord> {
    store
        .records()
        .iter()
        .filter(|r| selection.matches(r))
        .cloned()
        .collect()
}

/// Distinct non-blank groups in first-appearance order
pub fn filter_options(store: &RecordStore) -> Vec<String> {
    let mut groups: Vec<String> = Vec::new();
    for record in store.records() {
        if !record.is_blank() && !groups.contains(&record.group) {
            groups.push(record.group.clone());
        }
    }
    groups
}

/// Step through `All` followed by each group, wrapping at either end
pub fn cycle_selection(
    store: &RecordStore,
    current: &FilterSelection,
    forward: bool,
) -> FilterSelection {
    let mut choices = vec![FilterSelection::All];
    choices.extend(filter_options(store).into_iter().map(FilterSelection::Group));
    let pos = choices.iter().position(|c| c == current).unwrap_or(0);
    let len = choices.len();
    let next = if forward {
        (pos + 1) % len
    } else {
        (pos + len - 1) % len
    };
    choices.swap_remove(next)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> RecordStore {
        RecordStore::from_records(vec![
            WorkStepRecord::new("A", "x", "p"),
            WorkStepRecord::new("B", "y", "q"),
            WorkStepRecord::new("A", "z", "r"),
            WorkStepRecord::new("", "draft", ""),
        ])
    }

    #[test]
    fn all_returns_whole_store() {
        let s = store();
        assert_eq!(filter(&s, &FilterSelection::All), s.records());
    }

    #[test]
    fn group_filter_is_total() {
        let s = store();
        for g in ["A", "B", "C", ""] {
            let sel = FilterSelection::Group(g.to_string());
            for row in filter(&s, &sel) {
                assert_eq!(row.group, g);
            }
        }
        let a = filter(&s, &FilterSelection::Group("A".into()));
        assert_eq!(a.len(), 2);
        assert_eq!(a[1].activity, "z");
    }

    #[test]
    fn blank_group_never_matches_a_selection() {
        let s = store();
        assert!(filter(&s, &FilterSelection::Group(String::new())).is_empty());
    }

    #[test]
    fn options_skip_blanks_and_keep_first_appearance_order() {
        assert_eq!(filter_options(&store()), vec!["A", "B"]);
    }

    #[test]
    fn cycle_wraps_both_ways() {
        let s = store();
        let a = FilterSelection::Group("A".into());
        let b = FilterSelection::Group("B".into());
        assert_eq!(cycle_selection(&s, &FilterSelection::All, true), a);
        assert_eq!(cycle_selection(&s, &a, true), b);
        assert_eq!(cycle_selection(&s, &b, true), FilterSelection::All);
        assert_eq!(cycle_selection(&s, &FilterSelection::All, false), b);
    }

    #[test]
    fn from_arg_treats_blank_as_all() {
        assert_eq!(FilterSelection::from_arg(None), FilterSelection::All);
        assert_eq!(FilterSelection::from_arg(Some("  ")), FilterSelection::All);
        assert_eq!(
            FilterSelection::from_arg(Some("T001")),
            FilterSelection::Group("T001".into())
        );
    }
}
