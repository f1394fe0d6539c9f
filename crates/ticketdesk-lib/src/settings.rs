//! Configurable label sets for category, priority and status.
//!
//! These lists define the options offered when entering data. They are
//! never used to validate tickets already in the store, so a ticket may
//! carry a label that has since been removed from its set.

use serde::{Deserialize, Serialize};

/// Category/priority/status option sets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelSettings {
    pub categories: Vec<String>,
    /// Ordered from most to least urgent.
    pub priorities: Vec<String>,
    /// The first entry is the initial ("open") status.
    pub statuses: Vec<String>,
}

impl Default for LabelSettings {
    fn default() -> Self {
        Self {
            categories: to_owned(&["Bug", "Feature Request", "Question", "Other"]),
            priorities: to_owned(&["High", "Medium", "Low"]),
            statuses: to_owned(&["Open", "In Progress", "Resolved"]),
        }
    }
}

fn to_owned(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| (*v).to_string()).collect()
}

/// Which label set a key refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelKind {
    Category,
    Priority,
    Status,
}

impl LabelKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Category => "category",
            Self::Priority => "priority",
            Self::Status => "status",
        }
    }
}

impl LabelSettings {
    #[must_use]
    pub fn labels(&self, kind: LabelKind) -> &[String] {
        match kind {
            LabelKind::Category => &self.categories,
            LabelKind::Priority => &self.priorities,
            LabelKind::Status => &self.statuses,
        }
    }

    /// Replace one label set from free text (see [`parse_label_list`]).
    ///
    /// An input that yields no labels leaves the set unchanged and returns
    /// false.
    pub fn set_from_text(&mut self, kind: LabelKind, text: &str) -> bool {
        let parsed = parse_label_list(text);
        if parsed.is_empty() {
            return false;
        }
        match kind {
            LabelKind::Category => self.categories = parsed,
            LabelKind::Priority => self.priorities = parsed,
            LabelKind::Status => self.statuses = parsed,
        }
        true
    }

    /// Exact (case-sensitive) membership test against the active set.
    #[must_use]
    pub fn offers(&self, kind: LabelKind, label: &str) -> bool {
        self.labels(kind).iter().any(|l| l == label)
    }

    /// Resolve operator input to the configured spelling, ignoring case.
    #[must_use]
    pub fn resolve(&self, kind: LabelKind, input: &str) -> Option<&str> {
        let wanted = input.trim().to_lowercase();
        self.labels(kind)
            .iter()
            .find(|label| label.to_lowercase() == wanted)
            .map(String::as_str)
    }

    /// Position of a priority in the ordered set; unknown labels sort last.
    #[must_use]
    pub fn priority_rank(&self, priority: &str) -> usize {
        self.priorities
            .iter()
            .position(|p| p == priority)
            .unwrap_or(self.priorities.len())
    }

    /// Position of a status in the configured set; unknown labels sort last.
    #[must_use]
    pub fn status_rank(&self, status: &str) -> usize {
        self.statuses
            .iter()
            .position(|s| s == status)
            .unwrap_or(self.statuses.len())
    }

    #[must_use]
    pub fn default_category(&self) -> &str {
        self.categories.first().map_or("", String::as_str)
    }

    /// Middle of the ordered priority list.
    #[must_use]
    pub fn default_priority(&self) -> &str {
        self.priorities
            .get(self.priorities.len() / 2)
            .map_or("", String::as_str)
    }

    #[must_use]
    pub fn initial_status(&self) -> &str {
        self.statuses.first().map_or("", String::as_str)
    }

    /// The last configured status, which marks a ticket as resolved.
    #[must_use]
    pub fn final_status(&self) -> &str {
        self.statuses.last().map_or("", String::as_str)
    }
}

/// Split free text into labels.
///
/// Commas and newlines separate entries; entries are trimmed, empties are
/// dropped and duplicates keep their first position.
#[must_use]
pub fn parse_label_list(text: &str) -> Vec<String> {
    let mut labels: Vec<String> = Vec::new();
    for part in text.split([',', '\n']) {
        let label = part.trim();
        if !label.is_empty() && !labels.iter().any(|l| l == label) {
            labels.push(label.to_string());
        }
    }
    labels
}
