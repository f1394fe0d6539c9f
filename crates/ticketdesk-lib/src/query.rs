//! Query, filter and update types for ticket operations.

use chrono::NaiveDate;

use crate::model::Ticket;
use crate::settings::LabelSettings;

/// Fields to update on a ticket.
///
/// `None` leaves a field untouched. Identity, creation time, exchanges and
/// comments are not editable through an update.
#[derive(Debug, Clone, Default)]
pub struct TicketUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub priority: Option<String>,
    pub status: Option<String>,
    pub add_tags: Vec<String>,
    pub remove_tags: Vec<String>,
}

impl TicketUpdate {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.priority.is_none()
            && self.status.is_none()
            && self.add_tags.is_empty()
            && self.remove_tags.is_empty()
    }
}

/// Filter options for listing tickets.
///
/// Every populated field becomes one independent predicate pass; the result
/// is the intersection of all passes, whatever order they run in.
#[derive(Debug, Clone, Default)]
pub struct TicketFilters {
    /// Keep tickets whose status is one of these.
    pub statuses: Option<Vec<String>>,
    pub priorities: Option<Vec<String>>,
    pub categories: Option<Vec<String>>,
    /// Keep tickets created on or after this day.
    pub created_from: Option<NaiveDate>,
    /// Keep tickets created on or before this day.
    pub created_to: Option<NaiveDate>,
    /// Case-insensitive substring over title and description.
    pub search: Option<String>,
    /// Keep tickets carrying this tag (case-insensitive).
    pub tag: Option<String>,
}

/// One predicate pass over a ticket list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterPass {
    Status(Vec<String>),
    Priority(Vec<String>),
    Category(Vec<String>),
    CreatedFrom(NaiveDate),
    CreatedTo(NaiveDate),
    /// Lower-cased needle.
    Search(String),
    Tag(String),
}

impl FilterPass {
    /// Whether a ticket survives this pass.
    ///
    /// Date bounds drop tickets whose `created_at` does not parse.
    #[must_use]
    pub fn matches(&self, ticket: &Ticket) -> bool {
        match self {
            Self::Status(values) => values.contains(&ticket.status),
            Self::Priority(values) => values.contains(&ticket.priority),
            Self::Category(values) => values.contains(&ticket.category),
            Self::CreatedFrom(from) => ticket.created_at.date().is_some_and(|d| d >= *from),
            Self::CreatedTo(to) => ticket.created_at.date().is_some_and(|d| d <= *to),
            Self::Search(needle) => ticket.matches_text(needle),
            Self::Tag(tag) => ticket.has_tag(tag),
        }
    }
}

impl TicketFilters {
    /// The predicate passes this filter set describes, in canonical order.
    #[must_use]
    pub fn passes(&self) -> Vec<FilterPass> {
        let mut passes = Vec::new();
        if let Some(ref statuses) = self.statuses {
            passes.push(FilterPass::Status(statuses.clone()));
        }
        if let Some(ref priorities) = self.priorities {
            passes.push(FilterPass::Priority(priorities.clone()));
        }
        if let Some(ref categories) = self.categories {
            passes.push(FilterPass::Category(categories.clone()));
        }
        if let Some(from) = self.created_from {
            passes.push(FilterPass::CreatedFrom(from));
        }
        if let Some(to) = self.created_to {
            passes.push(FilterPass::CreatedTo(to));
        }
        if let Some(ref search) = self.search {
            let needle = search.trim().to_lowercase();
            if !needle.is_empty() {
                passes.push(FilterPass::Search(needle));
            }
        }
        if let Some(ref tag) = self.tag {
            passes.push(FilterPass::Tag(tag.trim().to_string()));
        }
        passes
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.passes().is_empty()
    }
}

/// Narrow `tickets` by each pass in turn.
#[must_use]
pub fn apply_passes<'a>(tickets: &'a [Ticket], passes: &[FilterPass]) -> Vec<&'a Ticket> {
    let mut remaining: Vec<&Ticket> = tickets.iter().collect();
    for pass in passes {
        remaining.retain(|ticket| pass.matches(ticket));
    }
    remaining
}

/// Apply a filter set to a ticket list, preserving list order.
#[must_use]
pub fn filter_tickets<'a>(tickets: &'a [Ticket], filters: &TicketFilters) -> Vec<&'a Ticket> {
    apply_passes(tickets, &filters.passes())
}

/// Sort key for ticket listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    /// Newest first.
    #[default]
    Newest,
    Id,
    Created,
    /// Configured priority order, then newest first.
    Priority,
    /// Configured status order, then id.
    Status,
}

impl std::str::FromStr for SortKey {
    type Err = crate::error::TicketError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "newest" | "default" => Ok(Self::Newest),
            "id" => Ok(Self::Id),
            "created" | "created_at" => Ok(Self::Created),
            "priority" => Ok(Self::Priority),
            "status" => Ok(Self::Status),
            other => Err(crate::error::TicketError::validation(
                "sort",
                format!("unknown sort key '{other}' (newest, id, created, priority, status)"),
            )),
        }
    }
}

/// Sort a filtered listing in place.
///
/// Created-time ordering compares the raw timestamp text, which orders
/// canonical timestamps chronologically.
pub fn sort_tickets(tickets: &mut [&Ticket], key: SortKey, settings: &LabelSettings, reverse: bool) {
    match key {
        SortKey::Newest => {
            tickets.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        }
        SortKey::Id => tickets.sort_by_key(|t| t.id),
        SortKey::Created => {
            tickets.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        }
        SortKey::Priority => tickets.sort_by(|a, b| {
            settings
                .priority_rank(&a.priority)
                .cmp(&settings.priority_rank(&b.priority))
                .then(b.created_at.cmp(&a.created_at))
        }),
        SortKey::Status => tickets.sort_by(|a, b| {
            settings
                .status_rank(&a.status)
                .cmp(&settings.status_rank(&b.status))
                .then(a.id.cmp(&b.id))
        }),
    }

    if reverse {
        tickets.reverse();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Exchange, Timestamp};
    use proptest::prelude::*;

    fn ticket(id: u64, status: &str, priority: &str, category: &str, created: &str, title: &str) -> Ticket {
        let at = Timestamp::from_raw(created);
        Ticket {
            id,
            title: title.to_string(),
            description: format!("Details for {title}"),
            category: category.to_string(),
            priority: priority.to_string(),
            status: status.to_string(),
            created_at: at.clone(),
            tags: Vec::new(),
            comments: Vec::new(),
            exchanges: vec![Exchange::question("q", at)],
            support_response_at: None,
        }
    }

    fn fixture() -> Vec<Ticket> {
        vec![
            ticket(1, "Open", "High", "Bug", "2024-01-05 10:00:00", "VPN drops"),
            ticket(2, "Resolved", "Low", "Question", "2024-01-10 09:00:00", "Invoice copy"),
            ticket(3, "Open", "Medium", "Bug", "2024-02-01 12:00:00", "Printer offline"),
            ticket(4, "In Progress", "High", "Feature Request", "2024-02-15 08:30:00", "Dark mode"),
            ticket(5, "Open", "Low", "Bug", "garbage", "vpn client crash"),
        ]
    }

    fn ids(tickets: &[&Ticket]) -> Vec<u64> {
        tickets.iter().map(|t| t.id).collect()
    }

    #[test]
    fn test_status_and_category_intersect() {
        let tickets = fixture();
        let filters = TicketFilters {
            statuses: Some(vec!["Open".into()]),
            categories: Some(vec!["Bug".into()]),
            ..Default::default()
        };
        assert_eq!(ids(&filter_tickets(&tickets, &filters)), vec![1, 3, 5]);
    }

    #[test]
    fn test_search_is_case_insensitive_over_title_and_description() {
        let tickets = fixture();
        let filters = TicketFilters {
            search: Some("VPN".into()),
            ..Default::default()
        };
        assert_eq!(ids(&filter_tickets(&tickets, &filters)), vec![1, 5]);

        let by_description = TicketFilters {
            search: Some("details for dark".into()),
            ..Default::default()
        };
        assert_eq!(ids(&filter_tickets(&tickets, &by_description)), vec![4]);
    }

    #[test]
    fn test_date_range_is_inclusive_and_drops_malformed() {
        let tickets = fixture();
        let filters = TicketFilters {
            created_from: NaiveDate::from_ymd_opt(2024, 1, 10),
            created_to: NaiveDate::from_ymd_opt(2024, 2, 1),
            ..Default::default()
        };
        assert_eq!(ids(&filter_tickets(&tickets, &filters)), vec![2, 3]);
    }

    #[test]
    fn test_blank_search_is_ignored() {
        let filters = TicketFilters {
            search: Some("   ".into()),
            ..Default::default()
        };
        assert!(filters.is_empty());
    }

    #[test]
    fn test_sort_priority_uses_configured_order() {
        let tickets = fixture();
        let settings = LabelSettings::default();
        let mut listed: Vec<&Ticket> = tickets.iter().collect();
        sort_tickets(&mut listed, SortKey::Priority, &settings, false);
        assert_eq!(ids(&listed), vec![4, 1, 3, 5, 2]);
    }

    #[test]
    fn test_sort_newest_first_by_default() {
        let tickets = fixture();
        let settings = LabelSettings::default();
        let mut listed: Vec<&Ticket> = tickets.iter().take(4).collect();
        sort_tickets(&mut listed, SortKey::default(), &settings, false);
        assert_eq!(ids(&listed), vec![4, 3, 2, 1]);
    }

    #[test]
    fn test_sort_key_parse() {
        assert_eq!("Priority".parse::<SortKey>().unwrap(), SortKey::Priority);
        assert!("colour".parse::<SortKey>().is_err());
    }

    fn arb_pass() -> impl Strategy<Value = FilterPass> {
        prop_oneof![
            Just(FilterPass::Status(vec!["Open".into()])),
            Just(FilterPass::Status(vec!["Open".into(), "In Progress".into()])),
            Just(FilterPass::Priority(vec!["High".into(), "Low".into()])),
            Just(FilterPass::Category(vec!["Bug".into()])),
            Just(FilterPass::CreatedFrom(NaiveDate::from_ymd_opt(2024, 1, 6).unwrap())),
            Just(FilterPass::CreatedTo(NaiveDate::from_ymd_opt(2024, 2, 1).unwrap())),
            Just(FilterPass::Search("vpn".into())),
            Just(FilterPass::Search("o".into())),
        ]
    }

    proptest! {
        #[test]
        fn prop_pass_order_does_not_change_result(
            passes in proptest::collection::vec(arb_pass(), 0..6),
            rotation in 0_usize..6,
        ) {
            let tickets = fixture();
            let forward = ids(&apply_passes(&tickets, &passes));

            let mut reversed = passes.clone();
            reversed.reverse();
            prop_assert_eq!(&forward, &ids(&apply_passes(&tickets, &reversed)));

            let mut rotated = passes.clone();
            if !rotated.is_empty() {
                let by = rotation % rotated.len();
                rotated.rotate_left(by);
            }
            prop_assert_eq!(&forward, &ids(&apply_passes(&tickets, &rotated)));
        }
    }
}
