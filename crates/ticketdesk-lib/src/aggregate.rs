//! Derived statistics over a ticket collection.
//!
//! Every function here is pure and takes any iterator of ticket references,
//! so the same code serves the whole collection and a filtered listing.
//! Malformed timestamps never fail an aggregation; they are skipped.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::model::Ticket;
use crate::settings::LabelSettings;

/// Which timestamp a daily series is grouped by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TimestampField {
    /// Ticket creation time (one entry per ticket).
    #[default]
    CreatedAt,
    /// Legacy mirror of the latest response (tickets without one are skipped).
    SupportResponseAt,
    /// Question time of every exchange.
    QuestionAt,
    /// Response time of every answered exchange.
    ResponseAt,
}

impl std::str::FromStr for TimestampField {
    type Err = crate::error::TicketError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "created" | "created_at" => Ok(Self::CreatedAt),
            "support_response_at" | "support_response" => Ok(Self::SupportResponseAt),
            "question" | "question_at" => Ok(Self::QuestionAt),
            "response" | "response_at" => Ok(Self::ResponseAt),
            other => Err(crate::error::TicketError::validation(
                "field",
                format!("unknown timestamp field '{other}'"),
            )),
        }
    }
}

/// Count tickets per key.
#[must_use]
pub fn count_by<'a, I, K, F>(tickets: I, mut key_fn: F) -> BTreeMap<K, usize>
where
    I: IntoIterator<Item = &'a Ticket>,
    K: Ord,
    F: FnMut(&Ticket) -> K,
{
    let mut counts = BTreeMap::new();
    for ticket in tickets {
        *counts.entry(key_fn(ticket)).or_insert(0) += 1;
    }
    counts
}

/// Percentage of answered exchanges per configured category.
///
/// Categories with no tickets in the input are omitted rather than
/// reported as zero. Tickets in categories outside `categories` are ignored.
#[must_use]
pub fn response_rate_by_category<'a, I>(tickets: I, categories: &[String]) -> BTreeMap<String, f64>
where
    I: IntoIterator<Item = &'a Ticket>,
{
    // (tickets, total exchanges, answered exchanges)
    let mut tallies: BTreeMap<&str, (usize, usize, usize)> = BTreeMap::new();
    for ticket in tickets {
        let Some(category) = categories.iter().find(|c| **c == ticket.category) else {
            continue;
        };
        let tally = tallies.entry(category.as_str()).or_insert((0, 0, 0));
        tally.0 += 1;
        tally.1 += ticket.exchanges.len();
        tally.2 += ticket.answered_count();
    }

    tallies
        .into_iter()
        .filter(|(_, (count, total, _))| *count > 0 && *total > 0)
        .map(|(category, (_, total, answered))| {
            (category.to_string(), percentage(answered, total))
        })
        .collect()
}

/// Percentage of answered exchanges across the input; 0 if there are none.
#[must_use]
pub fn overall_response_rate<'a, I>(tickets: I) -> f64
where
    I: IntoIterator<Item = &'a Ticket>,
{
    let (total, answered) = tickets.into_iter().fold((0, 0), |(total, answered), t| {
        (total + t.exchanges.len(), answered + t.answered_count())
    });
    if total == 0 {
        0.0
    } else {
        percentage(answered, total)
    }
}

/// Mean question-to-response time in hours over all answered exchanges.
///
/// Returns 0 when nothing is answered. Exchanges with a malformed
/// timestamp, or a response earlier than its question, are left out.
#[must_use]
pub fn average_response_hours<'a, I>(tickets: I) -> f64
where
    I: IntoIterator<Item = &'a Ticket>,
{
    mean(
        tickets
            .into_iter()
            .flat_map(|t| t.exchanges.iter())
            .filter_map(crate::model::Exchange::response_hours),
    )
    .unwrap_or(0.0)
}

/// Mean response time per group.
///
/// Groups whose tickets have no measurable response are omitted.
#[must_use]
pub fn average_response_hours_by<'a, I, F>(tickets: I, mut key_fn: F) -> BTreeMap<String, f64>
where
    I: IntoIterator<Item = &'a Ticket>,
    F: FnMut(&Ticket) -> String,
{
    let mut samples: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for ticket in tickets {
        let hours: Vec<f64> = ticket
            .exchanges
            .iter()
            .filter_map(crate::model::Exchange::response_hours)
            .collect();
        if !hours.is_empty() {
            samples.entry(key_fn(ticket)).or_default().extend(hours);
        }
    }
    samples
        .into_iter()
        .filter_map(|(key, hours)| mean(hours).map(|avg| (key, avg)))
        .collect()
}

/// Mean hours from ticket creation to its first answered exchange; 0 if
/// no ticket has one.
#[must_use]
pub fn average_first_response_hours<'a, I>(tickets: I) -> f64
where
    I: IntoIterator<Item = &'a Ticket>,
{
    mean(tickets.into_iter().filter_map(Ticket::first_response_hours)).unwrap_or(0.0)
}

/// Mean hours from creation to the latest response over resolved tickets
/// (status equal to the last configured status); 0 if none qualifies.
#[must_use]
pub fn average_resolution_hours<'a, I>(tickets: I, settings: &LabelSettings) -> f64
where
    I: IntoIterator<Item = &'a Ticket>,
{
    let resolved = settings.final_status();
    mean(
        tickets
            .into_iter()
            .filter(|t| !resolved.is_empty() && t.status == resolved)
            .filter_map(Ticket::resolution_hours),
    )
    .unwrap_or(0.0)
}

/// Count per day, keyed by the first 10 characters of the chosen timestamp.
#[must_use]
pub fn daily_counts<'a, I>(tickets: I, field: TimestampField) -> BTreeMap<String, usize>
where
    I: IntoIterator<Item = &'a Ticket>,
{
    let mut counts = BTreeMap::new();
    let mut bump = |key: String| *counts.entry(key).or_insert(0) += 1;

    for ticket in tickets {
        match field {
            TimestampField::CreatedAt => bump(ticket.created_at.day_key()),
            TimestampField::SupportResponseAt => {
                if let Some(ref at) = ticket.support_response_at {
                    bump(at.day_key());
                }
            }
            TimestampField::QuestionAt => {
                for exchange in &ticket.exchanges {
                    bump(exchange.question_at.day_key());
                }
            }
            TimestampField::ResponseAt => {
                for at in ticket.exchanges.iter().filter_map(|e| e.response_at.as_ref()) {
                    bump(at.day_key());
                }
            }
        }
    }
    counts
}

/// Ticket counts per creation month (`YYYY-MM`) and status.
#[must_use]
pub fn monthly_status_counts<'a, I>(tickets: I) -> BTreeMap<String, BTreeMap<String, usize>>
where
    I: IntoIterator<Item = &'a Ticket>,
{
    let mut months: BTreeMap<String, BTreeMap<String, usize>> = BTreeMap::new();
    for ticket in tickets {
        *months
            .entry(ticket.created_at.month_key())
            .or_default()
            .entry(ticket.status.clone())
            .or_insert(0) += 1;
    }
    months
}

/// Tickets still in the initial configured status.
#[must_use]
pub fn open_ticket_count<'a, I>(tickets: I, settings: &LabelSettings) -> usize
where
    I: IntoIterator<Item = &'a Ticket>,
{
    let open = settings.initial_status();
    tickets.into_iter().filter(|t| t.status == open).count()
}

/// Everything the statistics view shows, computed in one go.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub total_tickets: usize,
    pub open_tickets: usize,
    pub total_exchanges: usize,
    pub answered_exchanges: usize,
    pub response_rate: f64,
    pub average_response_hours: f64,
    pub average_first_response_hours: f64,
    pub average_resolution_hours: f64,
    pub by_status: BTreeMap<String, usize>,
    pub by_priority: BTreeMap<String, usize>,
    pub by_category: BTreeMap<String, usize>,
    pub response_rate_by_category: BTreeMap<String, f64>,
    pub average_response_hours_by_priority: BTreeMap<String, f64>,
    pub created_per_day: BTreeMap<String, usize>,
    pub status_per_month: BTreeMap<String, BTreeMap<String, usize>>,
}

impl Summary {
    #[must_use]
    pub fn compute<'a, I>(tickets: I, settings: &LabelSettings) -> Self
    where
        I: IntoIterator<Item = &'a Ticket>,
    {
        let tickets: Vec<&Ticket> = tickets.into_iter().collect();
        let all = || tickets.iter().copied();

        Self {
            total_tickets: tickets.len(),
            open_tickets: open_ticket_count(all(), settings),
            total_exchanges: all().map(|t| t.exchanges.len()).sum(),
            answered_exchanges: all().map(Ticket::answered_count).sum(),
            response_rate: overall_response_rate(all()),
            average_response_hours: average_response_hours(all()),
            average_first_response_hours: average_first_response_hours(all()),
            average_resolution_hours: average_resolution_hours(all(), settings),
            by_status: count_by(all(), |t| t.status.clone()),
            by_priority: priority_distribution(all()),
            by_category: count_by(all(), |t| t.category.clone()),
            response_rate_by_category: response_rate_by_category(all(), &settings.categories),
            average_response_hours_by_priority: average_response_hours_by(all(), |t| {
                t.priority.clone()
            }),
            created_per_day: daily_counts(all(), TimestampField::CreatedAt),
            status_per_month: monthly_status_counts(all()),
        }
    }
}

/// Ticket counts per priority label.
#[must_use]
pub fn priority_distribution<'a, I>(tickets: I) -> BTreeMap<String, usize>
where
    I: IntoIterator<Item = &'a Ticket>,
{
    count_by(tickets, |t| t.priority.clone())
}

fn percentage(part: usize, whole: usize) -> f64 {
    part as f64 * 100.0 / whole as f64
}

fn mean(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0_usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}
