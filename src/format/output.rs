use serde::Serialize;
use ticketdesk_lib::{Exchange, Ticket};

/// Ticket with exchange counts for list views.
#[derive(Debug, Clone, Serialize)]
pub struct TicketWithCounts<'a> {
    #[serde(flatten)]
    pub ticket: &'a Ticket,
    pub exchange_count: usize,
    pub answered_count: usize,
    pub awaiting_response: bool,
}

impl<'a> From<&'a Ticket> for TicketWithCounts<'a> {
    fn from(ticket: &'a Ticket) -> Self {
        Self {
            ticket,
            exchange_count: ticket.exchanges.len(),
            answered_count: ticket.answered_count(),
            awaiting_response: ticket.has_unanswered(),
        }
    }
}

/// Exchange with its measured response time for the show view.
#[derive(Debug, Clone, Serialize)]
pub struct ExchangeView<'a> {
    #[serde(flatten)]
    pub exchange: &'a Exchange,
    pub response_hours: Option<f64>,
}

/// Ticket details for the show view.
#[derive(Debug, Clone, Serialize)]
pub struct TicketDetails<'a> {
    #[serde(flatten)]
    pub counts: TicketWithCounts<'a>,
    pub first_response_hours: Option<f64>,
    #[serde(rename = "exchange_details")]
    pub exchanges: Vec<ExchangeView<'a>>,
}

impl<'a> From<&'a Ticket> for TicketDetails<'a> {
    fn from(ticket: &'a Ticket) -> Self {
        Self {
            counts: TicketWithCounts::from(ticket),
            first_response_hours: ticket.first_response_hours(),
            exchanges: ticket
                .exchanges
                .iter()
                .map(|exchange| ExchangeView {
                    exchange,
                    response_hours: exchange.response_hours(),
                })
                .collect(),
        }
    }
}

/// Result of a mutation command in JSON mode.
///
/// `found` is false when the id did not match any ticket; nothing changed.
#[derive(Debug, Clone, Serialize)]
pub struct MutationResult<'a> {
    pub action: &'static str,
    pub id: u64,
    pub found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticket: Option<&'a Ticket>,
}

impl<'a> MutationResult<'a> {
    #[must_use]
    pub const fn applied(action: &'static str, ticket: &'a Ticket) -> Self {
        Self {
            action,
            id: ticket.id,
            found: true,
            ticket: Some(ticket),
        }
    }

    #[must_use]
    pub const fn missing(action: &'static str, id: u64) -> Self {
        Self {
            action,
            id,
            found: false,
            ticket: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ticketdesk_lib::Timestamp;

    fn ticket() -> Ticket {
        let asked = Timestamp::from_raw("2026-03-01 08:00:00");
        let mut answered = Exchange::question("first", asked.clone());
        answered.response_at = Some(Timestamp::from_raw("2026-03-01 10:30:00"));
        answered.response_text = "done".into();
        Ticket {
            id: 3,
            title: "VPN drops".into(),
            description: "first".into(),
            category: "Bug".into(),
            priority: "High".into(),
            status: "Open".into(),
            created_at: asked.clone(),
            tags: vec![],
            comments: vec![],
            exchanges: vec![answered, Exchange::question("again?", asked)],
            support_response_at: Some(Timestamp::from_raw("2026-03-01 10:30:00")),
        }
    }

    #[test]
    fn counts_are_flattened_next_to_ticket_fields() {
        let ticket = ticket();
        let value = serde_json::to_value(TicketWithCounts::from(&ticket)).unwrap();
        assert_eq!(value["id"], 3);
        assert_eq!(value["exchange_count"], 2);
        assert_eq!(value["answered_count"], 1);
        assert_eq!(value["awaiting_response"], true);
    }

    #[test]
    fn details_carry_response_hours() {
        let ticket = ticket();
        let value = serde_json::to_value(TicketDetails::from(&ticket)).unwrap();
        assert_eq!(value["first_response_hours"], 2.5);
        assert_eq!(value["exchange_details"][0]["response_hours"], 2.5);
        assert!(value["exchange_details"][1]["response_hours"].is_null());
    }

    #[test]
    fn missing_mutation_omits_ticket() {
        let value = serde_json::to_value(MutationResult::missing("delete", 9)).unwrap();
        assert_eq!(value["found"], false);
        assert!(value.get("ticket").is_none());
    }
}
