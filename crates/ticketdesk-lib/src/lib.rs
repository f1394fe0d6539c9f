//! `ticketdesk-lib` - In-process support ticket library.
//!
//! Holds the ticket collection in memory, persists it as one pretty-printed
//! JSON file, and derives the counts, rates and time series shown by the
//! statistics view.
//!
//! # Quick Start
//!
//! ```no_run
//! use ticketdesk_lib::{NewTicket, Timestamp, TicketStore};
//! use ticketdesk_lib::aggregate::average_response_hours;
//!
//! // Load existing file (a missing or corrupt file yields an empty store)
//! let mut store = TicketStore::open(".ticketdesk/tickets.json");
//!
//! // Create
//! let ticket = store
//!     .create_ticket(NewTicket {
//!         title: "VPN drops".into(),
//!         description: "Disconnects every 10 minutes".into(),
//!         ..Default::default()
//!     })
//!     .unwrap();
//!
//! // Answer the latest open question
//! store
//!     .record_response(ticket.id, "Updated the client", Timestamp::now())
//!     .unwrap();
//!
//! // Aggregate
//! let hours = average_response_hours(store.tickets());
//!
//! // Save back
//! store.save().unwrap();
//! ```

pub mod aggregate;
pub mod error;
pub mod export;
pub mod json_file;
pub mod model;
pub mod query;
pub mod settings;
pub mod store;

pub use aggregate::{Summary, TimestampField};
pub use error::{Result, TicketError};
pub use export::ExportFormat;
pub use model::{Comment, Exchange, NewTicket, Ticket, Timestamp};
pub use query::{SortKey, TicketFilters, TicketUpdate};
pub use settings::{LabelKind, LabelSettings};
pub use store::TicketStore;
