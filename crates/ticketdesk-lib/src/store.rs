//! In-memory ticket store backed by a single JSON file.
//!
//! The store owns the session's copy of the collection. Mutations change
//! the in-memory list only; `save()` is the single commit point that writes
//! the whole collection back.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{Result, TicketError, ValidationError};
use crate::json_file;
use crate::model::{Comment, Exchange, NewTicket, Ticket, Timestamp};
use crate::query::{TicketFilters, TicketUpdate, filter_tickets};

/// Ticket collection plus the file it was loaded from.
#[derive(Debug, Clone, Default)]
pub struct TicketStore {
    tickets: Vec<Ticket>,
    path: Option<PathBuf>,
    /// Highest id ever seen by this store, including deleted ones.
    high_water: u64,
    dirty: bool,
}

impl TicketStore {
    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Create a new empty store with no backing file.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the store from a JSON file.
    ///
    /// Never fails: a missing or unreadable file yields an empty store that
    /// will still save back to `path`.
    #[must_use]
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let mut store = Self::with_tickets(json_file::load(path));
        store.path = Some(path.to_path_buf());
        store
    }

    /// Build a store around an existing collection.
    #[must_use]
    pub fn with_tickets(tickets: Vec<Ticket>) -> Self {
        let high_water = tickets.iter().map(|t| t.id).max().unwrap_or(0);
        Self {
            tickets,
            path: None,
            high_water,
            dirty: false,
        }
    }

    /// Path this store saves to, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Save to the file the store was opened from.
    ///
    /// # Errors
    ///
    /// Returns `Storage` if no file path is set, or `Io`/`Json` on write
    /// failure.
    pub fn save(&mut self) -> Result<()> {
        let path = self
            .path
            .clone()
            .ok_or_else(|| TicketError::Storage("No file path set; use save_to()".to_string()))?;
        self.save_to(path)
    }

    /// Save to a specific file and make it the store's backing file.
    ///
    /// # Errors
    ///
    /// Returns `Io` or `Json` on write failure.
    pub fn save_to(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        json_file::save(path, &self.tickets)?;
        self.path = Some(path.to_path_buf());
        self.dirty = false;
        Ok(())
    }

    // ========================================================================
    // Queries
    // ========================================================================

    #[must_use]
    pub fn tickets(&self) -> &[Ticket] {
        &self.tickets
    }

    #[must_use]
    pub fn into_tickets(self) -> Vec<Ticket> {
        self.tickets
    }

    #[must_use]
    pub fn get(&self, id: u64) -> Option<&Ticket> {
        self.tickets.iter().find(|t| t.id == id)
    }

    #[must_use]
    pub fn contains(&self, id: u64) -> bool {
        self.get(id).is_some()
    }

    /// Tickets matching every populated filter, in collection order.
    #[must_use]
    pub fn list(&self, filters: &TicketFilters) -> Vec<&Ticket> {
        filter_tickets(&self.tickets, filters)
    }

    /// The id the next created ticket will receive.
    #[must_use]
    pub fn next_id(&self) -> u64 {
        let max_present = self.tickets.iter().map(|t| t.id).max().unwrap_or(0);
        max_present.max(self.high_water) + 1
    }

    // ========================================================================
    // CRUD
    // ========================================================================

    /// Create a ticket with one seed exchange.
    ///
    /// The seed exchange mirrors the creation time and description and is
    /// unanswered.
    ///
    /// # Errors
    ///
    /// Returns a validation error, and adds nothing, if the title or the
    /// description is blank.
    pub fn create_ticket(&mut self, fields: NewTicket) -> Result<Ticket> {
        let mut errors = Vec::new();
        if fields.title.trim().is_empty() {
            errors.push(ValidationError::new("title", "cannot be empty"));
        }
        if fields.description.trim().is_empty() {
            errors.push(ValidationError::new("description", "cannot be empty"));
        }
        if !errors.is_empty() {
            return Err(TicketError::from_validation_errors(errors));
        }

        let id = self.next_id();
        let created_at = fields.created_at.unwrap_or_else(Timestamp::now);
        let mut tags: Vec<String> = Vec::with_capacity(fields.tags.len());
        for tag in fields.tags {
            if !tags.contains(&tag) {
                tags.push(tag);
            }
        }

        let ticket = Ticket {
            id,
            exchanges: vec![Exchange::question(
                fields.description.clone(),
                created_at.clone(),
            )],
            title: fields.title,
            description: fields.description,
            category: fields.category,
            priority: fields.priority,
            status: fields.status,
            created_at,
            tags,
            comments: Vec::new(),
            support_response_at: None,
        };

        self.tickets.push(ticket.clone());
        self.high_water = self.high_water.max(id);
        self.dirty = true;
        info!(id, title = %ticket.title, "created ticket");

        Ok(ticket)
    }

    /// Remove a ticket. Returns the removed ticket, or `None` if no ticket
    /// has that id (the collection is left unchanged).
    pub fn delete_ticket(&mut self, id: u64) -> Option<Ticket> {
        let pos = self.tickets.iter().position(|t| t.id == id)?;
        let removed = self.tickets.remove(pos);
        self.dirty = true;
        info!(id, "deleted ticket");
        Some(removed)
    }

    /// Edit a ticket's descriptive fields and tags.
    ///
    /// Returns `Ok(false)` if no ticket has that id.
    ///
    /// # Errors
    ///
    /// Returns `Validation` if the update would blank the title.
    pub fn update_ticket(&mut self, id: u64, update: &TicketUpdate) -> Result<bool> {
        if let Some(ref title) = update.title {
            if title.trim().is_empty() {
                return Err(TicketError::validation("title", "cannot be empty"));
            }
        }

        let Some(ticket) = self.get_mut(id) else {
            return Ok(false);
        };

        if let Some(ref title) = update.title {
            ticket.title.clone_from(title);
        }
        if let Some(ref description) = update.description {
            ticket.description.clone_from(description);
        }
        if let Some(ref category) = update.category {
            ticket.category.clone_from(category);
        }
        if let Some(ref priority) = update.priority {
            ticket.priority.clone_from(priority);
        }
        if let Some(ref status) = update.status {
            ticket.status.clone_from(status);
        }
        for tag in &update.add_tags {
            if !ticket.tags.contains(tag) {
                ticket.tags.push(tag.clone());
            }
        }
        ticket.tags.retain(|t| !update.remove_tags.contains(t));

        self.dirty = true;
        info!(id, "updated ticket");
        Ok(true)
    }

    // ========================================================================
    // Exchanges
    // ========================================================================

    /// Append an unanswered exchange. Returns false on a lookup miss.
    pub fn add_exchange(&mut self, id: u64, question_text: &str, at: Timestamp) -> bool {
        let Some(ticket) = self.get_mut(id) else {
            return false;
        };
        ticket.exchanges.push(Exchange::question(question_text, at));
        let count = ticket.exchanges.len();
        self.dirty = true;
        info!(id, exchanges = count, "added exchange");
        true
    }

    /// Answer the most recently appended unanswered exchange.
    ///
    /// Also mirrors `at` onto `support_response_at`. Returns false, leaving
    /// the collection unchanged, if the ticket is missing or every exchange
    /// is already answered.
    ///
    /// # Errors
    ///
    /// Returns `Validation` (and changes nothing) if `at` is earlier than
    /// the question it would answer. Unparseable timestamps are not compared.
    pub fn record_response(&mut self, id: u64, response_text: &str, at: Timestamp) -> Result<bool> {
        let Some(ticket) = self.get_mut(id) else {
            return Ok(false);
        };
        let Some(index) = ticket.last_unanswered_index() else {
            debug!(id, "no unanswered exchange");
            return Ok(false);
        };

        let exchange = &mut ticket.exchanges[index];
        if exchange.question_at.hours_until(&at).is_some_and(|hours| hours < 0.0) {
            return Err(TicketError::validation(
                "response_at",
                format!(
                    "{} is earlier than the question asked at {}",
                    at, exchange.question_at
                ),
            ));
        }
        exchange.response_at = Some(at.clone());
        exchange.response_text = response_text.to_string();
        ticket.support_response_at = Some(at);

        self.dirty = true;
        info!(id, exchange = index, "recorded response");
        Ok(true)
    }

    // ========================================================================
    // Comments & Tags
    // ========================================================================

    /// Append a comment. Returns false on a lookup miss.
    pub fn add_comment(&mut self, id: u64, text: &str, at: Timestamp) -> bool {
        let Some(ticket) = self.get_mut(id) else {
            return false;
        };
        ticket.comments.push(Comment {
            at,
            text: text.to_string(),
        });
        self.dirty = true;
        info!(id, "added comment");
        true
    }

    /// Add a tag unless already present. Returns true if the ticket changed.
    pub fn add_tag(&mut self, id: u64, tag: &str) -> bool {
        let Some(ticket) = self.get_mut(id) else {
            return false;
        };
        if ticket.tags.iter().any(|t| t == tag) {
            return false;
        }
        ticket.tags.push(tag.to_string());
        self.dirty = true;
        true
    }

    /// Remove a tag. Returns true if the ticket changed.
    pub fn remove_tag(&mut self, id: u64, tag: &str) -> bool {
        let Some(ticket) = self.get_mut(id) else {
            return false;
        };
        let before = ticket.tags.len();
        ticket.tags.retain(|t| t != tag);
        let changed = ticket.tags.len() != before;
        self.dirty |= changed;
        changed
    }

    // ========================================================================
    // Dirty Tracking
    // ========================================================================

    /// True if the in-memory collection has unsaved mutations.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tickets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tickets.is_empty()
    }

    // ========================================================================
    // Internal Helpers
    // ========================================================================

    fn get_mut(&mut self, id: u64) -> Option<&mut Ticket> {
        self.tickets.iter_mut().find(|t| t.id == id)
    }
}
