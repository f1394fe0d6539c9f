//! JSON file I/O for the ticket collection.
//!
//! The backing file is one pretty-printed JSON array holding every ticket.
//! Reads are fail-soft ([`load`]) or strict ([`try_load`]); writes are
//! whole-file and go through a temp file plus rename.

use std::fs;
use std::io::Write;
use std::path::Path;

use tracing::{debug, warn};

use crate::error::{Result, TicketError};
use crate::model::Ticket;

/// Load tickets, recovering from any failure as an empty collection.
///
/// A missing file is the normal first-run state and is only logged at
/// debug level; unreadable or unparsable content is logged as a warning.
/// Loaded tickets are normalized (see [`Ticket::normalize`]).
#[must_use]
pub fn load(path: &Path) -> Vec<Ticket> {
    match try_load(path) {
        Ok(tickets) => tickets,
        Err(TicketError::FileNotFound(_)) => {
            debug!(path = %path.display(), "ticket file not found; starting empty");
            Vec::new()
        }
        Err(err) => {
            warn!(path = %path.display(), error = %err, "ticket file unreadable; starting empty");
            Vec::new()
        }
    }
}

/// Load tickets, surfacing every failure.
///
/// # Errors
///
/// Returns `FileNotFound` if the file does not exist, `Io` if it cannot be
/// read, or `Corrupt` if it is not a JSON array of tickets.
pub fn try_load(path: &Path) -> Result<Vec<Ticket>> {
    let raw = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            TicketError::FileNotFound(path.to_path_buf())
        } else {
            TicketError::Io(e)
        }
    })?;

    // An empty file is treated like an empty array.
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mut tickets: Vec<Ticket> =
        serde_json::from_str(&raw).map_err(|e| TicketError::Corrupt {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    let mut normalized = 0_usize;
    for ticket in &mut tickets {
        if ticket.normalize() {
            normalized += 1;
        }
    }
    debug!(
        path = %path.display(),
        count = tickets.len(),
        normalized,
        "loaded tickets"
    );

    Ok(tickets)
}

/// Serialize the collection as pretty JSON.
///
/// # Errors
///
/// Returns `Json` if serialization fails.
pub fn to_pretty_json(tickets: &[Ticket]) -> Result<String> {
    let mut json = serde_json::to_string_pretty(tickets)?;
    json.push('\n');
    Ok(json)
}

/// Save the full collection, replacing the file.
///
/// Writes to `<file>.tmp` in the same directory and renames it over the
/// target, so readers see either the old or the new content.
///
/// # Errors
///
/// Returns `Io` if the file cannot be written, or `Json` if serialization
/// fails.
pub fn save(path: &Path, tickets: &[Ticket]) -> Result<()> {
    let json = to_pretty_json(tickets)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = Path::new(&tmp_name);

    if let Err(err) = write_and_replace(tmp_path, path, json.as_bytes()) {
        if let Err(cleanup) = fs::remove_file(tmp_path) {
            debug!(path = %tmp_path.display(), error = %cleanup, "temp file not removed");
        }
        return Err(err.into());
    }
    debug!(path = %path.display(), count = tickets.len(), "saved tickets");

    Ok(())
}

fn write_and_replace(tmp_path: &Path, path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = fs::File::create(tmp_path)?;
    file.write_all(bytes)?;
    file.flush()?;
    drop(file);
    fs::rename(tmp_path, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Exchange, Timestamp};

    fn sample(id: u64, title: &str) -> Ticket {
        let at = Timestamp::from_raw("2024-02-01 08:00:00");
        Ticket {
            id,
            title: title.to_string(),
            description: "Printer jams".to_string(),
            category: "Bug".to_string(),
            priority: "High".to_string(),
            status: "Open".to_string(),
            created_at: at.clone(),
            tags: vec!["hardware".to_string()],
            comments: Vec::new(),
            exchanges: vec![Exchange::question("Printer jams", at)],
            support_response_at: None,
        }
    }

    #[test]
    fn test_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tickets.json");

        let tickets = vec![sample(1, "First"), sample(2, "Zweites Ticket")];
        save(&path, &tickets).unwrap();

        let loaded = load(&path);
        assert_eq!(loaded, tickets);
    }

    #[test]
    fn test_save_load_is_fixed_point() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tickets.json");
        fs::write(
            &path,
            r#"[{"id": 3, "title": "Old", "description": "legacy", "created_at": "2023-11-02 10:00:00",
                 "support_response_at": "2023-11-02 12:00:00", "status": "Open"}]"#,
        )
        .unwrap();

        let first = load(&path);
        save(&path, &first).unwrap();
        let first_bytes = fs::read_to_string(&path).unwrap();

        let second = load(&path);
        save(&path, &second).unwrap();
        let second_bytes = fs::read_to_string(&path).unwrap();

        assert_eq!(first, second);
        assert_eq!(first_bytes, second_bytes);
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let loaded = load(Path::new("/nonexistent/tickets.json"));
        assert!(loaded.is_empty());
        assert!(matches!(
            try_load(Path::new("/nonexistent/tickets.json")),
            Err(TicketError::FileNotFound(_))
        ));
    }

    #[test]
    fn test_load_corrupt_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tickets.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(load(&path).is_empty());
        assert!(matches!(try_load(&path), Err(TicketError::Corrupt { .. })));
    }

    #[test]
    fn test_load_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tickets.json");
        fs::write(&path, "\n").unwrap();

        assert!(try_load(&path).unwrap().is_empty());
    }

    #[test]
    fn test_save_is_indented_and_creates_parent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("tickets.json");

        save(&path, &[sample(1, "First")]).unwrap();
        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.starts_with("[\n  {"));
        assert!(!dir.path().join("nested").join("tickets.json.tmp").exists());
    }

    #[test]
    fn test_save_to_unwritable_location_fails() {
        let dir = tempfile::tempdir().unwrap();
        // A directory cannot be replaced by a file rename.
        let path = dir.path().join("occupied");
        fs::create_dir(&path).unwrap();
        fs::write(path.join("keep"), "x").unwrap();

        assert!(save(&path, &[sample(1, "First")]).is_err());
        assert!(!dir.path().join("occupied.tmp").exists());
        assert!(path.join("keep").exists());
    }

    #[test]
    fn test_load_treats_null_fields_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tickets.json");
        fs::write(
            &path,
            r#"[
  {"id": 1, "title": "Fine", "description": "ok", "category": "Bug",
   "priority": "High", "status": "Open", "created_at": "2024-01-01 09:00:00",
   "tags": ["vpn"]},
  {"id": 2, "title": "Nulls", "description": null, "category": null,
   "priority": null, "status": null, "created_at": "2024-01-02 09:00:00",
   "tags": null, "comments": null,
   "exchanges": [{"question_at": "2024-01-02 09:00:00", "question_text": null,
                  "response_at": "2024-01-02 11:00:00", "response_text": null}]},
  {"id": 3, "title": "No exchanges", "created_at": "2024-01-03 09:00:00",
   "exchanges": null, "comments": [{"at": "2024-01-03 10:00:00", "text": null}]}
]"#,
        )
        .unwrap();

        let tickets = try_load(&path).unwrap();
        assert_eq!(tickets.len(), 3);
        assert_eq!(tickets[0].tags, vec!["vpn".to_string()]);

        let nulls = &tickets[1];
        assert!(nulls.description.is_empty());
        assert!(nulls.status.is_empty());
        assert!(nulls.tags.is_empty());
        assert!(nulls.comments.is_empty());
        assert_eq!(nulls.exchanges[0].response_text, "");
        assert_eq!(nulls.exchanges[0].response_hours(), Some(2.0));
        assert_eq!(
            nulls.support_response_at,
            Some(Timestamp::from_raw("2024-01-02 11:00:00"))
        );

        // Null exchanges get the seed exchange like a missing key would.
        assert_eq!(tickets[2].exchanges.len(), 1);
        assert_eq!(tickets[2].comments[0].text, "");
        assert_eq!(load(&path).len(), 3);
    }

    #[test]
    fn test_null_fields_are_written_back_as_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tickets.json");
        fs::write(
            &path,
            r#"[{"id": 7, "title": "Legacy", "created_at": "2024-01-01 09:00:00", "tags": null}]"#,
        )
        .unwrap();

        let tickets = load(&path);
        save(&path, &tickets).unwrap();
        let raw = fs::read_to_string(&path).unwrap();
        assert!(!raw.contains("null"));
        assert_eq!(load(&path), tickets);
    }
}
