//! Locations of the Messages and AddressBook databases.
//!
//! Only the binary calls [`SourcePaths::discover`]; library entrypoints take
//! an explicit [`SourcePaths`].
//!
//! CHANGELOG:
//! - 10/18/2026 - AddressBook source discovery; env overrides for both stores
//! - 01/10/2026 - Initial stub (default chat.db path)

use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Overrides the Messages database path.
pub const CHAT_DB_ENV: &str = "ICA_CHAT_DB";

/// Overrides the directory searched for `*.abcddb` contact sources.
pub const CONTACTS_DIR_ENV: &str = "ICA_CONTACTS_DIR";

const CONTACT_DB_EXTENSION: &str = "abcddb";

/// Read-only inputs of the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcePaths {
    pub chat_db: PathBuf,
    pub contact_dbs: Vec<PathBuf>,
}

impl SourcePaths {
    pub fn new(chat_db: impl Into<PathBuf>, contact_dbs: Vec<PathBuf>) -> Self {
        Self {
            chat_db: chat_db.into(),
            contact_dbs,
        }
    }

    /// Resolve paths from the environment, falling back to the standard
    /// macOS locations under the home directory.
    pub fn discover() -> Self {
        let chat_db = std::env::var_os(CHAT_DB_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(default_chat_db_path);
        let contacts_dir = std::env::var_os(CONTACTS_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(default_contacts_dir);
        let contact_dbs = find_contact_dbs(&contacts_dir);

        debug!(
            chat_db = %chat_db.display(),
            contacts_dir = %contacts_dir.display(),
            sources = contact_dbs.len(),
            "discovered source databases"
        );
        Self::new(chat_db, contact_dbs)
    }
}

/// `~/Library/Messages/chat.db`
pub fn default_chat_db_path() -> PathBuf {
    home().join("Library").join("Messages").join("chat.db")
}

/// `~/Library/Application Support/AddressBook/Sources`
pub fn default_contacts_dir() -> PathBuf {
    home()
        .join("Library")
        .join("Application Support")
        .join("AddressBook")
        .join("Sources")
}

fn home() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
}

/// Every `*.abcddb` file directly in `dir` or in its immediate
/// subdirectories, sorted. A missing directory yields no sources.
pub fn find_contact_dbs(dir: &Path) -> Vec<PathBuf> {
    let mut found = Vec::new();
    let Ok(entries) = fs::read_dir(dir) else {
        return found;
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            if let Ok(children) = fs::read_dir(&path) {
                found.extend(
                    children
                        .flatten()
                        .map(|child| child.path())
                        .filter(|child| is_contact_db(child)),
                );
            }
        } else if is_contact_db(&path) {
            found.push(path);
        }
    }

    found.sort();
    found
}

fn is_contact_db(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case(CONTACT_DB_EXTENSION))
}
