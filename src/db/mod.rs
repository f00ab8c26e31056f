//! Database module for read-only SQLite access to Messages.db and AddressBook.
//!
//! CHANGELOG:
//! - 10/18/2026 - typedstream decoder replaces blob_parser
//! - 01/10/2026 - Initial module structure

pub mod connection;
pub mod queries;
pub mod typedstream;

pub use typedstream::decode_legacy_body;
