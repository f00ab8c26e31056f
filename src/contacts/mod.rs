//! Contacts: AddressBook loading, normalization, and identifier resolution.
//!
//! CHANGELOG:
//! - 10/18/2026 - AddressBook sources replace contacts.json; fuzzy matching removed
//! - 01/10/2026 - Initial module structure

pub mod normalize;
pub mod record;
pub mod resolver;

pub use record::ContactRecord;
pub use resolver::{resolve, ContactsManager};
