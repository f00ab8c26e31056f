//! Conversation location, extraction, and filtering.
//!
//! CHANGELOG:
//! - 10/18/2026 - Initial module structure

pub mod dataset;
pub mod extract;
pub mod filter;
pub mod locate;
pub mod reaction;

pub use dataset::{Attachment, ConversationDataset, Message, Participant};
pub use extract::extract;
pub use filter::{filter, DateRange, PersonFilter, TargetZone};
pub use locate::locate;
pub use reaction::is_reaction;
