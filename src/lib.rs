//! ica library
//!
//! Contact resolution, conversation extraction, analyzers, and output
//! formatting for a single iMessage conversation. The `ica` binary is a thin
//! layer over [`cli`].
//!
//! CHANGELOG:
//! - 10/18/2026 - Reworked around conversation analysis (pipeline, analyzers, output)
//! - 01/10/2026 - Initial library structure

pub mod analyzers;
pub mod cli;
pub mod config;
pub mod contacts;
pub mod conversation;
pub mod db;
pub mod error;
pub mod output;
pub mod pipeline;

#[cfg(test)]
mod fixtures;

pub use config::SourcePaths;
pub use conversation::ConversationDataset;
pub use error::{IcaError, Result};
pub use output::{render, render_to_bytes, OutputFormat, TabularResult};
pub use pipeline::{get_conversation_data, ConversationRequest};
