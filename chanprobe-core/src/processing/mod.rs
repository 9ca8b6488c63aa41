//! Channel processing and run orchestration.
//!
//! `channel` validates a single playlist entry; `run` drives a whole playlist
//! through it and into the report writer.

pub mod channel;
pub mod formatting;
pub mod run;

pub use channel::{ChannelProcessor, ChannelResult, Timeouts};
pub use run::{RunSummary, run_playlist};
