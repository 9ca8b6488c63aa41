//! Command implementations for the CLI.

/// Checks a playlist: probe, capture, reconcile and report.
pub mod check;
