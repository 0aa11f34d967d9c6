//! transitroute CLI library.
//!
//! Subcommand handlers and output formatting for the `transitroute` binary,
//! kept in a library so they can be unit tested.

pub mod commands;
pub mod output;
