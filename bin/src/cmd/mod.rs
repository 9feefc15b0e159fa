//! CLI subcommand modules.
//!
//! This module contains the implementations for all intrinsic CLI subcommands.

pub(crate) mod report;
pub(crate) mod serve;
pub(crate) mod valuation;
