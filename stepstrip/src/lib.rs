//! Core library for the stepstrip tool.
//!
//! stepstrip finds `[DebuggerStepThrough]` on C# declarations and removes it.
//! The library parses C# into a lossless syntax tree, binds attribute names to
//! types, reports every marker occurrence and rewrites the tree without it.

// Allow common complexity warnings - these are intentional design choices
#![allow(
    clippy::type_complexity,
    clippy::similar_names,
    clippy::map_unwrap_or,
    clippy::items_after_statements
)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

/// Module containing the lossless C# syntax tree and its parser.
pub mod syntax;

/// Module resolving attribute names to types.
pub mod semantic;

/// Module containing the matcher and scanner.
/// This includes `Document`, `Scanner` and the `Diagnostic` types.
pub mod analyzer;

/// Module removing marker attributes from syntax trees.
pub mod fix;

/// Module for `#pragma warning` suppression regions.
pub mod suppression;

/// Module for loading configuration.
pub mod config;

/// Module containing utility functions.
/// This includes path helpers, file discovery and line indexing.
pub mod utils;

/// Module defining the entry point logic shared by the binary and tests.
pub mod entry_point;

/// Module containing shared constants and regex patterns.
pub mod constants;

/// Module for rich CLI output formatting with colored text and progress bars.
pub mod output;

/// Module defining the command-line interface arguments and structs.
pub mod cli;

/// Module for the scan and fix passes run by the CLI.
pub mod commands;
