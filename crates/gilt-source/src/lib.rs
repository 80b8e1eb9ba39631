//! # Gilt Source
//!
//! Data layer for UK gilt yield analytics: loads DMO "Gilts in Issue"
//! workbooks, reconstructs structured security records from their
//! semi-free-form tabular layout, and merges records across every published
//! source file in a directory.
//!
//! This crate provides:
//!
//! - **Cell model**: a crate-local [`cell::Cell`] grid so the parser is
//!   unit-testable without workbook fixtures
//! - **Workbook loading**: calamine-based `.xls`/`.xlsx` reading
//! - **Parsing**: an explicit state machine over the sheet's rows
//! - **Discovery**: dated `YYYYMMDD - Gilts in Issue.<ext>` files with a
//!   modification-time fallback group
//! - **Merge & cache**: per-ISIN recency merge, cached by a content
//!   signature over the discovered files

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cache;
pub mod cell;
pub mod discovery;
pub mod merge;
pub mod parser;
pub mod workbook;

pub use cache::SourceCache;
pub use merge::{load_parsed_sheet, merge_source_files, sort_rows, MergedGilts};
pub use parser::ParsedSheet;
