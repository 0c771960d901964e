//! Shared utilities for the block-time crates.
//!
//! Spreadsheet uploads arrive as Polars frames whose column types depend on
//! the file format (CSV columns are text, workbook columns may be numeric).
//! The helpers here turn individual cells into the plain Rust values the
//! typed records need.

pub mod polars;

pub use polars::{
    NumericCell, any_to_f64, any_to_i64, any_to_string, any_to_text, format_numeric,
    numeric_cell, parse_f64, parse_i64, round_to,
};
