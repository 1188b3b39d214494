//! Rendering of command results as tables or JSON.

use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

/// How command results are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Bordered table for terminals
    #[default]
    Table,
    /// Pretty-printed JSON for scripts
    Json,
}

fn to_json<T: Serialize + ?Sized>(value: &T, empty: &str) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| empty.to_string())
}

fn table<I, T>(rows: I) -> String
where
    I: IntoIterator<Item = T>,
    T: Tabled,
{
    Table::new(rows).with(Style::rounded()).to_string()
}

/// Print rows; an empty table prints a notice instead.
pub fn print_list<T: Serialize + Tabled>(rows: &[T], format: OutputFormat) {
    match format {
        OutputFormat::Json => println!("{}", to_json(rows, "[]")),
        OutputFormat::Table if rows.is_empty() => println!("No results found."),
        OutputFormat::Table => {
            println!("{}", table(rows));
            println!("{} row(s)", rows.len());
        }
    }
}

/// Print one row.
pub fn print_item<T: Serialize + Tabled>(row: &T, format: OutputFormat) {
    match format {
        OutputFormat::Json => println!("{}", to_json(row, "{}")),
        OutputFormat::Table => println!("{}", table([row])),
    }
}

pub fn print_success(msg: &str) {
    println!("✓ {msg}");
}

pub fn print_warning(msg: &str) {
    eprintln!("⚠ {msg}");
}

pub fn print_error(msg: &str) {
    eprintln!("✗ {msg}");
}

/// Print an indented `key: value` line.
pub fn print_kv(key: &str, value: &str) {
    println!("  {:<12} {value}", format!("{key}:"));
}
