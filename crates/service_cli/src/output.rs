//! Result set rendering.

use crate::Result;
use clap::ValueEnum;
use pricer_pricing::ResultSet;
use std::fmt::Write;

/// Output format of a pricing command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Box-drawn table, 3 decimals
    #[default]
    Table,
    /// Pretty-printed JSON object, `null` for unavailable values
    Json,
}

/// Renders `results` in `format`.
pub fn render(results: &ResultSet, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Table => Ok(render_table(results)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(results)?),
    }
}

/// Box-drawn table of the six quantities with their sources.
pub fn render_table(results: &ResultSet) -> String {
    let mut out = String::new();
    out.push_str("┌──────────┬──────────────┬─────────────┐\n");
    out.push_str("│ Quantity │        Value │ Source      │\n");
    out.push_str("├──────────┼──────────────┼─────────────┤\n");
    for (quantity, value) in results.iter() {
        let _ = writeln!(
            out,
            "│ {:<8} │ {:>12.3} │ {:<11} │",
            quantity.name(),
            value.value(),
            value.source()
        );
    }
    out.push_str("└──────────┴──────────────┴─────────────┘");
    out
}
