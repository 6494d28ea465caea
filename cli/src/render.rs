//! Plain-text rendering of records.

use std::io::{self, Write};

use comfy_table::{presets, ContentArrangement, Table};
use serde_json::Value;

const MAX_CELL: usize = 40;

/// Render `rows` (JSON objects) as an aligned table, `id` first and the
/// remaining fields in key order.
pub fn table(out: &mut impl Write, rows: &[Value]) -> io::Result<()> {
    let Some(Value::Object(first)) = rows.first() else {
        return writeln!(out, "(no records)");
    };

    let mut columns: Vec<&str> = first.keys().map(String::as_str).collect();
    columns.sort_unstable();
    if let Some(pos) = columns.iter().position(|c| *c == "id") {
        let id = columns.remove(pos);
        columns.insert(0, id);
    }

    let mut table = Table::new();
    table
        .load_preset(presets::NOTHING)
        .set_content_arrangement(ContentArrangement::Disabled)
        .set_header(columns.iter().copied());
    for row in rows {
        table.add_row(columns.iter().map(|c| cell(row.get(*c))));
    }

    for line in table.lines() {
        writeln!(out, "{}", line.trim_end())?;
    }
    Ok(())
}

fn cell(value: Option<&Value>) -> String {
    let text = match value {
        None | Some(Value::Null) => "-".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Array(items)) => items.iter().map(|v| cell(Some(v))).collect::<Vec<_>>().join(","),
        Some(other) => other.to_string(),
    };
    truncate(text)
}

fn truncate(text: String) -> String {
    if text.chars().count() <= MAX_CELL {
        return text;
    }
    let mut cut: String = text.chars().take(MAX_CELL - 1).collect();
    cut.push('…');
    cut
}

/// Pretty-printed JSON followed by a newline.
pub fn json(out: &mut impl Write, value: &Value) -> io::Result<()> {
    let text = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
    writeln!(out, "{text}")
}
