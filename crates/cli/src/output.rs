//! Rendering records as table, CSV, JSON or JSON lines

use anyhow::Result;
use clap::ValueEnum;
use jule_core::record::columns;
use jule_core::{Record, Value};
use owo_colors::OwoColorize;
use serde::{Deserialize, Serialize};
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Table,
    Csv,
    Json,
    Jsonl,
}

impl OutputFormat {
    /// Pick the format for this run
    ///
    /// An explicit flag wins, then the configured default. Otherwise a
    /// terminal gets a table and anything else JSON lines.
    pub fn resolve(explicit: Option<Self>, configured: Option<Self>, is_terminal: bool) -> Self {
        if let Some(format) = explicit.or(configured) {
            return format;
        }
        if is_terminal {
            OutputFormat::Table
        } else {
            tracing::warn!("stdout is not a terminal, defaulting to jsonl output");
            OutputFormat::Jsonl
        }
    }
}

fn to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Text(s) => serde_json::Value::String(s.clone()),
        Value::Int(i) => serde_json::Value::from(*i),
    }
}

fn record_to_json(record: &Record) -> serde_json::Value {
    record
        .iter()
        .map(|(key, value)| (key.clone(), to_json(value)))
        .collect::<serde_json::Map<_, _>>()
        .into()
}

/// Write rows in the requested format
///
/// `color` only affects the table header.
pub fn write_records<W: Write>(out: &mut W, rows: &[Record], format: OutputFormat, color: bool) -> Result<()> {
    match format {
        OutputFormat::Table => write_table(out, rows, color)?,
        OutputFormat::Csv => write_csv(out, rows)?,
        OutputFormat::Json => {
            let array: Vec<_> = rows.iter().map(record_to_json).collect();
            serde_json::to_writer_pretty(&mut *out, &array)?;
            writeln!(out)?;
        }
        OutputFormat::Jsonl => {
            for row in rows {
                serde_json::to_writer(&mut *out, &record_to_json(row))?;
                writeln!(out)?;
            }
        }
    }
    out.flush()?;
    Ok(())
}

fn write_csv<W: Write>(out: &mut W, rows: &[Record]) -> Result<()> {
    let header = columns(rows);
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(&header)?;
    for row in rows {
        writer.write_record(header.iter().map(|column| cell(row, column)))?;
    }
    writer.flush()?;
    Ok(())
}

fn cell(row: &Record, column: &str) -> String {
    row.get(column).map(Value::to_string).unwrap_or_default()
}

fn write_table<W: Write>(out: &mut W, rows: &[Record], color: bool) -> Result<()> {
    if rows.is_empty() {
        writeln!(out, "(no rows)")?;
        return Ok(());
    }

    let header = columns(rows);
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| header.iter().map(|column| cell(row, column)).collect())
        .collect();

    let widths: Vec<usize> = header
        .iter()
        .enumerate()
        .map(|(i, column)| {
            cells
                .iter()
                .map(|row| row[i].chars().count())
                .chain(std::iter::once(column.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let header_line = pad_line(&header, &widths);
    if color {
        writeln!(out, "{}", header_line.bold())?;
    } else {
        writeln!(out, "{header_line}")?;
    }
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    writeln!(out, "{}", pad_line(&rule, &widths))?;

    for row in &cells {
        writeln!(out, "{}", pad_line(row, &widths))?;
    }
    writeln!(out, "({} rows)", rows.len())?;
    Ok(())
}

fn pad_line(cells: &[String], widths: &[usize]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}
