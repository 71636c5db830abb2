//! Rendering for command results: aligned text tables or JSON.

use catalog::{Product, SerialRecord, UserError};
use clap::ValueEnum;
use serde_json::json;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Table,
    Json,
}

pub fn products(format: Format, products: &[Product]) -> anyhow::Result<String> {
    if format == Format::Json {
        return Ok(serde_json::to_string_pretty(products)?);
    }
    if products.is_empty() {
        return Ok("No products.".to_string());
    }
    let rows = products
        .iter()
        .map(|p| {
            vec![
                p.id.to_string(),
                p.name.clone(),
                p.product_type.clone(),
                p.quantity.to_string(),
                p.barcode.clone(),
            ]
        })
        .collect::<Vec<_>>();
    Ok(table(&["ID", "NAME", "TYPE", "QUANTITY", "BARCODE"], &rows))
}

pub fn serials(format: Format, serials: &[SerialRecord]) -> anyhow::Result<String> {
    if format == Format::Json {
        return Ok(serde_json::to_string_pretty(serials)?);
    }
    if serials.is_empty() {
        return Ok("No serial numbers.".to_string());
    }
    let rows = serials
        .iter()
        .map(|s| {
            vec![
                s.id.to_string(),
                s.serial_number.clone(),
                s.note.clone().unwrap_or_default(),
            ]
        })
        .collect::<Vec<_>>();
    Ok(table(&["ID", "SERIAL NUMBER", "NOTE"], &rows))
}

/// `{"code": ..., "message": ...}` in JSON mode, `Error [CODE]: message` otherwise.
pub fn user_error(format: Format, err: &UserError) -> String {
    match format {
        Format::Json => format!(
            "{:#}",
            json!({ "code": err.error_code(), "message": err.to_string() })
        ),
        Format::Table => format!("Error [{}]: {}", err.error_code(), err),
    }
}

fn table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(format_row(headers.iter().copied(), &widths));
    for row in rows {
        lines.push(format_row(row.iter().map(String::as_str), &widths));
    }
    lines.join("\n")
}

fn format_row<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    cells
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}
