//! Flattens customers and their transactions into table rows, and renders those rows.

use crate::model::{Customer, Grouping, Transaction};
use crate::Result;
use serde::Serialize;
use std::fmt::Write;

/// Shown in place of a date or amount that is missing or empty.
pub const PLACEHOLDER: &str = "N/A";

/// Column headers, in display order.
pub const HEADERS: [&str; 4] = ["Customer ID", "Customer Name", "Date", "Amount"];

/// One rendered row: a transaction joined with the customer it belongs to. All cells are text,
/// with the placeholder already substituted.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct TableRow {
    #[serde(rename = "Customer ID")]
    pub customer_id: String,
    #[serde(rename = "Customer Name")]
    pub customer_name: String,
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Amount")]
    pub amount: String,
}

impl TableRow {
    fn new(customer: &Customer, transaction: &Transaction, placeholder: &str) -> Self {
        let date = match transaction.date() {
            Some(date) if !date.is_falsy() => date.to_string(),
            _ => placeholder.to_string(),
        };
        let amount = if transaction.amount().is_falsy() {
            placeholder.to_string()
        } else {
            transaction.amount().to_string()
        };
        Self {
            customer_id: customer.id().to_string(),
            customer_name: customer.name().to_string(),
            date,
            amount,
        }
    }

    fn cells(&self) -> [&str; 4] {
        [
            &self.customer_id,
            &self.customer_name,
            &self.date,
            &self.amount,
        ]
    }
}

/// For each customer, in order, one row per transaction in that customer's group. Customers with
/// no transactions contribute no rows.
pub fn rows(customers: &[&Customer], grouping: &Grouping, placeholder: &str) -> Vec<TableRow> {
    customers
        .iter()
        .flat_map(|customer| {
            grouping
                .get(customer.id())
                .iter()
                .map(move |t| TableRow::new(customer, t, placeholder))
        })
        .collect()
}

/// Renders rows as a markdown table. An empty slice still renders the header.
pub fn to_markdown(rows: &[TableRow]) -> String {
    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row.cells()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    write_markdown_line(&mut out, HEADERS, &widths);
    let rule = widths.map(|w| "-".repeat(w));
    write_markdown_line(&mut out, rule.each_ref().map(String::as_str), &widths);
    for row in rows {
        write_markdown_line(&mut out, row.cells(), &widths);
    }
    out
}

fn write_markdown_line(out: &mut String, cells: [&str; 4], widths: &[usize; 4]) {
    out.push('|');
    for (cell, &width) in cells.iter().zip(widths) {
        let _ = write!(out, " {cell:<width$} |");
    }
    out.push('\n');
}

/// Renders rows as CSV, with a header line.
pub fn to_csv(rows: &[TableRow]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    if rows.is_empty() {
        writer.write_record(HEADERS)?;
    }
    for row in rows {
        writer.serialize(row)?;
    }
    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8(bytes)?)
}
