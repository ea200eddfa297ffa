//! The two filters applied to the loaded data. Both are pure and keep the input order.

use crate::model::{parse_float, Customer, Transaction};

/// Returns the customers whose name contains `query`, ignoring case. An empty query matches every
/// customer.
pub fn filter_customers<'a>(customers: &'a [Customer], query: &str) -> Vec<&'a Customer> {
    let query = query.to_lowercase();
    customers
        .iter()
        .filter(|c| c.name().to_lowercase().contains(&query))
        .collect()
}

/// Returns the transactions whose amount is at least the number in `query`.
///
/// An empty query keeps every transaction. Any other query is parsed with `parse_float`, and a
/// transaction passes when `amount >= threshold`, with the amount converted by
/// `Amount::numeric_value`. When either side is `NaN` the comparison is false, so a non-numeric
/// query such as `"abc"` (or a whitespace-only query) keeps nothing, and so does an amount such as
/// `"12abc"`.
pub fn filter_transactions<'a>(
    transactions: &'a [Transaction],
    query: &str,
) -> Vec<&'a Transaction> {
    if query.is_empty() {
        return transactions.iter().collect();
    }
    let threshold = parse_float(query);
    transactions
        .iter()
        .filter(|t| t.amount().numeric_value() >= threshold)
        .collect()
}
