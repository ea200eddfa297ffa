use crate::commands::Out;
use crate::model::{Customer, Dataset, Id};
use crate::{loader, Config, Result};
use chrono::{DateTime, Local};
use serde::Serialize;
use std::collections::BTreeSet;

/// What a `fetch` loaded.
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub endpoint: String,
    pub customers: usize,
    pub transactions: usize,
    /// The number of distinct customer ids that have transactions.
    pub groups: usize,
    /// Transactions whose customer id matches no customer.
    pub orphan_transactions: usize,
    pub loaded_at: Option<DateTime<Local>>,
}

/// Loads the dataset once and summarizes it. Unlike the display commands, a failed load is an
/// error here.
pub async fn fetch(config: Config) -> Result<Out<Summary>> {
    let source = config.source()?;
    let dataset = loader::load(source.as_ref()).await?;

    let orphan_transactions = count_orphans(&dataset);

    let summary = Summary {
        endpoint: source.describe(),
        customers: dataset.customers().len(),
        transactions: dataset.transactions().len(),
        groups: dataset.grouping().len(),
        orphan_transactions,
        loaded_at: dataset.loaded_at(),
    };
    let message = format!(
        "Loaded {} customers and {} transactions ({} without a matching customer) from {}",
        summary.customers, summary.transactions, summary.orphan_transactions, summary.endpoint
    );
    Ok(Out::new(message, summary))
}

/// The number of transactions whose customer id matches no customer.
fn count_orphans(dataset: &Dataset) -> usize {
    let customer_ids: BTreeSet<&Id> = dataset.customers().iter().map(Customer::id).collect();
    let grouping = dataset.grouping();
    grouping
        .keys()
        .filter(|id| !customer_ids.contains(id))
        .map(|id| grouping.get(id).len())
        .sum()
}
