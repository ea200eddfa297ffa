//! Loads a `Dataset` from a `Source`.

use crate::model::{Dataset, Grouping, Transaction};
use crate::source::Source;
use crate::Result;
use anyhow::Context;
use tracing::{debug, info};

/// Fetches the payload once and builds the dataset, grouping transactions by customer.
///
/// # Errors
/// Any network, HTTP status or parse failure is returned. Callers that must not fail (rendering)
/// should go through `AppState::load`, which logs the error and keeps the previous data.
pub async fn load(source: &dyn Source) -> Result<Dataset> {
    let description = source.describe();
    debug!("Loading customer data from {description}");
    let payload = source
        .fetch()
        .await
        .with_context(|| format!("Unable to load customer data from {description}"))?;
    let dataset = Dataset::new(payload);
    info!(
        "Loaded {} customers and {} transactions from {description}",
        dataset.customers().len(),
        dataset.transactions().len()
    );
    Ok(dataset)
}

/// Groups transactions by customer id in one pass, keeping payload order within each group.
pub fn group_by_customer(transactions: &[Transaction]) -> Grouping {
    Grouping::new(transactions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Id;
    use crate::test::{payload, transaction, MemorySource};

    #[test]
    fn test_group_by_customer() {
        let transactions = vec![
            transaction(1, 5, "2"),
            transaction(2, 6, "10"),
            transaction(3, 5, "3"),
        ];
        let grouping = group_by_customer(&transactions);
        assert_eq!(grouping.len(), 2);
        assert_eq!(grouping.total(&Id::from(5_u64)), 5.0);
        let ids: Vec<_> = grouping.get(&Id::from(5_u64)).iter().map(|t| t.id()).collect();
        assert_eq!(ids, vec![Some(&Id::from(1_u64)), Some(&Id::from(3_u64))]);
        assert!(group_by_customer(&[]).is_empty());
    }

    #[tokio::test]
    async fn test_load() {
        let dataset = load(&MemorySource::ok(payload())).await.unwrap();
        assert_eq!(dataset.customers().len(), 4);
        assert_eq!(dataset.grouping().get(&Id::from(1_u64)).len(), 2);
        assert_eq!(dataset.grouping().get(&Id::from(9_u64)).len(), 1);
    }

    #[tokio::test]
    async fn test_load_failure_has_context() {
        let err = load(&MemorySource::failing("connection reset"))
            .await
            .err()
            .unwrap();
        assert_eq!(
            err.to_string(),
            "Unable to load customer data from memory"
        );
        assert!(format!("{err:#}").contains("connection reset"));
    }
}
