use crate::model::{Customer, Id, Transaction};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The body returned by the data endpoint.
///
/// ```json
/// {
///   "customers": [{ "id": 1, "name": "Ahmed Ali" }],
///   "transactions": [{ "id": 1, "customer_id": 1, "date": "2022-01-01", "amount": 1000 }]
/// }
/// ```
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payload {
    pub customers: Vec<Customer>,
    pub transactions: Vec<Transaction>,
}

/// Transactions keyed by the customer they belong to. Within a key, transactions keep the order in
/// which they appeared in the source list.
///
/// Keys are created for every `customer_id` seen, including ids that match no customer.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Grouping(BTreeMap<Id, Vec<Transaction>>);

impl Grouping {
    /// Builds the grouping in a single pass over `transactions`.
    pub fn new<'a>(transactions: impl IntoIterator<Item = &'a Transaction>) -> Self {
        let mut map: BTreeMap<Id, Vec<Transaction>> = BTreeMap::new();
        for transaction in transactions {
            map.entry(transaction.customer_id().clone())
                .or_default()
                .push(transaction.clone());
        }
        Self(map)
    }

    /// The transactions of `customer_id`, or an empty slice if it has none.
    pub fn get(&self, customer_id: &Id) -> &[Transaction] {
        self.0.get(customer_id).map(Vec::as_slice).unwrap_or_default()
    }

    /// The sum of the parsed amounts of `customer_id`'s transactions. A customer with no
    /// transactions totals `0`. A single unparseable amount makes the total `NaN`.
    pub fn total(&self, customer_id: &Id) -> f64 {
        self.get(customer_id)
            .iter()
            .fold(0.0, |acc, t| acc + t.amount().value())
    }

    /// The number of distinct customer ids.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &Id> {
        self.0.keys()
    }
}

/// The customers, the transactions and their grouping, as produced by one successful load. The
/// three are always replaced together.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct Dataset {
    customers: Vec<Customer>,
    transactions: Vec<Transaction>,
    grouping: Grouping,
    loaded_at: Option<DateTime<Local>>,
}

impl Dataset {
    /// Creates a `Dataset` from a payload, grouping its transactions by customer.
    pub fn new(payload: Payload) -> Self {
        let grouping = crate::loader::group_by_customer(&payload.transactions);
        Self {
            customers: payload.customers,
            transactions: payload.transactions,
            grouping,
            loaded_at: Some(Local::now()),
        }
    }

    pub fn customers(&self) -> &[Customer] {
        &self.customers
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn grouping(&self) -> &Grouping {
        &self.grouping
    }

    /// When this dataset was loaded. `None` for the empty dataset that exists before any load.
    pub fn loaded_at(&self) -> Option<DateTime<Local>> {
        self.loaded_at
    }

    /// True when nothing has been loaded, or the load produced no customers and no transactions.
    pub fn is_empty(&self) -> bool {
        self.customers.is_empty() && self.transactions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::{payload, transaction};

    #[test]
    fn test_float_customer_id_groups_with_integer_id() {
        let payload: Payload = serde_json::from_value(serde_json::json!({
            "customers": [{"id": 5, "name": "Eve"}],
            "transactions": [
                {"id": 1, "customer_id": 5.0, "amount": "2"},
                {"id": 2, "customer_id": "5", "amount": "3"}
            ]
        }))
        .unwrap();
        let dataset = Dataset::new(payload);
        let id = dataset.customers()[0].id();
        assert_eq!(dataset.grouping().total(id), 5.0);
    }

    #[test]
    fn test_grouping_preserves_source_order() {
        let transactions = vec![
            transaction(1, 5, "2"),
            transaction(2, 6, "7"),
            transaction(3, 5, "3"),
        ];
        let grouping = Grouping::new(&transactions);
        assert_eq!(grouping.len(), 2);
        let ids: Vec<_> = grouping
            .get(&Id::from(5_u64))
            .iter()
            .filter_map(|t| t.id().cloned())
            .collect();
        assert_eq!(ids, vec![Id::from(1_u64), Id::from(3_u64)]);
    }

    #[test]
    fn test_grouping_total() {
        let transactions = vec![transaction(1, 5, "2"), transaction(2, 5, "3")];
        let grouping = Grouping::new(&transactions);
        assert_eq!(grouping.total(&Id::from(5_u64)), 5.0);
    }

    #[test]
    fn test_grouping_total_unknown_customer_is_zero() {
        let grouping = Grouping::new(&[transaction(1, 5, "2")]);
        assert_eq!(grouping.total(&Id::from(99_u64)), 0.0);
        assert!(grouping.get(&Id::from(99_u64)).is_empty());
    }

    #[test]
    fn test_grouping_total_with_garbage_amount_is_nan() {
        let grouping = Grouping::new(&[transaction(1, 5, "2"), transaction(2, 5, "n/a")]);
        assert!(grouping.total(&Id::from(5_u64)).is_nan());
    }

    #[test]
    fn test_grouping_keys_orphans() {
        let grouping = Grouping::new(&[transaction(1, 42, "2")]);
        assert_eq!(grouping.keys().collect::<Vec<_>>(), vec![&Id::from(42_u64)]);
    }

    #[test]
    fn test_dataset_new() {
        let dataset = Dataset::new(payload());
        assert_eq!(dataset.customers().len(), 4);
        assert_eq!(dataset.transactions().len(), 7);
        assert_eq!(dataset.grouping().len(), 4);
        assert!(dataset.loaded_at().is_some());
        assert!(!dataset.is_empty());
    }

    #[test]
    fn test_dataset_default_is_empty() {
        let dataset = Dataset::default();
        assert!(dataset.is_empty());
        assert!(dataset.grouping().is_empty());
        assert!(dataset.loaded_at().is_none());
    }

    #[test]
    fn test_payload_requires_both_lists() {
        let v = serde_json::json!({"customers": []});
        assert!(serde_json::from_value::<Payload>(v).is_err());
    }
}
