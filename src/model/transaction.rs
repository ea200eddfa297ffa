use crate::model::{Amount, Id, Scalar};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Represents a single entry from the `transactions` list of the payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(default)]
    id: Option<Id>,
    customer_id: Id,
    #[serde(default)]
    date: Option<Scalar>,
    #[serde(default)]
    amount: Amount,
    #[serde(flatten)]
    other_fields: BTreeMap<String, Value>,
}

impl Transaction {
    pub fn new(
        id: impl Into<Id>,
        customer_id: impl Into<Id>,
        date: impl Into<String>,
        amount: impl Into<Amount>,
    ) -> Self {
        Self {
            id: Some(id.into()),
            customer_id: customer_id.into(),
            date: Some(Scalar::from(date.into())),
            amount: amount.into(),
            other_fields: BTreeMap::new(),
        }
    }

    pub fn id(&self) -> Option<&Id> {
        self.id.as_ref()
    }

    pub fn customer_id(&self) -> &Id {
        &self.customer_id
    }

    /// The date exactly as given in the payload. Dates are not interpreted, and may be text or a
    /// number.
    pub fn date(&self) -> Option<&Scalar> {
        self.date.as_ref()
    }

    pub fn amount(&self) -> &Amount {
        &self.amount
    }

    pub fn other_fields(&self) -> &BTreeMap<String, Value> {
        &self.other_fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_string_amount() {
        let v = json!({"id": 1, "customer_id": 1, "date": "2022-01-01", "amount": "1000"});
        let t: Transaction = serde_json::from_value(v).unwrap();
        assert_eq!(t.id(), Some(&Id::from(1_u64)));
        assert_eq!(t.customer_id().as_str(), "1");
        assert_eq!(t.date().and_then(Scalar::as_str), Some("2022-01-01"));
        assert_eq!(t.amount().value(), 1000.0);
    }

    #[test]
    fn test_deserialize_numeric_amount_and_missing_date() {
        let v = json!({"id": "t9", "customer_id": "4", "amount": 12.75});
        let t: Transaction = serde_json::from_value(v).unwrap();
        assert_eq!(t.date(), None);
        assert_eq!(t.amount().value(), 12.75);
    }

    #[test]
    fn test_deserialize_numeric_date() {
        let v = json!({"id": 2, "customer_id": 1, "date": 20220101, "amount": "5"});
        let t: Transaction = serde_json::from_value(v).unwrap();
        assert_eq!(t.date().map(|d| d.to_string()), Some("20220101".to_string()));
    }

    #[test]
    fn test_missing_amount() {
        let v = json!({"id": 3, "customer_id": 2, "date": "2022-01-02"});
        let t: Transaction = serde_json::from_value(v).unwrap();
        assert!(t.amount().is_missing());
    }

    #[test]
    fn test_customer_id_is_required() {
        let v = json!({"id": 3, "date": "2022-01-02", "amount": "5"});
        assert!(serde_json::from_value::<Transaction>(v).is_err());
    }
}
