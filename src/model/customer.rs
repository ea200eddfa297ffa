use crate::model::{Id, Scalar};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Cow;
use std::collections::BTreeMap;

/// Represents a single entry from the `customers` list of the payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    id: Id,
    #[serde(default)]
    name: Option<Scalar>,
    /// Any fields other than `id` and `name`, passed through untouched.
    #[serde(flatten)]
    other_fields: BTreeMap<String, Value>,
}

impl Customer {
    pub fn new(id: impl Into<Id>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: Some(Scalar::from(name.into())),
            other_fields: BTreeMap::new(),
        }
    }

    pub fn id(&self) -> &Id {
        &self.id
    }

    /// The customer's name, or the empty string when the payload has none. A non-text name is
    /// shown in its JSON text form.
    pub fn name(&self) -> Cow<'_, str> {
        self.name
            .as_ref()
            .map(Scalar::text)
            .unwrap_or(Cow::Borrowed(""))
    }

    pub fn other_fields(&self) -> &BTreeMap<String, Value> {
        &self.other_fields
    }
}
