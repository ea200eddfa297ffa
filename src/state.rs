//! Application state and the views derived from it.
//!
//! `AppState` is an immutable snapshot. Every change (a finished load, a new query) is an `Event`
//! passed to `AppState::apply`, which returns the next snapshot. Nothing is updated in place and
//! nothing is cached: `AppState::view` recomputes the filtered customers, the filtered
//! transactions, the table and the chart from the snapshot every time it is called.

use crate::chart::{self, ChartData};
use crate::filter::{filter_customers, filter_transactions};
use crate::loader;
use crate::model::{Customer, Dataset, Grouping, Transaction};
use crate::source::Source;
use crate::table::{self, TableRow, PLACEHOLDER};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

/// Decides whether the minimum-amount query affects what the table and chart display.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum AmountScope {
    /// The amount filter is computed and counted, but the table and chart show every
    /// transaction of each matching customer.
    #[default]
    Ignored,
    /// The table and chart only show transactions that pass the amount filter.
    Display,
}

serde_plain::derive_display_from_serialize!(AmountScope);
serde_plain::derive_fromstr_from_deserialize!(AmountScope);

/// Something that changes the application state.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// A load finished. Replaces the dataset and clears any previous error.
    LoadSucceeded(Dataset),
    /// A load failed with the given message. The previous dataset is kept.
    LoadFailed(String),
    NameQueryChanged(String),
    AmountQueryChanged(String),
    AmountScopeChanged(AmountScope),
}

/// A snapshot of everything the views are derived from.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    dataset: Dataset,
    name_query: String,
    amount_query: String,
    amount_scope: AmountScope,
    placeholder: Option<String>,
    last_error: Option<String>,
}

impl AppState {
    /// An empty state that displays with `amount_scope` and substitutes `placeholder` for missing
    /// cells.
    pub fn new(amount_scope: AmountScope, placeholder: impl Into<String>) -> Self {
        Self {
            amount_scope,
            placeholder: Some(placeholder.into()),
            ..Self::default()
        }
    }

    /// Produces the next snapshot.
    pub fn apply(self, event: Event) -> Self {
        debug!("Applying {}", event_name(&event));
        match event {
            Event::LoadSucceeded(dataset) => Self {
                dataset,
                last_error: None,
                ..self
            },
            Event::LoadFailed(message) => {
                error!("{message}");
                Self {
                    last_error: Some(message),
                    ..self
                }
            }
            Event::NameQueryChanged(name_query) => Self { name_query, ..self },
            Event::AmountQueryChanged(amount_query) => Self {
                amount_query,
                ..self
            },
            Event::AmountScopeChanged(amount_scope) => Self {
                amount_scope,
                ..self
            },
        }
    }

    /// Loads from `source` once and applies the outcome. This never fails: an error is logged,
    /// recorded in `last_error`, and the current dataset is kept (empty on the first load).
    pub async fn load(self, source: &dyn Source) -> Self {
        let event = match loader::load(source).await {
            Ok(dataset) => Event::LoadSucceeded(dataset),
            Err(e) => Event::LoadFailed(format!("{e:#}")),
        };
        self.apply(event)
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn name_query(&self) -> &str {
        &self.name_query
    }

    pub fn amount_query(&self) -> &str {
        &self.amount_query
    }

    pub fn amount_scope(&self) -> AmountScope {
        self.amount_scope
    }

    pub fn placeholder(&self) -> &str {
        self.placeholder.as_deref().unwrap_or(PLACEHOLDER)
    }

    /// The message of the most recent failed load, if the most recent load failed.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Derives the view of this snapshot.
    pub fn view(&self) -> View<'_> {
        let customers = filter_customers(self.dataset.customers(), &self.name_query);
        let transactions = filter_transactions(self.dataset.transactions(), &self.amount_query);

        let regrouped;
        let grouping = match self.amount_scope {
            AmountScope::Ignored => self.dataset.grouping(),
            AmountScope::Display => {
                regrouped = Grouping::new(transactions.iter().copied());
                &regrouped
            }
        };

        let table = table::rows(&customers, grouping, self.placeholder());
        let chart = chart::aggregate(&customers, grouping);

        View {
            customers,
            transactions,
            table,
            chart,
            error: self.last_error(),
        }
    }
}

fn event_name(event: &Event) -> &'static str {
    match event {
        Event::LoadSucceeded(_) => "LoadSucceeded",
        Event::LoadFailed(_) => "LoadFailed",
        Event::NameQueryChanged(_) => "NameQueryChanged",
        Event::AmountQueryChanged(_) => "AmountQueryChanged",
        Event::AmountScopeChanged(_) => "AmountScopeChanged",
    }
}

/// Everything derived from one `AppState` snapshot.
#[derive(Debug, Clone)]
pub struct View<'a> {
    /// Customers whose name matches the name query.
    pub customers: Vec<&'a Customer>,
    /// Transactions that pass the amount query.
    pub transactions: Vec<&'a Transaction>,
    pub table: Vec<TableRow>,
    pub chart: ChartData,
    /// Set when the most recent load failed.
    pub error: Option<&'a str>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Payload;
    use crate::test::{payload, transaction, MemorySource};

    async fn loaded() -> AppState {
        AppState::default()
            .load(&MemorySource::ok(payload()))
            .await
    }

    #[tokio::test]
    async fn test_load_success() {
        let state = loaded().await;
        assert!(state.last_error().is_none());
        let view = state.view();
        assert_eq!(view.customers.len(), 4);
        assert_eq!(view.transactions.len(), 7);
        assert_eq!(view.table.len(), 6);
        assert_eq!(view.chart.len(), 4);
    }

    #[tokio::test]
    async fn test_load_failure_degrades_to_empty() {
        let state = AppState::default()
            .load(&MemorySource::failing("network unreachable"))
            .await;
        assert!(state.dataset().customers().is_empty());
        assert!(state.dataset().transactions().is_empty());
        assert!(state.dataset().grouping().is_empty());

        let view = state.view();
        assert!(view.table.is_empty());
        assert!(view.chart.is_empty());
        assert!(view.error.unwrap().contains("network unreachable"));
    }

    #[tokio::test]
    async fn test_load_failure_keeps_previous_dataset() {
        let state = loaded()
            .await
            .load(&MemorySource::failing("timed out"))
            .await;
        assert_eq!(state.dataset().customers().len(), 4);
        assert!(state.last_error().is_some());

        let state = state.load(&MemorySource::ok(Payload::default())).await;
        assert!(state.last_error().is_none());
        assert!(state.dataset().is_empty());
    }

    #[tokio::test]
    async fn test_name_query_filters_table_and_chart() {
        let state = loaded()
            .await
            .apply(Event::NameQueryChanged("a".to_string()));
        // Every sample customer name contains an "a".
        assert_eq!(state.view().customers.len(), 4);

        let state = state.apply(Event::NameQueryChanged("ya".to_string()));
        let view = state.view();
        assert_eq!(view.chart.labels(), ["Aya Elsayed"]);
        assert_eq!(view.chart.values(), [1850.0]);
        assert_eq!(view.table.len(), 2);
    }

    #[tokio::test]
    async fn test_amount_query_ignored_by_default() {
        let state = loaded()
            .await
            .apply(Event::AmountQueryChanged("1000".to_string()));
        assert_eq!(state.amount_scope(), AmountScope::Ignored);
        let view = state.view();
        assert_eq!(view.transactions.len(), 4);
        assert_eq!(view.table.len(), 6);
        assert_eq!(view.chart.values(), [3000.0, 1850.0, 1750.0, 0.0]);
    }

    #[tokio::test]
    async fn test_amount_query_display_scope() {
        let state = loaded()
            .await
            .apply(Event::AmountScopeChanged(AmountScope::Display))
            .apply(Event::AmountQueryChanged("1000".to_string()));
        let view = state.view();
        assert_eq!(view.transactions.len(), 4);
        let amounts: Vec<&str> = view.table.iter().map(|r| r.amount.as_str()).collect();
        assert_eq!(amounts, vec!["1000", "2000", "1300", "1250"]);
        assert_eq!(view.chart.values(), [3000.0, 1300.0, 1250.0, 0.0]);
    }

    #[tokio::test]
    async fn test_non_numeric_amount_query_display_scope_empties_table() {
        let state = loaded()
            .await
            .apply(Event::AmountScopeChanged(AmountScope::Display))
            .apply(Event::AmountQueryChanged("abc".to_string()));
        let view = state.view();
        assert!(view.transactions.is_empty());
        assert!(view.table.is_empty());
        // Customers still match the name query, so the chart keeps its segments at zero.
        assert_eq!(view.chart.values(), [0.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_placeholder() {
        assert_eq!(AppState::default().placeholder(), PLACEHOLDER);
        let state = AppState::new(AmountScope::Ignored, "--");
        assert_eq!(state.placeholder(), "--");
    }

    #[test]
    fn test_view_with_orphan_group() {
        let dataset = Dataset::new(Payload {
            customers: vec![],
            transactions: vec![transaction(1, 5, "2")],
        });
        let state = AppState::default().apply(Event::LoadSucceeded(dataset));
        let view = state.view();
        assert!(view.table.is_empty());
        assert!(view.chart.is_empty());
        assert_eq!(view.transactions.len(), 1);
    }

    #[test]
    fn test_amount_scope_strings() {
        assert_eq!(AmountScope::Display.to_string(), "display");
        assert_eq!("ignored".parse::<AmountScope>().unwrap(), AmountScope::Ignored);
        assert!("everything".parse::<AmountScope>().is_err());
    }
}
