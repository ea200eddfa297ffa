use crate::args::ViewArgs;
use crate::commands::{Out, OutputFormat};
use crate::state::{AmountScope, AppState, Event, View};
use crate::{table, Config, Result};
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt::{Display, Formatter};

/// Which parts of the view a command prints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Part {
    All,
    Table,
    Chart,
}

/// The result of a display command. `Display` writes the rendered output; the other fields are
/// counts for logging.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub customers_total: usize,
    pub customers_shown: usize,
    pub transactions_total: usize,
    /// Transactions that pass the minimum-amount query.
    pub transactions_matching: usize,
    pub rows: usize,
    pub amount_scope: AmountScope,
    pub error: Option<String>,
    #[serde(skip)]
    rendered: String,
}

impl Report {
    /// Renders the view of `state`.
    pub fn new(state: &AppState, part: Part, format: OutputFormat) -> Result<Self> {
        let view = state.view();
        Ok(Self {
            customers_total: state.dataset().customers().len(),
            customers_shown: view.customers.len(),
            transactions_total: state.dataset().transactions().len(),
            transactions_matching: view.transactions.len(),
            rows: view.table.len(),
            amount_scope: state.amount_scope(),
            error: view.error.map(str::to_string),
            rendered: render(&view, part, format)?,
        })
    }

    pub fn rendered(&self) -> &str {
        &self.rendered
    }

    fn message(&self) -> String {
        if self.error.is_some() {
            return "The customer data could not be loaded, showing empty results".to_string();
        }
        format!(
            "Showing {} rows for {} of {} customers, {} of {} transactions meet the minimum amount",
            self.rows,
            self.customers_shown,
            self.customers_total,
            self.transactions_matching,
            self.transactions_total
        )
    }
}

impl Display for Report {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.rendered)
    }
}

/// Loads once and prints the table followed by the chart.
pub async fn show(config: Config, args: ViewArgs) -> Result<Out<Report>> {
    run(config, args, Part::All).await
}

/// Loads once and prints the table.
pub async fn table(config: Config, args: ViewArgs) -> Result<Out<Report>> {
    run(config, args, Part::Table).await
}

/// Loads once and prints the chart.
pub async fn chart(config: Config, args: ViewArgs) -> Result<Out<Report>> {
    run(config, args, Part::Chart).await
}

/// A failed load is not an error here: the report carries the message and renders empty results.
/// Only an unusable endpoint or a rendering failure is returned as `Err`.
async fn run(config: Config, args: ViewArgs, part: Part) -> Result<Out<Report>> {
    let source = config.source()?;
    let state = config.initial_state().load(source.as_ref()).await;
    let state = apply_args(state, &args);
    let report = Report::new(&state, part, args.format())?;
    Ok(Out::new(report.message(), report))
}

/// Applies the queries and scope given on the command line.
pub(super) fn apply_args(state: AppState, args: &ViewArgs) -> AppState {
    let state = state
        .apply(Event::NameQueryChanged(args.name().to_string()))
        .apply(Event::AmountQueryChanged(args.min_amount().to_string()));
    match args.amount_scope() {
        Some(scope) => state.apply(Event::AmountScopeChanged(scope)),
        None => state,
    }
}

/// Renders `part` of `view` in `format`.
///
/// - `Table`: a markdown table and a text chart, preceded by an error line when the load failed.
/// - `Csv`: the table rows and/or the per-customer totals, separated by a blank line.
/// - `Json`: an object with `error`, `table` and `chart` keys, the chart being Chart.js data.
pub fn render(view: &View<'_>, part: Part, format: OutputFormat) -> Result<String> {
    let with_table = part != Part::Chart;
    let with_chart = part != Part::Table;
    match format {
        OutputFormat::Table => {
            let mut sections = Vec::new();
            if let Some(error) = view.error {
                sections.push(format!("Error: {error}\n"));
            }
            if with_table {
                sections.push(table::to_markdown(&view.table));
            }
            if with_chart {
                sections.push(view.chart.render_text());
            }
            Ok(sections.join("\n"))
        }
        OutputFormat::Csv => {
            let mut sections = Vec::new();
            if with_table {
                sections.push(table::to_csv(&view.table)?);
            }
            if with_chart {
                sections.push(view.chart.to_csv()?);
            }
            Ok(sections.join("\n"))
        }
        OutputFormat::Json => {
            let mut object = Map::new();
            object.insert(
                "error".to_string(),
                view.error.map_or(Value::Null, |e| Value::String(e.to_string())),
            );
            if with_table {
                object.insert("table".to_string(), serde_json::to_value(&view.table)?);
            }
            if with_chart {
                object.insert("chart".to_string(), view.chart.to_chart_js());
            }
            let mut json = serde_json::to_string_pretty(&Value::Object(object))?;
            json.push('\n');
            Ok(json)
        }
    }
}
