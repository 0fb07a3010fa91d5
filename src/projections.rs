//! Projects a query result (or event log) into the payload for one chart view.
//!
//! Views that can be answered from the request alone resolve immediately. A funnel
//! request without events comes back as a [`PendingAction`] for the caller to
//! complete against the event store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::config::{AppConfig, FunnelConfig};
use crate::error::AppError;
use crate::funnel::{aggregate_flow, FlowParams, TimeWindow};
use crate::models::{Direction, Event, FlowGraph, TabularResult};
use crate::series::{build_categorical, build_series};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartView {
    Table,
    Line,
    Bar,
    Pie,
    Funnel,
}

/// Funnel request; every parameter is optional and falls back to [`FunnelConfig`]
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FlowRequest {
    #[serde(default)]
    pub events: Option<Vec<Event>>,
    #[serde(default)]
    pub anchor: Option<String>,
    #[serde(default)]
    pub steps: Option<usize>,
    #[serde(default)]
    pub limit: Option<usize>,
    #[serde(default)]
    pub direction: Option<Direction>,
    #[serde(default)]
    pub start: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end: Option<DateTime<Utc>>,
}

impl FlowRequest {
    /// Fill in defaults: anchor `/`, window of `window_days` ending at `end` or now.
    pub fn resolve(&self, defaults: &FunnelConfig, now: DateTime<Utc>) -> Result<FlowParams, AppError> {
        let end = self.end.unwrap_or(now);
        let window = match self.start {
            Some(start) => TimeWindow::new(start, end),
            None => TimeWindow::ending_at(end, defaults.window_days),
        };
        if window.start > window.end {
            return Err(AppError::InvalidRequest(format!(
                "start {} is after end {}",
                window.start.to_rfc3339(),
                window.end.to_rfc3339()
            )));
        }

        let anchor = self
            .anchor
            .as_deref()
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .unwrap_or("/");

        Ok(FlowParams::new(
            anchor,
            self.steps.unwrap_or(defaults.steps),
            self.limit.unwrap_or(defaults.limit),
            self.direction.unwrap_or_default(),
            window,
        ))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct QueryRequest {
    pub view: ChartView,
    #[serde(default)]
    pub rows: Vec<Map<String, Value>>,
    #[serde(default)]
    pub include_trend: bool,
    #[serde(default)]
    pub funnel: Option<FlowRequest>,
}

/// Work left for the next stage
#[derive(Debug, Clone, PartialEq)]
pub enum PendingAction {
    /// Load events for these parameters and aggregate them
    LoadFlow(FlowParams),
}

#[derive(Debug, Clone)]
pub struct Projection {
    pub view: ChartView,
    /// `None` when there is nothing to render (or the work is still pending)
    pub data: Option<Value>,
    pub pending: Option<PendingAction>,
}

impl Projection {
    fn ready(view: ChartView, data: Option<Value>) -> Self {
        Self {
            view,
            data,
            pending: None,
        }
    }
}

/// Graph plus its Sankey layout, or `None` for an empty funnel
pub fn flow_payload(graph: &FlowGraph) -> Option<Value> {
    if graph.is_empty() {
        return None;
    }
    Some(json!({
        "graph": graph,
        "sankey": graph.to_sankey(),
    }))
}

pub struct Projector<'a> {
    config: &'a AppConfig,
}

impl<'a> Projector<'a> {
    pub fn new(config: &'a AppConfig) -> Self {
        Self { config }
    }

    pub fn project(&self, request: &QueryRequest, now: DateTime<Utc>) -> Result<Projection, AppError> {
        let view = request.view;
        let result = TabularResult::from_records(&request.rows);
        let charts = &self.config.charts;

        let projection = match view {
            ChartView::Table => Projection::ready(
                view,
                Some(json!({
                    "columns": result.columns(),
                    "rows": result.to_records(),
                    "total": result.row_count(),
                })),
            ),
            ChartView::Line => {
                let options = charts.series_options(request.include_trend);
                let data = build_series(&result, &options).map(|set| json!(set));
                Projection::ready(view, data)
            }
            ChartView::Bar | ChartView::Pie => {
                let data = build_categorical(&result, &charts.unknown_label).map(|set| json!(set));
                Projection::ready(view, data)
            }
            ChartView::Funnel => {
                let flow = request.funnel.clone().unwrap_or_default();
                let params = flow.resolve(&self.config.funnel, now)?;
                match &flow.events {
                    Some(events) => {
                        let graph = aggregate_flow(events, &params);
                        Projection::ready(view, flow_payload(&graph))
                    }
                    None => Projection {
                        view,
                        data: None,
                        pending: Some(PendingAction::LoadFlow(params)),
                    },
                }
            }
        };

        Ok(projection)
    }
}
