//! Chart series inference and session funnel aggregation behind a small JSON API.

pub mod columns;
pub mod config;
pub mod error;
pub mod export;
pub mod funnel;
pub mod models;
pub mod numeric;
pub mod paths;
pub mod projections;
pub mod series;
pub mod server;
pub mod source;
pub mod xaxis;

pub use columns::{detect_roles, ColumnRoles};
pub use config::AppConfig;
pub use error::AppError;
pub use funnel::{aggregate_flow, FlowParams, TimeWindow};
pub use models::{
    CategoricalSet, Direction, Event, FlowEdge, FlowGraph, Scalar, SeriesSet, TabularResult,
    XValue,
};
pub use series::{build_categorical, build_series, SeriesOptions};
pub use xaxis::resolve_x;
