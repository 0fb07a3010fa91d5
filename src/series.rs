//! Chart-ready series from arbitrary tabular results.
//!
//! Results with exactly three columns are read as `x, group, value` and become one
//! series per group. Anything else with at least two columns is read through
//! [`detect_roles`] as a single label/value series. Bar and pie charts use
//! [`build_categorical`].

use crate::columns::detect_roles;
use crate::models::{
    CategoricalItem, CategoricalSet, ChartPoint, LineStyle, Scalar, Series, SeriesSet,
    TabularResult,
};
use crate::numeric::coerce_number;
use crate::xaxis::resolve_x;

/// Options for line series
#[derive(Debug, Clone)]
pub struct SeriesOptions {
    /// Add a flat dashed line at the mean of the primary series
    pub include_trend: bool,
    /// Name for rows whose group or label is empty
    pub unknown_label: String,
    pub trend_label: String,
}

impl Default for SeriesOptions {
    fn default() -> Self {
        Self {
            include_trend: false,
            unknown_label: "Unknown".to_string(),
            trend_label: "Average".to_string(),
        }
    }
}

/// Build line series. Returns `None` when the result is not chartable
/// (fewer than two columns or no rows).
pub fn build_series(result: &TabularResult, options: &SeriesOptions) -> Option<SeriesSet> {
    if result.column_count() < 2 || result.is_empty() {
        tracing::debug!(
            columns = result.column_count(),
            rows = result.row_count(),
            "result is not chartable"
        );
        return None;
    }

    if result.column_count() == 3 {
        return Some(build_grouped(result, options));
    }

    let roles = detect_roles(result.columns(), &result.rows()[0])?;
    let points: Vec<ChartPoint> = result
        .rows()
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let x_raw = &row[roles.label_index];
            let y = coerce_number(&row[roles.value_index]);
            point(x_raw, i, y)
        })
        .collect();

    let mut series = vec![Series {
        name: roles.value_key.clone(),
        style: LineStyle::Solid,
        points,
    }];

    if options.include_trend {
        if let Some(trend) = trend_line(&series[0], &options.trend_label) {
            series.push(trend);
        }
    }

    Some(SeriesSet { series })
}

/// Column 0 is x, column 1 the group key, column 2 the value. Groups keep first-seen
/// order and each resolves positional x against its own length.
fn build_grouped(result: &TabularResult, options: &SeriesOptions) -> SeriesSet {
    let mut series: Vec<Series> = Vec::new();

    for row in result.rows() {
        let key = group_label(&row[1], &options.unknown_label);
        let idx = match series.iter().position(|s| s.name == key) {
            Some(idx) => idx,
            None => {
                series.push(Series {
                    name: key,
                    style: LineStyle::Solid,
                    points: Vec::new(),
                });
                series.len() - 1
            }
        };

        let target = &mut series[idx];
        let y = coerce_number(&row[2]);
        let p = point(&row[0], target.points.len(), y);
        target.points.push(p);
    }

    SeriesSet { series }
}

fn point(x_raw: &Scalar, position: usize, y: f64) -> ChartPoint {
    ChartPoint {
        x: resolve_x(x_raw, position),
        y,
        callout_label: x_raw.display(),
        callout_value: y.to_string(),
    }
}

/// Flat reference line over the same x domain as `primary`
fn trend_line(primary: &Series, name: &str) -> Option<Series> {
    if primary.points.is_empty() {
        return None;
    }
    let mean = primary.points.iter().map(|p| p.y).sum::<f64>() / primary.points.len() as f64;
    let callout = format!("{:.2}", mean);

    Some(Series {
        name: name.to_string(),
        style: LineStyle::Dashed,
        points: primary
            .points
            .iter()
            .map(|p| ChartPoint {
                x: p.x.clone(),
                y: mean,
                callout_label: p.callout_label.clone(),
                callout_value: callout.clone(),
            })
            .collect(),
    })
}

fn group_label(value: &Scalar, unknown: &str) -> String {
    let text = value.display();
    if text.trim().is_empty() {
        unknown.to_string()
    } else {
        text
    }
}

/// Label/value set for bar and pie charts.
///
/// Unparseable values count as 0. Percentages are in percent of the summed values,
/// all 0 when that sum is 0.
pub fn build_categorical(result: &TabularResult, unknown_label: &str) -> Option<CategoricalSet> {
    if result.is_empty() {
        return None;
    }
    let roles = detect_roles(result.columns(), &result.rows()[0])?;

    let values: Vec<f64> = result
        .rows()
        .iter()
        .map(|row| coerce_number(&row[roles.value_index]))
        .collect();
    let total: f64 = values.iter().sum();

    let items = result
        .rows()
        .iter()
        .zip(&values)
        .map(|(row, &value)| {
            let (percent_of_total, callout) = if total != 0.0 {
                let pct = value / total * 100.0;
                (pct, format!("{} ({:.1}%)", value, pct))
            } else {
                (0.0, format!("{} (0%)", value))
            };
            CategoricalItem {
                label: group_label(&row[roles.label_index], unknown_label),
                value,
                percent_of_total,
                callout,
            }
        })
        .collect();

    Some(CategoricalSet {
        label_key: roles.label_key,
        value_key: roles.value_key,
        total,
        items,
    })
}
