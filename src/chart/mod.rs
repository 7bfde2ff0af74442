// src/chart/mod.rs

//! Chart mapper.
//!
//! Turns pipeline tables into [`ChartSpec`]s, a renderer-agnostic description
//! of what to draw. Backends implement [`ChartRenderer`]; see [`plotly`].

pub mod palette;
pub mod plotly;

use serde::Serialize;

use crate::domain::Record;
use crate::pipeline::{
    Composition, Dashboard, MonthlyTotal, OfficeLocationTotal, OfficeTotal, YearMonthTotal,
};

pub const NO_DATA: &str = "Sin datos";
pub const NO_MAP_DATA: &str = "Sin datos para el mapa";

const AXIS_AMOUNT: &str = "Recaudación";
const AXIS_TOTAL: &str = "Recaudación Total";
const AXIS_OFFICE: &str = "Aduana";
const AXIS_MONTH: &str = "Mes";

pub trait ChartRenderer {
    fn render(&self, spec: &ChartSpec) -> serde_json::Value;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    Horizontal,
    Vertical,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BarMode {
    Stacked,
    Grouped,
}

/// One colored trace. `labels` are categories, `values` the amounts.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Series {
    pub name: Option<String>,
    pub color: String,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Axes {
    pub x: String,
    pub y: String,
}

impl Axes {
    fn new(x: &str, y: &str) -> Self {
        Self {
            x: x.to_string(),
            y: y.to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Slice {
    pub label: String,
    pub value: f64,
    /// Percent of the pie total.
    pub share: f64,
    pub color: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MapPoint {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub amount: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChartSpec {
    Bar {
        orientation: Orientation,
        mode: BarMode,
        series: Vec<Series>,
        axes: Axes,
    },
    Line {
        series: Vec<Series>,
        axes: Axes,
        markers: bool,
    },
    Pie {
        title: Option<String>,
        slices: Vec<Slice>,
        /// Annotate each slice with its label and percentage.
        label_percent: bool,
    },
    BubbleMap {
        points: Vec<MapPoint>,
        color_scale: String,
        zoom: f64,
        height: u32,
        max_marker_size: f64,
        style: String,
    },
    Empty {
        title: String,
    },
}

impl ChartSpec {
    pub fn empty(title: &str) -> Self {
        ChartSpec::Empty {
            title: title.to_string(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, ChartSpec::Empty { .. })
    }
}

/// Horizontal bars per office, one trace per month (stacked), colored in
/// order of first appearance.
pub fn office_breakdown(rows: &[&Record]) -> ChartSpec {
    if rows.is_empty() {
        return ChartSpec::empty(NO_DATA);
    }
    let mut series: Vec<Series> = Vec::new();
    for r in rows {
        let month = r.month.to_string();
        let idx = match series.iter().position(|s| s.name.as_deref() == Some(month.as_str())) {
            Some(i) => i,
            None => {
                series.push(Series {
                    name: Some(month),
                    color: palette::comparative(series.len()).to_string(),
                    labels: Vec::new(),
                    values: Vec::new(),
                });
                series.len() - 1
            }
        };
        series[idx].labels.push(r.customs_office.clone());
        series[idx].values.push(r.collection_amount);
    }
    ChartSpec::Bar {
        orientation: Orientation::Horizontal,
        mode: BarMode::Stacked,
        series,
        axes: Axes::new(AXIS_AMOUNT, AXIS_OFFICE),
    }
}

pub fn monthly_line(rows: &[MonthlyTotal]) -> ChartSpec {
    if rows.is_empty() {
        return ChartSpec::empty(NO_DATA);
    }
    ChartSpec::Line {
        series: vec![Series {
            name: None,
            color: palette::PRIMARY.to_string(),
            labels: rows.iter().map(|r| r.month.to_string()).collect(),
            values: rows.iter().map(|r| r.amount).collect(),
        }],
        axes: Axes::new(AXIS_MONTH, AXIS_TOTAL),
        markers: true,
    }
}

/// Split (year, month) totals into one series per year, the year kept as a
/// category label.
fn year_series(rows: &[YearMonthTotal]) -> Vec<Series> {
    let mut years: Vec<i32> = rows.iter().map(|r| r.year).collect();
    years.sort_unstable();
    years.dedup();
    years
        .iter()
        .enumerate()
        .map(|(i, year)| {
            let label = year.to_string();
            let own = rows.iter().filter(|r| r.year == *year);
            Series {
                color: palette::year_color(&label, i).to_string(),
                name: Some(label),
                labels: own.clone().map(|r| r.month.to_string()).collect(),
                values: own.map(|r| r.amount).collect(),
            }
        })
        .collect()
}

pub fn variation_bars(rows: &[YearMonthTotal]) -> ChartSpec {
    if rows.is_empty() {
        return ChartSpec::empty(NO_DATA);
    }
    ChartSpec::Bar {
        orientation: Orientation::Vertical,
        mode: BarMode::Grouped,
        series: year_series(rows),
        axes: Axes::new(AXIS_MONTH, AXIS_TOTAL),
    }
}

pub fn composition_pie(comp: &Composition) -> ChartSpec {
    if comp.is_empty() {
        return ChartSpec::empty(NO_DATA);
    }
    let slices = comp
        .slices
        .iter()
        .zip(comp.shares())
        .enumerate()
        .map(|(i, (s, share))| Slice {
            label: s.tax_type.clone(),
            value: s.amount,
            share,
            color: palette::comparative(i).to_string(),
        })
        .collect();
    ChartSpec::Pie {
        title: Some(comp.year.to_string()),
        slices,
        label_percent: true,
    }
}

pub fn ranking_bars(rows: &[OfficeTotal]) -> ChartSpec {
    if rows.is_empty() {
        return ChartSpec::empty(NO_DATA);
    }
    ChartSpec::Bar {
        orientation: Orientation::Horizontal,
        mode: BarMode::Stacked,
        series: vec![Series {
            name: None,
            color: palette::PRIMARY.to_string(),
            labels: rows.iter().map(|r| r.customs_office.clone()).collect(),
            values: rows.iter().map(|r| r.amount).collect(),
        }],
        axes: Axes::new(AXIS_TOTAL, AXIS_OFFICE),
    }
}

pub fn series_lines(rows: &[YearMonthTotal]) -> ChartSpec {
    if rows.is_empty() {
        return ChartSpec::empty(NO_DATA);
    }
    ChartSpec::Line {
        series: year_series(rows),
        axes: Axes::new(AXIS_MONTH, AXIS_TOTAL),
        markers: true,
    }
}

pub fn office_map(rows: &[OfficeLocationTotal]) -> ChartSpec {
    if rows.is_empty() {
        return ChartSpec::empty(NO_MAP_DATA);
    }
    ChartSpec::BubbleMap {
        points: rows
            .iter()
            .map(|r| MapPoint {
                name: r.customs_office.clone(),
                latitude: r.latitude,
                longitude: r.longitude,
                amount: r.amount,
            })
            .collect(),
        color_scale: palette::MAP_SCALE.to_string(),
        zoom: 4.0,
        height: 600,
        max_marker_size: 70.0,
        style: "carto-positron".to_string(),
    }
}

/// A chart bound to the page container that displays it.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NamedChart {
    pub id: String,
    pub spec: ChartSpec,
}

/// All charts for one selection, in page order.
pub fn build_charts(d: &Dashboard<'_>) -> Vec<NamedChart> {
    let mut out = vec![
        named("recaudacion", office_breakdown(&d.by_office)),
        named("mensual", monthly_line(&d.monthly)),
        named("variacion", variation_bars(&d.variation)),
    ];
    for comp in &d.composition {
        out.push(named(&format!("pastel_{}", comp.year), composition_pie(comp)));
    }
    out.push(named("top10", ranking_bars(&d.top_offices)));
    out.push(named("serie", series_lines(&d.series)));
    out.push(named("mapa", office_map(&d.map)));
    out
}

fn named(id: &str, spec: ChartSpec) -> NamedChart {
    NamedChart {
        id: id.to_string(),
        spec,
    }
}
