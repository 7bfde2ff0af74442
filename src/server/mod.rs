// src/server/mod.rs

//! HTTP shell around the pipeline.
//!
//! The dataset is built once in `main` and handed to every handler through
//! [`with_state`]; each request parses its own [`FilterSelection`] and runs
//! the whole pipeline synchronously.

pub mod page;

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::{convert::Infallible, net::SocketAddr, path::PathBuf, sync::Arc};
use tracing::info;
use warp::{http::StatusCode, reject::Rejection, reply::Reply, Filter};

use crate::chart::{build_charts, plotly::PlotlyRenderer, ChartRenderer};
use crate::domain::{Dataset, FilterSelection, Month, MonthLabel, ReportingPolicy};
use crate::pipeline::Dashboard;

/// Read-only state shared by all requests.
pub struct AppState {
    pub dataset: Arc<Dataset>,
    pub policy: ReportingPolicy,
    pub defaults: FilterSelection,
    pub loaded_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(dataset: Arc<Dataset>, policy: ReportingPolicy) -> Result<Self> {
        let defaults = dataset
            .default_selection()
            .ok_or_else(|| anyhow!("dataset has no rows to derive default filters from"))?;
        Ok(Self {
            dataset,
            policy,
            defaults,
            loaded_at: Utc::now(),
        })
    }
}

/// Query string of the chart endpoints. Absent fields fall back to defaults.
#[derive(Debug, Default, Deserialize)]
pub struct ChartQuery {
    pub impuesto: Option<String>,
    pub anio: Option<String>,
    pub mes: Option<String>,
}

impl ChartQuery {
    pub fn selection(&self, defaults: &FilterSelection) -> Result<FilterSelection, String> {
        let tax_type = match non_blank(&self.impuesto) {
            Some(t) => t.to_string(),
            None => defaults.tax_type.clone(),
        };
        let year = match non_blank(&self.anio) {
            Some(y) => y
                .parse::<i32>()
                .map_err(|_| format!("`anio` must be an integer year, got {y:?}"))?,
            None => defaults.year,
        };
        let month = non_blank(&self.mes).map(MonthLabel::parse);
        Ok(FilterSelection::new(tax_type, year, month))
    }
}

fn non_blank(v: &Option<String>) -> Option<&str> {
    v.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    details: Option<String>,
}

#[derive(Serialize)]
struct ChartsResponse {
    selection: FilterSelection,
    charts: Map<String, Value>,
}

#[derive(Serialize)]
struct OptionsResponse<'a> {
    tax_types: &'a [String],
    years: &'a [i32],
    months: Vec<&'static str>,
    default: &'a FilterSelection,
    comparison_years: &'a [i32],
    /// First and last month of the comparison window, e.g. `["Enero", "Julio"]`.
    window: Vec<&'static str>,
}

pub fn with_state(
    state: Arc<AppState>,
) -> impl Filter<Extract = (Arc<AppState>,), Error = Infallible> + Clone {
    warp::any().map(move || Arc::clone(&state))
}

async fn health_check(state: Arc<AppState>) -> Result<impl Reply, Rejection> {
    Ok(warp::reply::json(&serde_json::json!({
        "status": "healthy",
        "service": "recaudacion-dashboard",
        "rows": state.dataset.len(),
        "tax_types": state.dataset.tax_types().len(),
        "years": state.dataset.years(),
        "loaded_at": state.loaded_at,
    })))
}

async fn filter_options(state: Arc<AppState>) -> Result<impl Reply, Rejection> {
    Ok(warp::reply::json(&OptionsResponse {
        tax_types: state.dataset.tax_types(),
        years: state.dataset.years(),
        months: Month::ALL.iter().map(|m| m.as_str()).collect(),
        default: &state.defaults,
        comparison_years: &state.policy.comparison_years,
        window: window_bounds(state.policy.reporting_months),
    }))
}

fn window_bounds(months: usize) -> Vec<&'static str> {
    let window = Month::first(months);
    match (window.first(), window.last()) {
        (Some(a), Some(b)) => vec![a.as_str(), b.as_str()],
        _ => Vec::new(),
    }
}

fn bad_request(message: String) -> warp::reply::Response {
    warp::reply::with_status(
        warp::reply::json(&ErrorResponse {
            error: "invalid filter".to_string(),
            details: Some(message),
        }),
        StatusCode::BAD_REQUEST,
    )
    .into_response()
}

/// Rendered plotly figures for every chart.
async fn render_charts(q: ChartQuery, state: Arc<AppState>) -> Result<warp::reply::Response, Rejection> {
    let sel = match q.selection(&state.defaults) {
        Ok(s) => s,
        Err(msg) => return Ok(bad_request(msg)),
    };
    let dashboard = Dashboard::compute(&state.dataset, &sel, &state.policy);
    let renderer = PlotlyRenderer;
    let charts = build_charts(&dashboard)
        .into_iter()
        .map(|c| (c.id, renderer.render(&c.spec)))
        .collect();
    Ok(warp::reply::json(&ChartsResponse {
        selection: sel,
        charts,
    })
    .into_response())
}

/// Renderer-agnostic chart specs for every chart.
async fn render_specs(q: ChartQuery, state: Arc<AppState>) -> Result<warp::reply::Response, Rejection> {
    let sel = match q.selection(&state.defaults) {
        Ok(s) => s,
        Err(msg) => return Ok(bad_request(msg)),
    };
    let dashboard = Dashboard::compute(&state.dataset, &sel, &state.policy);
    let charts = build_charts(&dashboard)
        .into_iter()
        .map(|c| (c.id, serde_json::to_value(&c.spec).unwrap_or(Value::Null)))
        .collect();
    Ok(warp::reply::json(&ChartsResponse {
        selection: sel,
        charts,
    })
    .into_response())
}

/// All routes of the dashboard.
pub fn routes(
    state: Arc<AppState>,
    assets_dir: PathBuf,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    let index = warp::path::end()
        .and(warp::get())
        .map(|| warp::reply::html(page::INDEX_HTML));

    let health = warp::path("health")
        .and(warp::path::end())
        .and(warp::get())
        .and(with_state(state.clone()))
        .and_then(health_check);

    let options = warp::path!("api" / "options")
        .and(warp::get())
        .and(with_state(state.clone()))
        .and_then(filter_options);

    let charts = warp::path!("api" / "charts")
        .and(warp::get())
        .and(warp::query::<ChartQuery>())
        .and(with_state(state.clone()))
        .and_then(render_charts);

    let specs = warp::path!("api" / "specs")
        .and(warp::get())
        .and(warp::query::<ChartQuery>())
        .and(with_state(state))
        .and_then(render_specs);

    let assets = warp::path("assets").and(warp::fs::dir(assets_dir));

    index
        .or(health)
        .or(options)
        .or(charts)
        .or(specs)
        .or(assets)
        .with(warp::trace::request())
}

/// Bind `addr` and serve until the process exits.
pub async fn serve(state: Arc<AppState>, assets_dir: PathBuf, addr: SocketAddr) {
    info!("Server starting on http://{}", addr);
    info!("Health check: http://{}/health", addr);
    warp::serve(routes(state, assets_dir)).run(addr).await;
}
