use serde_json::{json, Value};

use super::{Axes, BarMode, ChartRenderer, ChartSpec, MapPoint, Orientation, Series};

/// Emits plotly.js figure objects (`{"data": [...], "layout": {...}}`).
#[derive(Debug, Default, Clone, Copy)]
pub struct PlotlyRenderer;

impl ChartRenderer for PlotlyRenderer {
    fn render(&self, spec: &ChartSpec) -> Value {
        match spec {
            ChartSpec::Bar {
                orientation,
                mode,
                series,
                axes,
            } => {
                let data: Vec<Value> = series.iter().map(|s| bar_trace(s, *orientation)).collect();
                let mut layout = white_layout(axes);
                layout["barmode"] = json!(match mode {
                    BarMode::Stacked => "relative",
                    BarMode::Grouped => "group",
                });
                layout["showlegend"] = json!(series.iter().any(|s| s.name.is_some()));
                json!({ "data": data, "layout": layout })
            }
            ChartSpec::Line {
                series,
                axes,
                markers,
            } => {
                let mode = if *markers { "lines+markers" } else { "lines" };
                let data: Vec<Value> = series
                    .iter()
                    .map(|s| {
                        json!({
                            "type": "scatter",
                            "mode": mode,
                            "name": s.name,
                            "x": s.labels,
                            "y": s.values,
                            "line": { "color": s.color },
                            "marker": { "color": s.color },
                        })
                    })
                    .collect();
                let mut layout = white_layout(axes);
                layout["showlegend"] = json!(series.iter().any(|s| s.name.is_some()));
                json!({ "data": data, "layout": layout })
            }
            ChartSpec::Pie {
                title,
                slices,
                label_percent,
            } => {
                let mut trace = json!({
                    "type": "pie",
                    "labels": slices.iter().map(|s| &s.label).collect::<Vec<_>>(),
                    "values": slices.iter().map(|s| s.value).collect::<Vec<_>>(),
                    "marker": { "colors": slices.iter().map(|s| &s.color).collect::<Vec<_>>() },
                });
                if *label_percent {
                    trace["textinfo"] = json!("percent+label");
                }
                let mut layout = json!({ "paper_bgcolor": "white" });
                if let Some(t) = title {
                    layout["title"] = json!({ "text": t });
                }
                json!({ "data": [trace], "layout": layout })
            }
            ChartSpec::BubbleMap {
                points,
                color_scale,
                zoom,
                height,
                max_marker_size,
                style,
            } => bubble_map(points, color_scale, *zoom, *height, *max_marker_size, style),
            ChartSpec::Empty { title } => json!({
                "data": [],
                "layout": { "title": { "text": title } },
            }),
        }
    }
}

fn bar_trace(s: &Series, orientation: Orientation) -> Value {
    let (x, y, o) = match orientation {
        Orientation::Horizontal => (json!(s.values), json!(s.labels), "h"),
        Orientation::Vertical => (json!(s.labels), json!(s.values), "v"),
    };
    json!({
        "type": "bar",
        "orientation": o,
        "name": s.name,
        "x": x,
        "y": y,
        "marker": { "color": s.color },
    })
}

/// Plain white background with light grid lines.
fn white_layout(axes: &Axes) -> Value {
    json!({
        "paper_bgcolor": "white",
        "plot_bgcolor": "white",
        "xaxis": { "title": { "text": axes.x }, "gridcolor": "#EBF0F8", "zerolinecolor": "#EBF0F8" },
        "yaxis": { "title": { "text": axes.y }, "gridcolor": "#EBF0F8", "zerolinecolor": "#EBF0F8" },
    })
}

fn bubble_map(
    points: &[MapPoint],
    color_scale: &str,
    zoom: f64,
    height: u32,
    max_marker_size: f64,
    style: &str,
) -> Value {
    let amounts: Vec<f64> = points.iter().map(|p| p.amount).collect();
    let max = amounts.iter().copied().fold(0.0_f64, f64::max);
    // area sizing: the largest bubble gets `max_marker_size` pixels across
    let sizeref = if max > 0.0 {
        2.0 * max / (max_marker_size * max_marker_size)
    } else {
        1.0
    };
    let n = points.len().max(1) as f64;
    let center_lat = points.iter().map(|p| p.latitude).sum::<f64>() / n;
    let center_lon = points.iter().map(|p| p.longitude).sum::<f64>() / n;

    json!({
        "data": [{
            "type": "scattermapbox",
            "lat": points.iter().map(|p| p.latitude).collect::<Vec<_>>(),
            "lon": points.iter().map(|p| p.longitude).collect::<Vec<_>>(),
            "text": points.iter().map(|p| &p.name).collect::<Vec<_>>(),
            "hovertemplate": "<b>%{text}</b><br>Recaudación=%{marker.color}<extra></extra>",
            "marker": {
                "size": amounts.iter().map(|a| a.max(0.0)).collect::<Vec<_>>(),
                "sizemode": "area",
                "sizeref": sizeref,
                "color": amounts,
                "colorscale": color_scale,
                "showscale": true,
                "colorbar": { "title": { "text": "Recaudación" } },
            },
        }],
        "layout": {
            "height": height,
            "mapbox": {
                "style": style,
                "zoom": zoom,
                "center": { "lat": center_lat, "lon": center_lon },
            },
            "margin": { "l": 0, "r": 0, "t": 30, "b": 0 },
        },
    })
}
