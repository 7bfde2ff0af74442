/// Brand color used for single-series charts and the page chrome.
pub const PRIMARY: &str = "#9F2241";

/// Categorical palette, cycled for multi-series charts.
pub const COMPARATIVE: [&str; 4] = ["#9F2241", "#691C32", "#BC955C", "#DDC9A3"];

/// Year colors pinned by label, whatever their numeric order.
pub const YEAR_COLORS: [(&str, &str); 2] = [("2024", "#DDC9A3"), ("2025", "#9F2241")];

/// Continuous scale for the map bubbles.
pub const MAP_SCALE: &str = "Reds";

pub fn comparative(i: usize) -> &'static str {
    COMPARATIVE[i % COMPARATIVE.len()]
}

/// Pinned color for a year label, or the `fallback`-th comparative color.
pub fn year_color(label: &str, fallback: usize) -> &'static str {
    YEAR_COLORS
        .iter()
        .find(|(year, _)| *year == label)
        .map(|(_, color)| *color)
        .unwrap_or_else(|| comparative(fallback))
}
