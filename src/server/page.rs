/// The dashboard page. Controls and chart containers are static; the script
/// pulls `/api/options` once and `/api/charts` on every selector change.
pub const INDEX_HTML: &str = include_str!("index.html");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_has_a_container_per_chart() {
        for id in [
            "grafico-recaudacion",
            "grafico-mensual",
            "grafico-variacion",
            "pasteles",
            "grafico-top10",
            "grafico-serie",
            "grafico-mapa",
        ] {
            assert!(INDEX_HTML.contains(id), "missing container {id}");
        }
    }

    #[test]
    fn year_titles_are_filled_from_options() {
        assert!(!INDEX_HTML.contains("grafico-pastel-2024"));
        assert_eq!(INDEX_HTML.matches("data-title=").count(), 3);
        assert!(INDEX_HTML.contains("opts.comparison_years"));
    }

    #[test]
    fn page_has_three_selectors() {
        for id in ["dropdown-impuesto", "dropdown-anio", "dropdown-mes"] {
            assert!(INDEX_HTML.contains(id), "missing selector {id}");
        }
    }
}
