use anyhow::{Context, Result};
use recaudacion::{
    config::Settings,
    domain::{FilterSelection, MonthLabel, ReportingPolicy},
    load::load_dataset,
    pipeline::Dashboard,
};
use std::{env, fmt::Write as _, path::Path, process::exit};

fn main() {
    // Usage: panel_report <FILE> [TAX] [YEAR] [MONTH]
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 || args.len() > 5 {
        eprintln!("Usage: {} <PANEL_FILE> [TAX_TYPE] [YEAR] [MONTH]", args[0]);
        exit(1);
    }
    let result = Settings::from_env()
        .and_then(|settings| report(Path::new(&args[1]), &args[2..], &settings.policy));
    match result {
        Ok(out) => print!("{}", out),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            exit(1);
        }
    }
}

/// Load the panel and compute every table for the selection, rendered as a
/// short summary followed by the tables as JSON. `policy` is the one the
/// server would use, so both show the same numbers.
fn report(path: &Path, filters: &[String], policy: &ReportingPolicy) -> Result<String> {
    let dataset = load_dataset(path)?;
    let defaults = dataset.default_selection().context("panel has no rows")?;

    let selection = FilterSelection::new(
        filters.first().cloned().unwrap_or(defaults.tax_type),
        match filters.get(1) {
            Some(y) => y.parse().with_context(|| format!("YEAR must be an integer, got {y:?}"))?,
            None => defaults.year,
        },
        filters.get(2).map(|m| MonthLabel::parse(m)),
    );

    let mut out = String::new();
    writeln!(out, "=== Panel: {} ===", path.display())?;
    writeln!(out, "Rows:       {}", dataset.len())?;
    writeln!(out, "Tax types:  {}", dataset.tax_types().join(", "))?;
    writeln!(out, "Years:      {:?}", dataset.years())?;
    writeln!(out, "Selection:  {:?}", selection)?;
    writeln!(out)?;

    let dashboard = Dashboard::compute(&dataset, &selection, policy);
    writeln!(out, "{}", serde_json::to_string_pretty(&dashboard)?)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    #[test]
    fn tables_follow_the_given_policy() {
        let mut file = Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "Impuesto,Año,Mes,Aduana,Recaudación,Latitud,Longitud").unwrap();
        writeln!(file, "IVA,2030,Enero,A,100,19.0,-99.0").unwrap();
        writeln!(file, "IVA,2030,Enero,B,50,20.0,-100.0").unwrap();
        let policy = ReportingPolicy {
            comparison_years: vec![2030],
            top_offices: 1,
            ..ReportingPolicy::default()
        };

        let out = report(file.path(), &[], &policy).unwrap();
        let tables = &out[out.find("\n\n").unwrap()..];
        let json: serde_json::Value = serde_json::from_str(tables).unwrap();
        assert_eq!(json["top_offices"].as_array().unwrap().len(), 1);
        assert_eq!(json["top_offices"][0]["customs_office"], "A");
    }

    #[test]
    fn bad_year_argument_is_an_error() {
        let mut file = Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "Impuesto,Año,Mes,Aduana,Recaudación,Latitud,Longitud").unwrap();
        writeln!(file, "IVA,2024,Enero,A,100,19.0,-99.0").unwrap();
        let args = vec!["IVA".to_string(), "dos mil".to_string()];
        let err = report(file.path(), &args, &ReportingPolicy::default()).unwrap_err();
        assert!(format!("{err:#}").contains("YEAR"));
    }
}
