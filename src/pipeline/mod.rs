// src/pipeline/mod.rs

//! Aggregation pipeline.
//!
//! Every recipe is a pure function of the dataset, the user's selection and
//! the reporting policy. A selection that matches nothing yields an empty
//! table, never an error.

pub mod group;

use serde::Serialize;
use tracing::debug;

use crate::domain::{Dataset, FilterSelection, MonthLabel, Record, ReportingPolicy};
use group::{sum_by, Coord};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MonthlyTotal {
    pub month: MonthLabel,
    pub amount: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct YearMonthTotal {
    pub year: i32,
    pub month: MonthLabel,
    pub amount: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub tax_type: String,
    pub amount: f64,
}

/// Real-tax breakdown for one year.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Composition {
    pub year: i32,
    pub slices: Vec<CategoryTotal>,
}

impl Composition {
    pub fn total(&self) -> f64 {
        self.slices.iter().map(|s| s.amount).sum()
    }

    /// Percentage of the year total held by each slice, in slice order.
    pub fn shares(&self) -> Vec<f64> {
        let total = self.total();
        self.slices
            .iter()
            .map(|s| if total == 0.0 { 0.0 } else { s.amount / total * 100.0 })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OfficeTotal {
    pub customs_office: String,
    pub amount: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OfficeLocationTotal {
    pub customs_office: String,
    pub latitude: f64,
    pub longitude: f64,
    pub amount: f64,
}

/// Rows matching tax type, year and (if set) month, unaggregated.
pub fn by_office<'a>(ds: &'a Dataset, sel: &FilterSelection) -> Vec<&'a Record> {
    ds.records().iter().filter(|r| sel.matches(r)).collect()
}

/// Per-month totals for the selected tax type and year, in calendar order.
/// The month selector is ignored.
pub fn monthly_totals(ds: &Dataset, sel: &FilterSelection) -> Vec<MonthlyTotal> {
    let rows = ds
        .records()
        .iter()
        .filter(|r| r.tax_type == sel.tax_type && r.year == sel.year);
    sum_by(rows, |r| r.month.clone())
        .into_iter()
        .map(|(month, amount)| MonthlyTotal { month, amount })
        .collect()
}

/// Totals per (year, month) for the comparison years within the reporting
/// window, ordered by month then year. Backs both the grouped-bar variation
/// chart and the two-year time series.
pub fn comparison_series(ds: &Dataset, policy: &ReportingPolicy) -> Vec<YearMonthTotal> {
    let rows = ds.records().iter().filter(|r| {
        policy.is_comparison_year(r.year) && r.month.within_first(policy.reporting_months)
    });
    sum_by(rows, |r| (r.month.clone(), r.year))
        .into_iter()
        .map(|((month, year), amount)| YearMonthTotal { year, month, amount })
        .collect()
}

/// Inflation-adjusted tax mix per comparison year over the reporting window.
/// One entry per comparison year, in policy order; a year with no data has
/// no slices.
pub fn real_tax_composition(ds: &Dataset, policy: &ReportingPolicy) -> Vec<Composition> {
    policy
        .comparison_years
        .iter()
        .map(|&year| {
            let rows = ds.records().iter().filter(|r| {
                r.year == year
                    && r.month.within_first(policy.reporting_months)
                    && policy.is_real_tax_type(&r.tax_type)
            });
            let slices = sum_by(rows, |r| r.tax_type.clone())
                .into_iter()
                .map(|(tax_type, amount)| CategoryTotal { tax_type, amount })
                .collect();
            Composition { year, slices }
        })
        .collect()
}

/// Largest offices by total over the reporting window of the selected year,
/// all tax types combined.
///
/// Groups are first ordered by office name; the stable descending sort then
/// keeps that order among equal totals.
pub fn top_offices(ds: &Dataset, sel: &FilterSelection, policy: &ReportingPolicy) -> Vec<OfficeTotal> {
    let rows = ds
        .records()
        .iter()
        .filter(|r| r.year == sel.year && r.month.within_first(policy.reporting_months));
    let mut totals: Vec<OfficeTotal> = sum_by(rows, |r| r.customs_office.clone())
        .into_iter()
        .map(|(customs_office, amount)| OfficeTotal {
            customs_office,
            amount,
        })
        .collect();
    totals.sort_by(|a, b| b.amount.total_cmp(&a.amount));
    totals.truncate(policy.top_offices);
    totals
}

/// One point per office for the recipe-1 filter. Rows without usable
/// coordinates are left out.
pub fn office_locations(ds: &Dataset, sel: &FilterSelection) -> Vec<OfficeLocationTotal> {
    let rows = ds
        .records()
        .iter()
        .filter(|r| sel.matches(r) && r.latitude.is_finite() && r.longitude.is_finite());
    sum_by(rows, |r| {
        (r.customs_office.clone(), Coord(r.latitude), Coord(r.longitude))
    })
    .into_iter()
    .map(|((customs_office, lat, lon), amount)| OfficeLocationTotal {
        customs_office,
        latitude: lat.0,
        longitude: lon.0,
        amount,
    })
    .collect()
}

/// Every table the dashboard draws for one selection.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Dashboard<'a> {
    pub by_office: Vec<&'a Record>,
    pub monthly: Vec<MonthlyTotal>,
    pub variation: Vec<YearMonthTotal>,
    pub composition: Vec<Composition>,
    pub top_offices: Vec<OfficeTotal>,
    pub series: Vec<YearMonthTotal>,
    pub map: Vec<OfficeLocationTotal>,
}

impl<'a> Dashboard<'a> {
    pub fn compute(ds: &'a Dataset, sel: &FilterSelection, policy: &ReportingPolicy) -> Self {
        let comparison = comparison_series(ds, policy);
        let dashboard = Self {
            by_office: by_office(ds, sel),
            monthly: monthly_totals(ds, sel),
            variation: comparison.clone(),
            composition: real_tax_composition(ds, policy),
            top_offices: top_offices(ds, sel, policy),
            series: comparison,
            map: office_locations(ds, sel),
        };
        debug!(
            tax_type = %sel.tax_type,
            year = sel.year,
            month = ?sel.month,
            matched = dashboard.by_office.len(),
            "dashboard recomputed"
        );
        dashboard
    }
}
