// src/domain/mod.rs

//! Core data model: records, the immutable dataset, the user's filter
//! selection and the reporting-period policy.

pub mod month;
pub mod policy;

pub use month::{Month, MonthLabel};
pub use policy::ReportingPolicy;

use serde::Serialize;

/// One row of the collection panel.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Record {
    pub tax_type: String,
    pub year: i32,
    pub month: MonthLabel,
    pub customs_office: String,
    pub collection_amount: f64,
    pub latitude: f64,
    pub longitude: f64,
}

/// Immutable, process-wide table of records.
///
/// Built once by the loader and shared behind an `Arc`; nothing mutates it
/// afterwards.
#[derive(Clone, Debug, PartialEq)]
pub struct Dataset {
    records: Vec<Record>,
    tax_types: Vec<String>,
    years: Vec<i32>,
}

impl Dataset {
    pub fn new(records: Vec<Record>) -> Self {
        let mut tax_types: Vec<String> = Vec::new();
        let mut years: Vec<i32> = Vec::new();
        for r in &records {
            if !tax_types.contains(&r.tax_type) {
                tax_types.push(r.tax_type.clone());
            }
            if !years.contains(&r.year) {
                years.push(r.year);
            }
        }
        Self {
            records,
            tax_types,
            years,
        }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Distinct tax types in first-appearance order.
    pub fn tax_types(&self) -> &[String] {
        &self.tax_types
    }

    /// Distinct years in first-appearance order.
    pub fn years(&self) -> &[i32] {
        &self.years
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// First tax type and first year encountered, no month filter.
    pub fn default_selection(&self) -> Option<FilterSelection> {
        Some(FilterSelection {
            tax_type: self.tax_types.first()?.clone(),
            year: *self.years.first()?,
            month: None,
        })
    }
}

/// Current user slice. `month == None` means all months.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FilterSelection {
    pub tax_type: String,
    pub year: i32,
    pub month: Option<MonthLabel>,
}

impl FilterSelection {
    pub fn new(tax_type: impl Into<String>, year: i32, month: Option<MonthLabel>) -> Self {
        Self {
            tax_type: tax_type.into(),
            year,
            month,
        }
    }

    /// Tax type and year match, and month too when one is selected.
    pub fn matches(&self, r: &Record) -> bool {
        r.tax_type == self.tax_type
            && r.year == self.year
            && self.month.as_ref().map_or(true, |m| *m == r.month)
    }
}
