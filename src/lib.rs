// src/lib.rs

//! Customs-tax collection dashboard.
//!
//! The spreadsheet is loaded once into an immutable [`domain::Dataset`], the
//! [`pipeline`] turns a [`domain::FilterSelection`] into result tables, the
//! [`chart`] module maps those tables to renderer-agnostic chart specs and the
//! [`server`] exposes everything over HTTP.

pub mod chart;
pub mod config;
pub mod domain;
pub mod load;
pub mod pipeline;
pub mod server;
