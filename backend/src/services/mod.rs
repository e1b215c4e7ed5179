//! Module for core business logic services.
//!
//! This module holds the static route table, the navigation surface built on
//! top of it, and the small calculations behind the persisted pages.

pub mod bmi;
pub mod navigation;
pub mod route_table;
