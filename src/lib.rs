//! Payroll engine for an HR management system.
//!
//! This crate computes monthly payslips from salary structures, itemized
//! pay items and penalties. Each payslip is released through a salary
//! voucher, and the payroll actions are served over an HTTP API.

#![warn(missing_docs)]

pub mod access;
pub mod api;
pub mod calculation;
pub mod clock;
pub mod config;
pub mod error;
pub mod models;
pub mod service;
pub mod store;
