//! Services Layer
//!
//! This module contains the circulation workflows extracted from HTTP
//! handlers. Services work against the repositories held in `AppState`.

pub mod catalog_service;
pub mod hold_service;
pub mod loan_service;
pub mod report_service;
