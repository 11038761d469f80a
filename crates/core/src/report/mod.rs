//! Report module - the end-to-end pipeline and its export writers.

mod report_export;
mod report_model;
mod report_service;


pub use report_export::{export_report, ExportFormat};
pub use report_model::{CsvSource, PortfolioReport, ReportRequest, ReportWindow};
pub use report_service::ReportService;
