//! # aqdash
//!
//! Turns a CSV of hourly air-quality readings into a static dashboard page:
//! five PM2.5 summaries, each rendered as a chart next to its caption.

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod dashboard;
pub mod page;
pub mod sections;

pub use dashboard::{
    Dashboard, DashboardOutput, SectionOutcome, SectionStatus, INDEX_FILE, SUMMARY_FILE,
};
pub use page::{escape_html, render_page, PageContext};
pub use sections::SectionId;
