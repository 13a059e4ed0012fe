// Queries the arXiv search API for papers matching a boolean keyword/category
// filter over a date window, splits results into newly-submitted and
// recently-updated sets, and renders them as JSON and/or a markdown report.

pub mod config;
pub mod error;
pub mod format;
pub mod model;
pub mod parser;
pub mod query;
pub mod storage;

pub use error::Error;
