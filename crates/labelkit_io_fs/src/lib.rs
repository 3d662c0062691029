//! `labelkit_io_fs` v1:
//! Directory scanning for spreadsheet inventories.
//!
//! Modules:
//! - `scan`   : directory enumeration and file selection
//! - `spec`   : enums/options/errors
//! - `report` : scan result model
//! - `util`   : shared helper functions

pub mod report;
pub mod scan;
pub mod spec;
mod util;

pub use report::{ReportScan, ReportScanBuilder};
pub use scan::scan_dir;
pub use spec::{EnumScanPatternMode, ScanDirError, SpecScanOptions};
