use std::fs::{self, File};
use std::path::Path;

use crate::error::Error;
use crate::format::Formatter;
use crate::model::ResultSet;

// Utils to store run output on local device.
pub struct LocalSaver;

impl LocalSaver {
    pub fn save_results_as_json(path: &Path, results: &ResultSet) -> Result<(), Error> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(file, results)?;
        Ok(())
    }

    pub fn save_results_as_report(
        path: &Path,
        title: &str,
        results: &ResultSet,
    ) -> Result<(), Error> {
        fs::write(path, Formatter::to_report(title, results))?;
        Ok(())
    }
}
