use log::info;
use std::fs;
use std::path::{Path, PathBuf};

use super::sheet::Sheet;
use crate::errors::Result;

/// Destination for finished result sheets
pub trait SheetWriter {
    fn write_sheet(&mut self, sheet: &Sheet) -> Result<()>;
}

/// Writes each sheet to `<dir>/<sheet name>.csv`
pub struct CsvSheetWriter {
    output_dir: PathBuf,
}

impl CsvSheetWriter {
    pub fn new<P: AsRef<Path>>(output_dir: P) -> Result<Self> {
        let output_dir = output_dir.as_ref().to_path_buf();
        fs::create_dir_all(&output_dir)?;
        Ok(Self { output_dir })
    }

    pub fn path_for(&self, sheet_name: &str) -> PathBuf {
        self.output_dir.join(format!("{}.csv", file_stem(sheet_name)))
    }
}

impl SheetWriter for CsvSheetWriter {
    fn write_sheet(&mut self, sheet: &Sheet) -> Result<()> {
        let path = self.path_for(&sheet.name);
        let mut writer = csv::Writer::from_path(&path)?;

        for row in sheet.to_rows() {
            let record: Vec<String> = row
                .into_iter()
                .map(|value| value.map(ToString::to_string).unwrap_or_default())
                .collect();
            writer.write_record(&record)?;
        }
        writer.flush()?;

        info!("Wrote sheet {:?} to {}", sheet.name, path.display());
        Ok(())
    }
}

fn file_stem(sheet_name: &str) -> String {
    sheet_name
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}
