//! Result grids and the writers that publish them

mod eligibility;
mod sheet;
mod terminal;
mod writer;

pub use eligibility::eligibility_sheet;
pub use sheet::{Cell, CellValue, Sheet};
pub use terminal::TerminalPreview;
pub use writer::{CsvSheetWriter, SheetWriter};
