use std::collections::BTreeMap;
use std::fmt;

/// Value held by one cell of a result grid
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(text) => write!(f, "{}", text),
            CellValue::Int(value) => write!(f, "{}", value),
            CellValue::Float(value) => write!(f, "{}", value),
            CellValue::Bool(true) => write!(f, "TRUE"),
            CellValue::Bool(false) => write!(f, "FALSE"),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Int(value)
    }
}

impl From<i32> for CellValue {
    fn from(value: i32) -> Self {
        CellValue::Int(i64::from(value))
    }
}

impl From<usize> for CellValue {
    fn from(value: usize) -> Self {
        CellValue::Int(value as i64)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Float(value)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Bool(value)
    }
}

/// One write at a 1-based `(row, col)` position
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
    pub value: CellValue,
}

/// Named rectangular grid handed to a sheet writer
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    pub name: String,
    cells: BTreeMap<(usize, usize), CellValue>,
    rows: usize,
    cols: usize,
}

impl Sheet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cells: BTreeMap::new(),
            rows: 0,
            cols: 0,
        }
    }

    /// Write a cell; a later write to the same position replaces the earlier one
    pub fn set(&mut self, row: usize, col: usize, value: impl Into<CellValue>) {
        self.rows = self.rows.max(row);
        self.cols = self.cols.max(col);
        self.cells.insert((row, col), value.into());
    }

    /// Apply a batch of cell writes in order
    pub fn update_cells(&mut self, cells: impl IntoIterator<Item = Cell>) {
        for cell in cells {
            self.set(cell.row, cell.col, cell.value);
        }
    }

    /// Write `values` left to right starting at column 1
    pub fn set_row(&mut self, row: usize, values: Vec<CellValue>) {
        self.update_cells(
            values
                .into_iter()
                .enumerate()
                .map(|(index, value)| Cell { row, col: index + 1, value }),
        );
    }

    /// Number of written cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&CellValue> {
        self.cells.get(&(row, col))
    }

    pub fn row_count(&self) -> usize {
        self.rows
    }

    pub fn col_count(&self) -> usize {
        self.cols
    }

    /// Dense rows, `None` where nothing was written
    pub fn to_rows(&self) -> Vec<Vec<Option<&CellValue>>> {
        let mut rows = vec![vec![None; self.cols]; self.rows];
        for (&(row, col), value) in &self.cells {
            if row > 0 && col > 0 {
                rows[row - 1][col - 1] = Some(value);
            }
        }
        rows
    }
}
