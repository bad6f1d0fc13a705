use colored::{ColoredString, Colorize};

use super::sheet::{CellValue, Sheet};
use super::writer::SheetWriter;
use crate::errors::Result;

/// Prints sheets to stdout, eligible cells green and ineligible ones red
#[derive(Debug, Default)]
pub struct TerminalPreview;

impl SheetWriter for TerminalPreview {
    fn write_sheet(&mut self, sheet: &Sheet) -> Result<()> {
        println!("\n{}", sheet.name.bold().underline());
        for line in render(sheet) {
            println!("{}", line);
        }
        Ok(())
    }
}

fn render(sheet: &Sheet) -> Vec<String> {
    let rows = sheet.to_rows();
    let widths: Vec<usize> = (0..sheet.col_count())
        .map(|col| {
            rows.iter()
                .filter_map(|row| row[col])
                .map(|value| value.to_string().len())
                .max()
                .unwrap_or(0)
        })
        .collect();

    rows.iter()
        .enumerate()
        .map(|(index, row)| {
            row.iter()
                .zip(&widths)
                .map(|(value, width)| paint(*value, *width, index == 0).to_string())
                .collect::<Vec<_>>()
                .join("  ")
        })
        .collect()
}

fn paint(value: Option<&CellValue>, width: usize, header: bool) -> ColoredString {
    let text = format!("{:<width$}", value.map(ToString::to_string).unwrap_or_default());
    match value {
        _ if header => text.bold(),
        Some(CellValue::Bool(true)) => text.green(),
        Some(CellValue::Bool(false)) => text.red(),
        _ => text.normal(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_pads_columns() {
        colored::control::set_override(false);
        let mut sheet = Sheet::new("Gauntlet");
        sheet.set(1, 2, "Eligible");
        sheet.set(2, 1, "Thaya");
        sheet.set(2, 2, false);

        let lines = render(&sheet);

        assert_eq!(lines, vec!["       Eligible", "Thaya  FALSE   "]);
    }
}
