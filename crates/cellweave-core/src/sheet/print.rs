//! Printable area and tab-separated rendering.

use std::io::{self, Write};

use cellweave_engine::{Position, Size};

use super::Sheet;

impl Sheet {
    /// Smallest box anchored at A1 containing every cell with non-empty text.
    pub fn printable_size(&self) -> Size {
        let mut size = Size::default();
        for (row, cells) in self.grid.iter().enumerate() {
            let last = cells
                .iter()
                .rposition(|slot| slot.as_ref().is_some_and(|cell| !cell.content.is_empty()));
            if let Some(col) = last {
                size.rows = size.rows.max(row + 1);
                size.cols = size.cols.max(col + 1);
            }
        }
        size
    }

    /// Write cell values over the printable area, tab separated, one line
    /// per row.
    pub fn print_values<W: Write>(&self, out: &mut W) -> io::Result<()> {
        self.print_cells(out, |sheet, pos| sheet.value_at(pos).to_string())
    }

    /// Write cell texts over the printable area, tab separated, one line per
    /// row.
    pub fn print_texts<W: Write>(&self, out: &mut W) -> io::Result<()> {
        self.print_cells(out, |sheet, pos| {
            sheet.slot(pos).map(|cell| cell.content.text()).unwrap_or_default()
        })
    }

    fn print_cells<W, F>(&self, out: &mut W, render: F) -> io::Result<()>
    where
        W: Write,
        F: Fn(&Sheet, Position) -> String,
    {
        let size = self.printable_size();
        for row in 0..size.rows {
            let line: Vec<String> = (0..size.cols)
                .map(|col| render(self, Position::new(row, col)))
                .collect();
            writeln!(out, "{}", line.join("\t"))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(name: &str) -> Position {
        name.parse().unwrap()
    }

    fn render(sheet: &Sheet, texts: bool) -> String {
        let mut out = Vec::new();
        if texts {
            sheet.print_texts(&mut out).unwrap();
        } else {
            sheet.print_values(&mut out).unwrap();
        }
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_empty_sheet_has_no_printable_area() {
        let sheet = Sheet::new();
        assert_eq!(sheet.printable_size(), Size::default());
        assert_eq!(render(&sheet, false), "");
    }

    #[test]
    fn test_clearing_corner_shrinks_printable_size() {
        let mut sheet = Sheet::new();
        sheet.set_cell(Position::new(0, 0), "a").unwrap();
        sheet.set_cell(Position::new(2, 2), "b").unwrap();
        assert_eq!(sheet.printable_size(), Size { rows: 3, cols: 3 });

        sheet.clear_cell(Position::new(2, 2)).unwrap();
        assert_eq!(sheet.printable_size(), Size { rows: 1, cols: 1 });
    }

    #[test]
    fn test_placeholders_do_not_extend_printable_size() {
        let mut sheet = Sheet::new();
        sheet.set_cell(pos("A1"), "=D5").unwrap();
        assert_eq!(sheet.printable_size(), Size { rows: 1, cols: 1 });
    }

    #[test]
    fn test_print_values_and_texts() {
        let mut sheet = Sheet::new();
        sheet.set_cell(pos("A1"), "2").unwrap();
        sheet.set_cell(pos("B1"), "=A1*3").unwrap();
        sheet.set_cell(pos("A2"), "'=quoted").unwrap();
        sheet.set_cell(pos("C2"), "=1/0").unwrap();

        assert_eq!(render(&sheet, false), "2\t6\t\n=quoted\t\t#ARITHM!\n");
        assert_eq!(render(&sheet, true), "2\t=A1*3\t\n'=quoted\t\t=1/0\n");
    }
}
