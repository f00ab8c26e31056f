//! Plain and Markdown table renderers.
//!
//! CHANGELOG:
//! - 10/18/2026 - Initial text renderers

use std::collections::HashMap;
use unicode_width::UnicodeWidthStr;

use super::locale::format_integer;
use super::table::{prettify_header, Cell, Index, TabularResult};

#[derive(Clone, Copy, PartialEq, Eq)]
enum Style {
    Plain,
    Markdown,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Align {
    Left,
    Right,
}

/// Column-major view of a result as display strings.
struct Grid {
    headers: Vec<String>,
    columns: Vec<Vec<String>>,
    aligns: Vec<Align>,
}

impl Grid {
    /// Lay out `result` with its index as the first column. A default index
    /// is numbered from 1 under an empty header.
    fn build(result: &TabularResult, overrides: &HashMap<String, String>, style: Style) -> Self {
        let show = |cell: &Cell| match (cell, style) {
            (Cell::Int(n), Style::Plain) => format_integer(*n),
            (other, Style::Plain) => other.to_plain_string().replace(['\r', '\n'], " "),
            (other, Style::Markdown) => other
                .to_plain_string()
                .replace(['\r', '\n'], " ")
                .replace('|', "\\|"),
        };

        let mut grid = Self {
            headers: Vec::new(),
            columns: Vec::new(),
            aligns: Vec::new(),
        };

        match result.index() {
            Index::Default => {
                let labels: Vec<Cell> = (1..=result.len()).map(Cell::from).collect();
                grid.push(String::new(), &labels, &show);
            }
            Index::Named { name, values } => {
                grid.push(prettify_header(name, overrides), values, &show);
            }
        }

        for (position, name) in result.columns().iter().enumerate() {
            let cells: Vec<Cell> = result
                .rows()
                .iter()
                .map(|row| row.get(position).cloned().unwrap_or(Cell::Null))
                .collect();
            grid.push(prettify_header(name, overrides), &cells, &show);
        }

        grid
    }

    fn push(&mut self, header: String, cells: &[Cell], show: &dyn Fn(&Cell) -> String) {
        let numeric = cells.iter().any(Cell::is_numeric)
            && cells.iter().all(|c| c.is_numeric() || *c == Cell::Null);
        self.aligns.push(if numeric { Align::Right } else { Align::Left });
        self.headers.push(header);
        self.columns.push(cells.iter().map(show).collect());
    }

    fn widths(&self) -> Vec<usize> {
        self.headers
            .iter()
            .zip(&self.columns)
            .map(|(header, cells)| {
                cells
                    .iter()
                    .map(|c| c.width())
                    .chain(std::iter::once(header.width()))
                    .max()
                    .unwrap_or(0)
            })
            .collect()
    }

    fn row_count(&self) -> usize {
        self.columns.first().map_or(0, Vec::len)
    }

    fn row(&self, index: usize) -> Vec<&str> {
        self.columns.iter().map(|c| c[index].as_str()).collect()
    }
}

fn pad(text: &str, width: usize, align: Align) -> String {
    let fill = " ".repeat(width.saturating_sub(text.width()));
    match align {
        Align::Left => format!("{}{}", text, fill),
        Align::Right => format!("{}{}", fill, text),
    }
}

/// Whitespace-aligned table; integers are grouped with the host locale.
pub fn render_plain(result: &TabularResult, overrides: &HashMap<String, String>) -> String {
    let grid = Grid::build(result, overrides, Style::Plain);
    let widths = grid.widths();

    let line = |cells: Vec<&str>| {
        cells
            .iter()
            .zip(&widths)
            .zip(&grid.aligns)
            .map(|((cell, &width), &align)| pad(cell, width, align))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut lines = vec![line(grid.headers.iter().map(String::as_str).collect())];
    lines.extend((0..grid.row_count()).map(|i| line(grid.row(i))));
    lines.join("\n")
}

/// GitHub-flavored Markdown table.
pub fn render_markdown(result: &TabularResult, overrides: &HashMap<String, String>) -> String {
    let grid = Grid::build(result, overrides, Style::Markdown);
    let widths = grid.widths();

    let line = |cells: Vec<&str>| {
        let inner = cells
            .iter()
            .zip(&widths)
            .zip(&grid.aligns)
            .map(|((cell, &width), &align)| pad(cell, width, align))
            .collect::<Vec<_>>()
            .join(" | ");
        format!("| {} |", inner)
    };

    let rule = widths
        .iter()
        .zip(&grid.aligns)
        .map(|(&width, &align)| match align {
            Align::Left => format!(":{}", "-".repeat(width + 1)),
            Align::Right => format!("{}:", "-".repeat(width + 1)),
        })
        .collect::<Vec<_>>()
        .join("|");

    let mut lines = vec![line(grid.headers.iter().map(String::as_str).collect())];
    lines.push(format!("|{}|", rule));
    lines.extend((0..grid.row_count()).map(|i| line(grid.row(i))));
    lines.join("\n")
}
