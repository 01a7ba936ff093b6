use std::borrow::Cow;

use crate::{Description, DistinctCount};

/// Data rows on one table page.
pub const ROWS_PER_PAGE: usize = 25;

/// Width, in millimetres, that every header and data row spans.
pub const CONTENT_WIDTH: f32 = 190.0;

/// Cell text longer than this many characters is truncated.
pub const MAX_CELL_CHARS: usize = 15;

const ELLIPSIS: &str = "...";

/// Shortens `text` to its first [`MAX_CELL_CHARS`] characters followed by
/// `...` when it is longer than that.
#[must_use]
pub fn truncate(text: &str) -> Cow<'_, str> {
    match text.char_indices().nth(MAX_CELL_CHARS) {
        Some((end, _)) => Cow::Owned(format!("{}{ELLIPSIS}", &text[..end])),
        None => Cow::Borrowed(text),
    }
}

/// Width of each cell in a row of `cells` equal-width cells.
#[must_use]
pub fn cell_width(cells: usize) -> f32 {
    #[allow(clippy::cast_precision_loss)] // column counts are far below 2^24
    let cells = cells.max(1) as f32;
    CONTENT_WIDTH / cells
}

/// Background of a data row.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RowFill {
    Light,
    White,
}

impl RowFill {
    /// Picks the fill from the absolute row index, so striping continues
    /// across page boundaries.
    #[must_use]
    pub fn for_row(index: usize) -> Self {
        if index % 2 == 0 {
            Self::Light
        } else {
            Self::White
        }
    }

    #[must_use]
    pub fn rgb(self) -> [u8; 3] {
        match self {
            Self::Light => [245, 245, 245],
            Self::White => [255, 255, 255],
        }
    }
}

/// A generated report: an ordered list of pages.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Document {
    pub(crate) pages: Vec<Page>,
}

impl Document {
    #[must_use]
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// Returns the table pages in order.
    pub fn table_pages(&self) -> impl Iterator<Item = &TablePage> {
        self.pages.iter().filter_map(|p| match p {
            Page::Table(t) => Some(t),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Page {
    Title(TitlePage),
    Statistics(StatisticsPage),
    Table(TablePage),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitlePage {
    pub title: String,
    pub subtitle: String,
    /// Formatted as `DD.MM.YYYY HH:MM`.
    pub generated_at: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatisticsPage {
    pub row_count: usize,
    pub column_count: usize,
    pub numeric: Vec<NumericSummary>,
    pub text: Vec<TextSummary>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NumericSummary {
    pub name: String,
    pub description: Description,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSummary {
    pub name: String,
    pub distinct: DistinctCount,
}

/// One page of the table section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TablePage {
    /// 1-based page number within the table section.
    pub number: usize,
    pub total: usize,
    /// Truncated column names.
    pub header: Vec<String>,
    pub rows: Vec<TableRow>,
}

impl TablePage {
    #[must_use]
    pub fn heading(&self) -> String {
        format!("Table data (page {}/{})", self.number, self.total)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    /// Absolute row index in the table.
    pub index: usize,
    /// Truncated cell text.
    pub cells: Vec<String>,
}

impl TableRow {
    #[must_use]
    pub fn fill(&self) -> RowFill {
        RowFill::for_row(self.index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncation() {
        assert_eq!(truncate(""), "");
        assert_eq!(truncate("exactly fifteen"), "exactly fifteen");
        assert_eq!(truncate("sixteen chars!!!"), "sixteen chars!!...");
        assert_eq!(
            truncate("Среднемесячная зарплата"),
            "Среднемесячная ..."
        );
        for text in ["a", "abcdefghijklmnop", "ЖЖЖЖЖЖЖЖЖЖЖЖЖЖЖЖЖЖЖЖ", "12345678901234"] {
            let shown = truncate(text);
            assert!(shown.chars().count() <= MAX_CELL_CHARS + ELLIPSIS.len());
            if text.chars().count() <= MAX_CELL_CHARS {
                assert_eq!(shown, text);
            }
        }
    }

    #[test]
    fn striping_ignores_page_boundaries() {
        assert_eq!(RowFill::for_row(24), RowFill::Light);
        assert_eq!(RowFill::for_row(25), RowFill::White);
        assert_ne!(RowFill::for_row(24).rgb(), RowFill::for_row(25).rgb());
    }

    #[test]
    fn cell_widths() {
        assert!((cell_width(1) - 190.0).abs() < f32::EPSILON);
        assert!((cell_width(4) - 47.5).abs() < f32::EPSILON);
        assert!((cell_width(0) - 190.0).abs() < f32::EPSILON);
    }
}
