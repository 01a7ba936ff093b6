use chrono::NaiveDateTime;

use super::document::{
    truncate, Document, NumericSummary, Page, StatisticsPage, TablePage, TableRow, TextSummary,
    TitlePage, ROWS_PER_PAGE,
};
use crate::{ColumnStatistics, Table, TypeError};

const TIMESTAMP_FORMAT: &str = "%d.%m.%Y %H:%M";

/// Builds a [`Document`] one section at a time.
///
/// Every step takes the builder by value and hands it back, so a builder
/// belongs to exactly one report.
#[derive(Debug, Default)]
pub struct ReportBuilder {
    pages: Vec<Page>,
}

impl ReportBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the title page.
    #[must_use]
    pub fn title_page(mut self, title: &str, subtitle: &str, generated_at: &NaiveDateTime) -> Self {
        self.pages.push(Page::Title(TitlePage {
            title: title.to_string(),
            subtitle: subtitle.to_string(),
            generated_at: generated_at.format(TIMESTAMP_FORMAT).to_string(),
        }));
        self
    }

    /// Appends the statistics page: numeric columns first, then text
    /// columns, each group in table order.
    ///
    /// # Errors
    ///
    /// Returns an error if a column holds an array of an unexpected type.
    pub fn statistics_page(mut self, table: &Table) -> Result<Self, TypeError> {
        let mut numeric = Vec::new();
        let mut text = Vec::new();
        for (name, stats) in table.column_names().zip(table.statistics()?) {
            match stats {
                ColumnStatistics::Numeric(description) => numeric.push(NumericSummary {
                    name: name.to_string(),
                    description,
                }),
                ColumnStatistics::Text(distinct) => text.push(TextSummary {
                    name: name.to_string(),
                    distinct,
                }),
            }
        }
        self.pages.push(Page::Statistics(StatisticsPage {
            row_count: table.num_rows(),
            column_count: table.num_columns(),
            numeric,
            text,
        }));
        Ok(self)
    }

    /// Appends `ceil(rows / ROWS_PER_PAGE)` table pages, each repeating the
    /// column header.
    ///
    /// # Errors
    ///
    /// Returns an error if a column holds an array of an unexpected type.
    pub fn table_pages(mut self, table: &Table) -> Result<Self, TypeError> {
        let total_rows = table.num_rows();
        let total = total_rows.div_ceil(ROWS_PER_PAGE);
        let header = table
            .column_names()
            .map(|name| truncate(name).into_owned())
            .collect::<Vec<_>>();

        for page in 0..total {
            let start = page * ROWS_PER_PAGE;
            let end = total_rows.min(start + ROWS_PER_PAGE);
            let mut rows = Vec::with_capacity(end - start);
            for index in start..end {
                let cells = table
                    .row(index)?
                    .unwrap_or_default()
                    .iter()
                    .map(|cell| truncate(cell).into_owned())
                    .collect();
                rows.push(TableRow { index, cells });
            }
            self.pages.push(Page::Table(TablePage {
                number: page + 1,
                total,
                header: header.clone(),
                rows,
            }));
        }
        Ok(self)
    }

    #[must_use]
    pub fn finish(self) -> Document {
        Document { pages: self.pages }
    }
}
