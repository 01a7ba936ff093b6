//! PDF summary reports.
//!
//! A report has a title page, a statistics page, and the table rows split
//! into pages of [`ROWS_PER_PAGE`]. [`ReportBuilder`] produces the page
//! contents as a [`Document`]; [`render`] turns it into PDF bytes.

mod builder;
mod document;
mod fonts;
mod render;

use chrono::Local;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::csv::{self, LoadError};
use crate::{Table, TypeError};

pub use builder::ReportBuilder;
pub use document::{
    cell_width, truncate, Document, NumericSummary, Page, RowFill, StatisticsPage, TablePage,
    TableRow, TextSummary, TitlePage, CONTENT_WIDTH, MAX_CELL_CHARS, ROWS_PER_PAGE,
};
pub use fonts::FontSet;
pub use render::render;

const TITLE: &str = "Analytical report";

#[derive(Debug, Error)]
pub enum RenderError {
    #[error(transparent)]
    Column(#[from] TypeError),
    #[error("cannot open font {}: {source}", path.display())]
    Font {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("PDF error: {0}")]
    Pdf(String),
    #[error("cannot write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
enum GenerateError {
    #[error("failed to load CSV: {0}")]
    Load(#[from] LoadError),
    #[error("failed to render report: {0}")]
    Render(#[from] RenderError),
}

/// Builds the report contents for `table`. `source_name` is shown in the
/// subtitle.
///
/// # Errors
///
/// Returns an error if a column holds an array of an unexpected type.
pub fn build_document(table: &Table, source_name: &str) -> Result<Document, TypeError> {
    let generated_at = Local::now().naive_local();
    Ok(ReportBuilder::new()
        .title_page(TITLE, &format!("Based on file: {source_name}"), &generated_at)
        .statistics_page(table)?
        .table_pages(table)?
        .finish())
}

/// Writes the report for `table`, read from `source`, to `output`, using
/// the fonts found by [`FontSet::discover`].
///
/// Returns `false` after logging the cause if anything fails. Nothing is
/// written unless the whole document rendered.
#[must_use]
pub fn generate(table: &Table, source: &Path, output: &Path) -> bool {
    generate_with_fonts(table, source, output, &FontSet::discover(None))
}

/// Same as [`generate`] with an explicit font set.
#[must_use]
pub fn generate_with_fonts(table: &Table, source: &Path, output: &Path, fonts: &FontSet) -> bool {
    let result = write_report(table, source, output, fonts).map_err(GenerateError::from);
    report_outcome(result, table)
}

/// Loads the CSV file at `input` and writes its report to `output`.
///
/// Returns `false` after logging the cause if loading or rendering fails.
#[must_use]
pub fn generate_report(input: &Path, output: &Path) -> bool {
    generate_report_with_fonts(input, output, &FontSet::discover(None))
}

/// Same as [`generate_report`] with an explicit font set.
#[must_use]
pub fn generate_report_with_fonts(input: &Path, output: &Path, fonts: &FontSet) -> bool {
    let table = match csv::load(input) {
        Ok(table) => table,
        Err(e) => {
            log::error!("{}", GenerateError::from(e));
            return false;
        }
    };
    generate_with_fonts(&table, input, output, fonts)
}

fn write_report(
    table: &Table,
    source: &Path,
    output: &Path,
    fonts: &FontSet,
) -> Result<(), RenderError> {
    let source_name = source
        .file_name()
        .map_or_else(|| source.to_string_lossy(), |name| name.to_string_lossy());
    let document = build_document(table, &source_name)?;
    let bytes = render(&document, fonts)?;
    std::fs::write(output, bytes).map_err(|source| RenderError::Write {
        path: output.to_path_buf(),
        source,
    })?;
    log::info!("report written to {}", output.display());
    Ok(())
}

fn report_outcome(result: Result<(), GenerateError>, table: &Table) -> bool {
    match result {
        Ok(()) => {
            log::info!("rows processed: {}", table.num_rows());
            log::info!("columns: {}", table.num_columns());
            true
        }
        Err(e) => {
            log::error!("{e}");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_csv(dir: &Path, name: &str, text: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, text).unwrap();
        path
    }

    #[test]
    fn generate_writes_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_csv(dir.path(), "data.csv", "a,b,c\n1,2.5,x\n2,3.5,y\n");
        let output = dir.path().join("report.pdf");
        assert!(generate_report_with_fonts(&input, &output, &FontSet::builtin()));
        let bytes = fs::read(&output).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn missing_input_creates_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("report.pdf");
        assert!(!generate_report_with_fonts(
            &dir.path().join("absent.csv"),
            &output,
            &FontSet::builtin()
        ));
        assert!(!output.exists());
    }

    #[test]
    fn malformed_input_creates_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_csv(dir.path(), "bad.csv", "a,b\n1,2,3\n");
        let output = dir.path().join("report.pdf");
        assert!(!generate_report_with_fonts(&input, &output, &FontSet::builtin()));
        assert!(!output.exists());
    }

    #[test]
    fn non_finite_numbers() {
        let dir = tempfile::tempdir().unwrap();
        for (name, text) in [
            ("inf.csv", "x\n1\ninf\n"),
            ("nan.csv", "x\n1\nNAN\n3\n"),
            ("both.csv", "x\n-Infinity\ninf\n"),
        ] {
            let input = write_csv(dir.path(), name, text);
            let output = dir.path().join(name).with_extension("pdf");
            assert!(
                generate_report_with_fonts(&input, &output, &FontSet::builtin()),
                "{name}"
            );
            assert!(output.is_file(), "{name}");
        }
    }

    #[test]
    fn unwritable_output_fails() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_csv(dir.path(), "data.csv", "a\n1\n");
        let table = csv::load(&input).unwrap();
        let output = dir.path().join("missing-dir").join("report.pdf");
        assert!(!generate_with_fonts(&table, &input, &output, &FontSet::builtin()));
    }

    #[test]
    fn subtitle_uses_base_name() {
        let table = crate::csv::read_table("a\n1\n").unwrap();
        let document = build_document(&table, "data.csv").unwrap();
        let Page::Title(title) = &document.pages()[0] else {
            panic!("first page should be the title page");
        };
        assert_eq!(title.title, "Analytical report");
        assert_eq!(title.subtitle, "Based on file: data.csv");
        assert_eq!(title.generated_at.len(), "DD.MM.YYYY HH:MM".len());
    }
}
