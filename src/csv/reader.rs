use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use csv_core::ReadRecordResult;
use itertools::Itertools;
use std::collections::HashSet;
use std::str;
use std::sync::Arc;

use super::LoadError;
use crate::table::{Column, ColumnType, Table};

/// Field values treated as missing.
const NA_VALUES: [&str; 19] = [
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// A single CSV record: its unescaped field bytes, concatenated, and the end
/// offset of each field.
pub struct Record {
    fields: Vec<u8>,
    ends: Vec<usize>,
}

impl Record {
    /// Reads the next record from `input`, returning it with the number of
    /// bytes consumed. `None` means `input` holds no further record.
    ///
    /// # Panics
    ///
    /// Panics if a record needs a buffer larger than `usize::MAX` bytes.
    #[must_use]
    pub fn read(reader: &mut csv_core::Reader, input: &[u8]) -> (Option<Self>, usize) {
        let mut fields = vec![0; 1024];
        let mut ends = vec![0; 32];
        let (mut cur, mut outlen, mut endlen) = (0, 0, 0);
        loop {
            let (res, nin, nout, nend) =
                reader.read_record(&input[cur..], &mut fields[outlen..], &mut ends[endlen..]);
            cur += nin;
            outlen += nout;
            endlen += nend;
            match res {
                ReadRecordResult::InputEmpty => continue,
                ReadRecordResult::OutputFull => {
                    fields.resize(fields.len().checked_mul(2).expect("record too large"), 0);
                }
                ReadRecordResult::OutputEndsFull => {
                    ends.resize(ends.len().checked_mul(2).expect("record too large"), 0);
                }
                ReadRecordResult::Record => {
                    fields.truncate(outlen);
                    ends.truncate(endlen);
                    return (Some(Self { fields, ends }), cur);
                }
                ReadRecordResult::End => return (None, cur),
            }
        }
    }

    #[inline]
    #[must_use]
    pub fn get(&self, i: usize) -> Option<&[u8]> {
        let end = *self.ends.get(i)?;
        let start = match i.checked_sub(1).and_then(|i| self.ends.get(i)) {
            None => 0,
            Some(&start) => start,
        };
        Some(&self.fields[start..end])
    }

    /// Returns field `i` as text. Fields split from valid UTF-8 input are
    /// always valid UTF-8.
    #[must_use]
    pub fn get_str(&self, i: usize) -> Option<&str> {
        self.get(i).and_then(|f| str::from_utf8(f).ok())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ends.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ends.is_empty()
    }

    /// A record with a single empty field comes from a blank line.
    fn is_blank(&self) -> bool {
        self.ends.len() == 1 && self.fields.is_empty()
    }
}

/// Parses CSV text into a `Table`. The first record names the columns.
///
/// # Errors
///
/// Returns an error if there is no header record, or a data record has more
/// fields than the header.
pub fn read_table(text: &str) -> Result<Table, LoadError> {
    let input = text.as_bytes();
    let mut reader = csv_core::Reader::new();
    let mut cur = 0;
    let mut header = None;
    let mut rows = Vec::new();
    loop {
        let line = reader.line();
        let (record, nin) = Record::read(&mut reader, &input[cur..]);
        cur += nin;
        let Some(record) = record else {
            break;
        };
        if record.is_blank() {
            continue;
        }
        match &header {
            None => header = Some(record),
            Some(h) if record.len() > h.len() => {
                return Err(LoadError::Malformed {
                    line,
                    expected: h.len(),
                    found: record.len(),
                });
            }
            Some(_) => rows.push(record),
        }
    }
    let header = header.ok_or(LoadError::NoColumns)?;

    let names = column_names(&header);
    let mut fields = Vec::with_capacity(names.len());
    let mut columns = Vec::with_capacity(names.len());
    for (i, name) in names.into_iter().enumerate() {
        let values = rows
            .iter()
            .map(|r| r.get_str(i).filter(|v| !is_missing(v)))
            .collect::<Vec<_>>();
        let column_type = infer_column_type(&values);
        fields.push(Field::new(name, DataType::from(column_type), true));
        columns.push(build_column(&values, column_type));
    }
    log::debug!(
        "parsed {} rows; column types: {}",
        rows.len(),
        columns.iter().map(Column::column_type).join(", ")
    );
    Ok(Table::new(Arc::new(Schema::new(fields)), columns)?)
}

/// Makes header names unique: an empty name becomes `Unnamed: <index>` and a
/// repeated name `x` becomes `x.1`, `x.2`, and so on.
fn column_names(header: &Record) -> Vec<String> {
    let mut seen = HashSet::with_capacity(header.len());
    let mut names = Vec::with_capacity(header.len());
    for i in 0..header.len() {
        let raw = header.get_str(i).unwrap_or_default();
        let base = if raw.is_empty() {
            format!("Unnamed: {i}")
        } else {
            raw.to_string()
        };
        let mut name = base.clone();
        let mut suffix = 1;
        while seen.contains(&name) {
            name = format!("{base}.{suffix}");
            suffix += 1;
        }
        seen.insert(name.clone());
        names.push(name);
    }
    names
}

fn is_missing(field: &str) -> bool {
    NA_VALUES.contains(&field)
}

/// Infers the data type of a field in a CSV record. Spaces around a number
/// are ignored.
fn infer_field_type(field: &str) -> ColumnType {
    let field = field.trim_matches(' ');
    if field.parse::<i64>().is_ok() {
        ColumnType::Int64
    } else if field.parse::<f64>().is_ok() {
        ColumnType::Float64
    } else {
        ColumnType::Utf8
    }
}

/// Infers the type of a column from its non-missing values. A column
/// without any value is text.
fn infer_column_type(values: &[Option<&str>]) -> ColumnType {
    let mut present = values.iter().flatten().peekable();
    if present.peek().is_none() {
        return ColumnType::Utf8;
    }
    let mut column_type = ColumnType::Int64;
    for v in present {
        column_type = column_type.widen(infer_field_type(v));
        if column_type == ColumnType::Utf8 {
            break;
        }
    }
    column_type
}

fn build_column(values: &[Option<&str>], column_type: ColumnType) -> Column {
    match column_type {
        ColumnType::Int64 => values
            .iter()
            .map(|v| v.and_then(|s| s.trim_matches(' ').parse::<i64>().ok()))
            .collect::<Int64Array>()
            .into(),
        ColumnType::Float64 => values
            .iter()
            .map(|v| {
                v.and_then(|s| s.trim_matches(' ').parse::<f64>().ok())
                    .filter(|n| !n.is_nan())
            })
            .collect::<Float64Array>()
            .into(),
        ColumnType::Utf8 => values.iter().copied().collect::<StringArray>().into(),
    }
}
