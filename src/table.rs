use arrow::array::{Array, ArrayRef, Float64Array, Int64Array, PrimitiveBuilder, StringArray};
use arrow::datatypes::{ArrowPrimitiveType, DataType, Schema};
use num_traits::ToPrimitive;
use std::collections::HashSet;
use std::slice;
use std::sync::Arc;
use strum_macros::{Display, EnumString};
use thiserror::Error;

use crate::stats::{describe, ColumnStatistics};

/// Text shown for a missing cell.
pub(crate) const MISSING: &str = "nan";

/// The data type of a table column.
#[derive(Clone, Copy, Debug, Display, EnumString, Eq, PartialEq)]
#[strum(serialize_all = "snake_case")]
pub enum ColumnType {
    Int64,
    Float64,
    Utf8,
}

impl ColumnType {
    /// Returns `true` for the types summarized with mean, median and
    /// standard deviation.
    #[must_use]
    pub fn is_numeric(self) -> bool {
        matches!(self, Self::Int64 | Self::Float64)
    }

    /// Returns the narrowest type that can hold values of both `self` and
    /// `other`.
    #[must_use]
    pub(crate) fn widen(self, other: Self) -> Self {
        match (self, other) {
            (Self::Utf8, _) | (_, Self::Utf8) => Self::Utf8,
            (Self::Float64, _) | (_, Self::Float64) => Self::Float64,
            (Self::Int64, Self::Int64) => Self::Int64,
        }
    }
}

impl From<ColumnType> for DataType {
    fn from(ct: ColumnType) -> Self {
        match ct {
            ColumnType::Int64 => Self::Int64,
            ColumnType::Float64 => Self::Float64,
            ColumnType::Utf8 => Self::Utf8,
        }
    }
}

#[derive(Debug, Error, Eq, PartialEq)]
pub enum TableError {
    #[error("schema has {fields} fields but {columns} columns were given")]
    SchemaMismatch { fields: usize, columns: usize },
    #[error("columns must have the same length")]
    LengthMismatch,
    #[error("duplicate column name: {0}")]
    DuplicateName(String),
}

/// Structured data represented in a column-oriented form.
#[derive(Debug, Clone)]
pub struct Table {
    schema: Arc<Schema>,
    columns: Vec<Column>,
}

impl Table {
    /// Creates a new `Table` with the given `schema` and `columns`.
    ///
    /// # Errors
    ///
    /// Returns an error if the number of fields in `schema` differs from the
    /// number of `columns`, if `columns` have different lengths, or if two
    /// fields share a name.
    pub fn new(schema: Arc<Schema>, columns: Vec<Column>) -> Result<Self, TableError> {
        if schema.fields().len() != columns.len() {
            return Err(TableError::SchemaMismatch {
                fields: schema.fields().len(),
                columns: columns.len(),
            });
        }
        if let Some(col) = columns.first() {
            let len = col.len();
            if !columns.iter().skip(1).all(|c| c.len() == len) {
                return Err(TableError::LengthMismatch);
            }
        }
        let mut names = HashSet::with_capacity(columns.len());
        for field in schema.fields().iter() {
            if !names.insert(field.name().as_str()) {
                return Err(TableError::DuplicateName(field.name().clone()));
            }
        }
        Ok(Self { schema, columns })
    }

    /// Returns an `Iterator` for columns.
    pub fn columns(&self) -> slice::Iter<'_, Column> {
        self.columns.iter()
    }

    /// Returns an immutable reference of a specific column
    #[must_use]
    pub fn column(&self, i: usize) -> Option<&Column> {
        self.columns.get(i)
    }

    /// Returns the column names in table order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.schema.fields().iter().map(|f| f.name().as_str())
    }

    /// Returns the number of columns in the table.
    #[must_use]
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// Returns the number of rows in the table.
    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.columns.first().map_or(0, Column::len)
    }

    /// Returns the schema of the table.
    #[must_use]
    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Returns the display text of every cell in row `index`, or `None` if
    /// the row does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if a column holds an array of an unexpected type.
    pub fn row(&self, index: usize) -> Result<Option<Vec<String>>, TypeError> {
        if index >= self.num_rows() {
            return Ok(None);
        }
        let mut cells = Vec::with_capacity(self.columns.len());
        for column in &self.columns {
            cells.push(column.display(index)?.unwrap_or_default());
        }
        Ok(Some(cells))
    }

    /// Computes the statistics of every column, in table order.
    ///
    /// # Errors
    ///
    /// Returns an error if a column holds an array of an unexpected type.
    pub fn statistics(&self) -> Result<Vec<ColumnStatistics>, TypeError> {
        self.columns.iter().map(describe).collect()
    }
}

/// A single column in a table.
#[derive(Clone, Debug)]
pub struct Column {
    array: ArrayRef,
    column_type: ColumnType,
}

impl Column {
    /// Converts a slice into a `Column`.
    ///
    /// # Errors
    ///
    /// Returns an error if `T` is not one of the supported column types.
    pub fn try_from_slice<T>(slice: &[T::Native]) -> Result<Self, TypeError>
    where
        T: ArrowPrimitiveType,
    {
        let mut builder = PrimitiveBuilder::<T>::with_capacity(slice.len());
        for s in slice {
            builder.append_value(*s);
        }
        let array: ArrayRef = Arc::new(builder.finish());
        Self::try_from(array)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.array.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.array.is_empty()
    }

    #[must_use]
    pub fn column_type(&self) -> ColumnType {
        self.column_type
    }

    /// Returns the number of non-missing cells.
    #[must_use]
    pub fn count(&self) -> usize {
        self.array.len() - self.array.null_count()
    }

    /// Return the value specified by the index as display text.
    ///
    /// Integers print as-is, floats always carry a fractional part, and
    /// missing cells print as `nan`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying array does not match the column
    /// type.
    pub fn display(&self, index: usize) -> Result<Option<String>, TypeError> {
        if index >= self.len() {
            return Ok(None);
        }
        if self.array.is_null(index) {
            return Ok(Some(MISSING.to_string()));
        }
        let text = match self.column_type {
            ColumnType::Int64 => self.downcast::<Int64Array>()?.value(index).to_string(),
            ColumnType::Float64 => {
                format!("{:?}", self.downcast::<Float64Array>()?.value(index))
            }
            ColumnType::Utf8 => self.downcast::<StringArray>()?.value(index).to_string(),
        };
        Ok(Some(text))
    }

    /// Returns the non-missing values of a numeric column as `f64`.
    ///
    /// # Errors
    ///
    /// Returns an error if this is not a numeric column.
    pub fn numeric_values(&self) -> Result<Vec<f64>, TypeError> {
        match self.column_type {
            ColumnType::Int64 => Ok(self
                .downcast::<Int64Array>()?
                .iter()
                .flatten()
                .filter_map(|v| v.to_f64())
                .collect()),
            ColumnType::Float64 => Ok(self
                .downcast::<Float64Array>()?
                .iter()
                .flatten()
                .collect()),
            ColumnType::Utf8 => Err(TypeError()),
        }
    }

    /// Creates an iterator over the non-missing cells of a text column.
    ///
    /// # Errors
    ///
    /// Returns an error if this is not a text column.
    pub fn string_iter(&self) -> Result<impl Iterator<Item = &str>, TypeError> {
        Ok(self.downcast::<StringArray>()?.iter().flatten())
    }

    fn downcast<A>(&self) -> Result<&A, TypeError>
    where
        A: Array + 'static,
    {
        self.array.as_any().downcast_ref::<A>().ok_or(TypeError())
    }
}

impl TryFrom<ArrayRef> for Column {
    type Error = TypeError;

    fn try_from(array: ArrayRef) -> Result<Self, Self::Error> {
        let column_type = match array.data_type() {
            DataType::Int64 => ColumnType::Int64,
            DataType::Float64 => ColumnType::Float64,
            DataType::Utf8 => ColumnType::Utf8,
            _ => return Err(TypeError()),
        };
        Ok(Self { array, column_type })
    }
}

impl From<Int64Array> for Column {
    fn from(array: Int64Array) -> Self {
        Self {
            array: Arc::new(array),
            column_type: ColumnType::Int64,
        }
    }
}

impl From<Float64Array> for Column {
    fn from(array: Float64Array) -> Self {
        Self {
            array: Arc::new(array),
            column_type: ColumnType::Float64,
        }
    }
}

impl From<StringArray> for Column {
    fn from(array: StringArray) -> Self {
        Self {
            array: Arc::new(array),
            column_type: ColumnType::Utf8,
        }
    }
}

#[derive(Debug, Error, Eq, PartialEq)]
#[error("column array does not match its declared type")]
pub struct TypeError();
