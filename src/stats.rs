use statistical::{mean, median, standard_deviation};
use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;

use crate::table::{Column, ColumnType, TypeError};

/// Statistical summary of a single column.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnStatistics {
    Numeric(Description),
    Text(DistinctCount),
}

/// Descriptive statistics of the non-missing values of a numeric column.
///
/// `mean` and `median` are NaN when there are no values; `s_deviation` is
/// the sample (N-1) standard deviation and is NaN for fewer than two values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Description {
    pub(crate) count: usize,
    pub(crate) mean: f64,
    pub(crate) median: f64,
    pub(crate) s_deviation: f64,
}

/// The number of distinct non-missing values in a text column.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DistinctCount {
    pub(crate) count: usize,
    pub(crate) number_of_elements: usize,
}

impl fmt::Display for Description {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Mean: {:.2} | Median: {:.2} | Std. deviation: {:.2}",
            self.mean, self.median, self.s_deviation
        )
    }
}

impl fmt::Display for DistinctCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unique values: {}", self.number_of_elements)
    }
}

impl Description {
    /// Summarizes `values`, skipping NaN. An infinite value makes the mean
    /// and median infinite (or NaN when both signs occur) and the standard
    /// deviation NaN.
    #[must_use]
    pub fn from_values(values: &[f64]) -> Self {
        let values = values
            .iter()
            .copied()
            .filter(|v| !v.is_nan())
            .collect::<Vec<_>>();
        let (m, md) = if values.is_empty() {
            (f64::NAN, f64::NAN)
        } else {
            (mean(&values), median(&values))
        };
        // `standard_deviation` asserts on a NaN sum of squares.
        let s_deviation = if values.len() < 2 || !m.is_finite() {
            f64::NAN
        } else {
            standard_deviation(&values, Some(m))
        };
        Self {
            count: values.len(),
            mean: m,
            median: md,
            s_deviation,
        }
    }

    #[must_use]
    pub fn get_count(&self) -> usize {
        self.count
    }

    #[must_use]
    pub fn get_mean(&self) -> f64 {
        self.mean
    }

    #[must_use]
    pub fn get_median(&self) -> f64 {
        self.median
    }

    #[must_use]
    pub fn get_s_deviation(&self) -> f64 {
        self.s_deviation
    }
}

impl DistinctCount {
    #[must_use]
    pub fn get_count(&self) -> usize {
        self.count
    }

    #[must_use]
    pub fn get_number_of_elements(&self) -> usize {
        self.number_of_elements
    }
}

pub(crate) fn describe(column: &Column) -> Result<ColumnStatistics, TypeError> {
    match column.column_type() {
        ColumnType::Int64 | ColumnType::Float64 => {
            let values = column.numeric_values()?;
            Ok(ColumnStatistics::Numeric(Description::from_values(&values)))
        }
        ColumnType::Utf8 => Ok(ColumnStatistics::Text(DistinctCount {
            count: column.count(),
            number_of_elements: count_distinct(column.string_iter()?),
        })),
    }
}

fn count_distinct<I>(iter: I) -> usize
where
    I: Iterator,
    I::Item: Eq + Hash,
{
    iter.collect::<HashSet<_>>().len()
}
