pub mod csv;
pub mod report;
mod stats;
mod table;

pub use arrow;
pub use stats::{ColumnStatistics, Description, DistinctCount};
pub use table::{Column, ColumnType, Table, TableError, TypeError};
