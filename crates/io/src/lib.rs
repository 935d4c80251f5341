// Tabular file I/O

pub mod csv;
pub mod dataset;
pub mod xlsx;
