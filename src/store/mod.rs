//! Demographic record store and record processor.

pub mod processor;
pub mod tables;

pub use processor::{build_records, process_row, RecordMap};
pub use tables::{
    derive_identifier, has_identifier_column, parse_numeric, DemographicRow, DemographicTable,
    RateRow, RateTable, RawRow, IDENTIFIER_COLUMNS,
};
