//! File loaders for the boundary index and the two attribute tables.

pub mod delimited;
pub mod geojson;

pub use delimited::parse_delimited;
pub use geojson::{load_units, parse_units, LoadedUnits};

use std::fs::File;
use std::path::Path;
use tracing::info;

use crate::error::LoadError;
use crate::store::{has_identifier_column, DemographicTable, RateTable, RawRow, IDENTIFIER_COLUMNS};

/// Fail when no row carries a column an identifier can be built from.
fn require_identifier_column(rows: &[RawRow]) -> Result<(), LoadError> {
    if rows.is_empty() || rows.iter().any(has_identifier_column) {
        Ok(())
    } else {
        Err(LoadError::MissingColumn(IDENTIFIER_COLUMNS.join(" or ")))
    }
}

/// Read the primary demographic table.
pub fn load_demographics(path: &Path) -> Result<DemographicTable, LoadError> {
    let rows = parse_delimited(File::open(path)?)?;
    require_identifier_column(&rows)?;
    let table = DemographicTable::from_raw_rows(rows);
    info!(
        "Loaded {} demographic rows from {}",
        table.len(),
        path.display()
    );
    Ok(table)
}

/// Read the secondary rate table.
pub fn load_rates(path: &Path) -> Result<RateTable, LoadError> {
    let rows = parse_delimited(File::open(path)?)?;
    require_identifier_column(&rows)?;
    let table = RateTable::from_raw_rows(rows);
    info!("Loaded {} rate rows from {}", table.len(), path.display());
    Ok(table)
}
