//! Read-only data handed to the engine.
//!
//! The host loads the index and tables once and passes the context by
//! reference to every call; nothing in the engine mutates it.

use crate::error::EngineError;
use crate::spatial::AreaUnitIndex;
use crate::store::{DemographicTable, RateTable};

#[derive(Debug, Clone, Default)]
pub struct DataContext {
    units: Option<AreaUnitIndex>,
    demographics: Option<DemographicTable>,
    rates: Option<RateTable>,
}

impl DataContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_units(mut self, units: AreaUnitIndex) -> Self {
        self.units = Some(units);
        self
    }

    pub fn with_demographics(mut self, table: DemographicTable) -> Self {
        self.demographics = Some(table);
        self
    }

    pub fn with_rates(mut self, table: RateTable) -> Self {
        self.rates = Some(table);
        self
    }

    /// The area unit index; classification cannot run without it.
    pub fn units(&self) -> Result<&AreaUnitIndex, EngineError> {
        self.units
            .as_ref()
            .ok_or(EngineError::DataNotLoaded("area unit index"))
    }

    pub fn demographics(&self) -> Option<&DemographicTable> {
        self.demographics.as_ref()
    }

    pub fn rates(&self) -> Option<&RateTable> {
        self.rates.as_ref()
    }
}
