//! State and county names resolved from identifier prefixes.

use super::stats::MeanAccumulator;
use crate::models::Geography;
use crate::store::RecordMap;

pub const UNKNOWN_STATE: &str = "Unknown State";
pub const UNKNOWN_COUNTY: &str = "Unknown County";

/// Name for a two-digit state FIPS code.
pub fn state_name(code: &str) -> Option<&'static str> {
    let name = match code {
        "01" => "Alabama",
        "02" => "Alaska",
        "04" => "Arizona",
        "05" => "Arkansas",
        "06" => "California",
        "08" => "Colorado",
        "09" => "Connecticut",
        "10" => "Delaware",
        "11" => "District of Columbia",
        "12" => "Florida",
        "13" => "Georgia",
        "15" => "Hawaii",
        "16" => "Idaho",
        "17" => "Illinois",
        "18" => "Indiana",
        "19" => "Iowa",
        "20" => "Kansas",
        "21" => "Kentucky",
        "22" => "Louisiana",
        "23" => "Maine",
        "24" => "Maryland",
        "25" => "Massachusetts",
        "26" => "Michigan",
        "27" => "Minnesota",
        "28" => "Mississippi",
        "29" => "Missouri",
        "30" => "Montana",
        "31" => "Nebraska",
        "32" => "Nevada",
        "33" => "New Hampshire",
        "34" => "New Jersey",
        "35" => "New Mexico",
        "36" => "New York",
        "37" => "North Carolina",
        "38" => "North Dakota",
        "39" => "Ohio",
        "40" => "Oklahoma",
        "41" => "Oregon",
        "42" => "Pennsylvania",
        "44" => "Rhode Island",
        "45" => "South Carolina",
        "46" => "South Dakota",
        "47" => "Tennessee",
        "48" => "Texas",
        "49" => "Utah",
        "50" => "Vermont",
        "51" => "Virginia",
        "53" => "Washington",
        "54" => "West Virginia",
        "55" => "Wisconsin",
        "56" => "Wyoming",
        "72" => "Puerto Rico",
        _ => return None,
    };
    Some(name)
}

/// Name for a county code within a state. Only a handful of Texas
/// counties are known.
pub fn county_name(state_code: &str, county_code: &str) -> Option<&'static str> {
    let name = match (state_code, county_code) {
        ("48", "029") => "Bexar County",
        ("48", "085") => "Collin County",
        ("48", "113") => "Dallas County",
        ("48", "121") => "Denton County",
        ("48", "201") => "Harris County",
        ("48", "439") => "Tarrant County",
        _ => return None,
    };
    Some(name)
}

/// Mean of positive unit median incomes, rounded; zero when none.
pub fn area_median_income(identifiers: &[String], records: &RecordMap) -> f64 {
    let mut mean = MeanAccumulator::default();
    for record in identifiers.iter().filter_map(|id| records.get(id)) {
        mean.add_positive(record.median_income);
    }
    mean.mean().map(f64::round).unwrap_or(0.0)
}

/// Resolve state and county from an identifier's first five digits.
pub fn resolve_geography(identifier: &str, area_median_income: f64) -> Geography {
    let state_code = identifier.get(0..2).unwrap_or_default();
    let county_code = identifier.get(2..5).unwrap_or_default();
    Geography {
        state_code: state_code.to_string(),
        county_code: county_code.to_string(),
        state_name: state_name(state_code).unwrap_or(UNKNOWN_STATE).to_string(),
        county_name: county_name(state_code, county_code)
            .unwrap_or(UNKNOWN_COUNTY)
            .to_string(),
        area_median_income,
    }
}
