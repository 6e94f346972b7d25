//! CSV seed-data loader.
//!
//! # CSV formats
//!
//! ```csv
//! Store_ID,Name,Latitude,Longitude,City,Demand
//! 1,Salt Lake City,22.5867,88.4177,Kolkata,150
//! 2,New Town,22.5754,88.4798,Kolkata,
//! ```
//!
//! `Demand` is optional, as a column or per row.
//!
//! ```csv
//! Warehouse_ID,Name,Latitude,Longitude,Cost,Connectivity,Capacity,Ownership,City
//! 3,Dankuni,22.671679,88.300209,10000,Moderate,10000,Arun Kumar Modi,Kolkata
//! ```
//!
//! A row with a missing column, an empty required field, an unparseable
//! number, or an out-of-range coordinate rejects the whole file with
//! [`FacilityError::Parse`] naming the line.  Extra columns are ignored.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use lq_core::{Coordinate, StoreId, WarehouseId};

use crate::FacilityError;
use crate::model::{ConnectivityTier, Store, Warehouse};

// ── CSV records ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct StoreRecord {
    #[serde(rename = "Store_ID")]
    id:        u32,
    #[serde(rename = "Name")]
    name:      String,
    #[serde(rename = "Latitude")]
    latitude:  f64,
    #[serde(rename = "Longitude")]
    longitude: f64,
    #[serde(rename = "City")]
    city:      String,
    #[serde(rename = "Demand", default)]
    demand:    Option<f64>,
}

#[derive(Deserialize)]
struct WarehouseRecord {
    #[serde(rename = "Warehouse_ID")]
    id:           u32,
    #[serde(rename = "Name")]
    name:         String,
    #[serde(rename = "Latitude")]
    latitude:     f64,
    #[serde(rename = "Longitude")]
    longitude:    f64,
    #[serde(rename = "Cost")]
    cost:         f64,
    #[serde(rename = "Connectivity")]
    connectivity: String,
    #[serde(rename = "Capacity")]
    capacity:     f64,
    #[serde(rename = "Ownership")]
    ownership:    String,
    #[serde(rename = "City")]
    city:         String,
}

// ── Public API ────────────────────────────────────────────────────────────────

pub fn load_stores_csv(path: &Path) -> Result<Vec<Store>, FacilityError> {
    let file = std::fs::File::open(path)?;
    load_stores_reader(file)
}

/// Like [`load_stores_csv`] but accepts any `Read` source.
pub fn load_stores_reader<R: Read>(reader: R) -> Result<Vec<Store>, FacilityError> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut stores = Vec::new();

    for (i, result) in csv_reader.deserialize::<StoreRecord>().enumerate() {
        let line = i + 2;
        let row = result.map_err(|e| row_error(line, e))?;
        let pos = coordinate(line, row.latitude, row.longitude)?;
        let name = required(line, "Name", row.name)?;
        if let Some(d) = row.demand.filter(|d| !(d.is_finite() && *d >= 0.0)) {
            return Err(FacilityError::Parse(format!("line {line}: invalid Demand {d}")));
        }
        stores.push(Store { id: StoreId(row.id), name, pos, city: row.city, demand: row.demand });
    }
    log::debug!("loaded {} stores", stores.len());
    Ok(stores)
}

pub fn load_warehouses_csv(path: &Path) -> Result<Vec<Warehouse>, FacilityError> {
    let file = std::fs::File::open(path)?;
    load_warehouses_reader(file)
}

/// Like [`load_warehouses_csv`] but accepts any `Read` source.
pub fn load_warehouses_reader<R: Read>(reader: R) -> Result<Vec<Warehouse>, FacilityError> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut warehouses = Vec::new();

    for (i, result) in csv_reader.deserialize::<WarehouseRecord>().enumerate() {
        let line = i + 2;
        let row = result.map_err(|e| row_error(line, e))?;
        let pos = coordinate(line, row.latitude, row.longitude)?;
        let connectivity: ConnectivityTier = row
            .connectivity
            .parse()
            .map_err(|e| FacilityError::Parse(format!("line {line}: {e}")))?;
        let warehouse = Warehouse {
            id: WarehouseId(row.id),
            name: required(line, "Name", row.name)?,
            pos,
            cost: row.cost,
            capacity: row.capacity,
            connectivity,
            ownership: required(line, "Ownership", row.ownership)?,
            city: row.city,
        };
        warehouse.validate().map_err(|e| FacilityError::Parse(format!("line {line}: {e}")))?;
        warehouses.push(warehouse);
    }
    log::debug!("loaded {} warehouses", warehouses.len());
    Ok(warehouses)
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn row_error(line: usize, e: csv::Error) -> FacilityError {
    FacilityError::Parse(format!("line {line}: {e}"))
}

fn coordinate(line: usize, lat: f64, lon: f64) -> Result<Coordinate, FacilityError> {
    Coordinate::try_new(lat, lon).map_err(|e| FacilityError::Parse(format!("line {line}: {e}")))
}

fn required(line: usize, field: &str, value: String) -> Result<String, FacilityError> {
    if value.is_empty() {
        Err(FacilityError::Parse(format!("line {line}: {field} must not be empty")))
    } else {
        Ok(value)
    }
}
