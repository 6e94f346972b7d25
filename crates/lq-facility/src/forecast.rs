//! Demand forecasting and inventory shortage analysis.
//!
//! A forecast is the mean of the last `window` observations, repeated for
//! `horizon` weekly periods.  Shortage analysis walks the forecast,
//! subtracting cumulative demand from the current stock.  Demand figures
//! are truncated to whole units before they are compared against stock.
//!
//! # CSV formats
//!
//! ```csv
//! Date,Location_ID,Item_ID,Units_Sold
//! 2024-01-07,S1,ITEM-1,120
//! ```
//!
//! ```csv
//! Location_ID,Item_ID,Item_Name,Current_Stock
//! S1,ITEM-1,Rice 5kg,300
//! ```
//!
//! Location ids are `S<store id>` for stores and `W<warehouse id>` for
//! warehouses.  As with the seed loaders, one bad row rejects the file.

use std::io::Read;
use std::path::Path;

use chrono::{Days, NaiveDate};
use serde::Deserialize;

use lq_core::{StoreId, WarehouseId};

use crate::{FacilityError, FacilityResult};

const DATE_FORMAT: &str = "%Y-%m-%d";
const DAYS_PER_PERIOD: u64 = 7;

// ── Records ───────────────────────────────────────────────────────────────────

/// Units of one item sold at one location in the week ending `date`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SalesRecord {
    pub date:        NaiveDate,
    pub location_id: String,
    pub item_id:     String,
    pub units_sold:  f64,
}

/// Stock on hand of one item at one location.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct InventoryRecord {
    pub location_id:   String,
    pub item_id:       String,
    pub item_name:     String,
    pub current_stock: i64,
}

pub fn store_location_id(id: StoreId) -> String {
    format!("S{}", id.0)
}

pub fn warehouse_location_id(id: WarehouseId) -> String {
    format!("W{}", id.0)
}

// ── Forecast ──────────────────────────────────────────────────────────────────

/// Rolling-mean forecast: the mean of the last `window` values, repeated
/// `horizon` times.  Empty when `window` is zero or the series is shorter
/// than `window`.
pub fn forecast(series: &[f64], window: usize, horizon: usize) -> Vec<f64> {
    if window == 0 || series.len() < window {
        return Vec::new();
    }
    let tail = &series[series.len() - window..];
    let mean = tail.iter().sum::<f64>() / window as f64;
    vec![mean; horizon]
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ForecastPoint {
    pub date:  NaiveDate,
    pub units: f64,
}

/// [`forecast`] over a dated history.  Period `i` (from 0) is dated
/// `i + 1` weeks after the last observation.  `history` must be in date
/// order.
pub fn forecast_weekly(history: &[(NaiveDate, f64)], window: usize, horizon: usize) -> Vec<ForecastPoint> {
    let Some(&(last, _)) = history.last() else {
        return Vec::new();
    };
    let values: Vec<f64> = history.iter().map(|&(_, v)| v).collect();
    forecast(&values, window, horizon)
        .into_iter()
        .enumerate()
        .map_while(|(i, units)| {
            let weeks = i as u64 + 1;
            last.checked_add_days(Days::new(weeks * DAYS_PER_PERIOD)).map(|date| ForecastPoint { date, units })
        })
        .collect()
}

/// Dated sales of one item at one location, oldest first.  Rows sharing a
/// date keep their file order.
pub fn sales_series(sales: &[SalesRecord], location_id: &str, item_id: &str) -> Vec<(NaiveDate, f64)> {
    let mut series: Vec<(NaiveDate, f64)> = sales
        .iter()
        .filter(|r| r.location_id == location_id && r.item_id == item_id)
        .map(|r| (r.date, r.units_sold))
        .collect();
    series.sort_by_key(|&(d, _)| d);
    series
}

// ── Shortage analysis ─────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum StockStatus {
    Ok,
    ShortageRisk,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ShortagePeriod {
    pub period:           usize,
    /// Forecast demand for this period, truncated to whole units.
    pub forecast_units:   i64,
    /// Running total of forecast demand, truncated to whole units.
    pub cumulative_units: i64,
    pub stock_after:      i64,
    pub status:           StockStatus,
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ShortageReport {
    pub periods:        Vec<ShortagePeriod>,
    /// Index of the first period whose stock goes negative.
    pub first_shortage: Option<usize>,
}

impl ShortageReport {
    pub fn has_shortage(&self) -> bool {
        self.first_shortage.is_some()
    }
}

/// Stock left after each forecast period.  A period is at risk once
/// cumulative demand exceeds `current_stock`; reaching exactly zero is
/// still OK.
pub fn shortage_analysis(current_stock: i64, forecast: &[f64]) -> ShortageReport {
    let mut cumulative = 0.0;
    let mut periods = Vec::with_capacity(forecast.len());
    let mut first_shortage = None;

    for (period, &units) in forecast.iter().enumerate() {
        cumulative += units;
        let cumulative_units = cumulative.trunc() as i64;
        let stock_after = current_stock.saturating_sub(cumulative_units);
        let status = if stock_after < 0 { StockStatus::ShortageRisk } else { StockStatus::Ok };
        if status == StockStatus::ShortageRisk && first_shortage.is_none() {
            first_shortage = Some(period);
        }
        periods.push(ShortagePeriod {
            period,
            forecast_units: units.trunc() as i64,
            cumulative_units,
            stock_after,
            status,
        });
    }
    ShortageReport { periods, first_shortage }
}

// ── Outlook ───────────────────────────────────────────────────────────────────

/// Forecast plus shortage analysis for one item at one location.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DemandOutlook {
    pub location_id:   String,
    pub item_id:       String,
    pub item_name:     String,
    pub current_stock: i64,
    pub history:       Vec<(NaiveDate, f64)>,
    /// Empty when the history is shorter than the window.
    pub forecast:      Vec<ForecastPoint>,
    pub shortage:      ShortageReport,
}

impl DemandOutlook {
    /// Date of the first forecast period at risk.
    pub fn first_shortage_date(&self) -> Option<NaiveDate> {
        self.shortage.first_shortage.and_then(|i| self.forecast.get(i)).map(|p| p.date)
    }
}

/// Build the outlook for `item_id` at `location_id`.  Fails when the item
/// has no inventory row at that location.
pub fn demand_outlook(
    sales:       &[SalesRecord],
    inventory:   &[InventoryRecord],
    location_id: &str,
    item_id:     &str,
    window:      usize,
    horizon:     usize,
) -> FacilityResult<DemandOutlook> {
    let stock = inventory
        .iter()
        .find(|r| r.location_id == location_id && r.item_id == item_id)
        .ok_or_else(|| {
            FacilityError::InvalidInput(format!("no inventory for item {item_id:?} at location {location_id:?}"))
        })?;

    let history = sales_series(sales, location_id, item_id);
    let forecast = forecast_weekly(&history, window, horizon);
    if forecast.is_empty() {
        log::info!(
            "{location_id}/{item_id}: {} observations, need {window} to forecast",
            history.len()
        );
    }
    let units: Vec<f64> = forecast.iter().map(|p| p.units).collect();
    let shortage = shortage_analysis(stock.current_stock, &units);

    Ok(DemandOutlook {
        location_id: stock.location_id.clone(),
        item_id: stock.item_id.clone(),
        item_name: stock.item_name.clone(),
        current_stock: stock.current_stock,
        history,
        forecast,
        shortage,
    })
}

// ── CSV loading ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct SalesRow {
    #[serde(rename = "Date")]
    date:        String,
    #[serde(rename = "Location_ID")]
    location_id: String,
    #[serde(rename = "Item_ID")]
    item_id:     String,
    #[serde(rename = "Units_Sold")]
    units_sold:  f64,
}

#[derive(Deserialize)]
struct InventoryRow {
    #[serde(rename = "Location_ID")]
    location_id:   String,
    #[serde(rename = "Item_ID")]
    item_id:       String,
    #[serde(rename = "Item_Name")]
    item_name:     String,
    #[serde(rename = "Current_Stock")]
    current_stock: i64,
}

pub fn load_sales_csv(path: &Path) -> FacilityResult<Vec<SalesRecord>> {
    let file = std::fs::File::open(path)?;
    load_sales_reader(file)
}

/// Like [`load_sales_csv`] but accepts any `Read` source.
pub fn load_sales_reader<R: Read>(reader: R) -> FacilityResult<Vec<SalesRecord>> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut sales = Vec::new();

    for (i, result) in csv_reader.deserialize::<SalesRow>().enumerate() {
        let line = i + 2;
        let row = result.map_err(|e| parse_error(line, e))?;
        let date = NaiveDate::parse_from_str(&row.date, DATE_FORMAT)
            .map_err(|e| parse_error(line, format!("Date {:?}: {e}", row.date)))?;
        if !(row.units_sold.is_finite() && row.units_sold >= 0.0) {
            return Err(parse_error(line, format!("invalid Units_Sold {}", row.units_sold)));
        }
        sales.push(SalesRecord {
            date,
            location_id: non_empty(line, "Location_ID", row.location_id)?,
            item_id: non_empty(line, "Item_ID", row.item_id)?,
            units_sold: row.units_sold,
        });
    }
    log::debug!("loaded {} sales rows", sales.len());
    Ok(sales)
}

pub fn load_inventory_csv(path: &Path) -> FacilityResult<Vec<InventoryRecord>> {
    let file = std::fs::File::open(path)?;
    load_inventory_reader(file)
}

/// Like [`load_inventory_csv`] but accepts any `Read` source.
pub fn load_inventory_reader<R: Read>(reader: R) -> FacilityResult<Vec<InventoryRecord>> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut inventory = Vec::new();

    for (i, result) in csv_reader.deserialize::<InventoryRow>().enumerate() {
        let line = i + 2;
        let row = result.map_err(|e| parse_error(line, e))?;
        if row.current_stock < 0 {
            return Err(parse_error(line, format!("invalid Current_Stock {}", row.current_stock)));
        }
        inventory.push(InventoryRecord {
            location_id: non_empty(line, "Location_ID", row.location_id)?,
            item_id: non_empty(line, "Item_ID", row.item_id)?,
            item_name: non_empty(line, "Item_Name", row.item_name)?,
            current_stock: row.current_stock,
        });
    }
    log::debug!("loaded {} inventory rows", inventory.len());
    Ok(inventory)
}

fn parse_error(line: usize, e: impl std::fmt::Display) -> FacilityError {
    FacilityError::Parse(format!("line {line}: {e}"))
}

fn non_empty(line: usize, field: &str, value: String) -> FacilityResult<String> {
    if value.is_empty() {
        Err(parse_error(line, format!("{field} must not be empty")))
    } else {
        Ok(value)
    }
}
