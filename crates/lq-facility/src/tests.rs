//! Unit tests for lq-facility.

#[cfg(test)]
mod helpers {
    use lq_core::{Coordinate, FacilityConfig, StoreId, WarehouseId};

    use crate::{ConnectivityTier, FacilityOptimizer, Store, Warehouse};

    pub fn store(id: u32, lat: f64, lon: f64, demand: Option<f64>) -> Store {
        Store {
            id: StoreId(id),
            name: format!("Store {id}"),
            pos: Coordinate::new(lat, lon),
            city: "Kolkata".into(),
            demand,
        }
    }

    pub fn warehouse(id: u32, lat: f64, lon: f64, cost: f64, capacity: f64) -> Warehouse {
        Warehouse {
            id: WarehouseId(id),
            name: format!("Warehouse {id}"),
            pos: Coordinate::new(lat, lon),
            cost,
            capacity,
            connectivity: ConnectivityTier::Good,
            ownership: "Test Owner".into(),
            city: "Kolkata".into(),
        }
    }

    /// Three stores in north-east Kolkata (demand 150 + 120 + default 100).
    pub fn three_stores() -> Vec<Store> {
        vec![
            store(1, 22.5867, 88.4177, Some(150.0)),
            store(2, 22.5972, 88.4317, Some(120.0)),
            store(3, 22.6035, 88.4040, None),
        ]
    }

    /// Warehouse 1 sits among the stores and is expensive; warehouse 2 is
    /// ~30 km away and cheap.
    pub fn near_and_far() -> Vec<Warehouse> {
        vec![
            warehouse(1, 22.5751, 88.4062, 20_000.0, 300.0),
            warehouse(2, 22.3460, 88.2260, 1_000.0, 500.0),
        ]
    }

    pub fn optimizer(stores: Vec<Store>, warehouses: Vec<Warehouse>) -> FacilityOptimizer {
        FacilityOptimizer::new(stores, warehouses, FacilityConfig::default()).unwrap()
    }

    pub fn ids(n: &[u32]) -> Vec<StoreId> {
        n.iter().map(|&i| StoreId(i)).collect()
    }
}

// ── Criteria ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod criteria {
    use crate::{Criterion, FacilityError};

    #[test]
    fn parses_dashboard_names() {
        assert_eq!("distance".parse::<Criterion>().unwrap(), Criterion::Distance);
        assert_eq!(" Cost ".parse::<Criterion>().unwrap(), Criterion::Cost);
        assert_eq!("capacity".parse::<Criterion>().unwrap(), Criterion::Capacity);
        assert_eq!("ml_clustering".parse::<Criterion>().unwrap(), Criterion::Clustering);
        assert_eq!("clustering".parse::<Criterion>().unwrap(), Criterion::Clustering);
    }

    #[test]
    fn rejects_unknown_names() {
        assert!(matches!("speed".parse::<Criterion>(), Err(FacilityError::InvalidInput(_))));
    }

    #[test]
    fn display_round_trips() {
        for c in Criterion::ALL {
            assert_eq!(c.to_string().parse::<Criterion>().unwrap(), c);
            assert_eq!(c.strategy().criterion(), c);
        }
    }
}

// ── Single-warehouse selection ────────────────────────────────────────────────

#[cfg(test)]
mod selection {
    use lq_core::{FacilityConfig, WarehouseId};

    use super::helpers::*;
    use crate::{Criterion, FacilityError, FacilityOptimizer, Metric};

    #[test]
    fn distance_picks_nearest_regardless_of_order() {
        let forward = optimizer(three_stores(), near_and_far());
        let mut swapped_wh = near_and_far();
        swapped_wh.reverse();
        let swapped = optimizer(three_stores(), swapped_wh);

        for opt in [&forward, &swapped] {
            let result = opt.optimize(&ids(&[1, 2, 3]), Criterion::Distance).unwrap();
            let best = result.best().unwrap();
            assert_eq!(best.warehouse.id, WarehouseId(1));
            assert_eq!(best.metric, Metric::TotalDistanceKm);
            assert_eq!(result.stores, ids(&[1, 2, 3]));
        }
    }

    #[test]
    fn distance_sum_is_geodesic() {
        let stores = three_stores();
        let wh = near_and_far();
        let expected: f64 = stores.iter().map(|s| s.pos.distance_km(wh[0].pos)).sum();
        let result = optimizer(stores, wh).optimize(&ids(&[1, 2, 3]), Criterion::Distance).unwrap();
        assert!((result.best().unwrap().total_distance_km - expected).abs() < 1e-9);
    }

    #[test]
    fn cost_adds_transport_at_per_km_rate() {
        let stores = three_stores();
        let wh = near_and_far();
        let far_km: f64 = stores.iter().map(|s| s.pos.distance_km(wh[1].pos)).sum();

        let result = optimizer(stores, wh).optimize(&ids(&[1, 2, 3]), Criterion::Cost).unwrap();
        let best = result.best().unwrap();
        assert_eq!(best.warehouse.id, WarehouseId(2));
        assert_eq!(best.metric, Metric::TotalCost);
        assert!((best.total_cost - (1_000.0 + far_km * 50.0)).abs() < 1e-6);
    }

    #[test]
    fn cost_rate_is_configurable() {
        // At 1000 per km the distant warehouse is no longer cheaper.
        let config = FacilityConfig { cost_per_km: 1_000.0, ..FacilityConfig::default() };
        let opt = FacilityOptimizer::new(three_stores(), near_and_far(), config).unwrap();
        let result = opt.optimize(&ids(&[1, 2, 3]), Criterion::Cost).unwrap();
        assert_eq!(result.best().unwrap().warehouse.id, WarehouseId(1));
    }

    #[test]
    fn capacity_skips_sites_that_are_too_small() {
        // Required 150 + 120 + 100 = 370; only warehouse 2 holds it.
        let result = optimizer(three_stores(), near_and_far()).optimize(&ids(&[1, 2, 3]), Criterion::Capacity).unwrap();
        let best = result.best().unwrap();
        assert_eq!(best.warehouse.id, WarehouseId(2));
        assert_eq!(best.required_capacity, 370.0);
        assert!((best.capacity_utilization - 74.0).abs() < 1e-9);
        assert!(!best.capacity_relaxed);
        assert_eq!(best.metric, Metric::FeasibleDistanceKm);
    }

    #[test]
    fn capacity_prefers_nearest_feasible() {
        // Both fit 150 units; the nearer one wins.
        let result = optimizer(three_stores(), near_and_far()).optimize(&ids(&[1]), Criterion::Capacity).unwrap();
        assert_eq!(result.best().unwrap().warehouse.id, WarehouseId(1));
    }

    #[test]
    fn capacity_relaxes_to_global_maximum() {
        let wh = vec![
            warehouse(1, 22.58, 88.41, 10_000.0, 300.0),
            warehouse(2, 22.40, 88.20, 10_000.0, 350.0),
            warehouse(3, 22.60, 88.40, 10_000.0, 200.0),
            warehouse(4, 22.70, 88.45, 10_000.0, 350.0),
        ];
        let result = optimizer(three_stores(), wh).optimize(&ids(&[1, 2, 3]), Criterion::Capacity).unwrap();
        let best = result.best().unwrap();
        // 2 and 4 tie at 350; the first encountered wins.
        assert_eq!(best.warehouse.id, WarehouseId(2));
        assert!(best.capacity_relaxed);
        assert!(best.capacity_utilization > 100.0);
    }

    #[test]
    fn ties_go_to_first_warehouse() {
        let wh = vec![
            warehouse(7, 22.59, 88.41, 10_000.0, 1_000.0),
            warehouse(8, 22.59, 88.41, 10_000.0, 1_000.0),
        ];
        for criterion in [Criterion::Distance, Criterion::Cost, Criterion::Capacity] {
            let result = optimizer(three_stores(), wh.clone()).optimize(&ids(&[1, 2]), criterion).unwrap();
            assert_eq!(result.best().unwrap().warehouse.id, WarehouseId(7), "{criterion}");
        }
    }

    #[test]
    fn every_result_names_its_metric() {
        let opt = optimizer(three_stores(), near_and_far());
        for criterion in [Criterion::Distance, Criterion::Cost, Criterion::Capacity] {
            let result = opt.optimize(&ids(&[1, 2, 3]), criterion).unwrap();
            assert_eq!(result.criterion, criterion);
            assert_eq!(result.best().unwrap().metric, criterion.metric());
        }
    }

    #[test]
    fn rejects_bad_requests() {
        let opt = optimizer(three_stores(), near_and_far());
        assert!(matches!(opt.optimize(&[], Criterion::Distance), Err(FacilityError::InvalidInput(_))));
        assert!(matches!(opt.optimize(&ids(&[1, 99]), Criterion::Distance), Err(FacilityError::InvalidInput(_))));
        assert!(matches!(opt.optimize(&ids(&[1, 1]), Criterion::Distance), Err(FacilityError::InvalidInput(_))));

        let empty = optimizer(three_stores(), Vec::new());
        assert!(matches!(empty.optimize(&ids(&[1]), Criterion::Distance), Err(FacilityError::NoWarehouses)));
    }

    #[test]
    fn rejects_invalid_records() {
        let dup = vec![store(1, 22.5, 88.3, None), store(1, 22.6, 88.4, None)];
        assert!(FacilityOptimizer::new(dup, near_and_far(), FacilityConfig::default()).is_err());

        let zero_capacity = vec![warehouse(1, 22.5, 88.3, 100.0, 0.0)];
        assert!(FacilityOptimizer::new(three_stores(), zero_capacity, FacilityConfig::default()).is_err());
    }
}

// ── Clustering ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod clustering {
    use lq_core::{Coordinate, FacilityConfig, WarehouseId};

    use super::helpers::*;
    use crate::cluster::{centroid, kmeans_labels};
    use crate::{Criterion, FacilityOptimizer, Metric};

    /// Three tight groups of three stores, ~35 km apart.
    fn grouped_stores() -> Vec<crate::Store> {
        let centres = [(22.50, 88.30), (22.80, 88.60), (22.20, 88.00)];
        let mut out = Vec::new();
        let mut id = 1;
        for (lat, lon) in centres {
            for (dlat, dlon) in [(0.0, 0.0), (0.004, -0.003), (-0.003, 0.005)] {
                out.push(store(id, lat + dlat, lon + dlon, None));
                id += 1;
            }
        }
        out
    }

    fn grouped_warehouses() -> Vec<crate::Warehouse> {
        vec![
            warehouse(10, 22.21, 88.01, 9_000.0, 1_000.0),
            warehouse(20, 22.51, 88.31, 9_000.0, 1_000.0),
            warehouse(30, 22.79, 88.59, 9_000.0, 1_000.0),
        ]
    }

    #[test]
    fn separated_groups_get_their_nearest_warehouse() {
        let opt = optimizer(grouped_stores(), grouped_warehouses());
        let result = opt.optimize(&ids(&[1, 2, 3, 4, 5, 6, 7, 8, 9]), Criterion::Clustering).unwrap();
        let clusters = result.clusters();
        assert_eq!(clusters.len(), 3);
        assert!(result.best().is_none());

        assert_eq!(clusters[0].members, ids(&[1, 2, 3]));
        assert_eq!(clusters[1].members, ids(&[4, 5, 6]));
        assert_eq!(clusters[2].members, ids(&[7, 8, 9]));
        assert_eq!(clusters[0].warehouse.id, WarehouseId(20));
        assert_eq!(clusters[1].warehouse.id, WarehouseId(30));
        assert_eq!(clusters[2].warehouse.id, WarehouseId(10));
        for c in clusters {
            assert_eq!(c.metric, Metric::CentroidDistanceKm);
            assert!((c.distance_km - c.centroid.distance_km(c.warehouse.pos)).abs() < 1e-9);
            assert!(c.distance_km < 3.0);
        }
    }

    #[test]
    fn centroid_is_in_degrees() {
        let opt = optimizer(grouped_stores(), grouped_warehouses());
        let result = opt.optimize(&ids(&[1, 2, 3, 4, 5, 6, 7, 8, 9]), Criterion::Clustering).unwrap();
        let c = &result.clusters()[0].centroid;
        assert!((c.lat - (22.50 + 22.504 + 22.497) / 3.0).abs() < 1e-9);
        assert!((c.lon - (88.30 + 88.297 + 88.305) / 3.0).abs() < 1e-9);
    }

    #[test]
    fn same_seed_same_clusters() {
        let opt = optimizer(grouped_stores(), grouped_warehouses());
        let a = opt.optimize(&ids(&[9, 1, 5, 2, 7, 3]), Criterion::Clustering).unwrap();
        let b = opt.optimize(&ids(&[9, 1, 5, 2, 7, 3]), Criterion::Clustering).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn k_is_capped_by_distinct_points() {
        let stores = vec![
            store(1, 22.50, 88.30, None),
            store(2, 22.50, 88.30, None),
            store(3, 22.80, 88.60, None),
        ];
        let config = FacilityConfig { cluster_count: 5, ..FacilityConfig::default() };
        let opt = FacilityOptimizer::new(stores, grouped_warehouses(), config).unwrap();
        let result = opt.optimize(&ids(&[1, 2, 3]), Criterion::Clustering).unwrap();
        let clusters = result.clusters();
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].members, ids(&[1, 2]));
        assert_eq!(clusters[1].members, ids(&[3]));
    }

    #[test]
    fn single_store_is_one_cluster() {
        let result = optimizer(grouped_stores(), grouped_warehouses())
            .optimize(&ids(&[4]), Criterion::Clustering)
            .unwrap();
        assert_eq!(result.clusters().len(), 1);
        assert_eq!(result.clusters()[0].warehouse.id, WarehouseId(30));
    }

    #[test]
    fn labels_number_by_first_appearance() {
        let pts: Vec<Coordinate> = grouped_stores().iter().rev().map(|s| s.pos).collect();
        let labels = kmeans_labels(&pts, 3, 42, 300).unwrap();
        assert_eq!(labels, vec![0, 0, 0, 1, 1, 1, 2, 2, 2]);
    }

    #[test]
    fn centroid_of_nothing_is_origin() {
        assert_eq!(centroid(std::iter::empty()), Coordinate::new(0.0, 0.0));
    }
}

// ── CSV loading ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod loading {
    use std::io::Cursor;

    use lq_core::{StoreId, WarehouseId};

    use crate::{ConnectivityTier, FacilityError, load_stores_csv, load_stores_reader, load_warehouses_reader};

    const STORES: &str = "\
Store_ID,Name,Latitude,Longitude,City,Demand
1,Salt Lake City,22.5867,88.4177,Kolkata,150
2,New Town,22.5754,88.4798,Kolkata,
";

    const WAREHOUSES: &str = "\
Warehouse_ID,Name,Latitude,Longitude,Cost,Connectivity,Capacity,Ownership,City
3,Dankuni,22.671679,88.300209,10000,Moderate,10000,Arun Kumar Modi,Kolkata
7,Beliaghata,22.567415,88.392433,11000,Good,700,Amitav Samanta,Kolkata
";

    #[test]
    fn loads_stores() {
        let stores = load_stores_reader(Cursor::new(STORES)).unwrap();
        assert_eq!(stores.len(), 2);
        assert_eq!(stores[0].id, StoreId(1));
        assert_eq!(stores[0].name, "Salt Lake City");
        assert_eq!(stores[0].demand, Some(150.0));
        assert_eq!(stores[1].demand, None);
    }

    #[test]
    fn demand_column_is_optional() {
        let csv = "Store_ID,Name,Latitude,Longitude,City\n5,Sreebhumi,22.5993,88.4022,Kolkata\n";
        let stores = load_stores_reader(Cursor::new(csv)).unwrap();
        assert_eq!(stores[0].demand, None);
    }

    #[test]
    fn loads_warehouses() {
        let wh = load_warehouses_reader(Cursor::new(WAREHOUSES)).unwrap();
        assert_eq!(wh.len(), 2);
        assert_eq!(wh[0].id, WarehouseId(3));
        assert_eq!(wh[0].connectivity, ConnectivityTier::Moderate);
        assert_eq!(wh[1].capacity, 700.0);
        assert_eq!(wh[1].ownership, "Amitav Samanta");
    }

    #[test]
    fn missing_column_is_rejected() {
        let csv = "Store_ID,Name,Latitude,City\n1,Salt Lake City,22.5867,Kolkata\n";
        assert!(matches!(load_stores_reader(Cursor::new(csv)), Err(FacilityError::Parse(_))));
    }

    #[test]
    fn bad_rows_name_their_line() {
        let csv = "Store_ID,Name,Latitude,Longitude,City\n1,Ok,22.5,88.3,Kolkata\n2,Bad,95.0,88.3,Kolkata\n";
        match load_stores_reader(Cursor::new(csv)) {
            Err(FacilityError::Parse(msg)) => assert!(msg.contains("line 3"), "{msg}"),
            other => panic!("expected Parse error, got {other:?}"),
        }

        let empty_name = "Store_ID,Name,Latitude,Longitude,City\n1,,22.5,88.3,Kolkata\n";
        assert!(matches!(load_stores_reader(Cursor::new(empty_name)), Err(FacilityError::Parse(_))));

        let bad_tier = WAREHOUSES.replace("Moderate", "Superb");
        assert!(matches!(load_warehouses_reader(Cursor::new(bad_tier)), Err(FacilityError::Parse(_))));

        let bad_capacity = WAREHOUSES.replace(",700,", ",-5,");
        assert!(matches!(load_warehouses_reader(Cursor::new(bad_capacity)), Err(FacilityError::Parse(_))));
    }

    #[test]
    fn loads_from_path() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("stores.csv");
        std::fs::write(&path, STORES).unwrap();
        assert_eq!(load_stores_csv(&path).unwrap().len(), 2);

        let missing = dir.path().join("nope.csv");
        assert!(matches!(load_stores_csv(&missing), Err(FacilityError::Io(_))));
    }
}

// ── Analytics ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod analytics {
    use super::helpers::warehouse;
    use crate::{ConnectivityTier, portfolio_summary};

    #[test]
    fn summarises_portfolio() {
        let mut wh = vec![
            warehouse(1, 22.5, 88.3, 10_000.0, 2_000.0),
            warehouse(2, 22.6, 88.4, 12_000.0, 4_000.0),
            warehouse(3, 22.7, 88.5, 16_000.0, 6_000.0),
        ];
        wh[2].connectivity = ConnectivityTier::Moderate;

        let s = portfolio_summary(&wh, 20);
        assert_eq!(s.warehouse_count, 3);
        assert_eq!(s.store_count, 20);
        assert_eq!(s.total_capacity, 12_000.0);
        assert_eq!(s.average_capacity, 4_000.0);
        assert!((s.average_cost - 38_000.0 / 3.0).abs() < 1e-9);
        assert_eq!(s.capacity_distribution.values, vec![2_000.0, 4_000.0, 6_000.0]);
        assert_eq!(s.cost_distribution.values, vec![1.0, 1.0, 0.0, 1.0]);
        assert_eq!(s.connectivity_analysis.labels, vec!["Good", "Moderate", "Poor"]);
        assert_eq!(s.connectivity_analysis.values, vec![2.0, 1.0, 0.0]);
    }

    #[test]
    fn empty_portfolio() {
        let s = portfolio_summary(&[], 0);
        assert_eq!(s.average_cost, 0.0);
        assert_eq!(s.cost_distribution.values.iter().sum::<f64>(), 0.0);
    }
}

// ── Forecasting ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod forecasting {
    use std::io::Cursor;

    use chrono::NaiveDate;
    use lq_core::{StoreId, WarehouseId};

    use crate::{
        FacilityError, StockStatus, demand_outlook, forecast, forecast_weekly, load_inventory_csv,
        load_inventory_reader, load_sales_reader, sales_series, shortage_analysis, store_location_id,
        warehouse_location_id,
    };

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    const SALES: &str = "\
Date,Location_ID,Item_ID,Units_Sold
2024-01-21,S1,RICE,110
2024-01-07,S1,RICE,100
2024-01-14,S1,RICE,90
2024-01-28,S1,RICE,120
2024-02-04,S1,RICE,130
2024-01-07,S1,OIL,40
2024-01-07,W3,RICE,900
";

    const INVENTORY: &str = "\
Location_ID,Item_ID,Item_Name,Current_Stock
S1,RICE,Rice 5kg,300
S1,OIL,Mustard Oil 1L,500
W3,RICE,Rice 5kg,10000
";

    #[test]
    fn rolling_mean_of_last_window() {
        let f = forecast(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 4, 3);
        assert_eq!(f, vec![4.5, 4.5, 4.5]);
    }

    #[test]
    fn short_series_gives_empty_forecast() {
        assert!(forecast(&[1.0, 2.0, 3.0], 4, 4).is_empty());
        assert!(forecast(&[], 1, 4).is_empty());
        assert!(forecast(&[1.0, 2.0], 0, 4).is_empty());
        assert_eq!(forecast(&[7.0, 9.0], 2, 1), vec![8.0]);
    }

    #[test]
    fn weekly_forecast_is_dated_after_last_observation() {
        let history = [(day(2024, 1, 7), 10.0), (day(2024, 1, 14), 20.0)];
        let f = forecast_weekly(&history, 2, 3);
        let dates: Vec<_> = f.iter().map(|p| p.date).collect();
        assert_eq!(dates, [day(2024, 1, 21), day(2024, 1, 28), day(2024, 2, 4)]);
        assert!(f.iter().all(|p| p.units == 15.0));
        assert!(forecast_weekly(&[], 1, 4).is_empty());
    }

    #[test]
    fn shortage_uses_truncated_cumulative_demand() {
        // 112.5 per week against 300 in stock: 188, 75, -37, -150.
        let report = shortage_analysis(300, &[112.5; 4]);
        let after: Vec<i64> = report.periods.iter().map(|p| p.stock_after).collect();
        assert_eq!(after, [188, 75, -37, -150]);
        assert_eq!(report.periods[0].forecast_units, 112);
        assert_eq!(report.periods[0].cumulative_units, 112);
        assert_eq!(report.periods[1].cumulative_units, 225);
        assert_eq!(report.periods[2].cumulative_units, 337);
        assert_eq!(report.periods[1].status, StockStatus::Ok);
        assert_eq!(report.periods[2].status, StockStatus::ShortageRisk);
        assert_eq!(report.first_shortage, Some(2));
        assert!(report.has_shortage());
    }

    #[test]
    fn exactly_zero_stock_is_ok() {
        let report = shortage_analysis(100, &[50.0, 50.0]);
        assert_eq!(report.periods[1].stock_after, 0);
        assert_eq!(report.periods[1].status, StockStatus::Ok);
        assert_eq!(report.first_shortage, None);
    }

    #[test]
    fn empty_forecast_has_no_periods() {
        let report = shortage_analysis(10, &[]);
        assert!(report.periods.is_empty());
        assert!(!report.has_shortage());
    }

    #[test]
    fn loads_sales_and_inventory() {
        let sales = load_sales_reader(Cursor::new(SALES)).unwrap();
        assert_eq!(sales.len(), 7);
        assert_eq!(sales[0].date, day(2024, 1, 21));
        assert_eq!(sales[0].location_id, "S1");
        assert_eq!(sales[0].units_sold, 110.0);

        let inventory = load_inventory_reader(Cursor::new(INVENTORY)).unwrap();
        assert_eq!(inventory.len(), 3);
        assert_eq!(inventory[1].item_name, "Mustard Oil 1L");
        assert_eq!(inventory[2].current_stock, 10_000);
    }

    #[test]
    fn bad_sales_rows_name_their_line() {
        let bad_date = "Date,Location_ID,Item_ID,Units_Sold\n2024-01-07,S1,RICE,1\n07/01/2024,S1,RICE,1\n";
        match load_sales_reader(Cursor::new(bad_date)) {
            Err(FacilityError::Parse(msg)) => assert!(msg.contains("line 3"), "{msg}"),
            other => panic!("expected Parse error, got {other:?}"),
        }

        let negative = "Date,Location_ID,Item_ID,Units_Sold\n2024-01-07,S1,RICE,-4\n";
        assert!(matches!(load_sales_reader(Cursor::new(negative)), Err(FacilityError::Parse(_))));

        let no_item = "Date,Location_ID,Item_ID,Units_Sold\n2024-01-07,S1,,4\n";
        assert!(matches!(load_sales_reader(Cursor::new(no_item)), Err(FacilityError::Parse(_))));

        let bad_stock = INVENTORY.replace(",300", ",-1");
        assert!(matches!(load_inventory_reader(Cursor::new(bad_stock)), Err(FacilityError::Parse(_))));
    }

    #[test]
    fn series_is_filtered_and_date_ordered() {
        let sales = load_sales_reader(Cursor::new(SALES)).unwrap();
        let series = sales_series(&sales, "S1", "RICE");
        let units: Vec<f64> = series.iter().map(|&(_, u)| u).collect();
        assert_eq!(units, [100.0, 90.0, 110.0, 120.0, 130.0]);
        assert_eq!(series[0].0, day(2024, 1, 7));
        assert!(sales_series(&sales, "S2", "RICE").is_empty());
    }

    #[test]
    fn outlook_flags_first_shortage_week() {
        let sales = load_sales_reader(Cursor::new(SALES)).unwrap();
        let inventory = load_inventory_reader(Cursor::new(INVENTORY)).unwrap();
        let outlook = demand_outlook(&sales, &inventory, "S1", "RICE", 4, 4).unwrap();

        // Mean of 90, 110, 120, 130.
        assert_eq!(outlook.item_name, "Rice 5kg");
        assert_eq!(outlook.history.len(), 5);
        assert_eq!(outlook.forecast.len(), 4);
        assert!(outlook.forecast.iter().all(|p| p.units == 112.5));
        assert_eq!(outlook.forecast[0].date, day(2024, 2, 11));
        assert_eq!(outlook.shortage.first_shortage, Some(2));
        assert_eq!(outlook.first_shortage_date(), Some(day(2024, 2, 25)));
    }

    #[test]
    fn outlook_with_short_history_has_no_forecast() {
        let sales = load_sales_reader(Cursor::new(SALES)).unwrap();
        let inventory = load_inventory_reader(Cursor::new(INVENTORY)).unwrap();
        let outlook = demand_outlook(&sales, &inventory, "S1", "OIL", 4, 4).unwrap();
        assert_eq!(outlook.history.len(), 1);
        assert!(outlook.forecast.is_empty());
        assert!(outlook.shortage.periods.is_empty());
        assert_eq!(outlook.first_shortage_date(), None);
    }

    #[test]
    fn outlook_needs_an_inventory_row() {
        let sales = load_sales_reader(Cursor::new(SALES)).unwrap();
        let inventory = load_inventory_reader(Cursor::new(INVENTORY)).unwrap();
        let err = demand_outlook(&sales, &inventory, "W3", "OIL", 4, 4).unwrap_err();
        assert!(matches!(err, FacilityError::InvalidInput(_)));
    }

    #[test]
    fn location_ids_carry_a_kind_prefix() {
        assert_eq!(store_location_id(StoreId(12)), "S12");
        assert_eq!(warehouse_location_id(WarehouseId(3)), "W3");
    }

    #[test]
    fn loads_inventory_from_path() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("inventory.csv");
        std::fs::write(&path, INVENTORY).unwrap();
        assert_eq!(load_inventory_csv(&path).unwrap().len(), 3);
    }
}
