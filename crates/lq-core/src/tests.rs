//! Unit tests for lq-core primitives.

#[cfg(test)]
mod ids {
    use crate::{EdgeId, NodeId, StoreId, WarehouseId};

    #[test]
    fn index_roundtrip() {
        let id = NodeId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(NodeId::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn ordering() {
        assert!(StoreId(1) < StoreId(2));
        assert!(WarehouseId(100) > WarehouseId(99));
    }

    #[test]
    fn invalid_sentinels_are_max() {
        assert_eq!(NodeId::INVALID.0, u32::MAX);
        assert_eq!(EdgeId::INVALID.0, u32::MAX);
    }

    #[test]
    fn display() {
        assert_eq!(WarehouseId(7).to_string(), "WarehouseId(7)");
    }
}

#[cfg(test)]
mod geo {
    use crate::{CoreError, Coordinate};

    #[test]
    fn zero_distance() {
        let p = Coordinate::new(22.5867, 88.4177);
        assert!(p.distance_m(p).abs() < 1e-9);
    }

    #[test]
    fn one_degree_of_latitude() {
        // On the ellipsoid one degree of latitude centred on 22.5° N is ~110.74 km.
        let a = Coordinate::new(22.0, 88.0);
        let b = Coordinate::new(23.0, 88.0);
        let d = a.distance_m(b);
        assert!((d - 110_737.0).abs() < 200.0, "got {d}");
    }

    #[test]
    fn ellipsoid_and_sphere_agree_closely() {
        let salt_lake = Coordinate::new(22.5867, 88.4177);
        let kalighat = Coordinate::new(22.5206, 88.3436);
        let ellipsoid = salt_lake.distance_m(kalighat);
        let sphere = salt_lake.haversine_m(kalighat);
        assert!((ellipsoid - sphere).abs() / ellipsoid < 0.005);
        assert!(ellipsoid > 10_000.0 && ellipsoid < 11_000.0, "got {ellipsoid}");
    }

    #[test]
    fn symmetric() {
        let a = Coordinate::new(22.726156, 88.47496);
        let b = Coordinate::new(22.334173, 88.243058);
        assert!((a.distance_m(b) - b.distance_m(a)).abs() < 1e-6);
    }

    #[test]
    fn nearly_antipodal_converges() {
        let a = Coordinate::new(0.0, 0.0);
        let b = Coordinate::new(0.5, 179.7);
        let d = a.distance_m(b);
        assert!(d.is_finite());
        assert!(d > 19_000_000.0, "got {d}");
        assert!((d - a.haversine_m(b)).abs() / d < 0.005);
    }

    #[test]
    fn km_is_metres_over_thousand() {
        let a = Coordinate::new(22.0, 88.0);
        let b = Coordinate::new(22.1, 88.1);
        assert!((a.distance_km(b) * 1_000.0 - a.distance_m(b)).abs() < 1e-9);
    }

    #[test]
    fn validation() {
        assert!(Coordinate::try_new(90.0, -180.0).is_ok());
        assert!(matches!(
            Coordinate::try_new(91.0, 0.0),
            Err(CoreError::InvalidCoordinate { .. })
        ));
        assert!(Coordinate::try_new(0.0, 180.5).is_err());
        assert!(Coordinate::try_new(f64::NAN, 0.0).is_err());
    }
}

#[cfg(test)]
mod config {
    use crate::{FallbackStrategy, PlannerConfig};

    #[test]
    fn defaults_match_reference_app() {
        let cfg = PlannerConfig::default();
        assert_eq!(cfg.routing.fallback_speed_kmh, 50.0);
        assert_eq!(cfg.routing.default_edge_speed_kmh, 30.0);
        assert_eq!(cfg.routing.fallback, FallbackStrategy::StraightLine);
        assert_eq!(cfg.insight.default_liters_per_100km, 8.0);
        assert_eq!(cfg.facility.cost_per_km, 50.0);
        assert!(cfg.provider.api_key.is_none());
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn rejects_zero_speed() {
        let mut cfg = PlannerConfig::default();
        cfg.routing.fallback_speed_kmh = 0.0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_zero_clusters() {
        let mut cfg = PlannerConfig::default();
        cfg.facility.cluster_count = 0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn forecast_window_and_horizon() {
        let cfg = PlannerConfig::default();
        assert_eq!(cfg.facility.forecast_window, 4);
        assert_eq!(cfg.facility.forecast_horizon, 4);

        let mut cfg = PlannerConfig::default();
        cfg.facility.forecast_window = 0;
        assert!(cfg.validate().is_err());

        let mut cfg = PlannerConfig::default();
        cfg.facility.forecast_horizon = 0;
        assert!(cfg.validate().is_err());
    }
}
