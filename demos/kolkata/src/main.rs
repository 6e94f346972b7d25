//! kolkata: end-to-end LocateIQ run over the Kolkata sample data.
//!
//! Loads 20 stores and 19 candidate warehouses from CSV, then prints
//! portfolio analytics, selects warehouses for a set of stores, plans a
//! delivery route with trip insights, or forecasts an item's demand against
//! its stock.
//!
//! Set `ORS_API_KEY` (environment or `.env`) to route over real roads via
//! openrouteservice; without it every leg uses the local fallback.

mod network;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, bail};
use chrono::Utc;
use clap::{Parser, Subcommand};
use env_logger::{Builder, Env};

use lq_core::{FallbackStrategy, PlannerConfig, ProviderConfig, StoreId, WarehouseId};
use lq_facility::{
    Criterion, FacilityOptimizer, Selection, StockStatus, Store, Warehouse, demand_outlook, load_inventory_csv,
    load_sales_csv, load_stores_csv, load_warehouses_csv, portfolio_summary,
};
use lq_route::{
    FuelEfficiency, InsightEngine, OfflineProvider, RouteAssembler, RouteOptions, RouteProvider,
    TemplateSummarizer, TrafficConditions, VehicleProfile, Waypoint, enrich_with_summary,
};

use network::{Site, build_network};

// ── Constants ─────────────────────────────────────────────────────────────────

const SUMMARY_TIMEOUT: Duration = Duration::from_secs(2);

// ── CLI ───────────────────────────────────────────────────────────────────────

/// Warehouse selection and delivery routing over the Kolkata sample data.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Directory holding stores.csv, warehouses.csv, historical_sales.csv
    /// and inventory.csv.
    #[arg(long, default_value = concat!(env!("CARGO_MANIFEST_DIR"), "/data"))]
    data: PathBuf,

    /// JSON planner configuration; missing fields take their defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Portfolio analytics for the warehouse candidates.
    Portfolio,

    /// Select warehouse(s) for a set of stores.
    Optimize {
        /// Comma-separated store ids; all stores when omitted.
        #[arg(long, value_delimiter = ',')]
        stores: Vec<u32>,

        /// distance, cost, capacity, or clustering.
        #[arg(long, default_value = "distance")]
        criterion: String,

        /// Print the full result as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Plan a delivery route from a warehouse through stores.
    Route {
        #[arg(long)]
        warehouse: u32,

        /// Comma-separated store ids, in visiting order.
        #[arg(long, value_delimiter = ',', required = true)]
        stores: Vec<u32>,

        /// Reorder stops by nearest neighbour.
        #[arg(long)]
        optimize: bool,

        /// Fall back to the synthetic road graph instead of straight lines.
        #[arg(long)]
        road_graph: bool,

        /// Vehicle efficiency in km per litre.
        #[arg(long)]
        kmpl: Option<f64>,

        /// Fuel price per litre.
        #[arg(long)]
        fuel_price: Option<f64>,

        /// Measured congestion in [0, 1].
        #[arg(long)]
        congestion: Option<f64>,
    },

    /// Forecast weekly demand for one item and check it against stock.
    Forecast {
        /// Location id: `S<n>` for a store, `W<n>` for a warehouse.
        #[arg(long)]
        location: String,

        #[arg(long)]
        item: String,

        /// Print the full outlook as JSON.
        #[arg(long)]
        json: bool,
    },
}

// ── Setup ─────────────────────────────────────────────────────────────────────

fn init_logging() {
    Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .format_module_path(false)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<PlannerConfig> {
    let mut config = match path {
        Some(p) => {
            let text = fs::read_to_string(p).with_context(|| format!("reading {}", p.display()))?;
            serde_json::from_str(&text).with_context(|| format!("parsing {}", p.display()))?
        }
        None => PlannerConfig::default(),
    };
    if let Ok(key) = std::env::var("ORS_API_KEY") {
        config.provider.api_key = Some(key);
    }
    config.validate()?;
    Ok(config)
}

#[cfg(feature = "http")]
fn provider(config: &ProviderConfig) -> Box<dyn RouteProvider> {
    match lq_route::OrsProvider::new(config) {
        Ok(p) => {
            log::info!("routing via {} ({})", config.base_url, config.profile);
            Box::new(p)
        }
        Err(e) => {
            log::warn!("{e}: every leg will use the local fallback");
            Box::new(OfflineProvider)
        }
    }
}

#[cfg(not(feature = "http"))]
fn provider(_config: &ProviderConfig) -> Box<dyn RouteProvider> {
    log::warn!("built without `http`: every leg will use the local fallback");
    Box::new(OfflineProvider)
}

fn store_ids(optimizer: &FacilityOptimizer, ids: &[u32]) -> Vec<StoreId> {
    if ids.is_empty() {
        optimizer.stores().iter().map(|s| s.id).collect()
    } else {
        ids.iter().map(|&i| StoreId(i)).collect()
    }
}

// ── Commands ──────────────────────────────────────────────────────────────────

fn run_portfolio(optimizer: &FacilityOptimizer) -> Result<()> {
    let summary = portfolio_summary(optimizer.warehouses(), optimizer.stores().len());
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn run_optimize(optimizer: &FacilityOptimizer, stores: &[u32], criterion: &str, json: bool) -> Result<()> {
    let criterion: Criterion = criterion.parse()?;
    let ids = store_ids(optimizer, stores);

    let t0 = Instant::now();
    let result = optimizer.optimize(&ids, criterion)?;
    let elapsed = t0.elapsed();

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!("Criterion: {criterion}  |  Stores: {}  |  {:.1} ms", ids.len(), elapsed.as_secs_f64() * 1e3);
    println!();
    match &result.selection {
        Selection::Single(best) => {
            println!("Recommended: {} (#{})", best.warehouse.name, best.warehouse.id.0);
            println!("  total distance  : {:>12.2} km", best.total_distance_km);
            println!("  total cost      : {:>12.2}", best.total_cost);
            println!("  required units  : {:>12.0}", best.required_capacity);
            println!("  utilization     : {:>11.1} %", best.capacity_utilization);
            if best.capacity_relaxed {
                println!("  (no site can hold the demand; largest site shown)");
            }
        }
        Selection::Clusters(clusters) => {
            println!("{:<8} {:<22} {:>10} {:<}", "Cluster", "Warehouse", "km", "Stores");
            println!("{}", "-".repeat(60));
            for c in clusters {
                let members: Vec<String> = c.members.iter().map(|id| id.0.to_string()).collect();
                println!(
                    "{:<8} {:<22} {:>10.2} {}",
                    c.cluster,
                    c.warehouse.name,
                    c.distance_km,
                    members.join(",")
                );
            }
        }
    }
    Ok(())
}

struct RouteArgs {
    warehouse:  u32,
    stores:     Vec<u32>,
    optimize:   bool,
    road_graph: bool,
    kmpl:       Option<f64>,
    fuel_price: Option<f64>,
    congestion: Option<f64>,
}

fn run_route(
    optimizer: &FacilityOptimizer,
    mut config: PlannerConfig,
    args: RouteArgs,
) -> Result<()> {
    if args.road_graph {
        config.routing.fallback = FallbackStrategy::RoadGraph;
    }

    // 1. Waypoints: warehouse first, then stores in the given order.
    let warehouse = optimizer
        .warehouses()
        .iter()
        .find(|w| w.id == WarehouseId(args.warehouse))
        .with_context(|| format!("unknown warehouse id {}", args.warehouse))?;
    let mut waypoints = vec![Waypoint::new(format!("W{}", warehouse.id.0), warehouse.pos).named(&warehouse.name)];
    for &id in &args.stores {
        let Some(store) = optimizer.store(StoreId(id)) else {
            bail!("unknown store id {id}");
        };
        waypoints.push(Waypoint::new(format!("S{}", store.id.0), store.pos).named(&store.name));
    }

    // 2. Road network over every known site.
    let sites = network_sites(optimizer.stores(), optimizer.warehouses());
    let graph = Arc::new(build_network(&sites, config.routing.default_edge_speed_kmh)?);

    // 3. Assemble.
    let assembler = RouteAssembler::new(graph, provider(&config.provider), config.routing.clone());
    let options = RouteOptions { optimize: args.optimize, ..RouteOptions::default() };
    let t0 = Instant::now();
    let route = assembler.assemble(waypoints, &options)?;
    let elapsed = t0.elapsed();

    // 4. Insights and summary.
    let vehicle = VehicleProfile {
        efficiency:           args.kmpl.map(FuelEfficiency::KmPerLiter),
        fuel_price_per_liter: args.fuel_price,
    };
    let traffic = args.congestion.map(|s| TrafficConditions { congestion_score: Some(s) });
    let engine = InsightEngine::new(config.insight.clone());
    let report = engine.compute(&route, Some(&vehicle), traffic.as_ref(), Utc::now());
    let report = enrich_with_summary(report, &route, Arc::new(TemplateSummarizer), SUMMARY_TIMEOUT);

    println!("Route assembled in {:.1} ms: {}", elapsed.as_secs_f64() * 1e3, route.waypoint_order.join(" -> "));
    println!();
    println!("{:<6} {:<6} {:>10} {:>10} {:<14}", "From", "To", "km", "min", "Source");
    println!("{}", "-".repeat(50));
    for leg in &route.legs {
        println!(
            "{:<6} {:<6} {:>10.2} {:>10.1} {:?}",
            leg.from,
            leg.to,
            leg.distance_m / 1_000.0,
            leg.duration_s / 60.0,
            leg.source
        );
    }
    println!();
    println!("Distance   : {:.2} km", report.distance_km);
    println!("Duration   : {:.1} min", report.duration_s / 60.0);
    println!("ETA        : {}", report.eta.format("%Y-%m-%d %H:%M UTC"));
    println!("Fuel       : {:.2} L, cost {:.2}", report.fuel_liters, report.estimated_fuel_cost);
    println!("Congestion : {:.2}", report.congestion_score);
    for note in &report.notes {
        println!("  - {note}");
    }
    if let Some(summary) = &report.summary {
        println!();
        println!("{summary}");
    }
    Ok(())
}

fn run_forecast(data: &Path, config: &PlannerConfig, location: &str, item: &str, json: bool) -> Result<()> {
    let sales = load_sales_csv(&data.join("historical_sales.csv"))?;
    let inventory = load_inventory_csv(&data.join("inventory.csv"))?;
    let outlook = demand_outlook(
        &sales,
        &inventory,
        location,
        item,
        config.facility.forecast_window,
        config.facility.forecast_horizon,
    )?;

    if json {
        println!("{}", serde_json::to_string_pretty(&outlook)?);
        return Ok(());
    }

    println!("{} at {}  |  stock {} units", outlook.item_name, outlook.location_id, outlook.current_stock);
    println!();
    if outlook.forecast.is_empty() {
        println!(
            "Not enough history to forecast: {} weeks, need {}.",
            outlook.history.len(),
            config.facility.forecast_window
        );
        return Ok(());
    }

    println!("{:<12} {:>10} {:>12} {:>12}  {}", "Week", "Forecast", "Cumulative", "Stock after", "Status");
    println!("{}", "-".repeat(62));
    for (point, period) in outlook.forecast.iter().zip(&outlook.shortage.periods) {
        let status = match period.status {
            StockStatus::Ok => "OK",
            StockStatus::ShortageRisk => "Shortage risk",
        };
        println!(
            "{:<12} {:>10} {:>12} {:>12}  {}",
            point.date.format("%Y-%m-%d"),
            period.forecast_units,
            period.cumulative_units,
            period.stock_after,
            status
        );
    }
    println!();
    match outlook.first_shortage_date() {
        Some(date) => println!("Shortage expected around {}.", date.format("%Y-%m-%d")),
        None => println!("Stock covers the next {} weeks.", outlook.forecast.len()),
    }
    Ok(())
}

fn network_sites<'a>(stores: &'a [Store], warehouses: &'a [Warehouse]) -> Vec<Site<'a>> {
    stores
        .iter()
        .map(|s| Site { name: &s.name, pos: s.pos })
        .chain(warehouses.iter().map(|w| Site { name: &w.name, pos: w.pos }))
        .collect()
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_logging();
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref())?;

    let stores = load_stores_csv(&cli.data.join("stores.csv"))?;
    let warehouses = load_warehouses_csv(&cli.data.join("warehouses.csv"))?;
    let optimizer = FacilityOptimizer::new(stores, warehouses, config.facility.clone())?;

    match cli.command {
        Command::Portfolio => run_portfolio(&optimizer),
        Command::Optimize { stores, criterion, json } => run_optimize(&optimizer, &stores, &criterion, json),
        Command::Route { warehouse, stores, optimize, road_graph, kmpl, fuel_price, congestion } => run_route(
            &optimizer,
            config,
            RouteArgs { warehouse, stores, optimize, road_graph, kmpl, fuel_price, congestion },
        ),
        Command::Forecast { location, item, json } => run_forecast(&cli.data, &config, &location, &item, json),
    }
}
