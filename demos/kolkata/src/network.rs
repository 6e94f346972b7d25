//! Synthetic Kolkata road network.
//!
//! Every store and warehouse becomes a node.  Each node is joined to its
//! `LINKS_PER_SITE` nearest neighbours by a two-way road whose length is the
//! geodesic distance stretched by `DETOUR_FACTOR`.  Good enough for the
//! road-graph fallback and for map-matching; a real deployment loads an OSM
//! extract instead.

use std::collections::BTreeSet;

use lq_core::Coordinate;
use lq_spatial::{Road, RoadGraph, RoadGraphBuilder, SpatialResult};

const LINKS_PER_SITE: usize = 3;
const DETOUR_FACTOR:  f64   = 1.3;

/// A named location to seed the network with.
pub struct Site<'a> {
    pub name: &'a str,
    pub pos:  Coordinate,
}

pub fn build_network(sites: &[Site<'_>], speed_kmh: f64) -> SpatialResult<RoadGraph> {
    let mut b = RoadGraphBuilder::with_capacity(sites.len(), sites.len() * LINKS_PER_SITE * 2)
        .default_speed_kmh(speed_kmh);
    let nodes = sites.iter().map(|s| b.add_node(s.pos)).collect::<SpatialResult<Vec<_>>>()?;

    let mut linked = BTreeSet::new();
    for (i, site) in sites.iter().enumerate() {
        let mut by_distance: Vec<(usize, f64)> = sites
            .iter()
            .enumerate()
            .filter(|&(j, _)| j != i)
            .map(|(j, other)| (j, site.pos.distance_m(other.pos)))
            .collect();
        by_distance.sort_by(|a, b| a.1.total_cmp(&b.1));

        for &(j, metres) in by_distance.iter().take(LINKS_PER_SITE) {
            if !linked.insert((i.min(j), i.max(j))) {
                continue;
            }
            let road = Road::new(metres * DETOUR_FACTOR)
                .named(format!("{} - {} Road", site.name, sites[j].name))
                .with_geometry(vec![site.pos, sites[j].pos]);
            b.add_road(nodes[i], nodes[j], road)?;
        }
    }

    let graph = b.build();
    log::info!("road network: {} nodes, {} edges", graph.node_count(), graph.edge_count());
    Ok(graph)
}
