//! Synthetic central-Hanoi road network.
//!
//! Nine landmarks joined by two-way roads whose lengths are the straight-line
//! span stretched by a per-road detour factor, so every edge is at least as
//! long as the haversine distance between its endpoints.  Two roads carry a
//! bent curve; the Dai Co Viet corridor is a divided carriageway with a
//! parallel service road in each direction.

use anyhow::{Result, bail};

use wf_core::{GeoPoint, NodeId};
use wf_spatial::{RoadNetwork, RoadNetworkBuilder};

/// Named landmarks, in `NodeId` order.
pub const LANDMARKS: [(&str, i64, f64, f64); 9] = [
    // (name, external id, lat, lon)
    ("Hoan Kiem Lake",    1_001, 21.0288, 105.8525),
    ("Opera House",       1_002, 21.0243, 105.8575),
    ("Dong Xuan Market",  1_003, 21.0383, 105.8497),
    ("Long Bien Station", 1_004, 21.0410, 105.8480),
    ("Hanoi Station",     1_005, 21.0245, 105.8412),
    ("Thong Nhat Park",   1_006, 21.0160, 105.8440),
    ("Bach Khoa",         1_007, 21.0050, 105.8430),
    ("Vincom Ba Trieu",   1_008, 21.0110, 105.8570),
    ("Times City",        1_009, 20.9955, 105.8680),
];

/// Build the network and return it with the landmark ids in table order.
pub fn build_network() -> Result<(RoadNetwork, Vec<NodeId>)> {
    let mut b = RoadNetworkBuilder::with_capacity(LANDMARKS.len(), 32);

    let ids = LANDMARKS
        .iter()
        .map(|&(_, ext, lat, lon)| b.add_node_with_external_id(ext, GeoPoint::new(lat, lon)))
        .collect::<Result<Vec<_>, _>>()?;
    let &[lake, opera, market, long_bien, station, park, bach_khoa, vincom, times_city] =
        ids.as_slice()
    else {
        bail!("expected {} landmarks, got {}", LANDMARKS.len(), ids.len());
    };

    // (a, b, detour factor)
    let straight = [
        (lake,      opera,      1.25),
        (lake,      market,     1.20),
        (market,    long_bien,  1.15),
        (lake,      station,    1.30),
        (station,   park,       1.20),
        (park,      bach_khoa,  1.25),
        (park,      vincom,     1.35),
        (opera,     vincom,     1.20),
        (bach_khoa, vincom,     1.40),
    ];
    for (x, y, detour) in straight {
        let span = b.node_pos(x)?.distance_m(b.node_pos(y)?);
        b.add_road(x, y, span * detour)?;
    }

    // Curved roads: the lake shore and the riverside approach to Long Bien.
    let curved = [
        (lake, vincom, 1.30, GeoPoint::new(21.0200, 105.8560)),
        (long_bien, opera, 1.45, GeoPoint::new(21.0330, 105.8600)),
    ];
    for (x, y, detour, bend) in curved {
        let (px, py) = (b.node_pos(x)?, b.node_pos(y)?);
        let span = px.distance_m(py);
        b.add_road_with_geometry(x, y, span * detour, vec![px, bend, py])?;
    }

    // Dai Co Viet: main carriageway plus a longer service road, both ways.
    let span = b.node_pos(vincom)?.distance_m(b.node_pos(times_city)?);
    b.add_road(vincom, times_city, span * 1.15)?;
    b.add_road(vincom, times_city, span * 1.35)?;

    Ok((b.build(), ids))
}
