// Copyright (C) 2017 Kisio Digital and/or its affiliates.
//
// This program is free software: you can redistribute it and/or modify it
// under the terms of the GNU Affero General Public License as published by the
// Free Software Foundation, version 3.

// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more
// details.

// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>

//! Provides an easy way to create a multimodal graph for the tests.

#![allow(dead_code)]

use std::collections::HashMap;

use sleipnir::config::Criterion;
use sleipnir::multimodal_graph::{ConnectionKind, MultimodalEdge, MultimodalGraph, MultimodalVertex};
use sleipnir::poi::PoiData;
use sleipnir::public_transport::{
    Frequency, PublicTransportGraph, SectionData, StopData, Timetable, TripId, TripTime,
};
use sleipnir::road_graph::{RoadEdge, RoadEdgeData, RoadGraph, RoadVertex, RoadVertexData};
use sleipnir::request::{DepartureOrArrival, Request};
use sleipnir::time::Minutes;
use sleipnir::transport_mode::{ModeCatalogue, ModeId, SpeedRule, TrafficRules, TransportMode};
use sleipnir::NaiveDate;

pub const CAR: u64 = 1;
pub const WALK: u64 = 2;
pub const BIKE: u64 = 3;
pub const SHARED_BIKE: u64 = 4;
pub const BUS: u64 = 5;
pub const RETURNABLE_BIKE: u64 = 6;
pub const PRIVATE_CAR: u64 = 7;

pub fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn default_date() -> NaiveDate {
    NaiveDate::from_ymd(2013, 11, 12)
}

pub fn car() -> TransportMode {
    TransportMode::new(CAR, "car", TrafficRules::CAR, SpeedRule::Car)
}

pub fn pedestrian() -> TransportMode {
    TransportMode::new(WALK, "walking", TrafficRules::PEDESTRIAN, SpeedRule::Pedestrian)
}

pub fn bicycle() -> TransportMode {
    TransportMode::new(BIKE, "bicycle", TrafficRules::BICYCLE, SpeedRule::Bicycle)
}

pub fn shared_bike() -> TransportMode {
    let mut mode = TransportMode::new(
        SHARED_BIKE,
        "shared bike",
        TrafficRules::BICYCLE,
        SpeedRule::Bicycle,
    );
    mode.is_shared = true;
    mode
}

pub fn returnable_bike() -> TransportMode {
    let mut mode = TransportMode::new(
        RETURNABLE_BIKE,
        "returnable shared bike",
        TrafficRules::BICYCLE,
        SpeedRule::Bicycle,
    );
    mode.is_shared = true;
    mode.must_be_returned = true;
    mode
}

pub fn private_car() -> TransportMode {
    let mut mode = TransportMode::new(PRIVATE_CAR, "private car", TrafficRules::CAR, SpeedRule::Car);
    mode.need_parking = true;
    mode
}

pub fn bus() -> TransportMode {
    let mut mode = TransportMode::new(BUS, "bus", TrafficRules::BUS, SpeedRule::Other);
    mode.is_public_transport = true;
    mode
}

struct StopSpec {
    name: String,
    from: String,
    to: String,
    abscissa: f64,
}

struct SectionSpec {
    from_stop: String,
    to_stop: String,
    entries: Vec<(f64, f64, u64, u64)>,
    frequencies: Vec<Frequency>,
}

struct PoiSpec {
    name: String,
    from: String,
    to: String,
    abscissa: f64,
    parking_modes: Vec<u64>,
}

/// Builder used to easily create a `MultimodalGraph`.
///
/// Road vertices spring into existence the first time they are named; every
/// named object receives a distinct database id, which the tests use to
/// address origins and destinations.
#[derive(Default)]
pub struct GraphBuilder {
    road: RoadGraph,
    vertices: HashMap<String, RoadVertex>,
    ids: HashMap<String, u64>,
    next_db_id: u64,
    vertex_parking: HashMap<String, TrafficRules>,
    modes: ModeCatalogue,
    stops: Vec<StopSpec>,
    sections: Vec<SectionSpec>,
    services: Vec<(u64, Vec<NaiveDate>)>,
    pois: Vec<PoiSpec>,
}

pub struct Fixture {
    pub graph: MultimodalGraph,
    ids: HashMap<String, u64>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(mut self, mode: TransportMode) -> Self {
        self.modes.insert(mode.id, mode);
        self
    }

    /// Declare on-street parking at a vertex; call before the first road
    /// touching it.
    pub fn vertex_parking(mut self, name: &str, rules: TrafficRules) -> Self {
        self.vertex_parking.insert(name.to_string(), rules);
        self
    }

    fn vertex(&mut self, name: &str) -> RoadVertex {
        if let Some(vertex) = self.vertices.get(name) {
            return *vertex;
        }
        self.next_db_id += 1;
        let parking_traffic_rules = self
            .vertex_parking
            .get(name)
            .copied()
            .unwrap_or(TrafficRules::NONE);
        let vertex = self
            .road
            .add_vertex(RoadVertexData {
                db_id: self.next_db_id,
                parking_traffic_rules,
            })
            .unwrap();
        self.vertices.insert(name.to_string(), vertex);
        self.ids.insert(name.to_string(), self.next_db_id);
        vertex
    }

    /// A one-way road open to cars, pedestrians and bicycles, with a
    /// 50 km/h speed limit and no on-street parking.
    pub fn road(self, from: &str, to: &str, length: f64) -> Self {
        self.road_with(
            from,
            to,
            length,
            TrafficRules::CAR | TrafficRules::PEDESTRIAN | TrafficRules::BICYCLE,
            TrafficRules::NONE,
            50.0,
        )
    }

    pub fn road_with(
        mut self,
        from: &str,
        to: &str,
        length: f64,
        traffic_rules: TrafficRules,
        parking_traffic_rules: TrafficRules,
        car_speed_limit: f64,
    ) -> Self {
        let source = self.vertex(from);
        let target = self.vertex(to);
        self.next_db_id += 1;
        self.road
            .add_edge(RoadEdgeData {
                db_id: self.next_db_id,
                source,
                target,
                length,
                traffic_rules,
                parking_traffic_rules,
                car_speed_limit,
                speed_profile: None,
            })
            .unwrap();
        self
    }

    /// A stop attached to the road edge `from -> to` at `abscissa`.
    pub fn stop(mut self, name: &str, from: &str, to: &str, abscissa: f64) -> Self {
        self.stops.push(StopSpec {
            name: name.to_string(),
            from: from.to_string(),
            to: to.to_string(),
            abscissa,
        });
        self
    }

    /// A public transport section with a timetable, `(departure, arrival,
    /// trip_id, service_id)` per entry, sorted by departure.
    pub fn pt_section(
        mut self,
        from_stop: &str,
        to_stop: &str,
        entries: &[(f64, f64, u64, u64)],
    ) -> Self {
        self.sections.push(SectionSpec {
            from_stop: from_stop.to_string(),
            to_stop: to_stop.to_string(),
            entries: entries.to_vec(),
            frequencies: Vec::new(),
        });
        self
    }

    /// A public transport section served every `headway` minutes between
    /// `start` and `end_time`.
    pub fn frequency_section(
        mut self,
        from_stop: &str,
        to_stop: &str,
        trip_id: u64,
        start: f64,
        end_time: f64,
        headway: f64,
        travel_time: f64,
    ) -> Self {
        self.sections.push(SectionSpec {
            from_stop: from_stop.to_string(),
            to_stop: to_stop.to_string(),
            entries: Vec::new(),
            frequencies: vec![Frequency {
                trip_id: TripId::new(trip_id),
                start: Minutes::new(start),
                end_time: Minutes::new(end_time),
                headway: Minutes::new(headway),
                travel_time: Minutes::new(travel_time),
            }],
        });
        self
    }

    pub fn service(mut self, service_id: u64, dates: &[NaiveDate]) -> Self {
        self.services.push((service_id, dates.to_vec()));
        self
    }

    /// A POI attached to the road edge `from -> to` at `abscissa`, hosting
    /// the given modes.
    pub fn poi(mut self, name: &str, from: &str, to: &str, abscissa: f64, modes: &[u64]) -> Self {
        self.pois.push(PoiSpec {
            name: name.to_string(),
            from: from.to_string(),
            to: to.to_string(),
            abscissa,
            parking_modes: modes.to_vec(),
        });
        self
    }

    pub fn build(mut self) -> Fixture {
        let mut pt_graph = PublicTransportGraph::new();
        let mut stop_handles = HashMap::new();

        let stops = std::mem::replace(&mut self.stops, Vec::new());
        for spec in &stops {
            let edge = self.edge_of(&spec.from, &spec.to);
            self.next_db_id += 1;
            let stop = pt_graph.add_stop(StopData {
                db_id: self.next_db_id,
                name: spec.name.clone(),
                is_station: false,
                parent_station: None,
                road_edge: edge,
                opposite_road_edge: None,
                road_abscissa: spec.abscissa,
                zone_id: 0,
                coord: (0.0, 0.0),
            });
            stop_handles.insert(spec.name.clone(), stop);
            self.ids.insert(spec.name.clone(), self.next_db_id);
        }

        let sections = std::mem::replace(&mut self.sections, Vec::new());
        for spec in &sections {
            let mut timetable = Timetable::new();
            timetable
                .assign_sorted_table(
                    spec.entries
                        .iter()
                        .map(|&(departure, arrival, trip_id, service_id)| TripTime {
                            departure: Minutes::new(departure),
                            arrival: Minutes::new(arrival),
                            trip_id: TripId::new(trip_id),
                            service_id,
                        })
                        .collect(),
                )
                .unwrap();
            pt_graph
                .add_section(SectionData {
                    network_id: 1,
                    source: stop_handles[&spec.from_stop],
                    target: stop_handles[&spec.to_stop],
                    timetable,
                    frequencies: spec.frequencies.clone(),
                })
                .unwrap();
        }

        for (service_id, dates) in &self.services {
            for date in dates {
                pt_graph.services_mut().add(*service_id, *date);
            }
        }

        let pois = std::mem::replace(&mut self.pois, Vec::new());
        let mut poi_datas = Vec::new();
        for spec in &pois {
            let edge = self.edge_of(&spec.from, &spec.to);
            self.next_db_id += 1;
            poi_datas.push(PoiData {
                db_id: self.next_db_id,
                name: spec.name.clone(),
                road_edge: edge,
                road_abscissa: spec.abscissa,
                parking_modes: spec.parking_modes.iter().map(|&id| ModeId::new(id)).collect(),
            });
            self.ids.insert(spec.name.clone(), self.next_db_id);
        }

        let graph =
            MultimodalGraph::assemble(self.road, vec![pt_graph], poi_datas, self.modes).unwrap();
        Fixture {
            graph,
            ids: self.ids,
        }
    }

    fn edge_of(&self, from: &str, to: &str) -> RoadEdge {
        let source = self.vertices[from];
        let target = self.vertices[to];
        self.road.edge_between(source, target).unwrap()
    }
}

impl Fixture {
    pub fn id(&self, name: &str) -> u64 {
        self.ids[name]
    }

    pub fn vertex(&self, name: &str) -> MultimodalVertex {
        self.graph.vertex_by_db_id(self.id(name)).unwrap()
    }

    pub fn road_edge(&self, from: &str, to: &str) -> RoadEdge {
        let source = match self.vertex(from) {
            MultimodalVertex::Road(vertex) => vertex,
            _ => panic!("{} is not a road vertex", from),
        };
        let target = match self.vertex(to) {
            MultimodalVertex::Road(vertex) => vertex,
            _ => panic!("{} is not a road vertex", to),
        };
        self.graph.road().edge_between(source, target).unwrap()
    }

    /// The Transport2Transport multimodal edge between two stops.
    pub fn section_edge(&self, from_stop: &str, to_stop: &str) -> MultimodalEdge {
        let source = self.vertex(from_stop);
        let target = self.vertex(to_stop);
        self.graph
            .outgoing_edges(&source)
            .into_iter()
            .find(|edge| {
                matches!(edge.kind, ConnectionKind::Transport2Transport(_, _))
                    && edge.target == target
            })
            .unwrap()
    }

    pub fn request(&self, origin: &str, destination: &str, time: f64, modes: &[u64]) -> Request {
        Request {
            origin: self.id(origin),
            destination: self.id(destination),
            date: default_date(),
            time,
            departure_or_arrival: DepartureOrArrival::DepartAfter,
            allowed_modes: modes.iter().map(|&id| ModeId::new(id)).collect(),
            start_mode: None,
            criterion: Criterion::Time,
        }
    }
}

/// Assert two costs are the same up to float noise.
pub fn assert_close(actual: Minutes, expected: f64) {
    assert!(
        (actual.total_minutes() - expected).abs() < 1e-9,
        "expected {} minutes, got {}",
        expected,
        actual.total_minutes()
    );
}
