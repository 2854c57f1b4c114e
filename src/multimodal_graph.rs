// Copyright  (C) 2020, Kisio Digital and/or its affiliates. All rights reserved.
//
// This file is part of Navitia,
// the software to build cool stuff with public transport.
//
// Hope you'll enjoy and contribute to this project,
// powered by Kisio Digital (www.kisio.com).
// Help us simplify mobility and open public transport:
// a non ending quest to the responsive locomotion way of traveling!
//
// This contribution is a part of the research and development work of the
// IVA Project which aims to enhance traveler information and is carried out
// under the leadership of the Technological Research Institute SystemX,
// with the partnership and support of the transport organization authority
// Ile-De-France Mobilités (IDFM), SNCF, and public funds
// under the scope of the French Program "Investissements d’Avenir".
//
// LICENCE: This program is free software; you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <http://www.gnu.org/licenses/>.
//
// Stay tuned using
// twitter @navitia
// channel `#navitia` on riot https://riot.im/app/#/room/#navitia:matrix.org
// https://groups.google.com/d/forum/navitia
// www.navitia.io

pub mod iters;

use std::collections::HashMap;
use std::fmt;

use crate::poi::{Poi, PoiData};
use crate::public_transport::{PublicTransportError, PublicTransportGraph, Section, Stop, TimetableError};
use crate::road_graph::{RoadEdge, RoadGraph, RoadGraphError, RoadVertex};
use crate::transport_mode::{ModeCatalogue, ModeId, TransportMode};

/// Index of a public transport subgraph in the arena owned by the
/// multimodal graph. Stops refer back to their subgraph through this id,
/// never by ownership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PtGraphId {
    pub(crate) idx: usize,
}

/// A vertex of the multimodal graph.
///
/// The derived lexicographic order is the tie-break order of the search
/// engine: road vertices first, then stops, then POIs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MultimodalVertex {
    Road(RoadVertex),
    Stop(PtGraphId, Stop),
    Poi(Poi),
}

/// What a multimodal edge connects, with the underlying descriptor when the
/// edge materialises a road edge or a public transport section. Attachment
/// edges (to stops and POIs) are derived on the fly and carry no descriptor:
/// their road geometry is resolved through the stop/POI attachment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionKind {
    Road2Road(RoadEdge),
    Road2Transport,
    Transport2Road,
    Transport2Transport(PtGraphId, Section),
    Road2Poi,
    Poi2Road,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MultimodalEdge {
    pub source: MultimodalVertex,
    pub target: MultimodalVertex,
    pub kind: ConnectionKind,
}

impl MultimodalEdge {
    pub fn road_edge(&self) -> Option<RoadEdge> {
        match self.kind {
            ConnectionKind::Road2Road(edge) => Some(edge),
            _ => None,
        }
    }
}

/// Load-time corruption of the multimodal model. Fatal at startup, never
/// surfaced per-query.
#[derive(Debug)]
pub enum ModelError {
    Road(RoadGraphError),
    PublicTransport(PublicTransportError),
    Timetable(TimetableError),
    StopAttachment { pt_graph: usize, stop_db_id: u64 },
    PoiAttachment { poi_db_id: u64 },
    BadAbscissa { db_id: u64, abscissa: f64 },
    UnknownMode { poi_db_id: u64, mode_id: u64 },
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::Road(err) => err.fmt(f),
            ModelError::PublicTransport(err) => err.fmt(f),
            ModelError::Timetable(err) => err.fmt(f),
            ModelError::StopAttachment { pt_graph, stop_db_id } => write!(
                f,
                "The stop {} of public transport graph {} is attached to a road edge that does not exist.",
                stop_db_id, pt_graph
            ),
            ModelError::PoiAttachment { poi_db_id } => write!(
                f,
                "The POI {} is attached to a road edge that does not exist.",
                poi_db_id
            ),
            ModelError::BadAbscissa { db_id, abscissa } => write!(
                f,
                "The road abscissa {} of object {} is outside [0, 1].",
                abscissa, db_id
            ),
            ModelError::UnknownMode { poi_db_id, mode_id } => write!(
                f,
                "The POI {} hosts the unknown transport mode {}.",
                poi_db_id, mode_id
            ),
        }
    }
}

impl std::error::Error for ModelError {}

impl From<RoadGraphError> for ModelError {
    fn from(err: RoadGraphError) -> Self {
        ModelError::Road(err)
    }
}

impl From<PublicTransportError> for ModelError {
    fn from(err: PublicTransportError) -> Self {
        ModelError::PublicTransport(err)
    }
}

impl From<TimetableError> for ModelError {
    fn from(err: TimetableError) -> Self {
        ModelError::Timetable(err)
    }
}

/// The whole routable model: road network, public transport subgraphs,
/// points of interest and the mode catalogue. Assembled once at load time,
/// shared read-only between concurrent queries.
#[derive(Debug)]
pub struct MultimodalGraph {
    road: RoadGraph,
    public_transports: Vec<PublicTransportGraph>,
    pois: Vec<PoiData>,
    modes: ModeCatalogue,

    // attachment indexes: which stops/POIs hang off an edge incident to a
    // road vertex, prebuilt so edge enumeration stays O(degree)
    stops_at_road_vertex: HashMap<RoadVertex, Vec<(PtGraphId, Stop)>>,
    pois_at_road_vertex: HashMap<RoadVertex, Vec<Poi>>,
    poi_of_db_id: HashMap<u64, Poi>,
}

impl MultimodalGraph {
    pub fn assemble(
        road: RoadGraph,
        public_transports: Vec<PublicTransportGraph>,
        pois: Vec<PoiData>,
        modes: ModeCatalogue,
    ) -> Result<Self, ModelError> {
        let mut stops_at_road_vertex: HashMap<RoadVertex, Vec<(PtGraphId, Stop)>> = HashMap::new();
        for (pt_idx, pt_graph) in public_transports.iter().enumerate() {
            let pt_graph_id = PtGraphId { idx: pt_idx };
            for stop_idx in 0..pt_graph.nb_of_stops() {
                let stop = Stop { idx: stop_idx };
                let stop_data = pt_graph.stop(stop);
                if !road.contains_edge(stop_data.road_edge) {
                    return Err(ModelError::StopAttachment {
                        pt_graph: pt_idx,
                        stop_db_id: stop_data.db_id,
                    });
                }
                if let Some(opposite) = stop_data.opposite_road_edge {
                    if !road.contains_edge(opposite) {
                        return Err(ModelError::StopAttachment {
                            pt_graph: pt_idx,
                            stop_db_id: stop_data.db_id,
                        });
                    }
                }
                if !(0.0..=1.0).contains(&stop_data.road_abscissa) {
                    return Err(ModelError::BadAbscissa {
                        db_id: stop_data.db_id,
                        abscissa: stop_data.road_abscissa,
                    });
                }
                let edge = road.edge(stop_data.road_edge);
                for &endpoint in &[edge.source, edge.target] {
                    stops_at_road_vertex
                        .entry(endpoint)
                        .or_default()
                        .push((pt_graph_id, stop));
                }
            }
        }

        let mut pois_at_road_vertex: HashMap<RoadVertex, Vec<Poi>> = HashMap::new();
        let mut poi_of_db_id = HashMap::new();
        for (poi_idx, poi_data) in pois.iter().enumerate() {
            let poi = Poi { idx: poi_idx };
            if !road.contains_edge(poi_data.road_edge) {
                return Err(ModelError::PoiAttachment {
                    poi_db_id: poi_data.db_id,
                });
            }
            if !(0.0..=1.0).contains(&poi_data.road_abscissa) {
                return Err(ModelError::BadAbscissa {
                    db_id: poi_data.db_id,
                    abscissa: poi_data.road_abscissa,
                });
            }
            for &mode_id in &poi_data.parking_modes {
                if !modes.contains_key(&mode_id) {
                    return Err(ModelError::UnknownMode {
                        poi_db_id: poi_data.db_id,
                        mode_id: mode_id.get(),
                    });
                }
            }
            let edge = road.edge(poi_data.road_edge);
            for &endpoint in &[edge.source, edge.target] {
                pois_at_road_vertex.entry(endpoint).or_default().push(poi);
            }
            poi_of_db_id.insert(poi_data.db_id, poi);
        }

        Ok(Self {
            road,
            public_transports,
            pois,
            modes,
            stops_at_road_vertex,
            pois_at_road_vertex,
            poi_of_db_id,
        })
    }

    pub fn road(&self) -> &RoadGraph {
        &self.road
    }

    pub fn public_transport(&self, id: PtGraphId) -> &PublicTransportGraph {
        &self.public_transports[id.idx]
    }

    pub fn nb_of_public_transports(&self) -> usize {
        self.public_transports.len()
    }

    pub fn poi(&self, poi: Poi) -> &PoiData {
        &self.pois[poi.idx]
    }

    pub fn mode(&self, mode_id: ModeId) -> Option<&TransportMode> {
        self.modes.get(&mode_id)
    }

    pub fn modes(&self) -> &ModeCatalogue {
        &self.modes
    }

    pub(crate) fn stops_at_road_vertex(&self, vertex: RoadVertex) -> &[(PtGraphId, Stop)] {
        self.stops_at_road_vertex
            .get(&vertex)
            .map_or(&[], Vec::as_slice)
    }

    pub(crate) fn pois_at_road_vertex(&self, vertex: RoadVertex) -> &[Poi] {
        self.pois_at_road_vertex
            .get(&vertex)
            .map_or(&[], Vec::as_slice)
    }

    /// Resolve a database id to a vertex: road vertices first, then stops,
    /// then POIs.
    pub fn vertex_by_db_id(&self, db_id: u64) -> Option<MultimodalVertex> {
        if let Some(vertex) = self.road.vertex_by_db_id(db_id) {
            return Some(MultimodalVertex::Road(vertex));
        }
        for (pt_idx, pt_graph) in self.public_transports.iter().enumerate() {
            if let Some(stop) = pt_graph.stop_by_db_id(db_id) {
                return Some(MultimodalVertex::Stop(PtGraphId { idx: pt_idx }, stop));
            }
        }
        self.poi_of_db_id
            .get(&db_id)
            .map(|poi| MultimodalVertex::Poi(*poi))
    }
}
