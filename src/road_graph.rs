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

use std::collections::HashMap;
use std::fmt;

use crate::speed_profile::SpeedProfileRef;
use crate::transport_mode::TrafficRules;

/// A vertex of the road graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RoadVertex {
    pub(crate) idx: usize,
}

/// A directed edge of the road graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RoadEdge {
    pub(crate) idx: usize,
}

#[derive(Debug, Clone)]
pub struct RoadVertexData {
    pub db_id: u64,
    /// Rules under which on-street parking is allowed at this vertex.
    pub parking_traffic_rules: TrafficRules,
}

#[derive(Debug, Clone)]
pub struct RoadEdgeData {
    pub db_id: u64,
    pub source: RoadVertex,
    pub target: RoadVertex,
    /// metres
    pub length: f64,
    pub traffic_rules: TrafficRules,
    /// Rules under which on-street parking is allowed along this edge.
    pub parking_traffic_rules: TrafficRules,
    /// km/h
    pub car_speed_limit: f64,
    pub speed_profile: Option<SpeedProfileRef>,
}

#[derive(Debug)]
pub enum RoadGraphError {
    UnknownEndpoint { edge_db_id: u64 },
    DuplicateEdge { edge_db_id: u64 },
    DuplicateVertexDbId { db_id: u64 },
}

impl fmt::Display for RoadGraphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoadGraphError::UnknownEndpoint { edge_db_id } => {
                write!(f, "The road edge {} refers to an unknown vertex.", edge_db_id)
            }
            RoadGraphError::DuplicateEdge { edge_db_id } => write!(
                f,
                "The road edge {} duplicates an existing (source, target) pair.",
                edge_db_id
            ),
            RoadGraphError::DuplicateVertexDbId { db_id } => {
                write!(f, "Two road vertices share the database id {}.", db_id)
            }
        }
    }
}

impl std::error::Error for RoadGraphError {}

/// The road network. Built once at load time, then read-only.
///
/// Out- and in-edges are enumerable in O(degree); `(source, target)` resolves
/// to an edge in O(1), which the multimodal layer relies on when walking stop
/// and POI attachments.
#[derive(Debug, Default)]
pub struct RoadGraph {
    vertex_datas: Vec<RoadVertexData>,
    edge_datas: Vec<RoadEdgeData>,
    out_edges: Vec<Vec<RoadEdge>>,
    in_edges: Vec<Vec<RoadEdge>>,
    edge_between: HashMap<(RoadVertex, RoadVertex), RoadEdge>,
    vertex_of_db_id: HashMap<u64, RoadVertex>,
    edge_of_db_id: HashMap<u64, RoadEdge>,
}

impl RoadGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_vertex(&mut self, data: RoadVertexData) -> Result<RoadVertex, RoadGraphError> {
        let vertex = RoadVertex {
            idx: self.vertex_datas.len(),
        };
        if self.vertex_of_db_id.insert(data.db_id, vertex).is_some() {
            return Err(RoadGraphError::DuplicateVertexDbId { db_id: data.db_id });
        }
        self.vertex_datas.push(data);
        self.out_edges.push(Vec::new());
        self.in_edges.push(Vec::new());
        Ok(vertex)
    }

    pub fn add_edge(&mut self, data: RoadEdgeData) -> Result<RoadEdge, RoadGraphError> {
        if data.source.idx >= self.vertex_datas.len() || data.target.idx >= self.vertex_datas.len()
        {
            return Err(RoadGraphError::UnknownEndpoint {
                edge_db_id: data.db_id,
            });
        }
        let edge = RoadEdge {
            idx: self.edge_datas.len(),
        };
        if self
            .edge_between
            .insert((data.source, data.target), edge)
            .is_some()
        {
            return Err(RoadGraphError::DuplicateEdge {
                edge_db_id: data.db_id,
            });
        }
        self.out_edges[data.source.idx].push(edge);
        self.in_edges[data.target.idx].push(edge);
        self.edge_of_db_id.insert(data.db_id, edge);
        self.edge_datas.push(data);
        Ok(edge)
    }

    pub fn vertex(&self, vertex: RoadVertex) -> &RoadVertexData {
        &self.vertex_datas[vertex.idx]
    }

    pub fn edge(&self, edge: RoadEdge) -> &RoadEdgeData {
        &self.edge_datas[edge.idx]
    }

    pub fn source(&self, edge: RoadEdge) -> RoadVertex {
        self.edge_datas[edge.idx].source
    }

    pub fn target(&self, edge: RoadEdge) -> RoadVertex {
        self.edge_datas[edge.idx].target
    }

    pub fn out_edges(&self, vertex: RoadVertex) -> &[RoadEdge] {
        &self.out_edges[vertex.idx]
    }

    pub fn in_edges(&self, vertex: RoadVertex) -> &[RoadEdge] {
        &self.in_edges[vertex.idx]
    }

    pub fn edge_between(&self, source: RoadVertex, target: RoadVertex) -> Option<RoadEdge> {
        self.edge_between.get(&(source, target)).copied()
    }

    pub fn vertex_by_db_id(&self, db_id: u64) -> Option<RoadVertex> {
        self.vertex_of_db_id.get(&db_id).copied()
    }

    pub fn edge_by_db_id(&self, db_id: u64) -> Option<RoadEdge> {
        self.edge_of_db_id.get(&db_id).copied()
    }

    pub fn contains_edge(&self, edge: RoadEdge) -> bool {
        edge.idx < self.edge_datas.len()
    }

    pub fn nb_of_vertices(&self) -> usize {
        self.vertex_datas.len()
    }

    pub fn nb_of_edges(&self) -> usize {
        self.edge_datas.len()
    }
}
