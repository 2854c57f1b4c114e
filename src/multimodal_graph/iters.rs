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

//! Enumeration of the multimodal edges around a vertex.
//!
//! Multimodal edges are derived on the fly from the road adjacency, the
//! stop-to-road attachments and the POI attachments; nothing here is stored
//! on the graph. Both directions are provided: the forward search walks
//! `outgoing_edges`, the backward search `incoming_edges`.

use super::{ConnectionKind, MultimodalEdge, MultimodalGraph, MultimodalVertex};

impl MultimodalGraph {
    /// Multimodal edges leaving `vertex`.
    ///
    /// At a road vertex: road out-edges, then attached stops, then attached
    /// POIs. At a stop: outgoing sections, then the road edges back to the
    /// two endpoints of the attachment edge. At a POI: the road edges back
    /// to its attachment endpoints.
    pub fn outgoing_edges(&self, vertex: &MultimodalVertex) -> Vec<MultimodalEdge> {
        let mut edges = Vec::new();
        match *vertex {
            MultimodalVertex::Road(road_vertex) => {
                for &road_edge in self.road().out_edges(road_vertex) {
                    edges.push(MultimodalEdge {
                        source: *vertex,
                        target: MultimodalVertex::Road(self.road().target(road_edge)),
                        kind: ConnectionKind::Road2Road(road_edge),
                    });
                }
                for &(pt_graph_id, stop) in self.stops_at_road_vertex(road_vertex) {
                    edges.push(MultimodalEdge {
                        source: *vertex,
                        target: MultimodalVertex::Stop(pt_graph_id, stop),
                        kind: ConnectionKind::Road2Transport,
                    });
                }
                for &poi in self.pois_at_road_vertex(road_vertex) {
                    edges.push(MultimodalEdge {
                        source: *vertex,
                        target: MultimodalVertex::Poi(poi),
                        kind: ConnectionKind::Road2Poi,
                    });
                }
            }
            MultimodalVertex::Stop(pt_graph_id, stop) => {
                let pt_graph = self.public_transport(pt_graph_id);
                for &section in pt_graph.out_sections(stop) {
                    edges.push(MultimodalEdge {
                        source: *vertex,
                        target: MultimodalVertex::Stop(pt_graph_id, pt_graph.section(section).target),
                        kind: ConnectionKind::Transport2Transport(pt_graph_id, section),
                    });
                }
                let attachment = self.road().edge(pt_graph.stop(stop).road_edge);
                for &endpoint in &[attachment.source, attachment.target] {
                    edges.push(MultimodalEdge {
                        source: *vertex,
                        target: MultimodalVertex::Road(endpoint),
                        kind: ConnectionKind::Transport2Road,
                    });
                }
            }
            MultimodalVertex::Poi(poi) => {
                let attachment = self.road().edge(self.poi(poi).road_edge);
                for &endpoint in &[attachment.source, attachment.target] {
                    edges.push(MultimodalEdge {
                        source: *vertex,
                        target: MultimodalVertex::Road(endpoint),
                        kind: ConnectionKind::Poi2Road,
                    });
                }
            }
        }
        edges
    }

    /// Multimodal edges arriving at `vertex`; the mirror of
    /// `outgoing_edges`, used by the backward search.
    pub fn incoming_edges(&self, vertex: &MultimodalVertex) -> Vec<MultimodalEdge> {
        let mut edges = Vec::new();
        match *vertex {
            MultimodalVertex::Road(road_vertex) => {
                for &road_edge in self.road().in_edges(road_vertex) {
                    edges.push(MultimodalEdge {
                        source: MultimodalVertex::Road(self.road().source(road_edge)),
                        target: *vertex,
                        kind: ConnectionKind::Road2Road(road_edge),
                    });
                }
                for &(pt_graph_id, stop) in self.stops_at_road_vertex(road_vertex) {
                    edges.push(MultimodalEdge {
                        source: MultimodalVertex::Stop(pt_graph_id, stop),
                        target: *vertex,
                        kind: ConnectionKind::Transport2Road,
                    });
                }
                for &poi in self.pois_at_road_vertex(road_vertex) {
                    edges.push(MultimodalEdge {
                        source: MultimodalVertex::Poi(poi),
                        target: *vertex,
                        kind: ConnectionKind::Poi2Road,
                    });
                }
            }
            MultimodalVertex::Stop(pt_graph_id, stop) => {
                let pt_graph = self.public_transport(pt_graph_id);
                for &section in pt_graph.in_sections(stop) {
                    edges.push(MultimodalEdge {
                        source: MultimodalVertex::Stop(pt_graph_id, pt_graph.section(section).source),
                        target: *vertex,
                        kind: ConnectionKind::Transport2Transport(pt_graph_id, section),
                    });
                }
                let attachment = self.road().edge(pt_graph.stop(stop).road_edge);
                for &endpoint in &[attachment.source, attachment.target] {
                    edges.push(MultimodalEdge {
                        source: MultimodalVertex::Road(endpoint),
                        target: *vertex,
                        kind: ConnectionKind::Road2Transport,
                    });
                }
            }
            MultimodalVertex::Poi(poi) => {
                let attachment = self.road().edge(self.poi(poi).road_edge);
                for &endpoint in &[attachment.source, attachment.target] {
                    edges.push(MultimodalEdge {
                        source: MultimodalVertex::Road(endpoint),
                        target: *vertex,
                        kind: ConnectionKind::Road2Poi,
                    });
                }
            }
        }
        edges
    }
}
