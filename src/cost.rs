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

use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::config::{Criterion, RequestParams};
use crate::multimodal_graph::{
    ConnectionKind, MultimodalEdge, MultimodalGraph, MultimodalVertex, PtGraphId,
};
use crate::public_transport::{Frequency, Section, TripId};
use crate::road_graph::{RoadEdgeData, RoadVertex};
use crate::speed_profile::RoadEdgeSpeedProfile;
use crate::time::Minutes;
use crate::transport_mode::{ModeId, SpeedRule, TrafficRules, TransportMode};

/// Time penalty to add when walking in and out from/to a public transport
/// station, in minutes.
pub const PT_STATION_PENALTY: f64 = 0.1;
/// Same, for a POI.
pub const POI_STATION_PENALTY: f64 = 0.1;

/// Outcome of traversing one multimodal edge.
#[derive(Debug, Clone, Copy)]
pub struct TravelCost {
    /// Relaxation increment, in the units of the request criterion.
    pub cost: Minutes,
    /// Waiting included in (forward) or shifted out of (reverse timetable)
    /// the increment.
    pub wait: Minutes,
    /// Accumulated reverse-axis offset after the traversal.
    pub shift: Minutes,
    /// Trip aboard after the traversal; `TripId::NONE` off public transport.
    pub trip: TripId,
}

/// Pure per-edge cost functions of a single query.
///
/// Borrows the shared graph and speed profile; owns only the query
/// parameters, so building one per request is cheap.
pub struct CostCalculator<'g> {
    graph: &'g MultimodalGraph,
    date: NaiveDate,
    allowed_modes: BTreeSet<ModeId>,
    criterion: Criterion,
    walking_speed: f64,
    cycling_speed: f64,
    min_transfer_time: Minutes,
    car_parking_search_time: Minutes,
    vehicle_pickup_time: Minutes,
    vehicle_return_time: Minutes,
    private_parking: Option<RoadVertex>,
    speed_profile: Option<&'g RoadEdgeSpeedProfile>,
}

impl<'g> CostCalculator<'g> {
    pub fn new(
        graph: &'g MultimodalGraph,
        date: NaiveDate,
        allowed_modes: impl IntoIterator<Item = ModeId>,
        criterion: Criterion,
        params: &RequestParams,
        speed_profile: Option<&'g RoadEdgeSpeedProfile>,
    ) -> Self {
        let private_parking = params
            .private_parking
            .and_then(|db_id| graph.road().vertex_by_db_id(db_id));
        Self {
            graph,
            date,
            allowed_modes: allowed_modes.into_iter().collect(),
            criterion,
            walking_speed: params.walking_speed,
            cycling_speed: params.cycling_speed,
            min_transfer_time: Minutes::new(params.min_transfer_time),
            car_parking_search_time: Minutes::new(params.car_parking_search_time),
            vehicle_pickup_time: Minutes::new(params.vehicle_pickup_time),
            vehicle_return_time: Minutes::new(params.vehicle_return_time),
            private_parking,
            speed_profile,
        }
    }

    pub fn criterion(&self) -> Criterion {
        self.criterion
    }

    pub fn is_mode_allowed(&self, mode_id: ModeId) -> bool {
        self.allowed_modes.contains(&mode_id)
    }

    /// Allowed modes in increasing id order, so relaxation order does not
    /// depend on the request's mode list order.
    pub fn allowed_mode_ids(&self) -> Vec<ModeId> {
        self.allowed_modes.iter().copied().collect()
    }

    /// Time (or distance) to traverse `edge` with `mode_id`, leaving its
    /// search-order tail at engine time `time` while aboard `trip_in`.
    /// `None` means the traversal is impossible.
    pub fn travel_time(
        &self,
        edge: &MultimodalEdge,
        mode_id: ModeId,
        time: Minutes,
        shift: Minutes,
        trip_in: TripId,
        reverse: bool,
    ) -> Option<TravelCost> {
        if !self.allowed_modes.contains(&mode_id) {
            return None;
        }
        let mode = self.graph.mode(mode_id)?;
        match edge.kind {
            ConnectionKind::Road2Road(road_edge) => {
                let data = self.graph.road().edge(road_edge);
                let cost = self.road_cost(data, data.length, time, mode)?;
                Some(TravelCost {
                    cost,
                    wait: Minutes::zero(),
                    shift,
                    trip: TripId::NONE,
                })
            }
            ConnectionKind::Road2Transport => {
                let (pt_graph_id, stop) = match edge.target {
                    MultimodalVertex::Stop(pt_graph_id, stop) => (pt_graph_id, stop),
                    _ => return None,
                };
                let stop_data = self.graph.public_transport(pt_graph_id).stop(stop);
                let mut cost = self.attachment_cost(
                    stop_data.road_edge,
                    stop_data.road_abscissa,
                    &edge.source,
                    &edge.target,
                    time,
                    mode,
                    PT_STATION_PENALTY,
                )?;
                let mut wait = Minutes::zero();
                if reverse && !trip_in.is_none() {
                    // coming (in search order) from a Transport2Transport:
                    // the traveler still has to clear the transfer slack
                    wait = self.min_transfer_time;
                    cost += self.min_transfer_time;
                }
                Some(TravelCost {
                    cost,
                    wait,
                    shift,
                    trip: TripId::NONE,
                })
            }
            ConnectionKind::Transport2Road => {
                let (pt_graph_id, stop) = match edge.source {
                    MultimodalVertex::Stop(pt_graph_id, stop) => (pt_graph_id, stop),
                    _ => return None,
                };
                let stop_data = self.graph.public_transport(pt_graph_id).stop(stop);
                let cost = self.attachment_cost(
                    stop_data.road_edge,
                    stop_data.road_abscissa,
                    &edge.source,
                    &edge.target,
                    time,
                    mode,
                    PT_STATION_PENALTY,
                )?;
                Some(TravelCost {
                    cost,
                    wait: Minutes::zero(),
                    shift,
                    trip: TripId::NONE,
                })
            }
            ConnectionKind::Road2Poi | ConnectionKind::Poi2Road => {
                let poi = match (edge.kind, edge.source, edge.target) {
                    (ConnectionKind::Road2Poi, _, MultimodalVertex::Poi(poi)) => poi,
                    (ConnectionKind::Poi2Road, MultimodalVertex::Poi(poi), _) => poi,
                    _ => return None,
                };
                let poi_data = self.graph.poi(poi);
                let cost = self.attachment_cost(
                    poi_data.road_edge,
                    poi_data.road_abscissa,
                    &edge.source,
                    &edge.target,
                    time,
                    mode,
                    POI_STATION_PENALTY,
                )?;
                Some(TravelCost {
                    cost,
                    wait: Minutes::zero(),
                    shift,
                    trip: TripId::NONE,
                })
            }
            ConnectionKind::Transport2Transport(pt_graph_id, section) => {
                if self.criterion == Criterion::Distance {
                    return None;
                }
                if !mode.is_public_transport {
                    return None;
                }
                if reverse {
                    self.public_transport_backward(pt_graph_id, section, time, shift, trip_in)
                } else {
                    self.public_transport_forward(pt_graph_id, section, time, shift, trip_in)
                }
            }
        }
    }

    /// Cost of a full or partial road traversal under the request criterion.
    fn road_cost(
        &self,
        data: &RoadEdgeData,
        length: f64,
        time: Minutes,
        mode: &TransportMode,
    ) -> Option<Minutes> {
        if !data.traffic_rules.intersects(mode.traffic_rules) {
            return None;
        }
        match self.criterion {
            Criterion::Distance => Some(Minutes::new(length)),
            Criterion::Time => self.road_travel_time(data, length, time, mode),
        }
    }

    /// Minutes to cover `length` metres of `data`, integrating the speed
    /// profile when the edge has one.
    fn road_travel_time(
        &self,
        data: &RoadEdgeData,
        length: f64,
        time: Minutes,
        mode: &TransportMode,
    ) -> Option<Minutes> {
        if length <= 0.0 {
            return Some(Minutes::zero());
        }
        if let (Some(profiles), Some(profile_ref)) = (self.speed_profile, data.speed_profile) {
            if let Some(periods) = profiles.periods_after(profile_ref, mode.speed_rule, time) {
                let mut remaining = length;
                let mut t_begin = time;
                let mut speed = 0.0;
                for period in periods {
                    if remaining <= 0.0 {
                        break;
                    }
                    speed = period.speed * 1000.0 / 60.0; // km/h -> m/min
                    let t_end = period.begin + period.length;
                    remaining -= speed * (t_end - t_begin).total_minutes();
                    t_begin = t_end;
                }
                if remaining > 0.0 {
                    // profile exhausted before the edge: average speed for
                    // what is left
                    let tail = self.average_travel_time(data, remaining, mode)?;
                    return Some(t_begin - time + tail);
                }
                return Some(t_begin + Minutes::new(remaining / speed) - time);
            }
        }
        self.average_travel_time(data, length, mode)
    }

    fn average_travel_time(
        &self,
        data: &RoadEdgeData,
        length: f64,
        mode: &TransportMode,
    ) -> Option<Minutes> {
        let minutes = match mode.speed_rule {
            // take 60% of the speed limit, in km/h
            SpeedRule::Car => length / (data.car_speed_limit * 1000.0 * 0.60) * 60.0,
            // m/s -> m/min
            SpeedRule::Pedestrian => length / (self.walking_speed * 60.0),
            SpeedRule::Bicycle => length / (self.cycling_speed * 60.0),
            SpeedRule::Other => return None,
        };
        Some(Minutes::new(minutes))
    }

    /// Cost of the partial road traversal materialised by an attachment
    /// edge, plus the station penalty. A public transport mode covers it on
    /// foot (the traveler is walking between the road and the platform);
    /// any other mode must be allowed on the attachment edge.
    #[allow(clippy::too_many_arguments)]
    fn attachment_cost(
        &self,
        road_edge: crate::road_graph::RoadEdge,
        abscissa: f64,
        source: &MultimodalVertex,
        target: &MultimodalVertex,
        time: Minutes,
        mode: &TransportMode,
        station_penalty: f64,
    ) -> Option<Minutes> {
        let data = self.graph.road().edge(road_edge);
        let from_source = match (source, target) {
            (MultimodalVertex::Road(vertex), _) => *vertex == data.source,
            (_, MultimodalVertex::Road(vertex)) => *vertex != data.target,
            _ => return None,
        };
        let length = if from_source {
            data.length * abscissa
        } else {
            data.length * (1.0 - abscissa)
        };
        match self.criterion {
            Criterion::Distance => Some(Minutes::new(length)),
            Criterion::Time => {
                let walk = if mode.is_public_transport {
                    Some(Minutes::new(length / (self.walking_speed * 60.0)))
                } else {
                    self.road_cost(data, length, time, mode)
                }?;
                Some(walk + Minutes::new(station_penalty))
            }
        }
    }

    fn public_transport_forward(
        &self,
        pt_graph_id: PtGraphId,
        section: Section,
        time: Minutes,
        shift: Minutes,
        trip_in: TripId,
    ) -> Option<TravelCost> {
        let pt_graph = self.graph.public_transport(pt_graph_id);
        let section_data = pt_graph.section(section);
        if !section_data.timetable.is_empty() {
            // Continue on the same trip: its departure here may already be
            // behind us, only its arrival matters.
            if !trip_in.is_none() {
                if let Some(entry) =
                    pt_graph.next_arrival_of_trip(section, &self.date, trip_in, time)
                {
                    return Some(TravelCost {
                        cost: entry.arrival - time,
                        wait: Minutes::zero(),
                        shift,
                        trip: trip_in,
                    });
                }
            }
            // Else board the first service after the transfer slack.
            let entry =
                pt_graph.next_departure(section, &self.date, time + self.min_transfer_time)?;
            return Some(TravelCost {
                cost: entry.arrival - time,
                wait: entry.departure - time,
                shift,
                trip: entry.trip_id,
            });
        }
        if !section_data.frequencies.is_empty() {
            return self.frequency_forward(&section_data.frequencies, time, shift, trip_in);
        }
        None
    }

    fn public_transport_backward(
        &self,
        pt_graph_id: PtGraphId,
        section: Section,
        time: Minutes,
        shift: Minutes,
        trip_in: TripId,
    ) -> Option<TravelCost> {
        let pt_graph = self.graph.public_transport(pt_graph_id);
        let section_data = pt_graph.section(section);
        // real clock on the reversed axis
        let clock = -time - shift;
        if !section_data.timetable.is_empty() {
            if !trip_in.is_none() {
                if let Some(entry) =
                    pt_graph.previous_arrival_of_trip(section, &self.date, trip_in, clock)
                {
                    return Some(TravelCost {
                        cost: clock - entry.departure,
                        wait: Minutes::zero(),
                        shift,
                        trip: trip_in,
                    });
                }
            }
            // The arriving trip must leave room for the transfer; the wait
            // at this stop moves into the shift so potentials stay monotone.
            let entry =
                pt_graph.previous_arrival(section, &self.date, clock - self.min_transfer_time)?;
            let wait = clock - entry.arrival;
            return Some(TravelCost {
                cost: entry.arrival - entry.departure,
                wait,
                shift: shift + wait,
                trip: entry.trip_id,
            });
        }
        if !section_data.frequencies.is_empty() {
            return self.frequency_backward(&section_data.frequencies, clock, shift, trip_in);
        }
        None
    }

    fn frequency_forward(
        &self,
        frequencies: &[Frequency],
        time: Minutes,
        shift: Minutes,
        trip_in: TripId,
    ) -> Option<TravelCost> {
        if let Some(frequency) = covering_frequency(frequencies, time) {
            if frequency.trip_id == trip_in {
                return Some(TravelCost {
                    cost: frequency.travel_time,
                    wait: Minutes::zero(),
                    shift,
                    trip: trip_in,
                });
            }
        }
        let boarding = time + self.min_transfer_time;
        let frequency = covering_frequency(frequencies, boarding)?;
        let wait = frequency.headway / 2.0;
        Some(TravelCost {
            cost: frequency.travel_time + wait,
            wait,
            shift,
            trip: frequency.trip_id,
        })
    }

    /// Mirror of `frequency_forward` on the reversed time axis.
    fn frequency_backward(
        &self,
        frequencies: &[Frequency],
        clock: Minutes,
        shift: Minutes,
        trip_in: TripId,
    ) -> Option<TravelCost> {
        if let Some(frequency) = covering_frequency(frequencies, clock) {
            if frequency.trip_id == trip_in {
                return Some(TravelCost {
                    cost: frequency.travel_time,
                    wait: Minutes::zero(),
                    shift,
                    trip: trip_in,
                });
            }
        }
        let arriving = clock - self.min_transfer_time;
        let frequency = covering_frequency(frequencies, arriving)?;
        let wait = frequency.headway / 2.0;
        Some(TravelCost {
            cost: frequency.travel_time + wait,
            wait,
            shift,
            trip: frequency.trip_id,
        })
    }

    /// Transfer cost when switching from `initial_mode_id` to
    /// `final_mode_id` over `edge`, in chronological order. `None` when the
    /// switch is impossible there.
    pub fn transfer_time(
        &self,
        edge: &MultimodalEdge,
        initial_mode_id: ModeId,
        final_mode_id: ModeId,
    ) -> Option<Minutes> {
        if initial_mode_id == final_mode_id {
            return Some(Minutes::zero());
        }
        let initial_mode = self.graph.mode(initial_mode_id)?;
        let final_mode = self.graph.mode(final_mode_id)?;
        // boarding-to-boarding is handled by the timetable lookups
        if initial_mode.is_public_transport && final_mode.is_public_transport {
            return Some(Minutes::zero());
        }

        let mut transfer = Minutes::zero();

        // leave the current vehicle at the target
        if initial_mode.must_be_returned {
            if self.poi_hosting(&edge.target, initial_mode_id).is_some() {
                transfer += self.vehicle_return_time;
            } else {
                return None;
            }
        } else if initial_mode.need_parking {
            if self.poi_hosting(&edge.target, initial_mode_id).is_some() {
                if initial_mode.traffic_rules.intersects(TrafficRules::CAR) {
                    transfer += self.car_parking_search_time;
                } else if initial_mode.is_shared {
                    transfer += self.vehicle_return_time;
                }
                // a bicycle parks in no time
            } else if self.is_private_parking(&edge.target) && !initial_mode.is_shared {
                transfer += Minutes::new(1.0);
            } else if self.street_parking_allowed(edge, initial_mode)
                || self.vertex_parking_allowed(&edge.target, initial_mode)
            {
                if initial_mode.traffic_rules.intersects(TrafficRules::CAR) {
                    transfer += self.car_parking_search_time;
                }
            } else {
                return None;
            }
        }

        // take the next vehicle at the source
        if final_mode.is_shared {
            if self.poi_hosting(&edge.source, final_mode_id).is_some() {
                transfer += self.vehicle_pickup_time;
            } else {
                return None;
            }
        } else if final_mode.need_parking {
            if self.is_private_parking(&edge.source) {
                transfer += Minutes::new(1.0);
            } else {
                return None;
            }
        }

        Some(transfer)
    }

    fn poi_hosting(&self, vertex: &MultimodalVertex, mode_id: ModeId) -> Option<()> {
        match vertex {
            MultimodalVertex::Poi(poi) if self.graph.poi(*poi).has_parking_mode(mode_id) => {
                Some(())
            }
            _ => None,
        }
    }

    fn is_private_parking(&self, vertex: &MultimodalVertex) -> bool {
        match (vertex, self.private_parking) {
            (MultimodalVertex::Road(vertex), Some(parking)) => *vertex == parking,
            _ => false,
        }
    }

    fn street_parking_allowed(&self, edge: &MultimodalEdge, mode: &TransportMode) -> bool {
        match edge.road_edge() {
            Some(road_edge) => self
                .graph
                .road()
                .edge(road_edge)
                .parking_traffic_rules
                .intersects(mode.traffic_rules),
            None => false,
        }
    }

    fn vertex_parking_allowed(&self, vertex: &MultimodalVertex, mode: &TransportMode) -> bool {
        match vertex {
            MultimodalVertex::Road(vertex) => self
                .graph
                .road()
                .vertex(*vertex)
                .parking_traffic_rules
                .intersects(mode.traffic_rules),
            _ => false,
        }
    }
}

/// The frequency interval in service at `time`, i.e. the last interval
/// starting at or before `time`, provided it has not ended. Frequency
/// intervals of a section do not overlap.
fn covering_frequency(frequencies: &[Frequency], time: Minutes) -> Option<&Frequency> {
    let idx = frequencies.partition_point(|frequency| frequency.start <= time);
    if idx == 0 {
        return None;
    }
    let frequency = &frequencies[idx - 1];
    if frequency.end_time < time {
        return None;
    }
    Some(frequency)
}
