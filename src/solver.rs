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

use std::sync::atomic::AtomicBool;

use log::debug;

use crate::automaton::{TurnRestriction, TurnRestrictionAutomaton};
use crate::config::RequestParams;
use crate::cost::CostCalculator;
use crate::engine::{Backward, Forward, MultimodalDijkstra};
use crate::multimodal_graph::MultimodalGraph;
use crate::request::{BadRequest, DepartureOrArrival, Request, RequestError};
use crate::response::Response;
use crate::speed_profile::RoadEdgeSpeedProfile;
use crate::time::Minutes;
use crate::transport_mode::ModeId;

/// Owns the two automatons derived from the restriction list and dispatches
/// each query to a forward or backward engine. One solver may serve many
/// concurrent queries: each call builds its own engine state.
pub struct Solver<'g> {
    graph: &'g MultimodalGraph,
    forward_automaton: TurnRestrictionAutomaton,
    backward_automaton: TurnRestrictionAutomaton,
    speed_profile: Option<&'g RoadEdgeSpeedProfile>,
}

impl<'g> Solver<'g> {
    pub fn new(
        graph: &'g MultimodalGraph,
        restrictions: &[TurnRestriction],
        speed_profile: Option<&'g RoadEdgeSpeedProfile>,
    ) -> Self {
        let forward_automaton = TurnRestrictionAutomaton::new(graph.road(), restrictions);
        let backward_automaton = TurnRestrictionAutomaton::reversed(graph.road(), restrictions);
        debug!(
            "Built turn restriction automatons with {} forward and {} backward states.",
            forward_automaton.nb_of_states(),
            backward_automaton.nb_of_states()
        );
        Self {
            graph,
            forward_automaton,
            backward_automaton,
            speed_profile,
        }
    }

    pub fn solve_request(
        &self,
        request: &Request,
        params: &RequestParams,
        cancel: &AtomicBool,
    ) -> Result<Response, RequestError> {
        let origin = self
            .graph
            .vertex_by_db_id(request.origin)
            .ok_or(BadRequest::UnknownOrigin(request.origin))?;
        let destination = self
            .graph
            .vertex_by_db_id(request.destination)
            .ok_or(BadRequest::UnknownDestination(request.destination))?;

        if request.allowed_modes.is_empty() {
            return Err(BadRequest::NoAllowedMode.into());
        }
        for &mode_id in &request.allowed_modes {
            if self.graph.mode(mode_id).is_none() {
                return Err(BadRequest::UnknownMode(mode_id.get()).into());
            }
        }
        let start_modes: Vec<ModeId> = match request.start_mode {
            Some(mode_id) => {
                if !request.allowed_modes.contains(&mode_id) {
                    return Err(BadRequest::StartModeNotAllowed(mode_id.get()).into());
                }
                vec![mode_id]
            }
            None => request.allowed_modes.clone(),
        };

        let calculator = CostCalculator::new(
            self.graph,
            request.date,
            request.allowed_modes.iter().copied(),
            request.criterion,
            params,
            self.speed_profile,
        );

        match request.departure_or_arrival {
            DepartureOrArrival::DepartAfter => {
                let mut engine = MultimodalDijkstra::<Forward>::new(
                    self.graph,
                    &self.forward_automaton,
                    calculator,
                );
                let terminal = engine.run(
                    origin,
                    destination,
                    Minutes::new(request.time),
                    &start_modes,
                    cancel,
                )?;
                Ok(engine.into_response(terminal))
            }
            DepartureOrArrival::ArriveBefore => {
                let mut engine = MultimodalDijkstra::<Backward>::new(
                    self.graph,
                    &self.backward_automaton,
                    calculator,
                );
                let terminal = engine.run(
                    destination,
                    origin,
                    Minutes::new(-request.time),
                    &start_modes,
                    cancel,
                )?;
                Ok(engine.into_response(terminal))
            }
        }
    }
}
