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

use std::collections::{BTreeMap, HashMap};

use log::warn;

use crate::road_graph::{RoadEdge, RoadGraph};
use crate::time::Minutes;
use crate::transport_mode::TrafficRules;

/// A state of the turn restriction automaton.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StateId {
    pub(crate) idx: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestrictionKind {
    /// The final edge of the sequence may not follow its prefix.
    No,
    /// The final edge is the only one allowed to follow its prefix.
    Only,
}

/// A turn restriction over consecutive road edges, as loaded from the
/// persistent graph. A `No` restriction carrying a penalty charges the
/// traversal instead of forbidding it.
#[derive(Debug, Clone)]
pub struct TurnRestriction {
    pub sequence: Vec<RoadEdge>,
    pub kind: RestrictionKind,
    pub penalty: Option<(TrafficRules, Minutes)>,
}

#[derive(Debug, Clone, Copy)]
enum Transition {
    Allowed(StateId),
    Forbidden,
}

#[derive(Debug)]
struct StateData {
    /// The recent road edge history this state witnesses; empty for the
    /// initial state.
    history: Vec<RoadEdge>,
    penalty_per_traffic_rule: BTreeMap<TrafficRules, Minutes>,
}

/// Deterministic automaton over road edges enforcing turn restrictions.
///
/// States are materialised lazily from the restriction list, so the state
/// count is bounded by one plus the total number of restriction edges.
/// Undefined transitions fall back to the state witnessing the longest
/// suffix of the travelled history that prefixes some restriction, and to
/// the initial state otherwise.
#[derive(Debug)]
pub struct TurnRestrictionAutomaton {
    states: Vec<StateData>,
    transitions: HashMap<(StateId, RoadEdge), Transition>,
    state_of_history: HashMap<Vec<RoadEdge>, StateId>,
}

const INITIAL: StateId = StateId { idx: 0 };

impl TurnRestrictionAutomaton {
    /// Automaton enforcing `restrictions` on a forward traversal.
    pub fn new(road: &RoadGraph, restrictions: &[TurnRestriction]) -> Self {
        Self::build(road, restrictions, false)
    }

    /// Automaton enforcing `restrictions` on a backward traversal, where
    /// the search feeds road edges in reverse path order.
    pub fn reversed(road: &RoadGraph, restrictions: &[TurnRestriction]) -> Self {
        Self::build(road, restrictions, true)
    }

    fn build(road: &RoadGraph, restrictions: &[TurnRestriction], reverse: bool) -> Self {
        let mut automaton = Self {
            states: vec![StateData {
                history: Vec::new(),
                penalty_per_traffic_rule: BTreeMap::new(),
            }],
            transitions: HashMap::new(),
            state_of_history: HashMap::new(),
        };

        for restriction in Self::expand_only(road, restrictions) {
            let mut sequence = restriction.sequence;
            if sequence.len() < 2 {
                warn!(
                    "Ignoring a turn restriction with {} edge(s); at least 2 are needed.",
                    sequence.len()
                );
                continue;
            }
            if reverse {
                sequence.reverse();
            }
            match restriction.penalty {
                Some((traffic_rules, penalty)) => {
                    // charge instead of forbid: the full chain exists and the
                    // final state carries the penalty
                    let final_state = automaton.materialise_chain(&sequence);
                    automaton.states[final_state.idx]
                        .penalty_per_traffic_rule
                        .insert(traffic_rules, penalty);
                }
                None => {
                    let (prefix, last) = sequence.split_at(sequence.len() - 1);
                    let witness = automaton.materialise_chain(prefix);
                    automaton
                        .transitions
                        .insert((witness, last[0]), Transition::Forbidden);
                }
            }
        }

        automaton
    }

    /// `Only` restrictions are several `No` restrictions in disguise: one
    /// per competing edge at the via vertex.
    fn expand_only(road: &RoadGraph, restrictions: &[TurnRestriction]) -> Vec<TurnRestriction> {
        let mut expanded = Vec::new();
        for restriction in restrictions {
            match restriction.kind {
                RestrictionKind::No => expanded.push(restriction.clone()),
                RestrictionKind::Only => {
                    if restriction.sequence.len() < 2 {
                        warn!("Ignoring an Only restriction with fewer than 2 edges.");
                        continue;
                    }
                    let only_edge = *restriction.sequence.last().unwrap();
                    let before_via = restriction.sequence[restriction.sequence.len() - 2];
                    let via = road.source(only_edge);
                    let u_turn = road.edge_between(via, road.source(before_via));
                    for &competitor in road.out_edges(via) {
                        if competitor == only_edge || Some(competitor) == u_turn {
                            continue;
                        }
                        let mut sequence = restriction.sequence.clone();
                        *sequence.last_mut().unwrap() = competitor;
                        expanded.push(TurnRestriction {
                            sequence,
                            kind: RestrictionKind::No,
                            penalty: None,
                        });
                    }
                }
            }
        }
        expanded
    }

    /// Ensure a state exists for every prefix of `sequence` and that the
    /// chain of transitions linking them is in place. Returns the state
    /// witnessing the full sequence.
    fn materialise_chain(&mut self, sequence: &[RoadEdge]) -> StateId {
        let mut current = INITIAL;
        for (len, &edge) in sequence.iter().enumerate() {
            let history = &sequence[..=len];
            let next = match self.state_of_history.get(history) {
                Some(state) => *state,
                None => {
                    let state = StateId {
                        idx: self.states.len(),
                    };
                    self.states.push(StateData {
                        history: history.to_vec(),
                        penalty_per_traffic_rule: BTreeMap::new(),
                    });
                    self.state_of_history.insert(history.to_vec(), state);
                    state
                }
            };
            // do not resurrect a transition another restriction forbade
            self.transitions
                .entry((current, edge))
                .or_insert(Transition::Allowed(next));
            current = next;
        }
        current
    }

    pub fn initial_state(&self) -> StateId {
        INITIAL
    }

    pub fn nb_of_states(&self) -> usize {
        self.states.len()
    }

    /// The state reached by traversing `edge` from `state`, or `None` when
    /// a restriction forbids it.
    pub fn transition(&self, state: StateId, edge: RoadEdge) -> Option<StateId> {
        match self.transitions.get(&(state, edge)) {
            Some(Transition::Forbidden) => None,
            Some(Transition::Allowed(next)) => Some(*next),
            None => {
                if state == INITIAL {
                    return Some(
                        self.state_of_history
                            .get(std::slice::from_ref(&edge))
                            .copied()
                            .unwrap_or(INITIAL),
                    );
                }
                let mut full = self.states[state.idx].history.clone();
                full.push(edge);
                for start in 1..full.len() {
                    if let Some(next) = self.state_of_history.get(&full[start..]) {
                        return Some(*next);
                    }
                }
                Some(INITIAL)
            }
        }
    }

    /// The penalty attached to `state` for a mode obeying `traffic_rules`:
    /// the first entry sharing a bit with the mask, zero otherwise.
    pub fn penalty(&self, state: StateId, traffic_rules: TrafficRules) -> Minutes {
        self.states[state.idx]
            .penalty_per_traffic_rule
            .iter()
            .find(|(rules, _)| rules.intersects(traffic_rules))
            .map(|(_, penalty)| *penalty)
            .unwrap_or_else(Minutes::zero)
    }
}
