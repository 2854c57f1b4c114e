use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};
use std::marker::PhantomData;
use std::sync::atomic::{AtomicBool, Ordering};

use log::{debug, trace};

use crate::automaton::{StateId, TurnRestrictionAutomaton};
use crate::config::Criterion;
use crate::cost::CostCalculator;
use crate::multimodal_graph::{MultimodalEdge, MultimodalGraph, MultimodalVertex};
use crate::public_transport::TripId;
use crate::request::RequestError;
use crate::response::Response;
use crate::time::Minutes;
use crate::transport_mode::ModeId;

mod direction;
pub use direction::{Backward, EdgeDirection, Forward};

/// The key of the search: where we are, what road history the automaton
/// remembers, and what mode we travel with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Label {
    pub vertex: MultimodalVertex,
    pub state: StateId,
    pub mode: ModeId,
}

static_assertions::assert_impl_all!(Label: Copy, Ord, std::hash::Hash);

#[derive(Debug, Clone, Copy)]
struct LabelData {
    potential: Minutes,
    wait: Minutes,
    shift: Minutes,
    trip: TripId,
    predecessor: Option<(Label, MultimodalEdge)>,
}

/// Label-setting shortest path over (vertex, automaton state, mode).
///
/// One instance owns the per-query state (label table and priority queue)
/// exclusively; the graph, automaton and calculator are shared read-only.
/// Extraction order is by increasing potential, ties broken by the
/// lexicographic order of the label itself.
pub struct MultimodalDijkstra<'g, Direction> {
    graph: &'g MultimodalGraph,
    automaton: &'g TurnRestrictionAutomaton,
    calculator: CostCalculator<'g>,
    labels: HashMap<Label, LabelData>,
    queue: BinaryHeap<Reverse<(Minutes, Label)>>,
    start_time: Minutes,
    direction: PhantomData<Direction>,
}

impl<'g, D: EdgeDirection> MultimodalDijkstra<'g, D> {
    pub fn new(
        graph: &'g MultimodalGraph,
        automaton: &'g TurnRestrictionAutomaton,
        calculator: CostCalculator<'g>,
    ) -> Self {
        Self {
            graph,
            automaton,
            calculator,
            labels: HashMap::new(),
            queue: BinaryHeap::new(),
            start_time: Minutes::zero(),
            direction: PhantomData,
        }
    }

    /// Run the search from `source` until a label of `target` is extracted.
    ///
    /// `start_time` is the departure time for a forward search, and the
    /// negated arrival time for a backward one; the engine time of a label
    /// is always `start_time + potential`.
    pub fn run(
        &mut self,
        source: MultimodalVertex,
        target: MultimodalVertex,
        start_time: Minutes,
        start_modes: &[ModeId],
        cancel: &AtomicBool,
    ) -> Result<Label, RequestError> {
        self.labels.clear();
        self.queue.clear();
        self.start_time = start_time;

        for &mode in start_modes {
            debug_assert!(self.calculator.is_mode_allowed(mode));
            let label = Label {
                vertex: source,
                state: self.automaton.initial_state(),
                mode,
            };
            self.labels.insert(
                label,
                LabelData {
                    potential: Minutes::zero(),
                    wait: Minutes::zero(),
                    shift: Minutes::zero(),
                    trip: TripId::NONE,
                    predecessor: None,
                },
            );
            self.queue.push(Reverse((Minutes::zero(), label)));
        }

        let mut nb_of_extractions = 0usize;
        let mut last_potential = Minutes::zero();
        while let Some(Reverse((potential, label))) = self.queue.pop() {
            if cancel.load(Ordering::Relaxed) {
                return Err(RequestError::Cancelled);
            }
            let data = self.labels[&label];
            if potential > data.potential {
                // stale queue entry, a better path reached this label since
                continue;
            }
            debug_assert!(potential >= last_potential);
            last_potential = potential;
            nb_of_extractions += 1;

            if label.vertex == target {
                debug!(
                    "Search settled the destination after {} extractions, potential {}.",
                    nb_of_extractions, potential
                );
                return Ok(label);
            }

            self.relax(label, data);
        }
        Err(RequestError::NoPath)
    }

    fn relax(&mut self, label: Label, data: LabelData) {
        let time = self.current_time(data);
        for edge in D::edges(self.graph, &label.vertex) {
            for candidate_mode in self.calculator.allowed_mode_ids() {
                let travel_mode = D::travel_mode(label.mode, candidate_mode);
                let travel = match self.calculator.travel_time(
                    &edge,
                    travel_mode,
                    time,
                    data.shift,
                    data.trip,
                    D::IS_REVERSE,
                ) {
                    Some(travel) => travel,
                    None => continue,
                };

                let (state, turn_penalty) = match edge.road_edge() {
                    Some(road_edge) => {
                        let state = match self.automaton.transition(label.state, road_edge) {
                            Some(state) => state,
                            None => continue,
                        };
                        let turn_penalty = match self.calculator.criterion() {
                            Criterion::Time => {
                                let traffic_rules = match self.graph.mode(travel_mode) {
                                    Some(mode) => mode.traffic_rules,
                                    None => continue,
                                };
                                self.automaton.penalty(state, traffic_rules)
                            }
                            Criterion::Distance => Minutes::zero(),
                        };
                        (state, turn_penalty)
                    }
                    None => (label.state, Minutes::zero()),
                };

                let transfer = if candidate_mode == label.mode {
                    Minutes::zero()
                } else {
                    let (earlier, later) = D::transfer_modes(label.mode, candidate_mode);
                    match self.calculator.transfer_time(&edge, earlier, later) {
                        // transfers take time, not distance
                        Some(transfer) => match self.calculator.criterion() {
                            Criterion::Time => transfer,
                            Criterion::Distance => Minutes::zero(),
                        },
                        None => continue,
                    }
                };

                let next_label = Label {
                    vertex: D::next_vertex(&edge),
                    state,
                    mode: candidate_mode,
                };
                let next_potential = data.potential + travel.cost + turn_penalty + transfer;
                debug_assert!(next_potential >= data.potential);

                let improves = self
                    .labels
                    .get(&next_label)
                    .map_or(true, |known| next_potential < known.potential);
                if improves {
                    trace!(
                        "Improving {:?} to potential {}.",
                        next_label,
                        next_potential
                    );
                    self.labels.insert(
                        next_label,
                        LabelData {
                            potential: next_potential,
                            wait: travel.wait,
                            shift: travel.shift,
                            trip: travel.trip,
                            predecessor: Some((label, edge)),
                        },
                    );
                    self.queue.push(Reverse((next_potential, next_label)));
                }
            }
        }
    }

    fn current_time(&self, data: LabelData) -> Minutes {
        self.start_time + data.potential
    }

    /// Rebuild the path ending at `terminal` from the predecessor links.
    /// A forward chain is collected destination-first and reversed; a
    /// backward chain already reads in travel order.
    pub fn into_response(&self, terminal: Label) -> Response {
        let total_cost = self.labels[&terminal].potential;
        let mut edges = Vec::new();
        let mut modes = Vec::new();
        let mut wait_times = Vec::new();
        let mut trip_ids = Vec::new();

        let mut current = terminal;
        while let Some((predecessor, edge)) = self.labels[&current].predecessor {
            let data = &self.labels[&current];
            edges.push(edge);
            modes.push(D::travel_mode(predecessor.mode, current.mode));
            wait_times.push(data.wait);
            trip_ids.push(data.trip);
            current = predecessor;
        }

        if !D::IS_REVERSE {
            edges.reverse();
            modes.reverse();
            wait_times.reverse();
            trip_ids.reverse();
        }

        Response {
            edges,
            modes,
            wait_times,
            trip_ids,
            total_cost,
        }
    }
}
