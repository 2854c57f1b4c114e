use crate::multimodal_graph::MultimodalEdge;
use crate::public_transport::TripId;
use crate::time::Minutes;
use crate::transport_mode::ModeId;

/// The answer to a query: one entry per traversed multimodal edge, in
/// travel order, whatever the search direction was.
#[derive(Debug, Clone)]
pub struct Response {
    pub edges: Vec<MultimodalEdge>,
    /// Mode riding each edge.
    pub modes: Vec<ModeId>,
    /// Waiting incurred entering each edge (boarding waits on public
    /// transport, transfer slack on reverse searches).
    pub wait_times: Vec<Minutes>,
    /// Trip aboard after each edge; `TripId::NONE` off public transport.
    pub trip_ids: Vec<TripId>,
    /// Minutes, or metres under the distance criterion.
    pub total_cost: Minutes,
}

impl Response {
    pub fn nb_of_edges(&self) -> usize {
        self.edges.len()
    }

    pub fn total_wait(&self) -> Minutes {
        self.wait_times
            .iter()
            .fold(Minutes::zero(), |sum, wait| sum + *wait)
    }
}
