use crate::multimodal_graph::{MultimodalEdge, MultimodalGraph, MultimodalVertex};
use crate::transport_mode::ModeId;

/// Strategy deciding how the search walks the graph: which multimodal
/// edges to relax around a vertex, which endpoint a relaxation reaches,
/// which mode rides the edge, and in which chronological order a mode
/// transfer happens. Time axis inversion itself lives in the cost
/// calculator, driven by `IS_REVERSE`.
pub trait EdgeDirection {
    const IS_REVERSE: bool;

    fn edges(graph: &MultimodalGraph, vertex: &MultimodalVertex) -> Vec<MultimodalEdge>;

    /// The vertex reached by relaxing `edge` in this direction.
    fn next_vertex(edge: &MultimodalEdge) -> MultimodalVertex;

    /// The mode riding `edge` when relaxing from a label with `label_mode`
    /// towards a label with `candidate_mode`.
    fn travel_mode(label_mode: ModeId, candidate_mode: ModeId) -> ModeId;

    /// The `(earlier, later)` modes of the transfer, in chronological
    /// order.
    fn transfer_modes(label_mode: ModeId, candidate_mode: ModeId) -> (ModeId, ModeId);
}

/// Depart-after search: relax outgoing edges, ride with the current label
/// mode, switch modes on arrival.
pub struct Forward;

impl EdgeDirection for Forward {
    const IS_REVERSE: bool = false;

    fn edges(graph: &MultimodalGraph, vertex: &MultimodalVertex) -> Vec<MultimodalEdge> {
        graph.outgoing_edges(vertex)
    }

    fn next_vertex(edge: &MultimodalEdge) -> MultimodalVertex {
        edge.target
    }

    fn travel_mode(label_mode: ModeId, _candidate_mode: ModeId) -> ModeId {
        label_mode
    }

    fn transfer_modes(label_mode: ModeId, candidate_mode: ModeId) -> (ModeId, ModeId) {
        (label_mode, candidate_mode)
    }
}

/// Arrive-before search: relax incoming edges. The candidate mode is the
/// chronologically earlier one, riding the edge before handing over to the
/// label mode at the edge target.
pub struct Backward;

impl EdgeDirection for Backward {
    const IS_REVERSE: bool = true;

    fn edges(graph: &MultimodalGraph, vertex: &MultimodalVertex) -> Vec<MultimodalEdge> {
        graph.incoming_edges(vertex)
    }

    fn next_vertex(edge: &MultimodalEdge) -> MultimodalVertex {
        edge.source
    }

    fn travel_mode(_label_mode: ModeId, candidate_mode: ModeId) -> ModeId {
        candidate_mode
    }

    fn transfer_modes(label_mode: ModeId, candidate_mode: ModeId) -> (ModeId, ModeId) {
        (candidate_mode, label_mode)
    }
}
