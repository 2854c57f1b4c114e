use crate::road_graph::RoadEdge;
use crate::transport_mode::ModeId;

/// A point of interest attached to the road network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Poi {
    pub(crate) idx: usize,
}

#[derive(Debug, Clone)]
pub struct PoiData {
    pub db_id: u64,
    pub name: String,
    /// The road edge this POI is attached to.
    pub road_edge: RoadEdge,
    /// Position of the POI along `road_edge`, in [0, 1] from its source.
    pub road_abscissa: f64,
    /// Modes that can be parked at or picked up from this POI.
    pub parking_modes: Vec<ModeId>,
}

impl PoiData {
    pub fn has_parking_mode(&self, mode: ModeId) -> bool {
        self.parking_modes.contains(&mode)
    }
}
