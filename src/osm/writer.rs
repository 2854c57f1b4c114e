use std::collections::BTreeMap;

/// A road section: the part of an OSM way between two intersections.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionRecord {
    pub way_id: u64,
    pub section_id: u64,
    pub node_from: u64,
    pub node_to: u64,
    /// (lon, lat) of every node along the section, endpoints included.
    pub points: Vec<(f64, f64)>,
    pub tags: BTreeMap<String, String>,
}

/// A resolved turn restriction: the listed sections may not be traversed
/// consecutively. Currently always two sections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestrictionRecord {
    pub restriction_id: u64,
    pub section_ids: Vec<u64>,
}

/// Sink for the ingestion output stream. Phases arrive in order: sections,
/// then nodes, then restrictions, each bracketed by its begin/end pair.
pub trait Writer {
    fn begin_nodes(&mut self) {}
    /// `(lon, lat)`; only intersection nodes are written.
    fn write_node(&mut self, node_id: u64, lon: f64, lat: f64);
    fn end_nodes(&mut self) {}

    fn begin_sections(&mut self) {}
    fn write_section(&mut self, section: SectionRecord);
    fn end_sections(&mut self) {}

    fn begin_restrictions(&mut self) {}
    fn write_restriction(&mut self, restriction: RestrictionRecord);
    fn end_restrictions(&mut self) {}
}

/// In-memory writer, for tests and small extracts.
#[derive(Debug, Default)]
pub struct CollectWriter {
    pub nodes: Vec<(u64, f64, f64)>,
    pub sections: Vec<SectionRecord>,
    pub restrictions: Vec<RestrictionRecord>,
}

impl CollectWriter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Writer for CollectWriter {
    fn write_node(&mut self, node_id: u64, lon: f64, lat: f64) {
        self.nodes.push((node_id, lon, lat));
    }

    fn write_section(&mut self, section: SectionRecord) {
        self.sections.push(section);
    }

    fn write_restriction(&mut self, restriction: RestrictionRecord) {
        self.restrictions.push(restriction);
    }
}
