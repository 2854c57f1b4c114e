use std::collections::BTreeMap;

use super::writer::SectionRecord;

/// A node kept in memory during ingestion. `uses` counts referencing ways,
/// capped at 2: two or more uses make the node an intersection.
#[derive(Debug, Clone, Copy)]
pub struct PointWithUses {
    pub lon: f64,
    pub lat: f64,
    pub uses: u8,
}

impl PointWithUses {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat, uses: 0 }
    }

    pub fn mark_used(&mut self) {
        if self.uses < 2 {
            self.uses += 1;
        }
    }

    pub fn is_intersection(&self) -> bool {
        self.uses > 1
    }
}

// a BTreeMap so that emission order, hence section ids, are reproducible
pub type PointCache = BTreeMap<u64, PointWithUses>;

/// A retained OSM way (one carrying a `highway` tag).
#[derive(Debug, Clone)]
pub struct Way {
    pub nodes: Vec<u64>,
    pub tags: BTreeMap<String, String>,
    /// Set when the way references a node missing from the extract.
    pub ignored: bool,
}

/// Splits ways into sections at intersections, handing out monotone
/// section ids.
#[derive(Debug, Default)]
pub struct SectionSplitter {
    next_section_id: u64,
}

impl SectionSplitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Walk the node list of `way` and emit one section whenever an
    /// intersection or the last node is reached.
    pub fn way_to_sections<F>(
        &mut self,
        way_id: u64,
        way: &Way,
        points: &PointCache,
        mut emit: F,
    ) where
        F: FnMut(SectionRecord),
    {
        if way.nodes.len() < 2 {
            return;
        }
        let mut section_start = true;
        let mut old_node = way.nodes[0];
        let mut node_from = old_node;
        let mut section_nodes: Vec<u64> = Vec::new();

        for i in 1..way.nodes.len() {
            let node = way.nodes[i];
            let point = points[&node];
            if section_start {
                section_nodes.clear();
                section_nodes.push(old_node);
                node_from = old_node;
                section_start = false;
            }
            section_nodes.push(node);
            if i == way.nodes.len() - 1 || point.is_intersection() {
                self.next_section_id += 1;
                emit(SectionRecord {
                    way_id,
                    section_id: self.next_section_id,
                    node_from,
                    node_to: node,
                    points: section_nodes
                        .iter()
                        .map(|node_id| {
                            let point = points[node_id];
                            (point.lon, point.lat)
                        })
                        .collect(),
                    tags: way.tags.clone(),
                });
                section_start = true;
            }
            old_node = node;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points(ids: &[u64], intersections: &[u64]) -> PointCache {
        let mut cache = PointCache::new();
        for (i, &id) in ids.iter().enumerate() {
            let mut point = PointWithUses::new(i as f64, 0.0);
            point.mark_used();
            if intersections.contains(&id) {
                point.mark_used();
            }
            cache.insert(id, point);
        }
        cache
    }

    #[test]
    fn way_splits_at_intersections() {
        let cache = points(&[1, 2, 3, 4, 5], &[3]);
        let way = Way {
            nodes: vec![1, 2, 3, 4, 5],
            tags: BTreeMap::new(),
            ignored: false,
        };
        let mut splitter = SectionSplitter::new();
        let mut sections = Vec::new();
        splitter.way_to_sections(7, &way, &cache, |section| sections.push(section));

        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].section_id, 1);
        assert_eq!((sections[0].node_from, sections[0].node_to), (1, 3));
        assert_eq!(sections[0].points.len(), 3);
        assert_eq!(sections[1].section_id, 2);
        assert_eq!((sections[1].node_from, sections[1].node_to), (3, 5));
        assert_eq!(sections[1].points.len(), 3);
    }

    #[test]
    fn way_without_intersections_is_one_section() {
        let cache = points(&[1, 2, 3], &[]);
        let way = Way {
            nodes: vec![1, 2, 3],
            tags: BTreeMap::new(),
            ignored: false,
        };
        let mut splitter = SectionSplitter::new();
        let mut sections = Vec::new();
        splitter.way_to_sections(7, &way, &cache, |section| sections.push(section));

        assert_eq!(sections.len(), 1);
        assert_eq!((sections[0].node_from, sections[0].node_to), (1, 3));
    }
}
