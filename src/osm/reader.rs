use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use log::{debug, info};
use osmpbf::{Element, ElementReader};

use super::restrictions::RelationReader;
use super::sections::{PointCache, PointWithUses, SectionSplitter, Way};
use super::writer::Writer;
use super::Progress;

#[derive(Debug)]
pub enum IngestError {
    Pbf(osmpbf::Error),
}

impl fmt::Display for IngestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IngestError::Pbf(err) => write!(f, "Could not read the PBF stream : {}", err),
        }
    }
}

impl std::error::Error for IngestError {}

impl From<osmpbf::Error> for IngestError {
    fn from(err: osmpbf::Error) -> Self {
        IngestError::Pbf(err)
    }
}

/// Read an OSM PBF extract and stream nodes, sections and resolved turn
/// restrictions into `writer`.
///
/// Relations are read in a first pass so the via nodes are known when the
/// ways are walked; the second pass collects nodes and `highway` ways.
/// Ways referencing nodes missing from the extract are dropped. Only
/// intersection nodes (used by two or more ways) are written out.
pub fn read_pbf<P: AsRef<Path>>(
    path: P,
    writer: &mut dyn Writer,
    progress: &mut dyn Progress,
    write_nodes: bool,
    import_restrictions: bool,
) -> Result<(), IngestError> {
    let mut relations = RelationReader::new();
    if import_restrictions {
        info!("Reading restriction relations ...");
        read_relations(path.as_ref(), &mut relations)?;
        debug!("Collected {} restriction relations.", relations.nb_of_restrictions());
    }

    info!("Reading nodes and ways ...");
    let (mut points, mut ways) = read_nodes_and_ways(path.as_ref())?;
    debug!("Collected {} points and {} highway ways.", points.len(), ways.len());

    info!("Marking nodes and ways ...");
    mark_points_and_ways(
        &mut points,
        &mut ways,
        &mut relations,
        import_restrictions,
        progress,
    );

    info!("Writing sections ...");
    write_sections(
        &points,
        &ways,
        &mut relations,
        import_restrictions,
        writer,
        progress,
    );

    if write_nodes {
        info!("Writing nodes ...");
        progress.report(0, points.len());
        writer.begin_nodes();
        for (done, (node_id, point)) in points.iter().enumerate() {
            if point.is_intersection() {
                writer.write_node(*node_id, point.lon, point.lat);
            }
            progress.report(done + 1, points.len());
        }
        writer.end_nodes();
    }

    if import_restrictions {
        info!("Writing restrictions ...");
        relations.write_restrictions(&points, writer, progress);
    }

    Ok(())
}

fn read_relations(path: &Path, relations: &mut RelationReader) -> Result<(), IngestError> {
    let reader = ElementReader::from_path(path)?;
    reader.for_each(|element| {
        if let Element::Relation(relation) = element {
            let mut restriction = None;
            let mut is_restriction_relation = false;
            for (key, value) in relation.tags() {
                if key == "restriction" {
                    restriction = Some(value.to_string());
                }
                if key == "type" && value == "restriction" {
                    is_restriction_relation = true;
                }
            }
            if !is_restriction_relation {
                return;
            }
            let restriction = match restriction {
                Some(restriction) => restriction,
                None => return,
            };

            let mut from_way = 0u64;
            let mut via_node = 0u64;
            let mut to_way = 0u64;
            for member in relation.members() {
                match member.role() {
                    Ok("from") => from_way = member.member_id as u64,
                    Ok("via") => via_node = member.member_id as u64,
                    Ok("to") => to_way = member.member_id as u64,
                    _ => {}
                }
            }
            if from_way != 0 && via_node != 0 && to_way != 0 {
                relations.add_restriction(&restriction, from_way, via_node, to_way);
            }
        }
    })?;
    Ok(())
}

fn read_nodes_and_ways(path: &Path) -> Result<(PointCache, BTreeMap<u64, Way>), IngestError> {
    let reader = ElementReader::from_path(path)?;
    let mut points = PointCache::new();
    let mut ways: BTreeMap<u64, Way> = BTreeMap::new();
    reader.for_each(|element| match element {
        Element::Node(node) => {
            points.insert(node.id() as u64, PointWithUses::new(node.lon(), node.lat()));
        }
        Element::DenseNode(node) => {
            points.insert(node.id() as u64, PointWithUses::new(node.lon(), node.lat()));
        }
        Element::Way(way) => {
            let mut tags = BTreeMap::new();
            let mut is_highway = false;
            for (key, value) in way.tags() {
                if key == "highway" {
                    is_highway = true;
                }
                tags.insert(key.to_string(), value.to_string());
            }
            // ways that are not highways are not routable
            if !is_highway {
                return;
            }
            ways.insert(
                way.id() as u64,
                Way {
                    nodes: way.refs().map(|node_id| node_id as u64).collect(),
                    tags,
                    ignored: false,
                },
            );
        }
        Element::Relation(_) => {}
    })?;
    Ok((points, ways))
}

/// Count the ways using each node, capped at 2: nodes used twice or more
/// are intersections. Also remembers which ways pass through a restriction
/// via node.
fn mark_points_and_ways(
    points: &mut PointCache,
    ways: &mut BTreeMap<u64, Way>,
    relations: &mut RelationReader,
    import_restrictions: bool,
    progress: &mut dyn Progress,
) {
    let nb_of_ways = ways.len();
    progress.report(0, nb_of_ways);
    for (done, (way_id, way)) in ways.iter_mut().enumerate() {
        for &node in &way.nodes {
            match points.get_mut(&node) {
                Some(point) => point.mark_used(),
                None => {
                    // unknown point: the way leaves the extract
                    way.ignored = true;
                }
            }
            if import_restrictions && relations.has_via_node(node) {
                relations.add_node_way(node, *way_id);
            }
        }
        progress.report(done + 1, nb_of_ways);
    }
}

fn write_sections(
    points: &PointCache,
    ways: &BTreeMap<u64, Way>,
    relations: &mut RelationReader,
    import_restrictions: bool,
    writer: &mut dyn Writer,
    progress: &mut dyn Progress,
) {
    let nb_of_ways = ways.len();
    progress.report(0, nb_of_ways);
    writer.begin_sections();
    let mut splitter = SectionSplitter::new();
    for (done, (way_id, way)) in ways.iter().enumerate() {
        if way.ignored {
            continue;
        }
        splitter.way_to_sections(*way_id, way, points, |section| {
            if import_restrictions
                && (relations.has_via_node(section.node_from)
                    || relations.has_via_node(section.node_to))
            {
                relations.add_way_section(
                    section.way_id,
                    section.section_id,
                    section.node_from,
                    section.node_to,
                );
            }
            writer.write_section(section);
        });
        progress.report(done + 1, nb_of_ways);
    }
    writer.end_sections();
}
