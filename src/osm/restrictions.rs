use std::collections::{BTreeSet, HashMap};

use log::warn;

use super::sections::PointCache;
use super::writer::{RestrictionRecord, Writer};
use super::Progress;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestrictionType {
    NoLeftTurn,
    NoRightTurn,
    NoStraightOn,
    NoUTurn,
    OnlyLeftTurn,
    OnlyRightTurn,
    OnlyStraightOn,
    NoEntry,
    NoExit,
}

impl RestrictionType {
    pub fn from_tag(value: &str) -> Option<Self> {
        let restriction_type = match value {
            "no_left_turn" => RestrictionType::NoLeftTurn,
            "no_right_turn" => RestrictionType::NoRightTurn,
            "no_straight_on" => RestrictionType::NoStraightOn,
            "no_u_turn" => RestrictionType::NoUTurn,
            "only_left_turn" => RestrictionType::OnlyLeftTurn,
            "only_right_turn" => RestrictionType::OnlyRightTurn,
            "only_straight_on" => RestrictionType::OnlyStraightOn,
            "no_entry" => RestrictionType::NoEntry,
            "no_exit" => RestrictionType::NoExit,
            _ => return None,
        };
        Some(restriction_type)
    }

    fn is_only(self) -> bool {
        matches!(
            self,
            RestrictionType::OnlyLeftTurn
                | RestrictionType::OnlyRightTurn
                | RestrictionType::OnlyStraightOn
        )
    }
}

/// A `type=restriction` relation with way-node-way members.
#[derive(Debug, Clone, Copy)]
pub struct TurnRestrictionRelation {
    pub restriction_type: RestrictionType,
    pub from_way: u64,
    pub via_node: u64,
    pub to_way: u64,
}

/// A section of a way, as remembered for restriction resolution. Ordered
/// by section id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct WaySection {
    id: u64,
    node1: u64,
    node2: u64,
}

/// The (signed) angle between three points, in degrees within (-180, 180].
/// Negative is a left turn, positive a right turn.
pub fn angle_3_points(ax: f64, ay: f64, bx: f64, by: f64, cx: f64, cy: f64) -> f64 {
    let abx = bx - ax;
    let aby = by - ay;
    let cbx = bx - cx;
    let cby = by - cy;

    let dot = abx * cbx + aby * cby;
    let cross = abx * cby - aby * cbx;

    cross.atan2(dot).to_degrees()
}

/// Collects restriction relations during the relation pass, then resolves
/// them against the emitted sections.
#[derive(Debug, Default)]
pub struct RelationReader {
    restrictions: Vec<TurnRestrictionRelation>,
    /// via node id -> ways passing through it
    via_nodes_ways: HashMap<u64, Vec<u64>>,
    way_sections: HashMap<u64, BTreeSet<WaySection>>,
    restriction_id: u64,
}

impl RelationReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one `restriction=...` relation. Unknown restriction types
    /// are logged and skipped.
    pub fn add_restriction(&mut self, restriction: &str, from_way: u64, via_node: u64, to_way: u64) {
        match RestrictionType::from_tag(restriction) {
            Some(restriction_type) => {
                self.restrictions.push(TurnRestrictionRelation {
                    restriction_type,
                    from_way,
                    via_node,
                    to_way,
                });
                self.via_nodes_ways.entry(via_node).or_default();
            }
            None => {
                warn!("Ignoring restriction of unknown type `{}`.", restriction);
            }
        }
    }

    pub fn has_via_node(&self, node: u64) -> bool {
        self.via_nodes_ways.contains_key(&node)
    }

    pub fn add_node_way(&mut self, node: u64, way: u64) {
        self.via_nodes_ways.entry(node).or_default().push(way);
    }

    pub fn add_way_section(&mut self, way_id: u64, section_id: u64, node1: u64, node2: u64) {
        self.way_sections.entry(way_id).or_default().insert(WaySection {
            id: section_id,
            node1,
            node2,
        });
    }

    pub fn nb_of_restrictions(&self) -> usize {
        self.restrictions.len()
    }

    /// Resolve every collected relation to section pairs and write them
    /// out. `Only*` turns into one record per competing section at the via.
    pub fn write_restrictions(
        &mut self,
        points: &PointCache,
        writer: &mut dyn Writer,
        progress: &mut dyn Progress,
    ) {
        let restrictions = std::mem::take(&mut self.restrictions);
        let mut restriction_id = self.restriction_id;
        progress.report(0, restrictions.len());
        writer.begin_restrictions();
        for (done, restriction) in restrictions.iter().enumerate() {
            progress.report(done + 1, restrictions.len());
            // only way - node - way relations are resolvable
            if points.contains_key(&restriction.from_way)
                || !points.contains_key(&restriction.via_node)
                || points.contains_key(&restriction.to_way)
            {
                continue;
            }
            let via = restriction.via_node;

            // the section of the "from" way, oriented to end at the via
            let section_from = match self.way_sections.get(&restriction.from_way) {
                Some(sections) => sections.iter().find_map(|section| {
                    if section.node2 == via {
                        Some(*section)
                    } else if section.node1 == via {
                        Some(WaySection {
                            id: section.id,
                            node1: section.node2,
                            node2: section.node1,
                        })
                    } else {
                        None
                    }
                }),
                None => None,
            };
            let section_from = match section_from {
                Some(section) => section,
                None => continue,
            };

            let candidates: Vec<WaySection> = self
                .way_sections
                .get(&restriction.to_way)
                .map(|sections| {
                    sections
                        .iter()
                        .filter(|section| section.node1 == via || section.node2 == via)
                        .copied()
                        .collect()
                })
                .unwrap_or_default();

            let section_to = match candidates.len() {
                1 => candidates[0],
                2 => {
                    match Self::choose_by_angle(
                        points,
                        restriction.restriction_type,
                        &section_from,
                        via,
                        &candidates,
                    ) {
                        Some(section) => section,
                        None => continue,
                    }
                }
                _ => continue,
            };

            if restriction.restriction_type.is_only() {
                // OnlyXXX is like several NoXXX on the other edges
                for way in &self.via_nodes_ways[&via] {
                    let sections = match self.way_sections.get(way) {
                        Some(sections) => sections,
                        None => continue,
                    };
                    for section in sections {
                        if section.node1 != via && section.node2 != via {
                            continue;
                        }
                        if section.id == section_to.id || section.id == section_from.id {
                            continue;
                        }
                        restriction_id += 1;
                        writer.write_restriction(RestrictionRecord {
                            restriction_id,
                            section_ids: vec![section_from.id, section.id],
                        });
                    }
                }
            } else {
                restriction_id += 1;
                writer.write_restriction(RestrictionRecord {
                    restriction_id,
                    section_ids: vec![section_from.id, section_to.id],
                });
            }
        }
        self.restriction_id = restriction_id;
        writer.end_restrictions();
    }

    /// Pick one of two candidate sections by the signed turn angle over
    /// three consecutive coordinates. The angle computation is more stable
    /// than an orientation determinant.
    fn choose_by_angle(
        points: &PointCache,
        restriction_type: RestrictionType,
        section_from: &WaySection,
        via: u64,
        candidates: &[WaySection],
    ) -> Option<WaySection> {
        let mut angles = [0.0f64; 2];
        for (i, candidate) in candidates.iter().enumerate() {
            let mut far_node = candidate.node2;
            if via == candidate.node2 {
                far_node = candidate.node1;
            }
            let p1 = points.get(&section_from.node1)?;
            let p2 = points.get(&via)?;
            let p3 = points.get(&far_node)?;
            angles[i] = angle_3_points(p1.lon, p1.lat, p2.lon, p2.lat, p3.lon, p3.lat);
        }
        match restriction_type {
            RestrictionType::NoLeftTurn | RestrictionType::OnlyLeftTurn => {
                // take the angle < 0
                if angles[0] < 0.0 {
                    Some(candidates[0])
                } else {
                    Some(candidates[1])
                }
            }
            RestrictionType::NoRightTurn | RestrictionType::OnlyRightTurn => {
                // take the angle > 0
                if angles[0] > 0.0 {
                    Some(candidates[0])
                } else {
                    Some(candidates[1])
                }
            }
            RestrictionType::NoStraightOn | RestrictionType::OnlyStraightOn => {
                // take the angle closer to 0
                if angles[0].abs() < angles[1].abs() {
                    Some(candidates[0])
                } else {
                    Some(candidates[1])
                }
            }
            _ => {
                warn!(
                    "Ignoring a {:?} restriction needing a geometric choice at node {}.",
                    restriction_type, via
                );
                None
            }
        }
    }
}
