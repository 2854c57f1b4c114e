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

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::iter::Rev;
use std::slice::Iter;

use chrono::NaiveDate;

use crate::road_graph::RoadEdge;
use crate::time::Minutes;

/// Database id of a vehicle trip. Id 0 means "not aboard any trip".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TripId {
    pub(crate) id: u64,
}

impl TripId {
    pub const NONE: TripId = TripId { id: 0 };

    pub fn new(id: u64) -> Self {
        Self { id }
    }

    pub fn get(&self) -> u64 {
        self.id
    }

    pub fn is_none(&self) -> bool {
        self.id == 0
    }
}

/// A stop of a public transport subgraph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Stop {
    pub(crate) idx: usize,
}

/// A section (edge) of a public transport subgraph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Section {
    pub(crate) idx: usize,
}

/// One scheduled run over a section.
#[derive(Debug, Clone, Copy)]
pub struct TripTime {
    /// Departure from the section source, minutes since midnight on the
    /// service day.
    pub departure: Minutes,
    /// Arrival at the section target, minutes since midnight on the
    /// service day.
    pub arrival: Minutes,
    pub trip_id: TripId,
    pub service_id: u64,
}

#[derive(Debug)]
pub enum TimetableError {
    UnsortedDepartures,
    UnsortedArrivals,
    ArrivalBeforeDeparture,
}

impl fmt::Display for TimetableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimetableError::UnsortedDepartures => {
                write!(f, "Timetable departures are not sorted in increasing order.")
            }
            TimetableError::UnsortedArrivals => write!(
                f,
                "Timetable arrivals are not sorted in increasing order (vehicles may not overtake)."
            ),
            TimetableError::ArrivalBeforeDeparture => {
                write!(f, "A timetable entry arrives before it departs.")
            }
        }
    }
}

impl std::error::Error for TimetableError {}

/// Scheduled times of a section, sorted by departure.
///
/// Arrivals are required to be sorted as well: vehicles on a section do not
/// overtake each other, which lets both lookups binary search.
#[derive(Debug, Default, Clone)]
pub struct Timetable {
    table: Vec<TripTime>,
}

impl Timetable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign times from the given table, sorted by departure times.
    pub fn assign_sorted_table(&mut self, table: Vec<TripTime>) -> Result<(), TimetableError> {
        for pair in table.windows(2) {
            if pair[1].departure < pair[0].departure {
                return Err(TimetableError::UnsortedDepartures);
            }
            if pair[1].arrival < pair[0].arrival {
                return Err(TimetableError::UnsortedArrivals);
            }
        }
        if table.iter().any(|entry| entry.arrival < entry.departure) {
            return Err(TimetableError::ArrivalBeforeDeparture);
        }
        self.table = table;
        Ok(())
    }

    pub fn entries(&self) -> &[TripTime] {
        &self.table
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// The suffix of entries departing at `time` or later.
    pub fn next_departures(&self, time: Minutes) -> &[TripTime] {
        let idx = self.table.partition_point(|entry| entry.departure < time);
        &self.table[idx..]
    }

    /// The entries arriving at `time` or earlier, latest arrival first.
    pub fn previous_arrivals(&self, time: Minutes) -> Rev<Iter<'_, TripTime>> {
        let idx = self.table.partition_point(|entry| entry.arrival <= time);
        self.table[..idx].iter().rev()
    }
}

/// A trip repeating every `headway` minutes between `start` and `end_time`.
#[derive(Debug, Clone, Copy)]
pub struct Frequency {
    pub trip_id: TripId,
    /// First departure, minutes since midnight on the service day.
    pub start: Minutes,
    /// Last departure, minutes since midnight on the service day.
    pub end_time: Minutes,
    pub headway: Minutes,
    pub travel_time: Minutes,
}

/// Service db id -> dates of availability.
#[derive(Debug, Default)]
pub struct ServiceMap {
    map: HashMap<u64, BTreeSet<NaiveDate>>,
}

impl ServiceMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, service_id: u64, date: NaiveDate) {
        self.map.entry(service_id).or_default().insert(date);
    }

    /// Unknown service ids are never available, so their timetable entries
    /// are skipped at query time.
    pub fn is_available_on(&self, service_id: u64, date: &NaiveDate) -> bool {
        self.map
            .get(&service_id)
            .map_or(false, |dates| dates.contains(date))
    }
}

#[derive(Debug, Clone)]
pub struct StopData {
    pub db_id: u64,
    pub name: String,
    pub is_station: bool,
    pub parent_station: Option<Stop>,
    /// The road edge this stop is attached to.
    pub road_edge: RoadEdge,
    pub opposite_road_edge: Option<RoadEdge>,
    /// Position of the stop along `road_edge`, in [0, 1] from its source.
    pub road_abscissa: f64,
    /// Fare zone.
    pub zone_id: u16,
    /// (lon, lat)
    pub coord: (f64, f64),
}

#[derive(Debug)]
pub struct SectionData {
    pub network_id: u64,
    pub source: Stop,
    pub target: Stop,
    pub timetable: Timetable,
    /// Sorted by `start`; intervals do not overlap.
    pub frequencies: Vec<Frequency>,
}

#[derive(Debug)]
pub enum PublicTransportError {
    UnknownStop { section_network_id: u64 },
    UnsortedFrequencies { section_network_id: u64 },
}

impl fmt::Display for PublicTransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PublicTransportError::UnknownStop { section_network_id } => write!(
                f,
                "A section of network {} refers to an unknown stop.",
                section_network_id
            ),
            PublicTransportError::UnsortedFrequencies { section_network_id } => write!(
                f,
                "A section of network {} carries frequencies not sorted by start time.",
                section_network_id
            ),
        }
    }
}

impl std::error::Error for PublicTransportError {}

/// One public transport network: stops, sections and their service calendar.
/// Built once at load time, then read-only.
#[derive(Debug, Default)]
pub struct PublicTransportGraph {
    stop_datas: Vec<StopData>,
    section_datas: Vec<SectionData>,
    out_sections: Vec<Vec<Section>>,
    in_sections: Vec<Vec<Section>>,
    services: ServiceMap,
    stop_of_db_id: HashMap<u64, Stop>,
}

impl PublicTransportGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_stop(&mut self, data: StopData) -> Stop {
        let stop = Stop {
            idx: self.stop_datas.len(),
        };
        self.stop_of_db_id.insert(data.db_id, stop);
        self.stop_datas.push(data);
        self.out_sections.push(Vec::new());
        self.in_sections.push(Vec::new());
        stop
    }

    pub fn add_section(&mut self, data: SectionData) -> Result<Section, PublicTransportError> {
        if data.source.idx >= self.stop_datas.len() || data.target.idx >= self.stop_datas.len() {
            return Err(PublicTransportError::UnknownStop {
                section_network_id: data.network_id,
            });
        }
        if data
            .frequencies
            .windows(2)
            .any(|pair| pair[1].start < pair[0].start)
        {
            return Err(PublicTransportError::UnsortedFrequencies {
                section_network_id: data.network_id,
            });
        }
        let section = Section {
            idx: self.section_datas.len(),
        };
        self.out_sections[data.source.idx].push(section);
        self.in_sections[data.target.idx].push(section);
        self.section_datas.push(data);
        Ok(section)
    }

    pub fn stop(&self, stop: Stop) -> &StopData {
        &self.stop_datas[stop.idx]
    }

    pub fn section(&self, section: Section) -> &SectionData {
        &self.section_datas[section.idx]
    }

    pub fn out_sections(&self, stop: Stop) -> &[Section] {
        &self.out_sections[stop.idx]
    }

    pub fn in_sections(&self, stop: Stop) -> &[Section] {
        &self.in_sections[stop.idx]
    }

    pub fn stop_by_db_id(&self, db_id: u64) -> Option<Stop> {
        self.stop_of_db_id.get(&db_id).copied()
    }

    pub fn nb_of_stops(&self) -> usize {
        self.stop_datas.len()
    }

    pub fn nb_of_sections(&self) -> usize {
        self.section_datas.len()
    }

    pub fn services(&self) -> &ServiceMap {
        &self.services
    }

    pub fn services_mut(&mut self) -> &mut ServiceMap {
        &mut self.services
    }

    /// First departure on `section` at `time` or later whose service runs on
    /// `date`.
    pub fn next_departure(
        &self,
        section: Section,
        date: &NaiveDate,
        time: Minutes,
    ) -> Option<&TripTime> {
        self.section(section)
            .timetable
            .next_departures(time)
            .iter()
            .find(|entry| self.services.is_available_on(entry.service_id, date))
    }

    /// Latest arrival on `section` at `time` or earlier whose service runs
    /// on `date`.
    pub fn previous_arrival(
        &self,
        section: Section,
        date: &NaiveDate,
        time: Minutes,
    ) -> Option<&TripTime> {
        self.section(section)
            .timetable
            .previous_arrivals(time)
            .find(|entry| self.services.is_available_on(entry.service_id, date))
    }

    /// First entry of `trip` arriving at `time` or later; used for same-trip
    /// continuations, whose departure may already be in the past.
    pub fn next_arrival_of_trip(
        &self,
        section: Section,
        date: &NaiveDate,
        trip: TripId,
        time: Minutes,
    ) -> Option<&TripTime> {
        let table = self.section(section).timetable.entries();
        let idx = table.partition_point(|entry| entry.arrival < time);
        table[idx..]
            .iter()
            .find(|entry| entry.trip_id == trip && self.services.is_available_on(entry.service_id, date))
    }

    /// Latest entry of `trip` arriving at `time` or earlier; the reverse
    /// counterpart of `next_arrival_of_trip`.
    pub fn previous_arrival_of_trip(
        &self,
        section: Section,
        date: &NaiveDate,
        trip: TripId,
        time: Minutes,
    ) -> Option<&TripTime> {
        let table = self.section(section).timetable.entries();
        let idx = table.partition_point(|entry| entry.arrival <= time);
        table[..idx]
            .iter()
            .rev()
            .find(|entry| entry.trip_id == trip && self.services.is_available_on(entry.service_id, date))
    }
}
