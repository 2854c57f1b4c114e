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

//! OSM PBF ingestion: produces the road sections (ways split at
//! intersections) and resolved turn restrictions that the persistent graph
//! is built from.

pub mod reader;
pub mod restrictions;
pub mod sections;
pub mod writer;

pub use reader::{read_pbf, IngestError};
pub use writer::{CollectWriter, RestrictionRecord, SectionRecord, Writer};

/// Caller-supplied progress sink; ingestion reports `(done, total)` at
/// phase boundaries and regularly in between.
pub trait Progress {
    fn report(&mut self, done: usize, total: usize);
}

/// Ignores every report.
pub struct NoProgress;

impl Progress for NoProgress {
    fn report(&mut self, _done: usize, _total: usize) {}
}

/// Logs phase boundaries through the `log` facade.
pub struct LogProgress {
    pub phase: &'static str,
}

impl Progress for LogProgress {
    fn report(&mut self, done: usize, total: usize) {
        if done == 0 || done == total {
            log::info!("{}: {}/{}", self.phase, done, total);
        }
    }
}
