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

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::{Criterion, CriterionError};
use crate::transport_mode::ModeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DepartureOrArrival {
    /// `time` is the earliest departure from the origin.
    DepartAfter,
    /// `time` is the latest arrival at the destination.
    ArriveBefore,
}

/// One journey query, in terms of database ids.
#[derive(Debug, Clone)]
pub struct Request {
    pub origin: u64,
    pub destination: u64,
    pub date: NaiveDate,
    /// minutes since midnight on `date`
    pub time: f64,
    pub departure_or_arrival: DepartureOrArrival,
    pub allowed_modes: Vec<ModeId>,
    /// When set, the journey starts with this mode only; otherwise one
    /// start per allowed mode.
    pub start_mode: Option<ModeId>,
    pub criterion: Criterion,
}

#[derive(Debug)]
pub enum BadRequest {
    UnknownOrigin(u64),
    UnknownDestination(u64),
    NoAllowedMode,
    UnknownMode(u64),
    StartModeNotAllowed(u64),
}

impl fmt::Display for BadRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BadRequest::UnknownOrigin(db_id) => {
                write!(f, "The requested origin {} is not in the graph.", db_id)
            }
            BadRequest::UnknownDestination(db_id) => {
                write!(f, "The requested destination {} is not in the graph.", db_id)
            }
            BadRequest::NoAllowedMode => {
                write!(f, "The request allows no transport mode at all.")
            }
            BadRequest::UnknownMode(db_id) => {
                write!(f, "The requested mode {} is not in the graph.", db_id)
            }
            BadRequest::StartModeNotAllowed(db_id) => write!(
                f,
                "The requested start mode {} is not among the allowed modes.",
                db_id
            ),
        }
    }
}

impl std::error::Error for BadRequest {}

/// Everything that can go wrong while answering one query. Per-query only;
/// shared state is never touched.
#[derive(Debug)]
pub enum RequestError {
    InvalidRequest(BadRequest),
    UnsupportedCriterion(CriterionError),
    NoPath,
    Cancelled,
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestError::InvalidRequest(bad_request) => bad_request.fmt(f),
            RequestError::UnsupportedCriterion(err) => err.fmt(f),
            RequestError::NoPath => {
                write!(f, "The destination is not reachable from the origin.")
            }
            RequestError::Cancelled => write!(f, "The query was cancelled."),
        }
    }
}

impl std::error::Error for RequestError {}

impl From<BadRequest> for RequestError {
    fn from(bad_request: BadRequest) -> Self {
        RequestError::InvalidRequest(bad_request)
    }
}

impl From<CriterionError> for RequestError {
    fn from(err: CriterionError) -> Self {
        RequestError::UnsupportedCriterion(err)
    }
}
