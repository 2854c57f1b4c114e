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

use serde::{Deserialize, Serialize};

/// m/s
pub const DEFAULT_WALKING_SPEED: f64 = 1.0;
/// m/s
pub const DEFAULT_CYCLING_SPEED: f64 = 5.0;
/// minutes
pub const DEFAULT_MIN_TRANSFER_TIME: f64 = 2.0;
/// minutes
pub const DEFAULT_CAR_PARKING_SEARCH_TIME: f64 = 5.0;
/// minutes
pub const DEFAULT_VEHICLE_PICKUP_TIME: f64 = 1.0;
/// minutes
pub const DEFAULT_VEHICLE_RETURN_TIME: f64 = 1.0;

fn default_walking_speed() -> f64 {
    DEFAULT_WALKING_SPEED
}
fn default_cycling_speed() -> f64 {
    DEFAULT_CYCLING_SPEED
}
fn default_min_transfer_time() -> f64 {
    DEFAULT_MIN_TRANSFER_TIME
}
fn default_car_parking_search_time() -> f64 {
    DEFAULT_CAR_PARKING_SEARCH_TIME
}
fn default_vehicle_pickup_time() -> f64 {
    DEFAULT_VEHICLE_PICKUP_TIME
}
fn default_vehicle_return_time() -> f64 {
    DEFAULT_VEHICLE_RETURN_TIME
}

/// Tunable costs of a query, with sensible defaults for every field.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RequestParams {
    /// walking speed, in meters per second
    #[serde(default = "default_walking_speed")]
    pub walking_speed: f64,

    /// cycling speed, in meters per second
    #[serde(default = "default_cycling_speed")]
    pub cycling_speed: f64,

    /// minimal time needed to transfer between two vehicles, in minutes
    #[serde(default = "default_min_transfer_time")]
    pub min_transfer_time: f64,

    /// time spent looking for a car parking spot, in minutes
    #[serde(default = "default_car_parking_search_time")]
    pub car_parking_search_time: f64,

    /// time spent taking a (shared or parked) vehicle, in minutes
    #[serde(default = "default_vehicle_pickup_time")]
    pub vehicle_pickup_time: f64,

    /// time spent returning a shared vehicle, in minutes
    #[serde(default = "default_vehicle_return_time")]
    pub vehicle_return_time: f64,

    /// database id of the road vertex hosting the traveler's own parking,
    /// if any
    #[serde(default)]
    pub private_parking: Option<u64>,
}

impl Default for RequestParams {
    fn default() -> Self {
        Self {
            walking_speed: DEFAULT_WALKING_SPEED,
            cycling_speed: DEFAULT_CYCLING_SPEED,
            min_transfer_time: DEFAULT_MIN_TRANSFER_TIME,
            car_parking_search_time: DEFAULT_CAR_PARKING_SEARCH_TIME,
            vehicle_pickup_time: DEFAULT_VEHICLE_PICKUP_TIME,
            vehicle_return_time: DEFAULT_VEHICLE_RETURN_TIME,
            private_parking: None,
        }
    }
}

/// What a query minimises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Criterion {
    Time,
    Distance,
}

impl std::str::FromStr for Criterion {
    type Err = CriterionError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let criterion = match s {
            "time" => Criterion::Time,
            "distance" => Criterion::Distance,
            _ => Err(CriterionError {
                criterion_name: s.to_string(),
            })?,
        };
        Ok(criterion)
    }
}

impl std::fmt::Display for Criterion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Criterion::Time => write!(f, "time"),
            Criterion::Distance => write!(f, "distance"),
        }
    }
}

#[derive(Debug)]
pub struct CriterionError {
    pub criterion_name: String,
}

impl std::fmt::Display for CriterionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Bad criterion given : `{}`. I can only minimise `time` or `distance`.",
            self.criterion_name
        )
    }
}

impl std::error::Error for CriterionError {}
