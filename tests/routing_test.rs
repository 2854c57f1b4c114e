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

mod utils;

use std::sync::atomic::{AtomicBool, Ordering};

use failure::Error;
use sleipnir::config::{Criterion, RequestParams};
use sleipnir::multimodal_graph::ConnectionKind;
use sleipnir::public_transport::TripId;
use sleipnir::request::RequestError;
use sleipnir::transport_mode::{ModeId, TrafficRules};
use sleipnir::Solver;
use utils::*;

#[test]
fn test_single_road_edge_car() -> Result<(), Error> {
    init();
    let fixture = GraphBuilder::new()
        .mode(car())
        .road("A", "B", 600.0)
        .build();
    let solver = Solver::new(&fixture.graph, &[], None);

    let request = fixture.request("A", "B", 600.0, &[CAR]);
    let response = solver.solve_request(&request, &RequestParams::default(), &AtomicBool::new(false))?;

    // 600 m at 60% of 50 km/h
    assert_close(response.total_cost, 1.2);
    assert_eq!(response.nb_of_edges(), 1);
    assert_eq!(response.modes, vec![ModeId::new(CAR)]);
    assert_eq!(response.trip_ids, vec![TripId::NONE]);
    assert!(matches!(
        response.edges[0].kind,
        ConnectionKind::Road2Road(_)
    ));
    Ok(())
}

#[test]
fn test_walking_detour() -> Result<(), Error> {
    init();
    // the direct road is for cars only, walking must go through C
    let fixture = GraphBuilder::new()
        .mode(car())
        .mode(pedestrian())
        .road_with("A", "B", 100.0, TrafficRules::CAR, TrafficRules::NONE, 50.0)
        .road("A", "C", 80.0)
        .road("C", "B", 80.0)
        .build();
    let solver = Solver::new(&fixture.graph, &[], None);

    let request = fixture.request("A", "B", 480.0, &[WALK]);
    let response = solver.solve_request(&request, &RequestParams::default(), &AtomicBool::new(false))?;

    assert_close(response.total_cost, 160.0 / 60.0);
    assert_eq!(response.nb_of_edges(), 2);
    assert_eq!(response.edges[0].road_edge(), Some(fixture.road_edge("A", "C")));
    assert_eq!(response.edges[1].road_edge(), Some(fixture.road_edge("C", "B")));
    Ok(())
}

#[test]
fn test_same_query_twice_is_identical() -> Result<(), Error> {
    init();
    let fixture = GraphBuilder::new()
        .mode(car())
        .mode(pedestrian())
        .road("A", "B", 100.0)
        .road("A", "C", 80.0)
        .road("C", "B", 80.0)
        .build();
    let solver = Solver::new(&fixture.graph, &[], None);
    let request = fixture.request("A", "B", 480.0, &[CAR, WALK]);

    let first = solver.solve_request(&request, &RequestParams::default(), &AtomicBool::new(false))?;
    let second = solver.solve_request(&request, &RequestParams::default(), &AtomicBool::new(false))?;

    assert_eq!(first.total_cost, second.total_cost);
    assert_eq!(first.edges, second.edges);
    assert_eq!(first.modes, second.modes);
    assert_eq!(first.wait_times, second.wait_times);
    Ok(())
}

#[test]
fn test_distance_criterion_prefers_the_short_road() -> Result<(), Error> {
    init();
    let fixture = GraphBuilder::new()
        .mode(car())
        .road("A", "B", 100.0)
        .road("A", "C", 80.0)
        .road("C", "B", 80.0)
        .build();
    let solver = Solver::new(&fixture.graph, &[], None);

    let mut request = fixture.request("A", "B", 480.0, &[CAR]);
    request.criterion = Criterion::Distance;
    let response = solver.solve_request(&request, &RequestParams::default(), &AtomicBool::new(false))?;

    // metres, not minutes
    assert_close(response.total_cost, 100.0);
    assert_eq!(response.nb_of_edges(), 1);
    Ok(())
}

#[test]
fn test_unreachable_destination() {
    init();
    let fixture = GraphBuilder::new()
        .mode(car())
        .mode(pedestrian())
        .road_with("A", "B", 100.0, TrafficRules::PEDESTRIAN, TrafficRules::NONE, 50.0)
        .build();
    let solver = Solver::new(&fixture.graph, &[], None);

    let request = fixture.request("A", "B", 480.0, &[CAR]);
    let error = solver
        .solve_request(&request, &RequestParams::default(), &AtomicBool::new(false))
        .unwrap_err();
    assert!(matches!(error, RequestError::NoPath));
}

#[test]
fn test_unknown_origin_is_invalid() {
    init();
    let fixture = GraphBuilder::new().mode(car()).road("A", "B", 100.0).build();
    let solver = Solver::new(&fixture.graph, &[], None);

    let mut request = fixture.request("A", "B", 480.0, &[CAR]);
    request.origin = 99_999;
    let error = solver
        .solve_request(&request, &RequestParams::default(), &AtomicBool::new(false))
        .unwrap_err();
    assert!(matches!(error, RequestError::InvalidRequest(_)));
}

#[test]
fn test_no_allowed_mode_is_invalid() {
    init();
    let fixture = GraphBuilder::new().mode(car()).road("A", "B", 100.0).build();
    let solver = Solver::new(&fixture.graph, &[], None);

    let request = fixture.request("A", "B", 480.0, &[]);
    let error = solver
        .solve_request(&request, &RequestParams::default(), &AtomicBool::new(false))
        .unwrap_err();
    assert!(matches!(error, RequestError::InvalidRequest(_)));
}

#[test]
fn test_cancellation_is_prompt() {
    init();
    let fixture = GraphBuilder::new().mode(car()).road("A", "B", 100.0).build();
    let solver = Solver::new(&fixture.graph, &[], None);

    let cancel = AtomicBool::new(false);
    cancel.store(true, Ordering::Relaxed);
    let request = fixture.request("A", "B", 480.0, &[CAR]);
    let error = solver
        .solve_request(&request, &RequestParams::default(), &cancel)
        .unwrap_err();
    assert!(matches!(error, RequestError::Cancelled));
}

#[test]
fn test_unsupported_criterion_parse() {
    use std::str::FromStr;
    let error = Criterion::from_str("comfort").unwrap_err();
    let error: RequestError = error.into();
    assert!(matches!(error, RequestError::UnsupportedCriterion(_)));
    assert_eq!(Criterion::from_str("time").unwrap(), Criterion::Time);
    assert_eq!(Criterion::from_str("distance").unwrap(), Criterion::Distance);
}
