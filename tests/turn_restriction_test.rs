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

use std::sync::atomic::AtomicBool;

use failure::Error;
use sleipnir::automaton::{RestrictionKind, TurnRestriction};
use sleipnir::config::RequestParams;
use sleipnir::request::RequestError;
use sleipnir::time::Minutes;
use sleipnir::transport_mode::TrafficRules;
use sleipnir::Solver;
use utils::*;

fn junction() -> Fixture {
    GraphBuilder::new()
        .mode(car())
        .mode(pedestrian())
        .road("A", "B", 100.0)
        .road("B", "C", 100.0)
        .road("B", "D", 100.0)
        .build()
}

#[test]
fn test_no_turn_without_detour_is_no_path() {
    init();
    let fixture = junction();
    let restrictions = vec![TurnRestriction {
        sequence: vec![fixture.road_edge("A", "B"), fixture.road_edge("B", "C")],
        kind: RestrictionKind::No,
        penalty: None,
    }];
    let solver = Solver::new(&fixture.graph, &restrictions, None);

    let request = fixture.request("A", "C", 480.0, &[CAR]);
    let error = solver
        .solve_request(&request, &RequestParams::default(), &AtomicBool::new(false))
        .unwrap_err();
    assert!(matches!(error, RequestError::NoPath));
}

#[test]
fn test_no_turn_takes_the_detour() -> Result<(), Error> {
    init();
    let fixture = GraphBuilder::new()
        .mode(car())
        .road("A", "B", 100.0)
        .road("B", "C", 100.0)
        .road("B", "D", 100.0)
        .road("D", "C", 100.0)
        .build();
    let restrictions = vec![TurnRestriction {
        sequence: vec![fixture.road_edge("A", "B"), fixture.road_edge("B", "C")],
        kind: RestrictionKind::No,
        penalty: None,
    }];
    let solver = Solver::new(&fixture.graph, &restrictions, None);

    let request = fixture.request("A", "C", 480.0, &[CAR]);
    let response = solver.solve_request(&request, &RequestParams::default(), &AtomicBool::new(false))?;

    // A -> B -> D -> C, 300 m at 500 m/min
    assert_close(response.total_cost, 0.6);
    assert_eq!(response.nb_of_edges(), 3);
    assert_eq!(response.edges[1].road_edge(), Some(fixture.road_edge("B", "D")));
    Ok(())
}

#[test]
fn test_only_turn_forbids_the_others() -> Result<(), Error> {
    init();
    let fixture = junction();
    let restrictions = vec![TurnRestriction {
        sequence: vec![fixture.road_edge("A", "B"), fixture.road_edge("B", "C")],
        kind: RestrictionKind::Only,
        penalty: None,
    }];
    let solver = Solver::new(&fixture.graph, &restrictions, None);

    // the mandated turn still works
    let request = fixture.request("A", "C", 480.0, &[CAR]);
    let response = solver.solve_request(&request, &RequestParams::default(), &AtomicBool::new(false))?;
    assert_eq!(response.nb_of_edges(), 2);

    // the competing turn does not
    let request = fixture.request("A", "D", 480.0, &[CAR]);
    let error = solver
        .solve_request(&request, &RequestParams::default(), &AtomicBool::new(false))
        .unwrap_err();
    assert!(matches!(error, RequestError::NoPath));
    Ok(())
}

#[test]
fn test_penalty_restriction_charges_the_turn() -> Result<(), Error> {
    init();
    let fixture = junction();
    let restrictions = vec![TurnRestriction {
        sequence: vec![fixture.road_edge("A", "B"), fixture.road_edge("B", "C")],
        kind: RestrictionKind::No,
        penalty: Some((TrafficRules::CAR, Minutes::new(2.0))),
    }];
    let solver = Solver::new(&fixture.graph, &restrictions, None);

    let request = fixture.request("A", "C", 480.0, &[CAR]);
    let response = solver.solve_request(&request, &RequestParams::default(), &AtomicBool::new(false))?;
    // 200 m at 500 m/min, plus the 2 minutes turn penalty
    assert_close(response.total_cost, 0.4 + 2.0);

    // the penalty is keyed on car traffic rules, walking is free of it
    let request = fixture.request("A", "C", 480.0, &[WALK]);
    let response = solver.solve_request(&request, &RequestParams::default(), &AtomicBool::new(false))?;
    assert_close(response.total_cost, 200.0 / 60.0);
    Ok(())
}

#[test]
fn test_restriction_only_binds_with_its_history() -> Result<(), Error> {
    init();
    // the restricted turn only applies when coming through A -> B
    let fixture = GraphBuilder::new()
        .mode(car())
        .road("A", "B", 100.0)
        .road("E", "B", 100.0)
        .road("B", "C", 100.0)
        .build();
    let restrictions = vec![TurnRestriction {
        sequence: vec![fixture.road_edge("A", "B"), fixture.road_edge("B", "C")],
        kind: RestrictionKind::No,
        penalty: None,
    }];
    let solver = Solver::new(&fixture.graph, &restrictions, None);

    let request = fixture.request("E", "C", 480.0, &[CAR]);
    let response = solver.solve_request(&request, &RequestParams::default(), &AtomicBool::new(false))?;
    assert_eq!(response.nb_of_edges(), 2);
    Ok(())
}
