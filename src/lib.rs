extern crate static_assertions;

pub mod time;

pub mod transport_mode;

pub mod road_graph;
pub mod speed_profile;

pub mod public_transport;

pub mod poi;

pub mod multimodal_graph;

pub mod automaton;

pub mod config;

pub mod cost;

mod engine;

pub mod request;
pub mod response;

pub mod solver;

pub mod osm;

pub use chrono::NaiveDate;
pub use log;

pub use engine::{Backward, EdgeDirection, Forward, MultimodalDijkstra};
pub use solver::Solver;
pub use time::Minutes;
