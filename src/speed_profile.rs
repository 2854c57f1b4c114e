use crate::time::Minutes;
use crate::transport_mode::SpeedRule;

/// Reference from a road edge into the speed profile arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SpeedProfileRef {
    pub(crate) idx: usize,
}

/// One piece of a piecewise-constant daily speed function.
#[derive(Debug, Clone, Copy)]
pub struct SpeedPeriod {
    /// Start of the piece, minutes since midnight.
    pub begin: Minutes,
    /// Duration of the piece, minutes.
    pub length: Minutes,
    /// km/h
    pub speed: f64,
}

#[derive(Debug, Default, Clone)]
struct EdgeSpeedProfile {
    /// Pieces sorted by `begin`, one sequence per speed rule.
    periods: Vec<(SpeedRule, Vec<SpeedPeriod>)>,
}

/// Daily speed profiles for a subset of road edges.
///
/// The cost calculator integrates the pieces returned by `periods_after`
/// until the edge length is consumed, and falls back to the edge average
/// speed for any remainder.
#[derive(Debug, Default)]
pub struct RoadEdgeSpeedProfile {
    profiles: Vec<EdgeSpeedProfile>,
}

impl RoadEdgeSpeedProfile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_profile(
        &mut self,
        periods: Vec<(SpeedRule, Vec<SpeedPeriod>)>,
    ) -> SpeedProfileRef {
        let profile_ref = SpeedProfileRef {
            idx: self.profiles.len(),
        };
        self.profiles.push(EdgeSpeedProfile { periods });
        profile_ref
    }

    /// The pieces of `profile` for `speed_rule` covering `time` onwards.
    ///
    /// Returns `None` when no piece covers `time` for this rule, in which
    /// case the caller uses the average edge speed.
    pub fn periods_after(
        &self,
        profile: SpeedProfileRef,
        speed_rule: SpeedRule,
        time: Minutes,
    ) -> Option<&[SpeedPeriod]> {
        let periods = self
            .profiles
            .get(profile.idx)?
            .periods
            .iter()
            .find(|(rule, _)| *rule == speed_rule)
            .map(|(_, periods)| periods)?;
        // last piece starting at or before `time`
        let idx = periods.partition_point(|period| period.begin <= time);
        if idx == 0 {
            return None;
        }
        let first = &periods[idx - 1];
        if first.begin + first.length < time {
            return None;
        }
        Some(&periods[idx - 1..])
    }
}
