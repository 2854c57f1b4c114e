use std::cmp::Ordering;
use std::fmt::{Display, Formatter};
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub};

/// Scalar used throughout the search core.
///
/// Holds minutes since midnight on the service day when used as an instant,
/// a number of minutes when used as a duration, and metres when the request
/// minimises distance. Instants may exceed 24h * 60 (a trip running past
/// midnight stays on its service day) and may be negative on the reversed
/// time axis of an arrive-before search.
///
/// The total order is `f64::total_cmp`; the crate never constructs NaN
/// (impossible traversals are `None`, not a sentinel value).
#[derive(Debug, Clone, Copy)]
pub struct Minutes {
    minutes: f64,
}

impl Minutes {
    pub fn zero() -> Self {
        Self { minutes: 0.0 }
    }

    pub const fn new(minutes: f64) -> Self {
        Self { minutes }
    }

    pub fn total_minutes(&self) -> f64 {
        self.minutes
    }

    pub fn min(self, other: Self) -> Self {
        if self <= other {
            self
        } else {
            other
        }
    }
}

impl PartialEq for Minutes {
    fn eq(&self, other: &Self) -> bool {
        self.minutes.total_cmp(&other.minutes) == Ordering::Equal
    }
}

impl Eq for Minutes {}

impl PartialOrd for Minutes {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Minutes {
    fn cmp(&self, other: &Self) -> Ordering {
        self.minutes.total_cmp(&other.minutes)
    }
}

impl Add for Minutes {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            minutes: self.minutes + rhs.minutes,
        }
    }
}

impl AddAssign for Minutes {
    fn add_assign(&mut self, rhs: Self) {
        self.minutes += rhs.minutes;
    }
}

impl Sub for Minutes {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self {
            minutes: self.minutes - rhs.minutes,
        }
    }
}

impl Neg for Minutes {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self {
            minutes: -self.minutes,
        }
    }
}

impl Mul<f64> for Minutes {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self::Output {
        Self {
            minutes: self.minutes * rhs,
        }
    }
}

impl Div<f64> for Minutes {
    type Output = Self;

    fn div(self, rhs: f64) -> Self::Output {
        Self {
            minutes: self.minutes / rhs,
        }
    }
}

impl Display for Minutes {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let total = self.minutes;
        if total < 0.0 {
            return write!(f, "-{}", Minutes::new(-total));
        }
        let hours = (total / 60.0).floor() as u64;
        let minutes = (total % 60.0).floor() as u64;
        let seconds = ((total * 60.0) % 60.0).round() as u64;
        if hours != 0 {
            write!(f, "{}h{:02}m{:02}s", hours, minutes, seconds)
        } else if minutes != 0 {
            write!(f, "{}m{:02}s", minutes, seconds)
        } else {
            write!(f, "{}s", seconds)
        }
    }
}
