use std::fmt::{self, Display};

/// Every unit a duration can be written in, smallest first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TimeUnit {
    Seconds,
    Minutes,
    Hours,
    Days,
    Weeks,
    Months,
    Years,
    Decades,
    Centuries,
    Millennia,
}

impl TimeUnit {
    pub const ALL: [TimeUnit; 10] = [
        TimeUnit::Seconds,
        TimeUnit::Minutes,
        TimeUnit::Hours,
        TimeUnit::Days,
        TimeUnit::Weeks,
        TimeUnit::Months,
        TimeUnit::Years,
        TimeUnit::Decades,
        TimeUnit::Centuries,
        TimeUnit::Millennia,
    ];

    /// Units a [`DurationContainer`](crate::DurationContainer) stores directly, smallest first.
    pub const BASE: [TimeUnit; 6] = [
        TimeUnit::Seconds,
        TimeUnit::Minutes,
        TimeUnit::Hours,
        TimeUnit::Days,
        TimeUnit::Months,
        TimeUnit::Years,
    ];

    pub fn is_base(self) -> bool {
        self.to_base().1 == 1
    }

    /// The base unit this unit is stored as, and how many of that base unit one of `self` is worth.
    pub fn to_base(self) -> (TimeUnit, i64) {
        match self {
            TimeUnit::Weeks => (TimeUnit::Days, 7),
            TimeUnit::Decades => (TimeUnit::Years, 10),
            TimeUnit::Centuries => (TimeUnit::Years, 100),
            TimeUnit::Millennia => (TimeUnit::Years, 1000),
            base => (base, 1),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            TimeUnit::Seconds => "seconds",
            TimeUnit::Minutes => "minutes",
            TimeUnit::Hours => "hours",
            TimeUnit::Days => "days",
            TimeUnit::Weeks => "weeks",
            TimeUnit::Months => "months",
            TimeUnit::Years => "years",
            TimeUnit::Decades => "decades",
            TimeUnit::Centuries => "centuries",
            TimeUnit::Millennia => "millennia",
        }
    }

    /// Key of the comma-separated synonym list for this unit.
    pub fn translation_key(self) -> String {
        format!("utils.units.{}", self.name())
    }
}

impl Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
