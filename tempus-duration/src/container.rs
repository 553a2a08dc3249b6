use std::collections::BTreeMap;
use std::fmt::{self, Display};

use time::{Date, Duration, Month, OffsetDateTime};

use crate::unit::TimeUnit;

const CLOCK_UNITS: [(TimeUnit, i64); 4] = [
    (TimeUnit::Days, 86_400),
    (TimeUnit::Hours, 3_600),
    (TimeUnit::Minutes, 60),
    (TimeUnit::Seconds, 1),
];

/// Signed amounts keyed by base unit.
///
/// Compound units are multiplied into their base unit on the way in (a week is stored as 7 days, a century as 100
/// years), so two containers built from `1w` and `7d` are equal. Months and years stay symbolic until the container
/// is [applied](DurationContainer::apply) to an instant, because their length depends on where they start.
///
/// Arithmetic saturates instead of overflowing; overflow is only reported once the container meets a calendar.
#[derive(Clone, Debug, Default)]
pub struct DurationContainer {
    amounts: BTreeMap<TimeUnit, i64>,
}

impl DurationContainer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn plus(&mut self, amount: i64, unit: TimeUnit) {
        let (base, factor) = unit.to_base();
        let stored = self.amounts.entry(base).or_default();
        *stored = stored.saturating_add(amount.saturating_mul(factor));
    }

    pub fn minus(&mut self, amount: i64, unit: TimeUnit) {
        self.plus(amount.saturating_neg(), unit);
    }

    /// Replaces the amount of `unit`'s base unit, so `set(2, TimeUnit::Weeks)` stores 14 days.
    pub fn set(&mut self, amount: i64, unit: TimeUnit) {
        let (base, factor) = unit.to_base();
        self.amounts.insert(base, amount.saturating_mul(factor));
    }

    /// The amount stored for a base unit. For a compound unit, how many whole ones fit in its base unit's amount.
    pub fn get(&self, unit: TimeUnit) -> i64 {
        let (base, factor) = unit.to_base();
        self.amounts.get(&base).copied().unwrap_or(0) / factor
    }

    /// Non-zero amounts, smallest unit first.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (TimeUnit, i64)> + '_ {
        self.amounts
            .iter()
            .filter(|(_, amount)| **amount != 0)
            .map(|(unit, amount)| (*unit, *amount))
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    /// Whether the largest non-zero unit is positive. An empty container counts as positive.
    pub fn is_positive(&self) -> bool {
        self.iter().last().is_none_or(|(_, amount)| amount > 0)
    }

    pub fn negated(&self) -> Self {
        Self {
            amounts: self
                .amounts
                .iter()
                .map(|(unit, amount)| (*unit, amount.saturating_neg()))
                .collect(),
        }
    }

    /// Adds this duration to `instant`: years and months first, clamping to the end of shorter months, then
    /// everything else as an exact number of seconds. `None` if the result leaves the supported date range.
    pub fn apply(&self, instant: OffsetDateTime) -> Option<OffsetDateTime> {
        let months = self
            .get(TimeUnit::Years)
            .checked_mul(12)?
            .checked_add(self.get(TimeUnit::Months))?;

        let seconds = CLOCK_UNITS
            .into_iter()
            .try_fold(0i64, |total, (unit, factor)| total.checked_add(self.get(unit).checked_mul(factor)?))?;

        add_months(instant, months)?.checked_add(Duration::seconds(seconds))
    }

    /// Resolves this duration against `reference` and redistributes it over every base unit, so `25h` becomes
    /// `1d1h` and `13mo` becomes `1y1mo`. `None` if applying it to `reference` overflows.
    pub fn normalize(&self, reference: OffsetDateTime) -> Option<Self> {
        let end = self.apply(reference)?;
        Some(Self::between(reference, end))
    }

    /// The calendar distance from `start` to `end`, negative when `end` is earlier.
    pub fn between(start: OffsetDateTime, end: OffsetDateTime) -> Self {
        if end < start {
            return Self::between(end, start).negated();
        }

        let end = end.to_offset(start.offset());
        let mut months = (i64::from(end.year()) - i64::from(start.year())) * 12 + i64::from(u8::from(end.month()))
            - i64::from(u8::from(start.month()));

        let mut anchor = add_months(start, months).unwrap_or(start);
        while months > 0 && anchor > end {
            months -= 1;
            anchor = add_months(start, months).unwrap_or(start);
        }

        let remainder = end - anchor;

        let mut container = Self::new();
        container.set(months / 12, TimeUnit::Years);
        container.set(months % 12, TimeUnit::Months);
        container.set(remainder.whole_days(), TimeUnit::Days);
        container.set(remainder.whole_hours() % 24, TimeUnit::Hours);
        container.set(remainder.whole_minutes() % 60, TimeUnit::Minutes);
        container.set(remainder.whole_seconds() % 60, TimeUnit::Seconds);
        container
    }
}

fn add_months(instant: OffsetDateTime, months: i64) -> Option<OffsetDateTime> {
    if months == 0 {
        return Some(instant);
    }

    let index = i64::from(instant.year())
        .checked_mul(12)?
        .checked_add(i64::from(u8::from(instant.month())) - 1)?
        .checked_add(months)?;

    let year = i32::try_from(index.div_euclid(12)).ok()?;
    let month = Month::try_from(u8::try_from(index.rem_euclid(12) + 1).ok()?).ok()?;
    let day = instant.day().min(month.length(year));

    let date = Date::from_calendar_date(year, month, day).ok()?;
    Some(instant.replace_date(date))
}

impl PartialEq for DurationContainer {
    fn eq(&self, other: &Self) -> bool {
        TimeUnit::BASE.iter().all(|unit| self.get(*unit) == other.get(*unit))
    }
}

impl Eq for DurationContainer {}

impl Display for DurationContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("0 seconds");
        }

        let parts = self
            .iter()
            .rev()
            .map(|(unit, amount)| {
                let name = unit.name();
                if amount.abs() == 1 {
                    format!("{amount} {}", name.trim_end_matches('s'))
                } else {
                    format!("{amount} {name}")
                }
            })
            .collect::<Vec<_>>();

        f.write_str(&parts.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::*;

    fn container(parts: &[(i64, TimeUnit)]) -> DurationContainer {
        let mut container = DurationContainer::new();
        for (amount, unit) in parts {
            container.plus(*amount, *unit);
        }
        container
    }

    #[test]
    fn compound_units_fold_into_base() {
        let weeks = container(&[(1, TimeUnit::Weeks)]);
        assert_eq!(weeks, container(&[(7, TimeUnit::Days)]));
        assert_eq!(weeks.get(TimeUnit::Weeks), 1);

        let mut years = container(&[(1, TimeUnit::Decades), (2, TimeUnit::Centuries), (1, TimeUnit::Millennia)]);
        assert_eq!(years.get(TimeUnit::Years), 1210);

        years.set(3, TimeUnit::Decades);
        assert_eq!(years.get(TimeUnit::Years), 30);
    }

    #[test]
    fn minus_and_zeroes() {
        let mut c = container(&[(3, TimeUnit::Hours)]);
        c.minus(3, TimeUnit::Hours);
        assert!(c.is_empty());
        assert_eq!(c, DurationContainer::new());
    }

    #[test]
    fn saturates() {
        let c = container(&[(i64::MAX, TimeUnit::Millennia), (1, TimeUnit::Years)]);
        assert_eq!(c.get(TimeUnit::Years), i64::MAX);
    }

    #[test]
    fn positivity() {
        assert!(DurationContainer::new().is_positive());
        assert!(container(&[(1, TimeUnit::Days), (-2, TimeUnit::Hours)]).is_positive());
        assert!(!container(&[(-1, TimeUnit::Days), (2, TimeUnit::Hours)]).is_positive());
    }

    #[test]
    fn normalized_sign_follows_the_instant() {
        let reference = datetime!(2024-03-31 0:00 UTC);

        // lands on 2024-03-01, a month of days too early
        let c = container(&[(-1, TimeUnit::Months), (1, TimeUnit::Days)]);
        assert!(!c.normalize(reference).unwrap().is_positive());

        // lands on 2024-03-31 exactly
        let c = container(&[(-1, TimeUnit::Months), (31, TimeUnit::Days)]);
        assert!(!c.is_positive());
        assert!(c.normalize(reference).unwrap().is_positive());
    }

    #[test]
    fn apply_clamps_month_ends() {
        let c = container(&[(1, TimeUnit::Months)]);
        assert_eq!(c.apply(datetime!(2024-01-31 12:00 UTC)), Some(datetime!(2024-02-29 12:00 UTC)));

        let c = container(&[(1, TimeUnit::Years)]);
        assert_eq!(c.apply(datetime!(2024-02-29 0:00 UTC)), Some(datetime!(2025-02-28 0:00 UTC)));

        let c = container(&[(-2, TimeUnit::Months)]);
        assert_eq!(c.apply(datetime!(2024-01-15 0:00 UTC)), Some(datetime!(2023-11-15 0:00 UTC)));
    }

    #[test]
    fn apply_clock_units() {
        let c = container(&[(1, TimeUnit::Days), (-30, TimeUnit::Minutes), (5, TimeUnit::Seconds)]);
        assert_eq!(c.apply(datetime!(2024-03-01 0:00 UTC)), Some(datetime!(2024-03-01 23:30:05 UTC)));
    }

    #[test]
    fn apply_overflow() {
        assert_eq!(container(&[(i64::MAX, TimeUnit::Seconds)]).apply(datetime!(2024-01-01 0:00 UTC)), None);
        assert_eq!(container(&[(20_000, TimeUnit::Years)]).apply(datetime!(2024-01-01 0:00 UTC)), None);
        assert_eq!(container(&[(i64::MAX, TimeUnit::Years)]).apply(datetime!(2024-01-01 0:00 UTC)), None);
    }

    #[test]
    fn normalize_carries() {
        let reference = datetime!(2024-01-15 0:00 UTC);

        let c = container(&[(25, TimeUnit::Hours)]).normalize(reference).unwrap();
        assert_eq!(c, container(&[(1, TimeUnit::Days), (1, TimeUnit::Hours)]));

        let c = container(&[(13, TimeUnit::Months)]).normalize(reference).unwrap();
        assert_eq!(c, container(&[(1, TimeUnit::Years), (1, TimeUnit::Months)]));

        let c = container(&[(90, TimeUnit::Minutes), (1, TimeUnit::Weeks)]).normalize(reference).unwrap();
        assert_eq!(c, container(&[(7, TimeUnit::Days), (1, TimeUnit::Hours), (30, TimeUnit::Minutes)]));

        let c = container(&[(-5, TimeUnit::Days)]).normalize(reference).unwrap();
        assert_eq!(c, container(&[(-5, TimeUnit::Days)]));
    }

    #[test]
    fn between_steps_back_partial_months() {
        let c = DurationContainer::between(datetime!(2024-01-15 10:00 UTC), datetime!(2024-02-15 09:00 UTC));
        assert_eq!(c, container(&[(30, TimeUnit::Days), (23, TimeUnit::Hours)]));

        let c = DurationContainer::between(datetime!(2024-01-15 10:00 UTC), datetime!(2025-03-16 10:00:30 UTC));
        assert_eq!(
            c,
            container(&[(1, TimeUnit::Years), (2, TimeUnit::Months), (1, TimeUnit::Days), (30, TimeUnit::Seconds)])
        );
    }

    #[test]
    fn between_reversed_is_negated() {
        let start = datetime!(2024-01-15 10:00 UTC);
        let end = datetime!(2024-03-01 0:00 UTC);
        assert_eq!(DurationContainer::between(end, start), DurationContainer::between(start, end).negated());
    }

    #[test]
    fn between_mixed_offsets() {
        let c = DurationContainer::between(datetime!(2024-01-01 0:00 UTC), datetime!(2024-01-01 3:00 +2));
        assert_eq!(c, container(&[(1, TimeUnit::Hours)]));
    }

    #[test]
    fn display() {
        assert_eq!(DurationContainer::new().to_string(), "0 seconds");
        let c = container(&[(1, TimeUnit::Days), (2, TimeUnit::Hours), (1, TimeUnit::Years)]);
        assert_eq!(c.to_string(), "1 year, 1 day, 2 hours");
    }
}
