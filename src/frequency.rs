use jiff::civil::Date;

use crate::{calendar, error::ValidationError};

/// The calendar unit governing how successive occurrences are derived.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum FrequencyClass {
    /// A rule that occurs exactly once, on its start date.
    OneOff,
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl FrequencyClass {
    /// Returns the date that is `units` of this frequency after `start`.
    ///
    /// Month and year steps are clamped to the end of the target month. A
    /// one-off rule only has a date at offset zero.
    ///
    /// This returns `None` when the result is outside the range of dates
    /// supported by Jiff.
    pub fn advance(self, start: Date, units: i64) -> Option<Date> {
        match self {
            FrequencyClass::OneOff => (units == 0).then_some(start),
            FrequencyClass::Daily => calendar::add_days(start, units),
            FrequencyClass::Weekly => calendar::add_weeks(start, units),
            FrequencyClass::Monthly => {
                calendar::add_months_clamped(start, units)
            }
            FrequencyClass::Yearly => calendar::add_years_clamped(start, units),
        }
    }

    /// Returns true when this frequency produces more than one occurrence.
    pub fn is_repeating(self) -> bool {
        !matches!(self, FrequencyClass::OneOff)
    }

    /// Returns the canonical name of this frequency.
    pub fn as_str(self) -> &'static str {
        match self {
            FrequencyClass::OneOff => "one-off",
            FrequencyClass::Daily => "daily",
            FrequencyClass::Weekly => "weekly",
            FrequencyClass::Monthly => "monthly",
            FrequencyClass::Yearly => "yearly",
        }
    }

    /// Returns the English noun for one unit of this frequency, or `None`
    /// for a one-off rule.
    pub(crate) fn unit_noun(self, plural: bool) -> Option<&'static str> {
        let (singular, many) = match self {
            FrequencyClass::OneOff => return None,
            FrequencyClass::Daily => ("day", "days"),
            FrequencyClass::Weekly => ("week", "weeks"),
            FrequencyClass::Monthly => ("month", "months"),
            FrequencyClass::Yearly => ("year", "years"),
        };
        Some(if plural { many } else { singular })
    }
}

impl std::str::FromStr for FrequencyClass {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<FrequencyClass, ValidationError> {
        use self::FrequencyClass::*;

        // Accepts the labels used by task forms (`One-Off`, `Weekly`) along
        // with the short unit names used on the command line.
        let freq = match &*s.trim().to_lowercase() {
            "one-off" | "oneoff" | "one_off" | "once" | "none" => OneOff,
            "daily" | "day" | "d" => Daily,
            "weekly" | "week" | "wk" | "w" => Weekly,
            "monthly" | "month" | "mo" => Monthly,
            "yearly" | "year" | "yr" | "y" | "annually" => Yearly,
            _ => {
                return Err(ValidationError::UnknownFrequency {
                    name: s.to_string(),
                });
            }
        };
        Ok(freq)
    }
}

impl std::fmt::Display for FrequencyClass {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;

    use super::*;

    #[test]
    fn parse_labels() {
        assert_eq!("One-Off".parse(), Ok(FrequencyClass::OneOff));
        assert_eq!("One-off".parse(), Ok(FrequencyClass::OneOff));
        assert_eq!("Daily".parse(), Ok(FrequencyClass::Daily));
        assert_eq!("wk".parse(), Ok(FrequencyClass::Weekly));
        assert_eq!(" MONTHLY ".parse(), Ok(FrequencyClass::Monthly));
        assert_eq!("y".parse(), Ok(FrequencyClass::Yearly));
    }

    #[test]
    fn parse_unknown() {
        let err = "fortnightly".parse::<FrequencyClass>().unwrap_err();
        insta::assert_snapshot!(
            err,
            @"unrecognized frequency class `fortnightly`",
        );
        assert!("".parse::<FrequencyClass>().is_err());
    }

    #[test]
    fn round_trip_names() {
        for freq in [
            FrequencyClass::OneOff,
            FrequencyClass::Daily,
            FrequencyClass::Weekly,
            FrequencyClass::Monthly,
            FrequencyClass::Yearly,
        ] {
            assert_eq!(freq.to_string().parse(), Ok(freq));
        }
    }

    #[test]
    fn advance_dispatch() {
        let start = date(2025, 1, 31);
        assert_eq!(FrequencyClass::OneOff.advance(start, 0), Some(start));
        assert_eq!(FrequencyClass::OneOff.advance(start, 1), None);
        assert_eq!(
            FrequencyClass::Daily.advance(start, 3),
            Some(date(2025, 2, 3)),
        );
        assert_eq!(
            FrequencyClass::Weekly.advance(start, 1),
            Some(date(2025, 2, 7)),
        );
        assert_eq!(
            FrequencyClass::Monthly.advance(start, 1),
            Some(date(2025, 2, 28)),
        );
        assert_eq!(
            FrequencyClass::Yearly.advance(date(2024, 2, 29), 1),
            Some(date(2025, 2, 28)),
        );
    }
}
