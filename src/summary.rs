use jiff::civil::Date;

use crate::{
    error::ValidationError,
    occurrence::OccurrenceSequence,
    spec::{RecurrenceRequest, RecurrenceSpec},
};

/// The description used in place of a summary when a rule is invalid.
pub const INVALID_RULE_DESCRIPTION: &str = "Invalid Recurrence Rule";

/// Display-ready statistics about the occurrences of a rule.
///
/// A summary is either complete, or degraded when the rule could not be
/// expanded. A degraded summary has `error` set, a fixed description of
/// [`INVALID_RULE_DESCRIPTION`] and no statistics.
#[derive(Clone, Debug, Eq, PartialEq, serde::Serialize)]
pub struct Summary {
    pub description: String,
    pub count: Option<usize>,
    pub first: Option<Date>,
    pub last: Option<Date>,
    /// Whether the start date had to be inserted into the sequence after
    /// generation. This should never be true, and is here for diagnostics.
    pub start_injected: bool,
    /// Why the rule is invalid, when it is.
    pub error: Option<String>,
}

impl Summary {
    /// Returns the degraded summary for a rule that failed validation.
    pub fn invalid(err: &ValidationError) -> Summary {
        Summary {
            description: INVALID_RULE_DESCRIPTION.to_string(),
            count: None,
            first: None,
            last: None,
            start_injected: false,
            error: Some(err.to_string()),
        }
    }

    /// Returns true when this summary was degraded by an invalid rule.
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Summarizes the given occurrences of `spec`.
pub fn summarize(spec: &RecurrenceSpec, seq: &OccurrenceSequence) -> Summary {
    Summary {
        description: describe(spec),
        count: Some(seq.len()),
        first: Some(seq.first()),
        last: Some(seq.last()),
        start_injected: seq.start_injected(),
        error: None,
    }
}

/// Validates, expands and summarizes the given request.
///
/// This never fails. When the request is invalid, the degraded summary from
/// [`Summary::invalid`] is returned instead, so that preview surfaces can
/// always render something.
pub fn preview(request: &RecurrenceRequest) -> Summary {
    let spec = match request.validate() {
        Ok(spec) => spec,
        Err(err) => {
            log::debug!("cannot preview invalid recurrence rule: {err}");
            return Summary::invalid(&err);
        }
    };
    let seq = OccurrenceSequence::from_spec(&spec);
    summarize(&spec, &seq)
}

/// Returns a short English description of a rule, e.g., `every 2 weeks
/// until 2025-06-12`.
fn describe(spec: &RecurrenceSpec) -> String {
    let freq = spec.frequency();
    let Some(unit) = freq.unit_noun(spec.interval() > 1) else {
        return format!("once on {}", spec.start());
    };
    let mut desc = if spec.interval() > 1 {
        format!("every {} {unit}", spec.interval())
    } else {
        format!("every {unit}")
    };
    if let Some(end) = spec.end() {
        desc.push_str(&format!(" until {end}"));
    }
    desc
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;

    use super::*;

    fn request(
        freq: &str,
        end: Option<Date>,
        interval: Option<i64>,
    ) -> RecurrenceRequest {
        RecurrenceRequest {
            start: Some(date(2025, 6, 6)),
            end,
            frequency: freq.to_string(),
            interval,
        }
    }

    #[test]
    fn every_two_weeks() {
        let summary =
            preview(&request("weekly", Some(date(2025, 6, 12)), Some(2)));
        assert_eq!(summary.description, "every 2 weeks until 2025-06-12");
        assert_eq!(summary.count, Some(1));
        assert_eq!(summary.first, Some(date(2025, 6, 6)));
        assert_eq!(summary.last, Some(date(2025, 6, 6)));
        assert!(!summary.start_injected);
        assert!(!summary.is_error());
    }

    #[test]
    fn every_other_day() {
        let summary =
            preview(&request("daily", Some(date(2025, 6, 12)), Some(2)));
        assert_eq!(summary.description, "every 2 days until 2025-06-12");
        assert_eq!(summary.count, Some(4));
        assert_eq!(summary.last, Some(date(2025, 6, 12)));
    }

    #[test]
    fn descriptions() {
        let cases = [
            ("daily", None, None, "every day"),
            ("weekly", None, Some(1), "every week"),
            (
                "monthly",
                Some(date(2026, 1, 1)),
                Some(3),
                "every 3 months until 2026-01-01",
            ),
            (
                "yearly",
                Some(date(2030, 6, 6)),
                None,
                "every year until 2030-06-06",
            ),
            ("one-off", Some(date(2030, 6, 6)), Some(5), "once on 2025-06-06"),
        ];
        for (freq, end, interval, expected) in cases {
            let summary = preview(&request(freq, end, interval));
            assert_eq!(summary.description, expected);
        }
    }

    #[test]
    fn invalid_rule_degrades() {
        let summary = preview(&request("weekly", None, Some(0)));
        assert!(summary.is_error());
        assert_eq!(summary.description, INVALID_RULE_DESCRIPTION);
        assert_eq!(summary.count, None);
        assert_eq!(summary.first, None);
        assert_eq!(summary.last, None);
        insta::assert_snapshot!(
            summary.error.unwrap(),
            @"interval must be at least 1, but got 0",
        );

        let summary =
            preview(&request("daily", Some(date(2025, 1, 1)), Some(1)));
        assert!(summary.is_error());

        let summary = preview(&RecurrenceRequest {
            frequency: "fortnightly".to_string(),
            ..RecurrenceRequest::default()
        });
        assert_eq!(summary.description, INVALID_RULE_DESCRIPTION);
    }

    #[test]
    fn serialize_summary() {
        let summary =
            preview(&request("daily", Some(date(2025, 6, 12)), Some(2)));
        insta::assert_snapshot!(
            serde_json::to_string_pretty(&summary).unwrap(),
            @r#"
        {
          "description": "every 2 days until 2025-06-12",
          "count": 4,
          "first": "2025-06-06",
          "last": "2025-06-12",
          "start_injected": false,
          "error": null
        }
        "#,
        );
    }
}
