// Time resolver - Turns linked or fixed time specs into absolute instants
use crate::domain::error::{FixedTimeError, QueryError};
use crate::domain::query::{Boundary, FiapQuery, LinkedTime, TimeRange};
use crate::infrastructure::config::DatasourceSettings;
use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};

const FIXED_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const FIXED_TIME_WITH_OFFSET_FORMAT: &str = "%Y-%m-%d %H:%M:%S%:z";
/// Digits are `0`, everything else must match exactly.
const FIXED_TIME_LAYOUT: &str = "0000-00-00 00:00:00";

/// Effective range of one query. `None` is an open end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedRange {
    pub from: Option<DateTime<FixedOffset>>,
    pub to: Option<DateTime<FixedOffset>>,
}

/// Resolve both ends of a query's range.
///
/// The server timezone is validated first, so a bad setting fails the query even when
/// neither end needs it.
pub fn resolve_range(
    query: &FiapQuery,
    dashboard: &TimeRange,
    settings: &DatasourceSettings,
) -> Result<ResolvedRange, QueryError> {
    let server_offset = settings.server_offset()?;

    let from = resolve_boundary(
        &query.start_time,
        Boundary::Start,
        dashboard.from,
        &settings.server_timezone,
        server_offset,
    )?;
    let to = resolve_boundary(
        &query.end_time,
        Boundary::End,
        dashboard.to,
        &settings.server_timezone,
        server_offset,
    )?;

    Ok(ResolvedRange { from, to })
}

pub fn resolve_boundary(
    spec: &LinkedTime,
    boundary: Boundary,
    dashboard_instant: DateTime<Utc>,
    server_timezone: &str,
    server_offset: FixedOffset,
) -> Result<Option<DateTime<FixedOffset>>, QueryError> {
    if spec.link_dashboard {
        // Relabel only; the instant stays the dashboard's.
        return Ok(Some(dashboard_instant.with_timezone(&server_offset)));
    }
    if spec.raw_time.is_empty() {
        return Ok(None);
    }

    parse_fixed_time(&spec.raw_time, server_timezone)
        .map(Some)
        .map_err(|source| QueryError::TimeParse {
            boundary,
            raw: spec.raw_time.clone(),
            source,
        })
}

/// Parse `YYYY-MM-DD HH:MM:SS` as wall-clock time at the server timezone, or UTC when unset.
pub fn parse_fixed_time(
    raw: &str,
    server_timezone: &str,
) -> Result<DateTime<FixedOffset>, FixedTimeError> {
    // chrono accepts short fields and extra whitespace; the layout is exact.
    if !has_fixed_layout(raw) {
        return Err(FixedTimeError::Layout);
    }

    let parsed = if server_timezone.is_empty() {
        NaiveDateTime::parse_from_str(raw, FIXED_TIME_FORMAT)
            .map(|naive| naive.and_utc().fixed_offset())?
    } else {
        DateTime::parse_from_str(
            &format!("{raw}{server_timezone}"),
            FIXED_TIME_WITH_OFFSET_FORMAT,
        )?
    };
    Ok(parsed)
}

fn has_fixed_layout(raw: &str) -> bool {
    let bytes = raw.as_bytes();
    bytes.len() == FIXED_TIME_LAYOUT.len()
        && bytes
            .iter()
            .zip(FIXED_TIME_LAYOUT.as_bytes())
            .all(|(&b, &expected)| match expected {
                b'0' => b.is_ascii_digit(),
                _ => b == expected,
            })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn settings(server_timezone: &str) -> DatasourceSettings {
        DatasourceSettings {
            url: "http://test.url:12345".to_string(),
            server_timezone: server_timezone.to_string(),
        }
    }

    fn dashboard() -> TimeRange {
        TimeRange {
            from: Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(),
            to: Utc.with_ymd_and_hms(2024, 3, 31, 23, 59, 59).unwrap(),
        }
    }

    fn query(start: LinkedTime, end: LinkedTime) -> FiapQuery {
        FiapQuery {
            start_time: start,
            end_time: end,
            ..Default::default()
        }
    }

    fn fixed(raw: &str) -> LinkedTime {
        LinkedTime {
            raw_time: raw.to_string(),
            link_dashboard: false,
        }
    }

    fn linked(raw: &str) -> LinkedTime {
        LinkedTime {
            raw_time: raw.to_string(),
            link_dashboard: true,
        }
    }

    #[test]
    fn test_empty_times_are_open_ended() {
        let range = resolve_range(&query(fixed(""), fixed("")), &dashboard(), &settings("+09:00")).unwrap();
        assert_eq!(range.from, None);
        assert_eq!(range.to, None);
    }

    #[test]
    fn test_fixed_time_without_offset_is_utc() {
        let range = resolve_range(
            &query(fixed("2024-06-01 00:00:00"), fixed("2024-06-30 23:59:59")),
            &dashboard(),
            &settings(""),
        )
        .unwrap();

        assert_eq!(range.from.unwrap(), Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap());
        assert_eq!(range.to.unwrap(), Utc.with_ymd_and_hms(2024, 6, 30, 23, 59, 59).unwrap());
    }

    #[test]
    fn test_fixed_time_uses_server_offset() {
        let tokyo = FixedOffset::east_opt(9 * 3600).unwrap();
        let range = resolve_range(
            &query(fixed("2024-06-01 00:00:00"), fixed("2024-06-30 23:59:59")),
            &dashboard(),
            &settings("+09:00"),
        )
        .unwrap();

        assert_eq!(range.from.unwrap(), tokyo.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap());
        assert_eq!(range.to.unwrap(), tokyo.with_ymd_and_hms(2024, 6, 30, 23, 59, 59).unwrap());
    }

    #[test]
    fn test_fixed_time_round_trip_across_offsets() {
        let tokyo = parse_fixed_time("2024-06-01 00:00:00", "+09:00").unwrap();
        let utc = parse_fixed_time("2024-05-31 15:00:00", "+00:00").unwrap();
        assert_eq!(tokyo, utc);
        assert_eq!(tokyo.timestamp(), utc.timestamp());
    }

    #[test]
    fn test_linked_time_keeps_dashboard_instant() {
        let range = resolve_range(
            &query(linked("2024-06-01 00:00:00"), linked("not even a time")),
            &dashboard(),
            &settings("+09:00"),
        )
        .unwrap();

        let from = range.from.unwrap();
        let to = range.to.unwrap();
        assert_eq!(from, dashboard().from);
        assert_eq!(to, dashboard().to);
        // Relabelled for display only.
        assert_eq!(from.offset().local_minus_utc(), 9 * 3600);
        assert_eq!(from.to_rfc3339(), "2024-03-01T09:00:00+09:00");
        assert_eq!(to.to_rfc3339(), "2024-04-01T08:59:59+09:00");
    }

    #[test]
    fn test_linked_time_preserved_for_any_offset() {
        for tz in ["", "+00:00", "+09:00", "-05:30", "+14:00", "-12:00"] {
            let range = resolve_range(&query(linked(""), linked("")), &dashboard(), &settings(tz)).unwrap();
            assert_eq!(range.from.unwrap().timestamp_millis(), dashboard().from.timestamp_millis());
            assert_eq!(range.to.unwrap().timestamp_millis(), dashboard().to.timestamp_millis());
        }
    }

    #[test]
    fn test_malformed_start_time() {
        let err = resolve_range(
            &query(fixed("2024/06/01 00:00"), fixed("2024-06-30 23:59:59")),
            &dashboard(),
            &settings(""),
        )
        .unwrap_err();

        assert!(matches!(err, QueryError::TimeParse { boundary: Boundary::Start, .. }));
        assert!(err.to_string().starts_with("start time parse"));
    }

    #[test]
    fn test_malformed_end_time() {
        let err = resolve_range(
            &query(fixed("2024-06-01 00:00:00"), fixed("2024-06-31 00:00:00")),
            &dashboard(),
            &settings("+09:00"),
        )
        .unwrap_err();

        assert!(matches!(err, QueryError::TimeParse { boundary: Boundary::End, .. }));
        assert!(err.to_string().starts_with("end time parse"));
    }

    #[test]
    fn test_fixed_time_with_embedded_zone_is_rejected() {
        assert!(parse_fixed_time("2024-06-01 00:00:00+01:00", "").is_err());
        assert!(parse_fixed_time("2024-06-01 00:00:00+01:00", "+09:00").is_err());
    }

    #[test]
    fn test_fixed_time_layout_is_exact() {
        let malformed = [
            "2024-6-1 0:0:0",
            "2024-06-0100:00:00",
            "2024-06-01   00:00:00",
            "2024-06-01 00:00:00 ",
            " 2024-06-01 00:00:00",
            "2024-06-01T00:00:00",
            "2024-06-01 00:00",
            "+024-06-01 00:00:00",
        ];
        for tz in ["", "+09:00"] {
            for raw in malformed {
                let err = parse_fixed_time(raw, tz).unwrap_err();
                assert!(matches!(err, FixedTimeError::Layout), "{raw:?} at {tz:?}: {err}");
            }
        }

        let err = resolve_range(
            &query(fixed("2024-6-1 0:0:0"), fixed("")),
            &dashboard(),
            &settings("+09:00"),
        )
        .unwrap_err();
        assert!(matches!(err, QueryError::TimeParse { boundary: Boundary::Start, .. }));
    }

    #[test]
    fn test_out_of_range_date_with_valid_layout() {
        let err = parse_fixed_time("2024-06-31 00:00:00", "").unwrap_err();
        assert!(matches!(err, FixedTimeError::Chrono(_)));
    }

    #[test]
    fn test_invalid_server_timezone_aborts_even_for_open_range() {
        let err = resolve_range(&query(fixed(""), fixed("")), &dashboard(), &settings("invalid")).unwrap_err();
        assert!(matches!(err, QueryError::Settings(_)));
        assert!(err.to_string().contains("server timezone parse"));
    }
}
