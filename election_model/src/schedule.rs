//! Date-driven status of elections and the dashboard countdown.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use log::warn;
use serde::Serialize;

use crate::{ElectionStatus, StatusColor};

#[derive(Eq, PartialEq, Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusInfo {
    pub status: ElectionStatus,
    pub color: StatusColor,
    /// `J-n` for upcoming elections.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub countdown: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Copy, Default, Serialize)]
pub struct Countdown {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

/// Accepts plain dates (`2024-08-26`) and full RFC 3339 timestamps.
pub fn parse_election_date(date: &str) -> Option<NaiveDate> {
    let date = date.trim();
    NaiveDate::parse_from_str(date, "%Y-%m-%d").ok().or_else(|| {
        DateTime::parse_from_rfc3339(date)
            .ok()
            .map(|d| d.with_timezone(&Utc).date_naive())
    })
}

/// Status of an election held on `date`, seen from `today`.
///
/// An unreadable date is reported as finished.
pub fn status_on(date: &str, today: NaiveDate) -> StatusInfo {
    let status = match parse_election_date(date) {
        Some(d) if today < d => {
            let days = (d - today).num_days();
            return StatusInfo {
                status: ElectionStatus::Upcoming,
                color: ElectionStatus::Upcoming.color(),
                countdown: Some(format!("J-{}", days)),
            };
        }
        Some(d) if today == d => ElectionStatus::Ongoing,
        Some(_) => ElectionStatus::Finished,
        None => {
            warn!("status_on: could not read election date {:?}", date);
            ElectionStatus::Finished
        }
    };
    StatusInfo {
        status,
        color: status.color(),
        countdown: None,
    }
}

/// Time left until midnight UTC of the election day. Zero once it has passed.
pub fn countdown_until(date: &str, now: DateTime<Utc>) -> Countdown {
    let target = match parse_election_date(date) {
        Some(d) => d.and_time(NaiveTime::MIN).and_utc(),
        None => {
            warn!("countdown_until: could not read election date {:?}", date);
            return Countdown::default();
        }
    };
    let secs = (target - now).num_seconds();
    if secs <= 0 {
        return Countdown::default();
    }
    Countdown {
        days: secs / 86_400,
        hours: (secs % 86_400) / 3_600,
        minutes: (secs % 3_600) / 60,
        seconds: secs % 60,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn status_around_the_election_day() {
        let s = status_on("2024-08-26", day(2024, 8, 20));
        assert_eq!(s.status, ElectionStatus::Upcoming);
        assert_eq!(s.color, StatusColor::Blue);
        assert_eq!(s.countdown.as_deref(), Some("J-6"));

        let s = status_on("2024-08-26", day(2024, 8, 26));
        assert_eq!(s.status, ElectionStatus::Ongoing);
        assert_eq!(s.countdown, None);

        let s = status_on("2024-08-26T00:00:00.000Z", day(2024, 9, 1));
        assert_eq!(s.status, ElectionStatus::Finished);
        assert_eq!(s.color, StatusColor::Gray);
    }

    #[test]
    fn unreadable_date() {
        assert_eq!(status_on("soon", day(2024, 1, 1)).status, ElectionStatus::Finished);
        assert_eq!(
            countdown_until("soon", Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
            Countdown::default()
        );
    }

    #[test]
    fn countdown() {
        let now = Utc.with_ymd_and_hms(2024, 8, 24, 21, 29, 15).unwrap();
        assert_eq!(
            countdown_until("2024-08-26", now),
            Countdown {
                days: 1,
                hours: 2,
                minutes: 30,
                seconds: 45
            }
        );
        let later = Utc.with_ymd_and_hms(2024, 8, 26, 8, 0, 0).unwrap();
        assert_eq!(countdown_until("2024-08-26", later), Countdown::default());
    }
}
