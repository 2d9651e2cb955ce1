//! Unit tests for schedule expressions

use confluence_signals::config::DEFAULT_SCHEDULE;
use confluence_signals::core::scheduler::cron_for_interval;
use chrono::{TimeZone, Timelike, Utc};
use cron::Schedule;
use std::str::FromStr;

#[test]
fn test_interval_to_cron() {
    assert_eq!(cron_for_interval(30).unwrap(), "*/30 * * * * *");
    assert_eq!(cron_for_interval(900).unwrap(), "0 */15 * * * *");
    assert!(cron_for_interval(0).is_err());
}

#[test]
fn test_default_schedule_fires_on_quarter_hours() {
    let schedule = Schedule::from_str(DEFAULT_SCHEDULE).unwrap();
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 10, 7, 30).unwrap();
    let ticks: Vec<_> = schedule.after(&start).take(4).collect();

    let minutes: Vec<u32> = ticks.iter().map(|t| t.minute()).collect();
    assert_eq!(minutes, vec![15, 30, 45, 0]);
    assert!(ticks.iter().all(|t| t.second() == 0));
    assert_eq!(ticks[3].hour(), 11);
}
