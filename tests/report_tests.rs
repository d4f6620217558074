use chrono::{NaiveTime, Weekday};
use rattendance::core::report::{ReportOptions, average_checkins};
use rattendance::errors::AppError;
use rattendance::models::{Event, Ledger};
use rattendance::utils::date::{parse_weekday, parse_weekday_list};

mod common;
use common::{at, ledger_with};

fn with_check_ins(ledger: &mut Ledger, uid: &str, stamps: &[&str]) {
    let user = ledger.get_user(uid, None);
    user.check_ins = stamps.iter().map(|s| Event::new(at(s))).collect();
}

fn sample() -> Ledger {
    let mut ledger = ledger_with(&[("1", "alice"), ("2", "bob"), ("3", "")]);
    // Mon, Tue, Thu
    with_check_ins(
        &mut ledger,
        "1",
        &["2025-09-01 08:00", "2025-09-02 08:30", "2025-09-04 10:00"],
    );
    with_check_ins(&mut ledger, "2", &["2025-09-01 07:45", "2025-09-02 07:55"]);
    // outside a 30 day window
    with_check_ins(&mut ledger, "3", &["2025-06-01 06:00"]);
    ledger
}

#[test]
fn averages_skip_the_short_day_by_default() {
    let ledger = sample();
    let options = ReportOptions::new(Weekday::Thu);
    let rows = average_checkins(&ledger, at("2025-09-05 12:00"), &options).expect("report");

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].username, "bob");
    assert_eq!(rows[0].time(), NaiveTime::from_hms_opt(7, 50, 0).expect("time"));
    assert_eq!(rows[1].username, "alice");
    assert_eq!(rows[1].time(), NaiveTime::from_hms_opt(8, 15, 0).expect("time"));
    assert_eq!(rows[1].samples, 2);
}

#[test]
fn exclusions_limit_and_window() {
    let ledger = sample();
    let mut options = ReportOptions::new(Weekday::Thu);
    options.exclude_weekdays.clear();
    options.exclude_users.insert("bob".to_string());
    let rows = average_checkins(&ledger, at("2025-09-05 12:00"), &options).expect("report");
    assert_eq!(rows.len(), 1);
    // (480 + 510 + 600) / 3 = 530 -> 08:50
    assert_eq!(rows[0].time(), NaiveTime::from_hms_opt(8, 50, 0).expect("time"));

    let mut options = ReportOptions::new(Weekday::Thu);
    options.days = 200;
    options.limit = Some(1);
    let rows = average_checkins(&ledger, at("2025-09-05 12:00"), &options).expect("report");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].username, "user_3");
}

#[test]
fn non_positive_options_are_rejected() {
    let ledger = sample();
    let mut options = ReportOptions::new(Weekday::Thu);
    options.days = 0;
    assert!(matches!(
        average_checkins(&ledger, at("2025-09-05 12:00"), &options),
        Err(AppError::InvalidOption(_))
    ));

    let mut options = ReportOptions::new(Weekday::Thu);
    options.limit = Some(0);
    assert!(matches!(
        average_checkins(&ledger, at("2025-09-05 12:00"), &options),
        Err(AppError::InvalidOption(_))
    ));
}

#[test]
fn weekday_tokens() {
    for token in ["thu", "Thur", "THURS", "thursday", "3"] {
        assert_eq!(parse_weekday(token).expect(token), Weekday::Thu);
    }
    assert_eq!(parse_weekday("0").expect("monday"), Weekday::Mon);
    assert!(matches!(parse_weekday("7"), Err(AppError::InvalidWeekday(_))));
    assert_eq!(
        parse_weekday_list("fri, 5,,sun").expect("list"),
        vec![Weekday::Fri, Weekday::Sat, Weekday::Sun]
    );
}
