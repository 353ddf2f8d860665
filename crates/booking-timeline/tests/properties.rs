//! Property tests for normalization, timeline ordering and reminders.

use booking_timeline::{
    build_timeline, derive_reminders, epoch, normalize, BookingRecord, BookingStatus,
    DateNormalizer, ReminderWindow, Sentinels,
};
use chrono::{NaiveDate, NaiveDateTime};
use proptest::prelude::*;

fn reference_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 7, 14).unwrap()
}

/// A valid calendar date within the two-digit B.E. range (1957–2056).
fn valid_date() -> impl Strategy<Value = NaiveDate> {
    (1957i32..=2056, 1u32..=12, 1u32..=28)
        .prop_map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

fn short_token(date: NaiveDate) -> String {
    booking_timeline::format_short_token(date)
}

fn token() -> impl Strategy<Value = String> {
    prop_oneof![
        valid_date().prop_map(short_token),
        Just(String::new()),
        Just("ไม่ระบุ".to_string()),
        Just("14/07/68".to_string()),
        Just("2025-07-14".to_string()),
        "[a-z/0-9 ]{0,10}",
    ]
}

fn status() -> impl Strategy<Value = BookingStatus> {
    prop_oneof![
        Just(BookingStatus::Pending),
        Just(BookingStatus::Confirmed),
        Just(BookingStatus::Completed),
    ]
}

fn records(prefix: &'static str) -> impl Strategy<Value = Vec<BookingRecord>> {
    prop::collection::vec((token(), status()), 0..20).prop_map(move |items| {
        items
            .into_iter()
            .enumerate()
            .map(|(i, (date, status))| {
                BookingRecord::farmer(format!("{prefix}{i}"), date, "booking", status, "user")
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn prop_short_tokens_follow_calendar_order(a in valid_date(), b in valid_date()) {
        let sentinels = Sentinels::for_day(reference_day());
        let na = normalize(&short_token(a), &sentinels);
        let nb = normalize(&short_token(b), &sentinels);
        prop_assert_eq!(a.cmp(&b), na.cmp(&nb));
        prop_assert_eq!(na.date(), a);
    }

    #[test]
    fn prop_today_token_ignores_time_of_day(secs in 0u32..86_400, day in valid_date()) {
        let now = day.and_hms_opt(0, 0, 0).unwrap() + chrono::Duration::seconds(i64::from(secs));
        let sentinels = Sentinels::for_instant(now);
        let expected = day.and_hms_opt(0, 0, 0).unwrap();
        prop_assert_eq!(normalize(sentinels.today_token(), &sentinels), expected);
    }

    #[test]
    fn prop_normalize_never_panics(s in "\\PC{0,24}") {
        let sentinels = Sentinels::for_day(reference_day());
        let _ = normalize(&s, &sentinels);
    }

    #[test]
    fn prop_timeline_sorted_stable_idempotent(farmer in records("b"), factory in records("f")) {
        let normalizer = DateNormalizer::new(Sentinels::for_day(reference_day()));
        let timeline = build_timeline([&farmer, &factory], &normalizer);
        prop_assert_eq!(timeline.len(), farmer.len() + factory.len());

        let input: Vec<&BookingRecord> = farmer.iter().chain(factory.iter()).collect();
        let position = |id: &str| input.iter().position(|r| r.id == id).unwrap();

        for pair in timeline.as_slice().windows(2) {
            let (x, y) = (&pair[0], &pair[1]);
            let (nx, ny) = (normalizer.normalize(&x.date), normalizer.normalize(&y.date));
            prop_assert!(nx >= ny);
            if nx == ny {
                prop_assert!(position(&x.id) < position(&y.id));
            }
        }

        let again = build_timeline([&farmer, &factory], &normalizer);
        prop_assert_eq!(timeline, again);
    }

    #[test]
    fn prop_reminders_skip_completed_and_unknown(
        farmer in records("b"),
        hour in 0u32..24,
        near_epoch in any::<bool>(),
    ) {
        let normalizer = DateNormalizer::new(Sentinels::for_day(reference_day()));
        let base = if near_epoch { epoch().date() } else { reference_day() };
        let now: NaiveDateTime = base.and_hms_opt(hour, 0, 0).unwrap();
        let timeline = build_timeline([&farmer], &normalizer);
        let reminders = derive_reminders(&timeline, now, &normalizer, &ReminderWindow::default());

        for reminder in &reminders {
            let id = reminder.id.trim_start_matches("n-booking-");
            let record = timeline.get(id).unwrap();
            prop_assert_ne!(record.status, BookingStatus::Completed);
            prop_assert!(normalizer.resolve(&record.date).is_some());
            prop_assert_eq!(&reminder.date, &record.date);
        }
    }
}
