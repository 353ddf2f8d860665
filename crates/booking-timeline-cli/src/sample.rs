//! Sample data for `timeline demo`, shaped like the dashboards' fixtures.
//!
//! Two farmer bookings use the reference day's "today"/"tomorrow" tokens so
//! the demo always has reminders to show.

use booking_timeline::{Article, BookingRecord, BookingStatus, Sentinels};

const FARMER_NAME: &str = "วันนี้ อยากรวย";
const FACTORY_NAME: &str = "ผู้ประสานงาน โรงงานไผ่เจริญ";

pub fn farmer_bookings(sentinels: &Sentinels) -> Vec<BookingRecord> {
    use BookingStatus::*;

    let rows: [(&str, &str, &str, BookingStatus); 10] = [
        ("b011", "14/07/68", "โรงงานไม่เจริญเข้ารับซื้อไผ่", Pending),
        ("b012", "16/07/68", "นัดตรวจสอบคุณภาพดิน", Confirmed),
        ("b014", "23/07/68", "ส่งมอบผลผลิต", Completed),
        ("b001", "25/07/68", "โรงงาน...เข้ารับซื้อไผ่", Pending),
        ("b007", sentinels.today_token(), "โรงงานไผ่เจริญ เข้ารับซื้อ", Pending),
        ("b006", sentinels.tomorrow_token(), "ขอรับปุ๋ย", Pending),
        ("b003", "25/05/68", "ขอรับเมล็ดพันธุ์", Completed),
        ("b004", "10/03/68", "โรงงาน...เข้ารับซื้อไผ่", Completed),
        ("b009", "09/07/68", "โรงงานไผ่เจริญ เข้ารับซื้อ", Pending),
        ("b010", "10/07/68", "ขอรับปุ๋ย", Pending),
    ];

    rows.into_iter()
        .map(|(id, date, description, status)| {
            BookingRecord::farmer(id, date, description, status, FARMER_NAME)
        })
        .collect()
}

pub fn factory_schedule() -> Vec<BookingRecord> {
    vec![
        BookingRecord::factory(
            "fb001",
            "14/07/68",
            "เข้ารับซื้อไผ่ 5 ตัน",
            BookingStatus::Pending,
            FACTORY_NAME,
        )
        .with_farmer_name("สมชาย รักการเกษตร")
        .with_pickup_location("123 หมู่ 4 ต.บ้านไผ่ อ.บ้านไผ่ จ.ขอนแก่น 40110")
        .with_estimated_quantity("5 ตัน"),
        BookingRecord::factory(
            "fb002",
            "18/07/68",
            "เข้ารับซื้อไผ่ 10 ตัน",
            BookingStatus::Confirmed,
            FACTORY_NAME,
        )
        .with_farmer_name("สมใจ ทำสวน")
        .with_pickup_location("456 หมู่ 5 ต.โคกสูง อ.เมือง จ.นครราชสีมา 30000")
        .with_estimated_quantity("10 ตัน"),
        BookingRecord::factory(
            "fb003",
            "25/07/68",
            "เข้ารับซื้อไผ่ 7 ตัน",
            BookingStatus::Pending,
            FACTORY_NAME,
        )
        .with_farmer_name("มานะ ปลูกไผ่")
        .with_pickup_location("789 หมู่ 6 ต.หนองไผ่ อ.หนองไผ่ จ.เพชรบูรณ์ 67140")
        .with_estimated_quantity("7 ตัน"),
    ]
}

/// Newest first.
pub fn knowledge_articles() -> Vec<Article> {
    vec![
        Article::new("k001", "การเตรียมดินและการให้น้ำ", "15 มิ.ย. 2568"),
        Article::new("k002", "ไผ่กิมซุ่ง, ไผ่ตงลืมแล้ง...", "12 มิ.ย. 2568"),
        Article::new("k003", "การจัดการโรคและแมลงในสวนไผ่", "10 มิ.ย. 2568"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use booking_timeline::{SourceRole, TimelineEngine};
    use chrono::NaiveDate;

    #[test]
    fn test_demo_always_has_reminders() {
        let now = NaiveDate::from_ymd_opt(2031, 2, 3)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        let engine = TimelineEngine::for_instant(now);
        let farmer = farmer_bookings(engine.normalizer().sentinels());
        let timeline = engine.timeline([&farmer, &factory_schedule()]);
        let reminders = engine.reminders(&timeline, now);
        let ids: Vec<&str> = reminders.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["n-booking-b006", "n-booking-b007"]);
    }

    #[test]
    fn test_factory_rows_carry_pickup_details() {
        for record in factory_schedule() {
            assert_eq!(record.source_role, SourceRole::Factory);
            assert!(record.pickup_location.is_some());
            assert!(record.farmer_name.is_some());
        }
    }
}
