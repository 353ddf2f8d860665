//! Notification feed derivation.
//!
//! The feed is recomputed from the current timeline and article list on
//! every request; nothing is stored or diffed. Its order is fixed:
//!
//! 1. the admin announcement,
//! 2. booking reminders, in timeline order,
//! 3. at most one "new article" entry.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::normalizer::{DateNormalizer, FreeFormParser};
use crate::options::{ReminderWindow, TimelineOptions};
use crate::timeline::Timeline;

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

const REMINDER_TITLE: &str = "แจ้งเตือนนัดหมาย";
const KNOWLEDGE_TITLE: &str = "บทความใหม่";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationCategory {
    AdminUpdate,
    BookingReminder,
    Knowledge,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationEntry {
    pub id: String,
    pub category: NotificationCategory,
    pub title: String,
    pub message: String,
    /// The date as the source wrote it, never the normalized instant.
    pub date: String,
    pub read: bool,
}

/// A knowledge-base article, as far as the feed cares.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub post_date: String,
}

impl Article {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        post_date: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            post_date: post_date.into(),
        }
    }
}

/// The static admin broadcast that heads every feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Announcement {
    pub id: String,
    pub title: String,
    pub message: String,
    pub date: String,
}

impl Default for Announcement {
    fn default() -> Self {
        Self {
            id: "n-admin-1".to_string(),
            title: "ประกาศจากแอดมิน".to_string(),
            message: "จะมีการปิดปรับปรุงระบบในวันที่ 30 ก.ค. 2568 เวลา 02:00-04:00".to_string(),
            date: "20/07/68".to_string(),
        }
    }
}

impl Announcement {
    pub fn to_entry(&self) -> NotificationEntry {
        NotificationEntry {
            id: self.id.clone(),
            category: NotificationCategory::AdminUpdate,
            title: self.title.clone(),
            message: self.message.clone(),
            date: self.date.clone(),
            read: false,
        }
    }
}

// ── Reminders ───────────────────────────────────────────────────────────────

/// Whole days from `reference` to `instant`, rounded up.
///
/// A booking at midnight today seen at 10:00 is `0` days away; a booking at
/// midnight the day after tomorrow seen at 10:00 is `2`.
pub fn days_until(instant: NaiveDateTime, reference: NaiveDateTime) -> i64 {
    let millis = (instant - reference).num_milliseconds();
    -(-millis).div_euclid(MILLIS_PER_DAY)
}

/// Reminders for open bookings whose date falls inside `window`.
///
/// Completed bookings never produce a reminder, and neither do bookings
/// whose date cannot be read: an unknown date is "not due".
pub fn derive_reminders<P: FreeFormParser>(
    timeline: &Timeline,
    reference: NaiveDateTime,
    normalizer: &DateNormalizer<P>,
    window: &ReminderWindow,
) -> Vec<NotificationEntry> {
    let reminders: Vec<NotificationEntry> = timeline
        .iter()
        .filter(|booking| booking.status.is_open())
        .filter_map(|booking| {
            let instant = normalizer.resolve(&booking.date)?;
            window
                .contains(days_until(instant, reference))
                .then(|| NotificationEntry {
                    id: format!("n-booking-{}", booking.id),
                    category: NotificationCategory::BookingReminder,
                    title: REMINDER_TITLE.to_string(),
                    message: format!(
                        "คุณมีนัดหมาย \"{}\" ในวันที่ {}",
                        booking.description, booking.date
                    ),
                    date: booking.date.clone(),
                    read: false,
                })
        })
        .collect();

    tracing::trace!(
        bookings = timeline.len(),
        reminders = reminders.len(),
        "derived booking reminders"
    );
    reminders
}

/// The "new article" entry for the first article of the feed, if any.
///
/// The caller decides which article is newest by ordering the feed. The
/// entry starts out read.
pub fn knowledge_entry(articles: &[Article]) -> Option<NotificationEntry> {
    articles.first().map(|article| NotificationEntry {
        id: format!("n-knowledge-{}", article.id),
        category: NotificationCategory::Knowledge,
        title: KNOWLEDGE_TITLE.to_string(),
        message: format!("มีบทความใหม่: \"{}\"", article.title),
        date: article.post_date.clone(),
        read: true,
    })
}

/// The full feed: announcement, reminders in timeline order, then the
/// newest article. No further sorting is applied.
pub fn derive_notifications<P: FreeFormParser>(
    timeline: &Timeline,
    articles: &[Article],
    reference: NaiveDateTime,
    normalizer: &DateNormalizer<P>,
    options: &TimelineOptions,
) -> Vec<NotificationEntry> {
    let mut feed = vec![options.announcement.to_entry()];
    feed.extend(derive_reminders(
        timeline,
        reference,
        normalizer,
        &options.reminder_window,
    ));
    feed.extend(knowledge_entry(articles));
    feed
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::{BookingRecord, BookingStatus};
    use crate::normalizer::Sentinels;
    use crate::timeline::build_timeline;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    /// 14 July 2025 at 10:00.
    fn now() -> NaiveDateTime {
        at(2025, 7, 14, 10)
    }

    fn normalizer() -> DateNormalizer {
        DateNormalizer::for_instant(now())
    }

    fn booking(id: &str, date: &str, status: BookingStatus) -> BookingRecord {
        BookingRecord::farmer(id, date, format!("นัด {id}"), status, "farmer")
    }

    fn timeline(records: Vec<BookingRecord>) -> Timeline {
        build_timeline([&records], &normalizer())
    }

    fn reminder_ids(entries: &[NotificationEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.id.as_str()).collect()
    }

    // ── days_until ──────────────────────────────────────────────────────

    #[test]
    fn test_days_until_rounds_up() {
        assert_eq!(days_until(at(2025, 7, 14, 0), now()), 0);
        assert_eq!(days_until(at(2025, 7, 15, 0), now()), 1);
        assert_eq!(days_until(at(2025, 7, 16, 0), now()), 2);
        assert_eq!(days_until(at(2025, 7, 17, 0), now()), 3);
        assert_eq!(days_until(at(2025, 7, 13, 0), now()), -1);
    }

    #[test]
    fn test_days_until_exact_days() {
        let reference = at(2025, 7, 14, 0);
        assert_eq!(days_until(at(2025, 7, 16, 0), reference), 2);
        assert_eq!(days_until(at(2025, 7, 17, 0), reference), 3);
        assert_eq!(days_until(reference, reference), 0);
    }

    // ── reminders ───────────────────────────────────────────────────────

    #[test]
    fn test_reminders_window_inclusive() {
        let t = timeline(vec![
            booking("yesterday", "13/07/68", BookingStatus::Pending),
            booking("today", "14/07/68", BookingStatus::Pending),
            booking("plus1", "15/07/68", BookingStatus::Confirmed),
            booking("plus2", "16/07/68", BookingStatus::Pending),
            booking("plus3", "17/07/68", BookingStatus::Pending),
        ]);
        let reminders = derive_reminders(&t, now(), &normalizer(), &ReminderWindow::default());
        assert_eq!(
            reminder_ids(&reminders),
            ["n-booking-plus2", "n-booking-plus1", "n-booking-today"]
        );
    }

    #[test]
    fn test_reminder_exactly_two_days_ahead() {
        let reference = at(2025, 7, 14, 0);
        let n = DateNormalizer::for_instant(reference);
        let t = build_timeline(
            [vec![
                booking("in2", "16/07/68", BookingStatus::Pending),
                booking("in3", "17/07/68", BookingStatus::Pending),
            ]],
            &n,
        );
        let reminders = derive_reminders(&t, reference, &n, &ReminderWindow::default());
        assert_eq!(reminder_ids(&reminders), ["n-booking-in2"]);
    }

    #[test]
    fn test_completed_never_reminded() {
        let t = timeline(vec![
            booking("done", "14/07/68", BookingStatus::Completed),
            booking("done2", "15/07/68", BookingStatus::Completed),
        ]);
        let reminders = derive_reminders(&t, now(), &normalizer(), &ReminderWindow::default());
        assert!(reminders.is_empty());
    }

    #[test]
    fn test_sentinel_dates_reminded() {
        let n = normalizer();
        let t = timeline(vec![
            booking("b007", n.sentinels().today_token(), BookingStatus::Pending),
            booking("b006", n.sentinels().tomorrow_token(), BookingStatus::Pending),
        ]);
        let reminders = derive_reminders(&t, now(), &n, &ReminderWindow::default());
        assert_eq!(reminder_ids(&reminders), ["n-booking-b006", "n-booking-b007"]);
    }

    #[test]
    fn test_unparseable_dates_not_due_even_near_epoch() {
        let reference = at(1970, 1, 1, 0);
        let n = DateNormalizer::for_instant(at(2025, 7, 14, 0));
        let t = build_timeline(
            [vec![
                booking("empty", "", BookingStatus::Pending),
                booking("junk", "ไม่ระบุ", BookingStatus::Pending),
            ]],
            &n,
        );
        let reminders = derive_reminders(&t, reference, &n, &ReminderWindow::default());
        assert!(reminders.is_empty());
    }

    #[test]
    fn test_reminder_content_echoes_raw_token() {
        let t = timeline(vec![BookingRecord::farmer(
            "b010",
            "15/07/68",
            "ขอรับปุ๋ย",
            BookingStatus::Pending,
            "farmer",
        )]);
        let reminders = derive_reminders(&t, now(), &normalizer(), &ReminderWindow::default());
        assert_eq!(reminders.len(), 1);
        let r = &reminders[0];
        assert_eq!(r.id, "n-booking-b010");
        assert_eq!(r.category, NotificationCategory::BookingReminder);
        assert_eq!(r.title, "แจ้งเตือนนัดหมาย");
        assert_eq!(r.message, "คุณมีนัดหมาย \"ขอรับปุ๋ย\" ในวันที่ 15/07/68");
        assert_eq!(r.date, "15/07/68");
        assert!(!r.read);
    }

    #[test]
    fn test_custom_window() {
        let t = timeline(vec![
            booking("past", "12/07/68", BookingStatus::Pending),
            booking("week", "21/07/68", BookingStatus::Pending),
        ]);
        let window = ReminderWindow {
            min_days: -2,
            max_days: 7,
        };
        let reminders = derive_reminders(&t, now(), &normalizer(), &window);
        assert_eq!(reminder_ids(&reminders), ["n-booking-week", "n-booking-past"]);
    }

    // ── feed composition ────────────────────────────────────────────────

    #[test]
    fn test_feed_order_admin_reminders_knowledge() {
        let t = timeline(vec![
            booking("b1", "14/07/68", BookingStatus::Pending),
            booking("b2", "15/07/68", BookingStatus::Pending),
        ]);
        let articles = vec![
            Article::new("k001", "การเตรียมดินและการให้น้ำ", "15 มิ.ย. 2568"),
            Article::new("k002", "ไผ่กิมซุ่ง", "12 มิ.ย. 2568"),
        ];
        let feed = derive_notifications(
            &t,
            &articles,
            now(),
            &normalizer(),
            &TimelineOptions::default(),
        );
        let categories: Vec<NotificationCategory> = feed.iter().map(|e| e.category).collect();
        assert_eq!(
            categories,
            [
                NotificationCategory::AdminUpdate,
                NotificationCategory::BookingReminder,
                NotificationCategory::BookingReminder,
                NotificationCategory::Knowledge,
            ]
        );
        assert_eq!(feed[1].id, "n-booking-b2");
        assert_eq!(feed[2].id, "n-booking-b1");
    }

    #[test]
    fn test_admin_entry_defaults() {
        let feed = derive_notifications(
            &Timeline::default(),
            &[],
            now(),
            &normalizer(),
            &TimelineOptions::default(),
        );
        assert_eq!(feed.len(), 1);
        assert_eq!(feed[0].id, "n-admin-1");
        assert_eq!(feed[0].title, "ประกาศจากแอดมิน");
        assert_eq!(feed[0].date, "20/07/68");
        assert!(!feed[0].read);
    }

    #[test]
    fn test_knowledge_uses_first_article_without_resorting() {
        // The older article comes first in the feed, so it wins
        let articles = vec![
            Article::new("k008", "การออกแบบสวนไผ่เพื่อการค้า", "28 พ.ค. 2568"),
            Article::new("k001", "การเตรียมดินและการให้น้ำ", "15 มิ.ย. 2568"),
        ];
        let entry = knowledge_entry(&articles).unwrap();
        assert_eq!(entry.id, "n-knowledge-k008");
        assert_eq!(entry.message, "มีบทความใหม่: \"การออกแบบสวนไผ่เพื่อการค้า\"");
        assert_eq!(entry.date, "28 พ.ค. 2568");
        assert!(entry.read);
    }

    #[test]
    fn test_no_articles_no_knowledge_entry() {
        let t = timeline(vec![booking("b1", "14/07/68", BookingStatus::Pending)]);
        let feed = derive_notifications(&t, &[], now(), &normalizer(), &TimelineOptions::default());
        assert_eq!(feed.len(), 2);
        assert!(feed
            .iter()
            .all(|e| e.category != NotificationCategory::Knowledge));
    }

    #[test]
    fn test_custom_announcement() {
        let options = TimelineOptions {
            announcement: Announcement {
                id: "n-admin-2".to_string(),
                title: "ประกาศ".to_string(),
                message: "ปรับราคาการรับซื้อไผ่รอบใหม่".to_string(),
                date: "15/07/68".to_string(),
            },
            ..Default::default()
        };
        let feed = derive_notifications(&Timeline::default(), &[], now(), &normalizer(), &options);
        assert_eq!(feed[0].id, "n-admin-2");
        assert_eq!(feed[0].category, NotificationCategory::AdminUpdate);
    }

    #[test]
    fn test_entry_serde_shape() {
        let json = serde_json::to_value(Announcement::default().to_entry()).unwrap();
        assert_eq!(json["category"], "ADMIN_UPDATE");
        assert_eq!(json["read"], false);
    }
}
