//! End-to-end tests of the expiration engine through a session.

use chrono::{Duration, Utc};
use fridge_core::adjust::MAX_BOOST_DAYS;
use fridge_core::decay::natural_floor;
use fridge_core::expiration::EXPIRED_LABEL;
use fridge_core::{Event, FridgeSession, Scheduler, TickReason};

fn ingest_at(session: &mut FridgeSession, raw: &[&str], at: chrono::DateTime<Utc>) -> Event {
    session.capture_photo("fridge.jpg");
    let ticket = session.begin_upload().unwrap();
    session.on_recognition_result(&ticket, raw, at).unwrap()
}

#[test]
fn test_three_days_of_decay_then_manual_boost() {
    let t0 = Utc::now() - Duration::days(3);
    let now = t0 + Duration::days(3);
    let mut session = FridgeSession::new();
    ingest_at(&mut session, &["Milk | 5 days"], t0);
    let id = session.items()[0].id.clone();

    let scheduler = Scheduler::default();
    scheduler.tick(&mut session, TickReason::BecameActive, now);
    assert_eq!(session.item(&id).unwrap().adjustment, -3);
    assert_eq!(session.views(now)[0].display, "2 days");

    for _ in 0..10 {
        session.increment(&id, now).unwrap();
    }
    let item = session.item(&id).unwrap();
    assert_eq!(item.adjustment, 7);
    assert!(item.adjustment <= natural_floor(item, now) + MAX_BOOST_DAYS);
    assert_eq!(session.views(now)[0].display, "12 days");
    assert_eq!(session.views(now)[0].adjustment_badge().as_deref(), Some("(+10)"));
}

#[test]
fn test_boost_stops_at_cap() {
    let now = Utc::now();
    let mut session = FridgeSession::new();
    ingest_at(&mut session, &["Rice | 300 days"], now);
    let id = session.items()[0].id.clone();

    for _ in 0..(MAX_BOOST_DAYS + 10) {
        session.increment(&id, now).unwrap();
    }
    assert_eq!(session.item(&id).unwrap().adjustment, MAX_BOOST_DAYS);
}

#[test]
fn test_decrement_to_expired() {
    let now = Utc::now();
    let mut session = FridgeSession::new();
    ingest_at(&mut session, &["Yogurt | 2 days"], now);
    let id = session.items()[0].id.clone();

    session.decrement(&id, now).unwrap();
    session.decrement(&id, now).unwrap();
    let view = &session.views(now)[0];
    assert!(view.is_expired);
    assert_eq!(view.display, EXPIRED_LABEL);
}

#[test]
fn test_manual_decrease_survives_later_decay() {
    let t0 = Utc::now() - Duration::days(2);
    let mut session = FridgeSession::new();
    ingest_at(&mut session, &["Bread | 6 days"], t0);
    let id = session.items()[0].id.clone();

    // User takes two days off on the day of purchase.
    session.decrement(&id, t0).unwrap();
    session.decrement(&id, t0).unwrap();

    // Two days later decay's floor (-2) is not below the manual value (-2).
    assert_eq!(session.tick(t0 + Duration::days(2)), None);
    assert_eq!(session.item(&id).unwrap().adjustment, -2);

    // One more day and decay takes over.
    session.tick(t0 + Duration::days(3));
    assert_eq!(session.item(&id).unwrap().adjustment, -3);
}

#[test]
fn test_mixed_batch_with_malformed_and_display_only_lines() {
    let t0 = Utc::now() - Duration::days(4);
    let mut session = FridgeSession::new();
    let event = ingest_at(
        &mut session,
        &["Milk | 5 days", "mystery jar", "Honey | keeps forever", "Eggs | 12 days"],
        t0,
    );
    assert!(matches!(event, Event::ItemsIngested { count: 4, malformed: 1, .. }));

    let now = t0 + Duration::days(4);
    assert!(matches!(session.tick(now), Some(Event::ItemsDecayed { changed: 2, .. })));

    let displays: Vec<String> = session.views(now).into_iter().map(|v| v.display).collect();
    assert_eq!(displays, vec!["1 days", "mystery jar", "keeps forever", "8 days"]);
}

#[test]
fn test_clock_skew_yields_no_decay() {
    let t0 = Utc::now();
    let mut session = FridgeSession::new();
    ingest_at(&mut session, &["Milk | 5 days"], t0);

    assert_eq!(session.tick(t0 - Duration::days(2)), None);
    let view = &session.views(t0 - Duration::days(2))[0];
    assert_eq!(view.days_since_creation, 0);
    assert_eq!(view.display, "5 days");
}
