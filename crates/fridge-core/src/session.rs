//! Session state container.
//!
//! A [`FridgeSession`] owns everything the fridge screen mutates: the photo
//! queue, the current item list and the id sequence. It lives as long as the
//! hosting front end and is never persisted.
//!
//! ## Upload tickets
//!
//! Every upload takes a ticket from [`FridgeSession::begin_upload`]. Only the
//! most recently issued ticket may deliver a result, so a slow response that
//! arrives after a newer upload was started cannot overwrite fresher items.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::info;

use crate::adjust::{adjust, manual_adjustment};
use crate::decay::{days_elapsed, reconcile_all};
use crate::error::{CoreError, Result};
use crate::events::Event;
use crate::expiration;
use crate::ingest::ingest;
use crate::item::{FridgeItem, IdSequence};

/// Session handle shared between the command loop and the scheduler task.
pub type SharedSession = Arc<Mutex<FridgeSession>>;

/// Proof that an upload was started, and for which photo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadTicket {
    pub id: u64,
    pub photo: PathBuf,
}

/// Read-only projection of an item for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemView {
    pub id: String,
    pub name: String,
    pub display: String,
    pub is_expired: bool,
    pub days_since_creation: i64,
    pub manual_adjustment: i64,
}

impl ItemView {
    pub fn of(item: &FridgeItem, now: DateTime<Utc>) -> Self {
        Self {
            id: item.id.clone(),
            name: item.name.clone(),
            display: expiration::display(item),
            is_expired: expiration::is_expired(item),
            days_since_creation: days_elapsed(item.created_at, now),
            manual_adjustment: manual_adjustment(item, now),
        }
    }

    /// `"3 days old"`, or `None` for items ingested less than a day ago.
    pub fn age_label(&self) -> Option<String> {
        match self.days_since_creation {
            0 => None,
            1 => Some("1 day old".to_string()),
            n => Some(format!("{n} days old")),
        }
    }

    /// `"(+2)"` / `"(-1)"` when the user has moved the countdown.
    pub fn adjustment_badge(&self) -> Option<String> {
        match self.manual_adjustment {
            0 => None,
            n if n > 0 => Some(format!("(+{n})")),
            n => Some(format!("({n})")),
        }
    }
}

#[derive(Debug, Default)]
pub struct FridgeSession {
    items: Vec<FridgeItem>,
    ids: IdSequence,
    /// Captured photos, newest first.
    photos: Vec<PathBuf>,
    photos_uploaded: bool,
    latest_ticket: u64,
}

impl FridgeSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared(self) -> SharedSession {
        Arc::new(Mutex::new(self))
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn items(&self) -> &[FridgeItem] {
        &self.items
    }

    pub fn item(&self, id: &str) -> Option<&FridgeItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn views(&self, now: DateTime<Utc>) -> Vec<ItemView> {
        self.items.iter().map(|item| ItemView::of(item, now)).collect()
    }

    pub fn photos(&self) -> &[PathBuf] {
        &self.photos
    }

    pub fn latest_photo(&self) -> Option<&Path> {
        self.photos.first().map(PathBuf::as_path)
    }

    /// Whether the last upload succeeded; front ends hide photo previews then.
    pub fn photos_uploaded(&self) -> bool {
        self.photos_uploaded
    }

    // ── Photo capture & upload ───────────────────────────────────────

    pub fn capture_photo(&mut self, path: impl Into<PathBuf>) -> Event {
        let path = path.into();
        let event = Event::PhotoCaptured {
            path: path.display().to_string(),
            at: Utc::now(),
        };
        self.photos.insert(0, path);
        event
    }

    /// Start an upload of the newest photo, superseding any earlier ticket.
    pub fn begin_upload(&mut self) -> Result<UploadTicket> {
        let photo = self.latest_photo().ok_or(CoreError::NoPhoto)?.to_path_buf();
        self.latest_ticket += 1;
        Ok(UploadTicket {
            id: self.latest_ticket,
            photo,
        })
    }

    fn check_ticket(&self, ticket: &UploadTicket) -> Result<()> {
        if ticket.id != self.latest_ticket {
            return Err(CoreError::StaleUpload {
                ticket: ticket.id,
                latest: self.latest_ticket,
            });
        }
        Ok(())
    }

    /// Replace the item list with a fresh recognition result.
    ///
    /// The whole batch is swapped in at once and immediately reconciled.
    pub fn on_recognition_result<S: AsRef<str>>(
        &mut self,
        ticket: &UploadTicket,
        raw_items: &[S],
        now: DateTime<Utc>,
    ) -> Result<Event> {
        self.check_ticket(ticket)?;

        let batch = ingest(raw_items, now, &mut self.ids);
        self.items = batch.items;
        reconcile_all(&mut self.items, now);
        self.photos_uploaded = true;

        info!(
            ticket = ticket.id,
            count = self.items.len(),
            malformed = batch.malformed,
            "ingested recognition result"
        );
        Ok(Event::ItemsIngested {
            count: self.items.len(),
            malformed: batch.malformed,
            at: now,
        })
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn adjust(&mut self, id: &str, delta: i64, now: DateTime<Utc>) -> Result<Event> {
        let item = self
            .items
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or_else(|| CoreError::UnknownItem(id.to_string()))?;
        adjust(item, delta, now);
        Ok(Event::ItemAdjusted {
            id: item.id.clone(),
            adjustment: item.adjustment,
            display: expiration::display(item),
            at: now,
        })
    }

    pub fn increment(&mut self, id: &str, now: DateTime<Utc>) -> Result<Event> {
        self.adjust(id, 1, now)
    }

    pub fn decrement(&mut self, id: &str, now: DateTime<Utc>) -> Result<Event> {
        self.adjust(id, -1, now)
    }

    /// Run a reconciliation pass. Returns an event only if something decayed.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Option<Event> {
        let changed = reconcile_all(&mut self.items, now);
        (changed > 0).then_some(Event::ItemsDecayed { changed, at: now })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn session_with(raw: &[&str], now: DateTime<Utc>) -> FridgeSession {
        let mut session = FridgeSession::new();
        session.capture_photo("fridge.jpg");
        let ticket = session.begin_upload().unwrap();
        session.on_recognition_result(&ticket, raw, now).unwrap();
        session
    }

    #[test]
    fn upload_requires_a_photo() {
        let mut session = FridgeSession::new();
        assert!(matches!(session.begin_upload(), Err(CoreError::NoPhoto)));
    }

    #[test]
    fn latest_photo_is_uploaded() {
        let mut session = FridgeSession::new();
        session.capture_photo("first.jpg");
        session.capture_photo("second.jpg");
        let ticket = session.begin_upload().unwrap();
        assert_eq!(ticket.photo, PathBuf::from("second.jpg"));
        assert_eq!(session.photos().len(), 2);
    }

    #[test]
    fn recognition_result_replaces_items() {
        let now = Utc::now();
        let mut session = session_with(&["Milk | 5 days", "Eggs | 12 days"], now);
        assert!(session.photos_uploaded());
        assert_eq!(session.items().len(), 2);

        let ticket = session.begin_upload().unwrap();
        let event = session
            .on_recognition_result(&ticket, &["Butter | 20 days"], now)
            .unwrap();
        assert!(matches!(event, Event::ItemsIngested { count: 1, malformed: 0, .. }));
        assert_eq!(session.items().len(), 1);
        assert_eq!(session.items()[0].name, "Butter");
    }

    #[test]
    fn stale_ticket_is_rejected() {
        let now = Utc::now();
        let mut session = session_with(&["Milk | 5 days"], now);
        let stale = session.begin_upload().unwrap();
        let fresh = session.begin_upload().unwrap();

        let err = session
            .on_recognition_result(&stale, &["Old | 1 days"], now)
            .unwrap_err();
        assert!(matches!(err, CoreError::StaleUpload { ticket: 2, latest: 3 }));
        assert_eq!(session.items()[0].name, "Milk");

        session
            .on_recognition_result(&fresh, &["New | 3 days"], now)
            .unwrap();
        assert_eq!(session.items()[0].name, "New");
    }

    #[test]
    fn increment_and_decrement_by_id() {
        let now = Utc::now();
        let mut session = session_with(&["Milk | 5 days"], now);
        let id = session.items()[0].id.clone();

        session.increment(&id, now).unwrap();
        session.increment(&id, now).unwrap();
        let event = session.decrement(&id, now).unwrap();
        match event {
            Event::ItemAdjusted { adjustment, display, .. } => {
                assert_eq!(adjustment, 1);
                assert_eq!(display, "6 days");
            }
            other => panic!("Expected ItemAdjusted, got {other:?}"),
        }
    }

    #[test]
    fn unknown_id_is_an_error() {
        let mut session = session_with(&["Milk | 5 days"], Utc::now());
        let err = session.increment("Cheese-9", Utc::now()).unwrap_err();
        assert!(matches!(err, CoreError::UnknownItem(id) if id == "Cheese-9"));
    }

    #[test]
    fn tick_reports_only_real_changes() {
        let created = Utc::now() - Duration::days(3);
        let mut session = session_with(&["Milk | 5 days"], created);
        let now = created + Duration::days(3);

        assert!(matches!(session.tick(now), Some(Event::ItemsDecayed { changed: 1, .. })));
        assert_eq!(session.tick(now), None);

        let view = &session.views(now)[0];
        assert_eq!(view.display, "2 days");
        assert_eq!(view.days_since_creation, 3);
        assert_eq!(view.age_label().as_deref(), Some("3 days old"));
        assert_eq!(view.adjustment_badge(), None);
    }

    #[test]
    fn view_labels() {
        let now = Utc::now();
        let mut session = session_with(&["Milk | 1 days"], now - Duration::days(1));
        let id = session.items()[0].id.clone();
        session.tick(now);

        let view = &session.views(now)[0];
        assert!(view.is_expired);
        assert_eq!(view.display, expiration::EXPIRED_LABEL);
        assert_eq!(view.age_label().as_deref(), Some("1 day old"));

        session.increment(&id, now).unwrap();
        session.increment(&id, now).unwrap();
        let view = &session.views(now)[0];
        assert_eq!(view.adjustment_badge().as_deref(), Some("(+2)"));
        assert_eq!(view.display, "2 days");
    }
}
