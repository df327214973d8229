//! # Fridge Core Library
//!
//! Core logic for the fridge inventory client: photos of a fridge are sent to
//! a recognition service, and every recognized item gets a shelf-life
//! countdown that decays with wall-clock time and can be corrected by hand.
//! The CLI is a thin front end over this crate.
//!
//! ## Architecture
//!
//! - **Expiration parser**: reads and re-renders the day count embedded in a
//!   recognizer phrase such as `"5 days"`
//! - **Ingestion**: turns `"name | phrase"` lines into [`FridgeItem`]s
//! - **Decay engine**: lowers each item's adjustment to the floor justified by
//!   elapsed days; idempotent, so it can run on every tick
//! - **Manual adjustment**: bounded +/- corrections from the user
//! - **Scheduler**: drives reconciliation hourly and on foreground transitions
//! - **Session**: the state container the front end owns for its lifetime
//!
//! ## Key Components
//!
//! - [`FridgeSession`]: item list, photo queue and upload tickets
//! - [`Scheduler`]: periodic reconciliation timer
//! - [`RecognitionClient`]: multipart upload to the recognition service
//! - [`Config`]: client configuration

pub mod adjust;
pub mod config;
pub mod decay;
pub mod error;
pub mod events;
pub mod expiration;
pub mod ingest;
pub mod item;
pub mod recognition;
pub mod scheduler;
pub mod session;

pub use config::{Config, RecognitionConfig, SchedulerConfig};
pub use error::{ConfigError, CoreError, UploadError};
pub use events::Event;
pub use item::{FridgeItem, IdSequence};
pub use recognition::{upload_latest, RecognitionClient, RecognitionResult};
pub use scheduler::{Scheduler, SchedulerHandle, TickReason};
pub use session::{FridgeSession, ItemView, SharedSession, UploadTicket};
