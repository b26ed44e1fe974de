//! aqualog: a headless water tracker.
//!
//! Derives a daily goal from the user's profile, accumulates logged
//! drinks against it with a reset at every local-midnight rollover,
//! keeps a per-day history, runs repeating daily reminders, and ships a
//! single-record profile/settings stub plus its client.

pub mod cli;
pub mod client;
pub mod goal;
pub mod history;
pub mod intake;
pub mod logging;
pub mod prefs;
pub mod reminders;
pub mod server;
pub mod storage;
