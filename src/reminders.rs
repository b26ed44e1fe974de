//! Daily hydration reminders.
//!
//! Reminders live only for the session: the manager owns an in-memory
//! list and talks to a [`NotificationScheduler`] for the actual
//! repeating triggers. The stock scheduler spawns one tokio task per
//! trigger which sleeps until the next (hour, minute) occurrence, fires,
//! and re-arms for the next day.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{Duration, Local, NaiveDateTime, NaiveTime};
use thiserror::Error;
use tracing::{info, trace};

#[derive(Debug, Error)]
#[error("{0}")]
pub struct SchedulerError(pub String);

#[derive(Debug, Error)]
pub enum ReminderError {
    #[error("{hour:02}:{minute:02} is not a valid time of day")]
    InvalidTime { hour: u32, minute: u32 },
    #[error("failed to schedule notification: {0}")]
    Schedule(String),
    #[error("failed to cancel reminder: {0}")]
    Cancel(String),
    #[error("no reminder with id {0}")]
    UnknownId(u64),
}

/// Opaque handle into whichever scheduler registered the trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TriggerHandle(u64);

#[derive(Debug, Clone)]
pub struct Reminder {
    pub id: u64,
    pub hour: u32,
    pub minute: u32,
    pub trigger: TriggerHandle,
}

#[async_trait]
pub trait NotificationScheduler: Send {
    /// Registers a repeating daily trigger at (hour, minute), first
    /// firing at `first` local time.
    async fn schedule_daily(
        &mut self,
        hour: u32,
        minute: u32,
        first: NaiveDateTime,
    ) -> Result<TriggerHandle, SchedulerError>;

    async fn cancel(&mut self, handle: TriggerHandle) -> Result<(), SchedulerError>;
}

/// Next occurrence of `time` strictly after `now`: today if the time is
/// still ahead of us, otherwise tomorrow.
pub fn first_trigger(now: NaiveDateTime, time: NaiveTime) -> NaiveDateTime {
    let candidate = now.date().and_time(time);
    if candidate <= now {
        candidate + Duration::days(1)
    } else {
        candidate
    }
}

pub struct ReminderManager<S: NotificationScheduler> {
    scheduler: S,
    reminders: Vec<Reminder>,
    next_id: u64,
}

impl<S: NotificationScheduler> ReminderManager<S> {
    pub fn new(scheduler: S) -> Self {
        Self {
            scheduler,
            reminders: Vec::new(),
            next_id: 0,
        }
    }

    pub fn list(&self) -> &[Reminder] {
        &self.reminders
    }

    /// Registers a repeating daily reminder. The reminder only joins the
    /// list once the scheduler accepted the trigger; duplicates by time
    /// are allowed.
    pub async fn add(
        &mut self,
        hour: u32,
        minute: u32,
        now: NaiveDateTime,
    ) -> Result<Reminder, ReminderError> {
        let Some(time) = NaiveTime::from_hms_opt(hour, minute, 0) else {
            return Err(ReminderError::InvalidTime { hour, minute });
        };

        let first = first_trigger(now, time);
        trace!(%first, "registering daily trigger");

        let trigger = self
            .scheduler
            .schedule_daily(hour, minute, first)
            .await
            .map_err(|err| ReminderError::Schedule(err.to_string()))?;

        self.next_id += 1;
        let reminder = Reminder {
            id: self.next_id,
            hour,
            minute,
            trigger,
        };
        self.reminders.push(reminder.clone());
        Ok(reminder)
    }

    /// Cancels a reminder. On scheduler failure the reminder stays in the
    /// list so the user can retry.
    pub async fn cancel(&mut self, id: u64) -> Result<Reminder, ReminderError> {
        let index = self
            .reminders
            .iter()
            .position(|reminder| reminder.id == id)
            .ok_or(ReminderError::UnknownId(id))?;

        self.scheduler
            .cancel(self.reminders[index].trigger)
            .await
            .map_err(|err| ReminderError::Cancel(err.to_string()))?;

        Ok(self.reminders.remove(index))
    }
}

/// Scheduler backed by plain tokio tasks.
#[derive(Default)]
pub struct TokioScheduler {
    tasks: HashMap<TriggerHandle, tokio::task::JoinHandle<()>>,
    next_handle: u64,
}

impl TokioScheduler {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl NotificationScheduler for TokioScheduler {
    async fn schedule_daily(
        &mut self,
        hour: u32,
        minute: u32,
        first: NaiveDateTime,
    ) -> Result<TriggerHandle, SchedulerError> {
        self.next_handle += 1;
        let handle = TriggerHandle(self.next_handle);
        self.tasks
            .insert(handle, tokio::task::spawn(trigger_loop(hour, minute, first)));
        Ok(handle)
    }

    async fn cancel(&mut self, handle: TriggerHandle) -> Result<(), SchedulerError> {
        match self.tasks.remove(&handle) {
            Some(task) => {
                task.abort();
                Ok(())
            }
            None => Err(SchedulerError("trigger is not registered".to_string())),
        }
    }
}

async fn trigger_loop(hour: u32, minute: u32, first: NaiveDateTime) {
    let mut next = first;
    loop {
        let wait = next - Local::now().naive_local();
        trace!(%next, "sleeping until next trigger");
        if let Ok(wait) = wait.to_std() {
            tokio::time::sleep(wait).await;
        }

        info!(hour, minute, "reminder fired");
        println!("Time to drink! Daily reminder for {hour:02}:{minute:02}.");

        next += Duration::days(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 8, 6)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    #[test]
    fn future_time_triggers_today() {
        let first = first_trigger(at(9, 0), NaiveTime::from_hms_opt(13, 30, 0).unwrap());
        assert_eq!(first, at(13, 30));
    }

    #[test]
    fn past_or_present_time_triggers_tomorrow() {
        let tomorrow = NaiveDate::from_ymd_opt(2026, 8, 7).unwrap();

        let first = first_trigger(at(9, 0), NaiveTime::from_hms_opt(8, 0, 0).unwrap());
        assert_eq!(first, tomorrow.and_hms_opt(8, 0, 0).unwrap());

        // Exactly now also rolls to tomorrow.
        let first = first_trigger(at(9, 0), NaiveTime::from_hms_opt(9, 0, 0).unwrap());
        assert_eq!(first, tomorrow.and_hms_opt(9, 0, 0).unwrap());
    }

    /// Scheduler double that hands out handles and optionally fails.
    #[derive(Default)]
    struct RecordingScheduler {
        scheduled: Vec<(u32, u32, NaiveDateTime)>,
        cancelled: Vec<TriggerHandle>,
        fail_schedule: bool,
        fail_cancel: bool,
    }

    #[async_trait]
    impl NotificationScheduler for RecordingScheduler {
        async fn schedule_daily(
            &mut self,
            hour: u32,
            minute: u32,
            first: NaiveDateTime,
        ) -> Result<TriggerHandle, SchedulerError> {
            if self.fail_schedule {
                return Err(SchedulerError("notifications not permitted".to_string()));
            }
            self.scheduled.push((hour, minute, first));
            Ok(TriggerHandle(self.scheduled.len() as u64))
        }

        async fn cancel(&mut self, handle: TriggerHandle) -> Result<(), SchedulerError> {
            if self.fail_cancel {
                return Err(SchedulerError("scheduler went away".to_string()));
            }
            self.cancelled.push(handle);
            Ok(())
        }
    }

    #[tokio::test]
    async fn add_registers_a_daily_trigger() {
        let mut manager = ReminderManager::new(RecordingScheduler::default());

        let reminder = manager.add(13, 30, at(9, 0)).await.unwrap();
        assert_eq!((reminder.hour, reminder.minute), (13, 30));
        assert_eq!(manager.list().len(), 1);
        assert_eq!(manager.scheduler.scheduled, vec![(13, 30, at(13, 30))]);
    }

    #[tokio::test]
    async fn duplicate_times_are_permitted() {
        let mut manager = ReminderManager::new(RecordingScheduler::default());

        let first = manager.add(8, 0, at(6, 0)).await.unwrap();
        let second = manager.add(8, 0, at(6, 0)).await.unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(manager.list().len(), 2);
    }

    #[tokio::test]
    async fn schedule_failure_leaves_the_list_unchanged() {
        let scheduler = RecordingScheduler {
            fail_schedule: true,
            ..Default::default()
        };
        let mut manager = ReminderManager::new(scheduler);

        let err = manager.add(8, 0, at(6, 0)).await.unwrap_err();
        assert!(matches!(err, ReminderError::Schedule(_)));
        assert!(err.to_string().contains("notifications not permitted"));
        assert!(manager.list().is_empty());
    }

    #[tokio::test]
    async fn invalid_time_is_rejected_before_scheduling() {
        let mut manager = ReminderManager::new(RecordingScheduler::default());
        let err = manager.add(25, 0, at(6, 0)).await.unwrap_err();
        assert!(matches!(err, ReminderError::InvalidTime { .. }));
        assert!(manager.scheduler.scheduled.is_empty());
    }

    #[tokio::test]
    async fn cancel_removes_the_reminder() {
        let mut manager = ReminderManager::new(RecordingScheduler::default());
        let reminder = manager.add(8, 0, at(6, 0)).await.unwrap();

        let cancelled = manager.cancel(reminder.id).await.unwrap();
        assert_eq!(cancelled.id, reminder.id);
        assert!(manager.list().is_empty());
        assert_eq!(manager.scheduler.cancelled, vec![reminder.trigger]);
    }

    #[tokio::test]
    async fn cancel_failure_keeps_the_reminder_listed() {
        let scheduler = RecordingScheduler {
            fail_cancel: true,
            ..Default::default()
        };
        let mut manager = ReminderManager::new(scheduler);
        let reminder = manager.add(8, 0, at(6, 0)).await.unwrap();

        let err = manager.cancel(reminder.id).await.unwrap_err();
        assert!(matches!(err, ReminderError::Cancel(_)));
        assert_eq!(manager.list().len(), 1);
    }

    #[tokio::test]
    async fn cancelling_an_unknown_id_is_an_error() {
        let mut manager = ReminderManager::new(RecordingScheduler::default());
        assert!(matches!(
            manager.cancel(42).await,
            Err(ReminderError::UnknownId(42))
        ));
    }

    #[tokio::test]
    async fn tokio_scheduler_cancels_spawned_triggers() {
        let mut scheduler = TokioScheduler::new();
        let handle = scheduler
            .schedule_daily(23, 59, at(23, 59))
            .await
            .unwrap();

        scheduler.cancel(handle).await.unwrap();
        // A second cancel no longer finds the trigger.
        assert!(scheduler.cancel(handle).await.is_err());
    }
}
