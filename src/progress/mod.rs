//! Per-learner lesson progress
//!
//! Each lesson moves `NotStarted -> InProgress -> Completed`. The tracker does
//! not decide when a learner advances to the next step; callers report the
//! step they attempted.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::domain::LessonProgress;

/// The lesson every learner can open without prerequisites
pub const ENTRY_LESSON_ID: u32 = 1;

/// Progress records for one learner, keyed by lesson id
#[derive(Debug, Clone, Default)]
pub struct ProgressTracker {
    records: BTreeMap<u32, LessonProgress>,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a tracker from persisted records
    pub fn from_records(records: impl IntoIterator<Item = LessonProgress>) -> Self {
        Self {
            records: records.into_iter().map(|r| (r.lesson_id, r)).collect(),
        }
    }

    pub fn get_progress(&self, lesson_id: u32) -> Option<&LessonProgress> {
        self.records.get(&lesson_id)
    }

    pub fn records(&self) -> impl Iterator<Item = &LessonProgress> {
        self.records.values()
    }

    /// Record an attempt at `step`. Creates the record on first attempt.
    pub fn record_attempt(&mut self, lesson_id: u32, step: u32) -> &LessonProgress {
        self.record_attempt_at(lesson_id, step, Utc::now())
    }

    pub fn record_attempt_at(
        &mut self,
        lesson_id: u32,
        step: u32,
        now: DateTime<Utc>,
    ) -> &LessonProgress {
        self.records
            .entry(lesson_id)
            .and_modify(|p| {
                p.attempts = p.attempts.saturating_add(1);
                p.current_step = step;
                p.last_attempt_at = now;
            })
            .or_insert_with(|| LessonProgress::started(lesson_id, step, now))
    }

    /// Mark a lesson completed.
    ///
    /// `completed_at` is first-write-wins. Returns true only for the call that
    /// performed the transition, so one-time rewards can be gated on it.
    pub fn mark_completed(&mut self, lesson_id: u32) -> bool {
        self.mark_completed_at(lesson_id, Utc::now())
    }

    pub fn mark_completed_at(&mut self, lesson_id: u32, now: DateTime<Utc>) -> bool {
        let record = self
            .records
            .entry(lesson_id)
            .or_insert_with(|| LessonProgress::started(lesson_id, 1, now));

        if record.is_completed && record.completed_at.is_some() {
            return false;
        }

        record.is_completed = true;
        record.completed_at.get_or_insert(now);
        true
    }

    pub fn is_completed(&self, lesson_id: u32) -> bool {
        self.records.get(&lesson_id).is_some_and(|p| p.is_completed)
    }

    /// True for the entry lesson, or when every required lesson is completed
    pub fn is_unlocked(&self, lesson_id: u32, required_lesson_ids: &[u32]) -> bool {
        lesson_id == ENTRY_LESSON_ID
            || required_lesson_ids.iter().all(|id| self.is_completed(*id))
    }

    pub fn completed_count(&self) -> usize {
        self.records.values().filter(|p| p.is_completed).count()
    }

    /// Completion percentage over lessons that have any record.
    ///
    /// The denominator is not the catalog size: untouched lessons are ignored.
    pub fn overall_progress(&self) -> u8 {
        let total = self.records.len().max(1) as f64;
        let pct = (100.0 * self.completed_count() as f64 / total).round();
        pct as u8
    }
}
