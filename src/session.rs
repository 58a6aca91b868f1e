//! Learner session: one learner's progress, economy and rewards
//!
//! Sessions are constructed explicitly and passed by reference; there is no
//! ambient global state. Local state is updated first and persisted after, so
//! a failed write leaves the in-memory session ahead of the store.

use std::time::Instant;

use anyhow::Context;
use serde::Serialize;
use serde_json::json;
use tracing::{debug, info};

use crate::catalog::LessonCatalog;
use crate::config::Config;
use crate::domain::{CodeLanguage, Lesson, LessonProgress, RewardRecord, Step, StepReward};
use crate::effects::{Effect, EffectTimers};
use crate::error::{AcademyError, AcademyResult};
use crate::progress::ProgressTracker;
use crate::rewards::{Award, RanchEconomy, RewardDispatcher, RewardLog};
use crate::store::{paths, DocumentStore};
use crate::validation::{self, ValidationResult};

/// What the learner handed in for a step
#[derive(Debug, Clone)]
pub enum Submission {
    Code {
        code: String,
        language: CodeLanguage,
    },
    Quiz {
        answer: String,
    },
}

/// Everything the presentation layer needs after a submission
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionOutcome {
    pub success: bool,
    /// The step's success or failure message
    pub message: String,
    pub validation: ValidationResult,
    pub progress: LessonProgress,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step_award: Option<Award>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completion_award: Option<Award>,
    pub lesson_completed: bool,
    /// Next step id, if the lesson has one
    pub next_step: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

pub struct LearnerSession {
    uid: String,
    tracker: ProgressTracker,
    economy: RanchEconomy,
    rewards: RewardLog,
    effects: EffectTimers,
    dispatcher: RewardDispatcher,
}

impl LearnerSession {
    pub fn new(uid: impl Into<String>, config: &Config) -> Self {
        Self {
            uid: uid.into(),
            tracker: ProgressTracker::new(),
            economy: RanchEconomy::default(),
            rewards: RewardLog::default(),
            effects: EffectTimers::new(config.effects),
            dispatcher: RewardDispatcher::new(config.rewards),
        }
    }

    /// Load a learner's state from the store. Missing documents start empty.
    pub fn load(store: &dyn DocumentStore, uid: &str, config: &Config) -> anyhow::Result<Self> {
        let mut session = Self::new(uid, config);

        if let Some(doc) = store.get(&paths::ranch(uid))? {
            let economy: RanchEconomy = serde_json::from_value(doc)
                .with_context(|| format!("Invalid ranch document for {}", uid))?;
            session.economy = economy.normalized();
        }

        let progress = store
            .list(&paths::progress_collection(uid))?
            .into_iter()
            .map(|(path, doc)| {
                serde_json::from_value::<LessonProgress>(doc)
                    .with_context(|| format!("Invalid progress document {}", path))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;
        session.tracker = ProgressTracker::from_records(progress);

        let rewards = store
            .list(&paths::rewards_collection(uid))?
            .into_iter()
            .map(|(path, doc)| {
                serde_json::from_value::<RewardRecord>(doc)
                    .with_context(|| format!("Invalid reward document {}", path))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;
        session.rewards = RewardLog::from_records(rewards);

        debug!(
            "[ranch:session] Loaded {}: {} progress records, {} rewards",
            uid,
            session.tracker.records().count(),
            session.rewards.records().len()
        );
        Ok(session)
    }

    /// Write the whole session to the store
    pub fn persist(&self, store: &dyn DocumentStore) -> anyhow::Result<()> {
        let stats = self.economy.stats();
        store.set(
            &paths::user(&self.uid),
            &json!({
                "uid": self.uid,
                "level": stats.level,
                "title": stats.title,
                "overallProgress": self.tracker.overall_progress(),
            }),
        )?;
        store.set(&paths::ranch(&self.uid), &serde_json::to_value(&self.economy)?)?;

        for progress in self.tracker.records() {
            store.set(
                &paths::progress(&self.uid, progress.lesson_id),
                &serde_json::to_value(progress)?,
            )?;
        }
        for record in self.rewards.records() {
            store.set(
                &paths::reward(&self.uid, &record.id),
                &serde_json::to_value(record)?,
            )?;
        }
        Ok(())
    }

    pub fn uid(&self) -> &str {
        &self.uid
    }

    pub fn tracker(&self) -> &ProgressTracker {
        &self.tracker
    }

    pub fn economy(&self) -> &RanchEconomy {
        &self.economy
    }

    pub fn rewards(&self) -> &[RewardRecord] {
        self.rewards.records()
    }

    pub fn active_effects(&self) -> Vec<Effect> {
        self.effects.active(Instant::now())
    }

    pub fn is_unlocked(&self, lesson: &Lesson) -> bool {
        self.tracker.is_unlocked(lesson.id, &lesson.required_lessons)
    }

    fn lookup<'c>(
        catalog: &'c LessonCatalog,
        lesson_id: u32,
        step_id: u32,
    ) -> AcademyResult<(&'c Lesson, &'c Step)> {
        let lesson = catalog
            .get_lesson(lesson_id)
            .ok_or(AcademyError::LessonNotFound(lesson_id))?;
        let step = lesson.step(step_id).ok_or(AcademyError::StepNotFound {
            lesson: lesson_id,
            step: step_id,
        })?;
        Ok((lesson, step))
    }

    /// Record an attempt without validating anything
    pub fn record_attempt(
        &mut self,
        catalog: &LessonCatalog,
        lesson_id: u32,
        step_id: u32,
    ) -> AcademyResult<LessonProgress> {
        let (lesson, _) = Self::lookup(catalog, lesson_id, step_id)?;
        if !self.is_unlocked(lesson) {
            return Err(AcademyError::Locked(lesson_id));
        }
        Ok(self.tracker.record_attempt(lesson_id, step_id).clone())
    }

    /// Validate a submission, record the attempt and issue rewards on success.
    ///
    /// Passing the final step completes the lesson; the completion award is
    /// issued only on the first completion.
    pub fn submit(
        &mut self,
        catalog: &LessonCatalog,
        lesson_id: u32,
        step_id: u32,
        submission: Submission,
    ) -> AcademyResult<SubmissionOutcome> {
        self.submit_with_overrides(catalog, lesson_id, step_id, submission, None)
    }

    /// Answer the quiz on a narrative step
    pub fn answer_quiz(
        &mut self,
        catalog: &LessonCatalog,
        lesson_id: u32,
        step_id: u32,
        answer: &str,
    ) -> AcademyResult<SubmissionOutcome> {
        let submission = Submission::Quiz {
            answer: answer.to_string(),
        };
        self.submit(catalog, lesson_id, step_id, submission)
    }

    pub fn submit_with_overrides(
        &mut self,
        catalog: &LessonCatalog,
        lesson_id: u32,
        step_id: u32,
        submission: Submission,
        overrides: Option<StepReward>,
    ) -> AcademyResult<SubmissionOutcome> {
        let (lesson, step) = Self::lookup(catalog, lesson_id, step_id)?;
        if !self.is_unlocked(lesson) {
            return Err(AcademyError::Locked(lesson_id));
        }

        let validation = match (&submission, &step.quiz) {
            (Submission::Code { code, language }, _) if step.requires_code => {
                validation::validate(code, &step.rules_for(*language))
            }
            (Submission::Quiz { answer }, Some(quiz)) => validation::validate_quiz(quiz, answer),
            (Submission::Code { .. }, _) => {
                return Err(AcademyError::malformed(format!(
                    "step {}.{} expects a quiz answer",
                    lesson_id, step_id
                )));
            }
            (Submission::Quiz { .. }, None) => {
                return Err(AcademyError::malformed(format!(
                    "step {}.{} expects code",
                    lesson_id, step_id
                )));
            }
        };

        let now = Instant::now();
        self.effects.trigger(Effect::NetworkPing, now);
        if let Some(effect) = step.effect.as_deref().and_then(Effect::parse) {
            self.effects.trigger(effect, now);
        }

        self.tracker.record_attempt(lesson_id, step_id);
        info!(
            "[ranch:session] {} attempted {}.{}: {}",
            self.uid,
            lesson_id,
            step_id,
            if validation.success { "passed" } else { "failed" }
        );

        let mut step_award = None;
        let mut completion_award = None;

        if validation.success {
            let award =
                self.dispatcher
                    .on_step_success(&mut self.economy, lesson_id, step, overrides);
            self.note_award(&award, now);
            step_award = Some(award);

            if lesson.is_last_step(step_id) {
                completion_award = self.complete(lesson, now);
            }
        }

        let progress = self
            .tracker
            .get_progress(lesson_id)
            .cloned()
            .ok_or(AcademyError::LessonNotFound(lesson_id))?;

        Ok(SubmissionOutcome {
            success: validation.success,
            message: if validation.success {
                step.success_message.clone()
            } else {
                step.failure_message.clone()
            },
            hint: (!validation.success).then(|| step.hint.clone()).flatten(),
            validation,
            lesson_completed: progress.is_completed,
            progress,
            step_award,
            completion_award,
            next_step: lesson.next_step(step_id).map(|s| s.id),
        })
    }

    /// Explicit completion. Returns the award only for the first completion.
    pub fn complete_lesson(
        &mut self,
        catalog: &LessonCatalog,
        lesson_id: u32,
    ) -> AcademyResult<Option<Award>> {
        let lesson = catalog
            .get_lesson(lesson_id)
            .ok_or(AcademyError::LessonNotFound(lesson_id))?;
        if !self.is_unlocked(lesson) {
            return Err(AcademyError::Locked(lesson_id));
        }
        Ok(self.complete(lesson, Instant::now()))
    }

    fn complete(&mut self, lesson: &Lesson, now: Instant) -> Option<Award> {
        if !self.tracker.mark_completed(lesson.id) {
            debug!(
                "[ranch:session] {} re-completed lesson {}, no award",
                self.uid, lesson.id
            );
            return None;
        }
        let award = self
            .dispatcher
            .on_lesson_complete(&mut self.economy, &mut self.rewards, lesson);
        self.note_award(&award, now);
        Some(award)
    }

    fn note_award(&mut self, award: &Award, now: Instant) {
        if award.coins_awarded > 0 {
            self.effects.trigger(Effect::CoinBurst, now);
        }
        if award.level_up().is_some() {
            self.effects.trigger(Effect::LevelUp, now);
        }
    }

    pub fn earn_ranch_coin(&mut self, amount: u64) -> u64 {
        let balance = self.economy.earn_ranch_coin(amount);
        if amount > 0 {
            self.effects.trigger(Effect::CoinBurst, Instant::now());
        }
        balance
    }

    pub fn spend_ranch_coin(&mut self, amount: u64) -> bool {
        self.economy.spend_ranch_coin(amount)
    }

    pub fn add_experience(&mut self, amount: u64) -> Option<crate::rewards::LevelUp> {
        let level_up = self.economy.add_experience(amount);
        if level_up.is_some() {
            self.effects.trigger(Effect::LevelUp, Instant::now());
        }
        level_up
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;
    use crate::store::MemoryStore;

    fn code(text: &str) -> Submission {
        Submission::Code {
            code: text.to_string(),
            language: CodeLanguage::Rust,
        }
    }

    fn session() -> LearnerSession {
        LearnerSession::new("learner-1", &Config::default())
    }

    #[test]
    fn test_locked_lesson_is_rejected() {
        let mut session = session();
        let err = session
            .submit(catalog::builtin(), 2, 1, Submission::Quiz { answer: "true".into() })
            .unwrap_err();
        assert!(matches!(err, AcademyError::Locked(2)));
        assert!(session.tracker().get_progress(2).is_none());
    }

    #[test]
    fn test_unknown_step_is_not_found() {
        let mut session = session();
        let err = session.submit(catalog::builtin(), 1, 42, code("")).unwrap_err();
        assert!(matches!(err, AcademyError::StepNotFound { lesson: 1, step: 42 }));
    }

    #[test]
    fn test_failed_submission_records_attempt_without_reward() {
        let mut session = session();
        let outcome = session
            .submit(catalog::builtin(), 1, 2, code("let greeting = \"Howdy\";"))
            .unwrap();

        assert!(!outcome.success);
        assert_eq!(outcome.progress.attempts, 1);
        assert!(outcome.step_award.is_none());
        assert_eq!(session.economy().coins(), 0);
        assert!(outcome.hint.is_some());
        assert_eq!(outcome.validation.errors.len(), 1);
    }

    #[test]
    fn test_wrong_submission_kind_is_malformed() {
        let mut session = session();
        let err = session.submit(catalog::builtin(), 1, 1, code("fn main() {}")).unwrap_err();
        assert!(matches!(err, AcademyError::MalformedRequest(_)));
    }

    #[test]
    fn test_finishing_lesson_awards_once() {
        let mut session = session();
        let catalog = catalog::builtin();

        session.answer_quiz(catalog, 1, 1, " On validators ").unwrap();
        session
            .submit(catalog, 1, 2, code("let greeting = \"Hello, Solana!\";"))
            .unwrap();
        let last = session
            .submit(
                catalog,
                1,
                3,
                code("fn say_hello() { let greeting = \"Hello, Solana!\"; }"),
            )
            .unwrap();

        assert!(last.lesson_completed);
        let completion = last.completion_award.expect("first completion is rewarded");
        assert_eq!(completion.coins_awarded, 50);
        assert!(completion.badge().is_some());
        // 3 steps x 10 coins + 50 lesson coins
        assert_eq!(session.economy().coins(), 80);
        // 3 x 25 xp + 50 bonus
        assert_eq!(session.economy().experience(), 125);

        let again = session
            .submit(
                catalog,
                1,
                3,
                code("fn say_hello() { let greeting = \"Hello, Solana!\"; }"),
            )
            .unwrap();
        assert!(again.completion_award.is_none());
        assert!(session.complete_lesson(catalog, 1).unwrap().is_none());
        assert_eq!(session.rewards().len(), 1);
        assert!(session.is_unlocked(catalog.get_lesson(2).unwrap()));
    }

    #[test]
    fn test_persist_and_load_roundtrip() {
        let store = MemoryStore::new();
        let mut session = session();
        session.record_attempt(catalog::builtin(), 1, 1).unwrap();
        session.complete_lesson(catalog::builtin(), 1).unwrap();
        session.earn_ranch_coin(5);
        session.persist(&store).unwrap();

        let loaded = LearnerSession::load(&store, "learner-1", &Config::default()).unwrap();
        assert_eq!(loaded.economy(), session.economy());
        assert!(loaded.tracker().is_completed(1));
        assert_eq!(loaded.rewards(), session.rewards());

        let user = store.get("users/learner-1").unwrap().unwrap();
        assert_eq!(user["overallProgress"], 100);
    }

    #[test]
    fn test_spend_is_guarded() {
        let mut session = session();
        session.earn_ranch_coin(100);
        assert!(!session.spend_ranch_coin(150));
        assert_eq!(session.economy().coins(), 100);
        assert!(session.active_effects().contains(&Effect::CoinBurst));
    }
}
