//! Reward dispatcher - turns successful steps and completed lessons into grants

use serde::Serialize;
use tracing::info;

use super::economy::{LevelUp, RanchEconomy};
use crate::config::RewardSettings;
use crate::domain::{Lesson, RewardRecord, Step, StepReward};

/// Events the presentation layer renders after an award
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum RewardEvent {
    CoinsEarned { amount: u64, balance: u64 },
    ExperienceGained { amount: u64, total: u64 },
    LevelUp(LevelUp),
    BadgeAwarded(RewardRecord),
}

/// What a single dispatch granted
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Award {
    pub coins_awarded: u64,
    pub xp_awarded: u64,
    pub events: Vec<RewardEvent>,
}

impl Award {
    pub fn level_up(&self) -> Option<&LevelUp> {
        self.events.iter().find_map(|e| match e {
            RewardEvent::LevelUp(l) => Some(l),
            _ => None,
        })
    }

    pub fn badge(&self) -> Option<&RewardRecord> {
        self.events.iter().find_map(|e| match e {
            RewardEvent::BadgeAwarded(r) => Some(r),
            _ => None,
        })
    }
}

/// Append-only log of badge grants
#[derive(Debug, Clone, Default)]
pub struct RewardLog {
    records: Vec<RewardRecord>,
}

impl RewardLog {
    pub fn from_records(mut records: Vec<RewardRecord>) -> Self {
        records.sort_by_key(|r| r.awarded_at);
        Self { records }
    }

    pub fn append(&mut self, record: RewardRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[RewardRecord] {
        &self.records
    }

    pub fn has_badge_for(&self, lesson_id: u32) -> bool {
        self.records.iter().any(|r| r.lesson_id == lesson_id)
    }
}

/// Computes and applies coin/xp/badge awards.
///
/// The dispatcher does not check whether a lesson was already rewarded;
/// callers gate `on_lesson_complete` on the tracker's completion transition.
#[derive(Debug, Clone, Copy, Default)]
pub struct RewardDispatcher {
    settings: RewardSettings,
}

impl RewardDispatcher {
    pub fn new(settings: RewardSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &RewardSettings {
        &self.settings
    }

    /// Amounts a passed step is worth: explicit override, then the step's
    /// own reward, then the configured default
    pub fn step_amounts(&self, step: &Step, overrides: Option<StepReward>) -> StepReward {
        overrides.or(step.reward).unwrap_or(StepReward {
            coins: self.settings.step_coins,
            experience: self.settings.step_xp,
        })
    }

    pub fn on_step_success(
        &self,
        economy: &mut RanchEconomy,
        lesson_id: u32,
        step: &Step,
        overrides: Option<StepReward>,
    ) -> Award {
        let amounts = self.step_amounts(step, overrides);
        info!(
            "[ranch:rewards] Step {}.{} passed: +{} coins, +{} xp",
            lesson_id, step.id, amounts.coins, amounts.experience
        );
        Self::grant(economy, amounts.coins, amounts.experience)
    }

    pub fn on_lesson_complete(
        &self,
        economy: &mut RanchEconomy,
        log: &mut RewardLog,
        lesson: &Lesson,
    ) -> Award {
        info!(
            "[ranch:rewards] Lesson {} completed: +{} coins, +{} xp",
            lesson.id, lesson.reward, self.settings.lesson_xp_bonus
        );
        let mut award = Self::grant(economy, lesson.reward, self.settings.lesson_xp_bonus);

        if let Some(badge) = &lesson.badge {
            let record = RewardRecord::for_badge(lesson.id, badge);
            info!("[ranch:rewards] Badge '{}' awarded ({})", record.name, record.id);
            log.append(record.clone());
            award.events.push(RewardEvent::BadgeAwarded(record));
        }

        award
    }

    fn grant(economy: &mut RanchEconomy, coins: u64, experience: u64) -> Award {
        let mut events = Vec::new();

        if coins > 0 {
            let balance = economy.earn_ranch_coin(coins);
            events.push(RewardEvent::CoinsEarned {
                amount: coins,
                balance,
            });
        }

        if experience > 0 {
            let level_up = economy.add_experience(experience);
            events.push(RewardEvent::ExperienceGained {
                amount: experience,
                total: economy.experience(),
            });
            if let Some(level_up) = level_up {
                events.push(RewardEvent::LevelUp(level_up));
            }
        }

        Award {
            coins_awarded: coins,
            xp_awarded: experience,
            events,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Badge, Difficulty};

    fn lesson_with_badge() -> Lesson {
        Lesson {
            id: 3,
            title: "Programs".to_string(),
            description: String::new(),
            chapter: 1,
            difficulty: Difficulty::Beginner,
            estimated_minutes: 10,
            premium: false,
            reward: 100,
            badge: Some(Badge {
                name: "Program Pioneer".to_string(),
                image: "badges/pioneer.png".to_string(),
            }),
            required_lessons: vec![2],
            steps: vec![Step::code(1, "t", "c")],
        }
    }

    #[test]
    fn test_step_success_uses_defaults() {
        let dispatcher = RewardDispatcher::default();
        let mut economy = RanchEconomy::default();
        let award = dispatcher.on_step_success(&mut economy, 1, &Step::code(1, "t", "c"), None);

        assert_eq!(award.coins_awarded, 10);
        assert_eq!(award.xp_awarded, 25);
        assert_eq!(economy.coins(), 10);
        assert_eq!(economy.experience(), 25);
        assert!(award.level_up().is_none());
    }

    #[test]
    fn test_overrides_win_over_step_reward() {
        let dispatcher = RewardDispatcher::default();
        let step = Step::code(1, "t", "c").reward(30, 40);
        assert_eq!(dispatcher.step_amounts(&step, None).coins, 30);

        let forced = StepReward {
            coins: 1,
            experience: 2,
        };
        assert_eq!(dispatcher.step_amounts(&step, Some(forced)), forced);
    }

    #[test]
    fn test_lesson_complete_awards_coins_xp_and_badge() {
        let dispatcher = RewardDispatcher::default();
        let mut economy = RanchEconomy::new(0, 60);
        let mut log = RewardLog::default();

        let award = dispatcher.on_lesson_complete(&mut economy, &mut log, &lesson_with_badge());
        assert_eq!(award.coins_awarded, 100);
        assert_eq!(award.xp_awarded, 50);
        assert_eq!(economy.level(), 2);
        assert!(award.level_up().is_some());

        let badge = award.badge().expect("badge event");
        assert_eq!(badge.name, "Program Pioneer");
        assert_eq!(log.records().len(), 1);
        assert!(log.has_badge_for(3));
    }

    #[test]
    fn test_zero_amounts_emit_no_events() {
        let dispatcher = RewardDispatcher::new(RewardSettings {
            step_coins: 0,
            step_xp: 0,
            lesson_xp_bonus: 0,
        });
        let mut economy = RanchEconomy::default();
        let award = dispatcher.on_step_success(&mut economy, 1, &Step::code(1, "t", "c"), None);
        assert!(award.events.is_empty());
    }
}
