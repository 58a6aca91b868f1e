//! Reward economy: coins, experience, levels and NFT badges
//!
//! The dispatcher converts a passed step or a completed lesson into grants on
//! a learner's [`RanchEconomy`] and [`RewardLog`], returning [`RewardEvent`]s
//! for the presentation layer.

mod dispatcher;
mod economy;
mod levels;

pub use dispatcher::{Award, RewardDispatcher, RewardEvent, RewardLog};
pub use economy::{LevelUp, RanchEconomy};
pub use levels::{Level, PlayerStats, TITLES, XP_PER_LEVEL};
