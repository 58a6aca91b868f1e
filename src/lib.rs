//! Ranch Academy - a gamified Solana learning backend
//!
//! Learners work through a catalog of lessons, each a sequence of steps. Code
//! steps are checked by text-matching rules (nothing is ever compiled), quiz
//! steps by their answer. Passing steps earns ranch coins and experience;
//! finishing a lesson unlocks the next ones and may award an NFT badge.
//!
//! ## Layout
//!
//! - [`catalog`]: the lesson catalog and built-in lessons
//! - [`validation`]: the rule evaluator
//! - [`progress`]: per-lesson progress and unlock gating
//! - [`rewards`]: ranch economy, levels and the reward dispatcher
//! - [`session`]: one learner's state, tying the above together
//! - [`store`]: JSON document persistence (SQLite or in-memory)
//! - [`server`]: the HTTP lesson API

pub mod catalog;
pub mod config;
pub mod domain;
pub mod effects;
pub mod error;
pub mod progress;
pub mod rewards;
pub mod server;
pub mod session;
pub mod store;
pub mod validation;

pub use domain::*;
pub use error::{AcademyError, AcademyResult};
