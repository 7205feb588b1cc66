//! Tenpai batch tooling
//!
//! Seeded, reproducible deals and rayon-parallel evaluation on top of
//! `tenpai-engine`.

pub mod batch;
pub mod seeding;

pub use batch::{BatchEvaluator, DealSurvey, EvalRequest, SurveyConfig, SurveySummary};
pub use seeding::{deal_round, Deal, DealSampler};
