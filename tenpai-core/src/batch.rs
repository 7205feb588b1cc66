//! Parallel batch evaluation with rayon.
//!
//! Two workloads: surveying starting shanten over many seeded deals, and
//! scoring a list of hands given in tile notation. Each item is independent,
//! so both fan out over a dedicated thread pool.

use anyhow::Context;
use rayon::prelude::*;
use tenpai_engine::parser::parse_tile;
use tenpai_engine::{Conditions, Hand, ScoringRule, WinResult, Wind};

use crate::seeding::{deal_round, DealSampler, NUM_SEATS};

/// Configuration for a shanten survey.
#[derive(Debug, Clone)]
pub struct SurveyConfig {
    /// Number of deals to examine.
    pub num_deals: usize,
    pub session_seed: [u8; 32],
    pub rule: ScoringRule,
}

impl Default for SurveyConfig {
    fn default() -> Self {
        Self {
            num_deals: 100,
            session_seed: [0u8; 32],
            rule: ScoringRule::default(),
        }
    }
}

/// What one deal looks like from each seat.
#[derive(Debug, Clone, PartialEq)]
pub struct DealSurvey {
    pub index: u64,
    /// Starting shanten per seat.
    pub shanten: [u8; NUM_SEATS],
    /// Dealer's shanten after the first draw and the best discard.
    pub dealer_after_draw: u8,
    /// Set when the dealer's first draw completes the hand.
    pub dealer_win: Option<WinResult>,
}

impl DealSurvey {
    pub fn tenpai_seats(&self) -> usize {
        self.shanten.iter().filter(|&&s| s == 0).count()
    }
}

/// Aggregate over a survey.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SurveySummary {
    pub deals: usize,
    /// `histogram[n]` hands started at shanten `n`.
    pub histogram: [usize; 7],
    pub dealer_wins: usize,
}

impl SurveySummary {
    pub fn from_surveys(surveys: &[DealSurvey]) -> Self {
        let mut summary = SurveySummary {
            deals: surveys.len(),
            ..Default::default()
        };
        for survey in surveys {
            for &s in &survey.shanten {
                summary.histogram[(s as usize).min(6)] += 1;
            }
            if survey.dealer_win.is_some() {
                summary.dealer_wins += 1;
            }
        }
        summary
    }

    pub fn mean_shanten(&self) -> f64 {
        let hands: usize = self.histogram.iter().sum();
        if hands == 0 {
            return 0.0;
        }
        let weighted: usize = self.histogram.iter().enumerate().map(|(s, n)| s * n).sum();
        weighted as f64 / hands as f64
    }
}

/// A hand to score, written in tile notation.
#[derive(Debug, Clone)]
pub struct EvalRequest {
    /// Thirteen concealed tiles, e.g. `"123456789m1112p"`.
    pub hand: String,
    /// The completing tile, e.g. `"2p"`.
    pub win: String,
    pub conditions: Conditions,
    pub round_wind: Wind,
    pub seat_wind: Wind,
}

impl EvalRequest {
    pub fn new(hand: &str, win: &str, conditions: Conditions) -> Self {
        Self {
            hand: hand.to_string(),
            win: win.to_string(),
            conditions,
            round_wind: Wind::East,
            seat_wind: Wind::South,
        }
    }
}

fn survey_deal(seed: &[u8; 32], index: u64, rule: ScoringRule) -> anyhow::Result<DealSurvey> {
    let deal = deal_round(seed, 0, 0, 0, rule)?;
    let mut shanten = [0u8; NUM_SEATS];
    for (slot, hand) in shanten.iter_mut().zip(&deal.hands) {
        *slot = hand.calc_shanten();
    }

    let dealer = deal.dealer_hand();
    let draw = deal
        .next_draw()
        .context("wall exhausted before the first draw")?;
    let dealer_after_draw = dealer
        .discard_shanten(draw)
        .iter()
        .map(|&(_, s)| s)
        .min()
        .unwrap_or(shanten[deal.dealer as usize]);
    let conditions = Conditions {
        tenhou: true,
        ..Conditions::tsumo()
    };
    let dealer_win = dealer.evaluate(draw, &conditions);
    if let Some(win) = &dealer_win {
        log::debug!("deal {} opens with a dealer win: {:?}", index, win.yaku);
    }

    Ok(DealSurvey {
        index,
        shanten,
        dealer_after_draw,
        dealer_win,
    })
}

fn evaluate_request(request: &EvalRequest, rule: ScoringRule) -> anyhow::Result<Option<WinResult>> {
    let hand = Hand::from_text(&request.hand, request.round_wind, request.seat_wind)
        .with_context(|| format!("parsing hand {:?}", request.hand))?
        .with_rule(rule);
    let win = parse_tile(&request.win).with_context(|| format!("parsing win tile {:?}", request.win))?;
    anyhow::ensure!(
        hand.all_counts()[win.tile_type().index()] < 4,
        "win tile {} is a fifth copy",
        request.win
    );
    // Notation allocates copies from zero; pick the first copy the hand lacks.
    let win = win
        .tile_type()
        .instances()
        .into_iter()
        .find(|t| !hand.all_tiles().contains(t) && t.is_red() == win.is_red())
        .or_else(|| {
            win.tile_type()
                .instances()
                .into_iter()
                .find(|t| !hand.all_tiles().contains(t))
        })
        .context("no free copy of the win tile")?;
    Ok(hand.evaluate(win, &request.conditions))
}

/// Batch evaluator backed by its own rayon thread pool.
pub struct BatchEvaluator {
    pool: rayon::ThreadPool,
    rule: ScoringRule,
}

impl BatchEvaluator {
    /// `None` uses one thread per CPU.
    pub fn new(num_threads: Option<usize>) -> anyhow::Result<Self> {
        let mut builder = rayon::ThreadPoolBuilder::new();
        if let Some(n) = num_threads {
            builder = builder.num_threads(n);
        }
        let pool = builder
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build thread pool: {}", e))?;
        Ok(Self {
            pool,
            rule: ScoringRule::default(),
        })
    }

    pub fn with_rule(mut self, rule: ScoringRule) -> Self {
        self.rule = rule;
        self
    }

    /// Surveys `config.num_deals` deals. Results come back in deal order.
    pub fn survey(&self, config: &SurveyConfig) -> anyhow::Result<Vec<DealSurvey>> {
        let mut sampler = DealSampler::new(config.session_seed);
        let seeds: Vec<[u8; 32]> = (0..config.num_deals).map(|_| sampler.next_seed()).collect();
        let rule = config.rule;
        self.pool.install(|| {
            seeds
                .par_iter()
                .enumerate()
                .map(|(i, seed)| survey_deal(seed, i as u64, rule))
                .collect()
        })
    }

    /// Scores every request; each entry fails or succeeds on its own.
    pub fn evaluate_all(&self, requests: &[EvalRequest]) -> Vec<anyhow::Result<Option<WinResult>>> {
        let rule = self.rule;
        self.pool.install(|| {
            requests
                .par_iter()
                .map(|request| evaluate_request(request, rule))
                .collect()
        })
    }
}

/// Survey on rayon's global pool.
pub fn survey_simple(config: &SurveyConfig) -> anyhow::Result<Vec<DealSurvey>> {
    let mut sampler = DealSampler::new(config.session_seed);
    let seeds: Vec<[u8; 32]> = (0..config.num_deals).map(|_| sampler.next_seed()).collect();
    seeds
        .par_iter()
        .enumerate()
        .map(|(i, seed)| survey_deal(seed, i as u64, config.rule))
        .collect()
}
