//! Wagering engine: the in-process API a presentation layer talks to
//!
//! Every start is a single critical section: the affordability check, the
//! debit and the phase change happen under one lock. The timed part of a
//! round (frames, wheel spin, dealer pause) runs as a spawned tokio task that
//! re-takes the lock only to settle. The lock is never held across `.await`.
//!
//! Guards are per game, so different games may have rounds in flight at the
//! same time.

use crate::config::{EngineConfig, TimingConfig};
use crate::errors::BetRejection;
use crate::events::{EngineEvent, EventBus};
use crate::games::blackjack::{BlackjackSession, BlackjackView};
use crate::games::dice::{DiceSession, DiceView};
use crate::games::pending::{PendingBet, PendingBets};
use crate::games::roulette::{RouletteSession, RouletteView};
use crate::games::slots::{SlotsSession, SlotsView};
use crate::games::types::{BetConfig, BetRecord, FeeQuote, OpenRound, RouletteColor, Token};
use crate::history::BetHistory;
use crate::ledger::{self, Ledger};
use crate::outcomes::{OutcomeSource, RandomOutcomes};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::broadcast;
use tokio::time::sleep;
use tracing::{debug, info, warn};

struct EngineState {
    ledger: Ledger,
    history: BetHistory,
    slots: SlotsSession,
    roulette: RouletteSession,
    blackjack: BlackjackSession,
    dice: DiceSession,
    /// Authoritative draws
    outcomes: Box<dyn OutcomeSource>,
    /// Animation-only draws, kept apart so frame counts never shift results
    cosmetic: RandomOutcomes,
}

impl EngineState {
    fn commit(&mut self, record: &BetRecord) {
        if record.payout > 0.0 {
            self.ledger.credit(record.payout);
        }
        self.history.append(record.clone());
    }
}

/// Handle to one player's engine. Clones share the same state.
#[derive(Clone)]
pub struct WagerEngine {
    state: Arc<Mutex<EngineState>>,
    pending: Arc<PendingBets>,
    events: EventBus,
    timing: TimingConfig,
    token: Token,
}

impl WagerEngine {
    /// Engine seeded from `config.rng.seed`, or from entropy when unset
    pub fn new(config: &EngineConfig) -> Self {
        let outcomes: Box<dyn OutcomeSource> = match config.rng.seed {
            Some(seed) => Box::new(RandomOutcomes::seeded(seed)),
            None => Box::new(RandomOutcomes::from_entropy()),
        };
        Self::with_outcomes(config, outcomes)
    }

    pub fn with_outcomes(config: &EngineConfig, outcomes: Box<dyn OutcomeSource>) -> Self {
        let state = EngineState {
            ledger: Ledger::new(config.ledger.initial_balance),
            history: BetHistory::new(),
            slots: SlotsSession::new(),
            roulette: RouletteSession::new(),
            blackjack: BlackjackSession::new(),
            dice: DiceSession::new(),
            outcomes,
            cosmetic: RandomOutcomes::from_entropy(),
        };

        Self {
            state: Arc::new(Mutex::new(state)),
            pending: Arc::new(PendingBets::new()),
            events: EventBus::new(config.events.channel_capacity),
            timing: config.timing.clone(),
            token: Token::drb(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, EngineState> {
        // State stays consistent between statements, so a poisoned lock is still usable
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    // ---- queries ----

    pub fn balance(&self) -> f64 {
        self.lock().ledger.balance()
    }

    pub fn total_fees_paid(&self) -> f64 {
        self.lock().ledger.total_fees_paid()
    }

    /// Up to ten most recent records, newest first
    pub fn history(&self) -> Vec<BetRecord> {
        self.lock().history.records()
    }

    pub fn quote(&self, stake: u64) -> FeeQuote {
        ledger::quote(stake)
    }

    pub fn token_symbol(&self) -> &str {
        &self.token.symbol
    }

    pub fn fee_address(&self) -> &str {
        &self.token.fee_address
    }

    pub fn slots_view(&self) -> SlotsView {
        self.lock().slots.view()
    }

    pub fn roulette_view(&self) -> RouletteView {
        self.lock().roulette.view()
    }

    pub fn blackjack_view(&self) -> BlackjackView {
        self.lock().blackjack.view()
    }

    pub fn dice_view(&self) -> DiceView {
        self.lock().dice.view()
    }

    /// Rounds accepted but not yet settled, across all games
    pub fn rounds_in_flight(&self) -> usize {
        self.pending.pending_count()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.events.subscribe()
    }

    // ---- bets ----

    /// Start a round of any game. The returned future yields the settled record.
    ///
    /// Timed games spawn their settlement, so this must run inside a tokio runtime.
    pub fn place_bet(&self, stake: u64, config: BetConfig) -> Result<PendingBet, BetRejection> {
        debug!("Placing {} bet, stake {}", config.game_type(), stake);
        match config {
            BetConfig::Slots => self.spin_slots(stake),
            BetConfig::Roulette { color } => self.start_roulette(stake, Some(color)),
            BetConfig::Dice { target_sum } => self.start_dice(stake, Some(target_sum)),
            BetConfig::Blackjack => self.deal(stake),
        }
    }

    pub fn spin_slots(&self, stake: u64) -> Result<PendingBet, BetRejection> {
        let pending = self.open_round(|state| state.slots.begin(&mut state.ledger, stake))?;
        tokio::spawn(self.clone().run_slots());
        Ok(pending)
    }

    pub fn select_color(&self, color: RouletteColor) {
        self.lock().roulette.select(color);
    }

    /// Spin with the currently selected color
    pub fn spin_roulette(&self, stake: u64) -> Result<PendingBet, BetRejection> {
        self.start_roulette(stake, None)
    }

    fn start_roulette(&self, stake: u64, color: Option<RouletteColor>) -> Result<PendingBet, BetRejection> {
        let pending =
            self.open_round(|state| state.roulette.begin_with(&mut state.ledger, stake, color))?;
        tokio::spawn(self.clone().run_roulette());
        Ok(pending)
    }

    pub fn select_target(&self, target: u8) -> Result<(), BetRejection> {
        self.lock().dice.select_target(target)
    }

    /// Roll against the currently selected target
    pub fn roll_dice(&self, stake: u64) -> Result<PendingBet, BetRejection> {
        self.start_dice(stake, None)
    }

    fn start_dice(&self, stake: u64, target: Option<u8>) -> Result<PendingBet, BetRejection> {
        let pending =
            self.open_round(|state| state.dice.begin_with(&mut state.ledger, stake, target))?;
        tokio::spawn(self.clone().run_dice());
        Ok(pending)
    }

    /// Deal a blackjack hand. The future resolves on bust or after `stand`.
    pub fn deal(&self, stake: u64) -> Result<PendingBet, BetRejection> {
        self.open_round(|state| {
            state
                .blackjack
                .deal(&mut state.ledger, stake, state.outcomes.as_mut())
        })
    }

    pub fn hit(&self) -> Result<BlackjackView, BetRejection> {
        let (settled, view) = {
            let mut guard = self.lock();
            let state = &mut *guard;
            let settled = state
                .blackjack
                .hit(state.outcomes.as_mut())
                .map_err(|e| self.rejected(e))?;
            if let Some(record) = &settled {
                state.commit(record);
            }
            (settled, state.blackjack.view())
        };

        debug!("Blackjack hit: player total {}", view.player_total);
        if let Some(record) = settled {
            self.finish(record);
        }
        Ok(view)
    }

    /// Let the dealer play out. Settlement follows after the dealer pause.
    pub fn stand(&self) -> Result<BlackjackView, BetRejection> {
        let view = {
            let mut guard = self.lock();
            let state = &mut *guard;
            state
                .blackjack
                .stand(state.outcomes.as_mut())
                .map_err(|e| self.rejected(e))?;
            state.blackjack.view()
        };

        debug!("Blackjack stand: player {} vs dealer {}", view.player_total, view.dealer_total);
        tokio::spawn(self.clone().run_blackjack_dealer());
        Ok(view)
    }

    pub fn reset_blackjack(&self) -> Result<(), BetRejection> {
        self.lock().blackjack.reset().map_err(|e| self.rejected(e))
    }

    // ---- round lifecycle ----

    /// Run a start under the lock and register its result channel before the
    /// lock drops, so no other handle can settle the round ahead of its waiter
    fn open_round<F>(&self, start: F) -> Result<PendingBet, BetRejection>
    where
        F: FnOnce(&mut EngineState) -> Result<OpenRound, BetRejection>,
    {
        let mut guard = self.lock();
        let round = start(&mut *guard).map_err(|e| self.rejected(e))?;
        let pending = self.pending.register(&round);

        info!("🎲 {} round {} accepted, stake {}", round.game, round.id, round.stake);
        self.events.publish(EngineEvent::BetPlaced {
            id: round.id.clone(),
            game: round.game,
            stake: round.stake,
        });
        Ok(pending)
    }

    fn rejected(&self, rejection: BetRejection) -> BetRejection {
        warn!("Bet rejected: {}", rejection);
        rejection
    }

    /// Commit a record under the lock, then announce it outside
    fn settle_with<F>(&self, settle: F)
    where
        F: FnOnce(&mut EngineState) -> Option<BetRecord>,
    {
        let record = {
            let mut guard = self.lock();
            let state = &mut *guard;
            let record = settle(state);
            if let Some(record) = &record {
                state.commit(record);
            }
            record
        };

        match record {
            Some(record) => self.finish(record),
            None => warn!("Settlement fired with no open round"),
        }
    }

    fn finish(&self, record: BetRecord) {
        info!(
            "✅ {} round {} settled: {:?}, payout {:.2}",
            record.game, record.id, record.result, record.payout
        );
        self.events.publish(EngineEvent::BetSettled(record.clone()));
        self.pending.complete(record);
    }

    async fn run_slots(self) {
        for _ in 0..self.timing.slot_frames {
            sleep(self.timing.frame_interval()).await;
            let symbols = {
                let mut guard = self.lock();
                let state = &mut *guard;
                let symbols = state.cosmetic.reels();
                state.slots.show_frame(symbols);
                symbols
            };
            self.events.publish(EngineEvent::SlotsFrame { symbols });
        }

        self.settle_with(|state| {
            let reels = state.outcomes.reels();
            debug!("Slots final reels: {:?}", reels);
            state.slots.settle(reels)
        });
    }

    async fn run_roulette(self) {
        sleep(self.timing.roulette_delay()).await;

        self.settle_with(|state| {
            let number = state.outcomes.wheel();
            debug!("Roulette landed on {}", number);
            state.roulette.settle(number)
        });
    }

    async fn run_dice(self) {
        for _ in 0..self.timing.dice_frames {
            sleep(self.timing.frame_interval()).await;
            let dice = {
                let mut guard = self.lock();
                let state = &mut *guard;
                let dice = state.cosmetic.dice();
                state.dice.show_frame(dice);
                dice
            };
            self.events.publish(EngineEvent::DiceFrame { dice });
        }

        self.settle_with(|state| {
            let dice = state.outcomes.dice();
            debug!("Dice final roll: {:?}", dice);
            state.dice.settle(dice)
        });
    }

    async fn run_blackjack_dealer(self) {
        sleep(self.timing.blackjack_delay()).await;
        self.settle_with(|state| state.blackjack.settle());
    }
}
