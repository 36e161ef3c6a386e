//! Meyer: the escalating-declaration liar's-dice game for 2–6 players.
//!
//! Each turn the current player holds a hidden two-die roll and must
//! either declare it truthfully, bluff a higher declaration, pass the
//! problem on blind ("same or higher"), or call out the previous
//! declarer. Checks cost lives; the last player with lives wins.

use parlor_protocol::PlayerId;
use parlor_room::{GameRng, TableConfig, TableGame};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Rolls and ranking
// ---------------------------------------------------------------------------

/// A two-die roll in canonical form: `high >= low`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roll {
    pub high: u8,
    pub low: u8,
}

impl Roll {
    /// The Roll of Cheers, the highest roll. Rolling it on a truthful
    /// declaration ends the round on the spot.
    pub const CHEERS: Roll = Roll { high: 3, low: 2 };

    /// Meyer. Losing a check against a declared Meyer costs two lives.
    pub const MEYER: Roll = Roll { high: 2, low: 1 };

    /// Little Meyer, third highest.
    pub const LITTLE_MEYER: Roll = Roll { high: 3, low: 1 };

    /// Canonicalizes two die faces.
    pub fn new(a: u8, b: u8) -> Self {
        Self {
            high: a.max(b),
            low: a.min(b),
        }
    }

    /// Rolls two dice.
    pub fn random(rng: &mut GameRng) -> Self {
        Self::new(rng.roll_die(), rng.roll_die())
    }

    /// Returns `true` if this is a canonical roll of real die faces.
    pub fn is_canonical(&self) -> bool {
        (1..=6).contains(&self.low) && (1..=6).contains(&self.high) && self.high >= self.low
    }

    /// Strength of this roll; higher is better and no two canonical
    /// rolls tie. Order: Cheers > Meyer > Little Meyer > pairs 6-6 down
    /// to 1-1 > remaining two-different rolls descending to 4-1.
    pub fn rank(&self) -> u8 {
        match *self {
            Roll::CHEERS => 100,
            Roll::MEYER => 99,
            Roll::LITTLE_MEYER => 98,
            Roll { high, low } if high == low => 80 + high,
            Roll { high, low } => high * 10 + low,
        }
    }
}

impl std::fmt::Display for Roll {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.high, self.low)
    }
}

/// Every canonical roll, for enumeration in rules and tests.
pub fn all_canonical_rolls() -> Vec<Roll> {
    let mut rolls = Vec::new();
    for high in 1..=6u8 {
        for low in 1..=high {
            rolls.push(Roll { high, low });
        }
    }
    rolls
}

// ---------------------------------------------------------------------------
// Engine types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct MeyerConfig {
    /// Lives each player starts with.
    pub starting_lives: u8,
}

impl Default for MeyerConfig {
    fn default() -> Self {
        Self { starting_lives: 6 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeyerPhase {
    /// Mid-round; the seat at `turn` must act.
    Playing,
    /// A check resolved and lives were adjusted. Host starts the next round.
    CheckDone,
    /// A truthful Roll of Cheers ended the round. Host starts the next round.
    RollOfCheers,
    /// At most one player has lives left.
    GameOver,
}

/// Moves a Meyer player can submit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MeyerAction {
    /// Declare the actual roll. Legal only if it meets the standing
    /// declaration (always legal when there is none).
    Truth,
    /// Declare any value meeting the standing declaration, regardless
    /// of the actual roll.
    Bluff { declared: Roll },
    /// Re-roll blind and pass the turn; the standing declaration carries
    /// over as this player's implicit claim.
    SameOrHigher,
    /// Reveal the previous declarer's actual roll against their claim.
    Check,
    /// Host starts the next round after a check or a Roll of Cheers.
    NextRound,
}

/// The public record of a resolved check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    pub checker: usize,
    pub declarer: usize,
    pub declared: Roll,
    pub actual: Roll,
    pub loser: usize,
    pub lives_lost: u8,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MeyerState {
    phase: MeyerPhase,
    lives: Vec<u8>,
    mercy_used: Vec<bool>,
    /// Seat to act.
    turn: usize,
    /// 1-based turn counter within the round.
    turn_count: u32,
    /// The actual roll in front of the seat at `turn`.
    current_roll: Roll,
    /// The standing declaration came from "same or higher": it is backed
    /// by a roll not even the declarer has seen.
    declared_blind: bool,
    /// The standing declaration every later move must meet.
    declared: Option<Roll>,
    /// Seat whose actual roll backs the standing declaration.
    declarer: Option<usize>,
    /// That seat's actual roll, revealed only by a check.
    declarer_roll: Option<Roll>,
    round_starter: usize,
    /// Who starts the next round: the check loser, or the Cheers roller.
    next_starter: usize,
    /// Set when a truthful Roll of Cheers ended the round.
    cheers_roller: Option<usize>,
    last_check: Option<CheckResult>,
    winner: Option<usize>,
}

impl MeyerState {
    fn alive(&self, seat: usize) -> bool {
        self.lives[seat] > 0
    }

    fn next_alive(&self, from: usize) -> usize {
        let n = self.lives.len();
        let mut seat = (from + 1) % n;
        while !self.alive(seat) {
            seat = (seat + 1) % n;
        }
        seat
    }

    fn alive_count(&self) -> usize {
        self.lives.iter().filter(|l| **l > 0).count()
    }

    /// Deducts lives, applying the one-time mercy rule: a player landing
    /// on exactly 3 lives for the first time rerolls them to 1..=6.
    fn lose_lives(&mut self, seat: usize, n: u8, rng: &mut GameRng) {
        self.lives[seat] = self.lives[seat].saturating_sub(n);
        if self.lives[seat] == 3 && !self.mercy_used[seat] {
            self.mercy_used[seat] = true;
            self.lives[seat] = rng.roll_die();
        }
    }

    fn advance_turn(&mut self, rng: &mut GameRng) {
        self.turn = self.next_alive(self.turn);
        self.turn_count += 1;
        self.current_roll = Roll::random(rng);
    }

    fn begin_round(&mut self, rng: &mut GameRng) {
        if !self.alive(self.next_starter) {
            self.next_starter = self.next_alive(self.next_starter);
        }
        self.round_starter = self.next_starter;
        self.turn = self.next_starter;
        self.turn_count = 1;
        self.current_roll = Roll::random(rng);
        self.declared_blind = false;
        self.declared = None;
        self.declarer = None;
        self.declarer_roll = None;
        self.cheers_roller = None;
        self.last_check = None;
        self.phase = MeyerPhase::Playing;
    }

    fn maybe_finish(&mut self) {
        if self.alive_count() <= 1 {
            self.phase = MeyerPhase::GameOver;
            self.winner = self.lives.iter().position(|l| *l > 0);
        }
    }
}

/// What one seat is allowed to see.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeyerView {
    pub phase: MeyerPhase,
    pub seat: usize,
    pub lives: Vec<u8>,
    pub turn: usize,
    pub turn_count: u32,
    pub declared: Option<Roll>,
    pub declarer: Option<usize>,
    /// Your own roll, present only on your turn.
    pub your_roll: Option<Roll>,
    /// The standing declaration was passed on blind.
    pub declared_blind: bool,
    pub round_starter: usize,
    pub cheers_roller: Option<usize>,
    pub last_check: Option<CheckResult>,
    pub winner: Option<usize>,
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

pub struct Meyer;

impl Meyer {
    fn check_floor(state: &MeyerState, declared: Roll) -> Result<(), String> {
        match state.declared {
            Some(floor) if declared.rank() < floor.rank() => Err(format!(
                "declaration {declared} is below the standing {floor}"
            )),
            _ => Ok(()),
        }
    }
}

impl TableGame for Meyer {
    type Config = MeyerConfig;
    type State = MeyerState;
    type Action = MeyerAction;
    type View = MeyerView;

    fn init(config: &MeyerConfig, players: &[PlayerId], rng: &mut GameRng) -> MeyerState {
        let n = players.len();
        let mut state = MeyerState {
            phase: MeyerPhase::Playing,
            lives: vec![config.starting_lives; n],
            mercy_used: vec![false; n],
            turn: 0,
            turn_count: 1,
            current_roll: Roll::CHEERS,
            declared_blind: false,
            declared: None,
            declarer: None,
            declarer_roll: None,
            round_starter: 0,
            next_starter: 0,
            cheers_roller: None,
            last_check: None,
            winner: None,
        };
        state.begin_round(rng);
        state
    }

    fn validate(state: &MeyerState, seat: usize, action: &MeyerAction) -> Result<(), String> {
        match action {
            MeyerAction::NextRound => {
                if !matches!(
                    state.phase,
                    MeyerPhase::CheckDone | MeyerPhase::RollOfCheers
                ) {
                    return Err("no round to start".to_string());
                }
                if seat != 0 {
                    return Err("only the host starts the next round".to_string());
                }
                Ok(())
            }
            _ => {
                if state.phase != MeyerPhase::Playing {
                    return Err("the round is not in play".to_string());
                }
                if seat != state.turn {
                    return Err("not your turn".to_string());
                }
                match action {
                    MeyerAction::Truth => Self::check_floor(state, state.current_roll),
                    MeyerAction::Bluff { declared } => {
                        if !declared.is_canonical() {
                            return Err(format!("{declared} is not a valid roll"));
                        }
                        Self::check_floor(state, *declared)
                    }
                    MeyerAction::SameOrHigher => {
                        if state.declared.is_none() {
                            return Err("cannot pass on the first turn of a round".to_string());
                        }
                        Ok(())
                    }
                    MeyerAction::Check => {
                        if state.declared.is_none() {
                            return Err("nothing to check on the first turn".to_string());
                        }
                        Ok(())
                    }
                    MeyerAction::NextRound => unreachable!(),
                }
            }
        }
    }

    fn apply(state: &mut MeyerState, seat: usize, action: MeyerAction, rng: &mut GameRng) {
        match action {
            MeyerAction::Truth => {
                if state.current_roll == Roll::CHEERS {
                    // Round ends on the spot: roller starts the next
                    // round, nobody loses a life.
                    state.cheers_roller = Some(seat);
                    state.next_starter = seat;
                    state.phase = MeyerPhase::RollOfCheers;
                    return;
                }
                state.declared = Some(state.current_roll);
                state.declarer = Some(seat);
                state.declarer_roll = Some(state.current_roll);
                state.declared_blind = false;
                state.advance_turn(rng);
            }
            MeyerAction::Bluff { declared } => {
                state.declared = Some(declared);
                state.declarer = Some(seat);
                state.declarer_roll = Some(state.current_roll);
                state.declared_blind = false;
                state.advance_turn(rng);
            }
            MeyerAction::SameOrHigher => {
                // The standing declaration carries over as this player's
                // implicit claim, backed by a roll nobody has seen.
                let blind = Roll::random(rng);
                state.declarer = Some(seat);
                state.declarer_roll = Some(blind);
                state.declared_blind = true;
                state.advance_turn(rng);
            }
            MeyerAction::Check => {
                let declared = state.declared.expect("validated");
                let declarer = state.declarer.expect("validated");
                let actual = state.declarer_roll.expect("validated");

                // Truthful or underclaimed: the checker pays. A bluff
                // that fell short: the declarer pays. A declared Meyer
                // doubles the price.
                let loser = if actual.rank() >= declared.rank() {
                    seat
                } else {
                    declarer
                };
                let lives_lost = if declared == Roll::MEYER { 2 } else { 1 };
                state.lose_lives(loser, lives_lost, rng);

                state.last_check = Some(CheckResult {
                    checker: seat,
                    declarer,
                    declared,
                    actual,
                    loser,
                    lives_lost,
                });
                state.next_starter = loser;
                state.phase = MeyerPhase::CheckDone;
                state.maybe_finish();
            }
            MeyerAction::NextRound => {
                state.begin_round(rng);
            }
        }
    }

    fn view(state: &MeyerState, seat: usize) -> MeyerView {
        let your_roll =
            (state.phase == MeyerPhase::Playing && seat == state.turn).then_some(state.current_roll);
        MeyerView {
            phase: state.phase,
            seat,
            lives: state.lives.clone(),
            turn: state.turn,
            turn_count: state.turn_count,
            declared: state.declared,
            declarer: state.declarer,
            your_roll,
            declared_blind: state.declared_blind,
            round_starter: state.round_starter,
            cheers_roller: state.cheers_roller,
            last_check: state.last_check,
            winner: state.winner,
        }
    }

    fn is_over(state: &MeyerState) -> bool {
        state.phase == MeyerPhase::GameOver
    }

    fn table() -> TableConfig {
        TableConfig {
            min_players: 2,
            max_players: 6,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn players(n: usize) -> Vec<PlayerId> {
        (0..n as u64).map(PlayerId).collect()
    }

    fn fresh(n: usize) -> (MeyerState, GameRng) {
        let mut rng = GameRng::new(42);
        let state = Meyer::init(&MeyerConfig::default(), &players(n), &mut rng);
        (state, rng)
    }

    /// Forces the current player's roll so scenarios are exact.
    fn set_roll(state: &mut MeyerState, roll: Roll) {
        state.current_roll = roll;
    }

    fn must_apply(state: &mut MeyerState, seat: usize, action: MeyerAction, rng: &mut GameRng) {
        Meyer::validate(state, seat, &action).expect("action should be legal");
        Meyer::apply(state, seat, action, rng);
    }

    // --- ranking -----------------------------------------------------------

    #[test]
    fn test_rank_is_a_strict_total_order() {
        let rolls = all_canonical_rolls();
        assert_eq!(rolls.len(), 21);
        let mut ranks: Vec<u8> = rolls.iter().map(Roll::rank).collect();
        ranks.sort_unstable();
        ranks.dedup();
        assert_eq!(ranks.len(), 21, "no two canonical rolls may tie");
    }

    #[test]
    fn test_rank_ordering_specials_pairs_ordinary() {
        let r = |a, b| Roll::new(a, b).rank();
        // Cheers > Meyer > Little Meyer.
        assert!(r(3, 2) > r(2, 1));
        assert!(r(2, 1) > r(3, 1));
        // Little Meyer above every pair.
        assert!(r(3, 1) > r(6, 6));
        // Pairs descend and all beat ordinary rolls.
        assert!(r(6, 6) > r(5, 5));
        assert!(r(1, 1) > r(6, 5));
        // Ordinary rolls descend lexicographically to 4-1, the floor.
        assert!(r(6, 5) > r(6, 4));
        assert!(r(5, 1) > r(4, 3));
        assert!(all_canonical_rolls()
            .iter()
            .all(|roll| roll.rank() >= r(4, 1)));
    }

    #[test]
    fn test_roll_canonicalizes() {
        assert_eq!(Roll::new(2, 5), Roll { high: 5, low: 2 });
        assert!(!Roll { high: 2, low: 5 }.is_canonical());
        assert!(!Roll { high: 7, low: 1 }.is_canonical());
    }

    // --- declarations ------------------------------------------------------

    #[test]
    fn test_truth_legal_iff_meets_floor_or_first_turn() {
        let (mut state, _rng) = fresh(2);

        // First turn: any truth is legal.
        set_roll(&mut state, Roll::new(4, 1));
        assert!(Meyer::validate(&state, state.turn, &MeyerAction::Truth).is_ok());

        // With a standing 5-5, truth on 4-1 is illegal, truth on 6-6 legal.
        state.declared = Some(Roll::new(5, 5));
        assert!(Meyer::validate(&state, state.turn, &MeyerAction::Truth).is_err());
        set_roll(&mut state, Roll::new(6, 6));
        assert!(Meyer::validate(&state, state.turn, &MeyerAction::Truth).is_ok());
    }

    #[test]
    fn test_truth_sets_declaration_and_passes_turn() {
        let (mut state, mut rng) = fresh(3);
        let first = state.turn;
        set_roll(&mut state, Roll::new(5, 4));

        must_apply(&mut state, first, MeyerAction::Truth, &mut rng);

        assert_eq!(state.declared, Some(Roll::new(5, 4)));
        assert_eq!(state.declarer, Some(first));
        assert_eq!(state.turn, (first + 1) % 3);
        assert_eq!(state.turn_count, 2);
    }

    #[test]
    fn test_truthful_roll_of_cheers_ends_round_without_life_loss() {
        // 2 players, P0 rolls 3-2 on turn 1 and calls truth.
        let (mut state, mut rng) = fresh(2);
        let lives_before = state.lives.clone();
        set_roll(&mut state, Roll::CHEERS);

        must_apply(&mut state, 0, MeyerAction::Truth, &mut rng);

        assert_eq!(state.phase, MeyerPhase::RollOfCheers);
        assert_eq!(state.cheers_roller, Some(0));
        assert_eq!(state.next_starter, 0);
        assert_eq!(state.lives, lives_before);

        // Host starts the next round; the roller leads it.
        must_apply(&mut state, 0, MeyerAction::NextRound, &mut rng);
        assert_eq!(state.phase, MeyerPhase::Playing);
        assert_eq!(state.round_starter, 0);
        assert_eq!(state.declared, None);
    }

    #[test]
    fn test_bluff_below_floor_rejected() {
        let (mut state, _rng) = fresh(2);
        state.declared = Some(Roll::new(6, 6));
        let result = Meyer::validate(
            &state,
            state.turn,
            &MeyerAction::Bluff {
                declared: Roll::new(6, 5),
            },
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_bluff_keeps_actual_roll_for_checks() {
        let (mut state, mut rng) = fresh(2);
        set_roll(&mut state, Roll::new(4, 1));

        must_apply(
            &mut state,
            0,
            MeyerAction::Bluff {
                declared: Roll::new(6, 6),
            },
            &mut rng,
        );

        assert_eq!(state.declared, Some(Roll::new(6, 6)));
        assert_eq!(state.declarer_roll, Some(Roll::new(4, 1)));
    }

    #[test]
    fn test_non_canonical_bluff_rejected() {
        let (state, _rng) = fresh(2);
        let result = Meyer::validate(
            &state,
            state.turn,
            &MeyerAction::Bluff {
                declared: Roll { high: 2, low: 5 },
            },
        );
        assert!(result.is_err());
    }

    // --- same or higher ----------------------------------------------------

    #[test]
    fn test_same_or_higher_illegal_on_first_turn() {
        let (state, _rng) = fresh(2);
        assert!(Meyer::validate(&state, state.turn, &MeyerAction::SameOrHigher).is_err());
    }

    #[test]
    fn test_same_or_higher_carries_declaration_to_new_declarer() {
        let (mut state, mut rng) = fresh(3);
        set_roll(&mut state, Roll::new(5, 4));
        must_apply(&mut state, 0, MeyerAction::Truth, &mut rng);

        must_apply(&mut state, 1, MeyerAction::SameOrHigher, &mut rng);

        // The claim is unchanged but now backed by seat 1's blind roll.
        assert_eq!(state.declared, Some(Roll::new(5, 4)));
        assert_eq!(state.declarer, Some(1));
        assert!(state.declarer_roll.is_some());
        assert!(state.declared_blind);
        assert_eq!(state.turn, 2);
    }

    // --- checks ------------------------------------------------------------

    #[test]
    fn test_check_illegal_on_first_turn() {
        let (state, _rng) = fresh(2);
        assert!(Meyer::validate(&state, state.turn, &MeyerAction::Check).is_err());
    }

    #[test]
    fn test_check_against_truthful_declaration_costs_checker() {
        let (mut state, mut rng) = fresh(2);
        set_roll(&mut state, Roll::new(6, 4));
        must_apply(&mut state, 0, MeyerAction::Truth, &mut rng);

        must_apply(&mut state, 1, MeyerAction::Check, &mut rng);

        let result = state.last_check.unwrap();
        assert_eq!(result.loser, 1);
        assert_eq!(result.lives_lost, 1);
        assert_eq!(state.lives, vec![6, 5]);
        assert_eq!(state.phase, MeyerPhase::CheckDone);
        assert_eq!(state.next_starter, 1, "the loser starts the next round");
    }

    #[test]
    fn test_check_against_failed_bluff_costs_declarer() {
        let (mut state, mut rng) = fresh(2);
        set_roll(&mut state, Roll::new(4, 1));
        must_apply(
            &mut state,
            0,
            MeyerAction::Bluff {
                declared: Roll::new(6, 6),
            },
            &mut rng,
        );

        must_apply(&mut state, 1, MeyerAction::Check, &mut rng);

        let result = state.last_check.unwrap();
        assert_eq!(result.loser, 0);
        assert_eq!(result.actual, Roll::new(4, 1));
        assert_eq!(state.lives, vec![5, 6]);
    }

    #[test]
    fn test_underclaim_still_costs_checker() {
        // Actual 6-6 declared as 5-5: actual ranks above the claim, so
        // the check fails.
        let (mut state, mut rng) = fresh(2);
        set_roll(&mut state, Roll::new(6, 6));
        must_apply(
            &mut state,
            0,
            MeyerAction::Bluff {
                declared: Roll::new(5, 5),
            },
            &mut rng,
        );

        must_apply(&mut state, 1, MeyerAction::Check, &mut rng);

        assert_eq!(state.last_check.unwrap().loser, 1);
    }

    #[test]
    fn test_losing_to_declared_meyer_costs_two_lives() {
        let (mut state, mut rng) = fresh(2);
        set_roll(&mut state, Roll::MEYER);
        must_apply(&mut state, 0, MeyerAction::Truth, &mut rng);

        must_apply(&mut state, 1, MeyerAction::Check, &mut rng);

        let result = state.last_check.unwrap();
        assert_eq!(result.lives_lost, 2);
        assert_eq!(state.lives, vec![6, 4]);
    }

    #[test]
    fn test_mercy_rule_rerolls_once_at_exactly_three() {
        let (mut state, mut rng) = fresh(2);
        state.lives = vec![6, 4];

        state.lose_lives(1, 1, &mut rng);
        assert!(state.mercy_used[1]);
        assert!((1..=6).contains(&state.lives[1]));

        // Second landing on 3 does not reroll.
        state.lives[1] = 4;
        state.lose_lives(1, 1, &mut rng);
        assert_eq!(state.lives[1], 3);
    }

    #[test]
    fn test_mercy_rule_skipped_when_jumping_past_three() {
        let (mut state, mut rng) = fresh(2);
        state.lives = vec![6, 4];

        // Meyer loss: 4 -> 2, never exactly 3.
        state.lose_lives(1, 2, &mut rng);
        assert_eq!(state.lives[1], 2);
        assert!(!state.mercy_used[1]);
    }

    #[test]
    fn test_elimination_and_game_over() {
        let (mut state, mut rng) = fresh(2);
        state.lives = vec![6, 1];
        state.mercy_used = vec![true, true];
        set_roll(&mut state, Roll::new(6, 5));
        must_apply(&mut state, 0, MeyerAction::Truth, &mut rng);

        must_apply(&mut state, 1, MeyerAction::Check, &mut rng);

        assert_eq!(state.lives, vec![6, 0]);
        assert_eq!(state.phase, MeyerPhase::GameOver);
        assert_eq!(state.winner, Some(0));
        assert!(Meyer::is_over(&state));
    }

    #[test]
    fn test_eliminated_seats_are_skipped() {
        let (mut state, mut rng) = fresh(3);
        state.lives = vec![4, 0, 4];
        state.mercy_used = vec![true, true, true];
        state.next_starter = 0;
        state.begin_round(&mut rng);
        set_roll(&mut state, Roll::new(6, 5));

        must_apply(&mut state, 0, MeyerAction::Truth, &mut rng);

        assert_eq!(state.turn, 2, "seat 1 is eliminated and skipped");
    }

    // --- rejection semantics -----------------------------------------------

    #[test]
    fn test_out_of_turn_rejected_without_mutation() {
        let (state, _rng) = fresh(3);
        let other = (state.turn + 1) % 3;
        let before = state.clone();

        assert!(Meyer::validate(&state, other, &MeyerAction::Truth).is_err());
        assert_eq!(state, before);
    }

    #[test]
    fn test_next_round_host_only() {
        let (mut state, mut rng) = fresh(2);
        set_roll(&mut state, Roll::new(6, 4));
        must_apply(&mut state, 0, MeyerAction::Truth, &mut rng);
        must_apply(&mut state, 1, MeyerAction::Check, &mut rng);

        assert!(Meyer::validate(&state, 1, &MeyerAction::NextRound).is_err());
        assert!(Meyer::validate(&state, 0, &MeyerAction::NextRound).is_ok());
    }

    #[test]
    fn test_next_round_starts_with_loser() {
        let (mut state, mut rng) = fresh(3);
        set_roll(&mut state, Roll::new(6, 4));
        must_apply(&mut state, 0, MeyerAction::Truth, &mut rng);
        must_apply(&mut state, 1, MeyerAction::Check, &mut rng);
        let loser = state.last_check.unwrap().loser;

        must_apply(&mut state, 0, MeyerAction::NextRound, &mut rng);

        assert_eq!(state.round_starter, loser);
        assert_eq!(state.turn, loser);
        assert_eq!(state.turn_count, 1);
        assert_eq!(state.declared, None);
    }

    // --- views -------------------------------------------------------------

    #[test]
    fn test_view_shows_roll_only_to_current_seat() {
        let (state, _rng) = fresh(3);
        let turn = state.turn;

        let own = Meyer::view(&state, turn);
        assert_eq!(own.your_roll, Some(state.current_roll));

        for seat in 0..3 {
            if seat != turn {
                assert_eq!(Meyer::view(&state, seat).your_roll, None);
            }
        }
    }

    #[test]
    fn test_view_reveals_actual_roll_after_check() {
        let (mut state, mut rng) = fresh(2);
        set_roll(&mut state, Roll::new(6, 4));
        must_apply(&mut state, 0, MeyerAction::Truth, &mut rng);
        must_apply(&mut state, 1, MeyerAction::Check, &mut rng);

        for seat in 0..2 {
            let view = Meyer::view(&state, seat);
            let check = view.last_check.expect("check result is public");
            assert_eq!(check.actual, Roll::new(6, 4));
        }
    }

    #[test]
    fn test_action_json_shape() {
        let action = MeyerAction::Bluff {
            declared: Roll::new(5, 5),
        };
        let json = serde_json::to_value(&action).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"type": "bluff", "declared": {"high": 5, "low": 5}})
        );

        let parsed: MeyerAction = serde_json::from_str(r#"{"type":"check"}"#).unwrap();
        assert_eq!(parsed, MeyerAction::Check);
    }
}
