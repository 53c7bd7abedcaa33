// One hand (mão): up to three tricks plus the truco escalation bookkeeping.
// Pure state and decision tables; the driving I/O lives in the match engine.

use crate::api::TrucoResponse;
use crate::types::{Card, Team, TeamPoint};

// A hand is never worth more than 12 points, and no escalation is possible
// once it is.
pub const MAXIMUM_MAO_VALUE: u32 = 12;

pub struct Mao {
    // Current point worth of the hand: 1, then 3, 6, 9, 12.
    pub value: u32,

    pub vira: Card,

    // Results of the tricks resolved so far, in play order.
    pub point_list: Vec<TeamPoint>,

    // The team that must answer the outstanding (or most recent) escalation.
    // A team may not raise while the other side has an unanswered turn.
    pub truco_turn: Option<Team>,

    // True while an escalation awaits an answer; tells the addressed client
    // that the next input request expects a truco response.
    pub truco_pending: bool,

    pub refused: bool,

    // Face-down plays are only allowed after a decisive first trick.
    pub can_hide: bool,
}

impl Mao {
    pub fn new(vira: Card) -> Self {
        Mao {
            value: 1,
            vira,
            point_list: Vec::with_capacity(3),
            truco_turn: None,
            truco_pending: false,
            refused: false,
            can_hide: false,
        }
    }

    // Whether the given team is entitled to call truco right now.
    pub fn can_truco(&self, team: Team) -> bool {
        self.value < MAXIMUM_MAO_VALUE && self.truco_turn.map_or(true, |turn| turn == team)
    }

    // Raises the hand to its next worth on the 1, 3, 6, 9, 12 ladder.
    pub fn promote(&mut self) {
        self.value = promoted_value(self.value);
    }
}

pub fn promoted_value(value: u32) -> u32 {
    if value == 1 {
        3
    } else {
        (value + 3).min(MAXIMUM_MAO_VALUE)
    }
}

// A re-raise answered when the next promotion already reaches the cap is
// downgraded to an accept; there is nothing left to raise to, so the answer
// turn must not flip back.
pub fn clamped_response(response: TrucoResponse, value: u32) -> TrucoResponse {
    if response == TrucoResponse::Raise && promoted_value(value) >= MAXIMUM_MAO_VALUE {
        TrucoResponse::Accept
    } else {
        response
    }
}

// The best-of-three decision table over recorded trick results. Returns None
// while the hand is still undecided. When all three tricks draw, the hand
// goes to the dealer's team (the traditional rule).
pub fn mao_winner(points: &[TeamPoint], shuffler_team: Team) -> Option<TeamPoint> {
    use TeamPoint::Draw;

    match points {
        [first, second] => match (first, second) {
            (Draw, Draw) => None,
            (Draw, decisive) => Some(*decisive),
            (decisive, Draw) => Some(*decisive),
            (first, second) if first == second => Some(*first),
            // Split tricks: the third decides.
            _ => None,
        },
        [first, second, third] => {
            if *third != Draw {
                Some(*third)
            } else if *first != Draw {
                // Win, loss, draw: the first trick's winner completes the
                // best of three.
                Some(*first)
            } else if *second != Draw {
                Some(*second)
            } else {
                Some(shuffler_team.into())
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CardSuit, CardValue};

    fn mao() -> Mao {
        Mao::new(Card::new(CardValue::Four, CardSuit::Hearts))
    }

    #[test]
    fn value_ladder_runs_one_three_six_nine_twelve() {
        let mut mao = mao();
        let mut seen = vec![mao.value];
        for _ in 0..6 {
            mao.promote();
            seen.push(mao.value);
        }

        // Capped at 12 no matter how often it is promoted.
        assert_eq!(seen, vec![1, 3, 6, 9, 12, 12, 12]);
    }

    #[test]
    fn no_escalation_is_legal_at_the_cap() {
        let mut mao = mao();
        while mao.value < MAXIMUM_MAO_VALUE {
            mao.promote();
        }

        assert!(!mao.can_truco(Team::Red));
        assert!(!mao.can_truco(Team::Blue));
    }

    #[test]
    fn only_the_answering_team_may_re_raise() {
        let mut mao = mao();
        assert!(mao.can_truco(Team::Red));
        assert!(mao.can_truco(Team::Blue));

        // Red called; blue holds the answer turn.
        mao.truco_turn = Some(Team::Blue);
        assert!(!mao.can_truco(Team::Red));
        assert!(mao.can_truco(Team::Blue));
    }

    #[test]
    fn raises_downgrade_to_accepts_at_the_top_of_the_ladder() {
        // Below 9 a raise stands.
        assert_eq!(clamped_response(TrucoResponse::Raise, 1), TrucoResponse::Raise);
        assert_eq!(clamped_response(TrucoResponse::Raise, 6), TrucoResponse::Raise);

        // At 9 the next promotion is already 12, so the raise becomes an
        // accept.
        assert_eq!(clamped_response(TrucoResponse::Raise, 9), TrucoResponse::Accept);
        assert_eq!(clamped_response(TrucoResponse::Raise, 12), TrucoResponse::Accept);

        // Other answers pass through untouched.
        assert_eq!(clamped_response(TrucoResponse::Accept, 9), TrucoResponse::Accept);
        assert_eq!(clamped_response(TrucoResponse::Refuse, 9), TrucoResponse::Refuse);
    }

    #[test]
    fn one_trick_never_decides_a_hand() {
        assert_eq!(mao_winner(&[TeamPoint::Red], Team::Red), None);
        assert_eq!(mao_winner(&[TeamPoint::Draw], Team::Red), None);
    }

    #[test]
    fn two_trick_decisions() {
        use TeamPoint::*;

        // A draw then a win goes to the winner.
        assert_eq!(mao_winner(&[Draw, Blue], Team::Red), Some(Blue));
        // A win then a draw goes to the first winner.
        assert_eq!(mao_winner(&[Red, Draw], Team::Red), Some(Red));
        // Two wins for the same team.
        assert_eq!(mao_winner(&[Blue, Blue], Team::Red), Some(Blue));
        // Split tricks stay open.
        assert_eq!(mao_winner(&[Red, Blue], Team::Red), None);
        // Two draws stay open.
        assert_eq!(mao_winner(&[Draw, Draw], Team::Red), None);
    }

    #[test]
    fn third_trick_decisions() {
        use TeamPoint::*;

        // A decisive third trick wins outright.
        assert_eq!(mao_winner(&[Red, Blue, Blue], Team::Red), Some(Blue));
        assert_eq!(mao_winner(&[Draw, Draw, Red], Team::Blue), Some(Red));
        // Win, loss, draw falls back to the first trick's winner.
        assert_eq!(mao_winner(&[Red, Blue, Draw], Team::Blue), Some(Red));
        // Three draws go to the dealer's team.
        assert_eq!(mao_winner(&[Draw, Draw, Draw], Team::Blue), Some(Blue));
        assert_eq!(mao_winner(&[Draw, Draw, Draw], Team::Red), Some(Red));
    }
}
