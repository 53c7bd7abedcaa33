// One trick (vaza): a single circuit in which each seat plays one card. Pure
// state, no I/O; the engine feeds it plays and reads the running result.

use crate::engine::MAXIMUM_PLAYERS;
use crate::types::{Card, Team, TeamPoint};

pub struct Vaza {
    // The seat that leads this trick.
    pub first_player_number: usize,

    // The seat currently holding the best card. Equal ranks move the holder
    // without changing the best card, so a drawn trick still passes the next
    // lead to the later player.
    pub best_player_number: usize,

    // One slot per seat; None until that seat has played.
    pub card_list: [Option<Card>; MAXIMUM_PLAYERS],

    pub result: TeamPoint,

    best_card: Option<Card>,
}

impl Vaza {
    pub fn new(first_player_number: usize) -> Self {
        Vaza {
            first_player_number,
            best_player_number: first_player_number,
            card_list: [None; MAXIMUM_PLAYERS],
            result: TeamPoint::Draw,
            best_card: None,
        }
    }

    // The seat that acts on the given turn of this trick.
    pub fn seat_for_turn(&self, turn: usize) -> usize {
        (self.first_player_number + turn) % MAXIMUM_PLAYERS
    }

    // Records a play and recomputes the running best card and result.
    pub fn record_play(&mut self, seat: usize, card: Card, vira: &Card) {
        self.card_list[seat] = Some(card);

        let Some(best) = self.best_card else {
            // First play trivially leads.
            self.best_player_number = seat;
            self.best_card = Some(card);
            self.result = Team::from_position(seat).into();
            return;
        };

        if best.rank(vira) > card.rank(vira) {
            return;
        }

        self.best_player_number = seat;
        if best.rank(vira) == card.rank(vira) {
            self.result = TeamPoint::Draw;
        } else {
            self.best_card = Some(card);
            self.result = Team::from_position(seat).into();
        }
    }
}
