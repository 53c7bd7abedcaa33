// Datatypes shared by the engine and the server API: teams, card values, suits
// and the card itself. Card ranking is relative to the current vira, so it is
// an explicit function of both rather than an ambient comparison.

use serde::{Deserialize, Serialize};

// A playing side. Seats 0 and 2 are red, seats 1 and 3 are blue.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Team {
    Red,
    Blue,
}

impl Team {
    pub fn from_position(position: usize) -> Self {
        if position % 2 == 0 {
            Team::Red
        } else {
            Team::Blue
        }
    }

    pub fn opponent(self) -> Self {
        match self {
            Team::Red => Team::Blue,
            Team::Blue => Team::Red,
        }
    }
}

// The outcome of a trick or hand. Serialized as 0/1/2 on the wire, matching
// the client's colour table.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum TeamPoint {
    Red = 0,
    Blue = 1,
    Draw = 2,
}

impl From<Team> for TeamPoint {
    fn from(team: Team) -> Self {
        match team {
            Team::Red => TeamPoint::Red,
            Team::Blue => TeamPoint::Blue,
        }
    }
}

impl From<TeamPoint> for u8 {
    fn from(point: TeamPoint) -> Self {
        point as u8
    }
}

impl TryFrom<u8> for TeamPoint {
    type Error = String;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        match raw {
            0 => Ok(TeamPoint::Red),
            1 => Ok(TeamPoint::Blue),
            2 => Ok(TeamPoint::Draw),
            other => Err(format!("unknown team point {}", other)),
        }
    }
}

// Card faces in ascending truco strength. Serialized as 0..9 on the wire.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum CardValue {
    Four = 0,
    Five = 1,
    Six = 2,
    Seven = 3,
    Queen = 4,
    Jack = 5,
    King = 6,
    Ace = 7,
    Two = 8,
    Three = 9,
}

// All faces, indexed by their wire value. Used for the wrap-around manilha
// derivation (the value one above the vira, with 3 wrapping to 4).
pub const CARD_VALUES: [CardValue; 10] = [
    CardValue::Four,
    CardValue::Five,
    CardValue::Six,
    CardValue::Seven,
    CardValue::Queen,
    CardValue::Jack,
    CardValue::King,
    CardValue::Ace,
    CardValue::Two,
    CardValue::Three,
];

impl CardValue {
    // The trump value implied by a given vira value.
    pub fn manilha_for(vira: CardValue) -> CardValue {
        CARD_VALUES[(vira as usize + 1) % CARD_VALUES.len()]
    }
}

impl From<CardValue> for u8 {
    fn from(value: CardValue) -> Self {
        value as u8
    }
}

impl TryFrom<u8> for CardValue {
    type Error = String;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        CARD_VALUES
            .get(raw as usize)
            .copied()
            .ok_or_else(|| format!("unknown card value {}", raw))
    }
}

// Suits in ascending manilha strength. Serialized as 0..3 on the wire.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum CardSuit {
    Diamonds = 0,
    Spades = 1,
    Hearts = 2,
    Clubs = 3,
}

pub const CARD_SUITS: [CardSuit; 4] = [
    CardSuit::Diamonds,
    CardSuit::Spades,
    CardSuit::Hearts,
    CardSuit::Clubs,
];

impl From<CardSuit> for u8 {
    fn from(suit: CardSuit) -> Self {
        suit as u8
    }
}

impl TryFrom<u8> for CardSuit {
    type Error = String;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        CARD_SUITS
            .get(raw as usize)
            .copied()
            .ok_or_else(|| format!("unknown card suit {}", raw))
    }
}

// A single card. The hidden flag is set when a player plays the card face
// down; it never transitions back.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Card {
    pub value: CardValue,
    pub suit: CardSuit,
    pub hidden: bool,
}

impl Card {
    pub fn new(value: CardValue, suit: CardSuit) -> Self {
        Card {
            value,
            suit,
            hidden: false,
        }
    }

    pub fn hide(&mut self) {
        self.hidden = true;
    }

    // Strength of this card under the given vira. Hidden cards rank 0, below
    // everything; manilhas rank above every plain card and order by suit.
    pub fn rank(&self, vira: &Card) -> u8 {
        if self.hidden {
            return 0;
        }

        let base = if self.value == CardValue::manilha_for(vira.value) {
            10 + self.suit as u8
        } else {
            self.value as u8
        };

        1 + base
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vira(value: CardValue) -> Card {
        Card::new(value, CardSuit::Hearts)
    }

    #[test]
    fn manilha_derivation_wraps() {
        assert_eq!(CardValue::manilha_for(CardValue::Four), CardValue::Five);
        assert_eq!(CardValue::manilha_for(CardValue::Ace), CardValue::Two);
        // 3 is the top face, so its successor wraps to 4.
        assert_eq!(CardValue::manilha_for(CardValue::Three), CardValue::Four);
    }

    #[test]
    fn plain_cards_rank_in_face_order() {
        // Vira of 4 makes 5 the manilha; everything else ranks by face.
        let vira = vira(CardValue::Four);
        let order = [
            CardValue::Four,
            CardValue::Six,
            CardValue::Seven,
            CardValue::Queen,
            CardValue::Jack,
            CardValue::King,
            CardValue::Ace,
            CardValue::Two,
            CardValue::Three,
        ];

        for pair in order.windows(2) {
            let lower = Card::new(pair[0], CardSuit::Clubs);
            let higher = Card::new(pair[1], CardSuit::Diamonds);
            assert!(
                lower.rank(&vira) < higher.rank(&vira),
                "{:?} should rank below {:?}",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn manilhas_outrank_all_plain_cards() {
        let vira = vira(CardValue::Two);
        let manilha = Card::new(CardValue::Three, CardSuit::Diamonds);
        let best_plain = Card::new(CardValue::Two, CardSuit::Clubs);

        assert!(manilha.rank(&vira) > best_plain.rank(&vira));
    }

    #[test]
    fn manilhas_order_by_suit() {
        let vira = vira(CardValue::Six);
        let ranks: Vec<u8> = [
            CardSuit::Diamonds,
            CardSuit::Spades,
            CardSuit::Hearts,
            CardSuit::Clubs,
        ]
        .iter()
        .map(|&suit| Card::new(CardValue::Seven, suit).rank(&vira))
        .collect();

        for pair in ranks.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn hidden_cards_rank_lowest() {
        let vira = vira(CardValue::Two);
        let mut card = Card::new(CardValue::Three, CardSuit::Clubs);
        assert!(card.rank(&vira) > 0);

        card.hide();
        assert_eq!(card.rank(&vira), 0);
        assert!(card.rank(&vira) < Card::new(CardValue::Four, CardSuit::Diamonds).rank(&vira));
    }

    #[test]
    fn teams_come_from_seat_parity() {
        assert_eq!(Team::from_position(0), Team::Red);
        assert_eq!(Team::from_position(1), Team::Blue);
        assert_eq!(Team::from_position(2), Team::Red);
        assert_eq!(Team::from_position(3), Team::Blue);
        assert_eq!(Team::Red.opponent(), Team::Blue);
    }
}
