// The JSON message schema spoken between the server and the card-table
// clients. Every message carries a "type" tag; unknown tags fail to
// deserialize and are reported as protocol errors by the caller.

use crate::types::{CardSuit, CardValue, TeamPoint};

use serde::{Deserialize, Serialize};

// A player's answer to a truco call, in ascending aggression. A team's
// combined answer is the maximum of its two players' answers.
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum TrucoResponse {
    Refuse = 0,
    Accept = 1,
    Raise = 2,
}

impl From<TrucoResponse> for u8 {
    fn from(response: TrucoResponse) -> Self {
        response as u8
    }
}

impl TryFrom<u8> for TrucoResponse {
    type Error = String;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        match raw {
            0 => Ok(TrucoResponse::Refuse),
            1 => Ok(TrucoResponse::Accept),
            2 => Ok(TrucoResponse::Raise),
            other => Err(format!("unknown truco response {}", other)),
        }
    }
}

// A card as it appears on the wire. Face-down cards reveal nothing but the
// hidden flag; face-up cards carry their value and suit.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(into = "CardRepr", try_from = "CardRepr")]
pub enum CardView {
    Hidden,
    Open { value: CardValue, suit: CardSuit },
}

impl From<crate::types::Card> for CardView {
    fn from(card: crate::types::Card) -> Self {
        if card.hidden {
            CardView::Hidden
        } else {
            CardView::Open {
                value: card.value,
                suit: card.suit,
            }
        }
    }
}

// Serde helper mirroring the raw JSON object for a card.
#[derive(Clone, Serialize, Deserialize)]
struct CardRepr {
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<CardValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    suit: Option<CardSuit>,
    hidden: bool,
}

impl From<CardView> for CardRepr {
    fn from(view: CardView) -> Self {
        match view {
            CardView::Hidden => CardRepr {
                value: None,
                suit: None,
                hidden: true,
            },
            CardView::Open { value, suit } => CardRepr {
                value: Some(value),
                suit: Some(suit),
                hidden: false,
            },
        }
    }
}

impl TryFrom<CardRepr> for CardView {
    type Error = String;

    fn try_from(repr: CardRepr) -> Result<Self, Self::Error> {
        if repr.hidden {
            return Ok(CardView::Hidden);
        }

        match (repr.value, repr.suit) {
            (Some(value), Some(suit)) => Ok(CardView::Open { value, suit }),
            _ => Err("face-up card missing value or suit".to_string()),
        }
    }
}

// Messages a client may send.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientMessage {
    // Connection handshake, sent once before any game traffic.
    Name { name: String },

    // Play the card at the given index of the remaining hand, optionally
    // face down.
    Draw { card: usize, hide: bool },

    // With no response: a call to escalate the hand value. With a response:
    // an answer to an opposing call.
    Truco {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        response: Option<TrucoResponse>,
    },
}

// Scoreboard portion of a status snapshot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameView {
    pub player_list: Vec<String>,
    pub red_team_score: u32,
    pub blue_team_score: u32,
}

// Current-hand portion of a status snapshot. The truco flag tells the
// addressed player that the next input request expects a truco answer rather
// than a card.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaoView {
    pub value: u32,
    pub point_list: Vec<TeamPoint>,
    pub vira: CardView,
    pub truco: bool,
    pub refused: bool,
}

// Current-trick portion of a status snapshot. The card list holds one slot
// per seat; seats that have not played yet are null.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VazaView {
    pub player_number: usize,
    pub card_list: Vec<Option<CardView>>,
}

// The addressed player's private portion of a status snapshot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerView {
    pub position: usize,
    pub card_list: Vec<CardView>,
    pub can_truco: bool,
}

// Messages the server may send.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerMessage {
    // Full personalized snapshot, broadcast at every decision point.
    Status {
        game: GameView,
        mao: MaoView,
        vaza: VazaView,
        player: PlayerView,
    },

    // Request for the addressed player to act.
    Input,

    // A trick has resolved.
    VazaWinner { winner: TeamPoint },

    // A hand has resolved.
    MaoWinner { winner: TeamPoint },

    // A team has reached the winning score and the match is over.
    MatchWinner { winner: TeamPoint },

    // The client's last message violated the current protocol state; it
    // should retry with a corrected message of the same expected kind.
    Error { message: String },
}
