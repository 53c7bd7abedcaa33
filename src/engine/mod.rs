// The match (game) engine. Owns the deck and the four player sessions and
// drives hands, tricks and the truco escalation protocol sequentially: at any
// moment exactly one player is awaited for input, so turn order is strict by
// construction.

pub mod mao;
pub mod vaza;

use crate::api::{
    CardView, ClientMessage, GameView, MaoView, PlayerView, ServerMessage, TrucoResponse, VazaView,
};
use crate::deck::Deck;
use crate::error::GameError;
use crate::session::PlayerSession;
use crate::types::{Team, TeamPoint};

use self::mao::{clamped_response, mao_winner, Mao};
use self::vaza::Vaza;

use std::time::Duration;

use log::{debug, info, warn};
use rand::Rng;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::time::sleep;

pub const MAXIMUM_PLAYERS: usize = 4;
pub const MAXIMUM_SCORE: u32 = 12;

const CARDS_PER_HAND: usize = 3;

// How one player's turn ended.
enum TurnOutcome {
    Played,
    // An escalation was refused or a player folded; the named team takes the
    // hand.
    Refused(Team),
}

// How one trick ended. A refusal remembers the seat whose decision ended the
// hand, so the final snapshot points at the right player.
enum VazaOutcome {
    Resolved(TeamPoint),
    Refused { winner: Team, seat: usize },
}

pub struct Game<S> {
    // Sessions indexed by seat.
    players: Vec<PlayerSession<S>>,
    deck: Deck,

    red_team_score: u32,
    blue_team_score: u32,

    // The dealing seat; rotates one to the left each hand.
    shuffler_number: usize,

    pace: Duration,
    input_timeout: Duration,
}

impl<S> Game<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(players: Vec<PlayerSession<S>>) -> Self {
        debug_assert!(players.len() == MAXIMUM_PLAYERS);

        Game {
            players,
            deck: Deck::new(),
            red_team_score: 0,
            blue_team_score: 0,
            shuffler_number: rand::thread_rng().gen_range(0..MAXIMUM_PLAYERS),
            pace: Duration::from_secs(3),
            input_timeout: Duration::from_secs(120),
        }
    }

    pub fn with_pace(mut self, pace: Duration) -> Self {
        self.pace = pace;
        self
    }

    pub fn with_input_timeout(mut self, input_timeout: Duration) -> Self {
        self.input_timeout = input_timeout;
        self
    }

    // Fixes the first dealer. Seats still rotate from there; intended for
    // deterministic tests.
    pub fn with_shuffler(mut self, shuffler_number: usize) -> Self {
        self.shuffler_number = shuffler_number % MAXIMUM_PLAYERS;
        self
    }

    pub fn scores(&self) -> (u32, u32) {
        (self.red_team_score, self.blue_team_score)
    }

    // Plays hands until one team reaches the winning score, then announces
    // the match winner. Fatal errors abort the whole match.
    pub async fn run(&mut self) -> Result<TeamPoint, GameError> {
        let names: Vec<&str> = self.players.iter().map(|p| p.name.as_str()).collect();
        info!("Match starting with table {:?}.", names);

        while self.red_team_score < MAXIMUM_SCORE && self.blue_team_score < MAXIMUM_SCORE {
            let (winner, value) = self.run_mao().await?;

            match winner {
                TeamPoint::Red => self.red_team_score += value,
                TeamPoint::Blue => self.blue_team_score += value,
                // An undecided hand scores nothing.
                TeamPoint::Draw => {}
            }
            info!(
                "Mao finished: {:?} takes {} points (red {}, blue {}).",
                winner, value, self.red_team_score, self.blue_team_score
            );

            self.broadcast(&ServerMessage::MaoWinner { winner }).await?;
            sleep(self.pace).await;

            self.shuffler_number = (self.shuffler_number + 1) % MAXIMUM_PLAYERS;
        }

        let winner = if self.red_team_score >= MAXIMUM_SCORE {
            TeamPoint::Red
        } else {
            TeamPoint::Blue
        };
        info!("Match over: {:?} wins.", winner);
        self.broadcast(&ServerMessage::MatchWinner { winner }).await?;

        Ok(winner)
    }

    // Tells every reachable player the match is over. Used on fatal errors;
    // individual send failures are expected here and ignored.
    pub async fn abort(&mut self, reason: &str) {
        let message = ServerMessage::Error {
            message: format!("match aborted: {}", reason),
        };

        for player in &mut self.players {
            if player.send(&message).await.is_err() {
                debug!("[client {}] unreachable during abort.", player.id);
            }
        }
    }

    // Deals and plays one hand to its conclusion. Returns the winning side
    // and the hand's final point worth.
    async fn run_mao(&mut self) -> Result<(TeamPoint, u32), GameError> {
        // 3 cards to each seat plus the vira: 13 of 40 cards per hand.
        self.deck.shuffle();
        for player in &mut self.players {
            player.hand.clear();
            for _ in 0..CARDS_PER_HAND {
                let card = self.deck.take_card()?;
                player.hand.push(card);
            }
        }
        let vira = self.deck.take_card()?;
        debug!("Dealt; vira is {:?}.", vira);

        let shuffler_team = Team::from_position(self.shuffler_number);
        let mut mao = Mao::new(vira);
        let mut lead = (self.shuffler_number + 1) % MAXIMUM_PLAYERS;

        loop {
            let mut vaza = Vaza::new(lead);

            match self.run_vaza(&mut mao, &mut vaza).await? {
                VazaOutcome::Refused { winner, seat } => {
                    // The hand ends instantly; the aborted trick is not
                    // recorded.
                    self.broadcast_status(&mao, &vaza, seat).await?;
                    return Ok((winner.into(), mao.value));
                }

                VazaOutcome::Resolved(result) => {
                    mao.point_list.push(result);

                    // Show the completed trick before announcing its winner.
                    self.broadcast_status(&mao, &vaza, vaza.best_player_number)
                        .await?;
                    self.broadcast(&ServerMessage::VazaWinner { winner: result })
                        .await?;
                    sleep(self.pace).await;

                    // Face-down plays unlock only after a decisive first
                    // trick.
                    if mao.point_list.len() == 1 && result != TeamPoint::Draw {
                        mao.can_hide = true;
                    }

                    if let Some(winner) = mao_winner(&mao.point_list, shuffler_team) {
                        return Ok((winner, mao.value));
                    }

                    // The trick's best card leads the next one.
                    lead = vaza.first_player_number;
                }
            }
        }
    }

    // Plays one full circuit of the table.
    async fn run_vaza(&mut self, mao: &mut Mao, vaza: &mut Vaza) -> Result<VazaOutcome, GameError> {
        for turn in 0..MAXIMUM_PLAYERS {
            let seat = vaza.seat_for_turn(turn);
            match self.play_turn(mao, vaza, seat).await? {
                TurnOutcome::Played => {}
                TurnOutcome::Refused(winner) => {
                    return Ok(VazaOutcome::Refused { winner, seat })
                }
            }
        }

        vaza.first_player_number = vaza.best_player_number;
        Ok(VazaOutcome::Resolved(vaza.result))
    }

    // Runs one seat's decision point: broadcast state, cue the player, and
    // keep re-prompting until a legal card lands (or an escalation settles
    // the hand).
    async fn play_turn(
        &mut self,
        mao: &mut Mao,
        vaza: &mut Vaza,
        seat: usize,
    ) -> Result<TurnOutcome, GameError> {
        let team = self.players[seat].team;

        loop {
            self.broadcast_status(mao, vaza, seat).await?;

            let message = match self.players[seat].request_input(self.input_timeout).await {
                Ok(message) => message,
                Err(GameError::InputTimeout) => {
                    warn!(
                        "[client {}] timed out on their turn; treating as a fold.",
                        self.players[seat].id
                    );
                    mao.refused = true;
                    return Ok(TurnOutcome::Refused(team.opponent()));
                }
                Err(e) if e.is_recoverable() => {
                    self.players[seat].reject(&e.to_string()).await?;
                    continue;
                }
                Err(e) => return Err(e),
            };

            match message {
                ClientMessage::Draw { card, hide } => {
                    let mut card = match self.players[seat].take_card(card) {
                        Ok(card) => card,
                        Err(e) if e.is_recoverable() => {
                            self.players[seat].reject(&e.to_string()).await?;
                            continue;
                        }
                        Err(e) => return Err(e),
                    };

                    // An ineligible hide request plays the card face up.
                    if hide && mao.can_hide {
                        card.hide();
                    }

                    vaza.record_play(seat, card, &mao.vira);
                    return Ok(TurnOutcome::Played);
                }

                ClientMessage::Truco { response: None } => {
                    if !mao.can_truco(team) {
                        self.players[seat]
                            .reject("you cannot call truco right now")
                            .await?;
                        continue;
                    }

                    info!(
                        "[client {}] calls truco at value {}.",
                        self.players[seat].id, mao.value
                    );
                    match self.truco_exchange(mao, vaza, team).await? {
                        Some(winner) => return Ok(TurnOutcome::Refused(winner)),
                        // Escalation accepted; the player still owes a card.
                        None => continue,
                    }
                }

                _ => {
                    self.players[seat]
                        .reject("expected a draw or a truco call")
                        .await?;
                }
            }
        }
    }

    // The escalation answer protocol. Both opposing seats are asked in seat
    // order; the team's answer is the most aggressive of the two. Returns the
    // winning team if the call was refused, None once play should resume.
    async fn truco_exchange(
        &mut self,
        mao: &mut Mao,
        vaza: &Vaza,
        caller: Team,
    ) -> Result<Option<Team>, GameError> {
        let mut caller = caller;

        loop {
            let answering = caller.opponent();
            mao.truco_pending = true;
            mao.truco_turn = Some(answering);

            let mut combined = TrucoResponse::Refuse;
            for seat in 0..MAXIMUM_PLAYERS {
                if self.players[seat].team != answering {
                    continue;
                }

                self.broadcast_status(mao, vaza, seat).await?;
                let response = self.request_truco_response(seat).await?;
                combined = combined.max(response);
            }

            match clamped_response(combined, mao.value) {
                TrucoResponse::Refuse => {
                    mao.truco_pending = false;
                    mao.refused = true;
                    info!("Truco refused; {:?} takes the mao at value {}.", caller, mao.value);
                    return Ok(Some(caller));
                }
                TrucoResponse::Accept => {
                    mao.promote();
                    mao.truco_pending = false;
                    info!("Truco accepted; mao now worth {}.", mao.value);
                    return Ok(None);
                }
                TrucoResponse::Raise => {
                    mao.promote();
                    info!(
                        "Truco re-raised; mao now worth {} and {:?} must answer.",
                        mao.value, caller
                    );
                    caller = answering;
                }
            }
        }
    }

    // Cues one defender and blocks until they produce a truco answer. A
    // timeout counts as a refusal.
    async fn request_truco_response(&mut self, seat: usize) -> Result<TrucoResponse, GameError> {
        loop {
            match self.players[seat].request_input(self.input_timeout).await {
                Ok(ClientMessage::Truco {
                    response: Some(response),
                }) => return Ok(response),
                Ok(_) => {
                    self.players[seat]
                        .reject("expected a truco response")
                        .await?;
                }
                Err(GameError::InputTimeout) => {
                    warn!(
                        "[client {}] timed out answering a truco; counting as a refusal.",
                        self.players[seat].id
                    );
                    return Ok(TrucoResponse::Refuse);
                }
                Err(e) if e.is_recoverable() => {
                    self.players[seat].reject(&e.to_string()).await?;
                }
                Err(e) => return Err(e),
            }
        }
    }

    // Sends every player a personalized snapshot of the whole table.
    async fn broadcast_status(
        &mut self,
        mao: &Mao,
        vaza: &Vaza,
        current_seat: usize,
    ) -> Result<(), GameError> {
        let game = GameView {
            player_list: self.players.iter().map(|p| p.name.clone()).collect(),
            red_team_score: self.red_team_score,
            blue_team_score: self.blue_team_score,
        };
        let mao_view = MaoView {
            value: mao.value,
            point_list: mao.point_list.clone(),
            vira: CardView::from(mao.vira),
            truco: mao.truco_pending,
            refused: mao.refused,
        };
        // Face-down plays stay face down for everyone.
        let vaza_view = VazaView {
            player_number: current_seat,
            card_list: vaza
                .card_list
                .iter()
                .map(|slot| slot.map(CardView::from))
                .collect(),
        };

        let messages: Vec<ServerMessage> = self
            .players
            .iter()
            .map(|player| ServerMessage::Status {
                game: game.clone(),
                mao: mao_view.clone(),
                vaza: vaza_view.clone(),
                player: PlayerView {
                    position: player.position,
                    card_list: player.hand.iter().map(|&c| CardView::from(c)).collect(),
                    can_truco: mao.can_truco(player.team),
                },
            })
            .collect();

        for (seat, message) in messages.iter().enumerate() {
            self.players[seat].send(message).await?;
        }

        Ok(())
    }

    async fn broadcast(&mut self, message: &ServerMessage) -> Result<(), GameError> {
        for player in &mut self.players {
            player.send(message).await?;
        }

        Ok(())
    }
}
