// Per-connection player state: a fixed seat and team, the cards still in
// hand, and the framed socket the player is reached through. Generic over the
// byte stream so the engine can be exercised over in-memory pipes in tests.

use crate::api::{ClientMessage, ServerMessage};
use crate::error::GameError;
use crate::types::{Card, Team};
use crate::wire;

use std::time::Duration;

use log::debug;
use tokio::io::{AsyncRead, AsyncWrite};

pub struct PlayerSession<S> {
    // Transport id assigned at accept time, used only for logging.
    pub id: String,
    pub name: String,
    pub position: usize,
    pub team: Team,
    pub hand: Vec<Card>,

    conn: wire::Connection<S>,
}

impl<S> PlayerSession<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(id: String, name: String, position: usize, conn: wire::Connection<S>) -> Self {
        PlayerSession {
            id,
            name,
            position,
            team: Team::from_position(position),
            hand: Vec::with_capacity(3),
            conn,
        }
    }

    pub async fn send(&mut self, message: &ServerMessage) -> Result<(), GameError> {
        wire::send(&mut self.conn, message).await
    }

    // Blocks for the player's next message, up to the given limit. A timeout
    // is reported separately so the engine can treat it as a fold.
    pub async fn recv(&mut self, limit: Duration) -> Result<ClientMessage, GameError> {
        match tokio::time::timeout(limit, wire::recv(&mut self.conn)).await {
            Ok(result) => result,
            Err(_) => Err(GameError::InputTimeout),
        }
    }

    // Cues the player for a decision and blocks for their answer.
    pub async fn request_input(&mut self, limit: Duration) -> Result<ClientMessage, GameError> {
        self.send(&ServerMessage::Input).await?;
        self.recv(limit).await
    }

    // Tells the player their last message was invalid in the current
    // protocol state. The caller re-reads afterwards.
    pub async fn reject(&mut self, reason: &str) -> Result<(), GameError> {
        debug!("[client {}] rejected: {}", self.id, reason);
        self.send(&ServerMessage::Error {
            message: reason.to_string(),
        })
        .await
    }

    // Removes the card at the given index of the remaining hand,
    // transferring ownership to the caller.
    pub fn take_card(&mut self, index: usize) -> Result<Card, GameError> {
        if index >= self.hand.len() {
            return Err(GameError::IllegalMove(format!(
                "card index {} out of range (hand has {})",
                index,
                self.hand.len()
            )));
        }

        Ok(self.hand.remove(index))
    }
}
