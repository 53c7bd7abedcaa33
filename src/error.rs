// The failure taxonomy for the whole server. Protocol and illegal-move errors
// are recoverable (the offending player is re-prompted); everything else is
// fatal to the match.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GameError {
    // A malformed or out-of-sequence message. Recovered by sending the player
    // an error message and re-reading.
    #[error("protocol violation: {0}")]
    Protocol(String),

    // A move that violates the rules (bad card index, escalation out of
    // turn). Recovered the same way as a protocol violation.
    #[error("illegal move: {0}")]
    IllegalMove(String),

    // Socket-level failure. Fatal: there is no reconnect path.
    #[error("connection error: {0}")]
    Connection(#[from] std::io::Error),

    // The peer closed the connection cleanly. Also fatal.
    #[error("connection closed by peer")]
    ConnectionClosed,

    // A player failed to answer an input request in time.
    #[error("timed out waiting for player input")]
    InputTimeout,

    // More than 40 draws since the last shuffle. Dealing arithmetic keeps
    // this unreachable; if it fires, an invariant is broken.
    #[error("deck exhausted")]
    DeckExhausted,
}

impl GameError {
    // Whether the error can be answered with an error message and a fresh
    // read, instead of tearing the match down.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, GameError::Protocol(_) | GameError::IllegalMove(_))
    }
}
