// The TCP connect phase: accepts card-table clients, performs the name
// handshake, and hands the framed connections to the game engine.

use crate::api::ClientMessage;
use crate::engine::MAXIMUM_PLAYERS;
use crate::error::GameError;
use crate::wire;

use std::time::Duration;

use log::{error, info, warn};
use tokio::net::{TcpListener, TcpStream};
use unique_id::random::RandomGenerator;
use unique_id::Generator;

// A client that has completed the handshake but has no seat yet.
pub struct JoinedClient {
    pub id: String,
    pub name: String,
    pub conn: wire::Connection<TcpStream>,
}

// Accepts connections until a full table has introduced itself. Connections
// that fail the handshake are dropped and their slot re-offered.
pub async fn accept_players(
    listener: &TcpListener,
    handshake_timeout: Duration,
) -> Result<Vec<JoinedClient>, GameError> {
    let mut joined = Vec::with_capacity(MAXIMUM_PLAYERS);

    while joined.len() < MAXIMUM_PLAYERS {
        let (stream, client_addr) = listener.accept().await?;

        // Guaranteed to be unique amongst all connections.
        let client_id = RandomGenerator::default().next_id().to_string();
        info!(
            "[client {}] connected to TCP stream at {}.",
            client_id, &client_addr
        );

        let mut conn = wire::frame(stream);

        // The first message must be the name handshake.
        let handshake = tokio::time::timeout(
            handshake_timeout,
            wire::recv::<_, ClientMessage>(&mut conn),
        )
        .await;

        let name = match handshake {
            Ok(Ok(ClientMessage::Name { name })) => name,
            Ok(Ok(other)) => {
                error!(
                    "[client {}] sent {:?} instead of a name handshake.",
                    client_id, other
                );
                continue;
            }
            Ok(Err(e)) => {
                error!("[client {}] handshake failed: {}.", client_id, e);
                continue;
            }
            Err(_) => {
                warn!("[client {}] handshake timed out.", client_id);
                continue;
            }
        };

        info!(
            "[client {}] joined as \"{}\" ({} of {}).",
            client_id,
            name,
            joined.len() + 1,
            MAXIMUM_PLAYERS
        );
        joined.push(JoinedClient {
            id: client_id,
            name,
            conn,
        });
    }

    Ok(joined)
}
