// The length-prefixed JSON wire codec. Every message travels as a 2-byte
// little-endian payload length followed by that many bytes of UTF-8 JSON.
// Payloads are truncated at the 65535-byte cap before the prefix is computed,
// so an oversized message can never corrupt the framing.

use crate::error::GameError;

use bytes::Bytes;
use futures_util::{SinkExt, StreamExt};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_util::codec::{Framed, LengthDelimitedCodec};

// The largest payload a 2-byte length prefix can describe.
pub const MAX_PAYLOAD: usize = u16::MAX as usize;

// A framed stream speaking the length-prefixed protocol.
pub type Connection<S> = Framed<S, LengthDelimitedCodec>;

// Wraps a raw byte stream in the protocol framing.
pub fn frame<S>(io: S) -> Connection<S>
where
    S: AsyncRead + AsyncWrite,
{
    LengthDelimitedCodec::builder()
        .length_field_length(2)
        .little_endian()
        .max_frame_length(MAX_PAYLOAD)
        .new_framed(io)
}

// Serializes one message and writes it as a single frame.
pub async fn send<S, T>(conn: &mut Connection<S>, message: &T) -> Result<(), GameError>
where
    S: AsyncRead + AsyncWrite + Unpin,
    T: Serialize,
{
    let mut payload =
        serde_json::to_vec(message).map_err(|e| GameError::Protocol(e.to_string()))?;
    payload.truncate(MAX_PAYLOAD);

    conn.send(Bytes::from(payload)).await?;
    Ok(())
}

// Reads exactly one frame and parses it as JSON.
pub async fn recv<S, T>(conn: &mut Connection<S>) -> Result<T, GameError>
where
    S: AsyncRead + AsyncWrite + Unpin,
    T: DeserializeOwned,
{
    let frame = match conn.next().await {
        Some(Ok(frame)) => frame,
        Some(Err(e)) => return Err(GameError::Connection(e)),
        None => return Err(GameError::ConnectionClosed),
    };

    serde_json::from_slice(&frame).map_err(|e| GameError::Protocol(format!("bad JSON: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ClientMessage, ServerMessage, TrucoResponse};
    use crate::types::TeamPoint;

    use tokio::io::AsyncReadExt;

    #[tokio::test]
    async fn messages_round_trip() {
        let (near, far) = tokio::io::duplex(1024);
        let mut tx = frame(near);
        let mut rx = frame(far);

        let sent = ServerMessage::MaoWinner {
            winner: TeamPoint::Red,
        };
        send(&mut tx, &sent).await.unwrap();
        let received: ServerMessage = recv(&mut rx).await.unwrap();
        assert_eq!(sent, received);

        let sent = ClientMessage::Truco {
            response: Some(TrucoResponse::Accept),
        };
        send(&mut tx, &sent).await.unwrap();
        let received: ClientMessage = recv(&mut rx).await.unwrap();
        assert_eq!(sent, received);
    }

    #[tokio::test]
    async fn oversized_payloads_truncate_without_corrupting_the_prefix() {
        let (near, mut far) = tokio::io::duplex(256 * 1024);
        let mut tx = frame(near);

        let message = ServerMessage::Error {
            message: "x".repeat(2 * MAX_PAYLOAD),
        };
        send(&mut tx, &message).await.unwrap();

        // The prefix must describe exactly the truncated payload.
        let mut prefix = [0u8; 2];
        far.read_exact(&mut prefix).await.unwrap();
        assert_eq!(u16::from_le_bytes(prefix) as usize, MAX_PAYLOAD);

        let mut payload = vec![0u8; MAX_PAYLOAD];
        far.read_exact(&mut payload).await.unwrap();
        assert!(payload.starts_with(br#"{"type":"error""#));
    }

    #[tokio::test]
    async fn closed_connections_are_distinguished_from_bad_json() {
        let (near, far) = tokio::io::duplex(1024);
        let mut rx = frame(far);

        drop(near);
        let result: Result<ClientMessage, _> = recv(&mut rx).await;
        assert!(matches!(result, Err(GameError::ConnectionClosed)));
    }

    #[tokio::test]
    async fn invalid_json_is_a_protocol_error() {
        let (near, far) = tokio::io::duplex(1024);
        let mut tx = frame(near);
        let mut rx = frame(far);

        tx.send(Bytes::from_static(b"not json")).await.unwrap();
        let result: Result<ClientMessage, _> = recv(&mut rx).await;
        assert!(matches!(result, Err(GameError::Protocol(_))));
    }
}
