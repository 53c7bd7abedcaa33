// Binds the table, seats four players and runs one match to completion.
// Try: RUST_LOG=info cargo run -- 127.0.0.1:30000

use trucao_server::config::Config;
use trucao_server::engine::Game;
use trucao_server::net;
use trucao_server::session::PlayerSession;

use log::{error, info};
use rand::seq::SliceRandom;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() {
    env_logger::init();

    let config = Config::from_env();
    let listener = TcpListener::bind(&config.addr)
        .await
        .unwrap_or_else(|e| panic!("Failed to bind {}: {}.", config.addr, e));
    info!("Listening on {}.", config.addr);

    let mut joined = match net::accept_players(&listener, config.handshake_timeout).await {
        Ok(joined) => joined,
        Err(e) => {
            error!("Connect phase failed: {}.", e);
            std::process::exit(1);
        }
    };

    // Random fixed seats for the whole match; teams follow seat parity.
    joined.shuffle(&mut rand::thread_rng());
    let players: Vec<PlayerSession<_>> = joined
        .into_iter()
        .enumerate()
        .map(|(position, client)| {
            let session = PlayerSession::new(client.id, client.name, position, client.conn);
            info!(
                "[client {}] \"{}\" seated at position {} ({:?}).",
                session.id, session.name, session.position, session.team
            );
            session
        })
        .collect();

    let mut game = Game::new(players)
        .with_pace(config.pace)
        .with_input_timeout(config.input_timeout);

    match game.run().await {
        Ok(winner) => info!("Match complete; {:?} wins.", winner),
        Err(e) => {
            // No reconnect path exists: tell everyone still reachable and
            // give up.
            error!("Match aborted: {}.", e);
            game.abort(&e.to_string()).await;
            std::process::exit(1);
        }
    }
}
