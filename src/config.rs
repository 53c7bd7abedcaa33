// Runtime configuration: the listen address comes from the first positional
// argument, pacing and timeouts from environment variables.

use std::env;
use std::time::Duration;

const DEFAULT_ADDR: &str = "127.0.0.1:30000";
const DEFAULT_PACE_MS: u64 = 3000;
const DEFAULT_INPUT_TIMEOUT_MS: u64 = 120_000;
const DEFAULT_HANDSHAKE_TIMEOUT_MS: u64 = 30_000;

#[derive(Clone, Debug)]
pub struct Config {
    pub addr: String,

    // Real-time pause after trick and hand winner announcements. A
    // presentation device for human players, not a correctness requirement.
    pub pace: Duration,

    // How long a player may take to answer an input request before their
    // team is treated as having folded.
    pub input_timeout: Duration,

    // How long a fresh connection may take to send its name.
    pub handshake_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Self {
        Config {
            addr: env::args().nth(1).unwrap_or_else(|| DEFAULT_ADDR.to_string()),
            pace: Duration::from_millis(env_ms("TRUCAO_PACE_MS", DEFAULT_PACE_MS)),
            input_timeout: Duration::from_millis(env_ms(
                "TRUCAO_INPUT_TIMEOUT_MS",
                DEFAULT_INPUT_TIMEOUT_MS,
            )),
            handshake_timeout: Duration::from_millis(env_ms(
                "TRUCAO_HANDSHAKE_TIMEOUT_MS",
                DEFAULT_HANDSHAKE_TIMEOUT_MS,
            )),
        }
    }
}

fn env_ms(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(default)
}
