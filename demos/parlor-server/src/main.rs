//! Standalone game server hosting one of the built-in games.
//!
//! Usage: `parlor-server <meyer|pirat|holdem> [bind-addr]`
//!
//! Log verbosity follows `RUST_LOG` (e.g. `RUST_LOG=parlor=debug`).

use parlor::prelude::*;
use parlor_games::{Holdem, Meyer, Pirat};

const DEFAULT_BIND: &str = "0.0.0.0:8080";

/// Accepts any numeric token and uses it as the player ID.
/// Development only; production servers plug in a real verifier.
struct TokenAuth;

impl Authenticator for TokenAuth {
    async fn authenticate(&self, token: &str) -> Result<Profile, SessionError> {
        let id: u64 = token
            .parse()
            .map_err(|_| SessionError::AuthFailed("token must be a number".into()))?;
        Ok(Profile {
            player_id: PlayerId(id),
            display_name: format!("player-{id}"),
        })
    }
}

async fn serve<G: TableGame>(game: &str, addr: &str) -> Result<(), ParlorError> {
    let server = ParlorServerBuilder::new()
        .bind(addr)
        .build::<G>(TokenAuth)
        .await?;
    tracing::info!(game, addr, "serving");
    server.run().await
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let game = args.next().unwrap_or_default();
    let addr = args.next().unwrap_or_else(|| DEFAULT_BIND.to_string());

    match game.as_str() {
        "meyer" => serve::<Meyer>("meyer", &addr).await?,
        "pirat" => serve::<Pirat>("pirat", &addr).await?,
        "holdem" => serve::<Holdem>("holdem", &addr).await?,
        other => {
            eprintln!("unknown game {other:?}; expected meyer, pirat, or holdem");
            std::process::exit(2);
        }
    }
    Ok(())
}
