mod handle {
    pub mod account;
    pub mod listing;
}

#[cfg(test)]
mod tests;

use std::{sync::Arc, time::Duration};

use axum::{async_trait, http::request::Parts, routing::post};
use rotibank_backend::{
    account::directory::Directory, claim::Coordinator, config::Config, listing::board::Board,
    store::mem::MemStore, store::Store, Error,
};
use tokio_util::sync::CancellationToken;

/// Env var holding the path of the config file.
const CONFIG_ENV: &str = "ROTIBANK_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "./data/config.toml";

#[tokio::main]
async fn main() -> Result<(), Error> {
    let config = Config::load(
        std::env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_owned()),
    )?;

    tracing_subscriber::fmt()
        .with_max_level(
            config
                .log_level
                .parse::<tracing::Level>()
                .unwrap_or(tracing::Level::INFO),
        )
        .init();

    let store = Arc::new(MemStore::open(config.data_dir.clone())?);
    let global = Global::new(store.clone(), config);

    let cancel = CancellationToken::new();
    let sweeper = (global.config.sweep_interval_secs > 0).then(|| {
        rotibank_backend::sweep::spawn(
            global.board.clone(),
            Duration::from_secs(global.config.sweep_interval_secs),
            cancel.clone(),
        )
    });

    let addr = global.config.addr;
    tracing::info!("listening on {addr}");
    let result = axum::Server::bind(&addr)
        .serve(router(global).into_make_service())
        .with_graceful_shutdown(async {
            if let Err(err) = tokio::signal::ctrl_c().await {
                tracing::error!("failed to listen for shutdown signal: {err}");
            }
        })
        .await;
    if let Err(err) = result {
        tracing::error!("server error: {err}");
    }

    cancel.cancel();
    if let Some(sweeper) = sweeper {
        let _ = sweeper.await;
    }
    store.close()?;
    tracing::info!("shut down");
    Ok(())
}

/// Construct a router.
fn router<St: Store>(global: Global<St>) -> axum::Router {
    use handle::*;

    axum::Router::new()
        .route("/api/account/register", post(account::register::<St>))
        .route("/api/account/login", post(account::login::<St>))
        .route("/api/account/logout", post(account::logout::<St>))
        .route("/api/account/self-info", post(account::self_info::<St>))
        .route("/api/account/modify", post(account::modify::<St>))
        .route("/api/account/leaderboard", post(account::leaderboard::<St>))
        .route("/api/account/rewards", post(account::rewards::<St>))
        .route("/api/listing/create", post(listing::create::<St>))
        .route("/api/listing/available", post(listing::available::<St>))
        .route("/api/listing/mine", post(listing::mine::<St>))
        .route("/api/listing/get", post(listing::get::<St>))
        .route("/api/listing/cancel", post(listing::cancel::<St>))
        .route("/api/listing/claim", post(listing::claim::<St>))
        .with_state(global)
}

/// State shared by every handler.
pub struct Global<St> {
    pub config: Arc<Config>,
    pub directory: Directory<St>,
    pub board: Board<St>,
    pub claims: Coordinator<St>,
}

impl<St> Clone for Global<St> {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            directory: self.directory.clone(),
            board: self.board.clone(),
            claims: self.claims.clone(),
        }
    }
}

impl<St: Store> Global<St> {
    pub fn new(store: Arc<St>, config: Config) -> Self {
        let directory = Directory::new(store.clone(), config.token_expire_days);
        Self {
            board: Board::new(store.clone()),
            claims: Coordinator::new(store, directory.clone(), config.points_per_claim),
            directory,
            config: Arc::new(config),
        }
    }
}

/// Credentials of the requesting account, read from the
/// `AccountId` and `Token` headers.
#[derive(Debug)]
pub struct Auth {
    pub account: u64,
    pub token: String,
}

#[async_trait]
impl<S: Send + Sync> axum::extract::FromRequestParts<S> for Auth {
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let token = parts.headers.get("Token").ok_or(Error::NotLoggedIn)?;
        let account = parts.headers.get("AccountId").ok_or(Error::NotLoggedIn)?;
        Ok(Self {
            account: account
                .to_str()?
                .parse()
                .map_err(|_| Error::InvalidAuthHeader)?,
            token: token.to_str()?.to_owned(),
        })
    }
}
