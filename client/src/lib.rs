//! HTTP client for the Roti Bank backend.

pub mod raw;

pub use raw::{call, ResponseError};
pub use rotibank_shared::{
    account::{AccountInfo, Milestone, Profile, RewardsInfo, Role},
    listing::{ListingInfo, ListingStatus},
};

/// Where and how to reach the backend.
pub struct Context {
    pub req_client: reqwest::Client,
    /// Scheme and host, e.g. `http://127.0.0.1:8080`.
    pub url_prefix: String,
}

impl Context {
    pub fn new(url_prefix: impl Into<String>) -> Self {
        Self {
            req_client: reqwest::Client::new(),
            url_prefix: url_prefix.into(),
        }
    }
}

/// A logged in account.
#[derive(Debug, Clone)]
pub struct Session {
    pub account_id: u64,
    pub token: String,
}

impl Session {
    /// Auth headers carried by requests made on behalf of this session.
    pub fn headers(&self) -> anyhow::Result<reqwest::header::HeaderMap> {
        let mut map = reqwest::header::HeaderMap::new();
        map.insert("token", self.token.parse()?);
        map.insert("accountid", self.account_id.into());
        Ok(map)
    }
}
