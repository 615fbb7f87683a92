use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone)]
struct Token {
    value: String,
    #[serde(default)]
    expire_at: Option<DateTime<Utc>>,
}

impl Token {
    #[inline]
    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expire_at.map_or(false, |t| t <= now)
    }
}

/// A simple token manager.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Tokens {
    inner: Vec<Token>,
}

impl Tokens {
    /// Sessions kept per account, the oldest one is dropped beyond this.
    const MAX_TOKENS: usize = 16;

    pub fn new() -> Self {
        Self {
            inner: Vec::with_capacity(Self::MAX_TOKENS),
        }
    }

    /// Create a new token along with its expiration time.
    #[must_use]
    pub fn new_token(
        &mut self,
        // The account id.
        id: u64,
        expire_days: u16,
    ) -> (String, Option<DateTime<Utc>>) {
        let expire_at = if expire_days == 0 {
            None
        } else {
            Some(Utc::now() + chrono::Duration::days(expire_days.into()))
        };
        let token = sha256::digest(format!(
            "{id}-{:016x}{:016x}",
            rand::random::<u64>(),
            rand::random::<u64>()
        ));
        if self.inner.len() >= Self::MAX_TOKENS {
            self.inner.remove(0);
        }
        self.inner.push(Token {
            value: token.clone(),
            expire_at,
        });
        (token, expire_at)
    }

    /// Remove a target token and return whether the token was removed.
    pub fn remove(&mut self, token: &str) -> bool {
        let l = self.inner.len();
        self.inner.retain(|e| e.value != token);
        l > self.inner.len()
    }

    /// Check if a token is usable.
    pub fn token_usable(&self, token: &str) -> bool {
        let now = Utc::now();
        self.inner
            .iter()
            .any(|e| e.value == token && !e.is_expired(now))
    }

    /// Remove expired tokens.
    pub fn refresh(&mut self) {
        let now = Utc::now();
        self.inner.retain(|e| !e.is_expired(now));
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}
