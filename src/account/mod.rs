pub mod directory;
pub mod reward;
pub mod token;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

pub use rotibank_shared::account::*;

use crate::Error;

/// A registered account.
///
/// Email and role are fixed at registration, only the profile,
/// the password, sessions and reward counters change afterwards.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Account {
    id: u64,
    email: lettre::Address,
    role: Role,
    registration_time: DateTime<Utc>,
    /// Random salt prepended to the password before hashing.
    password_salt: String,
    /// Hex sha256 of `{salt}:{password}`.
    password_sha: String,
    #[serde(default)]
    points: u64,
    #[serde(default)]
    meals_shared: u64,
    #[serde(default)]
    meals_delivered: u64,
    #[serde(default)]
    profile: Profile,
    #[serde(default)]
    tokens: token::Tokens,
}

/// Normalized form of an email used for lookups.
#[inline]
pub fn email_key(email: &str) -> String {
    email.trim().to_lowercase()
}

fn hash_password(salt: &str, password: &str) -> String {
    sha256::digest(format!("{salt}:{password}"))
}

fn new_salt() -> String {
    let mut rng = rand::thread_rng();
    format!("{:016x}{:016x}", rng.gen::<u64>(), rng.gen::<u64>())
}

impl Account {
    pub fn new(
        id: u64,
        email: lettre::Address,
        role: Role,
        profile: Profile,
        password: &str,
    ) -> Self {
        let password_salt = new_salt();
        Self {
            id,
            email,
            role,
            registration_time: Utc::now(),
            password_sha: hash_password(&password_salt, password),
            password_salt,
            points: 0,
            meals_shared: 0,
            meals_delivered: 0,
            profile,
            tokens: token::Tokens::new(),
        }
    }

    #[inline]
    pub fn id(&self) -> u64 {
        self.id
    }

    #[inline]
    pub fn email(&self) -> &lettre::Address {
        &self.email
    }

    /// Lowercased email, unique across the directory.
    #[inline]
    pub fn email_key(&self) -> String {
        email_key(self.email.as_ref())
    }

    #[inline]
    pub fn role(&self) -> Role {
        self.role
    }

    #[inline]
    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    #[inline]
    pub fn profile_mut(&mut self) -> &mut Profile {
        &mut self.profile
    }

    #[inline]
    pub fn points(&self) -> u64 {
        self.points
    }

    #[inline]
    pub fn meals_shared(&self) -> u64 {
        self.meals_shared
    }

    #[inline]
    pub fn meals_delivered(&self) -> u64 {
        self.meals_delivered
    }

    pub fn password_matches(&self, password: &str) -> bool {
        hash_password(&self.password_salt, password) == self.password_sha
    }

    /// Replaces the password, with a fresh salt.
    pub fn set_password(&mut self, password: &str) {
        self.password_salt = new_salt();
        self.password_sha = hash_password(&self.password_salt, password);
    }

    /// Login into the account and return back a token with its
    /// expiration time.
    pub fn login(
        &mut self,
        password: &str,
        expire_days: u16,
    ) -> Result<(String, Option<DateTime<Utc>>), Error> {
        if self.password_matches(password) {
            self.tokens.refresh();
            Ok(self.tokens.new_token(self.id, expire_days))
        } else {
            Err(Error::InvalidCredentials)
        }
    }

    /// Logout this account with the target token.
    pub fn logout(&mut self, token: &str) -> Result<(), Error> {
        if self.tokens.remove(token) {
            Ok(())
        } else {
            Err(Error::NotLoggedIn)
        }
    }

    #[inline]
    pub fn token_usable(&self, token: &str) -> bool {
        self.tokens.token_usable(token)
    }

    /// Drops expired sessions.
    #[inline]
    pub fn refresh_tokens(&mut self) {
        self.tokens.refresh()
    }

    /// Rewards this account for a listing picked up by a volunteer.
    pub fn credit_meal(&mut self, points: u64) {
        self.points = self.points.saturating_add(points);
        self.meals_shared += 1;
    }

    /// Counts a listing this volunteer claimed for delivery.
    pub fn credit_delivery(&mut self) {
        self.meals_delivered += 1;
    }

    pub fn info(&self) -> AccountInfo {
        AccountInfo {
            id: self.id,
            email: self.email.clone(),
            role: self.role,
            profile: self.profile.clone(),
            points: self.points,
            meals_shared: self.meals_shared,
            meals_delivered: self.meals_delivered,
            registration_time: self.registration_time,
        }
    }
}
