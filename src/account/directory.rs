use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::{handle::LeaderboardEntry, reward, Account, Profile, RewardsInfo, Role};
use crate::{
    store::{self, Store},
    Error,
};

/// A login session handed back to the caller.
#[derive(Debug, Clone)]
pub struct Session {
    pub account: u64,
    pub token: String,
    /// `None` if the token never expires.
    pub expire_at: Option<DateTime<Utc>>,
}

/// Registers accounts and resolves credentials and sessions to them.
pub struct Directory<St> {
    store: Arc<St>,
    /// Lifetime of issued tokens in days.
    token_expire_days: u16,
}

impl<St> Clone for Directory<St> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            token_expire_days: self.token_expire_days,
        }
    }
}

impl<St: Store> Directory<St> {
    pub fn new(store: Arc<St>, token_expire_days: u16) -> Self {
        Self {
            store,
            token_expire_days,
        }
    }

    /// Registers a new account.
    ///
    /// # Errors
    ///
    /// - Errors if an account with the same email, compared
    /// case-insensitively, already exists.
    pub fn register(
        &self,
        email: &lettre::Address,
        role: Role,
        profile: Profile,
        password: &str,
    ) -> Result<Account, Error> {
        let account = Account::new(store::new_id(), email.clone(), role, profile, password);
        self.store.insert_account(account.clone())?;
        tracing::info!(id = account.id(), ?role, "registered account {email}");
        Ok(account)
    }

    #[inline]
    pub fn find_by_email(&self, email: &str) -> Option<Account> {
        self.store.account_by_email(email)
    }

    pub fn get(&self, id: u64) -> Result<Account, Error> {
        self.store.account(id).ok_or(Error::AccountNotFound(id))
    }

    /// Checks a password against the stored hash.
    ///
    /// Unknown emails and wrong passwords fail the same way.
    pub fn authenticate(&self, email: &str, password: &str) -> Result<Account, Error> {
        self.find_by_email(email)
            .filter(|account| account.password_matches(password))
            .ok_or(Error::InvalidCredentials)
    }

    /// Authenticates and opens a new session.
    pub fn login(&self, email: &str, password: &str) -> Result<Session, Error> {
        let id = self.authenticate(email, password)?.id();
        let mut session = None;
        self.store.update_account(id, |account| {
            let (token, expire_at) = account.login(password, self.token_expire_days)?;
            session = Some(Session {
                account: id,
                token,
                expire_at,
            });
            Ok(())
        })?;
        session.ok_or(Error::InvalidCredentials)
    }

    pub fn logout(&self, account: u64, token: &str) -> Result<(), Error> {
        self.store
            .update_account(account, |a| a.logout(token))
            .map(drop)
            .map_err(|err| match err {
                Error::AccountNotFound(_) => Error::NotLoggedIn,
                err => err,
            })
    }

    /// Resolves a session to its account.
    pub fn verify(&self, account: u64, token: &str) -> Result<Account, Error> {
        let found = self.store.account(account).ok_or(Error::NotLoggedIn)?;
        if !found.token_usable(token) {
            if let Err(err) = self.store.update_account(account, |a| {
                a.refresh_tokens();
                Ok(())
            }) {
                tracing::warn!(account, "failed to drop expired tokens: {err}");
            }
            return Err(Error::NotLoggedIn);
        }
        Ok(found)
    }

    /// Updates descriptive fields, every `Some` field of `changes` replaces
    /// the stored one.
    ///
    /// Changing the password requires the old one.
    pub fn modify_profile(
        &self,
        id: u64,
        changes: Profile,
        password: Option<(&str, &str)>,
    ) -> Result<Account, Error> {
        self.store.update_account(id, |account| {
            if let Some((old, new)) = password {
                if !account.password_matches(old) {
                    return Err(Error::InvalidCredentials);
                }
                account.set_password(new);
            }

            let profile = account.profile_mut();
            macro_rules! modify {
                ($($f:ident),* $(,)?) => {
                    $(if changes.$f.is_some() { profile.$f = changes.$f })*
                };
            }
            modify! {
                organization_name,
                contact_person,
                phone,
                address,
            }
            Ok(())
        })
    }

    /// Credits a restaurant for one of its listings being picked up.
    pub fn credit_meal(&self, restaurant: u64, points: u64) -> Result<Account, Error> {
        self.store.update_account(restaurant, |account| {
            if account.role() != Role::Restaurant {
                return Err(Error::NotARestaurant(restaurant));
            }
            account.credit_meal(points);
            Ok(())
        })
    }

    /// Counts a delivery for the volunteer who claimed a listing.
    pub fn credit_delivery(&self, volunteer: u64) -> Result<Account, Error> {
        self.store.update_account(volunteer, |account| {
            if account.role() != Role::Volunteer {
                return Err(Error::NotAVolunteer(volunteer));
            }
            account.credit_delivery();
            Ok(())
        })
    }

    /// Accounts of a role ranked by their contribution.
    ///
    /// Restaurants rank by points then meals shared, volunteers by meals
    /// delivered. NGOs are not ranked. Ties go to the lower id.
    pub fn leaderboard(&self, role: Role, limit: usize) -> Vec<LeaderboardEntry> {
        if role == Role::Ngo {
            return vec![];
        }
        let mut ranked: Vec<_> = self
            .store
            .accounts()
            .into_iter()
            .filter(|a| a.role() == role)
            .collect();
        ranked.sort_by(|a, b| {
            let by_contribution = match role {
                Role::Volunteer => b.meals_delivered().cmp(&a.meals_delivered()),
                _ => b
                    .points()
                    .cmp(&a.points())
                    .then(b.meals_shared().cmp(&a.meals_shared())),
            };
            by_contribution.then(a.id().cmp(&b.id()))
        });
        ranked
            .into_iter()
            .take(limit)
            .enumerate()
            .map(|(i, a)| LeaderboardEntry {
                rank: i + 1,
                id: a.id(),
                name: a.profile().display_name(a.email()).to_owned(),
                points: a.points(),
                meals_shared: a.meals_shared(),
                meals_delivered: a.meals_delivered(),
            })
            .collect()
    }

    /// Reward milestones of a restaurant.
    pub fn rewards(&self, restaurant: u64) -> Result<RewardsInfo, Error> {
        let account = self.get(restaurant)?;
        if account.role() != Role::Restaurant {
            return Err(Error::NotARestaurant(restaurant));
        }
        Ok(reward::progress(account.points()))
    }
}
