//! Claiming listings for pickup.
//!
//! A claim reads the listing, rejects it early if it is gone, then relies on
//! the store's conditional update to pick a single winner among concurrent
//! claims. A lost race is terminal for that attempt and is never retried here.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::{
    account::{directory::Directory, Role},
    listing::{board::unavailable, Listing, ListingStatus, Transition},
    store::{Store, Transitioned},
    Error,
};

/// Moves listings from available to accepted, one volunteer per listing.
pub struct Coordinator<St> {
    store: Arc<St>,
    directory: Directory<St>,
    /// Points credited to the restaurant on a successful claim.
    points_per_claim: u64,
}

impl<St> Clone for Coordinator<St> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            directory: self.directory.clone(),
            points_per_claim: self.points_per_claim,
        }
    }
}

impl<St: Store> Coordinator<St> {
    pub fn new(store: Arc<St>, directory: Directory<St>, points_per_claim: u64) -> Self {
        Self {
            store,
            directory,
            points_per_claim,
        }
    }

    /// Claims a listing for a volunteer.
    ///
    /// # Errors
    ///
    /// - Errors with [`Error::NotAVolunteer`] if the account is not a volunteer.
    /// - Errors with [`Error::ListingNotFound`] if the listing does not exist.
    /// - Errors with [`Error::Expired`] if the listing expired, by status or by time.
    /// - Errors with [`Error::AlreadyClaimed`] if the listing was accepted or
    /// cancelled, including by a concurrent claim that won the race.
    ///
    /// The listing is left unchanged on every error.
    #[inline]
    pub fn claim(&self, listing: u64, volunteer: u64) -> Result<Listing, Error> {
        self.claim_at(listing, volunteer, Utc::now())
    }

    pub fn claim_at(
        &self,
        listing: u64,
        volunteer: u64,
        now: DateTime<Utc>,
    ) -> Result<Listing, Error> {
        let account = self
            .store
            .account(volunteer)
            .ok_or(Error::AccountNotFound(volunteer))?;
        if account.role() != Role::Volunteer {
            return Err(Error::NotAVolunteer(volunteer));
        }

        let current = self
            .store
            .listing(listing)
            .ok_or(Error::ListingNotFound(listing))?;
        if current.status() != ListingStatus::Available {
            return Err(unavailable(&current));
        }
        if current.is_past_expiry(now) {
            return Err(Error::Expired(listing));
        }

        match self
            .store
            .transition_listing(listing, Transition::Accept { volunteer })?
        {
            Transitioned::Applied(accepted) => {
                tracing::info!(listing, volunteer, "listing claimed");
                if let Err(err) = self
                    .directory
                    .credit_meal(accepted.restaurant(), self.points_per_claim)
                {
                    tracing::error!(
                        listing,
                        restaurant = accepted.restaurant(),
                        "failed to credit restaurant: {err}"
                    );
                }
                if let Err(err) = self.directory.credit_delivery(volunteer) {
                    tracing::error!(listing, volunteer, "failed to credit volunteer: {err}");
                }
                Ok(accepted)
            }
            Transitioned::Stale(current) => {
                tracing::debug!(listing, volunteer, "lost claim race");
                Err(unavailable(&current))
            }
        }
    }
}
