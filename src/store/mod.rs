//! Persistence of accounts and listings.
//!
//! [`Store::transition_listing`] is the only way a listing changes status:
//! it behaves like `UPDATE listings SET .. WHERE id = ? AND status = 'available'`,
//! so concurrent transitions of the same listing never both apply.

pub mod mem;

use rand::Rng;

use crate::{
    account::Account,
    listing::{Listing, Transition},
    Error,
};

/// Ids stay below 2^53 so javascript clients read them exactly.
const MAX_ID: u64 = 1 << 53;

/// Generates a fresh random id.
#[inline]
pub fn new_id() -> u64 {
    rand::thread_rng().gen_range(1..MAX_ID)
}

/// Outcome of a conditional listing update.
#[derive(Debug, Clone)]
pub enum Transitioned {
    /// The listing was available and has been updated.
    Applied(Listing),
    /// The listing had already left `available`, nothing was written.
    Stale(Listing),
}

/// A persistence provider for the directory, the listing board
/// and the claim coordinator.
pub trait Store: Send + Sync + 'static {
    /// Inserts a new account.
    ///
    /// # Errors
    ///
    /// - Errors with [`Error::DuplicateEmail`] if another account has the
    /// same email, compared case-insensitively.
    /// - Errors with [`Error::IdConflict`] if the id is taken.
    fn insert_account(&self, account: Account) -> Result<(), Error>;

    fn account(&self, id: u64) -> Option<Account>;

    /// Looks an account up by email, case-insensitively.
    fn account_by_email(&self, email: &str) -> Option<Account>;

    fn accounts(&self) -> Vec<Account>;

    /// Mutates an account under its lock.
    ///
    /// Nothing is written if `f` errors.
    fn update_account<F>(&self, id: u64, f: F) -> Result<Account, Error>
    where
        F: FnOnce(&mut Account) -> Result<(), Error>;

    fn insert_listing(&self, listing: Listing) -> Result<(), Error>;

    fn listing(&self, id: u64) -> Option<Listing>;

    /// All listings, in insertion order.
    fn listings(&self) -> Vec<Listing>;

    /// Applies `transition` only if the listing is still available
    /// when the write happens.
    fn transition_listing(&self, id: u64, transition: Transition) -> Result<Transitioned, Error>;

    /// Flushes every record, called once at shutdown.
    fn close(&self) -> Result<(), Error>;
}
