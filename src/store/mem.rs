use std::{
    fs,
    path::{Path, PathBuf},
};

use dashmap::{mapref::entry::Entry, DashMap};
use parking_lot::RwLock;
use serde::{de::DeserializeOwned, Serialize};

use super::{Store, Transitioned};
use crate::{
    account::{email_key, Account},
    listing::{Listing, ListingStatus, Transition},
    Error,
};

const ACCOUNTS: &str = "accounts";
const LISTINGS: &str = "listings";

/// An in-memory store, optionally backed by a directory of toml files.
///
/// Records are never removed, so positions in the vectors stay valid
/// and the id indexes map straight into them.
pub struct MemStore {
    accounts: RwLock<Vec<RwLock<Account>>>,
    /// An index cache for getting position from an account id.
    account_index: DashMap<u64, usize>,
    /// Lowercased email to account id.
    emails: DashMap<String, u64>,

    listings: RwLock<Vec<RwLock<Listing>>>,
    /// An index cache for getting position from a listing id.
    listing_index: DashMap<u64, usize>,

    data_dir: Option<PathBuf>,
}

impl MemStore {
    /// Opens a store, reading existing records from `data_dir` if given.
    pub fn open(data_dir: Option<PathBuf>) -> Result<Self, Error> {
        let this = Self {
            accounts: RwLock::new(Vec::new()),
            account_index: DashMap::new(),
            emails: DashMap::new(),
            listings: RwLock::new(Vec::new()),
            listing_index: DashMap::new(),
            data_dir,
        };

        if let Some(dir) = this.data_dir.clone() {
            for kind in [ACCOUNTS, LISTINGS] {
                fs::create_dir_all(dir.join(kind))?;
            }

            for account in load::<Account>(&dir.join(ACCOUNTS))? {
                let id = account.id();
                if this.restore_account(account).is_err() {
                    tracing::warn!("skipping account {id}: email or id already loaded");
                }
            }

            let mut listings = load::<Listing>(&dir.join(LISTINGS))?;
            listings.sort_by_key(Listing::created_at);
            for listing in listings {
                let id = listing.id();
                if this.restore_listing(listing).is_err() {
                    tracing::warn!("skipping listing {id}: id already loaded");
                }
            }

            tracing::info!(
                accounts = this.account_index.len(),
                listings = this.listing_index.len(),
                "loaded records from {}",
                dir.display()
            );
        }

        Ok(this)
    }

    fn save<T: Serialize>(&self, kind: &str, id: u64, record: &T) -> Result<(), Error> {
        if let Some(dir) = &self.data_dir {
            fs::write(
                dir.join(kind).join(format!("{id}.toml")),
                toml::to_string(record)?,
            )?;
        }
        Ok(())
    }

    fn restore_account(&self, account: Account) -> Result<(), Error> {
        match self.emails.entry(account.email_key()) {
            Entry::Occupied(_) => Err(Error::DuplicateEmail),
            Entry::Vacant(entry) => {
                let id = account.id();
                let mut accounts = self.accounts.write();
                match self.account_index.entry(id) {
                    Entry::Occupied(_) => return Err(Error::IdConflict(id)),
                    Entry::Vacant(index) => {
                        index.insert(accounts.len());
                    }
                }
                entry.insert(id);
                accounts.push(RwLock::new(account));
                Ok(())
            }
        }
    }

    fn restore_listing(&self, listing: Listing) -> Result<(), Error> {
        let id = listing.id();
        let mut listings = self.listings.write();
        match self.listing_index.entry(id) {
            Entry::Occupied(_) => Err(Error::IdConflict(id)),
            Entry::Vacant(index) => {
                index.insert(listings.len());
                listings.push(RwLock::new(listing));
                Ok(())
            }
        }
    }
}

/// Reads every toml record in `dir`, skipping files that fail to parse.
fn load<T: DeserializeOwned>(dir: &Path) -> Result<Vec<T>, Error> {
    let mut records = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().map_or(true, |ext| ext != "toml") {
            continue;
        }
        match fs::read_to_string(&path)
            .map_err(Error::from)
            .and_then(|content| toml::from_str(&content).map_err(Error::from))
        {
            Ok(record) => records.push(record),
            Err(err) => tracing::warn!("skipping data file {}: {err}", path.display()),
        }
    }
    Ok(records)
}

impl Store for MemStore {
    fn insert_account(&self, account: Account) -> Result<(), Error> {
        match self.emails.entry(account.email_key()) {
            Entry::Occupied(_) => Err(Error::DuplicateEmail),
            Entry::Vacant(entry) => {
                let id = account.id();
                let mut accounts = self.accounts.write();
                if self.account_index.contains_key(&id) {
                    return Err(Error::IdConflict(id));
                }
                self.save(ACCOUNTS, id, &account)?;
                self.account_index.insert(id, accounts.len());
                entry.insert(id);
                accounts.push(RwLock::new(account));
                Ok(())
            }
        }
    }

    fn account(&self, id: u64) -> Option<Account> {
        let index = self.account_index.get(&id).map(|e| *e.value())?;
        let accounts = self.accounts.read();
        let account = accounts.get(index)?.read().clone();
        Some(account)
    }

    fn account_by_email(&self, email: &str) -> Option<Account> {
        let id = self.emails.get(&email_key(email)).map(|e| *e.value())?;
        self.account(id)
    }

    fn accounts(&self) -> Vec<Account> {
        self.accounts.read().iter().map(|a| a.read().clone()).collect()
    }

    fn update_account<F>(&self, id: u64, f: F) -> Result<Account, Error>
    where
        F: FnOnce(&mut Account) -> Result<(), Error>,
    {
        let index = self
            .account_index
            .get(&id)
            .map(|e| *e.value())
            .ok_or(Error::AccountNotFound(id))?;
        let accounts = self.accounts.read();
        let mut account = accounts
            .get(index)
            .ok_or(Error::AccountNotFound(id))?
            .write();

        let mut next = account.clone();
        f(&mut next)?;
        self.save(ACCOUNTS, id, &next)?;
        *account = next;
        Ok(account.clone())
    }

    fn insert_listing(&self, listing: Listing) -> Result<(), Error> {
        let id = listing.id();
        let mut listings = self.listings.write();
        match self.listing_index.entry(id) {
            Entry::Occupied(_) => Err(Error::IdConflict(id)),
            Entry::Vacant(index) => {
                self.save(LISTINGS, id, &listing)?;
                index.insert(listings.len());
                listings.push(RwLock::new(listing));
                Ok(())
            }
        }
    }

    fn listing(&self, id: u64) -> Option<Listing> {
        let index = self.listing_index.get(&id).map(|e| *e.value())?;
        let listings = self.listings.read();
        let listing = listings.get(index)?.read().clone();
        Some(listing)
    }

    fn listings(&self) -> Vec<Listing> {
        self.listings.read().iter().map(|l| l.read().clone()).collect()
    }

    fn transition_listing(&self, id: u64, transition: Transition) -> Result<Transitioned, Error> {
        let index = self
            .listing_index
            .get(&id)
            .map(|e| *e.value())
            .ok_or(Error::ListingNotFound(id))?;
        let listings = self.listings.read();
        let mut listing = listings
            .get(index)
            .ok_or(Error::ListingNotFound(id))?
            .write();

        if listing.status() != ListingStatus::Available {
            return Ok(Transitioned::Stale(listing.clone()));
        }

        let mut next = listing.clone();
        next.apply(transition);
        self.save(LISTINGS, id, &next)?;
        *listing = next;
        Ok(Transitioned::Applied(listing.clone()))
    }

    fn close(&self) -> Result<(), Error> {
        if self.data_dir.is_none() {
            return Ok(());
        }
        for account in self.accounts.read().iter() {
            let account = account.read();
            self.save(ACCOUNTS, account.id(), &*account)?;
        }
        for listing in self.listings.read().iter() {
            let listing = listing.read();
            self.save(LISTINGS, listing.id(), &*listing)?;
        }
        tracing::info!("store flushed");
        Ok(())
    }
}
