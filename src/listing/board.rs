use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::{newest_first, Listing, ListingFields, ListingStatus, Transition};
use crate::{
    account::Role,
    store::{self, Store, Transitioned},
    Error,
};

/// Pickup location used when neither the listing nor the restaurant has one.
const FALLBACK_LOCATION: &str = "Restaurant location";

/// Creates and enumerates listings.
pub struct Board<St> {
    store: Arc<St>,
}

impl<St> Clone for Board<St> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
        }
    }
}

/// Maps the state of a listing that can no longer be taken to an error.
pub(crate) fn unavailable(listing: &Listing) -> Error {
    match listing.status() {
        ListingStatus::Expired => Error::Expired(listing.id()),
        _ => Error::AlreadyClaimed(listing.id()),
    }
}

impl<St: Store> Board<St> {
    pub fn new(store: Arc<St>) -> Self {
        Self { store }
    }

    /// Publishes a listing for the target restaurant.
    ///
    /// # Errors
    ///
    /// - Errors if the account does not exist or is not a restaurant.
    pub fn create(&self, restaurant: u64, fields: ListingFields) -> Result<Listing, Error> {
        let owner = self
            .store
            .account(restaurant)
            .ok_or(Error::AccountNotFound(restaurant))?;
        if owner.role() != Role::Restaurant {
            return Err(Error::NotARestaurant(restaurant));
        }

        let pickup_location = fields
            .pickup_location
            .clone()
            .filter(|l| !l.trim().is_empty())
            .or_else(|| owner.profile().address.clone())
            .unwrap_or_else(|| FALLBACK_LOCATION.to_owned());

        let listing = Listing::new(store::new_id(), restaurant, fields, pickup_location);
        self.store.insert_listing(listing.clone())?;
        tracing::info!(
            id = listing.id(),
            restaurant,
            "listed {} ({})",
            listing.title(),
            listing.quantity()
        );
        Ok(listing)
    }

    pub fn get(&self, id: u64) -> Result<Listing, Error> {
        self.store.listing(id).ok_or(Error::ListingNotFound(id))
    }

    /// Listings volunteers can still pick up, most recent first.
    #[inline]
    pub fn list_available(&self) -> Vec<Listing> {
        self.list_available_at(Utc::now())
    }

    pub fn list_available_at(&self, now: DateTime<Utc>) -> Vec<Listing> {
        newest_first(
            self.store
                .listings()
                .into_iter()
                .filter(|l| l.is_live_at(now))
                .collect(),
        )
    }

    /// Every listing of a restaurant, most recent first.
    pub fn of_restaurant(&self, restaurant: u64) -> Vec<Listing> {
        newest_first(
            self.store
                .listings()
                .into_iter()
                .filter(|l| l.restaurant() == restaurant)
                .collect(),
        )
    }

    /// Listings accepted by a volunteer, most recent first.
    pub fn of_volunteer(&self, volunteer: u64) -> Vec<Listing> {
        newest_first(
            self.store
                .listings()
                .into_iter()
                .filter(|l| l.volunteer() == Some(volunteer))
                .collect(),
        )
    }

    /// Moves every available listing whose expiry time has been reached
    /// at `now` to expired, returning how many were moved.
    pub fn expire_stale(&self, now: DateTime<Utc>) -> Result<usize, Error> {
        let mut count = 0;
        for listing in self.store.listings() {
            if listing.status() != ListingStatus::Available || !listing.is_past_expiry(now) {
                continue;
            }
            if let Transitioned::Applied(_) = self
                .store
                .transition_listing(listing.id(), Transition::Expire)?
            {
                count += 1;
            }
        }
        Ok(count)
    }

    /// Withdraws an available listing on behalf of its restaurant.
    pub fn cancel(&self, id: u64, restaurant: u64) -> Result<Listing, Error> {
        let listing = self.get(id)?;
        if listing.restaurant() != restaurant {
            return Err(Error::PermissionDenied);
        }
        match self.store.transition_listing(id, Transition::Cancel)? {
            Transitioned::Applied(listing) => {
                tracing::info!(id, restaurant, "listing cancelled");
                Ok(listing)
            }
            Transitioned::Stale(current) => Err(unavailable(&current)),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::{
        account::{Account, Profile},
        store::mem::MemStore,
    };

    struct Fixture {
        store: Arc<MemStore>,
        board: Board<MemStore>,
        restaurant: u64,
    }

    fn fixture() -> Fixture {
        let store = Arc::new(MemStore::open(None).unwrap());
        store
            .insert_account(Account::new(
                1,
                "kitchen@example.org".parse().unwrap(),
                Role::Restaurant,
                Profile {
                    address: Some("123 Main Street".to_owned()),
                    ..Profile::default()
                },
                "pw",
            ))
            .unwrap();
        store
            .insert_account(Account::new(
                2,
                "vol@example.org".parse().unwrap(),
                Role::Volunteer,
                Profile::default(),
                "pw",
            ))
            .unwrap();
        Fixture {
            board: Board::new(store.clone()),
            store,
            restaurant: 1,
        }
    }

    fn fields(title: &str, expiry_time: DateTime<Utc>) -> ListingFields {
        ListingFields {
            title: title.to_owned(),
            description: String::new(),
            quantity: "50 sandwiches".to_owned(),
            expiry_time,
            pickup_location: None,
        }
    }

    #[test]
    fn create() {
        let f = fixture();
        let listing = f
            .board
            .create(f.restaurant, fields("Sandwiches", Utc::now() + Duration::hours(2)))
            .unwrap();

        assert_eq!(listing.status(), ListingStatus::Available);
        assert_eq!(listing.volunteer(), None);
        assert_eq!(listing.pickup_location(), "123 Main Street");
        assert!(listing.created_at() <= Utc::now());

        assert!(matches!(
            f.board.create(2, fields("Nope", Utc::now())),
            Err(Error::NotARestaurant(2))
        ));
        assert!(matches!(
            f.board.create(3, fields("Nope", Utc::now())),
            Err(Error::AccountNotFound(3))
        ));
    }

    #[test]
    fn available_ordering_and_filtering() {
        let f = fixture();
        let now = Utc::now();
        let first = f
            .board
            .create(f.restaurant, fields("Curry", now + Duration::hours(1)))
            .unwrap();
        std::thread::sleep(std::time::Duration::from_millis(5));
        let second = f
            .board
            .create(f.restaurant, fields("Bread", now + Duration::hours(1)))
            .unwrap();
        let stale = f
            .board
            .create(f.restaurant, fields("Salad", now - Duration::minutes(1)))
            .unwrap();
        let taken = f
            .board
            .create(f.restaurant, fields("Naan", now + Duration::hours(1)))
            .unwrap();
        f.store
            .transition_listing(taken.id(), Transition::Accept { volunteer: 2 })
            .unwrap();

        let ids: Vec<_> = f
            .board
            .list_available_at(now)
            .iter()
            .map(Listing::id)
            .collect();
        assert_eq!(ids, vec![second.id(), first.id()]);
        assert!(!ids.contains(&stale.id()));

        assert_eq!(f.board.of_restaurant(f.restaurant).len(), 4);
        assert_eq!(f.board.of_volunteer(2)[0].id(), taken.id());
        assert!(f.board.list_available_at(now + Duration::hours(2)).is_empty());
    }

    #[test]
    fn expire_stale_is_idempotent() {
        let f = fixture();
        let now = Utc::now();
        let soon = f
            .board
            .create(f.restaurant, fields("Curry", now + Duration::minutes(10)))
            .unwrap();
        let later = f
            .board
            .create(f.restaurant, fields("Bread", now + Duration::hours(5)))
            .unwrap();
        let taken = f
            .board
            .create(f.restaurant, fields("Naan", now + Duration::minutes(10)))
            .unwrap();
        f.store
            .transition_listing(taken.id(), Transition::Accept { volunteer: 2 })
            .unwrap();

        assert_eq!(f.board.expire_stale(now).unwrap(), 0);

        let at = now + Duration::hours(1);
        assert_eq!(f.board.expire_stale(at).unwrap(), 1);
        assert_eq!(f.board.expire_stale(at).unwrap(), 0);
        assert_eq!(f.board.expire_stale(at + Duration::minutes(1)).unwrap(), 0);

        assert_eq!(f.board.get(soon.id()).unwrap().status(), ListingStatus::Expired);
        assert_eq!(f.board.get(soon.id()).unwrap().volunteer(), None);
        assert_eq!(f.board.get(later.id()).unwrap().status(), ListingStatus::Available);
        assert_eq!(f.board.get(taken.id()).unwrap().status(), ListingStatus::Accepted);
    }

    #[test]
    fn cancel() {
        let f = fixture();
        let listing = f
            .board
            .create(f.restaurant, fields("Curry", Utc::now() + Duration::hours(1)))
            .unwrap();

        assert!(matches!(
            f.board.cancel(listing.id(), 2),
            Err(Error::PermissionDenied)
        ));
        let cancelled = f.board.cancel(listing.id(), f.restaurant).unwrap();
        assert_eq!(cancelled.status(), ListingStatus::Cancelled);
        assert!(matches!(
            f.board.cancel(listing.id(), f.restaurant),
            Err(Error::AlreadyClaimed(_))
        ));
        assert!(f.board.list_available().is_empty());
    }
}
