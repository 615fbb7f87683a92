use axum::{extract::State, Json};
use rotibank_backend::{
    account::Role,
    listing::{
        handle::{CreateListingReq, CreateListingRes, ListingReq, ListingsRes},
        Listing, ListingInfo,
    },
    store::Store,
    Error,
};

use crate::{Auth, Global};

fn listings_res(listings: Vec<Listing>) -> Json<ListingsRes> {
    Json(ListingsRes {
        listings: listings.iter().map(Listing::info).collect(),
    })
}

pub async fn create<St: Store>(
    auth: Auth,
    State(Global {
        directory, board, ..
    }): State<Global<St>>,
    Json(req): Json<CreateListingReq>,
) -> Result<Json<CreateListingRes>, Error> {
    directory.verify(auth.account, &auth.token)?;
    let listing = board.create(auth.account, req.into())?;
    Ok(Json(CreateListingRes { id: listing.id() }))
}

pub async fn available<St: Store>(
    auth: Auth,
    State(Global {
        directory, board, ..
    }): State<Global<St>>,
) -> Result<Json<ListingsRes>, Error> {
    directory.verify(auth.account, &auth.token)?;
    Ok(listings_res(board.list_available()))
}

/// Listings posted by a restaurant, or accepted by a volunteer.
pub async fn mine<St: Store>(
    auth: Auth,
    State(Global {
        directory, board, ..
    }): State<Global<St>>,
) -> Result<Json<ListingsRes>, Error> {
    let account = directory.verify(auth.account, &auth.token)?;
    Ok(listings_res(match account.role() {
        Role::Restaurant => board.of_restaurant(account.id()),
        Role::Volunteer => board.of_volunteer(account.id()),
        Role::Ngo => vec![],
    }))
}

pub async fn get<St: Store>(
    auth: Auth,
    State(Global {
        directory, board, ..
    }): State<Global<St>>,
    Json(ListingReq { listing }): Json<ListingReq>,
) -> Result<Json<ListingInfo>, Error> {
    directory.verify(auth.account, &auth.token)?;
    Ok(Json(board.get(listing)?.info()))
}

pub async fn cancel<St: Store>(
    auth: Auth,
    State(Global {
        directory, board, ..
    }): State<Global<St>>,
    Json(ListingReq { listing }): Json<ListingReq>,
) -> Result<Json<ListingInfo>, Error> {
    directory.verify(auth.account, &auth.token)?;
    Ok(Json(board.cancel(listing, auth.account)?.info()))
}

pub async fn claim<St: Store>(
    auth: Auth,
    State(Global {
        directory, claims, ..
    }): State<Global<St>>,
    Json(ListingReq { listing }): Json<ListingReq>,
) -> Result<Json<ListingInfo>, Error> {
    directory.verify(auth.account, &auth.token)?;
    Ok(Json(claims.claim(listing, auth.account)?.info()))
}
