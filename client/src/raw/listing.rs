use chrono::{DateTime, Utc};
use reqwest::{RequestBuilder, Response};
use rotibank_shared::listing::{
    handle::{CreateListingReq, CreateListingRes, ListingReq, ListingsRes},
    ListingInfo,
};

use crate::Session;

pub struct Create {
    pub session: Session,
    pub title: String,
    pub description: String,
    pub quantity: String,
    pub expiry_time: DateTime<Utc>,
    pub pickup_location: Option<String>,
}

#[async_trait::async_trait]
impl super::Request for Create {
    /// Id of the new listing.
    type Output = u64;
    const URL_SUFFIX: &'static str = "/api/listing/create";

    fn make_req(&self, req: RequestBuilder) -> anyhow::Result<RequestBuilder> {
        Ok(req.headers(self.session.headers()?).json(&CreateListingReq {
            title: self.title.clone(),
            description: self.description.clone(),
            quantity: self.quantity.clone(),
            expiry_time: self.expiry_time,
            pickup_location: self.pickup_location.clone(),
        }))
    }

    async fn parse_res(&mut self, response: Response) -> anyhow::Result<Self::Output> {
        Ok(response.json::<CreateListingRes>().await?.id)
    }
}

/// Requests returning a list of listings for the session's account.
macro_rules! listings_req {
    ($($(#[$m:meta])* $t:ident => $url:literal),* $(,)?) => {
        $(
            $(#[$m])*
            pub struct $t {
                pub session: Session,
            }

            #[async_trait::async_trait]
            impl super::Request for $t {
                type Output = Vec<ListingInfo>;
                const URL_SUFFIX: &'static str = $url;

                fn make_req(&self, req: RequestBuilder) -> anyhow::Result<RequestBuilder> {
                    Ok(req.headers(self.session.headers()?))
                }

                async fn parse_res(&mut self, response: Response) -> anyhow::Result<Self::Output> {
                    Ok(response.json::<ListingsRes>().await?.listings)
                }
            }
        )*
    };
}

listings_req! {
    /// Listings volunteers can still claim, newest first.
    Available => "/api/listing/available",
    /// Listings posted, or accepted, by the session's account.
    Mine => "/api/listing/mine",
}

/// Requests targeting a single listing.
macro_rules! listing_req {
    ($($(#[$m:meta])* $t:ident => $url:literal),* $(,)?) => {
        $(
            $(#[$m])*
            pub struct $t {
                pub session: Session,
                pub listing: u64,
            }

            #[async_trait::async_trait]
            impl super::Request for $t {
                type Output = ListingInfo;
                const URL_SUFFIX: &'static str = $url;

                fn make_req(&self, req: RequestBuilder) -> anyhow::Result<RequestBuilder> {
                    Ok(req
                        .headers(self.session.headers()?)
                        .json(&ListingReq { listing: self.listing }))
                }

                async fn parse_res(&mut self, response: Response) -> anyhow::Result<Self::Output> {
                    response.json().await.map_err(From::from)
                }
            }
        )*
    };
}

listing_req! {
    Get => "/api/listing/get",
    /// Withdraws an available listing, restaurant only.
    Cancel => "/api/listing/cancel",
    /// Claims a listing for pickup, volunteer only.
    Claim => "/api/listing/claim",
}
