use reqwest::{RequestBuilder, Response};
use rotibank_shared::account::{
    handle::{
        LeaderboardEntry, LeaderboardReq, LoginReq, LoginRes, ModifyPasswordPart, ModifyReq,
        RegisterReq, RegisterRes,
    },
    AccountInfo, Profile, RewardsInfo, Role,
};

use crate::Session;

pub struct Register {
    pub email: String,
    pub password: String,
    pub role: Role,
    pub profile: Profile,
}

#[async_trait::async_trait]
impl super::Request for Register {
    /// Id of the new account.
    type Output = u64;
    const URL_SUFFIX: &'static str = "/api/account/register";

    fn make_req(&self, req: RequestBuilder) -> anyhow::Result<RequestBuilder> {
        Ok(req.json(&RegisterReq {
            email: self.email.parse()?,
            password: self.password.clone(),
            role: self.role,
            profile: self.profile.clone(),
        }))
    }

    async fn parse_res(&mut self, response: Response) -> anyhow::Result<Self::Output> {
        Ok(response.json::<RegisterRes>().await?.id)
    }
}

pub struct Login {
    pub email: String,
    pub password: String,
}

#[async_trait::async_trait]
impl super::Request for Login {
    type Output = Session;
    const URL_SUFFIX: &'static str = "/api/account/login";

    fn make_req(&self, req: RequestBuilder) -> anyhow::Result<RequestBuilder> {
        Ok(req.json(&LoginReq {
            email: self.email.parse()?,
            password: self.password.clone(),
        }))
    }

    async fn parse_res(&mut self, response: Response) -> anyhow::Result<Self::Output> {
        let LoginRes { id, token, .. } = response.json().await?;
        Ok(Session {
            account_id: id,
            token,
        })
    }
}

pub struct Logout {
    pub session: Session,
}

#[async_trait::async_trait]
impl super::Request for Logout {
    type Output = ();
    const URL_SUFFIX: &'static str = "/api/account/logout";

    fn make_req(&self, req: RequestBuilder) -> anyhow::Result<RequestBuilder> {
        Ok(req.headers(self.session.headers()?))
    }

    async fn parse_res(&mut self, _response: Response) -> anyhow::Result<Self::Output> {
        Ok(())
    }
}

pub struct SelfInfo {
    pub session: Session,
}

#[async_trait::async_trait]
impl super::Request for SelfInfo {
    type Output = AccountInfo;
    const URL_SUFFIX: &'static str = "/api/account/self-info";

    fn make_req(&self, req: RequestBuilder) -> anyhow::Result<RequestBuilder> {
        Ok(req.headers(self.session.headers()?))
    }

    async fn parse_res(&mut self, response: Response) -> anyhow::Result<Self::Output> {
        response.json().await.map_err(From::from)
    }
}

/// Changes profile fields, `None` fields are kept as they are.
pub struct Modify {
    pub session: Session,
    pub profile: Profile,
    /// Old and new password.
    pub password: Option<(String, String)>,
}

#[async_trait::async_trait]
impl super::Request for Modify {
    type Output = AccountInfo;
    const URL_SUFFIX: &'static str = "/api/account/modify";

    fn make_req(&self, req: RequestBuilder) -> anyhow::Result<RequestBuilder> {
        let Profile {
            organization_name,
            contact_person,
            phone,
            address,
        } = self.profile.clone();
        Ok(req.headers(self.session.headers()?).json(&ModifyReq {
            organization_name,
            contact_person,
            phone,
            address,
            password: self
                .password
                .clone()
                .map(|(old, new)| ModifyPasswordPart { old, new }),
        }))
    }

    async fn parse_res(&mut self, response: Response) -> anyhow::Result<Self::Output> {
        response.json().await.map_err(From::from)
    }
}

pub struct Leaderboard {
    /// Restaurants if `None`.
    pub role: Option<Role>,
    pub limit: Option<usize>,
}

#[async_trait::async_trait]
impl super::Request for Leaderboard {
    type Output = Vec<LeaderboardEntry>;
    const URL_SUFFIX: &'static str = "/api/account/leaderboard";

    fn make_req(&self, req: RequestBuilder) -> anyhow::Result<RequestBuilder> {
        Ok(req.json(&LeaderboardReq {
            role: self.role,
            limit: self.limit,
        }))
    }

    async fn parse_res(&mut self, response: Response) -> anyhow::Result<Self::Output> {
        response.json().await.map_err(From::from)
    }
}

/// Reward milestones of the session's restaurant.
pub struct Rewards {
    pub session: Session,
}

#[async_trait::async_trait]
impl super::Request for Rewards {
    type Output = RewardsInfo;
    const URL_SUFFIX: &'static str = "/api/account/rewards";

    fn make_req(&self, req: RequestBuilder) -> anyhow::Result<RequestBuilder> {
        Ok(req.headers(self.session.headers()?))
    }

    async fn parse_res(&mut self, response: Response) -> anyhow::Result<Self::Output> {
        response.json().await.map_err(From::from)
    }
}
