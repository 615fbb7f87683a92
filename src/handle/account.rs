use axum::{extract::State, Json};
use rotibank_backend::{
    account::{
        handle::{
            LeaderboardEntry, LeaderboardReq, LoginReq, LoginRes, ModifyPasswordPart, ModifyReq,
            RegisterReq, RegisterRes,
        },
        AccountInfo, Profile, RewardsInfo, Role,
    },
    store::Store,
    Error,
};

use crate::{Auth, Global};

const DEFAULT_LEADERBOARD_LIMIT: usize = 10;

pub async fn register<St: Store>(
    State(Global { directory, .. }): State<Global<St>>,
    Json(RegisterReq {
        email,
        password,
        role,
        profile,
    }): Json<RegisterReq>,
) -> Result<Json<RegisterRes>, Error> {
    let account = directory.register(&email, role, profile, &password)?;
    Ok(Json(RegisterRes { id: account.id() }))
}

pub async fn login<St: Store>(
    State(Global { directory, .. }): State<Global<St>>,
    Json(LoginReq { email, password }): Json<LoginReq>,
) -> Result<Json<LoginRes>, Error> {
    let session = directory.login(email.as_ref(), &password)?;
    Ok(Json(LoginRes {
        id: session.account,
        token: session.token,
        expire_at: session.expire_at.map(|t| t.timestamp()),
    }))
}

pub async fn logout<St: Store>(
    auth: Auth,
    State(Global { directory, .. }): State<Global<St>>,
) -> Result<(), Error> {
    directory.logout(auth.account, &auth.token)
}

pub async fn self_info<St: Store>(
    auth: Auth,
    State(Global { directory, .. }): State<Global<St>>,
) -> Result<Json<AccountInfo>, Error> {
    Ok(Json(directory.verify(auth.account, &auth.token)?.info()))
}

pub async fn modify<St: Store>(
    auth: Auth,
    State(Global { directory, .. }): State<Global<St>>,
    Json(ModifyReq {
        organization_name,
        contact_person,
        phone,
        address,
        password,
    }): Json<ModifyReq>,
) -> Result<Json<AccountInfo>, Error> {
    directory.verify(auth.account, &auth.token)?;
    let account = directory.modify_profile(
        auth.account,
        Profile {
            organization_name,
            contact_person,
            phone,
            address,
        },
        password
            .as_ref()
            .map(|ModifyPasswordPart { old, new }| (old.as_str(), new.as_str())),
    )?;
    Ok(Json(account.info()))
}

pub async fn leaderboard<St: Store>(
    State(Global { directory, .. }): State<Global<St>>,
    Json(LeaderboardReq { role, limit }): Json<LeaderboardReq>,
) -> Json<Vec<LeaderboardEntry>> {
    Json(directory.leaderboard(
        role.unwrap_or(Role::Restaurant),
        limit.unwrap_or(DEFAULT_LEADERBOARD_LIMIT),
    ))
}

pub async fn rewards<St: Store>(
    auth: Auth,
    State(Global { directory, .. }): State<Global<St>>,
) -> Result<Json<RewardsInfo>, Error> {
    directory.verify(auth.account, &auth.token)?;
    Ok(Json(directory.rewards(auth.account)?))
}
