use actix_web::{
    cookie::{time, Cookie},
    get, post, web, HttpRequest,
};

use crate::modules::user::{model, service::UserService};
use crate::{
    api::{error, success},
    middlewares::get_claims,
    utils::ValidatedJson,
    ENV,
};

fn refresh_cookie(refresh_token: String) -> Cookie<'static> {
    Cookie::build("refresh_token", refresh_token)
        .path("/")
        .http_only(true)
        .max_age(time::Duration::seconds(ENV.refresh_token_expiration as i64))
        .finish()
}

#[get("/profile")]
pub async fn get_profile(
    user_service: web::Data<UserService>,
    req: HttpRequest,
) -> Result<success::Success<model::CreatorResponse>, error::Error> {
    let id = get_claims(&req)?.sub;
    let user = user_service.get_by_id(id).await?;
    Ok(success::Success::ok(Some(user)).message("Profile retrieved successfully"))
}

#[post("/signup")]
pub async fn sign_up(
    user_service: web::Data<UserService>,
    user_data: ValidatedJson<model::RegisterCreatorModel>,
) -> Result<success::Success<model::CreatorResponse>, error::Error> {
    let creator = user_service.sign_up(user_data.0).await?;
    Ok(success::Success::created(Some(creator)).message("Creator registered successfully"))
}

#[post("/signin")]
pub async fn sign_in(
    user_service: web::Data<UserService>,
    user_data: ValidatedJson<model::CreatorSignInModel>,
) -> Result<success::Success<model::SignInResponse>, error::Error> {
    let (access_token, refresh_token) = user_service.sign_in(user_data.0).await?;

    Ok(success::Success::ok(Some(model::SignInResponse { access_token }))
        .message("Signin successful")
        .cookies(vec![refresh_cookie(refresh_token)]))
}

#[get("/signout")]
pub async fn sign_out(
    user_service: web::Data<UserService>,
    req: HttpRequest,
) -> Result<success::Success<()>, error::Error> {
    let refresh_token = req.cookie("refresh_token").map(|c| c.value().to_string());
    user_service.sign_out(refresh_token).await?;
    let cleared = Cookie::build("refresh_token", "")
        .path("/")
        .http_only(true)
        .max_age(time::Duration::seconds(0))
        .expires(time::OffsetDateTime::UNIX_EPOCH)
        .finish();

    Ok(success::Success::no_content().cookies(vec![cleared]))
}

#[post("/refresh")]
pub async fn refresh(
    user_service: web::Data<UserService>,
    req: HttpRequest,
) -> Result<success::Success<model::SignInResponse>, error::Error> {
    let refresh_token = req.cookie("refresh_token").map(|c| c.value().to_string());
    let (access_token, refresh_token) = user_service.refresh(refresh_token).await?;

    Ok(success::Success::ok(Some(model::SignInResponse { access_token }))
        .message("Refresh successful")
        .cookies(vec![refresh_cookie(refresh_token)]))
}
