use actix_web::{
    cookie::{time, Cookie},
    get, post, web, HttpRequest,
};

use crate::{
    api::{error, success},
    middlewares::get_claims,
    modules::{
        company::{
            model::{CompanyResponse, CompanySignInModel, RegisterCompanyModel},
            service::CompanyService,
        },
        user::model::SignInResponse,
    },
    utils::ValidatedJson,
    ENV,
};

#[post("/register")]
pub async fn register(
    company_service: web::Data<CompanyService>,
    body: ValidatedJson<RegisterCompanyModel>,
) -> Result<success::Success<CompanyResponse>, error::Error> {
    let company = company_service.register(body.0).await?;
    Ok(success::Success::created(Some(company)).message("Company registered successfully"))
}

#[post("/signin")]
pub async fn sign_in(
    company_service: web::Data<CompanyService>,
    body: ValidatedJson<CompanySignInModel>,
) -> Result<success::Success<SignInResponse>, error::Error> {
    let (access_token, refresh_token) = company_service.sign_in(body.0).await?;
    let refresh_cookie = Cookie::build("refresh_token", refresh_token)
        .path("/")
        .http_only(true)
        .max_age(time::Duration::seconds(ENV.refresh_token_expiration as i64))
        .finish();

    Ok(success::Success::ok(Some(SignInResponse { access_token }))
        .message("Signin successful")
        .cookies(vec![refresh_cookie]))
}

#[get("/profile")]
pub async fn get_profile(
    company_service: web::Data<CompanyService>,
    req: HttpRequest,
) -> Result<success::Success<CompanyResponse>, error::Error> {
    let company_id = get_claims(&req)?.sub;
    let company = company_service.get_by_id(company_id).await?;
    Ok(success::Success::ok(Some(company)).message("Profile retrieved successfully"))
}
