use crate::{
    middlewares::authorization,
    modules::{company::handle::*, user::schema::UserRole},
};
use actix_web::{
    middleware::from_fn,
    web::{scope, ServiceConfig},
};

pub fn public_api_configure(cfg: &mut ServiceConfig) {
    cfg.service(scope("/companies/auth").service(register).service(sign_in));
}

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(
        scope("/companies")
            .wrap(from_fn(authorization(vec![UserRole::Company])))
            .service(get_profile),
    );
}
