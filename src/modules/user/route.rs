use crate::{
    middlewares::authorization,
    modules::user::{handle::*, schema::UserRole},
};
use actix_web::{
    middleware::from_fn,
    web::{scope, ServiceConfig},
};

pub fn public_api_configure(cfg: &mut ServiceConfig) {
    cfg.service(
        scope("/auth").service(sign_up).service(sign_in).service(refresh).service(sign_out),
    );
}

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(
        scope("/users")
            .wrap(from_fn(authorization(vec![UserRole::User, UserRole::Admin])))
            .service(get_profile),
    );
}
