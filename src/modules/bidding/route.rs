use actix_web::{
    middleware::from_fn,
    web::{self, resource, scope, ServiceConfig},
};

use crate::{
    middlewares::authorization,
    modules::{bidding::handle::*, user::schema::UserRole},
};

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(
        scope("/bidding")
            // company side
            .service(
                resource("/bids")
                    .wrap(from_fn(authorization(vec![UserRole::Company])))
                    .route(web::post().to(create_bid)),
            )
            .service(
                resource("/uploads/available")
                    .wrap(from_fn(authorization(vec![UserRole::Company])))
                    .route(web::get().to(list_available_uploads)),
            )
            .service(
                resource("/my-bids")
                    .wrap(from_fn(authorization(vec![UserRole::Company])))
                    .route(web::get().to(list_my_bids)),
            )
            .service(
                resource("/bids/{bid_id}/payment")
                    .wrap(from_fn(authorization(vec![UserRole::Company])))
                    .route(web::post().to(record_payment)),
            )
            // upload owner side
            .service(
                resource("/uploads/{upload_id}/bids")
                    .wrap(from_fn(authorization(vec![UserRole::User])))
                    .route(web::get().to(list_bids_for_upload)),
            )
            .service(
                resource("/bids/{bid_id}/status")
                    .wrap(from_fn(authorization(vec![UserRole::User])))
                    .route(web::put().to(update_bid_status)),
            )
            .service(
                resource("/uploads/{upload_id}/withdraw")
                    .wrap(from_fn(authorization(vec![UserRole::User])))
                    .route(web::post().to(withdraw_upload)),
            ),
    );
}
