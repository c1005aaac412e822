use actix_web::{middleware::from_fn, web};

use crate::{
    middlewares::authorization,
    modules::{
        upload::{handle, repository::UploadRepository},
        user::schema::UserRole,
    },
};

pub fn configure<R>(cfg: &mut web::ServiceConfig)
where
    R: UploadRepository + Send + Sync + 'static,
{
    cfg.service(
        web::scope("/uploads")
            .wrap(from_fn(authorization(vec![UserRole::User])))
            .service(web::resource("").route(web::post().to(handle::upload_file::<R>)))
            .service(web::resource("/mine").route(web::get().to(handle::list_my_uploads::<R>)))
            .service(
                web::resource("/{upload_id}")
                    .route(web::delete().to(handle::delete_upload::<R>)),
            ),
    );
}
