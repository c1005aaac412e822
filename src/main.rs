use actix_cors::Cors;
use actix_web::{
    self, App, HttpServer,
    middleware::{Logger, from_fn},
    web,
};
use std::sync::{Arc, LazyLock};

use crate::{
    configs::{RedisCache, connect_database},
    middlewares::authentication,
    modules::{
        bid::repository_pg::BidRepositoryPg,
        bidding::{model::BiddingConfig, service::BiddingService, sweeper::ExpirySweeper},
        company::{repository_pg::CompanyRepositoryPg, service::CompanyService},
        notification::{
            dispatcher::{LogDispatcher, NotificationDispatcher, PushGatewayDispatcher},
            repository_pg::DeviceTokenRepositoryPg,
            service::NotificationService,
        },
        upload::{
            model::UploadConfig, repository_pg::UploadRepositoryPg, service::UploadService,
            storage::LocalMediaStorage,
        },
        user::{repository_pg::UserRepositoryPg, service::UserService},
    },
};

mod api;
mod configs;
mod constants;
mod middlewares;
mod modules;
#[cfg(test)]
mod test;
mod utils;

pub static ENV: LazyLock<constants::Env> = LazyLock::new(|| {
    dotenvy::dotenv().ok();
    configs::init_logging();
    log::info!("Environment variables loaded from .env file");
    constants::Env::default()
});

#[actix_web::get("/")]
async fn health_check(db_pool: web::Data<sqlx::PgPool>) -> &'static str {
    match sqlx::query("SELECT 1").execute(db_pool.get_ref()).await {
        Ok(_) => "Server is running",
        Err(_) => "Server is running, database unreachable",
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let db_pool =
        connect_database().await.map_err(|_| std::io::Error::other("Database connection error"))?;

    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await
        .map_err(|e| std::io::Error::other(format!("Migration error: {e}")))?;

    let redis_pool = Arc::new(
        RedisCache::new().await.map_err(|_| std::io::Error::other("Redis connection error"))?,
    );

    let user_repo = Arc::new(UserRepositoryPg::new(db_pool.clone()));
    let company_repo = Arc::new(CompanyRepositoryPg::new(db_pool.clone()));
    let upload_repo = Arc::new(UploadRepositoryPg::new(db_pool.clone()));
    let bid_repo = Arc::new(BidRepositoryPg::new(db_pool.clone()));
    let token_repo = Arc::new(DeviceTokenRepositoryPg::new(db_pool.clone()));

    let dispatcher: Arc<dyn NotificationDispatcher + Send + Sync> = match &ENV.push_gateway_url {
        Some(url) => Arc::new(PushGatewayDispatcher::new(
            url.clone(),
            ENV.push_gateway_api_key.clone(),
            token_repo.clone(),
        )),
        None => {
            log::warn!("PUSH_GATEWAY_URL not set, notifications will only be logged");
            Arc::new(LogDispatcher)
        }
    };

    let user_service = web::Data::new(UserService::with_dependencies(
        user_repo,
        token_repo.clone(),
        redis_pool.clone(),
    ));
    let company_service = web::Data::new(CompanyService::with_dependencies(
        company_repo.clone(),
        redis_pool.clone(),
    ));
    let upload_service = web::Data::new(UploadService::new(
        upload_repo.clone(),
        Arc::new(LocalMediaStorage::new(&ENV.upload_dir, &ENV.upload_base_url)),
        UploadConfig::with_max_size_mb(ENV.max_upload_size_mb),
    ));
    let notification_service = web::Data::new(NotificationService::with_dependencies(
        token_repo,
        dispatcher.clone(),
    ));

    let bidding_service = BiddingService::with_dependencies(
        bid_repo,
        upload_repo,
        company_repo,
        dispatcher,
        BiddingConfig::with_ttl_days(ENV.bid_ttl_days),
    );

    if ENV.expiry_sweep_interval_secs > 0 {
        let every = std::time::Duration::from_secs(ENV.expiry_sweep_interval_secs);
        let _sweeper = Arc::new(ExpirySweeper::new(bidding_service.clone(), every)).start();
    }
    let bidding_service = web::Data::new(bidding_service);

    log::info!("Starting server at http://{}:{}", ENV.ip.as_str(), ENV.port);
    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin(&ENV.frontend_url)
            .allow_any_method()
            .allow_any_header()
            .supports_credentials()
            .max_age(3600);

        App::new()
            .wrap(Logger::default())
            .wrap(cors)
            .app_data(user_service.clone())
            .app_data(company_service.clone())
            .app_data(upload_service.clone())
            .app_data(bidding_service.clone())
            .app_data(notification_service.clone())
            .app_data(web::Data::new(db_pool.clone()))
            .service(health_check)
            .service(
                web::scope("/api")
                    .configure(modules::user::route::public_api_configure)
                    .configure(modules::company::route::public_api_configure)
                    .service(
                        web::scope("")
                            .wrap(from_fn(authentication))
                            .configure(modules::user::route::configure)
                            .configure(modules::company::route::configure)
                            .configure(modules::upload::route::configure::<UploadRepositoryPg>)
                            .configure(modules::bidding::route::configure)
                            .configure(modules::notification::route::configure),
                    ),
            )
    })
    .bind((ENV.ip.as_str(), ENV.port))?
    .workers(2)
    .run()
    .await
}
