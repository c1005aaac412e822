use actix_web::{get, put, web, HttpRequest};

use crate::{
    api::{error, success},
    middlewares::get_claims,
    modules::notification::{
        model::{DeviceTokenBody, NotificationStatus, Recipient},
        service::NotificationService,
    },
    utils::ValidatedJson,
};

#[put("/device-token")]
pub async fn register_device_token(
    notification_service: web::Data<NotificationService>,
    req: HttpRequest,
    body: ValidatedJson<DeviceTokenBody>,
) -> Result<success::Success<()>, error::Error> {
    let claims = get_claims(&req)?;
    let recipient = Recipient::from_principal(claims.sub, &claims.role);

    notification_service.register_device_token(recipient, &body.0.token).await?;

    Ok(success::Success::ok(None).message("Device token registered"))
}

#[get("/status")]
pub async fn get_status(
    notification_service: web::Data<NotificationService>,
) -> Result<success::Success<NotificationStatus>, error::Error> {
    Ok(success::Success::ok(Some(notification_service.status()))
        .message("Notification status retrieved"))
}
