use crate::modules::notification::handle::*;
use actix_web::web::{scope, ServiceConfig};

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(scope("/notifications").service(register_device_token).service(get_status));
}
