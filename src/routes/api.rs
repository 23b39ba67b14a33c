use actix_web::{HttpResponse, Responder, get, web};

use crate::db::DbPool;
use crate::i18n::Translator;
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::services::notifications::show_notifications;

/// The notification grid as JSON. Accepts the same query parameters as the
/// HTML grid.
#[get("/v1/notifications")]
pub async fn api_v1_notifications(
    params: web::Query<Vec<(String, String)>>,
    pool: web::Data<DbPool>,
    server_config: web::Data<ServerConfig>,
    translator: web::Data<Translator>,
) -> impl Responder {
    let repo = DieselRepository::new(pool.get_ref().clone());

    match show_notifications(&repo, &server_config, &translator, &params) {
        Ok(grid) => HttpResponse::Ok().json(grid),
        Err(_) => HttpResponse::InternalServerError().finish(),
    }
}
