use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::db::DbPool;
use crate::forms::notifications::{MassDeleteForm, MassUpdateForm};
use crate::i18n::Translator;
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, render_template};
use crate::services::ServiceError;
use crate::services::notifications as service;

const GRID_URL: &str = "/notifications";

#[get("/notifications")]
pub async fn show_notifications(
    params: web::Query<Vec<(String, String)>>,
    flash_messages: IncomingFlashMessages,
    pool: web::Data<DbPool>,
    server_config: web::Data<ServerConfig>,
    translator: web::Data<Translator>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let repo = DieselRepository::new(pool.get_ref().clone());

    match service::show_notifications(&repo, &server_config, &translator, &params) {
        Ok(grid) => {
            let mut context = base_context(&flash_messages, "notifications");
            context.insert("grid", &grid);
            render_template(&tera, "notifications/index.html", &context)
        }
        Err(_) => HttpResponse::InternalServerError().finish(),
    }
}

#[get("/notifications/{notification_id}/edit")]
pub async fn show_notification(
    notification_id: web::Path<i32>,
    flash_messages: IncomingFlashMessages,
    pool: web::Data<DbPool>,
    translator: web::Data<Translator>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let repo = DieselRepository::new(pool.get_ref().clone());

    match service::show_notification(&repo, notification_id.into_inner()) {
        Ok(notification) => {
            let mut context = base_context(&flash_messages, "notifications");
            context.insert("notification", &notification);
            context.insert("type_label", &notification.notification_type.label());
            render_template(&tera, "notifications/edit.html", &context)
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error(translator.trans("notification.not-found")).send();
            redirect(GRID_URL)
        }
        Err(_) => HttpResponse::InternalServerError().finish(),
    }
}

#[post("/notifications/{notification_id}/delete")]
pub async fn delete_notification(
    notification_id: web::Path<i32>,
    pool: web::Data<DbPool>,
    translator: web::Data<Translator>,
) -> impl Responder {
    let repo = DieselRepository::new(pool.get_ref().clone());

    match service::delete_notification(&repo, notification_id.into_inner()) {
        Ok(true) => FlashMessage::success(translator.trans("notification.deleted")).send(),
        Ok(false) => FlashMessage::error(translator.trans("notification.delete-failed")).send(),
        Err(ServiceError::NotFound) => {
            FlashMessage::error(translator.trans("notification.not-found")).send()
        }
        Err(_) => return HttpResponse::InternalServerError().finish(),
    }
    redirect(GRID_URL)
}

#[post("/notifications/mass-delete")]
pub async fn mass_delete_notifications(
    pool: web::Data<DbPool>,
    translator: web::Data<Translator>,
    web::Form(form): web::Form<MassDeleteForm>,
) -> impl Responder {
    let repo = DieselRepository::new(pool.get_ref().clone());
    match service::mass_delete_notifications(&repo, form) {
        Ok(_) => FlashMessage::success(translator.trans("notification.mass-deleted")).send(),
        Err(ServiceError::Form(e) | ServiceError::TypeConstraint(e)) => {
            log::error!("Failed to validate form: {e}");
            FlashMessage::error(translator.trans("notification.mass-failed")).send()
        }
        Err(_) => FlashMessage::error(translator.trans("notification.mass-failed")).send(),
    }
    redirect(GRID_URL)
}

#[post("/notifications/mass-update")]
pub async fn mass_update_notifications(
    pool: web::Data<DbPool>,
    translator: web::Data<Translator>,
    web::Form(form): web::Form<MassUpdateForm>,
) -> impl Responder {
    let repo = DieselRepository::new(pool.get_ref().clone());
    match service::mass_update_notifications(&repo, form) {
        Ok(_) => FlashMessage::success(translator.trans("notification.mass-updated")).send(),
        Err(ServiceError::Form(e) | ServiceError::TypeConstraint(e)) => {
            log::error!("Failed to validate form: {e}");
            FlashMessage::error(translator.trans("notification.mass-failed")).send()
        }
        Err(_) => FlashMessage::error(translator.trans("notification.mass-failed")).send(),
    }
    redirect(GRID_URL)
}
