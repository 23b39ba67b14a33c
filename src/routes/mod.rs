use actix_web::HttpResponse;
use actix_web::http::header;
use actix_web_flash_messages::{IncomingFlashMessages, Level};
use tera::{Context, Tera};

pub mod api;
pub mod main;
pub mod notifications;

pub const NOTIFICATION_EDIT_ROUTE: &str = "api.notification.edit";
pub const NOTIFICATION_DELETE_ROUTE: &str = "api.notification.delete";
pub const NOTIFICATION_MASS_DELETE_ROUTE: &str = "api.notification.mass-delete";
pub const NOTIFICATION_MASS_UPDATE_ROUTE: &str = "api.notification.mass-update";

/// Resolve a named route to its path. Routes with an `{id}` segment need an
/// id; the others ignore it.
pub fn url_for(route: &str, id: Option<i32>) -> Option<String> {
    match (route, id) {
        (NOTIFICATION_EDIT_ROUTE, Some(id)) => Some(format!("/notifications/{id}/edit")),
        (NOTIFICATION_DELETE_ROUTE, Some(id)) => Some(format!("/notifications/{id}/delete")),
        (NOTIFICATION_MASS_DELETE_ROUTE, _) => Some("/notifications/mass-delete".to_string()),
        (NOTIFICATION_MASS_UPDATE_ROUTE, _) => Some("/notifications/mass-update".to_string()),
        _ => {
            log::warn!("Cannot resolve route `{route}`");
            None
        }
    }
}

pub fn alert_level_to_str(level: &Level) -> &'static str {
    match level {
        Level::Error => "danger",
        Level::Warning => "warning",
        Level::Success => "success",
        _ => "info",
    }
}

pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

pub fn render_template(tera: &Tera, template: &str, context: &Context) -> HttpResponse {
    match tera.render(template, context) {
        Ok(body) => HttpResponse::Ok().content_type("text/html").body(body),
        Err(e) => {
            log::error!("Failed to render template '{template}': {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

pub fn base_context(flash_messages: &IncomingFlashMessages, current_page: &str) -> Context {
    let alerts = flash_messages
        .iter()
        .map(|f| (f.content(), alert_level_to_str(&f.level())))
        .collect::<Vec<_>>();

    let mut context = Context::new();
    context.insert("alerts", &alerts);
    context.insert("current_page", current_page);
    context
}
