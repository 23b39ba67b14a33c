use actix_web::{Responder, get};

use crate::routes::redirect;

#[get("/")]
pub async fn index() -> impl Responder {
    redirect("/notifications")
}
