use std::env;

use actix_files::Files;
use actix_web::cookie::Key;
use actix_web::middleware::Logger;
use actix_web::{App, HttpServer, web};
use actix_web_flash_messages::{FlashMessagesFramework, storage::CookieMessageStore};
use config::Config;
use dotenvy::dotenv;
use tera::Tera;

use pushkind_notifications::db::establish_connection_pool;
use pushkind_notifications::i18n::Translator;
use pushkind_notifications::models::config::ServerConfig;
use pushkind_notifications::routes::api::api_v1_notifications;
use pushkind_notifications::routes::main::index;
use pushkind_notifications::routes::notifications::{
    delete_notification, mass_delete_notifications, mass_update_notifications, show_notification,
    show_notifications,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let app_env = env::var("APP_ENV").unwrap_or_else(|_| "local".into());

    let settings = match Config::builder()
        .add_source(config::File::with_name("config/default"))
        .add_source(config::File::with_name(&format!("config/{app_env}")).required(false))
        .add_source(config::Environment::with_prefix("APP"))
        .build()
    {
        Ok(settings) => settings,
        Err(e) => {
            log::error!("Error loading settings: {e}");
            std::process::exit(1);
        }
    };

    let server_config = match settings.try_deserialize::<ServerConfig>() {
        Ok(server_config) => server_config,
        Err(e) => {
            log::error!("Error loading server config: {e}");
            std::process::exit(1);
        }
    };

    let pool = match establish_connection_pool(&server_config.database_url) {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to establish database connection: {e}");
            std::process::exit(1);
        }
    };

    let secret_key = match Key::try_from(server_config.secret.as_bytes()) {
        Ok(key) => key,
        Err(e) => {
            log::error!("Invalid secret key, at least 64 bytes are required: {e}");
            std::process::exit(1);
        }
    };

    let message_store = CookieMessageStore::builder(secret_key).build();
    let message_framework = FlashMessagesFramework::builder(message_store).build();

    let tera = match Tera::new(&server_config.templates_dir) {
        Ok(tera) => tera,
        Err(e) => {
            log::error!("Template parsing error(s): {e}");
            std::process::exit(1);
        }
    };

    let translator = Translator::new(server_config.translations.clone());
    let bind_address = (server_config.address.clone(), server_config.port);

    log::info!(
        "Starting server at {}:{}",
        server_config.address,
        server_config.port
    );

    HttpServer::new(move || {
        App::new()
            .wrap(message_framework.clone())
            .wrap(Logger::default())
            .service(
                Files::new(&server_config.storage_url, &server_config.storage_dir)
                    .prefer_utf8(true),
            )
            .service(index)
            .service(show_notifications)
            .service(show_notification)
            .service(delete_notification)
            .service(mass_delete_notifications)
            .service(mass_update_notifications)
            .service(web::scope("/api").service(api_v1_notifications))
            .app_data(web::Data::new(tera.clone()))
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(server_config.clone()))
            .app_data(web::Data::new(translator.clone()))
    })
    .bind(bind_address)?
    .run()
    .await
}
