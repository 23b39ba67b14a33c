//! Helpers for integration tests.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use pushkind_notifications::db::{DbPool, establish_connection_pool};
use pushkind_notifications::schema::{
    channel_translations, channels, locales, push_notification_translations, push_notifications,
};
use tempfile::NamedTempFile;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

/// Temporary database used in integration tests.
pub struct TestDb {
    _tempfile: NamedTempFile,
    pool: DbPool,
}

impl TestDb {
    pub fn new() -> Self {
        let tempfile = NamedTempFile::new().expect("Failed to create temp file");
        let pool = establish_connection_pool(tempfile.path().to_str().unwrap())
            .expect("Failed to establish SQLite connection.");
        let mut conn = pool
            .get()
            .expect("Failed to get SQLite connection from pool.");
        conn.run_pending_migrations(MIGRATIONS)
            .expect("Migrations failed");
        TestDb {
            _tempfile: tempfile,
            pool,
        }
    }

    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }

    pub fn add_locale(&self, code: &str, name: &str) {
        let mut conn = self.pool.get().expect("connection");
        diesel::insert_into(locales::table)
            .values((locales::code.eq(code), locales::name.eq(name)))
            .execute(&mut conn)
            .expect("should insert locale");
    }

    /// Insert a channel with `(locale, name)` translations.
    pub fn add_channel(&self, code: &str, names: &[(&str, &str)]) {
        let mut conn = self.pool.get().expect("connection");
        diesel::insert_into(channels::table)
            .values(channels::code.eq(code))
            .execute(&mut conn)
            .expect("should insert channel");
        let channel_id: i32 = channels::table
            .filter(channels::code.eq(code))
            .select(channels::id)
            .first(&mut conn)
            .expect("inserted channel id should be readable");
        for (locale, name) in names {
            diesel::insert_into(channel_translations::table)
                .values((
                    channel_translations::channel_id.eq(channel_id),
                    channel_translations::locale.eq(*locale),
                    channel_translations::name.eq(*name),
                ))
                .execute(&mut conn)
                .expect("should insert channel translation");
        }
    }

    /// Insert a notification with `(channel, locale, title)` translations.
    pub fn add_notification(
        &self,
        id: i32,
        kind: &str,
        status: bool,
        created_at: NaiveDateTime,
        translations: &[(&str, &str, &str)],
    ) {
        let mut conn = self.pool.get().expect("connection");
        diesel::insert_into(push_notifications::table)
            .values((
                push_notifications::id.eq(id),
                push_notifications::notification_type.eq(kind),
                push_notifications::status.eq(status),
                push_notifications::created_at.eq(created_at),
                push_notifications::updated_at.eq(created_at),
            ))
            .execute(&mut conn)
            .expect("should insert notification");
        for (channel, locale, title) in translations {
            diesel::insert_into(push_notification_translations::table)
                .values((
                    push_notification_translations::push_notification_id.eq(id),
                    push_notification_translations::channel.eq(*channel),
                    push_notification_translations::locale.eq(*locale),
                    push_notification_translations::title.eq(*title),
                    push_notification_translations::content.eq(format!("{title} body")),
                ))
                .execute(&mut conn)
                .expect("should insert notification translation");
        }
    }
}
