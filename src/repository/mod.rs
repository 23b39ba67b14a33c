use std::collections::HashMap;

use crate::db::{DbConnection, DbPool};
use crate::domain::channel::{Channel, Locale};
use crate::domain::grid::{ColumnFilter, FieldKind, GridField, Search, SortOrder};
use crate::domain::notification::{Notification, NotificationRow};
use crate::domain::types::{ChannelCode, ChannelName, LocaleCode, NotificationId};
use crate::pagination::Pagination;

pub mod channel;
pub mod errors;
pub mod notification;
#[cfg(test)]
pub mod test;

pub use errors::{RepositoryError, RepositoryResult};

/// Repository implementation backed by Diesel and SQLite.
///
/// The underlying `r2d2::Pool` is cheap to clone, allowing the repository to
/// be passed around freely between handlers.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool, // r2d2::Pool is cheap to clone
}

impl DieselRepository {
    /// Create a new repository from an established database pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Get a pooled database connection.
    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

/// Columns of the notification grid query that can be filtered, searched or
/// sorted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationColumn {
    NotificationId,
    Title,
    Content,
    ChannelName,
    Status,
    Type,
    CreatedAt,
    UpdatedAt,
}

impl GridField for NotificationColumn {
    fn kind(&self) -> FieldKind {
        match self {
            NotificationColumn::NotificationId => FieldKind::Integer,
            NotificationColumn::Title
            | NotificationColumn::Content
            | NotificationColumn::ChannelName
            | NotificationColumn::Type => FieldKind::Text,
            NotificationColumn::Status => FieldKind::Boolean,
            NotificationColumn::CreatedAt | NotificationColumn::UpdatedAt => FieldKind::DateTime,
        }
    }
}

/// Query parameters of the notification grid.
///
/// Rows are restricted to translations whose channel is in `channels` and
/// whose locale is in `locales`; an empty set matches nothing.
#[derive(Debug, Clone)]
pub struct NotificationGridQuery {
    pub channels: Vec<ChannelCode>,
    pub locales: Vec<LocaleCode>,
    /// Locale used to resolve channel names.
    pub name_locale: LocaleCode,
    /// Additional AND-ed predicates.
    pub filters: Vec<ColumnFilter<NotificationColumn>>,
    /// Free-text search string.
    pub search: Option<Search<NotificationColumn>>,
    pub sort: NotificationColumn,
    pub order: SortOrder,
    /// Pagination parameters.
    pub pagination: Option<Pagination>,
}

impl NotificationGridQuery {
    pub fn new(channels: Vec<ChannelCode>, locales: Vec<LocaleCode>, name_locale: LocaleCode) -> Self {
        Self {
            channels,
            locales,
            name_locale,
            filters: Vec::new(),
            search: None,
            sort: NotificationColumn::NotificationId,
            order: SortOrder::Desc,
            pagination: None,
        }
    }
    pub fn filter(mut self, filter: ColumnFilter<NotificationColumn>) -> Self {
        self.filters.push(filter);
        self
    }
    pub fn search(mut self, search: Search<NotificationColumn>) -> Self {
        self.search = Some(search);
        self
    }
    pub fn sort(mut self, column: NotificationColumn, order: SortOrder) -> Self {
        self.sort = column;
        self.order = order;
        self
    }
    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination::new(page, per_page));
        self
    }
}

/// Read-only operations for channel entities.
pub trait ChannelReader {
    /// List every channel with its name in `name_locale`.
    fn list_channels(&self, name_locale: &LocaleCode) -> RepositoryResult<Vec<Channel>>;
}

/// Read-only operations for locale entities.
pub trait LocaleReader {
    /// List every known locale.
    fn list_locales(&self) -> RepositoryResult<Vec<Locale>>;
}

/// Read-only operations for notification entities.
pub trait NotificationReader {
    /// List grid rows matching the supplied query, with the total row count
    /// before pagination.
    fn list_notification_rows(
        &self,
        query: &NotificationGridQuery,
    ) -> RepositoryResult<(usize, Vec<NotificationRow>)>;
    /// Names of every channel each notification targets, in translation order.
    fn list_notification_channel_names(
        &self,
        ids: &[NotificationId],
        name_locale: &LocaleCode,
    ) -> RepositoryResult<HashMap<NotificationId, Vec<ChannelName>>>;
    /// Retrieve a notification and all of its translations.
    fn get_notification_by_id(&self, id: NotificationId) -> RepositoryResult<Option<Notification>>;
}

/// Write operations for notification entities.
pub trait NotificationWriter {
    /// Delete notifications together with their translations.
    fn delete_notifications(&self, ids: &[NotificationId]) -> RepositoryResult<usize>;
    /// Enable or disable notifications.
    fn update_notifications_status(
        &self,
        ids: &[NotificationId],
        status: bool,
    ) -> RepositoryResult<usize>;
}
