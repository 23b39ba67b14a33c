use chrono::NaiveDateTime;
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Bool, Integer, Nullable, Text, Timestamp};

use crate::domain::notification::{
    Notification as DomainNotification, NotificationRow as DomainNotificationRow,
    NotificationTranslation as DomainNotificationTranslation,
};
use crate::domain::types::{
    ChannelCode, ChannelName, ImagePath, LocaleCode, NotificationType, TypeConstraintError,
};

/// Diesel model representing the `push_notifications` table.
#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::push_notifications)]
pub struct Notification {
    pub id: i32,
    pub image: Option<String>,
    pub notification_type: String,
    pub product_category_id: Option<i32>,
    pub status: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Diesel model representing the `push_notification_translations` table.
#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Associations)]
#[diesel(belongs_to(Notification, foreign_key = push_notification_id))]
#[diesel(table_name = crate::schema::push_notification_translations)]
pub struct NotificationTranslation {
    pub id: i32,
    pub push_notification_id: i32,
    pub title: String,
    pub content: String,
    pub channel: String,
    pub locale: String,
}

/// Row produced by the grouped grid query.
#[derive(Debug, Clone, QueryableByName)]
pub struct NotificationGridRow {
    #[diesel(sql_type = Integer)]
    pub notification_id: i32,
    #[diesel(sql_type = Nullable<Text>)]
    pub image: Option<String>,
    #[diesel(sql_type = Text)]
    pub title: String,
    #[diesel(sql_type = Text)]
    pub content: String,
    #[diesel(sql_type = Text)]
    pub channel: String,
    #[diesel(sql_type = Text)]
    pub locale: String,
    #[diesel(sql_type = Text)]
    pub notification_type: String,
    #[diesel(sql_type = Nullable<Integer>)]
    pub product_category_id: Option<i32>,
    #[diesel(sql_type = Bool)]
    pub status: bool,
    #[diesel(sql_type = Timestamp)]
    pub created_at: NaiveDateTime,
    #[diesel(sql_type = Timestamp)]
    pub updated_at: NaiveDateTime,
    #[diesel(sql_type = Nullable<Text>)]
    pub channel_name: Option<String>,
}

/// One channel targeted by a notification, with its display name.
#[derive(Debug, Clone, QueryableByName)]
pub struct NotificationChannelName {
    #[diesel(sql_type = Integer)]
    pub notification_id: i32,
    #[diesel(sql_type = Text)]
    pub channel: String,
    #[diesel(sql_type = Nullable<Text>)]
    pub channel_name: Option<String>,
}

/// Result of a `COUNT(*) AS total` query.
#[derive(Debug, Clone, Copy, QueryableByName)]
pub struct GridCount {
    #[diesel(sql_type = BigInt)]
    pub total: i64,
}

fn optional_image(image: Option<String>) -> Result<Option<ImagePath>, TypeConstraintError> {
    image
        .filter(|path| !path.trim().is_empty())
        .map(ImagePath::new)
        .transpose()
}

fn optional_channel_name(name: Option<String>) -> Result<Option<ChannelName>, TypeConstraintError> {
    name.filter(|name| !name.trim().is_empty())
        .map(ChannelName::new)
        .transpose()
}

impl NotificationChannelName {
    /// Display name of the channel, falling back to its code.
    pub fn into_display_name(self) -> Result<ChannelName, TypeConstraintError> {
        match optional_channel_name(self.channel_name)? {
            Some(name) => Ok(name),
            None => ChannelName::new(self.channel),
        }
    }
}

impl TryFrom<NotificationTranslation> for DomainNotificationTranslation {
    type Error = TypeConstraintError;

    fn try_from(translation: NotificationTranslation) -> Result<Self, Self::Error> {
        Ok(Self {
            notification_id: translation.push_notification_id.try_into()?,
            channel: ChannelCode::new(translation.channel)?,
            locale: LocaleCode::new(translation.locale)?,
            title: translation.title,
            content: translation.content,
        })
    }
}

impl TryFrom<(Notification, Vec<NotificationTranslation>)> for DomainNotification {
    type Error = TypeConstraintError;

    fn try_from(
        (notification, translations): (Notification, Vec<NotificationTranslation>),
    ) -> Result<Self, Self::Error> {
        Ok(Self {
            id: notification.id.try_into()?,
            image: optional_image(notification.image)?,
            notification_type: NotificationType::new(notification.notification_type)?,
            product_category_id: notification
                .product_category_id
                .map(TryInto::try_into)
                .transpose()?,
            status: notification.status,
            created_at: notification.created_at,
            updated_at: notification.updated_at,
            translations: translations
                .into_iter()
                .map(TryInto::try_into)
                .collect::<Result<Vec<_>, _>>()?,
        })
    }
}

impl TryFrom<NotificationGridRow> for DomainNotificationRow {
    type Error = TypeConstraintError;

    fn try_from(row: NotificationGridRow) -> Result<Self, Self::Error> {
        Ok(Self {
            notification_id: row.notification_id.try_into()?,
            image: optional_image(row.image)?,
            title: row.title,
            content: row.content,
            channel: ChannelCode::new(row.channel)?,
            locale: LocaleCode::new(row.locale)?,
            notification_type: NotificationType::new(row.notification_type)?,
            product_category_id: row.product_category_id.map(TryInto::try_into).transpose()?,
            status: row.status,
            created_at: row.created_at,
            updated_at: row.updated_at,
            channel_name: optional_channel_name(row.channel_name)?,
            channel_names: Vec::new(),
        })
    }
}
