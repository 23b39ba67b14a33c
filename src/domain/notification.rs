use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{
    ChannelCode, ChannelName, ImagePath, LocaleCode, NotificationId, NotificationType,
    ProductCategoryId,
};

/// A push notification, independent of channel and locale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    pub image: Option<ImagePath>,
    pub notification_type: NotificationType,
    pub product_category_id: Option<ProductCategoryId>,
    /// Whether the notification is enabled.
    pub status: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub translations: Vec<NotificationTranslation>,
}

/// Title and content of a notification for one channel and locale.
///
/// The `(notification_id, channel, locale)` triple is unique.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NotificationTranslation {
    pub notification_id: NotificationId,
    pub channel: ChannelCode,
    pub locale: LocaleCode,
    pub title: String,
    pub content: String,
}

/// One grid row: a distinct notification/channel/locale combination.
#[derive(Debug, Clone, Serialize)]
pub struct NotificationRow {
    pub notification_id: NotificationId,
    pub image: Option<ImagePath>,
    pub title: String,
    pub content: String,
    pub channel: ChannelCode,
    pub locale: LocaleCode,
    pub notification_type: NotificationType,
    pub product_category_id: Option<ProductCategoryId>,
    pub status: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    /// Name of the row's own channel in the display locale.
    pub channel_name: Option<ChannelName>,
    /// Names of every channel the notification targets, in translation order.
    pub channel_names: Vec<ChannelName>,
}
