use crate::datagrid::notification::NotificationDataGrid;
use crate::datagrid::{GridRequest, GridView, RenderContext, render_grid};
use crate::domain::notification::Notification;
use crate::domain::types::{LocaleCode, NotificationId};
use crate::forms::notifications::{
    MassDeleteForm, MassDeleteFormPayload, MassUpdateForm, MassUpdateFormPayload,
};
use crate::i18n::Translator;
use crate::models::config::ServerConfig;
use crate::repository::{ChannelReader, LocaleReader, NotificationReader, NotificationWriter};

use super::{ServiceError, ServiceResult};

fn query_value<'a>(params: &'a [(String, String)], key: &str) -> Option<&'a str> {
    params
        .iter()
        .rev()
        .find(|(name, _)| name == key)
        .map(|(_, value)| value.as_str())
}

/// Core business logic for rendering the notification grid.
///
/// `locale` and `channel` query parameters select the grid scope and default
/// to the configured admin locale and default channel when absent. A blank
/// value selects everything. Remaining parameters drive paging, sorting,
/// search and named filters.
pub fn show_notifications<R>(
    repo: &R,
    config: &ServerConfig,
    translator: &Translator,
    params: &[(String, String)],
) -> ServiceResult<GridView>
where
    R: ChannelReader + LocaleReader + NotificationReader,
{
    let name_locale = LocaleCode::new(config.admin_locale.as_str()).map_err(|e| {
        log::error!("Invalid admin locale in configuration: {e}");
        ServiceError::Internal
    })?;

    let locale = query_value(params, "locale").unwrap_or(config.admin_locale.as_str());
    let channel = query_value(params, "channel").unwrap_or(config.default_channel.as_str());

    let grid = match NotificationDataGrid::new(repo, locale, channel, name_locale) {
        Ok(grid) => grid,
        Err(e) => {
            log::error!("Failed to load grid scope: {e}");
            return Err(ServiceError::Internal);
        }
    };

    let request = GridRequest::from_query(params.iter().map(|(key, value)| (key, value)));
    let context = RenderContext {
        translator,
        storage_url: &config.storage_url,
    };

    match render_grid(&grid, &request, &context) {
        Ok(view) => Ok(view),
        Err(e) => {
            log::error!("Failed to list notifications: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Fetch a notification with all its translations for the edit page.
pub fn show_notification<R>(repo: &R, notification_id: i32) -> ServiceResult<Notification>
where
    R: NotificationReader,
{
    let id = NotificationId::new(notification_id).map_err(|_| ServiceError::NotFound)?;

    match repo.get_notification_by_id(id) {
        Ok(Some(notification)) => Ok(notification),
        Ok(None) => Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get notification: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Delete one notification. Returns `Ok(false)` when the storage refused the
/// deletion.
pub fn delete_notification<R>(repo: &R, notification_id: i32) -> ServiceResult<bool>
where
    R: NotificationReader + NotificationWriter,
{
    let notification = show_notification(repo, notification_id)?;

    match repo.delete_notifications(&[notification.id]) {
        Ok(_) => {
            log::info!("Deleted notification {}", notification.id);
            Ok(true)
        }
        Err(e) => {
            log::error!("Failed to delete notification: {e}");
            Ok(false)
        }
    }
}

/// Delete the selected notifications, returning how many were removed.
///
/// A rejected selection yields [`ServiceError::Form`] or
/// [`ServiceError::TypeConstraint`] without touching storage.
pub fn mass_delete_notifications<R>(repo: &R, form: MassDeleteForm) -> ServiceResult<usize>
where
    R: NotificationWriter,
{
    let payload = MassDeleteFormPayload::try_from(form)?;

    match repo.delete_notifications(&payload.ids) {
        Ok(deleted) => {
            log::info!("Deleted {deleted} notifications");
            Ok(deleted)
        }
        Err(e) => {
            log::error!("Failed to delete notifications: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Enable or disable the selected notifications, returning how many changed.
pub fn mass_update_notifications<R>(repo: &R, form: MassUpdateForm) -> ServiceResult<usize>
where
    R: NotificationWriter,
{
    let payload = MassUpdateFormPayload::try_from(form)?;

    match repo.update_notifications_status(&payload.ids, payload.status) {
        Ok(updated) => {
            log::info!("Set status {} on {updated} notifications", payload.status);
            Ok(updated)
        }
        Err(e) => {
            log::error!("Failed to update notifications: {e}");
            Err(ServiceError::Internal)
        }
    }
}
