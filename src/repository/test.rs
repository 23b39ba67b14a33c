use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use crate::domain::channel::{Channel, Locale};
use crate::domain::grid::{ColumnFilter, FilterCondition, FilterValue, SortOrder};
use crate::domain::notification::{Notification, NotificationRow};
use crate::domain::types::{ChannelName, LocaleCode, NotificationId};
use crate::repository::errors::RepositoryResult;
use crate::repository::{
    ChannelReader, LocaleReader, NotificationColumn, NotificationGridQuery, NotificationReader,
    NotificationWriter,
};

/// Simple in-memory repository used for unit tests.
#[derive(Default)]
pub struct TestRepository {
    notifications: Vec<Notification>,
    channels: Vec<Channel>,
    locales: Vec<Locale>,
}

impl TestRepository {
    pub fn new(notifications: Vec<Notification>, channels: Vec<Channel>, locales: Vec<Locale>) -> Self {
        Self {
            notifications,
            channels,
            locales,
        }
    }

    fn channel(&self, code: &str) -> Option<&Channel> {
        self.channels.iter().find(|c| c.code.as_str() == code)
    }

    fn rows(&self, query: &NotificationGridQuery) -> Vec<NotificationRow> {
        let mut seen = HashSet::new();
        let mut rows = Vec::new();
        for notification in &self.notifications {
            for translation in &notification.translations {
                if !query.locales.contains(&translation.locale)
                    || !query.channels.contains(&translation.channel)
                {
                    continue;
                }
                let key = (
                    notification.id,
                    translation.channel.clone(),
                    translation.locale.clone(),
                );
                if !seen.insert(key) {
                    continue;
                }
                rows.push(NotificationRow {
                    notification_id: notification.id,
                    image: notification.image.clone(),
                    title: translation.title.clone(),
                    content: translation.content.clone(),
                    channel: translation.channel.clone(),
                    locale: translation.locale.clone(),
                    notification_type: notification.notification_type.clone(),
                    product_category_id: notification.product_category_id,
                    status: notification.status,
                    created_at: notification.created_at,
                    updated_at: notification.updated_at,
                    channel_name: self
                        .channel(translation.channel.as_str())
                        .and_then(|c| c.name.clone()),
                    channel_names: Vec::new(),
                });
            }
        }
        rows
    }
}

fn field_value(row: &NotificationRow, field: NotificationColumn) -> Option<FilterValue> {
    match field {
        NotificationColumn::NotificationId => {
            Some(FilterValue::Integer(i64::from(row.notification_id.get())))
        }
        NotificationColumn::Title => Some(FilterValue::Text(row.title.clone())),
        NotificationColumn::Content => Some(FilterValue::Text(row.content.clone())),
        NotificationColumn::ChannelName => row
            .channel_name
            .as_ref()
            .map(|name| FilterValue::Text(name.to_string())),
        NotificationColumn::Status => Some(FilterValue::Boolean(row.status)),
        NotificationColumn::Type => Some(FilterValue::Text(row.notification_type.to_string())),
        NotificationColumn::CreatedAt => Some(FilterValue::DateTime(row.created_at)),
        NotificationColumn::UpdatedAt => Some(FilterValue::DateTime(row.updated_at)),
    }
}

fn compare(a: &FilterValue, b: &FilterValue) -> Option<Ordering> {
    match (a, b) {
        (FilterValue::Integer(a), FilterValue::Integer(b)) => Some(a.cmp(b)),
        (FilterValue::Text(a), FilterValue::Text(b)) => Some(a.cmp(b)),
        (FilterValue::Boolean(a), FilterValue::Boolean(b)) => Some(a.cmp(b)),
        (FilterValue::DateTime(a), FilterValue::DateTime(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

fn contains_ci(haystack: &FilterValue, needle: &str) -> bool {
    haystack
        .as_text()
        .to_lowercase()
        .contains(&needle.to_lowercase())
}

fn matches(row: &NotificationRow, filter: &ColumnFilter<NotificationColumn>) -> bool {
    let Some(value) = field_value(row, filter.field) else {
        return false;
    };
    let needle = filter.value.as_text();
    match filter.condition {
        FilterCondition::Like => contains_ci(&value, &needle),
        FilterCondition::NotLike => !contains_ci(&value, &needle),
        condition => match compare(&value, &filter.value) {
            Some(ordering) => match condition {
                FilterCondition::Eq => ordering == Ordering::Equal,
                FilterCondition::Neq => ordering != Ordering::Equal,
                FilterCondition::Gt => ordering == Ordering::Greater,
                FilterCondition::Lt => ordering == Ordering::Less,
                FilterCondition::Gte => ordering != Ordering::Less,
                FilterCondition::Lte => ordering != Ordering::Greater,
                FilterCondition::Like | FilterCondition::NotLike => unreachable!(),
            },
            None => false,
        },
    }
}

impl ChannelReader for TestRepository {
    fn list_channels(&self, _name_locale: &LocaleCode) -> RepositoryResult<Vec<Channel>> {
        Ok(self.channels.clone())
    }
}

impl LocaleReader for TestRepository {
    fn list_locales(&self) -> RepositoryResult<Vec<Locale>> {
        Ok(self.locales.clone())
    }
}

impl NotificationReader for TestRepository {
    fn list_notification_rows(
        &self,
        query: &NotificationGridQuery,
    ) -> RepositoryResult<(usize, Vec<NotificationRow>)> {
        let mut items = self.rows(query);
        items.retain(|row| query.filters.iter().all(|filter| matches(row, filter)));
        if let Some(search) = &query.search {
            items.retain(|row| {
                search.fields.iter().any(|field| {
                    field_value(row, *field).is_some_and(|value| contains_ci(&value, &search.term))
                })
            });
        }

        items.sort_by(|a, b| {
            let primary = match (field_value(a, query.sort), field_value(b, query.sort)) {
                (Some(a), Some(b)) => compare(&a, &b).unwrap_or(Ordering::Equal),
                (None, Some(_)) => Ordering::Less,
                (Some(_), None) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            };
            let primary = match query.order {
                SortOrder::Asc => primary,
                SortOrder::Desc => primary.reverse(),
            };
            primary
                .then_with(|| b.notification_id.cmp(&a.notification_id))
                .then_with(|| a.channel.cmp(&b.channel))
                .then_with(|| a.locale.cmp(&b.locale))
        });

        let total = items.len();
        if let Some(pagination) = &query.pagination {
            items = items
                .into_iter()
                .skip(pagination.offset())
                .take(pagination.per_page)
                .collect();
        }
        Ok((total, items))
    }

    fn list_notification_channel_names(
        &self,
        ids: &[NotificationId],
        _name_locale: &LocaleCode,
    ) -> RepositoryResult<HashMap<NotificationId, Vec<ChannelName>>> {
        let mut names = HashMap::new();
        for notification in self.notifications.iter().filter(|n| ids.contains(&n.id)) {
            let mut seen = HashSet::new();
            let entry: &mut Vec<ChannelName> = names.entry(notification.id).or_default();
            for translation in &notification.translations {
                if !seen.insert(translation.channel.clone()) {
                    continue;
                }
                if let Some(channel) = self.channel(translation.channel.as_str()) {
                    entry.push(ChannelName::new(channel.display_name())?);
                }
            }
        }
        Ok(names)
    }

    fn get_notification_by_id(&self, id: NotificationId) -> RepositoryResult<Option<Notification>> {
        Ok(self.notifications.iter().find(|n| n.id == id).cloned())
    }
}

impl NotificationWriter for TestRepository {
    fn delete_notifications(&self, ids: &[NotificationId]) -> RepositoryResult<usize> {
        Ok(self
            .notifications
            .iter()
            .filter(|n| ids.contains(&n.id))
            .count())
    }

    fn update_notifications_status(
        &self,
        ids: &[NotificationId],
        _status: bool,
    ) -> RepositoryResult<usize> {
        Ok(self
            .notifications
            .iter()
            .filter(|n| ids.contains(&n.id))
            .count())
    }
}
