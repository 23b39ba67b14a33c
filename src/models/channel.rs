use diesel::prelude::*;

use crate::domain::channel::{Channel as DomainChannel, Locale as DomainLocale};
use crate::domain::types::{ChannelCode, ChannelName, LocaleCode, TypeConstraintError};

/// Diesel model representing the `channels` table.
#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::channels)]
pub struct Channel {
    pub id: i32,
    pub code: String,
}

/// Diesel model representing the `locales` table.
#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::locales)]
pub struct Locale {
    pub id: i32,
    pub code: String,
    pub name: String,
}

impl TryFrom<(Channel, Option<String>)> for DomainChannel {
    type Error = TypeConstraintError;

    fn try_from((channel, name): (Channel, Option<String>)) -> Result<Self, Self::Error> {
        Ok(Self {
            id: channel.id.try_into()?,
            code: ChannelCode::new(channel.code)?,
            name: name
                .filter(|name| !name.trim().is_empty())
                .map(ChannelName::new)
                .transpose()?,
        })
    }
}

impl TryFrom<Locale> for DomainLocale {
    type Error = TypeConstraintError;

    fn try_from(locale: Locale) -> Result<Self, Self::Error> {
        Ok(Self {
            code: LocaleCode::new(locale.code)?,
            name: locale.name,
        })
    }
}
