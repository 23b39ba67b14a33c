use diesel::prelude::*;

use crate::domain::channel::{Channel, Locale};
use crate::domain::types::LocaleCode;
use crate::models::channel::{Channel as DbChannel, Locale as DbLocale};
use crate::repository::errors::RepositoryResult;
use crate::repository::{ChannelReader, DieselRepository, LocaleReader};

impl ChannelReader for DieselRepository {
    fn list_channels(&self, name_locale: &LocaleCode) -> RepositoryResult<Vec<Channel>> {
        use crate::schema::{channel_translations, channels};

        let mut conn = self.conn()?;

        let results = channels::table
            .left_join(
                channel_translations::table.on(channel_translations::channel_id
                    .eq(channels::id)
                    .and(channel_translations::locale.eq(name_locale.as_str()))),
            )
            .select((DbChannel::as_select(), channel_translations::name.nullable()))
            .order(channels::id.asc())
            .load::<(DbChannel, Option<String>)>(&mut conn)?;

        let results = results
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<Channel>, _>>()?;
        Ok(results)
    }
}

impl LocaleReader for DieselRepository {
    fn list_locales(&self) -> RepositoryResult<Vec<Locale>> {
        use crate::schema::locales;

        let mut conn = self.conn()?;

        let results = locales::table
            .order(locales::id.asc())
            .select(DbLocale::as_select())
            .load::<DbLocale>(&mut conn)?;

        let results = results
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<Locale>, _>>()?;
        Ok(results)
    }
}
