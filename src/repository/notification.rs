use std::collections::HashMap;

use chrono::NaiveDateTime;
use diesel::prelude::*;
use diesel::query_builder::{BoxedSqlQuery, SqlQuery};
use diesel::sql_types::{BigInt, Bool, Text, Timestamp};
use diesel::sqlite::Sqlite;

use crate::domain::grid::{ColumnFilter, FilterCondition, FilterValue, Search};
use crate::domain::notification::{Notification, NotificationRow};
use crate::domain::types::{ChannelName, LocaleCode, NotificationId};
use crate::models::notification::{
    GridCount, Notification as DbNotification, NotificationChannelName, NotificationGridRow,
    NotificationTranslation as DbNotificationTranslation,
};
use crate::repository::errors::RepositoryResult;
use crate::repository::{
    DieselRepository, NotificationColumn, NotificationGridQuery, NotificationReader,
    NotificationWriter,
};

const GRID_SELECT: &str = "SELECT pn_trans.push_notification_id AS notification_id, \
    pn.image AS image, \
    pn_trans.title AS title, \
    pn_trans.content AS content, \
    pn_trans.channel AS channel, \
    pn_trans.locale AS locale, \
    pn.type AS notification_type, \
    pn.product_category_id AS product_category_id, \
    pn.status AS status, \
    pn.created_at AS created_at, \
    pn.updated_at AS updated_at, \
    ch_t.name AS channel_name";

/// Column expression a grid field maps to.
fn column_sql(column: NotificationColumn) -> &'static str {
    match column {
        NotificationColumn::NotificationId => "pn_trans.push_notification_id",
        NotificationColumn::Title => "pn_trans.title",
        NotificationColumn::Content => "pn_trans.content",
        NotificationColumn::ChannelName => "ch_t.name",
        NotificationColumn::Status => "pn.status",
        NotificationColumn::Type => "pn.type",
        NotificationColumn::CreatedAt => "pn.created_at",
        NotificationColumn::UpdatedAt => "pn.updated_at",
    }
}

enum Bind {
    Integer(i64),
    Text(String),
    Boolean(bool),
    DateTime(NaiveDateTime),
}

impl From<FilterValue> for Bind {
    fn from(value: FilterValue) -> Self {
        match value {
            FilterValue::Integer(value) => Bind::Integer(value),
            FilterValue::Text(value) => Bind::Text(value),
            FilterValue::Boolean(value) => Bind::Boolean(value),
            FilterValue::DateTime(value) => Bind::DateTime(value),
        }
    }
}

/// Raw SQL text with positional binds, turned into a boxed Diesel query.
struct SqlBuilder {
    sql: String,
    binds: Vec<Bind>,
}

impl SqlBuilder {
    fn new(sql: &str) -> Self {
        Self {
            sql: sql.to_string(),
            binds: Vec::new(),
        }
    }

    fn push(&mut self, sql: &str) -> &mut Self {
        self.sql.push_str(sql);
        self
    }

    fn bind(&mut self, bind: Bind) -> &mut Self {
        self.sql.push('?');
        self.binds.push(bind);
        self
    }

    /// `AND <column> IN (?, ...)`; an empty set matches nothing.
    fn push_in(&mut self, column: &str, values: Vec<Bind>) -> &mut Self {
        if values.is_empty() {
            return self.push(" AND 0 = 1");
        }
        self.push(&format!(" AND {column} IN ("));
        for (i, value) in values.into_iter().enumerate() {
            if i > 0 {
                self.push(", ");
            }
            self.bind(value);
        }
        self.push(")")
    }

    fn into_query(self) -> BoxedSqlQuery<'static, Sqlite, SqlQuery> {
        let mut query = diesel::sql_query(self.sql).into_boxed::<Sqlite>();
        for bind in self.binds {
            query = match bind {
                Bind::Integer(value) => query.bind::<BigInt, _>(value),
                Bind::Text(value) => query.bind::<Text, _>(value),
                Bind::Boolean(value) => query.bind::<Bool, _>(value),
                Bind::DateTime(value) => query.bind::<Timestamp, _>(value),
            };
        }
        query
    }
}

/// `%term%` with LIKE wildcards in the term escaped.
fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

fn push_filter(sql: &mut SqlBuilder, filter: &ColumnFilter<NotificationColumn>) {
    let column = column_sql(filter.field);
    let operator = match filter.condition {
        FilterCondition::Like | FilterCondition::NotLike => {
            let operator = if filter.condition == FilterCondition::Like {
                "LIKE"
            } else {
                "NOT LIKE"
            };
            sql.push(&format!(" AND CAST({column} AS TEXT) {operator} "))
                .bind(Bind::Text(like_pattern(&filter.value.as_text())))
                .push(" ESCAPE '\\'");
            return;
        }
        FilterCondition::Eq => "=",
        FilterCondition::Neq => "<>",
        FilterCondition::Gt => ">",
        FilterCondition::Lt => "<",
        FilterCondition::Gte => ">=",
        FilterCondition::Lte => "<=",
    };
    sql.push(&format!(" AND {column} {operator} "))
        .bind(filter.value.clone().into());
}

fn push_search(sql: &mut SqlBuilder, search: &Search<NotificationColumn>) {
    if search.fields.is_empty() || search.term.trim().is_empty() {
        return;
    }
    sql.push(" AND (");
    for (i, field) in search.fields.iter().enumerate() {
        if i > 0 {
            sql.push(" OR ");
        }
        sql.push(&format!("CAST({} AS TEXT) LIKE ", column_sql(*field)))
            .bind(Bind::Text(like_pattern(search.term.trim())))
            .push(" ESCAPE '\\'");
    }
    sql.push(")");
}

/// Joins, scoping, filters and grouping shared by the row and count queries.
fn push_grid_body(sql: &mut SqlBuilder, query: &NotificationGridQuery) {
    sql.push(
        " FROM push_notification_translations AS pn_trans \
         LEFT JOIN push_notifications AS pn ON pn_trans.push_notification_id = pn.id \
         LEFT JOIN channels AS ch ON pn_trans.channel = ch.code \
         LEFT JOIN channel_translations AS ch_t ON ch.id = ch_t.channel_id AND ch_t.locale = ",
    )
    .bind(Bind::Text(query.name_locale.as_str().to_string()));

    // Translations left behind by a deleted notification are not listed.
    sql.push(" WHERE pn.id IS NOT NULL");
    sql.push_in(
        "pn_trans.locale",
        query
            .locales
            .iter()
            .map(|locale| Bind::Text(locale.as_str().to_string()))
            .collect(),
    );
    sql.push_in(
        "pn_trans.channel",
        query
            .channels
            .iter()
            .map(|channel| Bind::Text(channel.as_str().to_string()))
            .collect(),
    );

    for filter in &query.filters {
        push_filter(sql, filter);
    }
    if let Some(search) = &query.search {
        push_search(sql, search);
    }

    sql.push(" GROUP BY pn_trans.push_notification_id, pn_trans.channel, pn_trans.locale");
}

impl NotificationReader for DieselRepository {
    fn list_notification_rows(
        &self,
        query: &NotificationGridQuery,
    ) -> RepositoryResult<(usize, Vec<NotificationRow>)> {
        let mut conn = self.conn()?;

        let mut count = SqlBuilder::new(
            "SELECT COUNT(*) AS total FROM (SELECT pn_trans.push_notification_id",
        );
        push_grid_body(&mut count, query);
        count.push(") AS grid");
        let total = count.into_query().get_result::<GridCount>(&mut conn)?.total as usize;

        let mut items = SqlBuilder::new(GRID_SELECT);
        push_grid_body(&mut items, query);
        items.push(&format!(
            " ORDER BY {} {}",
            column_sql(query.sort),
            query.order.as_sql()
        ));
        if query.sort != NotificationColumn::NotificationId {
            items.push(", pn_trans.push_notification_id DESC");
        }
        items.push(", pn_trans.channel ASC, pn_trans.locale ASC");

        // Apply pagination if requested
        if let Some(pagination) = &query.pagination {
            items
                .push(" LIMIT ")
                .bind(Bind::Integer(
                    i64::try_from(pagination.per_page).unwrap_or(i64::MAX),
                ))
                .push(" OFFSET ")
                .bind(Bind::Integer(
                    i64::try_from(pagination.offset()).unwrap_or(i64::MAX),
                ));
        }

        let items = items
            .into_query()
            .load::<NotificationGridRow>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<NotificationRow>, _>>()?;

        Ok((total, items))
    }

    fn list_notification_channel_names(
        &self,
        ids: &[NotificationId],
        name_locale: &LocaleCode,
    ) -> RepositoryResult<HashMap<NotificationId, Vec<ChannelName>>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let mut conn = self.conn()?;

        let mut sql = SqlBuilder::new(
            "SELECT pn_trans.push_notification_id AS notification_id, \
             pn_trans.channel AS channel, \
             MAX(ch_t.name) AS channel_name \
             FROM push_notification_translations AS pn_trans \
             INNER JOIN channels AS ch ON pn_trans.channel = ch.code \
             LEFT JOIN channel_translations AS ch_t ON ch.id = ch_t.channel_id AND ch_t.locale = ",
        );
        sql.bind(Bind::Text(name_locale.as_str().to_string()))
            .push(" WHERE 1 = 1")
            .push_in(
                "pn_trans.push_notification_id",
                ids.iter()
                    .map(|id| Bind::Integer(i64::from(id.get())))
                    .collect(),
            )
            .push(
                " GROUP BY pn_trans.push_notification_id, pn_trans.channel \
                 ORDER BY pn_trans.push_notification_id, MIN(pn_trans.id)",
            );

        let rows = sql
            .into_query()
            .load::<NotificationChannelName>(&mut conn)?;

        let mut names: HashMap<NotificationId, Vec<ChannelName>> = HashMap::new();
        for row in rows {
            let id = NotificationId::new(row.notification_id)?;
            names.entry(id).or_default().push(row.into_display_name()?);
        }

        Ok(names)
    }

    fn get_notification_by_id(&self, id: NotificationId) -> RepositoryResult<Option<Notification>> {
        use crate::schema::{push_notification_translations, push_notifications};

        let mut conn = self.conn()?;

        let notification = push_notifications::table
            .filter(push_notifications::id.eq(id.get()))
            .select(DbNotification::as_select())
            .first::<DbNotification>(&mut conn)
            .optional()?;

        let Some(notification) = notification else {
            return Ok(None);
        };

        let translations = DbNotificationTranslation::belonging_to(&notification)
            .select(DbNotificationTranslation::as_select())
            .order(push_notification_translations::id.asc())
            .load::<DbNotificationTranslation>(&mut conn)?;

        let notification: Notification = (notification, translations).try_into()?;
        Ok(Some(notification))
    }
}

impl NotificationWriter for DieselRepository {
    fn delete_notifications(&self, ids: &[NotificationId]) -> RepositoryResult<usize> {
        use crate::schema::{push_notification_translations, push_notifications};

        let ids = ids.iter().map(|id| id.get()).collect::<Vec<i32>>();
        let mut conn = self.conn()?;

        let affected = conn.transaction(|conn| {
            diesel::delete(
                push_notification_translations::table
                    .filter(push_notification_translations::push_notification_id.eq_any(&ids)),
            )
            .execute(conn)?;

            diesel::delete(push_notifications::table.filter(push_notifications::id.eq_any(&ids)))
                .execute(conn)
        })?;

        Ok(affected)
    }

    fn update_notifications_status(
        &self,
        ids: &[NotificationId],
        status: bool,
    ) -> RepositoryResult<usize> {
        use crate::schema::push_notifications;

        let ids = ids.iter().map(|id| id.get()).collect::<Vec<i32>>();
        let mut conn = self.conn()?;

        let affected = diesel::update(
            push_notifications::table.filter(push_notifications::id.eq_any(&ids)),
        )
        .set((
            push_notifications::status.eq(status),
            push_notifications::updated_at.eq(diesel::dsl::now),
        ))
        .execute(&mut conn)?;

        Ok(affected)
    }
}
