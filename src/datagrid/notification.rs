//! Admin grid over push notifications, scoped to a locale and channel.

use crate::datagrid::{
    Action, Column, ColumnType, DataGrid, DisplayValue, ExtraFilter, FilterBinding, FilterOption,
    GridCriteria, HttpMethod, MassAction, MassActionKind, RenderContext, escape_html,
};
use crate::domain::channel::{Channel, Locale};
use crate::domain::grid::SortOrder;
use crate::domain::notification::NotificationRow;
use crate::domain::types::{
    ALL_SCOPE, ChannelCode, ChannelScope, LocaleCode, LocaleScope, NotificationId, Scope,
};
use crate::i18n::Translator;
use crate::repository::{
    ChannelReader, LocaleReader, NotificationColumn, NotificationGridQuery, NotificationReader,
    RepositoryResult,
};
use crate::routes::{
    NOTIFICATION_DELETE_ROUTE, NOTIFICATION_EDIT_ROUTE, NOTIFICATION_MASS_DELETE_ROUTE,
    NOTIFICATION_MASS_UPDATE_ROUTE,
};

pub struct NotificationDataGrid<'a, R> {
    repo: &'a R,
    locale: LocaleScope,
    channel: ChannelScope,
    /// Locale channel names are shown in.
    name_locale: LocaleCode,
    channels: Vec<Channel>,
    locales: Vec<Locale>,
}

impl<'a, R> NotificationDataGrid<'a, R>
where
    R: ChannelReader + LocaleReader + NotificationReader,
{
    /// Create a grid for the requested locale and channel codes.
    ///
    /// A channel code that matches no channel selects every channel.
    pub fn new(
        repo: &'a R,
        requested_locale: &str,
        requested_channel: &str,
        name_locale: LocaleCode,
    ) -> RepositoryResult<Self> {
        let channels = repo.list_channels(&name_locale)?;
        let locales = repo.list_locales()?;

        let channel = match ChannelScope::parse(requested_channel) {
            Scope::Only(code) if channels.iter().any(|channel| channel.code == code) => {
                Scope::Only(code)
            }
            Scope::Only(code) => {
                log::debug!("Unknown channel `{code}` requested, listing all channels");
                Scope::All
            }
            Scope::All => Scope::All,
        };

        Ok(Self {
            repo,
            locale: LocaleScope::parse(requested_locale),
            channel,
            name_locale,
            channels,
            locales,
        })
    }

    pub fn locale(&self) -> &LocaleScope {
        &self.locale
    }

    pub fn channel(&self) -> &ChannelScope {
        &self.channel
    }

    fn channel_codes(&self) -> Vec<ChannelCode> {
        match &self.channel {
            Scope::All => self.channels.iter().map(|c| c.code.clone()).collect(),
            Scope::Only(code) => vec![code.clone()],
        }
    }

    fn locale_codes(&self) -> Vec<LocaleCode> {
        match &self.locale {
            Scope::All => self.locales.iter().map(|l| l.code.clone()).collect(),
            Scope::Only(code) => vec![code.clone()],
        }
    }
}

fn render_id(row: &NotificationRow, _: &RenderContext<'_>) -> DisplayValue {
    DisplayValue::Number(i64::from(row.notification_id.get()))
}

fn render_image(row: &NotificationRow, context: &RenderContext<'_>) -> DisplayValue {
    match &row.image {
        Some(path) => DisplayValue::Html(format!(
            "<img src=\"{}\" class=\"img-thumbnail\" width=\"100px\" height=\"70px\" />",
            escape_html(&context.storage_url(path.as_str()))
        )),
        None => DisplayValue::Empty,
    }
}

fn render_title(row: &NotificationRow, _: &RenderContext<'_>) -> DisplayValue {
    DisplayValue::Text(row.title.clone())
}

fn render_content(row: &NotificationRow, _: &RenderContext<'_>) -> DisplayValue {
    DisplayValue::Text(row.content.clone())
}

fn render_type(row: &NotificationRow, _: &RenderContext<'_>) -> DisplayValue {
    DisplayValue::Text(row.notification_type.label())
}

/// Every channel the notification targets, not just the row's own channel.
fn render_channel_names(row: &NotificationRow, _: &RenderContext<'_>) -> DisplayValue {
    DisplayValue::Html(
        row.channel_names
            .iter()
            .map(|name| escape_html(name.as_str()).into_owned())
            .collect::<Vec<String>>()
            .join("<br>"),
    )
}

fn render_status(row: &NotificationRow, context: &RenderContext<'_>) -> DisplayValue {
    let (class, key) = if row.status {
        ("badge-success", "notification.status.enabled")
    } else {
        ("badge-danger", "notification.status.disabled")
    };
    DisplayValue::Html(format!(
        "<span class=\"badge badge-md {class}\">{}</span>",
        escape_html(&context.translator.trans(key))
    ))
}

fn render_created_at(row: &NotificationRow, _: &RenderContext<'_>) -> DisplayValue {
    DisplayValue::DateTime(row.created_at)
}

fn render_updated_at(row: &NotificationRow, _: &RenderContext<'_>) -> DisplayValue {
    DisplayValue::DateTime(row.updated_at)
}

fn always(_: &NotificationRow) -> bool {
    true
}

impl<R> DataGrid for NotificationDataGrid<'_, R>
where
    R: ChannelReader + LocaleReader + NotificationReader,
{
    type Row = NotificationRow;
    type Field = NotificationColumn;
    type Query = NotificationGridQuery;

    fn index(&self) -> &'static str {
        "notification_id"
    }

    fn default_sort(&self) -> (&'static str, NotificationColumn, SortOrder) {
        ("notification_id", NotificationColumn::NotificationId, SortOrder::Desc)
    }

    fn filters(&self) -> Vec<FilterBinding<NotificationColumn>> {
        vec![
            FilterBinding {
                key: "notification_id",
                field: NotificationColumn::NotificationId,
            },
            FilterBinding {
                key: "title",
                field: NotificationColumn::Title,
            },
            FilterBinding {
                key: "content",
                field: NotificationColumn::Content,
            },
            FilterBinding {
                key: "channel_name",
                field: NotificationColumn::ChannelName,
            },
            FilterBinding {
                key: "status",
                field: NotificationColumn::Status,
            },
            FilterBinding {
                key: "type",
                field: NotificationColumn::Type,
            },
            FilterBinding {
                key: "created_at",
                field: NotificationColumn::CreatedAt,
            },
            FilterBinding {
                key: "updated_at",
                field: NotificationColumn::UpdatedAt,
            },
        ]
    }

    fn field(&self, index: &str) -> Option<NotificationColumn> {
        match index {
            "notification_id" => Some(NotificationColumn::NotificationId),
            "title" => Some(NotificationColumn::Title),
            "content" => Some(NotificationColumn::Content),
            "type" => Some(NotificationColumn::Type),
            "channel_name" => Some(NotificationColumn::ChannelName),
            "status" => Some(NotificationColumn::Status),
            "created_at" => Some(NotificationColumn::CreatedAt),
            "updated_at" => Some(NotificationColumn::UpdatedAt),
            _ => None,
        }
    }

    fn columns(&self, translator: &Translator) -> Vec<Column<NotificationRow>> {
        vec![
            Column {
                index: "notification_id",
                label: translator.trans("notification.id"),
                kind: ColumnType::Number,
                searchable: true,
                sortable: true,
                filterable: true,
                render: render_id,
            },
            Column {
                index: "image",
                label: translator.trans("notification.image"),
                kind: ColumnType::Html,
                searchable: false,
                sortable: false,
                filterable: false,
                render: render_image,
            },
            Column {
                index: "title",
                label: translator.trans("notification.title"),
                kind: ColumnType::String,
                searchable: true,
                sortable: true,
                filterable: true,
                render: render_title,
            },
            Column {
                index: "content",
                label: translator.trans("notification.content"),
                kind: ColumnType::String,
                searchable: true,
                sortable: true,
                filterable: true,
                render: render_content,
            },
            Column {
                index: "type",
                label: translator.trans("notification.type"),
                kind: ColumnType::String,
                searchable: true,
                sortable: true,
                filterable: true,
                render: render_type,
            },
            Column {
                index: "channel_name",
                label: translator.trans("notification.channels"),
                kind: ColumnType::String,
                searchable: false,
                sortable: true,
                filterable: false,
                render: render_channel_names,
            },
            Column {
                index: "status",
                label: translator.trans("notification.status"),
                kind: ColumnType::Number,
                searchable: true,
                sortable: true,
                filterable: true,
                render: render_status,
            },
            Column {
                index: "created_at",
                label: translator.trans("notification.created"),
                kind: ColumnType::DateTime,
                searchable: true,
                sortable: true,
                filterable: true,
                render: render_created_at,
            },
            Column {
                index: "updated_at",
                label: translator.trans("notification.modified"),
                kind: ColumnType::DateTime,
                searchable: true,
                sortable: true,
                filterable: true,
                render: render_updated_at,
            },
        ]
    }

    fn actions(&self, translator: &Translator) -> Vec<Action<NotificationRow>> {
        vec![
            Action {
                title: translator.trans("datagrid.edit"),
                method: HttpMethod::Get,
                route: NOTIFICATION_EDIT_ROUTE,
                icon: "icon pencil-lg-icon",
                condition: always,
            },
            Action {
                title: translator.trans("datagrid.delete"),
                method: HttpMethod::Post,
                route: NOTIFICATION_DELETE_ROUTE,
                icon: "icon trash-icon",
                condition: always,
            },
        ]
    }

    fn mass_actions(&self, translator: &Translator) -> Vec<MassAction> {
        vec![
            MassAction {
                kind: MassActionKind::Delete,
                title: translator.trans("datagrid.delete"),
                route: NOTIFICATION_MASS_DELETE_ROUTE,
                options: Vec::new(),
            },
            MassAction {
                kind: MassActionKind::Update,
                title: translator.trans("datagrid.update-status"),
                route: NOTIFICATION_MASS_UPDATE_ROUTE,
                options: vec![
                    (translator.trans("notification.status.enabled"), 1),
                    (translator.trans("notification.status.disabled"), 0),
                ],
            },
        ]
    }

    fn extra_filters(&self, translator: &Translator) -> Vec<ExtraFilter> {
        let all = FilterOption {
            value: ALL_SCOPE.to_string(),
            label: translator.trans("datagrid.all"),
        };

        let channels = std::iter::once(all.clone())
            .chain(self.channels.iter().map(|channel| FilterOption {
                value: channel.code.to_string(),
                label: channel.display_name().to_string(),
            }))
            .collect();

        let locales = std::iter::once(all)
            .chain(self.locales.iter().map(|locale| FilterOption {
                value: locale.code.to_string(),
                label: locale.name.clone(),
            }))
            .collect();

        vec![
            ExtraFilter {
                key: "channel",
                label: translator.trans("datagrid.channel"),
                options: channels,
                selected: self.channel.as_str().to_string(),
            },
            ExtraFilter {
                key: "locale",
                label: translator.trans("datagrid.locale"),
                options: locales,
                selected: self.locale.as_str().to_string(),
            },
        ]
    }

    fn build_query(&self, criteria: GridCriteria<NotificationColumn>) -> NotificationGridQuery {
        let mut query = NotificationGridQuery::new(
            self.channel_codes(),
            self.locale_codes(),
            self.name_locale.clone(),
        )
        .sort(criteria.sort, criteria.order)
        .paginate(criteria.pagination.page, criteria.pagination.per_page);

        for filter in criteria.filters {
            query = query.filter(filter);
        }
        if let Some(search) = criteria.search {
            query = query.search(search);
        }
        query
    }

    fn fetch(&self, query: NotificationGridQuery) -> RepositoryResult<(usize, Vec<NotificationRow>)> {
        let (total, mut rows) = self.repo.list_notification_rows(&query)?;

        let mut ids: Vec<NotificationId> = rows.iter().map(|row| row.notification_id).collect();
        ids.sort_unstable();
        ids.dedup();

        // One query for the whole page instead of one per row.
        let names = self
            .repo
            .list_notification_channel_names(&ids, &self.name_locale)?;
        for row in &mut rows {
            row.channel_names = names
                .get(&row.notification_id)
                .cloned()
                .unwrap_or_default();
        }

        Ok((total, rows))
    }

    fn row_id(&self, row: &NotificationRow) -> i32 {
        row.notification_id.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datagrid::{AppliedFilter, GridRequest, GridView, render_grid};
    use crate::domain::notification::{Notification, NotificationTranslation};
    use crate::domain::types::{ChannelId, ChannelName, ImagePath, NotificationType};
    use crate::repository::test::TestRepository;
    use chrono::DateTime;

    fn channel(id: i32, code: &str, name: &str) -> Channel {
        Channel {
            id: ChannelId::new(id).unwrap(),
            code: ChannelCode::new(code).unwrap(),
            name: Some(ChannelName::new(name).unwrap()),
        }
    }

    fn locale(code: &str, name: &str) -> Locale {
        Locale {
            code: LocaleCode::new(code).unwrap(),
            name: name.to_string(),
        }
    }

    fn translation(id: i32, channel: &str, locale: &str, title: &str) -> NotificationTranslation {
        NotificationTranslation {
            notification_id: NotificationId::new(id).unwrap(),
            channel: ChannelCode::new(channel).unwrap(),
            locale: LocaleCode::new(locale).unwrap(),
            title: title.to_string(),
            content: format!("{title} content"),
        }
    }

    fn notification(
        id: i32,
        kind: &str,
        status: bool,
        translations: Vec<NotificationTranslation>,
    ) -> Notification {
        Notification {
            id: NotificationId::new(id).unwrap(),
            image: None,
            notification_type: NotificationType::new(kind).unwrap(),
            product_category_id: None,
            status,
            created_at: DateTime::from_timestamp(0, 0).unwrap().naive_utc(),
            updated_at: DateTime::from_timestamp(0, 0).unwrap().naive_utc(),
            translations,
        }
    }

    fn sample_repo(notifications: Vec<Notification>) -> TestRepository {
        TestRepository::new(
            notifications,
            vec![channel(1, "web", "Web"), channel(2, "mobile", "Mobile")],
            vec![locale("en", "English"), locale("fr", "French")],
        )
    }

    fn flash_sale() -> Notification {
        notification(
            5,
            "flash_sale",
            true,
            vec![
                translation(5, "web", "en", "Sale!"),
                translation(5, "mobile", "en", "Sale!"),
            ],
        )
    }

    fn render(
        repo: &TestRepository,
        locale: &str,
        channel: &str,
        request: GridRequest,
    ) -> GridView {
        let grid =
            NotificationDataGrid::new(repo, locale, channel, LocaleCode::new("en").unwrap())
                .unwrap();
        let translator = Translator::default();
        let context = RenderContext {
            translator: &translator,
            storage_url: "/storage",
        };
        render_grid(&grid, &request, &context).unwrap()
    }

    fn row_keys(view: &GridView) -> Vec<(i32, String)> {
        view.rows
            .iter()
            .map(|row| (row.id, row.cell("title").unwrap().value.clone()))
            .collect()
    }

    #[test]
    fn unknown_channel_falls_back_to_all() {
        let repo = sample_repo(vec![flash_sale()]);
        let grid =
            NotificationDataGrid::new(&repo, "all", "retired", LocaleCode::new("en").unwrap())
                .unwrap();

        assert_eq!(grid.channel(), &Scope::All);
        assert_eq!(grid.channel_codes().len(), 2);

        let view = render(&repo, "all", "retired", GridRequest::default());
        assert_eq!(view.rows.len(), 2);
    }

    #[test]
    fn known_channel_restricts_rows() {
        let repo = sample_repo(vec![flash_sale()]);
        let view = render(&repo, "all", "mobile", GridRequest::default());

        assert_eq!(view.rows.len(), 1);
        assert_eq!(view.pagination.total, 1);
    }

    #[test]
    fn locale_restricts_rows() {
        let repo = sample_repo(vec![
            flash_sale(),
            notification(6, "promotional", true, vec![translation(6, "web", "fr", "Soldes")]),
        ]);

        let french = render(&repo, "fr", "all", GridRequest::default());
        assert_eq!(row_keys(&french), vec![(6, "Soldes".to_string())]);

        let every = render(&repo, "all", "all", GridRequest::default());
        assert_eq!(every.rows.len(), 3);
    }

    #[test]
    fn renders_every_channel_name_on_each_row() {
        let repo = sample_repo(vec![flash_sale()]);
        let view = render(&repo, "all", "all", GridRequest::default());

        assert_eq!(view.rows.len(), 2);
        for row in &view.rows {
            assert_eq!(row.id, 5);
            let names = row.cell("channel_name").unwrap();
            assert_eq!(names.value, "Web<br>Mobile");
            assert!(names.html);
            assert_eq!(row.cell("type").unwrap().value, "Flash Sale");
        }
    }

    #[test]
    fn status_renders_as_badge() {
        let repo = sample_repo(vec![
            flash_sale(),
            notification(7, "order_update", false, vec![translation(7, "web", "en", "Shipped")]),
        ]);
        let view = render(&repo, "en", "web", GridRequest::default());

        let enabled = view.rows.iter().find(|row| row.id == 5).unwrap();
        let disabled = view.rows.iter().find(|row| row.id == 7).unwrap();
        assert_eq!(
            enabled.cell("status").unwrap().value,
            "<span class=\"badge badge-md badge-success\">Enabled</span>"
        );
        assert_eq!(
            disabled.cell("status").unwrap().value,
            "<span class=\"badge badge-md badge-danger\">Disabled</span>"
        );
        assert_eq!(disabled.cell("type").unwrap().value, "Order Update");
    }

    #[test]
    fn image_renders_thumbnail_only_when_present() {
        let mut with_image = flash_sale();
        with_image.image = Some(ImagePath::new("notifications/5.png").unwrap());
        let repo = sample_repo(vec![
            with_image,
            notification(8, "promotional", true, vec![translation(8, "web", "en", "Plain")]),
        ]);
        let view = render(&repo, "en", "web", GridRequest::default());

        let five = view.rows.iter().find(|row| row.id == 5).unwrap();
        let eight = view.rows.iter().find(|row| row.id == 8).unwrap();
        assert_eq!(
            five.cell("image").unwrap().value,
            "<img src=\"/storage/notifications/5.png\" class=\"img-thumbnail\" width=\"100px\" height=\"70px\" />"
        );
        assert_eq!(eight.cell("image").unwrap().value, "");
    }

    #[test]
    fn default_sort_is_id_descending_with_ten_per_page() {
        let notifications = (1..=12)
            .map(|id| {
                notification(id, "promotional", true, vec![translation(id, "web", "en", "T")])
            })
            .collect();
        let repo = sample_repo(notifications);

        let first = render(&repo, "all", "all", GridRequest::default());
        assert_eq!(first.rows.len(), 10);
        assert_eq!(first.rows[0].id, 12);
        assert_eq!(first.sort, "notification_id");
        assert_eq!(first.order, SortOrder::Desc);
        assert_eq!(first.pagination.last_page, 2);

        let second = render(
            &repo,
            "all",
            "all",
            GridRequest {
                page: Some(2),
                ..GridRequest::default()
            },
        );
        assert_eq!(
            second.rows.iter().map(|row| row.id).collect::<Vec<_>>(),
            vec![2, 1]
        );
    }

    #[test]
    fn order_alone_reverses_the_default_sort() {
        let notifications = (1..=3)
            .map(|id| {
                notification(id, "promotional", true, vec![translation(id, "web", "en", "T")])
            })
            .collect();
        let repo = sample_repo(notifications);

        let view = render(
            &repo,
            "all",
            "all",
            GridRequest::from_query(vec![("order", "asc")]),
        );
        assert_eq!(view.sort, "notification_id");
        assert_eq!(view.order, SortOrder::Asc);
        assert_eq!(
            view.rows.iter().map(|row| row.id).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
    }

    #[test]
    fn huge_page_renders_an_empty_page() {
        let repo = sample_repo(vec![flash_sale()]);
        let view = render(
            &repo,
            "all",
            "all",
            GridRequest::from_query(vec![("page", "18446744073709551615")]),
        );

        assert!(view.rows.is_empty());
        assert_eq!(view.pagination.total, 2);
        assert_eq!(view.pagination.page, usize::MAX);
    }

    #[test]
    fn channel_names_keep_slashes_and_escape_markup() {
        let repo = TestRepository::new(
            vec![flash_sale()],
            vec![channel(1, "web", "Web/App"), channel(2, "mobile", "<Mobile>")],
            vec![locale("en", "English")],
        );
        let view = render(&repo, "en", "web", GridRequest::default());

        assert_eq!(
            view.rows[0].cell("channel_name").unwrap().value,
            "Web/App<br>&lt;Mobile&gt;"
        );
    }

    #[test]
    fn view_echoes_applied_filters() {
        let repo = sample_repo(vec![flash_sale()]);
        let view = render(
            &repo,
            "all",
            "all",
            GridRequest::from_query(vec![
                ("title[like]", "sale"),
                ("status[NEQ]", "0"),
                ("notification_id[eq]", "abc"),
                ("unknown[eq]", "1"),
                ("search", "Sale"),
            ]),
        );

        assert_eq!(
            view.filters,
            vec![
                AppliedFilter {
                    key: "title".to_string(),
                    condition: "like",
                    value: "sale".to_string(),
                },
                AppliedFilter {
                    key: "status".to_string(),
                    condition: "neq",
                    value: "0".to_string(),
                },
            ]
        );
        assert_eq!(view.search.as_deref(), Some("Sale"));
        assert_eq!(view.rows.len(), 2);
    }

    #[test]
    fn applies_named_filters_and_ignores_malformed_ones() {
        let repo = sample_repo(vec![
            flash_sale(),
            notification(7, "order_update", false, vec![translation(7, "web", "en", "Shipped")]),
        ]);

        let disabled = render(
            &repo,
            "all",
            "all",
            GridRequest::from_query(vec![("status[eq]", "0")]),
        );
        assert_eq!(row_keys(&disabled), vec![(7, "Shipped".to_string())]);

        let titled = render(
            &repo,
            "all",
            "all",
            GridRequest::from_query(vec![("title[like]", "sale"), ("type[eq]", "flash_sale")]),
        );
        assert_eq!(titled.rows.len(), 2);

        let malformed = render(
            &repo,
            "all",
            "all",
            GridRequest::from_query(vec![("notification_id[eq]", "abc"), ("unknown[eq]", "1")]),
        );
        assert_eq!(malformed.rows.len(), 3);
    }

    #[test]
    fn search_matches_searchable_columns() {
        let repo = sample_repo(vec![
            flash_sale(),
            notification(7, "order_update", false, vec![translation(7, "web", "en", "Shipped")]),
        ]);
        let view = render(
            &repo,
            "all",
            "all",
            GridRequest::from_query(vec![("search", "shipp")]),
        );
        assert_eq!(row_keys(&view), vec![(7, "Shipped".to_string())]);
    }

    #[test]
    fn actions_link_to_named_routes() {
        let repo = sample_repo(vec![flash_sale()]);
        let view = render(&repo, "en", "web", GridRequest::default());

        let actions = &view.rows[0].actions;
        assert_eq!(actions.len(), 2);
        assert_eq!(actions[0].url, "/notifications/5/edit");
        assert_eq!(actions[0].method, HttpMethod::Get);
        assert_eq!(actions[1].url, "/notifications/5/delete");
        assert!(!actions[1].method.is_safe());

        assert_eq!(view.mass_actions.len(), 2);
        assert!(view.mass_actions.iter().all(|a| a.method == HttpMethod::Post));
        assert_eq!(view.mass_actions[0].url, "/notifications/mass-delete");
        assert_eq!(view.mass_actions[1].url, "/notifications/mass-update");
        assert_eq!(
            view.mass_actions[1]
                .options
                .iter()
                .map(|o| (o.label.as_str(), o.value.as_str()))
                .collect::<Vec<_>>(),
            vec![("Enabled", "1"), ("Disabled", "0")]
        );
    }

    #[test]
    fn extra_filters_offer_channels_and_locales() {
        let repo = sample_repo(vec![]);
        let view = render(&repo, "fr", "web", GridRequest::default());

        assert!(view.rows.is_empty());
        let channel = &view.extra_filters[0];
        assert_eq!(channel.key, "channel");
        assert_eq!(channel.selected, "web");
        assert_eq!(channel.options.len(), 3);
        assert_eq!(view.extra_filters[1].selected, "fr");
    }
}
