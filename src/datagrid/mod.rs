//! Generic list-rendering engine for admin data grids.
//!
//! A grid declares its query, named filters, columns and actions through the
//! [`DataGrid`] trait. [`render_grid`] turns a raw [`GridRequest`] into typed
//! criteria, runs the grid's query and formats every row into a serializable
//! [`GridView`] that templates and the JSON API consume.

use std::borrow::Cow;

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::domain::grid::{
    ColumnFilter, FilterCondition, FilterValue, GridField, Search, SortOrder,
};
use crate::i18n::Translator;
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated, Pagination};
use crate::repository::RepositoryResult;
use crate::routes::url_for;

pub mod notification;

/// Format used for `datetime` columns.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Value type of a column, as exposed to the rendering templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Number,
    String,
    Html,
    DateTime,
}

/// Output of a column formatter for one row.
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayValue {
    Empty,
    Number(i64),
    /// Plain text, escaped when rendered.
    Text(String),
    /// Trusted markup, rendered as is.
    Html(String),
    DateTime(NaiveDateTime),
}

impl DisplayValue {
    fn into_cell(self, index: &'static str) -> GridCell {
        let (value, html) = match self {
            DisplayValue::Empty => (String::new(), false),
            DisplayValue::Number(value) => (value.to_string(), false),
            DisplayValue::Text(value) => (value, false),
            DisplayValue::Html(value) => (value, true),
            DisplayValue::DateTime(value) => (value.format(DATETIME_FORMAT).to_string(), false),
        };
        GridCell { index, value, html }
    }
}

/// Escape text for an HTML body or a quoted attribute.
pub fn escape_html(value: &str) -> Cow<'_, str> {
    if !value.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(value);
    }
    let mut escaped = String::with_capacity(value.len() + 8);
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}

/// Services available to column formatters.
pub struct RenderContext<'a> {
    pub translator: &'a Translator,
    /// Public URL prefix of stored files.
    pub storage_url: &'a str,
}

impl RenderContext<'_> {
    /// Public URL of a stored file.
    pub fn storage_url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.storage_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

/// Row formatter registered per column.
pub type Formatter<R> = fn(&R, &RenderContext<'_>) -> DisplayValue;

/// Declaration of a grid column.
pub struct Column<R> {
    pub index: &'static str,
    pub label: String,
    pub kind: ColumnType,
    pub searchable: bool,
    pub sortable: bool,
    pub filterable: bool,
    pub render: Formatter<R>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    /// Whether the method is free of side effects.
    pub const fn is_safe(self) -> bool {
        matches!(self, HttpMethod::Get)
    }
}

/// A per-row action linking to a named route.
pub struct Action<R> {
    pub title: String,
    pub method: HttpMethod,
    pub route: &'static str,
    pub icon: &'static str,
    /// Whether the action is offered for a row.
    pub condition: fn(&R) -> bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MassActionKind {
    Delete,
    Update,
}

/// A bulk action applied to the selected row identifiers. Always submitted
/// with POST.
pub struct MassAction {
    pub kind: MassActionKind,
    pub title: String,
    pub route: &'static str,
    /// `(label, value)` choices for update actions.
    pub options: Vec<(String, i32)>,
}

/// Maps a public filter key to the field it restricts.
#[derive(Debug, Clone, Copy)]
pub struct FilterBinding<F> {
    pub key: &'static str,
    pub field: F,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterOption {
    pub value: String,
    pub label: String,
}

/// A context selector shown above the grid (channel, locale, ...).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtraFilter {
    pub key: &'static str,
    pub label: String,
    pub options: Vec<FilterOption>,
    pub selected: String,
}

/// Typed criteria resolved from a request.
#[derive(Debug, Clone)]
pub struct GridCriteria<F> {
    pub filters: Vec<ColumnFilter<F>>,
    pub search: Option<Search<F>>,
    pub sort: F,
    pub order: SortOrder,
    pub pagination: Pagination,
}

/// A grid definition consumed by [`render_grid`].
pub trait DataGrid {
    type Row;
    type Field: GridField;
    type Query;

    /// Column whose value identifies a row.
    fn index(&self) -> &'static str;

    fn items_per_page(&self) -> usize {
        DEFAULT_ITEMS_PER_PAGE
    }

    /// Column index, field and direction used when the request names no
    /// valid sort.
    fn default_sort(&self) -> (&'static str, Self::Field, SortOrder);

    /// Named filters callers may apply.
    fn filters(&self) -> Vec<FilterBinding<Self::Field>>;

    /// Field backing a column index, for sorting.
    fn field(&self, index: &str) -> Option<Self::Field>;

    fn columns(&self, translator: &Translator) -> Vec<Column<Self::Row>>;

    fn actions(&self, translator: &Translator) -> Vec<Action<Self::Row>>;

    fn mass_actions(&self, translator: &Translator) -> Vec<MassAction>;

    fn extra_filters(&self, _translator: &Translator) -> Vec<ExtraFilter> {
        Vec::new()
    }

    /// Build the storage query for the resolved criteria.
    fn build_query(&self, criteria: GridCriteria<Self::Field>) -> Self::Query;

    /// Execute the query, returning the total row count and one page of rows.
    fn fetch(&self, query: Self::Query) -> RepositoryResult<(usize, Vec<Self::Row>)>;

    fn row_id(&self, row: &Self::Row) -> i32;
}

/// A filter as it arrives in the query string: `key[condition]=value`.
#[derive(Debug, Clone, PartialEq)]
pub struct RawFilter {
    pub key: String,
    pub condition: FilterCondition,
    pub value: String,
}

/// A filter that resolved against a grid binding, echoed back so links can
/// carry it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppliedFilter {
    pub key: String,
    pub condition: &'static str,
    pub value: String,
}

/// Raw list request parameters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GridRequest {
    pub page: Option<usize>,
    pub sort: Option<String>,
    pub order: Option<SortOrder>,
    pub search: Option<String>,
    pub filters: Vec<RawFilter>,
}

impl GridRequest {
    /// Parse query string pairs. Unknown parameters and malformed filters are
    /// ignored.
    pub fn from_query<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut request = GridRequest::default();
        for (key, value) in pairs {
            let (key, value) = (key.as_ref(), value.as_ref());
            match key {
                "page" => request.page = value.trim().parse().ok(),
                "sort" => request.sort = Some(value.trim().to_string()).filter(|s| !s.is_empty()),
                "order" => request.order = SortOrder::parse(value),
                "search" => {
                    request.search = Some(value.trim().to_string()).filter(|s| !s.is_empty())
                }
                _ => {
                    let Some((name, rest)) = key.split_once('[') else {
                        continue;
                    };
                    let Some(condition) = rest
                        .strip_suffix(']')
                        .and_then(FilterCondition::parse)
                    else {
                        continue;
                    };
                    request.filters.push(RawFilter {
                        key: name.to_string(),
                        condition,
                        value: value.to_string(),
                    });
                }
            }
        }
        request
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GridColumn {
    pub index: &'static str,
    pub label: String,
    #[serde(rename = "type")]
    pub kind: ColumnType,
    pub searchable: bool,
    pub sortable: bool,
    pub filterable: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridCell {
    pub index: &'static str,
    pub value: String,
    /// Whether `value` is markup.
    pub html: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionLink {
    pub title: String,
    pub method: HttpMethod,
    pub icon: &'static str,
    pub url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct GridRow {
    pub id: i32,
    pub cells: Vec<GridCell>,
    pub actions: Vec<ActionLink>,
}

impl GridRow {
    pub fn cell(&self, index: &str) -> Option<&GridCell> {
        self.cells.iter().find(|cell| cell.index == index)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MassActionLink {
    #[serde(rename = "type")]
    pub kind: MassActionKind,
    pub title: String,
    pub method: HttpMethod,
    pub url: String,
    pub options: Vec<FilterOption>,
}

/// A rendered grid page.
#[derive(Debug, Clone, Serialize)]
pub struct GridView {
    pub index: &'static str,
    pub columns: Vec<GridColumn>,
    pub rows: Vec<GridRow>,
    pub mass_actions: Vec<MassActionLink>,
    pub extra_filters: Vec<ExtraFilter>,
    pub sort: &'static str,
    pub order: SortOrder,
    pub search: Option<String>,
    pub filters: Vec<AppliedFilter>,
    pub pagination: Paginated,
}

/// Criteria resolved from a request, with what the view echoes back.
struct Resolved<F> {
    criteria: GridCriteria<F>,
    sort_index: &'static str,
    applied: Vec<AppliedFilter>,
}

/// Resolve raw request parameters against the grid's declarations.
fn resolve_criteria<G: DataGrid>(
    grid: &G,
    columns: &[Column<G::Row>],
    request: &GridRequest,
) -> Resolved<G::Field> {
    let bindings = grid.filters();

    let (filters, applied): (Vec<_>, Vec<_>) = request
        .filters
        .iter()
        .filter_map(|raw| {
            let Some(binding) = bindings.iter().find(|binding| binding.key == raw.key) else {
                log::debug!("Ignoring unknown filter `{}`", raw.key);
                return None;
            };
            match FilterValue::parse(binding.field.kind(), &raw.value) {
                Some(value) => Some((
                    ColumnFilter {
                        field: binding.field,
                        condition: raw.condition,
                        value,
                    },
                    AppliedFilter {
                        key: raw.key.clone(),
                        condition: raw.condition.as_str(),
                        value: raw.value.clone(),
                    },
                )),
                None => {
                    log::debug!("Ignoring filter `{}` with value `{}`", raw.key, raw.value);
                    None
                }
            }
        })
        .unzip();

    let search = request.search.as_ref().map(|term| Search {
        term: term.clone(),
        fields: columns
            .iter()
            .filter(|column| column.searchable)
            .filter_map(|column| {
                bindings
                    .iter()
                    .find(|binding| binding.key == column.index)
                    .map(|binding| binding.field)
            })
            .collect(),
    });

    let (default_index, default_field, default_order) = grid.default_sort();
    let requested = request.sort.as_deref().and_then(|sort| {
        let column = columns
            .iter()
            .find(|column| column.sortable && column.index == sort)?;
        grid.field(column.index).map(|field| (column.index, field))
    });
    let (sort_index, sort) = requested.unwrap_or((default_index, default_field));
    let order = request.order.unwrap_or(default_order);

    let pagination = Pagination::new(request.page.unwrap_or(1), grid.items_per_page());

    Resolved {
        criteria: GridCriteria {
            filters,
            search,
            sort,
            order,
            pagination,
        },
        sort_index,
        applied,
    }
}

/// Run a grid for one list request and format the resulting page.
pub fn render_grid<G: DataGrid>(
    grid: &G,
    request: &GridRequest,
    context: &RenderContext<'_>,
) -> RepositoryResult<GridView> {
    let columns = grid.columns(context.translator);
    let Resolved {
        criteria,
        sort_index,
        applied,
    } = resolve_criteria(grid, &columns, request);
    let order = criteria.order;
    let pagination = criteria.pagination;

    let (total, rows) = grid.fetch(grid.build_query(criteria))?;

    let actions = grid.actions(context.translator);
    let rows = rows
        .iter()
        .map(|row| {
            let id = grid.row_id(row);
            GridRow {
                id,
                cells: columns
                    .iter()
                    .map(|column| (column.render)(row, context).into_cell(column.index))
                    .collect(),
                actions: actions
                    .iter()
                    .filter(|action| (action.condition)(row))
                    .filter_map(|action| {
                        let url = url_for(action.route, Some(id))?;
                        Some(ActionLink {
                            title: action.title.clone(),
                            method: action.method,
                            icon: action.icon,
                            url,
                        })
                    })
                    .collect(),
            }
        })
        .collect();

    let mass_actions = grid
        .mass_actions(context.translator)
        .into_iter()
        .filter_map(|action| {
            let url = url_for(action.route, None)?;
            Some(MassActionLink {
                kind: action.kind,
                title: action.title,
                method: HttpMethod::Post,
                url,
                options: action
                    .options
                    .into_iter()
                    .map(|(label, value)| FilterOption {
                        value: value.to_string(),
                        label,
                    })
                    .collect(),
            })
        })
        .collect();

    Ok(GridView {
        index: grid.index(),
        columns: columns
            .iter()
            .map(|column| GridColumn {
                index: column.index,
                label: column.label.clone(),
                kind: column.kind,
                searchable: column.searchable,
                sortable: column.sortable,
                filterable: column.filterable,
            })
            .collect(),
        rows,
        mass_actions,
        extra_filters: grid.extra_filters(context.translator),
        sort: sort_index,
        order,
        search: request.search.clone(),
        filters: applied,
        pagination: Paginated::new(pagination, total),
    })
}
