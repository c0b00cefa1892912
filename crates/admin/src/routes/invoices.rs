//! Invoice route handlers.
//!
//! The list page is served from the page cache; create, update and delete
//! revalidate it before redirecting back.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use chrono::Utc;
use serde::Deserialize;
use tracing::instrument;
use url::form_urlencoded;

use invoice_desk_core::{InvoiceId, InvoiceStatus};

use crate::cache::PageCache;
use crate::db::{CustomerRepository, InvoiceRepository};
use crate::error::AppError;
use crate::filters;
use crate::forms::{FieldErrors, FormState, InvoiceFormInput};
use crate::middleware::RequireAuth;
use crate::models::{CustomerField, Invoice, InvoiceListItem};
use crate::services::invoices::{self, INVOICES_PATH};
use crate::state::AppState;

const CREATE_PATH: &str = "/dashboard/invoices/create";

// =============================================================================
// Query Types
// =============================================================================

/// Search and pagination parameters for the list page.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub query: Option<String>,
    pub page: Option<String>,
}

// =============================================================================
// Views
// =============================================================================

/// Invoice table row for templates.
#[derive(Debug, Clone)]
pub struct InvoiceRowView {
    pub id: String,
    pub name: String,
    pub email: String,
    pub image_url: String,
    pub amount: String,
    pub date: String,
    pub status_label: &'static str,
    pub is_paid: bool,
}

impl From<&InvoiceListItem> for InvoiceRowView {
    fn from(item: &InvoiceListItem) -> Self {
        Self {
            id: item.id.to_string(),
            name: item.name.clone(),
            email: item.email.clone(),
            image_url: item.image_url.clone(),
            amount: item.amount.to_string(),
            date: item.date.format("%b %-d, %Y").to_string(),
            status_label: item.status.label(),
            is_paid: item.status == InvoiceStatus::Paid,
        }
    }
}

/// One pagination control. Ellipses have no URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLink {
    pub label: String,
    pub url: Option<String>,
    pub current: bool,
}

/// Customer `<option>` for the invoice form.
#[derive(Debug, Clone)]
pub struct CustomerOption {
    pub id: String,
    pub name: String,
    pub selected: bool,
}

/// Status radio button for the invoice form.
#[derive(Debug, Clone)]
pub struct StatusOption {
    pub value: &'static str,
    pub label: &'static str,
    pub checked: bool,
}

/// Field values the form is rendered with.
#[derive(Debug, Clone, Default)]
pub struct InvoiceFormView {
    pub customer_id: String,
    pub amount: String,
    pub status: String,
}

impl From<&InvoiceFormInput> for InvoiceFormView {
    fn from(input: &InvoiceFormInput) -> Self {
        Self {
            customer_id: input.customer_id.clone().unwrap_or_default(),
            amount: input.amount.clone().unwrap_or_default(),
            status: input.status.clone().unwrap_or_default(),
        }
    }
}

impl From<&Invoice> for InvoiceFormView {
    fn from(invoice: &Invoice) -> Self {
        Self {
            customer_id: invoice.customer_id.to_string(),
            amount: invoice.amount.to_dollars().to_string(),
            status: invoice.status.as_str().to_string(),
        }
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Invoice list page template.
#[derive(Template)]
#[template(path = "invoices/index.html")]
pub struct InvoicesIndexTemplate {
    pub current_path: String,
    pub invoices: Vec<InvoiceRowView>,
    pub search_query: String,
    pub pages: Vec<PageLink>,
    pub previous_url: Option<String>,
    pub next_url: Option<String>,
}

/// Create/edit invoice form template.
#[derive(Template)]
#[template(path = "invoices/form.html")]
pub struct InvoiceFormTemplate {
    pub current_path: String,
    pub heading: &'static str,
    pub action: String,
    pub submit_label: &'static str,
    pub customers: Vec<CustomerOption>,
    pub statuses: Vec<StatusOption>,
    pub amount: String,
    pub errors: FieldErrors,
    pub message: Option<String>,
}

impl InvoiceFormTemplate {
    fn new(
        action: String,
        editing: bool,
        customers: &[CustomerField],
        values: &InvoiceFormView,
        state: FormState,
    ) -> Self {
        let customers = customers
            .iter()
            .map(|c| {
                let id = c.id.to_string();
                CustomerOption {
                    selected: id == values.customer_id,
                    id,
                    name: c.name.clone(),
                }
            })
            .collect();

        let statuses = InvoiceStatus::ALL
            .iter()
            .map(|s| StatusOption {
                value: s.as_str(),
                label: s.label(),
                checked: s.as_str() == values.status,
            })
            .collect();

        Self {
            current_path: INVOICES_PATH.to_string(),
            heading: if editing { "Edit Invoice" } else { "Create Invoice" },
            action,
            submit_label: if editing { "Edit Invoice" } else { "Create Invoice" },
            customers,
            statuses,
            amount: values.amount.clone(),
            errors: state.errors,
            message: state.message,
        }
    }

    /// Whether one of the customer options is preselected.
    pub fn has_customer_selected(&self) -> bool {
        self.customers.iter().any(|c| c.selected)
    }
}

/// Invoice not found page template.
#[derive(Template, WebTemplate)]
#[template(path = "invoices/not_found.html")]
pub struct InvoiceNotFoundTemplate {
    pub current_path: String,
}

fn render<T: Template>(template: &T) -> Html<String> {
    Html(template.render().unwrap_or_else(|e| {
        tracing::error!("Template render error: {}", e);
        "Internal Server Error".to_string()
    }))
}

fn not_found() -> Response {
    let template = InvoiceNotFoundTemplate {
        current_path: INVOICES_PATH.to_string(),
    };
    (StatusCode::NOT_FOUND, template).into_response()
}

fn edit_path(id: InvoiceId) -> String {
    format!("{INVOICES_PATH}/{id}/edit")
}

// =============================================================================
// Router
// =============================================================================

/// Build the invoice router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(|| async { Redirect::to(INVOICES_PATH) }))
        .route(INVOICES_PATH, get(index).post(create))
        .route(CREATE_PATH, get(create_page))
        .route("/dashboard/invoices/{id}/edit", get(edit_page).post(update))
        .route("/dashboard/invoices/{id}/delete", post(delete))
}

// =============================================================================
// Handlers
// =============================================================================

/// Invoice list page.
///
/// GET /dashboard/invoices?query=&page=
#[instrument(skip(_user, state))]
async fn index(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Query(params): Query<ListQuery>,
) -> Result<Html<String>, AppError> {
    let search_query = params.query.unwrap_or_default().trim().to_string();
    let page = parse_page(params.page.as_deref());

    let key = PageCache::key(INVOICES_PATH, &search_query, page);
    if let Some(html) = state.page_cache().get(&key).await {
        tracing::debug!(key = %key, "Serving cached invoice page");
        return Ok(Html(html));
    }

    let generation = state.page_cache().generation();
    let repo = InvoiceRepository::new(state.pool());
    let (total_pages, rows) = tokio::try_join!(
        repo.count_pages(&search_query),
        repo.list_filtered(&search_query, page)
    )?;

    let template = InvoicesIndexTemplate {
        current_path: INVOICES_PATH.to_string(),
        invoices: rows.iter().map(InvoiceRowView::from).collect(),
        pages: page_links(&search_query, page, total_pages),
        previous_url: (page > 1).then(|| page_url(&search_query, page - 1)),
        next_url: (page < total_pages).then(|| page_url(&search_query, page + 1)),
        search_query,
    };

    let html = template
        .render()
        .map_err(|e| AppError::Internal(format!("template render error: {e}")))?;
    state
        .page_cache()
        .insert(key, html.clone(), generation)
        .await;

    Ok(Html(html))
}

/// Create invoice form.
///
/// GET /dashboard/invoices/create
#[instrument(skip(_user, state))]
async fn create_page(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
) -> Result<Html<String>, AppError> {
    let customers = CustomerRepository::new(state.pool()).list_all().await?;

    Ok(render(&InvoiceFormTemplate::new(
        INVOICES_PATH.to_string(),
        false,
        &customers,
        &InvoiceFormView::default(),
        FormState::default(),
    )))
}

/// Create invoice handler.
///
/// POST /dashboard/invoices
#[instrument(skip(_user, state, input))]
async fn create(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Form(input): Form<InvoiceFormInput>,
) -> Result<Response, AppError> {
    let repo = InvoiceRepository::new(state.pool());
    let today = Utc::now().date_naive();

    match invoices::create_invoice(&repo, state.page_cache(), &input, today).await {
        Ok(()) => Ok(Redirect::to(INVOICES_PATH).into_response()),
        Err(form_state) => {
            let customers = CustomerRepository::new(state.pool()).list_all().await?;
            let template = InvoiceFormTemplate::new(
                INVOICES_PATH.to_string(),
                false,
                &customers,
                &InvoiceFormView::from(&input),
                form_state,
            );
            Ok(render(&template).into_response())
        }
    }
}

/// Edit invoice form.
///
/// GET /dashboard/invoices/{id}/edit
#[instrument(skip(_user, state))]
async fn edit_page(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let Ok(id) = id.parse::<InvoiceId>() else {
        return Ok(not_found());
    };

    let invoice_repo = InvoiceRepository::new(state.pool());
    let customer_repo = CustomerRepository::new(state.pool());
    let (invoice, customers) =
        tokio::try_join!(invoice_repo.get_by_id(id), customer_repo.list_all())?;

    let Some(invoice) = invoice else {
        return Ok(not_found());
    };

    let template = InvoiceFormTemplate::new(
        edit_path(id),
        true,
        &customers,
        &InvoiceFormView::from(&invoice),
        FormState::default(),
    );
    Ok(render(&template).into_response())
}

/// Update invoice handler.
///
/// POST /dashboard/invoices/{id}/edit
#[instrument(skip(_user, state, input))]
async fn update(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(input): Form<InvoiceFormInput>,
) -> Result<Response, AppError> {
    let Ok(id) = id.parse::<InvoiceId>() else {
        return Ok(not_found());
    };

    let repo = InvoiceRepository::new(state.pool());

    match invoices::update_invoice(&repo, state.page_cache(), id, &input).await {
        Ok(()) => Ok(Redirect::to(INVOICES_PATH).into_response()),
        Err(form_state) => {
            let customers = CustomerRepository::new(state.pool()).list_all().await?;
            let template = InvoiceFormTemplate::new(
                edit_path(id),
                true,
                &customers,
                &InvoiceFormView::from(&input),
                form_state,
            );
            Ok(render(&template).into_response())
        }
    }
}

/// Delete invoice handler.
///
/// POST /dashboard/invoices/{id}/delete
#[instrument(skip(_user, state))]
async fn delete(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let Ok(id) = id.parse::<InvoiceId>() else {
        return Ok(not_found());
    };

    let repo = InvoiceRepository::new(state.pool());
    invoices::delete_invoice(&repo, state.page_cache(), id).await?;

    Ok(Redirect::to(INVOICES_PATH).into_response())
}

// =============================================================================
// Pagination
// =============================================================================

fn parse_page(raw: Option<&str>) -> u32 {
    raw.and_then(|p| p.trim().parse::<u32>().ok())
        .filter(|&p| p > 0)
        .unwrap_or(1)
}

fn page_url(query: &str, page: u32) -> String {
    let params = form_urlencoded::Serializer::new(String::new())
        .append_pair("query", query)
        .append_pair("page", &page.to_string())
        .finish();
    format!("{INVOICES_PATH}?{params}")
}

/// Page numbers to show, `None` marking an ellipsis.
///
/// Up to seven pages are listed in full. Beyond that the first and last
/// pages stay visible around a window at the current page.
fn pagination_items(current: u32, total: u32) -> Vec<Option<u32>> {
    if total <= 7 {
        return (1..=total).map(Some).collect();
    }

    if current <= 3 {
        return vec![Some(1), Some(2), Some(3), None, Some(total - 1), Some(total)];
    }

    if current >= total - 2 {
        return vec![Some(1), Some(2), None, Some(total - 2), Some(total - 1), Some(total)];
    }

    vec![
        Some(1),
        None,
        Some(current - 1),
        Some(current),
        Some(current + 1),
        None,
        Some(total),
    ]
}

fn page_links(query: &str, current: u32, total: u32) -> Vec<PageLink> {
    pagination_items(current, total)
        .into_iter()
        .map(|item| match item {
            Some(page) => PageLink {
                label: page.to_string(),
                url: Some(page_url(query, page)),
                current: page == current,
            },
            None => PageLink {
                label: "...".to_string(),
                url: None,
                current: false,
            },
        })
        .collect()
}
