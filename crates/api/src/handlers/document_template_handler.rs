//! Document template handlers.

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use chrono::Utc;
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use common::AppResult;
use domain::{DocumentTemplate, DocumentType};

use super::{ensure, visible};
use crate::extractors::ValidatedJson;
use crate::middleware::CurrentUser;
use crate::pagination::{Paginated, PaginationParams};
use crate::requests::{
    access, parse_enum, required, LandlordSchema, RenderDocumentRequest,
    StoreDocumentTemplateRequest, UpdateDocumentTemplateRequest,
};
use crate::resources::{DocumentTemplateResource, RenderedDocumentResource};
use crate::state::AppState;

/// Template list filter
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TemplateFilter {
    /// Only templates of this document type
    #[serde(rename = "type")]
    pub kind: Option<DocumentType>,
}

/// Create document template routes
pub fn document_template_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_templates).post(store_template))
        .route(
            "/:id",
            get(show_template).put(update_template).delete(delete_template),
        )
        .route("/:id/render", post(render_template))
}

async fn find_visible(state: &AppState, user: &CurrentUser, id: Uuid) -> AppResult<DocumentTemplate> {
    visible(user, state.store.find_template(id).await?, |t| t.landlord_id)
}

/// List templates visible to the caller
#[utoipa::path(
    get,
    path = "/document-templates",
    tag = "Document Templates",
    security(("bearer_auth" = [])),
    params(PaginationParams, TemplateFilter),
    responses(
        (status = 200, description = "Page of templates", body = PaginatedDocumentTemplates),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn list_templates(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
    Query(filter): Query<TemplateFilter>,
) -> AppResult<Json<Paginated<DocumentTemplateResource>>> {
    ensure(access::active(Some(&current_user)))?;

    let templates = state
        .store
        .list_templates(current_user.landlord_scope(), filter.kind)
        .await?;
    Ok(Json(Paginated::paginate(
        templates,
        &params,
        &state.config.pagination,
        |t| DocumentTemplateResource::from(&t),
    )))
}

/// Create a template
///
/// Super admins must pass `landlord_id`; other callers create templates
/// for their own landlord.
#[utoipa::path(
    post,
    path = "/document-templates",
    tag = "Document Templates",
    security(("bearer_auth" = [])),
    request_body = StoreDocumentTemplateRequest,
    responses(
        (status = 201, description = "Template created", body = DocumentTemplateResource),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn store_template(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<StoreDocumentTemplateRequest>,
) -> AppResult<(StatusCode, Json<DocumentTemplateResource>)> {
    let now = Utc::now();
    let body = required("body", &payload.body)?.clone();
    let variables = payload
        .variables
        .unwrap_or_else(|| DocumentTemplate::placeholders(&body));

    let template = DocumentTemplate {
        id: Uuid::new_v4(),
        landlord_id: LandlordSchema::target(&current_user, payload.landlord_id)?,
        name: required("name", &payload.name)?.clone(),
        kind: parse_enum("type", required("type", &payload.kind)?)?,
        body,
        variables,
        is_default: payload.is_default.unwrap_or(false),
        created_at: now,
        updated_at: now,
    };

    let template = state.store.save_template(template).await?;
    Ok((StatusCode::CREATED, Json(DocumentTemplateResource::from(&template))))
}

/// Get template by ID
#[utoipa::path(
    get,
    path = "/document-templates/{id}",
    tag = "Document Templates",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Template ID")
    ),
    responses(
        (status = 200, description = "Template", body = DocumentTemplateResource),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Template not found")
    )
)]
pub async fn show_template(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<DocumentTemplateResource>> {
    ensure(access::active(Some(&current_user)))?;

    let template = find_visible(&state, &current_user, id).await?;
    Ok(Json(DocumentTemplateResource::from(&template)))
}

/// Update a template
#[utoipa::path(
    put,
    path = "/document-templates/{id}",
    tag = "Document Templates",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Template ID")
    ),
    request_body = UpdateDocumentTemplateRequest,
    responses(
        (status = 200, description = "Template updated", body = DocumentTemplateResource),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Template not found"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn update_template(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateDocumentTemplateRequest>,
) -> AppResult<Json<DocumentTemplateResource>> {
    let mut template = find_visible(&state, &current_user, id).await?;

    if let Some(name) = payload.name {
        template.name = name;
    }
    if let Some(kind) = payload.kind.as_deref() {
        template.kind = parse_enum("type", kind)?;
    }
    match (payload.body, payload.variables) {
        (Some(body), None) => {
            template.variables = DocumentTemplate::placeholders(&body);
            template.body = body;
        }
        (body, variables) => {
            if let Some(body) = body {
                template.body = body;
            }
            if let Some(variables) = variables {
                template.variables = variables;
            }
        }
    }
    if let Some(is_default) = payload.is_default {
        template.is_default = is_default;
    }
    template.updated_at = Utc::now();

    let template = state.store.save_template(template).await?;
    Ok(Json(DocumentTemplateResource::from(&template)))
}

/// Delete a template
#[utoipa::path(
    delete,
    path = "/document-templates/{id}",
    tag = "Document Templates",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Template ID")
    ),
    responses(
        (status = 204, description = "Template deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Template not found")
    )
)]
pub async fn delete_template(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    ensure(access::administrator(Some(&current_user)))?;

    let template = find_visible(&state, &current_user, id).await?;
    state.store.delete_template(template.id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Render a template with the given values
#[utoipa::path(
    post,
    path = "/document-templates/{id}/render",
    tag = "Document Templates",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Template ID")
    ),
    request_body = RenderDocumentRequest,
    responses(
        (status = 200, description = "Rendered document", body = RenderedDocumentResource),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Template not found"),
        (status = 422, description = "Missing variable values")
    )
)]
pub async fn render_template(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<RenderDocumentRequest>,
) -> AppResult<Json<RenderedDocumentResource>> {
    let template = find_visible(&state, &current_user, id).await?;
    let html = template.render(&payload.values)?;
    Ok(Json(RenderedDocumentResource::new(&template, html)))
}
