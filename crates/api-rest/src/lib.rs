//! # API REST
//!
//! REST API implementation for DocFlex.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON serialization, CORS, status codes)
//!
//! Uses `api-shared` for wire types and `docflex-core` for every rule. The
//! router is built here so the standalone binary and the workspace's main
//! `docflex-run` binary serve the same API.

#![warn(rust_2018_idioms)]

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post, put},
    Router,
};
use std::str::FromStr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;
use uuid::Uuid;

use api_shared::{
    AddRowReq, BmiReq, BmiRes, CreateDraftReq, CreateDraftRes, DeleteRowQuery, DeleteRowRes,
    DraftRes, ErrorRes, HealthRes, HealthService, MedicationRowDto, PreviewReq, PreviewRes,
    PreviewSectionDto, ProductDto, SelectSuggestionReq, SuggestionsQuery, SuggestionsRes,
    UpdateFieldReq, ValidateRes,
};
use docflex_core::{
    config::core_config_from_env_values, ClinicError, ClinicResult, CoreConfig, DeleteOutcome,
    DraftBook, FormKind, MedicationField, MedicationRow, PrescriptionEditor, PrescriptionForm,
    PrescriptionPreview, Product, ProductCatalog,
};

/// Application state for the REST API server
///
/// Shared by all request handlers: the startup configuration and the open
/// prescription drafts.
#[derive(Clone)]
pub struct AppState {
    cfg: Arc<CoreConfig>,
    drafts: DraftBook,
}

impl AppState {
    pub fn new(cfg: Arc<CoreConfig>) -> Self {
        Self {
            cfg,
            drafts: DraftBook::new(),
        }
    }
}

type ApiError = (StatusCode, Json<ErrorRes>);
type ApiResult<T> = Result<Json<T>, ApiError>;

#[derive(OpenApi)]
#[openapi(
    paths(
        health,
        compute_bmi,
        validate_form,
        create_draft,
        get_draft,
        close_draft,
        change_center,
        add_row,
        update_field,
        delete_row,
        enter_row,
        select_suggestion,
        suggestions,
        preview,
    ),
    components(schemas(
        HealthRes,
        ErrorRes,
        BmiReq,
        BmiRes,
        ValidateRes,
        ProductDto,
        CreateDraftReq,
        CreateDraftRes,
        MedicationRowDto,
        DraftRes,
        AddRowReq,
        UpdateFieldReq,
        SelectSuggestionReq,
        DeleteRowRes,
        SuggestionsRes,
        PreviewReq,
        PreviewSectionDto,
        PreviewRes,
    ))
)]
pub struct ApiDoc;

/// Resolves the core configuration from the `DOCFLEX_*` environment
/// variables, once at startup.
pub fn config_from_env() -> ClinicResult<CoreConfig> {
    core_config_from_env_values(
        std::env::var("DOCFLEX_API_BASE").ok(),
        std::env::var("DOCFLEX_PAGE_SIZE").ok(),
        std::env::var("DOCFLEX_SEARCH_DEBOUNCE_MS").ok(),
        std::env::var("DOCFLEX_SUGGESTION_LIMIT").ok(),
    )
}

/// Builds the REST router with Swagger UI and permissive CORS.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/bmi", post(compute_bmi))
        .route("/validate/:schema", post(validate_form))
        .route("/drafts", post(create_draft))
        .route("/drafts/:id", get(get_draft).delete(close_draft))
        .route("/drafts/:id/center", put(change_center))
        .route("/drafts/:id/rows", post(add_row))
        .route(
            "/drafts/:id/rows/:index",
            put(update_field).delete(delete_row),
        )
        .route("/drafts/:id/rows/:index/enter", post(enter_row))
        .route("/drafts/:id/rows/:index/select", post(select_suggestion))
        .route("/drafts/:id/suggestions", get(suggestions))
        .route("/drafts/:id/preview", post(preview))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for monitoring and load balancers.
#[axum::debug_handler]
async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthService::check_health())
}

#[utoipa::path(
    post,
    path = "/bmi",
    request_body = BmiReq,
    responses(
        (status = 200, description = "Derived BMI", body = BmiRes)
    )
)]
/// Derive BMI from height (cm) and weight (kg) as typed into the vitals form
///
/// Units and other non-numeric characters are ignored. Unusable input gives
/// an empty `bmi` rather than an error.
#[axum::debug_handler]
async fn compute_bmi(State(_state): State<AppState>, Json(req): Json<BmiReq>) -> Json<BmiRes> {
    Json(BmiRes {
        bmi: docflex_core::bmi(&req.height, &req.weight),
    })
}

#[utoipa::path(
    post,
    path = "/validate/{schema}",
    params(
        ("schema" = String, Path, description = "patient, user, appointment, session, medicalCentre, generic or product")
    ),
    responses(
        (status = 200, description = "Validation result", body = ValidateRes),
        (status = 400, description = "Body does not match the form shape", body = ErrorRes),
        (status = 404, description = "Unknown schema", body = ErrorRes)
    )
)]
/// Validate a form against its schema
///
/// Field-level failures are a normal result (`valid: false`), evaluated against
/// today's local date.
///
/// # Errors
/// Returns `404 Not Found` for an unknown schema name and `400 Bad Request`
/// when the body cannot be read as that form.
#[axum::debug_handler]
async fn validate_form(
    State(_state): State<AppState>,
    Path(schema): Path<String>,
    Json(form): Json<serde_json::Value>,
) -> ApiResult<ValidateRes> {
    let kind = FormKind::from_str(&schema).map_err(api_error)?;
    let json = serde_json::to_string(&form)
        .map_err(ClinicError::Serialization)
        .map_err(api_error)?;

    match kind.validate_json(&json, chrono::Local::now().date_naive()) {
        Ok(()) => Ok(Json(ValidateRes {
            valid: true,
            errors: Default::default(),
        })),
        Err(ClinicError::Validation(errors)) => Ok(Json(ValidateRes {
            valid: false,
            errors: errors.into_fields(),
        })),
        Err(e) => Err(api_error(e)),
    }
}

#[utoipa::path(
    post,
    path = "/drafts",
    request_body = CreateDraftReq,
    responses(
        (status = 201, description = "Draft opened", body = CreateDraftRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
/// Open a prescription draft with one blank staging row
///
/// The centre's product list is cached in the draft for suggestions and
/// generic-name lookup.
#[axum::debug_handler]
async fn create_draft(
    State(state): State<AppState>,
    Json(req): Json<CreateDraftReq>,
) -> Result<(StatusCode, Json<CreateDraftRes>), ApiError> {
    let catalog = ProductCatalog::new(req.center_id, products_from_dtos(req.products));
    let id = state.drafts.open(catalog).map_err(api_error)?;
    tracing::info!("opened draft {}", id);
    Ok((
        StatusCode::CREATED,
        Json(CreateDraftRes {
            draft_id: id.to_string(),
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/drafts/{id}",
    params(("id" = String, Path, description = "Draft id")),
    responses(
        (status = 200, description = "Current rows", body = DraftRes),
        (status = 404, description = "Draft not found", body = ErrorRes)
    )
)]
#[axum::debug_handler]
async fn get_draft(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<DraftRes> {
    state
        .drafts
        .read(id, |editor| draft_res(id, editor))
        .map(Json)
        .map_err(api_error)
}

#[utoipa::path(
    delete,
    path = "/drafts/{id}",
    params(("id" = String, Path, description = "Draft id")),
    responses(
        (status = 204, description = "Draft discarded"),
        (status = 404, description = "Draft not found", body = ErrorRes)
    )
)]
#[axum::debug_handler]
async fn close_draft(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    match state.drafts.close(id).map_err(api_error)? {
        Some(_) => Ok(StatusCode::NO_CONTENT),
        None => Err(api_error(ClinicError::DraftNotFound(id))),
    }
}

#[utoipa::path(
    put,
    path = "/drafts/{id}/center",
    params(("id" = String, Path, description = "Draft id")),
    request_body = CreateDraftReq,
    responses(
        (status = 200, description = "Product cache replaced", body = DraftRes),
        (status = 404, description = "Draft not found", body = ErrorRes)
    )
)]
/// Switch the draft to another centre and its product list
#[axum::debug_handler]
async fn change_center(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<CreateDraftReq>,
) -> ApiResult<DraftRes> {
    state
        .drafts
        .update(id, |editor| {
            editor.change_center(req.center_id, products_from_dtos(req.products));
            Ok(draft_res(id, editor))
        })
        .map(Json)
        .map_err(api_error)
}

#[utoipa::path(
    post,
    path = "/drafts/{id}/rows",
    params(("id" = String, Path, description = "Draft id")),
    request_body = AddRowReq,
    responses(
        (status = 200, description = "Row added", body = DraftRes),
        (status = 400, description = "Row index out of range", body = ErrorRes),
        (status = 404, description = "Draft not found", body = ErrorRes),
        (status = 422, description = "Required fields missing; nothing changed", body = ErrorRes)
    )
)]
/// Add a blank row in front of `targetIndex` (or the first row)
///
/// # Errors
/// Returns `422 Unprocessable Entity` naming the missing fields if the target
/// row is incomplete. The draft is unchanged in that case.
#[axum::debug_handler]
async fn add_row(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<AddRowReq>,
) -> ApiResult<DraftRes> {
    state
        .drafts
        .update(id, |editor| {
            editor.add_row(req.target_index)?;
            Ok(draft_res(id, editor))
        })
        .map(Json)
        .map_err(api_error)
}

#[utoipa::path(
    put,
    path = "/drafts/{id}/rows/{index}",
    params(
        ("id" = String, Path, description = "Draft id"),
        ("index" = usize, Path, description = "Row index")
    ),
    request_body = UpdateFieldReq,
    responses(
        (status = 200, description = "Field assigned", body = DraftRes),
        (status = 400, description = "Unknown field or index out of range", body = ErrorRes),
        (status = 404, description = "Draft not found", body = ErrorRes)
    )
)]
#[axum::debug_handler]
async fn update_field(
    State(state): State<AppState>,
    Path((id, index)): Path<(Uuid, usize)>,
    Json(req): Json<UpdateFieldReq>,
) -> ApiResult<DraftRes> {
    let field = MedicationField::from_str(&req.field).map_err(api_error)?;
    state
        .drafts
        .update(id, |editor| {
            editor.update_field(index, field, req.value)?;
            Ok(draft_res(id, editor))
        })
        .map(Json)
        .map_err(api_error)
}

#[utoipa::path(
    delete,
    path = "/drafts/{id}/rows/{index}",
    params(
        ("id" = String, Path, description = "Draft id"),
        ("index" = usize, Path, description = "Row index"),
        DeleteRowQuery
    ),
    responses(
        (status = 200, description = "What the delete did", body = DeleteRowRes),
        (status = 400, description = "Row index out of range", body = ErrorRes),
        (status = 404, description = "Draft not found", body = ErrorRes)
    )
)]
/// Delete or clear a row
///
/// Row 0 is cleared when it has content. Any other row is removed only when
/// `confirmed=true`; otherwise the outcome is `declined`.
#[axum::debug_handler]
async fn delete_row(
    State(state): State<AppState>,
    Path((id, index)): Path<(Uuid, usize)>,
    Query(query): Query<DeleteRowQuery>,
) -> ApiResult<DeleteRowRes> {
    state
        .drafts
        .update(id, |editor| {
            let outcome = editor.delete_row(index, |_| query.confirmed)?;
            Ok(DeleteRowRes {
                outcome: outcome_name(outcome).to_string(),
                rows: row_dtos(editor.rows()),
            })
        })
        .map(Json)
        .map_err(api_error)
}

#[utoipa::path(
    post,
    path = "/drafts/{id}/rows/{index}/enter",
    params(
        ("id" = String, Path, description = "Draft id"),
        ("index" = usize, Path, description = "Row index")
    ),
    responses(
        (status = 200, description = "Rows after the key press", body = DraftRes),
        (status = 404, description = "Draft not found", body = ErrorRes),
        (status = 422, description = "Required fields missing; nothing changed", body = ErrorRes)
    )
)]
/// Enter pressed inside a row; only the last row adds a new one
#[axum::debug_handler]
async fn enter_row(
    State(state): State<AppState>,
    Path((id, index)): Path<(Uuid, usize)>,
) -> ApiResult<DraftRes> {
    state
        .drafts
        .update(id, |editor| {
            editor.on_enter(index)?;
            Ok(draft_res(id, editor))
        })
        .map(Json)
        .map_err(api_error)
}

#[utoipa::path(
    post,
    path = "/drafts/{id}/rows/{index}/select",
    params(
        ("id" = String, Path, description = "Draft id"),
        ("index" = usize, Path, description = "Row index")
    ),
    request_body = SelectSuggestionReq,
    responses(
        (status = 200, description = "Product and generic name set", body = DraftRes),
        (status = 400, description = "Row index out of range", body = ErrorRes),
        (status = 404, description = "Draft not found", body = ErrorRes)
    )
)]
/// Apply a chosen product suggestion and derive the row's generic name
#[axum::debug_handler]
async fn select_suggestion(
    State(state): State<AppState>,
    Path((id, index)): Path<(Uuid, usize)>,
    Json(req): Json<SelectSuggestionReq>,
) -> ApiResult<DraftRes> {
    state
        .drafts
        .update(id, |editor| {
            editor.select_suggestion(index, &req.product_name)?;
            Ok(draft_res(id, editor))
        })
        .map(Json)
        .map_err(api_error)
}

#[utoipa::path(
    get,
    path = "/drafts/{id}/suggestions",
    params(
        ("id" = String, Path, description = "Draft id"),
        SuggestionsQuery
    ),
    responses(
        (status = 200, description = "Matching products", body = SuggestionsRes),
        (status = 404, description = "Draft not found", body = ErrorRes)
    )
)]
#[axum::debug_handler]
async fn suggestions(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<SuggestionsQuery>,
) -> ApiResult<SuggestionsRes> {
    let limit = state.cfg.suggestion_limit();
    state
        .drafts
        .read(id, |editor| SuggestionsRes {
            products: editor
                .suggestions(&query.q, limit)
                .into_iter()
                .map(product_dto)
                .collect(),
        })
        .map(Json)
        .map_err(api_error)
}

#[utoipa::path(
    post,
    path = "/drafts/{id}/preview",
    params(("id" = String, Path, description = "Draft id")),
    request_body = PreviewReq,
    responses(
        (status = 200, description = "Rendered preview", body = PreviewRes),
        (status = 400, description = "Form cannot be read", body = ErrorRes),
        (status = 404, description = "Draft not found", body = ErrorRes)
    )
)]
/// Render the live preview of the form with the draft's medication rows
#[axum::debug_handler]
async fn preview(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<PreviewReq>,
) -> ApiResult<PreviewRes> {
    let mut form = if req.form.is_null() {
        PrescriptionForm::default()
    } else {
        serde_json::from_value::<PrescriptionForm>(req.form)
            .map_err(ClinicError::Deserialization)
            .map_err(api_error)?
    };
    state
        .drafts
        .read(id, |editor| editor.fill_form(&mut form))
        .map_err(api_error)?;

    let document = PrescriptionPreview::render(&form);
    Ok(Json(PreviewRes {
        text: document.to_string(),
        sections: document
            .sections
            .into_iter()
            .map(|s| PreviewSectionDto {
                heading: s.heading,
                lines: s.lines,
            })
            .collect(),
    }))
}

/// Maps a core error to its HTTP status and `{message}` body.
fn api_error(err: ClinicError) -> ApiError {
    let status = match &err {
        ClinicError::MissingFields(_) | ClinicError::Validation(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        ClinicError::DraftNotFound(_) | ClinicError::UnknownSchema(_) => StatusCode::NOT_FOUND,
        ClinicError::InvalidInput(_)
        | ClinicError::RowOutOfRange { .. }
        | ClinicError::UnknownField(_)
        | ClinicError::FormParse { .. }
        | ClinicError::Deserialization(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };

    if status == StatusCode::INTERNAL_SERVER_ERROR {
        tracing::error!("request failed: {:?}", err);
        return (
            status,
            Json(ErrorRes {
                message: "Internal error".into(),
                missing: Vec::new(),
            }),
        );
    }

    tracing::warn!("request rejected: {}", err);
    let missing = match &err {
        ClinicError::MissingFields(fields) => {
            fields.iter().map(|f| f.wire_name().to_string()).collect()
        }
        _ => Vec::new(),
    };
    (
        status,
        Json(ErrorRes {
            message: err.to_string(),
            missing,
        }),
    )
}

fn outcome_name(outcome: DeleteOutcome) -> &'static str {
    match outcome {
        DeleteOutcome::Cleared => "cleared",
        DeleteOutcome::Removed => "removed",
        DeleteOutcome::Unchanged => "unchanged",
        DeleteOutcome::Declined => "declined",
    }
}

fn draft_res(id: Uuid, editor: &PrescriptionEditor) -> DraftRes {
    DraftRes {
        draft_id: id.to_string(),
        center_id: editor.catalog().center_id().map(str::to_string),
        rows: row_dtos(editor.rows()),
    }
}

fn row_dtos(rows: &[MedicationRow]) -> Vec<MedicationRowDto> {
    rows.iter()
        .map(|row| MedicationRowDto {
            route: row.route.clone(),
            product_name: row.product_name.clone(),
            generic_name: row.generic_name.clone(),
            dose: row.dose.clone(),
            dose_unit: row.dose_unit.clone(),
            frequency: row.frequency.clone(),
            duration: row.duration.clone(),
            note: row.note.clone(),
        })
        .collect()
}

fn product_dto(product: &Product) -> ProductDto {
    ProductDto {
        id: product.id.clone(),
        name: product.name.clone(),
        generic_name: product.generic_name.clone(),
        center_id: product.center_id.clone(),
    }
}

fn products_from_dtos(products: Vec<ProductDto>) -> Vec<Product> {
    products
        .into_iter()
        .map(|p| Product {
            id: p.id,
            name: p.name,
            generic_name: p.generic_name,
            center_id: p.center_id,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn app() -> Router {
        router(AppState::new(Arc::new(CoreConfig::default())))
    }

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn empty_request(method: &str, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(req).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    async fn open_draft(app: &Router) -> String {
        let (status, body) = send(
            app,
            json_request(
                "POST",
                "/drafts",
                json!({
                    "centerId": "c-1",
                    "products": [
                        {"id": "p1", "name": "Amoxil", "genericName": "Amoxicillin"},
                        {"id": "p2", "name": "Panadol", "genericName": "Paracetamol"}
                    ]
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        body["draftId"].as_str().unwrap().to_string()
    }

    async fn fill_first_row(app: &Router, id: &str) {
        for (field, value) in [
            ("route", "Oral"),
            ("dose", "500"),
            ("doseUnit", "mg"),
            ("frequency", "TDS"),
            ("duration", "5 days"),
        ] {
            let (status, _) = send(
                app,
                json_request(
                    "PUT",
                    &format!("/drafts/{id}/rows/0"),
                    json!({"field": field, "value": value}),
                ),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
        }
        let (status, body) = send(
            app,
            json_request(
                "POST",
                &format!("/drafts/{id}/rows/0/select"),
                json!({"productName": "Amoxil"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["rows"][0]["genericName"], "Amoxicillin");
    }

    #[tokio::test]
    async fn health_is_ok() {
        let (status, body) = send(&app(), empty_request("GET", "/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ok"], true);
    }

    #[tokio::test]
    async fn bmi_strips_units() {
        let (status, body) = send(
            &app(),
            json_request("POST", "/bmi", json!({"height": "180cm", "weight": "65kg"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["bmi"], "20.1");
    }

    #[tokio::test]
    async fn validate_reports_field_errors() {
        let app = app();
        let (status, body) = send(
            &app,
            json_request(
                "POST",
                "/validate/session",
                json!({
                    "name": "Morning OPD",
                    "centerId": "c-1",
                    "date": "2030-01-01",
                    "startTime": "10:00",
                    "endTime": "09:00"
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["valid"], false);
        assert!(body["errors"]["endTime"].is_array());

        let (status, _) = send(&app, json_request("POST", "/validate/invoice", json!({}))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn add_row_is_refused_until_required_fields_are_filled() {
        let app = app();
        let id = open_draft(&app).await;

        let (status, body) = send(
            &app,
            json_request("POST", &format!("/drafts/{id}/rows"), json!({})),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            body["missing"],
            json!(["route", "productName", "genericName", "dose", "frequency", "duration"])
        );

        fill_first_row(&app, &id).await;
        let (status, body) = send(
            &app,
            json_request("POST", &format!("/drafts/{id}/rows"), json!({})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let rows = body["rows"].as_array().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["productName"], "");
        assert_eq!(rows[1]["productName"], "Amoxil");
    }

    #[tokio::test]
    async fn delete_needs_confirmation_beyond_first_row() {
        let app = app();
        let id = open_draft(&app).await;
        fill_first_row(&app, &id).await;
        send(
            &app,
            json_request("POST", &format!("/drafts/{id}/rows"), json!({})),
        )
        .await;

        let (_, body) = send(&app, empty_request("DELETE", &format!("/drafts/{id}/rows/1"))).await;
        assert_eq!(body["outcome"], "declined");
        assert_eq!(body["rows"].as_array().unwrap().len(), 2);

        let (_, body) = send(
            &app,
            empty_request("DELETE", &format!("/drafts/{id}/rows/1?confirmed=true")),
        )
        .await;
        assert_eq!(body["outcome"], "removed");
        assert_eq!(body["rows"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn suggestions_match_case_insensitively() {
        let app = app();
        let id = open_draft(&app).await;
        let (status, body) = send(
            &app,
            empty_request("GET", &format!("/drafts/{id}/suggestions?q=amo")),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["products"][0]["name"], "Amoxil");
        assert_eq!(body["products"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn preview_uses_draft_rows() {
        let app = app();
        let id = open_draft(&app).await;
        fill_first_row(&app, &id).await;

        let (status, body) = send(
            &app,
            json_request(
                "POST",
                &format!("/drafts/{id}/preview"),
                json!({"form": {"vitals": {"height": "180", "weight": "65"}}}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let text = body["text"].as_str().unwrap();
        assert!(text.contains("Amoxil (Amoxicillin)"));
        assert!(text.contains("20.1"));
    }

    #[tokio::test]
    async fn unknown_draft_is_not_found() {
        let uri = format!("/drafts/{}", Uuid::new_v4());
        let (status, body) = send(&app(), empty_request("GET", &uri)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["message"].as_str().unwrap().contains("not found"));
    }

    #[tokio::test]
    async fn closed_draft_is_gone() {
        let app = app();
        let id = open_draft(&app).await;
        let (status, _) = send(&app, empty_request("DELETE", &format!("/drafts/{id}"))).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = send(&app, empty_request("GET", &format!("/drafts/{id}"))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
