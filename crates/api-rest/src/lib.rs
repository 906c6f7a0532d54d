//! # API REST
//!
//! REST API implementation for BCD.
//!
//! Handles:
//! - HTTP endpoints with axum (multipart intake, results, report documents)
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON serialization, CORS)
//!
//! The intake endpoint plays the navigation-shell role at this boundary: a
//! successful submission response carries the fixed results destination the
//! client should navigate to. Report endpoints return the rendered HTML
//! documents; opening them in a surface (and invoking print) is the
//! client's side of the contract.

#![warn(rust_2018_idioms)]

use axum::{
    extract::{Multipart, Path as AxumPath, State},
    http::StatusCode,
    response::{Html, Json},
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;
use uuid::Uuid;

use bcd_core::{
    constants::RESULTS_DESTINATION, resolve_intake, BcdError, CoreConfig, DiagnosisProvider,
    DiagnosticReport, ImageMediaType, IntakeForm, ReportRenderer, UploadedImage,
};
use bcd_types::{NonEmptyText, PatientId};

/// Application state shared across REST API handlers
///
/// Contains the services needed by the REST API endpoints: the startup
/// configuration, the diagnostic capability seam, and the report renderer.
#[derive(Clone)]
pub struct AppState {
    cfg: Arc<CoreConfig>,
    provider: Arc<dyn DiagnosisProvider>,
    renderer: ReportRenderer,
}

impl AppState {
    pub fn new(cfg: Arc<CoreConfig>, provider: Arc<dyn DiagnosisProvider>) -> Self {
        let renderer = ReportRenderer::new(cfg.system_name());
        Self {
            cfg,
            provider,
            renderer,
        }
    }

    pub fn cfg(&self) -> &CoreConfig {
        &self.cfg
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(health, submit_intake, get_results, report_preview, report_print),
    components(schemas(
        HealthRes,
        IntakeRes,
        ReportRes,
        TextAnalysisRes,
        ImageAnalysisRes
    ))
)]
struct ApiDoc;

/// Health check response body.
#[derive(Debug, serde::Serialize, serde::Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

/// Response body for an accepted intake submission.
#[derive(Debug, serde::Serialize, serde::Deserialize, ToSchema)]
pub struct IntakeRes {
    pub submission_id: Uuid,
    /// Effective patient identifier (the text-path ID wins when both paths
    /// are filled).
    pub patient_id: String,
    /// Resolved analysis mode: "text", "image", or "both".
    pub mode: String,
    /// Display name of the accepted mammogram file, when one was uploaded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_file_name: Option<String>,
    /// Where the client should navigate to show the results.
    pub destination: String,
}

/// Text-based analysis results as returned by the results endpoint.
#[derive(Debug, serde::Serialize, serde::Deserialize, ToSchema)]
pub struct TextAnalysisRes {
    /// "Benign", "Malignant", or empty when no result exists yet.
    pub diagnosis: String,
    pub description: String,
}

/// Image-based analysis results as returned by the results endpoint.
#[derive(Debug, serde::Serialize, serde::Deserialize, ToSchema)]
pub struct ImageAnalysisRes {
    pub diagnosis: String,
    /// "Left", "Right", or empty.
    pub breast_side: String,
    pub breast_density: String,
    pub image_view: String,
    pub abnormality_id: String,
    pub abnormality_type: String,
    pub calcification_type: String,
    pub calcification_distribution: String,
    pub assessment: String,
    pub subtlety: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_reference: Option<String>,
}

/// Diagnostic report snapshot as returned by the results endpoint.
#[derive(Debug, serde::Serialize, serde::Deserialize, ToSchema)]
pub struct ReportRes {
    pub patient_id: String,
    pub text: TextAnalysisRes,
    pub image: ImageAnalysisRes,
    pub generated_at: DateTime<Utc>,
}

impl From<DiagnosticReport> for ReportRes {
    fn from(report: DiagnosticReport) -> Self {
        Self {
            patient_id: report.patient_id.as_str().to_owned(),
            text: TextAnalysisRes {
                diagnosis: report.text.diagnosis.as_str().to_owned(),
                description: report.text.description,
            },
            image: ImageAnalysisRes {
                diagnosis: report.image.diagnosis.as_str().to_owned(),
                breast_side: report.image.breast_side.as_str().to_owned(),
                breast_density: report.image.breast_density,
                image_view: report.image.image_view,
                abnormality_id: report.image.abnormality_id,
                abnormality_type: report.image.abnormality_type,
                calcification_type: report.image.calcification_type,
                calcification_distribution: report.image.calcification_distribution,
                assessment: report.image.assessment,
                subtlety: report.image.subtlety,
                description: report.image.description,
                image_reference: report.image.image_reference,
            },
            generated_at: report.generated_at,
        }
    }
}

/// Builds the REST API router.
///
/// Routes, Swagger UI, and CORS are assembled here so the root binary and
/// tests share one definition.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/intake", post(submit_intake))
        .route("/results/:patient_id", get(get_results))
        .route("/reports/:patient_id/preview", get(report_preview))
        .route("/reports/:patient_id/print", get(report_print))
        .merge(
            SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()),
        )
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
/// Health check endpoint for the REST API
///
/// Used for monitoring and load balancer health checks.
#[axum::debug_handler]
async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthRes {
        ok: true,
        message: "BCD REST API is alive".into(),
    })
}

#[utoipa::path(
    post,
    path = "/intake",
    request_body(content = String, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Submission accepted and classified", body = IntakeRes),
        (status = 400, description = "No analysis mode applies to the submission"),
        (status = 415, description = "Uploaded file is not JPEG, PNG, or DICOM")
    )
)]
/// Submit the intake forms for classification
///
/// Accepts the state of both intake forms as multipart/form-data:
/// `text_patient_id`, `image_patient_id`, and an optional `image` file part
/// (JPEG, PNG, or DICOM). Classifies the pair into exactly one analysis
/// mode; the response tells the client where to navigate for results.
///
/// # Errors
/// Returns `400 Bad Request` with the fixed user-facing message if no mode
/// applies, or `415 Unsupported Media Type` for a file outside the
/// advertised types.
#[axum::debug_handler]
async fn submit_intake(
    State(_state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<IntakeRes>), (StatusCode, String)> {
    let mut form = IntakeForm::default();

    while let Some(field) = multipart.next_field().await.map_err(bad_multipart)? {
        // The field name borrows from the field, which the body readers
        // consume; detach it first.
        let name = field.name().unwrap_or_default().to_owned();
        match name.as_str() {
            "text_patient_id" => {
                form.text_patient_id = field.text().await.map_err(bad_multipart)?;
            }
            "image_patient_id" => {
                form.image_patient_id = field.text().await.map_err(bad_multipart)?;
            }
            "image" => {
                let file_name = field.file_name().unwrap_or_default().to_owned();
                let declared = field.content_type().map(str::to_owned);
                let bytes = field.bytes().await.map_err(bad_multipart)?;

                // Browsers submit an empty image part when no file was
                // picked; that is "no upload", not an invalid one.
                if file_name.is_empty() && bytes.is_empty() {
                    continue;
                }

                let media_type = ImageMediaType::resolve(declared.as_deref(), &bytes)
                    .map_err(|e| (StatusCode::UNSUPPORTED_MEDIA_TYPE, e.to_string()))?;
                let file_name = NonEmptyText::new(&file_name).map_err(|_| {
                    (
                        StatusCode::BAD_REQUEST,
                        "uploaded image is missing a file name".to_owned(),
                    )
                })?;

                form.image = Some(UploadedImage {
                    file_name,
                    media_type,
                    bytes: bytes.to_vec(),
                });
            }
            other => {
                tracing::debug!("ignoring unknown intake field: {}", other);
            }
        }
    }

    let submission = resolve_intake(form).map_err(core_error)?;
    tracing::info!(
        "intake accepted: patient {} mode {}",
        submission.patient_id,
        submission.mode.as_str()
    );

    Ok((
        StatusCode::CREATED,
        Json(IntakeRes {
            submission_id: submission.submission_id,
            patient_id: submission.patient_id.as_str().to_owned(),
            mode: submission.mode.as_str().to_owned(),
            image_file_name: submission
                .image
                .as_ref()
                .map(|image| image.file_name.as_str().to_owned()),
            destination: RESULTS_DESTINATION.to_owned(),
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/results/{patient_id}",
    params(("patient_id" = String, Path, description = "Patient identifier")),
    responses(
        (status = 200, description = "Current diagnostic report snapshot", body = ReportRes),
        (status = 400, description = "Invalid patient identifier")
    )
)]
/// Fetch the diagnostic report snapshot for a patient
///
/// Returns the current report from the configured diagnostic capability.
/// Patients without results yet receive an all-empty ("pending") report.
#[axum::debug_handler]
async fn get_results(
    State(state): State<AppState>,
    AxumPath(patient_id): AxumPath<String>,
) -> Result<Json<ReportRes>, (StatusCode, String)> {
    let report = lookup_report(&state, &patient_id)?;
    Ok(Json(report.into()))
}

#[utoipa::path(
    get,
    path = "/reports/{patient_id}/preview",
    params(("patient_id" = String, Path, description = "Patient identifier")),
    responses(
        (status = 200, description = "Printable report document with manual print trigger", content_type = "text/html", body = String),
        (status = 400, description = "Invalid patient identifier")
    )
)]
/// Render the preview report document
///
/// The returned page embeds a visible "Print Report" button; the client
/// opens it in a surface and leaves it idle for manual interaction.
#[axum::debug_handler]
async fn report_preview(
    State(state): State<AppState>,
    AxumPath(patient_id): AxumPath<String>,
) -> Result<Html<String>, (StatusCode, String)> {
    let report = lookup_report(&state, &patient_id)?;
    Ok(Html(state.renderer.preview_document(&report)))
}

#[utoipa::path(
    get,
    path = "/reports/{patient_id}/print",
    params(("patient_id" = String, Path, description = "Patient identifier")),
    responses(
        (status = 200, description = "Printable report document without the manual print trigger", content_type = "text/html", body = String),
        (status = 400, description = "Invalid patient identifier")
    )
)]
/// Render the print report document
///
/// Identical content to the preview document but without the manual print
/// trigger; the client invokes the print action once the surface has
/// finished loading.
#[axum::debug_handler]
async fn report_print(
    State(state): State<AppState>,
    AxumPath(patient_id): AxumPath<String>,
) -> Result<Html<String>, (StatusCode, String)> {
    let report = lookup_report(&state, &patient_id)?;
    Ok(Html(state.renderer.print_document(&report)))
}

fn lookup_report(
    state: &AppState,
    patient_id: &str,
) -> Result<DiagnosticReport, (StatusCode, String)> {
    let patient_id = PatientId::new(patient_id).map_err(|_| {
        (
            StatusCode::BAD_REQUEST,
            "patient identifier cannot be empty".to_owned(),
        )
    })?;
    state.provider.report_for(&patient_id).map_err(core_error)
}

fn bad_multipart(err: axum::extract::multipart::MultipartError) -> (StatusCode, String) {
    (
        StatusCode::BAD_REQUEST,
        format!("malformed multipart request: {err}"),
    )
}

fn core_error(err: BcdError) -> (StatusCode, String) {
    let status = match &err {
        BcdError::Validation(_) => StatusCode::BAD_REQUEST,
        BcdError::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
        BcdError::ReportUnavailable(_) => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status == StatusCode::INTERNAL_SERVER_ERROR {
        tracing::error!("request failed: {}", err);
    }
    (status, err.to_string())
}
