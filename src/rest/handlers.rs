use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use uuid::Uuid;

use crate::{
    service::JsonPatchOperation,
    storage::PopsicleRepository,
    types::{PopsicleError, PopsicleFields, PopsicleId},
};

use super::{
    models::{
        CreatePopsicleRequest, ErrorResponse, HealthResponse, PopsicleResponse,
        UpdatePopsicleRequest,
    },
    AppState,
};

pub async fn health<R: PopsicleRepository + Clone + Send + Sync + 'static>(
    State(state): State<AppState<R>>,
) -> impl IntoResponse {
    let uptime_secs = state.started_at.elapsed().map(|d| d.as_secs()).unwrap_or(0);
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok",
            uptime_secs,
        }),
    )
}

pub async fn search_popsicles<R: PopsicleRepository + Clone + Send + Sync + 'static>(
    State(state): State<AppState<R>>,
) -> Response {
    match state.service.search() {
        Ok(popsicles) => {
            let body: Vec<PopsicleResponse> = popsicles.iter().map(PopsicleResponse::from).collect();
            Json(body).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub async fn get_popsicle<R: PopsicleRepository + Clone + Send + Sync + 'static>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
) -> Response {
    let Some(id) = parse_id(&id) else {
        return unknown_id(&id);
    };
    match state.service.get(id) {
        Ok(popsicle) => Json(PopsicleResponse::from(&popsicle)).into_response(),
        Err(err) => error_response(err),
    }
}

pub async fn create_popsicle<R: PopsicleRepository + Clone + Send + Sync + 'static>(
    State(state): State<AppState<R>>,
    payload: Result<Json<CreatePopsicleRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return bad_body(rejection),
    };
    match state.service.create(PopsicleFields::from(request)) {
        Ok(popsicle) => (
            StatusCode::CREATED,
            [(header::LOCATION, format!("/popsicles/{}", popsicle.id))],
            Json(PopsicleResponse::from(&popsicle)),
        )
            .into_response(),
        Err(err) => error_response(err),
    }
}

pub async fn replace_popsicle<R: PopsicleRepository + Clone + Send + Sync + 'static>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
    payload: Result<Json<UpdatePopsicleRequest>, JsonRejection>,
) -> Response {
    let Some(id) = parse_id(&id) else {
        return unknown_id(&id);
    };
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return bad_body(rejection),
    };
    match state.service.replace(id, PopsicleFields::from(request)) {
        Ok(popsicle) => Json(PopsicleResponse::from(&popsicle)).into_response(),
        Err(err) => error_response(err),
    }
}

pub async fn update_popsicle<R: PopsicleRepository + Clone + Send + Sync + 'static>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
    payload: Result<Json<Vec<JsonPatchOperation>>, JsonRejection>,
) -> Response {
    let Some(id) = parse_id(&id) else {
        return unknown_id(&id);
    };
    let document = match payload {
        Ok(Json(document)) => document,
        Err(rejection) => return bad_body(rejection),
    };
    match state.service.update_from_document(id, document) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err),
    }
}

pub async fn remove_popsicle<R: PopsicleRepository + Clone + Send + Sync + 'static>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
) -> Response {
    let Some(id) = parse_id(&id) else {
        return unknown_id(&id);
    };
    match state.service.delete(id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err),
    }
}

pub async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse::new("endpoint not found")),
    )
}

fn parse_id(raw: &str) -> Option<PopsicleId> {
    Uuid::parse_str(raw.trim()).ok()
}

// Ids that are not UUIDs can never match a stored popsicle.
fn unknown_id(raw: &str) -> Response {
    log::debug!("Ignoring non-UUID popsicle id {}", raw);
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse::new(format!("Popsicle with ID {raw} not found."))),
    )
        .into_response()
}

fn bad_body(rejection: JsonRejection) -> Response {
    log::warn!("Rejected request body: {}", rejection.body_text());
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse::new(rejection.body_text())),
    )
        .into_response()
}

fn error_response(err: PopsicleError) -> Response {
    match err {
        PopsicleError::NotFound(_) => {
            (StatusCode::NOT_FOUND, Json(ErrorResponse::new(err.to_string()))).into_response()
        }
        PopsicleError::Validation(ref errors) => {
            log::warn!("Rejected popsicle payload: {}", errors);
            (StatusCode::BAD_REQUEST, Json(ErrorResponse::from(errors))).into_response()
        }
        PopsicleError::MalformedPatch(ref patch_err) => {
            log::warn!("Rejected patch document: {}", patch_err);
            (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(err.to_string()))).into_response()
        }
        PopsicleError::Storage(ref message) => {
            log::error!("Popsicle store failure: {}", message);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("internal storage error")),
            )
                .into_response()
        }
    }
}
