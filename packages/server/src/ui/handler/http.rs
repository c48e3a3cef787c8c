//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
};
use serde_json::error::Category;

use crate::{
    domain::{
        Handshake, Identity, ReportEvent, ReportId, RoomId, UnitId, ValueObjectError,
        extract_credential,
    },
    infrastructure::dto::http::{ReportNoticeDto, RoomDetailDto, RoomSummaryDto},
    ui::state::AppState,
};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Get list of non-empty rooms
pub async fn get_rooms(State(state): State<Arc<AppState>>) -> Json<Vec<RoomSummaryDto>> {
    let rooms = state.registry.rooms().await;
    Json(rooms.into_iter().map(RoomSummaryDto::from).collect())
}

/// Get room detail by ID
///
/// Lists live connection ids, so it requires an admin bearer token.
pub async fn get_room_detail(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(room_id): Path<String>,
) -> Result<Json<RoomDetailDto>, StatusCode> {
    authorize_admin(&state, &headers).await?;

    let room = RoomId::parse(&room_id).ok_or(StatusCode::NOT_FOUND)?;
    let members = state.registry.members_of(&room).await;
    if members.is_empty() {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(Json(RoomDetailDto::new(&room, &members)))
}

/// Accept a report mutation notice from the CRUD layer and fan it out.
///
/// Requires an admin bearer token; the body is only decoded after the caller
/// is authorized.
pub async fn post_report_event(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> StatusCode {
    if let Err(status) = authorize_admin(&state, &headers).await {
        return status;
    }

    let notice: ReportNoticeDto = match serde_json::from_slice(&body) {
        Ok(notice) => notice,
        Err(e) => {
            tracing::warn!("Undecodable report notice: {}", e);
            return match e.classify() {
                Category::Data => StatusCode::UNPROCESSABLE_ENTITY,
                _ => StatusCode::BAD_REQUEST,
            };
        }
    };

    let broadcaster = &state.event_broadcaster;
    match notice {
        ReportNoticeDto::Created { report } => match ReportEvent::try_from(report) {
            Ok(report) => broadcaster.broadcast_created(&report).await,
            Err(e) => return invalid_notice(e),
        },
        ReportNoticeDto::Updated { report } => match ReportEvent::try_from(report) {
            Ok(report) => broadcaster.broadcast_updated(&report).await,
            Err(e) => return invalid_notice(e),
        },
        ReportNoticeDto::Deleted { id, unit_id } => {
            match (ReportId::new(id), UnitId::new(unit_id)) {
                (Ok(id), Ok(unit_id)) => broadcaster.broadcast_deleted(&id, &unit_id).await,
                (Err(e), _) | (_, Err(e)) => return invalid_notice(e),
            }
        }
    }
    StatusCode::NO_CONTENT
}

/// Resolve the `Authorization` bearer and require the admin role.
///
/// `401` for a missing or unverifiable token, `403` for a non-admin.
async fn authorize_admin(state: &AppState, headers: &HeaderMap) -> Result<Identity, StatusCode> {
    let handshake = Handshake {
        auth_token: None,
        authorization: headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string),
    };
    let credential = extract_credential(&handshake).ok_or(StatusCode::UNAUTHORIZED)?;
    match state.resolve_identity_usecase.execute(&credential).await {
        Ok(identity) if identity.is_admin() => Ok(identity),
        Ok(identity) => {
            tracing::warn!("Admin endpoint called by non-admin '{}'", identity.user_id());
            Err(StatusCode::FORBIDDEN)
        }
        Err(e) => {
            tracing::warn!("Admin endpoint rejected: {}", e);
            Err(StatusCode::UNAUTHORIZED)
        }
    }
}

fn invalid_notice(error: ValueObjectError) -> StatusCode {
    tracing::warn!("Invalid report notice: {}", error);
    StatusCode::UNPROCESSABLE_ENTITY
}
