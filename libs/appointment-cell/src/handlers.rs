use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query, State},
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::auth::AuthUser;
use shared_models::error::AppError;

use crate::models::{AppointmentError, BookAppointmentRequest, ListQuery, ScheduleQuery};
use crate::services::booking::BookingService;
use crate::services::cancellation::CancellationService;

#[derive(Clone)]
pub struct AppointmentCellState {
    pub bookings: Arc<BookingService>,
    pub cancellations: Arc<CancellationService>,
    pub config: Arc<AppConfig>,
}

pub async fn index(
    State(state): State<AppointmentCellState>,
    Query(query): Query<ListQuery>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<Value>, AppError> {
    let appointments = state
        .bookings
        .list_for_client(auth.id, query.page.unwrap_or(1))
        .await
        .map_err(map_appointment_error)?;

    Ok(Json(json!(appointments)))
}

pub async fn store(
    State(state): State<AppointmentCellState>,
    Extension(auth): Extension<AuthUser>,
    Json(request): Json<BookAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    let appointment = state
        .bookings
        .book(auth.id, request)
        .await
        .map_err(map_appointment_error)?;

    Ok(Json(json!(appointment)))
}

pub async fn destroy(
    State(state): State<AppointmentCellState>,
    Path(appointment_id): Path<Uuid>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<Value>, AppError> {
    let appointment = state
        .cancellations
        .cancel(auth.id, appointment_id)
        .await
        .map_err(map_appointment_error)?;

    Ok(Json(json!(appointment)))
}

pub async fn schedule(
    State(state): State<AppointmentCellState>,
    Query(query): Query<ScheduleQuery>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<Value>, AppError> {
    let appointments = state
        .bookings
        .provider_day(auth.id, query.date)
        .await
        .map_err(map_appointment_error)?;

    Ok(Json(json!(appointments)))
}

fn map_appointment_error(e: AppointmentError) -> AppError {
    match e {
        AppointmentError::NotFound => AppError::NotFound(e.to_string()),
        AppointmentError::InvalidProvider
        | AppointmentError::SelfBooking
        | AppointmentError::SlotNotAligned
        | AppointmentError::PastDate
        | AppointmentError::SlotTaken
        | AppointmentError::TooLate
        | AppointmentError::AlreadyCanceled => AppError::BadRequest(e.to_string()),
        AppointmentError::Forbidden | AppointmentError::NotProvider => {
            AppError::Auth(e.to_string())
        }
        AppointmentError::Database(msg) => AppError::Database(msg),
    }
}
