use std::sync::Arc;

use assert_matches::assert_matches;
use axum::extract::{Extension, Query, State};
use axum::Json;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use appointment_cell::handlers::{self, AppointmentCellState};
use appointment_cell::models::{AppointmentError, BookAppointmentRequest, ListQuery};
use appointment_cell::services::booking::BookingService;
use appointment_cell::services::cancellation::CancellationService;
use provider_cell::services::provider::ProviderService;
use shared_database::SupabaseClient;
use shared_mailer::MailerClient;
use shared_utils::test_utils::{MockSupabaseResponses, TestConfig, TestUser};

fn booking_service(server: &MockServer) -> BookingService {
    let config = TestConfig::with_supabase_url(&server.uri()).to_app_config();
    let supabase = Arc::new(SupabaseClient::new(&config));
    let providers = Arc::new(ProviderService::new(Arc::clone(&supabase)));
    BookingService::new(supabase, providers, &config)
}

fn create_test_state(server: &MockServer) -> AppointmentCellState {
    let config = TestConfig::with_supabase_url(&server.uri()).to_arc();
    let supabase = Arc::new(SupabaseClient::new(&config));
    let providers = Arc::new(ProviderService::new(Arc::clone(&supabase)));
    let mailer = Arc::new(MailerClient::new(&config));
    AppointmentCellState {
        bookings: Arc::new(BookingService::new(
            Arc::clone(&supabase),
            providers,
            &config,
        )),
        cancellations: Arc::new(CancellationService::new(supabase, mailer, &config)),
        config,
    }
}

fn future_slot() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2099, 6, 2, 9, 0, 0).unwrap()
}

async fn mock_provider_lookup(server: &MockServer, provider: &TestUser) {
    Mock::given(method("GET"))
        .and(path("/rest/v1/users"))
        .and(query_param("id", format!("eq.{}", provider.id)))
        .and(query_param("provider", "is.true"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([MockSupabaseResponses::provider_summary_row(provider)])),
        )
        .mount(server)
        .await;
}

async fn mock_free_slot(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(server)
        .await;
}

async fn mock_client_lookup(server: &MockServer, client: &TestUser) {
    Mock::given(method("GET"))
        .and(path("/rest/v1/users"))
        .and(query_param("id", format!("eq.{}", client.id)))
        .and(query_param("select", "id,name"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": client.id, "name": client.name }
        ])))
        .mount(server)
        .await;
}

// Scenario A: a free future half-hour slot books successfully and the
// provider's notification carries the client's name and the formatted date.
#[tokio::test]
async fn booking_creates_appointment_and_notifies_provider() {
    let mock_server = MockServer::start().await;
    let client = TestUser::client("Ada Lovelace", "ada@example.com");
    let provider = TestUser::provider("Sasha Barber", "sasha@example.com");

    mock_provider_lookup(&mock_server, &provider).await;
    mock_free_slot(&mock_server).await;
    mock_client_lookup(&mock_server, &client).await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/rpc/book_appointment"))
        .and(body_partial_json(json!({
            "p_user_id": client.id,
            "p_provider_id": provider.id,
            "p_notification_content": "New booking from Ada Lovelace on June 2, 09:00",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            MockSupabaseResponses::appointment_row(client.id, provider.id, future_slot()),
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    let state = create_test_state(&mock_server);
    let Json(body) = handlers::store(
        State(state),
        Extension(client.to_auth_user()),
        Json(BookAppointmentRequest {
            provider_id: provider.id,
            date: future_slot(),
        }),
    )
    .await
    .unwrap();

    assert_eq!(body["canceled_at"], json!(null));
    assert_eq!(body["provider_id"], json!(provider.id));
    assert_eq!(body["user_id"], json!(client.id));
}

#[tokio::test]
async fn booking_rejects_non_provider_target() {
    let mock_server = MockServer::start().await;
    let client = TestUser::client("Ada Lovelace", "ada@example.com");
    let ordinary = TestUser::client("Norm Alice", "norm@example.com");

    // The provider-flag filter finds nothing for an ordinary user.
    Mock::given(method("GET"))
        .and(path("/rest/v1/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let service = booking_service(&mock_server);
    let err = service
        .book(
            client.id,
            BookAppointmentRequest {
                provider_id: ordinary.id,
                date: future_slot(),
            },
        )
        .await
        .unwrap_err();

    assert_matches!(err, AppointmentError::InvalidProvider);
}

// Scenario C: a provider cannot book itself.
#[tokio::test]
async fn booking_rejects_self_booking() {
    let mock_server = MockServer::start().await;
    let provider = TestUser::provider("Sasha Barber", "sasha@example.com");

    mock_provider_lookup(&mock_server, &provider).await;

    let service = booking_service(&mock_server);
    let err = service
        .book(
            provider.id,
            BookAppointmentRequest {
                provider_id: provider.id,
                date: future_slot(),
            },
        )
        .await
        .unwrap_err();

    assert_matches!(err, AppointmentError::SelfBooking);
}

#[tokio::test]
async fn booking_rejects_unaligned_slots() {
    let mock_server = MockServer::start().await;
    let client = TestUser::client("Ada Lovelace", "ada@example.com");
    let provider = TestUser::provider("Sasha Barber", "sasha@example.com");

    mock_provider_lookup(&mock_server, &provider).await;

    let service = booking_service(&mock_server);
    for date in [
        Utc.with_ymd_and_hms(2099, 6, 2, 9, 15, 0).unwrap(),
        Utc.with_ymd_and_hms(2099, 6, 2, 9, 30, 45).unwrap(),
    ] {
        let err = service
            .book(
                client.id,
                BookAppointmentRequest {
                    provider_id: provider.id,
                    date,
                },
            )
            .await
            .unwrap_err();

        assert_matches!(err, AppointmentError::SlotNotAligned);
    }
}

#[tokio::test]
async fn booking_rejects_past_dates() {
    let mock_server = MockServer::start().await;
    let client = TestUser::client("Ada Lovelace", "ada@example.com");
    let provider = TestUser::provider("Sasha Barber", "sasha@example.com");

    mock_provider_lookup(&mock_server, &provider).await;

    let service = booking_service(&mock_server);
    let err = service
        .book(
            client.id,
            BookAppointmentRequest {
                provider_id: provider.id,
                date: Utc.with_ymd_and_hms(2001, 6, 2, 9, 0, 0).unwrap(),
            },
        )
        .await
        .unwrap_err();

    assert_matches!(err, AppointmentError::PastDate);
}

// Scenario B: an occupied slot is rejected and nothing is created.
#[tokio::test]
async fn booking_rejects_taken_slot() {
    let mock_server = MockServer::start().await;
    let client = TestUser::client("Ada Lovelace", "ada@example.com");
    let provider = TestUser::provider("Sasha Barber", "sasha@example.com");

    mock_provider_lookup(&mock_server, &provider).await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("provider_id", format!("eq.{}", provider.id)))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([{ "id": uuid::Uuid::new_v4() }])),
        )
        .mount(&mock_server)
        .await;

    // No rpc mock is mounted: reaching the insert would fail the test.
    let service = booking_service(&mock_server);
    let err = service
        .book(
            client.id,
            BookAppointmentRequest {
                provider_id: provider.id,
                date: future_slot(),
            },
        )
        .await
        .unwrap_err();

    assert_matches!(err, AppointmentError::SlotTaken);
}

// A lost race: the pre-check passes but the unique index rejects the insert.
#[tokio::test]
async fn booking_maps_unique_violation_to_slot_taken() {
    let mock_server = MockServer::start().await;
    let client = TestUser::client("Ada Lovelace", "ada@example.com");
    let provider = TestUser::provider("Sasha Barber", "sasha@example.com");

    mock_provider_lookup(&mock_server, &provider).await;
    mock_free_slot(&mock_server).await;
    mock_client_lookup(&mock_server, &client).await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/rpc/book_appointment"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "code": "23505",
            "message": "duplicate key value violates unique constraint \"appointments_provider_slot_key\""
        })))
        .mount(&mock_server)
        .await;

    let service = booking_service(&mock_server);
    let err = service
        .book(
            client.id,
            BookAppointmentRequest {
                provider_id: provider.id,
                date: future_slot(),
            },
        )
        .await
        .unwrap_err();

    assert_matches!(err, AppointmentError::SlotTaken);
}

#[tokio::test]
async fn first_failing_check_wins() {
    let mock_server = MockServer::start().await;
    let provider = TestUser::provider("Sasha Barber", "sasha@example.com");

    mock_provider_lookup(&mock_server, &provider).await;

    // Self-booking an unaligned past slot still reports self-booking first.
    let service = booking_service(&mock_server);
    let err = service
        .book(
            provider.id,
            BookAppointmentRequest {
                provider_id: provider.id,
                date: Utc.with_ymd_and_hms(2001, 6, 2, 9, 15, 0).unwrap(),
            },
        )
        .await
        .unwrap_err();

    assert_matches!(err, AppointmentError::SelfBooking);
}

#[tokio::test]
async fn listing_pages_by_twenty_and_projects_flags() {
    let mock_server = MockServer::start().await;
    let client = TestUser::client("Ada Lovelace", "ada@example.com");
    let provider = TestUser::provider("Sasha Barber", "sasha@example.com");

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("user_id", format!("eq.{}", client.id)))
        .and(query_param("canceled_at", "is.null"))
        .and(query_param("order", "date.asc"))
        .and(query_param("limit", "20"))
        .and(query_param("offset", "20"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::appointment_with_provider_row(
                client.id,
                &provider,
                future_slot(),
            )
        ])))
        .mount(&mock_server)
        .await;

    let state = create_test_state(&mock_server);
    let Json(body) = handlers::index(
        State(state),
        Query(ListQuery { page: Some(2) }),
        Extension(client.to_auth_user()),
    )
    .await
    .unwrap();

    let appointments = body.as_array().unwrap();
    assert_eq!(appointments.len(), 1);
    assert_eq!(appointments[0]["past"], false);
    assert_eq!(appointments[0]["cancelable"], true);
    assert_eq!(appointments[0]["provider"]["name"], "Sasha Barber");
}

#[tokio::test]
async fn schedule_is_provider_only() {
    let mock_server = MockServer::start().await;
    let client = TestUser::client("Ada Lovelace", "ada@example.com");

    Mock::given(method("GET"))
        .and(path("/rest/v1/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let service = booking_service(&mock_server);
    let err = service
        .provider_day(client.id, future_slot().date_naive())
        .await
        .unwrap_err();

    assert_matches!(err, AppointmentError::NotProvider);
}

#[tokio::test]
async fn schedule_lists_day_with_client_projection() {
    let mock_server = MockServer::start().await;
    let client = TestUser::client("Ada Lovelace", "ada@example.com");
    let provider = TestUser::provider("Sasha Barber", "sasha@example.com");

    mock_provider_lookup(&mock_server, &provider).await;

    let mut row = MockSupabaseResponses::appointment_row(client.id, provider.id, future_slot());
    row["user"] = json!({ "id": client.id, "name": client.name });
    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("provider_id", format!("eq.{}", provider.id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([row])))
        .mount(&mock_server)
        .await;

    let service = booking_service(&mock_server);
    let day = service
        .provider_day(provider.id, future_slot().date_naive())
        .await
        .unwrap();

    assert_eq!(day.len(), 1);
    assert_eq!(day[0].user.name, "Ada Lovelace");
}
