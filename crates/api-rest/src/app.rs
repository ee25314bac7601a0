//! The axum application.
//!
//! Every API request falls through to a single handler that reads the body, runs the
//! [`Dispatcher`] on the blocking pool and encodes the result. Only the Swagger UI and the
//! OpenAPI document are routed by axum itself.

use crate::codec::{encode, ApiError};
use crate::config::ServerConfig;
use crate::dispatch::{self, Dispatcher};
use axum::{
    body::Body,
    extract::State,
    http::{header, Method, Uri},
    response::Response,
    Router,
};
use carehub_api_shared::{
    DatabaseStatus, DeleteAllRes, ErrorBody, HealthRes, LoginReq, LoginRes, MessageRes,
    ServiceStatus, UserView,
};
use carehub_core::model::{
    Appointment, Bill, Doctor, Gender, MedicalRecord, Medication, Patient, User, UserRole,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Largest request body accepted, in bytes.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

#[derive(OpenApi)]
#[openapi(
    paths(
        dispatch::health,
        dispatch::auth::login,
        dispatch::patients::list_patients,
        dispatch::patients::create_patient,
        dispatch::patients::get_patient,
        dispatch::patients::update_patient,
        dispatch::patients::delete_patient,
        dispatch::patients::delete_all_patients,
        dispatch::doctors::list_doctors,
        dispatch::doctors::create_doctor,
        dispatch::doctors::get_doctor,
        dispatch::doctors::update_doctor,
        dispatch::doctors::delete_doctor,
        dispatch::appointments::list_appointments,
        dispatch::appointments::create_appointment,
        dispatch::appointments::get_appointment,
        dispatch::appointments::update_appointment,
        dispatch::appointments::delete_appointment,
        dispatch::appointments::complete_appointment,
        dispatch::bills::list_bills,
        dispatch::bills::create_bill,
        dispatch::bills::get_bill,
        dispatch::bills::update_bill,
        dispatch::bills::delete_bill,
        dispatch::bills::pay_bill,
        dispatch::users::list_users,
        dispatch::users::create_user,
        dispatch::users::get_user,
        dispatch::users::update_user,
        dispatch::users::delete_user,
    ),
    components(schemas(
        HealthRes,
        ServiceStatus,
        DatabaseStatus,
        ErrorBody,
        MessageRes,
        DeleteAllRes,
        LoginReq,
        LoginRes,
        UserView,
        Patient,
        Gender,
        Medication,
        MedicalRecord,
        Doctor,
        Appointment,
        Bill,
        User,
        UserRole,
        dispatch::patients::PatientUpdate,
        dispatch::doctors::DoctorUpdate,
        dispatch::appointments::AppointmentUpdate,
        dispatch::bills::BillUpdate,
        dispatch::users::UserUpdate,
    ))
)]
pub struct ApiDoc;

/// Builds the application around a shared dispatcher.
pub fn router(dispatcher: Arc<Dispatcher>) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .fallback(handle_request)
        .layer(cors())
        .with_state(dispatcher)
}

/// Answers CORS preflight requests. The codec adds the same headers to every other response.
fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE])
}

async fn handle_request(
    State(dispatcher): State<Arc<Dispatcher>>,
    method: Method,
    uri: Uri,
    body: Body,
) -> Response {
    let span = tracing::info_span!("request", %method, path = %uri.path());

    let bytes = match axum::body::to_bytes(body, MAX_BODY_BYTES).await {
        Ok(bytes) => bytes,
        Err(e) => {
            span.in_scope(|| tracing::warn!("Unreadable request body: {e}"));
            return encode(Err(ApiError::bad_request(format!("Invalid request: {e}"))));
        }
    };

    let worker_span = span.clone();
    let result = tokio::task::spawn_blocking(move || {
        let _entered = worker_span.enter();
        dispatcher.handle(&method, &uri, &bytes)
    })
    .await
    .unwrap_or_else(|e| Err(ApiError::internal("Request handler failed", e)));

    let response = encode(result);
    span.in_scope(|| tracing::debug!(status = response.status().as_u16(), "request finished"));
    response
}

/// Serves the API until Ctrl-C or SIGTERM, then lets in-flight requests finish.
///
/// # Errors
/// Returns an error if the address cannot be bound or the server fails while running.
pub async fn serve(cfg: &ServerConfig, dispatcher: Arc<Dispatcher>) -> anyhow::Result<()> {
    let addr = cfg.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("-- Starting CareHub REST API on {}", addr);

    axum::serve(listener, router(dispatcher))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("-- CareHub REST API stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutdown signal received");
}
