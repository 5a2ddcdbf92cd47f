use std::net::SocketAddr;

use axum::{
    debug_handler,
    extract::{rejection::JsonRejection, ConnectInfo, Path},
    headers::UserAgent,
    http::{HeaderMap, StatusCode},
    Extension, Json, TypedHeader,
};
use tracing::debug;
use validator::Validate;

use crate::{
    app_state::AppState,
    error::AppError,
    models::{
        message::{CreateMessageRequest, CreateMessageResponse, MessageEnvelope},
        view::{ViewEvent, ViewResponse},
    },
    services::view_log::record_view as append_view,
};

const UNKNOWN: &str = "unknown";

/// Handler for `POST /api/messages`
#[debug_handler]
pub async fn create_message(
    Extension(state): Extension<AppState>,
    payload: Result<Json<CreateMessageRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreateMessageResponse>), AppError> {
    let Json(payload) = payload.map_err(json_rejection)?;
    payload
        .validate()
        .map_err(|_| AppError::validation("Message content is required"))?;

    let content = payload.message.unwrap_or_default();
    let created = state.messages.create(&content).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateMessageResponse {
            success: true,
            uuid: created.id,
            url: created.url,
        }),
    ))
}

/// Keeps the 413 for oversized bodies; parser detail stays out of the response
fn json_rejection(rejection: JsonRejection) -> AppError {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return AppError::PayloadTooLarge;
    }
    debug!(error = %rejection.body_text(), "rejected create body");
    AppError::validation("Invalid JSON body")
}

/// Handler for `GET /api/messages/:uuid`
#[debug_handler]
pub async fn get_message(
    Extension(state): Extension<AppState>,
    Path(uuid): Path<String>,
) -> Result<Json<MessageEnvelope>, AppError> {
    debug!(uuid = %uuid, "fetching message");
    let message = state.messages.fetch(&uuid).await?;

    Ok(Json(MessageEnvelope {
        success: true,
        data: message,
    }))
}

/// Handler for `GET /api/messages/` with the id left out
pub async fn missing_message_id() -> AppError {
    AppError::validation("UUID is required")
}

/// Handler for `POST /api/messages/:uuid/view`. Always answers 200.
#[debug_handler]
pub async fn record_view(
    Extension(state): Extension<AppState>,
    Path(uuid): Path<String>,
    headers: HeaderMap,
    peer: Option<ConnectInfo<SocketAddr>>,
    user_agent: Option<TypedHeader<UserAgent>>,
) -> Json<ViewResponse> {
    let ip = client_address(&headers, peer.map(|ConnectInfo(addr)| addr));
    let user_agent = user_agent
        .map(|TypedHeader(agent)| agent.as_str().to_string())
        .unwrap_or_else(|| UNKNOWN.to_string());

    let success = append_view(state.views.as_ref(), ViewEvent::now(uuid, ip, user_agent)).await;
    Json(ViewResponse { success })
}

/// Proxy headers win over the socket peer
fn client_address(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|value| !value.is_empty());

    let real_ip = headers
        .get("x-real-ip")
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty());

    forwarded
        .or(real_ip)
        .map(ToString::to_string)
        .or_else(|| peer.map(|addr| addr.ip().to_string()))
        .unwrap_or_else(|| UNKNOWN.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn forwarded_for_takes_first_hop() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("203.0.113.7, 10.0.0.1"));
        headers.insert("x-real-ip", HeaderValue::from_static("10.0.0.9"));

        assert_eq!(client_address(&headers, None), "203.0.113.7");
    }

    #[test]
    fn falls_back_to_real_ip_then_peer() {
        let mut headers = HeaderMap::new();
        headers.insert("x-real-ip", HeaderValue::from_static("10.0.0.9"));
        assert_eq!(client_address(&headers, None), "10.0.0.9");

        let peer: SocketAddr = "192.168.1.4:50000".parse().unwrap();
        assert_eq!(client_address(&HeaderMap::new(), Some(peer)), "192.168.1.4");
        assert_eq!(client_address(&HeaderMap::new(), None), "unknown");
    }
}
