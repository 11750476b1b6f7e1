use crate::config::ErrorContract;
use axum::async_trait;
use axum::body::Bytes;
use axum::extract::{FromRef, FromRequest, Request};
use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::de::DeserializeOwned;

/// Body extractor for the book routes.
///
/// Accepts `application/json` or urlencoded form bodies. A missing or
/// unreadable body yields `T::default()`, so handlers report the field as
/// missing instead of axum rejecting the request. The one exception is a
/// body over the size limit under the conventional error contract, which is
/// rejected with 413.
#[derive(Debug, Clone, Default)]
pub struct FormFields<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for FormFields<T>
where
    S: Send + Sync,
    ErrorContract: FromRef<S>,
    T: DeserializeOwned + Default,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|ct| ct.starts_with("application/json"))
            .unwrap_or(false);

        let bytes = match Bytes::from_request(req, state).await {
            Ok(bytes) => bytes,
            Err(e) if e.status() == StatusCode::PAYLOAD_TOO_LARGE => {
                tracing::warn!("Request body over the size limit: {}", e.body_text());
                return match ErrorContract::from_ref(state) {
                    ErrorContract::Legacy => Ok(Self(T::default())),
                    ErrorContract::Conventional => Err(e.into_response()),
                };
            }
            Err(e) => {
                tracing::debug!("Failed to read request body: {}", e);
                return Ok(Self(T::default()));
            }
        };

        if bytes.is_empty() {
            return Ok(Self(T::default()));
        }

        let parsed = if is_json {
            serde_json::from_slice(&bytes).map_err(|e| e.to_string())
        } else {
            serde_urlencoded::from_bytes(&bytes).map_err(|e| e.to_string())
        };

        Ok(Self(parsed.unwrap_or_else(|e| {
            tracing::debug!("Ignoring unparsable request body: {}", e);
            T::default()
        })))
    }
}
