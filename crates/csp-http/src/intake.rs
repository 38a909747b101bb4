//! Violation report intake.
//!
//! Each request runs through a fixed sequence of checks: the method must be
//! `POST`, the media type must be `application/json` or
//! `application/csp-report`, and the body must decode as a [`Violation`].
//! The first failed check ends the request with its status code. The
//! request body is owned by the intake and is dropped on every exit path.
//!
//! ```no_run
//! use std::convert::Infallible;
//! use std::net::SocketAddr;
//!
//! use citadel_csp_http::ViolationHandler;
//! use hyper::service::{make_service_fn, service_fn};
//! use hyper::Server;
//!
//! async fn serve(addr: SocketAddr) -> Result<(), hyper::Error> {
//!     let handler = ViolationHandler::new(|violation| log::warn!("{:?}", violation));
//!     let make_svc = make_service_fn(move |_| {
//!         let handler = handler.clone();
//!         async move {
//!             Ok::<_, Infallible>(service_fn(move |req| {
//!                 let handler = handler.clone();
//!                 async move { Ok::<_, Infallible>(handler.handle(req).await) }
//!             }))
//!         }
//!     });
//!     Server::bind(&addr).serve(make_svc).await
//! }
//! ```

use std::sync::Arc;

use bytes::{Bytes, BytesMut};
use hyper::body::HttpBody;
use hyper::header::{HeaderValue, ALLOW, CONTENT_TYPE};
use hyper::{Body, Method, Request, Response, StatusCode};

use crate::config::IntakeConfig;
use crate::report::Violation;

/// Media types a violation report may be posted with
pub const ACCEPTED_MEDIA_TYPES: [&str; 2] = ["application/json", "application/csp-report"];

/// Why a report was turned away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Anything but `POST`; answered with `Allow: POST`
    MethodNotAllowed,
    /// Content type outside [`ACCEPTED_MEDIA_TYPES`]
    UnsupportedMediaType,
    /// Body over [`IntakeConfig::max_body_bytes`]
    PayloadTooLarge,
    /// Body unreadable or not shaped like a violation report
    BadRequest,
}

impl Rejection {
    pub fn status(&self) -> StatusCode {
        match self {
            Rejection::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Rejection::UnsupportedMediaType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Rejection::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Rejection::BadRequest => StatusCode::BAD_REQUEST,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Rejection::MethodNotAllowed => "this resource only accepts POST requests",
            Rejection::UnsupportedMediaType => {
                "content-type not one of {application/json, application/csp-report}"
            }
            Rejection::PayloadTooLarge => "request entity too large",
            Rejection::BadRequest => "invalid request entity",
        }
    }

    /// Plain-text response for the rejection.
    pub fn into_response(self) -> Response<Body> {
        let mut response = Response::new(Body::from(format!("{}\n", self.message())));
        *response.status_mut() = self.status();
        if self == Rejection::MethodNotAllowed {
            response
                .headers_mut()
                .insert(ALLOW, HeaderValue::from_static("POST"));
        }
        response
    }
}

/// Terminal state of one intake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntakeOutcome {
    Dispatched(Violation),
    Rejected(Rejection),
}

/// Run the intake checks on `req` and decode its body.
pub async fn decode_request(req: Request<Body>, config: &IntakeConfig) -> IntakeOutcome {
    let (parts, body) = req.into_parts();

    if parts.method != Method::POST {
        log::warn!("rejecting violation report sent with {}", parts.method);
        return IntakeOutcome::Rejected(Rejection::MethodNotAllowed);
    }

    let media_type = media_type(parts.headers.get(CONTENT_TYPE));
    if !ACCEPTED_MEDIA_TYPES.iter().any(|accepted| *accepted == media_type) {
        log::warn!("rejecting violation report with content type {:?}", media_type);
        return IntakeOutcome::Rejected(Rejection::UnsupportedMediaType);
    }

    let bytes = match read_body(body, config.max_body_bytes).await {
        Ok(bytes) => bytes,
        Err(rejection) => return IntakeOutcome::Rejected(rejection),
    };

    match Violation::from_slice(&bytes) {
        Ok(violation) => IntakeOutcome::Dispatched(violation),
        Err(err) => {
            log::warn!("rejecting malformed violation report: {}", err);
            IntakeOutcome::Rejected(Rejection::BadRequest)
        }
    }
}

/// The content type up to its first parameter.
fn media_type(value: Option<&HeaderValue>) -> &str {
    value
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .unwrap_or_default()
}

async fn read_body(mut body: Body, limit: usize) -> Result<Bytes, Rejection> {
    let mut buf = BytesMut::new();
    while let Some(chunk) = body.data().await {
        let chunk = chunk.map_err(|err| {
            log::warn!("failed to read violation report body: {}", err);
            Rejection::BadRequest
        })?;
        if buf.len() + chunk.len() > limit {
            log::warn!("violation report body exceeds {} bytes", limit);
            return Err(Rejection::PayloadTooLarge);
        }
        buf.extend_from_slice(&chunk);
    }
    Ok(buf.freeze())
}

struct Inner<F> {
    callback: F,
    config: IntakeConfig,
}

/// Accepts browser violation reports and hands them to a callback.
///
/// Calls to the callback are not serialized; a callback that touches shared
/// state must synchronize it.
pub struct ViolationHandler<F> {
    inner: Arc<Inner<F>>,
}

impl<F> Clone for ViolationHandler<F> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<F> ViolationHandler<F>
where
    F: Fn(Violation) + Send + Sync,
{
    pub fn new(callback: F) -> Self {
        Self::with_config(callback, IntakeConfig::default())
    }

    pub fn with_config(callback: F, config: IntakeConfig) -> Self {
        Self {
            inner: Arc::new(Inner { callback, config }),
        }
    }

    pub fn config(&self) -> &IntakeConfig {
        &self.inner.config
    }

    /// Handle one report request: `200` once the callback has run, or the
    /// rejection's status.
    pub async fn handle(&self, req: Request<Body>) -> Response<Body> {
        match decode_request(req, &self.inner.config).await {
            IntakeOutcome::Dispatched(violation) => {
                log::debug!("dispatching violation report: {:?}", violation.report);
                (self.inner.callback)(violation);
                Response::new(Body::empty())
            }
            IntakeOutcome::Rejected(rejection) => rejection.into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_type_strips_parameters() {
        let value = HeaderValue::from_static("application/csp-report; charset=utf-8");
        assert_eq!(media_type(Some(&value)), "application/csp-report");
        assert_eq!(media_type(None), "");
    }

    #[test]
    fn test_method_rejection_carries_allow_header() {
        let response = Rejection::MethodNotAllowed.into_response();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers()[ALLOW], "POST");

        let response = Rejection::BadRequest.into_response();
        assert!(!response.headers().contains_key(ALLOW));
    }
}
