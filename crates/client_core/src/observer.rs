use reqwest::{Method, StatusCode};
use tracing::{info, warn};

use crate::error::ClientError;

#[derive(Debug)]
pub enum HttpEvent<'a> {
    Request {
        method: &'a Method,
        url: &'a str,
    },
    Response {
        method: &'a Method,
        url: &'a str,
        status: StatusCode,
    },
    Failed {
        method: &'a Method,
        url: &'a str,
        error: &'a ClientError,
    },
}

/// Receives every outbound request, response and classified failure.
pub trait RequestObserver: Send + Sync {
    fn observe(&self, event: &HttpEvent<'_>);
}

/// Emits one structured tracing event per [`HttpEvent`].
pub struct TracingObserver;

impl RequestObserver for TracingObserver {
    fn observe(&self, event: &HttpEvent<'_>) {
        match event {
            HttpEvent::Request { method, url } => {
                info!(method = %method, url, "http: request");
            }
            HttpEvent::Response {
                method,
                url,
                status,
            } => {
                info!(method = %method, url, status = status.as_u16(), "http: response");
            }
            HttpEvent::Failed { method, url, error } => {
                warn!(method = %method, url, error = %error, "http: request failed");
            }
        }
    }
}

pub struct NoopObserver;

impl RequestObserver for NoopObserver {
    fn observe(&self, _event: &HttpEvent<'_>) {}
}
