use std::{sync::Arc, time::Duration};

use axum::{
    extract::{Request, State},
    http::{
        header::{
            ACCESS_CONTROL_ALLOW_CREDENTIALS, ACCESS_CONTROL_ALLOW_HEADERS,
            ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
            ACCESS_CONTROL_EXPOSE_HEADERS, ACCESS_CONTROL_MAX_AGE, ACCESS_CONTROL_REQUEST_HEADERS,
            ACCESS_CONTROL_REQUEST_METHOD, AUTHORIZATION, CONTENT_TYPE, ORIGIN, VARY,
        },
        header::InvalidHeaderValue,
        HeaderMap, HeaderName, HeaderValue, Method,
    },
    middleware::Next,
    response::Response,
};

/// Static cross-origin policy applied to every response of the main API.
#[derive(Debug, Clone)]
pub struct CorsPolicy {
    allowed_origin: HeaderValue,
    allow_methods: HeaderValue,
    allow_headers: Vec<HeaderName>,
    expose_headers: HeaderValue,
    max_age: HeaderValue,
}

impl CorsPolicy {
    pub fn new(allowed_origin: &str, max_age: Duration) -> Result<Self, InvalidHeaderValue> {
        Ok(Self {
            allowed_origin: HeaderValue::from_str(allowed_origin)?,
            allow_methods: HeaderValue::from_static("GET, OPTIONS, POST"),
            allow_headers: vec![CONTENT_TYPE, AUTHORIZATION],
            expose_headers: HeaderValue::from_static("Content-Type, Transfer-Encoding"),
            max_age: HeaderValue::from(max_age.as_secs()),
        })
    }

    pub fn allows(&self, origin: &HeaderValue) -> bool {
        *origin == self.allowed_origin
    }

    /// The subset of `Access-Control-Request-Headers` this policy accepts.
    fn accepted_request_headers(&self, requested: &HeaderValue) -> Option<HeaderValue> {
        let accepted: Vec<&str> = requested
            .to_str()
            .ok()?
            .split(',')
            .map(str::trim)
            .filter(|name| {
                self.allow_headers
                    .iter()
                    .any(|allowed| allowed.as_str().eq_ignore_ascii_case(name))
            })
            .collect();

        if accepted.is_empty() {
            return None;
        }
        HeaderValue::from_str(&accepted.join(", ")).ok()
    }

    /// Write the CORS headers for a request from an allowed `origin`.
    pub fn decorate(
        &self,
        headers: &mut HeaderMap,
        origin: &HeaderValue,
        preflight: bool,
        requested_headers: Option<&HeaderValue>,
    ) {
        headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, origin.clone());
        headers.insert(
            ACCESS_CONTROL_ALLOW_CREDENTIALS,
            HeaderValue::from_static("true"),
        );
        headers.append(VARY, HeaderValue::from_static("Origin"));

        if preflight {
            headers.insert(ACCESS_CONTROL_ALLOW_METHODS, self.allow_methods.clone());
            if let Some(accepted) = requested_headers.and_then(|h| self.accepted_request_headers(h))
            {
                headers.insert(ACCESS_CONTROL_ALLOW_HEADERS, accepted);
            }
            headers.insert(ACCESS_CONTROL_MAX_AGE, self.max_age.clone());
        } else {
            headers.insert(ACCESS_CONTROL_EXPOSE_HEADERS, self.expose_headers.clone());
        }
    }
}

/// Middleware that decorates responses to requests from the allowed origin.
///
/// Requests are always passed through, so route-level OPTIONS handlers still
/// produce the response body. Other origins get no CORS headers at all.
pub async fn apply_cors(
    State(policy): State<Arc<CorsPolicy>>,
    request: Request,
    next: Next,
) -> Response {
    let headers = request.headers();
    let origin = headers.get(ORIGIN).cloned();
    let preflight =
        request.method() == Method::OPTIONS && headers.contains_key(ACCESS_CONTROL_REQUEST_METHOD);
    let requested_headers = headers.get(ACCESS_CONTROL_REQUEST_HEADERS).cloned();

    let mut response = next.run(request).await;

    if let Some(origin) = origin.filter(|o| policy.allows(o)) {
        policy.decorate(
            response.headers_mut(),
            &origin,
            preflight,
            requested_headers.as_ref(),
        );
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> CorsPolicy {
        CorsPolicy::new("http://localhost:3000", Duration::from_secs(3600)).unwrap()
    }

    #[test]
    fn only_the_configured_origin_is_allowed() {
        let p = policy();
        assert!(p.allows(&HeaderValue::from_static("http://localhost:3000")));
        assert!(!p.allows(&HeaderValue::from_static("http://localhost:3001")));
        assert!(!p.allows(&HeaderValue::from_static("http://evil.example")));
    }

    #[test]
    fn preflight_gets_methods_headers_and_max_age() {
        let mut headers = HeaderMap::new();
        let origin = HeaderValue::from_static("http://localhost:3000");
        let requested = HeaderValue::from_static("content-type, x-custom, Authorization");

        policy().decorate(&mut headers, &origin, true, Some(&requested));

        assert_eq!(headers[ACCESS_CONTROL_ALLOW_ORIGIN], "http://localhost:3000");
        assert_eq!(headers[ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
        assert_eq!(headers[ACCESS_CONTROL_ALLOW_METHODS], "GET, OPTIONS, POST");
        assert_eq!(
            headers[ACCESS_CONTROL_ALLOW_HEADERS],
            "content-type, Authorization"
        );
        assert_eq!(headers[ACCESS_CONTROL_MAX_AGE], "3600");
        assert!(!headers.contains_key(ACCESS_CONTROL_EXPOSE_HEADERS));
    }

    #[test]
    fn actual_requests_get_expose_headers() {
        let mut headers = HeaderMap::new();
        let origin = HeaderValue::from_static("http://localhost:3000");

        policy().decorate(&mut headers, &origin, false, None);

        assert_eq!(
            headers[ACCESS_CONTROL_EXPOSE_HEADERS],
            "Content-Type, Transfer-Encoding"
        );
        assert!(!headers.contains_key(ACCESS_CONTROL_MAX_AGE));
        assert_eq!(headers[VARY], "Origin");
    }

    #[test]
    fn unknown_request_headers_are_not_echoed() {
        let requested = HeaderValue::from_static("x-custom");
        assert!(policy().accepted_request_headers(&requested).is_none());
    }

    #[test]
    fn rejects_origin_that_is_not_a_header_value() {
        assert!(CorsPolicy::new("http://bad\norigin", Duration::ZERO).is_err());
    }
}
