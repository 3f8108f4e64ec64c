use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use std::{env, sync::OnceLock};

// Inline styles and the submit form's inline script are served by us; images
// come from the object store over https, or its http origin when configured.
const DEFAULT_CSP_POLICY: &str = "default-src 'self'; base-uri 'self'; frame-ancestors 'none'; object-src 'none'; form-action 'self'; script-src 'self' 'unsafe-inline'; style-src 'self' 'unsafe-inline'; img-src 'self' data: https:; connect-src 'self'";
const HSTS_VALUE: &str = "max-age=31536000; includeSubDomains";

#[derive(Debug, Clone)]
struct SecurityHeadersConfig {
    csp: HeaderValue,
    enable_hsts: bool,
}

impl SecurityHeadersConfig {
    fn from_env() -> Self {
        let default_policy = || {
            let public_url = env::var("S3_PUBLIC_URL").unwrap_or_default();
            HeaderValue::from_str(&default_policy_for(&public_url)).unwrap_or_else(|err| {
                tracing::warn!(
                    "Invalid S3_PUBLIC_URL origin for CSP ({}), using https-only images",
                    err
                );
                HeaderValue::from_static(DEFAULT_CSP_POLICY)
            })
        };

        let csp = match env::var("CSP_POLICY") {
            Ok(raw) => HeaderValue::from_str(&raw).unwrap_or_else(|err| {
                tracing::warn!(
                    "Invalid CSP_POLICY value ({}), falling back to default policy",
                    err
                );
                default_policy()
            }),
            Err(_) => default_policy(),
        };

        Self {
            csp,
            enable_hsts: parse_bool_env("ENABLE_HSTS", true),
        }
    }
}

/// `scheme://host[:port]` of a plain-http base URL. `https:` sources are
/// already allowed, so only http origins need listing.
fn http_origin(url: &str) -> Option<&str> {
    let rest = url.trim().strip_prefix("http://")?;
    let host_len = rest.find('/').unwrap_or(rest.len());
    let host = &rest[..host_len];
    if host.is_empty() || host.contains(|c: char| c.is_whitespace() || c == ';' || c == ',') {
        return None;
    }
    Some(&url.trim()[.."http://".len() + host_len])
}

/// Default policy, with the image bucket's origin added to `img-src` when it
/// is served over plain http (local MinIO and similar).
fn default_policy_for(public_url: &str) -> String {
    match http_origin(public_url) {
        Some(origin) => DEFAULT_CSP_POLICY.replace(
            "img-src 'self' data: https:",
            &format!("img-src 'self' data: https: {}", origin),
        ),
        None => DEFAULT_CSP_POLICY.to_string(),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" | "on" => Some(true),
        "0" | "false" | "no" | "n" | "off" => Some(false),
        _ => None,
    }
}

fn parse_bool_env(var_name: &str, default: bool) -> bool {
    env::var(var_name)
        .ok()
        .and_then(|value| parse_bool(&value))
        .unwrap_or(default)
}

fn security_headers_config() -> &'static SecurityHeadersConfig {
    static CONFIG: OnceLock<SecurityHeadersConfig> = OnceLock::new();
    CONFIG.get_or_init(SecurityHeadersConfig::from_env)
}

pub async fn security_headers_middleware(request: Request, next: Next) -> Response {
    let config = security_headers_config();
    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    headers.insert("content-security-policy", config.csp.clone());
    headers.insert(
        "x-content-type-options",
        HeaderValue::from_static("nosniff"),
    );
    headers.insert("x-frame-options", HeaderValue::from_static("DENY"));
    headers.insert(
        "referrer-policy",
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );

    if config.enable_hsts {
        headers.insert(
            "strict-transport-security",
            HeaderValue::from_static(HSTS_VALUE),
        );
    }

    response
}
