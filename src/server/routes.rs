use crate::data::registry::ProfileRegistry;
use crate::server::api::{self, ApiError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status_code: u16,
    pub status_text: &'static str,
    pub content_type: &'static str,
    pub body: String,
}

impl HttpResponse {
    pub fn to_http_string(&self) -> String {
        format!(
            "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            self.status_code,
            self.status_text,
            self.content_type,
            self.body.len(),
            self.body
        )
    }

    fn ok(body: String) -> Self {
        Self {
            status_code: 200,
            status_text: "OK",
            content_type: "application/json",
            body,
        }
    }
}

fn respond(result: Result<String, ApiError>) -> HttpResponse {
    match result {
        Ok(payload) => HttpResponse::ok(payload),
        Err(err) => {
            let (status_code, status_text) = err.status();
            error_response(status_code, status_text, &err.to_string())
        }
    }
}

/// Dispatch one request. Query strings are ignored; unknown method/path pairs are 404.
pub fn route_request(
    registry: &ProfileRegistry,
    method: &str,
    path: &str,
    body: &str,
) -> HttpResponse {
    let path = path.split('?').next().unwrap_or(path);
    match (method, path) {
        ("GET", "/api/health") => respond(api::health_payload()),
        ("GET", "/api/profiles") => respond(api::profiles_payload(registry)),
        ("GET", "/api/packs") => respond(api::packs_payload()),
        ("GET", "/api/settings/default") => respond(api::default_settings_payload()),
        ("POST", "/api/targets") => respond(api::targets_payload(registry, body)),
        ("POST", "/api/parse") => respond(api::parse_payload(body)),
        ("POST", "/api/convert") => respond(api::convert_payload(registry, body)),
        ("POST", "/api/validate") => respond(api::validate_payload(registry, body)),
        ("POST", "/api/pipeline") => respond(api::pipeline_payload(registry, body)),
        ("POST", "/api/export") => respond(api::export_payload(body)),
        ("POST", "/api/reference") => respond(api::reference_payload(body)),
        _ => error_response(404, "Not Found", "Route not found"),
    }
}

fn error_response(status_code: u16, status_text: &'static str, message: &str) -> HttpResponse {
    HttpResponse {
        status_code,
        status_text,
        content_type: "application/json",
        body: format!(
            "{{\n  \"status\": \"error\",\n  \"message\": {}\n}}",
            serde_json::to_string(message).unwrap_or_else(|_| "\"Unknown error\"".to_string())
        ),
    }
}
