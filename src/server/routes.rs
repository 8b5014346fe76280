use crate::server::api::{self, ApiContext, ApiError};
use crate::store::StoreError;

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
}

fn json_ok(body: String) -> HttpResponse {
    HttpResponse {
        status_code: 200,
        status_text: "OK",
        content_type: "application/json",
        body,
    }
}

pub fn route_request(ctx: &ApiContext, method: &str, path: &str, body: &str) -> HttpResponse {
    let (route, query) = path.split_once('?').unwrap_or((path, ""));
    match (method, route) {
        ("GET", "/") => HttpResponse {
            status_code: 200,
            status_text: "OK",
            content_type: "text/html; charset=utf-8",
            body: index_html(),
        },
        ("GET", "/api/health") => match api::health_payload() {
            Ok(payload) => json_ok(payload),
            Err(err) => error_response(500, "Internal Server Error", &err.to_string()),
        },
        ("GET", "/api/cards") => match api::cards_payload() {
            Ok(payload) => json_ok(payload),
            Err(err) => error_response(500, "Internal Server Error", &err.to_string()),
        },
        ("GET", "/api/ships") => match api::ships_payload() {
            Ok(payload) => json_ok(payload),
            Err(err) => error_response(500, "Internal Server Error", &err.to_string()),
        },
        ("GET", "/api/encounters") => api_result(api::encounters_get_payload(ctx, query)),
        ("POST", "/api/encounters") => api_result(api::encounters_post_payload(ctx, body)),
        ("GET", "/api/table/rows") => api_result(api::rows_payload(ctx, query)),
        _ => error_response(404, "Not Found", "Route not found"),
    }
}

fn api_result(result: Result<String, ApiError>) -> HttpResponse {
    match result {
        Ok(payload) => json_ok(payload),
        Err(err @ ApiError::Parse(_)) => error_response(400, "Bad Request", &err.to_string()),
        Err(ApiError::Store(err @ StoreError::IndexOutOfRange { .. })) => {
            kind_error_response(400, "Bad Request", "index_out_of_range", &err.to_string())
        }
        Err(ApiError::Store(err)) => {
            kind_error_response(400, "Bad Request", "invalid_selection", &err.to_string())
        }
        Err(err @ ApiError::Filter(_)) => error_response(400, "Bad Request", &err.to_string()),
        Err(err @ ApiError::Serialize(_)) => {
            log::error!("{err}");
            error_response(500, "Internal Server Error", &err.to_string())
        }
    }
}

fn kind_error_response(
    status_code: u16,
    status_text: &'static str,
    kind: &str,
    message: &str,
) -> HttpResponse {
    let fallback = "{\n  \"status\": \"error\",\n  \"message\": \"Unknown error\"\n}".to_string();
    HttpResponse {
        status_code,
        status_text,
        content_type: "application/json",
        body: serde_json::to_string_pretty(&serde_json::json!({
            "status": "error",
            "kind": kind,
            "message": message,
        }))
        .unwrap_or(fallback),
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

fn index_html() -> String {
    r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <meta name="viewport" content="width=device-width,initial-scale=1" />
  <title>Quantum Combat Calculator API</title>
  <style>
    body { font-family: Arial, sans-serif; max-width: 900px; margin: 24px auto; padding: 0 12px; }
    .card { border: 1px solid #ddd; border-radius: 8px; padding: 14px; margin: 14px 0; }
    label { display:block; margin: 8px 0 4px; font-weight: 600; }
    input { width: 100%; padding: 8px; box-sizing: border-box; }
    button { margin-top: 12px; padding: 8px 14px; }
    pre { background: #111; color: #aef2ae; padding: 12px; overflow: auto; border-radius: 6px; min-height: 180px; }
  </style>
</head>
<body>
  <h1>Quantum Combat Calculator</h1>

  <div class="card">
    <label for="query">Encounters</label>
    <input id="query" value="encounter=1:1" />
    <div>
      <button id="resolve-btn">Resolve</button>
      <button id="add-btn">Add encounter</button>
      <button id="swap-btn">Swap sides of first</button>
      <button id="reset-btn">Reset</button>
    </div>
  </div>

  <pre id="output">Ready.</pre>

  <script>
    const output = document.getElementById('output');
    const queryEl = document.getElementById('query');

    function show(response, text) {
      output.textContent = 'HTTP ' + response.status + '\n' + text;
      try {
        const j = JSON.parse(text);
        if (j.query) queryEl.value = j.query;
      } catch (e) {}
    }

    async function resolve() {
      const response = await fetch('/api/encounters?' + queryEl.value);
      show(response, await response.text());
    }

    async function act(action) {
      const response = await fetch('/api/encounters', {
        method: 'POST',
        headers: { 'Content-Type': 'application/json' },
        body: JSON.stringify({ query: queryEl.value, action }),
      });
      show(response, await response.text());
    }

    document.getElementById('resolve-btn').addEventListener('click', resolve);
    document.getElementById('add-btn').addEventListener('click', () => act({ type: 'add' }));
    document.getElementById('swap-btn').addEventListener('click', () => act({ type: 'swap', index: 0 }));
    document.getElementById('reset-btn').addEventListener('click', () => act({ type: 'reset' }));
  </script>
</body>
</html>
"#
    .to_string()
}
