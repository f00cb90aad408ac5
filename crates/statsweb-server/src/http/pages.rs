//! Text endpoints: path echo, request dump, hit count, usage.

use std::collections::BTreeMap;
use std::fmt::Write;
use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, FromRequest, Query, Request, State},
    http::{header, request::Parts, Method, Uri},
    Form,
};

use crate::app_state::AppState;

/// Echo the request path. Also serves every unmatched route.
pub async fn echo_path(State(app): State<AppState>, uri: Uri) -> String {
    app.metrics()
        .increment_counter(&app.names().default_page, 1);
    format!("URL.Path = {:?}\n", uri.path())
}

/// Current value of the hit counter.
pub async fn count(State(app): State<AppState>) -> String {
    let n = app.hits().snapshot();
    app.metrics()
        .increment_counter(&app.names().counter_page, 1);
    format!("Count: {n}\n")
}

pub async fn help(State(app): State<AppState>) -> &'static str {
    app.metrics().increment_counter(&app.names().help_page, 1);
    USAGE
}

const USAGE: &str = "Usage -  the following URL paths are available:
      - \"/help\" to print this usage page...
      - \"/debug\" to display request header info...
      - \"/count\" to see the site's hit counter...
      - \"/lissajous\" to see Lissajous figures...
      - \"/metrics\" to see in-process metrics...
      - \"/healthz\" for a liveness check...
";

/// Dump request line, headers, host, peer address, and form fields.
pub async fn debug(
    State(app): State<AppState>,
    remote: Option<ConnectInfo<SocketAddr>>,
    req: Request,
) -> String {
    let (parts, body) = req.into_parts();
    let mut out = String::new();

    let _ = writeln!(out, "{} {} {:?}", parts.method, parts.uri, parts.version);
    for name in parts.headers.keys() {
        let values: Vec<String> = parts
            .headers
            .get_all(name)
            .iter()
            .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
            .collect();
        let _ = writeln!(out, "Header[{:?}] = {:?}", canonical_header(name.as_str()), values);
    }
    let _ = writeln!(out, "Host = {:?}", host_of(&parts));
    let remote = remote
        .map(|ConnectInfo(addr)| addr.to_string())
        .unwrap_or_default();
    let _ = writeln!(out, "RemoteAddr = {remote:?}");

    let mut form: BTreeMap<String, Vec<String>> = BTreeMap::new();
    match Query::<Vec<(String, String)>>::try_from_uri(&parts.uri) {
        Ok(Query(pairs)) => collect(&mut form, pairs),
        Err(e) => tracing::warn!(error = %e, "debug: query parse failed"),
    }

    if is_form_body(&parts) {
        let req = Request::from_parts(parts, body);
        match Form::<Vec<(String, String)>>::from_request(req, &app).await {
            Ok(Form(pairs)) => collect(&mut form, pairs),
            Err(e) => tracing::warn!(error = %e, "debug: form body parse failed"),
        }
    }

    for (k, v) in &form {
        let _ = writeln!(out, "Form[{k:?}] = {v:?}");
    }

    app.metrics().increment_counter(&app.names().debug_page, 1);
    out
}

/// `x-forwarded-for` -> `X-Forwarded-For`. The header map stores names lower-cased.
fn canonical_header(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper = true;
    for c in name.chars() {
        if upper {
            out.push(c.to_ascii_uppercase());
        } else {
            out.push(c.to_ascii_lowercase());
        }
        upper = c == '-';
    }
    out
}

fn host_of(parts: &Parts) -> String {
    parts
        .headers
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .map(str::to_string)
        .or_else(|| parts.uri.authority().map(|a| a.to_string()))
        .unwrap_or_default()
}

fn is_form_body(parts: &Parts) -> bool {
    if parts.method == Method::GET || parts.method == Method::HEAD {
        return false;
    }
    parts
        .headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"))
}

fn collect(form: &mut BTreeMap<String, Vec<String>>, pairs: Vec<(String, String)>) {
    for (k, v) in pairs {
        form.entry(k).or_default().push(v);
    }
}
