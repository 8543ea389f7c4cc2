//! HTTP server for the treemap viewer
//!
//! `methanetree serve data.csv` → starts server, serves the D3 viewer and a
//! small JSON API over one shared controller. Requests are handled one at a
//! time and every controller access goes through the same lock.
//!
//! `/api/tooltip` is a read-only query. Everything else that changes what the
//! page shows, `/api/compare` included, is dispatched as a controller message.

use crate::compare::ComparisonChart;
use crate::config::{ChartConfig, Config};
use crate::controller::{parse_event, Controller, RenderPlan, Renderer, SharedController, View};
use crate::hierarchy::NodeSet;
use crate::record;
use crate::style;
use crate::tooltip::EmissionComparison;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError};
use tiny_http::{Header, Method, Request, Response, Server};

#[derive(Serialize)]
struct ApiResponse<T> {
    ok: bool,
    data: Option<T>,
    error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    fn success(data: T) -> Self {
        Self {
            ok: true,
            data: Some(data),
            error: None,
        }
    }

    fn failure(error: String) -> Self {
        Self {
            ok: false,
            data: None,
            error: Some(error),
        }
    }
}

const GRAPH_VIEWER_HTML: &str = include_str!("viewer.html");

/// Renderer that buffers what the page has to redraw on its next response
#[derive(Debug, Default)]
pub struct ViewerRenderer {
    renders: u64,
    tooltip: Option<String>,
    comparison: Option<ComparisonChart>,
}

impl ViewerRenderer {
    pub fn renders(&self) -> u64 {
        self.renders
    }
}

impl Renderer for ViewerRenderer {
    fn render(&mut self, _plan: &RenderPlan) {
        self.renders += 1;
        self.tooltip = None;
    }

    fn highlight(&mut self, _name: &str, tooltip: Option<&EmissionComparison>) {
        self.tooltip = tooltip.map(|t| t.html());
    }

    fn clear_highlight(&mut self) {
        self.tooltip = None;
    }

    fn render_comparison(&mut self, chart: &ComparisonChart) {
        self.comparison = Some(chart.clone());
    }

    fn clear_comparison(&mut self) {
        self.comparison = None;
    }
}

/// State snapshot returned by every API call
#[derive(Debug, Serialize)]
pub struct ViewResponse {
    pub view: View,
    pub clickable: bool,
    pub nodes: NodeSet,
    /// Tooltip markup produced by this request, if any
    pub tooltip: Option<String>,
    /// Comparison chart produced by this request, if any
    pub comparison: Option<ComparisonChart>,
}

fn snapshot(controller: &mut Controller<ViewerRenderer>) -> ViewResponse {
    let renderer = controller.renderer_mut();
    let tooltip = renderer.tooltip.take();
    let comparison = renderer.comparison.take();
    ViewResponse {
        view: controller.view().clone(),
        clickable: controller.clickable(),
        nodes: controller.displayed().clone(),
        tooltip,
        comparison,
    }
}

/// Start the viewer server for a data file
pub fn start_viewer_server(data_path: &Path, config: &Config, port: u16) -> crate::Result<()> {
    let records = record::load(data_path)?;
    let controller = Controller::new(records, ViewerRenderer::default()).into_shared();

    let _watcher = if config.serve.watch {
        Some(watch_data_file(data_path.to_path_buf(), Arc::clone(&controller))?)
    } else {
        None
    };

    let addr = format!("127.0.0.1:{}", port);
    let server = Server::http(&addr)
        .map_err(|e| std::io::Error::other(e.to_string()))?;

    tracing::info!(%addr, data = %data_path.display(), "viewer listening");
    eprintln!("\n\x1b[1;32m🌳 methanetree\x1b[0m");
    eprintln!("   Treemap viewer: http://localhost:{}", port);
    eprintln!("   Press Ctrl+C to stop\n");

    for request in server.incoming_requests() {
        if let Err(e) = handle_request(request, &controller, &config.chart) {
            tracing::error!(error = %e, "request failed");
        }
    }

    Ok(())
}

/// Whether a watcher event rewrote the data file.
///
/// Editors that save by renaming a temp file over the original show up as a
/// create or rename in the parent directory, not as a modify of the file.
fn touches_data_file(event: &Event, data_path: &Path) -> bool {
    let Some(file_name) = data_path.file_name() else {
        return false;
    };
    matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_))
        && event.paths.iter().any(|p| p.file_name() == Some(file_name))
}

/// Reload records and reset the view whenever the data file is rewritten.
/// The parent directory is watched so the watch survives atomic saves.
fn watch_data_file(
    path: PathBuf,
    controller: SharedController<ViewerRenderer>,
) -> crate::Result<RecommendedWatcher> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let watched = path.clone();
    let mut watcher = RecommendedWatcher::new(
        move |res: Result<Event, notify::Error>| {
            let event = match res {
                Ok(event) => event,
                Err(e) => {
                    tracing::warn!(error = %e, "data file watch error");
                    return;
                }
            };
            if matches!(event.kind, EventKind::Remove(_))
                && event.paths.iter().any(|p| p.file_name() == watched.file_name())
            {
                tracing::warn!(path = %watched.display(), "data file removed, keeping current records");
                return;
            }
            if !touches_data_file(&event, &watched) {
                return;
            }
            match record::load(&watched) {
                Ok(records) => {
                    let mut c = controller.lock().unwrap_or_else(PoisonError::into_inner);
                    c.set_records(records);
                    c.reset();
                    tracing::info!(records = c.records().len(), "data file reloaded");
                }
                Err(e) => tracing::warn!(error = %e, "data file changed but failed to load"),
            }
        },
        notify::Config::default(),
    )
    .map_err(|e| std::io::Error::other(e.to_string()))?;

    watcher
        .watch(&dir, RecursiveMode::NonRecursive)
        .map_err(|e| std::io::Error::other(e.to_string()))?;
    Ok(watcher)
}

#[derive(Deserialize)]
struct NameQuery {
    name: String,
}

#[derive(Deserialize)]
struct ProductQuery {
    product: String,
}

#[derive(Deserialize)]
struct LayoutQuery {
    width: Option<f64>,
}

#[derive(Deserialize)]
struct ClickRequest {
    name: String,
}

#[derive(Serialize)]
struct TooltipResponse {
    name: String,
    /// Empty at category level
    text: String,
}

/// Route one request against the shared controller
pub fn route(
    method: &Method,
    url: &str,
    body: &str,
    controller: &SharedController<ViewerRenderer>,
    chart: &ChartConfig,
) -> (u16, String) {
    let (path, query) = url.split_once('?').unwrap_or((url, ""));
    let mut c = controller.lock().unwrap_or_else(PoisonError::into_inner);

    let result: Result<String, (u16, String)> = match (method, path) {
        (&Method::Get, "/api/layout") => match serde_urlencoded::from_str::<LayoutQuery>(query) {
            Ok(q) => json(&ApiResponse::success(style::layout(
                chart,
                q.width.unwrap_or(chart.max_width),
            ))),
            Err(e) => Err((400, format!("Invalid query: {}", e))),
        },

        (&Method::Get, "/api/view") => json(&ApiResponse::success(snapshot(&mut c))),

        (&Method::Post, "/api/event") => match parse_event(body) {
            Ok(msg) => {
                c.dispatch(msg);
                json(&ApiResponse::success(snapshot(&mut c)))
            }
            Err(e) => Err((400, format!("Invalid event: {}", e))),
        },

        (&Method::Post, "/api/click") => match serde_json::from_str::<ClickRequest>(body) {
            Ok(req) => {
                c.click(&req.name);
                json(&ApiResponse::success(snapshot(&mut c)))
            }
            Err(e) => Err((400, format!("Invalid JSON: {}", e))),
        },

        (&Method::Post, "/api/reset") => {
            c.reset();
            json(&ApiResponse::success(snapshot(&mut c)))
        }

        (&Method::Get, "/api/tooltip") => match serde_urlencoded::from_str::<NameQuery>(query) {
            Ok(q) => json(&ApiResponse::success(TooltipResponse {
                text: c.tooltip_text(&q.name),
                name: q.name,
            })),
            Err(e) => Err((400, format!("Invalid query: {}", e))),
        },

        (&Method::Get, "/api/compare") => match serde_urlencoded::from_str::<ProductQuery>(query) {
            Ok(q) => {
                c.compare(&q.product);
                match snapshot(&mut c).comparison {
                    Some(chart) => json(&ApiResponse::success(chart)),
                    None => Err((
                        404,
                        format!("No comparison for {} in the current view", q.product),
                    )),
                }
            }
            Err(e) => Err((400, format!("Invalid query: {}", e))),
        },

        _ => Err((404, "Not found".to_string())),
    };

    match result {
        Ok(body) => (200, body),
        Err((status, message)) => {
            let body = serde_json::to_string(&ApiResponse::<()>::failure(message))
                .unwrap_or_else(|_| r#"{"ok":false}"#.to_string());
            (status, body)
        }
    }
}

fn json<T: Serialize>(value: &T) -> Result<String, (u16, String)> {
    serde_json::to_string(value).map_err(|e| (500, e.to_string()))
}

fn handle_request(
    mut request: Request,
    controller: &SharedController<ViewerRenderer>,
    chart: &ChartConfig,
) -> std::io::Result<()> {
    let url = request.url().to_string();
    let method = request.method().clone();

    if method == Method::Get && (url == "/" || url.starts_with("/?")) {
        let response = Response::from_string(GRAPH_VIEWER_HTML).with_header(content_type("text/html"));
        return request.respond(response);
    }

    let mut body = String::new();
    if method == Method::Post {
        request.as_reader().read_to_string(&mut body)?;
    }

    let (status, json) = route(&method, &url, &body, controller, chart);
    let response = Response::from_string(json)
        .with_status_code(status)
        .with_header(content_type("application/json"));
    request.respond(response)
}

fn content_type(value: &'static str) -> Header {
    Header::from_bytes(&b"Content-Type"[..], value.as_bytes()).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::EmissionRecord;
    use serde_json::Value;

    fn shared() -> SharedController<ViewerRenderer> {
        let records = vec![
            EmissionRecord::new("Meat", "Beef", 30.0),
            EmissionRecord::new("Meat", "Lamb", 10.0),
            EmissionRecord::new("Fruit", "Apple", 2.0),
        ];
        Controller::new(records, ViewerRenderer::default()).into_shared()
    }

    fn call(c: &SharedController<ViewerRenderer>, method: Method, url: &str, body: &str) -> (u16, Value) {
        let (status, body) = route(&method, url, body, c, &ChartConfig::default());
        (status, serde_json::from_str(&body).unwrap())
    }

    // === ApiResponse Tests ===

    #[test]
    fn test_api_response_serializes_to_json() {
        let response: ApiResponse<String> = ApiResponse::success("test".to_string());
        let json = serde_json::to_string(&response).unwrap();

        assert!(json.contains("\"ok\":true"));
        assert!(json.contains("\"data\":\"test\""));
        assert!(json.contains("\"error\":null"));
    }

    // === Route Tests ===

    #[test]
    fn test_view_starts_at_categories() {
        let c = shared();
        let (status, v) = call(&c, Method::Get, "/api/view", "");
        assert_eq!(status, 200);
        assert_eq!(v["data"]["view"]["level"], "category");
        assert_eq!(v["data"]["clickable"], true);
        assert_eq!(v["data"]["nodes"].as_array().unwrap().len(), 5);
    }

    #[test]
    fn test_click_then_second_click_ignored() {
        let c = shared();
        let (_, v) = call(&c, Method::Post, "/api/click", r#"{"name":"Meat"}"#);
        assert_eq!(v["data"]["view"]["category"], "Meat");
        assert_eq!(v["data"]["clickable"], false);

        let (_, v) = call(&c, Method::Post, "/api/event", r#"{"type":"click","name":"Fruit"}"#);
        assert_eq!(v["data"]["view"]["category"], "Meat");
        assert_eq!(c.lock().unwrap().renderer().renders(), 2);
    }

    #[test]
    fn test_hover_returns_tooltip_once() {
        let c = shared();
        call(&c, Method::Post, "/api/click", r#"{"name":"Meat"}"#);
        let (_, v) = call(&c, Method::Post, "/api/event", r#"{"type":"mouseover","name":"Beef"}"#);
        assert!(v["data"]["tooltip"].as_str().unwrap().contains("69.28%"));

        let (_, v) = call(&c, Method::Get, "/api/view", "");
        assert!(v["data"]["tooltip"].is_null());
    }

    #[test]
    fn test_tooltip_endpoint() {
        let c = shared();
        let (_, v) = call(&c, Method::Get, "/api/tooltip?name=Meat", "");
        assert_eq!(v["data"]["text"], "");

        call(&c, Method::Post, "/api/click", r#"{"name":"Meat"}"#);
        let (_, v) = call(&c, Method::Get, "/api/tooltip?name=Lamb", "");
        assert!(v["data"]["text"].as_str().unwrap().starts_with("Lamb produces:"));
    }

    #[test]
    fn test_reset_restores_clickable() {
        let c = shared();
        call(&c, Method::Post, "/api/click", r#"{"name":"Fruit"}"#);
        let (_, v) = call(&c, Method::Post, "/api/reset", "");
        assert_eq!(v["data"]["view"]["level"], "category");
        assert_eq!(v["data"]["clickable"], true);
    }

    #[test]
    fn test_compare_endpoint_only_in_product_view() {
        let c = shared();
        let (status, v) = call(&c, Method::Get, "/api/compare?product=Apple", "");
        assert_eq!(status, 404);
        assert_eq!(v["ok"], false);

        call(&c, Method::Post, "/api/click", r#"{"name":"Fruit"}"#);
        let (status, v) = call(&c, Method::Get, "/api/compare?product=Apple", "");
        assert_eq!(status, 200);
        assert_eq!(v["data"]["product"], "Apple");

        // products of other categories stay out of reach
        let (status, _) = call(&c, Method::Get, "/api/compare?product=Beef", "");
        assert_eq!(status, 404);
        let (status, _) = call(&c, Method::Get, "/api/compare?product=Tofu", "");
        assert_eq!(status, 404);
    }

    #[test]
    fn test_layout_endpoint() {
        let c = shared();
        let (status, v) = call(&c, Method::Get, "/api/layout?width=400", "");
        assert_eq!(status, 200);
        assert_eq!(v["data"]["area"]["outer_width"], 400.0);
        assert_eq!(v["data"]["area"]["width"], 360.0);
        assert_eq!(v["data"]["legend"].as_array().unwrap().len(), 4);

        let (_, v) = call(&c, Method::Get, "/api/layout", "");
        assert_eq!(v["data"]["area"]["outer_width"], 520.0);

        let (status, _) = call(&c, Method::Get, "/api/layout?width=wide", "");
        assert_eq!(status, 400);
    }

    #[test]
    fn test_event_parse_errors() {
        let c = shared();
        let (status, v) = call(&c, Method::Post, "/api/event", r#"{"type":"click"}"#);
        assert_eq!(status, 400);
        assert!(v["error"].as_str().unwrap().starts_with("Invalid event"));

        let (status, _) = call(&c, Method::Post, "/api/event", r#"{"type":"dblclick"}"#);
        assert_eq!(status, 200);
    }

    #[test]
    fn test_watcher_filters_data_file_events() {
        use notify::event::{CreateKind, ModifyKind, RemoveKind};
        let data = Path::new("/tmp/foods/data.csv");
        let on = |kind, path: &str| Event::new(kind).add_path(PathBuf::from(path));

        assert!(touches_data_file(&on(EventKind::Modify(ModifyKind::Any), "/tmp/foods/data.csv"), data));
        // atomic save: temp file renamed over the original
        assert!(touches_data_file(&on(EventKind::Create(CreateKind::File), "/tmp/foods/data.csv"), data));
        assert!(!touches_data_file(&on(EventKind::Create(CreateKind::File), "/tmp/foods/other.csv"), data));
        assert!(!touches_data_file(&on(EventKind::Remove(RemoveKind::File), "/tmp/foods/data.csv"), data));
    }

    #[test]
    fn test_bad_requests() {
        let c = shared();
        let (status, _) = call(&c, Method::Post, "/api/click", "nope");
        assert_eq!(status, 400);
        let (status, _) = call(&c, Method::Get, "/api/tooltip", "");
        assert_eq!(status, 400);
        let (status, v) = call(&c, Method::Get, "/api/missing", "");
        assert_eq!(status, 404);
        assert_eq!(v["error"], "Not found");
    }

    #[test]
    fn test_viewer_html_is_valid() {
        assert!(GRAPH_VIEWER_HTML.contains("<!DOCTYPE html>"));
        assert!(GRAPH_VIEWER_HTML.contains("</html>"));
        assert!(GRAPH_VIEWER_HTML.contains("/api/event"));
    }
}
