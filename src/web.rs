use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use log::info;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use thiserror::Error;

use crate::collect::FormValues;
use crate::dispatch::{dispatch, Event, Generate, Generated, Sessions};
use crate::panels::{self, FieldSpec, PanelId};
use crate::params::ParameterRecord;
use crate::tabs::{Tab, TabEvent, TabView};

#[derive(Clone)]
pub struct AppState {
    sessions: Arc<Mutex<Sessions>>,
}

impl AppState {
    pub fn new(max_sessions: usize) -> Self {
        AppState {
            sessions: Arc::new(Mutex::new(Sessions::new(max_sessions))),
        }
    }

    fn with_sessions<T>(&self, f: impl FnOnce(&mut Sessions) -> T) -> Result<T, ApiError> {
        let mut sessions = self.sessions.lock().map_err(|_| ApiError::Poisoned)?;
        Ok(f(&mut sessions))
    }

    fn run<E: Event>(&self, session: &str, event: E) -> Result<E::Output, ApiError> {
        self.with_sessions(|sessions| {
            sessions
                .get_mut(session)
                .map(|s| dispatch(s, event))
                .ok_or_else(|| ApiError::UnknownSession(session.to_string()))
        })?
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("unknown session {0}")]
    UnknownSession(String),
    #[error("session registry unavailable")]
    Poisoned,
    #[error("{message}")]
    BadRequest { status: StatusCode, message: String },
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::UnknownSession(_) => StatusCode::NOT_FOUND,
            ApiError::Poisoned => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::BadRequest { status, .. } => status,
        };
        let body = ErrorBody {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[derive(Deserialize)]
pub struct TabRequest {
    session: String,
    tab: Tab,
}

#[derive(Deserialize)]
pub struct GenerateRequest {
    session: String,
    #[serde(default)]
    values: FormValues,
}

#[derive(Deserialize)]
pub struct SessionQuery {
    session: String,
}

#[derive(Serialize)]
pub struct FieldCatalog {
    fields: &'static [FieldSpec],
    batch_size_id: &'static str,
    batch_sizes: [u32; 6],
    default_batch_size: u32,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/tab", post(tab))
        .route("/api/generate", post(generate))
        .route("/api/parameters", get(parameters))
        .route("/api/fields", get(fields))
        .with_state(state)
}

const SESSION_SLOT: &str = "{{SESSION}}";

static PAGE: Lazy<String> = Lazy::new(|| {
    let view = TabView::for_tab(Tab::default());
    let tabs_html: String = [
        (Tab::Material, view.material_class),
        (Tab::Microscope, view.microscope_class),
    ]
    .iter()
    .map(|(t, class)| {
        format!(
            "<button id=\"{}\" class=\"{}\">{}</button>",
            t.button_id(),
            class,
            t.label()
        )
    })
    .collect();
    let panels_html: String = PanelId::ALL
        .iter()
        .map(|p| panels::render_panel(*p, view.is_visible(*p)))
        .collect();
    INDEX_HTML
        .replace("{{TABS}}", &tabs_html)
        .replace("{{PANELS}}", &panels_html)
        .replace("{{BATCH}}", &panels::render_batch_selector())
});

async fn index(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    let id = state.with_sessions(|s| s.open())?;
    Ok(Html(PAGE.replace(SESSION_SLOT, &id)))
}

async fn tab(
    State(state): State<AppState>,
    body: Result<Json<TabRequest>, JsonRejection>,
) -> Result<Json<TabView>, ApiError> {
    let Json(req) = body?;
    let view = state.run(&req.session, TabEvent::from(req.tab))?;
    Ok(Json(view))
}

async fn generate(
    State(state): State<AppState>,
    body: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<Generated>, ApiError> {
    let Json(req) = body?;
    let out = state.run(&req.session, Generate(req.values))?;
    Ok(Json(out))
}

async fn parameters(
    State(state): State<AppState>,
    Query(q): Query<SessionQuery>,
) -> Result<Json<Option<ParameterRecord>>, ApiError> {
    state.with_sessions(|sessions| {
        sessions
            .get(&q.session)
            .map(|s| Json(s.store.get().cloned()))
            .ok_or_else(|| ApiError::UnknownSession(q.session.clone()))
    })?
}

async fn fields() -> Json<FieldCatalog> {
    Json(FieldCatalog {
        fields: panels::FIELDS,
        batch_size_id: panels::BATCH_SIZE_ID,
        batch_sizes: panels::BATCH_SIZES,
        default_batch_size: panels::DEFAULT_BATCH_SIZE,
    })
}

pub async fn serve(addr: std::net::SocketAddr, state: AppState) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Serving on http://{addr}");
    axum::serve(listener, router(state)).await
}

const INDEX_HTML: &str = r##"<!doctype html>
<html lang="en">
  <head>
    <meta charset="utf-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1" />
    <title>MoS2 Image Synthesis</title>
    <style>
      html, body { margin: 0; padding: 0; background: #f4f6f9; color: #1f2630; font-family: "Segoe UI", sans-serif; }
      .navbar { background: #ffffff; box-shadow: 0 1px 4px rgba(0,0,0,0.08); padding: 16px; text-align: center; font-size: 18px; font-weight: 600; }
      .alert-container { margin: 12px 24px 0; }
      .alert { background: #fdecea; border: 1px solid #f5c2c0; color: #8a1f17; border-radius: 6px; padding: 8px 12px; font-size: 13px; }
      .section-container { display: flex; gap: 24px; padding: 24px; align-items: flex-start; }
      .tab-with-panel { flex: 2; }
      .side { flex: 1; background: #ffffff; border-radius: 10px; padding: 16px; box-shadow: 0 1px 4px rgba(0,0,0,0.08); }
      .tabs { display: flex; gap: 8px; margin-bottom: 12px; }
      .param-btn { background: #e8ecf1; border: 1px solid #cfd6de; border-radius: 6px; padding: 8px 16px; cursor: pointer; font-size: 13px; }
      .active-param-btn { background: #1a4f8b; border-color: #1a4f8b; color: #ffffff; }
      .panel { background: #ffffff; border-radius: 10px; padding: 16px; margin-bottom: 16px; box-shadow: 0 1px 4px rgba(0,0,0,0.08); }
      .section-title { margin: 0 0 4px; font-size: 15px; }
      .section-subtitle { margin: 0 0 12px; font-size: 12px; color: #6b7480; }
      .form-grid { display: flex; gap: 24px; }
      .form-col { flex: 1; display: flex; flex-direction: column; }
      .form-col label { font-size: 12px; color: #4a535e; margin-top: 8px; }
      .input-field, select { border: 1px solid #cfd6de; border-radius: 6px; padding: 6px 8px; font-size: 13px; margin-top: 4px; }
      button.primary { background: #1a4f8b; color: #ffffff; border: none; border-radius: 6px; padding: 10px 16px; font-size: 14px; cursor: pointer; width: 100%; margin-top: 12px; }
      button.secondary { background: #ffffff; color: #1a4f8b; border: 1px solid #1a4f8b; border-radius: 6px; padding: 8px 12px; font-size: 13px; cursor: pointer; width: 100%; margin-top: 8px; }
      button:disabled { opacity: 0.5; cursor: default; }
      #values h5 { margin: 12px 0 4px; font-size: 13px; }
      #values dl { display: grid; grid-template-columns: auto auto; gap: 2px 12px; margin: 0; font-size: 12px; }
      #values dt { color: #6b7480; }
      #values dd { margin: 0; text-align: right; }
      .hint { font-size: 12px; color: #6b7480; }
    </style>
  </head>
  <body>
    <div class="navbar">MoS2-Image-Synthesis-Analysis-Platform</div>
    <div id="validation-alert" class="alert-container"></div>
    <div class="section-container">
      <div class="tab-with-panel">
        <div class="tabs">{{TABS}}</div>
        {{PANELS}}
      </div>
      <div class="side">
        <h4 class="section-title">Generation Settings</h4>
        <p class="section-subtitle">Images generated per batch</p>
        <label for="batch-size-dropdown" class="hint">Batch Size</label>
        {{BATCH}}
        <button id="generate-btn" class="primary">Generate</button>
        <button id="download-btn" class="secondary" disabled>Download JSON</button>
        <div id="values"><p class="hint">No parameters stored yet.</p></div>
      </div>
    </div>
    <script>
      const session = "{{SESSION}}";
      const alertEl = document.getElementById("validation-alert");
      const valuesEl = document.getElementById("values");
      const downloadBtn = document.getElementById("download-btn");
      let stored = null;

      async function post(path, body) {
        const res = await fetch(path, {
          method: "POST",
          headers: { "Content-Type": "application/json" },
          body: JSON.stringify(body),
        });
        if (res.status === 404) {
          window.location.reload();
          return null;
        }
        const body = await res.json();
        if (!res.ok) {
          showAlert(body.error || `${path}: ${res.status}`);
          return null;
        }
        return body;
      }

      function applyView(view) {
        document.getElementById("btn-material").className = view.material_class;
        document.getElementById("btn-microscope").className = view.microscope_class;
        for (const [id, display] of Object.entries(view.panels)) {
          document.getElementById(id).style.display = display;
        }
      }

      function showAlert(text) {
        alertEl.innerHTML = "";
        if (!text) return;
        const div = document.createElement("div");
        div.className = "alert";
        div.textContent = text;
        alertEl.appendChild(div);
      }

      function title(key) {
        return key.split("_").map((w) => w.charAt(0).toUpperCase() + w.slice(1)).join(" ");
      }

      function showValues(record) {
        stored = record;
        downloadBtn.disabled = !record;
        valuesEl.innerHTML = "";
        if (!record) {
          valuesEl.innerHTML = '<p class="hint">No parameters stored yet.</p>';
          return;
        }
        for (const [section, body] of Object.entries(record)) {
          const h = document.createElement("h5");
          h.textContent = title(section);
          valuesEl.appendChild(h);
          const dl = document.createElement("dl");
          const entries = body !== null && typeof body === "object" ? Object.entries(body) : [["value", body]];
          for (const [key, value] of entries) {
            const dt = document.createElement("dt");
            dt.textContent = title(key);
            const dd = document.createElement("dd");
            dd.textContent = value === null ? "-" : String(value);
            dl.append(dt, dd);
          }
          valuesEl.appendChild(dl);
        }
      }

      function readValues() {
        const values = {};
        for (const el of document.querySelectorAll("input.input-field, select")) {
          if (el.value === "") {
            values[el.id] = null;
          } else if (el.type === "number") {
            const n = Number(el.value);
            values[el.id] = Number.isFinite(n) ? n : el.value;
          } else {
            values[el.id] = el.value;
          }
        }
        return values;
      }

      for (const tab of ["material", "microscope"]) {
        document.getElementById(`btn-${tab}`).addEventListener("click", async () => {
          const view = await post("/api/tab", { session, tab });
          if (view) applyView(view);
        });
      }

      document.getElementById("generate-btn").addEventListener("click", async () => {
        const out = await post("/api/generate", { session, values: readValues() });
        if (!out) return;
        showAlert(out.alert);
        showValues(out.record);
      });

      downloadBtn.addEventListener("click", () => {
        if (!stored) return;
        const blob = new Blob([JSON.stringify(stored, null, 2)], { type: "application/json" });
        const a = document.createElement("a");
        a.href = URL.createObjectURL(blob);
        a.download = "parameters.json";
        a.click();
        URL.revokeObjectURL(a.href);
      });

      fetch(`/api/parameters?session=${session}`)
        .then((res) => (res.ok ? res.json() : null))
        .then((record) => showValues(record))
        .catch(() => {});
    </script>
  </body>
</html>
"##;
