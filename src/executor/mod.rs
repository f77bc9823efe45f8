//! The remote executor: receives gesture actions over HTTP and turns them into
//! host pointer commands.

pub mod pointer;

use std::net::SocketAddr;

use anyhow::{Context, Result, anyhow, bail};
use axum::{Json, Router, extract::State, http::StatusCode, routing::post};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::mpsc::UnboundedSender};

/// A host-level pointer instruction, decoded from one request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionCommand {
    MoveTo(i32, i32),
    Click,
    DoubleClick,
}

/// Body of `POST /gesture`
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct GestureRequest {
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct GestureResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TryFrom<&GestureRequest> for ActionCommand {
    type Error = anyhow::Error;

    fn try_from(request: &GestureRequest) -> Result<Self> {
        match request.action.as_str() {
            "cursor" => match (request.x, request.y) {
                (Some(x), Some(y)) if x.is_finite() && y.is_finite() => {
                    Ok(ActionCommand::MoveTo(x.round() as i32, y.round() as i32))
                }
                _ => bail!("cursor action needs finite x and y"),
            },
            "pinch" => Ok(ActionCommand::Click),
            "double-tap" => Ok(ActionCommand::DoubleClick),
            other => Err(anyhow!("unknown action \"{}\"", other)),
        }
    }
}

/// Hands decoded commands to the pointer worker without waiting for them to run
#[derive(Clone)]
pub struct Executor {
    commands: UnboundedSender<ActionCommand>,
    lenient: bool,
}

impl Executor {
    /// With `lenient`, requests that cannot be decoded are acknowledged and
    /// dropped instead of being rejected
    pub fn new(commands: UnboundedSender<ActionCommand>, lenient: bool) -> Self {
        Executor { commands, lenient }
    }

    pub fn execute(&self, command: ActionCommand) {
        if self.commands.send(command).is_err() {
            warn!("Pointer worker is gone; dropping {:?}", command);
        }
    }

    pub fn handle(&self, request: &GestureRequest) -> (StatusCode, GestureResponse) {
        match ActionCommand::try_from(request) {
            Ok(command) => {
                self.execute(command);
                (
                    StatusCode::OK,
                    GestureResponse {
                        ok: true,
                        error: None,
                    },
                )
            }
            Err(e) if self.lenient => {
                debug!("Ignoring request {:?}: {}", request, e);
                (
                    StatusCode::OK,
                    GestureResponse {
                        ok: true,
                        error: None,
                    },
                )
            }
            Err(e) => {
                warn!("Rejecting request {:?}: {}", request, e);
                (
                    StatusCode::BAD_REQUEST,
                    GestureResponse {
                        ok: false,
                        error: Some(e.to_string()),
                    },
                )
            }
        }
    }
}

async fn handle_gesture(
    State(executor): State<Executor>,
    Json(request): Json<GestureRequest>,
) -> (StatusCode, Json<GestureResponse>) {
    let (status, response) = executor.handle(&request);
    (status, Json(response))
}

pub fn router(executor: Executor) -> Router {
    Router::new()
        .route("/gesture", post(handle_gesture))
        .route("/api/gesture", post(handle_gesture))
        .with_state(executor)
}

pub async fn serve(executor: Executor, addr: SocketAddr) -> Result<()> {
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Executor listening on http://{}", addr);
    axum::serve(listener, router(executor))
        .await
        .context("Executor server stopped")
}
