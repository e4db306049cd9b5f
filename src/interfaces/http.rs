//! HTTP and HTTPS sub-interfaces.
//!
//! # Responsibilities
//! - Parse the sub-interface settings fragment
//! - Bind a listener and serve the status router with Axum
//! - Wrap the listener in TLS for the HTTPS variant
//! - Stop gracefully on teardown
//!
//! # Design Decisions
//! - Bind errors surface at activation, so the sub-interface is marked Failed
//!   instead of failing later inside a background task
//! - Each transport owns a `watch` stop channel; stopping or dropping it ends the serve loop

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Weak;
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::Fragment;
use crate::interfaces::binding::SubInterfaceStatus;
use crate::interfaces::protocol::{
    ActivationError, ActivationRequest, ActiveTransport, Protocol, TransportError,
};
use crate::net::tls::load_tls_config;
use crate::registry::HostContext;
use crate::state::ServiceStats;

/// Path of the status endpoint served on every HTTP(S) sub-interface.
pub const STATUS_PATH: &str = "/_blackrock/status";

/// Settings accepted under `[interfaces.HTTP.<name>]` and `[interfaces.HTTPS.<name>]`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HttpSettings {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Request timeout in seconds.
    pub request_timeout_secs: u64,

    /// Time allowed for in-flight requests on stop, in seconds.
    pub drain_timeout_secs: u64,

    /// Path to certificate file (PEM). HTTPS only.
    pub cert_path: Option<PathBuf>,

    /// Path to private key file (PEM). HTTPS only.
    pub key_path: Option<PathBuf>,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            request_timeout_secs: 30,
            drain_timeout_secs: 5,
            cert_path: None,
            key_path: None,
        }
    }
}

impl HttpSettings {
    pub fn from_fragment(fragment: &Fragment) -> Result<Self, TransportError> {
        toml::Value::Table(fragment.clone())
            .try_into()
            .map_err(|e: toml::de::Error| TransportError::InvalidSettings(e.to_string()))
    }

    fn socket_addr(&self) -> Result<SocketAddr, TransportError> {
        self.bind_address.parse().map_err(|e| {
            TransportError::InvalidSettings(format!("bind_address {:?}: {}", self.bind_address, e))
        })
    }
}

/// HTTP protocol, optionally over TLS.
#[derive(Debug, Clone, Copy)]
pub struct HttpProtocol {
    tls: bool,
}

impl HttpProtocol {
    pub fn plain() -> Self {
        Self { tls: false }
    }

    pub fn tls() -> Self {
        Self { tls: true }
    }
}

#[async_trait]
impl Protocol for HttpProtocol {
    fn name(&self) -> &str {
        if self.tls {
            "HTTPS"
        } else {
            "HTTP"
        }
    }

    async fn activate(
        &self,
        request: ActivationRequest,
    ) -> Result<Box<dyn ActiveTransport>, ActivationError> {
        let settings = HttpSettings::from_fragment(&request.settings)?;
        let addr = settings.socket_addr()?;
        let app = status_router(
            StatusState {
                host: request.host.clone(),
                interface: request.interface.clone(),
            },
            Duration::from_secs(settings.request_timeout_secs),
        );

        let transport = if self.tls {
            serve_tls(addr, &settings, app).await?
        } else {
            serve_plain(addr, app).await?
        };

        tracing::info!(
            interface = %request.interface,
            address = %transport.local_addr,
            tls = self.tls,
            routers = ?request.routers,
            "HTTP sub-interface listening"
        );
        Ok(Box::new(transport))
    }
}

async fn serve_plain(addr: SocketAddr, app: Router) -> Result<HttpTransport, TransportError> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| TransportError::Bind {
            address: addr.to_string(),
            source,
        })?;
    let local_addr = listener.local_addr().map_err(|source| TransportError::Bind {
        address: addr.to_string(),
        source,
    })?;

    let (shutdown, mut signal) = watch::channel(false);
    let task = tokio::spawn(async move {
        axum::serve(listener, app.into_make_service())
            .with_graceful_shutdown(async move {
                let _ = signal.wait_for(|stop| *stop).await;
            })
            .await
    });

    Ok(HttpTransport {
        local_addr,
        shutdown,
        task,
    })
}

async fn serve_tls(
    addr: SocketAddr,
    settings: &HttpSettings,
    app: Router,
) -> Result<HttpTransport, TransportError> {
    let (cert_path, key_path) = match (&settings.cert_path, &settings.key_path) {
        (Some(cert), Some(key)) => (cert, key),
        _ => {
            return Err(TransportError::InvalidSettings(
                "HTTPS requires cert_path and key_path".to_string(),
            ))
        }
    };
    let tls_config = load_tls_config(cert_path, key_path).await?;

    let bind_err = |source| TransportError::Bind {
        address: addr.to_string(),
        source,
    };
    let listener = std::net::TcpListener::bind(addr).map_err(bind_err)?;
    listener.set_nonblocking(true).map_err(bind_err)?;
    let local_addr = listener.local_addr().map_err(bind_err)?;

    let handle = axum_server::Handle::new();
    let server = axum_server::from_tcp_rustls(listener, tls_config)
        .handle(handle.clone())
        .serve(app.into_make_service());

    let (shutdown, mut signal) = watch::channel(false);
    let drain = Duration::from_secs(settings.drain_timeout_secs);
    tokio::spawn(async move {
        let _ = signal.wait_for(|stop| *stop).await;
        handle.graceful_shutdown(Some(drain));
    });
    let task = tokio::spawn(server);

    Ok(HttpTransport {
        local_addr,
        shutdown,
        task,
    })
}

/// A running HTTP(S) listener.
#[derive(Debug)]
pub struct HttpTransport {
    local_addr: SocketAddr,
    /// Flipped to `true` to stop the serve loop; dropping it stops it too.
    shutdown: watch::Sender<bool>,
    task: JoinHandle<std::io::Result<()>>,
}

#[async_trait]
impl ActiveTransport for HttpTransport {
    fn local_addr(&self) -> Option<SocketAddr> {
        Some(self.local_addr)
    }

    async fn stop(self: Box<Self>) -> Result<(), TransportError> {
        self.shutdown.send_replace(true);
        match self.task.await {
            Ok(Ok(())) => {
                tracing::info!(address = %self.local_addr, "HTTP sub-interface stopped");
                Ok(())
            }
            Ok(Err(e)) => Err(TransportError::Task(e.to_string())),
            Err(e) => Err(TransportError::Task(e.to_string())),
        }
    }
}

#[derive(Clone)]
struct StatusState {
    host: Weak<HostContext>,
    interface: String,
}

/// Body of `GET /_blackrock/status`.
#[derive(Debug, Serialize)]
pub struct StatusReport {
    pub host: String,
    pub served_by: String,
    pub interfaces: Vec<SubInterfaceStatus>,
    pub services: Vec<String>,
    pub service_stats: ServiceStats,
}

#[allow(deprecated)]
fn status_router(state: StatusState, request_timeout: Duration) -> Router {
    Router::new()
        .route(STATUS_PATH, get(status_handler))
        .with_state(state)
        .layer(TimeoutLayer::new(request_timeout))
        .layer(TraceLayer::new_for_http())
}

async fn status_handler(State(state): State<StatusState>) -> Response {
    let Some(host) = state.host.upgrade() else {
        return (StatusCode::SERVICE_UNAVAILABLE, "Host is shutting down").into_response();
    };

    Json(StatusReport {
        host: host.name().to_string(),
        served_by: state.interface,
        interfaces: host.interface_statuses(),
        services: host.service_list(),
        service_stats: host.service_stats(),
    })
    .into_response()
}
