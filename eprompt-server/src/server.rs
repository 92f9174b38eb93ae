//! Listener lifecycle.

use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use hyper::Server;
use hyper::service::{make_service_fn, service_fn};
use tracing::{info, warn};

use crate::error::{ServerError, ServerResult};
use crate::routes::handle;
use crate::state::AppState;

/// Resolves `host:port` to the first matching socket address.
///
/// # Errors
///
/// Returns [`ServerError::Resolve`] when the lookup fails or yields nothing.
pub async fn resolve_addr(host: &str, port: u16) -> ServerResult<SocketAddr> {
    let address = format!("{host}:{port}");
    let first = tokio::net::lookup_host(address.clone())
        .await
        .map_err(|source| ServerError::Resolve {
            address: address.clone(),
            source,
        })?
        .next();
    first.ok_or_else(|| ServerError::Resolve {
        source: std::io::Error::new(std::io::ErrorKind::NotFound, "no addresses found"),
        address,
    })
}

/// Serves requests on `addr` until `shutdown` completes.
///
/// In-flight requests are drained before the future resolves.
///
/// # Errors
///
/// Returns [`ServerError::Bind`] when the listener cannot be opened and
/// [`ServerError::Serve`] when the accept loop fails.
pub async fn serve<F>(state: Arc<AppState>, addr: SocketAddr, shutdown: F) -> ServerResult<()>
where
    F: Future<Output = ()>,
{
    let builder = Server::try_bind(&addr).map_err(|source| ServerError::Bind {
        address: addr.to_string(),
        source,
    })?;

    let make_service = make_service_fn(move |_conn| {
        let state = Arc::clone(&state);
        async move {
            Ok::<_, Infallible>(service_fn(move |request| {
                let state = Arc::clone(&state);
                async move { Ok::<_, Infallible>(handle(state, request).await) }
            }))
        }
    });

    let server = builder.serve(make_service);
    info!(address = %server.local_addr(), "listening");

    server
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(ServerError::Serve)
}

/// Completes on Ctrl-C, or SIGTERM on Unix.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                warn!(error = %err, "failed to register SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("received SIGINT, shutting down"),
        () = terminate => info!("received SIGTERM, shutting down"),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use eprompt_adapters::EchoAdapter;
    use eprompt_config::Settings;
    use hyper::{Client, StatusCode};
    use tokio::sync::oneshot;

    use super::*;

    #[tokio::test]
    async fn resolves_loopback() {
        let addr = resolve_addr("127.0.0.1", 8001).await.expect("addr");
        assert_eq!(addr.port(), 8001);
        assert!(addr.ip().is_loopback());
    }

    #[tokio::test]
    async fn unresolvable_host_names_the_address() {
        let err = resolve_addr("no such host.invalid", 8001)
            .await
            .expect_err("invalid host");
        match err {
            ServerError::Resolve { address, .. } => {
                assert_eq!(address, "no such host.invalid:8001");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn serves_until_shutdown() {
        let probe = std::net::TcpListener::bind("127.0.0.1:0").expect("probe");
        let addr = probe.local_addr().expect("local addr");
        drop(probe);

        let state = Arc::new(AppState::new(Settings::default(), Arc::new(EchoAdapter::new())));
        let (stop_tx, stop_rx) = oneshot::channel::<()>();
        let server = tokio::spawn(serve(state, addr, async {
            let _ = stop_rx.await;
        }));

        let client = Client::new();
        let uri: hyper::Uri = format!("http://{addr}/health").parse().expect("uri");
        let mut response = None;
        for _ in 0..50 {
            if let Ok(ok) = client.get(uri.clone()).await {
                response = Some(ok);
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        let response = response.expect("server answered");
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
        let _ = hyper::body::to_bytes(response.into_body()).await;

        stop_tx.send(()).expect("stop");
        server.await.expect("join").expect("clean shutdown");
    }
}
