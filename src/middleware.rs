/* src/middleware.rs */

use std::convert::Infallible;
use std::net::SocketAddr;
use std::task::{Context, Poll};

use axum::extract::{ConnectInfo, FromRequestParts, Request};
use axum::http::request::Parts;
use axum::http::{Extensions, HeaderMap};
use axum::response::Response;
use futures_util::future::BoxFuture;
use tower::{Layer, Service};

use crate::context::RequestContext;
use crate::extractor::extract_client_ip;

pub const TRACING_TARGET_MIDDLEWARE: &str = "myip::middleware";

/// Layer that attaches a [`RequestContext`] to every request.
///
/// The context is built from the request headers and the
/// `ConnectInfo<SocketAddr>` extension, so the router should be served with
/// `into_make_service_with_connect_info::<SocketAddr>()`.
///
/// # Examples
///
/// ```rust,no_run
/// use axum::{Router, routing::get};
/// use myip::{ClientContextLayer, RequestContext, find_ipv4};
///
/// async fn handler(ctx: RequestContext) -> String {
///     find_ipv4(&ctx)
/// }
///
/// let app: Router = Router::new()
///     .route("/", get(handler))
///     .layer(ClientContextLayer::new());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ClientContextLayer;

impl ClientContextLayer {
    pub fn new() -> Self {
        Self
    }
}

impl<S> Layer<S> for ClientContextLayer {
    type Service = ClientContextService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        ClientContextService { inner }
    }
}

/// Service produced by [`ClientContextLayer`].
#[derive(Debug, Clone)]
pub struct ClientContextService<S> {
    inner: S,
}

impl<S> Service<Request> for ClientContextService<S>
where
    S: Service<Request, Response = Response> + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request) -> Self::Future {
        let ctx = context_from_parts(req.headers(), req.extensions());

        if tracing::enabled!(target: TRACING_TARGET_MIDDLEWARE, tracing::Level::DEBUG) {
            let (client_ip, detected_via) = extract_client_ip(&ctx);
            tracing::debug!(
                target: TRACING_TARGET_MIDDLEWARE,
                client_ip = %client_ip,
                detected_via,
                peer_addr = ctx.peer_addr(),
                "resolved client address"
            );
        }

        req.extensions_mut().insert(ctx);

        let future = self.inner.call(req);
        Box::pin(future)
    }
}

/// Peer address as reported by the connection, `ip:port` or `[ipv6]:port`.
///
/// Empty when the server was not started with connect info.
fn peer_addr(extensions: &Extensions) -> String {
    extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.to_string())
        .unwrap_or_default()
}

fn context_from_parts(headers: &HeaderMap, extensions: &Extensions) -> RequestContext {
    RequestContext::from_http(headers, peer_addr(extensions))
}

/// Axum extractor for the request context.
///
/// Uses the context stored by [`ClientContextLayer`] when present and builds
/// one from the request otherwise.
impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(ctx) = parts.extensions.get::<RequestContext>() {
            return Ok(ctx.clone());
        }

        Ok(context_from_parts(&parts.headers, &parts.extensions))
    }
}
