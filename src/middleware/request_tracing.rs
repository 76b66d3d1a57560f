use std::{net::SocketAddr, time::Instant};

use axum::{
    extract::ConnectInfo,
    http::{HeaderValue, Request},
    middleware::Next,
    response::IntoResponse,
};
use log::{info, warn};

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Per request data handlers pick up through `Extension`.
#[derive(Clone)]
pub struct RequestTraceData {
    id: String,
}

impl RequestTraceData {
    pub fn get_id(&self) -> String {
        return self.id.clone();
    }
}

fn get_remote_ip_addr<T>(req: &Request<T>) -> String {
    let connect_info = req.extensions().get::<ConnectInfo<SocketAddr>>().copied();

    match connect_info {
        Some(socket_addr) => socket_addr.ip().to_string(),
        None => String::from("unknown"),
    }
}

fn get_header_or<T>(req: &Request<T>, key: &str) -> String {
    req.headers()
        .get(key)
        .and_then(|header| header.to_str().ok())
        .unwrap_or("not-set")
        .to_string()
}

pub async fn request_tracing<T>(mut req: Request<T>, next: Next<T>) -> impl IntoResponse {
    let request_id = nanoid::nanoid!(10);
    let started = Instant::now();
    let method = req.method().clone();
    let uri = req.uri().to_string();

    info!(
        "[{}] {} '{}' {} {}",
        request_id,
        get_remote_ip_addr(&req),
        get_header_or(&req, "user-agent"),
        method,
        uri,
    );

    req.extensions_mut().insert(RequestTraceData {
        id: request_id.clone(),
    });
    let mut response = next.run(req).await;

    info!(
        "[{}] {} {} -> {} in {}ms",
        request_id,
        method,
        uri,
        response.status().as_u16(),
        started.elapsed().as_millis()
    );

    match HeaderValue::from_str(&request_id) {
        Ok(value) => {
            response.headers_mut().insert(REQUEST_ID_HEADER, value);
        }
        Err(e) => warn!("[{}] request id is not a valid header: {}", request_id, e),
    }

    response
}
