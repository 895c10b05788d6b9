use axum::{ extract::Request, middleware::Next };

pub async fn log_request_middleware(request: Request, next: Next) -> axum::response::Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    tracing::info!(%method, %uri, "incoming request");
    let response = next.run(request).await;
    tracing::info!(%method, %uri, status = %response.status(), "response sent");
    response
}
