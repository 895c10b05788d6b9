use axum::response::Html;

pub async fn serve_docs() -> Html<&'static str> {
    Html(include_str!("../static/docs.html"))
}
