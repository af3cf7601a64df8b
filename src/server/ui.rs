//! UI route handlers.
//!
//! The conversation page is a single static document compiled into the
//! binary; it talks to `/api/chat` only.

use axum::response::Html;

const INDEX_HTML: &str = include_str!("../../assets/index.html");

/// GET /: conversation page.
pub(super) async fn root() -> Html<&'static str> {
    Html(INDEX_HTML)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_posts_to_chat_endpoint() {
        assert!(INDEX_HTML.contains(r#"const API_URL = "/api/chat";"#));
        assert!(INDEX_HTML.contains(r#"body.append("messages""#));
    }

    #[test]
    fn page_guards_against_double_submit() {
        assert!(INDEX_HTML.contains("if (sending) return;"));
    }
}
