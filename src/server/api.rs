//! Axum handlers for `/api/*` routes.
//!
//! `POST /api/chat` never returns an error status for bad client input or
//! provider trouble: the body is always a [`ChatReply`] with HTTP 200.
//! The `messages` field is read from a multipart or urlencoded form; any
//! other body counts as an empty conversation.

use axum::{
    Form, Json,
    extract::{FromRequest, Multipart, Request, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;
use tracing::{Instrument, debug, info_span, warn};
use uuid::Uuid;

use crate::chat::ChatReply;

use super::AppState;

/// Form fields of a chat request. Attachments are only counted.
#[derive(Debug, Default)]
struct ChatForm {
    messages: Option<String>,
    files: usize,
    file_bytes: usize,
}

/// Fields of an `application/x-www-form-urlencoded` chat request.
#[derive(Debug, Deserialize)]
struct UrlencodedChat {
    messages: Option<String>,
}

fn is_urlencoded(req: &Request) -> bool {
    req.headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .is_some_and(|mime| mime.trim().eq_ignore_ascii_case("application/x-www-form-urlencoded"))
}

/// Read the chat form from whichever encoding the client used.
async fn extract_form(req: Request, state: &AppState) -> ChatForm {
    if is_urlencoded(&req) {
        return match Form::<UrlencodedChat>::from_request(req, state).await {
            Ok(Form(fields)) => ChatForm { messages: fields.messages, ..ChatForm::default() },
            Err(rejection) => {
                warn!(%rejection, "unreadable urlencoded chat form; treating as empty conversation");
                ChatForm::default()
            }
        };
    }

    match Multipart::from_request(req, state).await {
        Ok(multipart) => read_form(multipart).await,
        Err(rejection) => {
            warn!(%rejection, "chat request is not a form; treating as empty conversation");
            ChatForm::default()
        }
    }
}

/// Drain the multipart body. A stream error stops reading; whatever was
/// collected up to that point is used.
async fn read_form(mut multipart: Multipart) -> ChatForm {
    let mut form = ChatForm::default();
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                warn!(error = %e, "multipart stream error; using fields read so far");
                break;
            }
        };

        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("messages") => match field.text().await {
                Ok(text) => {
                    // First occurrence wins, as with a regular form lookup.
                    if form.messages.is_none() {
                        form.messages = Some(text);
                    }
                }
                Err(e) => warn!(error = %e, "unreadable messages field; treating as empty"),
            },
            Some("files") => match field.bytes().await {
                Ok(bytes) => {
                    form.files += 1;
                    form.file_bytes += bytes.len();
                }
                Err(e) => {
                    warn!(error = %e, "failed to read attachment");
                    break;
                }
            },
            other => debug!(field = ?other, "ignoring unknown form field"),
        }
    }
    form
}

/// POST /api/chat
pub(super) async fn chat(State(state): State<AppState>, req: Request) -> Json<ChatReply> {
    let request_id = Uuid::new_v4();
    let span = info_span!("chat", %request_id);

    async move {
        let form = extract_form(req, &state).await;

        if form.files > 0 {
            // Accepted for forward compatibility; never sent to the provider.
            debug!(files = form.files, bytes = form.file_bytes, "attachments received and discarded");
        }

        Json(state.chat.answer_raw(form.messages.as_deref()).await)
    }
    .instrument(span)
    .await
}

/// GET /api/health
pub(super) async fn health(State(state): State<AppState>) -> Response {
    let provider = state.chat.provider();
    let body = json!({
        "status": "ok",
        "name": &*state.name,
        "provider": provider.name(),
        "model": provider.model(),
    });
    (StatusCode::OK, Json(body)).into_response()
}
