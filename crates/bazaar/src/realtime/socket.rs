//! Websocket endpoints for live chat and per-user notifications.

use axum::extract::ws::{CloseFrame, Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use futures::stream::SplitSink;
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::broadcast::Receiver;
use tracing::{debug, warn};

use super::channels::{chat_group, user_group};
use super::event::{ClientFrame, Event, NotificationFrame};
use super::{CLOSE_NOT_FOUND, CLOSE_UNAUTHORIZED};
use crate::accounts::User;
use crate::conversations::{ConversationError, ConversationId};
use crate::state::Marketplace;

type SocketSink = SplitSink<WebSocket, Message>;

pub fn realtime_router() -> Router<Marketplace> {
    Router::new()
        .route("/ws/conversations/{conversation_id}", get(chat_socket))
        .route("/ws/notifications", get(notification_socket))
}

/// Websocket clients authenticate with `?token=`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SocketAuth {
    #[serde(default)]
    pub token: Option<String>,
}

impl SocketAuth {
    fn user(&self, market: &Marketplace) -> Option<User> {
        let token = self.token.as_deref()?;
        market.accounts.authenticate(token).ok()
    }
}

async fn chat_socket(
    ws: WebSocketUpgrade,
    State(market): State<Marketplace>,
    Path(conversation_id): Path<u64>,
    Query(auth): Query<SocketAuth>,
) -> Response {
    ws.on_upgrade(move |socket| {
        chat_session(socket, market, ConversationId(conversation_id), auth)
    })
}

async fn notification_socket(
    ws: WebSocketUpgrade,
    State(market): State<Marketplace>,
    Query(auth): Query<SocketAuth>,
) -> Response {
    ws.on_upgrade(move |socket| notification_session(socket, market, auth))
}

/// Decide whether a chat socket may join: unknown conversations close with 4002, anything
/// else unauthorized with 4001.
pub fn admit_chat(
    market: &Marketplace,
    auth: &SocketAuth,
    id: ConversationId,
) -> Result<User, (u16, &'static str)> {
    let conversation = match market.conversations.get(id) {
        Ok(conversation) => conversation,
        Err(ConversationError::NotFound) => return Err((CLOSE_NOT_FOUND, "conversation not found")),
        Err(_) => return Err((CLOSE_UNAUTHORIZED, "conversation unavailable")),
    };
    let user = auth
        .user(market)
        .ok_or((CLOSE_UNAUTHORIZED, "authentication required"))?;
    if conversation.is_member(user.id) {
        Ok(user)
    } else {
        Err((CLOSE_UNAUTHORIZED, "not a member of this conversation"))
    }
}

/// Handle one text frame from a chat socket. Successful posts reach the sender through the
/// group broadcast, so only failures produce a direct reply.
pub fn handle_chat_frame(
    market: &Marketplace,
    user: &User,
    id: ConversationId,
    text: &str,
) -> Option<Event> {
    let content = match ClientFrame::parse(text) {
        Ok(content) => content,
        Err(event) => return Some(event),
    };
    match market.conversations.post(user, id, &content) {
        Ok(_) => None,
        Err(err) => Some(Event::error(err.to_string())),
    }
}

/// Handle one text frame from a notification socket, replying with the fresh unread total.
pub fn handle_notification_frame(market: &Marketplace, user: &User, text: &str) -> Event {
    let NotificationFrame::MarkRead { conversation_id } = match NotificationFrame::parse(text) {
        Ok(frame) => frame,
        Err(event) => return event,
    };
    if let Err(err) = market.conversations.mark_read(user, conversation_id) {
        return Event::error(err.to_string());
    }
    unread_total(market, user)
}

fn unread_total(market: &Marketplace, user: &User) -> Event {
    match market.conversations.unread_summary(user) {
        Ok(summary) => Event::UnreadCount {
            count: summary.total_unread,
        },
        Err(err) => Event::error(err.to_string()),
    }
}

async fn chat_session(socket: WebSocket, market: Marketplace, id: ConversationId, auth: SocketAuth) {
    let (mut sink, mut stream) = socket.split();
    let user = match admit_chat(&market, &auth, id) {
        Ok(user) => user,
        Err((code, reason)) => {
            debug!(conversation = %id, code, reason, "chat socket rejected");
            close(&mut sink, code, reason).await;
            return;
        }
    };

    let mut events = market.channels.subscribe(&chat_group(id));
    debug!(conversation = %id, user_id = %user.id, "chat socket joined");

    loop {
        tokio::select! {
            incoming = stream.next() => match incoming {
                Some(Ok(Message::Text(text))) => {
                    if let Some(reply) = handle_chat_frame(&market, &user, id, text.as_str()) {
                        if !deliver(&mut sink, &reply).await {
                            break;
                        }
                    }
                }
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(err)) => {
                    warn!(conversation = %id, error = %err, "chat socket receive failed");
                    break;
                }
            },
            event = next_event(&mut events) => match event {
                Some(event) => {
                    if !deliver(&mut sink, &event).await {
                        break;
                    }
                }
                None => break,
            },
        }
    }
    debug!(conversation = %id, user_id = %user.id, "chat socket left");
}

async fn notification_session(socket: WebSocket, market: Marketplace, auth: SocketAuth) {
    let (mut sink, mut stream) = socket.split();
    let Some(user) = auth.user(&market) else {
        close(&mut sink, CLOSE_UNAUTHORIZED, "authentication required").await;
        return;
    };

    let mut events = market.channels.subscribe(&user_group(user.id));
    if !deliver(&mut sink, &unread_total(&market, &user)).await {
        return;
    }

    loop {
        tokio::select! {
            incoming = stream.next() => match incoming {
                Some(Ok(Message::Text(text))) => {
                    let reply = handle_notification_frame(&market, &user, text.as_str());
                    if !deliver(&mut sink, &reply).await {
                        break;
                    }
                }
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(err)) => {
                    warn!(user_id = %user.id, error = %err, "notification socket receive failed");
                    break;
                }
            },
            event = next_event(&mut events) => match event {
                Some(event) => {
                    if !deliver(&mut sink, &event).await {
                        break;
                    }
                }
                None => break,
            },
        }
    }
}

/// Next broadcast event, skipping over lag; `None` once the group is gone.
async fn next_event(events: &mut Receiver<Event>) -> Option<Event> {
    loop {
        match events.recv().await {
            Ok(event) => return Some(event),
            Err(RecvError::Lagged(skipped)) => {
                warn!(skipped, "socket fell behind its group");
            }
            Err(RecvError::Closed) => return None,
        }
    }
}

async fn deliver(sink: &mut SocketSink, event: &Event) -> bool {
    match sink.send(Message::Text(event.to_json().into())).await {
        Ok(()) => true,
        Err(err) => {
            warn!(error = %err, "websocket send failed");
            false
        }
    }
}

async fn close(sink: &mut SocketSink, code: u16, reason: &'static str) {
    let frame = CloseFrame {
        code,
        reason: reason.into(),
    };
    if let Err(err) = sink.send(Message::Close(Some(frame))).await {
        warn!(code, error = %err, "websocket close failed");
    }
}
