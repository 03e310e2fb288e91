use super::common::*;
use crate::conversations::ConversationId;
use crate::realtime::socket::{
    admit_chat, handle_chat_frame, handle_notification_frame, SocketAuth,
};
use crate::realtime::{chat_group, Event, CLOSE_NOT_FOUND, CLOSE_UNAUTHORIZED};

fn auth(token: &str) -> SocketAuth {
    SocketAuth {
        token: Some(token.to_string()),
    }
}

#[test]
fn unknown_conversation_closes_before_authentication() {
    let market = market();
    let rejected = admit_chat(&market, &SocketAuth::default(), ConversationId(77));
    assert_eq!(rejected.map(|user| user.id), Err((CLOSE_NOT_FOUND, "conversation not found")));
}

#[test]
fn chat_admission_requires_a_member_token() {
    let market = market();
    let parties = parties(&market);
    let (_, stranger_token) = member(&market, "lurker", "+254777000555");
    let (conversation, _) = market
        .conversations
        .start(&parties.buyer, parties.listing.reference(), "Ping")
        .expect("start");

    match admit_chat(&market, &SocketAuth::default(), conversation.id) {
        Err((code, _)) => assert_eq!(code, CLOSE_UNAUTHORIZED),
        Ok(user) => panic!("anonymous socket admitted as {}", user.username),
    }
    match admit_chat(&market, &auth(stranger_token.as_str()), conversation.id) {
        Err((code, reason)) => {
            assert_eq!(code, CLOSE_UNAUTHORIZED);
            assert_eq!(reason, "not a member of this conversation");
        }
        Ok(user) => panic!("stranger admitted as {}", user.username),
    }

    let admitted = admit_chat(&market, &auth(parties.owner_token.as_str()), conversation.id)
        .expect("owner admitted");
    assert_eq!(admitted.id, parties.owner.id);
}

#[test]
fn chat_frames_post_or_report_errors() {
    let market = market();
    let parties = parties(&market);
    let (conversation, _) = market
        .conversations
        .start(&parties.buyer, parties.listing.reference(), "Ping")
        .expect("start");
    let mut room = market.channels.subscribe(&chat_group(conversation.id));

    assert_eq!(
        handle_chat_frame(&market, &parties.owner, conversation.id, "not json"),
        Some(Event::error("Invalid JSON format"))
    );
    assert_eq!(
        handle_chat_frame(&market, &parties.owner, conversation.id, r#"{"message": " "}"#),
        Some(Event::error("Missing required fields"))
    );
    assert_eq!(
        handle_chat_frame(&market, &parties.owner, conversation.id, r#"{"message": "Pong"}"#),
        None
    );

    match room.try_recv().expect("broadcast chat") {
        Event::Chat { message, sender, .. } => {
            assert_eq!(message, "Pong");
            assert_eq!(sender, "owner");
        }
        other => panic!("expected chat event, got {other:?}"),
    }
}

#[test]
fn notification_frames_mark_read_and_report_total() {
    let market = market();
    let parties = parties(&market);
    let (conversation, _) = market
        .conversations
        .start(&parties.buyer, parties.listing.reference(), "Ping")
        .expect("start");

    let frame = format!(r#"{{"type": "mark_read", "conversation_id": {}}}"#, conversation.id);
    assert_eq!(
        handle_notification_frame(&market, &parties.owner, &frame),
        Event::UnreadCount { count: 0 }
    );
    assert_eq!(
        handle_notification_frame(&market, &parties.owner, r#"{"type": "subscribe"}"#),
        Event::error("Invalid JSON format")
    );

    let foreign = r#"{"type": "mark_read", "conversation_id": 404}"#;
    assert_eq!(
        handle_notification_frame(&market, &parties.owner, foreign),
        Event::error("conversation not found")
    );
}
