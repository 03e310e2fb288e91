use super::common::*;
use crate::conversations::{ConversationError, ConversationId};
use crate::realtime::{chat_group, user_group, Event};

#[test]
fn start_opens_one_conversation_per_buyer_and_listing() {
    let market = market();
    let Parties {
        owner,
        buyer,
        listing,
        ..
    } = parties(&market);

    let (conversation, created) = market
        .conversations
        .start(&buyer, listing.reference(), "Is it still available?")
        .expect("start");
    assert!(created);
    assert_eq!(conversation.buyer, buyer.id);
    assert_eq!(conversation.owner, owner.id);

    let (again, created_again) = market
        .conversations
        .start(&buyer, listing.reference(), "Hello again")
        .expect("restart");
    assert!(!created_again);
    assert_eq!(again.id, conversation.id);

    let detail = market
        .conversations
        .detail(&buyer, conversation.id)
        .expect("detail");
    assert_eq!(detail.messages.len(), 1);
    assert_eq!(detail.messages[0].content, "Is it still available?");
    assert_eq!(detail.counterpart.username, "owner");
}

#[test]
fn concurrent_starts_share_one_conversation() {
    let market = market();
    let Parties { buyer, listing, .. } = parties(&market);

    let started: Vec<(ConversationId, bool)> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                scope.spawn(|| {
                    let (conversation, created) = market
                        .conversations
                        .start(&buyer, listing.reference(), "Still available?")
                        .expect("start");
                    (conversation.id, created)
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().expect("thread finishes"))
            .collect()
    });

    assert_eq!(started.iter().filter(|(_, created)| *created).count(), 1);
    assert!(started.iter().all(|(id, _)| *id == started[0].0));
    assert_eq!(market.conversations.inbox(&buyer).expect("inbox").len(), 1);
    let detail = market
        .conversations
        .detail(&buyer, started[0].0)
        .expect("detail");
    assert_eq!(detail.messages.len(), 1);
}

#[test]
fn start_rejects_own_listing_and_empty_content() {
    let market = market();
    let Parties {
        owner,
        buyer,
        listing,
        ..
    } = parties(&market);

    assert!(matches!(
        market
            .conversations
            .start(&owner, listing.reference(), "Talking to myself"),
        Err(ConversationError::CannotMessageSelf)
    ));
    assert!(matches!(
        market.conversations.start(&buyer, listing.reference(), "   "),
        Err(ConversationError::EmptyMessage)
    ));
    assert_eq!(market.conversations.count().expect("count"), 0);
}

#[test]
fn only_members_can_read_or_post() {
    let market = market();
    let Parties { buyer, listing, .. } = parties(&market);
    let (stranger, _) = member(&market, "stranger", "+254777000333");
    let (conversation, _) = market
        .conversations
        .start(&buyer, listing.reference(), "Interested")
        .expect("start");

    assert!(matches!(
        market.conversations.post(&stranger, conversation.id, "Me too"),
        Err(ConversationError::NotMember)
    ));
    assert!(matches!(
        market.conversations.detail(&stranger, conversation.id),
        Err(ConversationError::NotMember)
    ));
    assert!(matches!(
        market.conversations.post(&buyer, ConversationId(999), "Hello?"),
        Err(ConversationError::NotFound)
    ));
}

#[test]
fn posting_updates_unread_counts_and_broadcasts() {
    let market = market();
    let Parties {
        owner,
        buyer,
        listing,
        ..
    } = parties(&market);
    let mut owner_events = market.channels.subscribe(&user_group(owner.id));

    let (conversation, _) = market
        .conversations
        .start(&buyer, listing.reference(), "Is it available?")
        .expect("start");
    assert_eq!(
        owner_events.try_recv().expect("first unread update"),
        Event::UnreadUpdate {
            conversation_id: conversation.id,
            count: 1,
        }
    );

    let mut chat_events = market.channels.subscribe(&chat_group(conversation.id));
    let message = market
        .conversations
        .post(&buyer, conversation.id, "  Would you take 100k?  ")
        .expect("post");
    assert_eq!(message.content, "Would you take 100k?");

    assert_eq!(
        owner_events.try_recv().expect("second unread update"),
        Event::UnreadUpdate {
            conversation_id: conversation.id,
            count: 2,
        }
    );
    match chat_events.try_recv().expect("chat event") {
        Event::Chat {
            message: text,
            sender,
            message_id,
            ..
        } => {
            assert_eq!(text, "Would you take 100k?");
            assert_eq!(sender, "buyer");
            assert_eq!(message_id, message.id);
        }
        other => panic!("expected chat event, got {other:?}"),
    }

    let inbox = market.conversations.inbox(&owner).expect("owner inbox");
    assert_eq!(inbox.len(), 1);
    assert_eq!(inbox[0].unread_count, 2);
    assert_eq!(inbox[0].counterpart.username, "buyer");
    assert_eq!(inbox[0].listing_title.as_deref(), Some("MacBook Air"));
    assert_eq!(
        inbox[0]
            .last_message
            .as_ref()
            .map(|message| message.content.as_str()),
        Some("Would you take 100k?")
    );

    let buyer_inbox = market.conversations.inbox(&buyer).expect("buyer inbox");
    assert_eq!(buyer_inbox[0].unread_count, 0);
}

#[test]
fn opening_a_conversation_marks_it_read() {
    let market = market();
    let Parties {
        owner,
        buyer,
        listing,
        ..
    } = parties(&market);
    let (conversation, _) = market
        .conversations
        .start(&buyer, listing.reference(), "Hi")
        .expect("start");
    market
        .conversations
        .post(&buyer, conversation.id, "Still there?")
        .expect("post");

    let summary = market.conversations.unread_summary(&owner).expect("summary");
    assert_eq!(summary.total_unread, 2);
    assert_eq!(summary.by_conversation[0].conversation_id, conversation.id);

    let detail = market
        .conversations
        .detail(&owner, conversation.id)
        .expect("detail");
    assert_eq!(detail.messages.len(), 2);
    assert_eq!(
        detail.listing.as_ref().map(|listing| listing.id),
        Some(listing.id)
    );

    let summary = market.conversations.unread_summary(&owner).expect("summary");
    assert_eq!(summary.total_unread, 0);
    assert!(summary.by_conversation.is_empty());
    assert_eq!(
        market.conversations.inbox(&owner).expect("inbox")[0].unread_count,
        0
    );
}

#[test]
fn mark_all_read_covers_every_conversation() {
    let market = market();
    let Parties {
        owner,
        buyer,
        listing,
        ..
    } = parties(&market);
    let (other_buyer, _) = member(&market, "second", "+254777000444");
    market
        .conversations
        .start(&buyer, listing.reference(), "First!")
        .expect("first");
    market
        .conversations
        .start(&other_buyer, listing.reference(), "Second!")
        .expect("second");

    assert_eq!(
        market
            .conversations
            .unread_summary(&owner)
            .expect("summary")
            .total_unread,
        2
    );
    assert_eq!(market.conversations.mark_all_read(&owner).expect("mark"), 2);
    assert_eq!(
        market
            .conversations
            .unread_summary(&owner)
            .expect("summary")
            .total_unread,
        0
    );
}

#[test]
fn removing_a_listing_removes_its_conversations() {
    let market = market();
    let Parties {
        owner,
        buyer,
        listing,
        ..
    } = parties(&market);
    let (conversation, _) = market
        .conversations
        .start(&buyer, listing.reference(), "Deal?")
        .expect("start");

    market
        .remove_listing(&owner, listing.kind(), &listing.slug)
        .expect("remove listing");

    assert_eq!(market.conversations.count().expect("count"), 0);
    assert!(market.conversations.inbox(&owner).expect("inbox").is_empty());
    assert!(matches!(
        market.conversations.get(conversation.id),
        Err(ConversationError::NotFound)
    ));
}
