/// Audience derivation and feed pagination against a live Postgres.
///
/// Gated on `TEST_DATABASE_URL`; every test uses fresh random users so runs
/// never interfere with each other or require cleanup.
mod common;

use chrono::{Duration, Utc};
use common::*;
use social_api::db::message_repo;
use social_api::models::FeedWindow;
use social_api::websocket::ConnectionRegistry;
use std::collections::HashSet;
use uuid::Uuid;

#[tokio::test]
async fn audience_excludes_self_and_deduplicates() {
    let Some(pool) = try_pool().await else { return };

    let alice = user("Alice");
    let bob = user("Bob");

    // Two messages in one direction, one back, and a self-message
    insert_message(&pool, alice.id, bob.id).await;
    insert_message(&pool, alice.id, bob.id).await;
    insert_message(&pool, bob.id, alice.id).await;
    insert_message(&pool, alice.id, alice.id).await;

    let audience = message_repo::conversation_partners(&pool, alice.id)
        .await
        .unwrap();

    assert_eq!(audience, vec![bob.id]);
}

#[tokio::test]
async fn audience_is_empty_without_conversations() {
    let Some(pool) = try_pool().await else { return };

    let loner = user("Loner");
    let audience = message_repo::conversation_partners(&pool, loner.id)
        .await
        .unwrap();

    assert!(audience.is_empty());
}

#[tokio::test]
async fn feed_is_scoped_to_conversation_partners() {
    let Some(pool) = try_pool().await else { return };
    let service = service(&pool, ConnectionRegistry::new());

    let alice = user("Alice");
    let bob = user("Bob");
    let carol = user("Carol");

    insert_message(&pool, alice.id, bob.id).await;

    let now = Utc::now();
    let bob_post = seed_post(&pool, &bob, "from bob", now).await;
    let carol_post = seed_post(&pool, &carol, "from carol", now).await;
    let own_post = seed_post(&pool, &alice, "from alice", now).await;

    let feed = service
        .list_feed(alice.id, FeedWindow::Offset { skip: 0, limit: 10 })
        .await
        .unwrap();

    let ids: Vec<Uuid> = feed.iter().map(|p| p.id).collect();
    assert!(ids.contains(&bob_post));
    assert!(!ids.contains(&carol_post), "stranger's post leaked into feed");
    assert!(!ids.contains(&own_post), "audience never includes the requester");

    // Carol has no conversations at all, so her feed is empty
    let carol_feed = service
        .list_feed(carol.id, FeedWindow::Offset { skip: 0, limit: 10 })
        .await
        .unwrap();
    assert!(carol_feed.is_empty());
}

#[tokio::test]
async fn offset_pages_are_disjoint_and_gap_free() {
    let Some(pool) = try_pool().await else { return };
    let service = service(&pool, ConnectionRegistry::new());

    let reader = user("Reader");
    let author = user("Author");
    insert_message(&pool, reader.id, author.id).await;

    let base = Utc::now() - Duration::hours(1);
    let mut seeded = vec![];
    for i in 0..12 {
        let id = seed_post(
            &pool,
            &author,
            &format!("post {i}"),
            base + Duration::seconds(i),
        )
        .await;
        seeded.push(id);
    }
    seeded.reverse(); // newest first, matching feed order

    let mut pages = vec![];
    for page in 0..3 {
        let posts = service
            .list_feed(
                reader.id,
                FeedWindow::Offset {
                    skip: page * 5,
                    limit: 5,
                },
            )
            .await
            .unwrap();
        pages.push(posts);
    }

    assert_eq!(pages[0].len(), 5);
    assert_eq!(pages[1].len(), 5);
    assert_eq!(pages[2].len(), 2);

    // No overlap between pages
    let all: Vec<Uuid> = pages.iter().flatten().map(|p| p.id).collect();
    let unique: HashSet<Uuid> = all.iter().copied().collect();
    assert_eq!(all.len(), unique.len());

    // No gaps: concatenated pages reproduce the full newest-first sequence
    assert_eq!(all, seeded);

    // Newest first within and across pages
    for window in pages.iter().flatten().collect::<Vec<_>>().windows(2) {
        assert!(window[0].created_at >= window[1].created_at);
    }
}

#[tokio::test]
async fn cursor_mode_returns_strictly_newer_posts() {
    let Some(pool) = try_pool().await else { return };
    let service = service(&pool, ConnectionRegistry::new());

    let reader = user("Reader");
    let author = user("Author");
    insert_message(&pool, reader.id, author.id).await;

    let base = Utc::now() - Duration::hours(1);
    for i in 0..10 {
        seed_post(
            &pool,
            &author,
            &format!("post {i}"),
            base + Duration::seconds(i),
        )
        .await;
    }

    let cursor = base + Duration::seconds(6);
    let feed = service
        .list_feed(reader.id, FeedWindow::After { cursor, limit: 5 })
        .await
        .unwrap();

    // Posts 7, 8, 9 are strictly newer than the cursor
    assert_eq!(feed.len(), 3);
    for post in &feed {
        assert!(post.created_at > cursor);
    }
    for window in feed.windows(2) {
        assert!(window[0].created_at >= window[1].created_at);
    }

    // The cursor caps at `limit` like any other window
    let capped = service
        .list_feed(
            reader.id,
            FeedWindow::After {
                cursor: base - Duration::seconds(1),
                limit: 4,
            },
        )
        .await
        .unwrap();
    assert_eq!(capped.len(), 4);
}

#[tokio::test]
async fn feed_hydrates_author_profiles() {
    let Some(pool) = try_pool().await else { return };
    let service = service(&pool, ConnectionRegistry::new());

    let reader = user("Reader");
    let mut author = user("Original Name");
    author.profile_pic = Some("https://cdn.example/author.png".to_string());

    insert_profile(&pool, &author).await;
    insert_message(&pool, reader.id, author.id).await;
    seed_post(&pool, &author, "hello", Utc::now()).await;

    let feed = service
        .list_feed(reader.id, FeedWindow::Offset { skip: 0, limit: 5 })
        .await
        .unwrap();

    assert_eq!(feed.len(), 1);
    let post = &feed[0];
    assert_eq!(post.author.id, author.id);
    assert_eq!(post.author.full_name, "Original Name");
    assert_eq!(
        post.author.profile_pic.as_deref(),
        Some("https://cdn.example/author.png")
    );
    // The snapshot is stored alongside the joined profile
    assert_eq!(post.author_name, "Original Name");
}
