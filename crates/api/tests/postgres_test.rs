// PostgreSQL store tests
//
// Run with a disposable database:
//   DATABASE_URL=postgres://localhost/memorylane_test cargo test -p memorylane-api -- --ignored

use chrono::Utc;
use memorylane_api::StorageBackend;
use memorylane_core::{
    EventStore, EventUpdate, MediaItem, MediaKind, NewTimelineEvent, Privacy, TIMELINE_ID_LEN,
};

async fn backend() -> StorageBackend {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    StorageBackend::postgres(&url).await.unwrap()
}

fn new_event(timeline_id: &str, title: &str) -> NewTimelineEvent {
    NewTimelineEvent {
        timeline_id: timeline_id.to_string(),
        title: title.to_string(),
        description: Some("notes".to_string()),
        date: Utc::now(),
        media: vec![MediaItem {
            kind: MediaKind::Video,
            url: "/uploads/1-clip.mp4".to_string(),
        }],
        privacy: Privacy::Friends,
        suggested: false,
    }
}

#[tokio::test]
#[ignore]
async fn test_postgres_event_lifecycle() {
    let store = backend().await;
    let timeline_id = memorylane_core::generate_timeline_id();
    assert_eq!(timeline_id.len(), TIMELINE_ID_LEN);

    let first = store.create_event(new_event(&timeline_id, "Trip")).await.unwrap();
    let second = store
        .create_event(new_event(&timeline_id, "Dinner"))
        .await
        .unwrap();

    let listed = store.list_events(&timeline_id).await.unwrap();
    assert_eq!(
        listed.iter().map(|e| e.id).collect::<Vec<_>>(),
        vec![first.id, second.id]
    );
    assert_eq!(listed[0].media, first.media);
    assert_eq!(listed[0].privacy, Privacy::Friends);

    let updated = store
        .update_event(
            first.id,
            EventUpdate {
                title: Some("Road Trip".to_string()),
                privacy: Some(Privacy::Public),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.title, "Road Trip");
    assert_eq!(updated.privacy, Privacy::Public);
    assert_eq!(updated.description.as_deref(), Some("notes"));
    assert_eq!(updated.media, first.media);

    assert!(store.delete_event(first.id).await.unwrap());
    assert!(!store.delete_event(first.id).await.unwrap());
    assert!(store.get_event(first.id).await.unwrap().is_none());

    store.delete_event(second.id).await.unwrap();
    assert!(store.list_events(&timeline_id).await.unwrap().is_empty());
}
