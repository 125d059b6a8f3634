mod common;

use chrono::NaiveDate;
use uuid::Uuid;
use wishlist_service::{
    db::RecordStore,
    dto::{NewEventDto, NewGiftDto},
    errors::AppError,
    models::GiftCategory,
    service::{
        event::{create_event, delete_event, get_owned_event, list_events},
        gift::{create_gift, delete_gift, list_gifts},
        reservation::reserve,
    },
};

fn count_for(summaries: &[wishlist_service::models::EventSummary], event_id: Uuid) -> Option<u64> {
    summaries
        .iter()
        .find(|s| s.event.id == event_id)
        .map(|s| s.gifts_count)
}

#[tokio::test]
async fn gift_counts_follow_adds_and_deletes() {
    let store = common::store();
    let owner = common::owner();

    let birthday = common::event(&store, &owner, "Birthday").await;
    let events = list_events(store.as_ref()).await.unwrap();
    assert_eq!(count_for(&events, birthday.id), Some(0));

    let first = common::gift(&store, &owner, birthday.id, "Book").await;
    common::gift(&store, &owner, birthday.id, "Plant").await;
    let events = list_events(store.as_ref()).await.unwrap();
    assert_eq!(count_for(&events, birthday.id), Some(2));

    delete_gift(store.as_ref(), &owner, first.id).await.unwrap();
    let events = list_events(store.as_ref()).await.unwrap();
    assert_eq!(count_for(&events, birthday.id), Some(1));

    delete_event(store.as_ref(), &owner, birthday.id).await.unwrap();
    let events = list_events(store.as_ref()).await.unwrap();
    assert_eq!(count_for(&events, birthday.id), None);
    assert!(list_gifts(store.as_ref(), birthday.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn deleting_an_event_leaves_no_gifts_behind() {
    for k in 0..6 {
        let store = common::store();
        let owner = common::owner();
        let event = common::event(&store, &owner, "Party").await;
        let keep = common::event(&store, &owner, "Other party").await;
        for i in 0..k {
            let gift = common::gift(&store, &owner, event.id, &format!("Gift {i}")).await;
            if i % 2 == 0 {
                reserve(store.as_ref(), gift.id, "Alice").await.unwrap();
            }
        }
        common::gift(&store, &owner, keep.id, "Untouched").await;

        let removed = delete_event(store.as_ref(), &owner, event.id).await.unwrap();
        assert_eq!(removed, k);
        assert_eq!(store.count_gifts(event.id).await.unwrap(), 0);
        assert_eq!(store.count_gifts(keep.id).await.unwrap(), 1);
        assert!(store.select_event(event.id).await.unwrap().is_none());
    }
}

#[tokio::test]
async fn strangers_cannot_touch_anothers_rows() {
    let store = common::store();
    let owner = common::owner();
    let stranger = common::owner();
    let event = common::event(&store, &owner, "Birthday").await;
    let gift = common::gift(&store, &owner, event.id, "Watch").await;

    assert_eq!(
        delete_event(store.as_ref(), &stranger, event.id).await,
        Err(AppError::NotFound)
    );
    assert_eq!(
        delete_gift(store.as_ref(), &stranger, gift.id).await,
        Err(AppError::NotFound)
    );
    let intrusion = create_gift(
        store.as_ref(),
        &stranger,
        event.id,
        NewGiftDto {
            title: "Spam".to_string(),
            ..Default::default()
        },
    )
    .await;
    assert_eq!(intrusion, Err(AppError::NotFound));
    assert_eq!(
        get_owned_event(store.as_ref(), &stranger, event.id).await,
        Err(AppError::NotFound)
    );

    assert!(store.select_event(event.id).await.unwrap().is_some());
    let gifts = list_gifts(store.as_ref(), event.id).await.unwrap();
    assert_eq!(gifts.len(), 1);
    assert_eq!(gifts[0].id, gift.id);
}

#[tokio::test]
async fn reserved_gifts_can_still_be_deleted_by_their_owner() {
    let store = common::store();
    let owner = common::owner();
    let event = common::event(&store, &owner, "Birthday").await;
    let gift = common::gift(&store, &owner, event.id, "Camera").await;
    reserve(store.as_ref(), gift.id, "Alice").await.unwrap();

    delete_gift(store.as_ref(), &owner, gift.id).await.unwrap();
    assert!(store.select_gift(gift.id).await.unwrap().is_none());
    assert_eq!(
        delete_gift(store.as_ref(), &owner, gift.id).await,
        Err(AppError::NotFound)
    );
}

#[tokio::test]
async fn listings_are_newest_first_and_scoped_to_the_event() {
    let store = common::store();
    let owner = common::owner();
    let older = common::event(&store, &owner, "Older").await;
    let newer = common::event(&store, &owner, "Newer").await;

    let titles: Vec<String> = list_events(store.as_ref())
        .await
        .unwrap()
        .into_iter()
        .map(|s| s.event.title)
        .collect();
    assert_eq!(titles, vec!["Newer", "Older"]);

    common::gift(&store, &owner, older.id, "First").await;
    common::gift(&store, &owner, older.id, "Second").await;
    common::gift(&store, &owner, newer.id, "Elsewhere").await;

    let titles: Vec<String> = list_gifts(store.as_ref(), older.id)
        .await
        .unwrap()
        .into_iter()
        .map(|g| g.title)
        .collect();
    assert_eq!(titles, vec!["Second", "First"]);
    assert!(list_gifts(store.as_ref(), Uuid::new_v4()).await.unwrap().is_empty());
}

#[tokio::test]
async fn creation_trims_and_normalizes_fields() {
    let store = common::store();
    let owner = common::owner();
    let event = create_event(
        store.as_ref(),
        &owner,
        NewEventDto {
            title: "  New Year  ".to_string(),
            description: Some("   ".to_string()),
            event_date: NaiveDate::from_ymd_opt(2026, 12, 31),
        },
    )
    .await
    .unwrap();
    assert_eq!(event.title, "New Year");
    assert_eq!(event.description, None);
    assert_eq!(event.owner_id, owner.owner_id());

    let gift = create_gift(
        store.as_ref(),
        &owner,
        event.id,
        NewGiftDto {
            title: " Sneakers ".to_string(),
            link: Some(" https://shop.example/sneakers ".to_string()),
            description: Some(String::new()),
            image_url: None,
            category: Some(GiftCategory::Clothing),
        },
    )
    .await
    .unwrap();
    assert_eq!(gift.title, "Sneakers");
    assert_eq!(gift.link.as_deref(), Some("https://shop.example/sneakers"));
    assert_eq!(gift.description, None);
    assert_eq!(gift.category, GiftCategory::Clothing);
    assert!(gift.state.is_available());

    let plain = common::gift(&store, &owner, event.id, "Socks").await;
    assert_eq!(plain.category, GiftCategory::Other);
}

#[tokio::test]
async fn invalid_input_is_rejected_without_writing() {
    let store = common::store();
    let owner = common::owner();

    let err = create_event(
        store.as_ref(),
        &owner,
        NewEventDto {
            title: "x".repeat(101),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Validation { ref field, .. } if field == "title"));
    assert!(list_events(store.as_ref()).await.unwrap().is_empty());

    let event = common::event(&store, &owner, "Birthday").await;
    let err = create_gift(
        store.as_ref(),
        &owner,
        event.id,
        NewGiftDto {
            title: "Picture".to_string(),
            image_url: Some("data:image/png;base64,AAAA".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Validation { ref field, .. } if field == "image_url"));
    assert!(list_gifts(store.as_ref(), event.id).await.unwrap().is_empty());
}
