//! Collection lifecycle tests: persistence, import/export merge
//! semantics, and the review session writing through the store.

use std::collections::HashSet;

use tempfile::TempDir;

use vocabmaster::{
    CardDraft, CardStatus, Extraction, ReviewMode, ReviewOutcome, ReviewProgress, ReviewSession,
    SessionState, VideoSet, VocabEntry, VocabularyStore,
};

fn entry(word: &str) -> VocabEntry {
    VocabEntry {
        word: word.to_string(),
        part_of_speech: Some("n.".to_string()),
        level: None,
        translation: "字".to_string(),
        example: format!("An example with {}.", word),
    }
}

fn sample_set(words: &[&str]) -> VideoSet {
    VideoSet::from_extraction(
        "https://youtube.com/watch?v=abc123",
        Extraction {
            title: "T".to_string(),
            summary: "S".to_string(),
            vocabulary: words.iter().map(|w| entry(w)).collect(),
            sources: vec![],
        },
    )
}

#[tokio::test]
async fn mutations_survive_reload() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("sets.json");

    let mut store = VocabularyStore::load(&path).await;
    store.add_set(sample_set(&["alpha", "beta"])).await.unwrap();

    let set_id = store.sets()[0].id.clone();
    let card_id = store.sets()[0].cards[1].id.clone();

    store
        .update_card_status(&set_id, &card_id, CardStatus::Learning)
        .await
        .unwrap();
    store
        .add_manual_card(
            &set_id,
            CardDraft {
                word: "gamma".to_string(),
                translation: "三".to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let reloaded = VocabularyStore::load(&path).await;
    let set = reloaded.get(&set_id).unwrap();
    assert_eq!(set.cards.len(), 3);
    assert_eq!(set.cards[1].status, CardStatus::Learning);
    assert!(set.cards[2].manual);
    assert_eq!(set.cards[2].word, "gamma");
}

#[tokio::test]
async fn export_import_merge_is_idempotent() {
    let temp = TempDir::new().unwrap();

    let mut source = VocabularyStore::load(temp.path().join("source.json")).await;
    source.add_set(sample_set(&["alpha"])).await.unwrap();
    source.add_set(sample_set(&["beta"])).await.unwrap();
    let export = source.export_json().unwrap();

    let mut target = VocabularyStore::load(temp.path().join("target.json")).await;
    target.add_set(sample_set(&["gamma"])).await.unwrap();

    let incoming = VocabularyStore::parse_import(&export).unwrap();
    assert_eq!(target.import_merge(incoming).await.unwrap(), 2);
    assert_eq!(target.len(), 3);

    // Re-importing the same export adds nothing
    let incoming = VocabularyStore::parse_import(&export).unwrap();
    assert_eq!(target.import_merge(incoming).await.unwrap(), 0);
    assert_eq!(target.len(), 3);

    let ids: HashSet<&str> = target.sets().iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids.len(), 3);
}

#[tokio::test]
async fn import_rejection_leaves_store_untouched() {
    let temp = TempDir::new().unwrap();
    let mut store = VocabularyStore::load(temp.path().join("sets.json")).await;
    store.add_set(sample_set(&["alpha"])).await.unwrap();

    assert!(VocabularyStore::parse_import("{\"looks\": \"wrong\"}").is_err());
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn review_session_drives_statuses_to_disk() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("sets.json");

    let mut store = VocabularyStore::load(&path).await;
    store
        .add_set(sample_set(&["alpha", "beta", "gamma"]))
        .await
        .unwrap();
    let set_id = store.sets()[0].id.clone();

    let mut session = ReviewSession::new();
    assert_eq!(session.start(&store, &set_id, ReviewMode::All), Ok(3));

    let outcomes = [
        ReviewOutcome::Learned,
        ReviewOutcome::Learning,
        ReviewOutcome::Learned,
    ];
    let mut last = ReviewProgress::Next { remaining: 3 };
    for outcome in outcomes {
        last = session.record_outcome(&mut store, outcome).await.unwrap();
    }
    assert_eq!(last, ReviewProgress::Completed);
    assert_eq!(session.state(), &SessionState::Completed);

    // Statuses survived the session and a reload
    let reloaded = VocabularyStore::load(&path).await;
    let set = reloaded.get(&set_id).unwrap();
    assert_eq!(set.cards[0].status, CardStatus::Learned);
    assert_eq!(set.cards[1].status, CardStatus::Learning);
    assert_eq!(set.cards[2].status, CardStatus::Learned);
    assert_eq!(set.learned_count(), 2);

    // A follow-up learning-only pass sees just the unlearned card
    let mut second = ReviewSession::new();
    let store = VocabularyStore::load(&path).await;
    assert_eq!(
        second.start(&store, &set_id, ReviewMode::LearningOnly),
        Ok(1)
    );
    assert_eq!(second.current_card(&store).unwrap().word, "beta");
}
