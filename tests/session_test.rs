//! Integration tests for the session context: the full annotate / save / load / delete
//! cycle and the navigation reads over the saved annotations.

mod common;

use common::{aviation_dictionary, aviation_normalizer, temp_config, temp_db};
use ling_core::{
    config::LingConfig,
    error::LingError,
    morph::DictionaryAnalyzer,
    properties::{ConnectionId, PartOfSpeech, SemanticGroupId},
    sentence::{Connection, DefaultConnections, Sentence, TagOutcome},
    session::Session,
    store::AnnotationSource,
    sync::save_sentence,
};
use std::sync::Arc;
use tempfile::TempDir;
use test_log::test;

async fn open_session(temp_dir: &TempDir) -> Session {
    Session::open(temp_config(temp_dir), Arc::new(aviation_dictionary()))
        .await
        .unwrap()
}

fn group(session: &Session, name: &str) -> SemanticGroupId {
    session.semantic_groups().id_by_name(name).unwrap()
}

#[test(tokio::test)]
async fn annotate_save_and_reload_a_sentence() {
    let temp_dir = TempDir::new().unwrap();
    let session = open_session(&temp_dir).await;
    let agent = group(&session, "Агент");
    let object = group(&session, "Объект");
    let predicate = session.predicate_group();
    assert_eq!(session.semantic_groups().get(predicate).unwrap().name, "Предикат");

    let mut sentence = session.new_sentence("Летчик пилотировал самолет");
    let starts: Vec<usize> = sentence.words().iter().map(|w| w.start).collect();
    assert_eq!(starts, vec![0, 7, 19]);
    assert_eq!(sentence.words()[1].pos, PartOfSpeech::Verb);

    assert_eq!(sentence.tag(&[0], agent).unwrap(), TagOutcome::Created(0));
    assert_eq!(sentence.tag(&[1], predicate).unwrap(), TagOutcome::Created(1));
    assert_eq!(sentence.tag(&[2], object).unwrap(), TagOutcome::Created(2));
    assert_eq!(
        sentence.make_default_connections(),
        DefaultConnections::Created(2)
    );
    assert_eq!(
        sentence.connections(),
        &[Connection::new(1, 0), Connection::new(1, 2)]
    );

    let id = session.save(&sentence).await.unwrap();
    let loaded = session.load(id).await.unwrap();
    assert_eq!(loaded, sentence);
    assert_eq!(
        session.render(&loaded),
        "<font color=maroon>летчик</font> <font color=gray>пилотировал</font> \
         <font color=red>самолет</font>"
    );
}

#[test(tokio::test)]
async fn a_missing_predicate_group_is_reported() {
    let temp_dir = TempDir::new().unwrap();
    let config = LingConfig {
        predicate_group: "Сказуемое".to_string(),
        ..temp_config(&temp_dir)
    };
    assert!(matches!(
        Session::open(config, Arc::new(DictionaryAnalyzer::new())).await,
        Err(LingError::NotFound(_))
    ));
}

#[test(tokio::test)]
async fn sessions_refuse_foreign_sentences() {
    let temp_dir = TempDir::new().unwrap();
    let session = open_session(&temp_dir).await;
    let foreign = Sentence::new("Летчик", SemanticGroupId(99));
    assert!(matches!(
        session.save(&foreign).await,
        Err(LingError::Validation(_))
    ));
}

#[test(tokio::test)]
async fn dictionary_from_config() {
    let temp_dir = TempDir::new().unwrap();
    let dictionary = temp_dir.path().join("aviation.toml");
    std::fs::write(&dictionary, common::AVIATION_DICTIONARY).unwrap();
    let config = LingConfig {
        dictionary: Some(dictionary),
        ..temp_config(&temp_dir)
    };
    let session = Session::open_with_dictionary(config).await.unwrap();
    let sentence = session.new_sentence("Штурман вел самолет");
    assert_eq!(session.normalizer().normalize("вел").unwrap().lemma(), "вести");
    assert_eq!(sentence.words()[1].pos, PartOfSpeech::Verb);
}

#[test(tokio::test)]
async fn group_management() {
    let temp_dir = TempDir::new().unwrap();
    let mut session = open_session(&temp_dir).await;
    assert_eq!(session.semantic_groups().len(), 10);

    let time = session.add_semantic_group("Время").await.unwrap();
    assert_eq!(session.semantic_groups().len(), 11);
    assert_eq!(session.add_semantic_group("Время").await.unwrap(), time);

    assert!(matches!(
        session.remove_semantic_group(session.predicate_group()).await,
        Err(LingError::Command(_))
    ));

    let agent = group(&session, "Агент");
    let mut sentence = session.new_sentence("Летчик пилотировал самолет");
    sentence.tag(&[0], agent).unwrap();
    session.save(&sentence).await.unwrap();
    assert!(matches!(
        session.remove_semantic_group(agent).await,
        Err(LingError::Command(_))
    ));

    session.remove_semantic_group(time).await.unwrap();
    assert_eq!(session.semantic_groups().id_by_name("Время"), None);
}

#[test(tokio::test)]
async fn deleting_a_sentence_collects_orphans() {
    let temp_dir = TempDir::new().unwrap();
    let session = open_session(&temp_dir).await;
    let predicate = session.predicate_group();
    let (agent, object) = (group(&session, "Агент"), group(&session, "Объект"));
    let annotate = |text: &str| {
        let mut sentence = session.new_sentence(text);
        sentence.tag(&[0], agent).unwrap();
        sentence.tag(&[1], predicate).unwrap();
        sentence.tag(&[2], object).unwrap();
        sentence.make_default_connections();
        sentence
    };

    let first = session
        .save(&annotate("Летчик пилотировал самолет"))
        .await
        .unwrap();
    let second = session.save(&annotate("Штурман вел самолет")).await.unwrap();

    session.delete(first).await.unwrap();
    let db = session.db();
    let counts = db.counts().await.unwrap();
    assert_eq!(counts.sentences, 1);
    assert_eq!(counts.collocations, 3);
    assert_eq!(counts.connections, 2);
    let words: Vec<String> = db
        .get_all_words()
        .await
        .unwrap()
        .into_iter()
        .map(|w| w.word)
        .collect();
    assert_eq!(words, vec!["самолет", "штурман", "вести", "вел"]);

    assert!(matches!(
        session.delete(first).await,
        Err(LingError::NotFound(_))
    ));
    session.delete(second).await.unwrap();
    assert_eq!(db.counts().await.unwrap(), Default::default());
}

#[test(tokio::test)]
async fn lemmas_outlive_sentences_while_derivatives_point_at_them() {
    let temp_dir = TempDir::new().unwrap();
    let db = temp_db(&temp_dir).await;
    let predicate = SemanticGroupId(1);
    let normalizer = aviation_normalizer();

    let base = Sentence::new("Летчик пилотировал самолет", predicate);
    let plural = Sentence::new("Летчики пилотировали самолеты", predicate);
    let base_id = save_sentence(db.begin().await.unwrap(), &base, &normalizer)
        .await
        .unwrap();
    let plural_id = save_sentence(db.begin().await.unwrap(), &plural, &normalizer)
        .await
        .unwrap();
    assert_eq!(db.counts().await.unwrap().words, 7);

    db.delete_sentence(base_id).await.unwrap();
    let mut remaining: Vec<String> = db
        .get_all_words()
        .await
        .unwrap()
        .into_iter()
        .map(|w| w.word)
        .collect();
    remaining.sort();
    assert_eq!(
        remaining,
        vec![
            "летчик",
            "летчики",
            "пилотировали",
            "пилотировать",
            "самолет",
            "самолеты"
        ]
    );

    db.delete_sentence(plural_id).await.unwrap();
    assert!(db.get_all_words().await.unwrap().is_empty());
}

#[test(tokio::test)]
async fn navigation_reads() {
    let temp_dir = TempDir::new().unwrap();
    let session = open_session(&temp_dir).await;
    let predicate = session.predicate_group();
    let (agent, object) = (group(&session, "Агент"), group(&session, "Объект"));

    let mut first = session.new_sentence("Летчик пилотировал самолет");
    first.tag(&[0], agent).unwrap();
    first.tag(&[1], predicate).unwrap();
    first.tag(&[2], object).unwrap();
    first.make_default_connections();
    let first_id = session.save(&first).await.unwrap();

    let mut second = session.new_sentence("Штурман вел самолет");
    second.tag(&[0, 1], agent).unwrap();
    let second_id = session.save(&second).await.unwrap();

    let db = session.db();
    let found: Vec<_> = db
        .find_sentences_containing("САМОЛЕТ")
        .await
        .unwrap()
        .into_iter()
        .map(|s| s.id)
        .collect();
    assert_eq!(found, vec![first_id, second_id]);
    assert_eq!(
        db.get_sentence(second_id).await.unwrap().contents,
        "Штурман вел самолет"
    );

    let plane = db
        .get_word_by_text("Самолет", PartOfSpeech::Noun)
        .await
        .unwrap()
        .id;
    let pilot_verb = db
        .get_word_by_text("пилотировал", PartOfSpeech::Verb)
        .await
        .unwrap();
    assert_eq!(
        db.get_initial_form(pilot_verb.id).await.unwrap().word,
        "пилотировать"
    );
    let pilot_verb = pilot_verb.id;
    assert!(matches!(
        db.get_word_by_text("самолет", PartOfSpeech::Verb).await,
        Err(LingError::NotFound(_))
    ));
    let pilot_forms: Vec<String> = db
        .find_words("ПИЛОТ")
        .await
        .unwrap()
        .into_iter()
        .map(|w| w.word)
        .collect();
    assert_eq!(pilot_forms, vec!["пилотировать", "пилотировал"]);
    assert!(db.find_words("маршрут").await.unwrap().is_empty());
    assert_eq!(
        db.get_sentence_ids_with_word(plane).await.unwrap(),
        vec![first_id, second_id]
    );

    let plane_collocations = db.get_collocation_ids_with_word(plane).await.unwrap();
    assert_eq!(plane_collocations.len(), 1);
    let plane_collocation = db.get_collocation(plane_collocations[0]).await.unwrap();
    assert_eq!(plane_collocation.semantic_group, object);
    assert_eq!(
        db.get_connection_ids_with_collocation(plane_collocation.id)
            .await
            .unwrap()
            .len(),
        1
    );
    assert_eq!(
        db.get_connection_ids_with_word(pilot_verb)
            .await
            .unwrap()
            .len(),
        2
    );
    let connections = db.get_all_connections().await.unwrap();
    assert_eq!(connections.len(), 2);
    let to_plane = db.get_connection(connections[1].id).await.unwrap();
    assert_eq!(to_plane.actant_id, plane_collocation.id);
    assert!(matches!(
        db.get_connection(ConnectionId(99)).await,
        Err(LingError::NotFound(_))
    ));

    let agents: Vec<String> = db
        .get_words_of_semantic_group(agent)
        .await
        .unwrap()
        .into_iter()
        .map(|w| w.word)
        .collect();
    assert_eq!(agents, vec!["летчик", "штурман", "вел"]);

    let two_word = db.get_collocations_of_semantic_group(agent).await.unwrap();
    assert_eq!(two_word[1].words_text, "штурман вел");
    let members = db.get_collocation_words(two_word[1].id).await.unwrap();
    assert_eq!(members.len(), 2);
    assert_eq!(members[1].word, "вел");
}
