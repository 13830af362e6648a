//! Explicit session context: one database handle, one normalizer and the resolved group
//! registry, passed to whoever needs them.

use std::sync::Arc;

use crate::{
    config::LingConfig,
    db::DbConnection,
    error::LingError,
    morph::{DictionaryAnalyzer, MorphAnalyzer, Normalizer},
    properties::{SemanticGroupId, SemanticGroups, SentenceId},
    sentence::Sentence,
    sync::{load_sentence, save_sentence},
};

#[derive(Debug, Clone)]
pub struct Session {
    config: LingConfig,
    db: DbConnection,
    normalizer: Normalizer,
    groups: SemanticGroups,
    predicate: SemanticGroupId,
}

impl Session {
    /// Open the configured database, seed the configured groups and resolve the predicate group.
    pub async fn open(
        config: LingConfig,
        analyzer: Arc<dyn MorphAnalyzer>,
    ) -> Result<Session, LingError> {
        let db = DbConnection::open(&config.database).await?;
        db.seed_semantic_groups(&config.semantic_groups).await?;
        let groups = db.semantic_groups().await?;
        let predicate = groups.id_by_name(&config.predicate_group).ok_or_else(|| {
            LingError::NotFound(format!(
                "predicate group '{}' is not among the semantic groups",
                config.predicate_group
            ))
        })?;
        tracing::info!(
            "Session opened on {:?}: {} semantic groups, predicate group {}",
            config.database,
            groups.len(),
            predicate
        );
        Ok(Session {
            config,
            db,
            normalizer: Normalizer::new(analyzer),
            groups,
            predicate,
        })
    }

    /// [`Session::open`] with the configured dictionary, or an empty one, as analyzer.
    pub async fn open_with_dictionary(config: LingConfig) -> Result<Session, LingError> {
        let dictionary = match &config.dictionary {
            Some(path) => DictionaryAnalyzer::load(path)?,
            None => {
                tracing::warn!("No dictionary configured; every word will be its own lemma");
                DictionaryAnalyzer::new()
            }
        };
        Session::open(config, Arc::new(dictionary)).await
    }

    pub fn config(&self) -> &LingConfig {
        &self.config
    }

    pub fn db(&self) -> &DbConnection {
        &self.db
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    pub fn semantic_groups(&self) -> &SemanticGroups {
        &self.groups
    }

    pub fn predicate_group(&self) -> SemanticGroupId {
        self.predicate
    }

    /// Add a group and refresh the registry.
    pub async fn add_semantic_group(&mut self, name: &str) -> Result<SemanticGroupId, LingError> {
        let id = self.db.add_semantic_group(name).await?;
        self.groups = self.db.semantic_groups().await?;
        Ok(id)
    }

    /// Remove an unused group and refresh the registry. The predicate group cannot be removed.
    pub async fn remove_semantic_group(&mut self, id: SemanticGroupId) -> Result<(), LingError> {
        if id == self.predicate {
            return Err(LingError::Command(
                "the predicate group cannot be removed".to_string(),
            ));
        }
        self.db.remove_semantic_group(id).await?;
        self.groups = self.db.semantic_groups().await?;
        Ok(())
    }

    pub fn new_sentence(&self, text: &str) -> Sentence {
        Sentence::analyzed(text, self.predicate, &self.normalizer)
    }

    pub async fn save(&self, sentence: &Sentence) -> Result<SentenceId, LingError> {
        if sentence.predicate_group() != self.predicate {
            return Err(LingError::Validation(format!(
                "sentence uses predicate group {} but this session uses {}",
                sentence.predicate_group(),
                self.predicate
            )));
        }
        save_sentence(self.db.begin().await?, sentence, &self.normalizer).await
    }

    pub async fn load(&self, id: SentenceId) -> Result<Sentence, LingError> {
        let mut sentence = load_sentence(&self.db, id, self.predicate).await?;
        sentence.analyze(&self.normalizer);
        Ok(sentence)
    }

    pub async fn delete(&self, id: SentenceId) -> Result<(), LingError> {
        self.db.delete_sentence(id).await
    }

    /// HTML rendering with the configured palette.
    pub fn render(&self, sentence: &Sentence) -> String {
        sentence.to_html(&self.config.palette)
    }
}
