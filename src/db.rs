use futures_core::future::BoxFuture;
use sqlx::{
    error::BoxDynError,
    migrate::{Migration as SqlxMigration, MigrationSource, MigrationType, Migrator},
    sqlite::{Sqlite, SqliteConnectOptions},
    ConnectOptions, Pool, QueryBuilder, Transaction,
};
use std::{path::Path, result::Result};

use crate::{
    error::LingError,
    properties::{
        CollocationId, CollocationIndex, ConnectionId, PartOfSpeech, SemanticGroup,
        SemanticGroupId, SemanticGroups, SentenceId, WordId, WordIndex,
    },
    sentence::Connection,
    store::{
        encode_word_idxs, AnnotationSource, PersistedCollocation, PersistedConnection,
        PersistedSentence, PersistedWord, SentenceCollocation, SentenceConnection,
        SentenceWriter,
    },
};

#[derive(Debug, Clone)]
pub struct DbConnection(pub Pool<Sqlite>);

/// One open write transaction. Dropping it without [`SentenceWriter::commit`] rolls back.
pub struct DbTransaction(pub Transaction<'static, Sqlite>);

fn log_sql_error(
    context: &'static str,
    sql: &'static str,
) -> impl FnOnce(sqlx::Error) -> sqlx::Error {
    move |e| {
        tracing::error!("[{context}] SQL error processing '{sql}'\n\terror: {e}");
        e
    }
}

impl DbConnection {
    pub async fn open(db_path: &Path) -> Result<DbConnection, LingError> {
        Ok(DbConnection(db_init(db_path).await?))
    }

    pub async fn begin(&self) -> Result<DbTransaction, LingError> {
        Ok(DbTransaction(self.0.begin().await?))
    }

    /// Add a semantic group. An existing name is kept and its id returned.
    #[tracing::instrument(skip(self))]
    pub async fn add_semantic_group(&self, name: &str) -> Result<SemanticGroupId, LingError> {
        if let Some(existing) = self.semantic_group_id_by_name(name).await? {
            tracing::warn!(
                "[DbConnection.add_semantic_group] group '{name}' already exists as {existing}"
            );
            return Ok(existing);
        }
        let id = sqlx::query("INSERT INTO semantic_group (name) VALUES (?)")
            .bind(name)
            .execute(&self.0)
            .await?
            .last_insert_rowid();
        Ok(SemanticGroupId(id))
    }

    /// Insert every missing name, quietly skipping the ones already present.
    pub async fn seed_semantic_groups<S: AsRef<str>>(&self, names: &[S]) -> Result<(), LingError> {
        let mut tx = self.0.begin().await?;
        for name in names {
            sqlx::query("INSERT OR IGNORE INTO semantic_group (name) VALUES (?)")
                .bind(name.as_ref())
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    /// Remove a semantic group no collocation uses.
    #[tracing::instrument(skip(self))]
    pub async fn remove_semantic_group(&self, id: SemanticGroupId) -> Result<(), LingError> {
        let mut tx = self.0.begin().await?;
        let exists: Option<i64> = sqlx::query_scalar("SELECT id FROM semantic_group WHERE id = ?")
            .bind(id.0)
            .fetch_optional(&mut *tx)
            .await?;
        if exists.is_none() {
            return Err(LingError::NotFound(format!("semantic group {id}")));
        }
        let users: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM collocation WHERE semantic_group_id = ?")
                .bind(id.0)
                .fetch_one(&mut *tx)
                .await?;
        if users > 0 {
            return Err(LingError::Command(format!(
                "semantic group {id} is still used by {users} collocations"
            )));
        }
        sqlx::query("DELETE FROM semantic_group WHERE id = ?")
            .bind(id.0)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(())
    }

    pub async fn semantic_group_id_by_name(
        &self,
        name: &str,
    ) -> Result<Option<SemanticGroupId>, LingError> {
        let id: Option<i64> = sqlx::query_scalar("SELECT id FROM semantic_group WHERE name = ?")
            .bind(name)
            .fetch_optional(&self.0)
            .await?;
        Ok(id.map(SemanticGroupId))
    }

    pub async fn semantic_groups(&self) -> Result<SemanticGroups, LingError> {
        SemanticGroups::new(self.get_all_semantic_groups().await?)
    }

    /// Delete a sentence and garbage-collect the rows no remaining sentence references.
    ///
    /// A lemma row survives while some derivative still points at it.
    #[tracing::instrument(skip(self))]
    pub async fn delete_sentence(&self, id: SentenceId) -> Result<(), LingError> {
        let mut tx = self.0.begin().await?;
        let deleted = sqlx::query("DELETE FROM sentence WHERE id = ?")
            .bind(id.0)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        if deleted == 0 {
            return Err(LingError::NotFound(format!("sentence {id}")));
        }
        for sql in [
            "DELETE FROM sentence_word_junction WHERE sentence_id = ?",
            "DELETE FROM sentence_collocation_junction WHERE sentence_id = ?",
            "DELETE FROM sentence_connection_junction WHERE sentence_id = ?",
        ] {
            sqlx::query(sql).bind(id.0).execute(&mut *tx).await?;
        }
        for sql in [
            "DELETE FROM connection WHERE id NOT IN \
                (SELECT connection_id FROM sentence_connection_junction)",
            "DELETE FROM collocation WHERE id NOT IN \
                (SELECT collocation_id FROM sentence_collocation_junction)",
            "DELETE FROM collocation_junction WHERE collocation_id NOT IN \
                (SELECT id FROM collocation)",
        ] {
            sqlx::query(sql)
                .execute(&mut *tx)
                .await
                .map_err(log_sql_error("DbConnection.delete_sentence", sql))?;
        }

        // Each pass frees the lemmas of the derivatives removed by the previous one.
        const ORPHAN_WORDS: &str = "DELETE FROM word WHERE \
            id NOT IN (SELECT word_id FROM sentence_word_junction) AND \
            id NOT IN (SELECT word_id FROM collocation_junction) AND \
            id NOT IN (SELECT initial_form_id FROM word WHERE initial_form_id IS NOT NULL)";
        let mut words_removed = 0;
        loop {
            let removed = sqlx::query(ORPHAN_WORDS)
                .execute(&mut *tx)
                .await
                .map_err(log_sql_error("DbConnection.delete_sentence", ORPHAN_WORDS))?
                .rows_affected();
            if removed == 0 {
                break;
            }
            words_removed += removed;
        }
        tx.commit().await?;
        tracing::info!("Deleted sentence {id}; collected {words_removed} orphaned words");
        Ok(())
    }

    pub async fn counts(&self) -> Result<StoreCounts, LingError> {
        let mut counts = StoreCounts::default();
        for (table, slot) in [
            ("sentence", &mut counts.sentences),
            ("word", &mut counts.words),
            ("collocation", &mut counts.collocations),
            ("connection", &mut counts.connections),
        ] {
            let n: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
                .fetch_one(&self.0)
                .await?;
            *slot = n as usize;
        }
        Ok(counts)
    }
}

/// Row counts of the main tables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreCounts {
    pub sentences: usize,
    pub words: usize,
    pub collocations: usize,
    pub connections: usize,
}

impl SentenceWriter for DbTransaction {
    async fn upsert_word(
        &mut self,
        word: &str,
        pos: PartOfSpeech,
        initial_form: Option<WordId>,
    ) -> Result<WordId, LingError> {
        let initial_form = initial_form.map(i64::from);
        sqlx::query(
            "INSERT OR IGNORE INTO word (word, part_of_speech, initial_form_id) VALUES (?, ?, ?)",
        )
        .bind(word)
        .bind(pos.as_code())
        .bind(initial_form)
        .execute(&mut *self.0)
        .await?;
        let id: i64 = sqlx::query_scalar(
            "SELECT id FROM word WHERE word = ? AND part_of_speech = ? AND initial_form_id IS ?",
        )
        .bind(word)
        .bind(pos.as_code())
        .bind(initial_form)
        .fetch_one(&mut *self.0)
        .await?;
        Ok(WordId(id))
    }

    async fn get_or_create_sentence(&mut self, text: &str) -> Result<SentenceId, LingError> {
        sqlx::query("INSERT OR IGNORE INTO sentence (contents) VALUES (?)")
            .bind(text)
            .execute(&mut *self.0)
            .await?;
        let id: i64 = sqlx::query_scalar("SELECT id FROM sentence WHERE contents = ?")
            .bind(text)
            .fetch_one(&mut *self.0)
            .await?;
        Ok(SentenceId(id))
    }

    async fn clear_sentence_junctions(&mut self, sentence: SentenceId) -> Result<(), LingError> {
        for sql in [
            "DELETE FROM sentence_word_junction WHERE sentence_id = ?",
            "DELETE FROM sentence_collocation_junction WHERE sentence_id = ?",
            "DELETE FROM sentence_connection_junction WHERE sentence_id = ?",
        ] {
            sqlx::query(sql)
                .bind(sentence.0)
                .execute(&mut *self.0)
                .await
                .map_err(log_sql_error("DbTransaction.clear_sentence_junctions", sql))?;
        }
        Ok(())
    }

    async fn insert_sentence_word(
        &mut self,
        sentence: SentenceId,
        word: WordId,
        idx: WordIndex,
        text_idx: usize,
    ) -> Result<(), LingError> {
        sqlx::query(
            "INSERT INTO sentence_word_junction (sentence_id, word_id, idx, text_idx) \
             VALUES (?, ?, ?, ?)",
        )
        .bind(sentence.0)
        .bind(word.0)
        .bind(idx as i64)
        .bind(text_idx as i64)
        .execute(&mut *self.0)
        .await?;
        Ok(())
    }

    async fn find_collocation_by_hash(
        &mut self,
        hash: &str,
    ) -> Result<Option<CollocationId>, LingError> {
        let id: Option<i64> = sqlx::query_scalar(
            "SELECT id FROM collocation WHERE words_hash = ? ORDER BY id LIMIT 1",
        )
        .bind(hash)
        .fetch_optional(&mut *self.0)
        .await?;
        Ok(id.map(CollocationId))
    }

    async fn insert_collocation(
        &mut self,
        group: SemanticGroupId,
        hash: &str,
        words_text: &str,
        words: &[WordId],
    ) -> Result<CollocationId, LingError> {
        let id = sqlx::query(
            "INSERT INTO collocation (semantic_group_id, words_hash, words_text) VALUES (?, ?, ?)",
        )
        .bind(group.0)
        .bind(hash)
        .bind(words_text)
        .execute(&mut *self.0)
        .await?
        .last_insert_rowid();

        if !words.is_empty() {
            let mut qb = QueryBuilder::<Sqlite>::new(
                "INSERT INTO collocation_junction (collocation_id, word_id, idx) ",
            );
            qb.push_values(words.iter().enumerate(), |mut b, (idx, word)| {
                b.push_bind(id).push_bind(word.0).push_bind(idx as i64);
            });
            qb.build().execute(&mut *self.0).await?;
        }
        Ok(CollocationId(id))
    }

    async fn link_sentence_collocation(
        &mut self,
        sentence: SentenceId,
        collocation: CollocationId,
        idx: CollocationIndex,
        word_idxs: &[WordIndex],
    ) -> Result<(), LingError> {
        sqlx::query(
            "INSERT INTO sentence_collocation_junction \
             (sentence_id, collocation_id, idx, word_idxs) VALUES (?, ?, ?, ?)",
        )
        .bind(sentence.0)
        .bind(collocation.0)
        .bind(idx as i64)
        .bind(encode_word_idxs(word_idxs))
        .execute(&mut *self.0)
        .await?;
        Ok(())
    }

    async fn insert_connection(
        &mut self,
        predicate: CollocationId,
        actant: CollocationId,
    ) -> Result<ConnectionId, LingError> {
        sqlx::query("INSERT OR IGNORE INTO connection (predicate_id, actant_id) VALUES (?, ?)")
            .bind(predicate.0)
            .bind(actant.0)
            .execute(&mut *self.0)
            .await?;
        let id: i64 =
            sqlx::query_scalar("SELECT id FROM connection WHERE predicate_id = ? AND actant_id = ?")
                .bind(predicate.0)
                .bind(actant.0)
                .fetch_one(&mut *self.0)
                .await?;
        Ok(ConnectionId(id))
    }

    async fn link_sentence_connection(
        &mut self,
        sentence: SentenceId,
        connection_id: ConnectionId,
        idx: usize,
        connection: Connection,
    ) -> Result<(), LingError> {
        sqlx::query(
            "INSERT INTO sentence_connection_junction \
             (sentence_id, connection_id, idx, predicate_idx, actant_idx) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(sentence.0)
        .bind(connection_id.0)
        .bind(idx as i64)
        .bind(connection.predicate_idx as i64)
        .bind(connection.actant_idx as i64)
        .execute(&mut *self.0)
        .await?;
        Ok(())
    }

    async fn commit(self) -> Result<(), LingError> {
        self.0.commit().await?;
        Ok(())
    }
}

impl AnnotationSource for DbConnection {
    async fn get_all_semantic_groups(&self) -> Result<Vec<SemanticGroup>, LingError> {
        let rows = sqlx::query_as::<_, (i64, String)>(
            "SELECT id, name FROM semantic_group ORDER BY id",
        )
        .fetch_all(&self.0)
        .await?;
        Ok(rows
            .into_iter()
            .map(|(id, name)| SemanticGroup {
                id: SemanticGroupId(id),
                name,
            })
            .collect())
    }

    async fn get_all_sentences(&self) -> Result<Vec<PersistedSentence>, LingError> {
        Ok(
            sqlx::query_as::<_, PersistedSentence>("SELECT * FROM sentence ORDER BY id")
                .fetch_all(&self.0)
                .await?,
        )
    }

    async fn get_sentence(&self, id: SentenceId) -> Result<PersistedSentence, LingError> {
        sqlx::query_as::<_, PersistedSentence>("SELECT * FROM sentence WHERE id = ?")
            .bind(id.0)
            .fetch_optional(&self.0)
            .await?
            .ok_or_else(|| LingError::NotFound(format!("sentence {id}")))
    }

    #[tracing::instrument(skip(self))]
    async fn get_sentence_collocations(
        &self,
        id: SentenceId,
    ) -> Result<Vec<SentenceCollocation>, LingError> {
        const SQL: &str = "SELECT j.idx, j.collocation_id, c.semantic_group_id, j.word_idxs \
            FROM sentence_collocation_junction j JOIN collocation c ON c.id = j.collocation_id \
            WHERE j.sentence_id = ? ORDER BY j.idx";
        Ok(sqlx::query_as::<_, SentenceCollocation>(SQL)
            .bind(id.0)
            .fetch_all(&self.0)
            .await
            .map_err(log_sql_error("DbConnection.get_sentence_collocations", SQL))?)
    }

    #[tracing::instrument(skip(self))]
    async fn get_sentence_connections(
        &self,
        id: SentenceId,
    ) -> Result<Vec<SentenceConnection>, LingError> {
        const SQL: &str = "SELECT idx, connection_id, predicate_idx, actant_idx \
            FROM sentence_connection_junction WHERE sentence_id = ? ORDER BY idx";
        Ok(sqlx::query_as::<_, SentenceConnection>(SQL)
            .bind(id.0)
            .fetch_all(&self.0)
            .await
            .map_err(log_sql_error("DbConnection.get_sentence_connections", SQL))?)
    }

    async fn find_sentences_containing(
        &self,
        fragment: &str,
    ) -> Result<Vec<PersistedSentence>, LingError> {
        // SQLite's LIKE and lower() only fold ASCII.
        let needle = fragment.to_lowercase();
        Ok(self
            .get_all_sentences()
            .await?
            .into_iter()
            .filter(|s| s.contents.to_lowercase().contains(&needle))
            .collect())
    }

    async fn get_sentence_ids_with_word(&self, word: WordId) -> Result<Vec<SentenceId>, LingError> {
        let ids: Vec<i64> = sqlx::query_scalar(
            "SELECT DISTINCT sentence_id FROM sentence_word_junction WHERE word_id = ? \
             ORDER BY sentence_id",
        )
        .bind(word.0)
        .fetch_all(&self.0)
        .await?;
        Ok(ids.into_iter().map(SentenceId).collect())
    }

    async fn get_all_words(&self) -> Result<Vec<PersistedWord>, LingError> {
        Ok(
            sqlx::query_as::<_, PersistedWord>("SELECT * FROM word ORDER BY id")
                .fetch_all(&self.0)
                .await?,
        )
    }

    async fn get_word(&self, id: WordId) -> Result<PersistedWord, LingError> {
        sqlx::query_as::<_, PersistedWord>("SELECT * FROM word WHERE id = ?")
            .bind(id.0)
            .fetch_optional(&self.0)
            .await?
            .ok_or_else(|| LingError::NotFound(format!("word {id}")))
    }

    async fn get_word_by_text(
        &self,
        word: &str,
        pos: PartOfSpeech,
    ) -> Result<PersistedWord, LingError> {
        sqlx::query_as::<_, PersistedWord>(
            "SELECT * FROM word WHERE word = ? AND part_of_speech = ? ORDER BY id LIMIT 1",
        )
        .bind(word.to_lowercase())
        .bind(pos.as_code())
        .fetch_optional(&self.0)
        .await?
        .ok_or_else(|| LingError::NotFound(format!("word '{word}' ({pos:?})")))
    }

    async fn find_words(&self, fragment: &str) -> Result<Vec<PersistedWord>, LingError> {
        // Stored words are already lowercase; only the needle needs folding.
        let needle = fragment.to_lowercase();
        Ok(self
            .get_all_words()
            .await?
            .into_iter()
            .filter(|w| w.word.contains(&needle))
            .collect())
    }

    async fn get_initial_form(&self, id: WordId) -> Result<PersistedWord, LingError> {
        let word = self.get_word(id).await?;
        match word.initial_form_id {
            Some(lemma) => self.get_word(lemma).await,
            None => Ok(word),
        }
    }

    async fn get_words_with_initial_form(
        &self,
        lemma: WordId,
    ) -> Result<Vec<PersistedWord>, LingError> {
        Ok(sqlx::query_as::<_, PersistedWord>(
            "SELECT * FROM word WHERE initial_form_id = ? ORDER BY id",
        )
        .bind(lemma.0)
        .fetch_all(&self.0)
        .await?)
    }

    async fn get_words_of_semantic_group(
        &self,
        group: SemanticGroupId,
    ) -> Result<Vec<PersistedWord>, LingError> {
        Ok(sqlx::query_as::<_, PersistedWord>(
            "SELECT w.* FROM collocation c \
             JOIN collocation_junction cj ON cj.collocation_id = c.id \
             JOIN word w ON w.id = cj.word_id \
             WHERE c.semantic_group_id = ? ORDER BY c.id, cj.idx",
        )
        .bind(group.0)
        .fetch_all(&self.0)
        .await?)
    }

    async fn get_all_collocations(&self) -> Result<Vec<PersistedCollocation>, LingError> {
        Ok(
            sqlx::query_as::<_, PersistedCollocation>("SELECT * FROM collocation ORDER BY id")
                .fetch_all(&self.0)
                .await?,
        )
    }

    async fn get_collocation(&self, id: CollocationId) -> Result<PersistedCollocation, LingError> {
        sqlx::query_as::<_, PersistedCollocation>("SELECT * FROM collocation WHERE id = ?")
            .bind(id.0)
            .fetch_optional(&self.0)
            .await?
            .ok_or_else(|| LingError::NotFound(format!("collocation {id}")))
    }

    async fn get_collocation_words(
        &self,
        id: CollocationId,
    ) -> Result<Vec<PersistedWord>, LingError> {
        Ok(sqlx::query_as::<_, PersistedWord>(
            "SELECT w.* FROM collocation_junction cj JOIN word w ON w.id = cj.word_id \
             WHERE cj.collocation_id = ? ORDER BY cj.idx",
        )
        .bind(id.0)
        .fetch_all(&self.0)
        .await?)
    }

    async fn get_collocations_of_semantic_group(
        &self,
        group: SemanticGroupId,
    ) -> Result<Vec<PersistedCollocation>, LingError> {
        Ok(sqlx::query_as::<_, PersistedCollocation>(
            "SELECT * FROM collocation WHERE semantic_group_id = ? ORDER BY id",
        )
        .bind(group.0)
        .fetch_all(&self.0)
        .await?)
    }

    async fn get_collocation_ids_with_word(
        &self,
        word: WordId,
    ) -> Result<Vec<CollocationId>, LingError> {
        let ids: Vec<i64> = sqlx::query_scalar(
            "SELECT DISTINCT collocation_id FROM collocation_junction WHERE word_id = ? \
             ORDER BY collocation_id",
        )
        .bind(word.0)
        .fetch_all(&self.0)
        .await?;
        Ok(ids.into_iter().map(CollocationId).collect())
    }

    async fn get_all_connections(&self) -> Result<Vec<PersistedConnection>, LingError> {
        Ok(
            sqlx::query_as::<_, PersistedConnection>("SELECT * FROM connection ORDER BY id")
                .fetch_all(&self.0)
                .await?,
        )
    }

    async fn get_connection(&self, id: ConnectionId) -> Result<PersistedConnection, LingError> {
        sqlx::query_as::<_, PersistedConnection>("SELECT * FROM connection WHERE id = ?")
            .bind(id.0)
            .fetch_optional(&self.0)
            .await?
            .ok_or_else(|| LingError::NotFound(format!("connection {id}")))
    }

    async fn get_connection_ids_with_collocation(
        &self,
        collocation: CollocationId,
    ) -> Result<Vec<ConnectionId>, LingError> {
        let ids: Vec<i64> = sqlx::query_scalar(
            "SELECT id FROM connection WHERE predicate_id = ?1 OR actant_id = ?1 ORDER BY id",
        )
        .bind(collocation.0)
        .fetch_all(&self.0)
        .await?;
        Ok(ids.into_iter().map(ConnectionId).collect())
    }

    async fn get_connection_ids_with_word(
        &self,
        word: WordId,
    ) -> Result<Vec<ConnectionId>, LingError> {
        let ids: Vec<i64> = sqlx::query_scalar(
            "SELECT DISTINCT n.id FROM connection n \
             JOIN collocation_junction cj ON cj.collocation_id IN (n.predicate_id, n.actant_id) \
             WHERE cj.word_id = ? ORDER BY n.id",
        )
        .bind(word.0)
        .fetch_all(&self.0)
        .await?;
        Ok(ids.into_iter().map(ConnectionId).collect())
    }
}

/// A migration definition.
#[derive(Debug, Clone)]
pub struct Migration {
    pub version: i64,
    pub description: &'static str,
    pub sql: &'static str,
    pub kind: MigrationType,
}

#[derive(Debug, Clone)]
struct MigrationList(Vec<Migration>);

impl MigrationSource<'static> for MigrationList {
    fn resolve(self) -> BoxFuture<'static, Result<Vec<SqlxMigration>, BoxDynError>> {
        Box::pin(async move {
            let mut migrations = Vec::new();
            for migration in self.0 {
                if matches!(migration.kind, MigrationType::ReversibleUp) {
                    migrations.push(SqlxMigration::new(
                        migration.version,
                        migration.description.into(),
                        migration.kind,
                        migration.sql.into(),
                        false,
                    ));
                }
            }
            Ok(migrations)
        })
    }
}

fn migrations() -> MigrationList {
    MigrationList(vec![
        Migration {
            version: 1,
            description: "create_annotation_tables",
            sql: "\
            CREATE TABLE semantic_group (id INTEGER PRIMARY KEY AUTOINCREMENT, name TEXT NOT NULL UNIQUE); \
            CREATE TABLE word (id INTEGER PRIMARY KEY AUTOINCREMENT, word TEXT NOT NULL, part_of_speech INTEGER NOT NULL, initial_form_id INTEGER REFERENCES word(id)); \
            CREATE UNIQUE INDEX word_form ON word (word, part_of_speech, IFNULL(initial_form_id, 0)); \
            CREATE INDEX word_initial_form ON word (initial_form_id); \
            CREATE TABLE sentence (id INTEGER PRIMARY KEY AUTOINCREMENT, contents TEXT NOT NULL UNIQUE); \
            CREATE TABLE sentence_word_junction (sentence_id INTEGER NOT NULL, word_id INTEGER NOT NULL, idx INTEGER NOT NULL, text_idx INTEGER NOT NULL, UNIQUE(sentence_id, idx)); \
            CREATE TABLE collocation (id INTEGER PRIMARY KEY AUTOINCREMENT, semantic_group_id INTEGER NOT NULL REFERENCES semantic_group(id), words_hash TEXT NOT NULL, words_text TEXT NOT NULL); \
            CREATE INDEX collocation_hash ON collocation (words_hash); \
            CREATE TABLE collocation_junction (collocation_id INTEGER NOT NULL, word_id INTEGER NOT NULL, idx INTEGER NOT NULL, UNIQUE(collocation_id, idx)); \
            CREATE TABLE connection (id INTEGER PRIMARY KEY AUTOINCREMENT, predicate_id INTEGER NOT NULL, actant_id INTEGER NOT NULL, UNIQUE(predicate_id, actant_id)); \
            CREATE TABLE sentence_collocation_junction (sentence_id INTEGER NOT NULL, collocation_id INTEGER NOT NULL, idx INTEGER NOT NULL, word_idxs TEXT NOT NULL, UNIQUE(sentence_id, idx)); \
            CREATE TABLE sentence_connection_junction (sentence_id INTEGER NOT NULL, connection_id INTEGER NOT NULL, idx INTEGER NOT NULL, predicate_idx INTEGER NOT NULL, actant_idx INTEGER NOT NULL, UNIQUE(sentence_id, idx));",
            kind: MigrationType::ReversibleUp,
        },
    ])
}

/// Open (creating if needed) the SQLite file and bring its schema up to date.
pub async fn db_init(db_path: &Path) -> Result<Pool<Sqlite>, LingError> {
    tracing::debug!("Initializing annotation db from file: {:?}", db_path);
    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .read_only(false)
        .create_if_missing(true)
        .disable_statement_logging();

    let pool = Pool::<Sqlite>::connect_with(options).await?;

    let migrator = Migrator::new(migrations()).await.map_err(|e| {
        LingError::Cache(format!("failed to resolve migrations: {e}"))
    })?;
    migrator
        .run(&pool)
        .await
        .map_err(|e| LingError::Cache(format!("failed to run migrations: {e}")))?;

    let sentences: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sentence")
        .fetch_one(&pool)
        .await?;
    let collocations: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM collocation")
        .fetch_one(&pool)
        .await?;
    tracing::info!(
        "DB Connection initialized.\n \
         \tSentence count:\t{:?} \n \
         \tCollocation count:\t{:?}",
        sentences,
        collocations
    );

    Ok(pool)
}
