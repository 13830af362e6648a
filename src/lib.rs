//! # ling-core
//!
//! A Rust library for annotating sentences with semantic roles and persisting those
//! annotations in a deduplicated, content-addressed SQLite store.
//!
//! ## Overview
//!
//! An analyst tags groups of words in a sentence ("collocations") with semantic roles such as
//! agent, predicate or object, and links each predicate to its actants ("connections"). The
//! library keeps both structures consistent across edits and saves them so that re-saving a
//! sentence, or saving another sentence with the same normalized content, never duplicates rows.
//!
//! ### Key Features
//!
//! - **Word-index partition model**: a word belongs to at most one collocation, always
//! - **Index-safe edits**: removing or joining collocations remaps every surviving connection
//! - **Morphological normalization**: pluggable analyzer behind a memoizing normalizer
//! - **Content-addressed persistence**: words keyed by normalized form, collocations by hash
//! - **Atomic saves**: a sentence is replaced inside one transaction or not at all
//!
//! ## Architecture
//!
//! - **[`tokenizer`]** and **[`text`]**: raw text to words, non-word fragments and sentences
//! - **[`morph`]**: `MorphAnalyzer` trait, `Normalizer` cache, bundled analyzers
//! - **[`sentence`]**: the annotation model (collocations and connections)
//! - **[`commands`]**: enum-dispatched edit commands over a sentence
//! - **[`store`]**, **[`db`]** and **[`sync`]**: persisted rows, SQLite store, save/load
//! - **[`config`]** and **[`session`]**: TOML configuration and the explicit session context
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ling_core::{config::LingConfig, session::Session};
//!
//! # async fn demo() -> Result<(), ling_core::LingError> {
//! let session = Session::open_with_dictionary(LingConfig::default()).await?;
//! let groups = session.semantic_groups();
//! let agent = groups.id_by_name("Агент").expect("seeded");
//! let object = groups.id_by_name("Объект").expect("seeded");
//!
//! let mut sentence = session.new_sentence("Летчик пилотировал самолет");
//! sentence.tag(&[0], agent)?;
//! sentence.tag(&[1], session.predicate_group())?;
//! sentence.tag(&[2], object)?;
//! sentence.make_default_connections();
//! let id = session.save(&sentence).await?;
//! println!("{} saved as {id}", session.render(&sentence));
//! # Ok(())
//! # }
//! ```

pub mod commands;
pub mod config;
pub mod db;
pub mod error;
pub mod morph;
pub mod properties;
pub mod sentence;
pub mod session;
pub mod store;
pub mod sync;
pub mod text;
pub mod tokenizer;
#[cfg(test)]
mod tests;

pub use error::*;
