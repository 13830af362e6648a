use petgraph::{graphmap::DiGraphMap, Direction};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::{Connection, Sentence};
use crate::{
    error::LingError,
    properties::{CollocationIndex, ConnectionIndex},
};

/// Result of [`Sentence::make_default_connections`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DefaultConnections {
    /// Number of connections added. Pairs that already existed are not counted.
    Created(usize),
    /// The sentence does not have exactly one predicate collocation; nothing changed.
    PreconditionNotMet { predicates: usize },
}

impl Sentence {
    /// Indices of the collocations in the predicate group.
    pub fn predicate_collocations(&self) -> Vec<CollocationIndex> {
        self.collocations
            .iter()
            .enumerate()
            .filter(|(_, c)| c.semantic_group == self.predicate)
            .map(|(idx, _)| idx)
            .collect()
    }

    pub(crate) fn check_connection(&self, connection: &Connection) -> Result<(), LingError> {
        let predicate = self.collocation(connection.predicate_idx)?;
        let actant = self.collocation(connection.actant_idx)?;
        if predicate.semantic_group != self.predicate {
            return Err(LingError::Validation(format!(
                "collocation {} is not a predicate",
                connection.predicate_idx
            )));
        }
        if actant.semantic_group == self.predicate {
            return Err(LingError::Validation(format!(
                "collocation {} is a predicate and cannot be an actant",
                connection.actant_idx
            )));
        }
        Ok(())
    }

    /// Connect a predicate collocation to an actant collocation.
    ///
    /// Idempotent: an existing pair is returned instead of being duplicated.
    pub fn make_connection(
        &mut self,
        predicate_idx: CollocationIndex,
        actant_idx: CollocationIndex,
    ) -> Result<ConnectionIndex, LingError> {
        let connection = Connection::new(predicate_idx, actant_idx);
        self.check_connection(&connection)?;
        if let Some(existing) = self.connections.iter().position(|c| *c == connection) {
            return Ok(existing);
        }
        self.connections.push(connection);
        Ok(self.connections.len() - 1)
    }

    /// True when exactly one collocation is in the predicate group.
    pub fn is_default_connectable(&self) -> bool {
        self.predicate_collocations().len() == 1
    }

    /// Connect the single predicate to every other collocation.
    pub fn make_default_connections(&mut self) -> DefaultConnections {
        let predicates = self.predicate_collocations();
        let [predicate_idx] = predicates[..] else {
            tracing::warn!(
                "[Sentence.make_default_connections] need exactly one predicate, found {}",
                predicates.len()
            );
            return DefaultConnections::PreconditionNotMet {
                predicates: predicates.len(),
            };
        };

        let mut created = 0;
        for actant_idx in 0..self.collocations.len() {
            if actant_idx == predicate_idx {
                continue;
            }
            let connection = Connection::new(predicate_idx, actant_idx);
            if !self.connections.contains(&connection) {
                self.connections.push(connection);
                created += 1;
            }
        }
        DefaultConnections::Created(created)
    }

    /// Remove connections by index.
    pub fn delete_connections(&mut self, idxs: &[ConnectionIndex]) -> Result<(), LingError> {
        if let Some(&idx) = idxs.iter().find(|&&idx| idx >= self.connections.len()) {
            return Err(LingError::out_of_range(
                "connection",
                idx,
                self.connections.len(),
            ));
        }
        let removed: BTreeSet<ConnectionIndex> = idxs.iter().copied().collect();
        self.connections = std::mem::take(&mut self.connections)
            .into_iter()
            .enumerate()
            .filter(|(idx, _)| !removed.contains(idx))
            .map(|(_, connection)| connection)
            .collect();
        Ok(())
    }

    /// Every collocation as a node, every connection as a predicate -> actant edge.
    pub fn connection_graph(&self) -> DiGraphMap<CollocationIndex, ()> {
        let mut graph = DiGraphMap::with_capacity(self.collocations.len(), self.connections.len());
        for idx in 0..self.collocations.len() {
            graph.add_node(idx);
        }
        for connection in self.connections.iter() {
            graph.add_edge(connection.predicate_idx, connection.actant_idx, ());
        }
        graph
    }

    /// Actants connected to `predicate_idx`, in ascending order.
    pub fn actants_of(
        &self,
        predicate_idx: CollocationIndex,
    ) -> Result<Vec<CollocationIndex>, LingError> {
        self.collocation(predicate_idx)?;
        let mut actants: Vec<CollocationIndex> = self
            .connection_graph()
            .neighbors_directed(predicate_idx, Direction::Outgoing)
            .collect();
        actants.sort_unstable();
        Ok(actants)
    }
}
