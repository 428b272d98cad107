//! Invalidation Graph
//!
//! Static "invalidate A => also invalidate B" rules between entity types.

use std::collections::{HashSet, VecDeque};

use serde::Serialize;

use crate::cache::EntityType;

// == Invalidation Rule ==
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InvalidationRule {
    pub source: EntityType,
    pub target: EntityType,
}

// == Invalidation Graph ==
#[derive(Debug, Clone, Default)]
pub struct InvalidationGraph {
    rules: Vec<InvalidationRule>,
}

impl InvalidationGraph {
    /// A graph with no rules.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The fleet's rules. Group summaries embed truck counts, so trucks
    /// invalidate groups.
    pub fn fleet() -> Self {
        Self::empty().with_rule(EntityType::Trucks, EntityType::Groups)
    }

    pub fn with_rule(mut self, source: EntityType, target: EntityType) -> Self {
        let rule = InvalidationRule { source, target };
        if !self.rules.contains(&rule) {
            self.rules.push(rule);
        }
        self
    }

    pub fn rules(&self) -> &[InvalidationRule] {
        &self.rules
    }

    // == Cascade ==
    /// Every type invalidated by invalidating `source`, `source` first.
    ///
    /// Walks breadth-first and visits each type once, so cyclic rule sets
    /// still terminate.
    pub fn cascade(&self, source: EntityType) -> Vec<EntityType> {
        let mut order = Vec::new();
        let mut seen = HashSet::new();
        let mut queue = VecDeque::from([source]);

        while let Some(current) = queue.pop_front() {
            if !seen.insert(current) {
                continue;
            }
            order.push(current);
            queue.extend(
                self.rules
                    .iter()
                    .filter(|rule| rule.source == current)
                    .map(|rule| rule.target),
            );
        }

        order
    }
}
