use std::collections::{HashMap, HashSet};
use std::fmt;
use std::fmt::{Debug, Display, Formatter};
use std::hash::Hash;

use crate::error::{ClusterError, Result};
use crate::maximizer::argmax_filtered;
use crate::similarity::{Context, ContextSimilarity};

/// A sense of an item: the pair of the item and a per-item index.
///
/// Indices are assigned densely from zero, one per induced sense. Equality
/// and hashing are on the whole pair, so `(x, 0)` constructed twice is the
/// same sense.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Sense<V> {
    item: V,
    index: usize,
}

impl<V> Sense<V> {
    pub fn new(item: V, index: usize) -> Self {
        Sense { item, index }
    }

    /// The item this sense belongs to.
    pub fn item(&self) -> &V {
        &self.item
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn into_item(self) -> V {
        self.item
    }
}

impl<V: Display> Display for Sense<V> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.item, self.index)
    }
}

/// The sense inventory: for each item, the contexts of its induced senses.
pub type SenseInventory<V> = HashMap<V, HashMap<Sense<V>, Context<V>>>;

/// The disambiguated contexts: for each sense, the chosen sense of every
/// neighbor together with the neighbor's weight.
pub type SenseContexts<V> = HashMap<Sense<V>, HashMap<Sense<V>, f64>>;

/// Disambiguate a context against the sense inventory.
///
/// For every item of the context not in `exclude`, the sense of that item
/// whose own context is most similar to `context` is selected; ties go to
/// the lowest sense index. Items absent from the inventory, or present with
/// no senses, are skipped. An item whose senses all score a non-finite
/// similarity cannot be resolved and fails the run.
pub fn disambiguate<V>(
    inventory: &SenseInventory<V>,
    similarity: &dyn ContextSimilarity<V>,
    context: &Context<V>,
    exclude: &HashSet<V>,
) -> Result<HashMap<Sense<V>, f64>>
where
    V: Clone + Eq + Hash + Debug,
{
    let mut result = HashMap::new();
    for (item, weight) in context {
        if exclude.contains(item) {
            continue;
        }
        let senses = match inventory.get(item) {
            Some(senses) if !senses.is_empty() => senses,
            _ => continue,
        };

        // Visit the senses in ascending index order so ties resolve the
        // same way on every run.
        let mut candidates: Vec<(&Sense<V>, &Context<V>)> = senses.iter().collect();
        candidates.sort_by_key(|(sense, _)| sense.index());

        let best = argmax_filtered(
            candidates
                .into_iter()
                .map(|(sense, candidate)| (sense, similarity.similarity(context, candidate))),
            |(_, score)| score.is_finite(),
            |&(_, score)| score,
        );
        match best {
            Some((sense, _)) => {
                result.insert(sense.clone(), *weight);
            }
            None => {
                return Err(ClusterError::SenseUnresolved {
                    item: format!("{:?}", item),
                })
            }
        }
    }
    Ok(result)
}
