use std::collections::HashMap;
use std::hash::Hash;

/// A sparse weight map over items, used as the context of a sense.
pub type Context<V> = HashMap<V, f64>;

/// Similarity between two sparse weight maps over items.
///
/// Implementations must be symmetric and non-negative.
pub trait ContextSimilarity<V>: Send + Sync {
    fn similarity(&self, a: &Context<V>, b: &Context<V>) -> f64;
}

/// Cosine similarity over the sparse maps treated as vectors. Zero when
/// either map has zero norm.
#[derive(Debug, Clone, Copy, Default)]
pub struct CosineSimilarity;

impl<V: Eq + Hash> ContextSimilarity<V> for CosineSimilarity {
    fn similarity(&self, a: &Context<V>, b: &Context<V>) -> f64 {
        // Walk the smaller map against the larger one.
        let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
        let mut dot = 0.0;
        for (item, weight) in small {
            if let Some(other) = large.get(item) {
                dot += weight * other;
            }
        }
        let norm_a: f64 = a.values().map(|w| w * w).sum::<f64>().sqrt();
        let norm_b: f64 = b.values().map(|w| w * w).sum::<f64>().sqrt();
        if norm_a == 0.0 || norm_b == 0.0 {
            return 0.0;
        }
        dot / (norm_a * norm_b)
    }
}

#[cfg(test)]
mod test_similarity {
    use super::*;

    fn context(entries: &[(&'static str, f64)]) -> Context<&'static str> {
        entries.iter().cloned().collect()
    }

    #[test]
    fn test_cosine_identical() {
        let a = context(&[("x", 1.0), ("y", 2.0)]);
        let sim = CosineSimilarity.similarity(&a, &a);
        assert!((sim - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_cosine_orthogonal() {
        let a = context(&[("x", 1.0)]);
        let b = context(&[("y", 1.0)]);
        assert_eq!(CosineSimilarity.similarity(&a, &b), 0.0);
    }

    #[test]
    fn test_cosine_empty_is_zero() {
        let a = context(&[("x", 1.0)]);
        let empty = Context::new();
        assert_eq!(CosineSimilarity.similarity(&a, &empty), 0.0);
        assert_eq!(CosineSimilarity.similarity(&empty, &empty), 0.0);
    }

    #[test]
    fn test_cosine_symmetric() {
        let a = context(&[("x", 1.0), ("y", 3.0)]);
        let b = context(&[("y", 2.0), ("z", 5.0)]);
        assert_eq!(
            CosineSimilarity.similarity(&a, &b),
            CosineSimilarity.similarity(&b, &a)
        );
    }
}
