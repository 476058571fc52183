use std::cmp::Ordering;

use rand::seq::IteratorRandom;
use rand::Rng;

/// Find the first argument of the maximum of the scoring function.
///
/// Single pass; the first element achieving the maximum score wins.
pub fn argmax<T, S, I, F>(items: I, scorer: F) -> Option<T>
where
    I: IntoIterator<Item = T>,
    S: PartialOrd,
    F: FnMut(&T) -> S,
{
    argmax_filtered(items, |_| true, scorer)
}

/// Find the first argument of the maximum among the elements passing the
/// filter. `None` iff no element passes.
pub fn argmax_filtered<T, S, I, P, F>(items: I, mut filter: P, mut scorer: F) -> Option<T>
where
    I: IntoIterator<Item = T>,
    S: PartialOrd,
    P: FnMut(&T) -> bool,
    F: FnMut(&T) -> S,
{
    let mut best: Option<(T, S)> = None;
    for item in items {
        if !filter(&item) {
            continue;
        }
        let score = scorer(&item);
        match &best {
            Some((_, top)) if score.partial_cmp(top) != Some(Ordering::Greater) => {}
            _ => best = Some((item, score)),
        }
    }
    best.map(|(item, _)| item)
}

/// Find all arguments tied at the maximum and pick one uniformly at random.
/// `None` iff the input is empty.
pub fn argmax_random<T, S, I, F, R>(items: I, mut scorer: F, rng: &mut R) -> Option<T>
where
    I: IntoIterator<Item = T>,
    S: PartialOrd,
    F: FnMut(&T) -> S,
    R: Rng + ?Sized,
{
    let mut ties: Vec<T> = Vec::new();
    let mut top: Option<S> = None;
    for item in items {
        let score = scorer(&item);
        let ordering = match &top {
            None => Ordering::Greater,
            Some(best) => score.partial_cmp(best).unwrap_or(Ordering::Less),
        };
        if ordering == Ordering::Greater {
            ties.clear();
            top = Some(score);
        }
        if ordering != Ordering::Less {
            ties.push(item);
        }
    }
    ties.into_iter().choose(rng)
}
