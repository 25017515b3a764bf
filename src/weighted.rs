// Width-weighted discrete sampling shared by channel lists and spin-parity tables

use rand::Rng;

/// Anything that carries a non-negative sampling weight (a partial width).
pub trait Weighted {
    fn weight(&self) -> f64;
}

/// Sample an index from a sequence of non-negative weights.
///
/// The weights are read through the iterator twice (once for the total, once
/// for the cumulative walk), so callers pass a lazy projection such as
/// `items.iter().map(Weighted::weight)` and nothing is copied.
///
/// A single `u ~ U(0, total)` is drawn and the first index whose running sum
/// exceeds `u` is returned. Returns `None` without drawing when the sequence
/// is empty or the total weight is not positive and finite.
pub fn sample_index<I, R>(weights: I, rng: &mut R) -> Option<usize>
where
    I: IntoIterator<Item = f64>,
    I::IntoIter: Clone,
    R: Rng + ?Sized,
{
    let weights = weights.into_iter();
    let total: f64 = weights.clone().sum();
    if !(total > 0.0 && total.is_finite()) {
        return None;
    }

    let u = rng.gen::<f64>() * total;
    let mut cumulative = 0.0;
    let mut last_positive = None;
    for (i, w) in weights.enumerate() {
        if w <= 0.0 {
            continue;
        }
        cumulative += w;
        last_positive = Some(i);
        if u < cumulative {
            return Some(i);
        }
    }
    // roundoff in the running sum can leave u just above the final total
    last_positive
}

/// Select one element of `items` with probability proportional to its weight.
pub fn select<'a, T, R>(items: &'a [T], rng: &mut R) -> Option<&'a T>
where
    T: Weighted,
    R: Rng + ?Sized,
{
    sample_index(items.iter().map(Weighted::weight), rng).map(|i| &items[i])
}

/// Sum of the weights of `items`
pub fn total_weight<T: Weighted>(items: &[T]) -> f64 {
    items.iter().map(Weighted::weight).sum()
}
