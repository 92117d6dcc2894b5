use rand::seq::SliceRandom;
use rand::Rng;

/// Shown when the alarm goes off.
pub const QUOTES: &[&str] = &[
    "Push yourself, because no one else will.",
    "Don't watch the clock; do what it does. Keep going.",
    "Success doesn't find you. You hunt it down.",
    "Stay positive, work hard, make it happen.",
    "Discipline is choosing between what you want now and what you want most.",
];

#[derive(Debug, Clone, Copy)]
pub struct QuotePool {
    quotes: &'static [&'static str],
}

impl Default for QuotePool {
    fn default() -> Self {
        Self { quotes: QUOTES }
    }
}

impl QuotePool {
    pub fn new(quotes: &'static [&'static str]) -> Self {
        Self { quotes }
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    pub fn random_quote(&self) -> &'static str {
        self.choose_with(&mut rand::thread_rng())
    }

    pub fn choose_with<R: Rng + ?Sized>(&self, rng: &mut R) -> &'static str {
        self.quotes.choose(rng).copied().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn picks_from_the_pool() {
        let pool = QuotePool::default();
        for _ in 0..50 {
            assert!(QUOTES.contains(&pool.random_quote()));
        }
    }

    #[test]
    fn selection_covers_every_quote() {
        let pool = QuotePool::default();
        let mut rng = StdRng::seed_from_u64(7);
        let seen: HashSet<_> = (0..500).map(|_| pool.choose_with(&mut rng)).collect();
        assert_eq!(seen.len(), pool.len());
    }

    #[test]
    fn empty_pool_yields_empty_string() {
        let pool = QuotePool::new(&[]);
        assert!(pool.is_empty());
        assert_eq!(pool.random_quote(), "");
    }
}
