//! The Bayesian Engine: counting primitives, marginal / pairwise /
//! conditional probabilities, and roulette-wheel sampling over stored
//! relations.

use crate::filter::{self, Comparator};
use crate::index::IndexEngine;
use crate::model::AttributeBucket;
use crate::store::{Store, StoreResult};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;

/// An injected source of randomness for roulette-wheel sampling, kept
/// separate from the engine so callers can substitute a deterministic
/// sequence in tests.
pub trait SamplerRng: Send + Sync + std::fmt::Debug {
    /// Draw a uniformly-distributed integer in `1..=max` (inclusive).
    /// `max` is always `>= 1`.
    fn draw(&self, max: u64) -> u64;
}

/// Default RNG backed by `rand::rngs::StdRng`.
#[derive(Debug)]
pub struct StdRngSampler {
    rng: Mutex<StdRng>,
}

impl StdRngSampler {
    /// Seed from the OS entropy source.
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Seed deterministically — for tests that need reproducible draws.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Default for StdRngSampler {
    fn default() -> Self {
        Self::new()
    }
}

impl SamplerRng for StdRngSampler {
    fn draw(&self, max: u64) -> u64 {
        self.rng.lock().unwrap().gen_range(1..=max)
    }
}

/// Walk cumulative weights until the drawn pivot falls inside a slot,
/// returning that slot's index. `weights` must be non-empty and every
/// weight `>= 1`.
fn roulette_pick(weights: &[u64], rng: &dyn SamplerRng) -> usize {
    let total: u64 = weights.iter().sum();
    let pivot = rng.draw(total);
    let mut cumulative = 0u64;
    for (i, weight) in weights.iter().enumerate() {
        cumulative += weight;
        if pivot <= cumulative {
            return i;
        }
    }
    weights.len() - 1
}

/// Counting and probability queries over an [`IndexEngine`], plus
/// roulette-wheel sampling driven by an injected [`SamplerRng`].
#[derive(Debug)]
pub struct BayesianEngine<'a, S: Store> {
    index: &'a IndexEngine<S>,
}

impl<'a, S: Store> BayesianEngine<'a, S> {
    pub fn new(index: &'a IndexEngine<S>) -> Self {
        Self { index }
    }

    /// Sum of `instance_count` across every stored instance of the `(left,
    /// right)` relation.
    pub async fn count_relations(&self, left: &str, right: &str) -> StoreResult<u64> {
        self.index.compute_relations_count(left, right).await
    }

    /// Sum of `instance_count` across every stored relation in which
    /// `entity` appears, on either side.
    pub async fn count_entity_in_relations(&self, entity: &str) -> StoreResult<u64> {
        let mut total = 0u64;
        for key in self.index_keys("rel+*").await? {
            if let Some(relation) = self.load_relation_key(&key).await? {
                if relation.left == entity || relation.right == entity {
                    total += relation.instance_count;
                }
            }
        }
        Ok(total)
    }

    /// `P(entity)`: the entity's share of the global relation count.
    pub async fn compute_marginal(&self, entity: &str) -> StoreResult<f64> {
        let total = self.index.get_relation_count_total().await?;
        if total == 0 {
            return Ok(0.0);
        }
        Ok(self.count_entity_in_relations(entity).await? as f64 / total as f64)
    }

    /// `P(left, right)`: the `(left, right)` relation's share of the
    /// global relation count.
    pub async fn compute_pairwise(&self, left: &str, right: &str) -> StoreResult<f64> {
        let total = self.index.get_relation_count_total().await?;
        if total == 0 {
            return Ok(0.0);
        }
        Ok(self.count_relations(left, right).await? as f64 / total as f64)
    }

    /// `P(target | given)`: the `(given, target)` relation count divided
    /// by `given`'s total participation count.
    pub async fn compute_conditional(&self, given: &str, target: &str) -> StoreResult<f64> {
        let denominator = self.count_entity_in_relations(given).await?;
        if denominator == 0 {
            return Ok(0.0);
        }
        Ok(self.count_relations(given, target).await? as f64 / denominator as f64)
    }

    /// Weighted-random entity among every relation's two sides, optionally
    /// restricted to relations surviving `bucket`/`cmp`. Weight is each
    /// relation's `instance_count`, contributed once per side.
    pub async fn sample_marginal(
        &self,
        bucket: &AttributeBucket,
        cmp: Comparator,
        rng: &dyn SamplerRng,
    ) -> StoreResult<Option<String>> {
        let relations = self.filtered_relations("rel+*", bucket, cmp).await?;
        let mut candidates = Vec::new();
        for relation in &relations {
            candidates.push((relation.left.clone(), relation.instance_count));
            candidates.push((relation.right.clone(), relation.instance_count));
        }
        Ok(Self::weighted_pick(&candidates, rng))
    }

    /// Weighted-random entity related to `left`, optionally restricted to
    /// relations surviving `bucket`/`cmp`. Weight is each candidate
    /// relation's `instance_count`.
    pub async fn sample_pairwise(
        &self,
        left: &str,
        bucket: &AttributeBucket,
        cmp: Comparator,
        rng: &dyn SamplerRng,
    ) -> StoreResult<Option<String>> {
        let relations = self.filtered_relations("rel+*", bucket, cmp).await?;
        let candidates: Vec<(String, u64)> = relations
            .into_iter()
            .filter_map(|relation| {
                if relation.left == left {
                    Some((relation.right, relation.instance_count))
                } else if relation.right == left {
                    Some((relation.left, relation.instance_count))
                } else {
                    None
                }
            })
            .collect();
        Ok(Self::weighted_pick(&candidates, rng))
    }

    /// Like [`Self::sample_pairwise`], but only among relations `left`
    /// caused (`relation.cause == left`).
    pub async fn sample_pairwise_causal(
        &self,
        left: &str,
        bucket: &AttributeBucket,
        cmp: Comparator,
        rng: &dyn SamplerRng,
    ) -> StoreResult<Option<String>> {
        let relations = self.filtered_relations("rel+*", bucket, cmp).await?;
        let candidates: Vec<(String, u64)> = relations
            .into_iter()
            .filter(|relation| relation.cause == left)
            .filter_map(|relation| {
                if relation.left == left {
                    Some((relation.right, relation.instance_count))
                } else if relation.right == left {
                    Some((relation.left, relation.instance_count))
                } else {
                    None
                }
            })
            .collect();
        Ok(Self::weighted_pick(&candidates, rng))
    }

    fn weighted_pick(candidates: &[(String, u64)], rng: &dyn SamplerRng) -> Option<String> {
        if candidates.is_empty() {
            return None;
        }
        let weights: Vec<u64> = candidates.iter().map(|(_, w)| *w).collect();
        let index = roulette_pick(&weights, rng);
        Some(candidates[index].0.clone())
    }

    async fn index_keys(&self, pattern: &str) -> StoreResult<Vec<String>> {
        self.index.fetch_relation_prefix_keys(pattern).await
    }

    async fn load_relation_key(&self, key: &str) -> StoreResult<Option<crate::model::Relation>> {
        self.index.load_relation_at_key(key).await
    }

    async fn filtered_relations(
        &self,
        pattern: &str,
        bucket: &AttributeBucket,
        cmp: Comparator,
    ) -> StoreResult<Vec<crate::model::Relation>> {
        let mut all = Vec::new();
        for key in self.index_keys(pattern).await? {
            if let Some(relation) = self.load_relation_key(&key).await? {
                all.push(relation);
            }
        }
        Ok(filter::filter(&all, bucket, cmp))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emit::NoopEmitter;
    use crate::keys::KeyLayout;
    use crate::model::{AttributeTuple, Relation};
    use crate::store::InMemoryStore;
    use std::sync::Arc;

    async fn setup() -> IndexEngine<InMemoryStore> {
        let engine = IndexEngine::new(
            Arc::new(InMemoryStore::new()),
            KeyLayout::default(),
            Arc::new(NoopEmitter),
        );
        engine.write_relation(&Relation::new("alice", "bob")).await.unwrap();
        engine.write_relation(&Relation::new("alice", "bob")).await.unwrap();
        engine.write_relation(&Relation::new("alice", "carol")).await.unwrap();
        engine
    }

    struct FixedRng(std::sync::Mutex<u64>);
    impl std::fmt::Debug for FixedRng {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "FixedRng")
        }
    }
    impl SamplerRng for FixedRng {
        fn draw(&self, _max: u64) -> u64 {
            *self.0.lock().unwrap()
        }
    }

    #[tokio::test]
    async fn counts_sum_instance_counts() {
        let index = setup().await;
        let bayes = BayesianEngine::new(&index);
        assert_eq!(bayes.count_relations("alice", "bob").await.unwrap(), 2);
        assert_eq!(bayes.count_entity_in_relations("alice").await.unwrap(), 3);
    }

    #[tokio::test]
    async fn marginal_and_pairwise_probabilities() {
        let index = setup().await;
        let bayes = BayesianEngine::new(&index);
        // total = 3 (2 alice-bob + 1 alice-carol)
        assert!((bayes.compute_pairwise("alice", "bob").await.unwrap() - 2.0 / 3.0).abs() < 1e-9);
        assert!((bayes.compute_marginal("alice").await.unwrap() - 1.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn conditional_divides_by_given_participation() {
        let index = setup().await;
        let bayes = BayesianEngine::new(&index);
        // alice participates in 3 total instances; alice-bob is 2 of them
        assert!((bayes.compute_conditional("alice", "bob").await.unwrap() - 2.0 / 3.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn compute_conditional_with_no_participation_is_zero() {
        let index = setup().await;
        let bayes = BayesianEngine::new(&index);
        assert_eq!(bayes.compute_conditional("nobody", "bob").await.unwrap(), 0.0);
    }

    #[tokio::test]
    async fn sample_pairwise_only_returns_connected_entities() {
        let index = setup().await;
        let bayes = BayesianEngine::new(&index);
        let bucket = AttributeBucket::new();
        let rng = FixedRng(std::sync::Mutex::new(1));
        let result = bayes
            .sample_pairwise("alice", &bucket, Comparator::Eq, &rng)
            .await
            .unwrap();
        assert!(matches!(result.as_deref(), Some("bob") | Some("carol")));
    }

    #[tokio::test]
    async fn sample_pairwise_returns_none_for_disconnected_entity() {
        let index = setup().await;
        let bayes = BayesianEngine::new(&index);
        let bucket = AttributeBucket::new();
        let rng = FixedRng(std::sync::Mutex::new(1));
        let result = bayes
            .sample_pairwise("nobody", &bucket, Comparator::Eq, &rng)
            .await
            .unwrap();
        assert_eq!(result, None);
    }

    #[tokio::test]
    async fn roulette_pick_respects_weights_at_boundaries() {
        let rng_low = FixedRng(std::sync::Mutex::new(1));
        let rng_high = FixedRng(std::sync::Mutex::new(3));
        assert_eq!(roulette_pick(&[2, 1], &rng_low), 0);
        assert_eq!(roulette_pick(&[2, 1], &rng_high), 1);
    }

    #[tokio::test]
    async fn sample_pairwise_causal_restricts_to_causing_side() {
        let index = IndexEngine::new(
            Arc::new(InMemoryStore::new()),
            KeyLayout::default(),
            Arc::new(NoopEmitter),
        );
        let mut r1 = Relation::new("alice", "bob");
        r1.set_cause("bob");
        index.write_relation(&r1).await.unwrap();

        let bayes = BayesianEngine::new(&index);
        let bucket = AttributeBucket::new();
        let rng = FixedRng(std::sync::Mutex::new(1));
        let result = bayes
            .sample_pairwise_causal("alice", &bucket, Comparator::Eq, &rng)
            .await
            .unwrap();
        assert_eq!(result, None);
    }

    #[tokio::test]
    async fn sample_marginal_filters_through_bucket() {
        let index = setup().await;
        let bayes = BayesianEngine::new(&index);
        let mut bucket = AttributeBucket::new();
        bucket.add(AttributeTuple::new(
            "alice",
            "missing_field",
            "x",
            crate::column::ColumnType::String,
        ));
        let rng = FixedRng(std::sync::Mutex::new(1));
        // bucket references a field no relation declares, so every relation
        // is disqualified and sampling finds nothing.
        let result = bayes
            .sample_marginal(&bucket, Comparator::Eq, &rng)
            .await
            .unwrap();
        assert_eq!(result, None);
    }
}
