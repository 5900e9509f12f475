use crate::core::{
    error::FilterError,
    filters::{check_broker, is_jurisdiction_excluded},
    scoring::{
        asset_score, base_quality_score, deposit_score, experience_score, fee_score,
        frequency_score, RuleOutcome,
    },
};
use crate::models::{Broker, BrokerScore, UserPreferences};

/// Size of the list returned by interactive filtering
pub const INTERACTIVE_LIMIT: usize = 20;

/// Default size of the explained recommendation list
pub const DEFAULT_RECOMMENDATION_LIMIT: usize = 10;

/// Combines the scoring rules into a ranked shortlist
///
/// # Pipeline
/// 1. Record sanity check
/// 2. Country veto
/// 3. Base quality + one rule per selected preference
/// 4. Drop non-positive scores, stable sort descending, truncate
///
/// Ties keep catalog order.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ranker;

impl Ranker {
    pub fn new() -> Self {
        Self
    }

    /// Score a single broker. A vetoed broker scores 0 with no reasons.
    pub fn score_broker(
        &self,
        broker: &Broker,
        preferences: &UserPreferences,
    ) -> Result<BrokerScore, FilterError> {
        check_broker(broker)?;

        if let Some(country) = preferences.country.as_deref() {
            if is_jurisdiction_excluded(broker, country) {
                return Ok(BrokerScore {
                    broker: broker.clone(),
                    score: 0.0,
                    match_reasons: Vec::new(),
                });
            }
        }

        let mut total = base_quality_score(broker);

        if !preferences.assets.is_empty() {
            merge(&mut total, asset_score(broker, &preferences.assets));
        }
        if let Some(experience) = preferences.experience {
            merge(&mut total, experience_score(broker, experience));
        }
        if let Some(fee) = preferences.fee_preference {
            merge(&mut total, fee_score(broker, fee));
        }
        if let Some(frequency) = preferences.frequency {
            merge(&mut total, frequency_score(broker, frequency));
        }
        if let Some(band) = preferences.deposit_amount {
            merge(&mut total, deposit_score(broker, band));
        }

        if !total.points.is_finite() {
            return Err(FilterError::NonFiniteScore {
                id: broker.id.clone(),
            });
        }

        Ok(BrokerScore {
            broker: broker.clone(),
            score: total.points,
            match_reasons: total.reasons,
        })
    }

    /// Score every broker, keep positive scores and return the best `limit`
    pub fn rank(
        &self,
        brokers: &[Broker],
        preferences: &UserPreferences,
        limit: usize,
    ) -> Result<Vec<BrokerScore>, FilterError> {
        let mut scored = Vec::with_capacity(brokers.len());
        for broker in brokers {
            let result = self.score_broker(broker, preferences)?;
            if result.score > 0.0 {
                scored.push(result);
            }
        }

        // sort_by is stable, so equal scores keep catalog order
        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        scored.truncate(limit);

        tracing::debug!(
            "Ranked {} brokers, returning {} (limit {})",
            brokers.len(),
            scored.len(),
            limit
        );

        Ok(scored)
    }
}

fn merge(total: &mut RuleOutcome, outcome: RuleOutcome) {
    total.points += outcome.points;
    total.reasons.extend(outcome.reasons);
}
