use crate::models::{
    AssetClass, Broker, DepositBand, ExperienceLevel, FeePreference, MatchReason,
    TradingFrequency,
};

/// Flat credit for a selected dimension with no positive match
pub const FALLBACK_POINTS: f64 = 5.0;

/// Points and reasons contributed by one rule
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleOutcome {
    pub points: f64,
    pub reasons: Vec<MatchReason>,
}

impl RuleOutcome {
    fn add(&mut self, points: f64, reason: Option<MatchReason>) {
        self.points += points;
        if let Some(reason) = reason {
            self.reasons.push(reason);
        }
    }
}

/// Preference-independent quality score
///
/// score = rating * 10 + trustScore * 5 + 20 (verified) + 10 (featured)
pub fn base_quality_score(broker: &Broker) -> RuleOutcome {
    let mut outcome = RuleOutcome::default();

    outcome.add(broker.rating * 10.0, None);

    if let Some(trust) = broker.trust_score {
        outcome.add(trust * 5.0, None);
    }

    if broker.verified {
        outcome.add(20.0, Some(MatchReason::Verified));
    }

    if broker.featured {
        outcome.add(10.0, None);
    }

    outcome
}

/// Score the selected asset classes against the broker's platform tokens
pub fn asset_score(broker: &Broker, assets: &[AssetClass]) -> RuleOutcome {
    let mut outcome = RuleOutcome::default();

    for &asset in assets {
        let supported = asset
            .keywords()
            .iter()
            .any(|keyword| broker.has_platform_token(keyword));

        if supported {
            outcome.add(15.0, Some(MatchReason::SupportsAsset { asset }));
        } else {
            outcome.add(FALLBACK_POINTS, None);
        }
    }

    outcome
}

pub fn experience_score(broker: &Broker, experience: ExperienceLevel) -> RuleOutcome {
    let mut outcome = RuleOutcome::default();

    match experience {
        ExperienceLevel::FirstTimer => {
            if broker.min_deposit <= 100.0 {
                outcome.add(20.0, Some(MatchReason::LowMinimumDeposit));
            }
            if broker.has_platform_token("web") {
                outcome.add(10.0, Some(MatchReason::WebPlatform));
            }
        }
        ExperienceLevel::Professional => {
            if broker.max_leverage >= 100.0 {
                outcome.add(15.0, Some(MatchReason::HighLeverage));
            }
            if broker.has_platform_token("mt4") || broker.has_platform_token("mt5") {
                outcome.add(15.0, Some(MatchReason::MetaTrader));
            }
        }
        _ => outcome.add(FALLBACK_POINTS, None),
    }

    outcome
}

pub fn fee_score(broker: &Broker, fee: FeePreference) -> RuleOutcome {
    let mut outcome = RuleOutcome::default();

    match fee {
        FeePreference::ZeroCommission => {
            if broker.spreads_from == 0.0 {
                outcome.add(25.0, Some(MatchReason::ZeroCommission));
            }
        }
        FeePreference::LowCost => {
            if broker.spreads_from <= 1.0 {
                outcome.add(20.0, Some(MatchReason::LowSpreads));
            }
        }
        FeePreference::ReasonableFees => {
            if broker.spreads_from <= 3.0 {
                outcome.add(15.0, Some(MatchReason::ReasonableFees));
            }
        }
        FeePreference::NotSure => outcome.add(FALLBACK_POINTS, None),
    }

    outcome
}

pub fn frequency_score(broker: &Broker, frequency: TradingFrequency) -> RuleOutcome {
    let mut outcome = RuleOutcome::default();

    match frequency {
        TradingFrequency::Daily => {
            if broker.spreads_from <= 1.0 {
                outcome.add(20.0, Some(MatchReason::ActiveTraderSpreads));
            }
        }
        TradingFrequency::Yearly => {
            if broker.min_deposit <= 500.0 {
                outcome.add(15.0, Some(MatchReason::LongTermFriendly));
            }
        }
        TradingFrequency::Weekly | TradingFrequency::Monthly => {
            outcome.add(FALLBACK_POINTS, None)
        }
    }

    outcome
}

/// Award points when the broker's minimum deposit fits inside the budget band
pub fn deposit_score(broker: &Broker, band: DepositBand) -> RuleOutcome {
    let mut outcome = RuleOutcome::default();

    let (_, max) = band.range();
    if broker.min_deposit <= max {
        outcome.add(
            20.0,
            Some(MatchReason::DepositFits {
                min_deposit: broker.min_deposit,
            }),
        );
    }

    outcome
}
