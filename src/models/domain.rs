use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

/// Broker record as stored in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Broker {
    pub id: String,
    pub name: String,
    #[validate(range(min = 0.0, max = 5.0))]
    pub rating: f64,
    #[serde(rename = "trustScore", default)]
    #[validate(range(min = 0.0, max = 10.0))]
    pub trust_score: Option<f64>,
    #[serde(default)]
    pub verified: bool,
    #[serde(default)]
    pub featured: bool,
    #[serde(rename = "spreadsFrom")]
    #[validate(range(min = 0.0))]
    pub spreads_from: f64,
    #[serde(rename = "minDeposit")]
    #[validate(range(min = 0.0))]
    pub min_deposit: f64,
    #[serde(rename = "maxLeverage")]
    #[validate(range(min = 0.0))]
    pub max_leverage: f64,
    #[serde(default)]
    pub platforms: Vec<String>,
    #[serde(rename = "restrictedCountries", default)]
    pub restricted_countries: Vec<String>,
}

impl Broker {
    /// Case-insensitive substring search over the platform tokens
    pub fn has_platform_token(&self, keyword: &str) -> bool {
        self.platforms
            .iter()
            .any(|p| p.to_lowercase().contains(keyword))
    }

    /// True when every numeric field is a finite number
    pub fn is_finite(&self) -> bool {
        self.rating.is_finite()
            && self.trust_score.map_or(true, f64::is_finite)
            && self.spreads_from.is_finite()
            && self.min_deposit.is_finite()
            && self.max_leverage.is_finite()
    }
}

/// Asset classes a user can ask for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetClass {
    Forex,
    Stocks,
    Cfds,
    Crypto,
    Commodities,
    Indices,
    Options,
}

impl AssetClass {
    /// Platform keywords that indicate support for this asset class.
    /// Classes without keywords never produce a positive match.
    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            AssetClass::Forex => &["forex", "mt4", "mt5"],
            AssetClass::Stocks => &["stock", "equity"],
            AssetClass::Cfds => &["cfd"],
            AssetClass::Crypto => &["crypto", "bitcoin"],
            AssetClass::Commodities | AssetClass::Indices | AssetClass::Options => &[],
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AssetClass::Forex => "Forex",
            AssetClass::Stocks => "Stocks/ETFs",
            AssetClass::Cfds => "CFDs",
            AssetClass::Crypto => "Cryptocurrencies",
            AssetClass::Commodities => "Commodities",
            AssetClass::Indices => "Indices",
            AssetClass::Options => "Options",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExperienceLevel {
    FirstTimer,
    Beginner,
    Intermediate,
    Experienced,
    Professional,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FeePreference {
    ZeroCommission,
    LowCost,
    ReasonableFees,
    NotSure,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradingFrequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

/// Initial deposit budget bands offered by the preference wizard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DepositBand {
    #[serde(rename = "<50")]
    UpTo50,
    #[serde(rename = "51-200")]
    From51To200,
    #[serde(rename = "201-500")]
    From201To500,
    #[serde(rename = "501-1000")]
    From501To1000,
    #[serde(rename = "1001-5000")]
    From1001To5000,
    #[serde(rename = ">5000")]
    Over5000,
}

impl DepositBand {
    /// Inclusive `(min, max)` amount range of the band
    pub fn range(self) -> (f64, f64) {
        match self {
            DepositBand::UpTo50 => (0.0, 50.0),
            DepositBand::From51To200 => (51.0, 200.0),
            DepositBand::From201To500 => (201.0, 500.0),
            DepositBand::From501To1000 => (501.0, 1000.0),
            DepositBand::From1001To5000 => (1001.0, 5000.0),
            DepositBand::Over5000 => (5001.0, f64::INFINITY),
        }
    }
}

/// Trading preferences collected by the broker finder wizard.
///
/// Every field is optional. Absent fields neither score nor filter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserPreferences {
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub assets: Vec<AssetClass>,
    #[serde(default)]
    pub experience: Option<ExperienceLevel>,
    #[serde(rename = "feePreference", default)]
    pub fee_preference: Option<FeePreference>,
    #[serde(default)]
    pub frequency: Option<TradingFrequency>,
    #[serde(rename = "depositAmount", default)]
    pub deposit_amount: Option<DepositBand>,
}

/// Why a broker earned points, kept as data so the display layer can restyle it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum MatchReason {
    Verified,
    SupportsAsset { asset: AssetClass },
    LowMinimumDeposit,
    WebPlatform,
    HighLeverage,
    MetaTrader,
    ZeroCommission,
    LowSpreads,
    ReasonableFees,
    ActiveTraderSpreads,
    LongTermFriendly,
    DepositFits {
        #[serde(rename = "minDeposit")]
        min_deposit: f64,
    },
}

impl fmt::Display for MatchReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchReason::Verified => write!(f, "Verified broker"),
            MatchReason::SupportsAsset { asset } => write!(f, "Supports {} trading", asset.label()),
            MatchReason::LowMinimumDeposit => write!(f, "Low minimum deposit, ideal for beginners"),
            MatchReason::WebPlatform => write!(f, "Easy-to-use web platform"),
            MatchReason::HighLeverage => write!(f, "High leverage available for professionals"),
            MatchReason::MetaTrader => write!(f, "Professional MT4/MT5 platforms"),
            MatchReason::ZeroCommission => write!(f, "Zero commission trading"),
            MatchReason::LowSpreads => write!(f, "Low-cost spreads"),
            MatchReason::ReasonableFees => write!(f, "Reasonable fee structure"),
            MatchReason::ActiveTraderSpreads => write!(f, "Tight spreads suited to daily trading"),
            MatchReason::LongTermFriendly => write!(f, "Accessible deposit for long-term investing"),
            MatchReason::DepositFits { min_deposit } => write!(
                f,
                "Minimum deposit of ${} fits your budget",
                format_amount(*min_deposit)
            ),
        }
    }
}

/// Render whole amounts without a fractional part
fn format_amount(amount: f64) -> String {
    if amount.fract() == 0.0 {
        format!("{:.0}", amount)
    } else {
        format!("{:.2}", amount)
    }
}

/// Result of scoring one broker against one set of preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrokerScore {
    pub broker: Broker,
    pub score: f64,
    #[serde(rename = "matchReasons")]
    pub match_reasons: Vec<MatchReason>,
}

/// Ranked broker together with the reasons it matched
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrokerRecommendation {
    pub broker: Broker,
    pub score: f64,
    #[serde(rename = "matchReasons")]
    pub match_reasons: Vec<MatchReason>,
}

impl From<BrokerScore> for BrokerRecommendation {
    fn from(scored: BrokerScore) -> Self {
        Self {
            broker: scored.broker,
            score: scored.score,
            match_reasons: scored.match_reasons,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preferences_deserialize_wizard_payload() {
        let json = r#"{
            "country": "GB",
            "assets": ["forex", "crypto"],
            "experience": "first-timer",
            "feePreference": "zero-commission",
            "frequency": "daily",
            "depositAmount": "<50"
        }"#;

        let prefs: UserPreferences = serde_json::from_str(json).unwrap();

        assert_eq!(prefs.country.as_deref(), Some("GB"));
        assert_eq!(prefs.assets, vec![AssetClass::Forex, AssetClass::Crypto]);
        assert_eq!(prefs.experience, Some(ExperienceLevel::FirstTimer));
        assert_eq!(prefs.fee_preference, Some(FeePreference::ZeroCommission));
        assert_eq!(prefs.frequency, Some(TradingFrequency::Daily));
        assert_eq!(prefs.deposit_amount, Some(DepositBand::UpTo50));
    }

    #[test]
    fn test_empty_preferences() {
        let prefs: UserPreferences = serde_json::from_str("{}").unwrap();
        assert_eq!(prefs, UserPreferences::default());
    }

    #[test]
    fn test_reason_is_tagged() {
        let value = serde_json::to_value(MatchReason::SupportsAsset { asset: AssetClass::Forex }).unwrap();
        assert_eq!(value["kind"], "supports-asset");
        assert_eq!(value["asset"], "forex");
    }

    #[test]
    fn test_deposit_reason_echoes_amount() {
        assert_eq!(
            MatchReason::DepositFits { min_deposit: 50.0 }.to_string(),
            "Minimum deposit of $50 fits your budget"
        );
        assert_eq!(
            MatchReason::DepositFits { min_deposit: 12.5 }.to_string(),
            "Minimum deposit of $12.50 fits your budget"
        );
    }

    #[test]
    fn test_platform_token_case_insensitive() {
        let broker = Broker {
            id: "b".to_string(),
            name: "B".to_string(),
            rating: 4.0,
            trust_score: None,
            verified: false,
            featured: false,
            spreads_from: 1.0,
            min_deposit: 100.0,
            max_leverage: 30.0,
            platforms: vec!["MetaTrader MT5".to_string()],
            restricted_countries: vec![],
        };

        assert!(broker.has_platform_token("mt5"));
        assert!(!broker.has_platform_token("web"));
    }
}
