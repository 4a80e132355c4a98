use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Currency an offering prices its challenges in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    #[serde(rename = "EUR")]
    Eur,
    #[serde(rename = "USD")]
    Usd,
}

impl Currency {
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::Eur => "€",
            Currency::Usd => "$",
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Currency::Eur => "EUR",
            Currency::Usd => "USD",
        }
    }
}

/// A prop firm's evaluation product as listed in the catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Offering {
    pub id: String,
    pub slug: String,
    pub name: String,
    pub rating: f64,
    pub review_count: u32,
    pub profit_split_max: f64,
    /// Account size -> challenge fee, in `currency`
    pub challenge_prices: BTreeMap<u32, f64>,
    pub account_sizes: Vec<u32>,
    pub challenge_phases: u8,
    /// One target (%) per phase, in phase order
    pub profit_target: Vec<f64>,
    #[serde(default)]
    pub max_daily_loss: Option<f64>,
    pub max_total_drawdown: f64,
    #[serde(default)]
    pub time_limit: Option<String>,
    pub min_trading_days: u32,
    pub payout_frequency: String,
    #[serde(default)]
    pub platforms: Vec<String>,
    #[serde(default)]
    pub instruments: Vec<String>,
    pub founded_year: u16,
    #[serde(default)]
    pub max_scaling: Option<f64>,
    #[serde(default)]
    pub is_partner: bool,
    pub currency: Currency,
}

impl Offering {
    /// Cheapest challenge fee in the offering's own currency
    pub fn cheapest_price(&self) -> Option<f64> {
        self.challenge_prices
            .values()
            .copied()
            .min_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
    }

    pub fn largest_account(&self) -> Option<u32> {
        self.account_sizes.iter().copied().max()
    }

    pub fn first_phase_target(&self) -> Option<f64> {
        self.profit_target.first().copied()
    }
}

/// One selectable answer of a quiz question
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizOption {
    pub id: String,
    pub label: String,
    /// Offering id -> contribution (0-5). Offerings not listed contribute 0.
    #[serde(default)]
    pub scores: HashMap<String, u8>,
}

impl QuizOption {
    pub fn contribution(&self, offering_id: &str) -> u8 {
        self.scores.get(offering_id).copied().unwrap_or(0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub id: String,
    pub prompt: String,
    pub options: Vec<QuizOption>,
}

impl QuizQuestion {
    pub fn option(&self, option_id: &str) -> Option<&QuizOption> {
        self.options.iter().find(|o| o.id == option_id)
    }
}

/// Short catalog listing used by selectors
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferingSummary {
    pub id: String,
    pub slug: String,
    pub name: String,
    pub rating: f64,
    pub is_partner: bool,
}

impl From<&Offering> for OfferingSummary {
    fn from(offering: &Offering) -> Self {
        Self {
            id: offering.id.clone(),
            slug: offering.slug.clone(),
            name: offering.name.clone(),
            rating: offering.rating,
            is_partner: offering.is_partner,
        }
    }
}
