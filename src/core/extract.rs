use crate::models::{Currency, Offering};
use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Fixed USD -> EUR conversion used for magnitude comparisons
pub const DEFAULT_USD_TO_EUR: f64 = 0.92;

/// A comparable value together with the string shown to readers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    pub display: String,
    pub value: f64,
}

impl Attribute {
    pub fn new(display: impl Into<String>, value: f64) -> Self {
        Self {
            display: display.into(),
            value,
        }
    }
}

/// Payout frequency rank table (lower rank = faster payouts)
///
/// Lookup is total: any key missing from the table resolves to `WORST`,
/// so an unrecognised frequency can never win the category.
#[derive(Debug, Clone, PartialEq)]
pub struct PayoutRanks {
    ranks: HashMap<String, u32>,
}

impl PayoutRanks {
    pub const WORST: u32 = 99;

    pub fn new<I, K>(ranks: I) -> Self
    where
        I: IntoIterator<Item = (K, u32)>,
        K: AsRef<str>,
    {
        Self {
            ranks: ranks
                .into_iter()
                .map(|(k, v)| (normalize_key(k.as_ref()), v))
                .collect(),
        }
    }

    pub fn rank(&self, frequency: &str) -> u32 {
        self.ranks
            .get(&normalize_key(frequency))
            .copied()
            .unwrap_or(Self::WORST)
    }

    pub fn len(&self) -> usize {
        self.ranks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }
}

impl Default for PayoutRanks {
    fn default() -> Self {
        Self::new([
            ("on_demand", 1),
            ("daily", 2),
            ("weekly", 3),
            ("biweekly", 4),
            ("monthly", 5),
        ])
    }
}

/// Folds case, hyphens and spaces ("Bi-Weekly" -> "biweekly", "On Demand" -> "on_demand")
fn normalize_key(key: &str) -> String {
    key.trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == '-' || c.is_whitespace() { '_' } else { c })
        .collect::<String>()
        .replace("bi_weekly", "biweekly")
}

/// Immutable lookup tables every extractor reads from
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizationTables {
    pub usd_to_eur: f64,
    pub payout_ranks: PayoutRanks,
    /// Year used to turn `founded_year` into years active
    pub reference_year: u16,
}

impl NormalizationTables {
    pub fn new(usd_to_eur: f64, payout_ranks: PayoutRanks, reference_year: u16) -> Self {
        Self {
            usd_to_eur,
            payout_ranks,
            reference_year,
        }
    }

    /// Convert an amount to EUR, rounded to whole cents so that equal
    /// prices compare exactly equal after conversion.
    pub fn to_eur(&self, amount: f64, currency: Currency) -> f64 {
        let eur = match currency {
            Currency::Eur => amount,
            Currency::Usd => amount * self.usd_to_eur,
        };
        (eur * 100.0).round() / 100.0
    }

    pub fn years_active(&self, offering: &Offering) -> u16 {
        self.reference_year.saturating_sub(offering.founded_year)
    }
}

impl Default for NormalizationTables {
    fn default() -> Self {
        Self {
            usd_to_eur: DEFAULT_USD_TO_EUR,
            payout_ranks: PayoutRanks::default(),
            reference_year: chrono::Utc::now().year() as u16,
        }
    }
}

// ============================================================================
// EXTRACTORS
// ============================================================================

pub fn rating(o: &Offering, _: &NormalizationTables) -> Attribute {
    Attribute::new(format!("{:.1}/5", o.rating), o.rating)
}

pub fn reviews(o: &Offering, _: &NormalizationTables) -> Attribute {
    Attribute::new(group_thousands(o.review_count as u64), o.review_count as f64)
}

pub fn years_active(o: &Offering, t: &NormalizationTables) -> Attribute {
    let years = t.years_active(o);
    let unit = if years == 1 { "year" } else { "years" };
    Attribute::new(
        format!("{} {} (since {})", years, unit, o.founded_year),
        years as f64,
    )
}

pub fn profit_split(o: &Offering, _: &NormalizationTables) -> Attribute {
    Attribute::new(format_percent(o.profit_split_max), o.profit_split_max)
}

/// Cheapest challenge fee. Display keeps the original currency, the value
/// is normalized to EUR. Catalog validation guarantees a non-empty price map.
pub fn price(o: &Offering, t: &NormalizationTables) -> Attribute {
    match o.cheapest_price() {
        Some(amount) => Attribute::new(
            format_money(amount, o.currency),
            t.to_eur(amount, o.currency),
        ),
        None => Attribute::new("N/A", f64::MAX),
    }
}

pub fn max_account(o: &Offering, t: &NormalizationTables) -> Attribute {
    let largest = o.largest_account().unwrap_or(0) as f64;
    Attribute::new(format_money(largest, o.currency), t.to_eur(largest, o.currency))
}

pub fn phases(o: &Offering, _: &NormalizationTables) -> Attribute {
    let display = match o.challenge_phases {
        0 => "Instant funding".to_string(),
        1 => "1 phase".to_string(),
        n => format!("{} phases", n),
    };
    Attribute::new(display, o.challenge_phases as f64)
}

pub fn profit_target(o: &Offering, _: &NormalizationTables) -> Attribute {
    match o.first_phase_target() {
        Some(target) => {
            let display = o
                .profit_target
                .iter()
                .map(|t| format_percent(*t))
                .collect::<Vec<_>>()
                .join(" / ");
            Attribute::new(display, target)
        }
        // No target at all (instant funding) is the easiest possible
        None => Attribute::new("None", 0.0),
    }
}

pub fn daily_loss(o: &Offering, _: &NormalizationTables) -> Attribute {
    match o.max_daily_loss {
        Some(limit) => Attribute::new(format_percent(limit), limit),
        None => Attribute::new("None", 0.0),
    }
}

pub fn max_drawdown(o: &Offering, _: &NormalizationTables) -> Attribute {
    Attribute::new(format_percent(o.max_total_drawdown), o.max_total_drawdown)
}

pub fn min_days(o: &Offering, _: &NormalizationTables) -> Attribute {
    let display = match o.min_trading_days {
        0 => "No minimum".to_string(),
        1 => "1 day".to_string(),
        n => format!("{} days", n),
    };
    Attribute::new(display, o.min_trading_days as f64)
}

pub fn payout_speed(o: &Offering, t: &NormalizationTables) -> Attribute {
    let rank = t.payout_ranks.rank(&o.payout_frequency);
    Attribute::new(humanize(&o.payout_frequency), rank as f64)
}

pub fn platforms(o: &Offering, _: &NormalizationTables) -> Attribute {
    let display = if o.platforms.is_empty() {
        "None listed".to_string()
    } else {
        o.platforms.join(", ")
    };
    Attribute::new(display, o.platforms.len() as f64)
}

pub fn scaling(o: &Offering, t: &NormalizationTables) -> Attribute {
    match o.max_scaling {
        Some(max) if max > 0.0 => {
            Attribute::new(format_money(max, o.currency), t.to_eur(max, o.currency))
        }
        _ => Attribute::new("Not offered", 0.0),
    }
}

// ============================================================================
// FORMATTING
// ============================================================================

pub fn format_money(amount: f64, currency: Currency) -> String {
    if amount.fract() == 0.0 {
        format!("{}{}", currency.symbol(), group_thousands(amount as u64))
    } else {
        format!("{}{:.2}", currency.symbol(), amount)
    }
}

pub fn format_percent(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}%", value as i64)
    } else {
        format!("{}%", value)
    }
}

pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// "bi_weekly" -> "Bi weekly"
fn humanize(key: &str) -> String {
    let spaced = key.trim().replace(['_', '-'], " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
