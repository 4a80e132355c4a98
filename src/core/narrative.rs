//! Prose for comparison pages and quiz results.
//!
//! Everything here reads winners, tallies and percentages that the scoring
//! modules already produced. Nothing in this module compares two values, so
//! the prose can never disagree with the tables it sits next to.

use crate::core::categories::{CategoryResult, Outcome};
use crate::core::comparator::NwayResult;
use crate::core::quiz::QuizResult;
use crate::core::verdict::{CategoryTable, WeightedOutcome};
use crate::models::Offering;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqEntry {
    pub question: String,
    pub answer: String,
}

/// Display names for the offerings in one comparison
#[derive(Debug, Clone, Copy)]
pub struct Names<'a> {
    offerings: &'a [&'a Offering],
}

impl<'a> Names<'a> {
    pub fn new(offerings: &'a [&'a Offering]) -> Self {
        Self { offerings }
    }

    pub fn of<'s>(&'s self, offering_id: &'s str) -> &'s str {
        self.offerings
            .iter()
            .find(|o| o.id == offering_id)
            .map(|o| o.name.as_str())
            .unwrap_or(offering_id)
    }
}

fn category_phrase(category: &str) -> Option<&'static str> {
    Some(match category {
        "rating" => "strong trader reviews",
        "reviews" => "a large, proven trader base",
        "years_active" => "an established track record",
        "profit_split" => "a higher profit split",
        "price" => "a low entry fee",
        "max_account" => "large account sizes",
        "phases" => "a shorter evaluation",
        "profit_target" => "lower profit targets",
        "daily_loss" => "more daily loss room",
        "max_drawdown" => "a wider drawdown limit",
        "min_days" => "fewer required trading days",
        "payout_speed" => "frequent payouts",
        "platforms" => "a choice of platforms",
        "scaling" => "long-term scaling",
        _ => return None,
    })
}

fn factor_phrase(factor: &str) -> &str {
    match factor {
        "rating" => "its rating",
        "reviews" => "its review volume",
        "years_active" => "its longer track record",
        "profit_split" => "its profit split",
        "price" => "its lower price",
        "partner" => "its verified partner status",
        other => other,
    }
}

/// "a", "a and b", "a, b and c"
fn join_list<S: AsRef<str>>(items: &[S]) -> String {
    match items {
        [] => String::new(),
        [one] => one.as_ref().to_string(),
        [init @ .., last] => format!(
            "{} and {}",
            init.iter().map(|s| s.as_ref()).collect::<Vec<_>>().join(", "),
            last.as_ref()
        ),
    }
}

/// One sentence describing a category row
pub fn category_explanation(row: &CategoryResult, names: &Names) -> String {
    let label = row.label.to_lowercase();
    match &row.outcome {
        Outcome::Winner(winner) => {
            let winning = row.value_of(winner).map(|v| v.display.as_str()).unwrap_or("-");
            let others: Vec<String> = row
                .values
                .iter()
                .filter(|v| &v.offering_id != winner)
                .map(|v| format!("{} for {}", v.display, names.of(&v.offering_id)))
                .collect();
            format!(
                "{} leads on {} with {}, against {}.",
                names.of(winner),
                label,
                winning,
                join_list(&others)
            )
        }
        Outcome::Tie => {
            let values: Vec<String> = row
                .values
                .iter()
                .map(|v| format!("{} {}", names.of(&v.offering_id), v.display))
                .collect();
            format!("No firm stands out on {} ({}).", label, join_list(&values))
        }
    }
}

/// Who an offering suits, based on the rows it won
pub fn best_for(offering_id: &str, rows: &[CategoryResult]) -> String {
    let phrases: Vec<&str> = rows
        .iter()
        .filter(|r| r.outcome.is_won_by(offering_id))
        .filter_map(|r| category_phrase(&r.category))
        .take(3)
        .collect();

    if phrases.is_empty() {
        "Traders who prefer its specific rule set over headline numbers.".to_string()
    } else {
        format!("Traders who want {}.", join_list(&phrases))
    }
}

/// Short prose for the weighted verdict
pub fn quick_verdict(verdict: &WeightedOutcome, names: &Names) -> String {
    match &verdict.outcome {
        Outcome::Winner(winner) => {
            let (win, lose): (Vec<_>, Vec<_>) =
                verdict.scores.iter().partition(|s| &s.offering_id == winner);
            let (Some(win), Some(lose)) = (win.first(), lose.first()) else {
                return format!("{} comes out ahead overall.", names.of(winner));
            };
            let factors: Vec<&str> = win.factors.iter().map(|f| factor_phrase(f)).collect();
            format!(
                "{} comes out ahead overall ({:.1} vs {:.1} points), helped by {}.",
                names.of(winner),
                win.score,
                lose.score,
                join_list(&factors)
            )
        }
        Outcome::Tie => {
            let ids: Vec<&str> = verdict
                .scores
                .iter()
                .map(|s| names.of(&s.offering_id))
                .collect();
            let points = verdict.scores.first().map(|s| s.score).unwrap_or(0.0);
            format!(
                "{} are evenly matched overall ({:.1} points each).",
                join_list(&ids),
                points
            )
        }
    }
}

/// Closing paragraph. When the category tally and the weighted verdict point
/// at different firms, both are stated.
pub fn conclusion(table: &CategoryTable, verdict: &WeightedOutcome, names: &Names) -> String {
    let tally: Vec<String> = table
        .wins
        .iter()
        .map(|w| format!("{} wins {}", names.of(&w.offering_id), w.wins))
        .collect();
    let mut text = format!(
        "Across {} categories, {}, with {} level.",
        table.rows.len(),
        join_list(&tally),
        table.ties
    );

    let leader = table.leader();
    match (&leader, &verdict.outcome) {
        (l, v) if l == v => match v {
            Outcome::Winner(w) => text.push_str(&format!(
                " The overall verdict agrees: {} is the stronger pick.",
                names.of(w)
            )),
            Outcome::Tie => text.push_str(" Overall, neither firm has a clear edge."),
        },
        (_, Outcome::Winner(v)) => {
            let factors: Vec<&str> = verdict
                .scores
                .iter()
                .filter(|s| &s.offering_id == v)
                .flat_map(|s| s.factors.iter().map(|f| factor_phrase(f)))
                .collect();
            if factors.is_empty() {
                text.push_str(&format!(" The overall verdict still favours {}.", names.of(v)));
            } else {
                text.push_str(&format!(
                    " The overall verdict still favours {}, on the strength of {}.",
                    names.of(v),
                    join_list(&factors)
                ));
            }
        }
        (Outcome::Winner(l), Outcome::Tie) => text.push_str(&format!(
            " {} takes more categories, but on the weighted verdict the two are level.",
            names.of(l)
        )),
        (Outcome::Tie, Outcome::Tie) => {}
    }
    text
}

/// Standard FAQ block for a pairwise page
pub fn faq(table: &CategoryTable, verdict: &WeightedOutcome, names: &Names) -> Vec<FaqEntry> {
    let pair: Vec<&str> = table.wins.iter().map(|w| names.of(&w.offering_id)).collect();
    let (a, b) = match pair.as_slice() {
        [a, b] => (*a, *b),
        _ => return Vec::new(),
    };

    let mut entries = Vec::new();
    let row_questions = [
        ("price", format!("Is {} or {} cheaper?", a, b)),
        ("profit_split", format!("Which pays a higher profit split, {} or {}?", a, b)),
        ("payout_speed", format!("Does {} or {} pay out faster?", a, b)),
    ];
    for (category, question) in row_questions {
        if let Some(row) = table.row(category) {
            entries.push(FaqEntry {
                question,
                answer: category_explanation(row, names),
            });
        }
    }

    entries.push(FaqEntry {
        question: format!("Is {} better than {}?", a, b),
        answer: format!("{} {}", quick_verdict(verdict, names), conclusion(table, verdict, names)),
    });

    entries
}

/// Headline for an N-way comparison
pub fn nway_summary(result: &NwayResult, names: &Names) -> String {
    let best = result.wins_of(&result.best_choice);
    let mut text = format!(
        "{} is the best choice here, winning {} of {} categories.",
        names.of(&result.best_choice),
        best,
        result.rows.len()
    );

    let shared: Vec<&str> = result
        .win_counts
        .iter()
        .filter(|w| w.wins == best && w.offering_id != result.best_choice)
        .map(|w| names.of(&w.offering_id))
        .collect();
    if !shared.is_empty() {
        text.push_str(&format!(
            " {} also won {}; {} is listed first in our catalog.",
            join_list(&shared),
            best,
            names.of(&result.best_choice)
        ));
    }
    text
}

/// Headline for a quiz result
pub fn quiz_summary(result: &QuizResult) -> String {
    let Some(top) = result.top().filter(|m| m.score > 0) else {
        return "None of the firms matched your answers yet. Try answering a few more questions."
            .to_string();
    };

    let tied: Vec<&str> = result
        .matches
        .iter()
        .skip(1)
        .filter(|m| m.score == top.score)
        .map(|m| m.name.as_str())
        .collect();

    if tied.is_empty() {
        format!("{} is your best match at {}%.", top.name, top.percentage)
    } else {
        format!(
            "{} is your best match at {}%, level with {}.",
            top.name,
            top.percentage,
            join_list(&tied)
        )
    }
}
