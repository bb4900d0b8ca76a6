//! Loyalty points scoring.
//!
//! A receipt's score is the sum of seven independent rules, evaluated in a
//! fixed order. Every rule works on typed values (integer cents, parsed dates),
//! so the result never depends on floating point rounding.

use super::receipt::Receipt;
use crate::error::{ReceiptError, Result};
use chrono::{Datelike, NaiveTime};
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

pub type Points = u64;

pub type Rule = fn(&Receipt) -> Result<Points>;

/// The closed rule set, in evaluation order.
pub const RULES: [(&str, Rule); 7] = [
    ("retailer_alphanumerics", retailer_alphanumerics),
    ("round_dollar_total", round_dollar_total),
    ("quarter_multiple_total", quarter_multiple_total),
    ("item_pairs", item_pairs),
    ("item_descriptions", item_descriptions),
    ("odd_purchase_day", odd_purchase_day),
    ("afternoon_purchase", afternoon_purchase),
];

// Letters are any `L*` category, digits only `Nd`. Combining marks, superscripts
// and vulgar fractions do not count.
static LETTER_OR_DIGIT: LazyLock<std::result::Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"[\p{L}\p{Nd}]"));

const AFTERNOON_START: NaiveTime = match NaiveTime::from_hms_opt(14, 0, 0) {
    Some(t) => t,
    None => panic!("invalid afternoon start"),
};

const AFTERNOON_END: NaiveTime = match NaiveTime::from_hms_opt(16, 0, 0) {
    Some(t) => t,
    None => panic!("invalid afternoon end"),
};

/// Computes the total points for a receipt.
pub fn compute_points(receipt: &Receipt) -> Result<Points> {
    RULES.iter().try_fold(0, |acc: Points, (name, rule)| {
        let points = rule(receipt)?;
        acc.checked_add(points).ok_or_else(|| overflow(name))
    })
}

/// Points contributed by a single rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleContribution {
    pub rule: &'static str,
    pub points: Points,
}

/// Per-rule contributions alongside their total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PointsBreakdown {
    pub rules: Vec<RuleContribution>,
    pub total: Points,
}

pub fn explain_points(receipt: &Receipt) -> Result<PointsBreakdown> {
    let mut rules = Vec::with_capacity(RULES.len());
    let mut total: Points = 0;
    for (name, rule) in RULES {
        let points = rule(receipt)?;
        total = total.checked_add(points).ok_or_else(|| overflow(name))?;
        rules.push(RuleContribution { rule: name, points });
    }
    Ok(PointsBreakdown { rules, total })
}

/// One point per Unicode letter or digit in the retailer name.
pub fn retailer_alphanumerics(receipt: &Receipt) -> Result<Points> {
    let pattern = LETTER_OR_DIGIT.as_ref().map_err(|e| {
        ReceiptError::ComputationFailed(format!("letter/digit pattern failed to compile: {}", e))
    })?;
    Ok(pattern.find_iter(&receipt.retailer).count() as Points)
}

/// 50 points when the total has no cents.
pub fn round_dollar_total(receipt: &Receipt) -> Result<Points> {
    Ok(if receipt.total.cents() % 100 == 0 { 50 } else { 0 })
}

/// 25 points when the total is a multiple of 0.25.
pub fn quarter_multiple_total(receipt: &Receipt) -> Result<Points> {
    Ok(if receipt.total.cents() % 25 == 0 { 25 } else { 0 })
}

/// 5 points for every two items.
pub fn item_pairs(receipt: &Receipt) -> Result<Points> {
    ((receipt.items.len() / 2) as Points)
        .checked_mul(5)
        .ok_or_else(|| overflow("item_pairs"))
}

/// For each item whose trimmed description length is a positive multiple of
/// three, `ceil(price * 0.2)` points. Length is the UTF-8 byte length.
pub fn item_descriptions(receipt: &Receipt) -> Result<Points> {
    receipt
        .items
        .iter()
        .filter(|item| {
            let len = item.short_description.trim().len();
            len > 0 && len % 3 == 0
        })
        // price * 0.2 in whole units is cents / 500
        .map(|item| item.price.cents().div_ceil(500))
        .try_fold(0, |acc: Points, points| {
            acc.checked_add(points)
                .ok_or_else(|| overflow("item_descriptions"))
        })
}

/// 6 points when the day of the purchase date is odd.
pub fn odd_purchase_day(receipt: &Receipt) -> Result<Points> {
    Ok(if receipt.purchase_date.day() % 2 == 1 { 6 } else { 0 })
}

/// 10 points when the purchase time is strictly between 14:00 and 16:00.
pub fn afternoon_purchase(receipt: &Receipt) -> Result<Points> {
    let t = receipt.purchase_time;
    Ok(if t > AFTERNOON_START && t < AFTERNOON_END {
        10
    } else {
        0
    })
}

fn overflow(rule: &str) -> ReceiptError {
    ReceiptError::ComputationFailed(format!("points overflow in rule {}", rule))
}
