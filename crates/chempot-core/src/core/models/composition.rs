use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Amounts closer than this to an integer are treated as integral when reducing.
const INTEGRAL_TOLERANCE: f64 = 1e-8;

/// Tolerance when matching rescaled amounts to whole numbers.
const RATIO_TOLERANCE: f64 = 1e-6;

/// Largest multiplier tried when looking for a whole-number ratio.
const MAX_RATIO_MULTIPLIER: u32 = 1000;

/// Amounts at or below this are treated as absent.
const AMOUNT_EPSILON: f64 = 1e-12;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum FormulaParseError {
    #[error("Formula is empty")]
    Empty,
    #[error("Unexpected character '{character}' at position {position} in formula '{formula}'")]
    UnexpectedCharacter {
        formula: String,
        character: char,
        position: usize,
    },
    #[error("Unbalanced parentheses in formula '{0}'")]
    UnbalancedParentheses(String),
    #[error("Invalid amount '{amount}' in formula '{formula}'")]
    InvalidAmount { formula: String, amount: String },
}

/// A mapping from element symbol to amount.
///
/// Elements with zero amount may be present in the map (entries frequently list
/// every element of a chemical system); they are ignored by every derived quantity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Composition {
    amounts: BTreeMap<String, f64>,
}

impl Composition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, element: impl Into<String>, amount: f64) {
        *self.amounts.entry(element.into()).or_insert(0.0) += amount;
    }

    /// Amount of `element`, zero when absent.
    pub fn get(&self, element: &str) -> f64 {
        self.amounts.get(element).copied().unwrap_or(0.0)
    }

    /// Total number of atoms, summed over all listed amounts.
    pub fn num_atoms(&self) -> f64 {
        self.amounts.values().sum()
    }

    /// True if any listed amount is below zero.
    pub fn has_negative_amount(&self) -> bool {
        self.amounts.values().any(|amount| *amount < 0.0)
    }

    /// Elements with a strictly positive amount, in alphabetical order.
    pub fn elements(&self) -> impl Iterator<Item = &str> {
        self.amounts
            .iter()
            .filter(|(_, amount)| **amount > AMOUNT_EPSILON)
            .map(|(element, _)| element.as_str())
    }

    pub fn atomic_fraction(&self, element: &str) -> f64 {
        let total = self.num_atoms();
        if total <= 0.0 {
            return 0.0;
        }
        self.get(element) / total
    }

    /// Returns the element symbol if this is a pure single-element composition.
    pub fn single_element(&self) -> Option<&str> {
        let mut elements = self.elements();
        match (elements.next(), elements.next()) {
            (Some(element), None) => Some(element),
            _ => None,
        }
    }

    /// True if every positive-amount element is contained in `allowed`.
    pub fn is_within<S: AsRef<str>>(&self, allowed: &[S]) -> bool {
        self.elements()
            .all(|el| allowed.iter().any(|a| a.as_ref() == el))
    }

    /// Canonical reduced formula used as the dedupe and domain key.
    ///
    /// Elements are written in alphabetical order. Amounts are rescaled to the
    /// smallest whole-number ratio when one exists with a multiplier up to
    /// `MAX_RATIO_MULTIPLIER`, so `Li0.5O`, `LiO2` and `Li2O4` share one key.
    /// Otherwise they are rescaled so the smallest amount is one.
    pub fn reduced_formula(&self) -> String {
        let positive: Vec<(&str, f64)> = self
            .amounts
            .iter()
            .filter(|(_, amount)| **amount > AMOUNT_EPSILON)
            .map(|(element, amount)| (element.as_str(), *amount))
            .collect();

        let mut formula = String::new();
        for (element, amount) in positive.iter().zip(reduced_amounts(&positive)) {
            formula.push_str(element.0);
            formula.push_str(&format_amount(amount));
        }
        formula
    }
}

impl fmt::Display for Composition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (element, amount) in self.amounts.iter().filter(|(_, a)| a.abs() > AMOUNT_EPSILON) {
            write!(f, "{}{}", element, format_amount(*amount))?;
        }
        Ok(())
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for Composition {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        let mut composition = Composition::new();
        for (element, amount) in iter {
            composition.insert(element, amount);
        }
        composition
    }
}

impl FromStr for Composition {
    type Err = FormulaParseError;

    fn from_str(formula: &str) -> Result<Self, Self::Err> {
        let trimmed = formula.trim();
        if trimmed.is_empty() {
            return Err(FormulaParseError::Empty);
        }
        let mut parser = FormulaParser {
            formula: trimmed,
            chars: trimmed.chars().collect(),
            pos: 0,
        };
        let amounts = parser.parse_group(0)?;
        if parser.pos != parser.chars.len() {
            return Err(FormulaParseError::UnbalancedParentheses(trimmed.to_string()));
        }
        Ok(Composition { amounts })
    }
}

/// Amounts of `positive` scaled to their smallest whole-number ratio, or to a
/// smallest amount of one when no such ratio is found.
fn reduced_amounts(positive: &[(&str, f64)]) -> Vec<f64> {
    let smallest = positive
        .iter()
        .map(|(_, amount)| *amount)
        .fold(f64::INFINITY, f64::min);
    if !smallest.is_finite() {
        return Vec::new();
    }
    let scaled: Vec<f64> = positive.iter().map(|(_, amount)| amount / smallest).collect();

    for multiplier in 1..=MAX_RATIO_MULTIPLIER {
        let m = f64::from(multiplier);
        let candidate: Option<Vec<u64>> = scaled
            .iter()
            .map(|x| {
                let value = x * m;
                let rounded = value.round();
                ((value - rounded).abs() <= RATIO_TOLERANCE)
                    .then_some(rounded as u64)
            })
            .collect();
        if let Some(integers) = candidate {
            let divisor = integers.iter().copied().fold(0, gcd).max(1);
            return integers.iter().map(|n| (n / divisor) as f64).collect();
        }
    }
    scaled
}

fn gcd(a: u64, b: u64) -> u64 {
    if b == 0 { a } else { gcd(b, a % b) }
}

fn format_amount(amount: f64) -> String {
    if (amount - 1.0).abs() < INTEGRAL_TOLERANCE {
        return String::new();
    }
    if (amount - amount.round()).abs() < INTEGRAL_TOLERANCE {
        return format!("{}", amount.round() as i64);
    }
    let text = format!("{:.6}", amount);
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

struct FormulaParser<'a> {
    formula: &'a str,
    chars: Vec<char>,
    pos: usize,
}

impl FormulaParser<'_> {
    fn parse_group(&mut self, depth: usize) -> Result<BTreeMap<String, f64>, FormulaParseError> {
        let mut amounts = BTreeMap::new();
        while let Some(&c) = self.chars.get(self.pos) {
            match c {
                '(' | '[' => {
                    self.pos += 1;
                    let inner = self.parse_group(depth + 1)?;
                    match self.chars.get(self.pos) {
                        Some(')') | Some(']') => self.pos += 1,
                        _ => {
                            return Err(FormulaParseError::UnbalancedParentheses(
                                self.formula.to_string(),
                            ));
                        }
                    }
                    let multiplier = self.parse_amount()?;
                    for (element, amount) in inner {
                        *amounts.entry(element).or_insert(0.0) += amount * multiplier;
                    }
                }
                ')' | ']' => {
                    if depth == 0 {
                        return Err(FormulaParseError::UnbalancedParentheses(
                            self.formula.to_string(),
                        ));
                    }
                    return Ok(amounts);
                }
                c if c.is_ascii_uppercase() => {
                    let start = self.pos;
                    self.pos += 1;
                    while self
                        .chars
                        .get(self.pos)
                        .is_some_and(|c| c.is_ascii_lowercase())
                    {
                        self.pos += 1;
                    }
                    let symbol: String = self.chars[start..self.pos].iter().collect();
                    let amount = self.parse_amount()?;
                    *amounts.entry(symbol).or_insert(0.0) += amount;
                }
                c if c.is_whitespace() => self.pos += 1,
                other => {
                    return Err(FormulaParseError::UnexpectedCharacter {
                        formula: self.formula.to_string(),
                        character: other,
                        position: self.pos,
                    });
                }
            }
        }
        if depth > 0 {
            return Err(FormulaParseError::UnbalancedParentheses(
                self.formula.to_string(),
            ));
        }
        Ok(amounts)
    }

    fn parse_amount(&mut self) -> Result<f64, FormulaParseError> {
        let start = self.pos;
        while self
            .chars
            .get(self.pos)
            .is_some_and(|c| c.is_ascii_digit() || *c == '.')
        {
            self.pos += 1;
        }
        if start == self.pos {
            return Ok(1.0);
        }
        let text: String = self.chars[start..self.pos].iter().collect();
        text.parse::<f64>()
            .map_err(|_| FormulaParseError::InvalidAmount {
                formula: self.formula.to_string(),
                amount: text,
            })
    }
}
