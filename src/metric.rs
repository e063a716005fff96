use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// The metrics the evaluator knows, parsed once from names like `bleu-4`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    Bleu(usize),
    Distinct(usize),
    Entropy,
}

impl Metric {
    /// Metrics reported when the caller asks for nothing specific.
    pub const DEFAULTS: [Metric; 7] = [
        Metric::Bleu(1),
        Metric::Bleu(2),
        Metric::Bleu(3),
        Metric::Bleu(4),
        Metric::Distinct(1),
        Metric::Distinct(2),
        Metric::Entropy,
    ];

    pub fn needs_corpus(&self) -> bool {
        matches!(self, Metric::Entropy)
    }

    /// Parses a comma-separated list, skipping blank entries.
    pub fn parse_list(list: &str) -> Result<Vec<Metric>, Error> {
        list.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::parse::<Metric>)
            .collect()
    }
}

fn parse_order(metric: &str, order: &str) -> Result<usize, Error> {
    match order.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(Error::InvalidOrder {
            metric: metric.to_string(),
            order: order.to_string(),
        }),
    }
}

impl FromStr for Metric {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        if lower == "entropy" {
            return Ok(Metric::Entropy);
        }
        if let Some(order) = lower.strip_prefix("bleu-") {
            return parse_order(s, order).map(Metric::Bleu);
        }
        if let Some(order) = lower.strip_prefix("distinct-") {
            return parse_order(s, order).map(Metric::Distinct);
        }
        Err(Error::UnknownMetric(s.to_string()))
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::Bleu(n) => write!(f, "bleu-{}", n),
            Metric::Distinct(n) => write!(f, "distinct-{}", n),
            Metric::Entropy => write!(f, "entropy"),
        }
    }
}
