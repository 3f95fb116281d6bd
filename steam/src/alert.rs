use crate::{CacheEntry, Config, Currency};
use derive_more::Display;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Direction {
    #[display("▲")]
    Up,
    #[display("▼")]
    Down,
}

/// Movement of the current price relative to a reference price
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceChange {
    pub reference: f64,
    pub current: f64,
}

impl PriceChange {
    /// A zero reference is replaced by the current price.
    pub fn new(reference: f64, current: f64) -> Self {
        let reference = if reference == 0.0 { current } else { reference };
        Self { reference, current }
    }

    pub fn ratio(&self) -> f64 {
        if self.reference == 0.0 {
            return 0.0;
        }
        (self.current - self.reference) / self.reference
    }

    /// Ratio as a percentage, rounded to two decimals
    pub fn percent(&self) -> f64 {
        (self.ratio() * 10_000.0).round() / 100.0
    }

    pub fn exceeds(&self, threshold: f64) -> bool {
        self.ratio().abs() >= threshold
    }

    pub fn direction(&self) -> Direction {
        if self.ratio() > 0.0 {
            Direction::Up
        } else {
            Direction::Down
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    /// Moved against the last recorded price
    PriceMove,
    /// Moved against the average over the last `hours`
    WindowAverage { hours: u64 },
}

#[derive(Debug, Clone)]
pub struct Alert {
    pub kind: AlertKind,
    pub item: String,
    pub change: PriceChange,
    pub currency: Currency,
}

impl fmt::Display for Alert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self {
            kind,
            item,
            change,
            currency,
        } = self;
        let symbol = &currency.symbol;
        let direction = change.direction();

        match kind {
            AlertKind::PriceMove => {
                writeln!(f, "{direction} **Price Alert ({})**", currency.code)?;
                writeln!(f, "Item: `{item}`")?;
                writeln!(f, "Old: {symbol}{:.2}", change.reference)?;
                writeln!(f, "New: {symbol}{:.2}", change.current)?;
            }
            AlertKind::WindowAverage { hours } => {
                writeln!(f, "{direction} **{hours}-Hour Avg Alert ({})**", currency.code)?;
                writeln!(f, "Item: `{item}`")?;
                writeln!(f, "Current price: {symbol}{:.2}", change.current)?;
                writeln!(f, "{hours}-hour avg: {symbol}{:.2}", change.reference)?;
            }
        }
        write!(f, "Change: **{:.2}%**", change.percent())
    }
}

#[derive(Debug, Clone)]
pub struct Evaluation {
    pub change: PriceChange,
    pub window_average: f64,
    pub average_change: PriceChange,
    pub alerts: Vec<Alert>,
}

/// Compares a freshly fetched price with the cached price and the recent average.
///
/// Without a cached entry the price is compared with itself, and without history the
/// average is the price itself, so neither case alerts.
pub fn evaluate(
    config: &Config,
    item: &str,
    cached: Option<&CacheEntry>,
    price: f64,
    window_average: Option<f64>,
) -> Evaluation {
    let change = PriceChange::new(cached.map_or(price, |entry| entry.price), price);
    let window_average = window_average.unwrap_or(price);
    let average_change = PriceChange::new(window_average, price);

    let alert = |kind, change| Alert {
        kind,
        item: item.to_string(),
        change,
        currency: config.currency.clone(),
    };

    let mut alerts = Vec::new();
    if change.exceeds(config.alert_threshold) {
        alerts.push(alert(AlertKind::PriceMove, change));
    }
    if average_change.exceeds(config.average_alert_threshold) {
        alerts.push(alert(
            AlertKind::WindowAverage {
                hours: config.average_window_hours,
            },
            average_change,
        ));
    }

    Evaluation {
        change,
        window_average,
        average_change,
        alerts,
    }
}
