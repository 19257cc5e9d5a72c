//! Simulated values behind the marketing panels: carbon credit ticker, AI
//! insights and climate alerts. Nothing here is real data.

use std::collections::VecDeque;

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

const PRICE_FLOOR: f64 = 10.0;
const MAX_INSIGHTS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceTick {
    pub price: f64,
    pub change: f64,
    /// Change relative to the new price, in percent.
    pub change_percent: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CreditTotals {
    pub generated: u64,
    pub verified: u64,
    pub traded: u64,
    pub revenue: f64,
}

/// Carbon credit marketplace ticker.
pub struct CarbonMarket {
    rng: SmallRng,
    price: f64,
    totals: CreditTotals,
}

impl CarbonMarket {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
            price: 15.50,
            totals: CreditTotals {
                generated: 15_420,
                verified: 14_890,
                traded: 12_340,
                revenue: 185_100.0,
            },
        }
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn totals(&self) -> CreditTotals {
        self.totals
    }

    /// Random walk of at most ±0.25, never below the floor.
    pub fn tick_price(&mut self) -> PriceTick {
        let change = (self.rng.gen::<f64>() - 0.5) * 0.5;
        self.price = (self.price + change).max(PRICE_FLOOR);
        PriceTick {
            price: self.price,
            change,
            change_percent: change / self.price * 100.0,
        }
    }

    pub fn tick_totals(&mut self) -> CreditTotals {
        let t = &mut self.totals;
        t.generated += self.rng.gen_range(1..=5);
        t.verified += self.rng.gen_range(1..=3);
        t.traded += self.rng.gen_range(1..=2);
        t.revenue = t.traded as f64 * self.price;
        *t
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Success,
    Urgent,
}

impl Severity {
    /// CSS class used by the panels.
    pub fn class(self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Success => "success",
            Severity::Urgent => "urgent",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Insight {
    pub severity: Severity,
    pub confidence: u8,
    pub message: &'static str,
    pub location: &'static str,
}

const INSIGHT_MESSAGES: [&str; 4] = [
    "Water levels rising in Lake Victoria - flood risk moderate",
    "Vegetation recovery detected in restored areas - NDVI +0.08",
    "Temperature anomaly detected - 2.3°C above seasonal average",
    "Carbon sequestration rate exceeding targets by 15%",
];

const INSIGHT_LOCATIONS: [&str; 3] = [
    "Makueni County, Kenya",
    "Niger Delta, Nigeria",
    "Okavango Basin, Botswana",
];

const INSIGHT_SEVERITIES: [Severity; 3] = [Severity::Info, Severity::Warning, Severity::Success];

/// Rolling list of the newest AI insights.
pub struct InsightBoard {
    rng: SmallRng,
    insights: VecDeque<Insight>,
}

impl InsightBoard {
    pub fn new(seed: u64) -> Self {
        Self { rng: SmallRng::seed_from_u64(seed), insights: VecDeque::new() }
    }

    /// Newest first.
    pub fn insights(&self) -> impl Iterator<Item = &Insight> + '_ {
        self.insights.iter()
    }

    pub fn tick(&mut self) -> &VecDeque<Insight> {
        let insight = Insight {
            severity: *pick(&mut self.rng, &INSIGHT_SEVERITIES),
            confidence: self.rng.gen_range(80..=99),
            message: *pick(&mut self.rng, &INSIGHT_MESSAGES),
            location: *pick(&mut self.rng, &INSIGHT_LOCATIONS),
        };
        self.insights.push_front(insight);
        self.insights.truncate(MAX_INSIGHTS);
        &self.insights
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClimateAlert {
    pub severity: Severity,
    pub title: &'static str,
    pub message: &'static str,
    pub location: &'static str,
    pub action: &'static str,
}

const ALERT_TEMPLATES: [ClimateAlert; 3] = [
    ClimateAlert {
        severity: Severity::Warning,
        title: "Temperature Anomaly Detected",
        message: "3.2°C above seasonal average in monitoring area",
        location: "Sahel Region, Mali",
        action: "Monitor livestock health",
    },
    ClimateAlert {
        severity: Severity::Info,
        title: "Vegetation Recovery Confirmed",
        message: "NDVI increased by 0.08 in restoration zone",
        location: "Tigray Region, Ethiopia",
        action: "Document success story",
    },
    ClimateAlert {
        severity: Severity::Urgent,
        title: "Locust Swarm Detected",
        message: "Satellite imagery shows potential locust breeding sites",
        location: "Horn of Africa",
        action: "Deploy monitoring teams",
    },
];

pub struct AlertStream {
    rng: SmallRng,
}

impl AlertStream {
    pub fn new(seed: u64) -> Self {
        Self { rng: SmallRng::seed_from_u64(seed) }
    }

    pub fn tick(&mut self) -> ClimateAlert {
        pick(&mut self.rng, &ALERT_TEMPLATES).clone()
    }
}

fn pick<'a, T>(rng: &mut SmallRng, items: &'a [T]) -> &'a T {
    // every table above is non-empty
    items.choose(rng).unwrap_or(&items[0])
}
