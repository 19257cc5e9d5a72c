//! Count-up animation for the headline statistics.

pub const COUNT_UP_MS: f64 = 2_500.0;

/// How a statistic is rendered, from the card's `data-stat` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatKind {
    Projects,
    People,
    Investment,
    Resilience,
    Plain,
}

impl StatKind {
    pub fn from_attr(value: Option<&str>) -> Self {
        match value {
            Some("projects") => StatKind::Projects,
            Some("people") => StatKind::People,
            Some("investment") => StatKind::Investment,
            Some("resilience") => StatKind::Resilience,
            _ => StatKind::Plain,
        }
    }

    pub fn format(self, value: f64) -> String {
        let whole = value.max(0.0).floor() as u64;
        match self {
            StatKind::Projects | StatKind::Plain => whole.to_string(),
            StatKind::People => format!("{}+", group_thousands(whole)),
            StatKind::Investment => format!("${value:.1}M"),
            StatKind::Resilience => format!("{whole}%"),
        }
    }
}

pub fn ease_out_quart(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(4)
}

/// `1234567` -> `"1,234,567"`.
pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// One counter animating from zero to `target`.
#[derive(Debug, Clone, PartialEq)]
pub struct CountUp {
    pub target: f64,
    pub kind: StatKind,
    started_at: Option<f64>,
}

impl CountUp {
    pub fn new(target: f64, kind: StatKind) -> Self {
        Self { target, kind, started_at: None }
    }

    /// Restart from zero at `now`.
    pub fn restart(&mut self, now: f64) {
        self.started_at = Some(now);
    }

    pub fn progress(&self, now: f64) -> f64 {
        match self.started_at {
            Some(start) => ((now - start) / COUNT_UP_MS).clamp(0.0, 1.0),
            None => 0.0,
        }
    }

    pub fn is_done(&self, now: f64) -> bool {
        self.progress(now) >= 1.0
    }

    pub fn value(&self, now: f64) -> f64 {
        self.target * ease_out_quart(self.progress(now))
    }

    pub fn text(&self, now: f64) -> String {
        self.kind.format(self.value(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn easing_endpoints() {
        assert_eq!(ease_out_quart(0.0), 0.0);
        assert_eq!(ease_out_quart(1.0), 1.0);
        assert_eq!(ease_out_quart(2.0), 1.0);
        assert!(ease_out_quart(0.5) > 0.9);
    }

    #[test]
    fn formats_by_kind() {
        assert_eq!(StatKind::Projects.format(42.9), "42");
        assert_eq!(StatKind::People.format(1_234_567.0), "1,234,567+");
        assert_eq!(StatKind::People.format(999.0), "999+");
        assert_eq!(StatKind::Investment.format(12.34), "$12.3M");
        assert_eq!(StatKind::Resilience.format(87.6), "87%");
        assert_eq!(StatKind::from_attr(Some("unknown")), StatKind::Plain);
    }

    #[test]
    fn counter_reaches_target() {
        let mut counter = CountUp::new(250_000.0, StatKind::People);
        assert_eq!(counter.value(0.0), 0.0);
        counter.restart(1_000.0);
        assert!(!counter.is_done(2_000.0));
        assert!(counter.value(2_000.0) < 250_000.0);
        assert!(counter.is_done(3_500.0));
        assert_eq!(counter.text(3_500.0), "250,000+");
    }

    #[test]
    fn restart_begins_from_zero() {
        let mut counter = CountUp::new(10.0, StatKind::Projects);
        counter.restart(0.0);
        assert!(counter.is_done(COUNT_UP_MS));
        counter.restart(10_000.0);
        assert_eq!(counter.text(10_000.0), "0");
    }
}
