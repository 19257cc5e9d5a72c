use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use wasm_bindgen::{closure::Closure, JsCast};
use web_sys::{window, Document, Element};

use super::dom::set_text;
use crate::config::FeedConfig;
use crate::demo::{AlertStream, CarbonMarket, ClimateAlert, CreditTotals, Insight, InsightBoard, PriceTick};
use crate::error::{DeckError, Result};
use crate::feed::{Feed, Subscription};
use crate::stats::group_thousands;

const MAX_ALERTS: u32 = 5;

/// `setInterval` registration, cleared on drop.
pub struct IntervalTimer {
    id: i32,
    _tick: Closure<dyn FnMut()>,
}

impl IntervalTimer {
    pub fn every(period_ms: u32, tick: impl FnMut() + 'static) -> Result<Self> {
        let window = window().ok_or_else(|| DeckError::missing("window"))?;
        let tick = Closure::wrap(Box::new(tick) as Box<dyn FnMut()>);
        let id = window.set_interval_with_callback_and_timeout_and_arguments_0(
            tick.as_ref().unchecked_ref(),
            i32::try_from(period_ms).unwrap_or(i32::MAX),
        )?;
        Ok(Self { id, _tick: tick })
    }
}

impl Drop for IntervalTimer {
    fn drop(&mut self) {
        if let Some(window) = window() {
            window.clear_interval_with_handle(self.id);
        }
    }
}

/// Timers and panel subscriptions of the demo data feeds. Dropping it stops
/// every feed.
#[derive(Default)]
pub struct FeedRuntime {
    timers: Vec<IntervalTimer>,
    subscriptions: Vec<Subscription>,
}

impl FeedRuntime {
    pub fn timer_count(&self) -> usize {
        self.timers.len()
    }

    /// Start the feeds whose panels exist in `document`.
    pub fn start(document: &Document, periods: &FeedConfig, seed: u64) -> Result<Self> {
        let mut runtime = Self::default();
        if document.get_element_by_id("carbon-tracker").is_some() {
            runtime.carbon(document, periods, seed)?;
        }
        if let Some(panel) = document.get_element_by_id("insights-container") {
            runtime.insights(panel, periods.insights_ms, seed.wrapping_add(1))?;
        }
        if let Some(panel) = document.get_element_by_id("alerts-container") {
            runtime.alerts(panel, periods.alerts_ms, seed.wrapping_add(2))?;
        }
        tracing::debug!(timers = runtime.timers.len(), "demo feeds running");
        Ok(runtime)
    }

    fn carbon(&mut self, document: &Document, periods: &FeedConfig, seed: u64) -> Result<()> {
        let market = Rc::new(RefCell::new(CarbonMarket::new(seed)));
        let prices: Rc<Feed<PriceTick>> = Rc::new(Feed::new());
        let totals: Rc<Feed<CreditTotals>> = Rc::new(Feed::new());

        let doc = document.clone();
        self.subscriptions.push(prices.subscribe(move |tick| {
            set_text(&doc, "currentPrice", &format!("${:.2}", tick.price));
            if let Some(change) = doc.get_element_by_id("priceChange") {
                let sign = if tick.change >= 0.0 { "+" } else { "" };
                change.set_text_content(Some(&format!("{sign}{:.1}%", tick.change_percent)));
                let trend = if tick.change >= 0.0 { "positive" } else { "negative" };
                change.set_class_name(&format!("price-change {trend}"));
            }
        }));
        let doc = document.clone();
        self.subscriptions.push(totals.subscribe(move |t| {
            set_text(&doc, "creditsGenerated", &group_thousands(t.generated));
            set_text(&doc, "creditsVerified", &group_thousands(t.verified));
            set_text(&doc, "creditsTraded", &group_thousands(t.traded));
            set_text(&doc, "totalRevenue", &format!("${}", group_thousands(t.revenue as u64)));
        }));

        let m = market.clone();
        self.timers.push(IntervalTimer::every(periods.carbon_price_ms, move || {
            let tick = m.borrow_mut().tick_price();
            prices.publish(&tick);
        })?);
        self.timers.push(IntervalTimer::every(periods.carbon_totals_ms, move || {
            let t = market.borrow_mut().tick_totals();
            totals.publish(&t);
        })?);
        Ok(())
    }

    fn insights(&mut self, panel: Element, period_ms: u32, seed: u64) -> Result<()> {
        let feed: Rc<Feed<VecDeque<Insight>>> = Rc::new(Feed::new());
        self.subscriptions.push(feed.subscribe(move |insights| {
            let html: String = insights.iter().map(insight_card).collect();
            panel.set_inner_html(&html);
        }));

        let mut board = InsightBoard::new(seed);
        self.timers.push(IntervalTimer::every(period_ms, move || {
            feed.publish(board.tick());
        })?);
        Ok(())
    }

    fn alerts(&mut self, panel: Element, period_ms: u32, seed: u64) -> Result<()> {
        let feed: Rc<Feed<ClimateAlert>> = Rc::new(Feed::new());
        self.subscriptions.push(feed.subscribe(move |alert| {
            if let Err(e) = prepend_alert(&panel, alert) {
                tracing::warn!("alert not rendered: {e}");
            }
        }));

        let mut stream = AlertStream::new(seed);
        self.timers.push(IntervalTimer::every(period_ms, move || {
            feed.publish(&stream.tick());
        })?);
        Ok(())
    }
}

fn insight_card(insight: &Insight) -> String {
    format!(
        r#"<div class="insight-card {class}"><div class="insight-header"><span class="confidence">{confidence}% Confidence</span><span class="location">{location}</span></div><p class="insight-message">{message}</p></div>"#,
        class = insight.severity.class(),
        confidence = insight.confidence,
        location = insight.location,
        message = insight.message,
    )
}

fn prepend_alert(panel: &Element, alert: &ClimateAlert) -> Result<()> {
    let document = panel
        .owner_document()
        .ok_or_else(|| DeckError::missing("owner document"))?;
    let card = document.create_element("div")?;
    card.set_class_name(&format!("alert-card {}", alert.severity.class()));
    card.set_inner_html(&format!(
        r#"<h4 class="alert-title">{}</h4><p class="alert-message">{}</p><span class="alert-location">{}</span><button class="action-btn">{}</button>"#,
        alert.title, alert.message, alert.location, alert.action
    ));
    panel.prepend_with_node_1(&card)?;
    while panel.child_element_count() > MAX_ALERTS {
        match panel.last_element_child() {
            Some(last) => last.remove(),
            None => break,
        }
    }
    Ok(())
}
