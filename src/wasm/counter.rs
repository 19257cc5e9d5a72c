use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlElement};

use super::frame::{self, AnimationLoop};
use crate::effect::Effect;
use crate::error::Result;
use crate::stats::{CountUp, StatKind};

/// Counts every `.stat-number[data-target]` in the slide up from zero each
/// time the slide is shown.
pub struct StatCounters {
    counters: Rc<RefCell<Vec<(HtmlElement, CountUp)>>>,
    anim: AnimationLoop,
}

impl StatCounters {
    pub fn mount(container: &Element) -> Result<Self> {
        let list = container.query_selector_all("[data-target]")?;
        let mut counters = Vec::new();
        for i in 0..list.length() {
            let Some(el) = list.item(i).and_then(|n| n.dyn_into::<HtmlElement>().ok()) else {
                continue;
            };
            let Some(target) = el
                .get_attribute("data-target")
                .and_then(|t| t.trim().parse::<f64>().ok())
            else {
                tracing::warn!("stat without numeric data-target skipped");
                continue;
            };
            let kind = el
                .closest("[data-stat]")?
                .and_then(|card| card.get_attribute("data-stat"));
            counters.push((el, CountUp::new(target, StatKind::from_attr(kind.as_deref()))));
        }

        let counters = Rc::new(RefCell::new(counters));
        let anim = {
            let counters = counters.clone();
            AnimationLoop::new(move |now| {
                let counters = counters.borrow();
                for (el, counter) in counters.iter() {
                    el.set_text_content(Some(&counter.text(now)));
                }
                !counters.iter().all(|(_, c)| c.is_done(now))
            })
        };
        Ok(Self { counters, anim })
    }
}

impl Effect for StatCounters {
    fn start(&mut self) -> Result<()> {
        let now = frame::now();
        for (el, counter) in self.counters.borrow_mut().iter_mut() {
            counter.restart(now);
            el.set_text_content(Some(&counter.text(now)));
        }
        self.anim.start()
    }

    fn stop(&mut self) -> Result<()> {
        self.anim.stop();
        Ok(())
    }

    fn dispose(&mut self) -> Result<()> {
        self.anim.dispose();
        self.counters.borrow_mut().clear();
        Ok(())
    }
}
