use std::rc::Rc;

use wasm_bindgen::{closure::Closure, JsCast};
use web_sys::{Document, HtmlInputElement, HtmlSelectElement};

use super::dom;
use crate::error::{DeckError, Result};
use crate::impact::ImpactInputs;

/// Form controls of the impact calculator, looked up once.
struct Form {
    document: Document,
    budget: HtmlInputElement,
    duration: HtmlInputElement,
    beneficiaries: HtmlInputElement,
    project: HtmlSelectElement,
}

impl Form {
    fn find(document: &Document) -> Result<Self> {
        let input = |id: &str| -> Result<HtmlInputElement> {
            document
                .get_element_by_id(id)
                .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
                .ok_or_else(|| DeckError::missing(format!("#{id}")))
        };
        let project = document
            .get_element_by_id("projectType")
            .and_then(|el| el.dyn_into::<HtmlSelectElement>().ok())
            .ok_or_else(|| DeckError::missing("#projectType"))?;
        Ok(Self {
            document: document.clone(),
            budget: input("budget")?,
            duration: input("duration")?,
            beneficiaries: input("beneficiaries")?,
            project,
        })
    }

    fn recalculate(&self) {
        let estimate = ImpactInputs::from_fields(
            &self.budget.value(),
            &self.duration.value(),
            &self.beneficiaries.value(),
            &self.project.value(),
        )
        .estimate();
        dom::set_text(&self.document, "ndviOutput", &estimate.ndvi_text());
        dom::set_text(&self.document, "carbonOutput", &estimate.carbon_text());
        dom::set_text(&self.document, "roiOutput", &estimate.roi_text());
        dom::set_text(&self.document, "resilienceOutput", &estimate.resilience_text());
    }
}

/// Recompute the calculator outputs on every edit. Pages without an
/// `#impact-calculator` get nothing; listeners live for the rest of the page.
pub fn install(document: &Document) -> Result<()> {
    if document.get_element_by_id("impact-calculator").is_none() {
        return Ok(());
    }
    let form = Rc::new(Form::find(document)?);
    form.recalculate();

    let targets: [&web_sys::EventTarget; 4] =
        [&form.budget, &form.duration, &form.beneficiaries, &form.project];
    for target in targets {
        let form = form.clone();
        let on_input = Closure::wrap(Box::new(move || form.recalculate()) as Box<dyn FnMut()>);
        target.add_event_listener_with_callback("input", on_input.as_ref().unchecked_ref())?;
        on_input.forget();
    }
    Ok(())
}
