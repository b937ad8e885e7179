use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Element, EventTarget, HtmlElement};

/// Shows or hides an element by toggling its inline display property,
/// leaving the stylesheet's display value in charge when shown.
pub(crate) fn set_displayed(el: &HtmlElement, shown: bool) {
    let style = el.style();
    if shown {
        let _ = style.remove_property("display");
    } else {
        let _ = style.set_property("display", "none");
    }
}

pub(crate) fn toggle_class(el: &Element, class: &str, on: bool) {
    let _ = el.class_list().toggle_with_force(class, on);
}

/// Attaches a permanent event listener. The closure is leaked on purpose:
/// listeners wired at boot live for the lifetime of the page.
pub(crate) fn listen(
    target: &EventTarget,
    event: &str,
    handler: impl FnMut(web_sys::Event) + 'static,
) {
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(web_sys::Event)>);
    let _ = target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
    closure.forget();
}
