use super::Listener;
use crate::frame::FrameContext;
use bubble_core::Entity;
use serde::Serialize;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::{JsCast, JsValue};
use web_sys as web;

/// Canvas click: select the bubble under the pointer or push the others away.
pub fn wire_click(
    canvas: &web::HtmlCanvasElement,
    frame_ctx: &Rc<RefCell<FrameContext>>,
    on_select: Option<js_sys::Function>,
) -> anyhow::Result<Listener> {
    let frame_ctx = frame_ctx.clone();
    Listener::new(canvas, "click", move |ev: web::Event| {
        let Some(mouse) = ev.dyn_ref::<web::MouseEvent>() else {
            return;
        };
        // Drop the borrow before calling out; the callback may update the view.
        let selected = match frame_ctx.try_borrow_mut() {
            Ok(mut ctx) => ctx.click_event(mouse),
            Err(_) => return,
        };
        if let (Some(entity), Some(callback)) = (selected, on_select.as_ref()) {
            notify(callback, &entity);
        }
    })
}

fn notify(callback: &js_sys::Function, entity: &Entity) {
    let payload = match entity.serialize(&serde_wasm_bindgen::Serializer::json_compatible()) {
        Ok(v) => v,
        Err(e) => {
            log::warn!("[click] cannot serialize {}: {}", entity.id(), e);
            return;
        }
    };
    if let Err(e) = callback.call1(&JsValue::NULL, &payload) {
        log::warn!("[click] selection callback threw: {:?}", e);
    }
}
