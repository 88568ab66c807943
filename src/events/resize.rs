use super::Listener;
use crate::frame::FrameContext;
use std::cell::RefCell;
use std::rc::Rc;
use web_sys as web;

/// Keep the canvas backing size and engine bounds in step with the window.
pub fn wire_resize(frame_ctx: &Rc<RefCell<FrameContext>>) -> anyhow::Result<Listener> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let frame_ctx = frame_ctx.clone();
    Listener::new(&window, "resize", move |_ev: web::Event| {
        if let Ok(mut ctx) = frame_ctx.try_borrow_mut() {
            ctx.sync_canvas();
        }
    })
}
