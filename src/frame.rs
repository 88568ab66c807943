use crate::dom;
use crate::images::ImageStore;
use crate::input::{self, CanvasScale};
use crate::render;
use bubble_core::{BubbleEngine, CanvasMetrics, Entity, ViewConfig};
use chrono::Utc;
use glam::Vec2;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Everything one mounted view touches from the frame loop and listeners.
pub struct FrameContext {
    pub engine: BubbleEngine,
    pub canvas: web::HtmlCanvasElement,
    pub ctx: web::CanvasRenderingContext2d,
    pub images: ImageStore,
    pub config: ViewConfig,
    pub scale: CanvasScale,
}

impl FrameContext {
    /// Re-read the canvas layout and hand the new size to the engine.
    pub fn sync_canvas(&mut self) {
        self.scale = dom::sync_canvas_backing_size(&self.canvas);
        let mobile = dom::viewport_width().map_or(false, |vw| self.config.is_mobile(vw));
        self.engine.resize(CanvasMetrics::new(
            self.scale.css.x,
            self.scale.css.y,
            mobile,
        ));
    }

    pub fn frame(&mut self) {
        // The canvas may get its layout box after mount without a resize event.
        if !self.engine.canvas().is_usable() {
            self.sync_canvas();
        }
        let backing = (self.canvas.width() as f64, self.canvas.height() as f64);

        if self.engine.take_clear_request() {
            render::clear(&self.ctx, backing);
        }
        if !self.engine.is_active() {
            return;
        }

        self.engine.step();
        self.images.expire_stale();
        for url in self.engine.image_urls() {
            self.images.request(url);
        }
        render::draw_frame(
            &self.ctx,
            backing,
            self.scale.dpr,
            &self.engine,
            &self.images,
            Utc::now(),
        );
    }

    /// Resolve a click in CSS pixels; returns the selected record.
    pub fn click(&mut self, point: Vec2) -> Option<Entity> {
        self.engine.click(point).cloned()
    }

    pub fn click_event(&mut self, ev: &web::MouseEvent) -> Option<Entity> {
        let point = input::pointer_canvas_css(ev, &self.canvas, self.scale.css)?;
        self.click(point)
    }
}

/// Cancellation handle for a running requestAnimationFrame loop.
pub struct LoopHandle {
    running: Rc<Cell<bool>>,
    raf_id: Rc<Cell<Option<i32>>>,
    tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>>,
}

impl LoopHandle {
    pub fn is_running(&self) -> bool {
        self.running.get()
    }

    /// Stop scheduling frames and release the tick closure.
    pub fn cancel(&self) {
        if !self.running.replace(false) {
            return;
        }
        if let (Some(id), Some(w)) = (self.raf_id.take(), web::window()) {
            _ = w.cancel_animation_frame(id);
        }
        // The closure holds an Rc to its own slot; dropping it breaks the cycle.
        drop(self.tick.borrow_mut().take());
    }
}

impl Drop for LoopHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

fn request_frame(tick: &Rc<RefCell<Option<Closure<dyn FnMut()>>>>) -> Option<i32> {
    let window = web::window()?;
    let slot = tick.borrow();
    let closure = slot.as_ref()?;
    window
        .request_animation_frame(closure.as_ref().unchecked_ref())
        .ok()
}

pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext>>) -> LoopHandle {
    let running = Rc::new(Cell::new(true));
    let raf_id: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));

    let tick_clone = tick.clone();
    let running_tick = running.clone();
    let raf_tick = raf_id.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        if !running_tick.get() {
            return;
        }
        match frame_ctx.try_borrow_mut() {
            Ok(mut ctx) => ctx.frame(),
            Err(_) => log::warn!("[frame] view busy, skipping frame"),
        }
        if running_tick.get() {
            raf_tick.set(request_frame(&tick_clone));
        }
    }) as Box<dyn FnMut()>));

    raf_id.set(request_frame(&tick));
    LoopHandle {
        running,
        raf_id,
        tick,
    }
}
