#![cfg(target_arch = "wasm32")]
use bubble_core::{BubbleEngine, Entity, Timeframe, Variant, ViewConfig};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use web_sys as web;

mod constants;
mod dom;
mod events;
mod frame;
mod images;
mod input;
mod render;
mod resolver;

pub use resolver::TokenImageService;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("bubble-web starting");
    Ok(())
}

fn js_error(e: anyhow::Error) -> JsValue {
    JsValue::from_str(&format!("{:#}", e))
}

fn parse_config(config: JsValue) -> ViewConfig {
    if config.is_undefined() || config.is_null() {
        return ViewConfig::default();
    }
    let parsed = serde_wasm_bindgen::from_value::<ViewConfig>(config)
        .map_err(|e| anyhow::anyhow!("{}", e))
        .and_then(|cfg| cfg.validate().map(|_| cfg).map_err(anyhow::Error::from));
    match parsed {
        Ok(cfg) => cfg,
        Err(e) => {
            log::warn!("[view] invalid config, using defaults: {:#}", e);
            ViewConfig::default()
        }
    }
}

/// Decode a JS array of records one by one as the view's kind, so a
/// malformed record only costs that record.
fn parse_entities(variant: Variant, list: &JsValue) -> Vec<Entity> {
    if !js_sys::Array::is_array(list) {
        if !(list.is_undefined() || list.is_null()) {
            log::warn!("[view] expected an array of records");
        }
        return Vec::new();
    }
    js_sys::Array::from(list)
        .iter()
        .filter_map(|item| {
            match variant.decode(serde_wasm_bindgen::Deserializer::from(item)) {
                Ok(entity) => Some(entity),
                Err(e) => {
                    log::warn!("[view] skipping malformed {} record: {}", variant.kind_name(), e);
                    None
                }
            }
        })
        .collect()
}

/// A mounted bubble view bound to one canvas.
#[wasm_bindgen]
pub struct BubbleView {
    frame_ctx: Rc<RefCell<frame::FrameContext>>,
    frame_loop: Option<frame::LoopHandle>,
    listeners: Vec<events::Listener>,
}

#[wasm_bindgen]
impl BubbleView {
    #[wasm_bindgen(js_name = mountTokens)]
    pub fn mount_tokens(
        canvas: web::HtmlCanvasElement,
        tokens: JsValue,
        config: JsValue,
        on_select: Option<js_sys::Function>,
    ) -> Result<BubbleView, JsValue> {
        let config = parse_config(config);
        let variant = Variant::tokens(config.timeframe);
        Self::mount(canvas, variant, &tokens, config, on_select).map_err(js_error)
    }

    #[wasm_bindgen(js_name = mountTrades)]
    pub fn mount_trades(
        canvas: web::HtmlCanvasElement,
        trades: JsValue,
        config: JsValue,
        on_select: Option<js_sys::Function>,
    ) -> Result<BubbleView, JsValue> {
        let config = parse_config(config);
        Self::mount(canvas, Variant::Trades, &trades, config, on_select).map_err(js_error)
    }

    /// Replace the dataset; surviving bubbles keep their motion.
    #[wasm_bindgen(js_name = setEntities)]
    pub fn set_entities(&self, list: JsValue) {
        match self.frame_ctx.try_borrow_mut() {
            Ok(mut ctx) => {
                let entities = parse_entities(ctx.engine.variant(), &list);
                ctx.engine.ingest(entities);
            }
            Err(_) => log::warn!("[view] busy, dropping entity update"),
        }
    }

    #[wasm_bindgen(js_name = setTimeframe)]
    pub fn set_timeframe(&self, timeframe: &str) -> Result<(), JsValue> {
        let timeframe: Timeframe = timeframe
            .parse()
            .map_err(|e: bubble_core::ConfigError| JsValue::from_str(&e.to_string()))?;
        if let Ok(mut ctx) = self.frame_ctx.try_borrow_mut() {
            ctx.config.timeframe = timeframe;
            ctx.engine.set_timeframe(timeframe);
        }
        Ok(())
    }

    #[wasm_bindgen(getter, js_name = bubbleCount)]
    pub fn bubble_count(&self) -> usize {
        self.frame_ctx.try_borrow().map_or(0, |ctx| ctx.engine.len())
    }

    #[wasm_bindgen(getter, js_name = isActive)]
    pub fn is_active(&self) -> bool {
        self.frame_ctx
            .try_borrow()
            .map_or(false, |ctx| ctx.engine.is_active())
    }

    /// Stop the frame loop and remove every listener. Safe to call twice.
    pub fn dispose(&mut self) {
        let was_mounted = self.frame_loop.is_some();
        if let Some(handle) = self.frame_loop.take() {
            handle.cancel();
        }
        self.listeners.clear();
        if was_mounted {
            log::info!("[view] disposed");
        }
    }
}

impl BubbleView {
    fn mount(
        canvas: web::HtmlCanvasElement,
        variant: Variant,
        initial: &JsValue,
        config: ViewConfig,
        on_select: Option<js_sys::Function>,
    ) -> anyhow::Result<BubbleView> {
        let ctx = dom::context_2d(&canvas)?;
        let engine = BubbleEngine::new(variant, config.engine_params());
        let images = images::ImageStore::new(&config.placeholder_url, config.image_timeout_ms);

        let mut frame_ctx = frame::FrameContext {
            engine,
            canvas: canvas.clone(),
            ctx,
            images,
            config,
            scale: input::CanvasScale::default(),
        };
        // Size first so the initial bubbles spawn inside the real bounds.
        frame_ctx.sync_canvas();
        frame_ctx.engine.ingest(parse_entities(variant, initial));
        let frame_ctx = Rc::new(RefCell::new(frame_ctx));

        let mut listeners = Vec::with_capacity(2);
        match events::wire_resize(&frame_ctx) {
            Ok(l) => listeners.push(l),
            Err(e) => log::warn!("[view] resize tracking disabled: {:#}", e),
        }
        match events::wire_click(&canvas, &frame_ctx, on_select) {
            Ok(l) => listeners.push(l),
            Err(e) => log::warn!("[view] click handling disabled: {:#}", e),
        }

        let frame_loop = frame::start_loop(frame_ctx.clone());
        log::info!(
            "[view] mounted {} view with {} bubbles",
            variant.kind_name(),
            frame_ctx.borrow().engine.len()
        );
        Ok(BubbleView {
            frame_ctx,
            frame_loop: Some(frame_loop),
            listeners,
        })
    }
}

impl Drop for BubbleView {
    fn drop(&mut self) {
        self.dispose();
    }
}
