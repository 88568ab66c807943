use bubble_core::ImageCache;
use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Icon images for one view, loaded through `HtmlImageElement`.
///
/// Loads complete out of band; the renderer just asks for a handle every
/// frame and draws whatever is ready.
pub struct ImageStore {
    cache: Rc<RefCell<ImageCache<web::HtmlImageElement>>>,
    epoch: Instant,
    timeout_ms: f64,
}

impl ImageStore {
    pub fn new(placeholder_url: &str, timeout_ms: f64) -> Self {
        let mut cache = ImageCache::new();
        match web::HtmlImageElement::new() {
            Ok(img) => {
                img.set_src(placeholder_url);
                cache.set_placeholder(img);
            }
            Err(e) => log::warn!("[images] placeholder image unavailable: {:?}", e),
        }
        Self {
            cache: Rc::new(RefCell::new(cache)),
            epoch: Instant::now(),
            timeout_ms,
        }
    }

    fn now_ms(&self) -> f64 {
        self.epoch.elapsed().as_secs_f64() * 1000.0
    }

    /// Start loading `url` unless it is already loading or settled.
    pub fn request(&self, url: &str) {
        if !self.cache.borrow_mut().claim(url, self.now_ms()) {
            return;
        }
        let img = match web::HtmlImageElement::new() {
            Ok(img) => img,
            Err(e) => {
                log::warn!("[images] cannot create image for {}: {:?}", url, e);
                self.cache.borrow_mut().fail(url);
                return;
            }
        };

        let onload = {
            let cache = self.cache.clone();
            let img = img.clone();
            let url = url.to_string();
            Closure::wrap(Box::new(move || {
                cache.borrow_mut().resolve(&url, img.clone());
            }) as Box<dyn FnMut()>)
        };
        let onerror = {
            let cache = self.cache.clone();
            let url = url.to_string();
            Closure::wrap(Box::new(move || {
                if cache.borrow_mut().fail(&url) {
                    log::warn!("[images] failed to load {}", url);
                }
            }) as Box<dyn FnMut()>)
        };
        img.set_onload(Some(onload.as_ref().unchecked_ref()));
        img.set_onerror(Some(onerror.as_ref().unchecked_ref()));
        onload.forget();
        onerror.forget();
        img.set_src(url);
    }

    /// Fail loads that outlived the timeout; they fall back to the placeholder.
    pub fn expire_stale(&self) {
        let now = self.now_ms();
        for url in self.cache.borrow_mut().expire(now, self.timeout_ms) {
            log::warn!("[images] timed out loading {}", url);
        }
    }

    /// Drawable image for `url`, if one is ready.
    pub fn get(&self, url: &str) -> Option<web::HtmlImageElement> {
        self.cache
            .borrow()
            .lookup(url)
            .filter(|img| img.complete() && img.natural_width() > 0)
            .cloned()
    }
}
