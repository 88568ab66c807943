use bubble_core::constants::{IMAGE_LOAD_TIMEOUT_MS, PLACEHOLDER_IMAGE_URL};
use bubble_core::{AddressResolver, Resolution};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys as web;

type Shared = Rc<RefCell<AddressResolver<js_sys::Function>>>;

/// Token icon lookup exported to JS: address in, final image URL out via
/// callback. One probe per address is in flight at a time.
#[wasm_bindgen]
pub struct TokenImageService {
    inner: Shared,
}

#[wasm_bindgen]
impl TokenImageService {
    #[wasm_bindgen(constructor)]
    pub fn new(fallback_image: Option<String>) -> TokenImageService {
        let fallback = fallback_image.unwrap_or_else(|| PLACEHOLDER_IMAGE_URL.to_string());
        TokenImageService {
            inner: Rc::new(RefCell::new(AddressResolver::new(fallback))),
        }
    }

    #[wasm_bindgen(js_name = getImageUrl)]
    pub fn get_image_url(&self, address: &str, callback: js_sys::Function) {
        let resolution = self.inner.borrow_mut().request(address, callback);
        match resolution {
            Resolution::Ready(url, callback) => call_back(&callback, &url),
            Resolution::Queued => {}
            Resolution::Probe { address, url } => {
                if let Err(e) = probe(self.inner.clone(), address.clone(), &url) {
                    log::warn!("[images] probe for {} not started: {}", address, e);
                    settle(&self.inner, &address, false);
                }
            }
        }
    }
}

fn call_back(callback: &js_sys::Function, url: &str) {
    if let Err(e) = callback.call1(&JsValue::NULL, &JsValue::from_str(url)) {
        log::warn!("[images] callback threw: {:?}", e);
    }
}

fn settle(inner: &Shared, address: &str, loaded: bool) {
    // Release the borrow before running JS callbacks; they may call back in.
    let settled = inner.borrow_mut().complete(address, loaded);
    if let Some((url, callbacks)) = settled {
        for cb in &callbacks {
            call_back(cb, &url);
        }
    }
}

/// Try `url` in a detached image element and settle on load, error or timeout.
fn probe(inner: Shared, address: String, url: &str) -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let img = web::HtmlImageElement::new().map_err(|e| anyhow::anyhow!("{:?}", e))?;

    let make = |loaded: bool| {
        let inner = inner.clone();
        let address = address.clone();
        Closure::wrap(Box::new(move || settle(&inner, &address, loaded)) as Box<dyn FnMut()>)
    };
    let onload = make(true);
    let onerror = make(false);
    let ontimeout = {
        let inner = inner.clone();
        let address = address.clone();
        let img = img.clone();
        Closure::wrap(Box::new(move || {
            let pending = inner.borrow().is_probing(&address);
            if pending {
                img.set_src("");
                settle(&inner, &address, false);
            }
        }) as Box<dyn FnMut()>)
    };

    img.set_onload(Some(onload.as_ref().unchecked_ref()));
    img.set_onerror(Some(onerror.as_ref().unchecked_ref()));
    window
        .set_timeout_with_callback_and_timeout_and_arguments_0(
            ontimeout.as_ref().unchecked_ref(),
            IMAGE_LOAD_TIMEOUT_MS as i32,
        )
        .map_err(|e| anyhow::anyhow!("set_timeout failed: {:?}", e))?;
    onload.forget();
    onerror.forget();
    ontimeout.forget();
    img.set_src(url);
    Ok(())
}
