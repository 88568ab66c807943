//! Image bookkeeping shared by every bubble of one view.
//!
//! Loading itself happens in the browser; these types only decide *whether*
//! a fetch may start, record the first completion, and time out loads that
//! never settle. `H` is whatever handle the host keeps for a decoded image.

use crate::constants::{IMAGE_PROXY_PATH, PLACEHOLDER_IMAGE_URL};
use fnv::FnvHashMap;

#[derive(Clone, Debug, PartialEq)]
pub enum ImageSlot<H> {
    Loading { since_ms: f64 },
    Ready(H),
    Failed,
}

/// URL -> image handle, written once per URL.
#[derive(Debug)]
pub struct ImageCache<H> {
    slots: FnvHashMap<String, ImageSlot<H>>,
    placeholder: Option<H>,
}

impl<H> Default for ImageCache<H> {
    fn default() -> Self {
        Self {
            slots: FnvHashMap::default(),
            placeholder: None,
        }
    }
}

impl<H> ImageCache<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when the caller should start the fetch; false when another
    /// request for the same URL already exists or finished.
    pub fn claim(&mut self, url: &str, now_ms: f64) -> bool {
        if url.is_empty() || self.slots.contains_key(url) {
            return false;
        }
        self.slots
            .insert(url.to_string(), ImageSlot::Loading { since_ms: now_ms });
        true
    }

    /// Record a successful load. Ignored unless the URL is still loading.
    pub fn resolve(&mut self, url: &str, handle: H) -> bool {
        match self.slots.get_mut(url) {
            Some(slot) if matches!(slot, ImageSlot::Loading { .. }) => {
                *slot = ImageSlot::Ready(handle);
                true
            }
            _ => false,
        }
    }

    /// Record a failed load. Ignored unless the URL is still loading.
    pub fn fail(&mut self, url: &str) -> bool {
        match self.slots.get_mut(url) {
            Some(slot) if matches!(slot, ImageSlot::Loading { .. }) => {
                *slot = ImageSlot::Failed;
                true
            }
            _ => false,
        }
    }

    /// Fail every load that has been pending for longer than `timeout_ms`.
    /// Returns the URLs that timed out.
    pub fn expire(&mut self, now_ms: f64, timeout_ms: f64) -> Vec<String> {
        let mut expired = Vec::new();
        for (url, slot) in self.slots.iter_mut() {
            if let ImageSlot::Loading { since_ms } = slot {
                if now_ms - *since_ms >= timeout_ms {
                    *slot = ImageSlot::Failed;
                    expired.push(url.clone());
                }
            }
        }
        expired
    }

    pub fn set_placeholder(&mut self, handle: H) {
        self.placeholder = Some(handle);
    }

    pub fn slot(&self, url: &str) -> Option<&ImageSlot<H>> {
        self.slots.get(url)
    }

    /// Handle to draw for `url`: the loaded image, the placeholder after a
    /// failure, or nothing while still loading.
    pub fn lookup(&self, url: &str) -> Option<&H> {
        match self.slots.get(url) {
            Some(ImageSlot::Ready(h)) => Some(h),
            Some(ImageSlot::Failed) => self.placeholder.as_ref(),
            _ => None,
        }
    }

    pub fn pending(&self) -> usize {
        self.slots
            .values()
            .filter(|s| matches!(s, ImageSlot::Loading { .. }))
            .count()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// `network_0xABC` -> `0xabc`; plain addresses are just lowercased.
pub fn clean_address(address: &str) -> String {
    let address = address.trim();
    let bare = match address.split_once('_') {
        Some((_, rest)) => rest.split('_').next().unwrap_or(rest),
        None => address,
    };
    bare.to_lowercase()
}

pub fn proxy_url(clean: &str) -> String {
    format!("{}{}", IMAGE_PROXY_PATH, clean)
}

/// Result of asking the resolver for an address.
#[derive(Debug)]
pub enum Resolution<C> {
    /// Final URL already known; call back right away.
    Ready(String, C),
    /// A probe for the address is in flight; the callback was queued.
    Queued,
    /// Caller must probe `url` and report back through `complete`.
    Probe { address: String, url: String },
}

/// Address -> final icon URL, with at most one probe per address in flight.
/// `C` is the caller's callback type.
#[derive(Debug)]
pub struct AddressResolver<C> {
    placeholder: String,
    resolved: FnvHashMap<String, String>,
    waiting: FnvHashMap<String, Vec<C>>,
}

impl<C> AddressResolver<C> {
    pub fn new(placeholder: impl Into<String>) -> Self {
        Self {
            placeholder: placeholder.into(),
            resolved: FnvHashMap::default(),
            waiting: FnvHashMap::default(),
        }
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    pub fn cached(&self, address: &str) -> Option<&str> {
        self.resolved.get(&clean_address(address)).map(String::as_str)
    }

    pub fn in_flight(&self) -> usize {
        self.waiting.len()
    }

    /// Whether a probe for the cleaned `address` is still unsettled.
    pub fn is_probing(&self, address: &str) -> bool {
        self.waiting.contains_key(address)
    }

    pub fn request(&mut self, address: &str, callback: C) -> Resolution<C> {
        let clean = clean_address(address);
        if let Some(url) = self.resolved.get(&clean) {
            return Resolution::Ready(url.clone(), callback);
        }
        if let Some(queue) = self.waiting.get_mut(&clean) {
            queue.push(callback);
            return Resolution::Queued;
        }
        let url = proxy_url(&clean);
        self.waiting.insert(clean.clone(), vec![callback]);
        Resolution::Probe {
            address: clean,
            url,
        }
    }

    /// Settle the probe for `address`. Returns the final URL together with
    /// every callback that was waiting on it, or `None` if the probe was
    /// already settled (load racing its timeout).
    pub fn complete(&mut self, address: &str, loaded: bool) -> Option<(String, Vec<C>)> {
        let callbacks = self.waiting.remove(address)?;
        let final_url = if loaded {
            proxy_url(address)
        } else {
            self.placeholder.clone()
        };
        self.resolved.insert(address.to_string(), final_url.clone());
        Some((final_url, callbacks))
    }
}

impl<C> Default for AddressResolver<C> {
    fn default() -> Self {
        Self::new(PLACEHOLDER_IMAGE_URL)
    }
}
