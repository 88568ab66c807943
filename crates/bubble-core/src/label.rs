//! Label text and adaptive text/icon layout for one bubble.
//!
//! Everything here is pure geometry; the web renderer just executes the
//! resulting layout against a 2D context.

use crate::color::Rgba;
use crate::entity::{Token, Trade};
use chrono::{DateTime, Utc};
use glam::Vec2;
use smallvec::SmallVec;

pub const FONT_FAMILY: &str = "Arial";
pub const TEXT_PRIMARY: Rgba = Rgba::new(255, 255, 255, 1.0);
pub const TEXT_MUTED: Rgba = Rgba::new(148, 163, 184, 0.9);
pub const ELLIPSIS: char = '…';

#[derive(Clone, Debug, PartialEq)]
pub struct TextLine {
    pub text: String,
    pub font_px: f32,
    pub weight: Option<&'static str>,
    pub offset_y: f32,
    pub color: Rgba,
}

impl TextLine {
    /// CSS font shorthand, e.g. `bold 14.0px Arial`.
    pub fn font(&self) -> String {
        match self.weight {
            Some(w) => format!("{} {:.1}px {}", w, self.font_px, FONT_FAMILY),
            None => format!("{:.1}px {}", self.font_px, FONT_FAMILY),
        }
    }
}

/// Icon square relative to the bubble center.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IconRect {
    pub top_left: Vec2,
    pub size: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BubbleLayout {
    pub icon: IconRect,
    pub lines: SmallVec<[TextLine; 2]>,
}

pub fn format_percent(change: f64) -> String {
    format!("{:.1}%", change)
}

pub fn format_usd(amount: f64) -> String {
    if amount >= 1_000_000.0 {
        format!("${:.1}M", amount / 1_000_000.0)
    } else if amount >= 1_000.0 {
        format!("${:.1}K", amount / 1_000.0)
    } else {
        format!("${:.0}", amount)
    }
}

pub fn format_time_ago(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let minutes = (now - timestamp).num_minutes();
    if minutes < 1 {
        return "just now".to_string();
    }
    if minutes < 60 {
        return format!("{}m ago", minutes);
    }
    let hours = minutes / 60;
    if hours < 24 {
        format!("{}h ago", hours)
    } else {
        format!("{}d ago", hours / 24)
    }
}

/// First three characters followed by an ellipsis.
pub fn abbreviate(symbol: &str) -> String {
    let mut short: String = symbol.chars().take(3).collect();
    short.push(ELLIPSIS);
    short
}

pub fn icon_rect(radius: f32, mobile: bool) -> IconRect {
    let mut size = if mobile { radius * 0.7 } else { radius * 0.5 };
    if mobile && radius < 35.0 {
        size = size.max(20.0);
    }
    let lift = if mobile { radius * 0.45 } else { radius * 0.4 };
    IconRect {
        top_left: Vec2::new(-size / 2.0, -size / 2.0 - lift),
        size,
    }
}

/// Symbol font size from bubble radius, symbol length and device class.
/// Returns `(font_px, min_font_px)`.
pub fn symbol_font_size(radius: f32, symbol_len: usize, mobile: bool) -> (f32, f32) {
    let mut size = if mobile { radius / 2.5 } else { radius / 3.0 };
    if symbol_len > 3 {
        let floor = if mobile { 0.7_f32 } else { 0.6 };
        size *= floor.max(4.0 / (symbol_len as f32 + 1.0));
    }
    if mobile {
        size *= if radius < 30.0 {
            0.8
        } else if radius < 45.0 {
            0.85
        } else {
            0.9
        };
    }
    if radius < 25.0 && symbol_len > 4 {
        size *= 0.8;
    }
    let dynamic_min = (if mobile { 8.0 } else { 6.0_f32 }).max(radius / 6.0);
    let min_size = if mobile {
        dynamic_min.max(10.0)
    } else {
        dynamic_min.max(8.0)
    };
    let max_size = if mobile { radius / 2.2 } else { radius / 2.5 };
    (size.max(min_size).min(max_size), min_size)
}

pub fn token_layout(token: &Token, change: f64, radius: f32, mobile: bool) -> BubbleLayout {
    let symbol = token.symbol.to_uppercase();
    let len = symbol.chars().count();
    let (symbol_px, min_symbol_px) = symbol_font_size(radius, len, mobile);

    let truncate = (radius < 25.0 && len > 4 && mobile) || (radius < 20.0 && len > 3);
    let (symbol_text, symbol_offset) = if truncate {
        (abbreviate(&symbol), 0.0)
    } else {
        (symbol, if mobile { 0.0 } else { radius * 0.05 })
    };

    let percent_px = if mobile {
        (symbol_px * 0.95).min(symbol_px - 1.0)
    } else {
        (symbol_px * 0.9).min(symbol_px - 1.0)
    };
    let min_percent_px = if mobile {
        (min_symbol_px * 0.9).max(8.0)
    } else {
        (min_symbol_px * 0.8).max(5.0)
    };
    let percent_offset = match (mobile, radius < 25.0) {
        (true, true) => radius * 0.4,
        (true, false) => radius * 0.5,
        (false, true) => radius * 0.45,
        (false, false) => radius * 0.55,
    };

    let mut lines = SmallVec::new();
    lines.push(TextLine {
        text: symbol_text,
        font_px: symbol_px,
        weight: Some(if mobile { "700" } else { "bold" }),
        offset_y: symbol_offset,
        color: TEXT_PRIMARY,
    });
    lines.push(TextLine {
        text: format_percent(change),
        font_px: percent_px.max(min_percent_px),
        weight: None,
        offset_y: percent_offset,
        color: TEXT_PRIMARY,
    });
    BubbleLayout {
        icon: icon_rect(radius, mobile),
        lines,
    }
}

pub fn trade_layout(trade: &Trade, radius: f32, mobile: bool, now: DateTime<Utc>) -> BubbleLayout {
    let amount_px = (radius * 0.3).min(18.0);
    let time_px = (radius * 0.2).min(14.0).max(if radius > 25.0 { 8.0 } else { 7.0 });
    let time_offset = if radius > 40.0 {
        radius * 0.4
    } else {
        radius * 0.35
    };

    let mut lines = SmallVec::new();
    lines.push(TextLine {
        text: format_usd(trade.amount_usd),
        font_px: amount_px,
        weight: Some("bold"),
        offset_y: radius * 0.1,
        color: TEXT_PRIMARY,
    });
    lines.push(TextLine {
        text: format_time_ago(trade.timestamp, now),
        font_px: time_px,
        weight: None,
        offset_y: time_offset,
        color: TEXT_MUTED,
    });
    BubbleLayout {
        icon: icon_rect(radius, mobile),
        lines,
    }
}
