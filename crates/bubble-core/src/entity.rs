//! Market records rendered as bubbles.
//!
//! Records arrive from the data layer already filtered and limited. They are
//! kept in the same shape they travel in from JS, so a clicked bubble can hand
//! its record straight back to the caller.

use crate::error::{ConfigError, EntityError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Timeframe {
    M5,
    H1,
    H6,
    #[default]
    H24,
}

impl Timeframe {
    pub const ALL: [Timeframe; 4] = [Timeframe::M5, Timeframe::H1, Timeframe::H6, Timeframe::H24];

    pub fn as_str(self) -> &'static str {
        match self {
            Timeframe::M5 => "m5",
            Timeframe::H1 => "h1",
            Timeframe::H6 => "h6",
            Timeframe::H24 => "h24",
        }
    }
}

impl FromStr for Timeframe {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "m5" | "5m" => Ok(Timeframe::M5),
            "h1" | "1h" => Ok(Timeframe::H1),
            "h6" | "6h" => Ok(Timeframe::H6),
            "h24" | "24h" => Ok(Timeframe::H24),
            _ => Err(ConfigError::UnknownTimeframe(s.to_string())),
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One value per timeframe bucket.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeframeValues {
    #[serde(default)]
    pub m5: f64,
    #[serde(default)]
    pub h1: f64,
    #[serde(default)]
    pub h6: f64,
    #[serde(default)]
    pub h24: f64,
}

impl TimeframeValues {
    pub fn get(&self, timeframe: Timeframe) -> f64 {
        match timeframe {
            Timeframe::M5 => self.m5,
            Timeframe::H1 => self.h1,
            Timeframe::H6 => self.h6,
            Timeframe::H24 => self.h24,
        }
    }

    fn all_finite(&self) -> bool {
        Timeframe::ALL.iter().all(|tf| self.get(*tf).is_finite())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxCounts {
    #[serde(default)]
    pub buys: u32,
    #[serde(default)]
    pub sells: u32,
    #[serde(default)]
    pub buyers: u32,
    #[serde(default)]
    pub sellers: u32,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeframeTransactions {
    #[serde(default)]
    pub m5: TxCounts,
    #[serde(default)]
    pub h1: TxCounts,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub h6: Option<TxCounts>,
    #[serde(default)]
    pub h24: TxCounts,
}

/// Per-token aggregate across all of its pools.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub id: String,
    pub symbol: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub price_change: TimeframeValues,
    #[serde(default)]
    pub volume: TimeframeValues,
    #[serde(default)]
    pub current_price: f64,
    #[serde(default)]
    pub market_cap: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fdv_usd: Option<f64>,
    #[serde(default)]
    pub reserve_in_usd: f64,
    #[serde(default)]
    pub transactions: TimeframeTransactions,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default)]
    pub pair_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pool_count: Option<u32>,
}

impl Token {
    pub fn change(&self, timeframe: Timeframe) -> f64 {
        self.price_change.get(timeframe)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeDirection {
    Buy,
    Sell,
}

impl FromStr for TradeDirection {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "buy" => Ok(TradeDirection::Buy),
            "sell" => Ok(TradeDirection::Sell),
            _ => Err(ConfigError::UnknownDirection(s.to_string())),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub id: String,
    #[serde(rename = "type")]
    pub direction: TradeDirection,
    pub amount_usd: f64,
    #[serde(default)]
    pub amount_token: f64,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub tx_hash: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wallet_address: Option<String>,
    #[serde(
        default,
        rename = "tokenImage",
        alias = "token_image",
        skip_serializing_if = "Option::is_none"
    )]
    pub token_image: Option<String>,
}

impl Trade {
    pub fn is_buy(&self) -> bool {
        self.direction == TradeDirection::Buy
    }
}

/// A record shown by one bubble.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Entity {
    Token(Token),
    Trade(Trade),
}

impl Entity {
    pub fn id(&self) -> &str {
        match self {
            Entity::Token(t) => &t.id,
            Entity::Trade(t) => &t.id,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Entity::Token(_) => "token",
            Entity::Trade(_) => "trade",
        }
    }

    pub fn as_token(&self) -> Option<&Token> {
        match self {
            Entity::Token(t) => Some(t),
            Entity::Trade(_) => None,
        }
    }

    pub fn as_trade(&self) -> Option<&Trade> {
        match self {
            Entity::Trade(t) => Some(t),
            Entity::Token(_) => None,
        }
    }

    /// Icon URL carried by the record, if any.
    pub fn image_url(&self) -> Option<&str> {
        let url = match self {
            Entity::Token(t) => t.image.as_deref(),
            Entity::Trade(t) => t.token_image.as_deref(),
        };
        url.filter(|u| !u.trim().is_empty())
    }

    pub fn validate(&self) -> Result<(), EntityError> {
        if self.id().trim().is_empty() {
            return Err(EntityError::EmptyId);
        }
        let non_finite = |field| EntityError::NonFinite {
            id: self.id().to_string(),
            field,
        };
        match self {
            Entity::Token(t) if !t.price_change.all_finite() => Err(non_finite("price change")),
            Entity::Trade(t) if !t.amount_usd.is_finite() => Err(non_finite("usd amount")),
            _ => Ok(()),
        }
    }
}

impl From<Token> for Entity {
    fn from(t: Token) -> Self {
        Entity::Token(t)
    }
}

impl From<Trade> for Entity {
    fn from(t: Trade) -> Self {
        Entity::Trade(t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeframe_parses_both_spellings() {
        assert_eq!("h24".parse::<Timeframe>().unwrap(), Timeframe::H24);
        assert_eq!("5m".parse::<Timeframe>().unwrap(), Timeframe::M5);
        assert_eq!(" H1 ".parse::<Timeframe>().unwrap(), Timeframe::H1);
        assert!("1w".parse::<Timeframe>().is_err());
    }

    #[test]
    fn token_payload_deserializes_with_defaults() {
        let json = r#"{"id":"0xabc","symbol":"RON","price_change":{"h24":-4.2}}"#;
        let entity: Entity = serde_json::from_str(json).unwrap();
        let token = entity.as_token().expect("token");
        assert_eq!(token.change(Timeframe::H24), -4.2);
        assert_eq!(token.change(Timeframe::M5), 0.0);
        assert!(entity.image_url().is_none());
    }

    #[test]
    fn trade_payload_deserializes_and_round_trips_shape() {
        let json = r#"{
            "id":"t-1","type":"sell","amount_usd":1520.5,"amount_token":3.0,
            "timestamp":"2024-05-01T12:00:00Z","tx_hash":"0xdead",
            "tokenImage":"https://img/axs.png"
        }"#;
        let entity: Entity = serde_json::from_str(json).unwrap();
        let trade = entity.as_trade().expect("trade");
        assert_eq!(trade.direction, TradeDirection::Sell);
        assert_eq!(entity.image_url(), Some("https://img/axs.png"));

        let back = serde_json::to_value(&entity).unwrap();
        assert_eq!(back["type"], "sell");
        assert_eq!(back["tokenImage"], "https://img/axs.png");
        assert!(back.get("wallet_address").is_none());
    }

    #[test]
    fn validate_rejects_empty_ids_and_nan_metrics() {
        let json = r#"{"id":" ","symbol":"X"}"#;
        let entity: Entity = serde_json::from_str(json).unwrap();
        assert_eq!(entity.validate(), Err(EntityError::EmptyId));

        let mut token: Token = serde_json::from_str(r#"{"id":"a","symbol":"A"}"#).unwrap();
        token.price_change.h6 = f64::NAN;
        assert!(matches!(
            Entity::Token(token).validate(),
            Err(EntityError::NonFinite { .. })
        ));
    }
}
