// src/funkit/models.rs
use serde::Deserialize;
use serde_json::Value;

use crate::entity::{PriceError, TokenIdentifier, TokenMetadata, TokenPrice};

// Accepts a chain reported either as "8453" or as 8453
pub mod string_or_number {
    use serde::{self, Deserializer};
    use std::fmt;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct StringOrNumber;

        impl<'de> serde::de::Visitor<'de> for StringOrNumber {
            type Value = Option<String>;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a string or an integer chain id")
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(Some(value.to_string()))
            }

            fn visit_string<E>(self, value: String) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(Some(value))
            }

            fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(Some(value.to_string()))
            }

            fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(Some(value.to_string()))
            }

            fn visit_unit<E>(self) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(None)
            }

            fn visit_none<E>(self) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(None)
            }
        }

        deserializer.deserialize_any(StringOrNumber)
    }
}

// Payload of GET /asset/erc20/{chainId}/{symbol}
#[derive(Debug, Deserialize)]
struct FunkitErc20Asset {
    address: String,
    #[serde(default, deserialize_with = "string_or_number::deserialize")]
    chain: Option<String>,
    decimals: u8,
    name: String,
    symbol: String,
}

// Payload of GET /asset/erc20/price/{chainId}/{address}
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FunkitPriceInfo {
    unit_price: f64,
    #[serde(default)]
    amount: Option<f64>,
    #[serde(default)]
    total: Option<f64>,
}

/// Checks an untyped metadata payload and converts it into [`TokenMetadata`].
pub fn validate_metadata(token: &TokenIdentifier, value: Value) -> Result<TokenMetadata, PriceError> {
    let invalid = |reason: String| PriceError::InvalidMetadataResponse {
        token: token.clone(),
        reason,
    };

    if !value.is_object() {
        return Err(invalid(format!("expected a JSON object, got {}", kind_of(&value))));
    }

    let asset: FunkitErc20Asset =
        serde_json::from_value(value).map_err(|err| invalid(err.to_string()))?;

    if asset.address.trim().is_empty() {
        return Err(invalid("address must be a non-empty string".to_string()));
    }
    if asset.symbol.trim().is_empty() {
        return Err(invalid("symbol must be a non-empty string".to_string()));
    }

    Ok(TokenMetadata {
        address: asset.address,
        chain: asset.chain.unwrap_or_else(|| token.chain_id.clone()),
        decimals: asset.decimals,
        name: asset.name,
        symbol: asset.symbol,
    })
}

/// Checks an untyped price payload; a zero or negative price is rejected, never defaulted.
pub fn validate_price(token: &TokenIdentifier, value: Value) -> Result<TokenPrice, PriceError> {
    let invalid = |reason: String| PriceError::InvalidPriceResponse {
        token: token.clone(),
        reason,
    };

    if !value.is_object() {
        return Err(invalid(format!("expected a JSON object, got {}", kind_of(&value))));
    }

    let info: FunkitPriceInfo =
        serde_json::from_value(value).map_err(|err| invalid(err.to_string()))?;

    if !info.unit_price.is_finite() || info.unit_price <= 0.0 {
        return Err(invalid(format!(
            "unitPrice must be greater than zero, got {}",
            info.unit_price
        )));
    }

    let amount = info.amount.unwrap_or(1.0);

    Ok(TokenPrice {
        unit_price: info.unit_price,
        amount,
        total: info.total.unwrap_or(info.unit_price * amount),
    })
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
