//! Bybit v5 REST payloads.

use serde::Deserialize;

use crate::models::indicators::Candle;
use crate::services::market_data::FetchError;

/// Envelope of `GET /v5/market/kline`.
#[derive(Debug, Deserialize)]
pub struct KlineResponse {
    #[serde(rename = "retCode")]
    pub ret_code: i64,
    #[serde(rename = "retMsg", default)]
    pub ret_msg: String,
    #[serde(default)]
    pub result: Option<KlineResult>,
}

#[derive(Debug, Default, Deserialize)]
pub struct KlineResult {
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    /// `[startTime, open, high, low, close, volume, turnover]`, newest first,
    /// every field a string.
    #[serde(default)]
    pub list: Vec<Vec<String>>,
}

impl KlineResponse {
    /// Decode the row list into candles ordered oldest to newest.
    pub fn into_candles(self) -> Result<Vec<Candle>, FetchError> {
        if self.ret_code != 0 {
            return Err(FetchError::Api {
                code: self.ret_code,
                message: self.ret_msg,
            });
        }

        let rows = self.result.unwrap_or_default().list;
        let mut candles = rows
            .iter()
            .enumerate()
            .map(|(i, row)| parse_row(i, row))
            .collect::<Result<Vec<_>, _>>()?;
        candles.reverse();
        Ok(candles)
    }
}

fn parse_row(index: usize, row: &[String]) -> Result<Candle, FetchError> {
    if row.len() < 6 {
        return Err(FetchError::Decode(format!(
            "row {} has {} fields, expected at least 6",
            index,
            row.len()
        )));
    }

    let timestamp: i64 = row[0].parse().map_err(|_| {
        FetchError::Decode(format!("row {}: invalid start time '{}'", index, row[0]))
    })?;

    let number = |pos: usize, name: &str| -> Result<f64, FetchError> {
        row[pos].parse::<f64>().map_err(|_| {
            FetchError::Decode(format!("row {}: invalid {} '{}'", index, name, row[pos]))
        })
    };

    Ok(Candle::new(
        timestamp,
        number(1, "open")?,
        number(2, "high")?,
        number(3, "low")?,
        number(4, "close")?,
        number(5, "volume")?,
    ))
}
