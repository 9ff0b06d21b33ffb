//! Bond price table loading.
//!
//! Tables carry a `maturity, coupon, bid, ask` header and are comma or tab
//! delimited. Coupons are quoted in percent, prices per 100 face.

use std::path::Path;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Deserialize;
use yieldfit_core::Date;

use crate::commands::parse_date;
use crate::error::{CliError, CliResult};

/// One quoted bond.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BondQuote {
    /// Maturity date.
    pub maturity: Date,
    /// Coupon in percent.
    pub coupon: Decimal,
    /// Bid clean price.
    pub bid: Decimal,
    /// Ask clean price.
    pub ask: Decimal,
}

impl BondQuote {
    /// Mid clean price, `(bid + ask) / 2`.
    pub fn mid(&self) -> Decimal {
        (self.bid + self.ask) / Decimal::TWO
    }
}

#[derive(Debug, Deserialize)]
struct RawQuote {
    maturity: String,
    coupon: String,
    bid: String,
    ask: String,
}

/// Reads a bond price table.
pub fn load_quotes(path: &Path) -> CliResult<Vec<BondQuote>> {
    let content = std::fs::read_to_string(path)?;
    parse_quotes(&content, &path.display().to_string())
}

/// Parses a bond price table already in memory. `source` names it in errors.
pub fn parse_quotes(content: &str, source: &str) -> CliResult<Vec<BondQuote>> {
    let header = content.lines().next().unwrap_or_default();
    let delimiter = if header.contains('\t') { b'\t' } else { b',' };

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| row_error(source, 1, e.to_string()))?
        .clone();

    let mut quotes = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| row_error(source, csv_line(&e), e.to_string()))?;
        let line = record.position().map_or(0, |p| p.line() as usize);
        let raw: RawQuote = record
            .deserialize(Some(&headers))
            .map_err(|e| row_error(source, line, e.to_string()))?;

        let maturity = parse_date(&raw.maturity).map_err(|e| row_error(source, line, e.to_string()))?;
        let coupon = parse_decimal(source, line, "coupon", &raw.coupon)?;
        let bid = parse_decimal(source, line, "bid", &raw.bid)?;
        let ask = parse_decimal(source, line, "ask", &raw.ask)?;
        if bid > ask {
            return Err(row_error(source, line, format!("bid {bid} above ask {ask}")));
        }

        quotes.push(BondQuote {
            maturity,
            coupon,
            bid,
            ask,
        });
    }

    if quotes.is_empty() {
        return Err(row_error(source, 1, "no bond rows".to_string()));
    }
    Ok(quotes)
}

fn parse_decimal(source: &str, line: usize, field: &str, value: &str) -> CliResult<Decimal> {
    Decimal::from_str(value)
        .map_err(|_| row_error(source, line, format!("{field} '{value}' is not a number")))
}

fn csv_line(err: &csv::Error) -> usize {
    err.position().map_or(0, |p| p.line() as usize)
}

fn row_error(source: &str, line: usize, reason: String) -> CliError {
    CliError::InvalidRow {
        path: source.to_string(),
        line,
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tab_delimited_gilt_table() {
        let table = "maturity\tcoupon\tbid\task\n\
                     07-Mar-13\t4.50\t101.93\t101.99\n\
                     27-Sep-13\t8.00\t107.53\t107.60\n";
        let quotes = parse_quotes(table, "gilts").unwrap();

        assert_eq!(quotes.len(), 2);
        assert_eq!(quotes[0].maturity, Date::from_ymd(2013, 3, 7).unwrap());
        assert_eq!(quotes[0].coupon, Decimal::from_str("4.50").unwrap());
        assert_eq!(quotes[1].mid(), Decimal::from_str("107.565").unwrap());
    }

    #[test]
    fn test_comma_delimited_iso_dates() {
        let table = "maturity, coupon, bid, ask\n2030-01-15, 5.0, 99.5, 100.5\n";
        let quotes = parse_quotes(table, "prices.csv").unwrap();

        assert_eq!(quotes.len(), 1);
        assert_eq!(quotes[0].maturity, Date::from_ymd(2030, 1, 15).unwrap());
        assert_eq!(quotes[0].mid(), Decimal::ONE_HUNDRED);
    }

    #[test]
    fn test_bad_rows_name_the_line() {
        let table = "maturity,coupon,bid,ask\n2030-01-15,5.0,99.5,100.5\n2031-01-15,five,99,100\n";
        match parse_quotes(table, "prices.csv") {
            Err(CliError::InvalidRow { line, reason, .. }) => {
                assert_eq!(line, 3);
                assert!(reason.contains("coupon"));
            }
            other => panic!("expected InvalidRow, got {other:?}"),
        }

        let crossed = "maturity,coupon,bid,ask\n2030-01-15,5.0,101,100\n";
        assert!(matches!(
            parse_quotes(crossed, "prices.csv"),
            Err(CliError::InvalidRow { line: 2, .. })
        ));
    }

    #[test]
    fn test_empty_table() {
        assert!(parse_quotes("maturity,coupon,bid,ask\n", "empty.csv").is_err());
    }
}
