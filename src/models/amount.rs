//! Exact monetary amounts and ratios.
//!
//! Amounts are kept in protocol base units as arbitrary-precision rationals. The protocol's
//! decimal shift is only applied in [`Amount::format`], so no intermediate value is ever
//! rounded.

use std::cmp::Ordering;
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Mul, Sub};
use std::str::FromStr;

use num_bigint::BigInt;
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::ProtocolInfo;

/// Fraction digits kept when an exact value is written out for serialization.
const SERIALIZED_FRACTION_DIGITS: u32 = 24;

/// Fraction digits shown for formatted percentages.
const PERCENT_FRACTION_DIGITS: u32 = 2;

fn ten_pow(exp: u32) -> BigInt {
    BigInt::from(10u32).pow(exp)
}

/// Parses a plain decimal string such as `"12"`, `"-0.25"` or `".5"`.
pub fn parse_decimal(input: &str) -> Option<BigRational> {
    let trimmed = input.trim().trim_matches('"');
    let (negative, unsigned) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let (int_part, frac_part) = unsigned.split_once('.').unwrap_or((unsigned, ""));

    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }
    let all_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    if !all_digits(int_part) || !all_digits(frac_part) {
        return None;
    }

    let numer = BigInt::from_str(&format!("{int_part}{frac_part}")).ok()?;
    let value = BigRational::new(numer, ten_pow(frac_part.len() as u32));
    Some(if negative { -value } else { value })
}

/// Writes `value` in decimal notation, rounding half away from zero to at most
/// `fraction_digits` digits and trimming trailing zeros.
pub fn format_rational(value: &BigRational, fraction_digits: u32) -> String {
    let scale = ten_pow(fraction_digits);
    let scaled = (value * BigRational::from_integer(scale.clone()))
        .round()
        .to_integer();
    let negative = scaled.is_negative();
    let (int_part, frac_part) = scaled.abs().div_rem(&scale);

    let mut out = int_part.to_string();
    if fraction_digits > 0 && !frac_part.is_zero() {
        let padded = format!(
            "{:0>width$}",
            frac_part.to_string(),
            width = fraction_digits as usize
        );
        out.push('.');
        out.push_str(padded.trim_end_matches('0'));
    }
    if negative {
        out.insert(0, '-');
    }
    out
}

/// Shortens a long address for list views, e.g. `"5GrwvaE...utQY"`.
pub fn shorten_address(address: &str) -> String {
    const HEAD: usize = 7;
    const TAIL: usize = 4;
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= HEAD + TAIL + 3 {
        return address.to_string();
    }
    let head: String = chars[..HEAD].iter().collect();
    let tail: String = chars[chars.len() - TAIL..].iter().collect();
    format!("{head}...{tail}")
}

fn serialize_rational<S: Serializer>(
    value: &BigRational,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_rational(value, SERIALIZED_FRACTION_DIGITS))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDecimal {
    Text(String),
    Unsigned(u64),
    Signed(i64),
}

fn deserialize_rational<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<BigRational, D::Error> {
    match RawDecimal::deserialize(deserializer)? {
        RawDecimal::Text(text) => parse_decimal(&text)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid decimal {text:?}"))),
        RawDecimal::Unsigned(n) => Ok(BigRational::from_integer(BigInt::from(n))),
        RawDecimal::Signed(n) => Ok(BigRational::from_integer(BigInt::from(n))),
    }
}

/// An amount in protocol base units.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(BigRational);

impl Amount {
    pub fn zero() -> Self {
        Self(BigRational::zero())
    }

    pub fn from_base_units(units: impl Into<BigInt>) -> Self {
        Self(BigRational::from_integer(units.into()))
    }

    pub fn parse(input: &str) -> Option<Self> {
        parse_decimal(input).map(Self)
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_positive(&self) -> bool {
        self.0.is_positive()
    }

    pub fn as_rational(&self) -> &BigRational {
        &self.0
    }

    /// Moves the decimal point: `shifted_by(-decimals)` turns base units into whole coins.
    pub fn shifted_by(&self, places: i32) -> Self {
        let factor = BigRational::from_integer(ten_pow(places.unsigned_abs()));
        match places.cmp(&0) {
            Ordering::Less => Self(&self.0 / factor),
            Ordering::Equal => self.clone(),
            Ordering::Greater => Self(&self.0 * factor),
        }
    }

    /// `self / total`, or `None` when `total` is zero.
    pub fn ratio_to(&self, total: &Amount) -> Option<Ratio> {
        if total.is_zero() {
            None
        } else {
            Some(Ratio(&self.0 / &total.0))
        }
    }

    /// Exact base-unit value rounded to an integer, for pre-filled form fields.
    pub fn to_base_units_string(&self) -> String {
        format_rational(&self.0, 0)
    }

    /// User-facing value in whole coins, e.g. `"1.5 DOT"`.
    pub fn format(&self, protocol: &ProtocolInfo, max_fraction_digits: u32) -> String {
        format!(
            "{} {}",
            self.to_coin_string(protocol, max_fraction_digits),
            protocol.symbol
        )
    }

    /// Value in whole coins without the symbol.
    pub fn to_coin_string(&self, protocol: &ProtocolInfo, max_fraction_digits: u32) -> String {
        format_rational(
            self.shifted_by(-(protocol.decimals as i32)).as_rational(),
            max_fraction_digits,
        )
    }
}

impl Default for Amount {
    fn default() -> Self {
        Self::zero()
    }
}

impl From<u64> for Amount {
    fn from(units: u64) -> Self {
        Self::from_base_units(units)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_rational(&self.0, SERIALIZED_FRACTION_DIGITS))
    }
}

impl Add<&Amount> for &Amount {
    type Output = Amount;

    fn add(self, rhs: &Amount) -> Amount {
        Amount(&self.0 + &rhs.0)
    }
}

impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Amount) -> Amount {
        Amount(self.0 + rhs.0)
    }
}

impl Sub<&Amount> for &Amount {
    type Output = Amount;

    fn sub(self, rhs: &Amount) -> Amount {
        Amount(&self.0 - &rhs.0)
    }
}

impl Mul<&Ratio> for &Amount {
    type Output = Amount;

    fn mul(self, rhs: &Ratio) -> Amount {
        Amount(&self.0 * &rhs.0)
    }
}

impl<'a> Sum<&'a Amount> for Amount {
    fn sum<I: Iterator<Item = &'a Amount>>(iter: I) -> Self {
        iter.fold(Amount::zero(), |acc, amount| &acc + amount)
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_rational(&self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserialize_rational(deserializer).map(Self)
    }
}

/// A dimensionless ratio such as a commission, a fee or a usage level.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ratio(BigRational);

impl Ratio {
    pub fn one() -> Self {
        Self(BigRational::one())
    }

    /// `numer / denom`, or `None` when `denom` is zero.
    pub fn checked(numer: impl Into<BigInt>, denom: impl Into<BigInt>) -> Option<Self> {
        let denom = denom.into();
        if denom.is_zero() {
            None
        } else {
            Some(Self(BigRational::new(numer.into(), denom)))
        }
    }

    pub fn parse(input: &str) -> Option<Self> {
        parse_decimal(input).map(Self)
    }

    pub fn as_rational(&self) -> &BigRational {
        &self.0
    }

    pub fn to_f64(&self) -> Option<f64> {
        self.0.to_f64()
    }

    /// `1 - self`.
    pub fn complement(&self) -> Self {
        Self(BigRational::one() - &self.0)
    }

    pub fn is_below_one(&self) -> bool {
        self.0 < BigRational::one()
    }

    /// Arithmetic mean, `None` for an empty input.
    pub fn mean<I: IntoIterator<Item = Ratio>>(values: I) -> Option<Self> {
        let (sum, count) = values
            .into_iter()
            .fold((BigRational::zero(), 0u64), |(sum, count), value| {
                (sum + value.0, count + 1)
            });
        if count == 0 {
            None
        } else {
            Some(Self(sum / BigRational::from_integer(BigInt::from(count))))
        }
    }

    /// `"12.5%"`.
    pub fn format_percentage(&self) -> String {
        let percent = &self.0 * BigRational::from_integer(BigInt::from(100u32));
        format!("{}%", format_rational(&percent, PERCENT_FRACTION_DIGITS))
    }
}

impl Mul<&Ratio> for &Ratio {
    type Output = Ratio;

    fn mul(self, rhs: &Ratio) -> Ratio {
        Ratio(&self.0 * &rhs.0)
    }
}

impl fmt::Display for Ratio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_rational(&self.0, SERIALIZED_FRACTION_DIGITS))
    }
}

impl Serialize for Ratio {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_rational(&self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for Ratio {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserialize_rational(deserializer).map(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dot() -> ProtocolInfo {
        ProtocolInfo::new("polkadot", "DOT", 10)
    }

    #[test]
    fn parses_plain_decimals() {
        assert_eq!(Amount::parse("1000"), Some(Amount::from(1000)));
        assert_eq!(Ratio::parse("0.1"), Ratio::checked(1, 10));
        assert_eq!(Ratio::parse(".5"), Ratio::checked(1, 2));
        assert_eq!(Ratio::parse("-0.25"), Ratio::checked(-1, 4));
        assert_eq!(Amount::parse(""), None);
        assert_eq!(Amount::parse("1e5"), None);
        assert_eq!(Amount::parse("."), None);
    }

    #[test]
    fn formats_with_the_protocol_shift() {
        let amount = Amount::from(15_000_000_000);
        assert_eq!(amount.format(&dot(), 10), "1.5 DOT");
        assert_eq!(Amount::from(1).format(&dot(), 4), "0 DOT");
        assert_eq!(Amount::from(5_000_000).format(&dot(), 4), "0.0005 DOT");
    }

    #[test]
    fn rounding_only_happens_when_formatting() {
        let third = &Amount::from(10) * &Ratio::checked(1, 3).unwrap();
        let tripled = &(&third + &third) + &third;
        assert_eq!(tripled, Amount::from(10));
        assert_eq!(format_rational(third.as_rational(), 3), "3.333");
        assert_eq!(format_rational(&BigRational::new(2.into(), 3.into()), 2), "0.67");
    }

    #[test]
    fn ratio_to_zero_total_is_undefined() {
        assert_eq!(Amount::from(5).ratio_to(&Amount::zero()), None);
        assert_eq!(Ratio::checked(1, 0), None);
        assert_eq!(
            Amount::from(8000).ratio_to(&Amount::from(7000)),
            Ratio::checked(8, 7)
        );
    }

    #[test]
    fn percentages_and_means() {
        assert_eq!(Ratio::parse("0.1").unwrap().format_percentage(), "10%");
        assert_eq!(Ratio::parse("0.12345").unwrap().format_percentage(), "12.35%");
        let mean = Ratio::mean(vec![Ratio::parse("0.1").unwrap(), Ratio::parse("0.3").unwrap()]);
        assert_eq!(mean, Ratio::parse("0.2"));
        assert_eq!(Ratio::mean(Vec::new()), None);
    }

    #[test]
    fn serializes_as_decimal_strings() {
        let json = serde_json::to_string(&Amount::from(42)).unwrap();
        assert_eq!(json, "\"42\"");
        let back: Amount = serde_json::from_str("\"0.5\"").unwrap();
        assert_eq!(back, Amount::parse("0.5").unwrap());
        let from_number: Amount = serde_json::from_str("7").unwrap();
        assert_eq!(from_number, Amount::from(7));
    }

    #[test]
    fn shortens_long_addresses_only() {
        assert_eq!(
            shorten_address("5GrwvaEF5zXb26Fz9rcQpDWS57CtERHpNehXCPcNoHGKutQY"),
            "5GrwvaE...utQY"
        );
        assert_eq!(shorten_address("tz1short"), "tz1short");
    }
}
