//! Prices and currencies as they appear in the manifest.
use crate::error::PriceError;
use std::fmt;
use std::str::FromStr;

/// Currencies a page may be priced in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Currency {
    Eur,
    Usd,
}

impl Currency {
    pub const ALL: [Currency; 2] = [Currency::Eur, Currency::Usd];

    pub fn code(self) -> &'static str {
        match self {
            Currency::Eur => "EUR",
            Currency::Usd => "USD",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Currency codes are matched exactly (`"eur"` is rejected).
impl FromStr for Currency {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Currency::ALL
            .into_iter()
            .find(|currency| currency.code() == s)
            .ok_or(())
    }
}

/// Convert a decimal amount to minor units (cents).
///
/// The integer part is multiplied by 100 and the first two fractional digits are added, padded
/// with zeros when shorter and truncated (never rounded) when longer: `"12.3"` is 1230,
/// `"12.345"` is 1234. Only the two kept fractional bytes are checked, so `"4.99€"` is 499.
/// Signs and other non-digit characters are rejected.
pub fn parse_price_minor(amount: &str) -> Result<u64, PriceError> {
    if amount.is_empty() {
        return Err(PriceError::Empty);
    }
    let (major, fraction) = match amount.split_once('.') {
        Some((major, fraction)) => (major, Some(fraction)),
        None => (amount, None),
    };
    if major.is_empty() || !major.bytes().all(|b| b.is_ascii_digit()) {
        return Err(PriceError::InvalidMajor(major.to_string()));
    }
    let major: u64 = major.parse().map_err(|_| PriceError::Overflow)?;

    let minor = match fraction {
        None => 0,
        Some(fraction) => {
            let digits = &fraction.as_bytes()[..fraction.len().min(2)];
            if !digits.iter().all(u8::is_ascii_digit) {
                return Err(PriceError::InvalidMinor(fraction.to_string()));
            }
            let tens = digits.first().map_or(0, |d| u64::from(d - b'0'));
            let ones = digits.get(1).map_or(0, |d| u64::from(d - b'0'));
            tens * 10 + ones
        }
    };

    major
        .checked_mul(100)
        .and_then(|cents| cents.checked_add(minor))
        .ok_or(PriceError::Overflow)
}

/// Render minor units back as a decimal amount (`1230` is `"12.30"`).
pub fn format_price_minor(minor: u64) -> String {
    format!("{}.{:02}", minor / 100, minor % 100)
}
