//! Money as a decimal value object.
//!
//! The backend serializes balances and prices as decimal strings
//! (`"150.00"`); keeping them as `Decimal` avoids float noise in sums.

use core::iter::Sum;
use core::ops::{Add, AddAssign, Mul, Sub};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, Serializer};

use crate::value_object::ValueObject;

/// Amount in bolívares (the store's single operating currency).
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl ValueObject for Money {}

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);

    pub fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    pub fn amount(self) -> Decimal {
        self.0
    }

    /// Multiply a unit price by a quantity, clamping at the representable range.
    ///
    /// Amounts built from caller input go through [`Money::checked_times`].
    pub fn times(self, quantity: i64) -> Money {
        Money(self.0.saturating_mul(Decimal::from(quantity)))
    }

    pub fn checked_times(self, quantity: i64) -> Option<Money> {
        self.0.checked_mul(Decimal::from(quantity)).map(Money)
    }

    pub fn checked_add(self, rhs: Money) -> Option<Money> {
        self.0.checked_add(rhs.0).map(Money)
    }

    /// Render as `Bs. 1.234,56` (es-VE grouping, always two decimals).
    pub fn format_bs(self) -> String {
        let rounded = self.0.round_dp(2);
        let plain = format!("{:.2}", rounded.abs());
        let (int_part, frac_part) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));

        let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
        for (i, ch) in int_part.chars().enumerate() {
            if i > 0 && (int_part.len() - i) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(ch);
        }

        let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
        format!("Bs. {sign}{grouped},{frac_part}")
    }
}

/// Serialize as a JSON number. Request payloads use this; the backend's
/// validators reject numeric strings.
pub fn serialize_as_number<S: Serializer>(money: &Money, serializer: S) -> Result<S::Ok, S::Error> {
    rust_decimal::serde::float::serialize(&money.0, serializer)
}

impl From<Decimal> for Money {
    fn from(value: Decimal) -> Self {
        Self(value)
    }
}

impl From<i64> for Money {
    fn from(value: i64) -> Self {
        Self(Decimal::from(value))
    }
}

impl core::fmt::Display for Money {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.format_bs())
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Money {
        Money(self.0 - rhs.0)
    }
}

impl Mul<i64> for Money {
    type Output = Money;

    fn mul(self, rhs: i64) -> Money {
        self.times(rhs)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Money {
        iter.copied().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::str::FromStr;

    fn m(s: &str) -> Money {
        Money::new(Decimal::from_str(s).unwrap())
    }

    #[test]
    fn formats_with_venezuelan_grouping() {
        assert_eq!(m("1234.5").format_bs(), "Bs. 1.234,50");
        assert_eq!(m("0").format_bs(), "Bs. 0,00");
        assert_eq!(m("1234567.891").format_bs(), "Bs. 1.234.567,89");
        assert_eq!(m("999").format_bs(), "Bs. 999,00");
        assert_eq!(m("-50.25").format_bs(), "Bs. -50,25");
    }

    #[test]
    fn times_and_sum_are_exact() {
        let total: Money = [m("0.10"), m("0.20")].iter().sum();
        assert_eq!(total, m("0.30"));
        assert_eq!(m("10").times(2), m("20"));
    }

    #[test]
    fn checked_arithmetic_reports_overflow() {
        let price = m("100000000000");
        assert_eq!(price.checked_times(3), Some(m("300000000000")));
        assert_eq!(price.checked_times(i64::MAX), None);
        assert_eq!(Money::new(Decimal::MAX).checked_add(m("1")), None);
        assert_eq!(price.times(i64::MAX), Money::new(Decimal::MAX));
    }

    proptest::proptest! {
        #[test]
        fn formatted_amount_reads_back(cents in 0i64..10_000_000_000) {
            let money = Money::new(Decimal::new(cents, 2));
            let text = money.format_bs();
            let digits = text.trim_start_matches("Bs. ").replace('.', "").replace(',', ".");
            proptest::prop_assert_eq!(Decimal::from_str(&digits).unwrap(), money.amount());
        }
    }
}
