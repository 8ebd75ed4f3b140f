//! Decimal values (spec §3.1): IEEE-754-decimal128-flavored fixed-point
//! arithmetic with banker's rounding, kept independent of binary-float
//! rounding error the way the spec requires.
//!
//! There is no decimal128 crate in the teacher's dependency stack (nor
//! anywhere else in the retrieval pack), so this is a small hand-rolled
//! scaled-integer decimal: an `i128` mantissa plus a `u32` scale (digits
//! after the point), capped at 34 significant digits to match the spec's
//! "34-digit precision" requirement. This mirrors the teacher's general
//! preference for small hand-rolled numeric helpers (`float_ops.rs`,
//! `arithmetic.rs`) over pulling in a crate for something central to the
//! value model.

use std::cmp::Ordering;
use std::fmt;

/// Maximum significant decimal digits carried by a `Decimal`, matching the
/// spec's "34-digit precision" requirement for decimal128.
pub const MAX_PRECISION: u32 = 34;

#[derive(Debug, Clone, Copy)]
pub struct Decimal {
    /// Signed integer mantissa; the represented value is `mantissa / 10^scale`.
    mantissa: i128,
    scale: u32,
}

impl Decimal {
    pub fn new(mantissa: i128, scale: u32) -> Self {
        let mut d = Decimal { mantissa, scale };
        d.clamp_precision();
        d
    }

    pub fn zero() -> Self {
        Decimal { mantissa: 0, scale: 0 }
    }

    pub fn from_i64(n: i64) -> Self {
        Decimal { mantissa: n as i128, scale: 0 }
    }

    /// Parse a decimal literal: optional sign, digits, optional `.digits`,
    /// optional `e`/`E` exponent (spec §4.1: "decimal literals (with
    /// fractional part or scientific notation)").
    pub fn parse(text: &str) -> Option<Decimal> {
        let (mantissa_part, exp_part) = match text.find(['e', 'E']) {
            Some(idx) => (&text[..idx], Some(&text[idx + 1..])),
            None => (text, None),
        };

        let negative = mantissa_part.starts_with('-');
        let unsigned = mantissa_part.trim_start_matches(['+', '-']);
        let (int_part, frac_part) = match unsigned.find('.') {
            Some(idx) => (&unsigned[..idx], &unsigned[idx + 1..]),
            None => (unsigned, ""),
        };
        if int_part.is_empty() && frac_part.is_empty() {
            return None;
        }
        if !int_part.chars().all(|c| c.is_ascii_digit())
            || !frac_part.chars().all(|c| c.is_ascii_digit())
        {
            return None;
        }

        let mut digits = String::with_capacity(int_part.len() + frac_part.len());
        digits.push_str(int_part);
        digits.push_str(frac_part);
        if digits.is_empty() {
            digits.push('0');
        }
        let mut mantissa: i128 = digits.parse().ok()?;
        if negative {
            mantissa = -mantissa;
        }
        let mut scale = frac_part.len() as i64;

        if let Some(exp_text) = exp_part {
            let exp: i64 = exp_text.parse().ok()?;
            scale -= exp;
        }

        if scale < 0 {
            let shift = (-scale) as u32;
            mantissa = mantissa.checked_mul(10i128.checked_pow(shift)?)?;
            scale = 0;
        }

        Some(Decimal::new(mantissa, scale as u32))
    }

    fn clamp_precision(&mut self) {
        let digit_count = |m: i128| -> u32 {
            if m == 0 {
                1
            } else {
                m.unsigned_abs().to_string().len() as u32
            }
        };
        while digit_count(self.mantissa) > MAX_PRECISION && self.scale > 0 {
            self.mantissa = banker_round_div10(self.mantissa);
            self.scale -= 1;
        }
    }

    fn rescale_pair(a: Decimal, b: Decimal) -> (i128, i128, u32) {
        let scale = a.scale.max(b.scale);
        let am = a.mantissa * 10i128.pow(scale - a.scale);
        let bm = b.mantissa * 10i128.pow(scale - b.scale);
        (am, bm, scale)
    }

    pub fn add(self, other: Decimal) -> Decimal {
        let (am, bm, scale) = Decimal::rescale_pair(self, other);
        Decimal::new(am + bm, scale)
    }

    pub fn sub(self, other: Decimal) -> Decimal {
        let (am, bm, scale) = Decimal::rescale_pair(self, other);
        Decimal::new(am - bm, scale)
    }

    pub fn mul(self, other: Decimal) -> Decimal {
        Decimal::new(self.mantissa * other.mantissa, self.scale + other.scale)
    }

    /// Division with banker's rounding (round-half-to-even) to
    /// `MAX_PRECISION` fractional digits beyond the dividend's scale,
    /// matching spec §3.1's "banker's rounding".
    pub fn div(self, other: Decimal) -> Option<Decimal> {
        if other.mantissa == 0 {
            return None;
        }
        // Scale up the numerator so the quotient carries extra precision,
        // then round-half-to-even back down.
        let extra = MAX_PRECISION;
        let scaled_num = self.mantissa * 10i128.pow(extra);
        let denom = other.mantissa;
        let (q, r) = (scaled_num / denom, scaled_num % denom);
        let result_mantissa = if r != 0 {
            banker_round_remainder(q, r, denom)
        } else {
            q
        };
        let result_scale = self.scale + extra - other.scale;
        Some(Decimal::new(result_mantissa, result_scale))
    }

    pub fn is_zero(&self) -> bool {
        self.mantissa == 0
    }

    pub fn negate(self) -> Decimal {
        Decimal { mantissa: -self.mantissa, scale: self.scale }
    }

    pub fn to_f64(self) -> f64 {
        self.mantissa as f64 / 10f64.powi(self.scale as i32)
    }
}

/// `n / 10`, rounding the dropped digit to even on an exact half.
fn banker_round_div10(n: i128) -> i128 {
    let q = n / 10;
    let r = n % 10;
    let r_abs = r.abs();
    if r_abs > 5 || (r_abs == 5 && q % 2 != 0) {
        q + r.signum()
    } else {
        q
    }
}

/// Round `q` (already truncated toward zero) up by one in the direction of
/// `r`/`denom` when the fractional remainder rounds to even.
fn banker_round_remainder(q: i128, r: i128, denom: i128) -> i128 {
    let twice_r = r.abs() * 2;
    let denom_abs = denom.abs();
    match twice_r.cmp(&denom_abs) {
        Ordering::Greater => q + r.signum() * denom.signum(),
        Ordering::Equal => {
            if q % 2 != 0 {
                q + r.signum() * denom.signum()
            } else {
                q
            }
        }
        Ordering::Less => q,
    }
}

impl PartialEq for Decimal {
    fn eq(&self, other: &Self) -> bool {
        let (am, bm, _) = Decimal::rescale_pair(*self, *other);
        am == bm
    }
}

impl PartialOrd for Decimal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        let (am, bm, _) = Decimal::rescale_pair(*self, *other);
        Some(am.cmp(&bm))
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.scale == 0 {
            return write!(f, "{}", self.mantissa);
        }
        let negative = self.mantissa < 0;
        let digits = self.mantissa.unsigned_abs().to_string();
        let scale = self.scale as usize;
        let padded = if digits.len() <= scale {
            format!("{}{}", "0".repeat(scale - digits.len() + 1), digits)
        } else {
            digits
        };
        let split = padded.len() - scale;
        let (int_part, frac_part) = padded.split_at(split);
        if negative {
            write!(f, "-{int_part}.{frac_part}")
        } else {
            write!(f, "{int_part}.{frac_part}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_fractional_literal() {
        let d = Decimal::parse("3.14").unwrap();
        assert_eq!(d.to_string(), "3.14");
    }

    #[test]
    fn parses_scientific_notation() {
        let d = Decimal::parse("1.5e2").unwrap();
        assert_eq!(d.to_string(), "150");
    }

    #[test]
    fn add_aligns_scales() {
        let a = Decimal::parse("1.5").unwrap();
        let b = Decimal::parse("2.25").unwrap();
        assert_eq!(a.add(b).to_string(), "3.75");
    }

    #[test]
    fn division_rounds_half_to_even() {
        // 1 / 4 = 0.25 exactly, no rounding needed.
        let a = Decimal::from_i64(1);
        let b = Decimal::from_i64(4);
        let q = a.div(b).unwrap();
        assert_eq!(q.to_string(), "0.25");
    }

    #[test]
    fn division_by_zero_is_none() {
        assert!(Decimal::from_i64(1).div(Decimal::zero()).is_none());
    }

    #[test]
    fn equality_ignores_trailing_scale() {
        let a = Decimal::new(150, 2); // 1.50
        let b = Decimal::new(15, 1); // 1.5
        assert_eq!(a, b);
    }

    #[test]
    fn negative_values_format_correctly() {
        let d = Decimal::parse("-0.5").unwrap();
        assert_eq!(d.to_string(), "-0.5");
    }
}
