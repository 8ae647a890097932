//! Operation-cost model: tunable constants approximating the effort of
//! doing the arithmetic by hand.
//!
//! The constants form a read-only record, deserializable from TOML so a
//! session can swap in a tuned table. `var_cancel_reward` is the only
//! negative entry; it biases the search toward cancellations.

use serde::Deserialize;

/// Base-10 digit count of `|n|`. Zero counts as one digit.
pub fn digits(n: i64) -> u32 {
    let mut m = n.unsigned_abs();
    let mut count = 1;
    while m >= 10 {
        m /= 10;
        count += 1;
    }
    count
}

/// The table of rewrite-cost constants.
///
/// All fields have sensible defaults; a TOML table may override any subset.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CostModel {
    /// Adding zero to anything.
    pub add_zero: i64,
    /// Adding two single-digit numbers.
    pub add_single_digit: i64,
    /// Per-digit charge for a multi-digit addition.
    pub add_per_digit: i64,
    /// Subtracting a number from itself.
    pub sub_identical: i64,
    /// Subtracting numbers that differ by exactly one.
    pub sub_diff_by_one: i64,
    /// Per-digit charge for a multi-digit subtraction.
    pub sub_per_digit: i64,
    /// Multiplying by zero.
    pub mul_by_zero: i64,
    /// Multiplying by one.
    pub mul_by_one: i64,
    /// Multiplying two single-digit numbers.
    pub mul_single_digit: i64,
    /// Exponent applied to the digit count of a multi-digit multiplication.
    pub mul_digit_exponent: u32,
    /// Carrying one extra term group in the working expression.
    pub var_base: i64,
    /// Combining two like variable terms.
    pub var_combine: i64,
    /// Reward (negative) for a rewrite that cancels opposite equal terms.
    pub var_cancel_reward: i64,
    /// Combining two identical composite terms.
    pub expr_combine: i64,
    /// Folding a numeric coefficient onto a variable.
    pub coeff_var_mul: i64,
    /// Merging powers of the same variable.
    pub same_var_mul: i64,
    /// An exact integer division.
    pub div: i64,
    /// Magnitude bound used by the heuristic's per-group charges.
    pub max_magnitude: i64,
}

impl Default for CostModel {
    fn default() -> Self {
        Self {
            add_zero: 1,
            add_single_digit: 1,
            add_per_digit: 2,
            sub_identical: 1,
            sub_diff_by_one: 2,
            sub_per_digit: 2,
            mul_by_zero: 1,
            mul_by_one: 1,
            mul_single_digit: 2,
            mul_digit_exponent: 2,
            var_base: 1,
            var_combine: 2,
            var_cancel_reward: -2,
            expr_combine: 3,
            coeff_var_mul: 2,
            same_var_mul: 2,
            div: 2,
            max_magnitude: 100,
        }
    }
}

impl CostModel {
    /// Parse a cost table from TOML text. Unlisted fields keep defaults.
    ///
    /// # Errors
    ///
    /// Returns the underlying TOML error for malformed input or unknown
    /// field names.
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Cost of adding two numbers by hand. Digit counts use absolute value.
    pub fn add_cost(&self, a: i64, b: i64) -> i64 {
        if a == 0 || b == 0 {
            self.add_zero
        } else if digits(a) == 1 && digits(b) == 1 {
            self.add_single_digit
        } else {
            i64::from(digits(a).max(digits(b))) * self.add_per_digit
        }
    }

    /// Cost of subtracting two numbers by hand.
    pub fn sub_cost(&self, a: i64, b: i64) -> i64 {
        if a == b {
            self.sub_identical
        } else if a.abs_diff(b) == 1 {
            self.sub_diff_by_one
        } else {
            i64::from(digits(a).max(digits(b))) * self.sub_per_digit
        }
    }

    /// Cost of multiplying two numbers by hand.
    pub fn mul_cost(&self, a: i64, b: i64) -> i64 {
        if a == 0 || b == 0 {
            self.mul_by_zero
        } else if a.unsigned_abs() == 1 || b.unsigned_abs() == 1 {
            self.mul_by_one
        } else if digits(a) == 1 && digits(b) == 1 {
            self.mul_single_digit
        } else {
            i64::from(digits(a).max(digits(b))).pow(self.mul_digit_exponent)
        }
    }

    /// Integer log10 of the heuristic magnitude bound, at least 1.
    pub fn digit_scale(&self) -> i64 {
        i64::from(digits(self.max_magnitude) - 1).max(1)
    }
}
