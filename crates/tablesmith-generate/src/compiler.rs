use std::fmt;

use serde::{Deserialize, Serialize};

use tablesmith_core::Schema;

/// Number of records to request. Always at least one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "i64", into = "u32")]
pub struct Quantity(u32);

impl Quantity {
    pub const MIN: Quantity = Quantity(1);

    pub fn new(count: u32) -> Self {
        Self(count.max(1))
    }

    pub fn get(self) -> u32 {
        self.0
    }

    /// Read a quantity from user text the way a number input does: the
    /// leading integer is taken and anything unusable becomes one.
    pub fn parse(input: &str) -> Self {
        let input = input.trim_start();
        let (negative, digits) = match input.as_bytes().first() {
            Some(b'-') => (true, &input[1..]),
            Some(b'+') => (false, &input[1..]),
            _ => (false, input),
        };

        let digits: &str = digits
            .find(|ch: char| !ch.is_ascii_digit())
            .map_or(digits, |end| &digits[..end]);
        if negative || digits.is_empty() {
            return Self::MIN;
        }

        let count = digits.bytes().fold(0u64, |acc, digit| {
            acc.saturating_mul(10).saturating_add(u64::from(digit - b'0'))
        });
        Self::new(u32::try_from(count).unwrap_or(u32::MAX))
    }
}

impl From<i64> for Quantity {
    fn from(count: i64) -> Self {
        if count < 1 {
            Self::MIN
        } else {
            Self::new(u32::try_from(count).unwrap_or(u32::MAX))
        }
    }
}

impl From<u32> for Quantity {
    fn from(count: u32) -> Self {
        Self::new(count)
    }
}

impl From<f64> for Quantity {
    fn from(count: f64) -> Self {
        if !count.is_finite() || count < 1.0 {
            return Self::MIN;
        }
        let count = count.trunc();
        if count >= f64::from(u32::MAX) {
            Self(u32::MAX)
        } else {
            Self::new(count as u32)
        }
    }
}

impl From<Quantity> for u32 {
    fn from(quantity: Quantity) -> Self {
        quantity.0
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Compile a schema into the generation instruction sent to every provider.
///
/// The output depends only on the column names and descriptions, in order,
/// and on the quantity. Provider envelopes are added by the adapters.
pub fn compile(schema: &Schema, quantity: Quantity) -> String {
    let fields = schema
        .iter()
        .map(|col| format!("\"{}\": {}", col.name, col.description))
        .collect::<Vec<_>>()
        .join(",\n");

    let mut prompt = String::new();
    prompt.push_str("You are a data generator.\n\n");
    prompt.push_str(&format!(
        "Generate exactly {quantity} JSON objects inside a JSON array.\n"
    ));
    prompt.push_str("Do not include any text before or after the JSON.\n\n");
    prompt.push_str("Schema (keys and their rules):\n");
    prompt.push_str(&format!("{{\n{fields}\n}}\n\n"));
    prompt.push_str("Rules:\n");
    prompt.push_str("- Output must be valid JSON.\n");
    prompt.push_str("- No comments, explanations, or extra text.\n");
    prompt.push_str("- Keys must match exactly as provided in the schema.\n");
    prompt.push_str("- Each record must follow the schema faithfully.\n");
    prompt.push_str(&format!("- Generate {quantity} unique records.\n\n"));
    prompt.push_str("Return ONLY the JSON array.");
    prompt
}

#[cfg(test)]
mod tests {
    use tablesmith_core::ColumnDefinition;

    use super::*;

    fn products() -> Schema {
        vec![
            ColumnDefinition::new("id", "Unique product ID"),
            ColumnDefinition::new("price", "Numeric value of the product"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn prompt_lists_fields_in_order() {
        let prompt = compile(&products(), Quantity::new(5));
        assert!(prompt.contains("Generate exactly 5 JSON objects"));
        assert!(prompt.contains(
            "{\n\"id\": Unique product ID,\n\"price\": Numeric value of the product\n}"
        ));
        assert!(prompt.contains("- Generate 5 unique records."));
        assert!(prompt.ends_with("Return ONLY the JSON array."));
    }

    #[test]
    fn quantity_coercion() {
        assert_eq!(Quantity::from(0i64), Quantity::MIN);
        assert_eq!(Quantity::from(-5i64), Quantity::MIN);
        assert_eq!(Quantity::from(f64::NAN), Quantity::MIN);
        assert_eq!(Quantity::from(f64::INFINITY), Quantity::MIN);
        assert_eq!(Quantity::from(2.9f64).get(), 2);
        assert_eq!(Quantity::new(0), Quantity::MIN);
    }

    #[test]
    fn parse_takes_leading_integer() {
        assert_eq!(Quantity::parse("20").get(), 20);
        assert_eq!(Quantity::parse(" 12abc").get(), 12);
        assert_eq!(Quantity::parse("abc"), Quantity::MIN);
        assert_eq!(Quantity::parse("-5"), Quantity::MIN);
        assert_eq!(Quantity::parse(""), Quantity::MIN);
        assert_eq!(Quantity::parse("0"), Quantity::MIN);
        assert_eq!(Quantity::parse("99999999999999999999").get(), u32::MAX);
    }

    #[test]
    fn deserialization_coerces() {
        let quantity: Quantity = serde_json::from_str("-3").expect("quantity");
        assert_eq!(quantity, Quantity::MIN);
        assert_eq!(serde_json::to_string(&Quantity::new(7)).expect("json"), "7");
    }
}
