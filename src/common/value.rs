use crate::common::key::{Key, ScalarType};
use crate::error::{Error, MarshalError, Result};

use aws_sdk_dynamodb::types;
use serde_dynamo::to_attribute_value;

const QUOTES: [char; 2] = ['"', '\''];

/// Convert command-line text into an attribute value of `scalar_type`.
///
/// Numbers keep their exact lexical form; they are checked against a decimal
/// grammar but never parsed into a float, so `007`, `.5` and `1E5` are sent
/// as typed.
///
/// ```rust
/// use aws_sdk_dynamodb::types::AttributeValue;
/// use ddb::common::{key::ScalarType, value};
///
/// let value = value::marshal("100000000000000001", ScalarType::Number).unwrap();
/// assert_eq!(value, AttributeValue::N("100000000000000001".to_string()));
/// ```
pub fn marshal(raw: &str, scalar_type: ScalarType) -> Result<types::AttributeValue, MarshalError> {
    match scalar_type {
        ScalarType::String => Ok(to_attribute_value(raw)?),
        ScalarType::Number if is_number(raw) => Ok(types::AttributeValue::N(raw.to_string())),
        ScalarType::Number => Err(MarshalError::InvalidNumber {
            value: raw.to_string(),
        }),
        ScalarType::Binary => Err(MarshalError::Unsupported { scalar_type }),
    }
}

/// Optional `-`, digits with at most one `.`, optional `e`/`E` exponent.
fn is_number(raw: &str) -> bool {
    let unsigned = raw.strip_prefix('-').unwrap_or(raw);
    let (mantissa, exponent) = match unsigned.split_once(['e', 'E']) {
        Some((mantissa, exponent)) => (mantissa, Some(exponent)),
        None => (unsigned, None),
    };
    let digits = mantissa.chars().filter(char::is_ascii_digit).count();
    let dots = mantissa.matches('.').count();
    let mantissa_valid = digits > 0 && dots <= 1 && digits + dots == mantissa.len();
    let exponent_valid = exponent.is_none_or(|exponent| {
        let exponent = exponent.strip_prefix(['+', '-']).unwrap_or(exponent);
        !exponent.is_empty() && exponent.chars().all(|character| character.is_ascii_digit())
    });
    mantissa_valid && exponent_valid
}

/// Marshal the value supplied for `key` as positional argument `position`.
pub fn marshal_key(key: &Key, raw: &str, position: usize) -> Result<types::AttributeValue> {
    marshal(raw, key.scalar_type).map_err(|source| Error::Marshal {
        target: format!("argument {position} (key {})", key.name),
        value: raw.to_string(),
        scalar_type: key.scalar_type,
        source,
    })
}

/// Infer the type of a filter value that is not backed by the key schema.
///
/// Text made only of ASCII digits and `.` is a number; anything else is a
/// string. A string wrapped in matching `"` or `'` quotes is returned without
/// them, which is how a numeric-looking value is forced to be a string.
///
/// ```rust
/// use ddb::common::{key::ScalarType, value};
///
/// assert_eq!(value::infer("123.45"), ("123.45", ScalarType::Number));
/// assert_eq!(value::infer("'123'"), ("123", ScalarType::String));
/// ```
pub fn infer(raw: &str) -> (&str, ScalarType) {
    if raw.is_empty() {
        return (raw, ScalarType::String);
    }
    if raw
        .chars()
        .all(|character| character.is_ascii_digit() || character == '.')
    {
        return (raw, ScalarType::Number);
    }
    let unquoted = QUOTES.into_iter().find_map(|quote| {
        raw.strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
    });
    (unquoted.unwrap_or(raw), ScalarType::String)
}
