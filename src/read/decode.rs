use crate::error::{DecodeError, QueryError, Result};
use crate::read::stream::RawItem;

use aws_sdk_dynamodb::types;
use base64::{Engine, engine::general_purpose::STANDARD};
use futures::{Stream, StreamExt};
use serde::{Serialize, Serializer, ser};
use serde_json::{Number, value::RawValue};
use std::{collections, ops, str::FromStr};

/// Decoded attribute value.
///
/// Numbers keep the text the store returned and are written out without
/// being reparsed, so `1e5` stays `1e5` and `0.10` stays `0.10`.
#[derive(Clone, Debug, PartialEq)]
pub enum Attribute {
    /// `NULL`
    Null,
    /// `BOOL`
    Bool(bool),
    /// `N`, holding valid JSON number text.
    Number(String),
    /// `S`, or `B` encoded as base64.
    String(String),
    /// `L` and the set types.
    List(Vec<Attribute>),
    /// `M`, sorted by attribute name.
    Map(collections::BTreeMap<String, Attribute>),
}

impl Serialize for Attribute {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Bool(boolean) => serializer.serialize_bool(*boolean),
            Self::Number(number) => RawValue::from_string(number.clone())
                .map_err(<S::Error as ser::Error>::custom)?
                .serialize(serializer),
            Self::String(string) => serializer.serialize_str(string),
            Self::List(values) => values.serialize(serializer),
            Self::Map(map) => map.serialize(serializer),
        }
    }
}

/// Decoded item: attribute names mapped to [`Attribute`]s.
///
/// Keys are kept sorted, so the same item always serializes the same way.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Record(collections::BTreeMap<String, Attribute>);

impl ops::Deref for Record {
    type Target = collections::BTreeMap<String, Attribute>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Record> for Attribute {
    fn from(record: Record) -> Self {
        Attribute::Map(record.0)
    }
}

/// Decode a raw item into a [`Record`].
///
/// ```rust
/// use aws_sdk_dynamodb::types::AttributeValue;
/// use ddb::read::decode;
/// use std::collections::HashMap;
///
/// let item = HashMap::from([("n".to_string(), AttributeValue::N("0.10".to_string()))]);
/// let record = decode::decode(item).unwrap();
/// assert_eq!(serde_json::to_string(&record).unwrap(), r#"{"n":0.10}"#);
/// ```
pub fn decode(item: RawItem) -> Result<Record, DecodeError> {
    let mut record = collections::BTreeMap::new();
    for (name, value) in item {
        let value = decode_value(&name, value)?;
        record.insert(name, value);
    }
    Ok(Record(record))
}

fn decode_number(path: &str, number: String) -> Result<Attribute, DecodeError> {
    if Number::from_str(&number).is_err() {
        return Err(DecodeError::InvalidNumber {
            path: path.to_string(),
            value: number,
        });
    }
    Ok(Attribute::Number(number))
}

fn decode_value(path: &str, value: types::AttributeValue) -> Result<Attribute, DecodeError> {
    let value = match value {
        types::AttributeValue::S(string) => Attribute::String(string),
        types::AttributeValue::N(number) => decode_number(path, number)?,
        types::AttributeValue::B(blob) => Attribute::String(STANDARD.encode(blob.as_ref())),
        types::AttributeValue::Bool(boolean) => Attribute::Bool(boolean),
        types::AttributeValue::Null(_) => Attribute::Null,
        types::AttributeValue::Ss(strings) => {
            Attribute::List(strings.into_iter().map(Attribute::String).collect())
        }
        types::AttributeValue::Ns(numbers) => Attribute::List(
            numbers
                .into_iter()
                .map(|number| decode_number(path, number))
                .collect::<Result<_, _>>()?,
        ),
        types::AttributeValue::Bs(blobs) => Attribute::List(
            blobs
                .into_iter()
                .map(|blob| Attribute::String(STANDARD.encode(blob.as_ref())))
                .collect(),
        ),
        types::AttributeValue::L(values) => Attribute::List(
            values
                .into_iter()
                .enumerate()
                .map(|(index, value)| decode_value(&format!("{path}[{index}]"), value))
                .collect::<Result<_, _>>()?,
        ),
        types::AttributeValue::M(map) => {
            let mut object = collections::BTreeMap::new();
            for (name, value) in map {
                let value = decode_value(&format!("{path}.{name}"), value)?;
                object.insert(name, value);
            }
            Attribute::Map(object)
        }
        _ => {
            return Err(DecodeError::UnknownType {
                path: path.to_string(),
            });
        }
    };
    Ok(value)
}

/// Decode every item of a raw item stream.
///
/// Fetch errors pass through, and a record that fails to decode becomes an
/// error element without affecting the records around it.
pub fn decode_stream<S>(items: S) -> impl Stream<Item = Result<Record>>
where
    S: Stream<Item = Result<RawItem, QueryError>>,
{
    items.map(|item| Ok(decode(item?)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{key::ScalarType, value};
    use crate::error::Error;

    use aws_sdk_dynamodb::primitives::Blob;
    use futures::stream;
    use rstest::rstest;
    use serde_json::{Value, json};

    fn item(attributes: Vec<(&str, types::AttributeValue)>) -> RawItem {
        attributes
            .into_iter()
            .map(|(name, value)| (name.to_string(), value))
            .collect()
    }

    #[rstest]
    #[case::string(types::AttributeValue::S("a".to_string()), json!("a"))]
    #[case::integer(types::AttributeValue::N("42".to_string()), json!(42))]
    #[case::boolean(types::AttributeValue::Bool(true), json!(true))]
    #[case::null(types::AttributeValue::Null(true), json!(null))]
    #[case::binary(types::AttributeValue::B(Blob::new(vec![0, 1, 2])), json!("AAEC"))]
    #[case::string_set(
        types::AttributeValue::Ss(vec!["a".to_string(), "b".to_string()]),
        json!(["a", "b"])
    )]
    #[case::number_set(
        types::AttributeValue::Ns(vec!["1".to_string(), "2".to_string()]),
        json!([1, 2])
    )]
    #[case::binary_set(types::AttributeValue::Bs(vec![Blob::new(vec![255])]), json!(["/w=="]))]
    #[case::list(
        types::AttributeValue::L(
            vec![
                types::AttributeValue::S("a".to_string()),
                types::AttributeValue::N("1".to_string()),
            ]
        ),
        json!(["a", 1])
    )]
    #[case::nested_map(
        types::AttributeValue::M(
            collections::HashMap::from(
                [
                    (
                        "inner".to_string(),
                        types::AttributeValue::M(
                            collections::HashMap::from(
                                [
                                    ("flag".to_string(), types::AttributeValue::Bool(false)),
                                ]
                            )
                        )
                    ),
                ]
            )
        ),
        json!({"inner": {"flag": false}})
    )]
    fn test_decode_value(#[case] value: types::AttributeValue, #[case] expected: Value) {
        let record = decode(item(vec![("a", value)])).unwrap();
        assert_eq!(serde_json::to_value(&record["a"]).unwrap(), expected);
    }

    #[rstest]
    #[case::large_integer("100000000000000001")]
    #[case::trailing_zero("0.10")]
    #[case::exponent("1e5")]
    #[case::upper_exponent("1E5")]
    #[case::signed_exponent("2.5e-3")]
    #[case::negative("-3.25")]
    fn test_number_keeps_lexical_form(#[case] number: &str) {
        let value = value::marshal(number, ScalarType::Number).unwrap();
        let record = decode(item(vec![("n", value)])).unwrap();
        assert_eq!(record["n"], Attribute::Number(number.to_string()));
        assert_eq!(
            serde_json::to_string(&record).unwrap(),
            format!("{{\"n\":{number}}}")
        );
    }

    #[rstest]
    #[case::top_level(
        item(vec![("n", types::AttributeValue::N("abc".to_string()))]),
        DecodeError::InvalidNumber { path: "n".to_string(), value: "abc".to_string() }
    )]
    #[case::inside_list(
        item(vec![(
            "l",
            types::AttributeValue::L(vec![types::AttributeValue::N("1..2".to_string())]),
        )]),
        DecodeError::InvalidNumber { path: "l[0]".to_string(), value: "1..2".to_string() }
    )]
    #[case::inside_map(
        item(vec![(
            "m",
            types::AttributeValue::M(collections::HashMap::from([(
                "x".to_string(),
                types::AttributeValue::Ns(vec!["".to_string()]),
            )])),
        )]),
        DecodeError::InvalidNumber { path: "m.x".to_string(), value: "".to_string() }
    )]
    fn test_decode_invalid(#[case] raw: RawItem, #[case] expected: DecodeError) {
        assert_eq!(decode(raw), Err(expected));
    }

    #[test]
    fn test_record_keys_sorted() {
        let record = decode(item(vec![
            ("b", types::AttributeValue::S("2".to_string())),
            ("a", types::AttributeValue::S("1".to_string())),
            ("c", types::AttributeValue::S("3".to_string())),
        ]))
        .unwrap();
        assert_eq!(
            serde_json::to_string(&record).unwrap(),
            r#"{"a":"1","b":"2","c":"3"}"#
        );
    }

    #[tokio::test]
    async fn test_decode_stream_isolates_bad_record() {
        let items = stream::iter(vec![
            Ok(item(vec![("id", types::AttributeValue::S("a".to_string()))])),
            Ok(item(vec![("n", types::AttributeValue::N("x".to_string()))])),
            Ok(item(vec![("id", types::AttributeValue::S("c".to_string()))])),
        ]);
        let actual: Vec<_> = decode_stream(items).collect().await;
        assert_eq!(actual.len(), 3);
        assert_eq!(actual[0].as_ref().unwrap()["id"], Attribute::String("a".to_string()));
        assert!(matches!(actual[1], Err(Error::Decode(_))));
        assert_eq!(actual[2].as_ref().unwrap()["id"], Attribute::String("c".to_string()));
    }

    #[tokio::test]
    async fn test_decode_stream_passes_fetch_errors() {
        let error = QueryError::Page {
            operation: "scan",
            table: "t".to_string(),
            page: 1,
            message: "denied".to_string(),
        };
        let items = stream::iter(vec![Err(error.clone())]);
        let actual: Vec<_> = decode_stream(items).collect().await;
        assert!(matches!(&actual[..], [Err(Error::Query(inner))] if *inner == error));
    }
}
