use aws_sdk_dynamodb::types;
use std::{collections, fmt};

/// Primitive attribute type of a key.
///
/// ```rust
/// use aws_sdk_dynamodb::types::ScalarAttributeType;
/// use ddb::common::key::ScalarType;
///
/// let scalar_type = ScalarType::try_from(&ScalarAttributeType::N).unwrap();
/// assert_eq!(scalar_type, ScalarType::Number);
/// ```
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ScalarType {
    /// `S`
    String,
    /// `N`
    Number,
    /// `B`
    Binary,
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::String => "S",
            Self::Number => "N",
            Self::Binary => "B",
        };
        f.write_str(name)
    }
}

impl TryFrom<&types::ScalarAttributeType> for ScalarType {
    type Error = String;

    fn try_from(attribute_type: &types::ScalarAttributeType) -> Result<Self, Self::Error> {
        match attribute_type {
            types::ScalarAttributeType::S => Ok(Self::String),
            types::ScalarAttributeType::N => Ok(Self::Number),
            types::ScalarAttributeType::B => Ok(Self::Binary),
            other => Err(format!("unknown attribute type {}", other.as_str())),
        }
    }
}

impl ScalarType {
    /// Whether an attribute value carries this type's tag.
    pub fn matches(self, value: &types::AttributeValue) -> bool {
        matches!(
            (self, value),
            (Self::String, types::AttributeValue::S(_))
                | (Self::Number, types::AttributeValue::N(_))
                | (Self::Binary, types::AttributeValue::B(_))
        )
    }
}

/// Role of a key attribute within a key schema.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum KeyRole {
    /// The hash key.
    Partition,
    /// The range key.
    Sort,
}

impl TryFrom<&types::KeyType> for KeyRole {
    type Error = String;

    fn try_from(key_type: &types::KeyType) -> Result<Self, Self::Error> {
        match key_type {
            types::KeyType::Hash => Ok(Self::Partition),
            types::KeyType::Range => Ok(Self::Sort),
            other => Err(format!("unknown key type {}", other.as_str())),
        }
    }
}

/// Key attribute declared by a table or index.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Key {
    /// The attribute name.
    pub name: String,
    /// Partition or sort.
    pub role: KeyRole,
    /// The attribute's declared type.
    pub scalar_type: ScalarType,
}

/// Key schema of a table or index: one partition key and an optional sort key.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct KeySchema {
    /// The partition key.
    pub partition_key: Key,
    /// The sort key, for composite primary keys.
    pub sort_key: Option<Key>,
}

impl KeySchema {
    /// Keys in schema order, partition key first.
    pub fn keys(&self) -> impl Iterator<Item = &Key> {
        std::iter::once(&self.partition_key).chain(self.sort_key.as_ref())
    }

    /// Number of declared keys, one or two.
    pub fn len(&self) -> usize {
        if self.sort_key.is_some() { 2 } else { 1 }
    }

    /// Always false, a key schema has at least a partition key.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Comma-separated key names, for messages.
    pub fn names(&self) -> String {
        self.keys()
            .map(|key| key.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Key component with its marshalled value.
#[derive(Clone, Debug, PartialEq)]
pub struct KeyValue {
    /// The attribute name of the key.
    pub name: String,
    /// The value of the key.
    pub value: types::AttributeValue,
}

/// Primary key values (partition key and optional sort key).
///
/// ```rust
/// use aws_sdk_dynamodb::types::AttributeValue;
/// use ddb::common::key;
///
/// let keys = key::KeyValues {
///     partition_key: key::KeyValue {
///         name: "id".to_string(),
///         value: AttributeValue::S("1".to_string()),
///     },
///     sort_key: None,
/// };
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct KeyValues {
    /// The partition key (required).
    pub partition_key: KeyValue,
    /// The sort key (optional, only for tables with composite primary keys).
    pub sort_key: Option<KeyValue>,
}

impl From<KeyValues> for collections::HashMap<String, types::AttributeValue> {
    fn from(keys: KeyValues) -> Self {
        let mut map = Self::from([(keys.partition_key.name, keys.partition_key.value)]);
        if let Some(sort_key) = keys.sort_key {
            map.insert(sort_key.name, sort_key.value);
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    fn schema(sort: Option<&str>) -> KeySchema {
        KeySchema {
            partition_key: Key {
                name: "id".to_string(),
                role: KeyRole::Partition,
                scalar_type: ScalarType::String,
            },
            sort_key: sort.map(|name| Key {
                name: name.to_string(),
                role: KeyRole::Sort,
                scalar_type: ScalarType::Number,
            }),
        }
    }

    #[rstest]
    #[case::string(types::ScalarAttributeType::S, ScalarType::String)]
    #[case::number(types::ScalarAttributeType::N, ScalarType::Number)]
    #[case::binary(types::ScalarAttributeType::B, ScalarType::Binary)]
    fn test_scalar_type_from_attribute_type(
        #[case] attribute_type: types::ScalarAttributeType,
        #[case] expected: ScalarType,
    ) {
        let actual = ScalarType::try_from(&attribute_type).unwrap();
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_scalar_type_unknown() {
        let attribute_type = types::ScalarAttributeType::from("X");
        assert!(ScalarType::try_from(&attribute_type).is_err());
    }

    #[rstest]
    #[case::string_matches(ScalarType::String, types::AttributeValue::S("a".to_string()), true)]
    #[case::number_matches(ScalarType::Number, types::AttributeValue::N("1".to_string()), true)]
    #[case::string_mismatch(ScalarType::String, types::AttributeValue::N("1".to_string()), false)]
    #[case::number_mismatch(ScalarType::Number, types::AttributeValue::S("a".to_string()), false)]
    fn test_scalar_type_matches(
        #[case] scalar_type: ScalarType,
        #[case] value: types::AttributeValue,
        #[case] expected: bool,
    ) {
        assert_eq!(scalar_type.matches(&value), expected);
    }

    #[rstest]
    #[case::partition_only(schema(None), 1, "id")]
    #[case::composite(schema(Some("ts")), 2, "id, ts")]
    fn test_key_schema_order(
        #[case] schema: KeySchema,
        #[case] len: usize,
        #[case] names: &str,
    ) {
        assert_eq!(schema.len(), len);
        assert_eq!(schema.names(), names);
        assert_eq!(schema.keys().next().map(|key| key.role), Some(KeyRole::Partition));
    }

    #[rstest]
    #[case::partition_key_only(
        KeyValues {
            partition_key: KeyValue {
                name: "a".to_string(),
                value: types::AttributeValue::S(
                    "b".to_string()
                ),
            },
            sort_key: None,
        },
        collections::HashMap::from(
            [(
                "a".to_string(),
                types::AttributeValue::S(
                    "b".to_string()
                ),
            )]
        )
    )]
    #[case::partition_key_string_sort_key_number(
        KeyValues {
            partition_key: KeyValue {
                name: "a".to_string(),
                value: types::AttributeValue::S(
                    "b".to_string()
                ),
            },
            sort_key: Some(
                KeyValue {
                    name: "c".to_string(),
                    value: types::AttributeValue::N(
                        "100".to_string()
                    ),
                }
            ),
        },
        collections::HashMap::from(
            [
                (
                    "a".to_string(),
                    types::AttributeValue::S(
                        "b".to_string()
                    )
                ),
                (
                    "c".to_string(),
                    types::AttributeValue::N(
                        "100".to_string()
                    )
                ),
            ]
        )
    )]
    fn test_key_values_to_hash_map(
        #[case] keys: KeyValues,
        #[case] expected: collections::HashMap<String, types::AttributeValue>,
    ) {
        let actual: collections::HashMap<String, types::AttributeValue> = keys.into();
        assert_eq!(actual, expected);
    }
}
