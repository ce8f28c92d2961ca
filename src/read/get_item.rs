use crate::args::GetRequest;
use crate::common::{
    key::{KeyValue, KeyValues},
    value,
};
use crate::error::{QueryError, Result, UsageError};
use crate::read::{decode, stream::RawItem};
use crate::schema::{self, DescribeTable};

use async_trait::async_trait;
use tracing::debug;

/// Point lookup of one item by its full primary key.
#[derive(Clone, Debug, PartialEq)]
pub struct GetItem {
    /// The table to read from.
    pub table_name: String,
    /// The marshalled primary key.
    pub keys: KeyValues,
}

/// Single-item reads against the store.
#[async_trait]
pub trait GetItemFetcher {
    /// Fetch the item, or `None` when no item has this key.
    async fn fetch_item(&self, get_item: GetItem) -> Result<Option<RawItem>, QueryError>;
}

impl GetItem {
    /// Resolve the table's keys and marshal one value per key, in schema order.
    #[tracing::instrument(name = "ddb.get_item.plan", skip(describer), err)]
    pub async fn plan<D>(describer: &D, request: GetRequest) -> Result<Self>
    where
        D: DescribeTable + ?Sized,
    {
        let schema = schema::resolve(describer, &request.table).await?;
        if request.key_values.len() != schema.len() {
            return Err(UsageError::KeyArity {
                table: request.table.table_name,
                supplied: request.key_values.len(),
                expected: schema.len(),
                keys: schema.names(),
            }
            .into());
        }
        let mut key_values = schema
            .keys()
            .zip(&request.key_values)
            .enumerate()
            .map(|(position, (key, raw))| -> Result<KeyValue> {
                let value = value::marshal_key(key, raw, position + 1)?;
                Ok(KeyValue {
                    name: key.name.clone(),
                    value,
                })
            })
            .collect::<Result<Vec<_>>>()?
            .into_iter();
        let partition_key = key_values.next().ok_or_else(|| UsageError::KeyArity {
            table: request.table.table_name.clone(),
            supplied: 0,
            expected: schema.len(),
            keys: schema.names(),
        })?;
        Ok(Self {
            table_name: request.table.table_name,
            keys: KeyValues {
                partition_key,
                sort_key: key_values.next(),
            },
        })
    }
}

/// Plan and run a point lookup, decoding the item when one exists.
///
/// An item with no attributes is treated the same as a missing item.
pub async fn get<D, F>(
    describer: &D,
    fetcher: &F,
    request: GetRequest,
) -> Result<Option<decode::Record>>
where
    D: DescribeTable + ?Sized,
    F: GetItemFetcher + ?Sized,
{
    let get_item = GetItem::plan(describer, request).await?;
    let table_name = get_item.table_name.clone();
    let item = fetcher.fetch_item(get_item).await?;
    let item = item.filter(|item| !item.is_empty());
    debug!(table = %table_name, found = item.is_some(), "fetched item");
    Ok(item.map(decode::decode).transpose()?)
}
