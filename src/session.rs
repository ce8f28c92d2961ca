//! The store session shared by every command.

use crate::error::{QueryError, SchemaError};
use crate::read::{
    get_item::{GetItem, GetItemFetcher},
    query::{Query, QueryPages},
    scan::{Scan, ScanPages},
    stream::{ItemStream, RawItem},
};
use crate::schema::DescribeTable;

use async_trait::async_trait;
use aws_sdk_dynamodb::{Client, config::Region, error::DisplayErrorContext, types};
use tracing::debug;

/// One DynamoDB client, built once per process and passed by reference.
#[derive(Clone, Debug)]
pub struct Session {
    client: Client,
}

impl Session {
    /// Wrap an existing client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Load region and credentials from the environment and shared profile.
    ///
    /// `region` and `endpoint_url` override what the environment provides,
    /// which is how a local DynamoDB is targeted.
    pub async fn from_env(region: Option<String>, endpoint_url: Option<String>) -> Self {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
        if let Some(region) = region {
            loader = loader.region(Region::new(region));
        }
        if let Some(endpoint_url) = endpoint_url {
            debug!(%endpoint_url, "using custom endpoint");
            loader = loader.endpoint_url(endpoint_url);
        }
        let config = loader.load().await;
        Self::new(Client::new(&config))
    }

    /// Lazily run a planned query.
    pub fn query(&self, query: Query) -> ItemStream<QueryPages> {
        ItemStream::new(QueryPages::new(&self.client, query))
    }

    /// Lazily run a planned scan.
    pub fn scan(&self, scan: Scan) -> ItemStream<ScanPages> {
        ItemStream::new(ScanPages::new(&self.client, scan))
    }
}

#[async_trait]
impl DescribeTable for Session {
    #[tracing::instrument(name = "ddb.describe_table", skip(self), err)]
    async fn describe_table(
        &self,
        table_name: &str,
    ) -> Result<types::TableDescription, SchemaError> {
        let output = self
            .client
            .describe_table()
            .table_name(table_name)
            .send()
            .await
            .map_err(|error| {
                let not_found = error
                    .as_service_error()
                    .is_some_and(|error| error.is_resource_not_found_exception());
                if not_found {
                    SchemaError::TableNotFound {
                        table: table_name.to_string(),
                    }
                } else {
                    SchemaError::Transient {
                        table: table_name.to_string(),
                        message: DisplayErrorContext(&error).to_string(),
                    }
                }
            })?;
        output.table.ok_or_else(|| SchemaError::Invalid {
            table: table_name.to_string(),
            message: "no table description returned".to_string(),
        })
    }
}

#[async_trait]
impl GetItemFetcher for Session {
    #[tracing::instrument(name = "ddb.get_item", skip(self), err)]
    async fn fetch_item(&self, get_item: GetItem) -> Result<Option<RawItem>, QueryError> {
        let table_name = get_item.table_name;
        let output = self
            .client
            .get_item()
            .table_name(&table_name)
            .set_key(Some(get_item.keys.into()))
            .send()
            .await
            .map_err(|error| QueryError::GetItem {
                table: table_name.clone(),
                message: DisplayErrorContext(&error).to_string(),
            })?;
        Ok(output.item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::{QueryRequest, ScanRequest};
    use crate::schema::tests::{FakeDescriber, description};

    use aws_sdk_dynamodb::config::{BehaviorVersion, Credentials, retry::RetryConfig};
    use futures::StreamExt;

    /// Session whose every request fails to connect, with retries off.
    fn unreachable() -> Session {
        let config = aws_sdk_dynamodb::config::Builder::new()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("us-east-1"))
            .credentials_provider(Credentials::new("test", "test", None, None, "ddb-test"))
            .endpoint_url("http://127.0.0.1:1")
            .retry_config(RetryConfig::disabled())
            .build();
        Session::new(Client::from_conf(config))
    }

    #[tokio::test]
    async fn test_query_ends_after_failed_page() {
        let request =
            QueryRequest::parse("mytable".parse().unwrap(), vec!["abc".to_string()], &[]).unwrap();
        let query = Query::plan(&FakeDescriber::new(description()), request)
            .await
            .unwrap();
        let actual: Vec<_> = unreachable().query(query).into_stream().collect().await;
        assert!(matches!(
            &actual[..],
            [Err(QueryError::Page {
                operation: "query",
                page: 1,
                ..
            })]
        ));
    }

    #[tokio::test]
    async fn test_scan_ends_after_failed_page() {
        let request = ScanRequest::parse("mytable".parse().unwrap(), vec![], &[]).unwrap();
        let scan = Scan::plan(request).unwrap();
        let actual: Vec<_> = unreachable().scan(scan).into_stream().collect().await;
        assert!(matches!(
            &actual[..],
            [Err(QueryError::Page {
                operation: "scan",
                page: 1,
                ..
            })]
        ));
    }

    #[tokio::test]
    async fn test_describe_table_unreachable_is_transient() {
        let actual = unreachable().describe_table("mytable").await;
        assert!(matches!(actual, Err(SchemaError::Transient { table, .. }) if table == "mytable"));
    }
}
