use crate::args::{QueryRequest, TableSpec};
use crate::common::{
    condition::{FilterCondition, KeyCondition},
    value,
};
use crate::error::{QueryError, Result, UsageError};
use crate::read::{
    self,
    stream::{Cursor, PageFetcher, RawItem},
};
use crate::schema::{self, DescribeTable};

use async_trait::async_trait;
use aws_sdk_dynamodb::{Client, error::DisplayErrorContext, operation::query::builders};
use tracing::debug;

/// query operation
#[derive(Clone, Debug, Default, PartialEq)]
struct QueryInput {
    key_condition_expression: String,
    read_input: read::common::ReadInput,
}

/// Planned query: the key condition and optional filter, ready to send.
///
/// ```rust,no_run
/// use ddb::{args::QueryRequest, read::query::Query, session::Session};
///
/// # async fn example(session: &Session) -> ddb::Result<()> {
/// let request = QueryRequest::parse(
///     "mytable".parse()?,
///     vec!["abc".to_string(), ">100".to_string()],
///     &[],
/// )?;
/// let query = Query::plan(session, request).await?;
/// let mut items = session.query(query);
/// while let Some(item) = items.next().await {
///     println!("{:?}", item?);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Query {
    /// The table or index to query.
    pub table: TableSpec,
    /// Partition key equality and optional sort key comparison.
    pub key_condition: KeyCondition,
    /// Conjunction of filter clauses, if any were given.
    pub filter: Option<FilterCondition>,
}

impl Query {
    /// Resolve the key schema and build the key condition and filter.
    ///
    /// The partition value is argument 1 and the sort value argument 2; both
    /// are marshalled against the key types declared by the table or index.
    #[tracing::instrument(name = "ddb.query.plan", skip(describer), err)]
    pub async fn plan<D>(describer: &D, request: QueryRequest) -> Result<Self>
    where
        D: DescribeTable + ?Sized,
    {
        let schema = schema::resolve(describer, &request.table).await?;
        let partition_value =
            value::marshal_key(&schema.partition_key, &request.partition_value, 1)?;
        let sort = match (request.sort_value, &schema.sort_key) {
            (None, _) => None,
            (Some(value), None) => {
                return Err(UsageError::NoSortKey {
                    table: request.table.to_string(),
                    value,
                }
                .into());
            }
            (Some(raw), Some(sort_key)) => Some((
                sort_key,
                request.sort_operator,
                value::marshal_key(sort_key, &raw, 2)?,
            )),
        };
        let key_condition = KeyCondition::new(&schema.partition_key, partition_value, sort)?;
        let filter = FilterCondition::from_clauses(&request.filters)?;
        debug!(
            table = %request.table,
            key_condition = %key_condition,
            filter = ?filter.as_ref().map(ToString::to_string),
            "planned query"
        );
        Ok(Self {
            table: request.table,
            key_condition,
            filter,
        })
    }
}

impl From<Query> for QueryInput {
    fn from(query: Query) -> Self {
        let mut index = 0;
        let key_condition_operation = query.key_condition.get_expression_operation(&mut index);
        let mut read_input = read::common::ReadInput::new(query.table, query.filter, &mut index);
        let key_condition_expression = key_condition_operation.merge_into(
            &mut read_input.expression_attribute_names,
            &mut read_input.expression_attribute_values,
        );
        Self {
            key_condition_expression,
            read_input,
        }
    }
}

/// Page fetcher for a query, one `Query` request per page.
#[derive(Clone, Debug)]
pub struct QueryPages {
    builder: builders::QueryFluentBuilder,
    cursor: Cursor,
    table_name: String,
}

impl QueryPages {
    /// Prepare the request; nothing is sent until the first page is pulled.
    pub fn new(client: &Client, query: Query) -> Self {
        let table_name = query.table.table_name.clone();
        let query: QueryInput = query.into();
        let builder = client
            .query()
            .key_condition_expression(query.key_condition_expression);
        let builder = crate::apply_read_input!(builder, query.read_input);
        Self {
            builder,
            cursor: Cursor::default(),
            table_name,
        }
    }
}

#[async_trait]
impl PageFetcher for QueryPages {
    fn has_more_pages(&self) -> bool {
        self.cursor.has_more_pages()
    }

    async fn fetch_page(&mut self) -> Result<Vec<RawItem>, QueryError> {
        let page = self.cursor.next_page();
        debug!(table = %self.table_name, page, "fetching query page");
        let output = self
            .builder
            .clone()
            .set_exclusive_start_key(self.cursor.exclusive_start_key())
            .send()
            .await
            .map_err(|error| {
                self.cursor.fail();
                QueryError::Page {
                    operation: "query",
                    table: self.table_name.clone(),
                    page,
                    message: DisplayErrorContext(&error).to_string(),
                }
            })?;
        Ok(self.cursor.advance(output.last_evaluated_key, output.items))
    }
}
