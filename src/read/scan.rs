use crate::args::{ScanRequest, TableSpec};
use crate::common::condition::FilterCondition;
use crate::error::{QueryError, Result};
use crate::read::{
    self,
    stream::{Cursor, PageFetcher, RawItem},
};

use async_trait::async_trait;
use aws_sdk_dynamodb::{Client, error::DisplayErrorContext, operation::scan::builders};
use tracing::debug;

/// scan operation
#[derive(Clone, Debug, Default, PartialEq)]
struct ScanInput {
    read_input: read::common::ReadInput,
}

/// Planned scan of a table or index, with an optional filter.
///
/// ```rust
/// use ddb::{args::ScanRequest, read::scan::Scan};
///
/// let request = ScanRequest::parse(
///     "users:byEmail".parse().unwrap(),
///     vec![],
///     &["age>21".to_string()],
/// )
/// .unwrap();
/// let scan = Scan::plan(request).unwrap();
/// assert_eq!(scan.filter.unwrap().to_string(), "age > 21");
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Scan {
    /// The table or index to scan.
    pub table: TableSpec,
    /// Conjunction of filter clauses, if any were given.
    pub filter: Option<FilterCondition>,
}

impl Scan {
    /// Build the filter condition; scans need no key schema.
    pub fn plan(request: ScanRequest) -> Result<Self> {
        let filter = FilterCondition::from_clauses(&request.filters)?;
        debug!(
            table = %request.table,
            filter = ?filter.as_ref().map(ToString::to_string),
            "planned scan"
        );
        Ok(Self {
            table: request.table,
            filter,
        })
    }
}

impl From<Scan> for ScanInput {
    fn from(scan: Scan) -> Self {
        Self {
            read_input: read::common::ReadInput::new(scan.table, scan.filter, &mut 0),
        }
    }
}

/// Page fetcher for a scan, one `Scan` request per page.
#[derive(Clone, Debug)]
pub struct ScanPages {
    builder: builders::ScanFluentBuilder,
    cursor: Cursor,
    table_name: String,
}

impl ScanPages {
    /// Prepare the request; nothing is sent until the first page is pulled.
    pub fn new(client: &Client, scan: Scan) -> Self {
        let table_name = scan.table.table_name.clone();
        let scan: ScanInput = scan.into();
        let builder = crate::apply_read_input!(client.scan(), scan.read_input);
        Self {
            builder,
            cursor: Cursor::default(),
            table_name,
        }
    }
}

#[async_trait]
impl PageFetcher for ScanPages {
    fn has_more_pages(&self) -> bool {
        self.cursor.has_more_pages()
    }

    async fn fetch_page(&mut self) -> Result<Vec<RawItem>, QueryError> {
        let page = self.cursor.next_page();
        debug!(table = %self.table_name, page, "fetching scan page");
        let output = self
            .builder
            .clone()
            .set_exclusive_start_key(self.cursor.exclusive_start_key())
            .send()
            .await
            .map_err(|error| {
                self.cursor.fail();
                QueryError::Page {
                    operation: "scan",
                    table: self.table_name.clone(),
                    page,
                    message: DisplayErrorContext(&error).to_string(),
                }
            })?;
        Ok(self.cursor.advance(output.last_evaluated_key, output.items))
    }
}
