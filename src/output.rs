//! Rendering of decoded records to the terminal or a pipe.

use crate::error::Result;
use crate::read::decode::{Attribute, Record};

use colored::Colorize;
use futures::{Stream, StreamExt};
use std::{io, pin};

const INDENT: &str = "  ";

/// How records are rendered.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct OutputOptions {
    /// One attribute per line, two-space indented.
    pub pretty: bool,
    /// ANSI colours: keys blue, strings green, numbers cyan, booleans yellow,
    /// null dimmed.
    pub color: bool,
}

/// Render one decoded value as JSON text.
///
/// ```rust
/// use ddb::output::{OutputOptions, render};
/// use ddb::read::decode::Attribute;
///
/// let value = Attribute::List(vec![Attribute::Number("1e5".to_string()), Attribute::Null]);
/// let text = render(&value, OutputOptions::default()).unwrap();
/// assert_eq!(text, "[1e5,null]");
/// ```
pub fn render(value: &Attribute, options: OutputOptions) -> Result<String> {
    if !options.color {
        let text = if options.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        return Ok(text);
    }
    let mut text = String::new();
    render_colored(&mut text, value, options.pretty, 0)?;
    Ok(text)
}

fn render_colored(text: &mut String, value: &Attribute, pretty: bool, depth: usize) -> Result<()> {
    match value {
        Attribute::Null => text.push_str(&"null".dimmed().to_string()),
        Attribute::Bool(boolean) => text.push_str(&boolean.to_string().yellow().to_string()),
        Attribute::Number(number) => text.push_str(&number.cyan().to_string()),
        Attribute::String(string) => {
            text.push_str(&serde_json::to_string(string)?.green().to_string())
        }
        Attribute::List(values) => {
            let entries = values.iter().map(|value| (None, value)).collect();
            render_entries(text, ('[', ']'), entries, pretty, depth)?;
        }
        Attribute::Map(map) => {
            let entries = map.iter().map(|(key, value)| (Some(key), value)).collect();
            render_entries(text, ('{', '}'), entries, pretty, depth)?;
        }
    }
    Ok(())
}

fn render_entries(
    text: &mut String,
    (open, close): (char, char),
    entries: Vec<(Option<&String>, &Attribute)>,
    pretty: bool,
    depth: usize,
) -> Result<()> {
    text.push(open);
    if entries.is_empty() {
        text.push(close);
        return Ok(());
    }
    for (position, (key, value)) in entries.into_iter().enumerate() {
        if position > 0 {
            text.push(',');
        }
        if pretty {
            text.push('\n');
            text.push_str(&INDENT.repeat(depth + 1));
        }
        if let Some(key) = key {
            text.push_str(&serde_json::to_string(key)?.blue().to_string());
            text.push(':');
            if pretty {
                text.push(' ');
            }
        }
        render_colored(text, value, pretty, depth + 1)?;
    }
    if pretty {
        text.push('\n');
        text.push_str(&INDENT.repeat(depth));
    }
    text.push(close);
    Ok(())
}

/// Writes one record per line, flushing after each.
#[derive(Debug)]
pub struct Printer<W> {
    writer: W,
    options: OutputOptions,
}

impl<W: io::Write> Printer<W> {
    /// Print to `writer` with the given options.
    pub fn new(writer: W, options: OutputOptions) -> Self {
        Self { writer, options }
    }

    /// Print one record.
    pub fn print(&mut self, record: Record) -> Result<()> {
        let text = render(&Attribute::from(record), self.options)?;
        writeln!(self.writer, "{text}")?;
        self.writer.flush()?;
        Ok(())
    }

    /// The underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

/// Print every record of the stream, stopping at the first error.
///
/// Returns how many records were printed.
pub async fn print_all<S, W>(records: S, printer: &mut Printer<W>) -> Result<usize>
where
    S: Stream<Item = Result<Record>>,
    W: io::Write,
{
    let mut records = pin::pin!(records);
    let mut printed = 0;
    while let Some(record) = records.next().await {
        printer.print(record?)?;
        printed += 1;
    }
    Ok(printed)
}
