//! Streaming filter for SMS backups.
//!
//! Copies a backup event by event and drops the `<sms>` elements that fail
//! the chosen predicate. Everything else (declaration, root attributes,
//! comments, `<mms>` elements) passes through untouched. The root `count`
//! attribute is left as it was.

use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

use quick_xml::events::Event;
use quick_xml::{Reader, Writer};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::info;

use crate::error::{Error, Result};
use crate::sms::{SmsRecord, ROOT_ELEMENT, SMS_ELEMENT};

/// Which messages to keep
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    /// Keep messages with a non-blank `contact_name`
    #[default]
    Contacts,
    /// Keep messages of type `2`
    Outgoing,
}

impl FilterMode {
    /// Convert to a string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterMode::Contacts => "contacts",
            FilterMode::Outgoing => "outgoing",
        }
    }

    /// Check if a record survives this filter
    pub fn keeps(&self, record: &SmsRecord) -> bool {
        match self {
            FilterMode::Contacts => record.has_contact_name(),
            FilterMode::Outgoing => record.is_outgoing(),
        }
    }
}

impl FromStr for FilterMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "contacts" => Ok(FilterMode::Contacts),
            "outgoing" => Ok(FilterMode::Outgoing),
            other => Err(Error::Config(format!("unknown filter mode: {}", other))),
        }
    }
}

impl std::fmt::Display for FilterMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How many `<sms>` elements were kept and dropped
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSummary {
    pub kept: usize,
    pub dropped: usize,
}

/// Filter a backup from `input` into `output`
pub fn filter_stream<R: BufRead, W: Write>(input: R, output: W, mode: FilterMode) -> Result<FilterSummary> {
    let mut reader = Reader::from_reader(input);
    let mut writer = Writer::new(output);
    let mut buf = Vec::new();
    let mut summary = FilterSummary::default();
    let mut depth = 0usize;
    let mut seen_root = false;
    let mut root_open = false;

    let parse_err = |err: quick_xml::Error, reader: &Reader<R>| Error::from_xml(err, reader.buffer_position());

    loop {
        buf.clear();
        let event = reader.read_event_into(&mut buf).map_err(|e| parse_err(e, &reader))?;

        match event {
            Event::Start(ref e) | Event::Empty(ref e) if !root_open => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                if seen_root {
                    return Err(Error::SourceParse(format!(
                        "unexpected <{}> after closing </smses>",
                        name
                    )));
                }
                if e.name().as_ref() != ROOT_ELEMENT {
                    return Err(Error::SourceParse(format!(
                        "expected <smses> root element, found <{}>",
                        name
                    )));
                }
                seen_root = true;
                root_open = matches!(event, Event::Start(_));
            }
            Event::Start(ref e) | Event::Empty(ref e)
                if depth == 1 && e.name().as_ref() == SMS_ELEMENT =>
            {
                let record = SmsRecord::from_element(e).map_err(|err| parse_err(err, &reader))?;
                if !mode.keeps(&record) {
                    summary.dropped += 1;
                    if let Event::Start(ref e) = event {
                        let end = e.to_end().into_owned();
                        let mut skip = Vec::new();
                        reader
                            .read_to_end_into(end.name(), &mut skip)
                            .map_err(|err| parse_err(err, &reader))?;
                    }
                    continue;
                }
                summary.kept += 1;
            }
            Event::End(_) if depth == 1 => root_open = false,
            Event::Eof => {
                if !seen_root {
                    return Err(Error::SourceParse("no <smses> root element found".to_string()));
                }
                if root_open {
                    return Err(Error::SourceParse(
                        "unexpected end of file: <smses> is not closed".to_string(),
                    ));
                }
                break;
            }
            _ => {}
        }

        match event {
            Event::Start(_) => depth += 1,
            Event::End(_) => depth = depth.saturating_sub(1),
            _ => {}
        }
        writer
            .write_event(event)
            .map_err(|err| Error::OutputWrite(err.to_string()))?;
    }

    writer
        .into_inner()
        .flush()
        .map_err(|e| Error::OutputWrite(e.to_string()))?;
    Ok(summary)
}

/// Filter a backup file; the output is written atomically
pub fn filter_file(input: &Path, output: &Path, mode: FilterMode) -> Result<FilterSummary> {
    let file = File::open(input).map_err(|e| Error::source_read(input, e))?;

    let parent = match output.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    if !parent.is_dir() {
        fs::create_dir_all(parent).map_err(|e| Error::output_write(output, e))?;
    }
    let temp = NamedTempFile::new_in(parent).map_err(|e| Error::output_write(output, e))?;

    let summary = filter_stream(BufReader::new(file), BufWriter::new(temp.as_file()), mode)?;
    temp.persist(output).map_err(|e| Error::output_write(output, e.error))?;

    info!(
        input = %input.display(),
        output = %output.display(),
        mode = %mode,
        kept = summary.kept,
        dropped = summary.dropped,
        "filtered sms backup"
    );
    Ok(summary)
}
