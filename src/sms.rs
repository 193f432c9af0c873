//! Streaming reader for "SMS Backup & Restore" XML exports.
//!
//! The export is a `<smses>` root with one `<sms .../>` child per message;
//! every field is an attribute:
//!
//! ```xml
//! <smses count="1">
//!   <sms address="+15550100" type="2" body="See you tomorrow" contact_name="Sam" />
//! </smses>
//! ```
//!
//! Records are produced one at a time, so memory stays flat however large
//! the backup is.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Root element of a backup
pub const ROOT_ELEMENT: &[u8] = b"smses";

/// Element holding one message
pub const SMS_ELEMENT: &[u8] = b"sms";

/// The `type` attribute of a message
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MessageType {
    /// Inbox (`1`)
    Received,
    /// Sent by the device owner (`2`)
    Sent,
    /// `3`
    Draft,
    /// `4`
    Outbox,
    /// `5`
    Failed,
    /// `6`
    Queued,
    /// Any other code
    Other(String),
    /// Attribute absent
    #[default]
    Unknown,
}

impl MessageType {
    /// Decode the raw attribute value
    pub fn from_code(code: &str) -> Self {
        match code.trim() {
            "1" => MessageType::Received,
            "2" => MessageType::Sent,
            "3" => MessageType::Draft,
            "4" => MessageType::Outbox,
            "5" => MessageType::Failed,
            "6" => MessageType::Queued,
            other => MessageType::Other(other.to_string()),
        }
    }

    /// Check if the message was sent by the device owner
    pub fn is_outgoing(&self) -> bool {
        *self == MessageType::Sent
    }
}

/// One `<sms>` element
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmsRecord {
    pub body: Option<String>,
    pub kind: MessageType,
    pub address: Option<String>,
    pub contact_name: Option<String>,
    pub date: Option<String>,
}

impl SmsRecord {
    /// Create an outgoing record with a body
    pub fn outgoing(body: impl Into<String>) -> Self {
        SmsRecord {
            body: Some(body.into()),
            kind: MessageType::Sent,
            ..Default::default()
        }
    }

    /// Create an incoming record with a body
    pub fn incoming(body: impl Into<String>) -> Self {
        SmsRecord {
            body: Some(body.into()),
            kind: MessageType::Received,
            ..Default::default()
        }
    }

    /// Check if the message was sent by the device owner
    pub fn is_outgoing(&self) -> bool {
        self.kind.is_outgoing()
    }

    /// Check if a non-blank contact name is attached
    pub fn has_contact_name(&self) -> bool {
        self.contact_name
            .as_deref()
            .map_or(false, |name| !name.trim().is_empty())
    }

    /// Build a record from the attributes of an `<sms>` element
    pub fn from_element(element: &BytesStart<'_>) -> std::result::Result<Self, quick_xml::Error> {
        let mut record = SmsRecord::default();
        for attr in element.attributes() {
            let attr = attr?;
            let value = attr.unescape_value()?.into_owned();
            match attr.key.as_ref() {
                b"body" => record.body = Some(value),
                b"type" => record.kind = MessageType::from_code(&value),
                b"address" => record.address = Some(value),
                b"contact_name" => record.contact_name = Some(value),
                b"date" => record.date = Some(value),
                _ => {}
            }
        }
        Ok(record)
    }
}

/// Iterator over the records of a backup.
///
/// The first element must be `<smses>`; anything else is a parse error. An
/// empty `<smses/>` yields no records. A root that is never closed, or an
/// element after the closed root, is also a parse error.
pub struct SmsReader<R: BufRead> {
    reader: Reader<R>,
    buf: Vec<u8>,
    seen_root: bool,
    root_open: bool,
    done: bool,
}

impl SmsReader<BufReader<File>> {
    /// Open a backup file
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| Error::source_read(path, e))?;
        debug!(path = %path.display(), "opened sms backup");
        Ok(SmsReader::new(BufReader::new(file)))
    }
}

impl<R: BufRead> SmsReader<R> {
    /// Wrap any buffered reader
    pub fn new(source: R) -> Self {
        SmsReader {
            reader: Reader::from_reader(source),
            buf: Vec::new(),
            seen_root: false,
            root_open: false,
            done: false,
        }
    }
}

impl<R: BufRead> Iterator for SmsReader<R> {
    type Item = Result<SmsRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        loop {
            self.buf.clear();
            let event = match self.reader.read_event_into(&mut self.buf) {
                Ok(event) => event,
                Err(err) => {
                    self.done = true;
                    return Some(Err(Error::from_xml(err, self.reader.buffer_position())));
                }
            };

            let parsed = match event {
                Event::Start(ref e) | Event::Empty(ref e) if !self.root_open => {
                    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                    if self.seen_root {
                        self.done = true;
                        return Some(Err(Error::SourceParse(format!(
                            "unexpected <{}> after closing </smses>",
                            name
                        ))));
                    }
                    if e.name().as_ref() != ROOT_ELEMENT {
                        self.done = true;
                        return Some(Err(Error::SourceParse(format!(
                            "expected <smses> root element, found <{}>",
                            name
                        ))));
                    }
                    self.seen_root = true;
                    self.root_open = matches!(event, Event::Start(_));
                    continue;
                }
                Event::Start(e) if e.name().as_ref() == SMS_ELEMENT => {
                    let record = SmsRecord::from_element(&e);
                    let end = e.to_end().into_owned();
                    let mut skip = Vec::new();
                    record.and_then(|record| {
                        self.reader
                            .read_to_end_into(end.name(), &mut skip)
                            .map(|_| record)
                    })
                }
                Event::Empty(e) if e.name().as_ref() == SMS_ELEMENT => SmsRecord::from_element(&e),
                Event::Start(e) => {
                    debug!(
                        element = %String::from_utf8_lossy(e.name().as_ref()),
                        "skipping non-sms element"
                    );
                    let end = e.to_end().into_owned();
                    let mut skip = Vec::new();
                    match self.reader.read_to_end_into(end.name(), &mut skip) {
                        Ok(_) => continue,
                        Err(err) => Err(err),
                    }
                }
                Event::Empty(_) => continue,
                // Nested ends are consumed by read_to_end_into
                Event::End(_) => {
                    self.root_open = false;
                    continue;
                }
                Event::Eof => {
                    self.done = true;
                    if !self.seen_root {
                        warn!("backup has no <smses> root");
                        return Some(Err(Error::SourceParse(
                            "no <smses> root element found".to_string(),
                        )));
                    }
                    if self.root_open {
                        warn!("backup ends before </smses>");
                        return Some(Err(Error::SourceParse(
                            "unexpected end of file: <smses> is not closed".to_string(),
                        )));
                    }
                    return None;
                }
                _ => continue,
            };

            return Some(parsed.map_err(|err| {
                self.done = true;
                Error::from_xml(err, self.reader.buffer_position())
            }));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read(xml: &str) -> Result<Vec<SmsRecord>> {
        SmsReader::new(xml.as_bytes()).collect()
    }

    #[test]
    fn test_reads_attributes() {
        let xml = r#"<?xml version='1.0' encoding='UTF-8' standalone='yes' ?>
<smses count="2">
  <sms protocol="0" address="+15550100" date="1700000000000" type="2" body="See you &amp; bye" contact_name="Sam" />
  <sms address="+15550101" type="1" body="ok" contact_name="(Unknown)" />
</smses>"#;

        let records = read(xml).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].body.as_deref(), Some("See you & bye"));
        assert!(records[0].is_outgoing());
        assert_eq!(records[0].contact_name.as_deref(), Some("Sam"));
        assert_eq!(records[0].date.as_deref(), Some("1700000000000"));
        assert_eq!(records[1].kind, MessageType::Received);
    }

    #[test]
    fn test_non_empty_sms_element() {
        let xml = r#"<smses><sms type="2" body="hello there"><extra/></sms><sms type="2" body="again"/></smses>"#;
        let records = read(xml).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].body.as_deref(), Some("again"));
    }

    #[test]
    fn test_skips_other_elements() {
        let xml = r#"<smses><mms type="2"><parts><part text="hi"/></parts></mms><sms type="2" body="hey"/></smses>"#;
        let records = read(xml).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_empty_root_is_valid() {
        assert!(read("<smses count=\"0\"/>").unwrap().is_empty());
        assert!(read("<smses></smses>").unwrap().is_empty());
    }

    #[test]
    fn test_wrong_root() {
        let err = read("<messages><sms type=\"2\"/></messages>").unwrap_err();
        assert!(matches!(err, Error::SourceParse(_)));
    }

    #[test]
    fn test_missing_root() {
        let err = read("").unwrap_err();
        assert!(matches!(err, Error::SourceParse(_)));
    }

    #[test]
    fn test_malformed_xml() {
        let err = read("<smses><sms type=\"2\" body=\"x\"></smses>").unwrap_err();
        assert!(matches!(err, Error::SourceParse(_)));
    }

    #[test]
    fn test_truncated_backup() {
        let xml = "<smses count=\"3\">\n  <sms type=\"2\" body=\"hello there\" />\n";
        let results: Vec<_> = SmsReader::new(xml.as_bytes()).collect();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].as_ref().unwrap().body.as_deref(), Some("hello there"));
        assert!(matches!(results[1], Err(Error::SourceParse(_))));

        assert!(matches!(read("<smses>").unwrap_err(), Error::SourceParse(_)));
    }

    #[test]
    fn test_elements_after_root() {
        let err = read(r#"<smses/><sms type="2" body="x"/>"#).unwrap_err();
        assert!(matches!(err, Error::SourceParse(_)));

        let err = read(r#"<smses></smses><sms type="2" body="x"/>"#).unwrap_err();
        assert!(matches!(err, Error::SourceParse(_)));

        // Trailing whitespace and comments are fine
        assert!(read("<smses></smses>\n<!-- end -->\n").unwrap().is_empty());
    }

    #[test]
    fn test_message_type_codes() {
        assert!(MessageType::from_code("2").is_outgoing());
        assert!(!MessageType::from_code("1").is_outgoing());
        assert_eq!(MessageType::from_code("9"), MessageType::Other("9".to_string()));
    }

    #[test]
    fn test_contact_name() {
        let mut record = SmsRecord::outgoing("hi");
        assert!(!record.has_contact_name());
        record.contact_name = Some("   ".to_string());
        assert!(!record.has_contact_name());
        record.contact_name = Some("Sam".to_string());
        assert!(record.has_contact_name());
    }
}
