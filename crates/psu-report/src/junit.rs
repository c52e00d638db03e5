//! Streaming reader for the JUnit document a spec runner prints.
//!
//! Only the parts the normalizer needs are kept: each `<testcase>` with the
//! name of its nearest enclosing `<testsuite>`, and the first `<failure>` or
//! `<error>` under it. Unknown elements are walked over.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::ReportError;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct JunitCase {
    pub suite: String,
    pub name: String,
    pub status: Option<String>,
    pub time: Option<String>,
    pub failure: Option<Failure>,
}

/// `type` and `message` of a failure, from attributes or child elements.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Failure {
    pub kind: Option<String>,
    pub message: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Field {
    Kind,
    Message,
}

#[derive(Clone, Debug)]
enum Frame {
    Suite(String),
    Case,
    /// `primary` is false for any failure element after the first.
    Failure { primary: bool },
    Field(Field),
    Other,
}

struct Walker {
    stack: Vec<Frame>,
    cases: Vec<JunitCase>,
    seen_root: bool,
    field_text: String,
}

/// Read every test case of `xml` in document order.
pub fn read_cases(xml: &str) -> Result<Vec<JunitCase>, ReportError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut w = Walker { stack: Vec::new(), cases: Vec::new(), seen_root: false, field_text: String::new() };

    loop {
        let pos = reader.buffer_position() as u64;
        let event = reader.read_event().map_err(|e| ReportError::malformed(pos, e))?;
        match event {
            Event::Start(e) => {
                let frame = w.open(&e, pos)?;
                w.stack.push(frame);
            }
            Event::Empty(e) => {
                let frame = w.open(&e, pos)?;
                w.close(frame);
            }
            Event::End(_) => {
                let frame = w
                    .stack
                    .pop()
                    .ok_or_else(|| ReportError::malformed(pos, "closing tag without an open element"))?;
                w.close(frame);
            }
            Event::Text(t) => {
                let text = t.unescape().map_err(|e| ReportError::malformed(pos, e))?;
                w.text(&text, pos)?;
            }
            Event::CData(c) => {
                let text = String::from_utf8_lossy(&c).into_owned();
                w.text(&text, pos)?;
            }
            Event::Eof => break,
            // declaration, doctype, comments, processing instructions
            _ => {}
        }
    }

    let end = reader.buffer_position() as u64;
    if !w.stack.is_empty() {
        return Err(ReportError::malformed(end, format!("{} element(s) left open", w.stack.len())));
    }
    if !w.seen_root {
        return Err(ReportError::malformed(end, "no root element"));
    }
    Ok(w.cases)
}

impl Walker {
    fn open(&mut self, e: &BytesStart<'_>, pos: u64) -> Result<Frame, ReportError> {
        if self.stack.is_empty() {
            if self.seen_root {
                return Err(ReportError::malformed(pos, "more than one root element"));
            }
            self.seen_root = true;
        }

        let in_case = matches!(self.stack.last(), Some(Frame::Case));
        let in_failure = matches!(self.stack.last(), Some(Frame::Failure { primary: true }));

        let frame = match e.local_name().as_ref() {
            b"testsuite" => Frame::Suite(attr(e, b"name", pos)?.unwrap_or_default()),
            b"testcase" => {
                let case = JunitCase {
                    suite: self.current_suite(),
                    name: attr(e, b"name", pos)?.unwrap_or_default(),
                    status: attr(e, b"status", pos)?,
                    time: attr(e, b"time", pos)?,
                    failure: None,
                };
                self.cases.push(case);
                Frame::Case
            }
            b"failure" | b"error" if in_case => {
                let failure = Failure { kind: attr(e, b"type", pos)?, message: attr(e, b"message", pos)? };
                // the first failure element describes the case
                let primary = match self.cases.last_mut() {
                    Some(case) if case.failure.is_none() => {
                        case.failure = Some(failure);
                        true
                    }
                    _ => false,
                };
                Frame::Failure { primary }
            }
            b"type" if in_failure => Frame::Field(Field::Kind),
            b"message" if in_failure => Frame::Field(Field::Message),
            _ => Frame::Other,
        };
        if matches!(frame, Frame::Field(_)) {
            self.field_text.clear();
        }
        Ok(frame)
    }

    fn close(&mut self, frame: Frame) {
        let Frame::Field(field) = frame else {
            return;
        };
        let text = std::mem::take(&mut self.field_text);
        let Some(failure) = self.cases.last_mut().and_then(|c| c.failure.as_mut()) else {
            return;
        };
        let slot = match field {
            Field::Kind => &mut failure.kind,
            Field::Message => &mut failure.message,
        };
        // attributes win over child elements
        if slot.is_none() {
            *slot = Some(text.trim().to_string());
        }
    }

    fn text(&mut self, text: &str, pos: u64) -> Result<(), ReportError> {
        match self.stack.last() {
            None if !text.trim().is_empty() => Err(ReportError::malformed(pos, "text outside the root element")),
            Some(Frame::Field(_)) => {
                self.field_text.push_str(text);
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn current_suite(&self) -> String {
        self.stack
            .iter()
            .rev()
            .find_map(|f| match f {
                Frame::Suite(name) => Some(name.clone()),
                _ => None,
            })
            .unwrap_or_default()
    }
}

fn attr(e: &BytesStart<'_>, key: &[u8], pos: u64) -> Result<Option<String>, ReportError> {
    for a in e.attributes() {
        let a = a.map_err(|err| ReportError::malformed(pos, err))?;
        if a.key.local_name().as_ref() == key {
            let value = a.unescape_value().map_err(|err| ReportError::malformed(pos, err))?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}
