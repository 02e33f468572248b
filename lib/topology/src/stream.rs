// Streaming reader for files of named JSON records
use crate::Result;
use serde::de::{Deserializer, MapAccess, Visitor};
use serde_json::{Map, Value};
use std::fmt;
use std::io::Read;
use tracing::{trace, warn};

/// Where the parser is inside a record file.
///
/// ```text
/// Idle ──{──> ObjectStarted ──key──> ReadingKey ──body──> ReadingObject
///   ^               │  ^                                        │
///   └──────}────────┘  └──────────────── record done ───────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserState {
    /// Before the top-level object opens, or after it closes
    Idle,
    /// Inside the top-level object, between records
    ObjectStarted,
    /// A record name has been read
    ReadingKey,
    /// The record body is being parsed
    ReadingObject,
}

impl ParserState {
    /// Whether moving from `self` to `next` is a legal step
    pub fn can_transition_to(self, next: ParserState) -> bool {
        use ParserState::*;
        matches!(
            (self, next),
            (Idle, ObjectStarted)
                | (ObjectStarted, ReadingKey)
                | (ObjectStarted, Idle)
                | (ReadingKey, ReadingObject)
                | (ReadingObject, ObjectStarted)
        )
    }
}

/// Pulls `name -> { body }` records out of a top-level JSON object one
/// at a time, without materializing the whole document.
pub struct RecordStream<R> {
    reader: R,
    state: ParserState,
}

impl<R: Read> RecordStream<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            state: ParserState::Idle,
        }
    }

    #[inline]
    pub fn state(&self) -> ParserState {
        self.state
    }

    /// Invoke `callback` for each record in document order.
    ///
    /// Record bodies that are not JSON objects are skipped. Returns the
    /// number of records delivered. Syntax errors abort the stream.
    pub fn for_each<F>(&mut self, callback: F) -> Result<usize>
    where
        F: FnMut(String, Map<String, Value>),
    {
        // a failed call can leave the state mid-object
        self.state = ParserState::Idle;
        let mut de = serde_json::Deserializer::from_reader(&mut self.reader);
        let visitor = RecordVisitor {
            state: &mut self.state,
            callback,
        };
        let count = (&mut de).deserialize_map(visitor)?;
        de.end()?;
        Ok(count)
    }
}

struct RecordVisitor<'a, F> {
    state: &'a mut ParserState,
    callback: F,
}

impl<F> RecordVisitor<'_, F> {
    fn transition(&mut self, next: ParserState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "illegal parser transition {:?} -> {:?}",
            self.state,
            next
        );
        trace!("parser {:?} -> {:?}", self.state, next);
        *self.state = next;
    }
}

impl<'de, F> Visitor<'de> for RecordVisitor<'_, F>
where
    F: FnMut(String, Map<String, Value>),
{
    type Value = usize;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an object of named records")
    }

    fn visit_map<A>(mut self, mut access: A) -> std::result::Result<usize, A::Error>
    where
        A: MapAccess<'de>,
    {
        self.transition(ParserState::ObjectStarted);
        let mut count = 0;

        while let Some(name) = access.next_key::<String>()? {
            self.transition(ParserState::ReadingKey);
            self.transition(ParserState::ReadingObject);
            match access.next_value::<Value>()? {
                Value::Object(body) => {
                    (self.callback)(name, body);
                    count += 1;
                }
                other => warn!("Record {}: expected an object, got {}", name, other),
            }
            self.transition(ParserState::ObjectStarted);
        }

        self.transition(ParserState::Idle);
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(json: &str) -> Result<Vec<(String, Map<String, Value>)>> {
        let mut records = Vec::new();
        let mut stream = RecordStream::new(json.as_bytes());
        stream.for_each(|name, body| records.push((name, body)))?;
        assert_eq!(stream.state(), ParserState::Idle);
        Ok(records)
    }

    #[test]
    fn test_records_in_document_order() {
        let records = collect(r#"{ "z": {"budget": "1"}, "a": {}, "m": {"x": [1, 2]} }"#).unwrap();
        let names: Vec<&str> = records.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["z", "a", "m"]);
        assert_eq!(records[0].1.get("budget"), Some(&Value::from("1")));
    }

    #[test]
    fn test_non_object_bodies_skipped() {
        let records = collect(r#"{ "a": 1, "b": {}, "c": [ {} ], "d": null }"#).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].0, "b");
    }

    #[test]
    fn test_empty_document() {
        assert!(collect("{}").unwrap().is_empty());
    }

    #[test]
    fn test_syntax_error_is_reported() {
        assert!(collect(r#"{ "a": {"#).is_err());
        assert!(collect(r#"[1, 2]"#).is_err());
        assert!(collect(r#"{} trailing"#).is_err());
    }

    #[test]
    fn test_stream_usable_after_error() {
        let mut stream = RecordStream::new(r#"{ "a": {}, 5{"b": {}}"#.as_bytes());

        let mut first = Vec::new();
        assert!(stream.for_each(|name, _| first.push(name)).is_err());
        assert_eq!(first, vec!["a"]);
        assert_eq!(stream.state(), ParserState::ObjectStarted);

        let mut second = Vec::new();
        assert_eq!(stream.for_each(|name, _| second.push(name)).unwrap(), 1);
        assert_eq!(second, vec!["b"]);
        assert_eq!(stream.state(), ParserState::Idle);
    }

    #[test]
    fn test_transition_table() {
        use ParserState::*;
        assert!(Idle.can_transition_to(ObjectStarted));
        assert!(ObjectStarted.can_transition_to(ReadingKey));
        assert!(ReadingKey.can_transition_to(ReadingObject));
        assert!(ReadingObject.can_transition_to(ObjectStarted));
        assert!(ObjectStarted.can_transition_to(Idle));

        assert!(!Idle.can_transition_to(ReadingObject));
        assert!(!ReadingKey.can_transition_to(Idle));
        assert!(!ReadingObject.can_transition_to(ReadingKey));
    }
}
