//! Line-delimited JSON messages exchanged with the Python driver.

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Request<'a> {
    Exec { code: &'a str },
    Bindings,
    PatchInput,
    /// `None` means the prompt was dismissed.
    InputReply { value: Option<&'a str> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stream {
    Stdout,
    Stderr,
}

#[derive(Debug, PartialEq, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    Ready { version: String },
    Patched,
    Stream { stream: Stream, text: String },
    Input { prompt: String },
    Done,
    Error { message: String },
    Bindings { items: Vec<(String, String)> },
}

impl Event {
    /// Decode one line from the driver. Blank lines and lines that are not
    /// protocol events give `None`; the latter are logged.
    pub fn decode_line(line: &str) -> Option<Event> {
        if line.trim().is_empty() {
            return None;
        }
        match serde_json::from_str(line) {
            Ok(event) => Some(event),
            Err(e) => {
                tracing::warn!(error = %e, line, "skipping non-protocol line");
                None
            }
        }
    }
}

impl Request<'_> {
    pub fn to_line(&self) -> serde_json::Result<String> {
        let mut line = serde_json::to_string(self)?;
        line.push('\n');
        Ok(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requests_are_tagged_by_op() {
        let line = Request::Exec { code: "print(1)" }.to_line().unwrap();
        assert_eq!(line, "{\"op\":\"exec\",\"code\":\"print(1)\"}\n");
        assert_eq!(Request::Bindings.to_line().unwrap(), "{\"op\":\"bindings\"}\n");
    }

    #[test]
    fn dismissed_input_is_sent_as_null() {
        let line = Request::InputReply { value: None }.to_line().unwrap();
        assert_eq!(line, "{\"op\":\"input_reply\",\"value\":null}\n");
    }

    #[test]
    fn events_decode_from_driver_json() {
        let ev: Event =
            serde_json::from_str(r#"{"event":"stream","stream":"stderr","text":"oops"}"#).unwrap();
        assert_eq!(
            ev,
            Event::Stream {
                stream: Stream::Stderr,
                text: "oops".into()
            }
        );

        let ev: Event =
            serde_json::from_str(r#"{"event":"bindings","items":[["x","5"],["s","'a'"]]}"#).unwrap();
        assert_eq!(
            ev,
            Event::Bindings {
                items: vec![("x".into(), "5".into()), ("s".into(), "'a'".into())]
            }
        );
    }

    #[test]
    fn unknown_events_are_rejected() {
        assert!(serde_json::from_str::<Event>(r#"{"event":"bogus"}"#).is_err());
    }

    #[test]
    fn stray_lines_are_skipped_not_fatal() {
        assert_eq!(Event::decode_line("hi"), None);
        assert_eq!(Event::decode_line("   "), None);
        assert_eq!(Event::decode_line(r#"{"a": 1}"#), None);
        assert_eq!(Event::decode_line(r#"{"event":"done"}"#), Some(Event::Done));
    }
}
