//! JSON-lines bridge between byte streams and the bus
//!
//! Each line is one [`Envelope`]:
//!
//! ```json
//! {"topic":"pose","transform":{"stamp":0,"frame_id":"world","child_frame_id":"agent",
//!  "translation":{"x":1.0,"y":0.0,"z":0.0},"rotation":{"x":0.0,"y":0.0,"z":0.0,"w":1.0}}}
//! ```

use crate::core::TransformStamped;
use crate::transport::Publisher;
use log::warn;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::io::{self, BufRead, Write};

/// A message together with the topic it travels on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub topic: String,
    pub transform: TransformStamped,
}

#[derive(Serialize)]
struct EnvelopeRef<'a> {
    topic: &'a str,
    transform: &'a TransformStamped,
}

/// Counters reported by [`pump`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PumpStats {
    /// Lines published onto the bus
    pub forwarded: usize,
    /// Lines that did not decode as an envelope
    pub rejected: usize,
}

/// Publish every envelope read from `reader` until end of input.
///
/// Lines that fail to decode, including ones that are not valid UTF-8, are
/// logged and skipped; only read errors stop the pump.
pub fn pump<R: BufRead>(mut reader: R, publisher: &dyn Publisher) -> io::Result<PumpStats> {
    let mut stats = PumpStats::default();
    let mut line = Vec::new();
    let mut line_number = 0usize;

    loop {
        line.clear();
        if reader.read_until(b'\n', &mut line)? == 0 {
            return Ok(stats);
        }
        line_number += 1;

        if line.iter().all(u8::is_ascii_whitespace) {
            continue;
        }
        match serde_json::from_slice::<Envelope>(&line) {
            Ok(envelope) => {
                publisher.publish(&envelope.topic, &envelope.transform);
                stats.forwarded += 1;
            }
            Err(e) => {
                warn!("Skipping input line {}: {}", line_number, e);
                stats.rejected += 1;
            }
        }
    }
}

/// Publisher writing one JSON envelope per line
pub struct JsonLinesWriter<W: Write + Send> {
    out: Mutex<W>,
}

impl<W: Write + Send> JsonLinesWriter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }

    fn write_envelope(&self, topic: &str, transform: &TransformStamped) -> io::Result<()> {
        let mut out = self.out.lock();
        serde_json::to_writer(&mut *out, &EnvelopeRef { topic, transform })?;
        out.write_all(b"\n")?;
        out.flush()
    }
}

impl<W: Write + Send> Publisher for JsonLinesWriter<W> {
    fn publish(&self, topic: &str, message: &TransformStamped) {
        if let Err(e) = self.write_envelope(topic, message) {
            warn!("Dropping message on topic '{}': {}", topic, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Rotation, Timestamp, Translation};
    use crate::transport::Recorder;

    fn message() -> TransformStamped {
        TransformStamped::new(
            Timestamp::from_nanos(7),
            "world",
            "setpoint",
            Translation {
                x: 1.0,
                y: 2.0,
                z: 3.0,
            },
            Rotation::default(),
        )
    }

    #[test]
    fn test_writer_emits_one_line_per_message() {
        let writer = JsonLinesWriter::new(Vec::new());
        writer.publish("setpoints", &message());
        writer.publish("setpoints", &message());

        let text = String::from_utf8(writer.into_inner()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);

        let envelope: Envelope = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(envelope.topic, "setpoints");
        assert_eq!(envelope.transform, message());
    }

    #[test]
    fn test_pump_forwards_and_skips() {
        let good = serde_json::to_string(&Envelope {
            topic: "pose".to_string(),
            transform: message(),
        })
        .unwrap();
        let input = format!("{good}\nnot json\n\n{{\"topic\":\"pose\"}}\n{good}\n");

        let recorder = Recorder::new();
        let stats = pump(input.as_bytes(), &recorder).unwrap();

        assert_eq!(
            stats,
            PumpStats {
                forwarded: 2,
                rejected: 2
            }
        );
        assert_eq!(recorder.on_topic("pose"), vec![message(), message()]);
    }

    #[test]
    fn test_pump_survives_invalid_utf8() {
        let good = serde_json::to_vec(&Envelope {
            topic: "pose".to_string(),
            transform: message(),
        })
        .unwrap();

        let mut input = good.clone();
        input.extend_from_slice(b"\n\xff\xfe garbage\n");
        input.extend_from_slice(&good);
        input.push(b'\n');

        let recorder = Recorder::new();
        let stats = pump(input.as_slice(), &recorder).unwrap();

        assert_eq!(
            stats,
            PumpStats {
                forwarded: 2,
                rejected: 1
            }
        );
        assert_eq!(recorder.on_topic("pose").len(), 2);
    }

    #[test]
    fn test_pump_accepts_last_line_without_newline() {
        let good = serde_json::to_string(&Envelope {
            topic: "tf".to_string(),
            transform: message(),
        })
        .unwrap();

        let recorder = Recorder::new();
        let stats = pump(format!("\r\n{good}").as_bytes(), &recorder).unwrap();

        assert_eq!(stats.forwarded, 1);
        assert_eq!(stats.rejected, 0);
    }
}
