//! Tabular coordinate logging.
//!
//! Every frame with a detection contributes rows describing the normalized
//! coordinates of the tracked landmark subset. The header layout and row
//! shape are selected by [`Schema`]; the shapes mirror the three formats the
//! logs are consumed in downstream.

use std::{fs::File, io::Write, path::Path};

use anyhow::bail;

use crate::landmark::{Landmark, LandmarkIdx};

/// Header layout and row shape of a coordinate log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schema {
    /// One wide row per detected frame carrying two fixed nodes:
    /// `Frame, Node A - X/Y/Z, Node B - X/Y/Z`.
    NodePair {
        first: LandmarkIdx,
        second: LandmarkIdx,
    },
    /// One row per tracked fingertip: `Frame, Finger, X, Y, Z`.
    FingerName,
    /// One row per tracked node: `Frame, Node Number, X, Y, Z`.
    NodeNumber,
}

impl Schema {
    fn header(&self) -> Vec<String> {
        match self {
            Schema::NodePair { first, second } => {
                let mut header = vec!["Frame".to_string()];
                for node in [first, second] {
                    for axis in ["X", "Y", "Z"] {
                        header.push(format!("Node {} - {}", *node as u32, axis));
                    }
                }
                header
            }
            Schema::FingerName => ["Frame", "Finger", "X", "Y", "Z"]
                .map(String::from)
                .to_vec(),
            Schema::NodeNumber => ["Frame", "Node Number", "X", "Y", "Z"]
                .map(String::from)
                .to_vec(),
        }
    }
}

/// Capability trait for the tabular output sink.
pub trait TrackSink {
    /// Appends the rows for one frame-with-detection and returns the number
    /// of rows written.
    ///
    /// `nodes` is the tracked landmark subset in configuration order, with
    /// normalized coordinates.
    fn append(&mut self, frame: u64, nodes: &[(LandmarkIdx, Landmark)]) -> anyhow::Result<usize>;

    /// Flushes and closes the sink. Called exactly once, at loop end.
    fn finish(&mut self) -> anyhow::Result<()> {
        Ok(())
    }
}

/// A [`TrackSink`] writing delimited text with a fixed header row.
///
/// The header is written on construction; rows use a stable float formatting,
/// so identical runs produce byte-identical logs.
pub struct CsvSink<W: Write> {
    writer: csv::Writer<W>,
    schema: Schema,
}

impl CsvSink<File> {
    /// Creates the log file at `path`, truncating any previous contents, and
    /// writes the header row.
    pub fn create<P: AsRef<Path>>(path: P, schema: Schema) -> anyhow::Result<Self> {
        let writer = csv::Writer::from_path(path)?;
        Self::with_writer(writer, schema)
    }
}

impl<W: Write> CsvSink<W> {
    /// Wraps an open writer and writes the header row.
    pub fn from_writer(writer: W, schema: Schema) -> anyhow::Result<Self> {
        Self::with_writer(csv::Writer::from_writer(writer), schema)
    }

    fn with_writer(mut writer: csv::Writer<W>, schema: Schema) -> anyhow::Result<Self> {
        writer.write_record(schema.header())?;
        Ok(Self { writer, schema })
    }

    /// Flushes buffered rows and returns the underlying writer.
    pub fn into_inner(mut self) -> anyhow::Result<W> {
        self.writer.flush()?;
        match self.writer.into_inner() {
            Ok(writer) => Ok(writer),
            Err(e) => Err(anyhow::anyhow!("failed to flush csv writer: {e}")),
        }
    }
}

impl<W: Write> TrackSink for CsvSink<W> {
    fn append(&mut self, frame: u64, nodes: &[(LandmarkIdx, Landmark)]) -> anyhow::Result<usize> {
        match self.schema {
            Schema::NodePair { first, second } => {
                let find = |wanted: LandmarkIdx| {
                    nodes
                        .iter()
                        .find(|(idx, _)| *idx == wanted)
                        .map(|(_, lm)| *lm)
                };
                let (Some(a), Some(b)) = (find(first), find(second)) else {
                    bail!("tracked subset does not contain nodes {first:?} and {second:?}");
                };
                self.writer.serialize((
                    frame,
                    a.x(),
                    a.y(),
                    a.z(),
                    b.x(),
                    b.y(),
                    b.z(),
                ))?;
                Ok(1)
            }
            Schema::FingerName => {
                for (idx, lm) in nodes {
                    let finger = match idx.finger_name() {
                        Some(name) => name,
                        None => bail!("{idx:?} is not a fingertip"),
                    };
                    self.writer
                        .serialize((frame, finger, lm.x(), lm.y(), lm.z()))?;
                }
                Ok(nodes.len())
            }
            Schema::NodeNumber => {
                for (idx, lm) in nodes {
                    self.writer
                        .serialize((frame, *idx as u32, lm.x(), lm.y(), lm.z()))?;
                }
                Ok(nodes.len())
            }
        }
    }

    fn finish(&mut self) -> anyhow::Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lm(x: f32, y: f32, z: f32) -> Landmark {
        Landmark::new([x, y, z])
    }

    fn output<F: FnOnce(&mut CsvSink<Vec<u8>>)>(schema: Schema, f: F) -> String {
        let mut sink = CsvSink::from_writer(Vec::new(), schema).unwrap();
        f(&mut sink);
        String::from_utf8(sink.into_inner().unwrap()).unwrap()
    }

    #[test]
    fn node_pair_header_and_row() {
        let schema = Schema::NodePair {
            first: LandmarkIdx::ThumbTip,
            second: LandmarkIdx::IndexFingerTip,
        };
        let out = output(schema, |sink| {
            let rows = sink
                .append(
                    7,
                    &[
                        (LandmarkIdx::ThumbTip, lm(0.1, 0.2, 0.3)),
                        (LandmarkIdx::IndexFingerTip, lm(0.4, 0.5, 0.6)),
                    ],
                )
                .unwrap();
            assert_eq!(rows, 1);
        });

        assert_eq!(
            out,
            "Frame,Node 4 - X,Node 4 - Y,Node 4 - Z,Node 8 - X,Node 8 - Y,Node 8 - Z\n\
             7,0.1,0.2,0.3,0.4,0.5,0.6\n"
        );
    }

    #[test]
    fn node_pair_rejects_incomplete_subset() {
        let schema = Schema::NodePair {
            first: LandmarkIdx::ThumbTip,
            second: LandmarkIdx::IndexFingerTip,
        };
        let mut sink = CsvSink::from_writer(Vec::new(), schema).unwrap();
        let err = sink
            .append(0, &[(LandmarkIdx::ThumbTip, lm(0.0, 0.0, 0.0))])
            .unwrap_err();
        assert!(err.to_string().contains("does not contain"));
    }

    #[test]
    fn finger_rows_use_display_names() {
        let out = output(Schema::FingerName, |sink| {
            let rows = sink
                .append(
                    0,
                    &[
                        (LandmarkIdx::ThumbTip, lm(0.5, 0.5, 0.0)),
                        (LandmarkIdx::PinkyTip, lm(0.25, 0.75, 0.0)),
                    ],
                )
                .unwrap();
            assert_eq!(rows, 2);
        });

        assert_eq!(
            out,
            "Frame,Finger,X,Y,Z\n\
             0,Thumb,0.5,0.5,0.0\n\
             0,Pinky finger,0.25,0.75,0.0\n"
        );
    }

    #[test]
    fn finger_schema_rejects_non_tips() {
        let mut sink = CsvSink::from_writer(Vec::new(), Schema::FingerName).unwrap();
        let err = sink
            .append(0, &[(LandmarkIdx::Wrist, lm(0.0, 0.0, 0.0))])
            .unwrap_err();
        assert!(err.to_string().contains("not a fingertip"));
    }

    #[test]
    fn node_number_rows() {
        let out = output(Schema::NodeNumber, |sink| {
            sink.append(2, &[(LandmarkIdx::IndexFingerTip, lm(0.5, 0.5, 0.0))])
                .unwrap();
        });

        assert_eq!(
            out,
            "Frame,Node Number,X,Y,Z\n\
             2,8,0.5,0.5,0.0\n"
        );
    }
}
