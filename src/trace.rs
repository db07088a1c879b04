//! Observation hooks for the sweep, and the visualizer trace they feed.

use std::io;

use crate::wire::{Wire, WireLayer};

/// Callbacks fired as the sweep progresses.
///
/// Implementations observe only: they must not affect return values or
/// control flow. Every method defaults to a no-op, so an observer can
/// pick out just the actions it cares about.
pub trait SweepObserver {
    /// The sweep line reached `x` and is about to answer a query there.
    fn sweep_advanced(&mut self, _x: f64) {}

    /// A horizontal wire is about to enter the index.
    fn wire_added(&mut self, _wire: &Wire) {}

    /// A horizontal wire is about to leave the index.
    fn wire_removed(&mut self, _wire: &Wire) {}

    /// A range query over `[from, to]` returned `hits`.
    fn range_listed(&mut self, _from: f64, _to: f64, _hits: &[&Wire]) {}

    /// A crossing between two wires is about to be recorded.
    fn crossing_found(&mut self, _a: &Wire, _b: &Wire) {}
}

/// The silent observer: plain verification with no tracing overhead.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoTrace;

impl SweepObserver for NoTrace {}

/// One entry in the visualizer trace.
///
/// The serialized shapes (`{"type": "add", "id": ...}` and friends) are
/// the wire format an external renderer consumes; field names and record
/// order are part of that contract.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TraceRecord {
    /// A wire entered the index.
    Add {
        /// The wire's name.
        id: String,
    },
    /// A wire left the index.
    Delete {
        /// The wire's name.
        id: String,
    },
    /// A range query and its hits.
    List {
        /// Low end of the queried y-interval.
        from: f64,
        /// High end of the queried y-interval.
        to: f64,
        /// Names of the wires the query returned, ascending by key.
        ids: Vec<String>,
    },
    /// A crossing was recorded.
    Crossing {
        /// One wire of the pair.
        id1: String,
        /// The other wire.
        id2: String,
    },
    /// The sweep line moved.
    Sweep {
        /// The sweep line's x position.
        x: f64,
    },
}

/// An observer that appends one [`TraceRecord`] per sweep action, in
/// emission order.
#[derive(Clone, Debug, Default)]
pub struct Trace {
    records: Vec<TraceRecord>,
}

impl Trace {
    /// Creates an empty trace.
    pub fn new() -> Self {
        Self::default()
    }

    /// The recorded trace, in emission order.
    pub fn records(&self) -> &[TraceRecord] {
        &self.records
    }
}

impl SweepObserver for Trace {
    fn sweep_advanced(&mut self, x: f64) {
        self.records.push(TraceRecord::Sweep { x });
    }

    fn wire_added(&mut self, wire: &Wire) {
        self.records.push(TraceRecord::Add {
            id: wire.name().to_owned(),
        });
    }

    fn wire_removed(&mut self, wire: &Wire) {
        self.records.push(TraceRecord::Delete {
            id: wire.name().to_owned(),
        });
    }

    fn range_listed(&mut self, from: f64, to: f64, hits: &[&Wire]) {
        self.records.push(TraceRecord::List {
            from,
            to,
            ids: hits.iter().map(|w| w.name().to_owned()).collect(),
        });
    }

    fn crossing_found(&mut self, a: &Wire, b: &Wire) {
        self.records.push(TraceRecord::Crossing {
            id1: a.name().to_owned(),
            id2: b.name().to_owned(),
        });
    }
}

#[derive(Clone, Debug, serde::Serialize)]
struct WireJson {
    id: String,
    x: [f64; 2],
    y: [f64; 2],
}

#[derive(Clone, Debug, serde::Serialize)]
struct LayerJson {
    wires: Vec<WireJson>,
}

/// The structured document an external visualizer renders: the layer's
/// wire list plus the ordered trace of one verifier run.
#[derive(Clone, Debug, serde::Serialize)]
pub struct TraceDocument {
    layer: LayerJson,
    trace: Vec<TraceRecord>,
}

impl TraceDocument {
    /// Packages a layer and the trace of a run over it.
    pub fn new(layer: &WireLayer, trace: Trace) -> Self {
        let wires = layer
            .wires()
            .map(|(_, w)| WireJson {
                id: w.name().to_owned(),
                x: [w.x1(), w.x2()],
                y: [w.y1(), w.y2()],
            })
            .collect();
        TraceDocument {
            layer: LayerJson { wires },
            trace: trace.records,
        }
    }

    /// Serializes the document as JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Writes the document wrapped in an `onJsonp(...);` call, the form
    /// the visualizer's loader expects.
    pub fn write_jsonp(&self, out: &mut impl io::Write) -> io::Result<()> {
        out.write_all(b"onJsonp(")?;
        serde_json::to_writer(&mut *out, self)?;
        out.write_all(b");\n")?;
        Ok(())
    }
}
