//! The event-driven plane sweep that discovers crossings.

use crate::key::WireKey;
use crate::num::CheapOrderedFloat;
use crate::range_index::RangeIndex;
use crate::results::ResultSet;
use crate::trace::{NoTrace, SweepObserver, Trace};
use crate::wire::{Wire, WireId, WireLayer};
use crate::Error;

/// Event phases, in their tie-break order at a shared x.
///
/// The order is load-bearing: a horizontal wire whose span closes at x
/// must still be visible to a vertical wire querying at that same x
/// (deletes come after queries), and one whose span opens at x must
/// already be visible (adds come before queries).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum Phase {
    Add = 0,
    Query = 1,
    Delete = 2,
}

#[derive(Clone, Copy, Debug)]
struct Event {
    x: f64,
    phase: Phase,
    wire: WireId,
}

/// Checks one wire layer for crossing wires with a single left-to-right
/// plane sweep.
///
/// A verifier runs once: either [`count_crossings`](Self::count_crossings)
/// or [`wire_crossings`](Self::wire_crossings) may be called, and only
/// once. Build a fresh verifier over the same layer to run again.
pub struct CrossVerifier<'a, O = NoTrace> {
    layer: &'a WireLayer,
    events: Vec<Event>,
    index: RangeIndex<WireKey>,
    observer: O,
    performed: bool,
}

impl<'a> CrossVerifier<'a> {
    /// Creates a verifier for one layer of wires.
    pub fn new(layer: &'a WireLayer) -> Self {
        Self::with_observer(layer, NoTrace)
    }
}

impl<'a> CrossVerifier<'a, Trace> {
    /// Creates a verifier that records a visualizer trace as it runs.
    ///
    /// Retrieve the trace with [`into_observer`](Self::into_observer)
    /// after the run.
    pub fn traced(layer: &'a WireLayer) -> Self {
        Self::with_observer(layer, Trace::new())
    }
}

impl<'a, O: SweepObserver> CrossVerifier<'a, O> {
    /// Creates a verifier that reports its progress to `observer`.
    pub fn with_observer(layer: &'a WireLayer, observer: O) -> Self {
        let mut events = Vec::with_capacity(layer.len() * 2);
        for (id, wire) in layer.wires() {
            if wire.is_horizontal() {
                events.push(Event {
                    x: wire.x1(),
                    phase: Phase::Add,
                    wire: id,
                });
                events.push(Event {
                    x: wire.x2(),
                    phase: Phase::Delete,
                    wire: id,
                });
            } else {
                events.push(Event {
                    x: wire.x1(),
                    phase: Phase::Query,
                    wire: id,
                });
            }
        }
        // x first, then phase, then identity for determinism.
        events.sort_by_key(|e| (CheapOrderedFloat::from(e.x), e.phase, e.wire));

        CrossVerifier {
            layer,
            events,
            index: RangeIndex::new(),
            observer,
            performed: false,
        }
    }

    /// The number of pairs of wires that cross each other.
    pub fn count_crossings(&mut self) -> Result<usize, Error> {
        let events = self.begin()?;
        let layer = self.layer;
        let mut total = 0;
        for event in &events {
            let wire = &layer[event.wire];
            match event.phase {
                Phase::Add => self.open(event.wire, wire),
                Phase::Delete => self.close(event.wire, wire),
                Phase::Query => {
                    self.observer.sweep_advanced(event.x);
                    total += self
                        .index
                        .count(&WireKey::low(wire.y1()), &WireKey::high(wire.y2()));
                }
            }
        }
        Ok(total)
    }

    /// The pairs of wires that cross each other, in discovery order.
    pub fn wire_crossings(&mut self) -> Result<ResultSet, Error> {
        let events = self.begin()?;
        let layer = self.layer;
        let mut results = ResultSet::new();
        for event in &events {
            let wire = &layer[event.wire];
            match event.phase {
                Phase::Add => self.open(event.wire, wire),
                Phase::Delete => self.close(event.wire, wire),
                Phase::Query => {
                    self.observer.sweep_advanced(event.x);
                    let keys = self
                        .index
                        .list(&WireKey::low(wire.y1()), &WireKey::high(wire.y2()));
                    let hits: Vec<&Wire> = keys
                        .iter()
                        // unwrap: only `at` keys are ever stored
                        .map(|k| &layer[k.wire().unwrap()])
                        .collect();
                    self.observer.range_listed(wire.y1(), wire.y2(), &hits);
                    for hit in hits {
                        self.observer.crossing_found(wire, hit);
                        results.add_crossing(wire, hit);
                    }
                }
            }
        }
        Ok(results)
    }

    /// Consumes the verifier, returning its observer (for a traced run,
    /// the recorded [`Trace`]).
    pub fn into_observer(self) -> O {
        self.observer
    }

    fn begin(&mut self) -> Result<Vec<Event>, Error> {
        if self.performed {
            return Err(Error::AlreadyComputed);
        }
        self.performed = true;
        Ok(std::mem::take(&mut self.events))
    }

    fn open(&mut self, id: WireId, wire: &Wire) {
        self.observer.wire_added(wire);
        self.index.insert(WireKey::at(wire.y1(), id));
    }

    fn close(&mut self, id: WireId, wire: &Wire) {
        self.observer.wire_removed(wire);
        self.index.remove(&WireKey::at(wire.y1(), id));
    }
}
