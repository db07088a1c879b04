//! Wires and the layer that owns them.

use std::collections::HashMap;
use std::io::BufRead;

use crate::Error;

/// An index into a layer's wire arena.
///
/// Wire identities are assigned by the owning [`WireLayer`], in insertion
/// order, and double as the tie-break that keeps index keys distinct when
/// two wires share a y-coordinate. The index only identifies a wire
/// relative to the layer that produced it; don't mix ids from different
/// layers.
#[derive(Clone, Copy, PartialOrd, Ord, PartialEq, Eq, Hash, serde::Serialize)]
pub struct WireId(pub usize);

impl std::fmt::Debug for WireId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "w_{}", self.0)
    }
}

/// An axis-aligned wire on one chip layer.
///
/// Wires are immutable once built. Endpoints are stored normalized, so
/// `x1 <= x2` and `y1 <= y2` always hold.
#[derive(Clone, Debug, PartialEq)]
pub struct Wire {
    name: String,
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
}

impl Wire {
    /// Creates a wire, normalizing its endpoint order.
    ///
    /// Fails with [`Error::InvalidGeometry`] unless the result is exactly
    /// horizontal or exactly vertical, or if any coordinate is not finite.
    pub fn new(
        name: impl Into<String>,
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
    ) -> Result<Self, Error> {
        let name = name.into();
        let (x1, x2) = if x1 <= x2 { (x1, x2) } else { (x2, x1) };
        let (y1, y2) = if y1 <= y2 { (y1, y2) } else { (y2, y1) };

        let finite = [x1, y1, x2, y2].iter().all(|c| c.is_finite());
        if !finite || (x1 != x2 && y1 != y2) {
            return Err(Error::InvalidGeometry(name));
        }
        Ok(Wire { name, x1, y1, x2, y2 })
    }

    /// The wire's user-visible name, unique within its layer.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The smaller x endpoint.
    pub fn x1(&self) -> f64 {
        self.x1
    }

    /// The smaller y endpoint.
    pub fn y1(&self) -> f64 {
        self.y1
    }

    /// The larger x endpoint.
    pub fn x2(&self) -> f64 {
        self.x2
    }

    /// The larger y endpoint.
    pub fn y2(&self) -> f64 {
        self.y2
    }

    /// True if both endpoints share a y coordinate.
    pub fn is_horizontal(&self) -> bool {
        self.y1 == self.y2
    }

    /// True if both endpoints share an x coordinate.
    pub fn is_vertical(&self) -> bool {
        self.x1 == self.x2
    }

    /// Direct geometric crossing check.
    ///
    /// Two wires cross when one is horizontal, the other vertical, the
    /// vertical one's x lies within the horizontal one's x-span and the
    /// horizontal one's y lies within the vertical one's y-span. Wires are
    /// assumed to only cross, never overlap collinearly.
    pub fn crosses(&self, other: &Wire) -> bool {
        if self.is_horizontal() == other.is_horizontal() {
            return false;
        }
        let (h, v) = if self.is_horizontal() {
            (self, other)
        } else {
            (other, self)
        };
        v.y1 <= h.y1 && h.y1 <= v.y2 && h.x1 <= v.x1 && v.x1 <= h.x2
    }
}

/// The layout of one layer of wires in a chip.
///
/// A layer is an insertion-ordered arena of wires, indexed by [`WireId`]
/// (i.e. with square brackets), with names kept unique. It is built once
/// and read-only during verification.
#[derive(Clone, Debug, Default)]
pub struct WireLayer {
    wires: Vec<Wire>,
    names: HashMap<String, WireId>,
}

impl WireLayer {
    /// Creates a layer with no wires.
    pub fn new() -> Self {
        Self::default()
    }

    /// The number of wires in this layer.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.wires.len()
    }

    /// Builds a wire and adds it to the layer, returning its identity.
    ///
    /// Fails with [`Error::DuplicateName`] if the name is already taken,
    /// and propagates geometry errors from [`Wire::new`].
    pub fn add(
        &mut self,
        name: impl Into<String>,
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
    ) -> Result<WireId, Error> {
        let wire = Wire::new(name, x1, y1, x2, y2)?;
        if self.names.contains_key(wire.name()) {
            return Err(Error::DuplicateName(wire.name().to_owned()));
        }
        let id = WireId(self.wires.len());
        self.names.insert(wire.name().to_owned(), id);
        self.wires.push(wire);
        Ok(id)
    }

    /// Looks a wire up by name.
    pub fn get(&self, name: &str) -> Option<&Wire> {
        self.names.get(name).map(|id| &self.wires[id.0])
    }

    /// Iterates over all wires, in insertion order, with their identities.
    pub fn wires(&self) -> impl Iterator<Item = (WireId, &Wire)> {
        self.wires.iter().enumerate().map(|(i, w)| (WireId(i), w))
    }

    /// Builds a layer by reading a textual wire-list description.
    ///
    /// Each record is either `wire <name> <x1> <y1> <x2> <y2>` or the
    /// terminating `done`. Anything else fails with [`Error::BadRecord`];
    /// geometry problems surface from wire construction.
    pub fn from_reader(reader: impl BufRead) -> Result<Self, Error> {
        let mut layer = WireLayer::new();
        for line in reader.lines() {
            let line = line.map_err(|e| Error::BadRecord(e.to_string()))?;
            let tokens: Vec<&str> = line.split_whitespace().collect();
            match tokens.as_slice() {
                [] => continue,
                ["done"] => break,
                ["wire", name, coords @ ..] if coords.len() == 4 => {
                    let mut parsed = [0.0f64; 4];
                    for (slot, token) in parsed.iter_mut().zip(coords) {
                        *slot = token
                            .parse()
                            .map_err(|_| Error::BadRecord(line.clone()))?;
                    }
                    let [x1, y1, x2, y2] = parsed;
                    layer.add(*name, x1, y1, x2, y2)?;
                }
                _ => return Err(Error::BadRecord(line.clone())),
            }
        }
        Ok(layer)
    }
}

impl std::ops::Index<WireId> for WireLayer {
    type Output = Wire;

    fn index(&self, index: WireId) -> &Self::Output {
        &self.wires[index.0]
    }
}
