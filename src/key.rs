//! The composite key the range index orders wires by.

use crate::num::CheapOrderedFloat;
use crate::wire::WireId;

/// A y-coordinate paired with a wire-identity tie-break.
///
/// Keys compare by y first and by tie-break second; the derived ordering
/// is exactly that, because the fields are declared in that order. The
/// tie-break makes keys for distinct wires distinct even when their
/// y-coordinates collide, so the index never holds equal keys.
///
/// The two sentinel tie-breaks exist only to phrase closed-interval range
/// queries: for a given y, [`WireKey::low`] sorts before every stored key
/// at that y and [`WireKey::high`] sorts after. Sentinels are never
/// inserted into an index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WireKey {
    y: CheapOrderedFloat,
    tiebreak: Tiebreak,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
enum Tiebreak {
    Low,
    Wire(WireId),
    High,
}

impl WireKey {
    /// The key under which a wire is stored in the index.
    pub fn at(y: f64, wire: WireId) -> Self {
        WireKey {
            y: y.into(),
            tiebreak: Tiebreak::Wire(wire),
        }
    }

    /// The low bound of a range query: smaller than every stored key at `y`.
    pub fn low(y: f64) -> Self {
        WireKey {
            y: y.into(),
            tiebreak: Tiebreak::Low,
        }
    }

    /// The high bound of a range query: larger than every stored key at `y`.
    pub fn high(y: f64) -> Self {
        WireKey {
            y: y.into(),
            tiebreak: Tiebreak::High,
        }
    }

    /// The y-coordinate this key orders by.
    pub fn y(&self) -> f64 {
        self.y.into_inner()
    }

    /// The wire this key stands for, or `None` for a query sentinel.
    pub fn wire(&self) -> Option<WireId> {
        match self.tiebreak {
            Tiebreak::Wire(id) => Some(id),
            Tiebreak::Low | Tiebreak::High => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orders_by_y_then_wire() {
        let a = WireKey::at(1.0, WireId(0));
        let b = WireKey::at(1.0, WireId(1));
        let c = WireKey::at(2.0, WireId(0));
        assert!(a < b);
        assert!(b < c);
        assert_eq!(a, WireKey::at(1.0, WireId(0)));
    }

    #[test]
    fn sentinels_bracket_stored_keys_at_their_y() {
        let stored = WireKey::at(1.0, WireId(7));
        assert!(WireKey::low(1.0) < stored);
        assert!(stored < WireKey::high(1.0));

        // But sentinels at a lower y stay below keys at a higher y.
        assert!(WireKey::high(1.0) < WireKey::at(1.5, WireId(0)));
        assert!(WireKey::at(0.5, WireId(0)) < WireKey::low(1.0));
    }

    #[test]
    fn sentinel_wire_is_none() {
        assert_eq!(WireKey::low(0.0).wire(), None);
        assert_eq!(WireKey::high(0.0).wire(), None);
        assert_eq!(WireKey::at(0.0, WireId(3)).wire(), Some(WireId(3)));
    }
}
