//! The crossings collected by one verifier run.

use std::io;

use crate::wire::Wire;

/// An append-only record of discovered crossings.
///
/// Each crossing is stored as an unordered pair of wire names, sorted
/// lexicographically within the pair; the pairs themselves stay in
/// discovery (sweep) order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResultSet {
    crossings: Vec<(String, String)>,
}

impl ResultSet {
    /// Creates an empty result set.
    pub fn new() -> Self {
        Self::default()
    }

    /// The number of recorded crossings.
    pub fn len(&self) -> usize {
        self.crossings.len()
    }

    /// Are we empty?
    pub fn is_empty(&self) -> bool {
        self.crossings.is_empty()
    }

    /// Records the fact that two wires cross.
    pub(crate) fn add_crossing(&mut self, a: &Wire, b: &Wire) {
        let (first, second) = if a.name() <= b.name() { (a, b) } else { (b, a) };
        self.crossings
            .push((first.name().to_owned(), second.name().to_owned()));
    }

    /// Iterates over the name pairs, in discovery order.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.crossings.iter().map(|(a, b)| (a.as_str(), b.as_str()))
    }

    /// Writes one `name1 name2` line per crossing.
    pub fn write_to(&self, out: &mut impl io::Write) -> io::Result<()> {
        for (a, b) in self.pairs() {
            writeln!(out, "{a} {b}")?;
        }
        Ok(())
    }
}
