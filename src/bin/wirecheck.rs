//! Reads a wire list from stdin and reports crossings on stdout.
//!
//! The `TRACE` environment variable picks the output mode: `jsonp` emits
//! the visualizer document, `list` emits one name pair per crossing, and
//! anything else emits the crossing count.

use std::io::{self, Write};

use wirecheck::{CrossVerifier, TraceDocument, WireLayer};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let layer = WireLayer::from_reader(io::stdin().lock())?;
    let mut out = io::stdout().lock();

    match std::env::var("TRACE").ok().as_deref() {
        Some("jsonp") => {
            let mut verifier = CrossVerifier::traced(&layer);
            verifier.wire_crossings()?;
            TraceDocument::new(&layer, verifier.into_observer()).write_jsonp(&mut out)?;
        }
        Some("list") => {
            let mut verifier = CrossVerifier::new(&layer);
            verifier.wire_crossings()?.write_to(&mut out)?;
        }
        _ => {
            let mut verifier = CrossVerifier::new(&layer);
            writeln!(out, "{}", verifier.count_crossings()?)?;
        }
    }
    Ok(())
}
