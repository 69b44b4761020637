// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Value Change Dump output for simulated pin traces.
//!
//! The trace can be opened in GTKWave or any other VCD viewer. Timestamps are in microseconds.

use core::fmt::{self, Write};

use super::Edge;

/// Identifier code of the single traced signal.
const SIGNAL_ID: char = '!';

/// Write a one-signal VCD trace of `edges`, ending at `end_us`.
///
/// `name` is the signal name shown by the viewer (e.g. `"PWM"`). The signal starts low at time 0.
pub fn write_vcd<W: Write>(out: &mut W, name: &str, edges: &[Edge], end_us: u64) -> fmt::Result {
    writeln!(out, "$timescale 1us $end")?;
    writeln!(out, "$scope module servo $end")?;
    writeln!(out, "$var wire 1 {SIGNAL_ID} {name} $end")?;
    writeln!(out, "$upscope $end")?;
    writeln!(out, "$enddefinitions $end")?;
    writeln!(out, "$dumpvars\n0{SIGNAL_ID}\n$end")?;

    let mut last_us: Option<u64> = None;
    for edge in edges {
        let at_us = edge.at_us();
        if last_us != Some(at_us) {
            writeln!(out, "#{at_us}")?;
            last_us = Some(at_us);
        }
        writeln!(out, "{}{SIGNAL_ID}", u8::from(edge.high))?;
    }

    if last_us.map_or(true, |t| end_us > t) {
        writeln!(out, "#{end_us}")?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use heapless::String;

    #[test]
    fn writes_header_and_changes() {
        let edges = [
            Edge {
                at_ns: 1_000_000,
                high: true,
            },
            Edge {
                at_ns: 2_500_000,
                high: false,
            },
        ];

        let mut out: String<512> = String::new();
        write_vcd(&mut out, "PWM", &edges, 21_000).unwrap();

        let expected = "$timescale 1us $end\n\
                        $scope module servo $end\n\
                        $var wire 1 ! PWM $end\n\
                        $upscope $end\n\
                        $enddefinitions $end\n\
                        $dumpvars\n0!\n$end\n\
                        #1000\n1!\n\
                        #2500\n0!\n\
                        #21000\n";
        assert_eq!(out.as_str(), expected);
    }

    #[test]
    fn reports_capacity_errors() {
        let mut out: String<16> = String::new();
        assert!(write_vcd(&mut out, "PWM", &[], 0).is_err());
    }
}
