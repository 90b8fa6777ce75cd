// Plain-text rendering of run summaries, kinetics tables and probe hits.

use std::io::{self, Write};

use hh_analysis::{Detection, ProbeSample, RunSummary, SearchWindow};
use hh_core::KineticsRow;

fn detection_line(label: &str, detection: &Detection) -> String {
    match detection {
        Detection::Found(p) => format!(
            "{:<11} t = {:.3} ms, V = {:.3} mV (sample {})",
            label, p.time, p.voltage, p.index
        ),
        Detection::NotFound => format!("{:<11} not found", label),
    }
}

fn window_line(window: &SearchWindow) -> String {
    match window {
        SearchWindow::Between { start, end } => format!("{:.3} < t < {:.3} ms", start, end),
        SearchWindow::From { start } => format!("t >= {:.3} ms", start),
    }
}

pub fn write_summary<W: Write>(out: &mut W, s: &RunSummary) -> io::Result<()> {
    writeln!(
        out,
        "samples     {} (dt = {} ms, T = {} ms)",
        s.samples, s.dt, s.duration
    )?;
    writeln!(out, "voltage     {:.3} .. {:.3} mV", s.v_min, s.v_max)?;
    writeln!(
        out,
        "crossings   {} (dV/dt rising through the onset rate, stimulus edges included)",
        s.onset_crossings
    )?;
    writeln!(out, "{}", detection_line("onset", &s.onset))?;
    writeln!(out, "{}", detection_line("inflection", &s.inflection))?;
    writeln!(out, "window      {}", window_line(&s.window))?;
    if !s.gates_in_unit_range {
        writeln!(out, "warning     gating variables left [0, 1]; reduce dt")?;
    }
    Ok(())
}

pub fn write_kinetics<W: Write>(out: &mut W, rows: &[KineticsRow]) -> io::Result<()> {
    writeln!(out, "v\tn_inf\tm_inf\th_inf\ttau_n\ttau_m\ttau_h")?;
    for r in rows {
        writeln!(
            out,
            "{:.3}\t{:.6}\t{:.6}\t{:.6}\t{:.6}\t{:.6}\t{:.6}",
            r.v, r.n_inf, r.m_inf, r.h_inf, r.tau_n, r.tau_m, r.tau_h
        )?;
    }
    Ok(())
}

pub fn write_probe<W: Write>(out: &mut W, target: f64, samples: &[ProbeSample]) -> io::Result<()> {
    if samples.is_empty() {
        return writeln!(out, "no samples near V = {} mV", target);
    }
    for s in samples {
        writeln!(
            out,
            "time: {:.3}, V: {:.5}, d2V_dt: {:.6}",
            s.time, s.voltage, s.d2v_dt
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hh_analysis::EventPoint;

    fn render<F: FnOnce(&mut Vec<u8>) -> io::Result<()>>(f: F) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn summary_lists_events_and_absence() {
        let summary = RunSummary {
            samples: 100,
            dt: 0.01,
            duration: 1.0,
            v_min: -65.0,
            v_max: 30.0,
            onset_crossings: 1,
            gates_in_unit_range: true,
            window: SearchWindow::From { start: 0.5 },
            onset: Detection::Found(EventPoint {
                index: 10,
                time: 0.1,
                voltage: -50.0,
            }),
            inflection: Detection::NotFound,
        };
        let text = render(|b| write_summary(b, &summary));
        assert!(text.contains("onset       t = 0.100 ms, V = -50.000 mV (sample 10)"));
        assert!(text.contains("inflection  not found"));
        assert!(text.contains("t >= 0.500 ms"));
        assert!(text.contains("crossings   1 "));
        assert!(!text.contains("warning"));
    }

    #[test]
    fn kinetics_has_header_and_rows() {
        let rows = hh_core::kinetics_table(-70.0, -60.0, 5.0).unwrap();
        let text = render(|b| write_kinetics(b, &rows));
        assert_eq!(text.lines().count(), 3);
        assert!(text.starts_with("v\tn_inf"));
    }

    #[test]
    fn empty_probe_says_so() {
        let text = render(|b| write_probe(b, -54.87, &[]));
        assert_eq!(text, "no samples near V = -54.87 mV\n");
    }
}
