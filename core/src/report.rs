//! Plain-text tables for a finished analysis.
//!
//! Curves are sampled every `table_step` pulls (plus the final pull) so a
//! 900-pull run fits on a screen.

use crate::{
    analysis::{CopyCurves, TargetCurves, WishAnalysis},
    error::{SimError, SimResult},
    types::Step,
};
use std::fmt::{self, Write};

/// Step indices to show: every `table_step`-th pull, and always the last one.
pub fn bucket_steps(chain_length: usize, table_step: usize) -> SimResult<Vec<Step>> {
    if table_step == 0 {
        return Err(SimError::invalid_parameter("table_step", table_step, "must be > 0"));
    }
    let mut steps: Vec<Step> = (table_step..=chain_length)
        .step_by(table_step)
        .map(|pulls| pulls - 1)
        .collect();
    if chain_length > 0 && steps.last() != Some(&(chain_length - 1)) {
        steps.push(chain_length - 1);
    }
    Ok(steps)
}

/// Render the three tables (exactly / at least / average) for every target.
pub fn render_analysis(analysis: &WishAnalysis, table_step: usize) -> SimResult<String> {
    let steps = bucket_steps(analysis.chain_length, table_step)?;
    let mut out = String::new();
    for target in &analysis.targets {
        push_target_tables(&mut out, target, &steps, analysis.confidence)
            .map_err(|e| anyhow::anyhow!("formatting {} tables: {e}", target.outcome.name()))?;
    }
    Ok(out)
}

fn push_target_tables(
    out: &mut String,
    target: &TargetCurves,
    steps: &[Step],
    confidence: f64,
) -> fmt::Result {
    let name = target.outcome.name();
    let curves = &target.curves;
    push_probability_table(out, &format!("{name} - P(exactly)"), curves, steps, |k, t| {
        curves.exact[k][t]
    })?;
    push_probability_table(out, &format!("{name} - P(at least)"), curves, steps, |k, t| {
        curves.at_least[k][t]
    })?;
    push_average_table(out, name, curves, steps, confidence)
}

fn push_probability_table(
    out: &mut String,
    title: &str,
    curves: &CopyCurves,
    steps: &[Step],
    value: impl Fn(usize, Step) -> f64,
) -> fmt::Result {
    writeln!(out, "=== {title} ===")?;
    write!(out, "{:>7}", "pulls")?;
    for copies in 1..=curves.max_copies {
        write!(out, " {:>7}", CopyCurves::label(copies))?;
    }
    out.push('\n');
    for &t in steps {
        write!(out, "{:>7}", t + 1)?;
        for k in 0..curves.max_copies as usize {
            write!(out, " {:>6.2}%", 100.0 * value(k, t))?;
        }
        out.push('\n');
    }
    out.push('\n');
    Ok(())
}

fn push_average_table(
    out: &mut String,
    name: &str,
    curves: &CopyCurves,
    steps: &[Step],
    confidence: f64,
) -> fmt::Result {
    writeln!(out, "=== {name} - average copies ===")?;
    writeln!(
        out,
        "{:>7} {:>8} {:>7} {:>7}",
        "pulls",
        "mean",
        "lower",
        "upper"
    )?;
    for &t in steps {
        writeln!(
            out,
            "{:>7} {:>8.3} {:>7} {:>7}",
            t + 1,
            curves.mean[t],
            curves.band.lower[t],
            curves.band.upper[t]
        )?;
    }
    writeln!(out, "(band covers >= {:.1}% of trials)", 100.0 * confidence)?;
    out.push('\n');
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::WishConfig, simulator::simulate};

    #[test]
    fn buckets_include_final_pull() {
        assert_eq!(bucket_steps(10, 3).unwrap(), vec![2, 5, 8, 9]);
        assert_eq!(bucket_steps(9, 3).unwrap(), vec![2, 5, 8]);
        assert_eq!(bucket_steps(2, 5).unwrap(), vec![1]);
    }

    #[test]
    fn zero_table_step_rejected() {
        assert!(bucket_steps(10, 0).is_err());
    }

    #[test]
    fn render_lists_every_target_and_level() {
        let config = WishConfig::default();
        let loot = simulate(200, 20, &config, 3).unwrap();
        let analysis = WishAnalysis::from_loot(&loot, &config, 3, 0.9).unwrap();
        let text = render_analysis(&analysis, 10).unwrap();
        assert!(text.contains("=== five_banner - P(at least) ==="));
        assert!(text.contains("=== four_banner_wanted - average copies ==="));
        assert!(text.contains("C2"));
        assert!(!text.contains("C3"));
    }
}
