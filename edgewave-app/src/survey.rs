//! Many independent solves in parallel, summarised.

use crate::error::AppError;
use edgewave_core::{SelectionStrategy, SolveStatus, Solver, SolverError, TileSet};
use rayon::prelude::*;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

/// Outcome of one surveyed solve.
#[derive(Debug, Clone, Serialize)]
pub struct SurveyRun {
    pub seed: u64,
    pub resolved: bool,
    pub steps: u64,
    pub resolved_cells: usize,
    /// `x,y` of the contradiction, empty when resolved.
    pub contradiction_at: String,
    pub elapsed_ms: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SurveySummary {
    pub runs: usize,
    pub resolved: usize,
    pub contradictions: usize,
    pub mean_steps: Option<f64>,
    pub median_steps: Option<f64>,
    pub stddev_steps: Option<f64>,
    pub mean_time_ms: Option<f64>,
}

impl SurveySummary {
    pub fn success_rate(&self) -> f64 {
        if self.runs == 0 {
            return 0.0;
        }
        self.resolved as f64 / self.runs as f64 * 100.0
    }
}

fn calculate_mean(data: &[f64]) -> Option<f64> {
    if data.is_empty() {
        return None;
    }
    Some(data.iter().sum::<f64>() / data.len() as f64)
}

fn calculate_median(data: &mut [f64]) -> Option<f64> {
    if data.is_empty() {
        return None;
    }
    data.sort_unstable_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = data.len() / 2;
    if data.len() % 2 == 0 {
        Some((data[mid - 1] + data[mid]) / 2.0)
    } else {
        Some(data[mid])
    }
}

fn calculate_std_dev(data: &[f64], mean: f64) -> Option<f64> {
    let n = data.len();
    if n < 2 {
        return None;
    }
    let variance = data
        .iter()
        .map(|value| {
            let diff = mean - value;
            diff * diff
        })
        .sum::<f64>()
        / (n - 1) as f64;
    Some(variance.sqrt())
}

fn solve_one(
    tileset: &Arc<TileSet>,
    width: usize,
    height: usize,
    selection: SelectionStrategy,
    seed: u64,
) -> Result<SurveyRun, SolverError> {
    let start = Instant::now();
    let mut solver = Solver::builder(tileset.clone(), width, height)
        .seed(seed)
        .selection_strategy(selection)
        .build()?;
    let status = solver.run()?;
    let contradiction_at = match status {
        SolveStatus::Contradiction { at } => format!("{},{}", at.x, at.y),
        _ => String::new(),
    };
    Ok(SurveyRun {
        seed,
        resolved: status == SolveStatus::Resolved,
        steps: solver.steps(),
        resolved_cells: solver.grid().resolved_count(),
        contradiction_at,
        elapsed_ms: start.elapsed().as_secs_f64() * 1000.0,
    })
}

/// Solves seeds `base_seed..base_seed + runs` in parallel, single attempt each.
///
/// Runs come back in seed order.
pub fn run_survey(
    tileset: &Arc<TileSet>,
    width: usize,
    height: usize,
    selection: SelectionStrategy,
    base_seed: u64,
    runs: usize,
) -> Result<Vec<SurveyRun>, SolverError> {
    log::info!("Surveying {runs} seeds from {base_seed} on a {width}x{height} grid");
    (0..runs as u64)
        .into_par_iter()
        .map(|offset| solve_one(tileset, width, height, selection, base_seed.wrapping_add(offset)))
        .collect()
}

pub fn summarize(runs: &[SurveyRun]) -> SurveySummary {
    let resolved = runs.iter().filter(|run| run.resolved).count();
    let steps: Vec<f64> = runs.iter().map(|run| run.steps as f64).collect();
    let times: Vec<f64> = runs.iter().map(|run| run.elapsed_ms).collect();
    let mean_steps = calculate_mean(&steps);
    let mut sorted_steps = steps.clone();
    SurveySummary {
        runs: runs.len(),
        resolved,
        contradictions: runs.len() - resolved,
        mean_steps,
        median_steps: calculate_median(&mut sorted_steps),
        stddev_steps: mean_steps.and_then(|mean| calculate_std_dev(&steps, mean)),
        mean_time_ms: calculate_mean(&times),
    }
}

pub fn print_summary(summary: &SurveySummary) {
    let fmt = |value: Option<f64>| value.map_or_else(|| "N/A".to_string(), |v| format!("{v:.2}"));
    println!("\n--- Survey Summary ---");
    println!("Runs          | {}", summary.runs);
    println!(
        "Resolved      | {} ({:.1}%)",
        summary.resolved,
        summary.success_rate()
    );
    println!("Contradictions| {}", summary.contradictions);
    println!("Mean steps    | {}", fmt(summary.mean_steps));
    println!("Median steps  | {}", fmt(summary.median_steps));
    println!("Std dev steps | {}", fmt(summary.stddev_steps));
    println!("Mean time (ms)| {}", fmt(summary.mean_time_ms));
    println!("----------------------");
}

pub fn write_runs_csv(runs: &[SurveyRun], path: &Path) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_path(path)?;
    for run in runs {
        writer.serialize(run)?;
    }
    writer.flush()?;
    log::info!("Survey results successfully written to {:?}", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use edgewave_core::{Edges, Tile};

    fn run(seed: u64, resolved: bool, steps: u64) -> SurveyRun {
        SurveyRun {
            seed,
            resolved,
            steps,
            resolved_cells: 0,
            contradiction_at: String::new(),
            elapsed_ms: 1.0,
        }
    }

    #[test]
    fn test_statistics() {
        assert_eq!(calculate_median(&mut [3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(calculate_median(&mut [4.0, 1.0, 2.0, 3.0]), Some(2.5));
        assert_eq!(calculate_median(&mut []), None);
        assert_eq!(calculate_std_dev(&[1.0], 1.0), None);
        let sd = calculate_std_dev(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0], 5.0).unwrap();
        assert!((sd - 2.138).abs() < 0.01);
    }

    #[test]
    fn test_summarize() {
        let runs = vec![run(0, true, 4), run(1, false, 2), run(2, true, 6)];
        let summary = summarize(&runs);
        assert_eq!(summary.runs, 3);
        assert_eq!(summary.resolved, 2);
        assert_eq!(summary.contradictions, 1);
        assert_eq!(summary.mean_steps, Some(4.0));
        assert_eq!(summary.median_steps, Some(4.0));
    }

    #[test]
    fn test_run_survey_in_seed_order() {
        let tileset = Arc::new(
            TileSet::new(vec![
                Tile::new("a", Edges::uniform("g")),
                Tile::new("b", Edges::uniform("g")),
            ])
            .unwrap(),
        );
        let runs = run_survey(&tileset, 3, 3, SelectionStrategy::RandomLowest, 10, 8).unwrap();
        let seeds: Vec<u64> = runs.iter().map(|run| run.seed).collect();
        assert_eq!(seeds, (10..18).collect::<Vec<_>>());
        assert!(runs.iter().all(|run| run.resolved && run.steps == 9));
    }

    #[test]
    fn test_write_runs_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("survey.csv");
        write_runs_csv(&[run(5, true, 3)], &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("seed,resolved,steps,resolved_cells,contradiction_at,elapsed_ms\n"));
        assert!(text.contains("5,true,3,0,,1.0"));
    }
}
