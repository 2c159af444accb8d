//! Reads teams back out of a solved [`TeamModel`].

use super::model::TeamModel;
use crate::ilp::IlpSolution;
use crate::roster::{Member, Team, Weapon, TEAM_SIZE};

/// Values above this count as selected.
const SELECTION_THRESHOLD: f64 = 0.5;

/// Builds one [`Team`] per model team, numbered from `first_number`.
///
/// Every `(team, weapon)` slot must hold exactly one competitor and every
/// competitor must hold exactly one slot; anything else is reported as an
/// error string describing the first violation.
pub fn extract_teams(
    tm: &TeamModel<'_>,
    solution: &IlpSolution,
    first_number: usize,
) -> Result<Vec<Team>, String> {
    let batch = tm.batch();
    if solution.values.len() < tm.model().var_count() {
        return Err(format!(
            "expected {} values, got {}",
            tm.model().var_count(),
            solution.values.len()
        ));
    }

    let mut slots_held = vec![0usize; batch.len()];
    let mut teams = Vec::with_capacity(tm.team_count());

    for t in 0..tm.team_count() {
        let mut mains = Vec::with_capacity(TEAM_SIZE);
        for w in Weapon::ALL {
            let selected: Vec<usize> = (0..batch.len())
                .filter(|&i| solution.value(tm.var(i, t, w)) > SELECTION_THRESHOLD)
                .collect();
            let &[i] = selected.as_slice() else {
                return Err(format!(
                    "team {} {w}: {} competitors selected",
                    first_number + t,
                    selected.len()
                ));
            };
            slots_held[i] += 1;
            mains.push(Member::from_competitor(batch[i], w));
        }

        let mains: [Member; TEAM_SIZE] = mains
            .try_into()
            .map_err(|_| format!("team {} is incomplete", first_number + t))?;
        let team = Team::new(first_number + t, mains)
            .ok_or_else(|| format!("team {} repeats a weapon", first_number + t))?;
        teams.push(team);
    }

    if let Some(i) = slots_held.iter().position(|&held| held != 1) {
        return Err(format!(
            "competitor '{}' holds {} slots",
            batch[i].name, slots_held[i]
        ));
    }
    Ok(teams)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assign::ModelOptions;
    use crate::ilp::{IlpSolver, MicroLpSolver, SolverConfig, SolverStatus};
    use crate::roster::{Category, Competitor, Preferences};

    fn roster() -> Vec<Competitor> {
        vec![
            Competitor::new("a1", Category::A, Preferences::new(3, 2, 1)),
            Competitor::new("a2", Category::A, Preferences::new(1, 3, 2)),
            Competitor::new("a3", Category::A, Preferences::new(2, 1, 3)),
            Competitor::new("b1", Category::B, Preferences::new(3, 1, 2)),
            Competitor::new("b2", Category::B, Preferences::new(1, 2, 3)),
            Competitor::new("b3", Category::B, Preferences::new(2, 3, 1)),
        ]
    }

    fn options() -> ModelOptions {
        ModelOptions::default()
    }

    fn solution_from(values: Vec<f64>) -> IlpSolution {
        IlpSolution {
            status: SolverStatus::Optimal,
            objective_value: None,
            values,
            message: None,
            solve_time_ms: 0,
        }
    }

    #[test]
    fn test_extract_from_hint() {
        let roster = roster();
        let batch: Vec<&Competitor> = roster.iter().collect();
        let tm = TeamModel::build("six", &batch, &options()).unwrap();
        let hint = tm.model().hint.clone().unwrap();

        let teams = extract_teams(&tm, &solution_from(hint), 1).unwrap();
        assert_eq!(teams.len(), 2);
        assert_eq!(teams[0].number, 1);
        assert_eq!(teams[1].number, 2);
        for team in &teams {
            assert!(team.category_b_count() >= 1);
            assert!(team.category_b_count() <= 2);
        }
    }

    #[test]
    fn test_extract_from_solver() {
        let roster = roster();
        let batch: Vec<&Competitor> = roster.iter().collect();
        let tm = TeamModel::build("six", &batch, &options()).unwrap();
        let solution = MicroLpSolver::new().solve(tm.model(), &SolverConfig::default());
        assert!(solution.is_solution_found());

        let teams = extract_teams(&tm, &solution, 4).unwrap();
        assert_eq!(teams[0].number, 4);
        // Every competitor can have its favorite weapon here.
        let total: i64 = teams.iter().map(Team::total_score).sum();
        assert_eq!(total, 18);
    }

    #[test]
    fn test_rejects_empty_slot() {
        let roster = roster();
        let batch: Vec<&Competitor> = roster.iter().collect();
        let tm = TeamModel::build("six", &batch, &options()).unwrap();
        let values = vec![0.0; tm.model().var_count()];

        let err = extract_teams(&tm, &solution_from(values), 1).unwrap_err();
        assert!(err.contains("0 competitors selected"));
    }

    #[test]
    fn test_rejects_double_booking() {
        let roster = roster();
        let batch: Vec<&Competitor> = roster.iter().collect();
        let tm = TeamModel::build("six", &batch, &options()).unwrap();

        let mut values = vec![0.0; tm.model().var_count()];
        // a1 fills every slot of both teams.
        for t in 0..2 {
            for w in Weapon::ALL {
                values[tm.var(0, t, w).index()] = 1.0;
            }
        }
        let err = extract_teams(&tm, &solution_from(values), 1).unwrap_err();
        assert!(err.contains("a1"));
    }

    #[test]
    fn test_rejects_short_value_vector() {
        let roster = roster();
        let batch: Vec<&Competitor> = roster.iter().collect();
        let tm = TeamModel::build("six", &batch, &options()).unwrap();

        assert!(extract_teams(&tm, &solution_from(vec![1.0; 3]), 1).is_err());
    }
}
