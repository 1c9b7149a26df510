use jiff::{SignedDuration, Timestamp};
use tracing::debug;

use crate::problem::assignment_problem::AssignmentProblem;

use super::{branch_and_bound::BranchAndBound, solution::Solution};

#[derive(Debug, Clone, Copy, Default)]
pub struct SolverParams {
    /// Wall-clock budget for the search. When it expires, the best feasible
    /// assignment found so far is returned with
    /// [`SolveStatus::TimedOut`](super::solution::SolveStatus::TimedOut);
    /// `Optimal` is only ever reported for a completed search.
    pub deadline: Option<SignedDuration>,
}

/// Owns one problem instance and its search state; nothing is shared across
/// solves and nothing persists between calls.
pub struct Solver {
    problem: AssignmentProblem,
    params: SolverParams,
}

impl Solver {
    pub fn new(problem: AssignmentProblem) -> Self {
        Solver::with_params(problem, SolverParams::default())
    }

    pub fn with_params(problem: AssignmentProblem, params: SolverParams) -> Self {
        Solver { problem, params }
    }

    pub fn problem(&self) -> &AssignmentProblem {
        &self.problem
    }

    /// Blocks for the duration of the search. Callers needing responsiveness
    /// run this on a worker of their own; the solver itself is synchronous.
    pub fn solve(&self) -> Solution {
        let num_incidents = self.problem.num_incidents();

        if num_incidents == 0 {
            return Solution::trivial();
        }

        // Every team can reach every incident, so infeasibility reduces to a
        // capacity-sum shortfall and needs no search.
        if self.problem.total_capacity() < num_incidents {
            debug!(
                total_capacity = self.problem.total_capacity(),
                num_incidents, "capacity shortfall, skipping search"
            );
            return Solution::infeasible();
        }

        let deadline = self.params.deadline.map(|budget| Timestamp::now() + budget);
        let outcome = BranchAndBound::new(&self.problem, deadline).run();

        Solution::from_search(&self.problem, outcome)
    }
}
