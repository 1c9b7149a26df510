use jiff::Timestamp;
use tracing::{debug, trace};

use crate::problem::{
    assignment_problem::AssignmentProblem,
    cost_matrix::CostMatrix,
    incident::IncidentIdx,
    team::TeamIdx,
};

/// Tolerance for incumbent comparisons. Two objective values closer than
/// this are the same assignment cost as far as the search is concerned.
const IMPROVEMENT_EPS: f64 = 1e-9;

/// The wall clock is only consulted once per this many nodes.
const DEADLINE_CHECK_MASK: u64 = 0x3ff;

pub(crate) struct SearchOutcome {
    /// Best feasible assignment found, one team per incident, indexed by
    /// incident. `None` when no feasible assignment was encountered.
    pub assignment: Option<Vec<TeamIdx>>,
    pub cost: f64,
    /// Whether the search space was exhausted. Only an exhausted search
    /// proves the incumbent minimal.
    pub proven: bool,
}

/// Exact depth-first branch-and-bound over the binary team-incident
/// decisions. A greedy feasible incumbent is built first so every branch is
/// pruned against a real upper bound from the start.
pub(crate) struct BranchAndBound<'a> {
    costs: &'a CostMatrix,
    num_teams: usize,
    num_incidents: usize,
    remaining: Vec<usize>,
    order: Vec<IncidentIdx>,
    choice: Vec<TeamIdx>,
    best: Option<Vec<TeamIdx>>,
    best_cost: f64,
    deadline: Option<Timestamp>,
    expired: bool,
    nodes: u64,
}

impl<'a> BranchAndBound<'a> {
    pub fn new(problem: &'a AssignmentProblem, deadline: Option<Timestamp>) -> Self {
        let num_incidents = problem.num_incidents();

        BranchAndBound {
            costs: problem.costs(),
            num_teams: problem.num_teams(),
            num_incidents,
            remaining: problem.teams().iter().map(|team| team.capacity()).collect(),
            order: branch_order(problem.costs()),
            choice: vec![TeamIdx::default(); num_incidents],
            best: None,
            best_cost: f64::INFINITY,
            deadline,
            expired: false,
            nodes: 0,
        }
    }

    pub fn run(mut self) -> SearchOutcome {
        if let Some((assignment, cost)) = self.greedy_incumbent() {
            self.best_cost = cost;
            self.best = Some(assignment);
            self.descend(0, 0.0);
        }

        debug!(
            nodes = self.nodes,
            cost = self.best_cost,
            proven = !self.expired,
            "branch-and-bound finished"
        );

        SearchOutcome {
            assignment: self.best.take(),
            cost: self.best_cost,
            proven: !self.expired,
        }
    }

    /// Cheapest available team per incident, in branch order. Succeeds
    /// whenever total capacity covers the incident count, since every team
    /// can serve every incident.
    fn greedy_incumbent(&self) -> Option<(Vec<TeamIdx>, f64)> {
        let mut remaining = self.remaining.clone();
        let mut assignment = vec![TeamIdx::default(); self.num_incidents];
        let mut cost = 0.0;

        for &incident in &self.order {
            let mut cheapest: Option<TeamIdx> = None;

            for team in (0..self.num_teams).map(TeamIdx::new) {
                if remaining[team.get()] == 0 {
                    continue;
                }

                let better = match cheapest {
                    Some(current) => {
                        self.costs.cost(team, incident) < self.costs.cost(current, incident)
                    }
                    None => true,
                };
                if better {
                    cheapest = Some(team);
                }
            }

            let team = cheapest?;
            remaining[team.get()] -= 1;
            cost += self.costs.cost(team, incident);
            assignment[incident.get()] = team;
        }

        Some((assignment, cost))
    }

    fn descend(&mut self, depth: usize, cost_so_far: f64) {
        if self.expired {
            return;
        }
        if self.nodes & DEADLINE_CHECK_MASK == 0
            && let Some(deadline) = self.deadline
            && Timestamp::now() > deadline
        {
            self.expired = true;
            return;
        }
        self.nodes += 1;

        if depth == self.num_incidents {
            if cost_so_far + IMPROVEMENT_EPS < self.best_cost {
                self.best_cost = cost_so_far;
                self.best = Some(self.assignment_by_incident());
                trace!(cost = cost_so_far, "new incumbent");
            }
            return;
        }

        match self.lower_bound(depth, cost_so_far) {
            Some(bound) if bound + IMPROVEMENT_EPS < self.best_cost => {}
            _ => return,
        }

        let incident = self.order[depth];
        for team in (0..self.num_teams).map(TeamIdx::new) {
            if self.remaining[team.get()] == 0 {
                continue;
            }

            self.remaining[team.get()] -= 1;
            self.choice[depth] = team;
            self.descend(depth + 1, cost_so_far + self.costs.cost(team, incident));
            self.remaining[team.get()] += 1;
        }
    }

    /// Relaxation: each unassigned incident takes its cheapest team with
    /// capacity left, ignoring that those choices compete for slots. `None`
    /// means the branch cannot be completed at all.
    fn lower_bound(&self, depth: usize, cost_so_far: f64) -> Option<f64> {
        let open: usize = self.remaining.iter().sum();
        if open < self.num_incidents - depth {
            return None;
        }

        let mut bound = cost_so_far;
        for position in depth..self.num_incidents {
            let incident = self.order[position];
            let mut cheapest = f64::INFINITY;

            for team in (0..self.num_teams).map(TeamIdx::new) {
                if self.remaining[team.get()] == 0 {
                    continue;
                }
                cheapest = cheapest.min(self.costs.cost(team, incident));
            }

            if cheapest.is_infinite() {
                return None;
            }
            bound += cheapest;
        }

        Some(bound)
    }

    fn assignment_by_incident(&self) -> Vec<TeamIdx> {
        let mut assignment = vec![TeamIdx::default(); self.num_incidents];
        for (position, &incident) in self.order.iter().enumerate() {
            assignment[incident.get()] = self.choice[position];
        }
        assignment
    }
}

/// Incidents with the largest gap between their two cheapest teams are
/// branched first; misplacing those costs the most, so the bound tightens
/// early. Ties keep input order, making the exploration deterministic for
/// identical inputs.
fn branch_order(costs: &CostMatrix) -> Vec<IncidentIdx> {
    let mut regrets: Vec<f64> = Vec::with_capacity(costs.num_incidents());

    for incident in (0..costs.num_incidents()).map(IncidentIdx::new) {
        let mut cheapest = f64::INFINITY;
        let mut second = f64::INFINITY;

        for team in (0..costs.num_teams()).map(TeamIdx::new) {
            let cost = costs.cost(team, incident);
            if cost < cheapest {
                second = cheapest;
                cheapest = cost;
            } else if cost < second {
                second = cost;
            }
        }

        regrets.push(if second.is_finite() { second - cheapest } else { 0.0 });
    }

    let mut order: Vec<IncidentIdx> = (0..costs.num_incidents()).map(IncidentIdx::new).collect();
    order.sort_by(|a, b| regrets[b.get()].total_cmp(&regrets[a.get()]).then(a.cmp(b)));
    order
}
