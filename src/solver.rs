//! Auto-balance: the activity that drives one resource's net rate to zero.
//!
//! For a flow `f` owned by process `p` on resource `r`:
//!
//! ```text
//! other = net rate of r from flows not owned by p
//! gain  = Σ sign * p.speed * base_rate over p's flows on r
//! a*    = -other / gain
//! ```
//!
//! When `f` is the owner's only flow on `r`, `gain` is `f`'s own gain and `other`
//! is `net_rate(r) - contribution(f)`. The result is clamped to `[0, capacity]`
//! and the clamp is reported alongside the value.

use crate::balance::NetRateEngine;
use crate::error::{SolveError, UnsolvableReason};
use crate::graph::{FlowId, Graph};

/// Which bound the solved activity was pulled back to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Clamp {
    /// Balancing would need negative activity.
    BelowZero,
    /// Balancing would need more units than are placed.
    AboveCapacity,
}

/// A solved activity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Solution {
    /// Activity to apply, within `[0, capacity]`.
    pub value: f64,
    /// Activity before clamping.
    pub raw: f64,
    pub clamp: Option<Clamp>,
}

impl Solution {
    pub fn is_clamped(&self) -> bool {
        self.clamp.is_some()
    }
}

/// Pure query over a graph snapshot; never mutates.
pub struct Solver<'g> {
    graph: &'g Graph,
}

impl<'g> Solver<'g> {
    pub fn new(graph: &'g Graph) -> Self {
        Self { graph }
    }

    pub fn solve(&self, id: FlowId) -> Result<Solution, SolveError> {
        let flow = self.graph.require_flow(id)?;
        let owner_id = flow.owner();
        let owner = self.graph.require_process(owner_id)?;
        let unsolvable = |reason| SolveError::Unsolvable { flow: id, reason };

        let own_gain = flow.gain(owner);
        if own_gain == 0.0 || !own_gain.is_finite() {
            return Err(unsolvable(UnsolvableReason::ZeroGain));
        }

        // Sibling flows of the same owner on this resource scale with the
        // solved activity too, so they belong to the gain, not to `other`.
        let resource = self.graph.require_resource(flow.resource())?;
        let mut gain = 0.0;
        for sibling in resource.incident_flows() {
            let sibling = self.graph.require_flow(*sibling)?;
            if sibling.owner() == owner_id {
                gain += sibling.gain(owner);
            }
        }
        if gain == 0.0 {
            return Err(unsolvable(UnsolvableReason::CancellingFlows));
        }

        let other = NetRateEngine::new(self.graph)
            .net_rate_excluding_process(flow.resource(), owner_id)?;
        // Adding 0.0 turns -0.0 into 0.0.
        let raw = -other / gain + 0.0;
        if !raw.is_finite() {
            return Err(unsolvable(UnsolvableReason::NonFinite));
        }

        let capacity = owner.capacity();
        let solution = if raw < 0.0 {
            Solution {
                value: 0.0,
                raw,
                clamp: Some(Clamp::BelowZero),
            }
        } else if raw > capacity {
            Solution {
                value: capacity,
                raw,
                clamp: Some(Clamp::AboveCapacity),
            }
        } else {
            Solution {
                value: raw,
                raw,
                clamp: None,
            }
        };

        log::debug!(
            "solved {} for {}: other = {}, gain = {}, activity = {}",
            id,
            owner_id,
            other,
            gain,
            solution.value
        );
        Ok(solution)
    }
}

impl Graph {
    /// Computes the activity of `flow`'s owner that balances `flow`'s resource.
    pub fn solve_activity(&self, flow: FlowId) -> Result<Solution, SolveError> {
        Solver::new(self).solve(flow)
    }

    /// Solves `flow` and writes the result into its owner's activity.
    ///
    /// Clamped solutions are applied as well; the returned [`Solution`] tells
    /// the caller whether balance was actually reached.
    pub fn auto_balance(&mut self, flow: FlowId) -> Result<Solution, SolveError> {
        let solution = self.solve_activity(flow)?;
        let owner = self.require_flow(flow)?.owner();
        if let Some(clamp) = solution.clamp {
            log::warn!(
                "{} cannot fully balance its resource: needs activity {}, applied {} ({:?})",
                flow,
                solution.raw,
                solution.value,
                clamp
            );
        }
        self.write_activity(owner, solution.value)?;
        Ok(solution)
    }
}
