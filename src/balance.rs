//! Net-rate aggregation.
//!
//! Every query walks the incident flows of the resource it is asked about and
//! sums their contributions. Nothing is cached, so results always reflect the
//! graph as it is at the time of the call.

use crate::error::GraphError;
use crate::graph::{FlowId, Graph, ProcessId, ResourceId};
use serde::Serialize;

/// How far a resource is from balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RateStatus {
    /// Exactly zero.
    Balanced,
    /// Within the graph's balance tolerance of zero.
    NearlyBalanced,
    /// More produced than consumed.
    Surplus,
    /// More consumed than produced.
    Deficit,
}

impl RateStatus {
    pub fn classify(rate: f64, tolerance: f64) -> Self {
        if rate == 0.0 {
            RateStatus::Balanced
        } else if rate.abs() < tolerance {
            RateStatus::NearlyBalanced
        } else if rate > 0.0 {
            RateStatus::Surplus
        } else {
            RateStatus::Deficit
        }
    }

    pub fn is_balanced(self) -> bool {
        matches!(self, RateStatus::Balanced | RateStatus::NearlyBalanced)
    }
}

/// Net rate of one resource at the time of the report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceBalance {
    pub resource: ResourceId,
    pub label: String,
    pub net_rate: f64,
    pub status: RateStatus,
}

/// Net rates of every resource, ordered by resource id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BalanceReport {
    pub resources: Vec<ResourceBalance>,
}

impl BalanceReport {
    pub fn get(&self, id: ResourceId) -> Option<&ResourceBalance> {
        self.resources.iter().find(|entry| entry.resource == id)
    }

    /// Resources that are neither exactly nor nearly balanced.
    pub fn unbalanced(&self) -> impl Iterator<Item = &ResourceBalance> {
        self.resources.iter().filter(|entry| !entry.status.is_balanced())
    }

    pub fn is_balanced(&self) -> bool {
        self.unbalanced().next().is_none()
    }
}

/// Read-only aggregation over one graph snapshot.
pub struct NetRateEngine<'g> {
    graph: &'g Graph,
}

impl<'g> NetRateEngine<'g> {
    pub fn new(graph: &'g Graph) -> Self {
        Self { graph }
    }

    /// Signed contribution of one flow to its resource.
    pub fn contribution(&self, id: FlowId) -> Result<f64, GraphError> {
        let flow = self.graph.require_flow(id)?;
        let owner = self.graph.require_process(flow.owner())?;
        Ok(flow.contribution(owner))
    }

    /// Sum of all incident flow contributions; `0` with no incident flows.
    pub fn net_rate(&self, id: ResourceId) -> Result<f64, GraphError> {
        self.sum_where(id, |_| true)
    }

    /// Net rate counting only flows not owned by `process`.
    pub fn net_rate_excluding_process(
        &self,
        id: ResourceId,
        process: ProcessId,
    ) -> Result<f64, GraphError> {
        self.sum_where(id, |owner| owner != process)
    }

    fn sum_where<F>(&self, id: ResourceId, include_owner: F) -> Result<f64, GraphError>
    where
        F: Fn(ProcessId) -> bool,
    {
        let resource = self.graph.require_resource(id)?;
        let mut total = 0.0;
        for flow_id in resource.incident_flows() {
            let flow = self.graph.require_flow(*flow_id)?;
            if !include_owner(flow.owner()) {
                continue;
            }
            let owner = self.graph.require_process(flow.owner())?;
            total += flow.contribution(owner);
        }
        Ok(total)
    }

    pub fn report(&self) -> BalanceReport {
        let tolerance = self.graph.settings().balance_tolerance;
        let resources = self
            .graph
            .resources()
            .filter_map(|(id, resource)| {
                // Incidence lists only reference live flows, so this cannot fail
                // on a graph built through its own mutators.
                let net_rate = self.net_rate(id).ok()?;
                Some(ResourceBalance {
                    resource: id,
                    label: resource.label().to_string(),
                    net_rate,
                    status: RateStatus::classify(net_rate, tolerance),
                })
            })
            .collect();
        BalanceReport { resources }
    }

    /// Processes whose explicit activity exceeds their capacity, ordered by id.
    pub fn over_capacity(&self) -> Vec<ProcessId> {
        self.graph
            .processes()
            .filter(|(_, p)| p.is_over_capacity())
            .map(|(id, _)| id)
            .collect()
    }
}

impl Graph {
    pub fn contribution(&self, flow: FlowId) -> Result<f64, GraphError> {
        NetRateEngine::new(self).contribution(flow)
    }

    pub fn net_rate(&self, resource: ResourceId) -> Result<f64, GraphError> {
        NetRateEngine::new(self).net_rate(resource)
    }

    pub fn balance_report(&self) -> BalanceReport {
        NetRateEngine::new(self).report()
    }

    pub fn over_capacity(&self) -> Vec<ProcessId> {
        NetRateEngine::new(self).over_capacity()
    }
}
