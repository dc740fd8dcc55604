//! The production graph: an arena of processes, resources and the flows between them.
//!
//! Entities are addressed by stable ids. Flows hold ids of both endpoints, and
//! both endpoints keep the ids of their flows, so aggregation only touches the
//! flows incident to one resource. All mutators take `&mut self` and leave the
//! graph consistent before returning, whether they succeed or fail.

use crate::config::{ExpressionLimits, Settings};
use crate::error::{ConfigError, GraphError};
use crate::evaluator::Evaluator;
use ahash::AHashMap;
use itertools::Itertools;

mod ids;
mod model;

pub use ids::{FlowId, ProcessId, ResourceId};
pub use model::*;

use ids::IdCounter;

/// A production graph together with the settings its fields are evaluated under.
pub struct Graph {
    settings: Settings,
    evaluator: Evaluator,
    default_capacity: Field,
    default_speed: Field,
    pub(crate) processes: AHashMap<ProcessId, Process>,
    pub(crate) resources: AHashMap<ResourceId, Resource>,
    pub(crate) flows: AHashMap<FlowId, Flow>,
    process_ids: IdCounter,
    resource_ids: IdCounter,
    flow_ids: IdCounter,
}

/// Configures a [`Graph`] before any entity is added.
pub struct GraphBuilder {
    settings: Settings,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self {
            settings: Settings::default(),
        }
    }

    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.settings.balance_tolerance = tolerance;
        self
    }

    pub fn with_limits(mut self, limits: ExpressionLimits) -> Self {
        self.settings.expression = limits;
        self
    }

    pub fn with_default_capacity(mut self, expr: &str) -> Self {
        self.settings.default_capacity = expr.to_string();
        self
    }

    pub fn with_default_speed(mut self, expr: &str) -> Self {
        self.settings.default_speed = expr.to_string();
        self
    }

    pub fn build(self) -> Result<Graph, ConfigError> {
        self.settings.validate()?;
        let evaluator = Evaluator::new(self.settings.expression);
        let commit = |name: &'static str, expr: &str| {
            Field::commit(&evaluator, expr).map_err(|e| ConfigError::Invalid {
                name,
                message: e.to_string(),
            })
        };
        let default_capacity = commit("default_capacity", &self.settings.default_capacity)?;
        let default_speed = commit("default_speed", &self.settings.default_speed)?;
        Ok(Graph::from_parts(
            self.settings,
            default_capacity,
            default_speed,
        ))
    }
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}

impl Graph {
    /// An empty graph with default settings.
    pub fn new() -> Self {
        Self::from_parts(
            Settings::default(),
            Field::from_value(1.0),
            Field::from_value(1.0),
        )
    }

    fn from_parts(settings: Settings, default_capacity: Field, default_speed: Field) -> Self {
        Graph {
            evaluator: Evaluator::new(settings.expression),
            settings,
            default_capacity,
            default_speed,
            processes: AHashMap::new(),
            resources: AHashMap::new(),
            flows: AHashMap::new(),
            process_ids: IdCounter::default(),
            resource_ids: IdCounter::default(),
            flow_ids: IdCounter::default(),
        }
    }

    pub fn builder() -> GraphBuilder {
        GraphBuilder::new()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The evaluator used for every field of this graph.
    pub fn evaluator(&self) -> &Evaluator {
        &self.evaluator
    }

    // --- Lookups ---

    pub fn process(&self, id: ProcessId) -> Option<&Process> {
        self.processes.get(&id)
    }

    pub fn resource(&self, id: ResourceId) -> Option<&Resource> {
        self.resources.get(&id)
    }

    pub fn flow(&self, id: FlowId) -> Option<&Flow> {
        self.flows.get(&id)
    }

    pub(crate) fn require_process(&self, id: ProcessId) -> Result<&Process, GraphError> {
        self.processes.get(&id).ok_or(GraphError::UnknownProcess(id))
    }

    pub(crate) fn require_resource(&self, id: ResourceId) -> Result<&Resource, GraphError> {
        self.resources.get(&id).ok_or(GraphError::UnknownResource(id))
    }

    pub(crate) fn require_flow(&self, id: FlowId) -> Result<&Flow, GraphError> {
        self.flows.get(&id).ok_or(GraphError::UnknownFlow(id))
    }

    /// All processes, ordered by id.
    pub fn processes(&self) -> impl Iterator<Item = (ProcessId, &Process)> {
        self.processes
            .iter()
            .map(|(id, p)| (*id, p))
            .sorted_by_key(|(id, _)| *id)
    }

    /// All resources, ordered by id.
    pub fn resources(&self) -> impl Iterator<Item = (ResourceId, &Resource)> {
        self.resources
            .iter()
            .map(|(id, r)| (*id, r))
            .sorted_by_key(|(id, _)| *id)
    }

    /// All flows, ordered by id.
    pub fn flows(&self) -> impl Iterator<Item = (FlowId, &Flow)> {
        self.flows
            .iter()
            .map(|(id, f)| (*id, f))
            .sorted_by_key(|(id, _)| *id)
    }

    /// Flows between one process and one resource, in connection order.
    pub fn flows_between(
        &self,
        process: ProcessId,
        resource: ResourceId,
    ) -> Result<Vec<FlowId>, GraphError> {
        let process = self.require_process(process)?;
        self.require_resource(resource)?;
        Ok(process
            .flows
            .iter()
            .copied()
            .filter(|id| self.flows.get(id).is_some_and(|f| f.resource == resource))
            .collect())
    }

    /// True when the graph holds no processes and no resources.
    pub fn is_empty(&self) -> bool {
        self.processes.is_empty() && self.resources.is_empty()
    }

    // --- Structural edits ---

    /// Adds a process with the configured default capacity and speed and no
    /// explicit activity.
    pub fn add_process(&mut self, label: impl Into<String>) -> ProcessId {
        let id = ProcessId::new(self.process_ids.allocate());
        let process = Process::new(
            label.into(),
            self.default_capacity.clone(),
            self.default_speed.clone(),
        );
        log::debug!("added process {} '{}'", id, process.label);
        self.processes.insert(id, process);
        id
    }

    pub fn add_resource(&mut self, label: impl Into<String>) -> ResourceId {
        let id = ResourceId::new(self.resource_ids.allocate());
        let resource = Resource::new(label.into());
        log::debug!("added resource {} '{}'", id, resource.label);
        self.resources.insert(id, resource);
        id
    }

    /// Removes a process together with every flow it owns.
    ///
    /// The returned process still lists the ids of the flows that were deleted.
    pub fn remove_process(&mut self, id: ProcessId) -> Result<Process, GraphError> {
        let process = self
            .processes
            .remove(&id)
            .ok_or(GraphError::UnknownProcess(id))?;
        for flow_id in &process.flows {
            if let Some(flow) = self.flows.remove(flow_id) {
                if let Some(resource) = self.resources.get_mut(&flow.resource) {
                    resource.incident_flows.retain(|f| f != flow_id);
                }
            }
        }
        log::debug!(
            "removed process {} and {} flow(s)",
            id,
            process.flows.len()
        );
        Ok(process)
    }

    /// Removes a resource together with every flow touching it.
    ///
    /// The returned resource still lists the ids of the flows that were deleted.
    pub fn remove_resource(&mut self, id: ResourceId) -> Result<Resource, GraphError> {
        let resource = self
            .resources
            .remove(&id)
            .ok_or(GraphError::UnknownResource(id))?;
        for flow_id in &resource.incident_flows {
            if let Some(flow) = self.flows.remove(flow_id) {
                if let Some(owner) = self.processes.get_mut(&flow.owner) {
                    owner.flows.retain(|f| f != flow_id);
                }
            }
        }
        log::debug!(
            "removed resource {} and {} flow(s)",
            id,
            resource.incident_flows.len()
        );
        Ok(resource)
    }

    /// Connects a process to a resource. Nothing is created if the base rate
    /// expression is rejected.
    pub fn connect(
        &mut self,
        process: ProcessId,
        resource: ResourceId,
        direction: Direction,
        base_rate: &str,
    ) -> Result<FlowId, GraphError> {
        self.require_process(process)?;
        self.require_resource(resource)?;
        let base_rate = Field::commit(&self.evaluator, base_rate).map_err(|source| {
            GraphError::InvalidBaseRate {
                process,
                resource,
                source,
            }
        })?;

        let id = FlowId::new(self.flow_ids.allocate());
        self.flows.insert(
            id,
            Flow {
                owner: process,
                resource,
                direction,
                base_rate,
            },
        );
        if let Some(p) = self.processes.get_mut(&process) {
            p.flows.push(id);
        }
        if let Some(r) = self.resources.get_mut(&resource) {
            r.incident_flows.push(id);
        }
        log::debug!("connected {}: {} {} {}", id, process, direction, resource);
        Ok(id)
    }

    pub fn disconnect(&mut self, id: FlowId) -> Result<Flow, GraphError> {
        let flow = self.flows.remove(&id).ok_or(GraphError::UnknownFlow(id))?;
        if let Some(p) = self.processes.get_mut(&flow.owner) {
            p.flows.retain(|f| *f != id);
        }
        if let Some(r) = self.resources.get_mut(&flow.resource) {
            r.incident_flows.retain(|f| *f != id);
        }
        log::debug!("disconnected {}", id);
        Ok(flow)
    }

    // --- Field edits ---

    /// Re-evaluates one numeric field from expression text.
    ///
    /// On any error the field keeps its previous source and value. An empty
    /// activity expression clears the activity, so it follows capacity again.
    pub fn set_field(&mut self, field: FieldRef, expr: &str) -> Result<(), GraphError> {
        match field {
            FieldRef::Process(id, which) => {
                let evaluator = self.evaluator;
                let process = self
                    .processes
                    .get_mut(&id)
                    .ok_or(GraphError::UnknownProcess(id))?;

                if which == ProcessField::Activity && expr.trim().is_empty() {
                    process.activity = None;
                    log::debug!("cleared {}", field);
                    return Ok(());
                }

                let committed = Field::commit(&evaluator, expr)
                    .map_err(|source| GraphError::Expression { field, source })?;
                match which {
                    ProcessField::Capacity => {
                        if committed.value() < 0.0 {
                            return Err(GraphError::NegativeCapacity {
                                process: id,
                                value: committed.value(),
                            });
                        }
                        process.capacity = committed;
                    }
                    ProcessField::Activity => process.activity = Some(committed),
                    ProcessField::Speed => process.speed = committed,
                }
                log::debug!("set {} = '{}'", field, expr.trim());
                if process.is_over_capacity() {
                    log::warn!(
                        "process {} runs {} units but only {} are placed",
                        id,
                        process.effective_activity(),
                        process.capacity()
                    );
                }
            }
            FieldRef::BaseRate(id) => {
                let evaluator = self.evaluator;
                let flow = self.flows.get_mut(&id).ok_or(GraphError::UnknownFlow(id))?;
                flow.base_rate = Field::commit(&evaluator, expr)
                    .map_err(|source| GraphError::Expression { field, source })?;
                log::debug!("set {} = '{}'", field, expr.trim());
            }
        }
        Ok(())
    }

    /// Stores a computed activity, bypassing expression parsing.
    pub(crate) fn write_activity(&mut self, id: ProcessId, value: f64) -> Result<(), GraphError> {
        let process = self
            .processes
            .get_mut(&id)
            .ok_or(GraphError::UnknownProcess(id))?;
        process.activity = Some(Field::from_value(value));
        log::debug!("wrote {}.activity = {}", id, value);
        Ok(())
    }

    pub fn rename(&mut self, entity: EntityRef, label: impl Into<String>) -> Result<(), GraphError> {
        let label = label.into();
        match entity {
            EntityRef::Process(id) => {
                self.processes
                    .get_mut(&id)
                    .ok_or(GraphError::UnknownProcess(id))?
                    .label = label;
            }
            EntityRef::Resource(id) => {
                self.resources
                    .get_mut(&id)
                    .ok_or(GraphError::UnknownResource(id))?
                    .label = label;
            }
        }
        Ok(())
    }
}
