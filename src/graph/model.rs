use super::ids::{FlowId, ProcessId, ResourceId};
use crate::error::ExprError;
use crate::evaluator::Evaluator;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A numeric field backed by the expression text it was committed from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Field {
    source: String,
    value: f64,
}

impl Field {
    /// Evaluates `source` and wraps the result. Nothing is built on failure.
    pub(crate) fn commit(evaluator: &Evaluator, source: &str) -> Result<Self, ExprError> {
        let value = evaluator.evaluate(source)?;
        Ok(Self {
            source: source.trim().to_string(),
            value,
        })
    }

    /// Builds a field from a computed value; the source is its shortest round-trip form.
    pub(crate) fn from_value(value: f64) -> Self {
        Self {
            source: value.to_string(),
            value,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn value(&self) -> f64 {
        self.value
    }
}

/// Whether a flow feeds its resource or draws from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Produces,
    Consumes,
}

impl Direction {
    pub fn sign(self) -> f64 {
        match self {
            Direction::Produces => 1.0,
            Direction::Consumes => -1.0,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Produces => write!(f, "produces"),
            Direction::Consumes => write!(f, "consumes"),
        }
    }
}

/// One machine type placed in the factory.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Process {
    pub(crate) label: String,
    pub(crate) capacity: Field,
    pub(crate) activity: Option<Field>,
    pub(crate) speed: Field,
    pub(crate) flows: Vec<FlowId>,
}

impl Process {
    pub(crate) fn new(label: String, capacity: Field, speed: Field) -> Self {
        Self {
            label,
            capacity,
            activity: None,
            speed,
            flows: Vec::new(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Total units placed.
    pub fn capacity(&self) -> f64 {
        self.capacity.value()
    }

    /// Units actually running, if set explicitly.
    pub fn activity(&self) -> Option<f64> {
        self.activity.as_ref().map(Field::value)
    }

    pub fn speed(&self) -> f64 {
        self.speed.value()
    }

    /// Activity used for rates: the explicit value, or capacity when absent.
    pub fn effective_activity(&self) -> f64 {
        self.activity().unwrap_or_else(|| self.capacity())
    }

    /// True when an explicit activity exceeds the placed capacity.
    /// Rates still use the raw activity.
    pub fn is_over_capacity(&self) -> bool {
        self.activity().is_some_and(|a| a > self.capacity())
    }

    pub fn field(&self, which: ProcessField) -> Option<&Field> {
        match which {
            ProcessField::Capacity => Some(&self.capacity),
            ProcessField::Activity => self.activity.as_ref(),
            ProcessField::Speed => Some(&self.speed),
        }
    }

    /// Inputs and outputs in connection order.
    pub fn flows(&self) -> &[FlowId] {
        &self.flows
    }
}

/// One material type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resource {
    pub(crate) label: String,
    pub(crate) incident_flows: Vec<FlowId>,
}

impl Resource {
    pub(crate) fn new(label: String) -> Self {
        Self {
            label,
            incident_flows: Vec::new(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Every flow touching this resource, in connection order.
    pub fn incident_flows(&self) -> &[FlowId] {
        &self.incident_flows
    }
}

/// A directed edge between a process and a resource.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Flow {
    pub(crate) owner: ProcessId,
    pub(crate) resource: ResourceId,
    pub(crate) direction: Direction,
    pub(crate) base_rate: Field,
}

impl Flow {
    pub fn owner(&self) -> ProcessId {
        self.owner
    }

    pub fn resource(&self) -> ResourceId {
        self.resource
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Amount per unit time per running unit.
    pub fn base_rate(&self) -> f64 {
        self.base_rate.value()
    }

    pub fn base_rate_field(&self) -> &Field {
        &self.base_rate
    }

    /// Rate change on the resource per unit of owner activity.
    pub fn gain(&self, owner: &Process) -> f64 {
        self.direction.sign() * owner.speed() * self.base_rate()
    }

    /// Signed contribution to the resource's net rate.
    pub fn contribution(&self, owner: &Process) -> f64 {
        self.direction.sign() * owner.effective_activity() * owner.speed() * self.base_rate()
    }
}

/// The expression-backed fields of a process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProcessField {
    Capacity,
    Activity,
    Speed,
}

impl fmt::Display for ProcessField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessField::Capacity => write!(f, "capacity"),
            ProcessField::Activity => write!(f, "activity"),
            ProcessField::Speed => write!(f, "speed"),
        }
    }
}

/// Addresses one editable numeric field in the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldRef {
    Process(ProcessId, ProcessField),
    BaseRate(FlowId),
}

impl fmt::Display for FieldRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldRef::Process(id, field) => write!(f, "{}.{}", id, field),
            FieldRef::BaseRate(id) => write!(f, "{}.base_rate", id),
        }
    }
}

/// Addresses a labelled node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityRef {
    Process(ProcessId),
    Resource(ResourceId),
}

impl From<ProcessId> for EntityRef {
    fn from(id: ProcessId) -> Self {
        EntityRef::Process(id)
    }
}

impl From<ResourceId> for EntityRef {
    fn from(id: ResourceId) -> Self {
        EntityRef::Resource(id)
    }
}
