//! Common test utilities for building production graphs.
use factor::prelude::*;

/// Adds a process and commits its capacity and speed expressions.
#[allow(dead_code)]
pub fn add_process(graph: &mut Graph, label: &str, capacity: &str, speed: &str) -> ProcessId {
    let id = graph.add_process(label);
    graph
        .set_field(FieldRef::Process(id, ProcessField::Capacity), capacity)
        .expect("capacity expression should be valid");
    graph
        .set_field(FieldRef::Process(id, ProcessField::Speed), speed)
        .expect("speed expression should be valid");
    id
}

/// Commits an activity expression.
#[allow(dead_code)]
pub fn set_activity(graph: &mut Graph, id: ProcessId, activity: &str) {
    graph
        .set_field(FieldRef::Process(id, ProcessField::Activity), activity)
        .expect("activity expression should be valid");
}

#[allow(dead_code)]
pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-12,
        "expected {} but got {}",
        expected,
        actual
    );
}

/// A resource fed by one process under test plus an optional outside flow.
#[allow(dead_code)]
pub struct SolverFixture {
    pub graph: Graph,
    pub resource: ResourceId,
    pub target: ProcessId,
    pub target_flow: FlowId,
}

/// Builds a resource whose flows other than the target's sum to `other`.
///
/// The target process has the given capacity and speed and one flow of
/// `base_rate` in `direction`. A separate "Outside" process at capacity 1 and
/// speed 1 provides `other`; it is left out when `other` is zero.
#[allow(dead_code)]
pub fn solver_fixture(
    other: f64,
    direction: Direction,
    base_rate: &str,
    capacity: &str,
    speed: &str,
) -> SolverFixture {
    let mut graph = Graph::new();
    let resource = graph.add_resource("Gear");
    let target = add_process(&mut graph, "Assembler", capacity, speed);
    let target_flow = graph
        .connect(target, resource, direction, base_rate)
        .expect("base rate should be valid");

    if other != 0.0 {
        let outside = add_process(&mut graph, "Outside", "1", "1");
        let outside_direction = if other > 0.0 {
            Direction::Produces
        } else {
            Direction::Consumes
        };
        graph
            .connect(outside, resource, outside_direction, &other.abs().to_string())
            .expect("outside rate should be valid");
    }

    SolverFixture {
        graph,
        resource,
        target,
        target_flow,
    }
}
