//! Tests for the auto-balance solver.
mod common;
use common::*;
use factor::prelude::*;

fn unsolvable(flow: FlowId, reason: UnsolvableReason) -> Result<Solution, SolveError> {
    Err(SolveError::Unsolvable { flow, reason })
}

#[test]
fn test_nothing_else_on_resource_solves_to_zero() {
    let fx = solver_fixture(0.0, Direction::Produces, "2", "10", "1");
    let solution = fx.graph.solve_activity(fx.target_flow).unwrap();

    assert_eq!(solution.value, 0.0);
    assert!(solution.value.is_sign_positive());
    assert!(!solution.is_clamped());
}

#[test]
fn test_producer_covers_outside_demand() {
    let fx = solver_fixture(-4.0, Direction::Produces, "2", "10", "1");
    let solution = fx.graph.solve_activity(fx.target_flow).unwrap();
    assert_eq!(
        solution,
        Solution {
            value: 2.0,
            raw: 2.0,
            clamp: None
        }
    );
}

#[test]
fn test_consumer_absorbs_outside_supply() {
    let fx = solver_fixture(6.0, Direction::Consumes, "2", "10", "1");
    let solution = fx.graph.solve_activity(fx.target_flow).unwrap();
    assert_eq!(solution.value, 3.0);
    assert_eq!(solution.clamp, None);
}

#[test]
fn test_speed_scales_the_gain() {
    let fx = solver_fixture(-6.0, Direction::Produces, "2", "10", "3/2");
    assert_eq!(fx.graph.solve_activity(fx.target_flow).unwrap().value, 2.0);
}

#[test]
fn test_clamped_to_capacity() {
    let fx = solver_fixture(-100.0, Direction::Produces, "1", "10", "1");
    let solution = fx.graph.solve_activity(fx.target_flow).unwrap();
    assert_eq!(
        solution,
        Solution {
            value: 10.0,
            raw: 100.0,
            clamp: Some(Clamp::AboveCapacity)
        }
    );
}

#[test]
fn test_clamped_at_zero() {
    let fx = solver_fixture(5.0, Direction::Produces, "1", "10", "1");
    let solution = fx.graph.solve_activity(fx.target_flow).unwrap();
    assert_eq!(
        solution,
        Solution {
            value: 0.0,
            raw: -5.0,
            clamp: Some(Clamp::BelowZero)
        }
    );
}

#[test]
fn test_zero_gain_is_unsolvable() {
    let fx = solver_fixture(-4.0, Direction::Produces, "0", "10", "1");
    assert_eq!(
        fx.graph.solve_activity(fx.target_flow),
        unsolvable(fx.target_flow, UnsolvableReason::ZeroGain)
    );

    let fx = solver_fixture(-4.0, Direction::Produces, "2", "10", "0");
    assert_eq!(
        fx.graph.solve_activity(fx.target_flow),
        unsolvable(fx.target_flow, UnsolvableReason::ZeroGain)
    );
}

#[test]
fn test_non_finite_result_is_unsolvable() {
    let fx = solver_fixture(-1e308, Direction::Produces, "0.0000000001", "10", "1");
    assert_eq!(
        fx.graph.solve_activity(fx.target_flow),
        unsolvable(fx.target_flow, UnsolvableReason::NonFinite)
    );
}

#[test]
fn test_current_activity_does_not_affect_solution() {
    let mut fx = solver_fixture(-4.0, Direction::Produces, "2", "10", "1");
    set_activity(&mut fx.graph, fx.target, "7");
    assert_eq!(fx.graph.solve_activity(fx.target_flow).unwrap().value, 2.0);
}

#[test]
fn test_solve_does_not_mutate() {
    let fx = solver_fixture(-4.0, Direction::Produces, "2", "10", "1");
    let before = fx.graph.net_rate(fx.resource).unwrap();
    fx.graph.solve_activity(fx.target_flow).unwrap();

    assert_eq!(fx.graph.process(fx.target).unwrap().activity(), None);
    assert_eq!(fx.graph.net_rate(fx.resource), Ok(before));
}

#[test]
fn test_auto_balance_writes_activity() {
    let mut fx = solver_fixture(-4.0, Direction::Produces, "2", "10", "1");
    assert_eq!(fx.graph.net_rate(fx.resource), Ok(16.0));

    let solution = fx.graph.auto_balance(fx.target_flow).unwrap();
    assert_eq!(solution.value, 2.0);

    let process = fx.graph.process(fx.target).unwrap();
    assert_eq!(process.activity(), Some(2.0));
    assert_eq!(
        process.field(ProcessField::Activity).unwrap().source(),
        "2"
    );
    assert_eq!(fx.graph.net_rate(fx.resource), Ok(0.0));
    assert!(fx.graph.balance_report().is_balanced());
}

#[test]
fn test_auto_balance_applies_clamped_value() {
    let mut fx = solver_fixture(-100.0, Direction::Produces, "1", "10", "1");
    let solution = fx.graph.auto_balance(fx.target_flow).unwrap();

    assert_eq!(solution.clamp, Some(Clamp::AboveCapacity));
    assert_eq!(fx.graph.process(fx.target).unwrap().activity(), Some(10.0));
    assert_eq!(fx.graph.net_rate(fx.resource), Ok(-90.0));
}

#[test]
fn test_auto_balance_fraction_round_trips_through_source() {
    let mut fx = solver_fixture(-1.0, Direction::Produces, "3", "1", "1");
    fx.graph.auto_balance(fx.target_flow).unwrap();

    let field = fx
        .graph
        .process(fx.target)
        .unwrap()
        .field(ProcessField::Activity)
        .unwrap()
        .clone();
    assert_eq!(field.value(), 1.0 / 3.0);
    assert_eq!(evaluate(field.source()), Ok(field.value()));
    assert_close(fx.graph.net_rate(fx.resource).unwrap(), 0.0);
}

#[test]
fn test_unsolvable_leaves_graph_untouched() {
    let mut fx = solver_fixture(-4.0, Direction::Produces, "0", "10", "1");
    set_activity(&mut fx.graph, fx.target, "3");

    assert!(fx.graph.auto_balance(fx.target_flow).is_err());
    assert_eq!(fx.graph.process(fx.target).unwrap().activity(), Some(3.0));
}

#[test]
fn test_cancelling_sibling_flows() {
    let mut graph = Graph::new();
    let scrap = graph.add_resource("Scrap");
    let recycler = add_process(&mut graph, "Recycler", "5", "1");
    let eats = graph.connect(recycler, scrap, Direction::Consumes, "2").unwrap();
    graph.connect(recycler, scrap, Direction::Produces, "2").unwrap();

    assert_eq!(
        graph.solve_activity(eats),
        unsolvable(eats, UnsolvableReason::CancellingFlows)
    );
}

#[test]
fn test_sibling_flows_share_the_gain() {
    let mut graph = Graph::new();
    let scrap = graph.add_resource("Scrap");
    let source = add_process(&mut graph, "Scrapyard", "1", "1");
    graph.connect(source, scrap, Direction::Produces, "4").unwrap();

    let recycler = add_process(&mut graph, "Recycler", "5", "1");
    let eats = graph.connect(recycler, scrap, Direction::Consumes, "3").unwrap();
    let returns = graph.connect(recycler, scrap, Direction::Produces, "1").unwrap();

    // Either flow solves the same owner on the same resource.
    assert_eq!(graph.solve_activity(returns).unwrap().value, 2.0);
    let solution = graph.auto_balance(eats).unwrap();
    assert_eq!(solution.value, 2.0);
    assert_eq!(graph.net_rate(scrap), Ok(0.0));
}

#[test]
fn test_only_the_flow_resource_is_balanced() {
    let mut graph = Graph::new();
    let ore = graph.add_resource("Ore");
    let plate = graph.add_resource("Plate");
    let drill = add_process(&mut graph, "Drill", "2", "1");
    graph.connect(drill, ore, Direction::Produces, "3").unwrap();

    let furnace = add_process(&mut graph, "Furnace", "10", "1");
    let eats = graph.connect(furnace, ore, Direction::Consumes, "2").unwrap();
    graph.connect(furnace, plate, Direction::Produces, "1").unwrap();

    graph.auto_balance(eats).unwrap();
    assert_eq!(graph.net_rate(ore), Ok(0.0));
    assert_eq!(graph.net_rate(plate), Ok(3.0));
}

#[test]
fn test_solver_after_removing_outside_process() {
    let mut fx = solver_fixture(-4.0, Direction::Produces, "2", "10", "1");
    let outside = fx
        .graph
        .processes()
        .find(|(_, p)| p.label() == "Outside")
        .map(|(id, _)| id)
        .unwrap();
    fx.graph.remove_process(outside).unwrap();

    assert_eq!(fx.graph.solve_activity(fx.target_flow).unwrap().value, 0.0);
}

#[test]
fn test_unknown_flow() {
    let mut fx = solver_fixture(-4.0, Direction::Produces, "2", "10", "1");
    let flow = fx.target_flow;
    fx.graph.disconnect(flow).unwrap();

    assert_eq!(
        fx.graph.solve_activity(flow),
        Err(SolveError::Graph(GraphError::UnknownFlow(flow)))
    );
    assert_eq!(
        fx.graph.auto_balance(flow),
        Err(SolveError::Graph(GraphError::UnknownFlow(flow)))
    );
}
