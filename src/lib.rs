//! # Factor - Production Graph Balance Engine
//!
//! **Factor** is the computational core of a factory planner. A plan is a graph of
//! *processes* (machines) connected to *resources* (materials) through *flows*.
//! Every numeric field is typed by the user as a small arithmetic expression, and the
//! engine answers two questions about the graph as it currently stands:
//!
//! 1.  **Is a resource balanced?** [`Graph::net_rate`] sums production minus
//!     consumption over every flow touching a resource.
//! 2.  **How many machines should run?** [`Graph::solve_activity`] inverts that sum
//!     for one flow and returns the owner activity that brings the resource to zero,
//!     clamped to what is actually placed.
//!
//! Derived values are never cached: each query recomputes from the graph, so there is
//! nothing to invalidate after an edit.
//!
//! ## Quick Start
//!
//! ```rust
//! use factor::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut graph = Graph::new();
//!
//!     let ore = graph.add_resource("Iron ore");
//!     let plate = graph.add_resource("Iron plate");
//!
//!     let drill = graph.add_process("Mining drill");
//!     graph.set_field(FieldRef::Process(drill, ProcessField::Capacity), "6")?;
//!     graph.set_field(FieldRef::Process(drill, ProcessField::Speed), "1/2")?;
//!     graph.connect(drill, ore, Direction::Produces, "1")?;
//!
//!     let furnace = graph.add_process("Furnace");
//!     graph.set_field(FieldRef::Process(furnace, ProcessField::Capacity), "4")?;
//!     let smelt = graph.connect(furnace, ore, Direction::Consumes, "1")?;
//!     graph.connect(furnace, plate, Direction::Produces, "1")?;
//!
//!     // Four furnaces eat more ore than six drills dig.
//!     assert!(graph.net_rate(ore)? < 0.0);
//!
//!     // Throttle the furnaces so ore balances exactly.
//!     let solution = graph.auto_balance(smelt)?;
//!     assert_eq!(solution.value, 3.0);
//!     assert!(!solution.is_clamped());
//!     assert!(graph.net_rate(ore)?.abs() < 1e-9);
//!     Ok(())
//! }
//! ```

pub mod ast;
pub mod balance;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod format;
pub mod graph;
pub mod parser;
pub mod prelude;
pub mod solver;

pub use evaluator::evaluate;
