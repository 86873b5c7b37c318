//! Script node → expression tree
//!
//! Map nodes are dispatched on their keys, in this order:
//! - `All: [...]` - And over the listed expressions
//! - `Any: [...]` - Or over the listed expressions
//! - `Not: {...}` - negation of one expression
//! - `Sequential: [...]` - children run one after another across ticks
//! - `Parallel: [...]` with `Policy: All | Any | Majority`
//! - `Type: <name>` - procedure call; an Action when `Params` is present,
//!   a Predicate otherwise

use super::procedure::Procedure;
use super::value::{Expression, ParallelPolicy};
use crate::scenario::config::read_required;
use crate::scenario::context::Context;
use crate::sim::error::ScenarioError;
use serde_yaml::Value;

/// Read one expression from a script node
pub fn read(node: &Value, context: &Context) -> Result<Expression, ScenarioError> {
    if !node.is_mapping() {
        log::error!("Expected an expression map, got: {:?}", node);
        return Err(ScenarioError::unsupported(node));
    }

    if let Some(operands) = node.get("All") {
        return Ok(Expression::and(read_list(operands, "All", context)?));
    }
    if let Some(operands) = node.get("Any") {
        return Ok(Expression::or(read_list(operands, "Any", context)?));
    }
    if let Some(operand) = node.get("Not") {
        return Ok(Expression::not(read(operand, context)?));
    }
    if let Some(children) = node.get("Sequential") {
        return Ok(Expression::sequential(read_list(
            children,
            "Sequential",
            context,
        )?));
    }
    if let Some(children) = node.get("Parallel") {
        let policy: ParallelPolicy = read_required(node, "Policy", "Parallel")?;
        return Ok(Expression::parallel(
            policy,
            read_list(children, "Parallel", context)?,
        ));
    }
    if node.get("Type").is_some() {
        let procedure = Procedure::new(node, context);
        return Ok(if node.get("Params").is_some() {
            Expression::action(procedure)
        } else {
            Expression::predicate(procedure)
        });
    }

    Err(ScenarioError::unrecognized(node))
}

fn read_list(node: &Value, key: &str, context: &Context) -> Result<Vec<Expression>, ScenarioError> {
    match node {
        Value::Sequence(items) => items.iter().map(|each| read(each, context)).collect(),
        _ => {
            log::error!("{} expects a list of expressions, got: {:?}", key, node);
            Err(ScenarioError::unsupported(node))
        }
    }
}
