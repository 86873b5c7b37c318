// SPDX-License-Identifier: MIT

//! Shared expression handle and the node kinds behind it

use super::procedure::Procedure;
use crate::scenario::intersection::IntersectionManager;
use crate::sim::error::{ConfigurationError, EvaluationError};
use serde::Deserialize;
use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

/// Handle to at most one shared expression node.
///
/// Cloning shares the node; the node is dropped with its last handle.
/// The truth value of any expression is "not exactly `Bool(false)`", so
/// numbers and nil are truthy.
#[derive(Clone, Default)]
pub struct Expression {
    node: Option<Rc<Node>>,
}

/// Every kind an expression node can be
pub enum Node {
    Bool(bool),
    Number(f64),
    Junction(Junction, Vec<Expression>),
    Not(Expression),
    Predicate(Procedure),
    Action(Procedure),
    Sequential(Sequence),
    Parallel(ParallelPolicy, Vec<Expression>),
}

/// N-ary logical operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Junction {
    And,
    Or,
}

impl Junction {
    /// Result of the operator over no operands; any operand whose truth
    /// differs from it decides the result
    fn identity(self) -> bool {
        matches!(self, Junction::And)
    }
}

impl fmt::Display for Junction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Junction::And => write!(f, "And"),
            Junction::Or => write!(f, "Or"),
        }
    }
}

/// How the results of parallel children combine into one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum ParallelPolicy {
    /// Every child must succeed
    All,
    /// At least one child must succeed
    Any,
    /// Strictly more than half of the children must succeed
    Majority,
}

impl ParallelPolicy {
    fn combine(self, passed: usize, total: usize) -> bool {
        match self {
            ParallelPolicy::All => passed == total,
            ParallelPolicy::Any => passed > 0,
            ParallelPolicy::Majority => passed * 2 > total,
        }
    }
}

impl fmt::Display for ParallelPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParallelPolicy::All => write!(f, "All"),
            ParallelPolicy::Any => write!(f, "Any"),
            ParallelPolicy::Majority => write!(f, "Majority"),
        }
    }
}

/// Children run one after another across ticks.
///
/// The cursor names the first child that has not yet succeeded; children
/// before it are never evaluated again.
pub struct Sequence {
    children: Vec<Expression>,
    cursor: Cell<usize>,
}

impl Sequence {
    fn new(children: Vec<Expression>) -> Self {
        Self {
            children,
            cursor: Cell::new(0),
        }
    }

    pub fn children(&self) -> &[Expression] {
        &self.children
    }

    /// Index of the child evaluated next
    pub fn position(&self) -> usize {
        self.cursor.get()
    }

    pub fn is_complete(&self) -> bool {
        self.cursor.get() >= self.children.len()
    }

    pub fn reset(&self) {
        self.cursor.set(0);
    }

    fn evaluate(&self, intersections: &mut IntersectionManager) -> Result<bool, EvaluationError> {
        while let Some(child) = self.children.get(self.cursor.get()) {
            if !child.evaluate(intersections)?.is_truthy() {
                return Ok(false);
            }
            self.cursor.set(self.cursor.get() + 1);
        }
        Ok(true)
    }
}

impl Expression {
    /// Wrap a node in a new handle
    pub fn make(node: Node) -> Self {
        Self {
            node: Some(Rc::new(node)),
        }
    }

    /// The empty handle
    pub fn nil() -> Self {
        Self::default()
    }

    pub fn boolean(value: bool) -> Self {
        Self::make(Node::Bool(value))
    }

    pub fn number(value: f64) -> Self {
        Self::make(Node::Number(value))
    }

    pub fn and(operands: Vec<Expression>) -> Self {
        Self::make(Node::Junction(Junction::And, operands))
    }

    pub fn or(operands: Vec<Expression>) -> Self {
        Self::make(Node::Junction(Junction::Or, operands))
    }

    pub fn not(operand: Expression) -> Self {
        Self::make(Node::Not(operand))
    }

    pub fn predicate(procedure: Procedure) -> Self {
        Self::make(Node::Predicate(procedure))
    }

    pub fn action(procedure: Procedure) -> Self {
        Self::make(Node::Action(procedure))
    }

    pub fn sequential(children: Vec<Expression>) -> Self {
        Self::make(Node::Sequential(Sequence::new(children)))
    }

    pub fn parallel(policy: ParallelPolicy, children: Vec<Expression>) -> Self {
        Self::make(Node::Parallel(policy, children))
    }

    pub fn node(&self) -> Option<&Node> {
        self.node.as_deref()
    }

    pub fn is_nil(&self) -> bool {
        self.node.is_none()
    }

    /// Truth value: anything but `Bool(false)`
    pub fn is_truthy(&self) -> bool {
        !matches!(self.node(), Some(Node::Bool(false)))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self.node() {
            Some(Node::Bool(value)) => Some(*value),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self.node() {
            Some(Node::Number(value)) => Some(*value),
            _ => None,
        }
    }

    /// Number of handles sharing this node (0 for nil)
    pub fn strong_count(&self) -> usize {
        self.node.as_ref().map_or(0, Rc::strong_count)
    }

    /// Whether both handles share the same node
    pub fn ptr_eq(&self, other: &Expression) -> bool {
        match (&self.node, &other.node) {
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }

    /// Evaluate one tick.
    ///
    /// Literals evaluate to themselves. Procedures call into their plugin
    /// and may change simulator state, so they are not idempotent.
    pub fn evaluate(
        &self,
        intersections: &mut IntersectionManager,
    ) -> Result<Expression, EvaluationError> {
        let Some(node) = self.node() else {
            return Ok(Expression::nil());
        };

        match node {
            Node::Bool(_) | Node::Number(_) => Ok(self.clone()),
            Node::Junction(junction, operands) => {
                for operand in operands {
                    if operand.evaluate(intersections)?.is_truthy() != junction.identity() {
                        return Ok(Expression::boolean(!junction.identity()));
                    }
                }
                Ok(Expression::boolean(junction.identity()))
            }
            Node::Not(operand) => Ok(Expression::boolean(
                !operand.evaluate(intersections)?.is_truthy(),
            )),
            Node::Predicate(procedure) | Node::Action(procedure) => {
                procedure.call(intersections).map(Expression::boolean)
            }
            Node::Sequential(sequence) => sequence.evaluate(intersections).map(Expression::boolean),
            Node::Parallel(policy, children) => {
                let mut passed = 0;
                for child in children {
                    if child.evaluate(intersections)?.is_truthy() {
                        passed += 1;
                    }
                }
                Ok(Expression::boolean(policy.combine(passed, children.len())))
            }
        }
    }

    /// Construction errors of every procedure in the tree, in reading order
    pub fn configuration_errors(&self) -> Vec<ConfigurationError> {
        let mut errors = Vec::new();
        self.collect_errors(&mut errors);
        errors
    }

    fn collect_errors(&self, errors: &mut Vec<ConfigurationError>) {
        match self.node() {
            None | Some(Node::Bool(_)) | Some(Node::Number(_)) => {}
            Some(Node::Junction(_, children)) | Some(Node::Parallel(_, children)) => {
                children.iter().for_each(|c| c.collect_errors(errors))
            }
            Some(Node::Sequential(sequence)) => {
                sequence.children().iter().for_each(|c| c.collect_errors(errors))
            }
            Some(Node::Not(operand)) => operand.collect_errors(errors),
            Some(Node::Predicate(procedure)) | Some(Node::Action(procedure)) => {
                errors.extend(procedure.error().cloned())
            }
        }
    }
}

fn write_children(f: &mut fmt::Formatter<'_>, children: &[Expression]) -> fmt::Result {
    for child in children {
        write!(f, " {}", child)?;
    }
    write!(f, ")")
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.node() {
            None => write!(f, "()"),
            Some(Node::Bool(value)) => write!(f, "(Bool {})", value),
            Some(Node::Number(value)) => write!(f, "(Number {})", value),
            Some(Node::Junction(junction, operands)) => {
                write!(f, "({}", junction)?;
                write_children(f, operands)
            }
            Some(Node::Not(operand)) => write!(f, "(Not {})", operand),
            Some(Node::Predicate(procedure)) => write!(f, "(Predicate {})", procedure.type_name()),
            Some(Node::Action(procedure)) => write!(f, "(Action {})", procedure.type_name()),
            Some(Node::Sequential(sequence)) => {
                write!(f, "(Sequential")?;
                write_children(f, sequence.children())
            }
            Some(Node::Parallel(policy, children)) => {
                write!(f, "(Parallel {}", policy)?;
                write_children(f, children)
            }
        }
    }
}

impl fmt::Debug for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
