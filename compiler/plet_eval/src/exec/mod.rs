//! Tree-walking evaluation.
//!
//! A [`Frame`] pairs the AST being evaluated with the environment it runs
//! in. Expressions evaluate to a [`Value`]; statement lists push their
//! values into an [`Output`].
//!
//! `if`, `for`, `switch` and `do` in statement position write straight into
//! the enclosing output, so text produced before a `break` or an error is
//! kept in order.

mod assign;
mod call;
mod control;
mod operators;

use std::rc::Rc;

use plet_diagnostic::{Diagnostic, ErrorGuaranteed};
use plet_ir::{Ast, BinaryOp, NodeArena, NodeId, NodeKind, NodeRange, Symbol};
use plet_stack::ensure_sufficient_stack;
use tracing::debug;

use crate::errors::{cannot_access_field, cannot_index, index_out_of_bounds, non_integer_index};
use crate::errors::{undefined_variable, EvalError};
use crate::output::Output;
use crate::value::{Closure, Object};
use crate::{Control, Env, EvalResult, Value};

pub(crate) use call::apply;

/// Evaluation state for one AST in one environment.
pub(crate) struct Frame<'a> {
    ast: &'a Rc<Ast>,
    env: &'a Env,
}

impl<'a> Frame<'a> {
    pub(crate) fn new(ast: &'a Rc<Ast>, env: &'a Env) -> Self {
        Frame { ast, env }
    }

    #[inline]
    fn arena(&self) -> &'a NodeArena {
        self.ast.arena()
    }

    fn name(&self, symbol: Symbol) -> &'static str {
        self.env.symbols().resolve(symbol)
    }

    /// Report `error` at `node` and unwind.
    fn fail(&self, node: NodeId, error: EvalError) -> Control {
        let span = self.arena().span(node);
        debug!(kind = %error.kind, at = %span.start, message = %error.message, "evaluation error");
        let diagnostic = Diagnostic::error(error.message)
            .with_file(Rc::clone(self.ast.file()))
            .with_span(span);
        Control::Error(self.env.context().handler().emit_error(diagnostic))
    }

    /// Evaluate a statement list to its output value.
    pub(crate) fn eval_statements(&self, range: NodeRange) -> EvalResult {
        let mut output = Output::default();
        self.exec_into(range, &mut output)?;
        Ok(output.finish(self.env))
    }

    fn exec_into(&self, range: NodeRange, output: &mut Output) -> EvalResult<()> {
        for &id in self.arena().list(range) {
            self.exec_statement(id, output)?;
        }
        Ok(())
    }

    fn exec_statement(&self, id: NodeId, output: &mut Output) -> EvalResult<()> {
        match self.arena().kind(id) {
            NodeKind::Text(text) => {
                output.push_text(text, self.env);
                Ok(())
            }
            NodeKind::If {
                cond,
                then_block,
                else_block,
            } => {
                if self.eval(*cond)?.is_truthy() {
                    self.exec_into(*then_block, output)
                } else if let Some(else_block) = else_block {
                    self.exec_into(*else_block, output)
                } else {
                    Ok(())
                }
            }
            NodeKind::For {
                key,
                value,
                collection,
                body,
            } => ensure_sufficient_stack(|| {
                self.exec_for(id, *key, *value, *collection, *body, output)
            }),
            NodeKind::Switch {
                subject,
                cases,
                default,
            } => ensure_sufficient_stack(|| {
                match self.select_case(*subject, *cases, *default)? {
                    Some(body) => self.exec_into(body, output),
                    None => Ok(()),
                }
            }),
            NodeKind::Block(body) => ensure_sufficient_stack(|| self.exec_into(*body, output)),
            _ => {
                let value = self.eval(id)?;
                output.push(value, self.env.symbols());
                Ok(())
            }
        }
    }

    /// Evaluate an expression node.
    pub(crate) fn eval(&self, id: NodeId) -> EvalResult {
        ensure_sufficient_stack(|| self.eval_inner(id))
    }

    fn eval_inner(&self, id: NodeId) -> EvalResult {
        let env = self.env;
        match self.arena().kind(id) {
            NodeKind::Text(bytes) | NodeKind::String(bytes) => Ok(env.string(bytes)),
            NodeKind::Nil => Ok(Value::Nil),
            NodeKind::Bool(b) => Ok(Value::Bool(*b)),
            NodeKind::Int(i) => Ok(Value::Int(*i)),
            NodeKind::Float(f) => Ok(Value::Float(*f)),
            NodeKind::Symbol(s) => Ok(Value::Symbol(*s)),
            NodeKind::Interpolation(parts) => {
                let mut output = Output::default();
                self.exec_into(*parts, &mut output)?;
                Ok(output.finish_string(env))
            }
            NodeKind::Name(name) => env
                .get(*name)
                .ok_or_else(|| self.fail(id, undefined_variable(self.name(*name)))),
            NodeKind::Array(items) => {
                let items = self.eval_list(*items)?;
                Ok(env.array(items))
            }
            NodeKind::Object(entries) => {
                let entries = self.arena().list(*entries);
                let mut object = Object::with_capacity(entries.len() / 2);
                for pair in entries.chunks_exact(2) {
                    let key = self.eval(pair[0])?;
                    let value = self.eval(pair[1])?;
                    object.put(key, value);
                }
                Ok(env.object(object))
            }
            NodeKind::Call { callee, args } => self.eval_call(id, *callee, *args),
            NodeKind::Index { target, index } => {
                let target = self.eval(*target)?;
                let index = self.eval(*index)?;
                index_value(&target, &index).map_err(|e| self.fail(id, e))
            }
            NodeKind::Field { target, name } => {
                let target = self.eval(*target)?;
                match target {
                    Value::Object(object) => Ok(object.get_symbol(*name).unwrap_or_default()),
                    other => {
                        let error = cannot_access_field(other.type_name(), self.name(*name));
                        Err(self.fail(id, error))
                    }
                }
            }
            NodeKind::Unary { op, operand } => {
                let operand = self.eval(*operand)?;
                operators::evaluate_unary(*op, &operand).map_err(|e| self.fail(id, e))
            }
            NodeKind::Binary { op, left, right } => self.eval_binary(id, *op, *left, *right),
            NodeKind::Conditional {
                cond,
                then_branch,
                else_branch,
            } => {
                if self.eval(*cond)?.is_truthy() {
                    self.eval(*then_branch)
                } else {
                    self.eval(*else_branch)
                }
            }
            NodeKind::Lambda {
                params,
                free_variables,
                body,
            } => Ok(Value::Closure(Rc::new(Closure {
                ast: Rc::clone(self.ast),
                params: *params,
                free_variables: *free_variables,
                body: *body,
                env: env.clone(),
            }))),
            NodeKind::Assign { target, op, value } => {
                self.eval_assign(*target, *op, *value)?;
                Ok(Value::Nil)
            }
            NodeKind::If { .. }
            | NodeKind::For { .. }
            | NodeKind::Switch { .. }
            | NodeKind::Block(_) => {
                let mut output = Output::default();
                self.exec_statement(id, &mut output)?;
                Ok(output.finish(env))
            }
            NodeKind::Export { name, value } => {
                if let Some(value) = value {
                    let value = self.eval(*value)?;
                    env.define(*name, value);
                } else if env.get(*name).is_none() {
                    return Err(self.fail(id, undefined_variable(self.name(*name))));
                }
                env.export(*name);
                Ok(Value::Nil)
            }
            NodeKind::Return(value) => {
                let value = match value {
                    Some(value) => self.eval(*value)?,
                    None => Value::Nil,
                };
                Err(Control::Return(value))
            }
            NodeKind::Break => Err(Control::Break),
            NodeKind::Continue => Err(Control::Continue),
            // Modules with syntax errors are never evaluated, so the error
            // has already been reported.
            NodeKind::Error => match env.context().handler().has_errors() {
                Some(guarantee) => Err(Control::Error(guarantee)),
                None => Ok(Value::Nil),
            },
        }
    }

    fn eval_list(&self, range: NodeRange) -> EvalResult<Vec<Value>> {
        self.arena()
            .list(range)
            .iter()
            .map(|&id| self.eval(id))
            .collect()
    }

    fn eval_binary(&self, id: NodeId, op: BinaryOp, left: NodeId, right: NodeId) -> EvalResult {
        let left = self.eval(left)?;
        match op {
            // The deciding operand is the result.
            BinaryOp::And if !left.is_truthy() => Ok(left),
            BinaryOp::Or if left.is_truthy() => Ok(left),
            BinaryOp::And | BinaryOp::Or => self.eval(right),
            _ => {
                let right = self.eval(right)?;
                operators::evaluate_binary(op, &left, &right, self.env)
                    .map_err(|e| self.fail(id, e))
            }
        }
    }
}

/// `target[index]`. A missing object key is `nil`.
fn index_value(target: &Value, index: &Value) -> Result<Value, EvalError> {
    match target {
        Value::Array(array) => {
            let Value::Int(i) = index else {
                return Err(non_integer_index(index.type_name()));
            };
            usize::try_from(*i)
                .ok()
                .and_then(|i| array.get(i))
                .ok_or_else(|| index_out_of_bounds(*i, array.len()))
        }
        Value::Object(object) => Ok(object.get(index).unwrap_or_default()),
        other => Err(cannot_index(other.type_name())),
    }
}

/// Evaluate a parsed module's top level in `env`.
///
/// `return` ends the module with its value.
#[tracing::instrument(level = "debug", skip_all, fields(file = %ast.file().display()))]
pub(crate) fn eval_module(ast: &Rc<Ast>, env: &Env) -> Result<Value, ErrorGuaranteed> {
    match Frame::new(ast, env).eval_statements(ast.root()) {
        Ok(value) | Err(Control::Return(value)) => Ok(value),
        Err(Control::Break | Control::Continue) => Ok(Value::Nil),
        Err(Control::Error(guarantee)) => Err(guarantee),
    }
}

#[cfg(test)]
mod tests;
