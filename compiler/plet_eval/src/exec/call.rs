//! Calling natives and closures.

use std::rc::Rc;

use plet_diagnostic::ErrorGuaranteed;
use plet_ir::{NodeId, NodeKind, NodeRange};
use tracing::trace;

use super::Frame;
use crate::env::CallSite;
use crate::errors::{not_callable, wrong_arg_count, EvalError};
use crate::value::{Closure, Native};
use crate::{ArgIndex, Control, Env, EvalResult, Value};

/// Failure of a call before or after the callee ran.
enum CallError {
    /// Not reported yet; the caller reports it at the call node.
    Unreported(EvalError),
    Control(Control),
}

impl From<Control> for CallError {
    fn from(control: Control) -> Self {
        CallError::Control(control)
    }
}

impl Frame<'_> {
    #[tracing::instrument(level = "trace", skip_all)]
    pub(super) fn eval_call(&self, node: NodeId, callee: NodeId, args: NodeRange) -> EvalResult {
        let function = self.eval(callee)?;
        let args = self.eval_list(args)?;
        let name = match self.arena().kind(callee) {
            NodeKind::Name(name) | NodeKind::Field { name, .. } => self.name(*name),
            _ => "function",
        };
        let site = CallSite {
            ast: Rc::clone(self.ast),
            node,
        };
        match call_value(&function, &args, self.env, Some(site), name) {
            Ok(value) => Ok(value),
            Err(CallError::Unreported(error)) => Err(self.fail(node, error)),
            Err(CallError::Control(control)) => Err(control),
        }
    }
}

fn call_value(
    function: &Value,
    args: &[Value],
    env: &Env,
    site: Option<CallSite>,
    name: &str,
) -> Result<Value, CallError> {
    match function {
        Value::Native(native) => call_native(native, args, env, site).map_err(CallError::from),
        Value::Closure(closure) => call_closure(closure, args, name),
        other => Err(CallError::Unreported(not_callable(other.type_name()))),
    }
}

/// Run a native with `site` as its calling node. An error the native
/// raised through [`Env::error`] becomes [`Control::Error`].
fn call_native(
    native: &Native,
    args: &[Value],
    env: &Env,
    site: Option<CallSite>,
) -> EvalResult {
    trace!(native = native.name(), args = args.len(), "call native");
    let previous = env.replace_calling_node(site);
    let result = native.call(args, env);
    env.replace_calling_node(previous);
    match env.take_error() {
        Some(guarantee) => Err(Control::Error(guarantee)),
        None => Ok(result),
    }
}

fn call_closure(closure: &Closure, args: &[Value], name: &str) -> Result<Value, CallError> {
    let params = closure.params();
    if params.len() != args.len() {
        return Err(CallError::Unreported(wrong_arg_count(
            name,
            params.len(),
            args.len(),
        )));
    }
    let scope = closure.env.child();
    for (&param, arg) in params.iter().zip(args) {
        scope.define(param, arg.clone());
    }
    match Frame::new(&closure.ast, &scope).eval(closure.body) {
        Ok(value) | Err(Control::Return(value)) => Ok(value),
        // Loop control cannot cross a function body.
        Err(Control::Break | Control::Continue) => Ok(Value::Nil),
        Err(error @ Control::Error(_)) => Err(CallError::Control(error)),
    }
}

/// Call `function` from host code, with no calling node.
///
/// An error is reported before this returns. It is also recorded on `env`,
/// so a native that forwards the failure by returning makes its own call
/// fail.
pub(crate) fn apply(env: &Env, function: &Value, args: &[Value]) -> Result<Value, ErrorGuaranteed> {
    match call_value(function, args, env, None, "function") {
        Ok(value) | Err(CallError::Control(Control::Return(value))) => Ok(value),
        Err(CallError::Control(Control::Break | Control::Continue)) => Ok(Value::Nil),
        Err(CallError::Control(Control::Error(guarantee))) => {
            env.record_error(guarantee);
            Err(guarantee)
        }
        Err(CallError::Unreported(error)) => Err(env.raise(ArgIndex::All, error.message)),
    }
}
