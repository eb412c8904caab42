//! Assignment to names, fields and indices.

use plet_ir::{AssignOp, NodeId, NodeKind};

use super::{index_value, operators, Frame};
use crate::errors::{
    cannot_access_field, cannot_index, index_out_of_bounds, invalid_assignment_target,
    non_integer_index, undefined_variable,
};
use crate::{EvalResult, Value};

impl Frame<'_> {
    /// `target op value`.
    ///
    /// A name is always bound in the current scope; a compound assignment
    /// reads its current value through the parent chain first. Fields and
    /// indices update the container in place.
    pub(super) fn eval_assign(&self, target: NodeId, op: AssignOp, value: NodeId) -> EvalResult<()> {
        let env = self.env;
        match self.arena().kind(target) {
            NodeKind::Name(name) => {
                let current = match op {
                    AssignOp::Set => None,
                    _ => match env.get(*name) {
                        Some(current) => Some(current),
                        None => return Err(self.fail(target, undefined_variable(self.name(*name)))),
                    },
                };
                let value = self.assigned_value(target, op, current, value)?;
                env.define(*name, value);
                Ok(())
            }
            NodeKind::Field {
                target: container,
                name,
            } => {
                let object = match self.eval(*container)? {
                    Value::Object(object) => object,
                    other => {
                        let error = cannot_access_field(other.type_name(), self.name(*name));
                        return Err(self.fail(target, error));
                    }
                };
                let current = match op {
                    AssignOp::Set => None,
                    _ => Some(object.get_symbol(*name).unwrap_or_default()),
                };
                let value = self.assigned_value(target, op, current, value)?;
                object.put(Value::Symbol(*name), value);
                Ok(())
            }
            NodeKind::Index {
                target: container,
                index,
            } => {
                let container_value = self.eval(*container)?;
                let key = self.eval(*index)?;
                let current = match op {
                    AssignOp::Set => None,
                    _ => match index_value(&container_value, &key) {
                        Ok(current) => Some(current),
                        Err(error) => return Err(self.fail(target, error)),
                    },
                };
                match &container_value {
                    Value::Array(array) => {
                        let Value::Int(i) = key else {
                            return Err(self.fail(*index, non_integer_index(key.type_name())));
                        };
                        let slot = usize::try_from(i).ok().filter(|&slot| slot < array.len());
                        let Some(slot) = slot else {
                            return Err(self.fail(target, index_out_of_bounds(i, array.len())));
                        };
                        let value = self.assigned_value(target, op, current, value)?;
                        array.set(slot, value);
                        Ok(())
                    }
                    Value::Object(object) => {
                        let value = self.assigned_value(target, op, current, value)?;
                        object.put(key, value);
                        Ok(())
                    }
                    other => Err(self.fail(target, cannot_index(other.type_name()))),
                }
            }
            _ => Err(self.fail(target, invalid_assignment_target())),
        }
    }

    /// The value to store: the right-hand side, or for a compound
    /// assignment the operator applied to `current` and the right-hand side.
    fn assigned_value(
        &self,
        target: NodeId,
        op: AssignOp,
        current: Option<Value>,
        value: NodeId,
    ) -> EvalResult {
        let rhs = self.eval(value)?;
        match (op.binary(), current) {
            (Some(binary), Some(current)) => {
                operators::evaluate_binary(binary, &current, &rhs, self.env)
                    .map_err(|e| self.fail(target, e))
            }
            _ => Ok(rhs),
        }
    }
}
