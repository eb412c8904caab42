//! Loops and `switch`.

use plet_ir::{CaseRange, NodeId, NodeRange, Symbol};
use tracing::trace;

use super::Frame;
use crate::errors::{for_requires_iterable, loop_limit_exceeded};
use crate::output::Output;
use crate::{Control, EvalResult, Value};

/// What a loop does after its body ran.
enum Step {
    Next,
    Stop,
}

impl Frame<'_> {
    /// Run a `for` loop into `output`.
    ///
    /// The loop variables are bound in the current scope, so they remain
    /// visible after the loop and closures created in the body see their
    /// latest value.
    pub(super) fn exec_for(
        &self,
        node: NodeId,
        key: Option<Symbol>,
        value: Symbol,
        collection: NodeId,
        body: NodeRange,
        output: &mut Output,
    ) -> EvalResult<()> {
        let env = self.env;
        match self.eval(collection)? {
            Value::Array(array) => {
                let mut index = 0;
                // Re-read the length every iteration; the body may mutate
                // the array.
                while let Some(item) = array.get(index) {
                    if let Some(key) = key {
                        env.define(key, int_index(index));
                    }
                    env.define(value, item);
                    if let Step::Stop = self.iteration(node, body, output)? {
                        break;
                    }
                    index += 1;
                }
            }
            Value::Object(object) => {
                for (entry_key, item) in object.entries() {
                    if let Some(key) = key {
                        env.define(key, entry_key);
                    }
                    env.define(value, item);
                    if let Step::Stop = self.iteration(node, body, output)? {
                        break;
                    }
                }
            }
            other => return Err(self.fail(collection, for_requires_iterable(other.type_name()))),
        }
        Ok(())
    }

    fn iteration(&self, node: NodeId, body: NodeRange, output: &mut Output) -> EvalResult<Step> {
        if let Err(limit) = self.env.tick_loop() {
            return Err(self.fail(node, loop_limit_exceeded(limit)));
        }
        match self.exec_into(body, output) {
            Ok(()) | Err(Control::Continue) => Ok(Step::Next),
            Err(Control::Break) => {
                trace!("break");
                Ok(Step::Stop)
            }
            Err(other) => Err(other),
        }
    }

    /// Pick the body of the first case with a value equal to the subject.
    pub(super) fn select_case(
        &self,
        subject: NodeId,
        cases: CaseRange,
        default: Option<NodeRange>,
    ) -> EvalResult<Option<NodeRange>> {
        let subject = self.eval(subject)?;
        for case in self.arena().cases(cases) {
            for &value in self.arena().list(case.values) {
                if self.eval(value)?.equals(&subject) {
                    return Ok(Some(case.body));
                }
            }
        }
        Ok(default)
    }
}

fn int_index(index: usize) -> Value {
    i64::try_from(index).map_or(Value::Nil, Value::Int)
}
