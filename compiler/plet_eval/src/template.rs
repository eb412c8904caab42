//! Template environments and layouts.

use std::rc::Rc;

use plet_diagnostic::{Diagnostic, ErrorGuaranteed};
use plet_ir::Symbol;
use tracing::debug;

use crate::exec::eval_module;
use crate::import::{define_location, resolve_path};
use crate::module::{Module, SourceKind};
use crate::{Context, Env, LoadError, Value};

/// A new root environment for rendering one page.
///
/// Runs the prelude hooks, then binds every symbol-keyed entry of `data`
/// and of the `GLOBAL` object visible from `parent`, and `GLOBAL` itself.
pub(crate) fn template_env(context: &Rc<Context>, data: &Value, parent: &Env) -> Env {
    let env = Env::root(Rc::clone(context));
    context.run_prelude(&env);
    bind_entries(&env, data);
    if let Some(global) = parent.get(Symbol::GLOBAL) {
        bind_entries(&env, &global);
        env.define(Symbol::GLOBAL, global);
    }
    env
}

fn bind_entries(env: &Env, object: &Value) {
    if let Value::Object(object) = object {
        for (key, value) in object.entries() {
            if let Value::Symbol(name) = key {
                env.define(name, value);
            }
        }
    }
}

/// Evaluate a template, then its layouts.
///
/// When a template leaves a string in `LAYOUT`, its output becomes
/// `CONTENT`, `LAYOUT` is cleared and the named layout, resolved against
/// `DIR`, is evaluated in the same environment.
#[tracing::instrument(level = "debug", skip_all, fields(file = %module.file().display()))]
pub(crate) fn eval_template(module: &Rc<Module>, env: &Env) -> Result<Value, ErrorGuaranteed> {
    let context = Rc::clone(env.context());
    let mut module = Rc::clone(module);
    loop {
        if let Some(guarantee) = module.parse_error() {
            return Err(guarantee);
        }
        let Some(ast) = module.ast() else {
            return Ok(Value::Nil);
        };
        define_location(env, module.file()).map_err(|e| report(&context, &e))?;
        let content = eval_module(ast, env)?;

        let layout = match env.get(Symbol::LAYOUT) {
            Some(Value::String(layout)) => layout.to_string_lossy(),
            _ => return Ok(content),
        };
        env.define(Symbol::CONTENT, content);
        env.define(Symbol::LAYOUT, Value::Nil);
        let path = resolve_path(env, &layout);
        debug!(layout = %path.display(), "applying layout");
        module = context
            .modules()
            .load(
                &path,
                SourceKind::Template,
                context.symbols(),
                context.handler(),
            )
            .map_err(|e| report(&context, &e))?;
    }
}

fn report(context: &Context, error: &LoadError) -> ErrorGuaranteed {
    context.handler().emit_error(Diagnostic::error(error.to_string()))
}
