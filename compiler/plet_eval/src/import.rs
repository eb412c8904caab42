//! `import`: system modules and user modules evaluated once per cache
//! entry.

use std::path::{Path, PathBuf};
use std::rc::Rc;

use plet_diagnostic::ErrorGuaranteed;
use plet_ir::Symbol;
use tracing::debug;

use crate::errors::circular_import;
use crate::exec::eval_module;
use crate::module::{Module, ModuleKind, SourceKind};
use crate::value::Object;
use crate::{ArgIndex, Env, LoadError, Value};

/// Resolve `name` against the `DIR` binding of `env`. Absolute paths and
/// paths without a `DIR` are used as given.
pub(crate) fn resolve_path(env: &Env, name: &str) -> PathBuf {
    let path = Path::new(name);
    if path.is_absolute() {
        return path.to_path_buf();
    }
    match env.get(Symbol::DIR) {
        Some(Value::String(dir)) if !dir.is_empty() => {
            PathBuf::from(dir.to_string_lossy()).join(path)
        }
        _ => path.to_path_buf(),
    }
}

/// Bind `FILE` and `DIR` for a module evaluated from `file`.
pub(crate) fn define_location(env: &Env, file: &Path) -> Result<(), LoadError> {
    let encoding = || LoadError::Encoding {
        path: file.to_path_buf(),
    };
    let file_name = file.to_str().ok_or_else(encoding)?;
    let dir = match file.parent().map(Path::to_str) {
        Some(Some("")) | None => ".",
        Some(Some(dir)) => dir,
        Some(None) => return Err(encoding()),
    };
    env.define(Symbol::FILE, env.string(file_name));
    env.define(Symbol::DIR, env.string(dir));
    Ok(())
}

/// The `import(name)` native.
///
/// A registered system module wins over a file of the same name. A user
/// module's exports are computed once and cached on the module; each
/// import copies them into the caller's arena and binds every exported
/// name in the caller's scope.
#[tracing::instrument(level = "debug", skip(env))]
pub(crate) fn import(env: &Env, name: &str) -> Value {
    let context = Rc::clone(env.context());
    let modules = context.modules();
    if let Some(module) = modules.get(Path::new(name)) {
        if let ModuleKind::System(hook) = module.kind() {
            debug!("system module");
            return hook(env);
        }
    }

    let path = resolve_path(env, name);
    let loaded = modules.load(
        &path,
        SourceKind::Script,
        context.symbols(),
        context.handler(),
    );
    let module = match loaded {
        Ok(module) => module,
        Err(error) => return env.error(ArgIndex::Arg(0), error.to_string()),
    };
    let exports = match module.exports() {
        Some(exports) => exports,
        None => match evaluate_exports(env, &module) {
            Ok(exports) => exports,
            Err(guarantee) => {
                env.record_error(guarantee);
                return Value::Nil;
            }
        },
    };

    let exports = exports.copy_into(env);
    if let Value::Object(object) = &exports {
        for (key, value) in object.entries() {
            if let Value::Symbol(name) = key {
                env.define(name, value);
            }
        }
    }
    exports
}

/// Evaluate a user module in a new arena under the importer's root and
/// cache its exports object.
fn evaluate_exports(env: &Env, module: &Rc<Module>) -> Result<Value, ErrorGuaranteed> {
    if let Some(guarantee) = module.parse_error() {
        return Err(guarantee);
    }
    let Some(ast) = module.ast() else {
        return Ok(Value::Nil);
    };
    if !module.begin_evaluation() {
        let path = module.file().display().to_string();
        return Err(env.raise(ArgIndex::Arg(0), circular_import(&path).message));
    }
    debug!(file = %module.file().display(), "evaluating module");

    let scope = Env::new_arena_child(&env.root_env());
    let result = match define_location(&scope, module.file()) {
        Ok(()) => eval_module(ast, &scope),
        Err(error) => Err(env.raise(ArgIndex::Arg(0), error.to_string())),
    };
    module.end_evaluation();
    result?;

    let mut object = Object::new();
    for name in scope.exports() {
        object.put(Value::Symbol(name), scope.get(name).unwrap_or_default());
    }
    let exports = scope.object(object);
    module.set_exports(exports.clone());
    Ok(exports)
}
