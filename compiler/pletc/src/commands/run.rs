//! Evaluation commands: `run` and `render`.

use std::io::Write;
use std::path::Path;

use plet_eval::{Interpreter, LoadError, Mode, Value};

use super::{finish, interpreter};
use crate::options::Options;

/// Evaluate a file and print the value it produces.
pub fn run_file(path: &str, options: &Options) -> bool {
    let interpreter = interpreter(options);
    let path = Path::new(path);
    let loaded = match options.mode_for(path) {
        Mode::Script => interpreter.load_script(path),
        Mode::Template => interpreter.load_template(path),
    };
    let module = match loaded {
        Ok(module) => module,
        Err(error) => {
            report_load_error(&error);
            finish(interpreter.handler(), options);
            return false;
        }
    };
    let printed = match interpreter.eval_module(&module, interpreter.root_env()) {
        Ok(value) => print_value(&interpreter, &value),
        Err(_) => false,
    };
    finish(interpreter.handler(), options) && printed
}

/// Render a template through its layouts and print the result.
pub fn render_file(path: &str, options: &Options) -> bool {
    let interpreter = interpreter(options);
    let module = match interpreter.load_template(Path::new(path)) {
        Ok(module) => module,
        Err(error) => {
            report_load_error(&error);
            finish(interpreter.handler(), options);
            return false;
        }
    };
    let env = interpreter.template_env(&Value::Nil, interpreter.root_env());
    let printed = match interpreter.eval_template(&module, &env) {
        Ok(value) => print_value(&interpreter, &value),
        Err(_) => false,
    };
    finish(interpreter.handler(), options) && printed
}

fn print_value(interpreter: &Interpreter, value: &Value) -> bool {
    if value.is_nil() {
        return true;
    }
    let mut bytes = value.display_bytes(interpreter.symbols());
    if bytes.last() != Some(&b'\n') {
        bytes.push(b'\n');
    }
    let mut stdout = std::io::stdout().lock();
    if let Err(e) = stdout.write_all(&bytes).and_then(|()| stdout.flush()) {
        eprintln!("error writing output: {e}");
        return false;
    }
    true
}

/// Syntax and evaluation failures have already been reported by the
/// interpreter.
fn report_load_error(error: &LoadError) {
    match error {
        LoadError::Syntax { .. } | LoadError::Eval { .. } => {}
        LoadError::Io { .. } | LoadError::Encoding { .. } => eprintln!("error: {error}"),
    }
}
