#![forbid(unsafe_code)]

use std::collections::HashMap;

use rhea_ast::types::Type;

/// The read-only builtin catalog: function signatures keyed by their
/// qualified name, plus the module names those functions live under.
/// The checker installs the whole catalog at the root scope before
/// analysis begins.
#[derive(Debug)]
pub struct Builtins {
    pub functions: HashMap<String, Type>,
    pub modules: Vec<&'static str>,
}

impl Builtins {
    pub fn standard() -> Self {
        let mut functions = HashMap::new();
        let mut fun = |name: &str, params: Vec<Type>, rets: Vec<Type>| {
            functions.insert(name.to_string(), Type::function(params, rets));
        };

        // --- io ---
        fun("io.write", vec![Type::String], vec![]);
        fun("io.read", vec![Type::String], vec![Type::String]);

        // --- math ---
        fun("math.abs", vec![Type::Float], vec![Type::Float]);
        fun("math.ceil", vec![Type::Float], vec![Type::Integer]);
        fun("math.floor", vec![Type::Float], vec![Type::Integer]);
        fun("math.sqrt", vec![Type::Float], vec![Type::Float]);

        // --- string ---
        fun("string.len", vec![Type::String], vec![Type::Integer]);
        fun("string.lower", vec![Type::String], vec![Type::String]);
        fun(
            "string.rep",
            vec![Type::String, Type::Integer],
            vec![Type::String],
        );
        fun(
            "string.sub",
            vec![Type::String, Type::Integer, Type::Integer],
            vec![Type::String],
        );
        fun("string.upper", vec![Type::String], vec![Type::String]);

        // --- table ---
        fun(
            "table.insert",
            vec![Type::array(Type::Any), Type::Any],
            vec![],
        );
        fun("table.remove", vec![Type::array(Type::Any)], vec![Type::Any]);

        Builtins {
            functions,
            modules: vec!["io", "math", "string", "table"],
        }
    }
}
