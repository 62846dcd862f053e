#![forbid(unsafe_code)]

use std::collections::BTreeMap;

/// The closed set of semantic types. Equality (`PartialEq`) is the
/// `equals` relation of the language.
#[derive(Clone, Debug, PartialEq)]
pub enum Type {
    Nil,
    Boolean,
    Integer,
    Float,
    String,
    Any,
    Void,
    Array {
        elem: Box<Type>,
    },
    Table {
        fields: BTreeMap<String, Type>,
    },
    Record {
        name: String,
        field_names: Vec<String>,
        field_types: Vec<Type>,
    },
    Function {
        params: Vec<Type>,
        rets: Vec<Type>,
    },
    Module,
}

impl Type {
    pub fn array(elem: Type) -> Self {
        Type::Array {
            elem: Box::new(elem),
        }
    }

    pub fn function(params: Vec<Type>, rets: Vec<Type>) -> Self {
        Type::Function { params, rets }
    }

    /// Weaker than equality: holds when either side is `any` or the two
    /// types are equal. Drives implicit cast insertion.
    pub fn consistent(&self, other: &Type) -> bool {
        matches!(self, Type::Any) || matches!(other, Type::Any) || self == other
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Type::Integer | Type::Float)
    }

    /// Acceptable in a boolean context (`if`, `while`, `not`, ...).
    pub fn is_condition(&self) -> bool {
        matches!(self, Type::Boolean | Type::Any)
    }

    pub fn is_indexable(&self) -> bool {
        matches!(
            self,
            Type::Table { .. } | Type::Record { .. } | Type::Module
        )
    }

    /// Field-name to type map of an indexable type. Empty for `module`
    /// (module fields live in the symbol table, not in the type).
    pub fn indices(&self) -> BTreeMap<String, Type> {
        match self {
            Type::Table { fields } => fields.clone(),
            Type::Record {
                field_names,
                field_types,
                ..
            } => field_names
                .iter()
                .cloned()
                .zip(field_types.iter().cloned())
                .collect(),
            _ => BTreeMap::new(),
        }
    }

    pub fn display(&self) -> String {
        match self {
            Type::Nil => "nil".to_string(),
            Type::Boolean => "boolean".to_string(),
            Type::Integer => "integer".to_string(),
            Type::Float => "float".to_string(),
            Type::String => "string".to_string(),
            Type::Any => "any".to_string(),
            Type::Void => "void".to_string(),
            Type::Array { elem } => format!("{{ {} }}", elem.display()),
            Type::Table { fields } => {
                let fields_s = fields
                    .iter()
                    .map(|(name, t)| format!("{}: {}", name, t.display()))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("{{ {} }}", fields_s)
            }
            Type::Record { name, .. } => name.clone(),
            Type::Function { params, rets } => {
                let params_s = params
                    .iter()
                    .map(|t| t.display())
                    .collect::<Vec<_>>()
                    .join(", ");
                let rets_s = rets
                    .iter()
                    .map(|t| t.display())
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("({}) -> ({})", params_s, rets_s)
            }
            Type::Module => "module".to_string(),
        }
    }
}

/// What a name in scope resolves to.
#[derive(Clone, Debug, PartialEq)]
pub enum Binding {
    /// A type-level name (primitive, alias, or record).
    Type(Type),
    /// A block-scoped value.
    Local { typ: Type },
    /// A module-level value.
    Global { typ: Type },
    /// A top-level function; never a valid assignment target.
    Function { typ: Type },
    /// An entry of the builtin catalog, keyed by its qualified name.
    Builtin { name: String, typ: Type },
    /// A module name. The main module is the one the program itself
    /// declares; builtin modules exist only for qualified access.
    Module { name: String, main: bool },
}

impl Binding {
    /// The type a reference to this binding evaluates to, when it is a
    /// value at all.
    pub fn value_type(&self) -> Option<&Type> {
        match self {
            Binding::Type(_) => None,
            Binding::Local { typ }
            | Binding::Global { typ }
            | Binding::Function { typ }
            | Binding::Builtin { typ, .. } => Some(typ),
            Binding::Module { .. } => None,
        }
    }
}
