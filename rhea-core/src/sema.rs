#![forbid(unsafe_code)]

use std::collections::{BTreeMap, HashMap, HashSet};

use log::debug;

use rhea_ast::types::{Binding, Type};
use rhea_ast::{
    AssignStat, BinOp, Block, CallId, CallStat, Decl, DeclStat, Exp, ExpKind, Field, ForInStat,
    ForNumStat, FuncCall, FuncDef, IfStat, Lambda, Program, RecordDef, RepeatStat, ReturnStat,
    Span, Stat, TopLevel, TopLevelVar, TypeNodeKind, UnOp, Var, VarKind, WhileStat,
};

use crate::builtins::Builtins;
use crate::error::CheckError;
use crate::symbols::SymbolTable;

/// Checks one module and returns the decorated tree, or the rendered
/// message of the first error found. `source` is the module's text,
/// used only to turn span offsets into line/column positions.
pub fn check_module(prog: Program, filename: &str, source: &str) -> Result<Program, Vec<String>> {
    match Checker::new().check_program(prog) {
        Ok(prog) => Ok(prog),
        Err(err) => Err(vec![err.render(filename, source)]),
    }
}

/// One-shot semantic checker. All mutable state (symbol table,
/// return-types stack, call registry) lives here, so every invocation
/// of `check_program` starts from a clean slate.
pub struct Checker {
    symbols: SymbolTable,
    ret_types: Vec<Vec<Type>>,
    call_types: HashMap<CallId, Vec<Type>>,
    next_call: u32,
    main_module: Option<String>,
    module_fields: HashSet<String>,
    builtins: Builtins,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ItemClass {
    Var,
    Func,
    Type,
    Stat,
    Other,
}

fn item_class(tl: &TopLevel) -> ItemClass {
    match tl {
        TopLevel::Var(_) => ItemClass::Var,
        TopLevel::Func(_) => ItemClass::Func,
        TopLevel::TypeAlias(_) | TopLevel::Record(_) => ItemClass::Type,
        TopLevel::Stat(_) => ItemClass::Stat,
        TopLevel::Import(_) => ItemClass::Other,
    }
}

/// Maximal runs of consecutive top-level items of the same kind.
/// Registration walks these in program order; the groups are also where
/// mutual-recursion analysis would hook in.
fn letrec_groups(tls: &[TopLevel]) -> Vec<(ItemClass, std::ops::Range<usize>)> {
    let mut groups = Vec::new();
    let mut start = 0;
    while start < tls.len() {
        let class = item_class(&tls[start]);
        let mut end = start + 1;
        while end < tls.len() && item_class(&tls[end]) == class {
            end += 1;
        }
        groups.push((class, start..end));
        start = end;
    }
    groups
}

fn exp_type(exp: &Exp) -> &Type {
    exp.typ.as_ref().expect("expression was not typed")
}

fn mixed_numeric(a: &Type, b: &Type) -> bool {
    matches!(
        (a, b),
        (Type::Integer, Type::Float) | (Type::Float, Type::Integer)
    )
}

/// Wraps an integer-typed expression in a float coercion; any other
/// expression passes through untouched.
fn coerce_to_float(exp: Exp) -> Exp {
    if matches!(exp.typ, Some(Type::Integer)) {
        let span = exp.span;
        Exp {
            span,
            typ: Some(Type::Float),
            kind: ExpKind::ToFloat(Box::new(exp)),
        }
    } else {
        exp
    }
}

impl Checker {
    pub fn new() -> Self {
        let builtins = Builtins::standard();
        let mut symbols = SymbolTable::new();

        // Primitive type names. `string` is deliberately absent here:
        // it lives in scope as a module name, and the type resolver
        // maps it to the string type when it appears in type position.
        symbols.add_symbol("any", Binding::Type(Type::Any));
        symbols.add_symbol("boolean", Binding::Type(Type::Boolean));
        symbols.add_symbol("float", Binding::Type(Type::Float));
        symbols.add_symbol("integer", Binding::Type(Type::Integer));

        for (name, typ) in &builtins.functions {
            symbols.add_symbol(
                name.clone(),
                Binding::Builtin {
                    name: name.clone(),
                    typ: typ.clone(),
                },
            );
        }
        for module in &builtins.modules {
            symbols.add_symbol(
                *module,
                Binding::Module {
                    name: module.to_string(),
                    main: false,
                },
            );
        }

        Checker {
            symbols,
            ret_types: Vec::new(),
            call_types: HashMap::new(),
            next_call: 0,
            main_module: None,
            module_fields: HashSet::new(),
            builtins,
        }
    }

    /// Checks a whole program: registers type declarations, walks the
    /// top-level items in source order, and consumes the mandatory
    /// final `return <module>`. On success the returned tree carries a
    /// type on every expression, variable and declaration.
    pub fn check_program(mut self, prog: Program) -> Result<Program, CheckError> {
        let mut tls = prog.tls;
        debug!("checking program with {} top-level items", tls.len());

        for (class, range) in letrec_groups(&tls) {
            match class {
                ItemClass::Type => {
                    for i in range {
                        match &mut tls[i] {
                            TopLevel::TypeAlias(alias) => {
                                let t = self.resolve_type(&alias.target)?;
                                debug!("registered type alias '{}'", alias.name.node);
                                self.symbols
                                    .add_symbol(alias.name.node.clone(), Binding::Type(t));
                            }
                            TopLevel::Record(record) => self.register_record(record)?,
                            _ => unreachable!("non-type item in a type group"),
                        }
                    }
                }
                ItemClass::Other => {
                    let span = tls[range.start].span();
                    return Err(CheckError::Type {
                        message: "module imports are not implemented yet".to_string(),
                        span,
                    });
                }
                ItemClass::Var | ItemClass::Func | ItemClass::Stat => {}
            }
        }

        let count = tls.len();
        if count == 0 {
            return Err(CheckError::Type {
                message: "the program must end with a return statement".to_string(),
                span: rhea_ast::span(0, 0),
            });
        }

        let mut out = Vec::with_capacity(count);
        for (idx, tl) in tls.into_iter().enumerate() {
            if idx + 1 == count {
                // The final item must return the module value. It has
                // served its role once checked, so it is not kept in
                // the decorated tree.
                match tl {
                    TopLevel::Stat(Stat::Return(ret)) => {
                        self.ret_types.push(vec![Type::Module]);
                        let checked = self.check_return(ret);
                        self.ret_types.pop();
                        checked?;
                    }
                    other => {
                        return Err(CheckError::Type {
                            message: "the program must end with a return statement".to_string(),
                            span: other.span(),
                        });
                    }
                }
                break;
            }
            match tl {
                TopLevel::TypeAlias(alias) => out.push(TopLevel::TypeAlias(alias)),
                TopLevel::Record(record) => out.push(TopLevel::Record(record)),
                TopLevel::Import(_) => unreachable!("imports are rejected during grouping"),
                TopLevel::Var(var) => out.push(TopLevel::Var(self.check_toplevel_var(var)?)),
                TopLevel::Func(func) => out.push(TopLevel::Func(self.check_func(func)?)),
                TopLevel::Stat(stat) => {
                    if matches!(stat, Stat::Return(_)) {
                        return Err(CheckError::Type {
                            message: "return statement must be the last statement of the program"
                                .to_string(),
                            span: stat.span(),
                        });
                    }
                    out.push(TopLevel::Stat(self.check_stat(stat, true)?));
                }
            }
        }

        debug!("program checked: {} top-level items decorated", out.len());
        Ok(Program { tls: out })
    }

    fn register_record(&mut self, record: &mut RecordDef) -> Result<(), CheckError> {
        let mut field_names = Vec::with_capacity(record.fields.len());
        let mut field_types = Vec::with_capacity(record.fields.len());
        for field in &mut record.fields {
            let Some(tn) = &field.ty else {
                return Err(CheckError::Type {
                    message: format!("record field '{}' needs a type", field.name),
                    span: field.span,
                });
            };
            let t = self.resolve_type(tn)?;
            if field_names.contains(&field.name) {
                return Err(CheckError::Type {
                    message: format!(
                        "duplicate field '{}' in record '{}'",
                        field.name, record.name.node
                    ),
                    span: field.span,
                });
            }
            field.typ = Some(t.clone());
            field_names.push(field.name.clone());
            field_types.push(t);
        }
        let rt = Type::Record {
            name: record.name.node.clone(),
            field_names,
            field_types,
        };
        record.typ = Some(rt.clone());
        debug!("registered record type '{}'", record.name.node);
        // The name becomes visible only now: a record's fields cannot
        // refer to the record being declared.
        self.symbols
            .add_symbol(record.name.node.clone(), Binding::Type(rt));
        Ok(())
    }

    fn new_call_id(&mut self) -> CallId {
        let id = CallId(self.next_call);
        self.next_call += 1;
        id
    }

    /// Pushes a scope, runs `f`, and pops the scope again on every exit
    /// path, error returns included.
    fn with_block<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, CheckError>,
    ) -> Result<T, CheckError> {
        self.symbols.push_scope();
        let result = f(self);
        self.symbols.pop_scope();
        result
    }

    // --- types ---

    fn resolve_type(&self, tn: &rhea_ast::TypeNode) -> Result<Type, CheckError> {
        match &tn.kind {
            TypeNodeKind::Nil => Ok(Type::Nil),
            TypeNodeKind::Module => Ok(Type::Module),
            TypeNodeKind::Name(name) => match self.symbols.find_symbol(name) {
                Some(Binding::Type(t)) => Ok(t.clone()),
                Some(Binding::Module { name: m, .. }) if m == "string" => Ok(Type::String),
                Some(_) => Err(CheckError::Type {
                    message: format!("'{}' is not a type", name),
                    span: tn.span,
                }),
                None => Err(CheckError::Scope {
                    message: format!("type '{}' is not declared", name),
                    span: tn.span,
                }),
            },
            TypeNodeKind::Array(elem) => Ok(Type::array(self.resolve_type(elem)?)),
            TypeNodeKind::Table(fields) => {
                let mut map = BTreeMap::new();
                for field in fields {
                    let t = self.resolve_type(&field.ty)?;
                    if map.insert(field.name.clone(), t).is_some() {
                        return Err(CheckError::Type {
                            message: format!("duplicate field '{}' in table type", field.name),
                            span: field.span,
                        });
                    }
                }
                Ok(Type::Table { fields: map })
            }
            TypeNodeKind::Function { params, rets } => {
                let params = params
                    .iter()
                    .map(|p| self.resolve_type(p))
                    .collect::<Result<Vec<_>, _>>()?;
                let rets = rets
                    .iter()
                    .map(|r| self.resolve_type(r))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Type::Function { params, rets })
            }
        }
    }

    // --- expressions ---

    /// Type synthesis. Idempotent: an expression that already carries a
    /// type (a call typed during list expansion, for instance) passes
    /// through unchanged. Callers must use the returned expression in
    /// place of the argument; synthesis may rewrite the node.
    fn synth_exp(&mut self, exp: Exp) -> Result<Exp, CheckError> {
        if exp.typ.is_some() {
            return Ok(exp);
        }
        let span = exp.span;
        let (kind, typ) = match exp.kind {
            ExpKind::Nil => (ExpKind::Nil, Type::Nil),
            ExpKind::Bool(b) => (ExpKind::Bool(b), Type::Boolean),
            ExpKind::Integer(n) => (ExpKind::Integer(n), Type::Integer),
            ExpKind::Float(x) => (ExpKind::Float(x), Type::Float),
            ExpKind::Str(s) => (ExpKind::Str(s), Type::String),
            ExpKind::Initlist(_) => {
                return Err(CheckError::Type {
                    message: "initializer list needs a type hint".to_string(),
                    span,
                });
            }
            ExpKind::Lambda(_) => {
                return Err(CheckError::Type {
                    message: "anonymous function needs a type hint".to_string(),
                    span,
                });
            }
            ExpKind::Var(var) => {
                let var = self.check_var(*var)?;
                let typ = var.typ.clone().expect("variable was not typed");
                (ExpKind::Var(Box::new(var)), typ)
            }
            ExpKind::Unop { op, exp: operand } => {
                let operand = self.synth_exp(*operand)?;
                let t = exp_type(&operand);
                let typ = match op {
                    UnOp::Len => {
                        if !matches!(t, Type::Array { .. } | Type::String) {
                            return Err(CheckError::Type {
                                message: format!(
                                    "trying to take the length of a {} instead of an array or string",
                                    t.display()
                                ),
                                span: operand.span,
                            });
                        }
                        Type::Integer
                    }
                    UnOp::Neg => {
                        if !t.is_numeric() {
                            return Err(CheckError::Type {
                                message: format!(
                                    "trying to negate a {} instead of a number",
                                    t.display()
                                ),
                                span: operand.span,
                            });
                        }
                        t.clone()
                    }
                    UnOp::BNot => {
                        if !matches!(t, Type::Integer) {
                            return Err(CheckError::Type {
                                message: format!(
                                    "trying to bitwise negate a {} instead of an integer",
                                    t.display()
                                ),
                                span: operand.span,
                            });
                        }
                        Type::Integer
                    }
                    UnOp::Not => {
                        self.check_condition(&operand, "'not' operand")?;
                        Type::Boolean
                    }
                };
                (
                    ExpKind::Unop {
                        op,
                        exp: Box::new(operand),
                    },
                    typ,
                )
            }
            ExpKind::Binop { op, lhs, rhs } => {
                let lhs = self.synth_exp(*lhs)?;
                let rhs = self.synth_exp(*rhs)?;
                let (lhs, rhs, typ) = self.check_binop(op, lhs, rhs, span)?;
                (
                    ExpKind::Binop {
                        op,
                        lhs: Box::new(lhs),
                        rhs: Box::new(rhs),
                    },
                    typ,
                )
            }
            ExpKind::CallFunc(call) => {
                let FuncCall { callee, args, .. } = *call;
                let callee = self.synth_exp(callee)?;
                let (params, rets) = match exp_type(&callee) {
                    Type::Function { params, rets } => (params.clone(), rets.clone()),
                    t => {
                        return Err(CheckError::Type {
                            message: format!(
                                "trying to call a {} instead of a function",
                                t.display()
                            ),
                            span: callee.span,
                        });
                    }
                };
                let args = self.expand_function_returns(args)?;
                if args.len() != params.len() {
                    return Err(CheckError::Type {
                        message: format!(
                            "function expects {} arguments but received {}",
                            params.len(),
                            args.len()
                        ),
                        span,
                    });
                }
                let mut checked = Vec::with_capacity(args.len());
                for (i, (arg, param)) in args.into_iter().zip(&params).enumerate() {
                    checked.push(self.verify_exp(
                        arg,
                        param,
                        &format!("argument {} of call", i + 1),
                    )?);
                }
                let id = self.new_call_id();
                self.call_types.insert(id, rets.clone());
                let typ = rets.first().cloned().unwrap_or(Type::Void);
                (
                    ExpKind::CallFunc(Box::new(FuncCall {
                        id: Some(id),
                        callee,
                        args: checked,
                        types: rets,
                    })),
                    typ,
                )
            }
            ExpKind::CallMethod(_) => {
                return Err(CheckError::Type {
                    message: "method calls are not implemented yet".to_string(),
                    span,
                });
            }
            ExpKind::Cast { exp: inner, target } => {
                let t = match &target {
                    Some(tn) => self.resolve_type(tn)?,
                    None => unreachable!("implicit cast reached synthesis without a type"),
                };
                let mut inner = self.verify_exp(*inner, &t, "cast")?;
                // Peel implicit casts directly under an explicit one;
                // the outer cast carries the source location.
                while matches!(&inner.kind, ExpKind::Cast { target: None, .. })
                    && inner.typ.as_ref() == Some(&t)
                {
                    match inner.kind {
                        ExpKind::Cast { exp, .. } => inner = *exp,
                        _ => unreachable!(),
                    }
                }
                (
                    ExpKind::Cast {
                        exp: Box::new(inner),
                        target,
                    },
                    t,
                )
            }
            ExpKind::Paren(inner) => {
                let inner = self.synth_exp(*inner)?;
                let typ = exp_type(&inner).clone();
                (ExpKind::Paren(Box::new(inner)), typ)
            }
            ExpKind::ExtraRet { call, index } => {
                let types = self
                    .call_types
                    .get(&call)
                    .expect("extra return refers to an unchecked call");
                let typ = types
                    .get(index)
                    .cloned()
                    .expect("extra return index out of range");
                (ExpKind::ExtraRet { call, index }, typ)
            }
            ExpKind::ToFloat(inner) => {
                let inner = self.synth_exp(*inner)?;
                assert!(
                    matches!(exp_type(&inner), Type::Integer),
                    "tofloat applied to a non-integer expression"
                );
                (ExpKind::ToFloat(Box::new(inner)), Type::Float)
            }
        };
        Ok(Exp {
            span,
            typ: Some(typ),
            kind,
        })
    }

    fn check_binop(
        &mut self,
        op: BinOp,
        lhs: Exp,
        rhs: Exp,
        span: Span,
    ) -> Result<(Exp, Exp, Type), CheckError> {
        let lt = exp_type(&lhs).clone();
        let rt = exp_type(&rhs).clone();
        match op {
            BinOp::Eq | BinOp::Ne => {
                if mixed_numeric(&lt, &rt) {
                    return Err(CheckError::Type {
                        message: "comparisons between float and integers are not yet implemented"
                            .to_string(),
                        span,
                    });
                }
                if lt != rt {
                    return Err(CheckError::Type {
                        message: format!(
                            "trying to compare a {} with a {}",
                            lt.display(),
                            rt.display()
                        ),
                        span,
                    });
                }
                Ok((lhs, rhs, Type::Boolean))
            }
            BinOp::Lt | BinOp::Gt | BinOp::Le | BinOp::Ge => match (&lt, &rt) {
                (Type::Integer, Type::Integer)
                | (Type::Float, Type::Float)
                | (Type::String, Type::String) => Ok((lhs, rhs, Type::Boolean)),
                (Type::Integer, Type::Float) | (Type::Float, Type::Integer) => {
                    Err(CheckError::Type {
                        message: "comparisons between float and integers are not yet implemented"
                            .to_string(),
                        span,
                    })
                }
                _ => Err(CheckError::Type {
                    message: format!(
                        "trying to compare a {} with a {}",
                        lt.display(),
                        rt.display()
                    ),
                    span,
                }),
            },
            BinOp::Add | BinOp::Sub | BinOp::Mul | BinOp::Mod | BinOp::IDiv => {
                self.check_numeric_operand(op, "left", &lt, lhs.span)?;
                self.check_numeric_operand(op, "right", &rt, rhs.span)?;
                if matches!(lt, Type::Integer) && matches!(rt, Type::Integer) {
                    Ok((lhs, rhs, Type::Integer))
                } else {
                    Ok((coerce_to_float(lhs), coerce_to_float(rhs), Type::Float))
                }
            }
            BinOp::Div | BinOp::Pow => {
                self.check_numeric_operand(op, "left", &lt, lhs.span)?;
                self.check_numeric_operand(op, "right", &rt, rhs.span)?;
                Ok((coerce_to_float(lhs), coerce_to_float(rhs), Type::Float))
            }
            BinOp::Concat => {
                if !matches!(lt, Type::String) {
                    return Err(CheckError::Type {
                        message: format!(
                            "left operand of '..' is a {} instead of a string",
                            lt.display()
                        ),
                        span: lhs.span,
                    });
                }
                if !matches!(rt, Type::String) {
                    return Err(CheckError::Type {
                        message: format!(
                            "right operand of '..' is a {} instead of a string",
                            rt.display()
                        ),
                        span: rhs.span,
                    });
                }
                Ok((lhs, rhs, Type::String))
            }
            BinOp::And | BinOp::Or => {
                // The result adopts the right-hand type, which keeps
                // `x and y` usable in further boolean contexts.
                self.check_condition(&lhs, &format!("left operand of '{}'", op.symbol()))?;
                self.check_condition(&rhs, &format!("right operand of '{}'", op.symbol()))?;
                Ok((lhs, rhs, rt))
            }
            BinOp::BOr | BinOp::BAnd | BinOp::BXor | BinOp::Shl | BinOp::Shr => {
                if !matches!(lt, Type::Integer) {
                    return Err(CheckError::Type {
                        message: format!(
                            "left operand of '{}' is a {} instead of an integer",
                            op.symbol(),
                            lt.display()
                        ),
                        span: lhs.span,
                    });
                }
                if !matches!(rt, Type::Integer) {
                    return Err(CheckError::Type {
                        message: format!(
                            "right operand of '{}' is a {} instead of an integer",
                            op.symbol(),
                            rt.display()
                        ),
                        span: rhs.span,
                    });
                }
                Ok((lhs, rhs, Type::Integer))
            }
        }
    }

    fn check_numeric_operand(
        &self,
        op: BinOp,
        side: &str,
        t: &Type,
        span: Span,
    ) -> Result<(), CheckError> {
        if !t.is_numeric() {
            return Err(CheckError::Type {
                message: format!(
                    "{} operand of '{}' is a {} instead of a number",
                    side,
                    op.symbol(),
                    t.display()
                ),
                span,
            });
        }
        Ok(())
    }

    fn check_condition(&self, exp: &Exp, what: &str) -> Result<(), CheckError> {
        let t = exp_type(exp);
        if !t.is_condition() {
            return Err(CheckError::Type {
                message: format!("{} is a {} instead of a boolean", what, t.display()),
                span: exp.span,
            });
        }
        Ok(())
    }

    /// Checks an expression against an expected type. Equal types pass
    /// through; consistent-but-unequal types are wrapped in an implicit
    /// cast; anything else is a type error quoting `ctx`. Callers must
    /// use the returned expression in place of the argument.
    fn verify_exp(&mut self, exp: Exp, expected: &Type, ctx: &str) -> Result<Exp, CheckError> {
        match exp.kind {
            ExpKind::Initlist(_) => self.verify_initlist(exp, expected),
            ExpKind::Lambda(_) => self.verify_lambda(exp, expected),
            ExpKind::Paren(inner) => {
                let inner = self.verify_exp(*inner, expected, ctx)?;
                let typ = inner.typ.clone();
                Ok(Exp {
                    span: exp.span,
                    typ,
                    kind: ExpKind::Paren(Box::new(inner)),
                })
            }
            _ => {
                let exp = self.synth_exp(exp)?;
                let found = exp_type(&exp);
                if found == expected {
                    Ok(exp)
                } else if found.consistent(expected) {
                    let span = exp.span;
                    Ok(Exp {
                        span,
                        typ: Some(expected.clone()),
                        kind: ExpKind::Cast {
                            exp: Box::new(exp),
                            target: None,
                        },
                    })
                } else {
                    Err(CheckError::Type {
                        message: format!(
                            "expected {} but found {} in {}",
                            expected.display(),
                            found.display(),
                            ctx
                        ),
                        span: exp.span,
                    })
                }
            }
        }
    }

    fn verify_initlist(&mut self, exp: Exp, expected: &Type) -> Result<Exp, CheckError> {
        let span = exp.span;
        let ExpKind::Initlist(fields) = exp.kind else {
            unreachable!("verify_initlist on a non-initializer")
        };
        match expected {
            Type::Array { elem } => {
                let mut out = Vec::with_capacity(fields.len());
                for field in fields {
                    match field {
                        Field::List { span: fspan, exp: e } => {
                            let e = self.verify_exp(e, elem, "array initializer")?;
                            out.push(Field::List { span: fspan, exp: e });
                        }
                        Field::Rec { span: fspan, name, .. } => {
                            return Err(CheckError::Type {
                                message: format!(
                                    "named field '{}' in array initializer",
                                    name.node
                                ),
                                span: fspan,
                            });
                        }
                    }
                }
                Ok(Exp {
                    span,
                    typ: Some(expected.clone()),
                    kind: ExpKind::Initlist(out),
                })
            }
            t if t.is_indexable() => {
                let declared = t.indices();
                let mut seen = HashSet::new();
                let mut out = Vec::with_capacity(fields.len());
                for field in fields {
                    match field {
                        Field::Rec {
                            span: fspan,
                            name,
                            exp: e,
                        } => {
                            if !seen.insert(name.node.clone()) {
                                return Err(CheckError::Type {
                                    message: format!(
                                        "duplicate field '{}' in initializer",
                                        name.node
                                    ),
                                    span: fspan,
                                });
                            }
                            let Some(ft) = declared.get(&name.node) else {
                                return Err(CheckError::Type {
                                    message: format!(
                                        "field '{}' does not exist in type {}",
                                        name.node,
                                        t.display()
                                    ),
                                    span: fspan,
                                });
                            };
                            let e = self.verify_exp(
                                e,
                                ft,
                                &format!("field '{}' of initializer", name.node),
                            )?;
                            out.push(Field::Rec {
                                span: fspan,
                                name,
                                exp: e,
                            });
                        }
                        Field::List { span: fspan, .. } => {
                            return Err(CheckError::Type {
                                message: format!(
                                    "initializer entry for {} must be a named field",
                                    t.display()
                                ),
                                span: fspan,
                            });
                        }
                    }
                }
                for name in declared.keys() {
                    if !seen.contains(name) {
                        return Err(CheckError::Type {
                            message: format!(
                                "required field '{}' is missing from initializer",
                                name
                            ),
                            span,
                        });
                    }
                }
                Ok(Exp {
                    span,
                    typ: Some(expected.clone()),
                    kind: ExpKind::Initlist(out),
                })
            }
            _ => Err(CheckError::Type {
                message: format!("initializer list is not valid for type {}", expected.display()),
                span,
            }),
        }
    }

    fn verify_lambda(&mut self, exp: Exp, expected: &Type) -> Result<Exp, CheckError> {
        let span = exp.span;
        let ExpKind::Lambda(lambda) = exp.kind else {
            unreachable!("verify_lambda on a non-lambda")
        };
        let Type::Function { params, rets } = expected else {
            return Err(CheckError::Type {
                message: format!("anonymous function cannot have type {}", expected.display()),
                span,
            });
        };
        let Lambda { args, body } = *lambda;
        if args.len() != params.len() {
            return Err(CheckError::Type {
                message: format!(
                    "function has {} parameters but its type expects {}",
                    args.len(),
                    params.len()
                ),
                span,
            });
        }
        self.ret_types.push(rets.clone());
        let params = params.clone();
        let result = self.with_block(move |c| {
            let mut bound = Vec::with_capacity(args.len());
            for (mut decl, param) in args.into_iter().zip(params) {
                decl.typ = Some(param.clone());
                c.symbols
                    .add_symbol(decl.name.clone(), Binding::Local { typ: param });
                bound.push(decl);
            }
            let Block { span: bspan, stats } = body;
            let mut out = Vec::with_capacity(stats.len());
            for stat in stats {
                out.push(c.check_stat(stat, false)?);
            }
            Ok((
                bound,
                Block {
                    span: bspan,
                    stats: out,
                },
            ))
        });
        self.ret_types.pop();
        let (args, body) = result?;
        Ok(Exp {
            span,
            typ: Some(expected.clone()),
            kind: ExpKind::Lambda(Box::new(Lambda { args, body })),
        })
    }

    // --- variables ---

    fn check_var(&mut self, var: Var) -> Result<Var, CheckError> {
        let span = var.span;
        match var.kind {
            VarKind::Name { name, .. } => {
                let Some(binding) = self.symbols.find_symbol(&name) else {
                    return Err(CheckError::Scope {
                        message: format!("variable '{}' is not declared", name),
                        span,
                    });
                };
                let binding = binding.clone();
                let typ = match &binding {
                    Binding::Type(_) => {
                        return Err(CheckError::Type {
                            message: format!("'{}' is not a value", name),
                            span,
                        });
                    }
                    Binding::Local { typ }
                    | Binding::Global { typ }
                    | Binding::Function { typ }
                    | Binding::Builtin { typ, .. } => typ.clone(),
                    Binding::Module { main: true, .. } => Type::Module,
                    Binding::Module { main: false, name: m } => {
                        return Err(CheckError::Type {
                            message: format!(
                                "cannot reference module name '{}' without dot notation",
                                m
                            ),
                            span,
                        });
                    }
                };
                Ok(Var {
                    span,
                    typ: Some(typ),
                    kind: VarKind::Name {
                        name,
                        binding: Some(binding),
                    },
                })
            }
            VarKind::Dot { exp, field } => self.check_dot(span, *exp, field),
            VarKind::Bracket { array, index } => {
                let array = self.synth_exp(*array)?;
                let elem = match exp_type(&array) {
                    Type::Array { elem } => (**elem).clone(),
                    t => {
                        return Err(CheckError::Type {
                            message: format!(
                                "expression being indexed is a {} instead of an array",
                                t.display()
                            ),
                            span: array.span,
                        });
                    }
                };
                let index = self.verify_exp(*index, &Type::Integer, "array indexing")?;
                Ok(Var {
                    span,
                    typ: Some(elem),
                    kind: VarKind::Bracket {
                        array: Box::new(array),
                        index: Box::new(index),
                    },
                })
            }
        }
    }

    /// Member access. Qualified references to module names flatten into
    /// plain names carrying the combined `"module.field"`; everything
    /// else resolves through the indexable type of the base expression.
    fn check_dot(&mut self, span: Span, exp: Exp, field: String) -> Result<Var, CheckError> {
        if let ExpKind::Var(v) = &exp.kind {
            if let VarKind::Name { name, .. } = &v.kind {
                if let Some(Binding::Module {
                    name: modname,
                    main,
                }) = self.symbols.find_symbol(name)
                {
                    let modname = modname.clone();
                    let main = *main;
                    let full = format!("{}.{}", modname, field);
                    let (binding, typ) = if main {
                        let Some(binding) = self.symbols.find_symbol(&full) else {
                            return Err(CheckError::Scope {
                                message: format!("module field '{}' is not declared", full),
                                span,
                            });
                        };
                        let binding = binding.clone();
                        let typ = binding
                            .value_type()
                            .cloned()
                            .expect("module field binding has no value type");
                        (binding, typ)
                    } else {
                        let Some(typ) = self.builtins.functions.get(&full) else {
                            return Err(CheckError::Type {
                                message: format!("unknown function '{}'", full),
                                span,
                            });
                        };
                        (
                            Binding::Builtin {
                                name: full.clone(),
                                typ: typ.clone(),
                            },
                            typ.clone(),
                        )
                    };
                    return Ok(Var {
                        span,
                        typ: Some(typ),
                        kind: VarKind::Name {
                            name: full,
                            binding: Some(binding),
                        },
                    });
                }
            }
        }

        let exp = self.synth_exp(exp)?;
        let t = exp_type(&exp);
        if !t.is_indexable() {
            return Err(CheckError::Type {
                message: format!("trying to index a value of type {}", t.display()),
                span: exp.span,
            });
        }
        let Some(typ) = t.indices().get(&field).cloned() else {
            return Err(CheckError::Type {
                message: format!("field '{}' does not exist in type {}", field, t.display()),
                span,
            });
        };
        Ok(Var {
            span,
            typ: Some(typ),
            kind: VarKind::Dot {
                exp: Box::new(exp),
                field,
            },
        })
    }

    // --- multi-value expansion ---

    /// When an expression list ends in a call, the call's whole return
    /// tuple flows into the list: the call is typed here and one node
    /// per extra return value is appended after it.
    fn expand_function_returns(&mut self, mut exps: Vec<Exp>) -> Result<Vec<Exp>, CheckError> {
        let ends_with_call = matches!(
            exps.last(),
            Some(e) if matches!(e.kind, ExpKind::CallFunc(_))
        );
        if !ends_with_call {
            return Ok(exps);
        }
        let last = exps.pop().expect("list checked non-empty");
        let last = self.synth_exp(last)?;
        let (id, types, span) = match &last.kind {
            ExpKind::CallFunc(call) => (
                call.id.expect("typed call has no id"),
                call.types.clone(),
                last.span,
            ),
            _ => unreachable!("call changed shape during synthesis"),
        };
        exps.push(last);
        for index in 1..types.len() {
            exps.push(Exp {
                span,
                typ: Some(types[index].clone()),
                kind: ExpKind::ExtraRet { call: id, index },
            });
        }
        Ok(exps)
    }

    // --- declarations ---

    /// A declaration with a type annotation resolves it and verifies
    /// the initializer against it; one without infers from the
    /// initializer, which must then be present.
    fn check_initializer(
        &mut self,
        decl: &mut Decl,
        init: Option<Exp>,
        ctx: &str,
    ) -> Result<Option<Exp>, CheckError> {
        if let Some(tn) = &decl.ty {
            let t = self.resolve_type(tn)?;
            decl.typ = Some(t.clone());
            match init {
                Some(e) => Ok(Some(self.verify_exp(e, &t, ctx)?)),
                None => Ok(None),
            }
        } else {
            let Some(e) = init else {
                return Err(CheckError::Type {
                    message: format!("variable '{}' needs a type annotation", decl.name),
                    span: decl.span,
                });
            };
            let e = self.synth_exp(e)?;
            decl.typ = e.typ.clone();
            Ok(Some(e))
        }
    }

    fn bind_decl(&mut self, decl: &Decl, toplevel: bool) -> Result<(), CheckError> {
        let typ = decl.typ.clone().expect("declaration was not typed");
        if let Some(modname) = &decl.modname {
            let modname = modname.clone();
            return self.declare_module_field(
                &modname,
                &decl.name,
                Binding::Global { typ },
                decl.span,
            );
        }
        if toplevel {
            if typ == Type::Module {
                if self.main_module.is_some() {
                    return Err(CheckError::Type {
                        message: "a program may declare only one module".to_string(),
                        span: decl.span,
                    });
                }
                self.main_module = Some(decl.name.clone());
                self.symbols.add_symbol(
                    decl.name.clone(),
                    Binding::Module {
                        name: decl.name.clone(),
                        main: true,
                    },
                );
            } else {
                self.symbols
                    .add_symbol(decl.name.clone(), Binding::Global { typ });
            }
        } else {
            self.symbols
                .add_symbol(decl.name.clone(), Binding::Local { typ });
        }
        Ok(())
    }

    /// Module fields are collected in their own map so redeclaration is
    /// caught even though the symbol table itself allows rebinding.
    fn declare_module_field(
        &mut self,
        modname: &str,
        field: &str,
        binding: Binding,
        span: Span,
    ) -> Result<(), CheckError> {
        let full = format!("{}.{}", modname, field);
        if !self.module_fields.insert(full.clone()) {
            return Err(CheckError::Type {
                message: format!("redeclaration of module field '{}'", full),
                span,
            });
        }
        debug!("declared module field '{}'", full);
        self.symbols.add_symbol(full, binding);
        Ok(())
    }

    // --- statements ---

    fn check_stat(&mut self, stat: Stat, toplevel: bool) -> Result<Stat, CheckError> {
        match stat {
            Stat::Decl(d) => Ok(Stat::Decl(self.check_decl_stat(d, toplevel)?)),
            Stat::Block(b) => Ok(Stat::Block(self.check_block(b)?)),
            Stat::While(w) => {
                let WhileStat { span, cond, block } = w;
                let cond = self.synth_exp(cond)?;
                self.check_condition(&cond, "'while' condition")?;
                let block = self.check_block(block)?;
                Ok(Stat::While(WhileStat { span, cond, block }))
            }
            Stat::Repeat(r) => {
                let RepeatStat { span, block, cond } = r;
                // the condition sees the block's own locals
                let (block, cond) = self.with_block(move |c| {
                    let Block { span: bspan, stats } = block;
                    let mut out = Vec::with_capacity(stats.len());
                    for stat in stats {
                        out.push(c.check_stat(stat, false)?);
                    }
                    let cond = c.synth_exp(cond)?;
                    c.check_condition(&cond, "'repeat' condition")?;
                    Ok((
                        Block {
                            span: bspan,
                            stats: out,
                        },
                        cond,
                    ))
                })?;
                Ok(Stat::Repeat(RepeatStat { span, block, cond }))
            }
            Stat::If(i) => {
                let IfStat {
                    span,
                    cond,
                    then_block,
                    else_block,
                } = i;
                let cond = self.synth_exp(cond)?;
                self.check_condition(&cond, "'if' condition")?;
                let then_block = self.check_block(then_block)?;
                let else_block = match else_block {
                    Some(b) => Some(self.check_block(b)?),
                    None => None,
                };
                Ok(Stat::If(IfStat {
                    span,
                    cond,
                    then_block,
                    else_block,
                }))
            }
            Stat::ForNum(f) => Ok(Stat::ForNum(Box::new(self.check_fornum(*f)?))),
            Stat::ForIn(f) => Ok(Stat::ForIn(self.check_forin(f)?)),
            Stat::Assign(a) => self.check_assign(a, toplevel),
            Stat::Call(c) => {
                let CallStat { span, call } = c;
                let call = self.synth_exp(call)?;
                Ok(Stat::Call(CallStat { span, call }))
            }
            Stat::Return(r) => Ok(Stat::Return(self.check_return(r)?)),
            Stat::Break(span) => Ok(Stat::Break(span)),
        }
    }

    fn check_block(&mut self, block: Block) -> Result<Block, CheckError> {
        let Block { span, stats } = block;
        self.with_block(move |c| {
            let mut out = Vec::with_capacity(stats.len());
            for stat in stats {
                out.push(c.check_stat(stat, false)?);
            }
            Ok(Block { span, stats: out })
        })
    }

    fn check_decl_stat(&mut self, d: DeclStat, toplevel: bool) -> Result<DeclStat, CheckError> {
        let DeclStat { span, decls, exps } = d;
        let exps = self.expand_function_returns(exps)?;
        let mut checked_exps = Vec::with_capacity(exps.len());
        let mut checked_decls = Vec::with_capacity(decls.len());
        let mut exp_iter = exps.into_iter();
        for mut decl in decls {
            let ctx = format!("declaration of '{}'", decl.name);
            if let Some(e) = self.check_initializer(&mut decl, exp_iter.next(), &ctx)? {
                checked_exps.push(e);
            }
            checked_decls.push(decl);
        }
        // surplus values are typed and then discarded at runtime
        for e in exp_iter {
            checked_exps.push(self.synth_exp(e)?);
        }
        for decl in &checked_decls {
            self.bind_decl(decl, toplevel)?;
        }
        Ok(DeclStat {
            span,
            decls: checked_decls,
            exps: checked_exps,
        })
    }

    fn check_fornum(&mut self, f: ForNumStat) -> Result<ForNumStat, CheckError> {
        let ForNumStat {
            span,
            mut decl,
            start,
            limit,
            step,
            block,
        } = f;
        let start = self
            .check_initializer(&mut decl, Some(start), "'for' initializer")?
            .expect("numeric 'for' always has an initializer");
        let loop_t = decl.typ.clone().expect("loop variable was not typed");
        if !loop_t.is_numeric() {
            return Err(CheckError::Type {
                message: format!(
                    "'for' control variable '{}' must be an integer or a float, found {}",
                    decl.name,
                    loop_t.display()
                ),
                span: decl.span,
            });
        }
        let step = match step {
            Some(step) => step,
            None => {
                // default step is 1, at the limit's location
                let kind = match loop_t {
                    Type::Integer => ExpKind::Integer(1),
                    _ => ExpKind::Float(1.0),
                };
                Exp::new(limit.span, kind)
            }
        };
        let limit = self.verify_exp(limit, &loop_t, "'for' loop limit")?;
        let step = self.verify_exp(step, &loop_t, "'for' loop step")?;
        let (decl, block) = self.with_block(move |c| {
            c.bind_decl(&decl, false)?;
            let Block { span: bspan, stats } = block;
            let mut out = Vec::with_capacity(stats.len());
            for stat in stats {
                out.push(c.check_stat(stat, false)?);
            }
            Ok((
                decl,
                Block {
                    span: bspan,
                    stats: out,
                },
            ))
        })?;
        Ok(ForNumStat {
            span,
            decl,
            start,
            limit,
            step: Some(step),
            block,
        })
    }

    fn check_forin(&mut self, f: ForInStat) -> Result<ForInStat, CheckError> {
        let ForInStat {
            span,
            decls,
            exps,
            block,
        } = f;
        let exps = self.expand_function_returns(exps)?;
        if exps.len() < 3 {
            return Err(CheckError::Type {
                message: "'for' loop needs an iterator, a state, and a control value".to_string(),
                span,
            });
        }
        let mut checked = Vec::with_capacity(exps.len());
        for e in exps {
            checked.push(self.synth_exp(e)?);
        }
        let (params, rets) = match exp_type(&checked[0]) {
            Type::Function { params, rets } => (params.clone(), rets.clone()),
            t => {
                return Err(CheckError::Type {
                    message: format!("'for' iterator is a {} instead of a function", t.display()),
                    span: checked[0].span,
                });
            }
        };
        if params != [Type::Any, Type::Any] {
            return Err(CheckError::Type {
                message: "'for' iterator must take two 'any' parameters".to_string(),
                span: checked[0].span,
            });
        }
        if rets.len() != decls.len() {
            return Err(CheckError::Type {
                message: format!(
                    "'for' iterator returns {} values but the loop declares {} variables",
                    rets.len(),
                    decls.len()
                ),
                span,
            });
        }
        for (i, what) in [(1, "loop state value"), (2, "loop control value")] {
            let t = exp_type(&checked[i]);
            if !matches!(t, Type::Any) {
                return Err(CheckError::Type {
                    message: format!("expected any but found {} in {}", t.display(), what),
                    span: checked[i].span,
                });
            }
        }
        let mut bound = Vec::with_capacity(decls.len());
        for (mut decl, ret) in decls.into_iter().zip(rets) {
            match &decl.ty {
                Some(tn) => {
                    let t = self.resolve_type(tn)?;
                    if !t.consistent(&ret) {
                        return Err(CheckError::Type {
                            message: format!(
                                "'for' variable '{}' has type {} but the iterator returns {}",
                                decl.name,
                                t.display(),
                                ret.display()
                            ),
                            span: decl.span,
                        });
                    }
                    decl.typ = Some(t);
                }
                None => decl.typ = Some(ret),
            }
            bound.push(decl);
        }
        let (bound, block) = self.with_block(move |c| {
            for decl in &bound {
                c.bind_decl(decl, false)?;
            }
            let Block { span: bspan, stats } = block;
            let mut out = Vec::with_capacity(stats.len());
            for stat in stats {
                out.push(c.check_stat(stat, false)?);
            }
            Ok((
                bound,
                Block {
                    span: bspan,
                    stats: out,
                },
            ))
        })?;
        Ok(ForInStat {
            span,
            decls: bound,
            exps: checked,
            block,
        })
    }

    /// A dotted target on the program's module turns the assignment
    /// into the declaration of a module field and restarts checking as
    /// such; the rewritten statement replaces the assignment. Everything
    /// else is an ordinary assignment.
    fn check_assign(&mut self, a: AssignStat, toplevel: bool) -> Result<Stat, CheckError> {
        let AssignStat {
            span,
            mut vars,
            exps,
        } = a;
        if let Some((modname, field)) = vars.iter().find_map(|v| self.main_module_field(v)) {
            if vars.len() != 1 {
                return Err(CheckError::Type {
                    message: "a module field declaration cannot be part of a multiple assignment"
                        .to_string(),
                    span,
                });
            }
            let var = vars.pop().expect("length checked above");
            let mut decl = Decl::new(var.span, field, None);
            decl.modname = Some(modname);
            return self.check_stat(
                Stat::Decl(DeclStat {
                    span,
                    decls: vec![decl],
                    exps,
                }),
                toplevel,
            );
        }

        let exps = self.expand_function_returns(exps)?;
        if exps.len() < vars.len() {
            return Err(CheckError::Type {
                message: format!(
                    "assignment has {} targets but {} values",
                    vars.len(),
                    exps.len()
                ),
                span,
            });
        }
        let mut out_vars = Vec::with_capacity(vars.len());
        let mut out_exps = Vec::with_capacity(exps.len());
        let mut exp_iter = exps.into_iter();
        for var in vars {
            let var = self.check_var(var)?;
            if let VarKind::Name {
                name,
                binding: Some(binding),
            } = &var.kind
            {
                if matches!(
                    binding,
                    Binding::Function { .. } | Binding::Builtin { .. }
                ) {
                    return Err(CheckError::Type {
                        message: format!("cannot assign to the function '{}'", name),
                        span: var.span,
                    });
                }
            }
            let expected = var.typ.clone().expect("assignment target was not typed");
            let e = exp_iter.next().expect("arity checked above");
            out_exps.push(self.verify_exp(e, &expected, "assignment")?);
            out_vars.push(var);
        }
        for e in exp_iter {
            out_exps.push(self.synth_exp(e)?);
        }
        Ok(Stat::Assign(AssignStat {
            span,
            vars: out_vars,
            exps: out_exps,
        }))
    }

    fn main_module_field(&self, var: &Var) -> Option<(String, String)> {
        let VarKind::Dot { exp, field } = &var.kind else {
            return None;
        };
        let ExpKind::Var(inner) = &exp.kind else {
            return None;
        };
        let VarKind::Name { name, .. } = &inner.kind else {
            return None;
        };
        match self.symbols.find_symbol(name) {
            Some(Binding::Module {
                name: modname,
                main: true,
            }) => Some((modname.clone(), field.clone())),
            _ => None,
        }
    }

    fn check_return(&mut self, r: ReturnStat) -> Result<ReturnStat, CheckError> {
        let ReturnStat { span, exps } = r;
        let Some(expected) = self.ret_types.last().cloned() else {
            return Err(CheckError::Type {
                message: "return statement outside of a function".to_string(),
                span,
            });
        };
        let exps = self.expand_function_returns(exps)?;
        if exps.len() != expected.len() {
            return Err(CheckError::Type {
                message: format!(
                    "returning {} value(s) but {} expected",
                    exps.len(),
                    expected.len()
                ),
                span,
            });
        }
        let mut out = Vec::with_capacity(exps.len());
        for (i, (e, t)) in exps.into_iter().zip(&expected).enumerate() {
            out.push(self.verify_exp(e, t, &format!("return value {}", i + 1))?);
        }
        Ok(ReturnStat { span, exps: out })
    }

    // --- top-level items ---

    fn check_toplevel_var(&mut self, v: TopLevelVar) -> Result<TopLevelVar, CheckError> {
        let TopLevelVar {
            span,
            mut decl,
            value,
        } = v;
        let ctx = format!("declaration of '{}'", decl.name);
        let value = self
            .check_initializer(&mut decl, Some(value), &ctx)?
            .expect("top-level declaration has an initializer");
        self.bind_decl(&decl, true)?;
        Ok(TopLevelVar { span, decl, value })
    }

    fn check_func(&mut self, f: FuncDef) -> Result<FuncDef, CheckError> {
        let FuncDef {
            span,
            name,
            mut decl,
            value,
        } = f;
        let Some(tn) = &decl.ty else {
            return Err(CheckError::Type {
                message: "function declaration needs a type".to_string(),
                span: decl.span,
            });
        };
        let t = self.resolve_type(tn)?;
        if !matches!(t, Type::Function { .. }) {
            return Err(CheckError::Type {
                message: format!(
                    "function is declared with a non-function type {}",
                    t.display()
                ),
                span: decl.span,
            });
        }
        decl.typ = Some(t.clone());

        // Resolve the (possibly module-qualified) name and bind it
        // before checking the body, so the function can call itself.
        let Var {
            span: name_span,
            kind: name_kind,
            ..
        } = name;
        let name = match name_kind {
            VarKind::Name { name, .. } => {
                self.symbols
                    .add_symbol(name.clone(), Binding::Function { typ: t.clone() });
                let binding = self.symbols.find_symbol(&name).cloned();
                Var {
                    span: name_span,
                    typ: Some(t.clone()),
                    kind: VarKind::Name { name, binding },
                }
            }
            VarKind::Dot { exp, field } => {
                let owner = match &exp.kind {
                    ExpKind::Var(v) => match &v.kind {
                        VarKind::Name { name, .. } => Some(name.clone()),
                        _ => None,
                    },
                    _ => None,
                };
                let Some(owner) = owner else {
                    return Err(CheckError::Type {
                        message: "invalid function name".to_string(),
                        span: name_span,
                    });
                };
                let owner_binding = self.symbols.find_symbol(&owner).cloned();
                match owner_binding {
                    Some(Binding::Module {
                        main: true,
                        name: modname,
                    }) => {
                        decl.modname = Some(modname.clone());
                        let full = format!("{}.{}", modname, field);
                        self.declare_module_field(
                            &modname,
                            &field,
                            Binding::Function { typ: t.clone() },
                            name_span,
                        )?;
                        let binding = self.symbols.find_symbol(&full).cloned();
                        Var {
                            span: name_span,
                            typ: Some(t.clone()),
                            kind: VarKind::Name {
                                name: full,
                                binding,
                            },
                        }
                    }
                    Some(Binding::Module { main: false, .. }) => {
                        return Err(CheckError::Type {
                            message: format!("cannot declare a function in module '{}'", owner),
                            span: name_span,
                        });
                    }
                    Some(_) => {
                        return Err(CheckError::Type {
                            message: format!("'{}' is not a module", owner),
                            span: name_span,
                        });
                    }
                    None => {
                        return Err(CheckError::Scope {
                            message: format!("variable '{}' is not declared", owner),
                            span: name_span,
                        });
                    }
                }
            }
            VarKind::Bracket { .. } => {
                return Err(CheckError::Type {
                    message: "invalid function name".to_string(),
                    span: name_span,
                });
            }
        };

        let fname = match &name.kind {
            VarKind::Name { name, .. } => name.clone(),
            _ => unreachable!("function name flattened above"),
        };
        let value = self.verify_exp(value, &t, &format!("body of function '{}'", fname))?;
        Ok(FuncDef {
            span,
            name,
            decl,
            value,
        })
    }
}
