#![allow(dead_code)]

use rhea_ast::{
    AssignStat, BinOp, Block, CallStat, Decl, DeclStat, Exp, ExpKind, Field, ForInStat,
    ForNumStat, FuncCall, FuncDef, Ident, IfStat, ImportDef, Lambda, MethodCall, Program,
    RecordDef, RepeatStat, ReturnStat, Span, Stat, TableTypeField, TopLevel, TopLevelVar,
    TypeAlias, TypeNode, TypeNodeKind, UnOp, Var, VarKind, WhileStat,
};
use rhea_core::{CheckError, Checker};

pub fn at(start: usize) -> Span {
    rhea_ast::span(start, 1)
}

pub fn ident(name: &str) -> Ident {
    Ident::new(at(0), name.to_string())
}

// --- expressions ---

pub fn nil() -> Exp {
    Exp::new(at(0), ExpKind::Nil)
}

pub fn boolean(value: bool) -> Exp {
    Exp::new(at(0), ExpKind::Bool(value))
}

pub fn int(value: i64) -> Exp {
    Exp::new(at(0), ExpKind::Integer(value))
}

pub fn int_at(start: usize, value: i64) -> Exp {
    Exp::new(at(start), ExpKind::Integer(value))
}

pub fn float(value: f64) -> Exp {
    Exp::new(at(0), ExpKind::Float(value))
}

pub fn str_lit(value: &str) -> Exp {
    Exp::new(at(0), ExpKind::Str(value.to_string()))
}

pub fn var_name(name: &str) -> Var {
    Var::new(
        at(0),
        VarKind::Name {
            name: name.to_string(),
            binding: None,
        },
    )
}

pub fn var_name_at(start: usize, name: &str) -> Var {
    Var::new(
        at(start),
        VarKind::Name {
            name: name.to_string(),
            binding: None,
        },
    )
}

pub fn var_dot(owner: &str, field: &str) -> Var {
    Var::new(
        at(0),
        VarKind::Dot {
            exp: Box::new(name(owner)),
            field: field.to_string(),
        },
    )
}

pub fn var_dot_exp(owner: Exp, field: &str) -> Var {
    Var::new(
        at(0),
        VarKind::Dot {
            exp: Box::new(owner),
            field: field.to_string(),
        },
    )
}

pub fn var_bracket(array: Exp, index: Exp) -> Var {
    Var::new(
        at(0),
        VarKind::Bracket {
            array: Box::new(array),
            index: Box::new(index),
        },
    )
}

pub fn var_exp(var: Var) -> Exp {
    let span = var.span;
    Exp::new(span, ExpKind::Var(Box::new(var)))
}

pub fn name(n: &str) -> Exp {
    var_exp(var_name(n))
}

pub fn name_at(start: usize, n: &str) -> Exp {
    var_exp(var_name_at(start, n))
}

pub fn unop(op: UnOp, exp: Exp) -> Exp {
    Exp::new(
        at(0),
        ExpKind::Unop {
            op,
            exp: Box::new(exp),
        },
    )
}

pub fn binop(op: BinOp, lhs: Exp, rhs: Exp) -> Exp {
    Exp::new(
        at(0),
        ExpKind::Binop {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        },
    )
}

pub fn paren(exp: Exp) -> Exp {
    Exp::new(at(0), ExpKind::Paren(Box::new(exp)))
}

pub fn cast(exp: Exp, target: TypeNode) -> Exp {
    Exp::new(
        at(0),
        ExpKind::Cast {
            exp: Box::new(exp),
            target: Some(target),
        },
    )
}

pub fn call(callee: Exp, args: Vec<Exp>) -> Exp {
    Exp::new(at(0), ExpKind::CallFunc(Box::new(FuncCall::new(callee, args))))
}

pub fn call_name(fname: &str, args: Vec<Exp>) -> Exp {
    call(name(fname), args)
}

pub fn method_call(exp: Exp, method: &str, args: Vec<Exp>) -> Exp {
    Exp::new(
        at(0),
        ExpKind::CallMethod(Box::new(MethodCall {
            exp,
            method: ident(method),
            args,
        })),
    )
}

pub fn lambda(args: Vec<Decl>, stats: Vec<Stat>) -> Exp {
    Exp::new(
        at(0),
        ExpKind::Lambda(Box::new(Lambda {
            args,
            body: block(stats),
        })),
    )
}

pub fn rec_field(name: &str, exp: Exp) -> Field {
    Field::Rec {
        span: at(0),
        name: ident(name),
        exp,
    }
}

pub fn list_field(exp: Exp) -> Field {
    Field::List { span: at(0), exp }
}

pub fn init_rec(fields: Vec<(&str, Exp)>) -> Exp {
    Exp::new(
        at(0),
        ExpKind::Initlist(fields.into_iter().map(|(n, e)| rec_field(n, e)).collect()),
    )
}

pub fn init_list(items: Vec<Exp>) -> Exp {
    Exp::new(
        at(0),
        ExpKind::Initlist(items.into_iter().map(list_field).collect()),
    )
}

pub fn empty_init() -> Exp {
    Exp::new(at(0), ExpKind::Initlist(vec![]))
}

/// An expression of type `any` (a nil cast up to `any`).
pub fn any_value() -> Exp {
    cast(nil(), tn_name("any"))
}

pub fn any_value_at(start: usize) -> Exp {
    Exp::new(
        at(start),
        ExpKind::Cast {
            exp: Box::new(nil()),
            target: Some(tn_name("any")),
        },
    )
}

// --- syntactic types ---

pub fn tn(kind: TypeNodeKind) -> TypeNode {
    TypeNode::new(at(0), kind)
}

pub fn tn_nil() -> TypeNode {
    tn(TypeNodeKind::Nil)
}

pub fn tn_module() -> TypeNode {
    tn(TypeNodeKind::Module)
}

pub fn tn_name(name: &str) -> TypeNode {
    tn(TypeNodeKind::Name(name.to_string()))
}

pub fn tn_array(elem: TypeNode) -> TypeNode {
    tn(TypeNodeKind::Array(Box::new(elem)))
}

pub fn tn_table(fields: Vec<(&str, TypeNode)>) -> TypeNode {
    tn(TypeNodeKind::Table(
        fields
            .into_iter()
            .map(|(name, ty)| TableTypeField {
                span: at(0),
                name: name.to_string(),
                ty,
            })
            .collect(),
    ))
}

pub fn tn_func(params: Vec<TypeNode>, rets: Vec<TypeNode>) -> TypeNode {
    tn(TypeNodeKind::Function { params, rets })
}

// --- declarations and statements ---

pub fn decl(name: &str) -> Decl {
    Decl::new(at(0), name, None)
}

pub fn decl_at(start: usize, name: &str) -> Decl {
    Decl::new(at(start), name, None)
}

pub fn decl_typed(name: &str, ty: TypeNode) -> Decl {
    Decl::new(at(0), name, Some(ty))
}

pub fn block(stats: Vec<Stat>) -> Block {
    Block {
        span: at(0),
        stats,
    }
}

pub fn decl_stat(decls: Vec<Decl>, exps: Vec<Exp>) -> Stat {
    Stat::Decl(DeclStat {
        span: at(0),
        decls,
        exps,
    })
}

pub fn assign(vars: Vec<Var>, exps: Vec<Exp>) -> Stat {
    Stat::Assign(AssignStat {
        span: at(0),
        vars,
        exps,
    })
}

pub fn call_stat(call: Exp) -> Stat {
    Stat::Call(CallStat {
        span: at(0),
        call,
    })
}

pub fn ret(exps: Vec<Exp>) -> Stat {
    Stat::Return(ReturnStat {
        span: at(0),
        exps,
    })
}

pub fn block_stat(stats: Vec<Stat>) -> Stat {
    Stat::Block(block(stats))
}

pub fn while_stat(cond: Exp, stats: Vec<Stat>) -> Stat {
    Stat::While(WhileStat {
        span: at(0),
        cond,
        block: block(stats),
    })
}

pub fn repeat_stat(stats: Vec<Stat>, cond: Exp) -> Stat {
    Stat::Repeat(RepeatStat {
        span: at(0),
        block: block(stats),
        cond,
    })
}

pub fn if_stat(cond: Exp, then_stats: Vec<Stat>) -> Stat {
    Stat::If(IfStat {
        span: at(0),
        cond,
        then_block: block(then_stats),
        else_block: None,
    })
}

pub fn for_num(decl: Decl, start: Exp, limit: Exp, step: Option<Exp>, stats: Vec<Stat>) -> Stat {
    Stat::ForNum(Box::new(ForNumStat {
        span: at(0),
        decl,
        start,
        limit,
        step,
        block: block(stats),
    }))
}

pub fn for_in(decls: Vec<Decl>, exps: Vec<Exp>, stats: Vec<Stat>) -> Stat {
    Stat::ForIn(ForInStat {
        span: at(0),
        decls,
        exps,
        block: block(stats),
    })
}

// --- top-level items ---

pub fn tl_var(decl: Decl, value: Exp) -> TopLevel {
    TopLevel::Var(TopLevelVar {
        span: at(0),
        decl,
        value,
    })
}

pub fn tl_stat(stat: Stat) -> TopLevel {
    TopLevel::Stat(stat)
}

pub fn tl_func(fname: &str, ty: TypeNode, args: Vec<Decl>, stats: Vec<Stat>) -> TopLevel {
    TopLevel::Func(FuncDef {
        span: at(0),
        name: var_name(fname),
        decl: Decl::new(at(0), fname, Some(ty)),
        value: lambda(args, stats),
    })
}

/// A function item with an arbitrary (e.g. dotted) name variable.
pub fn tl_func_named(
    fname: Var,
    simple: &str,
    ty: TypeNode,
    args: Vec<Decl>,
    stats: Vec<Stat>,
) -> TopLevel {
    TopLevel::Func(FuncDef {
        span: at(0),
        name: fname,
        decl: Decl::new(at(0), simple, Some(ty)),
        value: lambda(args, stats),
    })
}

pub fn tl_record(name: &str, fields: Vec<(&str, TypeNode)>) -> TopLevel {
    TopLevel::Record(RecordDef {
        span: at(0),
        name: ident(name),
        fields: fields
            .into_iter()
            .map(|(fname, ty)| Decl::new(at(0), fname, Some(ty)))
            .collect(),
        typ: None,
    })
}

pub fn tl_alias(name: &str, target: TypeNode) -> TopLevel {
    TopLevel::TypeAlias(TypeAlias {
        span: at(0),
        name: ident(name),
        target,
    })
}

pub fn tl_import(name: &str) -> TopLevel {
    TopLevel::Import(ImportDef {
        span: at(0),
        name: ident(name),
        module: name.to_string(),
    })
}

pub fn program(tls: Vec<TopLevel>) -> Program {
    Program { tls }
}

/// A program declaring module `m`, followed by `items`, ending with
/// `return m`.
pub fn module_program(items: Vec<TopLevel>) -> Program {
    let mut tls = vec![tl_var(decl_typed("m", tn_module()), empty_init())];
    tls.extend(items);
    tls.push(tl_stat(ret(vec![name("m")])));
    program(tls)
}

// --- running the checker ---

pub fn check(prog: Program) -> Result<Program, CheckError> {
    Checker::new().check_program(prog)
}

pub fn check_ok(prog: Program) -> Program {
    check(prog).expect("sema")
}

pub fn check_err(prog: Program) -> CheckError {
    match check(prog) {
        Ok(_) => panic!("expected a check error"),
        Err(err) => err,
    }
}

// --- navigation helpers for assertions ---

pub fn as_decl_stat(tl: &TopLevel) -> &DeclStat {
    match tl {
        TopLevel::Stat(Stat::Decl(d)) => d,
        other => panic!("expected a declaration statement, got {:?}", other),
    }
}

pub fn as_func(tl: &TopLevel) -> &FuncDef {
    match tl {
        TopLevel::Func(f) => f,
        other => panic!("expected a function item, got {:?}", other),
    }
}

pub fn as_call_stat(tl: &TopLevel) -> &CallStat {
    match tl {
        TopLevel::Stat(Stat::Call(c)) => c,
        other => panic!("expected a call statement, got {:?}", other),
    }
}

pub fn as_toplevel_var(tl: &TopLevel) -> &TopLevelVar {
    match tl {
        TopLevel::Var(v) => v,
        other => panic!("expected a top-level declaration, got {:?}", other),
    }
}
