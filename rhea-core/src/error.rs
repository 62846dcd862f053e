#![forbid(unsafe_code)]

use miette::Diagnostic;
use rhea_ast::Span;
use thiserror::Error;

/// A user-visible fault found while checking a module. Scope errors are
/// name-resolution failures; everything else is a type error. Compiler
/// bugs are not represented here: they panic.
#[derive(Debug, Error, Diagnostic)]
pub enum CheckError {
    #[error("scope error: {message}")]
    #[diagnostic(code(rhea::sema::scope))]
    Scope {
        message: String,
        #[label]
        span: Span,
    },

    #[error("type error: {message}")]
    #[diagnostic(code(rhea::sema::type_error))]
    Type {
        message: String,
        #[label]
        span: Span,
    },
}

impl CheckError {
    pub fn span(&self) -> Span {
        match self {
            CheckError::Scope { span, .. } => *span,
            CheckError::Type { span, .. } => *span,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            CheckError::Scope { message, .. } => message,
            CheckError::Type { message, .. } => message,
        }
    }

    pub fn category(&self) -> &'static str {
        match self {
            CheckError::Scope { .. } => "scope error",
            CheckError::Type { .. } => "type error",
        }
    }

    /// Formats the error as `<file>:<line>:<col>: <category>: <body>`.
    /// The source text is only used to turn the span offset into a line
    /// and column.
    pub fn render(&self, filename: &str, source: &str) -> String {
        let (line, col) = line_col(source, self.span().offset());
        format!("{}:{}:{}: {}", filename, line, col, self)
    }
}

/// 1-based line and column of a byte offset. Offsets past the end of
/// the text land on the position just after the last character.
pub(crate) fn line_col(source: &str, offset: usize) -> (usize, usize) {
    let offset = offset.min(source.len());
    let mut line = 1;
    let mut col = 1;
    for ch in source[..offset].chars() {
        if ch == '\n' {
            line += 1;
            col = 1;
        } else {
            col += 1;
        }
    }
    (line, col)
}
