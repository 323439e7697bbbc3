//! constants

use crate::macros::tagged_type;

tagged_type! {
    /// The type of a remote object, as reported by the runtime's `typeof`
    #[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
    pub enum RemoteObjectType {
        /// Any object, including `null`, arrays and wrapper objects
        Object = "object",
        /// A callable
        Function = "function",
        /// The `undefined` value
        Undefined = "undefined",
        /// A string primitive
        String = "string",
        /// A number primitive
        Number = "number",
        /// A boolean primitive
        Boolean = "boolean",
        /// A symbol primitive
        Symbol = "symbol",
        /// A bigint primitive
        Bigint = "bigint",
    }
}

tagged_type! {
    /// The kind of a lexical scope in a scope chain
    #[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
    pub enum ScopeType {
        /// The global object
        Global = "global",
        /// Function locals
        Local = "local",
        /// The object of a `with` statement
        With = "with",
        /// Variables captured by a closure
        Closure = "closure",
        /// The binding of a `catch` clause
        Catch = "catch",
        /// A block scope
        Block = "block",
        /// Top-level lexical declarations of scripts
        Script = "script",
        /// Variables of an `eval` call
        Eval = "eval",
        /// Module scope
        Module = "module",
        /// The value stack of a wasm frame
        WasmExpressionStack = "wasm-expression-stack",
    }
}

/// The subtype the runtime reports for `null`
pub const NULL_SUBTYPE: &str = "null";

/// The pause reason node reports for the forced break of `--inspect-brk`
pub const BREAK_ON_START: &str = "Break on start";
