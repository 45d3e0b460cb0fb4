/// Source text to trees.
pub mod textual {
    /// Logos-based lexer and token definitions.
    pub mod lexer;
    pub use lexer::*;
    /// Recursive-descent parser with automatic semicolon insertion.
    pub mod parser;
    pub use parser::*;
    /// Literal escape expansion helpers.
    pub mod escape;
    /// Parse error formatting.
    pub mod err;
    pub use err::*;

    #[cfg(test)]
    /// Parser smoke tests.
    mod tests;
}

/// Trees to source text.
pub mod codegen {
    /// String, number and property-key spelling.
    pub mod strings;
    /// The document layout, built on `pretty`.
    pub mod printer;
    pub use printer::*;

    #[cfg(test)]
    mod tests;
}
