use crate::scope::*;
use std::fmt;
use unminify_syntax::Ugly;

impl fmt::Display for ScopeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            | ScopeKind::Global => "global",
            | ScopeKind::Script => "script",
            | ScopeKind::Function => "function",
            | ScopeKind::Block => "block",
        };
        f.write_str(s)
    }
}

impl<'a> Ugly<'a, ScopeAnalysis> for VariableId {
    fn ugly(&self, f: &'a ScopeAnalysis) -> String {
        let var = f.variable(*self);
        let reads = var.reads().count();
        let writes = var.writes().count();
        format!("{}#{} (decl {}, r {}, w {})", var.name, usize::from(*self), var.declarations.len(), reads, writes)
    }
}

impl<'a> Ugly<'a, ScopeAnalysis> for ScopeId {
    fn ugly(&self, f: &'a ScopeAnalysis) -> String {
        fn go(id: ScopeId, f: &ScopeAnalysis, depth: usize, s: &mut String) {
            let scope = f.scope(id);
            let indent = "  ".repeat(depth);
            *s += &format!("{indent}{}#{}", scope.kind, usize::from(id));
            if let Some(node) = &scope.node {
                *s += &format!(" @ {}", node.kind());
            }
            if !scope.through.is_empty() {
                let through: Vec<_> = scope.through.iter().map(String::as_str).collect();
                *s += &format!(" through [{}]", through.join(", "));
            }
            *s += "\n";
            for var in scope.variables.values() {
                *s += &format!("{indent}  - {}\n", var.ugly(f));
            }
            for child in &scope.children {
                go(*child, f, depth + 1, s);
            }
        }
        let mut s = String::new();
        go(*self, f, 0, &mut s);
        s
    }
}

impl fmt::Display for ScopeAnalysis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.global().ugly(self).trim_end())
    }
}
