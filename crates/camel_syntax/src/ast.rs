//! Typed views over syntax nodes and the per-kind capability registry.
//!
//! The tree itself is untyped ([`SyntaxNode`] plus a [`SyntaxKind`]). Wrappers in this module give the common
//! constructs named accessors, and [`capabilities`] answers kind-level questions (does it open a scope, can it be
//! reparsed alone, does it interpolate) without a match in every consumer.
//!
//! ## Examples
//!
//! ```rust
//! use camel_core::lang::dialect::Dialect;
//! use camel_syntax::ast::{AstNode, SourceFile};
//! use camel_syntax::parser;
//!
//! let parse = parser::parse("package Foo;\nsub bar { 1 }\n", &Dialect::new());
//! let file = SourceFile::cast(parse.syntax_node()).expect("root is a file");
//! let names: Vec<_> = file.sub_definitions().filter_map(|s| s.name()).collect();
//! assert_eq!(names, vec!["bar".to_string()]);
//! ```

use std::collections::HashMap;
use std::sync::OnceLock;

use camel_core::lang::kinds::SyntaxKind;
use camel_core::lang::token_sets::{COMPOSITE_LITERALS, REPARSABLE_LEAVES, STRING_CONTENT, STRING_SPECIALS, TokenSet};

use crate::diagnostics::SyntaxError;
use crate::tree::{Parse, SyntaxNode, SyntaxToken};

// ============================================================================
// Capabilities
// ============================================================================

/// What a node kind can do, independent of any particular node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities {
    /// Opens a lexical scope.
    pub scope: bool,
    /// Declares a named sub, package or variable.
    pub declaration: bool,
    /// Can be relexed on its own by the reparse analyzer.
    pub reparsable: bool,
    /// Holds string or pattern content.
    pub literal: bool,
    /// Its content interpolates variables.
    pub interpolating: bool,
    pub statement: bool,
}

const SCOPES: TokenSet = TokenSet::new(&[
    SyntaxKind::File,
    SyntaxKind::LazyBlock,
    SyntaxKind::Block,
    SyntaxKind::SubDefinition,
    SyntaxKind::MethodDefinition,
    SyntaxKind::FuncDefinition,
    SyntaxKind::AnonSub,
    SyntaxKind::ForStatement,
    SyntaxKind::ForeachStatement,
    SyntaxKind::PackageStatement,
]);

const DECLARATIONS: TokenSet = TokenSet::new(&[
    SyntaxKind::SubDefinition,
    SyntaxKind::MethodDefinition,
    SyntaxKind::FuncDefinition,
    SyntaxKind::PackageStatement,
    SyntaxKind::VariableDeclarationLexical,
    SyntaxKind::VariableDeclarationGlobal,
    SyntaxKind::VariableDeclarationLocal,
]);

const INTERPOLATING: TokenSet = TokenSet::new(&[
    SyntaxKind::StringDq,
    SyntaxKind::StringXq,
    SyntaxKind::RegexMatch,
    SyntaxKind::RegexCompile,
    SyntaxKind::RegexReplace,
    SyntaxKind::HeredocQq,
    SyntaxKind::HeredocQx,
]);

const STATEMENTS: TokenSet = TokenSet::new(&[
    SyntaxKind::Statement,
    SyntaxKind::UseStatement,
    SyntaxKind::NoStatement,
    SyntaxKind::PackageStatement,
    SyntaxKind::SubDefinition,
    SyntaxKind::MethodDefinition,
    SyntaxKind::FuncDefinition,
    SyntaxKind::IfStatement,
    SyntaxKind::UnlessStatement,
    SyntaxKind::WhileStatement,
    SyntaxKind::UntilStatement,
    SyntaxKind::ForStatement,
    SyntaxKind::ForeachStatement,
    SyntaxKind::GivenStatement,
    SyntaxKind::WhenStatement,
    SyntaxKind::DefaultStatement,
    SyntaxKind::TryCatch,
    SyntaxKind::SpecialBlock,
    SyntaxKind::LabeledStatement,
]);

static CAPABILITIES: OnceLock<HashMap<SyntaxKind, Capabilities>> = OnceLock::new();

fn registry() -> &'static HashMap<SyntaxKind, Capabilities> {
    CAPABILITIES.get_or_init(|| {
        SyntaxKind::ALL
            .iter()
            .map(|&kind| {
                let caps = Capabilities {
                    scope: SCOPES.contains(kind),
                    declaration: DECLARATIONS.contains(kind),
                    reparsable: REPARSABLE_LEAVES.contains(kind),
                    literal: COMPOSITE_LITERALS.contains(kind),
                    interpolating: INTERPOLATING.contains(kind),
                    statement: STATEMENTS.contains(kind),
                };
                (kind, caps)
            })
            .filter(|(_, caps)| *caps != Capabilities::default())
            .collect()
    })
}

/// Capabilities of `kind`; all `false` for kinds with none.
pub fn capabilities(kind: SyntaxKind) -> Capabilities {
    registry().get(&kind).copied().unwrap_or_default()
}

// ============================================================================
// Typed wrappers
// ============================================================================

/// A typed view of a [`SyntaxNode`] of particular kinds.
pub trait AstNode: Sized {
    fn can_cast(kind: SyntaxKind) -> bool;

    fn cast(node: SyntaxNode) -> Option<Self>;

    fn syntax(&self) -> &SyntaxNode;

    /// Source text of the node.
    fn text(&self) -> String {
        self.syntax().text().to_string()
    }
}

macro_rules! ast_node {
    ($(#[$meta:meta])* $name:ident => $($kind:ident)|+) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name(SyntaxNode);

        impl AstNode for $name {
            fn can_cast(kind: SyntaxKind) -> bool {
                matches!(kind, $(SyntaxKind::$kind)|+)
            }

            fn cast(node: SyntaxNode) -> Option<Self> {
                Self::can_cast(node.kind()).then(|| Self(node))
            }

            fn syntax(&self) -> &SyntaxNode {
                &self.0
            }
        }
    };
}

ast_node!(
    /// The root of a parse.
    SourceFile => File
);
ast_node!(
    /// A named `sub`, `method` or `func`.
    SubDefinition => SubDefinition | MethodDefinition | FuncDefinition
);
ast_node!(PackageStatement => PackageStatement);
ast_node!(
    /// `use` or `no`.
    UseStatement => UseStatement | NoStatement
);
ast_node!(
    /// A block body, parsed or still lazy.
    BlockBody => LazyBlock | Block
);
ast_node!(Variable => ScalarVariable | ArrayVariable | HashVariable | GlobVariable | CodeVariable | ArrayIndexVariable);
ast_node!(
    /// `q`, `qq`, `qx`, `qw` and the punctuation quotes.
    StringLiteral => StringSq | StringDq | StringXq | StringList
);
ast_node!(
    /// A heredoc body together with its terminator.
    HeredocBody => Heredoc | HeredocQq | HeredocQx
);
ast_node!(MethodCall => MethodCall);
ast_node!(ErrorNode => ErrorElement);

fn first_token(node: &SyntaxNode, kind: SyntaxKind) -> Option<SyntaxToken> {
    node.children_with_tokens()
        .filter_map(|element| element.into_token())
        .find(|token| token.kind() == kind)
}

/// Concatenated text of the content parts of a literal, escapes left as written.
fn content_text(node: &SyntaxNode) -> String {
    node.children_with_tokens()
        .filter_map(|element| element.into_token())
        .filter(|token| STRING_CONTENT.contains(token.kind()) || STRING_SPECIALS.contains(token.kind()))
        .map(|token| token.text().to_string())
        .collect()
}

impl SourceFile {
    /// Top-level statements, including sub definitions.
    pub fn statements(&self) -> impl Iterator<Item = SyntaxNode> + '_ {
        self.0.children().filter(|n| capabilities(n.kind()).statement)
    }

    /// Every named sub in the file, at any depth already parsed.
    pub fn sub_definitions(&self) -> impl Iterator<Item = SubDefinition> + '_ {
        self.0.descendants().filter_map(SubDefinition::cast)
    }

    pub fn packages(&self) -> impl Iterator<Item = PackageStatement> + '_ {
        self.0.descendants().filter_map(PackageStatement::cast)
    }
}

impl SubDefinition {
    pub fn name(&self) -> Option<String> {
        first_token(&self.0, SyntaxKind::SubName).map(|t| t.text().to_string())
    }

    pub fn is_async(&self) -> bool {
        first_token(&self.0, SyntaxKind::KwAsync).is_some()
    }

    /// The body; `None` for a forward declaration.
    pub fn body(&self) -> Option<BlockBody> {
        self.0.children().find_map(BlockBody::cast)
    }
}

impl PackageStatement {
    pub fn name(&self) -> Option<String> {
        first_token(&self.0, SyntaxKind::PackageName).map(|t| t.text().to_string())
    }

    /// Whether the package has its own `{ ... }` block.
    pub fn has_block(&self) -> bool {
        self.0.children().any(|n| BlockBody::can_cast(n.kind()))
    }
}

impl UseStatement {
    pub fn is_no(&self) -> bool {
        self.0.kind() == SyntaxKind::NoStatement
    }

    /// Module name; `None` for `use VERSION`.
    pub fn module(&self) -> Option<String> {
        first_token(&self.0, SyntaxKind::PackageName).map(|t| t.text().to_string())
    }
}

impl BlockBody {
    pub fn is_lazy(&self) -> bool {
        self.0.kind() == SyntaxKind::LazyBlock
    }
}

impl Variable {
    /// `$`, `@`, `%`, `*`, `&` or `$#`.
    pub fn sigil(&self) -> Option<String> {
        self.0.first_token().map(|t| t.text().to_string())
    }

    pub fn name(&self) -> Option<String> {
        first_token(&self.0, SyntaxKind::VariableName).map(|t| t.text().to_string())
    }
}

impl StringLiteral {
    pub fn content(&self) -> String {
        content_text(&self.0)
    }

    pub fn interpolates(&self) -> bool {
        capabilities(self.0.kind()).interpolating
    }
}

impl HeredocBody {
    /// Body text without the terminator line.
    pub fn content(&self) -> String {
        content_text(&self.0)
    }

    /// Whether the terminator line was found.
    pub fn is_terminated(&self) -> bool {
        first_token(&self.0, SyntaxKind::HeredocEnd).is_some()
    }
}

impl MethodCall {
    pub fn method_name(&self) -> Option<String> {
        first_token(&self.0, SyntaxKind::Identifier).map(|t| t.text().to_string())
    }

    /// The invocant expression.
    pub fn receiver(&self) -> Option<SyntaxNode> {
        self.0.first_child()
    }
}

impl ErrorNode {
    /// The diagnostic reported for this node, matched by range.
    pub fn diagnostic<'p>(&self, parse: &'p Parse) -> Option<&'p SyntaxError> {
        let range = self.0.text_range();
        parse.errors().iter().find(|e| e.range == range)
    }
}
