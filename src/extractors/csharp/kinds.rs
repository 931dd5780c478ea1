// Closed set of C# entity kinds

use crate::extractors::base::{Category, KindTag};

macro_rules! csharp_kinds {
    ($($variant:ident => ($tag:literal, $category:ident),)*) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum CSharpKind {
            $($variant,)*
        }

        impl KindTag for CSharpKind {
            fn tag(&self) -> &'static str {
                match self {
                    $(CSharpKind::$variant => $tag,)*
                }
            }

            fn category(&self) -> Category {
                match self {
                    $(CSharpKind::$variant => Category::$category,)*
                }
            }
        }
    };
}

csharp_kinds! {
    // Expressions
    IntLiteral => ("INT_LITERAL", Expression),
    RealLiteral => ("REAL_LITERAL", Expression),
    StringLiteral => ("STRING_LITERAL", Expression),
    CharLiteral => ("CHAR_LITERAL", Expression),
    BoolLiteral => ("BOOL_LITERAL", Expression),
    NullLiteral => ("NULL_LITERAL", Expression),
    InterpolatedString => ("INTERPOLATED_STRING", Expression),
    Name => ("NAME", Expression),
    This => ("THIS", Expression),
    Base => ("BASE", Expression),
    TypeAccess => ("TYPE_ACCESS", Expression),
    Paren => ("PAREN", Expression),
    Binary => ("BINARY", Expression),
    PrefixUnary => ("PREFIX_UNARY", Expression),
    PostfixUnary => ("POSTFIX_UNARY", Expression),
    Assign => ("ASSIGN", Expression),
    Conditional => ("CONDITIONAL", Expression),
    Invocation => ("INVOCATION", Expression),
    MemberAccess => ("MEMBER_ACCESS", Expression),
    ElementAccess => ("ELEMENT_ACCESS", Expression),
    ObjectCreation => ("OBJECT_CREATION", Expression),
    ArrayCreation => ("ARRAY_CREATION", Expression),
    Initializer => ("INITIALIZER", Expression),
    Cast => ("CAST", Expression),
    As => ("AS", Expression),
    SizeOf => ("SIZEOF", Expression),
    TypeOf => ("TYPEOF", Expression),
    Default => ("DEFAULT", Expression),
    ThrowExpr => ("THROW", Expression),
    Await => ("AWAIT", Expression),
    Lambda => ("LAMBDA", Expression),

    // Statements
    Block => ("BLOCK", Statement),
    ExprStmt => ("EXPR_STMT", Statement),
    LocalDecl => ("LOCAL_DECL", Statement),
    If => ("IF", Statement),
    While => ("WHILE", Statement),
    Do => ("DO", Statement),
    For => ("FOR", Statement),
    Foreach => ("FOREACH", Statement),
    Return => ("RETURN", Statement),
    ThrowStmt => ("THROW", Statement),
    Break => ("BREAK", Statement),
    Continue => ("CONTINUE", Statement),
    Empty => ("EMPTY", Statement),
    Try => ("TRY", Statement),
    Catch => ("CATCH", Statement),
    Switch => ("SWITCH", Statement),
    SwitchSection => ("SWITCH_SECTION", Statement),
    Using => ("USING", Statement),
    Lock => ("LOCK", Statement),
    Yield => ("YIELD", Statement),
    LocalFunction => ("LOCAL_FUNCTION", Statement),

    // Types
    Predefined => ("PREDEFINED", Type),
    Named => ("NAMED", Type),
    Generic => ("GENERIC", Type),
    Qualified => ("QUALIFIED", Type),
    Array => ("ARRAY", Type),
    Nullable => ("NULLABLE", Type),
    Pointer => ("POINTER", Type),
    Tuple => ("TUPLE", Type),
    Implicit => ("IMPLICIT", Type),

    // Declarations
    CompilationUnit => ("COMPILATION_UNIT", Declaration),
    UsingDirective => ("USING_DIRECTIVE", Declaration),
    Namespace => ("NAMESPACE", Declaration),
    Class => ("CLASS", Declaration),
    Struct => ("STRUCT", Declaration),
    Interface => ("INTERFACE", Declaration),
    Record => ("RECORD", Declaration),
    Enum => ("ENUM", Declaration),
    EnumMember => ("ENUM_MEMBER", Declaration),
    Delegate => ("DELEGATE", Declaration),
    Method => ("METHOD", Declaration),
    Constructor => ("CONSTRUCTOR", Declaration),
    Destructor => ("DESTRUCTOR", Declaration),
    Operator => ("OPERATOR", Declaration),
    Indexer => ("INDEXER", Declaration),
    Field => ("FIELD", Declaration),
    Event => ("EVENT", Declaration),
    Property => ("PROPERTY", Declaration),
    Accessor => ("ACCESSOR", Declaration),
    Variable => ("VARIABLE", Declaration),
    Parameter => ("PARAMETER", Declaration),
    TypeParameter => ("TYPE_PARAMETER", Declaration),
    CatchVariable => ("CATCH_VARIABLE", Declaration),
    GlobalStatement => ("GLOBAL_STATEMENT", Declaration),
}
