//! Syntax node, token and trivia kinds for the UVSS CST.

use uvss_tokenizer::{Token, TokenKind};

macro_rules! syntax_kinds {
    ($($(#[$meta:meta])* $name:ident,)*) => {
        /// The kind of a syntax element.
        ///
        /// Kinds are ordered: tokens first, then trivia, then `LIST` and the
        /// composite node kinds. The SCREAMING_CASE naming convention matches
        /// the rowan/rust-analyzer conventions for syntax kinds.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[repr(u16)]
        #[allow(non_camel_case_types)]
        pub enum SyntaxKind {
            $($(#[$meta])* $name,)*
        }

        impl SyntaxKind {
            /// Every kind, indexed by its raw value.
            pub const ALL: &'static [SyntaxKind] = &[$(SyntaxKind::$name,)*];
        }
    };
}

syntax_kinds! {
    // ========== TOKENS ==========
    /// `{`
    OPEN_CURLY_BRACE_TOKEN,
    /// `}`
    CLOSE_CURLY_BRACE_TOKEN,
    /// `(`
    OPEN_PARENTHESES_TOKEN,
    /// `)`
    CLOSE_PARENTHESES_TOKEN,
    /// `[`
    OPEN_BRACKET_TOKEN,
    /// `]`
    CLOSE_BRACKET_TOKEN,
    /// `:`
    COLON_TOKEN,
    /// `;`
    SEMICOLON_TOKEN,
    /// `,`
    COMMA_TOKEN,
    /// `.`
    PERIOD_TOKEN,
    /// `#`
    HASH_TOKEN,
    /// `*`
    ASTERISK_TOKEN,
    /// `!`
    EXCLAMATION_MARK_TOKEN,
    /// `@`
    AT_SIGN_TOKEN,
    /// `|`
    PIPE_TOKEN,
    /// `=`
    EQUALS_TOKEN,
    /// `<>`
    NOT_EQUALS_TOKEN,
    /// `<`
    LESS_THAN_TOKEN,
    /// `<=`
    LESS_THAN_EQUALS_TOKEN,
    /// `>` (also the child combinator)
    GREATER_THAN_TOKEN,
    /// `>=`
    GREATER_THAN_EQUALS_TOKEN,
    /// `>>` logical child combinator
    GREATER_THAN_GREATER_THAN_TOKEN,
    /// `>?` templated child combinator
    GREATER_THAN_QUESTION_MARK_TOKEN,
    /// Whitespace promoted to a descendant combinator
    SPACE_TOKEN,
    /// Identifier
    IDENTIFIER_TOKEN,
    /// Number
    NUMBER_TOKEN,
    /// `$name`
    DIRECTIVE_TOKEN,
    /// Raw property value text
    PROPERTY_VALUE_TOKEN,
    /// Character no lexer rule recognised
    UNKNOWN_TOKEN,
    /// End of input; carries the document's final trivia
    END_OF_FILE_TOKEN,

    // Keywords
    ANIMATION_KEYWORD,
    AS_KEYWORD,
    EVENT_KEYWORD,
    HANDLED_KEYWORD,
    IMPORTANT_KEYWORD,
    KEYFRAME_KEYWORD,
    PLAY_SFX_KEYWORD,
    PLAY_STORYBOARD_KEYWORD,
    PROPERTY_KEYWORD,
    SET_KEYWORD,
    SET_HANDLED_KEYWORD,
    TARGET_KEYWORD,
    TRANSITION_KEYWORD,
    TRIGGER_KEYWORD,

    // ========== TRIVIA ==========
    /// `\n`, `\r\n` or `\r`
    END_OF_LINE_TRIVIA,
    /// Spaces and tabs
    WHITESPACE_TRIVIA,
    /// `// ...`
    SINGLE_LINE_COMMENT_TRIVIA,
    /// `/* ... */`
    MULTI_LINE_COMMENT_TRIVIA,
    /// Structured trivia wrapping tokens the parser could not place
    SKIPPED_TOKENS_TRIVIA,

    // ========== NODES ==========
    /// A list of nodes, or of trivia attached to a token
    LIST,
    DOCUMENT,
    RULE_SET,
    SELECTOR_WITH_NAVIGATION_EXPRESSION,
    SELECTOR,
    SELECTOR_PART,
    SELECTOR_SUB_PART,
    PSEUDO_CLASS,
    SELECTOR_WITH_PARENTHESES,
    NAVIGATION_EXPRESSION,
    NAVIGATION_EXPRESSION_INDEXER,
    IDENTIFIER,
    PROPERTY_NAME,
    EVENT_NAME,
    BLOCK,
    RULE,
    PROPERTY_VALUE,
    PROPERTY_VALUE_WITH_BRACES,
    EVENT_TRIGGER,
    EVENT_TRIGGER_ARGUMENT_LIST,
    PROPERTY_TRIGGER,
    PROPERTY_TRIGGER_CONDITION,
    PLAY_STORYBOARD_TRIGGER_ACTION,
    PLAY_SFX_TRIGGER_ACTION,
    SET_TRIGGER_ACTION,
    TRANSITION,
    TRANSITION_ARGUMENT_LIST,
    STORYBOARD,
    STORYBOARD_TARGET,
    ANIMATION,
    ANIMATION_KEYFRAME,
    CULTURE_DIRECTIVE,
    UNKNOWN_DIRECTIVE,
}

/// Invoke `$m!` with every composite node kind and its visitor method name.
///
/// Both visitor traits are generated from this one list, so a new node kind
/// only needs to be added here.
macro_rules! for_each_node_kind {
    ($m:ident) => {
        $m! {
            visit_document => DOCUMENT,
            visit_rule_set => RULE_SET,
            visit_selector_with_navigation_expression => SELECTOR_WITH_NAVIGATION_EXPRESSION,
            visit_selector => SELECTOR,
            visit_selector_part => SELECTOR_PART,
            visit_selector_sub_part => SELECTOR_SUB_PART,
            visit_pseudo_class => PSEUDO_CLASS,
            visit_selector_with_parentheses => SELECTOR_WITH_PARENTHESES,
            visit_navigation_expression => NAVIGATION_EXPRESSION,
            visit_navigation_expression_indexer => NAVIGATION_EXPRESSION_INDEXER,
            visit_identifier => IDENTIFIER,
            visit_property_name => PROPERTY_NAME,
            visit_event_name => EVENT_NAME,
            visit_block => BLOCK,
            visit_rule => RULE,
            visit_property_value => PROPERTY_VALUE,
            visit_property_value_with_braces => PROPERTY_VALUE_WITH_BRACES,
            visit_event_trigger => EVENT_TRIGGER,
            visit_event_trigger_argument_list => EVENT_TRIGGER_ARGUMENT_LIST,
            visit_property_trigger => PROPERTY_TRIGGER,
            visit_property_trigger_condition => PROPERTY_TRIGGER_CONDITION,
            visit_play_storyboard_trigger_action => PLAY_STORYBOARD_TRIGGER_ACTION,
            visit_play_sfx_trigger_action => PLAY_SFX_TRIGGER_ACTION,
            visit_set_trigger_action => SET_TRIGGER_ACTION,
            visit_transition => TRANSITION,
            visit_transition_argument_list => TRANSITION_ARGUMENT_LIST,
            visit_storyboard => STORYBOARD,
            visit_storyboard_target => STORYBOARD_TARGET,
            visit_animation => ANIMATION,
            visit_animation_keyframe => ANIMATION_KEYFRAME,
            visit_culture_directive => CULTURE_DIRECTIVE,
            visit_unknown_directive => UNKNOWN_DIRECTIVE,
        }
    };
}

pub(crate) use for_each_node_kind;

/// What a slot of a composite node may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotShape {
    /// A token of one of the given kinds (the first is used for placeholders).
    Token(&'static [SyntaxKind]),
    /// A node of the given kind.
    Node(SyntaxKind),
    /// A `LIST` whose elements are typically of the given kind.
    List(SyntaxKind),
    /// A separated `LIST` of elements of the given kind, comma-separated.
    SeparatedList(SyntaxKind),
}

/// A fixed-position child of a composite node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub name: &'static str,
    pub shape: SlotShape,
    pub optional: bool,
}

const fn required(name: &'static str, shape: SlotShape) -> Slot {
    Slot {
        name,
        shape,
        optional: false,
    }
}

const fn optional(name: &'static str, shape: SlotShape) -> Slot {
    Slot {
        name,
        shape,
        optional: true,
    }
}

use SlotShape::{List, Node, SeparatedList, Token as Tok};
use SyntaxKind::*;

const OPEN_BRACE: SlotShape = Tok(&[OPEN_CURLY_BRACE_TOKEN]);
const CLOSE_BRACE: SlotShape = Tok(&[CLOSE_CURLY_BRACE_TOKEN]);
const OPEN_PAREN: SlotShape = Tok(&[OPEN_PARENTHESES_TOKEN]);
const CLOSE_PAREN: SlotShape = Tok(&[CLOSE_PARENTHESES_TOKEN]);
const IMPORTANT: SlotShape = Tok(&[IMPORTANT_KEYWORD]);

/// Builds a `'static` slot layout from `required`/`optional` calls.
macro_rules! layout {
    ($($slot:expr),* $(,)?) => {{
        const SLOTS: &[Slot] = &[$($slot),*];
        SLOTS
    }};
}

/// Comparison operators allowed in a property-trigger condition.
pub const COMPARISON_OPERATORS: &[SyntaxKind] = &[
    EQUALS_TOKEN,
    NOT_EQUALS_TOKEN,
    LESS_THAN_TOKEN,
    LESS_THAN_EQUALS_TOKEN,
    GREATER_THAN_TOKEN,
    GREATER_THAN_EQUALS_TOKEN,
];

/// Selector combinators other than the descendant (whitespace) combinator.
pub const EXPLICIT_COMBINATORS: &[SyntaxKind] = &[
    GREATER_THAN_TOKEN,
    GREATER_THAN_GREATER_THAN_TOKEN,
    GREATER_THAN_QUESTION_MARK_TOKEN,
];

impl SyntaxKind {
    /// Convert from a raw u16 value to SyntaxKind.
    pub fn from_raw(raw: u16) -> Option<Self> {
        Self::ALL.get(raw as usize).copied()
    }

    /// The raw u16 value of this kind.
    pub fn to_raw(self) -> u16 {
        self as u16
    }

    /// Whether this is a token (terminal) kind.
    pub fn is_token(self) -> bool {
        self < END_OF_LINE_TRIVIA
    }

    /// Whether this is a keyword token kind.
    pub fn is_keyword(self) -> bool {
        (ANIMATION_KEYWORD..=TRIGGER_KEYWORD).contains(&self)
    }

    /// Whether this is a trivia kind (structured or not).
    pub fn is_trivia(self) -> bool {
        (END_OF_LINE_TRIVIA..=SKIPPED_TOKENS_TRIVIA).contains(&self)
    }

    /// Whether this is trivia that wraps a sub-tree.
    pub fn is_structured_trivia(self) -> bool {
        self == SKIPPED_TOKENS_TRIVIA
    }

    /// Whether this is whitespace or end-of-line trivia.
    pub fn is_whitespace_trivia(self) -> bool {
        matches!(self, WHITESPACE_TRIVIA | END_OF_LINE_TRIVIA)
    }

    /// Whether this is comment trivia.
    pub fn is_comment_trivia(self) -> bool {
        matches!(self, SINGLE_LINE_COMMENT_TRIVIA | MULTI_LINE_COMMENT_TRIVIA)
    }

    /// Whether this is a composite node kind (excluding `LIST`).
    pub fn is_composite(self) -> bool {
        self > LIST
    }

    /// Whether this token kind is a selector combinator.
    pub fn is_combinator(self) -> bool {
        self == SPACE_TOKEN || EXPLICIT_COMBINATORS.contains(&self)
    }

    /// The keyword kind for a keyword's source text.
    pub fn from_keyword(text: &str) -> Option<Self> {
        Some(match text {
            "animation" => ANIMATION_KEYWORD,
            "as" => AS_KEYWORD,
            "event" => EVENT_KEYWORD,
            "handled" => HANDLED_KEYWORD,
            "!important" => IMPORTANT_KEYWORD,
            "keyframe" => KEYFRAME_KEYWORD,
            "play-sfx" => PLAY_SFX_KEYWORD,
            "play-storyboard" => PLAY_STORYBOARD_KEYWORD,
            "property" => PROPERTY_KEYWORD,
            "set" => SET_KEYWORD,
            "set-handled" => SET_HANDLED_KEYWORD,
            "target" => TARGET_KEYWORD,
            "transition" => TRANSITION_KEYWORD,
            "trigger" => TRIGGER_KEYWORD,
            _ => return None,
        })
    }

    /// The syntax kind a lexer token becomes.
    pub fn from_token(token: &Token<'_>) -> Self {
        match token.kind {
            TokenKind::EndOfLine => END_OF_LINE_TRIVIA,
            TokenKind::MultiLineComment => MULTI_LINE_COMMENT_TRIVIA,
            TokenKind::SingleLineComment => SINGLE_LINE_COMMENT_TRIVIA,
            TokenKind::WhiteSpace => WHITESPACE_TRIVIA,
            TokenKind::Directive => DIRECTIVE_TOKEN,
            TokenKind::Keyword => Self::from_keyword(token.text).unwrap_or(UNKNOWN_TOKEN),
            TokenKind::Identifier => IDENTIFIER_TOKEN,
            TokenKind::Number => NUMBER_TOKEN,
            TokenKind::OpenCurlyBrace => OPEN_CURLY_BRACE_TOKEN,
            TokenKind::CloseCurlyBrace => CLOSE_CURLY_BRACE_TOKEN,
            TokenKind::OpenParenthesis => OPEN_PARENTHESES_TOKEN,
            TokenKind::CloseParenthesis => CLOSE_PARENTHESES_TOKEN,
            TokenKind::OpenBracket => OPEN_BRACKET_TOKEN,
            TokenKind::CloseBracket => CLOSE_BRACKET_TOKEN,
            TokenKind::Colon => COLON_TOKEN,
            TokenKind::Semicolon => SEMICOLON_TOKEN,
            TokenKind::Comma => COMMA_TOKEN,
            TokenKind::Period => PERIOD_TOKEN,
            TokenKind::Hash => HASH_TOKEN,
            TokenKind::Asterisk => ASTERISK_TOKEN,
            TokenKind::ExclamationMark => EXCLAMATION_MARK_TOKEN,
            TokenKind::AtSign => AT_SIGN_TOKEN,
            TokenKind::Pipe => PIPE_TOKEN,
            TokenKind::Equals => EQUALS_TOKEN,
            TokenKind::NotEquals => NOT_EQUALS_TOKEN,
            TokenKind::LessThan => LESS_THAN_TOKEN,
            TokenKind::LessThanEquals => LESS_THAN_EQUALS_TOKEN,
            TokenKind::GreaterThan => GREATER_THAN_TOKEN,
            TokenKind::GreaterThanEquals => GREATER_THAN_EQUALS_TOKEN,
            TokenKind::GreaterThanGreaterThan => GREATER_THAN_GREATER_THAN_TOKEN,
            TokenKind::GreaterThanQuestionMark => GREATER_THAN_QUESTION_MARK_TOKEN,
            TokenKind::Unknown => UNKNOWN_TOKEN,
        }
    }

    /// The slot layout of a composite kind; empty for every other kind.
    pub fn slots(self) -> &'static [Slot] {
        match self {
            DOCUMENT => layout![
                required("content", List(RULE_SET)),
                required("end_of_file", Tok(&[END_OF_FILE_TOKEN])),
            ],
            RULE_SET => layout![
                required("selectors", SeparatedList(SELECTOR_WITH_NAVIGATION_EXPRESSION)),
                required("body", Node(BLOCK)),
            ],
            SELECTOR_WITH_NAVIGATION_EXPRESSION => layout![
                required("selector", Node(SELECTOR)),
                optional("navigation_expression", Node(NAVIGATION_EXPRESSION)),
            ],
            SELECTOR => layout![required("components", List(SELECTOR_PART))],
            SELECTOR_PART => layout![
                required("sub_parts", List(SELECTOR_SUB_PART)),
                optional("pseudo_class", Node(PSEUDO_CLASS)),
            ],
            SELECTOR_SUB_PART => layout![
                optional("leading_qualifier", Tok(&[HASH_TOKEN, PERIOD_TOKEN])),
                required("text", Tok(&[IDENTIFIER_TOKEN, ASTERISK_TOKEN])),
                optional("trailing_qualifier", Tok(&[EXCLAMATION_MARK_TOKEN])),
            ],
            PSEUDO_CLASS => layout![
                required("colon", Tok(&[COLON_TOKEN])),
                required("class_name", Node(IDENTIFIER)),
            ],
            SELECTOR_WITH_PARENTHESES => layout![
                required("open_paren", OPEN_PAREN),
                required("selector", Node(SELECTOR)),
                required("close_paren", CLOSE_PAREN),
            ],
            NAVIGATION_EXPRESSION => layout![
                required("pipe", Tok(&[PIPE_TOKEN])),
                required("property_name", Node(PROPERTY_NAME)),
                optional("indexer", Node(NAVIGATION_EXPRESSION_INDEXER)),
                required("as_keyword", Tok(&[AS_KEYWORD])),
                required("type_name", Node(IDENTIFIER)),
            ],
            NAVIGATION_EXPRESSION_INDEXER => layout![
                required("open_bracket", Tok(&[OPEN_BRACKET_TOKEN])),
                required("number", Tok(&[NUMBER_TOKEN])),
                required("close_bracket", Tok(&[CLOSE_BRACKET_TOKEN])),
            ],
            IDENTIFIER => layout![required("identifier", Tok(&[IDENTIFIER_TOKEN]))],
            PROPERTY_NAME => layout![
                optional("attached_property_owner_name", Node(IDENTIFIER)),
                optional("period", Tok(&[PERIOD_TOKEN])),
                required("property_name", Node(IDENTIFIER)),
            ],
            EVENT_NAME => layout![
                optional("attached_event_owner_name", Node(IDENTIFIER)),
                optional("period", Tok(&[PERIOD_TOKEN])),
                required("event_name", Node(IDENTIFIER)),
            ],
            BLOCK => layout![
                required("open_brace", OPEN_BRACE),
                required("content", List(RULE)),
                required("close_brace", CLOSE_BRACE),
            ],
            RULE => layout![
                required("property_name", Node(PROPERTY_NAME)),
                required("colon", Tok(&[COLON_TOKEN])),
                required("value", Node(PROPERTY_VALUE)),
                optional("qualifier", IMPORTANT),
                required("semicolon", Tok(&[SEMICOLON_TOKEN])),
            ],
            PROPERTY_VALUE => layout![required("content", Tok(&[PROPERTY_VALUE_TOKEN]))],
            PROPERTY_VALUE_WITH_BRACES => layout![
                required("open_brace", OPEN_BRACE),
                required("content", Tok(&[PROPERTY_VALUE_TOKEN])),
                required("close_brace", CLOSE_BRACE),
            ],
            EVENT_TRIGGER => layout![
                required("trigger_keyword", Tok(&[TRIGGER_KEYWORD])),
                required("event_keyword", Tok(&[EVENT_KEYWORD])),
                required("event_name", Node(EVENT_NAME)),
                optional("argument_list", Node(EVENT_TRIGGER_ARGUMENT_LIST)),
                optional("qualifier", IMPORTANT),
                required("body", Node(BLOCK)),
            ],
            EVENT_TRIGGER_ARGUMENT_LIST => layout![
                required("open_paren", OPEN_PAREN),
                required("arguments", SeparatedList(HANDLED_KEYWORD)),
                required("close_paren", CLOSE_PAREN),
            ],
            PROPERTY_TRIGGER => layout![
                required("trigger_keyword", Tok(&[TRIGGER_KEYWORD])),
                required("property_keyword", Tok(&[PROPERTY_KEYWORD])),
                required("conditions", SeparatedList(PROPERTY_TRIGGER_CONDITION)),
                optional("qualifier", IMPORTANT),
                required("body", Node(BLOCK)),
            ],
            PROPERTY_TRIGGER_CONDITION => layout![
                required("property_name", Node(PROPERTY_NAME)),
                required("comparison_operator", Tok(COMPARISON_OPERATORS)),
                required("value", Node(PROPERTY_VALUE_WITH_BRACES)),
            ],
            PLAY_STORYBOARD_TRIGGER_ACTION => layout![
                required("play_storyboard_keyword", Tok(&[PLAY_STORYBOARD_KEYWORD])),
                optional("selector", Node(SELECTOR_WITH_PARENTHESES)),
                required("value", Node(PROPERTY_VALUE_WITH_BRACES)),
            ],
            PLAY_SFX_TRIGGER_ACTION => layout![
                required("play_sfx_keyword", Tok(&[PLAY_SFX_KEYWORD])),
                required("value", Node(PROPERTY_VALUE_WITH_BRACES)),
            ],
            SET_TRIGGER_ACTION => layout![
                required("set_keyword", Tok(&[SET_KEYWORD])),
                required("property_name", Node(PROPERTY_NAME)),
                optional("selector", Node(SELECTOR_WITH_PARENTHESES)),
                required("value", Node(PROPERTY_VALUE_WITH_BRACES)),
            ],
            TRANSITION => layout![
                required("transition_keyword", Tok(&[TRANSITION_KEYWORD])),
                required("argument_list", Node(TRANSITION_ARGUMENT_LIST)),
                required("colon", Tok(&[COLON_TOKEN])),
                required("value", Node(PROPERTY_VALUE)),
                optional("qualifier", IMPORTANT),
                required("semicolon", Tok(&[SEMICOLON_TOKEN])),
            ],
            TRANSITION_ARGUMENT_LIST => layout![
                required("open_paren", OPEN_PAREN),
                required("arguments", SeparatedList(IDENTIFIER)),
                required("close_paren", CLOSE_PAREN),
            ],
            STORYBOARD => layout![
                required("at_sign", Tok(&[AT_SIGN_TOKEN])),
                required("name", Node(IDENTIFIER)),
                optional("loop_identifier", Node(IDENTIFIER)),
                required("body", Node(BLOCK)),
            ],
            STORYBOARD_TARGET => layout![
                required("target_keyword", Tok(&[TARGET_KEYWORD])),
                optional("type_name", Node(IDENTIFIER)),
                optional("selector", Node(SELECTOR_WITH_PARENTHESES)),
                required("body", Node(BLOCK)),
            ],
            ANIMATION => layout![
                required("animation_keyword", Tok(&[ANIMATION_KEYWORD])),
                required("property_name", Node(PROPERTY_NAME)),
                optional("navigation_expression", Node(NAVIGATION_EXPRESSION)),
                required("body", Node(BLOCK)),
            ],
            ANIMATION_KEYFRAME => layout![
                required("keyframe_keyword", Tok(&[KEYFRAME_KEYWORD])),
                required("time", Tok(&[NUMBER_TOKEN])),
                optional("easing", Node(IDENTIFIER)),
                required("value", Node(PROPERTY_VALUE_WITH_BRACES)),
            ],
            CULTURE_DIRECTIVE => layout![
                required("directive", Tok(&[DIRECTIVE_TOKEN])),
                required("value", Node(PROPERTY_VALUE_WITH_BRACES)),
            ],
            UNKNOWN_DIRECTIVE => layout![
                required("directive", Tok(&[DIRECTIVE_TOKEN])),
                optional("value", Node(PROPERTY_VALUE_WITH_BRACES)),
            ],
            _ => &[],
        }
    }

    /// Index of the named slot in this kind's layout.
    pub fn slot_index(self, name: &str) -> Option<usize> {
        self.slots().iter().position(|slot| slot.name == name)
    }

    /// Fixed source text of punctuation and keyword kinds.
    pub fn fixed_text(self) -> Option<&'static str> {
        Some(match self {
            OPEN_CURLY_BRACE_TOKEN => "{",
            CLOSE_CURLY_BRACE_TOKEN => "}",
            OPEN_PARENTHESES_TOKEN => "(",
            CLOSE_PARENTHESES_TOKEN => ")",
            OPEN_BRACKET_TOKEN => "[",
            CLOSE_BRACKET_TOKEN => "]",
            COLON_TOKEN => ":",
            SEMICOLON_TOKEN => ";",
            COMMA_TOKEN => ",",
            PERIOD_TOKEN => ".",
            HASH_TOKEN => "#",
            ASTERISK_TOKEN => "*",
            EXCLAMATION_MARK_TOKEN => "!",
            AT_SIGN_TOKEN => "@",
            PIPE_TOKEN => "|",
            EQUALS_TOKEN => "=",
            NOT_EQUALS_TOKEN => "<>",
            LESS_THAN_TOKEN => "<",
            LESS_THAN_EQUALS_TOKEN => "<=",
            GREATER_THAN_TOKEN => ">",
            GREATER_THAN_EQUALS_TOKEN => ">=",
            GREATER_THAN_GREATER_THAN_TOKEN => ">>",
            GREATER_THAN_QUESTION_MARK_TOKEN => ">?",
            ANIMATION_KEYWORD => "animation",
            AS_KEYWORD => "as",
            EVENT_KEYWORD => "event",
            HANDLED_KEYWORD => "handled",
            IMPORTANT_KEYWORD => "!important",
            KEYFRAME_KEYWORD => "keyframe",
            PLAY_SFX_KEYWORD => "play-sfx",
            PLAY_STORYBOARD_KEYWORD => "play-storyboard",
            PROPERTY_KEYWORD => "property",
            SET_KEYWORD => "set",
            SET_HANDLED_KEYWORD => "set-handled",
            TARGET_KEYWORD => "target",
            TRANSITION_KEYWORD => "transition",
            TRIGGER_KEYWORD => "trigger",
            _ => return None,
        })
    }

    /// Human-readable name used in diagnostics.
    pub fn describe(self) -> String {
        if let Some(text) = self.fixed_text() {
            return format!("'{text}'");
        }
        match self {
            IDENTIFIER_TOKEN | IDENTIFIER => "identifier".into(),
            NUMBER_TOKEN => "number".into(),
            PROPERTY_VALUE_TOKEN | PROPERTY_VALUE => "property value".into(),
            END_OF_FILE_TOKEN => "end of file".into(),
            _ => format!("{self:?}").to_lowercase().replace('_', " "),
        }
    }
}
