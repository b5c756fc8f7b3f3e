//! Typed AST wrappers over CST nodes.
//!
//! These provide a more ergonomic API for navigating the syntax tree
//! while still preserving access to the underlying CST for source locations.
//! Accessors return `None` for absent optional slots; placeholders the parser
//! inserted are still returned as nodes, but token text accessors skip them.

use crate::{SeparatedSyntaxList, SyntaxKind, SyntaxList, SyntaxNode};

/// Trait for AST nodes that wrap CST nodes.
pub trait AstNode<'t>: Sized {
    /// Try to cast a syntax node to this AST type.
    fn cast(node: SyntaxNode<'t>) -> Option<Self>;

    /// Get the underlying syntax node.
    fn syntax(&self) -> SyntaxNode<'t>;

    /// Source text of this node without its outer trivia.
    fn text(&self) -> String {
        let node = self.syntax();
        let full = node.to_full_string();
        let start = node.leading_trivia_width() as usize;
        let end = start + node.width() as usize;
        full.get(start..end).unwrap_or_default().to_string()
    }
}

/// Macro for defining simple AST node wrappers.
macro_rules! ast_node {
    ($(#[$meta:meta])* $name:ident, $kind:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $name<'t>(SyntaxNode<'t>);

        impl<'t> AstNode<'t> for $name<'t> {
            fn cast(node: SyntaxNode<'t>) -> Option<Self> {
                if node.kind() == $kind {
                    Some(Self(node))
                } else {
                    None
                }
            }

            fn syntax(&self) -> SyntaxNode<'t> {
                self.0
            }
        }
    };
}

/// Macro for enums over several node kinds.
macro_rules! ast_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident($ty:ident) = $kind:ident,)* }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $name<'t> {
            $($variant($ty<'t>),)*
        }

        impl<'t> AstNode<'t> for $name<'t> {
            fn cast(node: SyntaxNode<'t>) -> Option<Self> {
                match node.kind() {
                    $(SyntaxKind::$kind => Some($name::$variant($ty(node))),)*
                    _ => None,
                }
            }

            fn syntax(&self) -> SyntaxNode<'t> {
                match self {
                    $($name::$variant(node) => node.syntax(),)*
                }
            }
        }
    };
}

ast_node!(
    /// The root document node.
    Document,
    SyntaxKind::DOCUMENT
);

ast_node!(
    /// Selectors followed by a block of rules.
    RuleSet,
    SyntaxKind::RULE_SET
);

ast_node!(
    /// A selector with an optional `| Property as Type` suffix.
    SelectorWithNavigationExpression,
    SyntaxKind::SELECTOR_WITH_NAVIGATION_EXPRESSION
);

ast_node!(
    /// Selector parts joined by combinators.
    Selector,
    SyntaxKind::SELECTOR
);

ast_node!(
    /// Adjacent sub-parts with an optional pseudo-class, e.g. `Button#ok.big:hover`.
    SelectorPart,
    SyntaxKind::SELECTOR_PART
);

ast_node!(
    /// One of `Type`, `Type!`, `#id`, `.class` or `*`.
    SelectorSubPart,
    SyntaxKind::SELECTOR_SUB_PART
);

ast_node!(PseudoClass, SyntaxKind::PSEUDO_CLASS);

ast_node!(
    /// `( selector )` in trigger actions and storyboard targets.
    SelectorWithParentheses,
    SyntaxKind::SELECTOR_WITH_PARENTHESES
);

ast_node!(NavigationExpression, SyntaxKind::NAVIGATION_EXPRESSION);

ast_node!(Identifier, SyntaxKind::IDENTIFIER);

ast_node!(
    /// `Name` or `Owner.Name`.
    PropertyName,
    SyntaxKind::PROPERTY_NAME
);

ast_node!(EventName, SyntaxKind::EVENT_NAME);

ast_node!(Block, SyntaxKind::BLOCK);

ast_node!(
    /// `Name: value [!important];`
    Rule,
    SyntaxKind::RULE
);

ast_node!(PropertyValue, SyntaxKind::PROPERTY_VALUE);

ast_node!(PropertyValueWithBraces, SyntaxKind::PROPERTY_VALUE_WITH_BRACES);

ast_node!(EventTrigger, SyntaxKind::EVENT_TRIGGER);

ast_node!(PropertyTrigger, SyntaxKind::PROPERTY_TRIGGER);

ast_node!(PropertyTriggerCondition, SyntaxKind::PROPERTY_TRIGGER_CONDITION);

ast_node!(PlayStoryboardTriggerAction, SyntaxKind::PLAY_STORYBOARD_TRIGGER_ACTION);

ast_node!(PlaySfxTriggerAction, SyntaxKind::PLAY_SFX_TRIGGER_ACTION);

ast_node!(SetTriggerAction, SyntaxKind::SET_TRIGGER_ACTION);

ast_node!(
    /// `transition (Property, Group): value;`
    Transition,
    SyntaxKind::TRANSITION
);

ast_node!(
    /// `@Name [loop] { targets }`
    Storyboard,
    SyntaxKind::STORYBOARD
);

ast_node!(StoryboardTarget, SyntaxKind::STORYBOARD_TARGET);

ast_node!(Animation, SyntaxKind::ANIMATION);

ast_node!(AnimationKeyframe, SyntaxKind::ANIMATION_KEYFRAME);

ast_node!(
    /// `$culture { name }`
    CultureDirective,
    SyntaxKind::CULTURE_DIRECTIVE
);

ast_node!(UnknownDirective, SyntaxKind::UNKNOWN_DIRECTIVE);

ast_enum!(
    /// A top-level construct.
    DocumentItem {
        RuleSet(RuleSet) = RULE_SET,
        Storyboard(Storyboard) = STORYBOARD,
        CultureDirective(CultureDirective) = CULTURE_DIRECTIVE,
        UnknownDirective(UnknownDirective) = UNKNOWN_DIRECTIVE,
    }
);

ast_enum!(
    /// Anything a block may contain.
    BlockItem {
        Rule(Rule) = RULE,
        EventTrigger(EventTrigger) = EVENT_TRIGGER,
        PropertyTrigger(PropertyTrigger) = PROPERTY_TRIGGER,
        Transition(Transition) = TRANSITION,
        PlayStoryboard(PlayStoryboardTriggerAction) = PLAY_STORYBOARD_TRIGGER_ACTION,
        PlaySfx(PlaySfxTriggerAction) = PLAY_SFX_TRIGGER_ACTION,
        Set(SetTriggerAction) = SET_TRIGGER_ACTION,
        Target(StoryboardTarget) = STORYBOARD_TARGET,
        Animation(Animation) = ANIMATION,
        Keyframe(AnimationKeyframe) = ANIMATION_KEYFRAME,
    }
);

// === Helpers ===

fn child<'t, N: AstNode<'t>>(node: SyntaxNode<'t>, slot: &str) -> Option<N> {
    node.named_slot(slot).and_then(N::cast)
}

/// A present, non-missing token.
fn token<'t>(node: SyntaxNode<'t>, slot: &str) -> Option<SyntaxNode<'t>> {
    node.named_slot(slot).filter(|token| !token.is_missing())
}

fn token_text<'t>(node: SyntaxNode<'t>, slot: &str) -> Option<&'t str> {
    token(node, slot).map(|token| token.text())
}

fn list<'t, N: AstNode<'t> + 't>(
    node: SyntaxNode<'t>,
    slot: &'static str,
) -> impl Iterator<Item = N> + 't {
    SyntaxList::new(node.named_slot(slot))
        .iter()
        .filter_map(N::cast)
}

fn separated_list<'t, N: AstNode<'t> + 't>(
    node: SyntaxNode<'t>,
    slot: &'static str,
) -> impl Iterator<Item = N> + 't {
    SeparatedSyntaxList::new(node.named_slot(slot))
        .iter()
        .filter_map(N::cast)
}

fn braced_value<'t>(node: SyntaxNode<'t>, slot: &str) -> Option<&'t str> {
    child::<PropertyValueWithBraces>(node, slot)?.value()
}

// === Document ===

impl<'t> Document<'t> {
    /// Top-level constructs in source order.
    pub fn items(self) -> impl Iterator<Item = DocumentItem<'t>> + 't {
        list(self.0, "content")
    }

    pub fn rule_sets(self) -> impl Iterator<Item = RuleSet<'t>> + 't {
        list(self.0, "content")
    }

    pub fn storyboards(self) -> impl Iterator<Item = Storyboard<'t>> + 't {
        list(self.0, "content")
    }

    /// The culture named by the first `$culture` directive.
    pub fn culture(&self) -> Option<&'t str> {
        list::<CultureDirective>(self.0, "content").find_map(|directive| directive.culture())
    }
}

// === Selectors ===

impl<'t> RuleSet<'t> {
    pub fn selectors(self) -> impl Iterator<Item = SelectorWithNavigationExpression<'t>> + 't {
        separated_list(self.0, "selectors")
    }

    pub fn body(&self) -> Option<Block<'t>> {
        child(self.0, "body")
    }

    pub fn items(self) -> impl Iterator<Item = BlockItem<'t>> + 't {
        self.body().into_iter().flat_map(|body| body.items())
    }

    pub fn rules(self) -> impl Iterator<Item = Rule<'t>> + 't {
        self.items().filter_map(|item| match item {
            BlockItem::Rule(rule) => Some(rule),
            _ => None,
        })
    }
}

impl<'t> SelectorWithNavigationExpression<'t> {
    pub fn selector(&self) -> Option<Selector<'t>> {
        child(self.0, "selector")
    }

    pub fn navigation_expression(&self) -> Option<NavigationExpression<'t>> {
        child(self.0, "navigation_expression")
    }
}

/// How two selector parts are related.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// Whitespace
    Descendant,
    /// `>`
    Child,
    /// `>>`
    LogicalChild,
    /// `>?`
    TemplatedChild,
}

impl Combinator {
    pub fn from_kind(kind: SyntaxKind) -> Option<Self> {
        Some(match kind {
            SyntaxKind::SPACE_TOKEN => Combinator::Descendant,
            SyntaxKind::GREATER_THAN_TOKEN => Combinator::Child,
            SyntaxKind::GREATER_THAN_GREATER_THAN_TOKEN => Combinator::LogicalChild,
            SyntaxKind::GREATER_THAN_QUESTION_MARK_TOKEN => Combinator::TemplatedChild,
            _ => return None,
        })
    }
}

/// A selector part or the combinator between two parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorComponent<'t> {
    Part(SelectorPart<'t>),
    Combinator(Combinator),
}

impl<'t> Selector<'t> {
    pub fn components(self) -> impl Iterator<Item = SelectorComponent<'t>> + 't {
        SyntaxList::new(self.0.named_slot("components"))
            .iter()
            .filter_map(|node| match SelectorPart::cast(node) {
                Some(part) => Some(SelectorComponent::Part(part)),
                None => Combinator::from_kind(node.kind()).map(SelectorComponent::Combinator),
            })
    }

    pub fn parts(self) -> impl Iterator<Item = SelectorPart<'t>> + 't {
        list(self.0, "components")
    }
}

impl<'t> SelectorPart<'t> {
    pub fn sub_parts(self) -> impl Iterator<Item = SelectorSubPart<'t>> + 't {
        list(self.0, "sub_parts")
    }

    pub fn pseudo_class(&self) -> Option<PseudoClass<'t>> {
        child(self.0, "pseudo_class")
    }

    /// The element type this part matches, if it names one.
    pub fn element_type(&self) -> Option<&'t str> {
        self.sub_parts()
            .find(|sub_part| sub_part.is_type())
            .and_then(|sub_part| sub_part.name())
    }
}

impl<'t> SelectorSubPart<'t> {
    fn qualifier(&self) -> Option<SyntaxKind> {
        token(self.0, "leading_qualifier").map(|token| token.kind())
    }

    /// Identifier text, or `*`.
    pub fn name(&self) -> Option<&'t str> {
        token_text(self.0, "text")
    }

    pub fn is_id(&self) -> bool {
        self.qualifier() == Some(SyntaxKind::HASH_TOKEN)
    }

    pub fn is_class(&self) -> bool {
        self.qualifier() == Some(SyntaxKind::PERIOD_TOKEN)
    }

    pub fn is_universal(&self) -> bool {
        self.name() == Some("*")
    }

    /// An unqualified identifier: an element type.
    pub fn is_type(&self) -> bool {
        self.qualifier().is_none() && !self.is_universal()
    }

    /// `Type!` matches the type exactly, excluding subclasses.
    pub fn is_exact_type(&self) -> bool {
        token(self.0, "trailing_qualifier").is_some()
    }
}

impl<'t> PseudoClass<'t> {
    pub fn class_name(&self) -> Option<&'t str> {
        child::<Identifier>(self.0, "class_name")?.name()
    }
}

impl<'t> SelectorWithParentheses<'t> {
    pub fn selector(&self) -> Option<Selector<'t>> {
        child(self.0, "selector")
    }
}

impl<'t> NavigationExpression<'t> {
    pub fn property_name(&self) -> Option<PropertyName<'t>> {
        child(self.0, "property_name")
    }

    /// The `[n]` index, as written.
    pub fn index(&self) -> Option<&'t str> {
        let indexer = self.0.named_slot("indexer")?;
        token_text(indexer, "number")
    }

    pub fn type_name(&self) -> Option<&'t str> {
        child::<Identifier>(self.0, "type_name")?.name()
    }
}

// === Names ===

impl<'t> Identifier<'t> {
    pub fn name(&self) -> Option<&'t str> {
        token_text(self.0, "identifier")
    }
}

impl<'t> PropertyName<'t> {
    /// The owner of an attached property.
    pub fn owner(&self) -> Option<&'t str> {
        child::<Identifier>(self.0, "attached_property_owner_name")?.name()
    }

    pub fn name(&self) -> Option<&'t str> {
        child::<Identifier>(self.0, "property_name")?.name()
    }

    pub fn is_attached(&self) -> bool {
        self.owner().is_some()
    }

    /// `Owner.Name` or `Name`.
    pub fn full_name(&self) -> Option<String> {
        let name = self.name()?;
        Some(match self.owner() {
            Some(owner) => format!("{owner}.{name}"),
            None => name.to_string(),
        })
    }
}

impl<'t> EventName<'t> {
    pub fn owner(&self) -> Option<&'t str> {
        child::<Identifier>(self.0, "attached_event_owner_name")?.name()
    }

    pub fn name(&self) -> Option<&'t str> {
        child::<Identifier>(self.0, "event_name")?.name()
    }
}

// === Blocks and rules ===

impl<'t> Block<'t> {
    pub fn items(self) -> impl Iterator<Item = BlockItem<'t>> + 't {
        list(self.0, "content")
    }

    /// Whether the closing brace is present.
    pub fn is_closed(&self) -> bool {
        token(self.0, "close_brace").is_some()
    }
}

impl<'t> Rule<'t> {
    pub fn property_name(&self) -> Option<PropertyName<'t>> {
        child(self.0, "property_name")
    }

    pub fn property_name_text(&self) -> Option<String> {
        self.property_name()?.full_name()
    }

    pub fn value(&self) -> Option<PropertyValue<'t>> {
        child(self.0, "value")
    }

    pub fn value_text(&self) -> Option<&'t str> {
        self.value()?.value()
    }

    pub fn is_important(&self) -> bool {
        token(self.0, "qualifier").is_some()
    }
}

impl<'t> PropertyValue<'t> {
    /// The raw value, interior trivia included.
    pub fn value(&self) -> Option<&'t str> {
        token_text(self.0, "content")
    }
}

impl<'t> PropertyValueWithBraces<'t> {
    /// The raw text between the braces, without its outer trivia.
    pub fn value(&self) -> Option<&'t str> {
        token_text(self.0, "content")
    }
}

// === Triggers ===

impl<'t> EventTrigger<'t> {
    pub fn event_name(&self) -> Option<EventName<'t>> {
        child(self.0, "event_name")
    }

    fn arguments(self) -> impl Iterator<Item = SyntaxKind> + 't {
        let list = self.0.named_slot("argument_list");
        SeparatedSyntaxList::new(list.and_then(|list| list.named_slot("arguments")))
            .iter()
            .filter(|token| !token.is_missing())
            .map(|token| token.kind())
    }

    /// `(handled)`: the trigger also fires for handled events.
    pub fn handled(&self) -> bool {
        self.arguments().any(|kind| kind == SyntaxKind::HANDLED_KEYWORD)
    }

    /// `(set-handled)`: the trigger marks the event handled.
    pub fn set_handled(&self) -> bool {
        self.arguments()
            .any(|kind| kind == SyntaxKind::SET_HANDLED_KEYWORD)
    }

    pub fn is_important(&self) -> bool {
        token(self.0, "qualifier").is_some()
    }

    pub fn body(&self) -> Option<Block<'t>> {
        child(self.0, "body")
    }
}

impl<'t> PropertyTrigger<'t> {
    pub fn conditions(self) -> impl Iterator<Item = PropertyTriggerCondition<'t>> + 't {
        separated_list(self.0, "conditions")
    }

    pub fn is_important(&self) -> bool {
        token(self.0, "qualifier").is_some()
    }

    pub fn body(&self) -> Option<Block<'t>> {
        child(self.0, "body")
    }
}

impl<'t> PropertyTriggerCondition<'t> {
    pub fn property_name(&self) -> Option<PropertyName<'t>> {
        child(self.0, "property_name")
    }

    pub fn operator(&self) -> Option<SyntaxKind> {
        token(self.0, "comparison_operator").map(|token| token.kind())
    }

    pub fn value(&self) -> Option<&'t str> {
        braced_value(self.0, "value")
    }
}

impl<'t> PlayStoryboardTriggerAction<'t> {
    pub fn selector(&self) -> Option<SelectorWithParentheses<'t>> {
        child(self.0, "selector")
    }

    pub fn storyboard_name(&self) -> Option<&'t str> {
        braced_value(self.0, "value")
    }
}

impl<'t> PlaySfxTriggerAction<'t> {
    pub fn sound(&self) -> Option<&'t str> {
        braced_value(self.0, "value")
    }
}

impl<'t> SetTriggerAction<'t> {
    pub fn property_name(&self) -> Option<PropertyName<'t>> {
        child(self.0, "property_name")
    }

    pub fn selector(&self) -> Option<SelectorWithParentheses<'t>> {
        child(self.0, "selector")
    }

    pub fn value(&self) -> Option<&'t str> {
        braced_value(self.0, "value")
    }
}

impl<'t> Transition<'t> {
    /// Property name, storyboard group and optional owner, as written.
    pub fn arguments(self) -> impl Iterator<Item = Identifier<'t>> + 't {
        let list = self.0.named_slot("argument_list");
        SeparatedSyntaxList::new(list.and_then(|list| list.named_slot("arguments")))
            .iter()
            .filter_map(Identifier::cast)
    }

    pub fn value_text(&self) -> Option<&'t str> {
        child::<PropertyValue>(self.0, "value")?.value()
    }

    pub fn is_important(&self) -> bool {
        token(self.0, "qualifier").is_some()
    }
}

// === Storyboards ===

impl<'t> Storyboard<'t> {
    pub fn name(&self) -> Option<&'t str> {
        child::<Identifier>(self.0, "name")?.name()
    }

    /// The identifier after the name, e.g. `loop`.
    pub fn loop_identifier(&self) -> Option<&'t str> {
        child::<Identifier>(self.0, "loop_identifier")?.name()
    }

    pub fn targets(self) -> impl Iterator<Item = StoryboardTarget<'t>> + 't {
        let body: Option<Block<'t>> = child(self.0, "body");
        body.into_iter().flat_map(|body| list(body.0, "content"))
    }
}

impl<'t> StoryboardTarget<'t> {
    pub fn type_name(&self) -> Option<&'t str> {
        child::<Identifier>(self.0, "type_name")?.name()
    }

    pub fn selector(&self) -> Option<SelectorWithParentheses<'t>> {
        child(self.0, "selector")
    }

    pub fn animations(self) -> impl Iterator<Item = Animation<'t>> + 't {
        let body: Option<Block<'t>> = child(self.0, "body");
        body.into_iter().flat_map(|body| list(body.0, "content"))
    }
}

impl<'t> Animation<'t> {
    pub fn property_name(&self) -> Option<PropertyName<'t>> {
        child(self.0, "property_name")
    }

    pub fn navigation_expression(&self) -> Option<NavigationExpression<'t>> {
        child(self.0, "navigation_expression")
    }

    pub fn keyframes(self) -> impl Iterator<Item = AnimationKeyframe<'t>> + 't {
        let body: Option<Block<'t>> = child(self.0, "body");
        body.into_iter().flat_map(|body| list(body.0, "content"))
    }
}

impl<'t> AnimationKeyframe<'t> {
    /// Time in milliseconds, as written.
    pub fn time(&self) -> Option<&'t str> {
        token_text(self.0, "time")
    }

    pub fn easing(&self) -> Option<&'t str> {
        child::<Identifier>(self.0, "easing")?.name()
    }

    pub fn value(&self) -> Option<&'t str> {
        braced_value(self.0, "value")
    }
}

// === Directives ===

impl<'t> CultureDirective<'t> {
    pub fn culture(&self) -> Option<&'t str> {
        braced_value(self.0, "value")
    }
}

impl<'t> UnknownDirective<'t> {
    /// The directive token, `$` included.
    pub fn directive(&self) -> Option<&'t str> {
        token_text(self.0, "directive")
    }

    pub fn value(&self) -> Option<&'t str> {
        braced_value(self.0, "value")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    const SOURCE: &str = r#"$culture { en-US }
$other
Grid > Button!#ok.big:hover, .x |Content[0] as Label {
    Width: 100;
    Grid.Row: 1 !important;
    transition (Opacity, Normal): 0:0:1 linear 0 1;
    trigger event Button.Click (handled, set-handled) {
        play-sfx { click.wav }
        play-storyboard (#x) { Fade }
    }
    trigger property IsEnabled = {false}, IsFocused <> {true} !important {
        set Opacity (#y) { 0.5 }
    }
}
@Fade loop {
    target Button (#ok) {
        animation Opacity { keyframe 0 {0} keyframe 250 ease-in {1} }
    }
}
"#;

    #[test]
    fn document_items() {
        let parse = parse(SOURCE);
        assert!(parse.is_ok(), "{:?}", parse.diagnostics());
        let doc = Document::cast(parse.root()).unwrap();
        let kinds: Vec<_> = doc.items().map(|item| item.syntax().kind()).collect();
        assert_eq!(
            kinds,
            [
                SyntaxKind::CULTURE_DIRECTIVE,
                SyntaxKind::UNKNOWN_DIRECTIVE,
                SyntaxKind::RULE_SET,
                SyntaxKind::STORYBOARD,
            ]
        );
        assert_eq!(doc.culture(), Some("en-US"));
        assert_eq!(doc.rule_sets().count(), 1);
        let DocumentItem::UnknownDirective(other) = doc.items().nth(1).unwrap() else {
            panic!("expected an unknown directive");
        };
        assert_eq!(other.directive(), Some("$other"));
        assert_eq!(other.value(), None);
    }

    #[test]
    fn selectors() {
        let parse = parse(SOURCE);
        let doc = Document::cast(parse.root()).unwrap();
        let rule_set = doc.rule_sets().next().unwrap();
        let selectors: Vec<_> = rule_set.selectors().collect();
        assert_eq!(selectors.len(), 2);
        assert_eq!(selectors[0].text(), "Grid > Button!#ok.big:hover");

        let selector = selectors[0].selector().unwrap();
        let components: Vec<_> = selector.components().collect();
        assert_eq!(components.len(), 3);
        assert_eq!(
            components[1],
            SelectorComponent::Combinator(Combinator::Child)
        );

        let button = selector.parts().nth(1).unwrap();
        assert_eq!(button.element_type(), Some("Button"));
        let sub_parts: Vec<_> = button.sub_parts().collect();
        assert!(sub_parts[0].is_exact_type());
        assert!(sub_parts[1].is_id());
        assert!(sub_parts[2].is_class());
        assert_eq!(sub_parts[2].name(), Some("big"));
        assert_eq!(button.pseudo_class().unwrap().class_name(), Some("hover"));

        let navigation = selectors[1].navigation_expression().unwrap();
        assert_eq!(
            navigation.property_name().unwrap().full_name().as_deref(),
            Some("Content")
        );
        assert_eq!(navigation.index(), Some("0"));
        assert_eq!(navigation.type_name(), Some("Label"));
    }

    #[test]
    fn rules_and_triggers() {
        let parse = parse(SOURCE);
        let doc = Document::cast(parse.root()).unwrap();
        let rule_set = doc.rule_sets().next().unwrap();

        let rules: Vec<_> = rule_set.rules().collect();
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].property_name_text().as_deref(), Some("Width"));
        assert_eq!(rules[0].value_text(), Some("100"));
        assert!(!rules[0].is_important());
        assert_eq!(rules[1].property_name_text().as_deref(), Some("Grid.Row"));
        assert!(rules[1].property_name().unwrap().is_attached());
        assert!(rules[1].is_important());

        let mut items = rule_set.items().skip(2);
        let Some(BlockItem::Transition(transition)) = items.next() else {
            panic!("expected a transition");
        };
        let arguments: Vec<_> = transition.arguments().filter_map(|a| a.name()).collect();
        assert_eq!(arguments, ["Opacity", "Normal"]);
        assert_eq!(transition.value_text(), Some("0:0:1 linear 0 1"));

        let Some(BlockItem::EventTrigger(event)) = items.next() else {
            panic!("expected an event trigger");
        };
        let name = event.event_name().unwrap();
        assert_eq!((name.owner(), name.name()), (Some("Button"), Some("Click")));
        assert!(event.handled() && event.set_handled());
        let actions: Vec<_> = event.body().unwrap().items().collect();
        let BlockItem::PlaySfx(sfx) = actions[0] else {
            panic!("expected play-sfx");
        };
        assert_eq!(sfx.sound(), Some("click.wav"));
        let BlockItem::PlayStoryboard(play) = actions[1] else {
            panic!("expected play-storyboard");
        };
        assert_eq!(play.storyboard_name(), Some("Fade"));
        assert!(play.selector().is_some());

        let Some(BlockItem::PropertyTrigger(trigger)) = items.next() else {
            panic!("expected a property trigger");
        };
        assert!(trigger.is_important());
        let conditions: Vec<_> = trigger.conditions().collect();
        assert_eq!(conditions.len(), 2);
        assert_eq!(conditions[1].operator(), Some(SyntaxKind::NOT_EQUALS_TOKEN));
        assert_eq!(conditions[1].value(), Some("true"));
        let Some(BlockItem::Set(set)) = trigger.body().unwrap().items().next() else {
            panic!("expected a set action");
        };
        assert_eq!(
            set.property_name().unwrap().full_name().as_deref(),
            Some("Opacity")
        );
        assert_eq!(set.value(), Some("0.5"));
    }

    #[test]
    fn storyboards() {
        let parse = parse(SOURCE);
        let doc = Document::cast(parse.root()).unwrap();
        let storyboard = doc.storyboards().next().unwrap();
        assert_eq!(storyboard.name(), Some("Fade"));
        assert_eq!(storyboard.loop_identifier(), Some("loop"));

        let target = storyboard.targets().next().unwrap();
        assert_eq!(target.type_name(), Some("Button"));
        let animation = target.animations().next().unwrap();
        let keyframes: Vec<_> = animation
            .keyframes()
            .map(|k| (k.time(), k.easing(), k.value()))
            .collect();
        assert_eq!(
            keyframes,
            [
                (Some("0"), None, Some("0")),
                (Some("250"), Some("ease-in"), Some("1")),
            ]
        );
    }

    #[test]
    fn missing_pieces_are_none() {
        let parsed = parse("a { : ; }");
        let doc = Document::cast(parsed.root()).unwrap();
        let rule_set = doc.rule_sets().next().unwrap();
        assert_eq!(rule_set.rules().count(), 0);
        assert!(rule_set.body().unwrap().is_closed());

        let parsed = parse("a { b: ");
        let doc = Document::cast(parsed.root()).unwrap();
        let rule = doc.rule_sets().next().unwrap().rules().next().unwrap();
        assert_eq!(rule.property_name_text().as_deref(), Some("b"));
        assert_eq!(rule.value_text(), None);
        assert!(!doc.rule_sets().next().unwrap().body().unwrap().is_closed());
    }
}
