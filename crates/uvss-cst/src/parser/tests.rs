use super::*;

fn kinds_of(node: SyntaxNode<'_>) -> Vec<SyntaxKind> {
    node.descendant_nodes(None, false)
        .map(|node| node.kind())
        .collect()
}

fn find(node: SyntaxNode<'_>, kind: SyntaxKind) -> SyntaxNode<'_> {
    node.descendant_nodes(None, false)
        .find(|node| node.kind() == kind)
        .unwrap_or_else(|| panic!("no {kind:?} in {node:#?}"))
}

fn find_all(node: SyntaxNode<'_>, kind: SyntaxKind) -> Vec<SyntaxNode<'_>> {
    node.descendant_nodes(None, false)
        .filter(|node| node.kind() == kind)
        .collect()
}

#[track_caller]
fn assert_roundtrip(source: &str) -> Parse {
    let parse = parse(source);
    assert_eq!(parse.root().to_full_string(), source);
    assert_eq!(parse.root().full_width() as usize, source.len());
    parse
}

#[track_caller]
fn assert_clean(source: &str) -> Parse {
    let parse = assert_roundtrip(source);
    assert!(
        parse.is_ok(),
        "unexpected errors in {source:?}: {:?}\n{:#?}",
        parse.diagnostics(),
        parse.root()
    );
    parse
}

#[test]
fn empty_document() {
    let parse = assert_clean("");
    let root = parse.root();
    assert_eq!(root.kind(), DOCUMENT);
    assert_eq!(root.named_slot("content"), None);
    let eof = root.named_slot("end_of_file").unwrap();
    assert_eq!(eof.kind(), END_OF_FILE_TOKEN);
    assert!(!eof.is_missing());
}

#[test]
fn trailing_trivia_belongs_to_end_of_file() {
    let parse = assert_clean("a { }\n\n  // done\n");
    let eof = parse.root().named_slot("end_of_file").unwrap();
    let trivia: Vec<_> = eof.leading_trivia().map(|t| t.kind()).collect();
    assert_eq!(
        trivia,
        [
            END_OF_LINE_TRIVIA,
            WHITESPACE_TRIVIA,
            SINGLE_LINE_COMMENT_TRIVIA,
            END_OF_LINE_TRIVIA
        ]
    );
}

#[test]
fn trailing_trivia_stops_after_line_break() {
    let parse = assert_clean("a { } /* x */\n  b { }");
    let close = find_all(parse.root(), CLOSE_CURLY_BRACE_TOKEN)[0];
    let trailing: Vec<_> = close.trailing_trivia().map(|t| t.text()).collect();
    assert_eq!(trailing, [" ", "/* x */", "\n"]);

    let b = find_all(parse.root(), IDENTIFIER_TOKEN)[1];
    let leading: Vec<_> = b.leading_trivia().map(|t| t.text()).collect();
    assert_eq!(leading, ["  "]);
}

#[test]
fn missing_close_brace() {
    let parse = assert_roundtrip("#foo { ");
    assert!(!parse.is_ok());

    let missing = parse.missing_nodes();
    assert_eq!(missing.len(), 1);
    assert_eq!(missing[0].kind(), CLOSE_CURLY_BRACE_TOKEN);
    assert_eq!(missing[0].parent().unwrap().kind(), BLOCK);

    let block = find(parse.root(), BLOCK);
    assert!(!block.is_missing());
    assert_eq!(block.named_slot("open_brace").unwrap().text(), "{");
}

#[test]
fn descendant_combinator() {
    let parse = assert_clean("#a #b { }");
    let selector = find(parse.root(), SELECTOR);
    let components: Vec<_> = crate::SyntaxList::new(selector.named_slot("components"))
        .iter()
        .map(|c| (c.kind(), c.to_full_string()))
        .collect();
    assert_eq!(
        components,
        [
            (SELECTOR_PART, "#a".to_string()),
            (SPACE_TOKEN, " ".to_string()),
            (SELECTOR_PART, "#b ".to_string()),
        ]
    );
}

#[test]
fn descendant_combinator_before_comment() {
    let parse = assert_clean("#a /* c */#b { }");
    assert_eq!(find_all(parse.root(), RULE_SET).len(), 1);
    let selector = find(parse.root(), SELECTOR);
    let components: Vec<_> = crate::SyntaxList::new(selector.named_slot("components"))
        .iter()
        .map(|c| (c.kind(), c.to_full_string()))
        .collect();
    assert_eq!(
        components,
        [
            (SELECTOR_PART, "#a".to_string()),
            (SPACE_TOKEN, " /* c */".to_string()),
            (SELECTOR_PART, "#b ".to_string()),
        ]
    );
}

#[test]
fn adjacent_sub_parts_form_one_part() {
    let parse = assert_clean("#a.b { }");
    let parts = find_all(parse.root(), SELECTOR_PART);
    assert_eq!(parts.len(), 1);
    let sub_parts = find_all(parts[0], SELECTOR_SUB_PART);
    assert_eq!(sub_parts.len(), 2);
    assert_eq!(
        sub_parts[1].named_slot("leading_qualifier").unwrap().kind(),
        PERIOD_TOKEN
    );
    assert!(!kinds_of(parse.root()).contains(&SPACE_TOKEN));
}

#[test]
fn explicit_combinators() {
    let parse = assert_clean("a > b >> c >? d { }");
    let selector = find(parse.root(), SELECTOR);
    let components = crate::SyntaxList::new(selector.named_slot("components"));
    let kinds: Vec<_> = components.iter().map(|c| c.kind()).collect();
    assert_eq!(
        kinds,
        [
            SELECTOR_PART,
            GREATER_THAN_TOKEN,
            SELECTOR_PART,
            GREATER_THAN_GREATER_THAN_TOKEN,
            SELECTOR_PART,
            GREATER_THAN_QUESTION_MARK_TOKEN,
            SELECTOR_PART,
        ]
    );
}

#[test]
fn descendant_combinator_across_line_break() {
    let parse = assert_clean("Grid\n    Button { }");
    let space = find(parse.root(), SPACE_TOKEN);
    assert_eq!(space.text(), "\n");
    let grid = find_all(parse.root(), IDENTIFIER_TOKEN)[0];
    assert_eq!(grid.trailing_trivia().count(), 0);
}

#[test]
fn comment_between_parts_keeps_comment_as_trivia() {
    let parse = assert_clean("a /* x */ b { }");
    let space = find(parse.root(), SPACE_TOKEN);
    assert_eq!(space.text(), " ");
    let a = find_all(parse.root(), IDENTIFIER_TOKEN)[0];
    let trailing: Vec<_> = a.trailing_trivia().map(|t| t.text()).collect();
    assert_eq!(trailing, [" ", "/* x */"]);
}

#[test]
fn selector_qualifiers_and_pseudo_classes() {
    let parse = assert_clean("Button!:hover, .primary, *, :focus { }");
    let selectors = crate::SeparatedSyntaxList::new(
        find(parse.root(), RULE_SET).named_slot("selectors"),
    );
    assert_eq!(selectors.count(), 4);
    assert_eq!(selectors.separator_count(), 3);

    let first = find(selectors.item(0).unwrap(), SELECTOR_SUB_PART);
    assert_eq!(
        first.named_slot("trailing_qualifier").unwrap().kind(),
        EXCLAMATION_MARK_TOKEN
    );
    let pseudo = find(selectors.item(0).unwrap(), PSEUDO_CLASS);
    assert_eq!(pseudo.to_full_string(), ":hover");

    let star = find(selectors.item(2).unwrap(), SELECTOR_SUB_PART);
    assert_eq!(star.named_slot("text").unwrap().kind(), ASTERISK_TOKEN);

    let focus = find(selectors.item(3).unwrap(), SELECTOR_PART);
    assert_eq!(focus.named_slot("sub_parts"), None);
    assert!(focus.named_slot("pseudo_class").is_some());
}

#[test]
fn navigation_expression() {
    let parse = assert_clean("ListBox | Items[2] as ListBoxItem { }");
    let navigation = find(parse.root(), NAVIGATION_EXPRESSION);
    assert_eq!(
        navigation.named_slot("property_name").unwrap().to_string(),
        "Items"
    );
    let indexer = navigation.named_slot("indexer").unwrap();
    assert_eq!(indexer.named_slot("number").unwrap().text(), "2");
    let type_name = navigation.named_slot("type_name").unwrap();
    assert_eq!(type_name.first_token().unwrap().text(), "ListBoxItem");
}

#[test]
fn rules_with_raw_values() {
    let source = "Button {\n    background-color: rgb(1, 2, 3) !important;\n    Grid.Row: 1;\n}\n";
    let parse = assert_clean(source);
    let rules = find_all(parse.root(), RULE);
    assert_eq!(rules.len(), 2);

    let value = find(rules[0], PROPERTY_VALUE_TOKEN);
    assert_eq!(value.text(), "rgb(1, 2, 3)");
    assert_eq!(value.trailing_trivia().map(|t| t.text()).collect::<String>(), " ");
    assert_eq!(
        rules[0].named_slot("qualifier").unwrap().kind(),
        IMPORTANT_KEYWORD
    );

    let name = rules[1].named_slot("property_name").unwrap();
    let owner = name.named_slot("attached_property_owner_name").unwrap();
    assert_eq!(owner.first_token().unwrap().text(), "Grid");
    assert_eq!(owner.to_full_string(), "    Grid");
    assert_eq!(name.named_slot("property_name").unwrap().to_string(), "Row");
    assert!(rules[1].named_slot("qualifier").is_none());
}

#[test]
fn triggers_and_transitions() {
    let source = r#"Button {
    trigger event Click (handled, set-handled) !important {
        play-storyboard (#pop) { Fade }
        play-sfx { click.wav }
        set Foreground (Label) { Red }
    }
    trigger property IsMouseOver = { true }, IsEnabled <> { false } {
        set Opacity { 1 }
    }
    transition (Opacity, hover): 0.5 linear;
}
"#;
    let parse = assert_clean(source);
    let root = parse.root();

    let event = find(root, EVENT_TRIGGER);
    let arguments = crate::SeparatedSyntaxList::new(
        event
            .named_slot("argument_list")
            .unwrap()
            .named_slot("arguments"),
    );
    let arguments: Vec<_> = arguments.iter().map(|a| a.kind()).collect();
    assert_eq!(arguments, [HANDLED_KEYWORD, SET_HANDLED_KEYWORD]);
    assert!(event.named_slot("qualifier").is_some());

    assert_eq!(find_all(root, PLAY_STORYBOARD_TRIGGER_ACTION).len(), 1);
    let sfx = find(root, PLAY_SFX_TRIGGER_ACTION);
    assert_eq!(find(sfx, PROPERTY_VALUE_TOKEN).text(), "click.wav");
    assert_eq!(find_all(root, SET_TRIGGER_ACTION).len(), 2);

    let property = find(root, PROPERTY_TRIGGER);
    let conditions = find_all(property, PROPERTY_TRIGGER_CONDITION);
    assert_eq!(conditions.len(), 2);
    assert_eq!(
        conditions[1]
            .named_slot("comparison_operator")
            .unwrap()
            .kind(),
        NOT_EQUALS_TOKEN
    );

    let transition = find(root, TRANSITION);
    assert_eq!(find(transition, PROPERTY_VALUE_TOKEN).text(), "0.5 linear");
    let arguments = find(transition, TRANSITION_ARGUMENT_LIST);
    assert_eq!(find_all(arguments, IDENTIFIER).len(), 2);
}

#[test]
fn storyboards() {
    let source = r#"@Fade loop {
    target Button (#ok) {
        animation Opacity {
            keyframe 0 ease-in { 0.0 }
            keyframe 1.5 { 1.0 }
        }
    }
}
"#;
    let parse = assert_clean(source);
    let storyboard = find(parse.root(), STORYBOARD);
    let name = storyboard.named_slot("name").unwrap();
    assert_eq!(name.first_token().unwrap().text(), "Fade");
    assert!(storyboard.named_slot("loop_identifier").is_some());

    let target = find(storyboard, STORYBOARD_TARGET);
    assert_eq!(
        target.named_slot("type_name").unwrap().to_full_string(),
        "Button "
    );
    assert!(target.named_slot("selector").is_some());

    let keyframes = find_all(storyboard, ANIMATION_KEYFRAME);
    assert_eq!(keyframes.len(), 2);
    assert_eq!(keyframes[0].named_slot("time").unwrap().text(), "0");
    assert!(keyframes[0].named_slot("easing").is_some());
    assert!(keyframes[1].named_slot("easing").is_none());
    assert_eq!(find(keyframes[1], PROPERTY_VALUE_TOKEN).text(), "1.0");
}

#[test]
fn nested_braces_in_values() {
    let parse = assert_clean("@a { target { animation X { keyframe 0 { {1, {2}} } } } }");
    let value = find(parse.root(), PROPERTY_VALUE_TOKEN);
    assert_eq!(value.text(), "{1, {2}}");
}

#[test]
fn directives() {
    let parse = assert_clean("$culture { en-US }\n$other\n");
    let culture = find(parse.root(), CULTURE_DIRECTIVE);
    assert_eq!(find(culture, PROPERTY_VALUE_TOKEN).text(), "en-US");
    let unknown = find(parse.root(), UNKNOWN_DIRECTIVE);
    assert_eq!(unknown.named_slot("directive").unwrap().text(), "$other");
    assert!(unknown.named_slot("value").is_none());
}

#[test]
fn skipped_tokens_at_top_level() {
    let parse = assert_roundtrip("} ~ Button { }");
    assert!(!parse.is_ok());
    assert!(parse.missing_nodes().is_empty());

    let button = find_all(parse.root(), IDENTIFIER_TOKEN)[0];
    let leading: Vec<_> = button.leading_trivia().collect();
    assert_eq!(leading.len(), 1);
    assert_eq!(leading[0].kind(), SKIPPED_TOKENS_TRIVIA);
    assert_eq!(leading[0].to_full_string(), "} ~ ");
    assert_eq!(button.span().start, 4);
}

#[test]
fn skipped_tokens_in_block() {
    let parse = assert_roundtrip("a { ~~ b: c; }");
    let rules = find_all(parse.root(), RULE);
    assert_eq!(rules.len(), 1);
    let diagnostics = parse.diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].message(), "unexpected input");
}

#[test]
fn missing_colon_still_reads_value() {
    let parse = assert_roundtrip("a { b c; }");
    let rule = find(parse.root(), RULE);
    assert!(rule.named_slot("colon").unwrap().is_missing());
    assert_eq!(find(rule, PROPERTY_VALUE_TOKEN).text(), "c");
    let missing = parse.missing_nodes();
    assert_eq!(missing.len(), 1);
    assert_eq!(missing[0].kind(), COLON_TOKEN);
}

#[test]
fn missing_selector_after_combinator() {
    let parse = assert_roundtrip("a > { }");
    let missing = parse.missing_nodes();
    assert_eq!(missing.len(), 1);
    assert_eq!(missing[0].kind(), SELECTOR_PART);
}

#[test]
fn unterminated_comment_runs_to_end() {
    let parse = assert_roundtrip("a { } /* never closed\n b { }");
    assert_eq!(find_all(parse.root(), RULE_SET).len(), 1);
}

#[test]
fn tab_width_affects_locations() {
    let source = "\ta {";
    let narrow = parse_with_options(source, &ParseOptions::new().tab_width(2));
    let wide = parse(source);
    assert_eq!(narrow.diagnostics()[0].location.column, 6);
    assert_eq!(wide.diagnostics()[0].location.column, 8);
}

#[test]
fn debug_dump() {
    let parse = parse("a{b:c;}");
    insta::assert_snapshot!(format!("{:#?}", parse.root()).trim_end(), @r#"
    DOCUMENT@0..7
      LIST@0..7
        RULE_SET@0..7
          LIST@0..1
            SELECTOR_WITH_NAVIGATION_EXPRESSION@0..1
              SELECTOR@0..1
                LIST@0..1
                  SELECTOR_PART@0..1
                    LIST@0..1
                      SELECTOR_SUB_PART@0..1
                        IDENTIFIER_TOKEN@0..1 "a"
          BLOCK@1..7
            OPEN_CURLY_BRACE_TOKEN@1..2 "{"
            LIST@2..6
              RULE@2..6
                PROPERTY_NAME@2..3
                  IDENTIFIER@2..3
                    IDENTIFIER_TOKEN@2..3 "b"
                COLON_TOKEN@3..4 ":"
                PROPERTY_VALUE@4..5
                  PROPERTY_VALUE_TOKEN@4..5 "c"
                SEMICOLON_TOKEN@5..6 ";"
            CLOSE_CURLY_BRACE_TOKEN@6..7 "}"
      END_OF_FILE_TOKEN@7..7 ""
    "#);
}

mod proptests {
    use super::*;
    use proptest::prelude::*;

    /// Arbitrary text over the characters UVSS cares about.
    fn noise() -> impl Strategy<Value = String> {
        prop::string::string_regex(r"[#.*a-z0-9 \t\r\n{}():;,<>=!|@$\[\]/~-]{0,80}").unwrap()
    }

    fn identifier() -> impl Strategy<Value = String> {
        prop::string::string_regex("[A-Za-z][A-Za-z0-9_-]{0,8}")
            .unwrap()
            .prop_filter("keywords are not identifiers", |s| {
                !uvss_tokenizer::KEYWORDS.contains(&s.as_str())
            })
    }

    fn selector() -> impl Strategy<Value = String> {
        let part = (
            prop_oneof![Just(""), Just("#"), Just(".")],
            identifier(),
            prop_oneof![Just(""), Just(":hover")],
        )
            .prop_map(|(qualifier, name, pseudo)| format!("{qualifier}{name}{pseudo}"))
            .boxed();
        let combinator = prop_oneof![Just(" "), Just(" > "), Just(" >> "), Just("\n")];
        (part.clone(), prop::collection::vec((combinator, part), 0..3)).prop_map(|(first, rest)| {
            rest.into_iter()
                .fold(first, |acc, (combinator, part)| format!("{acc}{combinator}{part}"))
        })
    }

    fn rule() -> impl Strategy<Value = String> {
        (identifier(), identifier(), any::<bool>()).prop_map(|(name, value, important)| {
            let important = if important { " !important" } else { "" };
            format!("    {name}: {value}{important};")
        })
    }

    fn document() -> impl Strategy<Value = String> {
        let rule_set = (selector(), prop::collection::vec(rule(), 0..4))
            .prop_map(|(selector, rules)| format!("{selector} {{\n{}\n}}", rules.join("\n")));
        prop::collection::vec(rule_set, 0..4).prop_map(|sets| sets.join("\n\n"))
    }

    fn check_widths(node: SyntaxNode<'_>) -> Result<(), TestCaseError> {
        let expected: u32 = if node.is_token() {
            node.leading_trivia().map(|t| t.full_width()).sum::<u32>()
                + node.text().len() as u32
                + node.trailing_trivia().map(|t| t.full_width()).sum::<u32>()
        } else if node.is_trivia() && node.structure().is_none() {
            node.text().len() as u32
        } else {
            node.child_nodes().map(|c| c.full_width()).sum()
        };
        prop_assert_eq!(node.full_width(), expected, "{:?}", node);
        Ok(())
    }

    fn check_missingness(node: SyntaxNode<'_>) -> Result<(), TestCaseError> {
        if node.is_token() || node.is_trivia() {
            return Ok(());
        }
        let children: Vec<_> = node.child_nodes().collect();
        let expected = !children.is_empty() && children.iter().all(|c| c.is_missing());
        prop_assert_eq!(node.is_missing(), expected, "{:?}", node);
        Ok(())
    }

    proptest! {
        #[test]
        fn roundtrip_arbitrary_input(input in noise()) {
            let parse = parse(&input);
            prop_assert_eq!(parse.root().to_full_string(), input);
        }

        #[test]
        fn widths_add_up(input in noise()) {
            let parse = parse(&input);
            let root = parse.root();
            prop_assert_eq!(root.full_width() as usize, input.len());
            check_widths(root)?;
            for node in root.descendant_nodes(None, true) {
                check_widths(node)?;
            }
        }

        #[test]
        fn token_spans_match_source(input in noise()) {
            let parse = parse(&input);
            for token in parse.root().tokens() {
                prop_assert_eq!(token.span().slice(&input), token.text());
            }
        }

        #[test]
        fn missingness_propagates(input in noise()) {
            let parse = parse(&input);
            for node in parse.root().descendant_nodes(None, true) {
                check_missingness(node)?;
            }
        }

        #[test]
        fn generated_documents_parse_cleanly(input in document()) {
            let parse = parse(&input);
            prop_assert_eq!(parse.root().to_full_string(), input.clone());
            prop_assert!(parse.is_ok(), "{:?}", parse.diagnostics());
        }
    }
}
