//! Element-level grammar rules: elements, tags, attributes.

use crate::dialect::Dialect;
use crate::parser::{CompletedMarker, MAX_DEPTH, Parser};
use crate::syntax_kind::SyntaxKind;

/// What the grammar needs to know about a start tag once it is parsed.
struct StartTag<'input> {
    name: Option<&'input str>,
    self_closing: bool,
}

/// Parse an element: start tag, content, end tag.
///
/// Void and self-closing elements have no content. The end tag is optional:
/// content stops at an end tag naming an ancestor, at a start tag that
/// implies this element's end, or at end of input.
pub(super) fn element(p: &mut Parser<'_, '_>) {
    let m = p.start();
    let tag = start_tag(p);

    let Some(name) = tag.name else {
        m.complete(p, SyntaxKind::ELEMENT);
        return;
    };
    if tag.self_closing || p.dialect().is_void_element(name) {
        m.complete(p, SyntaxKind::ELEMENT);
        return;
    }
    if p.depth() >= MAX_DEPTH {
        p.error(format!("element <{name}> nested too deeply"));
        m.complete(p, SyntaxKind::ELEMENT);
        return;
    }

    p.push_open(name);
    content(p, name);
    p.pop_open();

    m.complete(p, SyntaxKind::ELEMENT);
}

fn content(p: &mut Parser<'_, '_>, name: &str) {
    let dialect = p.dialect();

    loop {
        match p.current() {
            SyntaxKind::EOF => {
                if dialect == Dialect::StrictXml {
                    p.error(format!("unclosed element <{name}>"));
                }
                return;
            }
            SyntaxKind::L_ANGLE_SLASH => {
                let end_name = end_tag_name(p);
                if dialect.names_match(end_name, name) {
                    end_tag(p);
                    return;
                }
                if p.is_open_ancestor(end_name) {
                    if dialect == Dialect::StrictXml {
                        p.error(format!("element <{name}> closed by </{end_name}>"));
                    }
                    return;
                }
                stray_end_tag(p);
            }
            SyntaxKind::L_ANGLE => {
                if dialect.implies_end(name, p.nth_text(1)) {
                    return;
                }
                element(p);
            }
            _ => content_token(p),
        }
    }
}

/// Parse `<name attr="value" ...>` or `<name ... />`.
fn start_tag<'input>(p: &mut Parser<'_, 'input>) -> StartTag<'input> {
    let m = p.start();
    p.bump(); // <

    let name = if p.at(SyntaxKind::NAME) {
        let name = p.current_text();
        p.bump();
        Some(name)
    } else {
        None
    };

    let mut self_closing = false;
    loop {
        match p.current() {
            SyntaxKind::WHITESPACE => p.bump(),
            SyntaxKind::NAME => attribute(p),
            SyntaxKind::R_ANGLE => {
                p.bump();
                break;
            }
            SyntaxKind::SLASH_R_ANGLE => {
                p.bump();
                self_closing = true;
                break;
            }
            SyntaxKind::EQ | SyntaxKind::STRING | SyntaxKind::SLASH | SyntaxKind::JUNK => {
                p.err_and_bump("unexpected token in start tag");
            }
            _ => {
                p.error(format!("unterminated start tag <{}>", name.unwrap_or("")));
                break;
            }
        }
    }

    m.complete(p, SyntaxKind::START_TAG);
    StartTag { name, self_closing }
}

/// Parse `name`, `name=value` or `name="value"`, allowing whitespace around `=`.
fn attribute(p: &mut Parser<'_, '_>) {
    let m = p.start();
    p.bump(); // name

    let eq_ahead = p.at(SyntaxKind::EQ)
        || (p.at(SyntaxKind::WHITESPACE) && p.nth(1) == SyntaxKind::EQ);
    if eq_ahead {
        p.eat(SyntaxKind::WHITESPACE);
        p.bump(); // =
        p.eat(SyntaxKind::WHITESPACE);

        match p.current() {
            SyntaxKind::STRING => p.bump(),
            SyntaxKind::NAME if p.dialect().allows_unquoted_attributes() => p.bump(),
            SyntaxKind::NAME => p.err_and_bump("unquoted attribute value"),
            _ => p.error("missing attribute value"),
        }
    }

    m.complete(p, SyntaxKind::ATTRIBUTE);
}

/// Parse `</name>`.
fn end_tag(p: &mut Parser<'_, '_>) -> CompletedMarker {
    let m = p.start();
    p.bump(); // </
    p.eat(SyntaxKind::NAME);

    loop {
        match p.current() {
            SyntaxKind::WHITESPACE => p.bump(),
            SyntaxKind::R_ANGLE => {
                p.bump();
                break;
            }
            SyntaxKind::SLASH_R_ANGLE => {
                p.err_and_bump("self-closing end tag");
                break;
            }
            SyntaxKind::NAME
            | SyntaxKind::EQ
            | SyntaxKind::STRING
            | SyntaxKind::SLASH
            | SyntaxKind::JUNK => p.err_and_bump("unexpected token in end tag"),
            _ => {
                p.error("unterminated end tag");
                break;
            }
        }
    }

    m.complete(p, SyntaxKind::END_TAG)
}

/// Name of the end tag starting at the current `</`.
fn end_tag_name<'input>(p: &Parser<'_, 'input>) -> &'input str {
    if p.nth(1) == SyntaxKind::NAME {
        p.nth_text(1)
    } else {
        ""
    }
}

/// An end tag that closes nothing: parse it, then wrap it in ERROR.
pub(super) fn stray_end_tag(p: &mut Parser<'_, '_>) {
    let name = end_tag_name(p);
    p.error(format!("stray end tag </{name}>"));
    let end = end_tag(p);
    let m = end.precede(p);
    m.complete(p, SyntaxKind::ERROR);
}

/// Character data, comments, declarations and raw text.
pub(super) fn content_token(p: &mut Parser<'_, '_>) {
    match p.current() {
        SyntaxKind::TEXT
        | SyntaxKind::CHAR_REF
        | SyntaxKind::COMMENT
        | SyntaxKind::CDATA
        | SyntaxKind::DOCTYPE
        | SyntaxKind::PROCESSING_INSTRUCTION
        | SyntaxKind::RAW_TEXT => p.bump(),
        _ => p.err_and_bump("unexpected token outside of a tag"),
    }
}

#[cfg(test)]
mod tests {
    use crate::dialect::Dialect;
    use crate::parser::parse;
    use crate::syntax_kind::{SyntaxKind, SyntaxNode};
    use pretty_assertions::assert_eq;

    /// Element names in pre-order, nested with parentheses.
    fn outline(node: &SyntaxNode) -> String {
        node.children()
            .filter(|n| n.kind() == SyntaxKind::ELEMENT)
            .map(|element| {
                let name = element
                    .children()
                    .find(|n| n.kind() == SyntaxKind::START_TAG)
                    .and_then(|tag| {
                        tag.children_with_tokens()
                            .filter_map(|t| t.into_token())
                            .find(|t| t.kind() == SyntaxKind::NAME)
                    })
                    .map(|t| t.text().to_string())
                    .unwrap_or_default();
                let inner = outline(&element);
                if inner.is_empty() {
                    name
                } else {
                    format!("{name}({inner})")
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn outline_of(input: &str, dialect: Dialect) -> String {
        let parse = parse(input, dialect);
        let tree = parse.syntax_node();
        assert_eq!(tree.text().to_string(), input);
        outline(&tree)
    }

    #[test]
    fn nested_elements() {
        assert_eq!(
            outline_of("<div><p><span>a</span> <span>b</span></p></div>", Dialect::StrictXml),
            "div(p(span span))"
        );
    }

    #[test]
    fn void_elements_take_no_content_in_tag_soup() {
        assert_eq!(
            outline_of("<p>a<br>b<img src=x.png>c</p>", Dialect::TagSoup),
            "p(br img)"
        );
    }

    #[test]
    fn void_names_nest_in_strict_dialect() {
        let parse = parse("<p>a<br>b</br></p>", Dialect::StrictXml);
        assert_eq!(outline(&parse.syntax_node()), "p(br)");
        assert!(parse.errors().is_empty());
    }

    #[test]
    fn self_closing_elements() {
        assert_eq!(
            outline_of("<div><span class='ocrx_word'/><b/></div>", Dialect::StrictXml),
            "div(span b)"
        );
    }

    #[test]
    fn implied_paragraph_end() {
        assert_eq!(
            outline_of("<body><p>one<p>two<div>three</div></body>", Dialect::TagSoup),
            "body(p p div)"
        );
    }

    #[test]
    fn end_tag_closes_open_ancestors() {
        let parse = parse("<div><p><span>x</div>after", Dialect::StrictXml);
        assert_eq!(outline(&parse.syntax_node()), "div(p(span))");
        let messages: Vec<_> = parse.errors().iter().map(|e| e.message.as_str()).collect();
        assert_eq!(
            messages,
            vec![
                "element <span> closed by </div>",
                "element <p> closed by </div>"
            ]
        );
    }

    #[test]
    fn tag_soup_names_are_case_insensitive() {
        let parse = parse("<DIV><Span>x</SPAN></div>", Dialect::TagSoup);
        assert_eq!(outline(&parse.syntax_node()), "DIV(Span)");
        assert!(parse.errors().is_empty());
    }

    #[test]
    fn stray_end_tag_becomes_error_node() {
        let tree = parse("a</p>b", Dialect::TagSoup).syntax_node();
        let kinds: Vec<_> = tree.children().map(|n| n.kind()).collect();
        assert_eq!(kinds, vec![SyntaxKind::ERROR]);
        assert_eq!(tree.text().to_string(), "a</p>b");
    }

    #[test]
    fn unquoted_attribute_value_is_an_error_in_strict_dialect() {
        let soup = parse("<p class=ocr_par>x</p>", Dialect::TagSoup);
        assert!(soup.errors().is_empty());

        let strict = parse("<p class=ocr_par>x</p>", Dialect::StrictXml);
        assert_eq!(strict.errors().len(), 1);
        assert_eq!(strict.errors()[0].message, "unquoted attribute value");
    }

    #[test]
    fn attribute_nodes_keep_whitespace_around_equals() {
        let tree = parse("<p title = 'bbox 1 2 3 4' lang=en hidden>", Dialect::TagSoup)
            .syntax_node();
        let start_tag = tree.descendants().find(|n| n.kind() == SyntaxKind::START_TAG).unwrap();
        let attributes: Vec<_> = start_tag
            .children()
            .filter(|n| n.kind() == SyntaxKind::ATTRIBUTE)
            .map(|n| n.text().to_string())
            .collect();
        assert_eq!(attributes, vec!["title = 'bbox 1 2 3 4'", "lang=en", "hidden"]);
    }

    #[test]
    fn unterminated_start_tag_recovers_at_next_tag() {
        let parse = parse("<span class='x'<b>bold</b></span>", Dialect::TagSoup);
        assert_eq!(outline(&parse.syntax_node()), "span(b)");
        assert_eq!(parse.errors()[0].message, "unterminated start tag <span>");
    }

    #[test]
    fn deep_nesting_is_flattened() {
        let input = "<div>".repeat(crate::parser::MAX_DEPTH + 5);
        let parse = parse(&input, Dialect::TagSoup);
        assert_eq!(parse.syntax_node().text().to_string(), input);
        assert!(
            parse
                .errors()
                .iter()
                .any(|e| e.message == "element <div> nested too deeply")
        );
    }
}
