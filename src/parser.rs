use crate::ast::{AstNode, AstNodeList, Placeholder, Plural};

/// A parser for label messages with `$N` placeholders and
/// `{{PLURAL:$N|...}}` constructs.
///
/// Anything that does not form a valid construct is kept as literal text,
/// so a stray `$` or `{{` never loses characters.
pub struct Parser<'a> {
    input: &'a str,
    /// Byte offset into `input`, always on a char boundary
    position: usize,
}

impl<'a> Parser<'a> {
    const PLURAL_OPEN: &'static str = "{{PLURAL:";

    pub fn new(input: &'a str) -> Self {
        Parser { input, position: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.position..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// Consumes the current character and advances the position.
    /// Returns the character that was consumed, or None if at the end of input.
    fn consume(&mut self) -> Option<char> {
        let c = self.peek();
        if let Some(c) = c {
            self.position += c.len_utf8();
        }
        c
    }

    fn at_placeholder(&self) -> bool {
        let mut chars = self.rest().chars();
        chars.next() == Some('$') && chars.next().is_some_and(|c| c.is_ascii_digit())
    }

    fn at_plural(&self) -> bool {
        self.rest().starts_with(Self::PLURAL_OPEN)
    }

    fn parse_placeholder(&mut self) -> Option<Placeholder> {
        if !self.at_placeholder() {
            return None;
        }

        let start = self.position;
        self.consume(); // Consume '$'
        while let Some(c) = self.peek() {
            if !c.is_ascii_digit() {
                break;
            }
            self.consume();
        }
        Placeholder::new(self.input[start..self.position].to_string()).ok()
    }

    /// Parses `{{PLURAL:$N|form|form...}}`; backtracks and returns `None`
    /// when the construct is malformed.
    fn parse_plural(&mut self) -> Option<AstNode> {
        let start = self.position;
        if !self.at_plural() {
            return None;
        }
        self.position += Self::PLURAL_OPEN.len();

        let Some(placeholder) = self.parse_placeholder() else {
            self.position = start;
            return None;
        };

        let mut forms = Vec::new();
        loop {
            if self.rest().starts_with("}}") {
                self.position += 2;
                break;
            }
            if self.consume() != Some('|') {
                self.position = start;
                return None;
            }
            let form_start = self.position;
            while let Some(c) = self.peek() {
                if c == '|' || self.rest().starts_with("}}") {
                    break;
                }
                self.consume();
            }
            forms.push(self.input[form_start..self.position].to_string());
        }

        if forms.is_empty() {
            self.position = start;
            return None;
        }
        Some(AstNode::Plural(Plural { placeholder, forms }))
    }

    pub fn parse(&mut self) -> AstNodeList {
        let mut nodes = AstNodeList::new();
        let mut text = String::new();

        while self.peek().is_some() {
            if self.at_plural() {
                if let Some(node) = self.parse_plural() {
                    if !text.is_empty() {
                        nodes.push(AstNode::Text(std::mem::take(&mut text)));
                    }
                    nodes.push(node);
                    continue;
                }
            }
            if self.at_placeholder() {
                if let Some(placeholder) = self.parse_placeholder() {
                    if !text.is_empty() {
                        nodes.push(AstNode::Text(std::mem::take(&mut text)));
                    }
                    nodes.push(AstNode::Placeholder(placeholder));
                    continue;
                }
            }
            if let Some(c) = self.consume() {
                text.push(c);
            }
        }

        if !text.is_empty() {
            nodes.push(AstNode::Text(text));
        }
        nodes
    }
}
