//! Parenthesized tree notation.
//!
//! ```text
//! ; comment
//! (PROGRAM
//!   (IDENT "x")
//!   (NUM "42"))
//! ```
//!
//! Each node is `(` KIND optional-STRING children `)`. KIND is a bare word,
//! STRING a double-quoted lexeme supporting `\"`, `\\`, `\n` and `\t`.

use crate::domain::tree::TreeNode;
use crate::error::ProduceError;
use crate::ports::TreeProducer;
use std::iter::Peekable;
use std::str::Chars;

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Open,
    Close,
    Word(String),
    Str(String),
}

/// 1-based location of a token.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Pos {
    line: usize,
    column: usize,
}

struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
    pos: Pos,
}

impl<'a> Lexer<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            chars: src.chars().peekable(),
            pos: Pos { line: 1, column: 1 },
        }
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        if c == '\n' {
            self.pos.line += 1;
            self.pos.column = 1;
        } else {
            self.pos.column += 1;
        }
        Some(c)
    }

    fn is_word_char(c: char) -> bool {
        c.is_alphanumeric() || "_-.:+*/<>=!?&%^|~@#$".contains(c)
    }

    fn skip_trivia(&mut self) {
        while let Some(&c) = self.chars.peek() {
            if c.is_whitespace() {
                self.bump();
            } else if c == ';' {
                while let Some(&c) = self.chars.peek() {
                    if c == '\n' {
                        break;
                    }
                    self.bump();
                }
            } else {
                break;
            }
        }
    }

    fn next_token(&mut self) -> Result<Option<(Token, Pos)>, ProduceError> {
        self.skip_trivia();
        let start = self.pos;
        let Some(&c) = self.chars.peek() else {
            return Ok(None);
        };
        let token = match c {
            '(' => {
                self.bump();
                Token::Open
            }
            ')' => {
                self.bump();
                Token::Close
            }
            '"' => {
                self.bump();
                Token::Str(self.string(start)?)
            }
            c if Self::is_word_char(c) => {
                let mut word = String::new();
                while let Some(&c) = self.chars.peek() {
                    if !Self::is_word_char(c) {
                        break;
                    }
                    word.push(c);
                    self.bump();
                }
                Token::Word(word)
            }
            other => {
                return Err(ProduceError::syntax(
                    start.line,
                    start.column,
                    format!("unexpected character '{}'", other),
                ))
            }
        };
        Ok(Some((token, start)))
    }

    /// Rest of a string literal; the opening quote is consumed.
    fn string(&mut self, start: Pos) -> Result<String, ProduceError> {
        let mut text = String::new();
        loop {
            match self.bump() {
                Some('"') => return Ok(text),
                Some('\\') => {
                    let escape_pos = self.pos;
                    match self.bump() {
                        Some('"') => text.push('"'),
                        Some('\\') => text.push('\\'),
                        Some('n') => text.push('\n'),
                        Some('t') => text.push('\t'),
                        Some(other) => {
                            return Err(ProduceError::syntax(
                                escape_pos.line,
                                escape_pos.column - 1,
                                format!("unknown escape '\\{}'", other),
                            ))
                        }
                        None => break,
                    }
                }
                Some(c) => text.push(c),
                None => break,
            }
        }
        Err(ProduceError::syntax(start.line, start.column, "unterminated string"))
    }
}

/// Produces a tree from parenthesized notation.
pub struct SexprProducer {
    src: String,
}

impl SexprProducer {
    pub fn new(src: impl Into<String>) -> Self {
        Self { src: src.into() }
    }
}

impl TreeProducer for SexprProducer {
    fn produce(&self) -> Result<TreeNode, ProduceError> {
        let mut lexer = Lexer::new(&self.src);
        // Nodes whose closing paren has not been seen yet, with whether a
        // value was already given.
        let mut open: Vec<(TreeNode, bool)> = Vec::new();
        let mut root = None;

        while let Some((token, pos)) = lexer.next_token()? {
            if root.is_some() {
                return Err(ProduceError::syntax(
                    pos.line,
                    pos.column,
                    "unexpected input after the root node",
                ));
            }
            match token {
                Token::Open => {
                    let kind = match lexer.next_token()? {
                        Some((Token::Word(kind), _)) => kind,
                        Some((_, pos)) => {
                            return Err(ProduceError::syntax(
                                pos.line,
                                pos.column,
                                "expected node kind after '('",
                            ))
                        }
                        None => {
                            return Err(ProduceError::syntax(
                                lexer.pos.line,
                                lexer.pos.column,
                                "expected node kind after '('",
                            ))
                        }
                    };
                    open.push((TreeNode::leaf(kind), false));
                }
                Token::Str(value) => match open.last_mut() {
                    Some((node, has_value)) if !*has_value && node.children.is_empty() => {
                        node.value = value;
                        *has_value = true;
                    }
                    _ => {
                        return Err(ProduceError::syntax(
                            pos.line,
                            pos.column,
                            "a value must directly follow the node kind",
                        ))
                    }
                },
                Token::Word(word) => {
                    return Err(ProduceError::syntax(
                        pos.line,
                        pos.column,
                        format!("unexpected word '{}'; values must be quoted", word),
                    ))
                }
                Token::Close => {
                    let (node, _) = open.pop().ok_or_else(|| {
                        ProduceError::syntax(pos.line, pos.column, "unmatched ')'")
                    })?;
                    match open.last_mut() {
                        Some((parent, _)) => parent.push_child(node),
                        None => root = Some(node),
                    }
                }
            }
        }

        if !open.is_empty() {
            return Err(ProduceError::syntax(
                lexer.pos.line,
                lexer.pos.column,
                format!("{} unclosed node(s) at end of input", open.len()),
            ));
        }
        let root = root.ok_or(ProduceError::Empty)?;
        tracing::debug!(nodes = root.node_count(), "parsed tree notation");
        Ok(root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(src: &str) -> Result<TreeNode, ProduceError> {
        SexprProducer::new(src).produce()
    }

    fn syntax_at(err: ProduceError) -> (usize, usize) {
        match err {
            ProduceError::Syntax { line, column, .. } => (line, column),
            other => panic!("expected syntax error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_nested() {
        let root = parse("; a program\n(PROGRAM (IDENT \"x\") (NUM \"42\" (SUFFIX)))").unwrap();
        let expected = TreeNode::leaf("PROGRAM")
            .with_child(TreeNode::new("IDENT", "x"))
            .with_child(TreeNode::new("NUM", "42").with_child(TreeNode::leaf("SUFFIX")));
        assert_eq!(root, expected);
    }

    #[test]
    fn test_string_escapes_and_operator_kinds() {
        let root = parse(r#"(<= "a \"b\"\\\n")"#).unwrap();
        assert_eq!(root.kind(), "<=");
        assert_eq!(root.value(), "a \"b\"\\\n");
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(parse("  ; nothing\n"), Err(ProduceError::Empty)));
    }

    #[test]
    fn test_unclosed_node() {
        assert_eq!(syntax_at(parse("(A\n  (B)").unwrap_err()), (2, 6));
    }

    #[test]
    fn test_open_paren_at_end() {
        assert_eq!(syntax_at(parse("(").unwrap_err()), (1, 2));
    }

    #[test]
    fn test_unmatched_close() {
        assert_eq!(syntax_at(parse(")").unwrap_err()), (1, 1));
    }

    #[test]
    fn test_trailing_input_after_root() {
        assert_eq!(syntax_at(parse("(A) (B)").unwrap_err()), (1, 5));
    }

    #[test]
    fn test_value_after_children_is_rejected() {
        assert_eq!(syntax_at(parse("(A (B) \"late\")").unwrap_err()), (1, 8));
    }

    #[test]
    fn test_second_value_is_rejected() {
        assert_eq!(syntax_at(parse("(A \"\" \"y\")").unwrap_err()), (1, 7));
        assert_eq!(syntax_at(parse("(A \"x\" \"y\")").unwrap_err()), (1, 8));
    }

    #[test]
    fn test_unquoted_value_is_rejected() {
        assert_eq!(syntax_at(parse("(IDENT x)").unwrap_err()), (1, 8));
    }

    #[test]
    fn test_unterminated_string() {
        assert_eq!(syntax_at(parse("(A \"open").unwrap_err()), (1, 4));
    }

    #[test]
    fn test_deep_nesting_is_iterative() {
        let depth = 50_000;
        let src = format!("{}{}", "(N ".repeat(depth), ")".repeat(depth));
        let root = parse(&src).unwrap();
        assert_eq!(root.depth(), depth - 1);
    }

    #[test]
    fn test_million_levels_parse_and_drop() {
        let depth = 1_000_000;
        let src = format!("{}{}", "(N ".repeat(depth), ")".repeat(depth));
        let root = parse(&src).unwrap();
        assert_eq!(root.node_count(), depth);
        drop(root);
    }
}
