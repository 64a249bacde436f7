// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Declaration-file front-end.
//!
//! The grammar is the C-macro shape of the declaration surface:
//! `MAKE_PARSE_NODE(name, proto, metadata, handler, table);` and
//! friends, with `{ key, target }` entry lists in table forms, `null`
//! for absent callbacks, `*` for the wildcard key, and C-style
//! comments. The output is the same [`DeclRecord`] stream the builder
//! accepts from code.

use graph::{Decl, DeclRecord, Loc, TableKey};

/// Front-end failure, positioned in the source file.
#[derive(Debug, thiserror::Error)]
pub enum FrontError {
    /// Input ended inside a declaration.
    #[error("{loc}: unexpected end of input")]
    UnexpectedEof {
        /// Position of the last consumed token.
        loc: Loc,
    },
    /// The parser wanted one thing and saw another.
    #[error("{loc}: expected {what}, found `{found}`")]
    Expected {
        /// What the grammar called for.
        what: &'static str,
        /// The offending token text.
        found: String,
        /// Position of the offending token.
        loc: Loc,
    },
    /// A top-level identifier that is not a declaration form.
    #[error("{loc}: unknown declaration form `{name}`")]
    UnknownForm {
        /// The unrecognized form.
        name: String,
        /// Position of the form.
        loc: Loc,
    },
    /// A key that does not parse as a u32.
    #[error("{loc}: bad number `{text}`")]
    BadNumber {
        /// The offending literal.
        text: String,
        /// Position of the literal.
        loc: Loc,
    },
    /// A string or block comment with no closing delimiter.
    #[error("{loc}: unterminated {what}")]
    Unterminated {
        /// What was left open (string, comment).
        what: &'static str,
        /// Position where it started.
        loc: Loc,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Ident(String),
    Number(u32),
    Str(String),
    LParen,
    RParen,
    LBrace,
    RBrace,
    Comma,
    Semi,
    Star,
}

impl core::fmt::Display for Token {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Token::Ident(text) => write!(f, "{text}"),
            Token::Number(value) => write!(f, "{value}"),
            Token::Str(text) => write!(f, "\"{text}\""),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::LBrace => write!(f, "{{"),
            Token::RBrace => write!(f, "}}"),
            Token::Comma => write!(f, ","),
            Token::Semi => write!(f, ";"),
            Token::Star => write!(f, "*"),
        }
    }
}

struct Lexer<'src> {
    file: &'src str,
    rest: core::str::Chars<'src>,
    line: u32,
    pending: Option<char>,
}

impl<'src> Lexer<'src> {
    fn new(file: &'src str, src: &'src str) -> Lexer<'src> {
        Lexer {
            file,
            rest: src.chars(),
            line: 1,
            pending: None,
        }
    }

    fn loc(&self) -> Loc {
        Loc::new(self.file, self.line)
    }

    fn bump(&mut self) -> Option<char> {
        let next = self.pending.take().or_else(|| self.rest.next());
        if next == Some('\n') {
            self.line += 1;
        }
        next
    }

    fn peek(&mut self) -> Option<char> {
        if self.pending.is_none() {
            self.pending = self.rest.next();
        }
        self.pending
    }

    /// Next token with the line it started on.
    fn next_token(&mut self) -> Result<Option<(Token, Loc)>, FrontError> {
        loop {
            let Some(ch) = self.bump() else {
                return Ok(None);
            };
            if ch.is_whitespace() {
                continue;
            }
            if ch == '/' {
                match self.peek() {
                    Some('/') => {
                        while let Some(ch) = self.bump() {
                            if ch == '\n' {
                                break;
                            }
                        }
                        continue;
                    }
                    Some('*') => {
                        let start = self.loc();
                        self.bump();
                        let mut prev = '\0';
                        loop {
                            match self.bump() {
                                None => {
                                    return Err(FrontError::Unterminated {
                                        what: "comment",
                                        loc: start,
                                    });
                                }
                                Some('/') if prev == '*' => break,
                                Some(ch) => prev = ch,
                            }
                        }
                        continue;
                    }
                    _ => {
                        return Err(FrontError::Expected {
                            what: "a declaration",
                            found: "/".to_string(),
                            loc: self.loc(),
                        });
                    }
                }
            }
            let loc = self.loc();
            let token = match ch {
                '(' => Token::LParen,
                ')' => Token::RParen,
                '{' => Token::LBrace,
                '}' => Token::RBrace,
                ',' => Token::Comma,
                ';' => Token::Semi,
                '*' => Token::Star,
                '"' => {
                    let mut text = String::new();
                    loop {
                        match self.bump() {
                            None | Some('\n') => {
                                return Err(FrontError::Unterminated {
                                    what: "string",
                                    loc,
                                });
                            }
                            Some('"') => break,
                            Some(ch) => text.push(ch),
                        }
                    }
                    Token::Str(text)
                }
                ch if ch.is_ascii_alphabetic() || ch == '_' => {
                    let mut text = String::from(ch);
                    while let Some(next) = self.peek() {
                        if next.is_ascii_alphanumeric() || next == '_' {
                            text.push(next);
                            self.bump();
                        } else {
                            break;
                        }
                    }
                    Token::Ident(text)
                }
                ch if ch.is_ascii_digit() => {
                    let mut text = String::from(ch);
                    while let Some(next) = self.peek() {
                        if next.is_ascii_alphanumeric() {
                            text.push(next);
                            self.bump();
                        } else {
                            break;
                        }
                    }
                    let value = if let Some(hex) =
                        text.strip_prefix("0x").or_else(|| text.strip_prefix("0X"))
                    {
                        u32::from_str_radix(hex, 16)
                    } else {
                        text.parse()
                    };
                    match value {
                        Ok(value) => Token::Number(value),
                        Err(_) => return Err(FrontError::BadNumber { text, loc }),
                    }
                }
                other => {
                    return Err(FrontError::Expected {
                        what: "a declaration",
                        found: other.to_string(),
                        loc,
                    });
                }
            };
            return Ok(Some((token, loc)));
        }
    }
}

struct Parser<'src> {
    lexer: Lexer<'src>,
    lookahead: Option<(Token, Loc)>,
}

impl<'src> Parser<'src> {
    fn next(&mut self) -> Result<Option<(Token, Loc)>, FrontError> {
        match self.lookahead.take() {
            Some(token) => Ok(Some(token)),
            None => self.lexer.next_token(),
        }
    }

    fn any(&mut self) -> Result<(Token, Loc), FrontError> {
        match self.next()? {
            Some(token) => Ok(token),
            None => Err(FrontError::UnexpectedEof {
                loc: self.lexer.loc(),
            }),
        }
    }

    fn expect_token(&mut self, want: &Token, what: &'static str) -> Result<Loc, FrontError> {
        let (token, loc) = self.any()?;
        if token == *want {
            Ok(loc)
        } else {
            Err(FrontError::Expected {
                what,
                found: token.to_string(),
                loc,
            })
        }
    }

    fn ident(&mut self) -> Result<(String, Loc), FrontError> {
        let (token, loc) = self.any()?;
        match token {
            Token::Ident(text) => Ok((text, loc)),
            other => Err(FrontError::Expected {
                what: "an identifier",
                found: other.to_string(),
                loc,
            }),
        }
    }

    /// An identifier where `null` means "no callback".
    fn callback(&mut self) -> Result<Option<String>, FrontError> {
        let (name, _) = self.ident()?;
        if name == "null" {
            Ok(None)
        } else {
            Ok(Some(name))
        }
    }

    fn string(&mut self) -> Result<String, FrontError> {
        let (token, loc) = self.any()?;
        match token {
            Token::Str(text) => Ok(text),
            other => Err(FrontError::Expected {
                what: "a string",
                found: other.to_string(),
                loc,
            }),
        }
    }

    fn comma(&mut self) -> Result<(), FrontError> {
        self.expect_token(&Token::Comma, "`,`").map(|_| ())
    }

    /// Closing paren plus an optional trailing semicolon.
    fn finish(&mut self) -> Result<(), FrontError> {
        self.expect_token(&Token::RParen, "`)`")?;
        match self.next()? {
            Some((Token::Semi, _)) | None => Ok(()),
            Some(other) => {
                self.lookahead = Some(other);
                Ok(())
            }
        }
    }

    fn entries(&mut self) -> Result<Vec<(TableKey, String)>, FrontError> {
        let mut entries = Vec::new();
        loop {
            match self.next()? {
                None => {
                    return Err(FrontError::UnexpectedEof {
                        loc: self.lexer.loc(),
                    });
                }
                Some((Token::RParen, loc)) => {
                    self.lookahead = Some((Token::RParen, loc));
                    return Ok(entries);
                }
                Some((Token::LBrace, _)) => {
                    let key = match self.any()? {
                        (Token::Number(value), _) => TableKey::Key(value),
                        (Token::Star, _) => TableKey::Wildcard,
                        (other, loc) => {
                            return Err(FrontError::Expected {
                                what: "a key",
                                found: other.to_string(),
                                loc,
                            });
                        }
                    };
                    self.comma()?;
                    let (target, _) = self.ident()?;
                    self.expect_token(&Token::RBrace, "`}`")?;
                    entries.push((key, target));
                    // entry lists allow a trailing comma
                    match self.next()? {
                        Some((Token::Comma, _)) => {}
                        Some(other) => self.lookahead = Some(other),
                        None => {}
                    }
                }
                Some((other, loc)) => {
                    return Err(FrontError::Expected {
                        what: "`{` or `)`",
                        found: other.to_string(),
                        loc,
                    });
                }
            }
        }
    }

    fn form(&mut self, name: &str, loc: Loc) -> Result<Decl, FrontError> {
        self.expect_token(&Token::LParen, "`(`")?;
        let decl = match name {
            "DECL_PARSE_NODE" => {
                let (name, _) = self.ident()?;
                Decl::ParseNode { name }
            }
            "DECL_TLVS_PARSE_NODE" => {
                let (name, _) = self.ident()?;
                Decl::TlvsParseNode { name }
            }
            "MAKE_PARSE_NODE" => {
                let (name, _) = self.ident()?;
                self.comma()?;
                let (proto, _) = self.ident()?;
                self.comma()?;
                let metadata = self.callback()?;
                self.comma()?;
                let handler = self.callback()?;
                self.comma()?;
                let (table, _) = self.ident()?;
                Decl::MakeParseNode {
                    name,
                    proto,
                    metadata,
                    handler,
                    table,
                }
            }
            "MAKE_LEAF_PARSE_NODE" => {
                let (name, _) = self.ident()?;
                self.comma()?;
                let (proto, _) = self.ident()?;
                self.comma()?;
                let metadata = self.callback()?;
                self.comma()?;
                let handler = self.callback()?;
                Decl::MakeLeafParseNode {
                    name,
                    proto,
                    metadata,
                    handler,
                }
            }
            "MAKE_LEAF_TLVS_PARSE_NODE" => {
                let (name, _) = self.ident()?;
                self.comma()?;
                let (proto, _) = self.ident()?;
                self.comma()?;
                let metadata = self.callback()?;
                self.comma()?;
                let handler = self.callback()?;
                self.comma()?;
                let post = self.callback()?;
                self.comma()?;
                let (tlv_table, _) = self.ident()?;
                Decl::MakeLeafTlvsParseNode {
                    name,
                    proto,
                    metadata,
                    handler,
                    post,
                    tlv_table,
                }
            }
            "MAKE_TLV_PARSE_NODE" => {
                let (name, _) = self.ident()?;
                self.comma()?;
                let check = self.callback()?;
                self.comma()?;
                let metadata = self.callback()?;
                self.comma()?;
                let handler = self.callback()?;
                Decl::MakeTlvParseNode {
                    name,
                    check,
                    metadata,
                    handler,
                }
            }
            "MAKE_PROTO_TABLE" => {
                let (name, _) = self.ident()?;
                self.comma()?;
                let entries = self.entries()?;
                Decl::MakeProtoTable { name, entries }
            }
            "MAKE_TLV_TABLE" => {
                let (name, _) = self.ident()?;
                self.comma()?;
                let entries = self.entries()?;
                Decl::MakeTlvTable { name, entries }
            }
            "PARSER_ADD" | "PARSER" => {
                let (name, _) = self.ident()?;
                self.comma()?;
                let desc = self.string()?;
                self.comma()?;
                let (root, _) = self.ident()?;
                Decl::ParserAdd { name, desc, root }
            }
            other => {
                return Err(FrontError::UnknownForm {
                    name: other.to_string(),
                    loc,
                });
            }
        };
        self.finish()?;
        Ok(decl)
    }
}

/// Parse a declaration source into builder records.
///
/// # Errors
///
/// Any [`FrontError`]; the first syntax problem aborts the parse.
pub fn parse_decls(file: &str, src: &str) -> Result<Vec<DeclRecord>, FrontError> {
    let mut parser = Parser {
        lexer: Lexer::new(file, src),
        lookahead: None,
    };
    let mut records = Vec::new();
    while let Some((token, loc)) = parser.next()? {
        match token {
            Token::Ident(name) => {
                let decl = parser.form(&name, loc.clone())?;
                records.push(DeclRecord { decl, loc });
            }
            Token::Semi => {}
            other => {
                return Err(FrontError::Expected {
                    what: "a declaration",
                    found: other.to_string(),
                    loc,
                });
            }
        }
    }
    Ok(records)
}
