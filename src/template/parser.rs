//! Template parser.
//!
//! Parsing runs in two passes: the source is split into text and `{{...}}`
//! tags, then the tags are folded into a tree of [`Node`]s using a stack of
//! open blocks.

use super::{Result, TemplateError};

/// A node in the template AST.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Literal template text, emitted as-is.
    Text(String),

    /// Variable reference: `{{name}}` or `{{user.name}}`
    Variable(String),

    /// Translation reference: `{{t "key"}}` or `{{t "key" param=value}}`
    ///
    /// Parameter values keep their quotes when they are string literals,
    /// otherwise they name a variable.
    Translation {
        key: String,
        params: Vec<(String, String)>,
    },

    /// Conditional block: `{{#if condition}}...{{else}}...{{/if}}`
    If {
        condition: String,
        then_branch: Vec<Node>,
        else_branch: Vec<Node>,
    },

    /// Loop block: `{{#each items}}...{{/each}}` or `{{#each items as item}}`
    Each {
        variable: String,
        item_name: Option<String>,
        body: Vec<Node>,
    },

    /// Inverse conditional: `{{#unless condition}}...{{/unless}}`
    Unless { condition: String, body: Vec<Node> },
}

/// A piece of template source.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Token<'a> {
    Text(&'a str),
    /// Inside of a `{{...}}` tag, trimmed, with its byte offset.
    Tag(&'a str, usize),
}

/// Split `input` into text and tags. `\{{` yields a literal `{{`.
fn tokenize(input: &str) -> Result<Vec<Token<'_>>> {
    let mut tokens = Vec::new();
    let mut pos = 0;

    while let Some(found) = input[pos..].find("{{") {
        let open = pos + found;

        if input[pos..open].ends_with('\\') {
            if open - 1 > pos {
                tokens.push(Token::Text(&input[pos..open - 1]));
            }
            tokens.push(Token::Text("{{"));
            pos = open + 2;
            continue;
        }

        if open > pos {
            tokens.push(Token::Text(&input[pos..open]));
        }

        let body_start = open + 2;
        let close = input[body_start..]
            .find("}}")
            .map(|i| body_start + i)
            .ok_or_else(|| parse_error(format!("Unclosed tag at offset {open}")))?;

        tokens.push(Token::Tag(input[body_start..close].trim(), open));
        pos = close + 2;
    }

    if pos < input.len() {
        tokens.push(Token::Text(&input[pos..]));
    }

    Ok(tokens)
}

/// A block that has been opened but not yet closed.
enum Block {
    Root,
    If(String),
    Each {
        variable: String,
        item_name: Option<String>,
    },
    Unless(String),
}

impl Block {
    fn tag(&self) -> &'static str {
        match self {
            Block::Root => "",
            Block::If(_) => "if",
            Block::Each { .. } => "each",
            Block::Unless(_) => "unless",
        }
    }
}

struct Frame {
    block: Block,
    nodes: Vec<Node>,
    /// Set once `{{else}}` is seen inside an `if`.
    else_nodes: Option<Vec<Node>>,
}

impl Frame {
    fn new(block: Block) -> Self {
        Self {
            block,
            nodes: Vec::new(),
            else_nodes: None,
        }
    }

    fn push(&mut self, node: Node) {
        match &mut self.else_nodes {
            Some(nodes) => nodes.push(node),
            None => self.nodes.push(node),
        }
    }

    /// The finished block node; `None` for the root frame.
    fn into_node(self) -> Option<Node> {
        let node = match self.block {
            Block::Root => return None,
            Block::If(condition) => Node::If {
                condition,
                then_branch: self.nodes,
                else_branch: self.else_nodes.unwrap_or_default(),
            },
            Block::Each {
                variable,
                item_name,
            } => Node::Each {
                variable,
                item_name,
                body: self.nodes,
            },
            Block::Unless(condition) => Node::Unless {
                condition,
                body: self.nodes,
            },
        };
        Some(node)
    }
}

/// Template parser.
pub struct Parser<'a> {
    input: &'a str,
}

impl<'a> Parser<'a> {
    /// Create a new parser for the given input.
    pub fn new(input: &'a str) -> Self {
        Self { input }
    }

    /// Parse the whole input.
    pub fn parse(self) -> Result<Vec<Node>> {
        let mut stack = vec![Frame::new(Block::Root)];

        for token in tokenize(self.input)? {
            match token {
                Token::Text(text) => top(&mut stack).push(Node::Text(text.to_string())),
                Token::Tag(tag, offset) => apply_tag(&mut stack, tag, offset)?,
            }
        }

        let frame = stack.pop().ok_or_else(|| parse_error("Empty parser stack"))?;
        if !stack.is_empty() {
            return Err(parse_error(format!(
                "Unclosed {{{{#{}}}}} block",
                frame.block.tag()
            )));
        }
        Ok(frame.nodes)
    }
}

fn top(stack: &mut [Frame]) -> &mut Frame {
    // the root frame is only popped at the end of `parse`
    let last = stack.len() - 1;
    &mut stack[last]
}

fn apply_tag(stack: &mut Vec<Frame>, tag: &str, offset: usize) -> Result<()> {
    if let Some(open) = tag.strip_prefix('#') {
        stack.push(Frame::new(parse_block(open.trim_start())?));
        return Ok(());
    }

    if let Some(name) = tag.strip_prefix('/') {
        let name = name.trim();
        if stack.len() < 2 || top(stack).block.tag() != name {
            return Err(parse_error(format!(
                "Unexpected closing tag {{{{/{name}}}}} at offset {offset}"
            )));
        }
        if let Some(node) = stack.pop().and_then(Frame::into_node) {
            top(stack).push(node);
        }
        return Ok(());
    }

    if tag == "else" {
        let frame = top(stack);
        if !matches!(frame.block, Block::If(_)) || frame.else_nodes.is_some() {
            return Err(parse_error(format!("Unexpected {{{{else}}}} at offset {offset}")));
        }
        frame.else_nodes = Some(Vec::new());
        return Ok(());
    }

    let node = if tag.starts_with("t ") || tag.starts_with("t\"") {
        parse_translation(&tag[1..])?
    } else {
        Node::Variable(identifier(tag)?)
    };
    top(stack).push(node);
    Ok(())
}

/// Parse the part of a block tag after `#`.
fn parse_block(open: &str) -> Result<Block> {
    let mut words = open.split_whitespace();
    let keyword = words.next().unwrap_or_default();
    let subject = identifier(words.next().unwrap_or_default())?;

    let block = match keyword {
        "if" => Block::If(subject),
        "unless" => Block::Unless(subject),
        "each" => {
            let item_name = match words.next() {
                Some("as") => Some(identifier(words.next().unwrap_or_default())?),
                Some(other) => return Err(parse_error(format!("Expected 'as' but found '{other}'"))),
                None => None,
            };
            Block::Each {
                variable: subject,
                item_name,
            }
        }
        _ => return Err(parse_error(format!("Unknown block tag: {keyword}"))),
    };

    if let Some(extra) = words.next() {
        return Err(parse_error(format!("Unexpected '{extra}' in {{{{#{keyword}}}}}")));
    }
    Ok(block)
}

/// Parse `"key" name=value name="literal"` following the `t` helper.
fn parse_translation(args: &str) -> Result<Node> {
    let args = split_args(args)?;
    let mut args = args.into_iter();

    let key = args
        .next()
        .and_then(|arg| unquote(&arg).map(str::to_string))
        .ok_or_else(|| parse_error("Translation key must be a quoted string"))?;

    let mut params = Vec::new();
    for arg in args {
        let (name, value) = arg
            .split_once('=')
            .ok_or_else(|| parse_error(format!("Expected name=value but found '{arg}'")))?;

        let value = if unquote(value).is_some() {
            value.to_string()
        } else {
            identifier(value)?
        };
        params.push((identifier(name)?, value));
    }

    Ok(Node::Translation { key, params })
}

/// Split on whitespace, keeping quoted strings whole.
fn split_args(input: &str) -> Result<Vec<String>> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut chars = input.chars();
    let mut in_quotes = false;

    while let Some(ch) = chars.next() {
        match ch {
            '"' => {
                in_quotes = !in_quotes;
                current.push(ch);
            }
            '\\' if in_quotes => {
                current.push(ch);
                if let Some(escaped) = chars.next() {
                    current.push(escaped);
                }
            }
            c if c.is_whitespace() && !in_quotes => {
                if !current.is_empty() {
                    args.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }

    if in_quotes {
        return Err(parse_error("Unterminated string"));
    }
    if !current.is_empty() {
        args.push(current);
    }
    Ok(args)
}

fn unquote(s: &str) -> Option<&str> {
    s.strip_prefix('"')?.strip_suffix('"')
}

/// Identifier: letters, digits, `_`, `.`, `-`, with an optional leading `@`.
fn identifier(s: &str) -> Result<String> {
    let name = s.strip_prefix('@').unwrap_or(s);
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '_' | '.' | '-'));

    if !valid {
        return Err(parse_error(format!("Expected identifier but found '{s}'")));
    }
    Ok(s.to_string())
}

fn parse_error(message: impl Into<String>) -> TemplateError {
    TemplateError::Parse(message.into())
}
