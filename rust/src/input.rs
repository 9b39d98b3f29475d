//! Readers turning textual graph descriptions into a `ProblemSpec`.
//!
//! Two formats are understood:
//! - the plain whitespace-separated format: node count, one kind per node, edge
//!   count, `from to` pairs, resource count, `kind latency` pairs;
//! - a dot-like subset: `N [ label = "K" ]` declares node N with kind K and
//!   `A -> B` declares an edge. Any other line is ignored.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::models::{Cycle, OpKind, ProblemSpec, ResourceSpec};

/// Errors raised while reading an input description.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Unexpected end of input, expected {0}")]
    UnexpectedEof(&'static str),
    #[error("Line {line}: expected {expected}, found {token:?}")]
    InvalidToken {
        line: usize,
        expected: &'static str,
        token: String,
    },
    #[error("Line {line}: trailing input {token:?}")]
    TrailingInput { line: usize, token: String },
    #[error("Node {0} is referenced but never labelled with a kind")]
    MissingLabel(usize),
}

/// Whitespace tokenizer that remembers the line of every token.
struct Tokens<'a> {
    tokens: Vec<(usize, &'a str)>,
    pos: usize,
}

impl<'a> Tokens<'a> {
    fn new(text: &'a str) -> Self {
        let tokens = text
            .lines()
            .enumerate()
            .flat_map(|(idx, line)| line.split_whitespace().map(move |tok| (idx + 1, tok)))
            .collect();
        Self { tokens, pos: 0 }
    }

    fn next<T: std::str::FromStr>(&mut self, expected: &'static str) -> Result<T, ParseError> {
        let (line, token) = *self
            .tokens
            .get(self.pos)
            .ok_or(ParseError::UnexpectedEof(expected))?;
        self.pos += 1;
        token.parse::<T>().map_err(|_| ParseError::InvalidToken {
            line,
            expected,
            token: token.to_string(),
        })
    }

    fn remaining(&self) -> usize {
        self.tokens.len() - self.pos
    }

    /// Vector capacity for `count` items of `width` tokens each, never more
    /// than the input can still supply.
    fn capacity_for(&self, count: usize, width: usize) -> usize {
        count.min(self.remaining() / width)
    }

    fn finish(&self) -> Result<(), ParseError> {
        match self.tokens.get(self.pos) {
            Some(&(line, token)) => Err(ParseError::TrailingInput {
                line,
                token: token.to_string(),
            }),
            None => Ok(()),
        }
    }
}

/// Parse the whitespace-separated problem format.
///
/// Node ids in edges are not range-checked here; graph construction reports
/// them with the full node count in context.
pub fn parse_problem(text: &str) -> Result<ProblemSpec, ParseError> {
    let mut tokens = Tokens::new(text);

    let node_count: usize = tokens.next("node count")?;
    let mut kinds = Vec::with_capacity(tokens.capacity_for(node_count, 1));
    for _ in 0..node_count {
        kinds.push(OpKind(tokens.next("operation kind")?));
    }

    let edge_count: usize = tokens.next("edge count")?;
    let mut edges = Vec::with_capacity(tokens.capacity_for(edge_count, 2));
    for _ in 0..edge_count {
        let from: usize = tokens.next("edge source")?;
        let to: usize = tokens.next("edge target")?;
        edges.push((from, to));
    }

    let resource_count: usize = tokens.next("resource count")?;
    let mut resources = Vec::with_capacity(tokens.capacity_for(resource_count, 2));
    for _ in 0..resource_count {
        let kind = OpKind(tokens.next("resource kind")?);
        let latency: Cycle = tokens.next("resource latency")?;
        resources.push(ResourceSpec::new(kind, latency));
    }

    tokens.finish()?;

    Ok(ProblemSpec {
        kinds,
        edges,
        resources,
    })
}

fn parse_dot_node(line: &str) -> Option<(&str, &str)> {
    let (id, attrs) = line.split_once('[')?;
    let attrs = attrs.split(']').next()?;
    let (key, value) = attrs.split_once('=')?;
    if key.trim() != "label" {
        return None;
    }
    Some((id.trim(), value.trim().trim_matches('"')))
}

fn parse_number<T: std::str::FromStr>(
    token: &str,
    line: usize,
    expected: &'static str,
) -> Result<T, ParseError> {
    token.parse::<T>().map_err(|_| ParseError::InvalidToken {
        line,
        expected,
        token: token.to_string(),
    })
}

/// Parse the dot-like graph format. The resource pool is supplied separately.
///
/// Labelled node ids must cover `0..n` without gaps; the first missing id is
/// reported as `MissingLabel`.
pub fn parse_dot(text: &str, resources: &[ResourceSpec]) -> Result<ProblemSpec, ParseError> {
    let mut labels: BTreeMap<usize, OpKind> = BTreeMap::new();
    let mut edges = Vec::new();

    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim().trim_end_matches(';').trim();

        if let Some((from, to)) = line.split_once("->") {
            let to = to.split('[').next().unwrap_or(to);
            let from: usize = parse_number(from.trim(), line_no, "edge source")?;
            let to: usize = parse_number(to.trim(), line_no, "edge target")?;
            edges.push((from, to));
        } else if let Some((id, label)) = parse_dot_node(line) {
            let Ok(node) = id.parse::<usize>() else {
                continue;
            };
            let kind = OpKind(parse_number(label, line_no, "operation kind")?);
            labels.insert(node, kind);
        }
    }

    let mut kinds = Vec::with_capacity(labels.len());
    for (expected, (node, kind)) in labels.into_iter().enumerate() {
        if node != expected {
            return Err(ParseError::MissingLabel(expected));
        }
        kinds.push(kind);
    }

    Ok(ProblemSpec {
        kinds,
        edges,
        resources: resources.to_vec(),
    })
}
