//! Immutable transition table built from the grammar rules.

use std::fmt::Write;
use std::sync::LazyLock;

use crate::parser::Mode;
use crate::parser::grammar::{Action, NodeId, rule};
use crate::parser::tokens::TokenKind;

static BODY_GRAPH: LazyLock<Graph> = LazyLock::new(|| Graph::new(Mode::Body));
static HEADER_GRAPH: LazyLock<Graph> = LazyLock::new(|| Graph::new(Mode::HeaderSelection));

/// A state of the automaton.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub kind: TokenKind,
    /// Indices of successor nodes, in priority order.
    pub successors: Vec<usize>,
    pub action: Option<Action>,
}

/// The grammar graph for one start configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Graph {
    nodes: Vec<Node>,
}

impl Graph {
    /// Build the graph for `mode` from the rule table.
    pub fn new(mode: Mode) -> Self {
        let nodes = NodeId::ALL
            .iter()
            .map(|&id| {
                let rule = rule(id, mode);
                Node {
                    kind: rule.kind,
                    successors: rule.next.iter().map(|n| n.index()).collect(),
                    action: rule.action,
                }
            })
            .collect();

        Self { nodes }
    }

    /// Shared, lazily built graph for `mode`.
    pub fn for_mode(mode: Mode) -> &'static Graph {
        match mode {
            Mode::Body => &BODY_GRAPH,
            Mode::HeaderSelection => &HEADER_GRAPH,
        }
    }

    /// Index of the entry node.
    pub fn start(&self) -> usize {
        NodeId::Start.index()
    }

    pub fn node(&self, index: usize) -> &Node {
        &self.nodes[index]
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// First successor of `index` that accepts `kind`.
    pub fn transition(&self, index: usize, kind: TokenKind) -> Option<usize> {
        self.nodes[index]
            .successors
            .iter()
            .copied()
            .find(|&s| self.nodes[s].kind == kind)
    }

    /// Kinds accepted after `index`, in successor order.
    pub fn expected(&self, index: usize) -> Vec<TokenKind> {
        self.nodes[index]
            .successors
            .iter()
            .map(|&s| self.nodes[s].kind)
            .collect()
    }

    /// Whether input may end while the walker sits on `index`.
    pub fn can_end(&self, index: usize) -> bool {
        self.transition(index, TokenKind::Eof).is_some()
    }

    /// Nodes reachable from the start node.
    pub fn reachable(&self) -> Vec<bool> {
        let mut seen = vec![false; self.nodes.len()];
        let mut stack = vec![self.start()];
        while let Some(index) = stack.pop() {
            if seen[index] {
                continue;
            }
            seen[index] = true;
            stack.extend(self.nodes[index].successors.iter().copied());
        }
        seen
    }

    /// Render the reachable part of the graph as Graphviz DOT.
    pub fn to_dot(&self) -> String {
        let reachable = self.reachable();
        let mut out = String::from("digraph sqlreq {\n");

        for (i, node) in self.nodes.iter().enumerate() {
            if reachable[i] {
                let _ = writeln!(out, "    n{} [label=\"{}-{}\"];", i, i, node.kind);
            }
        }
        for (i, node) in self.nodes.iter().enumerate() {
            if !reachable[i] {
                continue;
            }
            for s in &node.successors {
                let _ = writeln!(out, "    n{} -> n{};", i, s);
            }
        }

        out.push_str("}\n");
        out
    }
}
