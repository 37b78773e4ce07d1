//! export::gexf
//!
//! GEXF 1.2 reader and writer (static, directed).
//!
//! Nodes use the handle as both id and label. Edges carry a `weight`
//! attribute and a `posts` attvalue with space-separated post ids.
//!
//! The reader also accepts files written by other tools: node labels
//! name the handles when present, weights may be integral floats
//! (`2.0`), and unknown elements are ignored.

use std::collections::{HashMap, HashSet};
use std::io::{self, BufRead, Write};

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::ExportError;
use crate::core::network::{CollapsePolicy, EdgeView, Network};
use crate::core::types::{Handle, PostId};

/// GEXF 1.2 namespace.
pub const GEXF_NS: &str = "http://www.gexf.net/1.2draft";

/// Write `network` as GEXF.
///
/// Nodes are written in sorted order and edges sorted by source then
/// target, so output is stable for a given network.
pub fn write_gexf<W: Write>(network: &Network, mut out: W) -> io::Result<()> {
    writeln!(out, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
    writeln!(out, r#"<gexf xmlns="{}" version="1.2">"#, GEXF_NS)?;
    writeln!(out, "  <meta>")?;
    writeln!(out, "    <creator>chirpgraph</creator>")?;
    writeln!(out, "    <description>mention network</description>")?;
    writeln!(out, "  </meta>")?;
    writeln!(out, r#"  <graph mode="static" defaultedgetype="directed">"#)?;
    writeln!(out, r#"    <attributes class="edge">"#)?;
    writeln!(out, r#"      <attribute id="0" title="posts" type="string"/>"#)?;
    writeln!(out, "    </attributes>")?;

    writeln!(out, "    <nodes>")?;
    for node in network.sorted_nodes() {
        let name = escape(node.as_str());
        writeln!(out, r#"      <node id="{0}" label="{0}"/>"#, name)?;
    }
    writeln!(out, "    </nodes>")?;

    let mut edges: Vec<EdgeView<'_>> = network.edges().collect();
    edges.sort_by(|a, b| a.source.cmp(b.source).then_with(|| a.target.cmp(b.target)));

    writeln!(out, "    <edges>")?;
    for (id, edge) in edges.iter().enumerate() {
        write!(
            out,
            r#"      <edge id="{}" source="{}" target="{}" weight="{}""#,
            id,
            escape(edge.source.as_str()),
            escape(edge.target.as_str()),
            edge.weight
        )?;
        if edge.posts.is_empty() {
            writeln!(out, "/>")?;
            continue;
        }
        let posts: Vec<&str> = edge.posts.iter().map(|p| p.as_str()).collect();
        writeln!(out, ">")?;
        writeln!(out, "        <attvalues>")?;
        writeln!(
            out,
            r#"          <attvalue for="0" value="{}"/>"#,
            escape(&posts.join(" "))
        )?;
        writeln!(out, "        </attvalues>")?;
        writeln!(out, "      </edge>")?;
    }
    writeln!(out, "    </edges>")?;

    writeln!(out, "  </graph>")?;
    writeln!(out, "</gexf>")?;
    Ok(())
}

/// Read a directed network from GEXF.
///
/// Repeated `(source, target)` pairs make the result a multigraph;
/// otherwise it is weighted.
pub fn read_gexf<R: BufRead>(input: R) -> Result<Network, ExportError> {
    let mut reader = Reader::from_reader(input);
    let mut buf = Vec::new();
    let mut doc = GexfDocument::default();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => doc.open(&e, false)?,
            Event::Empty(e) => doc.open(&e, true)?,
            Event::End(e) => doc.close(e.local_name().as_ref()),
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    doc.into_network()
}

#[derive(Debug)]
struct PendingEdge {
    source: String,
    target: String,
    weight: u64,
    posts: Vec<PostId>,
}

/// Parse state for [`read_gexf`].
#[derive(Debug, Default)]
struct GexfDocument {
    saw_graph: bool,
    in_edge_attributes: bool,
    posts_attributes: HashSet<String>,
    nodes: Vec<Handle>,
    handles: HashMap<String, Handle>,
    edges: Vec<PendingEdge>,
    open_edge: Option<usize>,
}

impl GexfDocument {
    fn open(&mut self, e: &BytesStart<'_>, empty: bool) -> Result<(), ExportError> {
        match e.local_name().as_ref() {
            b"graph" => {
                self.saw_graph = true;
                if attr(e, b"defaultedgetype")?.as_deref() == Some("undirected") {
                    return Err(ExportError::Undirected);
                }
            }
            b"attributes" => {
                self.in_edge_attributes = !empty && attr(e, b"class")?.as_deref() == Some("edge");
            }
            b"attribute" if self.in_edge_attributes => {
                if attr(e, b"title")?.as_deref() == Some("posts") {
                    if let Some(id) = attr(e, b"id")? {
                        self.posts_attributes.insert(id);
                    }
                }
            }
            b"node" => {
                let id = required(e, b"id", "node")?;
                let handle = Handle::new(attr(e, b"label")?.unwrap_or_else(|| id.clone()))?;
                self.nodes.push(handle.clone());
                self.handles.insert(id, handle);
            }
            b"edge" => {
                if attr(e, b"type")?.as_deref() == Some("undirected") {
                    return Err(ExportError::Undirected);
                }
                let source = required(e, b"source", "edge")?;
                let target = required(e, b"target", "edge")?;
                let weight = match attr(e, b"weight")? {
                    Some(raw) => parse_weight(&raw).ok_or_else(|| {
                        ExportError::Malformed(format!(
                            "edge {} -> {} has weight '{}'",
                            source, target, raw
                        ))
                    })?,
                    None => 1,
                };
                self.edges.push(PendingEdge {
                    source,
                    target,
                    weight,
                    posts: Vec::new(),
                });
                self.open_edge = (!empty).then(|| self.edges.len() - 1);
            }
            b"attvalue" => {
                let Some(edge) = self.open_edge.and_then(|i| self.edges.get_mut(i)) else {
                    return Ok(());
                };
                let Some(key) = attr(e, b"for")? else {
                    return Ok(());
                };
                if self.posts_attributes.contains(&key) {
                    if let Some(value) = attr(e, b"value")? {
                        edge.posts
                            .extend(value.split_whitespace().filter_map(|p| PostId::new(p).ok()));
                    }
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn close(&mut self, name: &[u8]) {
        match name {
            b"attributes" => self.in_edge_attributes = false,
            b"edge" => self.open_edge = None,
            _ => {}
        }
    }

    fn into_network(self) -> Result<Network, ExportError> {
        if !self.saw_graph {
            return Err(ExportError::Malformed("no <graph> element".into()));
        }

        let collapse = {
            let mut pairs = HashSet::new();
            if self
                .edges
                .iter()
                .all(|e| pairs.insert((e.source.as_str(), e.target.as_str())))
            {
                CollapsePolicy::Weighted
            } else {
                CollapsePolicy::Multigraph
            }
        };

        let mut network = Network::new(collapse);
        for handle in self.nodes {
            network.add_node(handle);
        }
        for edge in self.edges {
            let source = lookup(&self.handles, &edge.source)?;
            let target = lookup(&self.handles, &edge.target)?;
            if edge.weight == 0 {
                return Err(ExportError::InvalidWeight {
                    from: source.to_string(),
                    to: target.to_string(),
                });
            }
            network.insert_edge(source, target, edge.weight, edge.posts);
        }
        Ok(network)
    }
}

fn lookup(handles: &HashMap<String, Handle>, id: &str) -> Result<Handle, ExportError> {
    handles
        .get(id)
        .cloned()
        .ok_or_else(|| ExportError::UnknownNode(id.to_string()))
}

fn attr(e: &BytesStart<'_>, name: &[u8]) -> Result<Option<String>, ExportError> {
    match e.try_get_attribute(name).map_err(quick_xml::Error::from)? {
        Some(a) => Ok(Some(a.unescape_value()?.into_owned())),
        None => Ok(None),
    }
}

fn required(e: &BytesStart<'_>, name: &[u8], element: &str) -> Result<String, ExportError> {
    attr(e, name)?.ok_or_else(|| {
        ExportError::Malformed(format!(
            "<{}> without {}",
            element,
            String::from_utf8_lossy(name)
        ))
    })
}

/// Integer weights, or floats with no fractional part.
fn parse_weight(raw: &str) -> Option<u64> {
    let raw = raw.trim();
    if let Ok(weight) = raw.parse::<u64>() {
        return Some(weight);
    }
    let weight: f64 = raw.parse().ok()?;
    (weight.is_finite() && weight >= 0.0 && weight.fract() == 0.0 && weight <= u64::MAX as f64)
        .then_some(weight as u64)
}

/// Escape text for use in an XML attribute.
pub fn escape(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            c => escaped.push(c),
        }
    }
    escaped
}
