//! GEXF 1.2 export of the tangle graph.
//!
//! Emits a minimal directed-graph document that standard graph tooling
//! (Gephi and friends) can open. Output is deterministic: nodes and edges
//! appear in graph insertion order, and edge ids are their positions.

use std::io::Write;

use super::TangleGraph;

pub fn write_gexf<W: Write>(graph: &TangleGraph, writer: &mut W) -> std::io::Result<()> {
    writeln!(writer, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
    writeln!(
        writer,
        r#"<gexf xmlns="http://gexf.net/1.2" version="1.2">"#
    )?;
    writeln!(writer, r#"  <graph defaultedgetype="directed">"#)?;

    writeln!(writer, "    <nodes>")?;
    for node in graph.nodes() {
        let id = escape_xml(node);
        writeln!(writer, r#"      <node id="{id}" />"#)?;
    }
    writeln!(writer, "    </nodes>")?;

    writeln!(writer, "    <edges>")?;
    for (index, (from, to)) in graph.edges().iter().enumerate() {
        let source = escape_xml(from);
        let target = escape_xml(to);
        writeln!(
            writer,
            r#"      <edge id="{index}" source="{source}" target="{target}" />"#
        )?;
    }
    writeln!(writer, "    </edges>")?;

    writeln!(writer, "  </graph>")?;
    writeln!(writer, "</gexf>")?;
    Ok(())
}

fn escape_xml(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            other => escaped.push(other),
        }
    }
    escaped
}
