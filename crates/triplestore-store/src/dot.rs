//! Graphviz rendering of the resource edges under one predicate.

use std::collections::BTreeSet;
use std::io::Write;

use triplestore_types::Triple;

use crate::error::StoreResult;

/// Render `digraph "<predicate>" { "s" -> "o"; ... }`.
///
/// Only triples with `predicate` and a resource object become edges.
/// Edges are sorted and deduplicated.
pub fn render<'a>(predicate: &str, triples: impl IntoIterator<Item = &'a Triple>) -> String {
    let edges: BTreeSet<(&str, &str)> = triples
        .into_iter()
        .filter(|t| t.predicate() == predicate)
        .filter_map(|t| Some((t.subject(), t.object().resource_id()?)))
        .collect();

    let mut out = format!("digraph \"{}\" {{\n", quote(predicate));
    for (from, to) in edges {
        out.push_str(&format!("  \"{}\" -> \"{}\";\n", quote(from), quote(to)));
    }
    out.push_str("}\n");
    out
}

/// Write the output of [`render`] to `writer`.
pub fn write_dot<'a, W: Write>(
    writer: &mut W,
    predicate: &str,
    triples: impl IntoIterator<Item = &'a Triple>,
) -> StoreResult<()> {
    writer.write_all(render(predicate, triples).as_bytes())?;
    writer.flush()?;
    Ok(())
}

fn quote(name: &str) -> String {
    name.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_sorted_edges() {
        let triples = [
            Triple::build("b", "knows").resource("c"),
            Triple::build("a", "knows").resource("c"),
            Triple::build("a", "knows").resource("b"),
        ];
        assert_eq!(
            render("knows", &triples),
            "digraph \"knows\" {\n  \"a\" -> \"b\";\n  \"a\" -> \"c\";\n  \"b\" -> \"c\";\n}\n"
        );
    }

    #[test]
    fn skips_literals_and_other_predicates() {
        let triples = [
            Triple::build("a", "knows").string_literal("b"),
            Triple::build("a", "likes").resource("b"),
        ];
        assert_eq!(render("knows", &triples), "digraph \"knows\" {\n}\n");
    }

    #[test]
    fn escapes_quotes() {
        let triples = [Triple::build("say \"hi\"", "p").resource("o")];
        let out = render("p", &triples);
        assert!(out.contains(r#""say \"hi\"" -> "o";"#));
    }

    #[test]
    fn blank_nodes_are_nodes() {
        let triples = [Triple::build("_:x", "p").blank_node("y")];
        assert!(render("p", &triples).contains(r#""_:x" -> "_:y";"#));
    }

    #[test]
    fn write_to_buffer() {
        let triples = [Triple::build("a", "p").resource("b")];
        let mut buf = Vec::new();
        write_dot(&mut buf, "p", &triples).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), render("p", &triples));
    }
}
