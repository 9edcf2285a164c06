//! Turtle and N-Triples writers

use std::fmt::Write;

use castle_core::{Iri, Namespace, Triple};

/// Whether a local name can be written as a prefixed name without escaping
fn is_simple_local(local: &str) -> bool {
    let mut chars = local.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Render an IRI as `prefix:local` when a binding covers it, otherwise `<iri>`
fn turtle_term(iri: &Iri, prefixes: &[Namespace]) -> String {
    prefixes
        .iter()
        .find(|ns| ns.iri == iri.namespace())
        .filter(|_| is_simple_local(iri.local_name()))
        .map(|ns| format!("{}:{}", ns.prefix, iri.local_name()))
        .unwrap_or_else(|| format!("<{}>", iri))
}

/// Serialize triples as Turtle: prefix declarations, a blank line, then
/// one statement per line in the given order
pub fn to_turtle(triples: &[Triple], prefixes: &[Namespace]) -> String {
    let mut out = String::new();

    for ns in prefixes {
        let _ = writeln!(out, "@prefix {}: <{}> .", ns.prefix, ns.iri);
    }
    if !prefixes.is_empty() {
        out.push('\n');
    }

    for triple in triples {
        let _ = writeln!(
            out,
            "{} {} {} .",
            turtle_term(&triple.subject, prefixes),
            turtle_term(&triple.predicate, prefixes),
            turtle_term(&triple.object, prefixes),
        );
    }

    out
}

/// Serialize triples as N-Triples, one full-IRI statement per line
pub fn to_ntriples(triples: &[Triple]) -> String {
    triples.iter().map(|t| format!("{t} .\n")).collect()
}
