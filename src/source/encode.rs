//! Re-serialization of a [`SourceReference`] back into source text

use crate::source::reference::SourceReference;

/// Render `reference` in the same shape it was decomposed from
///
/// Getters are re-attached in written order, followed by the repository text,
/// the `//subfolder` suffix and the query string. The `ref` pair is written at
/// its original position and appended when newly pinned. A `?` is written
/// whenever the source had one, even with an empty query.
pub fn encode(reference: &SourceReference) -> String {
    let mut out = String::new();

    for getter in &reference.getters {
        out.push_str(getter);
        out.push_str("::");
    }

    out.push_str(&reference.remote.text);

    if let Some(subfolder) = &reference.subfolder {
        out.push_str("//");
        out.push_str(subfolder);
    }

    let pairs = reference.query_pairs();
    if reference.has_query || !pairs.is_empty() {
        out.push('?');
        out.push_str(&pairs.join("&"));
    }

    out
}
