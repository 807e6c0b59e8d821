//! Key construction for the three keyspaces.
//!
//! Keys are UTF-8 byte strings. The colon separating the collection prefix
//! is load-bearing: scans identify collection membership by the prefix
//! before the first colon and nothing else, which is why collection names
//! must not contain one. The `=` in path-value keys and the `,` in posting
//! lists are equally reserved and left unescaped.

/// Primary keyspace: `<collection>:<id>` → JSON document bytes.
pub fn doc_key(collection: &str, id: &str) -> Vec<u8> {
    format!("{collection}:{id}").into_bytes()
}

/// Path-value keyspace: `<collection>:<path>=<value>` → posting list.
pub fn index_key(collection: &str, path: &str, value: &str) -> Vec<u8> {
    format!("{collection}:{path}={value}").into_bytes()
}

/// Inverted keyspace: `<collection>:<token>` → posting list.
pub fn text_key(collection: &str, token: &str) -> Vec<u8> {
    format!("{collection}:{token}").into_bytes()
}

/// Extract the collection prefix of a key: the bytes before the first colon.
///
/// Returns `None` when the key has no colon or a non-UTF-8 prefix.
pub fn collection_of(key: &[u8]) -> Option<&str> {
    let end = key.iter().position(|&b| b == b':')?;
    std::str::from_utf8(&key[..end]).ok()
}
