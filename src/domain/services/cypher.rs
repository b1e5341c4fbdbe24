use crate::domain::DomainError;

/// Node/relationship properties as exchanged with the graph store.
pub type Properties = serde_json::Map<String, serde_json::Value>;

pub const SOURCE_LABEL: &str = "source";
pub const CONNECTION_TYPE: &str = "connection";

/// Labels and relationship types the graph store accepts.
pub const SUPPORTED_LABELS: [&str; 2] = [SOURCE_LABEL, CONNECTION_TYPE];

const WRITE_KEYWORDS: [&str; 8] = [
    "CREATE", "MERGE", "DELETE", "DETACH", "SET", "REMOVE", "DROP", "FOREACH",
];

/// Procedures that only read. Any other `CALL` target may write.
const READ_ONLY_PROCEDURES: [&str; 20] = [
    "db.labels",
    "db.relationshipTypes",
    "db.propertyKeys",
    "db.info",
    "db.indexes",
    "db.constraints",
    "db.schema.visualization",
    "db.schema.nodeTypeProperties",
    "db.schema.relTypeProperties",
    "db.index.fulltext.queryNodes",
    "db.index.fulltext.queryRelationships",
    "db.index.vector.queryNodes",
    "dbms.components",
    "apoc.meta.data",
    "apoc.meta.schema",
    "apoc.meta.stats",
    "apoc.path.expand",
    "apoc.path.subgraphNodes",
    "apoc.path.subgraphAll",
    "apoc.path.spanningTree",
];

fn is_read_only_procedure(name: &str) -> bool {
    READ_ONLY_PROCEDURES
        .iter()
        .any(|procedure| procedure.eq_ignore_ascii_case(name))
}

/// Labels cannot be bound as query parameters and end up inside the
/// statement text, so only the known set is let through.
pub fn validate_label(label: &str) -> Result<&str, DomainError> {
    SUPPORTED_LABELS
        .iter()
        .find(|supported| **supported == label)
        .copied()
        .ok_or_else(|| {
            DomainError::invalid_input(format!(
                "unsupported graph label '{}' (supported: {})",
                label,
                SUPPORTED_LABELS.join(", ")
            ))
        })
}

/// Property keys are templated too; restrict them to identifier characters.
pub fn validate_property_key(key: &str) -> Result<&str, DomainError> {
    let valid = !key.is_empty()
        && key
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid {
        Ok(key)
    } else {
        Err(DomainError::invalid_input(format!(
            "invalid property key '{}'",
            key
        )))
    }
}

/// True when the statement contains no write clause and calls no
/// procedure outside the read-only allowlist.
///
/// Keywords are matched as whole words after string literals, quoted
/// identifiers and comments have been stripped. Dotted names stay one
/// token, so `n.set` is a property and `apoc.cypher.runWrite` a procedure.
pub fn is_read_only_cypher(cypher: &str) -> bool {
    let words: Vec<String> = keyword_tokens(cypher);

    for (i, word) in words.iter().enumerate() {
        if WRITE_KEYWORDS.contains(&word.as_str()) {
            return false;
        }
        if word == "CALL" {
            // `CALL {` opens a subquery whose clauses are checked in turn
            match words.get(i + 1) {
                Some(next) if next == "{" => {}
                Some(next) if is_read_only_procedure(next) => {}
                _ => return false,
            }
        }
        if word == "LOAD" && words.get(i + 1).is_some_and(|next| next == "CSV") {
            return false;
        }
        if word == "TRANSACTIONS" && i > 0 && words[i - 1] == "IN" {
            return false;
        }
    }
    true
}

fn keyword_tokens(cypher: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut chars = cypher.chars().peekable();

    let flush = |current: &mut String, tokens: &mut Vec<String>| {
        if !current.is_empty() {
            tokens.push(current.to_uppercase());
            current.clear();
        }
    };

    while let Some(c) = chars.next() {
        match c {
            '\'' | '"' | '`' => {
                flush(&mut current, &mut tokens);
                let mut escaped = false;
                for inner in chars.by_ref() {
                    if escaped {
                        escaped = false;
                    } else if inner == '\\' {
                        escaped = true;
                    } else if inner == c {
                        break;
                    }
                }
            }
            '/' if chars.peek() == Some(&'/') => {
                flush(&mut current, &mut tokens);
                for inner in chars.by_ref() {
                    if inner == '\n' {
                        break;
                    }
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                flush(&mut current, &mut tokens);
                chars.next();
                let mut prev = '\0';
                for inner in chars.by_ref() {
                    if prev == '*' && inner == '/' {
                        break;
                    }
                    prev = inner;
                }
            }
            c if c.is_alphanumeric() || c == '_' => current.push(c),
            '.' if !current.is_empty() => current.push(c),
            '{' => {
                flush(&mut current, &mut tokens);
                tokens.push("{".to_string());
            }
            _ => flush(&mut current, &mut tokens),
        }
    }
    flush(&mut current, &mut tokens);
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_label() {
        assert_eq!(validate_label("source").unwrap(), "source");
        assert!(validate_label("connection").is_ok());
        assert!(validate_label("Source").is_err());
        assert!(validate_label("source) DETACH DELETE (n").is_err());
    }

    #[test]
    fn test_validate_property_key() {
        assert!(validate_property_key("sourceId").is_ok());
        assert!(validate_property_key("_private").is_ok());
        assert!(validate_property_key("9lives").is_err());
        assert!(validate_property_key("a}) DELETE n //").is_err());
        assert!(validate_property_key("").is_err());
    }

    #[test]
    fn test_read_queries_allowed() {
        assert!(is_read_only_cypher(
            "MATCH (s:source {webId: $webId}) RETURN s.name, s.created ORDER BY s.created"
        ));
        assert!(is_read_only_cypher(
            "MATCH (a:source)-[c:connection]->(b:source) RETURN a, c, b SKIP 10 LIMIT 5"
        ));
    }

    #[test]
    fn test_write_clauses_rejected() {
        assert!(!is_read_only_cypher("CREATE (n:source {name: 'x'})"));
        assert!(!is_read_only_cypher("match (n) detach delete n"));
        assert!(!is_read_only_cypher("MATCH (n) SET n.name = 'x'"));
        assert!(!is_read_only_cypher("LOAD CSV FROM 'file:///x.csv' AS row RETURN row"));
        assert!(!is_read_only_cypher(
            "CALL { MATCH (n) RETURN n } IN TRANSACTIONS RETURN 1"
        ));
        assert!(!is_read_only_cypher("CALL apoc.create.node(['x'], {})"));
    }

    #[test]
    fn test_write_procedures_rejected() {
        assert!(!is_read_only_cypher(
            "CALL apoc.cypher.runWrite('MATCH (n) DETACH DELETE n', {}) YIELD value RETURN value"
        ));
        assert!(!is_read_only_cypher("CALL db.createLabel('pwned')"));
        assert!(!is_read_only_cypher("MATCH (n) CALL apoc.refactor.rename.label('a', 'b') RETURN n"));
        assert!(!is_read_only_cypher("CALL"));
    }

    #[test]
    fn test_read_procedures_and_subqueries_allowed() {
        assert!(is_read_only_cypher("CALL db.labels() YIELD label RETURN label"));
        assert!(is_read_only_cypher("call DB.SCHEMA.VISUALIZATION()"));
        assert!(is_read_only_cypher(
            "MATCH (s:source) CALL { WITH s MATCH (s)-[:connection]->(t) RETURN count(t) AS n } RETURN s, n"
        ));
        assert!(!is_read_only_cypher(
            "MATCH (s:source) CALL { WITH s SET s.seen = true } RETURN s"
        ));
    }

    #[test]
    fn test_keywords_inside_literals_and_comments_ignored() {
        assert!(is_read_only_cypher(
            "MATCH (s:source) WHERE s.content CONTAINS 'delete me' RETURN s"
        ));
        assert!(is_read_only_cypher("MATCH (n) RETURN n.`set` // create later"));
        assert!(is_read_only_cypher("MATCH (n) /* MERGE */ RETURN n"));
        assert!(is_read_only_cypher(
            r#"MATCH (n) WHERE n.name = "it\"s SET" RETURN n"#
        ));
    }
}
