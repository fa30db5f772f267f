//! Small string helpers shared by the emitters.

/// Join an already-quoted schema and relation name.
pub fn make_fqn(schema: &str, name: &str) -> String {
    format!("{schema}.{name}")
}

/// Double every single quote so the text can sit inside a SQL string literal.
pub fn escape_single_quotes(text: &str) -> String {
    text.replace('\'', "''")
}
