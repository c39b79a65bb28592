//! Scanner primitives shared by the parser, importer and validator
//!
//! Every clause extraction and splitting routine walks the same [`Scanner`]:
//! the query is lexed once, then a cursor moves forward over the tokens
//! while tracking parenthesis depth. String literals are single tokens, so
//! keywords or commas inside quotes are never visible to the scan.

use crate::lexer::{tokenize, Token, TokenKind};

/// Forward-only cursor over the tokens of a query
#[derive(Debug, Clone)]
pub struct Scanner<'a> {
    source: &'a str,
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
    underflow: bool,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            tokens: tokenize(source),
            pos: 0,
            depth: 0,
            underflow: false,
        }
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Move the cursor back to the first token
    pub fn rewind(&mut self) {
        self.pos = 0;
        self.depth = 0;
        self.underflow = false;
    }

    pub fn is_at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    pub fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    pub fn peek_nth(&self, n: usize) -> Option<&Token> {
        self.tokens.get(self.pos + n)
    }

    pub fn at_top_level(&self) -> bool {
        self.depth == 0
    }

    /// Byte offset of the current token, or the end of the source
    pub fn offset(&self) -> usize {
        self.peek().map_or(self.source.len(), |t| t.span.start)
    }

    pub fn text(&self, token: &Token) -> &'a str {
        token.text(self.source)
    }

    /// Consume the current token, updating the paren depth
    pub fn advance(&mut self) -> Option<Token> {
        let token = *self.tokens.get(self.pos)?;
        self.pos += 1;
        match token.kind {
            TokenKind::LParen => self.depth += 1,
            TokenKind::RParen => {
                if self.depth == 0 {
                    self.underflow = true;
                } else {
                    self.depth -= 1;
                }
            }
            _ => {}
        }
        Some(token)
    }

    pub fn skip(&mut self, n: usize) {
        for _ in 0..n {
            if self.advance().is_none() {
                break;
            }
        }
    }

    /// Does the keyword (one or more words) start at the current token?
    ///
    /// Words compare case-insensitively against whole tokens, so `GROUP BY`
    /// never matches the tail of an identifier such as `SUBGROUP`.
    pub fn at_keyword(&self, words: &[&str]) -> bool {
        !words.is_empty()
            && words.iter().enumerate().all(|(i, word)| {
                self.peek_nth(i)
                    .is_some_and(|t| t.kind.is_word() && self.text(t).eq_ignore_ascii_case(word))
            })
    }

    /// Consume a parenthesized group starting at the current `(`, up to and
    /// including its matching `)`
    pub fn skip_group(&mut self) {
        if self.peek().map(|t| t.kind) != Some(TokenKind::LParen) {
            return;
        }
        let depth = self.depth;
        self.advance();
        while let Some(token) = self.advance() {
            if token.kind == TokenKind::RParen && self.depth == depth {
                break;
            }
        }
    }

    /// Byte offset of the first top-level occurrence of `keyword`
    pub fn find_keyword(&mut self, keyword: &str) -> Option<usize> {
        let words = keyword_words(keyword);
        self.rewind();
        while let Some(token) = self.peek().copied() {
            if self.at_top_level() && self.at_keyword(&words) {
                return Some(token.span.start);
            }
            self.advance();
        }
        None
    }

    /// Text between a top-level `start` keyword and the first top-level
    /// `ends` keyword after it, trimmed. Runs to the end of the input when
    /// no end keyword follows; `None` when `start` never occurs at depth 0.
    pub fn clause(&mut self, start: &str, ends: &[&str]) -> Option<&'a str> {
        let start_words = keyword_words(start);
        let end_words: Vec<Vec<&str>> = ends.iter().map(|e| keyword_words(e)).collect();
        self.rewind();

        loop {
            self.peek()?;
            if self.at_top_level() && self.at_keyword(&start_words) {
                self.skip(start_words.len());
                break;
            }
            self.advance();
        }

        let begin = self.offset();
        while let Some(token) = self.peek().copied() {
            if self.at_top_level() && end_words.iter().any(|w| self.at_keyword(w)) {
                return Some(self.source[begin..token.span.start].trim());
            }
            self.advance();
        }
        Some(self.source[begin..].trim())
    }

    /// Split on top-level tokens for which `is_separator` holds
    fn split_where(&mut self, is_separator: impl Fn(&Token) -> bool) -> Vec<&'a str> {
        self.rewind();
        let mut parts = Vec::new();
        let mut item_start = 0;
        while let Some(token) = self.peek().copied() {
            if self.at_top_level() && is_separator(&token) {
                parts.push(self.source[item_start..token.span.start].trim());
                item_start = token.span.end;
            }
            self.advance();
        }
        parts.push(self.source[item_start..].trim());
        parts.retain(|p| !p.is_empty());
        parts
    }

    /// First word token after the first top-level `FROM`
    pub fn object_name(&mut self) -> Option<&'a str> {
        self.find_keyword("FROM")?;
        let next = self.peek_nth(1)?;
        if next.kind.is_word() {
            Some(self.text(next))
        } else {
            None
        }
    }

    /// True once parentheses close exactly as often as they open
    pub fn is_balanced(&mut self) -> bool {
        self.rewind();
        while self.advance().is_some() {}
        let balanced = self.depth == 0 && !self.underflow;
        self.rewind();
        balanced
    }

    pub fn has_unterminated_string(&self) -> bool {
        self.tokens
            .iter()
            .any(|t| t.kind == TokenKind::UnterminatedString)
    }
}

fn keyword_words(keyword: &str) -> Vec<&str> {
    keyword.split_whitespace().collect()
}

/// Strip one matching pair of surrounding quotes (`'` or `"`)
pub fn trim_quotes(s: &str) -> &str {
    let bytes = s.as_bytes();
    if bytes.len() >= 2 {
        let first = bytes[0];
        if (first == b'\'' || first == b'"') && bytes[bytes.len() - 1] == first {
            return &s[1..s.len() - 1];
        }
    }
    s
}

/// Decode a string literal: `"…"` with JSON escapes, `'…'` with SOQL
/// backslash escapes. Unquoted text comes back trimmed but otherwise as is.
///
/// `\%` and `\_` are LIKE escapes and keep their backslash.
pub fn unquote_literal(s: &str) -> String {
    let s = s.trim();
    let inner = trim_quotes(s);
    if inner.len() == s.len() {
        return s.to_string();
    }
    if s.starts_with('"') {
        if let Ok(decoded) = serde_json::from_str::<String>(s) {
            return decoded;
        }
    }

    let mut decoded = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            decoded.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => decoded.push('\n'),
            Some('r') => decoded.push('\r'),
            Some('t') => decoded.push('\t'),
            Some('b') => decoded.push('\u{8}'),
            Some('f') => decoded.push('\u{c}'),
            Some(like @ ('%' | '_')) => {
                decoded.push('\\');
                decoded.push(like);
            }
            Some(other) => decoded.push(other),
            None => decoded.push('\\'),
        }
    }
    decoded
}

/// Split on commas that sit outside parentheses and string literals
pub fn split_csv_respecting_parens(s: &str) -> Vec<&str> {
    Scanner::new(s).split_where(|t| t.kind == TokenKind::Comma)
}

/// Split a WHERE or HAVING body on top-level `AND` / `OR`
pub fn split_conditions(s: &str) -> Vec<&str> {
    Scanner::new(s).split_where(|t| matches!(t.kind, TokenKind::And | TokenKind::Or))
}

/// Extract the body of a clause; see [`Scanner::clause`]
pub fn extract_clause<'a>(query: &'a str, start: &str, ends: &[&str]) -> Option<&'a str> {
    Scanner::new(query).clause(start, ends)
}

/// For `( … )` returns the text between the outer parentheses, provided the
/// opening paren closes at the very end
pub fn strip_outer_parens(s: &str) -> Option<&str> {
    let trimmed = s.trim();
    let mut scanner = Scanner::new(trimmed);
    let first = scanner.peek()?;
    if first.kind != TokenKind::LParen {
        return None;
    }
    scanner.advance();
    while let Some(token) = scanner.advance() {
        if token.kind == TokenKind::RParen && scanner.at_top_level() {
            return scanner
                .is_at_end()
                .then(|| trimmed[1..token.span.start].trim());
        }
    }
    None
}

/// Body of a parenthesized `(SELECT …)` item
pub fn subquery_body(s: &str) -> Option<&str> {
    let inner = strip_outer_parens(s)?;
    let scanner = Scanner::new(inner);
    scanner.at_keyword(&["SELECT"]).then_some(inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_trim_quotes() {
        assert_eq!(trim_quotes("'abc'"), "abc");
        assert_eq!(trim_quotes("\"abc\""), "abc");
        assert_eq!(trim_quotes("'abc\""), "'abc\"");
        assert_eq!(trim_quotes("'"), "'");
        assert_eq!(trim_quotes("''"), "");
        assert_eq!(trim_quotes("abc"), "abc");
    }

    #[test]
    fn test_unquote_literal() {
        assert_eq!(unquote_literal(r#""say \"hi\"""#), r#"say "hi""#);
        assert_eq!(unquote_literal(r#""C:\\temp""#), r"C:\temp");
        assert_eq!(unquote_literal(r"'O\'Brien'"), "O'Brien");
        assert_eq!(unquote_literal(r"'a\\b\nc'"), "a\\b\nc");
        assert_eq!(unquote_literal(r"'100\%'"), r"100\%");
        assert_eq!(unquote_literal("  plain "), "plain");
        assert_eq!(unquote_literal("''"), "");
    }

    #[test]
    fn test_split_csv_respects_parens_and_quotes() {
        assert_eq!(
            split_csv_respecting_parens("a, f(b,c), 'd,e'"),
            vec!["a", "f(b,c)", "'d,e'"]
        );
    }

    #[test]
    fn test_split_csv_escaped_quote() {
        assert_eq!(
            split_csv_respecting_parens(r"'it\'s, fine', b"),
            vec![r"'it\'s, fine'", "b"]
        );
    }

    #[test]
    fn test_split_csv_drops_empty_items() {
        assert_eq!(split_csv_respecting_parens("a,, b,"), vec!["a", "b"]);
        assert!(split_csv_respecting_parens("   ").is_empty());
    }

    #[test]
    fn test_extract_clause_basic() {
        let q = "SELECT Id, Name FROM Account WHERE Name = 'x' LIMIT 5";
        assert_eq!(extract_clause(q, "SELECT", &["FROM"]), Some("Id, Name"));
        assert_eq!(
            extract_clause(q, "WHERE", &["GROUP BY", "ORDER BY", "LIMIT"]),
            Some("Name = 'x'")
        );
        assert_eq!(extract_clause(q, "LIMIT", &["OFFSET"]), Some("5"));
        assert_eq!(extract_clause(q, "ORDER BY", &["LIMIT"]), None);
    }

    #[test]
    fn test_extract_clause_ignores_quoted_keywords() {
        let q = "SELECT Id FROM Account WHERE Name = 'x LIMIT 3' LIMIT 5";
        assert_eq!(extract_clause(q, "LIMIT", &[]), Some("5"));
    }

    #[test]
    fn test_extract_clause_ignores_nested_keywords() {
        let q = "SELECT Id, (SELECT Id FROM Contacts WHERE Email != null) FROM Account";
        assert_eq!(extract_clause(q, "WHERE", &["LIMIT"]), None);
        assert_eq!(
            extract_clause(q, "SELECT", &["FROM"]),
            Some("Id, (SELECT Id FROM Contacts WHERE Email != null)")
        );
    }

    #[test]
    fn test_extract_clause_word_boundaries() {
        let q = "SELECT SUBGROUP, Name FROM Account ORDER BY Name";
        assert_eq!(extract_clause(q, "GROUP BY", &["ORDER BY"]), None);
        assert_eq!(extract_clause(q, "ORDER BY", &[]), Some("Name"));
    }

    #[test]
    fn test_multi_word_keyword_spans_whitespace() {
        let q = "SELECT Name FROM Account GROUP\n  BY Name";
        assert_eq!(extract_clause(q, "GROUP BY", &[]), Some("Name"));
    }

    #[test]
    fn test_object_name_skips_subquery_from() {
        let mut scanner = Scanner::new("SELECT Id, (SELECT Id FROM Contacts) FROM Account");
        assert_eq!(scanner.object_name(), Some("Account"));
    }

    #[test]
    fn test_balance() {
        assert!(Scanner::new("SELECT Id, (SELECT Id FROM Contacts) FROM Account").is_balanced());
        assert!(!Scanner::new("SELECT Id, (SELECT Id FROM Contacts FROM Account").is_balanced());
        assert!(!Scanner::new("SELECT Id) FROM Account (").is_balanced());
        assert!(Scanner::new("SELECT Id FROM Account WHERE Name = ')'").is_balanced());
    }

    #[test]
    fn test_split_conditions() {
        assert_eq!(
            split_conditions("A = 1 AND (B = 2 OR C = 3) or D = 'x and y'"),
            vec!["A = 1", "(B = 2 OR C = 3)", "D = 'x and y'"]
        );
    }

    #[test]
    fn test_subquery_body() {
        assert_eq!(
            subquery_body("(SELECT Id FROM Contacts)"),
            Some("SELECT Id FROM Contacts")
        );
        assert_eq!(subquery_body("('a', 'b')"), None);
        assert_eq!(subquery_body("(SELECT Id FROM A) OR (x)"), None);
        assert_eq!(strip_outer_parens("('a', 'b')"), Some("'a', 'b'"));
    }
}
