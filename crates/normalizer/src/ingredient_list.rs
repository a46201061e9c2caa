/// Parse a scraped ingredient field into a list of strings.
///
/// Accepts a JSON array of strings or a Python-style list literal
/// (`['2 cups flour', "1 tsp salt"]`). Returns `None` for anything else,
/// including arrays holding non-string elements.
#[must_use]
pub fn parse_ingredient_list(raw: &str) -> Option<Vec<String>> {
    let trimmed = raw.trim();
    if !trimmed.starts_with('[') {
        return None;
    }

    if let Ok(value) = serde_json::from_str::<serde_json::Value>(trimmed) {
        return strings_from_json(&value);
    }

    LiteralParser::new(trimmed).parse_list()
}

/// Extract a list of strings from an already-decoded JSON value.
#[must_use]
pub fn strings_from_json(value: &serde_json::Value) -> Option<Vec<String>> {
    let items = value.as_array()?;
    items
        .iter()
        .map(|item| item.as_str().map(str::to_string))
        .collect()
}

struct LiteralParser<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
}

impl<'a> LiteralParser<'a> {
    fn new(raw: &'a str) -> Self {
        Self {
            chars: raw.chars().peekable(),
        }
    }

    fn parse_list(mut self) -> Option<Vec<String>> {
        self.skip_ws();
        if self.chars.next()? != '[' {
            return None;
        }

        let mut items = Vec::new();
        loop {
            self.skip_ws();
            match self.chars.peek()? {
                ']' => {
                    self.chars.next();
                    break;
                }
                '\'' | '"' => items.push(self.parse_string()?),
                _ => return None,
            }

            self.skip_ws();
            match self.chars.next()? {
                ',' => continue,
                ']' => break,
                _ => return None,
            }
        }

        self.skip_ws();
        if self.chars.next().is_some() {
            return None;
        }
        Some(items)
    }

    fn parse_string(&mut self) -> Option<String> {
        let quote = self.chars.next()?;
        let mut out = String::new();
        loop {
            match self.chars.next()? {
                '\\' => match self.chars.next()? {
                    'n' => out.push('\n'),
                    't' => out.push('\t'),
                    'r' => out.push('\r'),
                    other => out.push(other),
                },
                ch if ch == quote => return Some(out),
                ch => out.push(ch),
            }
        }
    }

    fn skip_ws(&mut self) {
        while self.chars.peek().is_some_and(|c| c.is_whitespace()) {
            self.chars.next();
        }
    }
}
