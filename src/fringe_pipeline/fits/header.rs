//! FITS header model.
//!
//! Cards keep their file order so that a header read from one file can be
//! written to another with only the structural keywords replaced. Reading and
//! writing cards is left to cfitsio (see `keywords.rs`).

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum HeaderValue {
    Logical(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    /// Free text of a `COMMENT`, `HISTORY` or blank-keyword card.
    Commentary(String),
    /// A value indicator with an empty value field.
    Undefined,
}

impl fmt::Display for HeaderValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeaderValue::Logical(flag) => f.write_str(if *flag { "T" } else { "F" }),
            HeaderValue::Integer(number) => write!(f, "{number}"),
            HeaderValue::Float(number) => write!(f, "{number:?}"),
            HeaderValue::Text(text) => write!(f, "'{}'", text.replace('\'', "''")),
            HeaderValue::Commentary(text) => f.write_str(text),
            HeaderValue::Undefined => Ok(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeaderCard {
    pub keyword: String,
    pub value: HeaderValue,
    pub comment: Option<String>,
}

impl HeaderCard {
    pub fn new(keyword: &str, value: HeaderValue) -> Self {
        let mut keyword = keyword.trim().to_ascii_uppercase();
        keyword.truncate(8);
        Self {
            keyword,
            value,
            comment: None,
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn is_commentary(&self) -> bool {
        matches!(self.value, HeaderValue::Commentary(_))
    }
}

/// Single-line rendering, `KEYWORD = value / comment`, without the 80-column limit.
impl fmt::Display for HeaderCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_commentary() {
            return write!(f, "{:<8}{}", self.keyword, self.value);
        }
        write!(f, "{:<8}= {}", self.keyword, self.value)?;
        if let Some(comment) = &self.comment {
            write!(f, " / {comment}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FitsHeader {
    cards: Vec<HeaderCard>,
}

impl FitsHeader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cards(&self) -> &[HeaderCard] {
        &self.cards
    }

    pub fn iter(&self) -> impl Iterator<Item = &HeaderCard> {
        self.cards.iter()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn push(&mut self, card: HeaderCard) {
        self.cards.push(card);
    }

    pub(crate) fn last_mut(&mut self) -> Option<&mut HeaderCard> {
        self.cards.last_mut()
    }

    fn position(&self, keyword: &str) -> Option<usize> {
        self.cards
            .iter()
            .position(|card| !card.is_commentary() && card.keyword.eq_ignore_ascii_case(keyword))
    }

    /// Value of the first non-commentary card named `keyword`.
    pub fn get(&self, keyword: &str) -> Option<&HeaderValue> {
        self.position(keyword).map(|i| &self.cards[i].value)
    }

    pub fn get_int(&self, keyword: &str) -> Option<i64> {
        match self.get(keyword)? {
            HeaderValue::Integer(number) => Some(*number),
            HeaderValue::Float(number) if number.fract() == 0.0 => Some(*number as i64),
            _ => None,
        }
    }

    pub fn get_float(&self, keyword: &str) -> Option<f64> {
        match self.get(keyword)? {
            HeaderValue::Float(number) => Some(*number),
            HeaderValue::Integer(number) => Some(*number as f64),
            _ => None,
        }
    }

    pub fn get_logical(&self, keyword: &str) -> Option<bool> {
        match self.get(keyword)? {
            HeaderValue::Logical(flag) => Some(*flag),
            _ => None,
        }
    }

    pub fn get_text(&self, keyword: &str) -> Option<&str> {
        match self.get(keyword)? {
            HeaderValue::Text(text) => Some(text.as_str()),
            _ => None,
        }
    }

    /// Replaces the value of an existing card (keeping its position) or appends a new one.
    pub fn set(&mut self, keyword: &str, value: HeaderValue, comment: Option<&str>) {
        match self.position(keyword) {
            Some(i) => {
                let card = &mut self.cards[i];
                card.value = value;
                if let Some(comment) = comment {
                    card.comment = Some(comment.to_string());
                }
            }
            None => {
                let mut card = HeaderCard::new(keyword, value);
                card.comment = comment.map(str::to_string);
                self.cards.push(card);
            }
        }
    }

    pub fn set_logical(&mut self, keyword: &str, value: bool, comment: Option<&str>) {
        self.set(keyword, HeaderValue::Logical(value), comment);
    }

    pub fn remove(&mut self, keyword: &str) -> Option<HeaderCard> {
        self.position(keyword).map(|i| self.cards.remove(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_display() {
        let card = HeaderCard::new("frngcorr", HeaderValue::Logical(true)).with_comment("fringe removed");
        assert_eq!(card.to_string(), "FRNGCORR= T / fringe removed");

        let card = HeaderCard::new("OBSERVER", HeaderValue::Text("it's me".to_string()));
        assert_eq!(card.to_string(), "OBSERVER= 'it''s me'");

        let card = HeaderCard::new("EXPTIME", HeaderValue::Float(300.0));
        assert_eq!(card.to_string(), "EXPTIME = 300.0");

        let card = HeaderCard::new("HISTORY", HeaderValue::Commentary("bias subtracted".to_string()));
        assert_eq!(card.to_string(), "HISTORY bias subtracted");
    }

    #[test]
    fn test_keyword_normalised() {
        let card = HeaderCard::new(" exposure_time ", HeaderValue::Undefined);
        assert_eq!(card.keyword, "EXPOSURE");
        assert_eq!(card.to_string(), "EXPOSURE= ");
    }

    #[test]
    fn test_header_set_get_remove() {
        let mut header = FitsHeader::new();
        header.set("EXPTIME", HeaderValue::Integer(30), Some("seconds"));
        header.set_logical("FRNGCORR", false, None);
        header.set_logical("frngcorr", true, None);
        assert_eq!(header.len(), 2);
        assert_eq!(header.get_logical("FRNGCORR"), Some(true));
        assert_eq!(header.get_float("EXPTIME"), Some(30.0));
        assert_eq!(header.get_int("EXPTIME"), Some(30));
        assert_eq!(header.get_text("EXPTIME"), None);
        assert_eq!(header.cards()[0].comment.as_deref(), Some("seconds"));
        assert!(header.remove("EXPTIME").is_some());
        assert_eq!(header.get("EXPTIME"), None);
    }

    #[test]
    fn test_commentary_cards_are_not_looked_up() {
        let mut header = FitsHeader::new();
        header.push(HeaderCard::new("COMMENT", HeaderValue::Commentary("OBJECT".to_string())));
        header.set("COMMENT", HeaderValue::Text("value card".to_string()), None);
        assert_eq!(header.len(), 2);
        assert_eq!(header.get_text("COMMENT"), Some("value card"));
    }
}
