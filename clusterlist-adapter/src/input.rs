use alloc::string::String;

/// Why the navigation input could not be turned into a row index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("no row index entered")]
    Empty,
    #[error("input does not start with a number")]
    NotANumber,
}

/// The "jump to row" text field.
///
/// Parsing is lenient: leading whitespace and an optional sign are accepted, and anything after
/// the leading digits is ignored (`"42px"` reads as 42). Values beyond `i64` saturate.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NavigationInput {
    text: String,
}

impl NavigationInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }

    pub fn parse(&self) -> Result<i64, InputError> {
        parse_leading_int(&self.text)
    }

    /// The jump button was clicked. `None` when the text is not a number.
    pub fn click(&self) -> Option<i64> {
        self.parse().ok()
    }

    /// A key was pressed in the field; only `"Enter"` submits.
    pub fn key(&self, key: &str) -> Option<i64> {
        if key == "Enter" { self.click() } else { None }
    }
}

fn parse_leading_int(text: &str) -> Result<i64, InputError> {
    let text = text.trim_start();
    if text.is_empty() {
        return Err(InputError::Empty);
    }

    let (negative, rest) = match text.as_bytes()[0] {
        b'-' => (true, &text[1..]),
        b'+' => (false, &text[1..]),
        _ => (false, text),
    };
    let digits = rest.bytes().take_while(u8::is_ascii_digit);

    let mut value: i64 = 0;
    let mut any = false;
    for d in digits {
        any = true;
        let d = i64::from(d - b'0');
        value = if negative {
            value.saturating_mul(10).saturating_sub(d)
        } else {
            value.saturating_mul(10).saturating_add(d)
        };
    }
    if any { Ok(value) } else { Err(InputError::NotANumber) }
}
