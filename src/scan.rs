// scan.rs - Delimiter scanning shared by the URI and address parsers

/// A delimiter that splits the parts of a URI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Delimiter {
    At,
    Colon,
    Semicolon,
}

impl Delimiter {
    fn from_byte(b: u8) -> Option<Self> {
        match b {
            b'@' => Some(Delimiter::At),
            b':' => Some(Delimiter::Colon),
            b';' => Some(Delimiter::Semicolon),
            _ => None,
        }
    }
}

/// First position of each URI delimiter, collected in one forward pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Delimiters {
    pub at: Option<usize>,
    pub colon: Option<usize>,
    pub semicolon: Option<usize>,
}

impl Delimiters {
    pub fn scan(input: &str) -> Self {
        let mut found = Delimiters::default();
        for (pos, b) in input.bytes().enumerate() {
            let slot = match Delimiter::from_byte(b) {
                Some(Delimiter::At) => &mut found.at,
                Some(Delimiter::Colon) => &mut found.colon,
                Some(Delimiter::Semicolon) => &mut found.semicolon,
                None => continue,
            };
            if slot.is_none() {
                *slot = Some(pos);
            }
        }
        found
    }

    pub fn is_empty(&self) -> bool {
        self.at.is_none() && self.colon.is_none() && self.semicolon.is_none()
    }

    /// No port and no parameter delimiter.
    pub fn is_bare_host(&self) -> bool {
        self.colon.is_none() && self.semicolon.is_none()
    }
}

/// Position and kind of the first delimiter out of `wanted`.
pub(crate) fn next_delimiter(input: &str, wanted: &[Delimiter]) -> Option<(usize, Delimiter)> {
    input.bytes().enumerate().find_map(|(pos, b)| {
        Delimiter::from_byte(b)
            .filter(|d| wanted.contains(d))
            .map(|d| (pos, d))
    })
}

/// Trims spaces, tabs and carriage returns from both ends.
pub(crate) fn trim_sip(input: &str) -> &str {
    input.trim_matches(|c: char| c == ' ' || c == '\t' || c == '\r')
}
