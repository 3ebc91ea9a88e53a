//! Skipping JSX elements in `.tsx` and `.jsx` sources.
//!
//! An element is consumed as one opaque span. Attribute values, children and
//! `{ ... }` expression containers are matched just well enough to find where
//! the outermost element closes. All JSX syntax is ASCII, so the walk is done
//! over bytes.

/// Whether the `<` at `pos` opens an element rather than the type parameters
/// of a generic arrow function (`<T,>(x: T) => x`, `<T extends U>(...)`).
pub(crate) fn starts_element(bytes: &[u8], pos: usize) -> bool {
    let mut i = pos + 1;
    match bytes.get(i) {
        Some(b'>') => return true,
        Some(&b) if is_name_start(b) => {}
        _ => return false,
    }
    while bytes.get(i).is_some_and(|&b| is_name_part(b)) {
        i += 1;
    }
    while bytes.get(i).is_some_and(|b| b.is_ascii_whitespace()) {
        i += 1;
    }
    match bytes.get(i) {
        Some(b',') => false,
        _ => {
            let generic = bytes[i..].starts_with(b"extends")
                && bytes.get(i + 7).is_some_and(|b| b.is_ascii_whitespace());
            !generic
        }
    }
}

/// Byte offset just past the element whose `<` is at `pos`, or `None` when
/// the source ends before the element closes.
pub(crate) fn element_end(bytes: &[u8], pos: usize) -> Option<usize> {
    let mut skipper = Skipper { bytes, pos };
    skipper.element()?;
    Some(skipper.pos)
}

fn is_name_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b == b'$' || b >= 0x80
}

fn is_name_part(b: u8) -> bool {
    is_name_start(b) || b.is_ascii_digit() || matches!(b, b'.' | b'-' | b':')
}

struct Skipper<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl Skipper<'_> {
    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn peek_next(&self) -> Option<u8> {
        self.bytes.get(self.pos + 1).copied()
    }

    /// `<tag attrs>children</tag>`, `<tag attrs />` or `<>children</>`.
    fn element(&mut self) -> Option<()> {
        self.pos += 1;
        loop {
            match self.peek()? {
                b'/' if self.peek_next() == Some(b'>') => {
                    self.pos += 2;
                    return Some(());
                }
                b'>' => {
                    self.pos += 1;
                    return self.children();
                }
                b'{' => self.container()?,
                b'"' | b'\'' => self.quoted()?,
                _ => self.pos += 1,
            }
        }
    }

    /// Children up to and including the closing tag.
    fn children(&mut self) -> Option<()> {
        loop {
            match self.peek()? {
                b'<' if self.peek_next() == Some(b'/') => {
                    while self.peek()? != b'>' {
                        self.pos += 1;
                    }
                    self.pos += 1;
                    return Some(());
                }
                b'<' => self.element()?,
                b'{' => self.container()?,
                _ => self.pos += 1,
            }
        }
    }

    /// `{ expression }`, including nested braces, strings, templates,
    /// comments and elements.
    fn container(&mut self) -> Option<()> {
        let mut depth = 0usize;
        // End of the last significant token, to tell `<` comparisons apart
        // from nested elements.
        let mut last = self.pos;
        loop {
            let start = self.pos;
            match self.peek()? {
                b'{' => {
                    depth += 1;
                    self.pos += 1;
                }
                b'}' => {
                    self.pos += 1;
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return Some(());
                    }
                }
                b'"' | b'\'' => self.quoted()?,
                b'`' => self.template()?,
                b'/' if self.peek_next() == Some(b'/') => {
                    while self.peek().is_some_and(|b| b != b'\n') {
                        self.pos += 1;
                    }
                    continue;
                }
                b'/' if self.peek_next() == Some(b'*') => {
                    self.pos += 2;
                    while !(self.peek()? == b'*' && self.peek_next() == Some(b'/')) {
                        self.pos += 1;
                    }
                    self.pos += 2;
                    continue;
                }
                b'<' if self.operand_expected(last) && starts_element(self.bytes, self.pos) => {
                    self.element()?;
                }
                b if b.is_ascii_whitespace() => {
                    self.pos += 1;
                    continue;
                }
                _ => self.pos += 1,
            }
            last = start + 1;
            if self.pos > last {
                last = self.pos;
            }
        }
    }

    /// The token ending at `last` leaves an expression operand to follow.
    fn operand_expected(&self, last: usize) -> bool {
        let prev = match last.checked_sub(1).and_then(|i| self.bytes.get(i)) {
            Some(&b) => b,
            None => return true,
        };
        match prev {
            b'(' | b'{' | b'[' | b',' | b'=' | b':' | b'?' | b'&' | b'|' | b'!' | b'>' => true,
            _ => self.bytes[..last].ends_with(b"return"),
        }
    }

    fn quoted(&mut self) -> Option<()> {
        let quote = self.peek()?;
        self.pos += 1;
        loop {
            match self.peek()? {
                b'\\' => self.pos += 2,
                b if b == quote => {
                    self.pos += 1;
                    return Some(());
                }
                _ => self.pos += 1,
            }
        }
    }

    fn template(&mut self) -> Option<()> {
        self.pos += 1;
        loop {
            match self.peek()? {
                b'\\' => self.pos += 2,
                b'`' => {
                    self.pos += 1;
                    return Some(());
                }
                b'$' if self.peek_next() == Some(b'{') => {
                    self.pos += 1;
                    self.container()?;
                }
                _ => self.pos += 1,
            }
        }
    }
}
