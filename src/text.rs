use std::{fmt, ops::Deref};

type InlineText = arrayvec::ArrayString<22>;

/// A run of text without line breaks, paired with its width in
/// characters.
///
/// Character count is the engine's only width metric, and every layout
/// decision consults it, so it is measured once when the run is built.
#[derive(Clone)]
pub struct Text<'a> {
    width: usize,
    repr: Repr<'a>,
}

#[derive(Clone)]
enum Repr<'a> {
    Borrowed(&'a str),
    Owned(Box<str>),
    Inline(InlineText),
}

impl<'a> Text<'a> {
    pub fn borrowed(s: &'a str) -> Self {
        Self::with_repr(Repr::Borrowed(s))
    }

    pub fn owned(s: String) -> Self {
        Self::with_repr(Repr::Owned(s.into()))
    }

    fn with_repr(repr: Repr<'a>) -> Self {
        let s = match &repr {
            Repr::Borrowed(s) => s,
            Repr::Owned(s) => s,
            Repr::Inline(s) => s,
        };
        let width = if s.is_ascii() {
            s.len()
        } else {
            s.chars().count()
        };
        Text { width, repr }
    }

    pub fn as_str(&self) -> &str {
        match &self.repr {
            Repr::Borrowed(s) => s,
            Repr::Owned(s) => s,
            Repr::Inline(s) => s,
        }
    }

    /// The number of characters in this run.
    pub fn width(&self) -> usize {
        self.width
    }
}

impl fmt::Debug for Text<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.as_str().fmt(f)
    }
}

impl Deref for Text<'_> {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.as_str()
    }
}

impl<T> From<T> for Text<'_>
where
    T: fmt::Display,
{
    fn from(value: T) -> Self {
        use fmt::Write;
        let mut buf = Spill {
            inline: InlineText::new(),
            spilled: None,
        };
        write!(buf, "{value}").unwrap();
        Text::with_repr(match buf.spilled {
            Some(s) => Repr::Owned(s.into()),
            None => Repr::Inline(buf.inline),
        })
    }
}

/// Format buffer that starts inline and moves to the heap when the
/// inline capacity runs out.
struct Spill {
    inline: InlineText,
    spilled: Option<String>,
}

impl fmt::Write for Spill {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        match &mut self.spilled {
            Some(buf) => buf.push_str(s),
            None => {
                if self.inline.try_push_str(s).is_err() {
                    let mut buf = String::with_capacity(self.inline.len() + s.len());
                    buf.push_str(&self.inline);
                    buf.push_str(s);
                    self.spilled = Some(buf);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_conversion_stays_inline_when_short() {
        let text = Text::from(42u32);
        assert_eq!(text.as_str(), "42");
        assert!(matches!(text.repr, Repr::Inline(_)));
    }

    #[test]
    fn display_conversion_spills_to_heap() {
        let text = Text::from("a string well past the inline capacity");
        assert_eq!(text.as_str(), "a string well past the inline capacity");
        assert!(matches!(text.repr, Repr::Owned(_)));
    }

    #[test]
    fn width_is_character_count() {
        assert_eq!(Text::borrowed("hello").width(), 5);
        assert_eq!(Text::borrowed("ÅÄÖ").width(), 3);
        assert_eq!(Text::owned("你好".to_string()).width(), 2);
    }
}
