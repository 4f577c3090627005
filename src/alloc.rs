use std::{borrow::Cow, fmt, rc::Rc};

use crate::{
    doc::DocNode, text::Text, Block, BuildDoc, Doc, DocBuilder, DocPtr, Pretty, RefDoc,
};

/// The `DocAllocator` trait abstracts over a type which can allocate (pointers to) `Doc`.
pub trait DocAllocator<'a, A: 'a = ()> {
    type Doc: DocPtr<'a, A>;

    fn alloc(&'a self, doc: Doc<'a, Self::Doc, A>) -> Self::Doc;

    fn alloc_cow(&'a self, doc: BuildDoc<'a, Self::Doc, A>) -> Self::Doc {
        match doc {
            BuildDoc::DocPtr(d) => d,
            BuildDoc::Doc(d) => self.alloc(d),
        }
    }

    /// Allocate an empty document.
    #[inline]
    fn nil(&'a self) -> DocBuilder<'a, Self, A> {
        DocBuilder(self, Doc::nil_doc().into())
    }

    /// Allocate a single hardline: a mandatory line break that defeats
    /// any enclosing flatten.
    #[inline]
    fn hardline(&'a self) -> DocBuilder<'a, Self, A> {
        DocBuilder(self, Doc::new(DocNode::HardLine).into())
    }

    #[inline]
    fn space(&'a self) -> DocBuilder<'a, Self, A> {
        self.text_unchecked(" ")
    }

    /// Allocate `amount` spaces of horizontal white space.
    ///
    /// Unlike spaces inside a text run, these are elided when nothing
    /// follows them on their line and trailing white space stripping is
    /// enabled.
    #[inline]
    fn spaces(&'a self, amount: usize) -> DocBuilder<'a, Self, A> {
        if amount == 0 {
            self.nil()
        } else {
            DocBuilder(self, Doc::new(DocNode::Spaces(amount)).into())
        }
    }

    /// A line acts like a `\n` but behaves like `space` if it is flattened onto a single line.
    #[inline]
    fn line(&'a self) -> DocBuilder<'a, Self, A> {
        self.hardline().flat_alt(self.space())
    }

    /// Acts like `line` but behaves like `nil` if flattened onto a single line
    ///
    /// ```
    /// use leijen::{Doc, RcDoc};
    ///
    /// let doc = RcDoc::<()>::group(
    ///     RcDoc::text("(")
    ///         .append(
    ///             RcDoc::line_()
    ///                 .append(Doc::text("test"))
    ///                 .append(Doc::line())
    ///                 .append(Doc::text("test"))
    ///                 .nest(2),
    ///         )
    ///         .append(Doc::line_())
    ///         .append(Doc::text(")")),
    /// );
    /// assert_eq!(doc.pretty(5).to_string(), "(\n  test\n  test\n)");
    /// assert_eq!(doc.pretty(100).to_string(), "(test test)");
    /// ```
    #[inline]
    fn line_(&'a self) -> DocBuilder<'a, Self, A> {
        self.hardline().flat_alt(self.nil())
    }

    /// A `softline` acts like `space` if the document fits the page, otherwise like `line`
    #[inline]
    fn softline(&'a self) -> DocBuilder<'a, Self, A>
    where
        Self::Doc: Clone,
    {
        self.line().group()
    }

    /// A `softline_` acts like `nil` if the document fits the page, otherwise like `line_`
    #[inline]
    fn softline_(&'a self) -> DocBuilder<'a, Self, A>
    where
        Self::Doc: Clone,
    {
        self.line_().group()
    }

    /// Acts like `space`, but backtracks into a line break when the
    /// current line later overflows.
    ///
    /// Where `softline` decides up front whether the rest of its group
    /// fits, a hint stays revisable until the line is committed.
    #[inline]
    fn line_hint(&'a self) -> DocBuilder<'a, Self, A> {
        self.space().union(self.hardline())
    }

    /// Acts like `nil`, but backtracks into a line break when the current
    /// line later overflows.
    #[inline]
    fn line_hint_(&'a self) -> DocBuilder<'a, Self, A> {
        self.nil().union(self.hardline())
    }

    /// Allocate a document containing the text `t.to_string()`.
    ///
    /// The given text must not contain line breaks.
    #[inline]
    fn as_string<U: fmt::Display>(&'a self, data: U) -> DocBuilder<'a, Self, A> {
        let text: Text<'a> = data.into();
        if text.as_str().is_empty() {
            return self.nil();
        }
        DocBuilder(self, Doc::new(DocNode::Text(text)).into())
    }

    /// Allocate a document containing the given text.
    ///
    /// Line breaks in the text are interpreted as [`line`](Self::line)s,
    /// so they flatten inside groups. Use
    /// [`text_unchecked`](Self::text_unchecked) to skip the scan when the
    /// text is known to be free of line breaks.
    #[inline]
    fn text<U: Into<Cow<'a, str>>>(&'a self, data: U) -> DocBuilder<'a, Self, A> {
        let data: Cow<'a, str> = data.into();
        if !data.contains('\n') {
            return self.text_unchecked(data);
        }
        match data {
            Cow::Borrowed(s) => {
                let mut parts = s.split('\n');
                let mut result = self.text_unchecked(parts.next().unwrap_or(""));
                for part in parts {
                    result = result.append(self.line()).append(self.text_unchecked(part));
                }
                result
            }
            Cow::Owned(s) => {
                let mut parts = s.split('\n');
                let mut result = self.text_unchecked(parts.next().unwrap_or("").to_owned());
                for part in parts {
                    result = result
                        .append(self.line())
                        .append(self.text_unchecked(part.to_owned()));
                }
                result
            }
        }
    }

    /// Allocate a document containing the given text.
    ///
    /// The given text must not contain line breaks.
    #[inline]
    fn text_unchecked<U: Into<Cow<'a, str>>>(&'a self, data: U) -> DocBuilder<'a, Self, A> {
        let data: Cow<_> = data.into();
        if data.is_empty() {
            return self.nil();
        }
        let text = match data {
            Cow::Owned(t) => Text::owned(t),
            Cow::Borrowed(t) => Text::borrowed(t),
        };
        DocBuilder(self, Doc::new(DocNode::Text(text)).into())
    }

    /// Allocate a document embedding a two-dimensional block of text.
    ///
    /// The layout engine treats the block as an aligned unit: it reads
    /// only the block's width and height, and emits its rows verbatim at
    /// the column where the block starts.
    #[inline]
    fn embed(&'a self, block: impl Block + 'a) -> DocBuilder<'a, Self, A> {
        DocBuilder(self, Doc::new(DocNode::Block(Rc::new(block))).into())
    }

    /// Allocate a document concatenating the given documents.
    #[inline]
    fn concat<I>(&'a self, docs: I) -> DocBuilder<'a, Self, A>
    where
        I: IntoIterator,
        I::Item: Pretty<'a, Self, A>,
    {
        docs.into_iter().fold(self.nil(), |a, b| a.append(b))
    }

    /// Allocate a document that intersperses the given separator `S` between the given documents
    /// `[A, B, C, ..., Z]`, yielding `[A, S, B, S, C, S, ..., S, Z]`.
    ///
    /// NOTE: The separator type, `S` may need to be cloned. Consider using cheaply cloneable ptr
    /// like `RefDoc` or `RcDoc`
    #[inline]
    fn intersperse<I, S>(&'a self, docs: I, separator: S) -> DocBuilder<'a, Self, A>
    where
        I: IntoIterator,
        I::Item: Pretty<'a, Self, A>,
        S: Pretty<'a, Self, A> + Clone,
    {
        let mut result = self.nil();
        let mut iter = docs.into_iter();

        if let Some(first) = iter.next() {
            result = result.append(first);

            for doc in iter {
                result = result.append(separator.clone());
                result = result.append(doc);
            }
        }

        result
    }

    /// Like [`intersperse`](Self::intersperse), but also appends the
    /// separator after the final document.
    #[inline]
    fn terminated<I, S>(&'a self, docs: I, separator: S) -> DocBuilder<'a, Self, A>
    where
        I: IntoIterator,
        I::Item: Pretty<'a, Self, A>,
        S: Pretty<'a, Self, A> + Clone,
    {
        docs.into_iter().fold(self.nil(), |result, doc| {
            result.append(doc).append(separator.clone())
        })
    }

    /// Reflows `text`, splitting on white space and inserting a
    /// [`line_hint`](Self::line_hint) between the words: each line is
    /// filled greedily and the hint before an overflowing word turns
    /// into a line break.
    #[inline]
    fn reflow(&'a self, text: &'a str) -> DocBuilder<'a, Self, A>
    where
        Self: Sized,
        Self::Doc: Clone,
        A: Clone,
    {
        self.intersperse(
            text.split_whitespace().map(|word| self.text_unchecked(word)),
            self.line_hint(),
        )
    }
}

pub struct BoxAllocator;

pub struct RcAllocator;

/// An arena which can be used to allocate `Doc` values.
pub struct Arena<'a, A = ()> {
    docs: typed_arena::Arena<Doc<'a, RefDoc<'a, A>, A>>,
}

impl<A> Default for Arena<'_, A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> Arena<'_, A> {
    pub fn new() -> Self {
        Self {
            docs: typed_arena::Arena::new(),
        }
    }
}

impl<'a, D, A: 'a> DocAllocator<'a, A> for &'a D
where
    D: ?Sized + DocAllocator<'a, A>,
{
    type Doc = D::Doc;

    #[inline]
    fn alloc(&'a self, doc: Doc<'a, Self::Doc, A>) -> Self::Doc {
        (**self).alloc(doc)
    }
}

impl<'a, A> DocAllocator<'a, A> for Arena<'a, A> {
    type Doc = RefDoc<'a, A>;

    #[inline]
    fn alloc(&'a self, doc: Doc<'a, Self::Doc, A>) -> Self::Doc {
        RefDoc(self.docs.alloc(doc))
    }
}
