use std::{
    fmt,
    ops::{Add, AddAssign, Deref},
};

use crate::{doc::DocNode, BuildDoc, Doc, DocAllocator, Pretty};

/// The `DocBuilder` type allows for convenient appending of documents even for arena allocated
/// documents by storing the arena inline.
pub struct DocBuilder<'a, D, A = ()>(pub &'a D, pub BuildDoc<'a, D::Doc, A>)
where
    D: ?Sized + DocAllocator<'a, A>;

impl<'a, D, A> DocBuilder<'a, D, A>
where
    A: 'a,
    D: ?Sized + DocAllocator<'a, A>,
{
    /// Append the given document after this document.
    #[inline]
    pub fn append<E>(self, that: E) -> DocBuilder<'a, D, A>
    where
        E: Pretty<'a, D, A>,
    {
        let DocBuilder(allocator, _) = self;
        let that = that.pretty(allocator);
        match (&self.1.node, &that.1.node) {
            (DocNode::Nil, _) => that,
            (_, DocNode::Nil) => self,
            _ => DocBuilder(
                allocator,
                Doc::new(DocNode::Append(
                    allocator.alloc_cow(self.into()),
                    allocator.alloc_cow(that.into()),
                ))
                .into(),
            ),
        }
    }

    /// Acts as `self` when laid out normally and acts as `that` when flattened onto a single line.
    ///
    /// ```
    /// use leijen::{Arena, DocAllocator};
    ///
    /// let arena = Arena::<()>::new();
    /// let body = arena.line().append("x");
    /// let doc = arena.text("let")
    ///     .append(arena.line())
    ///     .append("x")
    ///     .group()
    ///     .append(
    ///         body.clone()
    ///             .flat_alt(
    ///                 arena.line()
    ///                     .append("in")
    ///                     .append(body)
    ///             )
    ///     )
    ///     .group();
    ///
    /// assert_eq!(doc.pretty(100).to_string(), "let x in x");
    /// assert_eq!(doc.pretty(8).to_string(), "let x\nx");
    /// ```
    #[inline]
    pub fn flat_alt<E>(self, that: E) -> DocBuilder<'a, D, A>
    where
        E: Pretty<'a, D, A>,
    {
        let DocBuilder(allocator, this) = self;
        let that = that.pretty(allocator);
        DocBuilder(
            allocator,
            Doc::new(DocNode::FlatAlt(
                allocator.alloc_cow(this),
                allocator.alloc_cow(that.into()),
            ))
            .into(),
        )
    }

    /// Mark this document as a group.
    ///
    /// Groups are layed out on a single line if possible.  Within a group, all basic documents with
    /// several possible layouts are assigned the same layout, that is, they are all layed out
    /// horizontally and combined into a one single line, or they are each layed out on their own
    /// line.
    ///
    /// A group is a [`union`](Self::union) of the flattened document and
    /// the document itself, so the subtree is shared between the two
    /// branches.
    ///
    /// NOTE: The doc pointer type, `D` may need to be cloned. Consider using cheaply cloneable ptr
    /// like `RefDoc` or `RcDoc`
    #[inline]
    pub fn group(self) -> DocBuilder<'a, D, A>
    where
        D::Doc: Clone,
    {
        let grouped = match &self.1.node {
            DocNode::Text(_) | DocNode::Spaces(_) | DocNode::Nil => true,
            DocNode::Union(first, _) => matches!(first.node, DocNode::Flatten(_)),
            _ => false,
        };
        if grouped {
            return self;
        }
        let DocBuilder(allocator, this) = self;
        let ptr = allocator.alloc_cow(this);
        let flat = allocator.alloc(Doc::new(DocNode::Flatten(ptr.clone())));
        DocBuilder(allocator, Doc::new(DocNode::Union(flat, ptr)).into())
    }

    /// Renders this document with every flattenable line break replaced
    /// by its flat alternative.
    ///
    /// A hard line inside has no flat alternative; unless an enclosing
    /// [`union`](Self::union) provides a fallback layout, rendering such
    /// a document fails. [`group`](Self::group) never flattens an
    /// unflattenable document and is the safe way to request a flat
    /// layout.
    #[inline]
    pub fn flatten(self) -> DocBuilder<'a, D, A> {
        if let DocNode::Nil | DocNode::Text(_) | DocNode::Spaces(_) | DocNode::Flatten(_) =
            &self.1.node
        {
            return self;
        }
        let DocBuilder(allocator, this) = self;
        DocBuilder(
            allocator,
            Doc::new(DocNode::Flatten(allocator.alloc_cow(this))).into(),
        )
    }

    /// Increase the indentation level of this document.
    #[inline]
    pub fn nest(self, amount: usize) -> DocBuilder<'a, D, A> {
        if let DocNode::Nil = &self.1.node {
            return self;
        }
        if amount == 0 {
            return self;
        }
        let DocBuilder(allocator, this) = self;
        DocBuilder(
            allocator,
            Doc::new(DocNode::Nest(Some(amount), allocator.alloc_cow(this))).into(),
        )
    }

    /// Increase the indentation level of this document by the layout
    /// options' default nesting.
    #[inline]
    pub fn nest_default(self) -> DocBuilder<'a, D, A> {
        if let DocNode::Nil = &self.1.node {
            return self;
        }
        let DocBuilder(allocator, this) = self;
        DocBuilder(
            allocator,
            Doc::new(DocNode::Nest(None, allocator.alloc_cow(this))).into(),
        )
    }

    /// Wraps this document in push/pop annotation events carrying `ann`.
    #[inline]
    pub fn annotate(self, ann: A) -> DocBuilder<'a, D, A> {
        let DocBuilder(allocator, this) = self;
        DocBuilder(
            allocator,
            Doc::new(DocNode::Annotated(ann, allocator.alloc_cow(this))).into(),
        )
    }

    /// Lays out `self`, falling back to `other` when `self` overflows the
    /// current line.
    ///
    /// The engine keeps the choice revisable until the line is committed:
    /// anything that overflows the line before the next line break
    /// backtracks to the most recent open union.
    #[inline]
    pub fn union<E>(self, other: E) -> DocBuilder<'a, D, A>
    where
        E: Into<BuildDoc<'a, D::Doc, A>>,
    {
        let DocBuilder(allocator, this) = self;
        let other = other.into();
        let doc = Doc::new(DocNode::Union(
            allocator.alloc_cow(this),
            allocator.alloc_cow(other),
        ));
        DocBuilder(allocator, doc.into())
    }

    /// Lays out `self` with the nesting level set to the current column
    ///
    /// ```rust
    /// use leijen::{docs, DocAllocator};
    ///
    /// let arena = &leijen::Arena::<()>::new();
    /// let doc = docs![
    ///     arena,
    ///     "lorem",
    ///     " ",
    ///     arena.intersperse(["ipsum", "dolor"].iter().cloned(), arena.line_()).align(),
    ///     arena.hardline(),
    ///     "next",
    /// ];
    /// assert_eq!(doc.pretty(80).to_string(), "lorem ipsum\n      dolor\nnext");
    /// ```
    #[inline]
    pub fn align(self) -> DocBuilder<'a, D, A> {
        let DocBuilder(allocator, this) = self;
        DocBuilder(
            allocator,
            Doc::new(DocNode::Align(allocator.alloc_cow(this))).into(),
        )
    }

    /// Lays out `self` with a nesting level set to the current column plus `adjust`.
    ///
    /// ```rust
    /// use leijen::DocAllocator;
    ///
    /// let arena = leijen::Arena::<()>::new();
    /// let doc = arena.text("prefix").append(arena.text(" "))
    ///     .append(arena.reflow("Indenting these words with nest").hang(4));
    /// assert_eq!(
    ///     doc.pretty(24).to_string(),
    ///     "prefix Indenting these\n           words with\n           nest",
    /// );
    /// ```
    #[inline]
    pub fn hang(self, adjust: usize) -> DocBuilder<'a, D, A> {
        self.nest(adjust).align()
    }

    /// Indents `self` by `adjust` spaces from the current cursor position
    ///
    /// ```rust
    /// use leijen::DocAllocator;
    ///
    /// let arena = leijen::Arena::<()>::new();
    /// let doc = arena.text("prefix").append(arena.text(" "))
    ///     .append(arena.reflow("The indent function indents these words!").indent(4));
    /// assert_eq!(
    ///     doc.pretty(24).to_string(),
    /// "
    /// prefix     The indent
    ///            function
    ///            indents these
    ///            words!".trim_start(),
    /// );
    /// ```
    #[inline]
    pub fn indent(self, adjust: usize) -> DocBuilder<'a, D, A> {
        let allocator = self.0;
        allocator.spaces(adjust).append(self.align())
    }

    /// Puts `self` between `before` and `after`
    #[inline]
    pub fn enclose<E, F>(self, before: E, after: F) -> DocBuilder<'a, D, A>
    where
        E: Pretty<'a, D, A>,
        F: Pretty<'a, D, A>,
    {
        let DocBuilder(allocator, _) = self;
        DocBuilder(allocator, before.pretty(allocator).1)
            .append(self)
            .append(after)
    }

    pub fn single_quotes(self) -> DocBuilder<'a, D, A> {
        self.enclose("'", "'")
    }

    pub fn double_quotes(self) -> DocBuilder<'a, D, A> {
        self.enclose("\"", "\"")
    }

    pub fn parens(self) -> DocBuilder<'a, D, A> {
        self.enclose("(", ")")
    }

    pub fn angles(self) -> DocBuilder<'a, D, A> {
        self.enclose("<", ">")
    }

    pub fn braces(self) -> DocBuilder<'a, D, A> {
        self.enclose("{", "}")
    }

    pub fn brackets(self) -> DocBuilder<'a, D, A> {
        self.enclose("[", "]")
    }

    pub fn into_doc(self) -> D::Doc {
        match self.1 {
            BuildDoc::DocPtr(d) => d,
            BuildDoc::Doc(d) => self.0.alloc(d),
        }
    }

    pub(crate) fn into_plain_doc(self) -> Doc<'a, D::Doc, A> {
        match self.1 {
            BuildDoc::DocPtr(_) => unreachable!(),
            BuildDoc::Doc(d) => d,
        }
    }
}

impl<'a, D, A: 'a, P> Add<P> for DocBuilder<'a, D, A>
where
    D: ?Sized + DocAllocator<'a, A>,
    P: Pretty<'a, D, A>,
{
    type Output = DocBuilder<'a, D, A>;
    fn add(self, other: P) -> Self::Output {
        self.append(other)
    }
}

impl<'a, D, A: 'a, P> AddAssign<P> for DocBuilder<'a, D, A>
where
    D: ?Sized + DocAllocator<'a, A>,
    P: Pretty<'a, D, A>,
{
    fn add_assign(&mut self, other: P) {
        *self = DocBuilder(self.0, std::mem::take(&mut self.1)).append(other)
    }
}

impl<'a, D, A> Deref for DocBuilder<'a, D, A>
where
    D: ?Sized + DocAllocator<'a, A>,
{
    type Target = Doc<'a, D::Doc, A>;
    fn deref(&self) -> &Self::Target {
        match &self.1 {
            BuildDoc::DocPtr(d) => d,
            BuildDoc::Doc(d) => d,
        }
    }
}

impl<'a, D, A> fmt::Debug for DocBuilder<'a, D, A>
where
    D: ?Sized + DocAllocator<'a, A>,
    D::Doc: fmt::Debug,
    A: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.1.fmt(f)
    }
}

impl<'a, A, D> Clone for DocBuilder<'a, D, A>
where
    A: Clone,
    D: DocAllocator<'a, A> + 'a,
    D::Doc: Clone,
{
    fn clone(&self) -> Self {
        DocBuilder(self.0, self.1.clone())
    }
}

impl<'a, D, A> From<DocBuilder<'a, D, A>> for BuildDoc<'a, D::Doc, A>
where
    D: ?Sized + DocAllocator<'a, A>,
{
    fn from(val: DocBuilder<'a, D, A>) -> Self {
        val.1
    }
}
