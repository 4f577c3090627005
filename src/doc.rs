use std::{borrow::Cow, fmt, ops::Deref, rc::Rc};

use crate::{
    text::Text, visitor::visit_sequence_deep, BoxAllocator, DocAllocator, DocBuilder, Pretty,
    RcAllocator,
};

pub trait DocPtr<'a, A>: Deref<Target = Doc<'a, Self, A>> + Sized {}

pub trait StaticDoc<'a, A: 'a>: DocPtr<'a, A> {
    type Allocator: DocAllocator<'a, A, Doc = Self> + 'static;
    const ALLOCATOR: &'static Self::Allocator;
}

/// A rectangular block of text embedded in a document.
///
/// The layout engine reads only the dimensions; rows are emitted verbatim,
/// each followed by a line break at the block's left column. Rows must not
/// contain line breaks of their own.
pub trait Block {
    fn width(&self) -> usize;
    fn height(&self) -> usize;
    /// Writes the `row`-th row (zero-based, `row < height`) into `out`.
    fn write_row(&self, row: usize, out: &mut String);
}

/// The concrete document type: a single node of the layout tree paired
/// with its cached flat width. This type is not meant to be used directly.
/// Instead use the static functions on `Doc` or the methods on a
/// `DocAllocator`.
///
/// The `T` parameter abstracts over pointers to `Doc` (see `RefDoc` and
/// `BoxDoc`); `A` is the annotation type carried by `Annotated` nodes.
#[derive(Clone)]
pub struct Doc<'a, T, A = ()>
where
    T: DocPtr<'a, A>,
{
    pub(crate) width: Option<usize>,
    pub(crate) node: DocNode<'a, T, A>,
}

#[derive(Clone)]
pub(crate) enum DocNode<'a, T, A>
where
    T: DocPtr<'a, A>,
{
    // Leaves
    Nil,
    HardLine,
    Spaces(usize),
    Text(Text<'a>),
    Block(Rc<dyn Block + 'a>),

    // Structural
    Append(T, T),

    // Indentation and alignment
    Nest(Option<usize>, T), // None nests by the layout options' default
    Align(T),

    // Choices
    FlatAlt(T, T), // picked by the flatten flag; the branches may differ in meaning
    Union(T, T),   // try the first branch, fall back to the second on overflow
    Flatten(T),

    // Annotations
    Annotated(A, T),
}

impl<'a, T, A> Doc<'a, T, A>
where
    T: DocPtr<'a, A>,
{
    /// Wraps a node, computing its flat width from its children.
    ///
    /// The flat width is the total printable width assuming every
    /// flattenable line break flattens; `None` marks a subtree that
    /// contains a hard line and therefore cannot be flattened.
    pub(crate) fn new(node: DocNode<'a, T, A>) -> Self {
        let width = match &node {
            DocNode::Nil => Some(0),
            DocNode::HardLine => None,
            DocNode::Spaces(n) => Some(*n),
            DocNode::Text(t) => Some(t.width()),
            DocNode::Block(b) => match b.height() {
                0 => Some(0),
                1 => Some(b.width()),
                _ => None,
            },
            DocNode::Append(l, r) => match (l.width, r.width) {
                (Some(l), Some(r)) => Some(l.saturating_add(r)),
                _ => None,
            },
            DocNode::FlatAlt(_, flat) => flat.width,
            DocNode::Union(first, _) => first.width,
            DocNode::Flatten(inner)
            | DocNode::Nest(_, inner)
            | DocNode::Align(inner)
            | DocNode::Annotated(_, inner) => inner.width,
        };
        Doc { width, node }
    }

    pub(crate) const fn nil_doc() -> Self {
        Doc {
            width: Some(0),
            node: DocNode::Nil,
        }
    }

    /// The width of this document when flattened, or `None` if it contains
    /// a hard line and cannot be laid out on a single line.
    pub fn flat_width(&self) -> Option<usize> {
        self.width
    }
}

impl<'a, T, A: 'a> Doc<'a, T, A>
where
    T: StaticDoc<'a, A>,
{
    /// The text `data.to_string()`.
    ///
    /// The given text must not contain line breaks.
    #[inline]
    pub fn as_string<U: fmt::Display>(data: U) -> Self {
        T::ALLOCATOR.as_string(data).into_plain_doc()
    }

    /// The given text. Line breaks in it are interpreted as [`line`]s, so
    /// they flatten inside groups.
    ///
    /// [`line`]: DocAllocator::line
    #[inline]
    pub fn text<U: Into<Cow<'a, str>>>(data: U) -> Self {
        T::ALLOCATOR.text(data).into_plain_doc()
    }

    /// The given text, which must not contain line breaks.
    #[inline]
    pub fn text_unchecked<U: Into<Cow<'a, str>>>(data: U) -> Self {
        T::ALLOCATOR.text_unchecked(data).into_plain_doc()
    }

    fn flat_alt<D>(self, doc: D) -> Self
    where
        D: Pretty<'a, T::Allocator, A>,
    {
        DocBuilder(T::ALLOCATOR, self.into())
            .flat_alt(doc)
            .into_plain_doc()
    }
}

impl<'a, T, A> Default for Doc<'a, T, A>
where
    T: DocPtr<'a, A>,
{
    fn default() -> Self {
        Self::nil_doc()
    }
}

impl<'a, T, A: 'a, S> From<S> for Doc<'a, T, A>
where
    T: StaticDoc<'a, A>,
    S: Into<Cow<'a, str>>,
{
    fn from(s: S) -> Doc<'a, T, A> {
        Doc::text(s)
    }
}

impl<'a, T, A> fmt::Debug for Doc<'a, T, A>
where
    T: DocPtr<'a, A> + fmt::Debug,
    A: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let write_compact = |f: &mut fmt::Formatter<'_>, doc: &T, name: &str| {
            if matches!(doc.node, DocNode::Append(_, _)) {
                f.write_str(name)?;
                f.write_str("(")?;
                doc.fmt(f)?;
                f.write_str(")")
            } else {
                f.debug_tuple(name).field(doc).finish()
            }
        };

        match &self.node {
            DocNode::Nil => f.write_str("Nil"),
            DocNode::HardLine => f.write_str("HardLine"),
            DocNode::Spaces(n) => f.debug_tuple("Spaces").field(n).finish(),
            DocNode::Text(s) => s.fmt(f),
            DocNode::Block(b) => write!(f, "Block({}x{})", b.width(), b.height()),

            DocNode::Append(..) => {
                let mut f = f.debug_list();
                visit_sequence_deep(self, &mut |doc| {
                    f.entry(doc);
                });
                f.finish()
            }
            DocNode::Nest(Some(n), doc) => {
                write!(f, "Nest({n}, ")?;
                doc.fmt(f)?;
                write!(f, ")")
            }
            DocNode::Nest(None, doc) => write_compact(f, doc, "NestDefault"),
            DocNode::Align(doc) => write_compact(f, doc, "Align"),

            DocNode::FlatAlt(x, y) => match (&x.node, &y.node) {
                (DocNode::HardLine, DocNode::Text(t)) if t.as_str() == " " => f.write_str("Line"),
                (DocNode::HardLine, DocNode::Nil) => f.write_str("Line_"),
                _ => f.debug_tuple("FlatAlt").field(x).field(y).finish(),
            },
            DocNode::Union(x, y) => match (&x.node, &y.node) {
                (DocNode::Text(t), DocNode::HardLine) if t.as_str() == " " => {
                    f.write_str("LineHint")
                }
                (DocNode::Nil, DocNode::HardLine) => f.write_str("LineHint_"),
                (DocNode::Flatten(_), _) => write_compact(f, y, "Group"),
                _ => f.debug_tuple("Union").field(x).field(y).finish(),
            },
            DocNode::Flatten(doc) => write_compact(f, doc, "Flatten"),

            DocNode::Annotated(ann, doc) => {
                f.debug_tuple("Annotated").field(ann).field(doc).finish()
            }
        }
    }
}

macro_rules! impl_doc {
    ($name: ident, $ptr: ident, $allocator: ident) => {
        #[derive(Clone)]
        pub struct $name<'a, A = ()>($ptr<Doc<'a, $name<'a, A>, A>>);

        impl<'a, A> fmt::Debug for $name<'a, A>
        where
            A: fmt::Debug,
        {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl<'a, A> $name<'a, A> {
            pub fn new(doc: Doc<'a, $name<'a, A>, A>) -> $name<'a, A> {
                $name($ptr::new(doc))
            }
        }

        impl<'a, A> From<Doc<'a, Self, A>> for $name<'a, A> {
            fn from(doc: Doc<'a, $name<'a, A>, A>) -> $name<'a, A> {
                $name::new(doc)
            }
        }

        impl<'a, A> Deref for $name<'a, A> {
            type Target = Doc<'a, $name<'a, A>, A>;

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl<'a, A: 'a> DocAllocator<'a, A> for $allocator {
            type Doc = $name<'a, A>;

            #[inline]
            fn alloc(&'a self, doc: Doc<'a, Self::Doc, A>) -> Self::Doc {
                $name::new(doc)
            }
        }

        impl<'a, A> DocPtr<'a, A> for $name<'a, A> {}

        impl<'a, A: 'a> StaticDoc<'a, A> for $name<'a, A> {
            type Allocator = $allocator;
            const ALLOCATOR: &'static Self::Allocator = &$allocator;
        }

        impl_doc_methods!($name ('a, A) where (A: 'a,) where ());

        impl<'a, A: 'a> $name<'a, A> {
            /// The text `data.to_string()`.
            ///
            /// The given text must not contain line breaks.
            #[inline]
            pub fn as_string<U: fmt::Display>(data: U) -> Self {
                $allocator.as_string(data).into_doc()
            }

            /// The given text. Line breaks in it are interpreted as
            /// [`line`](Self::line)s, so they flatten inside groups.
            #[inline]
            pub fn text<U: Into<Cow<'a, str>>>(data: U) -> Self {
                $allocator.text(data).into_doc()
            }

            /// The given text, which must not contain line breaks.
            #[inline]
            pub fn text_unchecked<U: Into<Cow<'a, str>>>(data: U) -> Self {
                $allocator.text_unchecked(data).into_doc()
            }

            /// A line break that acts like `space` when grouped on a
            /// single line.
            #[inline]
            pub fn softline() -> Self
            where
                A: Clone,
            {
                Self::line().group()
            }

            /// A line break that acts like `nil` when grouped on a single
            /// line.
            #[inline]
            pub fn softline_() -> Self
            where
                A: Clone,
            {
                Self::line_().group()
            }

            /// Acts like `space`, but backtracks into a line break when
            /// the current line later overflows.
            #[inline]
            pub fn line_hint() -> Self {
                $allocator.line_hint().into_doc()
            }

            /// Acts like `nil`, but backtracks into a line break when the
            /// current line later overflows.
            #[inline]
            pub fn line_hint_() -> Self {
                $allocator.line_hint_().into_doc()
            }

            /// Embeds a two-dimensional block of text.
            #[inline]
            pub fn embed(block: impl Block + 'a) -> Self {
                $allocator.embed(block).into_doc()
            }

            /// Append the given document after this document.
            #[inline]
            pub fn append<D>(self, that: D) -> Self
            where
                D: Pretty<'a, $allocator, A>,
            {
                DocBuilder(&$allocator, self.into()).append(that).into_doc()
            }

            /// A single document concatenating all the given documents.
            #[inline]
            pub fn concat<I>(docs: I) -> Self
            where
                I: IntoIterator,
                I::Item: Pretty<'a, $allocator, A>,
            {
                $allocator.concat(docs).into_doc()
            }

            /// A single document interspersing the given separator `S` between the given documents.  For
            /// example, if the documents are `[A, B, C, ..., Z]`, this yields `[A, S, B, S, C, S, ..., S, Z]`.
            ///
            /// NOTE: The separator type, `S` may need to be cloned. Consider using cheaply cloneable ptr
            /// like `RefDoc` or `RcDoc`
            #[inline]
            pub fn intersperse<I, S>(docs: I, separator: S) -> Self
            where
                I: IntoIterator,
                I::Item: Pretty<'a, $allocator, A>,
                S: Pretty<'a, $allocator, A> + Clone,
            {
                $allocator.intersperse(docs, separator).into_doc()
            }

            /// Acts as `self` when laid out normally and acts as `that`
            /// when flattened onto a single line.
            #[inline]
            pub fn flat_alt<D>(self, doc: D) -> Self
            where
                D: Pretty<'a, $allocator, A>,
            {
                DocBuilder(&$allocator, self.into())
                    .flat_alt(doc)
                    .into_doc()
            }

            /// Mark this document as a group.
            ///
            /// Groups are layed out on a single line if possible.  Within a group, all basic documents with
            /// several possible layouts are assigned the same layout, that is, they are all layed out
            /// horizontally and combined into a one single line, or they are each layed out on their own
            /// line.
            #[inline]
            pub fn group(self) -> Self
            where
                A: Clone,
            {
                DocBuilder(&$allocator, self.into()).group().into_doc()
            }

            /// Renders this document with every flattenable line break
            /// replaced by its flat alternative.
            #[inline]
            pub fn flatten(self) -> Self {
                DocBuilder(&$allocator, self.into()).flatten().into_doc()
            }

            /// Increase the indentation level of this document.
            #[inline]
            pub fn nest(self, amount: usize) -> Self {
                DocBuilder(&$allocator, self.into()).nest(amount).into_doc()
            }

            /// Increase the indentation level by the layout options'
            /// default nesting.
            #[inline]
            pub fn nest_default(self) -> Self {
                DocBuilder(&$allocator, self.into())
                    .nest_default()
                    .into_doc()
            }

            /// Lays out `self` with the nesting level set to the current
            /// column.
            #[inline]
            pub fn align(self) -> Self {
                DocBuilder(&$allocator, self.into()).align().into_doc()
            }

            /// Lays out `self` with a nesting level set to the current
            /// column plus `adjust`.
            #[inline]
            pub fn hang(self, adjust: usize) -> Self {
                DocBuilder(&$allocator, self.into()).hang(adjust).into_doc()
            }

            /// Indents `self` by `adjust` spaces from the current cursor
            /// position.
            #[inline]
            pub fn indent(self, adjust: usize) -> Self {
                DocBuilder(&$allocator, self.into())
                    .indent(adjust)
                    .into_doc()
            }

            /// Wraps `self` in push/pop events carrying `ann`.
            #[inline]
            pub fn annotate(self, ann: A) -> Self {
                DocBuilder(&$allocator, self.into()).annotate(ann).into_doc()
            }

            /// Lays out `self`, falling back to `other` when `self`
            /// overflows the current line.
            #[inline]
            pub fn union<D>(self, other: D) -> Self
            where
                D: Into<BuildDoc<'a, Self, A>>,
            {
                DocBuilder(&$allocator, self.into()).union(other).into_doc()
            }

            /// Returns a value which implements `std::fmt::Display`
            #[inline]
            pub fn pretty<'d>(&'d self, width: usize) -> crate::PrettyFmt<'a, 'd, Self, A>
            where
                A: 'a,
            {
                (**self).pretty(width)
            }

            /// Like [`pretty`](Self::pretty) with explicit options.
            #[inline]
            pub fn pretty_opts<'d>(
                &'d self,
                options: crate::LayoutOptions,
            ) -> crate::PrettyFmt<'a, 'd, Self, A>
            where
                A: 'a,
            {
                (**self).pretty_opts(options)
            }

            /// Rebuilds the document, replacing each annotation with the
            /// zero or more annotations the selector yields for it
            /// (first yielded is innermost).
            ///
            /// Both branches of a choice are rebuilt, so the selector may
            /// run more than once per original annotation. When the only
            /// goal is transforming annotations on the way out, the
            /// renderer-side [`MapAnnotations`](crate::MapAnnotations)
            /// adapter is cheaper: it sees each annotation once, after
            /// choices are resolved.
            pub fn map_annotations<B: 'a, F, I>(&self, mut selector: F) -> $name<'a, B>
            where
                F: FnMut(&A) -> I,
                I: IntoIterator<Item = B>,
            {
                $name::new(map_ann_doc(self, &mut selector))
            }
        }
    };
}

macro_rules! impl_doc_methods {
    ($name: ident ( $($params: tt)* ) where ( $($where_: tt)* ) where ( $($where_2: tt)* )) => {
        impl< $($params)* > $name< $($params)* >
            where $($where_)*
        {
            /// An empty document.
            #[inline]
            pub fn nil() -> Self {
                Doc::new(DocNode::Nil).into()
            }

            /// A mandatory line break, defeating any enclosing flatten.
            #[inline]
            pub fn hardline() -> Self {
                Doc::new(DocNode::HardLine).into()
            }

            /// A single space of horizontal white space.
            #[inline]
            pub fn space() -> Self {
                Doc::new(DocNode::Text(Text::borrowed(" "))).into()
            }

            /// `amount` spaces of horizontal white space.
            ///
            /// Unlike spaces in a text run, these are elided when nothing
            /// follows them on their line and trailing white space
            /// stripping is enabled.
            #[inline]
            pub fn spaces(amount: usize) -> Self {
                if amount == 0 {
                    Self::nil()
                } else {
                    Doc::new(DocNode::Spaces(amount)).into()
                }
            }
        }

        impl< $($params)* > $name< $($params)* >
            where $($where_2)*
        {
            /// A line acts like a `\n` but behaves like `space` if it is flattened onto a single line.
            #[inline]
            pub fn line() -> Self {
                Self::hardline().flat_alt(Self::space()).into()
            }

            /// Acts like `line` but behaves like `nil` if flattened onto a single line.
            #[inline]
            pub fn line_() -> Self {
                Self::hardline().flat_alt(Self::nil()).into()
            }
        }
    };
}

impl_doc!(BoxDoc, Box, BoxAllocator);
impl_doc!(RcDoc, Rc, RcAllocator);

impl_doc_methods!(Doc ('a, D, A) where (A: 'a, D: DocPtr<'a, A>) where (D: StaticDoc<'a, A>));
impl_doc_methods!(BuildDoc ('a, D, A) where (A: 'a, D: DocPtr<'a, A>) where (D: StaticDoc<'a, A>));

/// Newtype wrapper for `&Doc`
pub struct RefDoc<'a, A = ()>(pub &'a Doc<'a, RefDoc<'a, A>, A>);

impl<'a, A> DocPtr<'a, A> for RefDoc<'a, A> {}

impl<A> Copy for RefDoc<'_, A> {}
impl<A> Clone for RefDoc<'_, A> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<A> fmt::Debug for RefDoc<'_, A>
where
    A: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl<'a, A> Deref for RefDoc<'a, A> {
    type Target = Doc<'a, RefDoc<'a, A>, A>;

    fn deref(&self) -> &Self::Target {
        self.0
    }
}

/// Either a `Doc` or a pointer to a `Doc` (`D`)
#[derive(Clone)]
pub enum BuildDoc<'a, D, A = ()>
where
    D: DocPtr<'a, A>,
{
    DocPtr(D),
    Doc(Doc<'a, D, A>),
}

impl<'a, T, A: 'a> BuildDoc<'a, T, A>
where
    T: StaticDoc<'a, A>,
{
    /// The text `data.to_string()`.
    ///
    /// The given text must not contain line breaks.
    #[inline]
    pub fn as_string<U: fmt::Display>(data: U) -> Self {
        T::ALLOCATOR.as_string(data).1
    }

    /// The given text. Line breaks in it are interpreted as
    /// [`line`](DocAllocator::line)s, so they flatten inside groups.
    #[inline]
    pub fn text<U: Into<Cow<'a, str>>>(data: U) -> Self {
        T::ALLOCATOR.text(data).1
    }

    fn flat_alt<D>(self, doc: D) -> Self
    where
        D: Pretty<'a, T::Allocator, A>,
    {
        DocBuilder(T::ALLOCATOR, self).flat_alt(doc).1
    }
}

impl<'a, D, A> Default for BuildDoc<'a, D, A>
where
    D: DocPtr<'a, A>,
{
    fn default() -> Self {
        Self::Doc(Doc::default())
    }
}

impl<'a, D, A> fmt::Debug for BuildDoc<'a, D, A>
where
    D: DocPtr<'a, A> + fmt::Debug,
    A: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        (**self).fmt(f)
    }
}

impl<'a, D, A> Deref for BuildDoc<'a, D, A>
where
    D: DocPtr<'a, A>,
{
    type Target = Doc<'a, D, A>;
    fn deref(&self) -> &Self::Target {
        match self {
            BuildDoc::DocPtr(d) => d,
            BuildDoc::Doc(d) => d,
        }
    }
}

impl<'a, A> From<RefDoc<'a, A>> for BuildDoc<'a, RefDoc<'a, A>, A> {
    fn from(s: RefDoc<'a, A>) -> Self {
        BuildDoc::DocPtr(s)
    }
}

impl<'a, A> From<BoxDoc<'a, A>> for BuildDoc<'a, BoxDoc<'a, A>, A> {
    fn from(s: BoxDoc<'a, A>) -> Self {
        BuildDoc::DocPtr(s)
    }
}

impl<'a, A> From<RcDoc<'a, A>> for BuildDoc<'a, RcDoc<'a, A>, A> {
    fn from(s: RcDoc<'a, A>) -> Self {
        BuildDoc::DocPtr(s)
    }
}

impl<'a, T, A> From<Doc<'a, T, A>> for BuildDoc<'a, T, A>
where
    T: DocPtr<'a, A>,
{
    fn from(s: Doc<'a, T, A>) -> Self {
        BuildDoc::Doc(s)
    }
}

impl<'a, T, A: 'a> From<String> for BuildDoc<'a, T, A>
where
    T: StaticDoc<'a, A>,
{
    fn from(s: String) -> Self {
        BuildDoc::text(s)
    }
}

impl<'a, T, A: 'a> From<&'a str> for BuildDoc<'a, T, A>
where
    T: StaticDoc<'a, A>,
{
    fn from(s: &'a str) -> Self {
        BuildDoc::text(s)
    }
}

impl<'a, T, A: 'a> From<&'a String> for BuildDoc<'a, T, A>
where
    T: StaticDoc<'a, A>,
{
    fn from(s: &'a String) -> Self {
        BuildDoc::text(s)
    }
}

impl<'a, T, A, S> From<Option<S>> for BuildDoc<'a, T, A>
where
    T: DocPtr<'a, A>,
    S: Into<BuildDoc<'a, T, A>>,
{
    fn from(s: Option<S>) -> Self {
        match s {
            Some(s) => s.into(),
            None => BuildDoc::Doc(Doc::nil_doc()),
        }
    }
}

/// Rebuilds `doc` over the target pointer type, expanding each annotation
/// through `selector`.
fn map_ann_doc<'a, T, A, U, B: 'a, F, I>(doc: &Doc<'a, T, A>, selector: &mut F) -> Doc<'a, U, B>
where
    T: DocPtr<'a, A>,
    U: StaticDoc<'a, B>,
    F: FnMut(&A) -> I,
    I: IntoIterator<Item = B>,
{
    let node = match &doc.node {
        DocNode::Nil => DocNode::Nil,
        DocNode::HardLine => DocNode::HardLine,
        DocNode::Spaces(n) => DocNode::Spaces(*n),
        DocNode::Text(t) => DocNode::Text(t.clone()),
        DocNode::Block(b) => DocNode::Block(b.clone()),
        DocNode::Append(l, r) => DocNode::Append(
            U::ALLOCATOR.alloc(map_ann_doc(l, selector)),
            U::ALLOCATOR.alloc(map_ann_doc(r, selector)),
        ),
        DocNode::FlatAlt(x, y) => DocNode::FlatAlt(
            U::ALLOCATOR.alloc(map_ann_doc(x, selector)),
            U::ALLOCATOR.alloc(map_ann_doc(y, selector)),
        ),
        DocNode::Union(x, y) => DocNode::Union(
            U::ALLOCATOR.alloc(map_ann_doc(x, selector)),
            U::ALLOCATOR.alloc(map_ann_doc(y, selector)),
        ),
        DocNode::Flatten(inner) => DocNode::Flatten(U::ALLOCATOR.alloc(map_ann_doc(inner, selector))),
        DocNode::Nest(n, inner) => DocNode::Nest(*n, U::ALLOCATOR.alloc(map_ann_doc(inner, selector))),
        DocNode::Align(inner) => DocNode::Align(U::ALLOCATOR.alloc(map_ann_doc(inner, selector))),
        DocNode::Annotated(ann, inner) => {
            let mut mapped = map_ann_doc(inner, selector);
            for ann in selector(ann) {
                mapped = Doc::new(DocNode::Annotated(ann, U::ALLOCATOR.alloc(mapped)));
            }
            return mapped;
        }
    };
    Doc::new(node)
}
