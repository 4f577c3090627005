mod layout;
mod simple;
mod write;

use std::{
    fmt, io,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

use crate::{Doc, DocAllocator, DocBuilder, DocPtr};

pub use write::{FmtWrite, IoWrite, MapAnnotations, RenderAnnotated};

#[cfg(feature = "termcolor")]
pub use write::TermColored;

/// Trait representing the operations necessary to render a document.
///
/// The layout engine drives a renderer with exactly five operations: text
/// runs, line breaks, horizontal white space, and balanced
/// push/pop-annotation events (see [`RenderAnnotated`]).
pub trait Render {
    type Error;

    /// Emit a contiguous run of text containing no line breaks.
    fn text(&mut self, s: &str) -> Result<(), Self::Error>;

    /// Emit a line terminator.
    fn new_line(&mut self) -> Result<(), Self::Error>;

    /// Emit `count` spaces. The engine guarantees `count > 0`.
    fn white_space(&mut self, count: usize) -> Result<(), Self::Error>;

    /// The error reported when rendering is interrupted through a
    /// [`Cancel`] handle.
    fn interrupted(&self) -> Self::Error;
}

/// A cloneable cancellation handle.
///
/// The layout engine polls the handle before every step and before every
/// renderer operation; once canceled, rendering stops promptly with the
/// renderer's [`interrupted`](Render::interrupted) error. Output emitted
/// before the cancellation stays emitted.
#[derive(Clone, Debug, Default)]
pub struct Cancel(Arc<AtomicBool>);

impl Cancel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation. Safe to call from another thread.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_canceled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// The width budget of a page.
#[derive(Clone, Copy, Debug)]
pub struct PageWidth {
    /// Maximum characters per line, indentation included.
    pub width: usize,
    /// The fraction of the width available to non-indentation characters.
    pub ribbon_ratio: f64,
}

impl PageWidth {
    pub fn new(width: usize) -> Self {
        PageWidth {
            width,
            ribbon_ratio: 1.0,
        }
    }

    /// A page width with a ribbon: at most `width * ribbon_ratio`
    /// non-indentation characters fit on a line.
    ///
    /// # Panics
    ///
    /// Panics unless `0.0 < ribbon_ratio <= 1.0`.
    pub fn with_ribbon_ratio(width: usize, ribbon_ratio: f64) -> Self {
        assert!(
            ribbon_ratio > 0.0 && ribbon_ratio <= 1.0,
            "ribbon ratio must be within (0, 1], got {ribbon_ratio}"
        );
        PageWidth {
            width,
            ribbon_ratio,
        }
    }

    pub(crate) fn ribbon_width(&self) -> usize {
        (self.width as f64 * self.ribbon_ratio) as usize
    }
}

impl Default for PageWidth {
    fn default() -> Self {
        PageWidth::new(80)
    }
}

/// How the engine resolves layout choices.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LayoutMode {
    /// One-line-lookahead backtracking: at every choice the first branch
    /// wins unless it overflows the current line.
    #[default]
    Default,
    /// No choice resolution at all: alternatives pick their default
    /// branch, choices their fallback, indentation is ignored. Meant for
    /// machine-readable output.
    Simple,
    /// Like `Default`, but the lookahead extends across aligned blocks:
    /// the flush is deferred until the aligned region is left, so a line
    /// break hint before the block stays revisable. Buffering inside an
    /// aligned block is unbounded.
    Smart,
}

/// Options controlling the layout engine.
#[derive(Clone, Copy, Debug)]
pub struct LayoutOptions {
    /// The width budget, or `None` for an unbounded page.
    pub page_width: Option<PageWidth>,
    pub layout_mode: LayoutMode,
    /// Indentation used by `nest_default`.
    pub default_nesting: usize,
    /// When set, white space with no text after it on its line is not
    /// emitted. Spaces inside text runs are not affected.
    pub strip_trailing_whitespace: bool,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        LayoutOptions {
            page_width: Some(PageWidth::default()),
            layout_mode: LayoutMode::Default,
            default_nesting: 4,
            strip_trailing_whitespace: true,
        }
    }
}

impl LayoutOptions {
    /// Default options with the given page width.
    pub fn with_width(width: usize) -> Self {
        LayoutOptions {
            page_width: Some(PageWidth::new(width)),
            ..Default::default()
        }
    }

    /// Default options with no width budget: every choice picks its
    /// first branch.
    pub fn unbounded() -> Self {
        LayoutOptions {
            page_width: None,
            ..Default::default()
        }
    }

    pub fn layout_mode(mut self, layout_mode: LayoutMode) -> Self {
        self.layout_mode = layout_mode;
        self
    }
}

/// Returned by [`Doc::pretty`]; renders the document when displayed.
pub struct PrettyFmt<'a, 'd, T, A>
where
    T: DocPtr<'a, A> + 'a,
{
    doc: &'d Doc<'a, T, A>,
    options: LayoutOptions,
}

impl<'a, T, A> fmt::Display for PrettyFmt<'a, '_, T, A>
where
    T: DocPtr<'a, A>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.doc
            .render_opts(&self.options, &mut FmtWrite::new(f))
    }
}

impl<'a, T, A> Doc<'a, T, A>
where
    T: DocPtr<'a, A> + 'a,
{
    /// Writes a rendered document to a `std::io::Write` object.
    #[inline]
    pub fn render<W>(&self, width: usize, out: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.render_raw(width, &mut IoWrite::new(out))
    }

    /// Writes a rendered document to a `std::fmt::Write` object.
    #[inline]
    pub fn render_fmt<W>(&self, width: usize, out: &mut W) -> fmt::Result
    where
        W: ?Sized + fmt::Write,
    {
        self.render_raw(width, &mut FmtWrite::new(out))
    }

    /// Writes a rendered document to a `RenderAnnotated<A>` object.
    #[inline]
    pub fn render_raw<W>(&self, width: usize, out: &mut W) -> Result<(), W::Error>
    where
        W: ?Sized + RenderAnnotated<A>,
    {
        self.render_opts(&LayoutOptions::with_width(width), out)
    }

    /// Renders with explicit [`LayoutOptions`].
    pub fn render_opts<W>(&self, options: &LayoutOptions, out: &mut W) -> Result<(), W::Error>
    where
        W: ?Sized + RenderAnnotated<A>,
    {
        match options.layout_mode {
            LayoutMode::Simple => simple::render_simple(self, None, out),
            _ => layout::render_best(self, options, None, out),
        }
    }

    /// Like [`render_opts`](Self::render_opts), polling `cancel` between
    /// steps. On cancellation the renderer's
    /// [`interrupted`](Render::interrupted) error is returned; output
    /// already emitted stays emitted.
    pub fn render_cancelable<W>(
        &self,
        options: &LayoutOptions,
        cancel: &Cancel,
        out: &mut W,
    ) -> Result<(), W::Error>
    where
        W: ?Sized + RenderAnnotated<A>,
    {
        match options.layout_mode {
            LayoutMode::Simple => simple::render_simple(self, Some(cancel), out),
            _ => layout::render_best(self, options, Some(cancel), out),
        }
    }

    /// Returns a value which implements `std::fmt::Display`
    ///
    /// ```
    /// use leijen::{Doc, BoxDoc};
    /// let doc = BoxDoc::<()>::group(
    ///     BoxDoc::text("hello").append(Doc::line()).append(Doc::text("world"))
    /// );
    /// assert_eq!(format!("{}", doc.pretty(80)), "hello world");
    /// ```
    #[inline]
    pub fn pretty<'d>(&'d self, width: usize) -> PrettyFmt<'a, 'd, T, A> {
        PrettyFmt {
            doc: self,
            options: LayoutOptions::with_width(width),
        }
    }

    /// Like [`pretty`](Self::pretty) with explicit options.
    #[inline]
    pub fn pretty_opts<'d>(&'d self, options: LayoutOptions) -> PrettyFmt<'a, 'd, T, A> {
        PrettyFmt { doc: self, options }
    }
}

impl<'a, D, A> DocBuilder<'a, D, A>
where
    D: ?Sized + DocAllocator<'a, A>,
    D::Doc: 'a,
{
    /// Returns a value which implements `std::fmt::Display`
    #[inline]
    pub fn pretty<'d>(&'d self, width: usize) -> PrettyFmt<'a, 'd, D::Doc, A> {
        (**self).pretty(width)
    }

    /// Like [`pretty`](Self::pretty) with explicit options.
    #[inline]
    pub fn pretty_opts<'d>(&'d self, options: LayoutOptions) -> PrettyFmt<'a, 'd, D::Doc, A> {
        (**self).pretty_opts(options)
    }
}
