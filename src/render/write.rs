use std::{fmt, io, marker::PhantomData};

#[cfg(feature = "termcolor")]
use termcolor::{ColorSpec, WriteColor};

use crate::render::Render;

/// Cached spaces served in slices by the white-space sinks below.
const SPACES: &str = "                                                                                                                                ";

/// Trait representing the operations necessary to render an annotated
/// document.
///
/// Push and pop events are perfectly balanced across a successful render,
/// so a renderer may maintain its own annotation stack.
pub trait RenderAnnotated<A>: Render {
    fn push_annotation(&mut self, annotation: &A) -> Result<(), Self::Error>;
    fn pop_annotation(&mut self) -> Result<(), Self::Error>;
}

/// Writes to something implementing `std::io::Write`
pub struct IoWrite<W> {
    upstream: W,
}

impl<W> IoWrite<W> {
    pub fn new(upstream: W) -> IoWrite<W> {
        IoWrite { upstream }
    }
}

impl<W> Render for IoWrite<W>
where
    W: io::Write,
{
    type Error = io::Error;

    fn text(&mut self, s: &str) -> io::Result<()> {
        self.upstream.write_all(s.as_bytes())
    }

    fn new_line(&mut self) -> io::Result<()> {
        self.upstream.write_all(b"\n")
    }

    fn white_space(&mut self, mut count: usize) -> io::Result<()> {
        while count > 0 {
            let chunk = SPACES.len().min(count);
            self.upstream.write_all(SPACES[..chunk].as_bytes())?;
            count -= chunk;
        }
        Ok(())
    }

    fn interrupted(&self) -> Self::Error {
        io::ErrorKind::Interrupted.into()
    }
}

impl<A, W> RenderAnnotated<A> for IoWrite<W>
where
    W: io::Write,
{
    fn push_annotation(&mut self, _: &A) -> Result<(), Self::Error> {
        Ok(())
    }

    fn pop_annotation(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Writes to something implementing `std::fmt::Write`
pub struct FmtWrite<W> {
    upstream: W,
}

impl<W> FmtWrite<W> {
    pub fn new(upstream: W) -> FmtWrite<W> {
        FmtWrite { upstream }
    }
}

impl<W> Render for FmtWrite<W>
where
    W: fmt::Write,
{
    type Error = fmt::Error;

    fn text(&mut self, s: &str) -> fmt::Result {
        self.upstream.write_str(s)
    }

    fn new_line(&mut self) -> fmt::Result {
        self.upstream.write_str("\n")
    }

    fn white_space(&mut self, mut count: usize) -> fmt::Result {
        while count > 0 {
            let chunk = SPACES.len().min(count);
            self.upstream.write_str(&SPACES[..chunk])?;
            count -= chunk;
        }
        Ok(())
    }

    fn interrupted(&self) -> Self::Error {
        fmt::Error
    }
}

impl<A, W> RenderAnnotated<A> for FmtWrite<W>
where
    W: fmt::Write,
{
    fn push_annotation(&mut self, _: &A) -> Result<(), Self::Error> {
        Ok(())
    }

    fn pop_annotation(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Wraps another renderer, transforming each annotation on its way
/// through.
///
/// Because the layout engine resolves choices before annotations reach a
/// renderer, mapping here sees every annotation exactly once, which makes
/// it cheaper than rebuilding the document with
/// [`map_annotations`](crate::BoxDoc::map_annotations).
pub struct MapAnnotations<W, F, B> {
    upstream: W,
    map: F,
    _annotation: PhantomData<fn(B)>,
}

impl<W, F, B> MapAnnotations<W, F, B> {
    pub fn new(upstream: W, map: F) -> Self {
        MapAnnotations {
            upstream,
            map,
            _annotation: PhantomData,
        }
    }

    pub fn into_inner(self) -> W {
        self.upstream
    }
}

impl<W, F, B> Render for MapAnnotations<W, F, B>
where
    W: Render,
{
    type Error = W::Error;

    fn text(&mut self, s: &str) -> Result<(), Self::Error> {
        self.upstream.text(s)
    }

    fn new_line(&mut self) -> Result<(), Self::Error> {
        self.upstream.new_line()
    }

    fn white_space(&mut self, count: usize) -> Result<(), Self::Error> {
        self.upstream.white_space(count)
    }

    fn interrupted(&self) -> Self::Error {
        self.upstream.interrupted()
    }
}

impl<A, B, W, F> RenderAnnotated<A> for MapAnnotations<W, F, B>
where
    W: RenderAnnotated<B>,
    F: FnMut(&A) -> B,
{
    fn push_annotation(&mut self, annotation: &A) -> Result<(), Self::Error> {
        let mapped = (self.map)(annotation);
        self.upstream.push_annotation(&mapped)
    }

    fn pop_annotation(&mut self) -> Result<(), Self::Error> {
        self.upstream.pop_annotation()
    }
}

#[cfg(feature = "termcolor")]
pub struct TermColored<W> {
    color_stack: Vec<ColorSpec>,
    upstream: W,
}

#[cfg(feature = "termcolor")]
impl<W> TermColored<W> {
    pub fn new(upstream: W) -> TermColored<W> {
        TermColored {
            color_stack: Vec::new(),
            upstream,
        }
    }
}

#[cfg(feature = "termcolor")]
impl<W> Render for TermColored<W>
where
    W: io::Write,
{
    type Error = io::Error;

    fn text(&mut self, s: &str) -> io::Result<()> {
        self.upstream.write_all(s.as_bytes())
    }

    fn new_line(&mut self) -> io::Result<()> {
        self.upstream.write_all(b"\n")
    }

    fn white_space(&mut self, mut count: usize) -> io::Result<()> {
        while count > 0 {
            let chunk = SPACES.len().min(count);
            self.upstream.write_all(SPACES[..chunk].as_bytes())?;
            count -= chunk;
        }
        Ok(())
    }

    fn interrupted(&self) -> Self::Error {
        io::ErrorKind::Interrupted.into()
    }
}

#[cfg(feature = "termcolor")]
impl<W> RenderAnnotated<ColorSpec> for TermColored<W>
where
    W: WriteColor,
{
    fn push_annotation(&mut self, color: &ColorSpec) -> Result<(), Self::Error> {
        self.color_stack.push(color.clone());
        self.upstream.set_color(color)
    }

    fn pop_annotation(&mut self) -> Result<(), Self::Error> {
        self.color_stack.pop();
        match self.color_stack.last() {
            Some(previous) => self.upstream.set_color(previous),
            None => self.upstream.reset(),
        }
    }
}
