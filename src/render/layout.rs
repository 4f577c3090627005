use crate::{
    doc::DocNode,
    render::{Cancel, LayoutMode, LayoutOptions},
    text::Text,
    Block, Doc, DocPtr,
};

use super::write::RenderAnnotated;

/// Renders `doc` in the default or smart layout mode.
pub(super) fn render_best<'a, T, A, W>(
    doc: &Doc<'a, T, A>,
    options: &LayoutOptions,
    cancel: Option<&Cancel>,
    out: &mut W,
) -> Result<(), W::Error>
where
    T: DocPtr<'a, A> + 'a,
    W: ?Sized + RenderAnnotated<A>,
{
    let nil = Doc::nil_doc();
    Best {
        width: options
            .page_width
            .map(|page| (page.width, page.ribbon_width())),
        default_nesting: options.default_nesting,
        strip_ws: options.strip_trailing_whitespace,
        smart: options.layout_mode == LayoutMode::Smart,
        flatten: false,
        nesting: 0,
        indent: 0,
        line_len: 0,
        buffer: Vec::new(),
        stack: vec![Step::Doc(doc)],
        can_backtrack: false,
        align_bound: None,
        cancel,
        nil: &nil,
    }
    .run(out)
}

/// One buffered render instruction of the current line.
enum Instr<'d, 'a, A> {
    Text(&'d Text<'a>),
    Spaces(usize),
    NewLine,
    Push(&'d A),
    Pop,
}

/// A snapshot that lets the engine revert to the state it had when the
/// first branch of a union was entered.
struct ChoicePoint<'d, 'a, T, A>
where
    T: DocPtr<'a, A>,
{
    fallback: &'d Doc<'a, T, A>,
    nesting: usize,
    buffer_len: usize,
    line_len: usize,
    flatten: bool,
    can_backtrack: bool,
    align_bound: Option<usize>,
    /// Stack slot holding the next pending continuation item, `-1` once
    /// the whole document has been consumed.
    resume_at: isize,
}

impl<'a, T, A> Copy for ChoicePoint<'_, 'a, T, A> where T: DocPtr<'a, A> {}
impl<'a, T, A> Clone for ChoicePoint<'_, 'a, T, A>
where
    T: DocPtr<'a, A>,
{
    fn clone(&self) -> Self {
        *self
    }
}

/// A work item of the layout stack.
enum Step<'d, 'a, T, A>
where
    T: DocPtr<'a, A>,
{
    Doc(&'d Doc<'a, T, A>),
    SetNesting(usize),
    PopAnnotation,
    EndFlatten,
    Choice(ChoicePoint<'d, 'a, T, A>),
}

impl<'a, T, A> Copy for Step<'_, 'a, T, A> where T: DocPtr<'a, A> {}
impl<'a, T, A> Clone for Step<'_, 'a, T, A>
where
    T: DocPtr<'a, A>,
{
    fn clone(&self) -> Self {
        *self
    }
}

struct Best<'d, 'a, T, A>
where
    T: DocPtr<'a, A> + 'a,
{
    /// Page width and ribbon width, `None` for an unbounded page.
    width: Option<(usize, usize)>,
    default_nesting: usize,
    strip_ws: bool,
    smart: bool,

    flatten: bool,
    nesting: usize,
    /// Spaces already accounted to indentation at the start of the
    /// current line.
    indent: usize,
    /// Printable characters buffered on the current line beyond the
    /// indentation.
    line_len: usize,
    buffer: Vec<Instr<'d, 'a, A>>,
    stack: Vec<Step<'d, 'a, T, A>>,
    /// True iff the stack holds at least one live choice point.
    can_backtrack: bool,
    /// Smart mode: the column at which the current aligned block started;
    /// while set, line breaks do not flush the buffer.
    align_bound: Option<usize>,

    cancel: Option<&'d Cancel>,
    /// Replacement for stack slots whose item has been consumed.
    nil: &'d Doc<'a, T, A>,
}

impl<'d, 'a, T, A> Best<'d, 'a, T, A>
where
    T: DocPtr<'a, A> + 'a,
{
    fn run<W>(mut self, out: &mut W) -> Result<(), W::Error>
    where
        W: ?Sized + RenderAnnotated<A>,
    {
        loop {
            if self.canceled() {
                return Err(out.interrupted());
            }
            let Some(step) = self.stack.pop() else { break };
            match step {
                Step::Doc(doc) => self.step(doc, out)?,
                Step::SetNesting(n) => self.set_nesting(n),
                Step::PopAnnotation => self.buffer.push(Instr::Pop),
                Step::EndFlatten => self.flatten = false,
                Step::Choice(mut cp) => {
                    if cp.resume_at < 0 {
                        // Every continuation slot has been consumed, so
                        // the whole document has been processed.
                        break;
                    }
                    // The choice survived its first branch; keep it live
                    // for the rest of the line by pumping the next
                    // pending item from underneath it.
                    let next = self.stack[cp.resume_at as usize];
                    cp.resume_at -= 1;
                    self.stack.push(Step::Choice(cp));
                    self.stack.push(next);
                }
            }
        }
        self.flush(out, self.strip_ws)
    }

    fn step<W>(&mut self, mut doc: &'d Doc<'a, T, A>, out: &mut W) -> Result<(), W::Error>
    where
        W: ?Sized + RenderAnnotated<A>,
    {
        // Drill down until we hit a leaf.
        loop {
            match &doc.node {
                DocNode::Nil => return Ok(()),

                DocNode::HardLine => {
                    if self.flatten {
                        self.backtrack();
                        return Ok(());
                    }
                    return self.hard_line(out);
                }

                DocNode::Spaces(amount) => {
                    self.buffer.push(Instr::Spaces(*amount));
                    self.line_len += amount;
                    if self.can_backtrack && !self.fits(0) {
                        self.backtrack();
                    }
                    return Ok(());
                }

                DocNode::Text(text) => {
                    self.buffer.push(Instr::Text(text));
                    self.line_len += doc.width.unwrap();
                    if self.can_backtrack && !self.fits(0) {
                        self.backtrack();
                    }
                    return Ok(());
                }

                DocNode::Block(block) => return self.block(&**block, out),

                DocNode::Append(left, right) => {
                    self.stack.push(Step::Doc(right));
                    doc = left;
                }

                DocNode::FlatAlt(default, flat) => {
                    doc = if self.flatten { &**flat } else { &**default };
                }

                DocNode::Union(first, second) => {
                    if self.flatten {
                        // The enclosing flatten was only entered after its
                        // width check passed, and that width assumed the
                        // first branch; the choice is already made.
                        doc = first;
                    } else if let DocNode::Flatten(_) = first.node {
                        // The group fast path: the cached flat width
                        // answers the fit question without a choice
                        // point.
                        doc = match first.width {
                            Some(flat_width) if self.fits(flat_width) => &**first,
                            _ => &**second,
                        };
                    } else {
                        let resume_at = self.locate_continuation();
                        self.stack.push(Step::Choice(ChoicePoint {
                            fallback: second,
                            nesting: self.nesting,
                            buffer_len: self.buffer.len(),
                            line_len: self.line_len,
                            flatten: self.flatten,
                            can_backtrack: self.can_backtrack,
                            align_bound: self.align_bound,
                            resume_at,
                        }));
                        self.can_backtrack = true;
                        doc = first;
                    }
                }

                DocNode::Flatten(inner) => {
                    if !self.flatten {
                        self.flatten = true;
                        self.stack.push(Step::EndFlatten);
                    }
                    doc = inner;
                }

                DocNode::Nest(amount, inner) => {
                    self.stack.push(Step::SetNesting(self.nesting));
                    self.nesting += amount.unwrap_or(self.default_nesting);
                    doc = inner;
                }

                DocNode::Align(inner) => {
                    let column = self.indent + self.line_len;
                    if self.smart
                        && self.can_backtrack
                        && self.align_bound.is_none()
                        && column > 0
                    {
                        self.align_bound = Some(column);
                    }
                    self.stack.push(Step::SetNesting(self.nesting));
                    self.set_nesting(column);
                    doc = inner;
                }

                DocNode::Annotated(ann, inner) => {
                    self.buffer.push(Instr::Push(ann));
                    self.stack.push(Step::PopAnnotation);
                    doc = inner;
                }
            }
        }
    }

    /// Walks past the contiguous choice-point suffix of the stack,
    /// following each `resume_at` link, so that nested choices share one
    /// continuation slot.
    fn locate_continuation(&self) -> isize {
        let mut at = self.stack.len() as isize - 1;
        while at >= 0 {
            match &self.stack[at as usize] {
                Step::Choice(cp) => at = cp.resume_at,
                _ => break,
            }
        }
        at
    }

    fn hard_line<W>(&mut self, out: &mut W) -> Result<(), W::Error>
    where
        W: ?Sized + RenderAnnotated<A>,
    {
        self.buffer.push(Instr::NewLine);
        if self.align_bound.is_none() {
            self.flush(out, self.strip_ws)?;
        }
        self.line_len = 0;
        if self.nesting > 0 {
            self.buffer.push(Instr::Spaces(self.nesting));
        }
        self.indent = self.nesting;
        Ok(())
    }

    fn set_nesting(&mut self, nesting: usize) {
        if let Some(bound) = self.align_bound {
            if nesting < bound {
                // We are leaving the aligned block the smart lookahead
                // was armed for.
                self.align_bound = None;
            }
        }
        self.nesting = nesting;
    }

    /// Would the current line still fit with `extra` more characters?
    fn fits(&self, extra: usize) -> bool {
        match self.width {
            None => true,
            Some((page, ribbon)) => {
                let line = self.line_len.saturating_add(extra);
                self.indent.saturating_add(line) <= page && line <= ribbon
            }
        }
    }

    /// Reverts to the most recent choice point and schedules its
    /// fallback branch.
    fn backtrack(&mut self) {
        while let Some(step) = self.stack.pop() {
            if let Step::Choice(cp) = step {
                self.nesting = cp.nesting;
                self.buffer.truncate(cp.buffer_len);
                self.line_len = cp.line_len;
                self.flatten = cp.flatten;
                self.can_backtrack = cp.can_backtrack;
                self.align_bound = cp.align_bound;
                self.stack.push(Step::Doc(cp.fallback));
                return;
            }
        }
        unreachable!("layout backtracked without an open choice point; this is a bug, please report it")
    }

    /// Commits the buffered line to the renderer.
    ///
    /// Committing makes every open choice final: the stack slots those
    /// choices have already pumped are dead and must not be replayed, so
    /// they are overwritten along with the choice points themselves.
    fn flush<W>(&mut self, out: &mut W, trim: bool) -> Result<(), W::Error>
    where
        W: ?Sized + RenderAnnotated<A>,
    {
        if self.can_backtrack {
            self.commit_choices();
        }
        for at in 0..self.buffer.len() {
            if self.canceled() {
                return Err(out.interrupted());
            }
            match &self.buffer[at] {
                Instr::Text(text) => out.text(text)?,
                Instr::Spaces(amount) => {
                    if !trim || self.text_follows(at) {
                        out.white_space(*amount)?;
                    }
                }
                Instr::NewLine => out.new_line()?,
                Instr::Push(ann) => out.push_annotation(ann)?,
                Instr::Pop => out.pop_annotation()?,
            }
        }
        self.buffer.clear();
        Ok(())
    }

    fn commit_choices(&mut self) {
        for at in 0..self.stack.len() {
            let consumed_from = match &self.stack[at] {
                Step::Choice(cp) => (cp.resume_at + 1).max(0) as usize,
                _ => continue,
            };
            for slot in &mut self.stack[consumed_from..=at] {
                *slot = Step::Doc(self.nil);
            }
        }
        self.can_backtrack = false;
    }

    /// Is there a text instruction after `at` but before the next line
    /// break?
    fn text_follows(&self, at: usize) -> bool {
        for instr in &self.buffer[at + 1..] {
            match instr {
                Instr::Text(_) => return true,
                Instr::NewLine => return false,
                _ => {}
            }
        }
        false
    }

    fn block<W>(&mut self, block: &dyn Block, out: &mut W) -> Result<(), W::Error>
    where
        W: ?Sized + RenderAnnotated<A>,
    {
        let block_width = block.width();
        let height = block.height();
        if block_width == 0 || height == 0 {
            return Ok(());
        }
        if self.flatten && height > 1 {
            self.backtrack();
            return Ok(());
        }
        if self.can_backtrack && !self.fits(block_width) {
            self.backtrack();
            return Ok(());
        }

        // The block renders as an aligned unit, bypassing the line
        // buffer. Trimming stays off for the flush it forces.
        self.stack.push(Step::SetNesting(self.nesting));
        let column = self.indent + self.line_len;
        self.nesting = column;
        self.flush(out, false)?;

        let mut row = String::new();
        for at in 0..height {
            if self.canceled() {
                return Err(out.interrupted());
            }
            row.clear();
            block.write_row(at, &mut row);
            if !row.is_empty() {
                out.text(&row)?;
            }
            out.new_line()?;
            if column > 0 {
                out.white_space(column)?;
            }
        }
        self.indent = column;
        self.line_len = 0;
        Ok(())
    }

    fn canceled(&self) -> bool {
        self.cancel.is_some_and(|cancel| cancel.is_canceled())
    }
}
