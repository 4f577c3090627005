use std::io;

use leijen::*;

struct Counting {
    calls: usize,
    cancel_after: usize,
    cancel: Cancel,
}

impl Counting {
    fn new(cancel: Cancel, cancel_after: usize) -> Self {
        Counting {
            calls: 0,
            cancel_after,
            cancel,
        }
    }

    fn tick(&mut self) {
        self.calls += 1;
        if self.calls == self.cancel_after {
            self.cancel.cancel();
        }
    }
}

impl Render for Counting {
    type Error = io::Error;

    fn text(&mut self, _: &str) -> io::Result<()> {
        self.tick();
        Ok(())
    }

    fn new_line(&mut self) -> io::Result<()> {
        self.tick();
        Ok(())
    }

    fn white_space(&mut self, _: usize) -> io::Result<()> {
        self.tick();
        Ok(())
    }

    fn interrupted(&self) -> io::Error {
        io::ErrorKind::Interrupted.into()
    }
}

impl<A> RenderAnnotated<A> for Counting {
    fn push_annotation(&mut self, _: &A) -> io::Result<()> {
        self.tick();
        Ok(())
    }

    fn pop_annotation(&mut self) -> io::Result<()> {
        self.tick();
        Ok(())
    }
}

fn lines() -> BoxDoc<'static> {
    BoxDoc::intersperse((0..100).map(BoxDoc::as_string), BoxDoc::hardline())
}

#[test]
fn canceled_before_start_renders_nothing() {
    let cancel = Cancel::new();
    cancel.cancel();
    let mut out = Counting::new(cancel.clone(), usize::MAX);

    let err = lines()
        .render_cancelable(&LayoutOptions::default(), &cancel, &mut out)
        .unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::Interrupted);
    assert_eq!(out.calls, 0);
}

// The engine polls before every renderer operation, so no further call
// is observed once the handle is canceled.
#[test]
fn cancellation_stops_before_the_next_renderer_call() {
    let cancel = Cancel::new();
    let mut out = Counting::new(cancel.clone(), 5);

    let err = lines()
        .render_cancelable(&LayoutOptions::default(), &cancel, &mut out)
        .unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::Interrupted);
    assert_eq!(out.calls, 5);
}

#[test]
fn cancellation_applies_in_simple_mode() {
    let cancel = Cancel::new();
    let mut out = Counting::new(cancel.clone(), 3);
    let simple = LayoutOptions::default().layout_mode(LayoutMode::Simple);

    let err = lines()
        .render_cancelable(&simple, &cancel, &mut out)
        .unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::Interrupted);
    assert_eq!(out.calls, 3);
}

#[test]
fn rendering_without_a_handle_completes() {
    let mut out = Counting::new(Cancel::new(), usize::MAX);
    lines()
        .render_opts(&LayoutOptions::default(), &mut out)
        .unwrap();
    assert!(out.calls > 0);
}
