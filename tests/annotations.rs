use leijen::*;

#[derive(Debug, PartialEq, Eq, Clone)]
enum Event {
    Text(String),
    NewLine,
    WhiteSpace(usize),
    Push(u32),
    Pop,
}

#[derive(Default)]
struct Recorder {
    events: Vec<Event>,
}

impl Render for Recorder {
    type Error = std::fmt::Error;

    fn text(&mut self, s: &str) -> Result<(), Self::Error> {
        self.events.push(Event::Text(s.to_string()));
        Ok(())
    }

    fn new_line(&mut self) -> Result<(), Self::Error> {
        self.events.push(Event::NewLine);
        Ok(())
    }

    fn white_space(&mut self, count: usize) -> Result<(), Self::Error> {
        self.events.push(Event::WhiteSpace(count));
        Ok(())
    }

    fn interrupted(&self) -> Self::Error {
        std::fmt::Error
    }
}

impl RenderAnnotated<u32> for Recorder {
    fn push_annotation(&mut self, annotation: &u32) -> Result<(), Self::Error> {
        self.events.push(Event::Push(*annotation));
        Ok(())
    }

    fn pop_annotation(&mut self) -> Result<(), Self::Error> {
        self.events.push(Event::Pop);
        Ok(())
    }
}

fn record(doc: &BoxDoc<'_, u32>, options: &LayoutOptions) -> Vec<Event> {
    let mut recorder = Recorder::default();
    doc.render_opts(options, &mut recorder).unwrap();
    recorder.events
}

#[test]
fn annotations_wrap_content_in_events() {
    let doc: BoxDoc<u32> = BoxDoc::text("abc").annotate(2);

    assert_eq!(
        record(&doc, &LayoutOptions::default()),
        vec![
            Event::Push(2),
            Event::Text("abc".to_string()),
            Event::Pop
        ]
    );
}

#[test]
fn map_annotations_rewrites_the_tree() {
    let doc: BoxDoc<u32> = BoxDoc::text("abc").annotate(2);
    let mapped: BoxDoc<u32> = doc.map_annotations(|x| [x + 1]);

    assert_eq!(
        record(&mapped, &LayoutOptions::default()),
        vec![
            Event::Push(3),
            Event::Text("abc".to_string()),
            Event::Pop
        ]
    );
}

#[test]
fn map_annotations_can_drop_annotations() {
    let doc: BoxDoc<u32> = BoxDoc::text("abc").annotate(2);
    let mapped: BoxDoc<u32> = doc.map_annotations(|_| Vec::new());

    assert_eq!(
        record(&mapped, &LayoutOptions::default()),
        vec![Event::Text("abc".to_string())]
    );
}

// The first annotation the selector yields ends up innermost.
#[test]
fn map_annotations_can_expand_annotations() {
    let doc: BoxDoc<u32> = BoxDoc::text("abc").annotate(2);
    let mapped: BoxDoc<u32> = doc.map_annotations(|x| [*x, x + 10]);

    assert_eq!(
        record(&mapped, &LayoutOptions::default()),
        vec![
            Event::Push(12),
            Event::Push(2),
            Event::Text("abc".to_string()),
            Event::Pop,
            Event::Pop
        ]
    );
}

#[test]
fn map_annotations_at_the_renderer() {
    let doc: BoxDoc<u32> = BoxDoc::text("abc").annotate(2);
    let mut out = MapAnnotations::new(Recorder::default(), |a: &u32| a + 1);
    doc.render_opts(&LayoutOptions::default(), &mut out).unwrap();

    assert_eq!(
        out.into_inner().events,
        vec![
            Event::Push(3),
            Event::Text("abc".to_string()),
            Event::Pop
        ]
    );
}

// An annotation opened inside a discarded union branch is rolled back
// with the rest of the branch.
#[test]
fn annotations_stay_balanced_across_backtracking() {
    let doc: BoxDoc<u32> = BoxDoc::text("aaaa")
        .annotate(1)
        .union(BoxDoc::text("bb").annotate(2));

    assert_eq!(
        record(&doc, &LayoutOptions::with_width(3)),
        vec![
            Event::Push(2),
            Event::Text("bb".to_string()),
            Event::Pop
        ]
    );
}

#[test]
fn nested_annotations_nest_their_events() {
    let doc: BoxDoc<u32> = BoxDoc::text("a")
        .annotate(1)
        .append(BoxDoc::line())
        .append(BoxDoc::text("b"))
        .annotate(2)
        .group();

    assert_eq!(
        record(&doc, &LayoutOptions::default()),
        vec![
            Event::Push(2),
            Event::Push(1),
            Event::Text("a".to_string()),
            Event::Pop,
            Event::Text(" ".to_string()),
            Event::Text("b".to_string()),
            Event::Pop
        ]
    );
}

#[test]
fn simple_mode_forwards_annotations() {
    let doc: BoxDoc<u32> = BoxDoc::text("a").annotate(7);
    let simple = LayoutOptions::default().layout_mode(LayoutMode::Simple);

    assert_eq!(
        record(&doc, &simple),
        vec![Event::Push(7), Event::Text("a".to_string()), Event::Pop]
    );
}
