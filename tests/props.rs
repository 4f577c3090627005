use leijen::*;
use proptest::prelude::*;

type TestDoc = BoxDoc<'static>;

fn render(doc: &TestDoc, width: usize, strip: bool) -> String {
    let options = LayoutOptions {
        page_width: Some(PageWidth::new(width)),
        strip_trailing_whitespace: strip,
        ..LayoutOptions::default()
    };
    let mut out = String::new();
    doc.render_opts(&options, &mut FmtWrite::new(&mut out))
        .unwrap();
    out
}

fn arb_doc() -> impl Strategy<Value = TestDoc> {
    let leaf = prop_oneof![
        Just(TestDoc::nil()),
        Just(TestDoc::hardline()),
        Just(TestDoc::line()),
        Just(TestDoc::line_()),
        Just(TestDoc::line_hint()),
        Just(TestDoc::line_hint_()),
        (1usize..4).prop_map(|n| TestDoc::spaces(n)),
        "[a-z]{0,6}".prop_map(|s| TestDoc::text(s)),
    ];
    leaf.prop_recursive(4, 32, 3, |inner| {
        prop_oneof![
            (inner.clone(), inner.clone()).prop_map(|(a, b)| a.append(b)),
            (inner.clone(), inner.clone()).prop_map(|(a, b)| a.union(b)),
            (inner.clone(), inner.clone()).prop_map(|(a, b)| a.flat_alt(b)),
            (0usize..6, inner.clone()).prop_map(|(n, d)| d.nest(n)),
            inner.clone().prop_map(|d| d.align()),
            inner.clone().prop_map(|d| d.group()),
        ]
    })
}

proptest! {
    #[test]
    fn append_identity(doc in arb_doc(), width in 10usize..150, strip in any::<bool>()) {
        let base = render(&doc, width, strip);
        prop_assert_eq!(
            render(&TestDoc::nil().append(doc.clone()), width, strip),
            base.clone()
        );
        prop_assert_eq!(render(&doc.append(TestDoc::nil()), width, strip), base);
    }

    #[test]
    fn append_associativity(
        a in arb_doc(),
        b in arb_doc(),
        c in arb_doc(),
        width in 10usize..150,
        strip in any::<bool>(),
    ) {
        prop_assert_eq!(
            render(&a.clone().append(b.clone()).append(c.clone()), width, strip),
            render(&a.append(b.append(c)), width, strip)
        );
    }

    #[test]
    fn nesting_additivity(
        doc in arb_doc(),
        n in 0usize..5,
        m in 0usize..5,
        width in 10usize..150,
    ) {
        prop_assert_eq!(
            render(&doc.clone().nest(m).nest(n), width, true),
            render(&doc.nest(n + m), width, true)
        );
    }

    #[test]
    fn nesting_distributes_over_append(
        a in arb_doc(),
        b in arb_doc(),
        n in 0usize..5,
        width in 10usize..150,
    ) {
        prop_assert_eq!(
            render(&a.clone().append(b.clone()).nest(n), width, true),
            render(&a.nest(n).append(b.nest(n)), width, true)
        );
    }

    #[test]
    fn nesting_distributes_over_union(
        a in arb_doc(),
        b in arb_doc(),
        n in 0usize..5,
        width in 10usize..150,
    ) {
        prop_assert_eq!(
            render(&a.clone().union(b.clone()).nest(n), width, true),
            render(&a.nest(n).union(b.nest(n)), width, true)
        );
    }

    #[test]
    fn nest_zero_is_identity(doc in arb_doc(), width in 10usize..150) {
        prop_assert_eq!(
            render(&doc.clone().nest(0), width, true),
            render(&doc, width, true)
        );
    }

    #[test]
    fn align_is_idempotent(doc in arb_doc(), width in 10usize..150) {
        prop_assert_eq!(
            render(&doc.clone().align().align(), width, true),
            render(&doc.align(), width, true)
        );
    }

    #[test]
    fn group_is_idempotent(doc in arb_doc(), width in 10usize..150) {
        prop_assert_eq!(
            render(&doc.clone().group().group(), width, true),
            render(&doc.group(), width, true)
        );
    }

    #[test]
    fn string_roundtrip(s in "[ -~]{0,40}", width in 10usize..150, strip in any::<bool>()) {
        let doc = TestDoc::text(s.clone());
        prop_assert_eq!(render(&doc, width, strip), s);
    }

    #[test]
    fn text_conversion_respects_concat(
        s1 in "[a-zA-Z0-9]{0,20}",
        s2 in "[a-zA-Z0-9]{0,20}",
        width in 10usize..150,
    ) {
        let joined = TestDoc::text(format!("{s1}{s2}"));
        let split = TestDoc::text(s1).append(TestDoc::text(s2));
        prop_assert_eq!(render(&joined, width, true), render(&split, width, true));
    }

    // Annotation push and pop events stay balanced whatever layout the
    // engine settles on.
    #[test]
    fn annotations_balance(doc in arb_doc(), width in 10usize..150) {
        #[derive(Default)]
        struct Balance {
            depth: isize,
            min_depth: isize,
            seen: usize,
        }
        impl Render for Balance {
            type Error = std::fmt::Error;
            fn text(&mut self, _: &str) -> Result<(), Self::Error> {
                Ok(())
            }
            fn new_line(&mut self) -> Result<(), Self::Error> {
                Ok(())
            }
            fn white_space(&mut self, _: usize) -> Result<(), Self::Error> {
                Ok(())
            }
            fn interrupted(&self) -> Self::Error {
                std::fmt::Error
            }
        }
        impl RenderAnnotated<()> for Balance {
            fn push_annotation(&mut self, _: &()) -> Result<(), Self::Error> {
                self.depth += 1;
                self.seen += 1;
                Ok(())
            }
            fn pop_annotation(&mut self) -> Result<(), Self::Error> {
                self.depth -= 1;
                self.min_depth = self.min_depth.min(self.depth);
                Ok(())
            }
        }

        let mut out = Balance::default();
        doc.clone().annotate(()).render_opts(&LayoutOptions::with_width(width), &mut out).unwrap();
        prop_assert_eq!(out.depth, 0);
        prop_assert!(out.min_depth >= 0, "pop without matching push");
        prop_assert!(out.seen >= 1);
    }
}
