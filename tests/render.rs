use std::borrow::Cow;

use leijen::*;


#[test]
fn box_doc_inference() {
    let doc: BoxDoc = BoxDoc::group(
        BoxDoc::text("test")
            .append(BoxDoc::line())
            .append(BoxDoc::text("test")),
    );

    test!(doc, "test test");
}

#[test]
fn line_breaks_in_text_are_lines() {
    let doc: BoxDoc = BoxDoc::group(
        BoxDoc::text("test").append(
            BoxDoc::line()
                .append(BoxDoc::text("\"test\n     test\""))
                .nest(4),
        ),
    );

    test!(5, doc, "test\n    \"test\n         test\"");
    // Wide enough and the whole thing, embedded break included, flattens.
    test!(70, doc, "test \"test      test\"");
}

#[test]
fn forced_newline() {
    let doc: BoxDoc = BoxDoc::group(
        BoxDoc::text("test")
            .append(BoxDoc::hardline())
            .append(BoxDoc::text("test")),
    );

    test!(doc, "test\ntest");
}

#[test]
fn space_do_not_reset_pos() {
    let doc: BoxDoc = BoxDoc::group(BoxDoc::text("test").append(BoxDoc::line()))
        .append(BoxDoc::text("test"))
        .append(BoxDoc::group(BoxDoc::line()).append(BoxDoc::text("test")));

    test!(9, doc, "test test\ntest");
}

// Tests that the `BoxDoc::hardline()` does not cause the rest of document to think that it fits on
// a single line but instead breaks on the `BoxDoc::line()` to fit with 6 columns
#[test]
fn newline_does_not_cause_next_line_to_be_to_long() {
    let doc: RcDoc = RcDoc::group(
        RcDoc::text("test").append(RcDoc::hardline()).append(
            RcDoc::text("test")
                .append(RcDoc::line())
                .append(RcDoc::text("test")),
        ),
    );

    test!(6, doc, "test\ntest\ntest");
}

#[test]
fn newline_after_group_does_not_affect_it() {
    let arena = Arena::<()>::new();
    let doc = arena.text("x").append(arena.line()).append("y").group();

    test!(100, doc.append(arena.hardline()).1, "x y\n");
}

#[test]
fn block() {
    let doc: RcDoc = RcDoc::group(
        RcDoc::text("{")
            .append(
                RcDoc::line()
                    .append(RcDoc::text("test"))
                    .append(RcDoc::line())
                    .append(RcDoc::text("test"))
                    .nest(2),
            )
            .append(RcDoc::line())
            .append(RcDoc::text("}")),
    );

    test!(5, doc, "{\n  test\n  test\n}");
}

#[test]
fn block_with_hardline() {
    let doc: RcDoc = RcDoc::group(
        RcDoc::text("{")
            .append(
                RcDoc::line()
                    .append(RcDoc::text("test"))
                    .append(RcDoc::hardline())
                    .append(RcDoc::text("test"))
                    .nest(2),
            )
            .append(RcDoc::line())
            .append(RcDoc::text("}")),
    );

    test!(10, doc, "{\n  test\n  test\n}");
}

#[test]
fn line_comment() {
    let doc: BoxDoc = BoxDoc::group(
        BoxDoc::text("{")
            .append(
                BoxDoc::line()
                    .append(BoxDoc::text("test"))
                    .append(BoxDoc::line())
                    .append(BoxDoc::text("// a").append(BoxDoc::hardline()))
                    .append(BoxDoc::text("test"))
                    .nest(2),
            )
            .append(BoxDoc::line())
            .append(BoxDoc::text("}")),
    );

    test!(14, doc, "{\n  test\n  // a\n  test\n}");
}

#[test]
fn union_picks_first_branch_that_fits() {
    let doc: BoxDoc = BoxDoc::text("aaa bbb").union(
        BoxDoc::text("aaa")
            .append(BoxDoc::hardline())
            .append(BoxDoc::text("bbb")),
    );

    test!(7, doc, "aaa bbb");
    test!(5, doc, "aaa\nbbb");
}

// The first branch fits by itself; the text that follows on the same
// line is what overflows. The engine revisits the union and replays the
// continuation after the fallback.
#[test]
fn union_backtracks_on_later_overflow() {
    let doc: BoxDoc = BoxDoc::text("ab")
        .union(
            BoxDoc::text("a")
                .append(BoxDoc::hardline())
                .append(BoxDoc::text("b")),
        )
        .append(BoxDoc::text("cdef"));

    test!(10, doc, "abcdef");
    test!(4, doc, "a\nbcdef");
}

#[test]
fn nested_unions_backtrack_innermost_first() {
    let inner: BoxDoc = BoxDoc::text("inner").union(
        BoxDoc::text("in")
            .append(BoxDoc::hardline())
            .append(BoxDoc::text("ner")),
    );
    let doc: BoxDoc = BoxDoc::text("head ").union(BoxDoc::text("h\n")).append(inner);

    test!(10, doc, "head inner");
    test!(7, doc, "head in\nner");
}

#[test]
fn let_binding_layout() {
    let doc: BoxDoc = chain![
        chain!["let", BoxDoc::line(), "x", BoxDoc::line(), "="].group(),
        BoxDoc::line(),
        "\\y ->",
        chain![BoxDoc::line(), "y"].nest(2).group(),
    ]
    .group();

    test!(doc, "let x = \\y -> y");
    test!(14, doc, "let x =\n\\y -> y");
}

#[test]
fn flat_alt_selection() {
    let doc: BoxDoc = BoxDoc::text("broken")
        .flat_alt(BoxDoc::text("flat"))
        .group();

    test!(80, doc, "flat");
    test!(3, doc, "broken");
}

#[test]
fn usize_max_value() {
    let doc: BoxDoc = BoxDoc::group(
        BoxDoc::text("test")
            .append(BoxDoc::line())
            .append(BoxDoc::text("test")),
    );

    test!(usize::MAX, doc, "test test");
}

#[test]
fn non_ascii_is_not_byte_length() {
    let doc: BoxDoc = BoxDoc::group(
        BoxDoc::text("ÅÄÖ")
            .append(BoxDoc::line())
            .append(BoxDoc::text("test")),
    );

    test!(8, doc, "ÅÄÖ test");
}

#[test]
fn cjk_width_is_character_count() {
    let arena = Arena::<()>::new();
    let doc = arena
        .text("你好")
        .append(arena.line().append(arena.text("abc")).align())
        .into_doc();

    test!(doc, "你好\n  abc");
}

#[test]
fn pretty_cow() {
    let doc: BoxDoc = docs![
        &BoxAllocator,
        Cow::<str>::Borrowed("abc"),
        BoxDoc::line(),
        Cow::<str>::Owned("123".to_string()),
    ]
    .group()
    .into_doc();

    test!(8, doc, "abc 123");
}

#[test]
fn hang_nested_reflow() {
    let arena = Arena::<()>::new();
    let doc = arena
        .text("prefix")
        .append(arena.text(" "))
        .append(arena.reflow("Indenting these words with nest").hang(4));

    test!(
        24,
        doc,
        "prefix Indenting these\n           words with\n           nest"
    );
}
