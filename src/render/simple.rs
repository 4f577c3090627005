use crate::{doc::DocNode, render::Cancel, Doc, DocPtr};

use super::write::RenderAnnotated;

enum Step<'d, 'a, T, A>
where
    T: DocPtr<'a, A>,
{
    Doc(&'d Doc<'a, T, A>),
    PopAnnotation,
}

/// Renders `doc` without resolving any layout choices: alternatives pick
/// their default branch, unions their fallback, indentation and flatten
/// requests are ignored.
pub(super) fn render_simple<'a, T, A, W>(
    doc: &Doc<'a, T, A>,
    cancel: Option<&Cancel>,
    out: &mut W,
) -> Result<(), W::Error>
where
    T: DocPtr<'a, A> + 'a,
    W: ?Sized + RenderAnnotated<A>,
{
    let mut stack = vec![Step::Doc(doc)];
    while let Some(step) = stack.pop() {
        if cancel.is_some_and(|cancel| cancel.is_canceled()) {
            return Err(out.interrupted());
        }
        let mut doc = match step {
            Step::Doc(doc) => doc,
            Step::PopAnnotation => {
                out.pop_annotation()?;
                continue;
            }
        };
        loop {
            match &doc.node {
                DocNode::Nil => break,
                DocNode::HardLine => {
                    out.new_line()?;
                    break;
                }
                DocNode::Spaces(amount) => {
                    out.white_space(*amount)?;
                    break;
                }
                DocNode::Text(text) => {
                    out.text(text)?;
                    break;
                }
                DocNode::Block(block) => {
                    let mut row = String::new();
                    for at in 0..block.height() {
                        if at > 0 {
                            out.new_line()?;
                        }
                        row.clear();
                        block.write_row(at, &mut row);
                        if !row.is_empty() {
                            out.text(&row)?;
                        }
                    }
                    break;
                }
                DocNode::Append(left, right) => {
                    stack.push(Step::Doc(right));
                    doc = left;
                }
                DocNode::FlatAlt(default, _) => doc = default,
                DocNode::Union(_, second) => doc = second,
                DocNode::Flatten(inner) | DocNode::Nest(_, inner) | DocNode::Align(inner) => {
                    doc = inner
                }
                DocNode::Annotated(ann, inner) => {
                    out.push_annotation(ann)?;
                    stack.push(Step::PopAnnotation);
                    doc = inner;
                }
            }
        }
    }
    Ok(())
}
