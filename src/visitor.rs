use crate::{doc::DocNode, Doc, DocPtr};

/// Visit deeply concatenated docs sequentially, flattening the append
/// spine.
pub(crate) fn visit_sequence_deep<'a, 'd, T, A>(
    mut doc: &'d Doc<'a, T, A>,
    visitor: &mut impl FnMut(&'d Doc<'a, T, A>),
) where
    T: DocPtr<'a, A>,
{
    while let DocNode::Append(left, right) = &doc.node {
        visit_sequence_deep(left, visitor);
        doc = right;
    }
    visitor(doc);
}
