use stable_arena::DroplessArena;

use super::ast::Node;

/// Backing storage for an AST and the slices that hold its children.
///
/// Nodes never own heap memory, so the whole tree is released at once when the arena is dropped,
/// no matter how deeply it is nested.
pub struct Arena {
    inner: DroplessArena,
}

impl Arena {
    pub fn new() -> Self {
        Arena {
            inner: DroplessArena::default(),
        }
    }

    pub fn push<'arena>(&'arena self, node: Node<'arena>) -> &'arena Node<'arena> {
        self.inner.alloc(node)
    }

    pub fn push_slice<'arena>(
        &'arena self,
        nodes: &[&'arena Node<'arena>],
    ) -> &'arena [&'arena Node<'arena>] {
        self.alloc_slice(nodes)
    }

    /// Copy any slice of plain data (node references, cell lists, column lines) into the arena.
    pub fn alloc_slice<T: Copy>(&self, items: &[T]) -> &[T] {
        // `DroplessArena::alloc_slice()` panics on empty slices.
        if items.is_empty() {
            &[]
        } else {
            self.inner.alloc_slice(items)
        }
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arena_test() {
        let arena = Arena::new();
        let reference = arena.push(Node::Identifier("x"));
        assert!(matches!(reference, Node::Identifier("x")));
    }

    #[test]
    fn empty_slices() {
        let arena = Arena::new();
        assert!(arena.push_slice(&[]).is_empty());
        assert!(arena.alloc_slice::<u8>(&[]).is_empty());
    }

    #[test]
    fn nested_slices() {
        let arena = Arena::new();
        let one = arena.push(Node::Number("1"));
        let two = arena.push(Node::Number("2"));
        let cell_a = arena.push_slice(&[one]);
        let cell_b = arena.push_slice(&[one, two]);
        let row = arena.alloc_slice(&[cell_a, cell_b]);
        assert_eq!(row.len(), 2);
        assert_eq!(row[1].len(), 2);
        assert!(matches!(row[1][1], Node::Number("2")));
    }
}
