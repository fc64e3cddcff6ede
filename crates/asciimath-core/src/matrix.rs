use mathml_renderer::{arena::Arena, ast::Node, attribute::ColumnLine};

#[inline]
fn is_comma(node: &Node<'_>) -> bool {
    matches!(node, Node::Identifier(","))
}

fn count_commas(row: &[&Node<'_>]) -> usize {
    row.iter().filter(|node| is_comma(node)).count()
}

#[inline]
fn is_column_bar(cell: &[&Node<'_>]) -> bool {
    cell.iter().any(|node| matches!(node, Node::Operator("|")))
}

/// Turn the content of a bracket group into a matrix, if it has the shape of one.
///
/// The content must be a comma-separated list of bracket groups (the rows), all of which
/// contain the same number of commas (which separate the columns). A single row is only a
/// matrix if it has at least two columns.
///
/// A column whose content contains `|` is dropped. In the first row, such a column marks a
/// solid line between the neighboring columns.
pub(crate) fn try_build<'arena>(
    arena: &'arena Arena,
    content: &[&'arena Node<'arena>],
    open: Option<&'static str>,
    close: Option<&'static str>,
) -> Option<&'arena Node<'arena>> {
    if content.len() % 2 == 0 {
        return None;
    }

    let mut rows: Vec<&'arena [&'arena Node<'arena>]> = Vec::with_capacity(content.len() / 2 + 1);
    for (index, node) in content.iter().enumerate() {
        if index % 2 == 1 {
            if !is_comma(node) {
                return None;
            }
        } else if let Node::Fenced { content: row, .. } = node {
            rows.push(*row);
        } else {
            return None;
        }
    }

    let first_commas = count_commas(rows.first()?);
    if rows.iter().any(|row| count_commas(row) != first_commas) {
        return None;
    }
    if rows.len() == 1 && first_commas == 0 {
        return None;
    }

    let mut separators = Vec::new();
    let mut table: Vec<Vec<&'arena [&'arena Node<'arena>]>> = Vec::with_capacity(rows.len());
    for (row_index, &row) in rows.iter().enumerate() {
        let mut cells = Vec::with_capacity(first_commas + 1);
        for (column, cell) in row.split(|node| is_comma(node)).enumerate() {
            if is_column_bar(cell) {
                if row_index == 0 {
                    separators.push(column);
                }
            } else {
                cells.push(cell);
            }
        }
        table.push(cells);
    }

    // Fill the first row back up to the length of the second row.
    if let [first, second, ..] = table.as_mut_slice() {
        while first.len() < second.len() {
            first.push(&[]);
        }
    }

    let column_lines: Vec<ColumnLine> = (1..table.first().map_or(0, Vec::len))
        .map(|column| {
            if separators.contains(&column) {
                ColumnLine::Solid
            } else {
                ColumnLine::None
            }
        })
        .collect();

    let rows: Vec<&'arena [&'arena [&'arena Node<'arena>]]> =
        table.iter().map(|cells| arena.alloc_slice(cells)).collect();

    Some(arena.push(Node::Matrix {
        open,
        close,
        rows: arena.alloc_slice(&rows),
        column_lines: arena.alloc_slice(&column_lines),
    }))
}
