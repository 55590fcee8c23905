//! Tests for rendering extracted tables

use pretty_assertions::assert_eq;

use super::*;

fn single(cell: Cell) -> TableModel {
    TableModel::new(vec![Row::new(vec![cell])])
}

fn markup_cell(cell: Cell) -> String {
    MarkupRenderer::default().render_cell(&cell)
}

#[test]
fn test_escaped_cell() {
    assert_eq!(markup_cell(Cell::new("A_B")), r"A\_B");
}

#[test]
fn test_header_rowspan() {
    let cell = Cell::header("Name").with_spans(2, 1);
    assert_eq!(markup_cell(cell), r"\multirow{2}{*}{\textbf{Name}}");
}

#[test]
fn test_colspan() {
    let cell = Cell::new("Total").with_spans(1, 3);
    assert_eq!(markup_cell(cell), r"\multicolumn{3}{ c }{Total}");
}

#[test]
fn test_wrapping_order() {
    let cell = Cell::header("x_y")
        .with_spans(2, 3)
        .with_classes(["c1", "c2"]);
    assert_eq!(
        markup_cell(cell),
        r"\multicolumn{3}{ c }{\multirow{2}{*}{\textbf{\c2{\c1{x\_y}}}}}"
    );
}

#[test]
fn test_decoration_wraps_escaped_text() {
    let cell = Cell::new("a&b").with_classes(["c1", "c2"]);
    assert_eq!(markup_cell(cell), r"\c2{\c1{a\&b}}");
}

#[test]
fn test_full_table() {
    let model = TableModel::new(vec![
        Row::new(vec![
            Cell::header("Tracker").with_spans(2, 1),
            Cell::header("Score").with_spans(1, 2),
        ]),
        Row::new(vec![Cell::header("A"), Cell::header("R")]),
        Row::new(vec![
            Cell::new("ncc_1"),
            Cell::new("0.5").with_classes(["first"]),
            Cell::new("3"),
        ]),
    ]);

    let expected = concat!(
        "\\begin{tabular}{|c|c|c|}\n",
        "\\hline\n",
        "\\multirow{2}{*}{\\textbf{Tracker}} & \\multicolumn{2}{ c }{\\textbf{Score}} \\\\\\hline\n",
        "\\textbf{A} & \\textbf{R} \\\\\\hline\n",
        "ncc\\_1 & \\first{0.5} & 3 \\\\\\hline\n",
        "\\end{tabular}\n",
    );
    assert_eq!(render(&model, TableFormat::Markup), expected);
}

#[test]
fn test_column_spec_matches_widest_row() {
    let model = TableModel::new(vec![
        Row::new(vec![Cell::new("a"), Cell::new("b")]),
        Row::new(vec![Cell::new("c").with_spans(1, 2), Cell::new("d")]),
    ]);
    assert_eq!(model.column_count(), 3);
    let latex = render(&model, TableFormat::Markup);
    assert!(latex.starts_with("\\begin{tabular}{|c|c|c|}\n"));
}

#[test]
fn test_empty_table() {
    let model = TableModel::default();
    assert_eq!(
        render(&model, TableFormat::Markup),
        "\\begin{tabular}{|}\n\\hline\n\\end{tabular}\n"
    );
    assert_eq!(render(&model, TableFormat::Delimited), "");
}

#[test]
fn test_empty_row() {
    let model = TableModel::new(vec![Row::default()]);
    assert_eq!(
        render(&model, TableFormat::Markup),
        "\\begin{tabular}{|}\n\\hline\n \\\\\\hline\n\\end{tabular}\n"
    );
}

#[test]
fn test_render_is_deterministic() {
    let model = TableModel::new(vec![Row::new(vec![
        Cell::new("x").with_classes(["b", "a", "c"]),
        Cell::header("y").with_spans(3, 2),
    ])]);
    let first = render(&model, TableFormat::Markup);
    let second = render(&model.clone(), TableFormat::Markup);
    assert_eq!(first, second);
}

#[test]
fn test_delimited_two_by_two() {
    let model = TableModel::new(vec![
        Row::new(vec![Cell::new("a"), Cell::new("b")]),
        Row::new(vec![Cell::new("c"), Cell::new("d")]),
    ]);
    assert_eq!(render(&model, TableFormat::Delimited), "a & b\nc & d\n");
}

#[test]
fn test_delimited_keeps_spans_only() {
    let model = single(
        Cell::header("a_b & c")
            .with_spans(2, 2)
            .with_classes(["good"]),
    );
    assert_eq!(
        render(&model, TableFormat::Delimited),
        "\\multicolumn{2}{ c }{\\multirow{2}{*}{a_b & c}}\n"
    );
}

#[test]
fn test_class_commands_option() {
    let mut commands = ClassCommands::new();
    commands.insert("good", "textcolor{green}");
    commands.insert("first", "");
    let options = MarkupOptions::with_class_commands(commands);

    let model = single(Cell::new("1").with_classes(["first", "good"]));
    let latex = render_with_options(&model, TableFormat::Markup, &options);
    assert!(latex.contains(r"\textcolor{green}{1} \\\hline"));
    assert!(!latex.contains("first"));

    // Delimited output ignores decoration entirely
    assert_eq!(
        render_with_options(&model, TableFormat::Delimited, &options),
        "1\n"
    );
}

#[test]
fn test_huge_colspan_renders_clamped() {
    let grid = vec![SourceRow::new(vec![SourceCell::new("x").col_span("4000000000")])];
    let model = extract(&grid);
    assert_eq!(model.column_count(), 1000);

    let latex = render(&model, TableFormat::Markup);
    let spec = format!("\\begin{{tabular}}{{|{}}}\n", "c|".repeat(1000));
    assert!(latex.starts_with(&spec));
    assert!(latex.contains(r"\multicolumn{1000}{ c }{x}"));
}
