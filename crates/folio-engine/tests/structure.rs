use folio_engine::model::build::*;
use folio_engine::sections::sections;
use folio_engine::{
    BlockKind, Document, Editor, ListError, ListType, Mark, MarkKind, SectionType, Selection,
};
use pretty_assertions::assert_eq;
use rstest::rstest;

fn nested() -> Document {
    doc(vec![
        divider(SectionType::MainText),
        heading(1, "Title"),
        ordered_list(
            ListType::Decimal,
            1,
            vec![item(vec![
                para("first"),
                bullet_list(vec![item(vec![para("inner")])]),
            ])],
        ),
        blockquote(vec![para("quoted"), para("")]),
    ])
}

// ============ Positions ============

#[test]
fn test_every_position_resolves_inside_its_innermost_node() {
    let doc = nested();
    for pos in 0..=doc.size() {
        let resolved = doc.resolve(pos).unwrap();
        let range = resolved.innermost_range();
        assert!(
            range.start <= pos && pos <= range.end,
            "position {pos} outside {range:?}"
        );
    }
    assert!(doc.resolve(doc.size() + 1).is_err());
}

#[rstest]
#[case(0, 0)]
#[case(3, 1)]
#[case(12, 3)]
#[case(20, 4)]
#[case(21, 5)]
fn test_resolve_depth(#[case] pos: usize, #[case] depth: usize) {
    assert_eq!(nested().resolve(pos).unwrap().depth(), depth);
}

// ============ Protected deletion ============

fn four_sections() -> Document {
    // 0 <toc/> 2 <p>Contents</p> 12 <intro/> 14 <p>Intro</p> 21
    // <main/> 23 <p>Body</p> 29 <bib/> 31 <p>Refs</p> 37
    doc(vec![
        divider(SectionType::Toc),
        para("Contents"),
        divider(SectionType::Introduction),
        para("Intro"),
        divider(SectionType::MainText),
        para("Body"),
        divider(SectionType::Bibliography),
        para("Refs"),
    ])
}

#[test]
fn test_deletion_outside_protected_section_not_handled() {
    let mut editor = Editor::new(four_sections());
    let before = editor.document().clone();

    let handled = editor.handle_deletion(16, 26).unwrap();

    assert!(!handled);
    assert_eq!(editor.document(), &before);
}

#[test]
fn test_deletion_engulfing_protected_section() {
    // 0 <intro/> 2 <p>Intro</p> 9 <toc/> 11 <p>Contents</p> 21
    // <main/> 23 <p>Body</p> 29 <bib/> 31 <p>Refs</p> 37
    let mut editor = Editor::new(doc(vec![
        divider(SectionType::Introduction),
        para("Intro"),
        divider(SectionType::Toc),
        para("Contents"),
        divider(SectionType::MainText),
        para("Body"),
        divider(SectionType::Bibliography),
        para("Refs"),
    ]));
    let section_count = sections(editor.document()).len();

    let handled = editor.handle_deletion(4, 26).unwrap();

    assert!(handled);
    assert_eq!(editor.document().text_content(), "I\nContents\ndy\nRefs");
    assert_eq!(sections(editor.document()).len(), section_count);
    let toc_end = sections(editor.document())[1].end;
    assert_eq!(editor.selection(), Selection::cursor(toc_end));
    insta::assert_debug_snapshot!(sections(editor.document()), @r"
    [
        Section {
            section_type: Introduction,
            start: 0,
            end: 5,
        },
        Section {
            section_type: Toc,
            start: 5,
            end: 17,
        },
        Section {
            section_type: MainText,
            start: 17,
            end: 23,
        },
        Section {
            section_type: Bibliography,
            start: 23,
            end: 31,
        },
    ]
    ");
}

#[test]
fn test_deletion_inside_protected_section_is_handled_without_deleting() {
    let mut editor = Editor::new(four_sections());
    let before = editor.document().clone();

    let handled = editor.handle_deletion(4, 9).unwrap();

    assert!(handled);
    assert_eq!(editor.document(), &before);
    assert_eq!(editor.selection(), Selection::cursor(12));
}

#[test]
fn test_deletion_from_protected_section_into_next() {
    let mut editor = Editor::new(four_sections());

    let handled = editor.handle_deletion(5, 18).unwrap();

    assert!(handled);
    assert_eq!(editor.document().text_content(), "Contents\nro\nBody\nRefs");
    assert_eq!(editor.selection(), Selection::cursor(12));
    assert!(editor.history().can_undo());
}

#[test]
fn test_deletion_from_inside_list_removes_whole_list() {
    // 0 <intro/> 2 <ol> ... 16 <toc/> 18 <p>C</p> 21 <main/> 23
    let mut editor = Editor::new(doc(vec![
        divider(SectionType::Introduction),
        ordered_list(
            ListType::Decimal,
            1,
            vec![item(vec![para("aa")]), item(vec![para("bb")])],
        ),
        divider(SectionType::Toc),
        para("C"),
        divider(SectionType::MainText),
    ]));

    let handled = editor.handle_deletion(6, 20).unwrap();

    assert!(handled);
    assert_eq!(editor.document().text_content(), "C");
    assert_eq!(sections(editor.document()).len(), 3);
    assert_eq!(editor.selection(), Selection::cursor(2));
}

#[test]
fn test_cursor_deletion_inside_protected_section_not_handled() {
    let mut editor = Editor::new(four_sections());

    assert!(!editor.handle_deletion(6, 6).unwrap());
    assert_eq!(editor.version(), 0);
}

#[test]
fn test_protected_section_rejects_marks() {
    let mut editor = Editor::new(four_sections());
    editor.set_selection(Selection::new(0, 37)).unwrap();

    editor.toggle_mark(MarkKind::Bold).unwrap();

    let bold = Mark::new(MarkKind::Bold);
    let contents = editor.document().block_at(2).unwrap();
    assert!(!contents.children[0].as_text().unwrap().has_mark(&bold));
    let body = editor.document().block_at(23).unwrap();
    assert!(body.children[0].as_text().unwrap().has_mark(&bold));
}

// ============ List numbering ============

fn lists_with(second_type: ListType) -> Document {
    doc(vec![
        ordered_list(
            ListType::Decimal,
            1,
            vec![
                item(vec![para("one")]),
                item(vec![para("two")]),
                item(vec![para("three")]),
            ],
        ),
        para("interlude"),
        ordered_list(second_type, 1, vec![item(vec![para("next")])]),
    ])
}

#[rstest]
#[case(ListType::Decimal, 4)]
#[case(ListType::LowerAlpha, 1)]
fn test_suggested_start_number(#[case] second_type: ListType, #[case] expected: u32) {
    let doc = lists_with(second_type);
    let inside_second = doc.size() - 5;
    let mut editor = Editor::new(doc);
    editor.set_selection(Selection::cursor(inside_second)).unwrap();

    assert_eq!(editor.suggested_start_number().unwrap(), expected);
}

#[test]
fn test_continue_previous_numbering_writes_start() {
    let doc = lists_with(ListType::Decimal);
    let second_list = doc.size() - 10;
    let inside_second = doc.size() - 5;
    let mut editor = Editor::new(doc);
    editor.set_selection(Selection::cursor(inside_second)).unwrap();

    editor.continue_previous_numbering().unwrap();

    assert_eq!(
        editor.document().block_at(second_list).unwrap().kind,
        BlockKind::OrderedList {
            list_type: ListType::Decimal,
            start: 4
        }
    );

    editor.restart_numbering().unwrap();
    assert_eq!(
        editor.document().block_at(second_list).unwrap().kind,
        BlockKind::OrderedList {
            list_type: ListType::Decimal,
            start: 1
        }
    );
}

#[test]
fn test_numbering_outside_list() {
    let mut editor = Editor::new(lists_with(ListType::Decimal));
    // inside "interlude"
    editor.set_selection(Selection::cursor(27)).unwrap();

    assert_eq!(editor.suggested_start_number(), Err(ListError::NotInList(27)));
}

// ============ Emphasis ============

#[test]
fn test_bold_and_plain_selection_is_not_bold() {
    let bold = Mark::new(MarkKind::Bold);
    let mut editor = Editor::new(doc(vec![para_runs(vec![
        marked("strong", &[bold]),
        text(" weak"),
    ])]));
    editor.set_selection(Selection::new(1, 12)).unwrap();

    let state = editor.emphasis_state().unwrap();

    assert!(!state.bold);
    insta::assert_debug_snapshot!(state, @r#"
    EmphasisState {
        bold: false,
        italic: false,
        underline: false,
        strikethrough: false,
        font_family: Some(
            "Times New Roman",
        ),
        font_size: Some(
            "12pt",
        ),
        color: None,
        alignment: Some(
            Left,
        ),
        heading_level: None,
        style_id: None,
        list_glyph: None,
    }
    "#);
}
