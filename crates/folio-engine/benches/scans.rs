use criterion::{Criterion, criterion_group, criterion_main};
use folio_config::StyleDefaults;
use folio_engine::model::build::*;
use folio_engine::{
    AnnotationId, AnnotationKind, Attrs, Document, ListType, Mark, SectionType, Selection,
    annotations, emphasis, lists,
};

/// A manuscript of `chapters` chapters, each with a heading, commented
/// paragraphs and a numbered list
fn generate_manuscript(chapters: usize) -> (Document, AnnotationId) {
    let tracked = AnnotationId::new();
    let mut children = vec![
        divider(SectionType::Toc),
        para("Contents"),
        divider(SectionType::MainText),
    ];
    for chapter in 0..chapters {
        let comment = Mark::annotation(AnnotationKind::Comment, tracked, Attrs::new());
        children.push(heading(2, &format!("Chapter {chapter}")));
        children.push(para_runs(vec![
            text("Some paragraph content with "),
            marked("a tracked comment", &[comment]),
            text(" and a little more prose after it."),
        ]));
        children.push(ordered_list(
            ListType::Decimal,
            1,
            (0..5).map(|i| item(vec![para(&format!("item {i}"))])).collect(),
        ));
    }
    (doc(children), tracked)
}

fn bench_scans(c: &mut Criterion) {
    let mut group = c.benchmark_group("scans");
    group.sample_size(10);

    let (doc, tracked) = generate_manuscript(200);
    let last_list_item = doc.size() - 5;
    let defaults = StyleDefaults::default();

    group.bench_function("locate_annotation", |b| {
        b.iter(|| annotations::locate(std::hint::black_box(&doc), tracked));
    });

    group.bench_function("suggested_start_number", |b| {
        b.iter(|| lists::suggested_start_number(std::hint::black_box(&doc), last_list_item));
    });

    group.bench_function("emphasis_whole_document", |b| {
        let selection = Selection::new(0, doc.size());
        b.iter(|| emphasis::emphasis_state(std::hint::black_box(&doc), selection, &defaults));
    });

    group.finish();
}

criterion_group!(benches, bench_scans);
criterion_main!(benches);
