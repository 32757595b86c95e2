use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use editor_view::{
    CursorPos, EditorView, FindDirection, Rect, SearchOptions, SearchRegion,
};

fn large_text(line_count: usize) -> String {
    let mut out = String::with_capacity(line_count * 64);
    for i in 0..line_count {
        out.push_str(&format!(
            "{i:06} the quick brown fox jumps over the lazy dog (editor-view benchmark line)\n"
        ));
    }
    // Remove the final '\n' to avoid creating an extra trailing empty line.
    out.pop();
    out
}

fn bench_large_file_open(c: &mut Criterion) {
    let text = large_text(50_000);
    c.bench_function("large_file_open/50k_lines", |b| {
        b.iter(|| {
            let view = EditorView::from_text(black_box(&text));
            black_box(view.line_count());
        })
    });
}

fn bench_visible_blocks_mid_document(c: &mut Criterion) {
    let text = large_text(50_000);
    let mut view = EditorView::from_text(&text);
    view.scroll_to_line(25_000);
    let rect = Rect::new(0, 0, 1200, 960);

    c.bench_function("visible_blocks/60_lines", |b| {
        b.iter(|| {
            let count = view.visible_blocks(black_box(rect)).count();
            black_box(count);
        })
    });
}

fn bench_paint_blocks_with_selection(c: &mut Criterion) {
    let text = large_text(50_000);
    let mut view = EditorView::from_text(&text);
    view.scroll_to_line(25_000);
    view.set_cursor_position(CursorPos::new(25_010, 10));
    let rect = Rect::new(0, 0, 1200, 960);

    c.bench_function("paint_blocks/60_lines", |b| {
        b.iter(|| {
            let blocks = view.paint_blocks(black_box(rect));
            black_box(blocks.len());
        })
    });
}

fn bench_region_search_wraparound(c: &mut Criterion) {
    let text = large_text(50_000);
    c.bench_function("find/wraparound_50k_lines", |b| {
        b.iter_batched(
            || {
                let mut view = EditorView::from_text(&text);
                view.set_cursor_position(CursorPos::new(40_000, 0));
                view
            },
            |mut view| {
                let hit = view
                    .find(
                        "012345 the",
                        SearchRegion::whole(),
                        FindDirection::Forward,
                        SearchOptions::plain(),
                        true,
                    )
                    .unwrap();
                black_box(hit);
            },
            BatchSize::LargeInput,
        )
    });
}

fn bench_move_lines_in_middle(c: &mut Criterion) {
    let text = large_text(50_000);
    c.bench_function("move_lines_down/100_moves", |b| {
        b.iter_batched(
            || {
                let mut view = EditorView::from_text(&text);
                view.set_cursor_position(CursorPos::new(25_000, 0));
                view
            },
            |mut view| {
                for _ in 0..100 {
                    view.move_lines_down();
                }
                black_box(view.cursor_position());
            },
            BatchSize::LargeInput,
        )
    });
}

criterion_group!(
    benches,
    bench_large_file_open,
    bench_visible_blocks_mid_document,
    bench_paint_blocks_with_selection,
    bench_region_search_wraparound,
    bench_move_lines_in_middle
);
criterion_main!(benches);
