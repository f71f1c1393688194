use criterion::{Criterion, black_box, criterion_group, criterion_main};
use html::{locate_by_class, parse, serialize, tokenize};

const SMALL_BLOCKS: usize = 64;
const LARGE_BLOCKS: usize = 20_000;

fn make_page(blocks: usize) -> String {
    let mut out = String::with_capacity(blocks * 64 + 256);
    out.push_str("<!DOCTYPE html><html><head><title>bench</title></head><body>");
    out.push_str(r#"<ul class="nav"><li>home</li></ul>"#);
    for i in 0..blocks {
        if i == blocks / 2 {
            out.push_str(r#"<div class="CUT"></div>"#);
        }
        out.push_str("<div class=box><span>hello &amp; bye</span><img src=x></div>");
    }
    out.push_str("</body></html>");
    out
}

fn make_rawtext_adversarial(bytes: usize) -> String {
    let mut body = String::with_capacity(bytes + 32);
    body.push_str("<script>");
    while body.len() < bytes {
        body.push_str("</scri");
        body.push('<');
        body.push_str("pt");
    }
    body.push_str("</script>");
    body
}

fn bench_tokenize_small(c: &mut Criterion) {
    let input = make_page(SMALL_BLOCKS);
    c.bench_function("bench_tokenize_small", |b| {
        b.iter(|| {
            let tokens = tokenize(black_box(&input)).unwrap();
            black_box(tokens.len());
        });
    });
}

fn bench_parse_large(c: &mut Criterion) {
    let input = make_page(LARGE_BLOCKS);
    c.bench_function("bench_parse_large", |b| {
        b.iter(|| {
            let dom = parse(black_box(&input)).unwrap();
            black_box(dom);
        });
    });
}

fn bench_serialize_large(c: &mut Criterion) {
    let dom = parse(&make_page(LARGE_BLOCKS)).unwrap();
    c.bench_function("bench_serialize_large", |b| {
        b.iter(|| {
            let out = serialize(black_box(&dom));
            black_box(out.len());
        });
    });
}

fn bench_locate_marker_large(c: &mut Criterion) {
    let dom = parse(&make_page(LARGE_BLOCKS)).unwrap();
    c.bench_function("bench_locate_marker_large", |b| {
        b.iter(|| {
            let path = locate_by_class(black_box(&dom), "CUT");
            black_box(path);
        });
    });
}

fn bench_tokenize_rawtext_adversarial(c: &mut Criterion) {
    let input = make_rawtext_adversarial(512 * 1024);
    c.bench_function("bench_tokenize_rawtext_adversarial", |b| {
        b.iter(|| {
            let tokens = tokenize(black_box(&input)).unwrap();
            black_box(tokens.len());
        });
    });
}

criterion_group!(
    benches,
    bench_tokenize_small,
    bench_parse_large,
    bench_serialize_large,
    bench_locate_marker_large,
    bench_tokenize_rawtext_adversarial
);
criterion_main!(benches);
