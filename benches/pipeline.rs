use criterion::{black_box, criterion_group, criterion_main, Criterion};
use smsdict_rs::{count_ngrams, DictionaryBuilder, RegexTokenizer, SmsReader, WordTokenizer};

const BODIES: &[&str] = &[
    "Running late, see you in ten minutes!",
    "Can't make it tonight, co-op meeting ran over",
    "Ça va? On se voit demain à 18h",
    "ok see you tomorrow then",
    "Don't forget the groceries: milk, eggs, bread",
];

fn corpus_xml(messages: usize) -> String {
    let mut xml = String::from("<smses>\n");
    for i in 0..messages {
        let body = BODIES[i % BODIES.len()];
        let kind = if i % 3 == 0 { 1 } else { 2 };
        xml.push_str(&format!("  <sms type=\"{}\" body=\"{}\" />\n", kind, body));
    }
    xml.push_str("</smses>\n");
    xml
}

fn bench_tokenize(c: &mut Criterion) {
    let tokenizer = RegexTokenizer::default();
    c.bench_function("tokenize_message", |b| {
        b.iter(|| tokenizer.tokenize(black_box(BODIES[1])))
    });
}

fn bench_count(c: &mut Criterion) {
    let bodies: Vec<Option<&str>> = (0..1_000).map(|i| Some(BODIES[i % BODIES.len()])).collect();
    c.bench_function("count_1k_messages", |b| {
        b.iter(|| count_ngrams(RegexTokenizer::default(), black_box(bodies.iter().copied())))
    });
}

fn bench_build(c: &mut Criterion) {
    let xml = corpus_xml(1_000);
    let builder: DictionaryBuilder = DictionaryBuilder::default();
    c.bench_function("build_from_xml_1k", |b| {
        b.iter(|| builder.build(SmsReader::new(black_box(xml.as_bytes()))).unwrap())
    });
}

criterion_group!(benches, bench_tokenize, bench_count, bench_build);
criterion_main!(benches);
