//! Criterion benchmarks for tasnif.
//!
//! Covers the online path:
//! - Arabic and English normalization
//! - TF-IDF vectorization
//! - Single-message classification

use std::hint::black_box;
use std::sync::Arc;

use chrono::Utc;
use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use tasnif::analysis::normalizer::normalize;
use tasnif::artifact::{ArtifactMetadata, FeatureModelArtifact};
use tasnif::config::{DecisionPolicy, VectorizerConfig};
use tasnif::inference::Classifier;
use tasnif::language::Language;
use tasnif::ml::binarizer::LabelBinarizer;
use tasnif::ml::gbdt::BoosterParams;
use tasnif::ml::pipeline::FeatureModelPipeline;
use tasnif::ml::tfidf::TfIdfVectorizer;

const WORDS: &[&str] = &[
    "parcel", "late", "courier", "rude", "payment", "failed", "refund", "box", "damaged",
    "support", "never", "answered", "tracking", "broken", "great", "service", "delivery",
    "driver", "card", "charged",
];

const CATEGORIES: &[&str] = &["Delay", "Courier Behavior", "Payment", "Shipment Condition"];

/// Generate test documents for benchmarking.
fn generate_test_documents(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| {
            let doc_length = 5 + (i % 20);
            (0..doc_length)
                .map(|j| WORDS[(i * 7 + j * 13) % WORDS.len()])
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect()
}

fn generate_labels(count: usize) -> Vec<Vec<&'static str>> {
    (0..count)
        .map(|i| vec![CATEGORIES[i % CATEGORIES.len()], CATEGORIES[(i / 3) % CATEGORIES.len()]])
        .collect()
}

fn build_classifier(documents: &[String]) -> Classifier {
    let mut binarizer = LabelBinarizer::new();
    let y = binarizer.fit_transform(&generate_labels(documents.len()));
    let params = BoosterParams {
        n_estimators: 50,
        ..Default::default()
    };
    let pipeline = FeatureModelPipeline::fit(documents, &y, VectorizerConfig::default(), params)
        .unwrap();
    let metadata = ArtifactMetadata {
        trained_at: Utc::now(),
        training_records: documents.len(),
        best_params: params,
        cv_micro_f1: 0.0,
    };
    let artifact = FeatureModelArtifact::new(pipeline, binarizer, metadata).unwrap();
    Classifier::new(Arc::new(artifact), DecisionPolicy::default())
}

/// Benchmark text normalization.
fn bench_normalization(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalization");
    let arabic = "وَصَلَتْ الشُّحْنَةُ مُتَأَخِّرَةً وَالْمَنْدُوبُ لَمْ يَكُنْ مُؤَدَّبًا";

    group.bench_function("normalize_arabic", |b| {
        b.iter(|| black_box(normalize(black_box(arabic), Language::Ar)))
    });
    group.bench_function("normalize_english", |b| {
        b.iter(|| black_box(normalize(black_box("  The parcel arrived late  "), Language::En)))
    });

    group.finish();
}

/// Benchmark TF-IDF fitting and transformation.
fn bench_vectorization(c: &mut Criterion) {
    let mut group = c.benchmark_group("vectorization");
    let documents = generate_test_documents(1000);

    let mut vectorizer = TfIdfVectorizer::new(VectorizerConfig::default()).unwrap();
    vectorizer.fit(&documents).unwrap();

    group.bench_function("transform_single_document", |b| {
        b.iter(|| black_box(vectorizer.transform(black_box(&documents[0]))))
    });

    group.throughput(Throughput::Elements(100));
    group.bench_function("transform_batch_documents", |b| {
        b.iter(|| black_box(vectorizer.transform_batch(black_box(&documents[..100]))))
    });

    group.sample_size(10);
    group.bench_function("fit_1000_documents", |b| {
        b.iter_with_setup(
            || TfIdfVectorizer::new(VectorizerConfig::default()).unwrap(),
            |mut vectorizer| {
                vectorizer.fit(&documents).unwrap();
                black_box(vectorizer)
            },
        )
    });

    group.finish();
}

/// Benchmark end-to-end prediction.
fn bench_prediction(c: &mut Criterion) {
    let mut group = c.benchmark_group("prediction");
    let documents = generate_test_documents(300);
    let classifier = build_classifier(&documents);

    group.bench_function("predict_english", |b| {
        b.iter(|| {
            black_box(classifier.predict(black_box(
                "Package arrived three days late and the courier was rude",
            )))
        })
    });
    group.bench_function("predict_short", |b| {
        b.iter(|| black_box(classifier.predict(black_box("late"))))
    });

    group.finish();
}

criterion_group!(benches, bench_normalization, bench_vectorization, bench_prediction);
criterion_main!(benches);
