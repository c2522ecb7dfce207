//! Property checks for the byte-budgeted batch planner.
//!
//! Schemas, budgets and ceilings are drawn from a seeded RNG so failures
//! reproduce.

use loadgen_core::{
    BatchData, CollectionSchema, FieldDescriptor, FieldKind, FieldValue, OutputShape, SchemaError,
    SizeModel, DEFAULT_MAX_BATCH_BYTES,
};
use loadtest_generator::{BatchPlan, GenerationSession, GeneratorError, SessionConfig};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Build a random valid schema from the supported kinds.
fn random_schema(rng: &mut StdRng) -> CollectionSchema {
    let mut fields = vec![FieldDescriptor::primary("pk", FieldKind::Int64)];
    for i in 0..rng.random_range(1..4) {
        let kind = match rng.random_range(0..4) {
            0 => FieldKind::Int64,
            1 => FieldKind::Double,
            2 => FieldKind::VarChar {
                max_length: rng.random_range(1..300),
            },
            _ => FieldKind::FloatVector {
                dim: rng.random_range(1..64),
            },
        };
        fields.push(FieldDescriptor::new(format!("f{i}"), kind));
    }
    CollectionSchema::new("random", fields).unwrap()
}

#[test]
fn total_rows_match_budget_exactly() {
    let mut rng = StdRng::seed_from_u64(0xC0FFEE);

    for _ in 0..200 {
        let schema = random_schema(&mut rng);
        let model = SizeModel::new(&schema).unwrap();
        let budget = rng.random_range(0..2_000_000u64);
        let ceiling = rng.random_range(1..200_000u64);

        let plan = BatchPlan::new(&model, budget, ceiling).unwrap();
        let total: u64 = (0..plan.batch_count())
            .map(|i| plan.batch_rows(i).unwrap())
            .sum();

        assert_eq!(total, plan.total_rows());
        assert!(model.size_for_count(total) <= budget);
        assert!(model.size_for_count(total + 1) > budget);
    }
}

#[test]
fn batches_respect_ceiling() {
    let mut rng = StdRng::seed_from_u64(7);

    for _ in 0..200 {
        let schema = random_schema(&mut rng);
        let model = SizeModel::new(&schema).unwrap();
        let budget = rng.random_range(0..1_000_000u64);
        let ceiling = rng.random_range(1..50_000u64);

        let plan = BatchPlan::new(&model, budget, ceiling).unwrap();
        for i in 0..plan.batch_count() {
            let rows = plan.batch_rows(i).unwrap();
            assert!(rows > 0);
            let bytes = model.size_for_count(rows);
            // Only a lone oversized row may exceed the ceiling
            assert!(bytes <= ceiling || rows == 1);
        }
    }
}

#[test]
fn session_ids_are_gapless() {
    let mut rng = StdRng::seed_from_u64(99);

    for round in 0..20 {
        let schema = random_schema(&mut rng);
        let start_id = rng.random_range(0..1_000u64);
        let config = SessionConfig::default()
            .with_seed(round)
            .with_start_id(start_id);
        let mut session = GenerationSession::new(schema, config).unwrap();

        let mut expected = start_id;
        for batch in session.batches(200_000, 20_000).unwrap() {
            assert_eq!(batch.first_id, expected);
            let pk = batch.column("pk").unwrap();
            for i in 0..batch.row_count as usize {
                assert_eq!(pk.values.get(i), Some(FieldValue::Int64(expected as i64)));
                expected += 1;
            }
        }
        assert_eq!(session.next_id(), expected);
    }
}

#[test]
fn size_model_round_trip() {
    let mut rng = StdRng::seed_from_u64(3);

    for _ in 0..100 {
        let model = SizeModel::new(&random_schema(&mut rng)).unwrap();
        let n = rng.random_range(0..1_000_000u64);
        assert_eq!(model.count_for_size(model.size_for_count(n)), n);
    }
}

#[test]
fn one_mebibyte_of_128_dim_vectors() {
    let schema = CollectionSchema::new(
        "example",
        vec![
            FieldDescriptor::primary("pk", FieldKind::Int64),
            FieldDescriptor::new("v", FieldKind::FloatVector { dim: 128 }),
        ],
    )
    .unwrap();
    let mut session = GenerationSession::new(schema, SessionConfig::default()).unwrap();

    let batches: Vec<_> = session
        .batches(1_048_576, DEFAULT_MAX_BATCH_BYTES)
        .unwrap()
        .collect();

    assert_eq!(batches.len(), 1);
    assert_eq!(batches[0].row_count, 2016);
    assert_eq!(batches[0].id_range(), 0..2016);
    assert_eq!(batches[0].modeled_bytes, 2016 * 520);
}

#[test]
fn zero_budget_is_empty() {
    let mut rng = StdRng::seed_from_u64(1);
    let mut session = GenerationSession::new(random_schema(&mut rng), SessionConfig::default())
        .unwrap();

    assert_eq!(
        session
            .batches(0, DEFAULT_MAX_BATCH_BYTES)
            .unwrap()
            .count(),
        0
    );
    assert_eq!(session.rows_generated(), 0);
}

#[test]
fn bool_field_is_unsupported() {
    let schema = CollectionSchema::new(
        "flags",
        vec![
            FieldDescriptor::primary("pk", FieldKind::Int64),
            FieldDescriptor::new("flag", FieldKind::Bool),
        ],
    )
    .unwrap();

    match GenerationSession::new(schema, SessionConfig::default()) {
        Err(GeneratorError::SchemaError(SchemaError::UnsupportedFieldKind { field, .. })) => {
            assert_eq!(field, "flag");
        }
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected UnsupportedFieldKind"),
    }
}

#[test]
fn worker_sessions_partition_ids() {
    let schema = CollectionSchema::new(
        "bench",
        vec![
            FieldDescriptor::primary("pk", FieldKind::Int64),
            FieldDescriptor::new("random", FieldKind::Double),
            FieldDescriptor::new("embeddings", FieldKind::FloatVector { dim: 8 }),
        ],
    )
    .unwrap();

    let ranges: Vec<_> = (0..2)
        .map(|worker| {
            let config = SessionConfig::for_worker(worker, 5000).with_shape(OutputShape::Rows);
            let mut session = GenerationSession::new(schema.clone(), config).unwrap();
            let batch = session.next_batch(5000).unwrap();
            let BatchData::Rows(rows) = &batch.data else {
                panic!("Expected rows");
            };
            assert_eq!(rows.len(), 5000);
            batch.id_range()
        })
        .collect();

    assert_eq!(ranges, vec![0..5000, 5000..10000]);
}
