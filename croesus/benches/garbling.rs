use criterion::{criterion_group, criterion_main, Criterion};
use croesus::circuit::{bits, garble, Topology, WireId};
use rand::rngs::OsRng;
use std::{collections::HashMap, time::Duration};

fn bench_garble(c: &mut Criterion) {
    c.bench_function("garbling::comparator_gb", move |bench| {
        let topology = Topology::comparator();
        bench.iter(|| {
            let garbled = garble(&topology, &mut OsRng).unwrap();
            criterion::black_box(garbled);
        });
    });
}

fn bench_eval(c: &mut Criterion) {
    c.bench_function("garbling::comparator_ev", move |bench| {
        let topology = Topology::comparator();
        let (circuit, x_keys, y_keys) = garble(&topology, &mut OsRng).unwrap();
        let mut assignment: HashMap<WireId, _> = HashMap::new();
        for ((_, wire), key) in topology
            .garbler_inputs()
            .iter()
            .zip(x_keys.select(&bits(2)).into_iter())
        {
            assignment.insert(*wire, key);
        }
        for ((_, wire), key) in topology
            .evaluator_inputs()
            .iter()
            .zip(y_keys.select(&bits(1)).into_iter())
        {
            assignment.insert(*wire, key);
        }
        bench.iter(|| {
            let result = circuit.evaluate(&topology, &assignment).unwrap();
            criterion::black_box(result);
        });
    });
}

criterion_group! {
    name = garbling;
    config = Criterion::default().warm_up_time(Duration::from_millis(100));
    targets = bench_garble, bench_eval,
}
criterion_main!(garbling);
