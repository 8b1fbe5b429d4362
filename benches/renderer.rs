use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use archflow::config::Config;
use archflow::layout::compute_layout;
use archflow::model::{Connection, Diagram, Node, Zone};
use archflow::render::render_svg;

fn synthetic_diagram(nodes: usize, extra_connections: usize) -> Diagram {
    let mut diagram = Diagram {
        title: "Synthetic Architecture".to_string(),
        ..Diagram::default()
    };
    for i in 0..nodes {
        diagram.nodes.push(Node {
            id: format!("svc-{i}"),
            label: format!("Service {i}"),
            description: "Generated workload".to_string(),
            x: None,
            y: None,
            technologies: Default::default(),
            metrics: Default::default(),
            features: Vec::new(),
        });
    }
    for i in 0..nodes.saturating_sub(1) {
        diagram.connections.push(Connection {
            from: format!("svc-{i}"),
            to: format!("svc-{}", i + 1),
            label: "link".to_string(),
            kind_token: None,
            protocol: None,
        });
    }
    let mut count = 0usize;
    'outer: for i in 0..nodes {
        for j in (i + 2)..nodes {
            if count >= extra_connections {
                break 'outer;
            }
            diagram.connections.push(Connection {
                from: format!("svc-{i}"),
                to: format!("svc-{j}"),
                label: "cross".to_string(),
                kind_token: Some("monitoring".to_string()),
                protocol: None,
            });
            count += 1;
        }
    }
    for (z, chunk) in (0..nodes).collect::<Vec<_>>().chunks(2).enumerate() {
        diagram.zones.push(Zone {
            id: format!("zone-{z}"),
            label: format!("Zone {z}"),
            security: "Private Subnet".to_string(),
            compliance: vec!["SOC2".to_string()],
            nodes: chunk.iter().map(|i| format!("svc-{i}")).collect(),
        });
    }
    diagram
}

fn bench_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout");
    for size in [6usize, 24, 96] {
        let diagram = synthetic_diagram(size, size / 2);
        group.bench_with_input(BenchmarkId::from_parameter(size), &diagram, |b, diagram| {
            let config = Config::default();
            b.iter(|| {
                let validated = diagram.validate();
                black_box(compute_layout(&validated, &config.layout))
            });
        });
    }
    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render_svg");
    for size in [6usize, 24, 96] {
        let diagram = synthetic_diagram(size, size / 2);
        group.bench_with_input(BenchmarkId::from_parameter(size), &diagram, |b, diagram| {
            let config = Config::default();
            b.iter(|| black_box(render_svg(diagram, &config)));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_layout, bench_render);
criterion_main!(benches);
